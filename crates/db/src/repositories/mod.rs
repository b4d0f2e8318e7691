//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods. See
//! the crate docs for the executor-passing convention.

pub mod bookmark_repo;
pub mod collection_repo;
pub mod progress_repo;
pub mod session_repo;
pub mod track_repo;
pub mod user_repo;

pub use bookmark_repo::BookmarkRepo;
pub use collection_repo::CollectionRepo;
pub use progress_repo::ProgressRepo;
pub use session_repo::SessionRepo;
pub use track_repo::TrackRepo;
pub use user_repo::UserRepo;

/// Clamp a caller-supplied page size to `1..=100`, defaulting to 50.
pub fn clamp_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(50).clamp(1, 100)
}

/// Clamp a caller-supplied offset to be non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}
