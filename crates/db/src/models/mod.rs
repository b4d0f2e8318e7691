//! Row models and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A create DTO for inserts
//! - Where applicable, an update DTO (all `Option` fields) for patches

pub mod activity;
pub mod collection;
pub mod session;
pub mod track;
pub mod user;
