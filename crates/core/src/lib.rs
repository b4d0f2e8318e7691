//! Domain layer for the lingopod backend.
//!
//! Pure types and validation shared by the data and HTTP layers: id/time
//! aliases, the error taxonomy, value objects, and the pre-check logic for
//! collection track lists and batch upload completion. No I/O lives here.

pub mod collection;
pub mod error;
pub mod types;
pub mod upload;
pub mod value;
