//! HTTP request handlers, grouped by resource.

pub mod activity;
pub mod auth;
pub mod collection;
pub mod track;
pub mod upload;
pub mod user;
