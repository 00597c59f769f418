//! Route handlers, grouped by concern.

pub mod auth;
pub mod dashboard;
pub mod expenses;
pub mod goals;
pub mod transfer;
