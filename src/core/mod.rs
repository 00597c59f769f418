//! Feature logic. Each `XLogic` works on a `DbPool` and knows nothing about
//! HTTP or the terminal, so both front ends share it.

pub mod auth;
pub mod backup;
pub mod dashboard;
pub mod expenses;
pub mod goals;
pub mod import;
pub mod log;

pub use auth::AuthLogic;
pub use backup::BackupLogic;
pub use dashboard::{DashboardLogic, DashboardSummary};
pub use expenses::ExpenseLogic;
pub use goals::GoalLogic;
pub use import::ImportLogic;
pub use log::LogLogic;
