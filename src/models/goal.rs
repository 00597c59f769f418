use serde::Serialize;

/// A monthly spending ceiling. At most one row per (user_id, month).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Goal {
    pub id: i64,
    pub user_id: i64,
    pub month: String, // "YYYY-MM"
    pub amount: f64,
}
