pub mod expense;
pub mod goal;
pub mod month;
pub mod user;

pub use expense::{Expense, ExpenseInput};
pub use goal::Goal;
pub use month::{LIFETIME, MonthFilter, YearMonth, goal_month};
pub use user::User;
