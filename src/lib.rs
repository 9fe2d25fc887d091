// Expense Tracker - Core Library
// Record store, form/table/analytics controllers, and ambient setup shared by
// the terminal UI binary and the tests.

pub mod analytics;
pub mod config;
pub mod context;
pub mod db;
pub mod error;
pub mod form;
pub mod logging;
pub mod table;

// Re-export commonly used types
pub use analytics::{spending_summary, Slice, SpendingSummary, CHART_TITLE, PALETTE};
pub use config::{AppConfig, LogConfig};
pub use context::AppContext;
pub use db::{
    CategoryTotal, Expense,
    open_database, setup_database, insert_expense, delete_expense,
    list_expenses, sum_by_category, count_expenses,
};
pub use error::{ExpenseError, Result, Severity};
pub use form::{parse_amount, ExpenseForm, FormField};
pub use logging::init_logging;
pub use table::{PendingDelete, TableView};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
