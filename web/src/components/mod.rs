pub mod admin_guard;
pub mod error;
pub mod health_pie_chart;
pub mod loading;
pub mod navbar;
pub mod pool_card;
pub mod pool_form;
pub mod pool_table;
pub mod rating_bar_chart;
pub mod stat_card;

// Re-export commonly used types
pub use admin_guard::AdminGuard;
pub use health_pie_chart::HealthPieChart;
pub use navbar::Navbar;
pub use pool_card::PoolCard;
pub use pool_form::PoolForm;
pub use pool_table::PoolTable;
pub use rating_bar_chart::RatingBarChart;
pub use stat_card::StatCard;
