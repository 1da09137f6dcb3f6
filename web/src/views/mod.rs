pub mod admin_dashboard;
pub mod auth;
pub mod home;
pub mod map;
pub mod not_found;
pub mod pool_detail;
pub mod pool_list;
pub mod pool_manager;
