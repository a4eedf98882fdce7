pub mod account_service;
pub mod expense_service;
pub mod health_service;
pub mod month_resolver;
pub mod session_service;
