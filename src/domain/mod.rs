pub mod expense;
pub mod money;
pub mod month;
pub mod session;
pub mod user;
