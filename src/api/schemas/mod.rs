pub mod auth;
pub mod budget;
pub mod expenses;
pub mod months;
