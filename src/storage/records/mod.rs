pub(crate) mod expense;
pub(crate) mod session;
pub(crate) mod user;
