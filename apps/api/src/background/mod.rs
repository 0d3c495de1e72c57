pub mod bank;
pub mod handlers;
pub mod queries;
