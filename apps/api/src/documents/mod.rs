pub mod handlers;
pub mod queries;
pub mod service;
pub mod store;
pub mod validation;
