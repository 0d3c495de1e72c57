pub mod address_history;
pub mod completion;
pub mod handlers;
pub mod queries;
pub mod wizard;
