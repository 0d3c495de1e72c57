pub mod dashboards;
pub mod handlers;
pub mod queries;
pub mod transition;
