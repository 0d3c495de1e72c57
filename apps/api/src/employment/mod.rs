pub mod buckets;
pub mod handlers;
pub mod queries;
