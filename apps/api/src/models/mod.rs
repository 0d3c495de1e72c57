pub mod application;
pub mod candidate;
pub mod job;
pub mod profile;
pub mod user;
