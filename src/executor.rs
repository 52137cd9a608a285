pub mod job;
pub mod manager;
