pub mod candidate;
pub mod job;
pub mod screening;
pub mod user;
