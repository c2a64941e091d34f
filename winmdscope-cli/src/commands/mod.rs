pub mod common;
pub mod members;
pub mod tables;
pub mod types;
