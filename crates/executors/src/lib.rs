pub mod actions;
pub mod command;
pub mod executors;
