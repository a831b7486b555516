pub mod catalog;
pub mod commands;
pub mod execution_tracker;
pub mod quick_action;
pub mod reference;
