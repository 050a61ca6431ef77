//! Request handlers

pub mod agents;
pub mod analytics;
pub mod catalog;
pub mod health;
pub mod logs;
