pub mod config;
pub mod handler;
pub mod model;
pub mod notifier;
pub mod resolution;
pub mod scheduler;
