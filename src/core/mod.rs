// src/core/mod.rs
//! Configuration, storage and filesystem services shared by the boundaries

pub mod config_manager;
pub mod database;
pub mod fs_ops;

pub use config_manager::{ConfigManager, ServiceConfig};
pub use database::{Database, SeenJobRepository};
pub use fs_ops::FsOps;
