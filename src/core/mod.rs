//! Core module - storage, domain model and configuration

pub mod config;
pub mod manager;
pub mod project;
pub mod store;

pub use config::{Config, ConfigError};
pub use manager::{ProjectManager, WorktreeError, WorktreeManager};
pub use project::{Project, ProjectConfig, ProjectError};
pub use store::{Store, StoreError, StoreResult};
