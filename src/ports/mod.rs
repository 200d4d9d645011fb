//! Ports (trait boundaries) for external dependencies.
//!
//! This module defines the interfaces between the decision engine and its
//! surroundings. Following hexagonal architecture, these traits are owned by
//! the domain and implemented by adapters.

pub mod environment;
pub mod observer;
pub mod repository;

pub use environment::Environment;
pub use observer::ControllerObserver;
pub use repository::{DEFAULT_TABLE_FILE, TableRepository};
