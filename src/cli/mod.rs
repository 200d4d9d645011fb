//! CLI infrastructure for the sparse-agent controller
//!
//! This module provides the command-line interface for listing the action
//! catalog and for creating, inspecting and exporting learned tables.

pub mod commands;
pub mod output;
