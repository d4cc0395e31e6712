//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository, store and report calls into use-case APIs.
//! - Keep the shell decoupled from file formats.

pub mod task_service;
