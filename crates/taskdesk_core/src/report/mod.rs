//! Human-readable task reports.
//!
//! # Responsibility
//! - Render the task collection as a static HTML document.
//!
//! # Invariants
//! - Rendering reads a snapshot and never mutates the repository.

pub mod html;
