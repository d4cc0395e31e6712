//! Structured file persistence for the task collection.
//!
//! # Responsibility
//! - Convert task snapshots to and from the XML task file.
//! - Keep file-format details out of the repository and service layers.
//!
//! # Invariants
//! - Store functions never touch the repository; callers swap results in.
//! - A save followed by a load reproduces every field and the order.

pub mod xml_store;
