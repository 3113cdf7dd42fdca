//! # rae-core
//!
//! Core types shared across all Raedificare crates:
//! - Entity structs for projects, documents, reports, templates and chat
//! - Status and ordering enums with their string forms
//! - Display-date helpers (`dd/mm/yyyy`) used by list sorting
//! - Cross-cutting error types

pub mod dates;
pub mod entities;
pub mod enums;
pub mod errors;
