//! # Command Handlers
//!
//! This module contains the command handlers for the shelfctl CLI application.
//!
//! ## Structure
//!
//! - `resource` - list/get/create/update/delete for any collection
//! - `errors` - user-facing error extraction via the handled crate
//! - `shared` - shared validation, parsing and dispatch utilities

pub mod errors;
pub mod resource;
pub mod shared;

pub use resource::handle_resource_command;
