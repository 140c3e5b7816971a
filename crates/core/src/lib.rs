//! PTT Admin Core - Shared types library.
//!
//! This crate provides the domain types used across the PTT admin console:
//! - `ptt-admin` - API client and headless view state
//! - `ptt-admin-cli` - Command-line front-end
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no HTTP clients.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Typed ids, channel and user records, request payloads, roles

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
