//! Core types for the PTT admin console.
//!
//! This module provides type-safe wrappers for the records the console manages.

pub mod channel;
pub mod entity;
pub mod id;
pub mod name;
pub mod role;
pub mod user;

pub use channel::{Channel, ChannelPayload};
pub use entity::Entity;
pub use id::*;
pub use name::{NameError, RequiredName};
pub use role::UserRole;
pub use user::{User, UserPayload};
