//! # GYAAN Common Library
//!
//! Shared code for the GYAAN learning platform services including:
//! - Database models and repositories
//! - Event types (PlatformEvent enum)
//! - Identifier parsing (role and section resolution)
//! - Progression math (leveling, rage meter, time bonus)
//! - Concept catalog
//! - Configuration loading

pub mod auth;
pub mod concepts;
pub mod config;
pub mod db;
pub mod error;
pub mod events;
pub mod identity;
pub mod progression;
pub mod sse;

pub use error::{Error, Result};
pub use identity::Role;
