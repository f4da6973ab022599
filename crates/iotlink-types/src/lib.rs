//! Shared types, adapter traits, configuration and error types for iotlink.
//!
//! The facade crate and every adapter depend on this crate only, so adapters
//! can be swapped (or faked in tests) without touching the facade.

#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod prelude;
pub mod push_sender;
pub mod store_adapter;
pub mod types;

// vim: ts=4
