//! blockfall (workspace facade crate).
//!
//! Re-exports the rules engine, shared types and score store from their
//! crates under `crates/`, and adds the host-side pieces: env-driven
//! [`config::Settings`], the tokio [`driver`]s and the [`autoplay`] input
//! stand-in used by the headless binary.

pub use blockfall_core as core;
pub use blockfall_store as store;
pub use blockfall_types as types;

pub mod autoplay;
pub mod config;
pub mod driver;
