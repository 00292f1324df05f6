//! Resolve `ENC[handle]` secret placeholders inside YAML or JSON
//! configuration documents.
//!
//! The [`secrets`] module holds the engine; [`config`], [`cli`] and
//! [`logging`] back the `encsecret` binary.

pub mod cli;
pub mod config;
pub mod logging;
pub mod secrets;
