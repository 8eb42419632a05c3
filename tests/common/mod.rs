//! Common test utilities for Marginalia CLI tests.
//!
//! This module provides:
//! - `TestEnv`: isolated home, vault and working directory plus helpers to
//!   run the `marginalia` binary
//! - `BooksDb`: Apple Books shaped SQLite fixtures built with rusqlite

#![allow(dead_code)]

pub mod env;
pub mod fixtures;

pub use env::*;
pub use fixtures::*;
