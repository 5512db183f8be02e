//! ascii-preview library crate.
//!
//! Frames flow `source` -> `producer` -> `handoff` -> `renderer`, with the
//! `ascii` module turning each frame into glyphs. This module exposes the
//! components for the binary and for integration testing.

pub mod ascii;
pub mod cli;
pub mod config;
pub mod handoff;
pub mod input;
pub mod logging;
pub mod producer;
pub mod renderer;
pub mod schedule;
pub mod shutdown;
pub mod source;
pub mod terminal;
