//! Filesystem utilities for assistkit.
//!
//! Every generated artifact and the project configuration are written through
//! [`atomic_write_file`], and regeneration starts by removing the previous
//! output set with [`clear_generated`].

pub mod atomic;
mod clear;

pub use atomic::atomic_write_file;
pub use clear::clear_generated;
