//! Common utilities for the Marmot pipeline.
//!
//! This crate provides shared infrastructure used by all pipeline stages:
//! - **Warning System** - colored, deduplicated terminal output for input the
//!   parsers tolerate but do not understand

pub mod warning;
