//! Support code for the `texbook` binary.
//!
//! The binary itself lives in `main.rs`; the inspection views are kept here so they can be
//! unit tested and reused.

pub mod views;
