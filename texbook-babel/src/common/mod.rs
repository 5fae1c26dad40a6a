//! Scanning and protection helpers shared by the ingestion passes and the renderers.

pub mod scan;
pub mod stash;

pub use scan::{braced_group, find_command, find_commands, rewrite_commands, CommandMatch};
pub use stash::Stash;
