//! Stable exit codes for lunar CLI commands.

/// Command succeeded; for `generate`, every locale was written.
pub const OK: i32 = 0;
/// Command failed before producing output (bad config, tables, templates or arguments).
pub const INVALID: i32 = 1;
/// `lunar generate` wrote some locales but at least one failed.
pub const PARTIAL: i32 = 2;
