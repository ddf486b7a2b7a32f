//! I/O helpers: project layout, configuration, locale tables, templates, output.

pub mod config;
pub mod init;
pub mod locale;
pub mod output;
pub mod templates;
