//! CLI commands.

pub(crate) mod config;
pub(crate) mod count;
pub(crate) mod fetch;
pub(crate) mod record;
