//! CLI command handlers. Each command is in its own file.

mod cgi;
mod config;
mod probe;
mod restore;

pub use cgi::run_cgi;
pub use config::run_config;
pub use probe::run_probe;
pub use restore::run_restore;

#[cfg(test)]
pub(crate) use cgi::{cgi_response, cgi_response_or_not_found};
