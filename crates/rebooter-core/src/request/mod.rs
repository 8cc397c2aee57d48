//! Ambient request data and the facts extracted from it.
//!
//! The host hands us CGI-style meta-variables (the same names a web server
//! exports to an error-document script). Extraction turns them into a typed
//! `RequestFacts` or fails as a whole.

mod facts;
mod query;

pub use facts::{extract_facts, FactsError, RequestFacts, Scheme};
pub use query::parse_query;

use std::collections::BTreeMap;

pub const REQUEST_URI: &str = "REQUEST_URI";
pub const HTTP_HOST: &str = "HTTP_HOST";
pub const HTTPS: &str = "HTTPS";
pub const QUERY_STRING: &str = "QUERY_STRING";
/// Set by Apache/nginx to the original status when running an error document.
pub const REDIRECT_STATUS: &str = "REDIRECT_STATUS";

/// Read-only view of the server variables for one request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerVars {
    vars: BTreeMap<String, String>,
}

impl ServerVars {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the current process environment (CGI invocation).
    /// Variables that are not valid UTF-8 are skipped.
    pub fn from_env() -> Self {
        std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// True when the web server reports it is running this request as a 404 error document.
    pub fn reports_not_found(&self) -> bool {
        self.get(REDIRECT_STATUS).map(str::trim) == Some("404")
    }
}

impl FromIterator<(String, String)> for ServerVars {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            vars: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_and_lookup() {
        let vars = ServerVars::new()
            .with(REQUEST_URI, "/a")
            .with(HTTP_HOST, "example.com");
        assert_eq!(vars.get(REQUEST_URI), Some("/a"));
        assert_eq!(vars.get(HTTP_HOST), Some("example.com"));
        assert_eq!(vars.get(HTTPS), None);
    }

    #[test]
    fn redirect_status_signals_not_found() {
        assert!(ServerVars::new().with(REDIRECT_STATUS, "404").reports_not_found());
        assert!(!ServerVars::new().with(REDIRECT_STATUS, "500").reports_not_found());
        assert!(!ServerVars::new().reports_not_found());
    }
}
