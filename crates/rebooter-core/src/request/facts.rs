//! Typed request facts derived from server variables.

use super::{parse_query, ServerVars, HTTPS, HTTP_HOST, QUERY_STRING, REQUEST_URI};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;
use url::Url;

/// Base used to resolve origin-form request targets like `/a/b?c`.
const PARSE_BASE: &str = "http://localhost/";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    Http,
    Https,
}

impl Scheme {
    pub fn as_str(self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized facts about the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestFacts {
    /// URL path without query string; dot segments resolved, still percent-encoded.
    pub path: String,
    pub host: String,
    pub scheme: Scheme,
    pub query_params: HashMap<String, String>,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FactsError {
    #[error("server variable {0} is missing")]
    Missing(&'static str),
    #[error("cannot parse request path from {0:?}")]
    Path(String),
    #[error("host is empty")]
    EmptyHost,
    #[error("host is malformed: {0:?}")]
    MalformedHost(String),
}

/// Extracts `RequestFacts` from the ambient server variables. All-or-nothing.
pub fn extract_facts(vars: &ServerVars) -> Result<RequestFacts, FactsError> {
    let request_uri = vars
        .get(REQUEST_URI)
        .ok_or(FactsError::Missing(REQUEST_URI))?;
    let host = vars.get(HTTP_HOST).ok_or(FactsError::Missing(HTTP_HOST))?;

    let base = Url::parse(PARSE_BASE).map_err(|_| FactsError::Path(request_uri.to_string()))?;
    let parsed = base
        .join(request_uri)
        .map_err(|_| FactsError::Path(request_uri.to_string()))?;

    let host = host.trim();
    if host.is_empty() {
        return Err(FactsError::EmptyHost);
    }
    if host
        .chars()
        .any(|c| c.is_whitespace() || c.is_control() || matches!(c, '/' | '?' | '#' | '@' | '\\'))
    {
        return Err(FactsError::MalformedHost(host.to_string()));
    }

    // Error-document hosts pass their own (often empty) QUERY_STRING while
    // REQUEST_URI keeps the original query, so both sources count.
    let mut query_params = parse_query(parsed.query().unwrap_or(""));
    if let Some(qs) = vars.get(QUERY_STRING) {
        query_params.extend(parse_query(qs));
    }

    Ok(RequestFacts {
        path: parsed.path().to_string(),
        host: host.to_string(),
        scheme: scheme_from(vars.get(HTTPS)),
        query_params,
    })
}

/// `HTTPS` is truthy when present, non-empty and not `off` (IIS sets `off` on plain HTTP).
fn scheme_from(https: Option<&str>) -> Scheme {
    match https.map(str::trim) {
        Some(v) if !v.is_empty() && !v.eq_ignore_ascii_case("off") => Scheme::Https,
        _ => Scheme::Http,
    }
}
