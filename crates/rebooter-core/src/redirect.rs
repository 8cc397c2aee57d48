//! Loop guard and the redirect issued after a successful promotion.

use crate::request::RequestFacts;

/// Temporary redirect so neither browsers nor proxies cache the detour.
pub const REDIRECT_STATUS: u16 = 302;

/// True when this request is itself the product of one of our redirects.
pub fn has_loop_guard(facts: &RequestFacts, guard_key: &str) -> bool {
    facts.query_params.contains_key(guard_key)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectInstruction {
    pub location: String,
    pub status: u16,
}

impl RedirectInstruction {
    /// Redirect back to the same path with the loop-guard marker appended.
    pub fn for_request(facts: &RequestFacts, guard_key: &str) -> Self {
        Self {
            location: format!(
                "{}://{}{}?{}=true",
                facts.scheme, facts.host, facts.path, guard_key
            ),
            status: REDIRECT_STATUS,
        }
    }

    /// CGI response headers (RFC 3875 `Status` + `Location`).
    pub fn to_cgi_response(&self) -> String {
        format!(
            "Status: {} Found\r\nLocation: {}\r\nCache-Control: no-store\r\n\r\n",
            self.status, self.location
        )
    }
}
