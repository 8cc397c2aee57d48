//! `rebooter cgi` – 404 handler for web servers that run CGI error documents.
//!
//! Apache: `ErrorDocument 404 /cgi-bin/rebooter-404` with a wrapper that execs
//! `rebooter cgi`. The server exports `REDIRECT_STATUS=404` and the original
//! `REQUEST_URI`, which is all the restorer needs.
//!
//! Every path through here answers on stdout; a setup failure is a plain 404.

use anyhow::{Context, Result};
use rebooter_core::request::ServerVars;
use rebooter_core::{NotFoundHook, Outcome, Restorer};
use std::io::{self, Write};

const NOT_FOUND_RESPONSE: &str =
    "Status: 404 Not Found\r\nContent-Type: text/plain; charset=utf-8\r\n\r\nNot Found\n";

pub fn run_cgi(restorer: Result<Restorer>, assume_not_found: bool) -> Result<()> {
    let vars = ServerVars::from_env();
    let response = cgi_response_or_not_found(&restorer, &vars, assume_not_found);
    let mut out = io::stdout().lock();
    out.write_all(response.as_bytes())
        .and_then(|()| out.flush())
        .context("write CGI response")?;
    Ok(())
}

/// Like `cgi_response`, but a restorer that failed to start yields the 404.
pub(crate) fn cgi_response_or_not_found(
    restorer: &Result<Restorer>,
    vars: &ServerVars,
    assume_not_found: bool,
) -> String {
    match restorer {
        Ok(r) => cgi_response(r, vars, assume_not_found),
        Err(e) => {
            tracing::error!("restorer unavailable, answering 404: {e:#}");
            NOT_FOUND_RESPONSE.to_string()
        }
    }
}

/// The full CGI response for one request.
pub(crate) fn cgi_response(
    hook: &dyn NotFoundHook,
    vars: &ServerVars,
    assume_not_found: bool,
) -> String {
    let is_not_found = assume_not_found || vars.reports_not_found();
    match hook.on_not_found(is_not_found, vars) {
        Outcome::Redirect(redirect) => redirect.to_cgi_response(),
        Outcome::NoAction(_) => NOT_FOUND_RESPONSE.to_string(),
    }
}
