//! `rebooter restore` – run the not-found hook for one request by hand.

use anyhow::Result;
use rebooter_core::request::{ServerVars, HTTPS, HTTP_HOST, REQUEST_URI};
use rebooter_core::{Outcome, Restorer};

pub fn run_restore(restorer: &Restorer, request_uri: &str, host: &str, https: bool) -> Result<()> {
    let mut vars = ServerVars::new()
        .with(REQUEST_URI, request_uri)
        .with(HTTP_HOST, host);
    if https {
        vars.insert(HTTPS, "on");
    }
    match restorer.handle_not_found(true, &vars) {
        Outcome::Redirect(r) => println!("{} {}", r.status, r.location),
        Outcome::NoAction(skip) => println!("no action: {skip}"),
    }
    Ok(())
}
