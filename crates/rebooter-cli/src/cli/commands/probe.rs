//! `rebooter probe` – dry run of classification and path computation.

use anyhow::Result;
use rebooter_core::promote::is_readable_file;
use rebooter_core::request::{ServerVars, HTTP_HOST, REQUEST_URI};
use rebooter_core::upload_path::RestoreTarget;
use rebooter_core::Restorer;
use serde::Serialize;

#[derive(Serialize)]
struct ProbeReport<'a> {
    #[serde(flatten)]
    target: &'a RestoreTarget,
    archived: bool,
    restored: bool,
}

pub fn run_probe(restorer: &Restorer, request_uri: &str, json: bool) -> Result<()> {
    let vars = ServerVars::new()
        .with(REQUEST_URI, request_uri)
        .with(HTTP_HOST, "localhost");
    let target = match restorer.plan(&vars) {
        Ok(t) => t,
        Err(skip) => {
            if json {
                println!("{}", serde_json::json!({ "skip": skip.to_string() }));
            } else {
                println!("not restorable: {skip}");
            }
            return Ok(());
        }
    };
    let report = ProbeReport {
        target: &target,
        archived: is_readable_file(&target.archive_path),
        restored: is_readable_file(&target.canonical_path),
    };
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("archive:   {} ({})", target.archive_path.display(), presence(report.archived));
        println!("canonical: {} ({})", target.canonical_path.display(), presence(report.restored));
        println!("directory: {}", target.canonical_dir.display());
    }
    Ok(())
}

fn presence(found: bool) -> &'static str {
    if found {
        "present"
    } else {
        "absent"
    }
}
