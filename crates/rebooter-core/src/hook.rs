//! The seam a host registers against its "not found" extension point.

use crate::request::ServerVars;
use crate::restorer::Outcome;

/// Secondary handler invoked after the host failed to resolve a request.
pub trait NotFoundHook {
    fn on_not_found(&self, is_not_found: bool, request: &ServerVars) -> Outcome;
}
