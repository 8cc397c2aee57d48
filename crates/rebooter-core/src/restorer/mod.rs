//! The decide → promote → redirect pipeline.
//!
//! `handle_not_found` walks a linear state machine; the first step that
//! declines ends the request with `Outcome::NoAction` and the host's normal
//! 404 proceeds. Nothing here returns an error to the host.

use crate::config::RebooterConfig;
use crate::hook::NotFoundHook;
use crate::promote::{self, PromoteError};
use crate::redirect::{has_loop_guard, RedirectInstruction};
use crate::request::{extract_facts, FactsError, RequestFacts, ServerVars};
use crate::upload_path::{classify, PathSegments, RestoreTarget, ShapeError};
use anyhow::Result;
use thiserror::Error;

/// Why a request was left to the host's normal not-found handling.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Skip {
    #[error("request was not flagged as not found")]
    NotFoundSignalAbsent,
    #[error("request facts unavailable: {0}")]
    Facts(#[from] FactsError),
    #[error("request already carries the loop-guard marker")]
    LoopGuard,
    #[error("not an archived upload path: {0}")]
    Shape(#[from] ShapeError),
    #[error("promotion failed: {0}")]
    Promote(#[from] PromoteError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Redirect(RedirectInstruction),
    NoAction(Skip),
}

impl Outcome {
    pub fn redirect(&self) -> Option<&RedirectInstruction> {
        match self {
            Outcome::Redirect(r) => Some(r),
            Outcome::NoAction(_) => None,
        }
    }

    pub fn is_redirect(&self) -> bool {
        matches!(self, Outcome::Redirect(_))
    }
}

/// Restores archived uploads on demand. Build once at startup and hand to the host.
#[derive(Debug, Clone)]
pub struct Restorer {
    config: RebooterConfig,
}

impl Restorer {
    pub fn new(config: RebooterConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &RebooterConfig {
        &self.config
    }

    /// Runs the full pipeline for one request.
    pub fn handle_not_found(&self, is_not_found: bool, request: &ServerVars) -> Outcome {
        if !is_not_found {
            return Outcome::NoAction(Skip::NotFoundSignalAbsent);
        }
        match self.restore(request) {
            Ok(redirect) => {
                tracing::debug!(location = %redirect.location, "redirecting to restored upload");
                Outcome::Redirect(redirect)
            }
            Err(skip) => {
                tracing::debug!(reason = %skip, "leaving request to default not-found handling");
                Outcome::NoAction(skip)
            }
        }
    }

    /// Resolves where a request's file would come from and go to, without touching disk.
    pub fn plan(&self, request: &ServerVars) -> Result<RestoreTarget, Skip> {
        let facts = extract_facts(request)?;
        self.target_for(&facts)
    }

    fn restore(&self, request: &ServerVars) -> Result<RedirectInstruction, Skip> {
        let facts = extract_facts(request)?;
        let target = self.target_for(&facts)?;
        promote::promote(&target)?;
        Ok(RedirectInstruction::for_request(&facts, &self.config.guard_key))
    }

    fn target_for(&self, facts: &RequestFacts) -> Result<RestoreTarget, Skip> {
        if has_loop_guard(facts, &self.config.guard_key) {
            return Err(Skip::LoopGuard);
        }
        let segments = PathSegments::from_path(&facts.path);
        let upload = classify(
            &segments,
            &self.config.content_root_label,
            &self.config.uploads_label,
        )?;
        Ok(RestoreTarget::compute(
            &self.config.content_dir,
            &self.config.backup_folder,
            &upload,
        ))
    }
}

impl NotFoundHook for Restorer {
    fn on_not_found(&self, is_not_found: bool, request: &ServerVars) -> Outcome {
        self.handle_not_found(is_not_found, request)
    }
}
