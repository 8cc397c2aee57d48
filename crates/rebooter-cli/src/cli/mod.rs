//! CLI for Uploads Rebooter.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use rebooter_core::config::{self, RebooterConfig};
use rebooter_core::Restorer;
use std::path::PathBuf;

use commands::{run_cgi, run_config, run_probe, run_restore};

/// Top-level CLI for Uploads Rebooter.
#[derive(Debug, Parser)]
#[command(name = "rebooter")]
#[command(about = "Restore archived uploads the first time they are requested", long_about = None)]
pub struct Cli {
    /// Read configuration from this TOML file instead of the XDG config.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override the content directory (the folder holding `uploads/`).
    #[arg(long, global = true, value_name = "DIR")]
    pub content_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Act as a CGI 404 handler: read the request from the environment, answer on stdout.
    Cgi {
        /// Treat the request as not found even without REDIRECT_STATUS=404.
        #[arg(long)]
        assume_not_found: bool,
    },

    /// Restore the file behind one request URI and print the redirect.
    Restore {
        /// Request target, e.g. /wp-content/uploads/2019/04/photo.jpg
        request_uri: String,
        /// Host header to build the redirect with.
        #[arg(long, default_value = "localhost")]
        host: String,
        /// Redirect with https.
        #[arg(long)]
        https: bool,
    },

    /// Show where a request URI would be restored from and to, without moving anything.
    Probe {
        /// Request target, e.g. /wp-content/uploads/2019/04/photo.jpg
        request_uri: String,
        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Print the config file location and the effective configuration.
    Config,
}

impl Cli {
    /// Effective configuration: explicit file or XDG config, then command-line overrides.
    fn load_config(&self) -> Result<RebooterConfig> {
        let mut cfg = match &self.config {
            Some(path) => config::load_from(path)?,
            None => config::load_or_init()?,
        };
        self.apply_overrides(&mut cfg);
        tracing::debug!("loaded config: {:?}", cfg);
        Ok(cfg)
    }

    /// Restorer for the CGI path: reads existing config only, never creates files.
    fn cgi_restorer(&self) -> Result<Restorer> {
        let mut cfg = config::load_existing(self.config.as_deref())?;
        self.apply_overrides(&mut cfg);
        Restorer::new(cfg)
    }

    fn apply_overrides(&self, cfg: &mut RebooterConfig) {
        if let Some(dir) = &self.content_dir {
            cfg.content_dir = dir.clone();
        }
    }
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        match &cli.command {
            CliCommand::Cgi { assume_not_found } => run_cgi(cli.cgi_restorer(), *assume_not_found)?,
            CliCommand::Config => run_config(cli.config.as_deref(), &cli.load_config()?)?,
            CliCommand::Restore {
                request_uri,
                host,
                https,
            } => {
                let restorer = Restorer::new(cli.load_config()?)?;
                run_restore(&restorer, request_uri, host, *https)?;
            }
            CliCommand::Probe { request_uri, json } => {
                let restorer = Restorer::new(cli.load_config()?)?;
                run_probe(&restorer, request_uri, *json)?;
            }
        }

        Ok(())
    }
}
