//! CLI shim between the boot-time part processor and the handler.
//!
//! The part processor invokes one subcommand per query or part: `list-types`
//! to learn the declared content types, `handle` once per delivered part
//! with the payload on stdin.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::PathBuf;

use cloudpart::config;
use cloudpart::content_type::ContentType;
use cloudpart::handler::{CloudConfHandler, PartHandler};
use cloudpart::part::Part;

/// Top-level CLI for the cloudpart part-handler.
#[derive(Debug, Parser)]
#[command(name = "cloudpart")]
#[command(about = "Boot-time part-handler for EC2 user-data MIME parts", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Print the accepted content types, one per line.
    ListTypes,

    /// Handle a single MIME part; the payload is read from stdin.
    Handle {
        /// Content type of the part, or a lifecycle marker (__begin__/__end__).
        content_type: String,

        /// Filename the part is materialized as.
        filename: String,

        /// Override the configured base directory.
        #[arg(long, value_name = "DIR")]
        base_dir: Option<PathBuf>,
    },
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::ListTypes => {
                let handler = CloudConfHandler::new(cfg.base_dir);
                for ct in handler.accepted_types() {
                    println!("{ct}");
                }
            }
            CliCommand::Handle {
                content_type,
                filename,
                base_dir,
            } => {
                let Some(ct) = ContentType::parse(&content_type) else {
                    bail!("unsupported content type: {content_type}");
                };

                let mut payload = Vec::new();
                std::io::stdin()
                    .read_to_end(&mut payload)
                    .context("failed to read payload from stdin")?;

                let handler = CloudConfHandler::new(base_dir.unwrap_or(cfg.base_dir));
                let part = Part::new(ct, filename, payload);
                handler
                    .handle(&part)
                    .with_context(|| format!("failed to handle {} part", part.content_type))?;
            }
        }

        Ok(())
    }
}
