//! CLI for sfetch.

mod commands;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use sfetch_core::config::{self, SfetchConfig};
use sfetch_core::fetch::FetchOptions;
use sfetch_core::source::{FileType, Source};
use std::path::PathBuf;

use commands::{run_fetch, run_middle, run_parse};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "sfetch")]
#[command(about = "Fetch predicted structure models from AlphaFold DB and ESM Atlas", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Fetch AlphaFold DB models (codes may be accessions, model file names or URLs).
    Af {
        #[command(flatten)]
        fetch: FetchArgs,

        /// Skip fetching and saving the UniProt entry text.
        #[arg(long)]
        no_uniprot: bool,
    },

    /// Fetch ESM Atlas models by MGnify identifier.
    Esm {
        #[command(flatten)]
        fetch: FetchArgs,
    },

    /// Print the accession extracted from each token.
    Parse {
        /// Accessions, file names or URLs.
        #[arg(required = true)]
        tokens: Vec<String>,
    },

    /// Print the middle `-`/`/`-delimited segment of a token.
    Middle {
        token: String,
    },
}

/// Options shared by `af` and `esm`.
#[derive(Debug, Clone, Args)]
pub struct FetchArgs {
    /// Codes to fetch.
    #[arg(required = true)]
    pub codes: Vec<String>,

    /// Object name (default: the code).
    #[arg(long)]
    pub name: Option<String>,

    /// File type: pdb or cif (default from config).
    #[arg(long = "type", value_name = "TYPE")]
    pub file_type: Option<FileType>,

    /// Directory to save downloads to (default from config, else current directory).
    #[arg(long)]
    pub path: Option<PathBuf>,

    /// Load every code as a state of the named object.
    #[arg(long, conflicts_with = "no_discrete")]
    pub discrete: bool,

    /// Load every code as its own object, even with --name.
    #[arg(long)]
    pub no_discrete: bool,

    /// Only print errors.
    #[arg(short, long)]
    pub quiet: bool,

    /// Print the batch report as JSON.
    #[arg(long)]
    pub json: bool,
}

impl FetchArgs {
    /// `None` when neither flag was given.
    pub fn discrete(&self) -> Option<bool> {
        match (self.discrete, self.no_discrete) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }

    pub fn to_options(&self, source: Source, cfg: &SfetchConfig) -> FetchOptions {
        let mut opts = FetchOptions::from_config(source, cfg);
        if let Some(t) = self.file_type {
            opts.file_type = t;
        }
        if let Some(p) = &self.path {
            opts.path = p.clone();
        }
        opts.name = self.name.clone();
        opts.discrete = self.discrete();
        opts
    }
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        match cli.command {
            CliCommand::Af { fetch, no_uniprot } => {
                let cfg = load_config()?;
                let mut opts = fetch.to_options(Source::AlphaFold, &cfg);
                if no_uniprot {
                    opts.uniprot_base = None;
                }
                run_fetch(&cfg, &fetch, opts).await?;
            }
            CliCommand::Esm { fetch } => {
                let cfg = load_config()?;
                let opts = fetch.to_options(Source::EsmAtlas, &cfg);
                run_fetch(&cfg, &fetch, opts).await?;
            }
            CliCommand::Parse { tokens } => run_parse(&tokens),
            CliCommand::Middle { token } => run_middle(&token),
        }

        Ok(())
    }
}

fn load_config() -> Result<SfetchConfig> {
    let cfg = config::load_or_init()?;
    tracing::debug!("loaded config: {:?}", cfg);
    Ok(cfg)
}

#[cfg(test)]
mod tests;
