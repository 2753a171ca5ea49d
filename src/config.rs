//! Command-line configuration.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "petfetch")]
#[command(about = "Fetch animal data from a URL or a local JSON file and pick favorites")]
pub struct Args {
    /// Base URL of the animal API
    #[arg(long, default_value = "https://example.com", conflicts_with = "file")]
    pub host: String,

    /// Resource under the host, also used as the favorites category
    #[arg(short, long, default_value = "dogs")]
    pub resource: String,

    /// Read animals from a local JSON file instead of the network
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Where favorites are stored
    #[arg(long, default_value = "favorites.json")]
    pub store: PathBuf,

    /// Write logs to this file (the TUI owns the terminal)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Fetch once, print the result and exit
    #[arg(short, long)]
    pub print: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceConfig {
    Remote { host: String, resource: String },
    File { path: PathBuf },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub source: SourceConfig,
    /// Label used in favorite keys, e.g. `dogs` in `favorite-dogs-1`.
    pub category: String,
    pub store_path: PathBuf,
    pub log_file: Option<PathBuf>,
    pub print: bool,
}

impl TryFrom<Args> for Config {
    type Error = anyhow::Error;

    fn try_from(args: Args) -> Result<Self> {
        let (source, category) = match args.file {
            Some(path) => {
                let category = path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .with_context(|| format!("cannot derive a category from {}", path.display()))?;
                (SourceConfig::File { path }, category)
            }
            None => {
                let resource = args.resource.trim_matches('/').to_string();
                anyhow::ensure!(!resource.is_empty(), "--resource must not be empty");
                (
                    SourceConfig::Remote {
                        host: args.host,
                        resource: resource.clone(),
                    },
                    resource,
                )
            }
        };

        Ok(Self {
            source,
            category,
            store_path: args.store,
            log_file: args.log_file,
            print: args.print,
        })
    }
}

impl Config {
    pub fn from_args() -> Result<Self> {
        Args::parse().try_into()
    }
}
