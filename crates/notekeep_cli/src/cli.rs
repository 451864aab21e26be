//! Command-line surface.

use clap::{Parser, Subcommand};
use notekeep_core::config::ENV_LOG_LEVEL;
use notekeep_core::{ConfigError, NotekeepConfig, StorageBackend};
use std::path::PathBuf;

/// Log level used for stderr logging when nothing else is configured.
const QUIET_STDERR_LEVEL: &str = "warn";

#[derive(Parser, Debug)]
#[command(author, version, about = "Keep notes in a local durable slot", long_about = None)]
pub struct Cli {
    /// Storage backend (file or sqlite)
    #[arg(long, global = true)]
    pub backend: Option<StorageBackend>,

    /// Slot directory (file backend) or database file (sqlite backend)
    #[arg(long, global = true)]
    pub data_path: Option<PathBuf>,

    /// Name of the slot holding the notes
    #[arg(long, global = true)]
    pub slot: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Absolute directory for rotated log files; stderr when unset
    #[arg(long, global = true)]
    pub log_dir: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Create a note
    Add {
        #[arg(short, long, default_value = "")]
        title: String,
        #[arg(short, long, default_value = "")]
        content: String,
    },
    /// Change the title and/or content of a note
    Edit {
        id: String,
        #[arg(short, long)]
        title: Option<String>,
        #[arg(short, long)]
        content: Option<String>,
    },
    /// List notes, optionally filtered by title
    List {
        #[arg(short, long, default_value = "")]
        search: String,
    },
    /// Show one note
    View { id: String },
    /// Print exactly the content of a note, for piping to a clipboard tool
    Copy { id: String },
    /// Delete one note
    Delete { id: String },
    /// Delete every note and the stored slot
    Reset,
}

impl Cli {
    /// Environment configuration with command-line flags layered on top.
    pub fn resolve_config(&self) -> Result<NotekeepConfig, ConfigError> {
        self.resolve_config_with(|key| std::env::var(key).ok())
    }

    /// Same as `resolve_config`, reading variables through `lookup`.
    pub fn resolve_config_with(
        &self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<NotekeepConfig, ConfigError> {
        let mut config = NotekeepConfig::from_lookup(&lookup)?;
        if let Some(backend) = self.backend {
            config = config.with_backend(backend);
        }
        if let Some(path) = &self.data_path {
            config = config.with_data_path(path.clone());
        }
        if let Some(slot) = &self.slot {
            config = config.with_slot(slot.as_str())?;
        }
        if let Some(dir) = &self.log_dir {
            config = config.with_log_dir(dir)?;
        }
        // Blank env values count as unset, matching `from_lookup`.
        let env_level_set = lookup(ENV_LOG_LEVEL).is_some_and(|value| !value.trim().is_empty());
        match &self.log_level {
            Some(level) => config = config.with_log_level(level)?,
            None if config.log_dir.is_none() && !env_level_set => {
                config = config.with_log_level(QUIET_STDERR_LEVEL)?;
            }
            None => {}
        }
        Ok(config)
    }
}
