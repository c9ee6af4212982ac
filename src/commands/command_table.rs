//! Loads the sound command table: a JSON array of
//! `{ "commands": [...], "fileName": "..." }` records, flattened into an
//! alias → sound id map that is never modified after startup.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info};

use crate::config::ConfigError;

/// One record of the commands file
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CommandEntry {
    pub commands: Vec<String>,
    pub file_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandTable {
    sounds: HashMap<String, String>,
}

impl CommandTable {
    /// Load the table from a file on disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let table = Self::from_reader(BufReader::new(file))?;
        info!("Loaded {} sound commands from {:?}", table.len(), path);
        debug!("Sound commands: {}", table.aliases().join(", "));
        Ok(table)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let entries: Vec<CommandEntry> =
            serde_json::from_str(json).map_err(ConfigError::Malformed)?;
        Self::from_entries(entries)
    }

    pub fn from_reader(reader: impl Read) -> Result<Self, ConfigError> {
        let entries: Vec<CommandEntry> =
            serde_json::from_reader(reader).map_err(ConfigError::Malformed)?;
        Self::from_entries(entries)
    }

    /// Flatten decoded records into the table. Aliases must be unique across
    /// all records; the first collision aborts the whole load.
    pub fn from_entries(entries: impl IntoIterator<Item = CommandEntry>) -> Result<Self, ConfigError> {
        let mut sounds: HashMap<String, String> = HashMap::new();

        for entry in entries {
            if entry.file_name.is_empty() {
                return Err(ConfigError::InvalidEntry {
                    file_name: entry.file_name,
                    reason: "fileName is empty".to_string(),
                });
            }
            if entry.commands.is_empty() {
                return Err(ConfigError::InvalidEntry {
                    file_name: entry.file_name,
                    reason: "no commands listed".to_string(),
                });
            }

            for alias in entry.commands {
                if alias.is_empty() {
                    return Err(ConfigError::InvalidEntry {
                        file_name: entry.file_name,
                        reason: "empty command name".to_string(),
                    });
                }

                match sounds.entry(alias) {
                    Entry::Occupied(existing) => {
                        return Err(ConfigError::DuplicateAlias {
                            alias: existing.key().clone(),
                            first: existing.get().clone(),
                            second: entry.file_name,
                        });
                    }
                    Entry::Vacant(slot) => {
                        debug!("Registered command '{}' -> {}", slot.key(), entry.file_name);
                        slot.insert(entry.file_name.clone());
                    }
                }
            }
        }

        Ok(Self { sounds })
    }

    /// Get the sound id for a command alias
    pub fn lookup(&self, alias: &str) -> Option<&str> {
        self.sounds.get(alias).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.sounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sounds.is_empty()
    }

    /// All aliases, sorted
    pub fn aliases(&self) -> Vec<&str> {
        let mut aliases: Vec<&str> = self.sounds.keys().map(String::as_str).collect();
        aliases.sort_unstable();
        aliases
    }
}
