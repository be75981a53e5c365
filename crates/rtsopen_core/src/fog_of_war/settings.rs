//! Fog-of-war mode settings sourced from one or more named tables.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::error::{FogError, Result};

/// One settings row. `mode` is the key the row is registered under, e.g.
/// `"fow.mode.classic"`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct FogOfWarSettings {
    pub mode: String,
}

/// A named table of settings rows.
///
/// ```toml
/// [rows.classic]
/// mode = "fow.mode.classic"
///
/// [rows.revealed]
/// mode = "fow.mode.revealed"
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct FogOfWarSettingsTable {
    #[serde(skip)]
    pub name: String,
    #[serde(default)]
    pub rows: BTreeMap<String, FogOfWarSettings>,
}

impl FogOfWarSettingsTable {
    pub fn from_toml_str(name: impl Into<String>, content: &str) -> Result<Self> {
        let mut table: Self = toml::from_str(content)?;
        table.name = name.into();
        Ok(table)
    }
}

/// Where a registered mode came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsHandle {
    pub table: String,
    pub row: String,
}

#[derive(Debug, Default)]
pub struct FogOfWarSettingsRegistry {
    entries: HashMap<String, (SettingsHandle, FogOfWarSettings)>,
    current: Option<SettingsHandle>,
}

impl FogOfWarSettingsRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers every row of every table by its mode.
    ///
    /// Rows without a mode, and modes already registered by an earlier table,
    /// are skipped and logged. Returns how many rows were registered.
    pub fn process_tables(&mut self, tables: &[FogOfWarSettingsTable]) -> usize {
        let mut registered = 0;
        for table in tables {
            for (row, settings) in &table.rows {
                if settings.mode.is_empty() {
                    tracing::error!(
                        table = %table.name,
                        row = %row,
                        "settings row has no mode, skipping entry"
                    );
                    continue;
                }
                if let Some((existing, _)) = self.entries.get(&settings.mode) {
                    tracing::error!(
                        table = %table.name,
                        row = %row,
                        mode = %settings.mode,
                        previous_table = %existing.table,
                        "mode already added by a previous table, skipping entry"
                    );
                    continue;
                }
                let handle = SettingsHandle {
                    table: table.name.clone(),
                    row: row.clone(),
                };
                self.entries
                    .insert(settings.mode.clone(), (handle, settings.clone()));
                registered += 1;
            }
        }
        registered
    }

    /// Makes `mode` the current settings.
    pub fn set_custom_mode(&mut self, mode: &str) -> std::result::Result<&FogOfWarSettings, FogError> {
        let Some((handle, settings)) = self.entries.get(mode) else {
            tracing::error!(mode = %mode, "trying to set a mode that was never registered");
            return Err(FogError::UnknownMode(mode.to_string()));
        };
        self.current = Some(handle.clone());
        Ok(settings)
    }

    #[must_use]
    pub fn current(&self) -> Option<&SettingsHandle> {
        self.current.as_ref()
    }

    #[must_use]
    pub fn get(&self, mode: &str) -> Option<&FogOfWarSettings> {
        self.entries.get(mode).map(|(_, settings)| settings)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
