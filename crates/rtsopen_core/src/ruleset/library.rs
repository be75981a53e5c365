//! Tag-keyed ruleset registry.
//!
//! A rules file carries both the rulesets and the operator rows their inner
//! handles point at:
//!
//! ```toml
//! [operators.halve]
//! op = "div"
//! source = "static"
//! static_fallback = 2
//!
//! [[rulesets]]
//! tag = "damage.basic"
//! operations = [
//!     { op = "add", source = "self" },
//!     { op = "sub", source = "other", inner = "halve" },
//! ]
//! ```

use std::collections::HashMap;
use std::path::Path;

use rtsopen_data::{RulesetOperator, RulesetRow};
use serde::{Deserialize, Serialize};

use super::evaluator::{EvalContext, RulesetEvaluator};
use super::table::RulesetTable;
use super::value::RulesetValue;
use crate::error::{CoreError, Result, RulesetError};

#[derive(Serialize, Deserialize, Debug, Default)]
struct RulesFile {
    #[serde(default)]
    operators: HashMap<String, RulesetOperator>,
    #[serde(default)]
    rulesets: Vec<RulesetRow>,
}

#[derive(Debug, Clone, Default)]
pub struct RulesetLibrary {
    rows: HashMap<String, RulesetRow>,
    table: RulesetTable,
}

impl RulesetLibrary {
    #[must_use]
    pub fn new(table: RulesetTable) -> Self {
        Self {
            rows: HashMap::new(),
            table,
        }
    }

    /// Parses a rules file. Duplicate tags fail the whole file.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: RulesFile = toml::from_str(content)?;
        let mut library = Self::new(RulesetTable {
            operators: file.operators,
        });
        for row in file.rulesets {
            library.register(row)?;
        }
        tracing::debug!(
            rulesets = library.len(),
            operators = library.table.len(),
            "loaded ruleset library"
        );
        Ok(library)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        std::fs::read_to_string(path)
            .map_err(CoreError::from)
            .and_then(|content| Self::from_toml_str(&content))
            .map_err(|e| e.with_context(format!("loading {}", path.display())))
    }

    /// Adds `row` under its tag. A tag registered twice keeps the first row.
    pub fn register(&mut self, row: RulesetRow) -> std::result::Result<(), RulesetError> {
        if row.tag.is_empty() {
            tracing::error!("ruleset row has no tag, skipping entry");
            return Err(RulesetError::UnknownTag(row.tag));
        }
        if self.rows.contains_key(&row.tag) {
            tracing::error!(tag = %row.tag, "ruleset tag already registered, skipping entry");
            return Err(RulesetError::DuplicateTag(row.tag));
        }
        self.rows.insert(row.tag.clone(), row);
        Ok(())
    }

    #[must_use]
    pub fn get(&self, tag: &str) -> Option<&RulesetRow> {
        self.rows.get(tag)
    }

    /// Registered tags, sorted.
    #[must_use]
    pub fn tags(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.rows.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }

    #[must_use]
    pub fn table(&self) -> &RulesetTable {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut RulesetTable {
        &mut self.table
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Evaluates the ruleset registered under `tag`, resolving inner handles
    /// against this library's operator table.
    pub fn evaluate_tag<T: RulesetValue>(
        &self,
        tag: &str,
        ctx: &EvalContext<T>,
        max_depth: usize,
    ) -> std::result::Result<T, RulesetError> {
        let row = self
            .rows
            .get(tag)
            .ok_or_else(|| RulesetError::UnknownTag(tag.to_string()))?;
        RulesetEvaluator::new(&self.table)
            .with_max_depth(max_depth)
            .evaluate(&row.operations, ctx)
    }
}
