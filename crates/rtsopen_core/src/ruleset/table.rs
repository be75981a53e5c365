use std::collections::HashMap;
use std::path::Path;

use rtsopen_data::{RowHandle, RulesetOperator};
use serde::{Deserialize, Serialize};

use super::evaluator::RulesetRowProvider;
use crate::error::{CoreError, Result};

/// Named operators that inner handles resolve against.
///
/// ```toml
/// [operators.double]
/// op = "mul"
/// source = "static"
/// static_fallback = 2
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct RulesetTable {
    #[serde(default)]
    pub operators: HashMap<String, RulesetOperator>,
}

impl RulesetTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| CoreError::from(e).with_context(format!("reading {}", path.display())))?;
        Self::from_toml_str(&content).map_err(|e| e.with_context(format!("parsing {}", path.display())))
    }

    /// Adds or replaces the row called `name`, returning the previous operator.
    pub fn insert(&mut self, name: impl Into<String>, operator: RulesetOperator) -> Option<RulesetOperator> {
        self.operators.insert(name.into(), operator)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&RulesetOperator> {
        self.operators.get(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.operators.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }
}

impl RulesetRowProvider for RulesetTable {
    fn try_resolve(&self, handle: &RowHandle) -> Option<RulesetOperator> {
        self.operators.get(handle.as_str()).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rtsopen_data::{OperandSource, RulesetOpType};

    #[test]
    fn test_resolve_from_toml() {
        let table = RulesetTable::from_toml_str(
            r#"
            [operators.double]
            op = "mul"
            source = "static"
            static_fallback = 2

            [operators.enemy]
            op = "add"
            source = "other"
            "#,
        )
        .unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(
            table.try_resolve(&RowHandle::from("double")),
            Some(RulesetOperator::constant(RulesetOpType::Mul, 2))
        );
        assert_eq!(
            table.try_resolve(&"enemy".into()),
            Some(RulesetOperator::new(RulesetOpType::Add, OperandSource::OtherValue))
        );
        assert_eq!(table.try_resolve(&"missing".into()), None);
    }

    #[test]
    fn test_unknown_op_is_rejected() {
        let err = RulesetTable::from_toml_str("[operators.x]\nop = \"mod\"\nsource = \"self\"\n");
        assert!(matches!(err, Err(CoreError::Config(_))));
    }

    #[test]
    fn test_load_missing_file_has_context() {
        let err = RulesetTable::load("/definitely/not/here.toml").unwrap_err();
        assert!(err.to_string().contains("reading /definitely/not/here.toml"));
    }
}
