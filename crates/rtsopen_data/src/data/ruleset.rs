use serde::{Deserialize, Serialize};
use std::fmt;

/// Arithmetic operation applied between an operator and its left neighbour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RulesetOpType {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl RulesetOpType {
    pub const MAX_PRECEDENCE: usize = 2;

    /// Add/Sub bind loosest (0), Mul/Div next (1), Pow tightest (2).
    #[must_use]
    pub const fn precedence(self) -> usize {
        match self {
            RulesetOpType::Add | RulesetOpType::Sub => 0,
            RulesetOpType::Mul | RulesetOpType::Div => 1,
            RulesetOpType::Pow => 2,
        }
    }
}

/// Where an operator takes its operand value from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperandSource {
    #[serde(rename = "self")]
    SelfValue,
    #[serde(rename = "other")]
    OtherValue,
    #[serde(rename = "static")]
    Static,
}

/// Name of a row in a ruleset table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowHandle(pub String);

impl RowHandle {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RowHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RowHandle {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

/// One entry of a ruleset.
///
/// `inner` names another row whose value replaces this operand, which groups
/// it the way parentheses would.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RulesetOperator {
    pub op: RulesetOpType,
    pub source: OperandSource,
    /// Value used when `source` is `Static`.
    #[serde(default)]
    pub static_fallback: Option<i32>,
    #[serde(default)]
    pub inner: Option<RowHandle>,
}

impl RulesetOperator {
    #[must_use]
    pub const fn new(op: RulesetOpType, source: OperandSource) -> Self {
        Self {
            op,
            source,
            static_fallback: None,
            inner: None,
        }
    }

    /// Static operand carrying its own value.
    #[must_use]
    pub const fn constant(op: RulesetOpType, value: i32) -> Self {
        Self {
            op,
            source: OperandSource::Static,
            static_fallback: Some(value),
            inner: None,
        }
    }

    #[must_use]
    pub fn with_fallback(mut self, value: i32) -> Self {
        self.static_fallback = Some(value);
        self
    }

    #[must_use]
    pub fn with_inner(mut self, handle: impl Into<RowHandle>) -> Self {
        self.inner = Some(handle.into());
        self
    }
}

/// A named, ordered list of operators, e.g. `progression.ruleset.dnd`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RulesetRow {
    pub tag: String,
    pub operations: Vec<RulesetOperator>,
}
