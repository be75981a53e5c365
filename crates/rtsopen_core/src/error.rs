//! Error types for rtsopen_core.
//!
//! Each subsystem has its own enum; [`CoreError`] wraps them for callers that
//! only want one error type.

use thiserror::Error;

/// Errors raised by a visibility map or the tracker that owns them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FogError {
    /// The map has no backing buffer yet (or it was released).
    #[error("fog of war map used before initialization")]
    NotInitialized,

    /// No settings row registered for the requested mode.
    #[error("unknown fog of war mode: {0}")]
    UnknownMode(String),

    /// The raster byte count for this footprint does not fit in `usize`.
    #[error("fog of war raster of {width}x{height} texels is too large")]
    RasterTooLarge { width: u32, height: u32 },
}

/// Errors raised while evaluating or registering rulesets.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RulesetError {
    #[error("ruleset has no operators")]
    EmptyRuleset,

    /// The right operand of a division at `index` evaluated to zero.
    #[error("division by zero at operator {index}")]
    DivisionByZero { index: usize },

    /// An inner handle named a row the provider does not know.
    #[error("unresolved ruleset row: {0}")]
    UnresolvedRow(String),

    #[error("inner ruleset nesting exceeded depth {depth}")]
    RecursionLimit { depth: usize },

    #[error("ruleset tag already registered: {0}")]
    DuplicateTag(String),

    #[error("unknown ruleset tag: {0}")]
    UnknownTag(String),
}

/// Main error type for rtsopen_core operations.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Cell sizes must be positive and finite.
    #[error("invalid cell size: {0}")]
    InvalidCellSize(f64),

    #[error("config parse error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("config serialize error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error("file system error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Fog(#[from] FogError),

    #[error(transparent)]
    Ruleset(#[from] RulesetError),

    #[error("validation error: {0}")]
    Validation(String),

    /// Generic error with context
    #[error("{context}: {source}")]
    Context {
        context: String,
        source: Box<CoreError>,
    },
}

/// Result type alias for rtsopen_core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

impl CoreError {
    /// Creates a new validation error.
    #[must_use]
    pub fn validation<S: Into<String>>(msg: S) -> Self {
        Self::Validation(msg.into())
    }

    /// Wraps an error with additional context.
    #[must_use]
    pub fn with_context<S: Into<String>>(self, context: S) -> Self {
        Self::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }
}
