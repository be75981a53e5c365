//! Arithmetic rulesets: flat operator lists evaluated in precedence tiers, with
//! operands that may expand into other rows.

pub mod evaluator;
pub mod library;
pub mod table;
pub mod value;

pub use evaluator::{
    resolve_direct, EvalContext, NoInnerRows, RulesetEvaluator, RulesetRowProvider,
    DEFAULT_MAX_DEPTH,
};
pub use library::RulesetLibrary;
pub use table::RulesetTable;
pub use value::RulesetValue;
