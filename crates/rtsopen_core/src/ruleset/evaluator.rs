use rtsopen_data::{OperandSource, RowHandle, RulesetOpType, RulesetOperator};

use super::value::RulesetValue;
use crate::error::RulesetError;

pub const DEFAULT_MAX_DEPTH: usize = 16;

/// Looks up operators referenced by an inner handle.
pub trait RulesetRowProvider {
    fn try_resolve(&self, handle: &RowHandle) -> Option<RulesetOperator>;
}

impl<P: RulesetRowProvider + ?Sized> RulesetRowProvider for &P {
    fn try_resolve(&self, handle: &RowHandle) -> Option<RulesetOperator> {
        (**self).try_resolve(handle)
    }
}

/// Provider for rulesets that never nest.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoInnerRows;

impl RulesetRowProvider for NoInnerRows {
    fn try_resolve(&self, _handle: &RowHandle) -> Option<RulesetOperator> {
        None
    }
}

/// The three values operands can draw from.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EvalContext<T> {
    pub self_value: T,
    pub other_value: T,
    /// Used by `Static` operands that carry no fallback of their own.
    pub static_value: T,
}

impl<T> EvalContext<T> {
    pub const fn new(self_value: T, other_value: T, static_value: T) -> Self {
        Self {
            self_value,
            other_value,
            static_value,
        }
    }
}

/// Evaluates a flat ruleset with precedence tiers.
///
/// Every index lands in a tier by its operator (Pow 2, Mul/Div 1, Add/Sub 0).
/// Tiers run from 2 down to 0 and indices ascend within a tier. Each index
/// `i > 0` combines the operand of `ruleset[i - 1]` with its own, using its
/// own operator, and *overwrites* the result; the final value is whatever the
/// last combination produced, not a running fold.
///
/// An operand with an inner handle is replaced by the value of the one-element
/// ruleset holding the referenced row, evaluated in the same context. Such a
/// ruleset performs no combination, so the replacement is `T::default()`. The
/// handle must still resolve.
///
/// ```
/// use rtsopen_core::ruleset::{EvalContext, NoInnerRows, RulesetEvaluator};
/// use rtsopen_data::{OperandSource, RulesetOpType, RulesetOperator};
///
/// let ruleset = [
///     RulesetOperator::new(RulesetOpType::Add, OperandSource::SelfValue),
///     RulesetOperator::constant(RulesetOpType::Add, 3),
/// ];
/// let evaluator = RulesetEvaluator::new(&NoInnerRows);
/// let value = evaluator.evaluate(&ruleset, &EvalContext::new(2, 0, 0)).unwrap();
/// assert_eq!(value, 5);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RulesetEvaluator<'p, P: ?Sized> {
    provider: &'p P,
    max_depth: usize,
}

impl<'p, P: RulesetRowProvider + ?Sized> RulesetEvaluator<'p, P> {
    pub fn new(provider: &'p P) -> Self {
        Self {
            provider,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Evaluates `ruleset`.
    ///
    /// - an empty ruleset is an error
    /// - a single operator performs no combination and yields `T::default()`
    /// - a zero divisor is an error, for floats as well as integers
    pub fn evaluate<T: RulesetValue>(
        &self,
        ruleset: &[RulesetOperator],
        ctx: &EvalContext<T>,
    ) -> Result<T, RulesetError> {
        self.evaluate_at(ruleset, ctx, 0)
    }

    fn evaluate_at<T: RulesetValue>(
        &self,
        ruleset: &[RulesetOperator],
        ctx: &EvalContext<T>,
        depth: usize,
    ) -> Result<T, RulesetError> {
        if depth > self.max_depth {
            return Err(RulesetError::RecursionLimit {
                depth: self.max_depth,
            });
        }
        if ruleset.is_empty() {
            return Err(RulesetError::EmptyRuleset);
        }

        let mut tiers: [Vec<usize>; RulesetOpType::MAX_PRECEDENCE + 1] = Default::default();
        for (index, operator) in ruleset.iter().enumerate() {
            tiers[operator.op.precedence()].push(index);
        }

        let mut result = T::default();
        for tier in tiers.iter().rev() {
            // index 0 has no left neighbour to combine with
            for &index in tier.iter().filter(|&&i| i > 0) {
                let previous = &ruleset[index - 1];
                let current = &ruleset[index];
                let left = self.expand(previous, ctx, depth)?;
                // The exponent is the current operator's own operand, not its
                // inner expansion, so Pow never follows the handle.
                let right = match current.op {
                    RulesetOpType::Pow => resolve_direct(current, ctx),
                    _ => self.expand(current, ctx, depth)?,
                };

                result = match current.op {
                    RulesetOpType::Add => T::add(left, right),
                    RulesetOpType::Sub => T::sub(left, right),
                    RulesetOpType::Mul => T::mul(left, right),
                    RulesetOpType::Div => {
                        if right.is_zero() {
                            return Err(RulesetError::DivisionByZero { index });
                        }
                        T::div(left, right)
                    }
                    RulesetOpType::Pow => T::pow(left, right),
                };
                tracing::trace!(index, op = ?current.op, ?left, ?right, ?result, "ruleset step");
            }
        }
        Ok(result)
    }

    /// Value of one operand, following its inner handle if it has one.
    fn expand<T: RulesetValue>(
        &self,
        operator: &RulesetOperator,
        ctx: &EvalContext<T>,
        depth: usize,
    ) -> Result<T, RulesetError> {
        let Some(handle) = &operator.inner else {
            return Ok(resolve_direct(operator, ctx));
        };
        let row = self
            .provider
            .try_resolve(handle)
            .ok_or_else(|| RulesetError::UnresolvedRow(handle.to_string()))?;
        self.evaluate_at(std::slice::from_ref(&row), ctx, depth + 1)
    }
}

/// Value of an operand ignoring any inner handle.
#[must_use]
pub fn resolve_direct<T: RulesetValue>(operator: &RulesetOperator, ctx: &EvalContext<T>) -> T {
    match operator.source {
        OperandSource::SelfValue => ctx.self_value,
        OperandSource::OtherValue => ctx.other_value,
        OperandSource::Static => operator
            .static_fallback
            .map_or(ctx.static_value, T::from_fallback),
    }
}
