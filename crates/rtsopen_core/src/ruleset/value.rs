use std::fmt::Debug;

/// Numeric types a ruleset can be evaluated over.
///
/// Integer implementations wrap on overflow; `pow` goes through `f64` and
/// truncates back, so negative exponents on integers yield 0 or 1.
pub trait RulesetValue: Copy + Default + PartialEq + Debug {
    /// Converts an operator's static fallback into this type.
    fn from_fallback(value: i32) -> Self;

    fn add(self, rhs: Self) -> Self;
    fn sub(self, rhs: Self) -> Self;
    fn mul(self, rhs: Self) -> Self;
    /// Callers check [`RulesetValue::is_zero`] on `rhs` first.
    fn div(self, rhs: Self) -> Self;
    fn pow(self, exponent: Self) -> Self;

    fn is_zero(self) -> bool {
        self == Self::default()
    }
}

macro_rules! impl_ruleset_int {
    ($($t:ty),*) => {$(
        impl RulesetValue for $t {
            fn from_fallback(value: i32) -> Self {
                value as $t
            }
            fn add(self, rhs: Self) -> Self {
                self.wrapping_add(rhs)
            }
            fn sub(self, rhs: Self) -> Self {
                self.wrapping_sub(rhs)
            }
            fn mul(self, rhs: Self) -> Self {
                self.wrapping_mul(rhs)
            }
            fn div(self, rhs: Self) -> Self {
                self.wrapping_div(rhs)
            }
            fn pow(self, exponent: Self) -> Self {
                (self as f64).powf(exponent as f64) as $t
            }
        }
    )*};
}

macro_rules! impl_ruleset_float {
    ($($t:ty),*) => {$(
        impl RulesetValue for $t {
            fn from_fallback(value: i32) -> Self {
                value as $t
            }
            fn add(self, rhs: Self) -> Self {
                self + rhs
            }
            fn sub(self, rhs: Self) -> Self {
                self - rhs
            }
            fn mul(self, rhs: Self) -> Self {
                self * rhs
            }
            fn div(self, rhs: Self) -> Self {
                self / rhs
            }
            fn pow(self, exponent: Self) -> Self {
                self.powf(exponent)
            }
        }
    )*};
}

impl_ruleset_int!(i32, i64);
impl_ruleset_float!(f32, f64);
