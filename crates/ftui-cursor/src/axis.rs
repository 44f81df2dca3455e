#![forbid(unsafe_code)]

//! Axis normalization for movement arguments.
//!
//! Movement magnitudes arrive as loosely-typed numbers. Each is normalized to
//! an integer before encoding: missing, NaN and infinite values become `1`,
//! everything else is floored (so `-3.7` becomes `-4`, not `-3`).

use smallvec::SmallVec;

/// Normalize one movement argument.
///
/// Finite values beyond the `i64` range saturate at `i64::MIN`/`i64::MAX`
/// rather than being written out digit for digit.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn to_axis(value: Option<f64>) -> i64 {
    match value {
        Some(v) if v.is_finite() => v.floor() as i64,
        _ => 1,
    }
}

/// Argument list for a movement.
///
/// Empty means "no arguments": the sequence is emitted with the terminal's
/// default magnitude. Built from `()`, a single number, a pair, or a slice.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Axes(SmallVec<[Option<f64>; 2]>);

impl Axes {
    /// No arguments.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Append one raw argument. `None` stands for a missing value.
    #[must_use]
    pub fn with(mut self, value: Option<f64>) -> Self {
        self.0.push(value);
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// The normalized integer arguments.
    #[must_use]
    pub fn normalized(&self) -> SmallVec<[i64; 2]> {
        self.0.iter().copied().map(to_axis).collect()
    }
}

impl From<()> for Axes {
    fn from((): ()) -> Self {
        Self::none()
    }
}

macro_rules! axes_from_number {
    ($($t:ty),* $(,)?) => {
        $(
            impl From<$t> for Axes {
                fn from(n: $t) -> Self {
                    Self::none().with(Some(f64::from(n)))
                }
            }

            impl From<($t, $t)> for Axes {
                fn from((a, b): ($t, $t)) -> Self {
                    Self::none().with(Some(f64::from(a))).with(Some(f64::from(b)))
                }
            }

            impl From<&[$t]> for Axes {
                fn from(values: &[$t]) -> Self {
                    Self(values.iter().map(|&v| Some(f64::from(v))).collect())
                }
            }
        )*
    };
}

axes_from_number!(u8, u16, u32, i8, i16, i32, f32, f64);

impl From<Option<f64>> for Axes {
    fn from(value: Option<f64>) -> Self {
        Self::none().with(value)
    }
}

impl From<&[Option<f64>]> for Axes {
    fn from(values: &[Option<f64>]) -> Self {
        Self(values.iter().copied().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_and_non_finite_become_one() {
        assert_eq!(to_axis(None), 1);
        assert_eq!(to_axis(Some(f64::NAN)), 1);
        assert_eq!(to_axis(Some(f64::INFINITY)), 1);
        assert_eq!(to_axis(Some(f64::NEG_INFINITY)), 1);
    }

    #[test]
    fn finite_values_floor() {
        assert_eq!(to_axis(Some(3.7)), 3);
        assert_eq!(to_axis(Some(-3.7)), -4);
        assert_eq!(to_axis(Some(0.0)), 0);
        assert_eq!(to_axis(Some(-0.5)), -1);
        assert_eq!(to_axis(Some(12.0)), 12);
    }

    #[test]
    fn out_of_range_values_saturate() {
        assert_eq!(to_axis(Some(1.0e300)), i64::MAX);
        assert_eq!(to_axis(Some(-1.0e300)), i64::MIN);
        assert_eq!(to_axis(Some(f64::MAX)), i64::MAX);
    }

    #[test]
    fn conversions() {
        assert!(Axes::from(()).is_empty());
        assert_eq!(Axes::from(5u16).normalized().as_slice(), &[5]);
        assert_eq!(Axes::from((2.9, -1.1)).normalized().as_slice(), &[2, -2]);
        let raw: &[Option<f64>] = &[None, Some(f64::NAN), Some(4.0)];
        assert_eq!(Axes::from(raw).normalized().as_slice(), &[1, 1, 4]);
        assert_eq!(Axes::from(&[1i32, 2, 3][..]).len(), 3);
    }
}
