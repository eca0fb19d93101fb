/// Tolerance based equality for coordinate values.
///
/// Overlay decisions (is this point on that segment, do these two turns coincide) are never made
/// with exact float equality, every comparison goes through an epsilon.
///
/// # Examples
///
/// ```
/// # use polygon_overlay::core::traits::*;
/// let x = 0.1 + 0.2;
/// assert_ne!(x, 0.3);
/// assert!(x.fuzzy_eq(0.3));
/// assert_eq!(1e-12f64.fuzzy_sign_eps(1e-9), 0);
/// assert_eq!((-0.5f64).fuzzy_sign_eps(1e-9), -1);
/// ```
pub trait FuzzyEq: Sized + Copy {
    /// Default epsilon used by [FuzzyEq::fuzzy_eq] and [FuzzyEq::fuzzy_eq_zero].
    fn fuzzy_epsilon() -> Self;

    /// `true` if `|self - other| < fuzzy_epsilon`.
    fn fuzzy_eq_eps(&self, other: Self, fuzzy_epsilon: Self) -> bool;

    /// `true` if `|self| < fuzzy_epsilon`.
    fn fuzzy_eq_zero_eps(&self, fuzzy_epsilon: Self) -> bool;

    /// Sign of the value with values within `fuzzy_epsilon` of zero mapped to 0.
    fn fuzzy_sign_eps(&self, fuzzy_epsilon: Self) -> i32;

    #[inline]
    fn fuzzy_eq(&self, other: Self) -> bool {
        self.fuzzy_eq_eps(other, Self::fuzzy_epsilon())
    }

    #[inline]
    fn fuzzy_eq_zero(&self) -> bool {
        self.fuzzy_eq_zero_eps(Self::fuzzy_epsilon())
    }
}

macro_rules! impl_fuzzy_eq {
    ($ty:ty, $eps:expr) => {
        impl FuzzyEq for $ty {
            #[inline]
            fn fuzzy_epsilon() -> Self {
                $eps
            }

            #[inline]
            fn fuzzy_eq_eps(&self, other: Self, fuzzy_epsilon: Self) -> bool {
                (*self - other).abs() < fuzzy_epsilon
            }

            #[inline]
            fn fuzzy_eq_zero_eps(&self, fuzzy_epsilon: Self) -> bool {
                self.abs() < fuzzy_epsilon
            }

            #[inline]
            fn fuzzy_sign_eps(&self, fuzzy_epsilon: Self) -> i32 {
                if *self >= fuzzy_epsilon {
                    1
                } else if *self <= -fuzzy_epsilon {
                    -1
                } else {
                    0
                }
            }
        }
    };
}

impl_fuzzy_eq!(f32, 1.0e-6);
impl_fuzzy_eq!(f64, 1.0e-9);
