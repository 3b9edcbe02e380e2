/// Epsilon-aware comparisons for floating point values.
pub trait FloatExt: Sized {
    /// `self == other`
    fn eq(self, other: Self) -> bool;

    /// `self != other`
    fn not_eq(self, other: Self) -> bool;
}

macro_rules! impl_float_ext {
    ( $( $ty:ty )* ) => {
        $(
            impl FloatExt for $ty {
                fn eq(self, other: Self) -> bool {
                    (self - other).abs() < <$ty>::EPSILON
                }

                fn not_eq(self, other: Self) -> bool {
                    (self - other).abs() >= <$ty>::EPSILON
                }
            }
        )*
    };
}

impl_float_ext!(f32 f64);

#[cfg(test)]
mod tests {
    use super::FloatExt;

    #[test]
    fn epsilon_comparisons() {
        assert!(FloatExt::eq(0.1 + 0.2, 0.3_f64));
        assert!(FloatExt::not_eq(0.1_f32, 0.2));
        assert!(!FloatExt::eq(1.0_f64, 1.0 + 1e-9));
    }
}
