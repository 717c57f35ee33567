pub trait FloatExt {
    fn approximately_eq(self, other: Self) -> bool;

    /// Like `approximately_eq`, but two NaNs compare equal.
    fn approximately_eq_nan(self, other: Self) -> bool;
}

impl FloatExt for f32 {
    fn approximately_eq(self, other: Self) -> bool {
        (self - other).abs() < crate::EPSILON as f32
    }

    fn approximately_eq_nan(self, other: Self) -> bool {
        (self.is_nan() && other.is_nan()) || self.approximately_eq(other)
    }
}

impl FloatExt for f64 {
    fn approximately_eq(self, other: Self) -> bool {
        (self - other).abs() < crate::EPSILON
    }

    fn approximately_eq_nan(self, other: Self) -> bool {
        (self.is_nan() && other.is_nan()) || self.approximately_eq(other)
    }
}
