/// Trait for mapping a value from one scale to another.
pub trait Scalable {
    /// Map a value from one scale to another.
    /// This is equivalent to Arduino map() method:
    /// https://www.arduino.cc/reference/en/language/functions/math/map/
    ///
    /// # Parameters
    /// * `self`:  the value to map
    /// * `from_low`:  the low end of the originating range
    /// * `from_high`:  the high end of the originating range
    /// * `to_low`:  the low end of the target range
    /// * `to_high`:  the high end of the target range
    ///
    /// # Returns
    /// The mapped value.
    fn scale(self, from_low: Self, from_high: Self, to_low: Self, to_high: Self) -> Self;
}

macro_rules! impl_from_scalable {
    ($($variant:ty),*) => {
        $(
            impl Scalable for $variant {
                fn scale(self, from_low: Self, from_high: Self, to_low: Self, to_high: Self) -> Self {
                    ((self as f64 - from_low as f64) * (to_high as f64 - to_low as f64)
                        / (from_high as f64 - from_low as f64)
                        + to_low as f64) as Self
                }
            }
        )*
    };
}

impl_from_scalable!(u16, u32, f64);
