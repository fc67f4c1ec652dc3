pub use range::Range;
pub use scale::Scalable;

mod range;
mod scale;
