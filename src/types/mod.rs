//! Scalar types with their own text form.

mod duration;

pub use duration::Duration;
