//! Value types read alongside layout-decoded account data.
//!
//! - [`ScaledRational`] - an exact `raw / divisor` number with divisor rebasing
//! - [`FreshValue`] - a value stamped with its capture time and slot

mod error;
mod fresh_value;
mod scaled_rational;

pub use error::ValueError;
pub use fresh_value::FreshValue;
pub use scaled_rational::ScaledRational;
