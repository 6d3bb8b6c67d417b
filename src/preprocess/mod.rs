//! Feature preprocessing: one-hot encoding and standardization.
//!
//! A [`Preprocessor`] is fitted once on the training partition and then only
//! applied, never refitted. Unknown categorical labels are handled according to
//! its [`UnknownPolicy`].

mod encoder;
mod pipeline;
mod scaler;

pub use encoder::{CategoryBlock, OneHotEncoder, TransformError, UnknownPolicy};
pub use pipeline::{EmptyFitError, Preprocessor};
pub use scaler::StandardScaler;
