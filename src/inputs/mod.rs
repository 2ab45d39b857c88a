//! Input model: clamped business metrics, improvement goals and call metadata

mod data;
mod field;

pub use data::{Inputs, CallMetadata, MAX_COUNT};
pub use field::InputField;
