//! Threshold classifier and category encoder

pub mod encoder;
pub mod masks;
pub mod result;
pub mod rules;

pub use encoder::encode;
pub use masks::ClassMasks;
pub use result::ClassificationResult;
pub use rules::{DecisionRules, PixelConditions, PixelInputs, WaterClass};
