pub mod detector;
pub mod probe;
pub mod results;
pub mod service;

pub use crate::domain::model::{CheckOutcome, DetectionResult, ResultRow};
pub use crate::domain::ports::{GeneratorFactory, TextGenerator};
pub use crate::utils::error::Result;
