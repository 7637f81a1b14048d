pub mod engine;
pub mod pipeline;

pub use crate::domain::model::{RawData, TransformResult};
pub use crate::domain::ports::{Pipeline, RatingSource, Storage};
pub use crate::utils::error::Result;
