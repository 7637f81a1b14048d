// Application layer: rendering, exports and the concrete pipeline.

pub mod export;
pub mod page;
pub mod pipelines;
