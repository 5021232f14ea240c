pub mod dataset;
pub mod decode;
pub mod workflow;
pub mod write;
