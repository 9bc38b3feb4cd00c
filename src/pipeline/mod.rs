//! One track from inputs to upload-ready WebM.

pub mod executor;
pub mod inputs;
pub mod tools;

pub use executor::{ConvertReport, Converter};
pub use inputs::{classify_inputs, Inputs};
pub use tools::{FfmpegTools, MediaTools};
