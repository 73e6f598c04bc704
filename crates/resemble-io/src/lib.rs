//! CSV input and JSON result output for the resemble pipeline.

mod domain;
mod error;
mod reader;
mod writer;

pub use domain::{Dataset, ExperimentName, SeriesId};
pub use error::IoError;
pub use reader::SeriesReader;
pub use writer::{ResultWriter, SearchRun};
