//! File I/O, validation, and serialization for the bitforest pipeline.

mod domain;
mod error;
mod reader;
mod writer;

pub use domain::{DatasetStem, LabeledDataset, UnlabeledDataset};
pub use error::IoError;
pub use reader::{BinaryCsvReader, LABEL_COLUMN};
pub use writer::{ResultWriter, write_predictions};
