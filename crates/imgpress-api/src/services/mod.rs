pub mod convert;

pub use convert::{BatchConverter, BatchOutcome, BatchParams, UploadedFile};
