pub mod errors;
pub mod pipeline;

pub use errors::WordpackError;
pub use pipeline::{
    run_import,
    ImportReport,
    ImportRequest,
};
