/// Writing and reading the `.opt` pipeline options file
mod options;
pub use options::{keys, OptionsFile, PipelineOptions};

/// `[begin] [step] [end]` parameter triples
mod span;
pub use span::Span;

/// Enumerated analysis parameters
mod methods;
pub use methods::{DictInitMethod, ResamplingMethod, SparseCodingMethod, Stage};

/// Selecting which jobs of a sub-pipeline to run
mod jobs;
pub use jobs::JobFilter;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to read option {0} from the pipeline file")]
    MissingKey(&'static str),
    #[error("Option {0} appears more than once in the pipeline file")]
    DuplicateKey(String),
    #[error("Expected 3 values ([begin] [step] [end]), got {0}")]
    SpanLength(usize),
    #[error(transparent)]
    PathEncoding(#[from] util::PathEncodingError),
}
