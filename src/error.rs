use thiserror::Error;

pub type YoloResult<T> = Result<T, YoloError>;

/// Errors raised at the target-builder and loss boundaries.
///
/// Everything here is a caller or configuration mistake detected before any
/// numeric work starts. Numeric edge cases (zero-area unions, log of tiny
/// probabilities) are absorbed locally with epsilons and never surface as
/// errors.
#[derive(Debug, Error)]
pub enum YoloError {
    #[error("anchor scales ({scales}) and aspect groups ({aspects}) differ in length")]
    AnchorSpecMismatch { scales: usize, aspects: usize },

    #[error("unknown anchor catalog `{0}`")]
    UnknownCatalog(String),

    #[error("strides ({strides}) and area bands ({bands}) differ in length")]
    BandSpecMismatch { strides: usize, bands: usize },

    #[error("multi-scale target generation needs at least one stride")]
    EmptyStrides,

    #[error("input size must be non-zero, got {0}x{1}")]
    EmptyInputSize(usize, usize),

    #[error("label batch is empty")]
    EmptyBatch,

    #[error("prediction shape {pred:?} does not match target shape {target:?}")]
    ShapeMismatch { pred: [usize; 3], target: [usize; 3] },

    #[error("{0} is not supported")]
    Unsupported(&'static str),
}
