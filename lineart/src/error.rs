use thiserror::Error;

///
/// Errors that can stop a feature line computation
///
/// Degenerate geometry is never an error: it is skipped and counted in the `Diagnostics` for the computation.
///
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LineartError {
    /// A buffer for the computation could not be allocated
    #[error("could not allocate memory for {what}")]
    OutOfMemory { what: &'static str },

    /// The screen space index could not be built for the projected triangles
    #[error("could not build the spatial index: {0}")]
    InvalidSpatialIndex(String),

    /// The computation was cancelled by a newer request before it could finish
    #[error("the computation was cancelled")]
    Cancelled,

    /// The settings cannot be used for a computation
    #[error("invalid settings: {0}")]
    InvalidSettings(String),
}

///
/// Reserves space for `additional` more items in a vector, reporting a failure as `LineartError::OutOfMemory`
///
#[inline]
pub (crate) fn try_reserve<T>(vec: &mut Vec<T>, additional: usize, what: &'static str) -> Result<(), LineartError> {
    vec.try_reserve(additional)
        .map_err(|_| LineartError::OutOfMemory { what })
}
