use crate::error::*;

use std::sync::*;
use std::sync::atomic::{AtomicBool, Ordering};

///
/// Shared flag used to stop a computation that has been superseded
///
/// Clones of a token share the same flag. Computations check the token between their stages, and stop with
/// `LineartError::Cancelled` once it has been set.
///
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    ///
    /// Creates a token that has not been cancelled
    ///
    pub fn new() -> CancelToken {
        CancelToken(Arc::new(AtomicBool::new(false)))
    }

    ///
    /// Requests that any computation using this token stops
    ///
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    ///
    /// Returns `LineartError::Cancelled` if this token has been cancelled
    ///
    #[inline]
    pub fn check(&self) -> Result<(), LineartError> {
        if self.is_cancelled() {
            Err(LineartError::Cancelled)
        } else {
            Ok(())
        }
    }
}
