// src/cancel.rs
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::{CancelReason, ScaffoldError};

/// Shared flag flipped by the interrupt handler and polled before every
/// prompt and every step.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
  cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn cancel(&self) {
    self.cancelled.store(true, Ordering::SeqCst);
  }

  pub fn is_cancelled(&self) -> bool {
    self.cancelled.load(Ordering::SeqCst)
  }

  pub fn check(&self) -> Result<(), ScaffoldError> {
    if self.is_cancelled() {
      Err(ScaffoldError::Cancelled(CancelReason::Interrupted))
    } else {
      Ok(())
    }
  }
}
