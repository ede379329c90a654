use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::AppError;

/// Token for cooperative cancellation of a scan.
///
/// Clone is cheap and shares state. Once cancelled it stays cancelled.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self { cancelled: Arc::new(AtomicBool::new(false)) }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }
}

/// Returns a token tripped by Ctrl+C (and SIGTERM on Unix).
///
/// Can only be called once per process.
pub fn install_interrupt_handler() -> Result<CancellationToken, AppError> {
    let token = CancellationToken::new();
    let handler_token = token.clone();
    ctrlc::set_handler(move || {
        tracing::warn!("received interrupt, cancelling");
        handler_token.cancel();
    })
    .map_err(|err| AppError::config(format!("failed to install interrupt handler: {err}")))?;
    Ok(token)
}
