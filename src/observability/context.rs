//! Thread-local context tracking for crash reports.
//!
//! Records which validation phase is running and which candidate is being
//! processed, so the panic hook can say where a crash happened. The batch is
//! single-threaded; the thread-local keeps tests running in parallel from
//! seeing each other's context.

use std::cell::RefCell;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

static FILES_PROCESSED: AtomicUsize = AtomicUsize::new(0);
static FILES_TOTAL: AtomicUsize = AtomicUsize::new(0);

thread_local! {
    static CURRENT_CONTEXT: RefCell<ValidationContext> =
        const { RefCell::new(ValidationContext::new()) };
}

/// Snapshot of what the validator was doing.
#[derive(Debug, Clone, Default)]
pub struct ValidationContext {
    pub phase: Option<ValidationPhase>,
    pub current_file: Option<PathBuf>,
}

impl ValidationContext {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            phase: None,
            current_file: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationPhase {
    /// Walking the root for candidates
    Discovery,
    Decompress,
    ContainerProbe,
    Unpack,
    SignatureCheck,
    Cleanup,
    Quarantine,
    Reporting,
}

impl std::fmt::Display for ValidationPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Discovery => write!(f, "discovery"),
            Self::Decompress => write!(f, "decompress"),
            Self::ContainerProbe => write!(f, "container_probe"),
            Self::Unpack => write!(f, "unpack"),
            Self::SignatureCheck => write!(f, "signature_check"),
            Self::Cleanup => write!(f, "cleanup"),
            Self::Quarantine => write!(f, "quarantine"),
            Self::Reporting => write!(f, "reporting"),
        }
    }
}

/// Restores the previous context on drop.
pub struct ContextGuard {
    previous: ValidationContext,
}

impl Drop for ContextGuard {
    fn drop(&mut self) {
        CURRENT_CONTEXT.with(|ctx| {
            *ctx.borrow_mut() = self.previous.clone();
        });
    }
}

/// Set the current phase until the returned guard drops.
#[must_use]
pub fn set_phase(phase: ValidationPhase) -> ContextGuard {
    CURRENT_CONTEXT.with(|ctx| {
        let previous = ctx.borrow().clone();
        ctx.borrow_mut().phase = Some(phase);
        ContextGuard { previous }
    })
}

/// Set the candidate being processed until the returned guard drops.
#[must_use]
pub fn set_current_file(path: impl Into<PathBuf>) -> ContextGuard {
    CURRENT_CONTEXT.with(|ctx| {
        let previous = ctx.borrow().clone();
        ctx.borrow_mut().current_file = Some(path.into());
        ContextGuard { previous }
    })
}

pub fn set_progress(processed: usize, total: usize) {
    FILES_PROCESSED.store(processed, Ordering::Relaxed);
    FILES_TOTAL.store(total, Ordering::Relaxed);
}

pub fn increment_processed() {
    FILES_PROCESSED.fetch_add(1, Ordering::Relaxed);
}

#[must_use]
pub fn get_current_context() -> ValidationContext {
    CURRENT_CONTEXT.with(|ctx| ctx.borrow().clone())
}

/// (processed, total)
#[must_use]
pub fn get_progress() -> (usize, usize) {
    (
        FILES_PROCESSED.load(Ordering::Relaxed),
        FILES_TOTAL.load(Ordering::Relaxed),
    )
}

pub fn reset_context() {
    CURRENT_CONTEXT.with(|ctx| {
        *ctx.borrow_mut() = ValidationContext::new();
    });
}
