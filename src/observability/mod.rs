//! Observability infrastructure for crash reports.
//!
//! ## Usage
//!
//! ```ignore
//! use unitycheck::observability::{
//!     install_panic_hook, set_current_file, set_phase, ValidationPhase,
//! };
//!
//! install_panic_hook();
//! for file in candidates {
//!     let _file = set_current_file(&file);
//!     let _phase = set_phase(ValidationPhase::Decompress);
//!     // If a panic occurs here, the crash report shows phase and file
//! }
//! ```

pub mod context;
pub mod panic_hook;

pub use context::{
    get_current_context, get_progress, increment_processed, reset_context, set_current_file,
    set_phase, set_progress, ContextGuard, ValidationContext, ValidationPhase,
};
pub use panic_hook::install_panic_hook;
