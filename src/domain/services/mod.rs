//! Domain Services
//!
//! Pure business logic services that operate on domain entities.
//! These services have no I/O dependencies and are easily testable.

mod classifier;
mod entry_synthesizer;
pub mod resolution_override;

pub use classifier::{Classification, ClassificationReason, ClassifyError, ModuleClassifier};
pub use entry_synthesizer::{EntrySynthesizer, SynthesizeError, Synthesis};
pub use resolution_override::{layer_conditions, ResolutionOverride};
