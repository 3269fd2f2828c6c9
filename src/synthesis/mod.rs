//! Pipeline synthesis: stage merging and per-environment orchestration

pub mod merge;
pub mod module;
pub mod synthesizer;

pub use merge::{merge_fragment, merge_stage, MergeReport};
pub use module::Module;
pub use synthesizer::{PipelineSynthesizer, SynthesisOutcome, DEFAULT_WORKFLOWS_ROOT};
