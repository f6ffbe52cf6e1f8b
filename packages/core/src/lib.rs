//! MangoScan diagnosis pipeline
//!
//! Turns the per-class scores of one inference call into a user-facing verdict:
//! - `scores`: softmax normalization and top-K ranking
//! - `strategy`: trained classifier or deterministic color heuristic, chosen at startup
//! - `canonical`: disease name aliases
//! - `gate`: minimum-confidence check
//! - `practices`: field advice per disease
//! - `diagnosis`: the orchestrator producing a [`Diagnosis`]

pub mod canonical;
pub mod diagnosis;
pub mod gate;
pub mod practices;
pub mod scores;
pub mod strategy;

pub use canonical::{CanonicalName, Disease, canonicalize};
pub use diagnosis::{Diagnoser, Diagnosis};
pub use gate::{GateOutcome, Threshold, gate};
pub use practices::practices_for;
pub use scores::{RankedCandidate, ScoreDistribution, normalize};
pub use strategy::{Inference, InferenceStrategy, select_strategy};

pub use mangoscan_types;
