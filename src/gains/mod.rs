//! PID gain search driven by a fitted surrogate model.
//!
//! Maps a target aggressiveness index to longitudinal controller gains by
//! inverting a cubic polynomial fitted offline to simulation data:
//!
//! 1. [`SurrogateModel`] predicts the aggressiveness index produced by a
//!    (KP, KD) pair, with KI held at the value used during fitting.
//! 2. [`CandidateSampler`] draws KP values from a target-dependent normal
//!    distribution and solves the surrogate for KD at each draw, collecting
//!    in-range solutions into a [`CandidateSet`].
//! 3. [`GainSearch`] picks the candidate whose KP is closest to a set-point
//!    that shifts linearly with the normalized target index.
//!
//! The search is synchronous, CPU-bound and deterministic: the sampler seeds
//! its own generator per invocation, so an identical target always yields
//! identical gains. Bounds, coefficients and sampling parameters live in an
//! immutable [`GainSearchConfig`] injected at construction.

mod candidate;
mod config;
mod cubic;
mod sampler;
mod search;
mod surrogate;

pub use candidate::{CandidateSet, GainTriple};
pub use config::GainSearchConfig;
pub use cubic::real_roots;
pub use sampler::CandidateSampler;
pub use search::{GainSearch, GainSearchError};
pub use surrogate::SurrogateModel;
