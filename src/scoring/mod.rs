//! Multi-signal score combination and temporal decay
//!
//! `combine` merges similarity, recency, and graph signals into one score
//! per candidate; `decay` then adjusts by age and produces the
//! authoritative final ordering. Both stages are pure functions — a
//! failure here is a logic defect, not an operational condition.

pub mod combine;
pub mod decay;

pub use combine::{combine, CombineWeights};
pub use decay::{decay, decay_at};
