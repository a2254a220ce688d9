//! Provider status vocabulary and the truth-status classification
//!
//! Providers report event state in dozens of inconsistent vocabularies.
//! `vocab` collapses a free-form token into a closed `RawStatus` set;
//! `truth` turns a `RawStatus` plus clock context into the trusted
//! life-cycle state served downstream.

pub mod truth;
pub mod vocab;

pub use truth::{compute_truth_status, TruthStatus};
pub use vocab::{map_provider_status, RawStatus};
