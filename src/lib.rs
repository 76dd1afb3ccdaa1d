//! BrainWave - study-buddy matching and study-spot recommendation service
//!
//! The core of the crate is the compatibility [`Ranker`]: a pure function
//! from a requesting student and a list of candidates to candidates ordered
//! best-first. Around it sit a document-backed profile store, study-match
//! requests, and an LLM-backed study-spot recommender served over HTTP.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{rank, Ranker, distance::{haversine_distance, Coordinates}};
pub use models::{UserProfile, ScoredCandidate, ScoringWeights, ScoreBreakdown};
