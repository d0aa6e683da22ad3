//! Symptom-to-condition classification.
//!
//! A binary-vector pattern classifier is trained and scored on a labelled
//! symptom corpus, and a keyword scorer answers live queries. Results are
//! stored through a [`registry::ModelRegistry`].

/// Application directory helpers.
pub mod app_dirs;
/// TOML configuration.
pub mod config;
/// Training corpus, vocabulary and feature encoding.
pub mod dataset;
/// Symptom normalization and keyword scoring.
pub mod labeling;
/// Tracing subscriber setup.
pub mod logging;
/// Pattern classifier, metrics and evaluation.
pub mod ml;
/// Model, prediction and frequency storage.
pub mod registry;
/// Train/evaluate and predict operations.
pub mod service;
