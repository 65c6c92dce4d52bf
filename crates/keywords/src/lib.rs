//! # relkit-keywords: reserved-keyword model scanning
//!
//! Downstream analytics tools restrict which column names they accept, and
//! renaming a field on a live model is a long, risky operation. This crate
//! keeps new conflicts out of the application instead: it checks every
//! concrete model's columns, as described by exported model manifests,
//! against per-system reserved keyword lists, with a reviewed override list
//! for the conflicts already lived with.

pub mod checker;
pub mod config;
pub mod error;
pub mod model;
pub mod report;

// Re-export core types
pub use checker::{blocking_violations, check_manifests, check_model, Violation};
pub use config::{CheckerConfig, KeywordLists, OverrideLists};
pub use error::{KeywordError, KeywordResult};
pub use model::{load_manifests, FieldSpec, ModelManifest, ModelSpec};
pub use report::write_report;
