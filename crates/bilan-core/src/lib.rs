//! bilan-core — Diagnostic scoring engine.
//!
//! This crate defines the data model and the deterministic scoring
//! pipeline: per-domain scores, program coverage, prerequisite assessment,
//! composite indices, trust evaluation, priority extraction and retrieval
//! queries. The whole engine is a pure function of its inputs.

pub mod aggregate;
pub mod coverage;
pub mod domain;
pub mod engine;
pub mod error;
pub mod export;
pub mod model;
pub mod parser;
pub mod prerequisites;
pub mod priorities;
pub mod quality;
pub mod rag;
pub mod results;
