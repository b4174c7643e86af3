//! Natural-language movie-recommendation queries over a symbolic knowledge base.
//!
//! Questions are parsed into [`models::Intent`]s (language model first,
//! fixed question templates as fallback), mapped to knowledge base queries,
//! and the engine's loosely-typed output is flattened back into plain values
//! and [`models::MovieRecord`]s with explanations.

pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod middleware;
pub mod models;
pub mod services;
