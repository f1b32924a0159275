//! Tetolab Core — dividend price-ceiling valuation and screening.
//!
//! This crate contains the heart of the screener:
//! - Domain types (dividend events, valuation params/results, ranked rows)
//! - Ceiling valuation with the trailing calendar window
//! - Screener that runs the valuation over a universe and ranks by gap
//! - Quote provider trait, the Yahoo Finance client, and its circuit breaker
//! - Universe configuration (TOML segment → ticker lists)
//!
//! Everything here is synchronous and stateless between runs; the only
//! I/O lives behind [`data::QuoteProvider`].

pub mod data;
pub mod domain;
pub mod engine;
