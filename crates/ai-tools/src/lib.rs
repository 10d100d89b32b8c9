//! Tooling primitives for agent AI: decision tracing.
//!
//! Engine-agnostic and lightweight. Rendering of traces belongs in adapter crates.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod trace;

pub use trace::{NullTraceSink, TraceEvent, TraceLog, TraceSink, VecTraceSink};
