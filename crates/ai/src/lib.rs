//! Umbrella crate that re-exports the `ai-*` building blocks.
//!
//! `enemy` is the hostile-agent decision core; `core`, `nav` and `tools` are the primitives it
//! is built on and are usable on their own.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

#[cfg(feature = "core")]
#[cfg_attr(docsrs, doc(cfg(feature = "core")))]
pub use ai_core as core;

#[cfg(feature = "tools")]
#[cfg_attr(docsrs, doc(cfg(feature = "tools")))]
pub use ai_tools as tools;

#[cfg(feature = "nav")]
#[cfg_attr(docsrs, doc(cfg(feature = "nav")))]
pub use ai_nav as nav;

#[cfg(feature = "enemy")]
#[cfg_attr(docsrs, doc(cfg(feature = "enemy")))]
pub use ai_enemy as enemy;
