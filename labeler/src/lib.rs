//! VPL Labeler: the façade tying a compiled [`vpl_model::node::ModelNode`]
//! to the public `build` / `label` / `label_batch` surface, plus the model
//! file I/O and the selector-cache scaffolding around it.

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod labeler;
pub mod model_io;
pub mod selector_cache;

pub use labeler::Labeler;
