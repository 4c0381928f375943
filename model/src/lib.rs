//! VPL Model: the compiled decision tree — updaters, the tree node kinds,
//! and the two on-disk representations (single-root, node-list) that
//! assemble and serialize between them.
//!
//! # Module dependency direction
//!
//! `selector` / `matcher` ← `update_matrix` / `sparse_update_matrix` /
//! `conditional_merge` / `conditional_assignment` / `geometric_shredder` /
//! `multiplicity` ← `updater` ← `node` ← `assembly`

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod assembly;
pub mod conditional_assignment;
pub mod conditional_merge;
pub mod geometric_shredder;
pub mod matcher;
pub mod multiplicity;
pub mod node;
pub mod selector;
pub mod sparse_update_matrix;
pub mod update_matrix;
pub mod updater;
