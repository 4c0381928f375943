//! VPL Kernel: record model, fingerprinting, and deterministic hashing
//! primitives shared by the tree evaluator and the labeler façade.
//!
//! # Module dependency direction
//!
//! `event` / `field_path` ← `canon` / `fingerprint` ← `jump_hash` /
//! `distributed_hash` ← `filter` ← `error`
//!
//! Everything here is a pure function or an immutable value type; nothing
//! in this crate performs I/O or carries mutable global state.

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod canon;
pub mod distributed_hash;
pub mod error;
pub mod event;
pub mod field_path;
pub mod filter;
pub mod fingerprint;
pub mod jump_hash;
