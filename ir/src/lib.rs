//! SSA intermediate representation: basic blocks, instructions, values and phis, and the
//! dominator-tree machinery the rewriter's passes need.
//!
//! This crate knows nothing about reachability or keep rules; it's a pure data structure plus
//! the structural queries (`successors`, `dominates`, the use registry) that the rest of the
//! system is built on.

pub mod ty;
pub mod value;
pub mod block;
pub mod body;
pub mod uses;
