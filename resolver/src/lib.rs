//! Method resolution and virtual dispatch enumeration (§2 component B).
//!
//! Resolution is a pure function of the app model: given the same [`app_model::Context`] and the
//! same symbolic reference, [`resolve::resolve_method`] and friends always return the same
//! [`result::ResolutionResult`]. Dispatch enumeration additionally depends on the enqueuer's
//! liveness state, so it is parameterized over the [`dispatch::InstantiatedSubtypeOracle`] and
//! [`dispatch::PinnedPredicate`] traits rather than depending on the `enqueuer` crate directly.

pub mod result;
pub mod resolve;
pub mod dispatch;
