//! `AppInfoWithLiveness`: the immutable snapshot the enqueuer hands back once the fixed point is
//! reached (§6's output side), plus the optional `KeptGraph` consumer over the call edges observed
//! while tracing.

use indexmap::IndexSet;
use app_model::interning::{FieldId, MethodId, TypeId};
use keep_model::KeepInfoCollection;
use resolver::result::ResolutionFailure;

/// A symbolic reference traced from a live method's body that failed to resolve, recorded rather
/// than silently dropped — tracing treats a resolution failure as unreachability evidence, not an
/// internal error, but it must still be reportable to a caller that wants to know about it (a
/// missing classpath entry, a reference the shrinker's input classpath doesn't actually satisfy).
#[derive(Debug, Clone, PartialEq)]
pub struct MissingReference {
	pub caller: MethodId,
	pub failure: ResolutionFailure,
}

/// The caller/callee edges recorded while tracing live methods' bodies. Purely diagnostic — no
/// other component in this workspace reads it — useful for explaining *why* something is live.
#[derive(Debug, Clone, Default)]
pub struct KeptGraph {
	edges: Vec<(MethodId, MethodId)>,
}

impl KeptGraph {
	pub(crate) fn record(&mut self, caller: MethodId, callee: MethodId) {
		self.edges.push((caller, callee));
	}

	pub fn edges(&self) -> &[(MethodId, MethodId)] {
		&self.edges
	}

	pub fn callees_of(&self, caller: MethodId) -> impl Iterator<Item = MethodId> + '_ {
		self.edges.iter().filter(move |(c, _)| *c == caller).map(|(_, callee)| *callee)
	}
}

/// The result of running the enqueuer to a fixed point: every class/method/field that is reachable,
/// every class that is (or may be) instantiated, the final keep info for each, and the call graph
/// that justified it. Immutable: the rewriter and output writer only ever read from this.
#[derive(Debug)]
pub struct AppInfoWithLiveness {
	pub(crate) live_classes: IndexSet<TypeId>,
	pub(crate) live_methods: IndexSet<MethodId>,
	pub(crate) live_fields: IndexSet<FieldId>,
	pub(crate) instantiated_classes: IndexSet<TypeId>,
	pub(crate) keep_info: KeepInfoCollection,
	pub(crate) graph: KeptGraph,
	pub(crate) missing: Vec<MissingReference>,
}

impl AppInfoWithLiveness {
	pub fn is_class_live(&self, ty: TypeId) -> bool {
		self.live_classes.contains(&ty)
	}

	pub fn is_method_live(&self, id: MethodId) -> bool {
		self.live_methods.contains(&id)
	}

	pub fn is_field_live(&self, id: FieldId) -> bool {
		self.live_fields.contains(&id)
	}

	pub fn is_instantiated(&self, ty: TypeId) -> bool {
		self.instantiated_classes.contains(&ty)
	}

	pub fn live_classes(&self) -> impl Iterator<Item = TypeId> + '_ {
		self.live_classes.iter().copied()
	}

	pub fn live_methods(&self) -> impl Iterator<Item = MethodId> + '_ {
		self.live_methods.iter().copied()
	}

	pub fn live_fields(&self) -> impl Iterator<Item = FieldId> + '_ {
		self.live_fields.iter().copied()
	}

	pub fn instantiated_classes(&self) -> impl Iterator<Item = TypeId> + '_ {
		self.instantiated_classes.iter().copied()
	}

	pub fn keep_info(&self) -> &KeepInfoCollection {
		&self.keep_info
	}

	pub fn graph(&self) -> &KeptGraph {
		&self.graph
	}

	/// Every symbolic reference traced from a live method that failed to resolve.
	pub fn missing(&self) -> &[MissingReference] {
		&self.missing
	}
}
