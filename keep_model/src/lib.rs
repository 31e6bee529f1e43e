//! The root set, keep-info lattice, and conditional-rule bookkeeping (§2 component F).

pub mod keep_info;
pub mod options;
pub mod root;

use indexmap::IndexMap;
use app_model::interning::{FieldId, MethodId, TypeId};
use crate::keep_info::KeepInfo;
use crate::root::Target;

/// The keep-info accumulated so far, per entity. Owned by the enqueuer; entities not present here
/// have never been referenced by a keep rule and get the library default (verbatim/fully pinned)
/// or the fully-permissive default for a program entity nothing has touched yet.
///
/// §4.E's conditional keep rules ("if antecedent becomes live/instantiated, keep consequents") are
/// resolved by [`crate::root::KeepConfiguration::consequents_for`] before a join ever reaches this
/// collection: the enqueuer only calls [`Self::apply`] once the antecedent event it's conditioned
/// on has already fired, so every join here is unconditional by construction. An earlier revision
/// of this collection deferred joins behind an explicit precondition tag drained on each fixed-point
/// round; it was removed as dead weight once every call site turned out to resolve its precondition
/// up front.
#[derive(Debug, Default)]
pub struct KeepInfoCollection {
	classes: IndexMap<TypeId, KeepInfo>,
	methods: IndexMap<MethodId, KeepInfo>,
	fields: IndexMap<FieldId, KeepInfo>,
}

impl KeepInfoCollection {
	pub fn new() -> KeepInfoCollection {
		KeepInfoCollection::default()
	}

	/// Joins `info` into `target`'s keep info.
	pub fn apply(&mut self, target: Target, info: KeepInfo) {
		let slot = match target {
			Target::Class(t) => self.classes.entry(t).or_default(),
			Target::Method(m) => self.methods.entry(m).or_default(),
			Target::Field(f) => self.fields.entry(f).or_default(),
		};
		slot.join(info);
	}

	pub fn class_info(&self, ty: TypeId) -> KeepInfo {
		self.classes.get(&ty).copied().unwrap_or_default()
	}

	pub fn method_info(&self, id: MethodId) -> KeepInfo {
		self.methods.get(&id).copied().unwrap_or_default()
	}

	pub fn field_info(&self, id: FieldId) -> KeepInfo {
		self.fields.get(&id).copied().unwrap_or_default()
	}
}
