//! The root set and conditional keep rules: the `KeepConfiguration` external interface (§6).
//!
//! Parsing a textual keep-rule file into this shape is explicitly out of scope (§1's Non-goals
//! list "configuration-file parsing" among the external collaborators); this module is the
//! already-parsed shape the core consumes.

use app_model::interning::{FieldId, MethodId, TypeId};
use crate::keep_info::KeepInfo;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Target {
	Class(TypeId),
	Method(MethodId),
	Field(FieldId),
}

/// One root-set entry: keep `target` with at most the permissions in `min_keep_info` (joined
/// against whatever else ends up keeping it), optionally also forcing the class instantiated
/// (e.g. an entry-point class constructed reflectively by the platform at startup).
#[derive(Debug, Clone)]
pub struct KeepRule {
	pub target: Target,
	pub min_keep_info: KeepInfo,
	pub also_instantiate: bool,
}

impl KeepRule {
	pub fn keep(target: Target) -> KeepRule {
		KeepRule { target, min_keep_info: KeepInfo::fully_pinned(), also_instantiate: false }
	}
}

/// A rule of the form "if `antecedent` matches (becomes live/instantiated) then keep
/// `consequents`", indexed by its antecedent class, per §4.E "Conditional keep rules".
#[derive(Debug, Clone)]
pub struct ConditionalRule {
	pub antecedent: TypeId,
	pub consequents: Vec<KeepRule>,
}

/// The parsed keep configuration: the unconditional root set plus the conditional rules,
/// canonically grouped by antecedent so the enqueuer doesn't rescan the whole rule set on every
/// growth of the live/instantiated collections.
#[derive(Debug, Clone, Default)]
pub struct KeepConfiguration {
	pub unconditional: Vec<KeepRule>,
	conditional_by_antecedent: indexmap::IndexMap<TypeId, Vec<KeepRule>>,
}

impl KeepConfiguration {
	pub fn new() -> KeepConfiguration {
		KeepConfiguration::default()
	}

	pub fn add_unconditional(&mut self, rule: KeepRule) {
		self.unconditional.push(rule);
	}

	pub fn add_conditional(&mut self, rule: ConditionalRule) {
		self.conditional_by_antecedent.entry(rule.antecedent).or_default().extend(rule.consequents);
	}

	/// Consequents whose antecedent is exactly `antecedent`; called by the enqueuer whenever
	/// `antecedent` newly becomes live/instantiated.
	pub fn consequents_for(&self, antecedent: TypeId) -> &[KeepRule] {
		self.conditional_by_antecedent.get(&antecedent).map(Vec::as_slice).unwrap_or(&[])
	}

	pub fn antecedents(&self) -> impl Iterator<Item = TypeId> + '_ {
		self.conditional_by_antecedent.keys().copied()
	}
}
