//! Keep info: the join-semilattice of booleans bounding what later passes may do to an entity.
//!
//! Per the data model, joins monotonically *tighten* — once a flag is disallowed it stays
//! disallowed for the rest of the trace (invariant 4).

/// All flags default to `true` (fully permissive); a join can only turn flags off, never back on.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct KeepInfo {
	pub may_shrink: bool,
	pub may_optimize: bool,
	pub may_minify: bool,
	pub may_merge_horizontally: bool,
	pub may_merge_vertically: bool,
	pub may_inline: bool,
	pub may_reprocess: bool,
	pub closed_world_reasoning: bool,
}

impl Default for KeepInfo {
	fn default() -> KeepInfo {
		KeepInfo {
			may_shrink: true,
			may_optimize: true,
			may_minify: true,
			may_merge_horizontally: true,
			may_merge_vertically: true,
			may_inline: true,
			may_reprocess: true,
			closed_world_reasoning: true,
		}
	}
}

impl KeepInfo {
	/// The bottom of the lattice: every permission withdrawn. What an externally pinned ("kept
	/// as-is") entity ends up with.
	pub fn fully_pinned() -> KeepInfo {
		KeepInfo {
			may_shrink: false,
			may_optimize: false,
			may_minify: false,
			may_merge_horizontally: false,
			may_merge_vertically: false,
			may_inline: false,
			may_reprocess: false,
			closed_world_reasoning: false,
		}
	}

	/// Joins `other` into `self` in place, tightening every flag that `other` has already
	/// disallowed. Monotone: `self` only ever becomes more restrictive.
	pub fn join(&mut self, other: KeepInfo) {
		self.may_shrink &= other.may_shrink;
		self.may_optimize &= other.may_optimize;
		self.may_minify &= other.may_minify;
		self.may_merge_horizontally &= other.may_merge_horizontally;
		self.may_merge_vertically &= other.may_merge_vertically;
		self.may_inline &= other.may_inline;
		self.may_reprocess &= other.may_reprocess;
		self.closed_world_reasoning &= other.closed_world_reasoning;
	}

	/// Whether `self` is at least as restrictive as `before` on every flag — the monotonicity
	/// property checked by the Keep-info-is-monotone testable property.
	pub fn is_at_least_as_restrictive_as(&self, before: &KeepInfo) -> bool {
		(!self.may_shrink || before.may_shrink)
			&& (!self.may_optimize || before.may_optimize)
			&& (!self.may_minify || before.may_minify)
			&& (!self.may_merge_horizontally || before.may_merge_horizontally)
			&& (!self.may_merge_vertically || before.may_merge_vertically)
			&& (!self.may_inline || before.may_inline)
			&& (!self.may_reprocess || before.may_reprocess)
			&& (!self.closed_world_reasoning || before.closed_world_reasoning)
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;
	use super::*;

	#[test]
	fn join_only_tightens() {
		let mut info = KeepInfo::default();
		info.join(KeepInfo { may_shrink: false, ..KeepInfo::default() });
		assert!(!info.may_shrink);
		assert!(info.may_optimize);

		let before = info;
		info.join(KeepInfo::default());
		assert_eq!(info, before, "joining a fully-permissive lattice element changes nothing");

		info.join(KeepInfo::fully_pinned());
		assert_eq!(info, KeepInfo::fully_pinned());
	}

	#[test]
	fn monotone_check() {
		let before = KeepInfo::default();
		let mut after = before;
		after.join(KeepInfo { may_inline: false, ..KeepInfo::default() });
		assert!(after.is_at_least_as_restrictive_as(&before));
		assert!(!before.is_at_least_as_restrictive_as(&after));
	}
}
