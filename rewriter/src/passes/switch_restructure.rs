//! Switch restructuring (§4.D): chooses a lowering strategy for each `int`-switch — packed
//! (contiguous key range, lowered to a jump table), sparse (non-contiguous, lowered to a sorted
//! binary-searchable table), or an if-chain (so few cases that a table's fixed overhead outweighs
//! linear comparisons) — and greedily prefers a packed table whenever its density clears the
//! target format's break-even threshold, since DEX's table entries are cheaper than class-file's
//! (a class-file table carries a stack-map-frame penalty per entry that DEX does not).
//!
//! This is the binary if-chain/packed/sparse choice only. Interval-grouping a sparse switch into
//! several dense sub-ranges, peeling a handful of outlier cases off into an if-chain prefix ahead
//! of a tighter packed table, mixing strategies within one switch, and exempting a compiler-
//! synthesized class-id switch (e.g. over an enum's ordinal-lookup table) from the density
//! threshold entirely are all out of scope here — each would need a cost model this pass doesn't
//! have, over the shape of the surrounding code rather than just the case-key set.

use ir::block::{CmpKind, Condition, Terminator};
use ir::body::Body;
use ir::value::{ConstValue, Instr, Operand, ValueDefKind};
use keep_model::options::{OutputMode, Options};

const IF_CHAIN_MAX_CASES: usize = 3;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Strategy {
	Packed,
	Sparse,
	IfChain,
}

fn density_threshold(mode: OutputMode) -> f64 {
	match mode {
		// class-file's per-entry stack-map cost makes a packed table worthwhile only when it's
		// fairly dense; DEX has no such penalty and benefits from a table sooner.
		OutputMode::ClassFile => 0.5,
		OutputMode::Dex => 0.25,
	}
}

fn choose_strategy(cases: &[(i32, ir::block::BlockId)], mode: OutputMode) -> Strategy {
	if cases.len() <= IF_CHAIN_MAX_CASES {
		return Strategy::IfChain;
	}
	let low = cases.iter().map(|(k, _)| *k).min().unwrap();
	let high = cases.iter().map(|(k, _)| *k).max().unwrap();
	let span = (high as i64 - low as i64 + 1) as f64;
	let density = cases.len() as f64 / span;
	if density >= density_threshold(mode) {
		Strategy::Packed
	} else {
		Strategy::Sparse
	}
}

/// Restructures one switch into a chain of equality-tested blocks, preserving evaluation order.
fn expand_to_if_chain(body: &mut Body, block_id: ir::block::BlockId, scrutinee: ir::value::ValueId, cases: Vec<(i32, ir::block::BlockId)>, default: ir::block::BlockId) {
	let mut current = block_id;
	for (idx, (key, target)) in cases.iter().enumerate() {
		let key_value = body.define(current, ir::value::ValueDef {
			block: current,
			ty: ir::ty::LatticeType::new(ir::ty::Type::Int),
			kind: ValueDefKind::Instr(Instr::Const(ConstValue::Int(*key))),
		});
		let is_last = idx + 1 == cases.len();
		let next = if is_last { default } else { body.new_block() };
		body.block_mut(current).terminator = Terminator::If {
			cond: Condition::IntCmp(CmpKind::Eq, Operand::Value(scrutinee), Operand::Value(key_value)),
			then: *target,
			els: next,
		};
		current = next;
	}
}

/// Picks a lowering strategy per switch and, for an if-chain choice, expands it into `If`
/// terminators. Packed/sparse choices are left as `Switch` terminators with cases sorted by key,
/// the canonical order a lowering backend expects for either table shape. Returns whether any
/// switch was touched.
pub fn run(body: &mut Body, options: &Options) -> bool {
	let mut changed = false;
	let block_ids: Vec<_> = body.block_ids().collect();

	for block_id in block_ids {
		let terminator = body.block(block_id).terminator.clone();
		let Terminator::Switch { scrutinee, cases, default } = terminator else { continue };

		match choose_strategy(&cases, options.output_mode) {
			Strategy::IfChain => {
				expand_to_if_chain(body, block_id, scrutinee, cases, default);
				changed = true;
			}
			Strategy::Packed | Strategy::Sparse => {
				let mut sorted = cases;
				sorted.sort_by_key(|(k, _)| *k);
				body.block_mut(block_id).terminator = Terminator::Switch { scrutinee, cases: sorted, default };
			}
		}
	}

	if changed {
		body.recompute_edges();
	}
	changed
}

#[cfg(test)]
mod tests {
	use ir::ty::{LatticeType, Type};
	use ir::value::{ValueDef, ValueDefKind};
	use pretty_assertions::assert_eq;
	use super::*;

	#[test]
	fn few_cases_expand_to_if_chain() {
		let mut body = Body::new();
		let a = body.new_block();
		let b = body.new_block();
		let default = body.new_block();
		let scrutinee = body.define(body.entry, ValueDef {
			block: body.entry,
			ty: LatticeType::new(Type::Int),
			kind: ValueDefKind::Instr(Instr::Const(ConstValue::Int(0))),
		});
		body.block_mut(body.entry).terminator = Terminator::Switch { scrutinee, cases: vec![(1, a), (2, b)], default };
		body.block_mut(a).terminator = Terminator::Return(None);
		body.block_mut(b).terminator = Terminator::Return(None);
		body.block_mut(default).terminator = Terminator::Return(None);
		body.recompute_edges();

		assert!(run(&mut body, &Options::default()));
		assert!(matches!(body.block(body.entry).terminator, Terminator::If { .. }));
	}

	#[test]
	fn dense_switch_keeps_table_form_sorted() {
		let mut body = Body::new();
		let targets: Vec<_> = (0..8).map(|_| body.new_block()).collect();
		for &t in &targets {
			body.block_mut(t).terminator = Terminator::Return(None);
		}
		let default = body.new_block();
		body.block_mut(default).terminator = Terminator::Return(None);
		let scrutinee = body.define(body.entry, ValueDef {
			block: body.entry,
			ty: LatticeType::new(Type::Int),
			kind: ValueDefKind::Instr(Instr::Const(ConstValue::Int(0))),
		});
		let cases: Vec<_> = targets.iter().enumerate().rev().map(|(i, &t)| (i as i32, t)).collect();
		body.block_mut(body.entry).terminator = Terminator::Switch { scrutinee, cases, default };
		body.recompute_edges();

		assert!(!run(&mut body, &Options::default()));
		let Terminator::Switch { cases, .. } = &body.block(body.entry).terminator else { panic!("expected switch") };
		let keys: Vec<_> = cases.iter().map(|(k, _)| *k).collect();
		assert_eq!(keys, vec![0, 1, 2, 3, 4, 5, 6, 7]);
	}
}
