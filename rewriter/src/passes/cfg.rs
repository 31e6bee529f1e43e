//! Trivial-goto collapse and if/switch simplification (§4.D).

use ir::block::{Condition, Terminator};
use ir::body::Body;
use ir::value::{ConstValue, Instr, Operand, ValueDefKind};
use ir::ty::Nullability;

fn redirect(target: ir::block::BlockId, from: ir::block::BlockId, to: ir::block::BlockId) -> ir::block::BlockId {
	if target == from { to } else { target }
}

/// Removes blocks whose only instruction is an unconditional branch, redirecting every other
/// block's terminator to jump straight to the collapsed block's target. Never collapses the
/// entry block or a self-loop.
pub fn collapse_trivial_gotos(body: &mut Body) -> bool {
	let mut changed = false;
	loop {
		let candidate = body.block_ids().find(|&id| {
			id != body.entry
				&& body.block(id).is_trivial_goto()
				&& !matches!(&body.block(id).terminator, Terminator::Goto(target) if *target == id)
		});
		let Some(dead) = candidate else { break };
		let Terminator::Goto(target) = body.block(dead).terminator.clone() else { unreachable!() };

		let ids: Vec<_> = body.block_ids().collect();
		for id in ids {
			if id == dead {
				continue;
			}
			let block = body.block_mut(id);
			block.terminator = match block.terminator.clone() {
				Terminator::Goto(b) => Terminator::Goto(redirect(b, dead, target)),
				Terminator::If { cond, then, els } => Terminator::If {
					cond,
					then: redirect(then, dead, target),
					els: redirect(els, dead, target),
				},
				Terminator::Switch { scrutinee, cases, default } => Terminator::Switch {
					scrutinee,
					cases: cases.into_iter().map(|(k, b)| (k, redirect(b, dead, target))).collect(),
					default: redirect(default, dead, target),
				},
				other => other,
			};
		}

		body.remove_block(dead);
		body.recompute_edges();
		changed = true;
	}
	changed
}

fn known_bool(body: &Body, cond: &Condition) -> Option<bool> {
	use ir::block::CmpKind::*;
	match cond {
		Condition::RefIsNull(Operand::Value(v)) => match body.value(*v).ty.refinement.nullability {
			Nullability::AlwaysNull => Some(true),
			Nullability::NonNull => Some(false),
			_ => None,
		},
		Condition::RefIsNonNull(Operand::Value(v)) => match body.value(*v).ty.refinement.nullability {
			Nullability::AlwaysNull => Some(false),
			Nullability::NonNull => Some(true),
			_ => None,
		},
		Condition::IntCmpZero(kind, Operand::Value(v)) => {
			let ValueDefKind::Instr(Instr::Const(ConstValue::Int(n))) = &body.value(*v).kind else { return None };
			Some(match kind {
				Eq => *n == 0, Ne => *n != 0, Lt => *n < 0, Ge => *n >= 0, Gt => *n > 0, Le => *n <= 0,
			})
		}
		Condition::IntCmp(kind, Operand::Value(a), Operand::Value(b)) => {
			let ValueDefKind::Instr(Instr::Const(ConstValue::Int(x))) = &body.value(*a).kind else { return None };
			let ValueDefKind::Instr(Instr::Const(ConstValue::Int(y))) = &body.value(*b).kind else { return None };
			let d = x - y;
			Some(match kind {
				Eq => d == 0, Ne => d != 0, Lt => d < 0, Ge => d >= 0, Gt => d > 0, Le => d <= 0,
			})
		}
		Condition::RefCmp(kind, Operand::Value(a), Operand::Value(b)) if a == b => {
			Some(matches!(kind, Eq | Ge | Le))
		}
		_ => None,
	}
}

/// Folds an `If` whose condition is statically known (constant, null-known, or same-value
/// reflexive comparison) to an unconditional `Goto`. Returns whether any site was folded.
pub fn simplify_branches(body: &mut Body) -> bool {
	let mut changed = false;
	let ids: Vec<_> = body.block_ids().collect();
	for id in ids {
		let terminator = body.block(id).terminator.clone();
		let Terminator::If { cond, then, els } = terminator else { continue };
		if let Some(taken) = known_bool(body, &cond) {
			body.block_mut(id).terminator = Terminator::Goto(if taken { then } else { els });
			changed = true;
		}
	}
	if changed {
		body.recompute_edges();
	}
	changed
}

/// Rewrites an int-switch whose every case (and the default, if reached) targets the same block
/// into a single `Goto` — the degenerate case of "switch size collapse" (§8 scenario 3: dead-case
/// elimination plus behavioral subsumption).
pub fn collapse_uniform_switch(body: &mut Body) -> bool {
	let mut changed = false;
	let ids: Vec<_> = body.block_ids().collect();
	for id in ids {
		let terminator = body.block(id).terminator.clone();
		let Terminator::Switch { cases, default, .. } = terminator else { continue };
		if cases.iter().all(|(_, b)| *b == default) {
			body.block_mut(id).terminator = Terminator::Goto(default);
			changed = true;
		}
	}
	if changed {
		body.recompute_edges();
	}
	changed
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;
	use ir::block::{Condition, Terminator};
	use ir::value::{ConstValue, Instr, Operand, ValueDefKind};
	use ir::ty::{LatticeType, Type};
	use super::*;

	#[test]
	fn collapses_uniform_switch_to_goto() {
		let mut body = Body::new();
		let target = body.new_block();
		let scrutinee = body.define(body.entry, ir::value::ValueDef {
			block: body.entry,
			ty: LatticeType::new(Type::Int),
			kind: ValueDefKind::Instr(Instr::Const(ConstValue::Int(1))),
		});
		body.block_mut(body.entry).terminator = Terminator::Switch {
			scrutinee,
			cases: vec![(1, target), (2, target), (3, target)],
			default: target,
		};
		body.block_mut(target).terminator = Terminator::Return(None);
		body.recompute_edges();

		assert!(collapse_uniform_switch(&mut body));
		assert_eq!(body.block(body.entry).terminator, Terminator::Goto(target));
	}

	#[test]
	fn folds_constant_if() {
		let mut body = Body::new();
		let then_block = body.new_block();
		let else_block = body.new_block();
		let one = body.define(body.entry, ir::value::ValueDef {
			block: body.entry,
			ty: LatticeType::new(Type::Int),
			kind: ValueDefKind::Instr(Instr::Const(ConstValue::Int(1))),
		});
		body.block_mut(body.entry).terminator = Terminator::If {
			cond: Condition::IntCmpZero(ir::block::CmpKind::Ne, Operand::Value(one)),
			then: then_block,
			els: else_block,
		};
		body.block_mut(then_block).terminator = Terminator::Return(None);
		body.block_mut(else_block).terminator = Terminator::Return(None);
		body.recompute_edges();

		assert!(simplify_branches(&mut body));
		assert_eq!(body.block(body.entry).terminator, Terminator::Goto(then_block));
	}
}
