//! Shared operand-rewriting plumbing used by several passes (assume removal, CSE, const hoisting):
//! replacing every use of one [`ValueId`] by another, across instructions, terminators and phis.

use ir::block::{Condition, Terminator};
use ir::body::Body;
use ir::value::{Instr, Operand, ValueDefKind, ValueId};

fn rewrite_operand(op: &mut Operand, old: ValueId, new: ValueId) {
	let Operand::Value(v) = op;
	if *v == old {
		*v = new;
	}
}

fn rewrite_operands(instr: &mut Instr, old: ValueId, new: ValueId) {
	let mut r = |op: &mut Operand| rewrite_operand(op, old, new);
	match instr {
		Instr::Const(_) => {}
		Instr::BinOp(_, a, b) => { r(a); r(b); }
		Instr::UnOp(_, a) => r(a),
		Instr::Assume(a) => r(a),
		Instr::New(_) => {}
		Instr::NewArray(_, a) => r(a),
		Instr::ANewArray(_, a) => r(a),
		Instr::MultiANewArray(_, _, ops) => ops.iter_mut().for_each(&mut r),
		Instr::ArrayLength(a) => r(a),
		Instr::ArrayLoad(a, b) => { r(a); r(b); }
		Instr::ArrayStore(a, b, c) => { r(a); r(b); r(c); }
		Instr::GetField(_, a) => r(a),
		Instr::PutField(_, a, b) => { r(a); r(b); }
		Instr::GetStatic(_) => {}
		Instr::PutStatic(_, a) => r(a),
		Instr::InvokeStatic(_, args, _) => args.iter_mut().for_each(&mut r),
		Instr::InvokeSpecial(_, recv, args, _) => { r(recv); args.iter_mut().for_each(&mut r); }
		Instr::InvokeVirtual(_, recv, args) => { r(recv); args.iter_mut().for_each(&mut r); }
		Instr::InvokeInterface(_, recv, args) => { r(recv); args.iter_mut().for_each(&mut r); }
		Instr::CheckCast(_, a) => r(a),
		Instr::InstanceOf(_, a) => r(a),
		Instr::MonitorEnter(a) => r(a),
		Instr::MonitorExit(a) => r(a),
	}
}

fn rewrite_condition(cond: &mut Condition, old: ValueId, new: ValueId) {
	let mut r = |op: &mut Operand| rewrite_operand(op, old, new);
	match cond {
		Condition::IntCmpZero(_, a) => r(a),
		Condition::IntCmp(_, a, b) => { r(a); r(b); }
		Condition::RefCmp(_, a, b) => { r(a); r(b); }
		Condition::RefIsNull(a) => r(a),
		Condition::RefIsNonNull(a) => r(a),
	}
}

fn rewrite_value_id(v: &mut ValueId, old: ValueId, new: ValueId) {
	if *v == old {
		*v = new;
	}
}

/// Replaces every use of `old` by `new`, but only among instructions owned by `block` (its
/// `instructions` list) and its terminator — used by life-range-shortening to rewire a single
/// use site without disturbing the value's other occurrences.
pub fn replace_uses_in_block(body: &mut Body, block: ir::block::BlockId, old: ValueId, new: ValueId) {
	let ids: Vec<ValueId> = body.block(block).instructions.clone();
	for id in ids {
		if let ValueDefKind::Instr(instr) = &mut body.value_mut(id).kind {
			rewrite_operands(instr, old, new);
		}
	}
	match &mut body.block_mut(block).terminator {
		Terminator::If { cond, .. } => rewrite_condition(cond, old, new),
		Terminator::Switch { scrutinee, .. } => rewrite_value_id(scrutinee, old, new),
		Terminator::Throw(v) => rewrite_value_id(v, old, new),
		Terminator::Return(Some(v)) => rewrite_value_id(v, old, new),
		_ => {}
	}
}

/// Replaces every use of `old` by `new` across every instruction operand, terminator and phi
/// incoming value in `body`. Does not touch `old`'s own definition.
pub fn replace_all_uses(body: &mut Body, old: ValueId, new: ValueId) {
	let ids: Vec<ValueId> = body.values().map(|(id, _)| id).collect();
	for id in ids {
		if id == old {
			continue;
		}
		match &mut body.value_mut(id).kind {
			ValueDefKind::Instr(instr) => rewrite_operands(instr, old, new),
			ValueDefKind::Phi(incoming) => {
				for (_, v) in incoming.iter_mut() {
					rewrite_value_id(v, old, new);
				}
			}
			ValueDefKind::Param(_) => {}
		}
	}

	let block_ids: Vec<_> = body.block_ids().collect();
	for block_id in block_ids {
		let block = body.block_mut(block_id);
		match &mut block.terminator {
			Terminator::If { cond, .. } => rewrite_condition(cond, old, new),
			Terminator::Switch { scrutinee, .. } => rewrite_value_id(scrutinee, old, new),
			Terminator::Throw(v) => rewrite_value_id(v, old, new),
			Terminator::Return(Some(v)) => rewrite_value_id(v, old, new),
			Terminator::Return(None) | Terminator::Goto(_) | Terminator::Unreachable => {}
		}
	}
}
