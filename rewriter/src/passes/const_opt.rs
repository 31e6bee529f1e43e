//! Const splitting / hoisting / life-range shortening (§4.D): a constant materialized once and
//! used across blocks is re-materialized right next to each remote user, shortening its live
//! range, as long as the user's block has no catch handlers (a re-split constant in a handler's
//! protected region could otherwise change which handler observes a partially-constructed value).
//!
//! A `long` constant that feeds a `lcmp`-style comparison is never split when
//! `Options::can_have_cmp_long_bug` is set: duplicating it would move a fresh materialization
//! right next to the buggy comparison on every target platform, rather than just the ones that
//! need it.

use indexmap::IndexSet;
use ir::block::BlockId;
use ir::body::Body;
use ir::value::{BinOp, ConstValue, Instr, Operand, ValueDefKind, ValueId};
use keep_model::options::Options;
use crate::rewrite::replace_uses_in_block;

fn instruction_operand_blocks(body: &Body, target: ValueId) -> IndexSet<BlockId> {
	let mut blocks = IndexSet::new();
	for (_, def) in body.values() {
		let ValueDefKind::Instr(instr) = &def.kind else { continue };
		let uses_target = operands_of(instr).iter().any(|op| matches!(op, Operand::Value(v) if *v == target));
		if uses_target {
			blocks.insert(def.block);
		}
	}
	blocks
}

fn operands_of(instr: &Instr) -> Vec<Operand> {
	match instr {
		Instr::Const(_) | Instr::New(_) | Instr::GetStatic(_) => vec![],
		Instr::BinOp(_, a, b) | Instr::ArrayLoad(a, b) | Instr::PutField(_, a, b) => vec![a.clone(), b.clone()],
		Instr::UnOp(_, a) | Instr::Assume(a) | Instr::NewArray(_, a) | Instr::ANewArray(_, a)
			| Instr::ArrayLength(a) | Instr::GetField(_, a) | Instr::PutStatic(_, a)
			| Instr::CheckCast(_, a) | Instr::InstanceOf(_, a) | Instr::MonitorEnter(a) | Instr::MonitorExit(a) => vec![a.clone()],
		Instr::ArrayStore(a, b, c) => vec![a.clone(), b.clone(), c.clone()],
		Instr::MultiANewArray(_, _, ops) => ops.clone(),
		Instr::InvokeStatic(_, args, _) => args.clone(),
		Instr::InvokeSpecial(_, recv, args, _) | Instr::InvokeVirtual(_, recv, args) | Instr::InvokeInterface(_, recv, args) => {
			let mut v = vec![recv.clone()];
			v.extend(args.clone());
			v
		}
	}
}

fn feeds_cmp_long(body: &Body, target: ValueId) -> bool {
	body.values().any(|(_, def)| {
		matches!(&def.kind, ValueDefKind::Instr(Instr::BinOp(BinOp::CmpLong, a, b))
			if *a == Operand::Value(target) || *b == Operand::Value(target))
	})
}

/// Splits constants used from more than one block into per-block copies. Returns whether anything
/// was split.
pub fn run(body: &mut Body, options: &Options) -> bool {
	let const_ids: Vec<ValueId> = body.values()
		.filter_map(|(id, def)| matches!(&def.kind, ValueDefKind::Instr(Instr::Const(_))).then_some(id))
		.collect();

	let mut changed = false;
	for id in const_ids {
		let def_block = body.value(id).block;
		let const_instr = match &body.value(id).kind {
			ValueDefKind::Instr(instr @ Instr::Const(_)) => instr.clone(),
			_ => continue,
		};
		if options.can_have_cmp_long_bug
			&& matches!(&const_instr, Instr::Const(ConstValue::Long(_)))
			&& feeds_cmp_long(body, id)
		{
			continue;
		}
		let ty = body.value(id).ty.clone();

		for use_block in instruction_operand_blocks(body, id) {
			if use_block == def_block || !body.block(use_block).catch_handlers.is_empty() {
				continue;
			}
			let clone_id = body.define(use_block, ir::value::ValueDef { block: use_block, ty: ty.clone(), kind: ValueDefKind::Instr(const_instr.clone()) });
			// move the clone to the front of the block so it precedes every use.
			body.block_mut(use_block).instructions.retain(|&v| v != clone_id);
			body.block_mut(use_block).instructions.insert(0, clone_id);
			replace_uses_in_block(body, use_block, id, clone_id);
			changed = true;
		}
	}
	changed
}
