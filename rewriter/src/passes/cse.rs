//! Common-subexpression elimination (§4.D): walks the dominator tree in preorder, hashing each
//! pure instruction by opcode plus canonicalized operands, and replaces a dominated duplicate by
//! the first definition reached.

use std::collections::HashMap;
use ir::body::Body;
use ir::value::{BinOp, Instr, Operand, ValueDefKind, ValueId};
use crate::rewrite::replace_all_uses;

/// A hashable, order-canonicalized key for an instruction: commutative binary ops hash their
/// operands in a fixed (sorted-by-id) order so `a+b` and `b+a` collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Key {
	Const(String),
	BinOp(BinOp, ValueId, ValueId),
	GetStatic(String),
	GetField(String, ValueId),
	CheckCast(String, ValueId),
	InstanceOf(String, ValueId),
}

fn is_commutative(op: BinOp) -> bool {
	matches!(op, BinOp::Add | BinOp::Mul | BinOp::And | BinOp::Or | BinOp::Xor)
}

/// Whether `instr` can write a field or invoke arbitrary code, either of which can change what a
/// later `GetField`/`GetStatic` observes — a cached field read must not survive past one of these.
fn is_field_invalidating(instr: &Instr) -> bool {
	matches!(
		instr,
		Instr::PutField(..)
			| Instr::PutStatic(..)
			| Instr::InvokeStatic(..)
			| Instr::InvokeSpecial(..)
			| Instr::InvokeVirtual(..)
			| Instr::InvokeInterface(..)
	)
}

fn key_of(instr: &Instr) -> Option<Key> {
	match instr {
		Instr::Const(c) => Some(Key::Const(format!("{c:?}"))),
		Instr::BinOp(op, Operand::Value(a), Operand::Value(b)) => {
			let (x, y) = if is_commutative(*op) && b < a { (*b, *a) } else { (*a, *b) };
			Some(Key::BinOp(*op, x, y))
		}
		Instr::GetStatic(field) => Some(Key::GetStatic(format!("{field:?}"))),
		Instr::GetField(field, Operand::Value(v)) => Some(Key::GetField(format!("{field:?}"), *v)),
		Instr::CheckCast(class, Operand::Value(v)) => Some(Key::CheckCast(format!("{class:?}"), *v)),
		Instr::InstanceOf(class, Operand::Value(v)) => Some(Key::InstanceOf(format!("{class:?}"), *v)),
		_ => None,
	}
}

/// Whether `replacement`'s definition site dominates `site`'s and both sites agree on which catch
/// handlers are active (so a replaced use can't escape to a different handler set than the
/// original instruction would have).
fn dominates_and_shares_handlers(body: &Body, tree: &ir::body::DominatorTree, def_block: ir::block::BlockId, use_block: ir::block::BlockId) -> bool {
	if !tree.dominates(def_block, use_block) {
		return false;
	}
	body.block(def_block).catch_handlers == body.block(use_block).catch_handlers
}

/// Runs one CSE pass over `body`. Returns whether anything was eliminated.
pub fn run(body: &mut Body) -> anyhow::Result<bool> {
	body.recompute_edges();
	let tree = body.dominator_tree()?;
	let mut seen: HashMap<Key, ValueId> = HashMap::new();
	let mut changed = false;

	for block_id in tree.preorder(body.entry) {
		let instr_ids: Vec<ValueId> = body.block(block_id).instructions.clone();
		for id in instr_ids {
			let ValueDefKind::Instr(instr) = &body.value(id).kind else { continue };

			if is_field_invalidating(instr) {
				seen.retain(|key, _| !matches!(key, Key::GetField(..) | Key::GetStatic(..)));
			}

			let Some(key) = key_of(instr) else { continue };

			if let Some(&existing) = seen.get(&key) {
				let def_block = body.value(existing).block;
				if dominates_and_shares_handlers(body, &tree, def_block, block_id) {
					replace_all_uses(body, id, existing);
					body.block_mut(block_id).instructions.retain(|&v| v != id);
					changed = true;
					continue;
				}
			}
			seen.insert(key, id);
		}
	}

	Ok(changed)
}
