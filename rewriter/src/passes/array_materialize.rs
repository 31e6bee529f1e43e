//! Array materialization (§4.D): a `new-array` immediately followed by a run of `array-store`s at
//! distinct constant indices is the array-literal idiom that a target backend would otherwise
//! collapse into a single `fill-array-data`/`filled-new-array` instruction. This IR has no such
//! intrinsic to emit, so this pass implements the sub-case fully within the SSA model: when two
//! stores to the same array and the same constant index occur with nothing observing the array in
//! between, the earlier store is dead and is removed. Intrinsic selection itself is left to the
//! backend that lowers this IR to bytecode.

use ir::body::Body;
use ir::value::{ConstValue, Instr, Operand, ValueDefKind, ValueId};

fn const_int(body: &Body, v: ValueId) -> Option<i32> {
	match &body.value(v).kind {
		ValueDefKind::Instr(Instr::Const(ConstValue::Int(n))) => Some(*n),
		_ => None,
	}
}

/// Removes an `ArrayStore` at some `(array, index)` pair when a later store to the identical pair,
/// with no intervening read of or throw from that array, makes it dead. Only operates within a
/// single block: once control flow branches, proving no observation happened in between would need
/// a full alias/escape analysis this pass does not attempt.
pub fn run(body: &mut Body) -> bool {
	let mut changed = false;
	let block_ids: Vec<_> = body.block_ids().collect();

	for block_id in block_ids {
		let ids: Vec<ValueId> = body.block(block_id).instructions.clone();
		let mut dead = Vec::new();

		for (pos, &id) in ids.iter().enumerate() {
			let ValueDefKind::Instr(Instr::ArrayStore(Operand::Value(array), Operand::Value(index), _)) = &body.value(id).kind else { continue };
			let (array, index) = (*array, *index);
			let Some(index_const) = const_int(body, index) else { continue };

			let superseded = ids[pos + 1..].iter().any(|&later| {
				match &body.value(later).kind {
					ValueDefKind::Instr(Instr::ArrayStore(Operand::Value(a2), Operand::Value(i2), _)) => {
						*a2 == array && const_int(body, *i2) == Some(index_const)
					}
					_ => false,
				}
			});
			let observed_between = ids[pos + 1..].iter().any(|&later| matches!(&body.value(later).kind,
				ValueDefKind::Instr(Instr::ArrayLoad(Operand::Value(a2), _)) if *a2 == array));

			if superseded && !observed_between {
				dead.push(id);
			}
		}

		if !dead.is_empty() {
			body.block_mut(block_id).instructions.retain(|id| !dead.contains(id));
			changed = true;
		}
	}

	changed
}

#[cfg(test)]
mod tests {
	use ir::ty::{LatticeType, Type};
	use ir::value::ValueDef;
	use super::*;

	#[test]
	fn earlier_store_to_same_slot_is_removed() {
		let mut body = Body::new();
		let length = body.define(body.entry, ValueDef { block: body.entry, ty: LatticeType::new(Type::Int), kind: ValueDefKind::Instr(Instr::Const(ConstValue::Int(2))) });
		let object_class: duke::tree::class::ClassName = duke::tree::class::ObjClassName::try_from(java_string::JavaString::from("java/lang/Object")).unwrap().into();
		let array = body.define(body.entry, ValueDef { block: body.entry, ty: LatticeType::new(Type::Object { class: object_class, array_dimensions: 1 }), kind: ValueDefKind::Instr(Instr::NewArray(duke::tree::method::code::ArrayType::Int, Operand::Value(length))) });
		let zero = body.define(body.entry, ValueDef { block: body.entry, ty: LatticeType::new(Type::Int), kind: ValueDefKind::Instr(Instr::Const(ConstValue::Int(0))) });
		let first_value = body.define(body.entry, ValueDef { block: body.entry, ty: LatticeType::new(Type::Int), kind: ValueDefKind::Instr(Instr::Const(ConstValue::Int(1))) });
		let second_value = body.define(body.entry, ValueDef { block: body.entry, ty: LatticeType::new(Type::Int), kind: ValueDefKind::Instr(Instr::Const(ConstValue::Int(2))) });
		let first_store = body.define(body.entry, ValueDef { block: body.entry, ty: LatticeType::new(Type::Int), kind: ValueDefKind::Instr(Instr::ArrayStore(Operand::Value(array), Operand::Value(zero), Operand::Value(first_value))) });
		body.define(body.entry, ValueDef { block: body.entry, ty: LatticeType::new(Type::Int), kind: ValueDefKind::Instr(Instr::ArrayStore(Operand::Value(array), Operand::Value(zero), Operand::Value(second_value))) });

		assert!(run(&mut body));
		assert!(!body.block(body.entry).instructions.contains(&first_store));
	}
}
