//! Always-throwing-instruction rewriting (§4.D): once narrowing shows an operand that an
//! instruction requires to be non-null is always null, everything from that instruction onward in
//! the block is unreachable — it rewrites to a thrown null (the canonical NPE per [`crate::passes::npe`])
//! and the dead tail is discarded.

use ir::block::Terminator;
use ir::body::Body;
use ir::ty::Type;
use ir::value::{ConstValue, Instr, Operand, ValueDefKind};

/// The operand of `instr` that the JVM requires to be non-null before executing it, if any.
fn required_non_null_operand(instr: &Instr) -> Option<Operand> {
	match instr {
		Instr::ArrayLength(a) | Instr::ArrayLoad(a, _) | Instr::GetField(_, a)
			| Instr::MonitorEnter(a) | Instr::MonitorExit(a) => Some(a.clone()),
		Instr::ArrayStore(a, _, _) | Instr::PutField(_, a, _) => Some(a.clone()),
		Instr::InvokeSpecial(_, recv, _, _) | Instr::InvokeVirtual(_, recv, _) | Instr::InvokeInterface(_, recv, _) => Some(recv.clone()),
		_ => None,
	}
}

/// Rewrites a block whose only non-`this`/non-static operand feeding some instruction is known
/// always-null into a direct throw. Returns whether any block was rewritten.
pub fn run(body: &mut Body) -> bool {
	let mut changed = false;
	let block_ids: Vec<_> = body.block_ids().collect();

	for block_id in block_ids {
		let ids = body.block(block_id).instructions.clone();
		let culprit = ids.iter().enumerate().find_map(|(pos, &id)| {
			let ValueDefKind::Instr(instr) = &body.value(id).kind else { return None };
			let Operand::Value(operand) = required_non_null_operand(instr)?;
			body.value(operand).ty.is_always_null().then_some(pos)
		});

		let Some(pos) = culprit else { continue };

		let null_value = body.define(block_id, ir::value::ValueDef {
			block: block_id,
			ty: ir::ty::LatticeType::new(Type::Object { class: duke::tree::class::ClassName::from(
				duke::tree::class::ObjClassName::try_from(java_string::JavaString::from("java/lang/NullPointerException")).expect("valid class name")
			), array_dimensions: 0 }).with_nullability(ir::ty::Nullability::AlwaysNull),
			kind: ValueDefKind::Instr(Instr::Const(ConstValue::Null)),
		});

		let retained: Vec<_> = body.block(block_id).instructions[..pos].to_vec();
		let block = body.block_mut(block_id);
		block.instructions = retained;
		block.instructions.push(null_value);
		block.terminator = Terminator::Throw(null_value);
		changed = true;
	}

	if changed {
		body.recompute_edges();
	}
	changed
}

#[cfg(test)]
mod tests {
	use duke::tree::field::FieldRef;
	use ir::block::Terminator;
	use ir::ty::{LatticeType, Nullability};
	use ir::value::{Operand, ValueDef};
	use super::*;

	#[test]
	fn getfield_on_always_null_receiver_becomes_a_throw() {
		let mut body = Body::new();
		let next = body.new_block();
		body.block_mut(next).terminator = Terminator::Return(None);

		let obj_class = duke::tree::class::ObjClassName::try_from(java_string::JavaString::from("p/C")).unwrap();
		let null_obj = body.define(body.entry, ValueDef {
			block: body.entry,
			ty: LatticeType::new(ir::ty::Type::Object { class: obj_class.clone().into(), array_dimensions: 0 }).with_nullability(Nullability::AlwaysNull),
			kind: ValueDefKind::Instr(Instr::Const(ConstValue::Null)),
		});
		let field = FieldRef {
			class: obj_class,
			name: duke::tree::field::FieldName::try_from(java_string::JavaString::from("x")).unwrap(),
			desc: duke::tree::field::FieldDescriptor::try_from(java_string::JavaString::from("I")).unwrap(),
		};
		body.define(body.entry, ValueDef {
			block: body.entry,
			ty: LatticeType::new(ir::ty::Type::Int),
			kind: ValueDefKind::Instr(Instr::GetField(field, Operand::Value(null_obj))),
		});
		body.block_mut(body.entry).terminator = Terminator::Goto(next);
		body.recompute_edges();

		assert!(run(&mut body));
		assert!(matches!(body.block(body.entry).terminator, Terminator::Throw(_)));
	}
}
