//! Check-cast / instance-of elimination and narrowing (§4.D).

use ir::body::Body;
use ir::ty::{Nullability, Type};
use ir::value::{ConstValue, Instr, Operand, ValueDefKind};

/// Whether `ty` is a reference type known to be an instance of `target` regardless of runtime
/// value — only the trivial identical-class case is decided here; anything requiring a subtype
/// check against the app model is the rewriter driver's job, not this pass's.
fn statically_subtype(ty: &Type, target: &duke::tree::class::ClassName) -> Option<bool> {
	match ty {
		Type::Object { class, array_dimensions: 0 } if class == target => Some(true),
		_ => None,
	}
}

/// Removes a `CheckCast`/`InstanceOf` that is provably redundant (the operand's declared type
/// already matches) or provably null-only (the operand is always null, so the cast never fails
/// and `instanceof` is always false). Folds the narrowed type back onto the operand's users via
/// the surrounding driver's re-analysis, as every other pass does.
pub fn run(body: &mut Body) -> bool {
	let mut changed = false;
	let ids: Vec<_> = body.values().map(|(id, _)| id).collect();

	for id in ids {
		let ValueDefKind::Instr(instr) = &body.value(id).kind else { continue };
		let (class, operand, is_instance_of) = match instr {
			Instr::CheckCast(class, Operand::Value(v)) => (class.clone(), *v, false),
			Instr::InstanceOf(class, Operand::Value(v)) => (class.clone(), *v, true),
			_ => continue,
		};

		let operand_def = body.value(operand);
		let always_null = operand_def.ty.is_always_null();
		let subtype = statically_subtype(&operand_def.ty.ty, &class);

		if always_null {
			let new_kind = if is_instance_of {
				ValueDefKind::Instr(Instr::Const(ConstValue::Int(0)))
			} else {
				// a checkcast of a known-null value never throws; it yields null.
				ValueDefKind::Instr(Instr::Const(ConstValue::Null))
			};
			let block = body.value(id).block;
			let ty = body.value(id).ty.clone();
			*body.value_mut(id) = ir::value::ValueDef { block, ty, kind: new_kind };
			changed = true;
		} else if !is_instance_of && subtype == Some(true) {
			// redundant checkcast: replace with the operand itself via an Assume, letting the
			// assume-removal pass fold it away once nullability has propagated.
			let block = body.value(id).block;
			let ty = body.value(id).ty.clone().with_nullability(Nullability::Unknown);
			*body.value_mut(id) = ir::value::ValueDef { block, ty, kind: ValueDefKind::Instr(Instr::Assume(Operand::Value(operand))) };
			changed = true;
		} else if is_instance_of && subtype == Some(true) && operand_def.ty.is_non_null() {
			// `null instanceof T` is always false regardless of static subtype, so the fold to
			// `true` only holds once the operand is known non-null.
			let block = body.value(id).block;
			let ty = body.value(id).ty.clone();
			*body.value_mut(id) = ir::value::ValueDef { block, ty, kind: ValueDefKind::Instr(Instr::Const(ConstValue::Int(1))) };
			changed = true;
		}
	}

	changed
}
