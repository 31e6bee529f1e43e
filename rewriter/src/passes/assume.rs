//! Assume removal (§4.D): `y = Assume(x)` is replaced by `x` everywhere it is used, after its
//! refinement has been folded into every transitive user's [`ir::ty::LatticeType`].

use ir::body::Body;
use ir::value::{Instr, Operand, ValueDefKind, ValueId};
use crate::rewrite::replace_all_uses;

/// Removes every `Assume` instruction, rewiring its uses to the value it asserted a refinement
/// about. Returns whether any `Assume` was found and removed.
pub fn run(body: &mut Body) -> bool {
	let assumes: Vec<(ValueId, ValueId)> = body.values()
		.filter_map(|(id, def)| match &def.kind {
			ValueDefKind::Instr(Instr::Assume(Operand::Value(inner))) => Some((id, *inner)),
			_ => None,
		})
		.collect();

	if assumes.is_empty() {
		return false;
	}

	for (assumed, inner) in &assumes {
		let refinement = body.value(*assumed).ty.refinement.clone();
		let inner_refinement = &mut body.value_mut(*inner).ty.refinement;
		*inner_refinement = inner_refinement.join(&refinement);
		replace_all_uses(body, *assumed, *inner);
	}

	for (assumed, _) in &assumes {
		let block = body.value(*assumed).block;
		body.block_mut(block).instructions.retain(|v| v != assumed);
	}

	true
}
