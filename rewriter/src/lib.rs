//! The IR-level control-flow and value rewriter (§2 component D, §4.D): a battery of
//! semantics-preserving passes run to a fixed point over one method body at a time.

pub mod rewrite;
pub mod passes {
	pub mod always_throw;
	pub mod array_materialize;
	pub mod assume;
	pub mod cast;
	pub mod cfg;
	pub mod const_opt;
	pub mod cse;
	pub mod npe;
	pub mod switch_restructure;
}

use ir::body::Body;
use keep_model::options::Options;

/// Runs every rewriter pass over `body` repeatedly until none of them reports further progress,
/// per §4.D's closing note that narrowing and simplification feed back into each other (a folded
/// branch can make a value provably non-null, which can fold a cast, which can enable CSE, and so
/// on) — so a single linear pass order isn't enough to reach the fixed point.
pub fn run_to_fixed_point(body: &mut Body, options: &Options) -> anyhow::Result<()> {
	loop {
		let mut changed = false;

		changed |= passes::assume::run(body);
		changed |= passes::npe::run(body);
		changed |= passes::cast::run(body);
		changed |= passes::cfg::simplify_branches(body);
		changed |= passes::cfg::collapse_uniform_switch(body);
		changed |= passes::cfg::collapse_trivial_gotos(body);
		changed |= passes::cse::run(body)?;
		changed |= passes::const_opt::run(body, options);
		changed |= passes::array_materialize::run(body);
		changed |= passes::always_throw::run(body);

		if !changed {
			break;
		}
	}

	// switch restructuring runs once, after every other pass has stopped finding simplifications:
	// it's a final lowering-strategy choice, not a narrowing source the other passes feed on.
	passes::switch_restructure::run(body, options);

	Ok(())
}

#[cfg(test)]
mod tests {
	use ir::block::Terminator;
	use ir::body::Body;
	use ir::ty::{LatticeType, Type};
	use ir::value::{ConstValue, Instr, ValueDef, ValueDefKind};
	use keep_model::options::Options;
	use pretty_assertions::assert_eq;
	use super::*;

	#[test]
	fn fixed_point_folds_a_constant_branch_into_a_direct_goto() {
		let mut body = Body::new();
		let then_block = body.new_block();
		let else_block = body.new_block();
		let one = body.define(body.entry, ValueDef {
			block: body.entry,
			ty: LatticeType::new(Type::Int),
			kind: ValueDefKind::Instr(Instr::Const(ConstValue::Int(1))),
		});
		body.block_mut(body.entry).terminator = Terminator::If {
			cond: ir::block::Condition::IntCmpZero(ir::block::CmpKind::Ne, ir::value::Operand::Value(one)),
			then: then_block,
			els: else_block,
		};
		body.block_mut(then_block).terminator = Terminator::Return(None);
		body.block_mut(else_block).terminator = Terminator::Return(None);
		body.recompute_edges();

		run_to_fixed_point(&mut body, &Options::default()).unwrap();

		assert_eq!(body.block(body.entry).terminator, Terminator::Goto(then_block));
	}
}
