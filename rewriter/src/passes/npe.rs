//! Throw-NPE canonicalization (§4.D): `new NullPointerException(); invoke <init>(); throw` becomes
//! `const-null; throw` when the constructed instance has no other observer — later passes (notably
//! always-throwing-instruction rewriting) only need to recognize a thrown null, not a whole
//! constructor call sequence.
//!
//! The companion rule ("`if (x==null) throw new NPE()` becomes a null-check call") needs a
//! target-platform null-check intrinsic this IR does not model as a distinct instruction; it is
//! left for a future pass once such an intrinsic exists.

use duke::tree::class::ClassName;
use ir::block::Terminator;
use ir::value::{ConstValue, Instr, Operand, ValueDefKind, ValueId};
use ir::body::Body;

fn is_null_pointer_exception(class: &ClassName) -> bool {
	class.as_slice().as_inner().as_str() == Some("java/lang/NullPointerException")
}

fn count_uses(body: &Body, target: ValueId) -> usize {
	let mut count = 0;
	for (_, def) in body.values() {
		if let ValueDefKind::Instr(instr) = &def.kind {
			visit_operands(instr, |op| if let Operand::Value(v) = op { if *v == target { count += 1; } });
		}
	}
	count
}

fn visit_operands(instr: &Instr, mut f: impl FnMut(&Operand)) {
	match instr {
		Instr::Const(_) | Instr::New(_) | Instr::GetStatic(_) => {}
		Instr::BinOp(_, a, b) | Instr::ArrayLoad(a, b) | Instr::PutField(_, a, b) => { f(a); f(b); }
		Instr::UnOp(_, a) | Instr::Assume(a) | Instr::NewArray(_, a) | Instr::ANewArray(_, a)
			| Instr::ArrayLength(a) | Instr::GetField(_, a) | Instr::PutStatic(_, a)
			| Instr::CheckCast(_, a) | Instr::InstanceOf(_, a) | Instr::MonitorEnter(a) | Instr::MonitorExit(a) => f(a),
		Instr::ArrayStore(a, b, c) => { f(a); f(b); f(c); }
		Instr::MultiANewArray(_, _, ops) => ops.iter().for_each(&mut f),
		Instr::InvokeStatic(_, args, _) => args.iter().for_each(&mut f),
		Instr::InvokeSpecial(_, recv, args, _) | Instr::InvokeVirtual(_, recv, args) | Instr::InvokeInterface(_, recv, args) => {
			f(recv);
			args.iter().for_each(&mut f);
		}
	}
}

/// Collapses the NPE construct-and-throw idiom. Returns whether any site was rewritten.
pub fn run(body: &mut Body) -> bool {
	let mut changed = false;
	let block_ids: Vec<_> = body.block_ids().collect();

	for block_id in block_ids {
		let terminator = body.block(block_id).terminator.clone();
		let Terminator::Throw(thrown) = terminator else { continue };

		let ValueDefKind::Instr(Instr::New(class)) = &body.value(thrown).kind else { continue };
		if !is_null_pointer_exception(class) {
			continue;
		}

		let init_site = body.block(block_id).instructions.iter().copied().find(|&id| {
			matches!(&body.value(id).kind, ValueDefKind::Instr(Instr::InvokeSpecial(_, Operand::Value(recv), args, _)) if *recv == thrown && args.is_empty())
		});
		let Some(init_id) = init_site else { continue };

		// `thrown` must only be observed by its own constructor call and the throw itself.
		if count_uses(body, thrown) != 1 {
			continue;
		}

		let block = body.value(thrown).block;
		let ty = body.value(thrown).ty.clone();
		*body.value_mut(thrown) = ir::value::ValueDef { block, ty, kind: ValueDefKind::Instr(Instr::Const(ConstValue::Null)) };
		body.block_mut(block_id).instructions.retain(|&id| id != init_id);
		changed = true;
	}

	changed
}
