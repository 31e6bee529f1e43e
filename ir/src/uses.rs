//! The use registry: a visitor invoked on every externally referencing operand of every
//! instruction in a code body, per the glossary's "use registry" entry. The enqueuer drives
//! reachability tracing entirely through this, so it never needs to match on [`Instr`] itself.

use duke::tree::class::ClassName;
use duke::tree::field::FieldRef;
use duke::tree::method::MethodRef;
use crate::body::Body;
use crate::value::{ConstValue, Instr, ValueDefKind};

/// One externally-visible reference reachable from a live method's code.
#[derive(Debug, Clone, PartialEq)]
pub enum Reference<'a> {
	Type(&'a ClassName),
	Field(&'a FieldRef),
	InvokeStatic(&'a MethodRef),
	InvokeSpecial(&'a MethodRef),
	InvokeVirtual(&'a MethodRef),
	InvokeInterface(&'a MethodRef),
	NewInstance(&'a ClassName),
}

/// Calls `visitor` once for every reference made by any instruction in `body`, in block/instruction
/// order. Phis and pure-arithmetic instructions contribute nothing: they only consume other SSA
/// values, which are already covered by their own definitions.
pub fn visit_references<'a>(body: &'a Body, mut visitor: impl FnMut(Reference<'a>)) {
	for (_, def) in body.values() {
		let ValueDefKind::Instr(instr) = &def.kind else { continue };
		match instr {
			Instr::Const(ConstValue::Class(class)) => visitor(Reference::Type(class)),
			Instr::New(class) => visitor(Reference::NewInstance(class)),
			Instr::NewArray(_, _) => {}
			Instr::ANewArray(class, _) => visitor(Reference::Type(class)),
			Instr::MultiANewArray(class, _, _) => visitor(Reference::Type(class)),
			Instr::GetField(field, _) | Instr::PutField(field, _, _) => visitor(Reference::Field(field)),
			Instr::GetStatic(field) | Instr::PutStatic(field, _) => visitor(Reference::Field(field)),
			Instr::InvokeStatic(method, _, _) => visitor(Reference::InvokeStatic(method)),
			Instr::InvokeSpecial(method, _, _, _) => visitor(Reference::InvokeSpecial(method)),
			Instr::InvokeVirtual(method, _, _) => visitor(Reference::InvokeVirtual(method)),
			Instr::InvokeInterface(method, _, _) => visitor(Reference::InvokeInterface(method)),
			Instr::CheckCast(class, _) | Instr::InstanceOf(class, _) => visitor(Reference::Type(class)),
			_ => {}
		}
	}
}
