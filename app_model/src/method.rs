//! Method definitions and code bodies.

use duke::tree::method::MethodAccess;
use duke::tree::method::code::Code;
use crate::interning::MethodId;

/// A method's flavor, derived from its name and access flags — used throughout the resolver and
/// enqueuer instead of comparing [`duke::tree::method::MethodName`] against `<init>`/`<clinit>`
/// at every call site.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum InitializerFlavor {
	None,
	InstanceInit,
	ClassInit,
}

/// Either a method's raw bytecode (as read from / to be written to a class file) or its SSA form.
/// A method owns at most one of these at any moment, per the data model.
#[derive(Debug, Clone)]
pub enum CodeBody {
	Raw(Code),
	Ssa(ir::body::Body),
}

/// A method definition in the app model.
#[derive(Debug, Clone)]
pub struct MethodDef {
	pub id: MethodId,
	pub access: MethodAccess,
	pub initializer: InitializerFlavor,
	/// Absent for abstract/native methods.
	pub code: Option<CodeBody>,
}

impl MethodDef {
	pub fn new(id: MethodId, access: MethodAccess, initializer: InitializerFlavor) -> MethodDef {
		MethodDef { id, access, initializer, code: None }
	}

	/// Direct methods are private, static, or an initializer — never subject to virtual dispatch.
	pub fn is_direct(&self) -> bool {
		self.access.is_private || self.access.is_static || self.initializer != InitializerFlavor::None
	}

	pub fn is_abstract(&self) -> bool {
		self.access.is_abstract
	}

	/// Takes the SSA body out, leaving `None` behind; used by the rewriter to mutate a body and
	/// then put the (possibly different) body back via [`MethodDef::set_code`].
	pub fn take_ssa(&mut self) -> Option<ir::body::Body> {
		match self.code.take() {
			Some(CodeBody::Ssa(body)) => Some(body),
			other => {
				self.code = other;
				None
			}
		}
	}

	pub fn set_code(&mut self, code: CodeBody) {
		self.code = Some(code);
	}
}
