//! Shared fixture builders for the end-to-end scenarios in `tests/end_to_end.rs`, built only
//! against the public API each crate exposes — the way a real caller (a classpath loader, a
//! keep-rule parser) would use this workspace, never through any textual format.

use app_model::class::{ClassDef, ClassOrigin};
use app_model::interning::{MethodId, MethodKey, TypeId, TypeKey};
use app_model::method::{CodeBody, InitializerFlavor, MethodDef};
use app_model::Context;
use duke::tree::class::{ClassAccess, ObjClassName};
use duke::tree::method::{MethodAccess, MethodDescriptor, MethodName};
use ir::body::Body;

pub fn obj(name: &str) -> ObjClassName {
	ObjClassName::try_from(java_string::JavaString::from(name)).expect("valid class name")
}

pub fn mname(name: &str) -> MethodName {
	MethodName::try_from(java_string::JavaString::from(name)).expect("valid method name")
}

pub fn mdesc(desc: &str) -> MethodDescriptor {
	MethodDescriptor::try_from(java_string::JavaString::from(desc)).expect("valid method descriptor")
}

pub fn instance_access() -> MethodAccess {
	MethodAccess {
		is_public: true, is_private: false, is_protected: false, is_static: false,
		is_final: false, is_synchronized: false, is_bridge: false, is_varargs: false,
		is_native: false, is_abstract: false, is_strict: false, is_synthetic: false,
	}
}

pub fn static_access() -> MethodAccess {
	MethodAccess { is_static: true, ..instance_access() }
}

pub fn intern_class(ctx: &mut Context, name: &str, origin: ClassOrigin, is_interface: bool, super_class: Option<TypeId>, interfaces: Vec<TypeId>) -> TypeId {
	let ty = ctx.interner_mut().intern_type(TypeKey::object(obj(name)));
	let access = ClassAccess { is_interface, ..ClassAccess::default() };
	ctx.add_class(ClassDef::new(ty, origin, access, super_class, interfaces));
	ty
}

/// Adds a method declared `(name)()V` with an empty `return` body (no-op placeholder; tests that
/// need a specific body replace it after calling this).
pub fn add_method(ctx: &mut Context, holder: TypeId, name: &str, access: MethodAccess) -> MethodId {
	let key = MethodKey { holder, name: mname(name), desc: mdesc("()V") };
	let id = ctx.interner_mut().intern_method(key);
	let mut def = MethodDef::new(id, access, InitializerFlavor::None);
	let mut body = Body::new();
	body.block_mut(body.entry).terminator = ir::block::Terminator::Return(None);
	def.set_code(CodeBody::Ssa(body));
	ctx.add_method(def);
	id
}

pub fn set_body(ctx: &mut Context, method: MethodId, body: Body) {
	ctx.method_mut(method).expect("method must exist").set_code(CodeBody::Ssa(body));
}
