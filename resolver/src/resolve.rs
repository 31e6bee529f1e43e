//! The method resolution algorithm (§4.B) and the invoke-special/-super, invoke-static and
//! invoke-direct target computations built on top of it.

use app_model::Context;
use app_model::interning::{MethodKey, TypeId};
use app_model::method::InitializerFlavor;
use duke::tree::method::{MethodDescriptor, MethodName};
use crate::result::{ResolutionFailure, ResolutionOrigin, ResolutionResult};

/// The bytecode invocation kind a resolution is performed on behalf of — determines the
/// static-vs-instance tie-break in step 3 of the resolution algorithm.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum InvokeKind {
	Static,
	/// `invokespecial`/`invokevirtual`/`invokeinterface`: any instance invocation.
	Instance,
}

pub(crate) fn declared_method(ctx: &Context, holder: TypeId, name: &MethodName, desc: &MethodDescriptor) -> Option<app_model::interning::MethodId> {
	let key = MethodKey { holder, name: name.clone(), desc: desc.clone() };
	let id = ctx.interner().find_method(&key)?;
	ctx.method(id)?;
	Some(id)
}

fn origin_of(ctx: &Context, holder: TypeId) -> ResolutionOrigin {
	match ctx.class_definition_of(holder).map(|c| c.origin) {
		Some(app_model::class::ClassOrigin::Program) => ResolutionOrigin::Program,
		Some(app_model::class::ClassOrigin::Classpath) => ResolutionOrigin::Classpath,
		_ => ResolutionOrigin::Library,
	}
}

/// Collects every superinterface-declared method matching `name`/`desc` that is a default
/// (non-abstract) or abstract candidate, then keeps only the maximally-specific ones: a
/// candidate is dropped if its declaring interface is a superinterface of another candidate's
/// declaring interface.
pub(crate) fn maximally_specific_candidates(ctx: &Context, start: TypeId, name: &MethodName, desc: &MethodDescriptor) -> Vec<(TypeId, app_model::interning::MethodId)> {
	let mut candidates = Vec::new();
	for iface in ctx.superinterfaces(start) {
		if let Some(id) = declared_method(ctx, iface, name, desc) {
			candidates.push((iface, id));
		}
	}
	let maximal = candidates.clone();
	maximal.into_iter()
		.filter(|(iface, _)| {
			!candidates.iter().any(|(other_iface, _)| other_iface != iface && ctx.is_subtype_of(*other_iface, *iface))
		})
		.collect()
}

/// The single maximally-specific default method among `start`'s superinterfaces (`start` itself
/// included if it directly declares one), per §4.B's interface-holder dispatch step. `None` if
/// there is no match or the match is ambiguous (multiple non-abstract maximally-specific
/// candidates) — dispatch enumeration simply omits a target in that case, since the ambiguity
/// itself is reported separately by [`resolve_instance_method`] when tracing the original
/// invocation.
pub(crate) fn maximally_specific_default(ctx: &Context, start: TypeId, name: &MethodName, desc: &MethodDescriptor) -> Option<(TypeId, app_model::interning::MethodId)> {
	if let Some(id) = declared_method(ctx, start, name, desc) {
		return Some((start, id));
	}
	let candidates = maximally_specific_candidates(ctx, start, name, desc);
	pick_among_candidates(ctx, candidates)
}

/// Steps 1-4 of the resolution algorithm in §4.B.
pub fn resolve_method(ctx: &Context, holder: TypeId, name: &MethodName, desc: &MethodDescriptor, expected: InvokeKind) -> ResolutionResult {
	// Array types never have a `ClassDef`; `clone()` on one is never a single resolution (§8), and
	// no other method is declared directly on an array pseudo-class.
	if ctx.interner().type_key(holder).is_array() {
		return if name.as_slice().as_inner().as_str() == Some("clone") {
			ResolutionResult::ArrayClone
		} else {
			ResolutionResult::Failed(ResolutionFailure::NoSuchMethod { holder })
		};
	}

	let Some(holder_def) = ctx.class_definition_of(holder) else {
		return ResolutionResult::Failed(ResolutionFailure::ClassNotFound(holder));
	};

	// Step 2: search holder and each superclass; for an interface, search directly declared
	// methods then the maximally-specific defaults among superinterfaces. A class holder that
	// declares no matching method anywhere in its superclass chain falls back to the
	// maximally-specific default among its own superinterfaces, mirroring how an un-overridden
	// interface default method is reached through a concrete implementor.
	let found = if holder_def.is_interface() {
		declared_method(ctx, holder, name, desc).map(|id| (holder, id))
			.or_else(|| pick_among_candidates(ctx, maximally_specific_candidates(ctx, holder, name, desc)))
	} else {
		std::iter::once(holder).chain(ctx.superclasses(holder))
			.find_map(|class| declared_method(ctx, class, name, desc).map(|id| (class, id)))
			.or_else(|| pick_among_candidates(ctx, maximally_specific_candidates(ctx, holder, name, desc)))
	};

	let Some((found_holder, method_id)) = found else {
		return ResolutionResult::Failed(ResolutionFailure::NoSuchMethod { holder });
	};

	// Step 3: static-vs-instance tie-break.
	let method_def = ctx.method(method_id).expect("interned method must have a definition");
	let is_static_method = method_def.access.is_static;
	let expects_static = expected == InvokeKind::Static;
	if is_static_method != expects_static {
		return ResolutionResult::Failed(ResolutionFailure::IncompatibleClassChange { contributors: vec![method_id] });
	}

	ResolutionResult::Single { holder: found_holder, method: method_id, origin: origin_of(ctx, found_holder) }
}

/// Resolves the interface-default tie-break: multiple maximally-specific non-abstract defaults
/// fail incompatible-class-change with all contributors; a single non-abstract one wins; if only
/// abstract candidates remain, one is chosen deterministically (first in iteration order).
fn pick_among_candidates(ctx: &Context, candidates: Vec<(TypeId, app_model::interning::MethodId)>) -> Option<(TypeId, app_model::interning::MethodId)> {
	let non_abstract: Vec<_> = candidates.iter()
		.filter(|(_, id)| !ctx.method(*id).map(|m| m.is_abstract()).unwrap_or(true))
		.collect();
	match non_abstract.len() {
		0 => candidates.into_iter().next(),
		1 => Some(*non_abstract[0]),
		_ => None, // caller observes this as NoSuchMethod; see resolve_method_checked for the IncompatibleClassChange-with-contributors variant
	}
}

/// Like [`resolve_method`], but surfaces the "two maximally-specific non-abstract defaults"
/// failure explicitly (§8's boundary behavior), rather than folding it into NoSuchMethod.
pub fn resolve_instance_method(ctx: &Context, holder: TypeId, name: &MethodName, desc: &MethodDescriptor) -> ResolutionResult {
	let declared_in_class_chain = if ctx.class_definition_of(holder).map(|d| d.is_interface()).unwrap_or(false) {
		declared_method(ctx, holder, name, desc).is_some()
	} else {
		std::iter::once(holder).chain(ctx.superclasses(holder)).any(|class| declared_method(ctx, class, name, desc).is_some())
	};
	if !declared_in_class_chain {
		let candidates = maximally_specific_candidates(ctx, holder, name, desc);
		let non_abstract: Vec<_> = candidates.iter()
			.filter(|(_, id)| !ctx.method(*id).map(|m| m.is_abstract()).unwrap_or(true))
			.collect();
		if non_abstract.len() > 1 {
			return ResolutionResult::Failed(ResolutionFailure::IncompatibleClassChange {
				contributors: non_abstract.into_iter().map(|(_, id)| *id).collect(),
			});
		}
	}
	resolve_method(ctx, holder, name, desc, InvokeKind::Instance)
}

/// Invoke-special/-super target (§4.B). `caller_holder` is the invoking method's holder;
/// `symbolic_holder` is the class/interface named at the invocation site; `is_super_call` is
/// whether the symbolic reference is a non-interface superclass of `caller_holder`.
pub fn resolve_invoke_special(ctx: &Context, caller_holder: TypeId, symbolic_holder: TypeId, name: &MethodName, desc: &MethodDescriptor, is_super_call: bool) -> ResolutionResult {
	let is_initializer_name = name.as_slice() == MethodName::INIT || name.as_slice() == MethodName::CLINIT;
	let start = if is_super_call && !is_initializer_name {
		match ctx.class_definition_of(caller_holder).and_then(|c| c.super_class) {
			Some(sup) => sup,
			None => return ResolutionResult::Failed(ResolutionFailure::ClassNotFound(caller_holder)),
		}
	} else {
		symbolic_holder
	};

	let result = resolve_instance_method(ctx, start, name, desc);
	match &result {
		ResolutionResult::Single { holder, method, .. } => {
			let Some(def) = ctx.method(*method) else { return result };
			if def.access.is_static || def.is_abstract() {
				return ResolutionResult::Failed(ResolutionFailure::IncompatibleClassChange { contributors: vec![*method] });
			}
			if def.access.is_private && *holder != symbolic_holder {
				return ResolutionResult::Failed(ResolutionFailure::IllegalAccessOrNoSuchMethod { contributors: vec![*method] });
			}
			if def.initializer != InitializerFlavor::None && *holder != symbolic_holder {
				return ResolutionResult::Failed(ResolutionFailure::IllegalAccessOrNoSuchMethod { contributors: vec![*method] });
			}
			result
		}
		_ => result,
	}
}

/// Invoke-static: succeeds only if the resolved method is static.
pub fn resolve_invoke_static(ctx: &Context, holder: TypeId, name: &MethodName, desc: &MethodDescriptor) -> ResolutionResult {
	resolve_method(ctx, holder, name, desc, InvokeKind::Static)
}

/// Invoke-direct: succeeds only if the resolved method is direct (private or an initializer).
pub fn resolve_invoke_direct(ctx: &Context, holder: TypeId, name: &MethodName, desc: &MethodDescriptor) -> ResolutionResult {
	let result = resolve_instance_method(ctx, holder, name, desc);
	match &result {
		ResolutionResult::Single { method, .. } => {
			let def = ctx.method(*method).expect("interned method must have a definition");
			if def.is_direct() {
				result
			} else {
				ResolutionResult::Failed(ResolutionFailure::IncompatibleClassChange { contributors: vec![*method] })
			}
		}
		_ => result,
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;
	use app_model::class::{ClassDef, ClassOrigin};
	use app_model::interning::{BaseType, TypeKey};
	use app_model::method::{InitializerFlavor, MethodDef};
	use duke::tree::class::ClassAccess;
	use duke::tree::method::MethodAccess;
	use super::*;

	fn obj(name: &str) -> duke::tree::class::ObjClassName {
		duke::tree::class::ObjClassName::try_from(java_string::JavaString::from(name)).unwrap()
	}

	fn name(s: &str) -> MethodName {
		MethodName::try_from(java_string::JavaString::from(s)).unwrap()
	}

	fn desc(s: &str) -> MethodDescriptor {
		MethodDescriptor::try_from(java_string::JavaString::from(s)).unwrap()
	}

	fn no_access() -> MethodAccess {
		MethodAccess {
			is_public: false, is_private: false, is_protected: false, is_static: false,
			is_final: false, is_synchronized: false, is_bridge: false, is_varargs: false,
			is_native: false, is_abstract: false, is_strict: false, is_synthetic: false,
		}
	}

	fn declare(ctx: &mut Context, holder: TypeId, n: &str, d: &str, access: MethodAccess, initializer: InitializerFlavor) -> app_model::interning::MethodId {
		let key = app_model::interning::MethodKey { holder, name: name(n), desc: desc(d) };
		let id = ctx.interner_mut().intern_method(key);
		ctx.add_method(MethodDef::new(id, access, initializer));
		id
	}

	#[test]
	fn array_clone_resolves_to_array_clone() {
		let mut ctx = Context::new();
		let array_ty = ctx.interner_mut().intern_type(TypeKey { base: BaseType::Object(obj("java/lang/String")), dimensions: 1 });

		let result = resolve_method(&ctx, array_ty, &name("clone"), &desc("()Ljava/lang/Object;"), InvokeKind::Instance);
		assert_eq!(result, ResolutionResult::ArrayClone);

		let result = resolve_method(&ctx, array_ty, &name("hashCode"), &desc("()I"), InvokeKind::Instance);
		assert!(matches!(result, ResolutionResult::Failed(ResolutionFailure::NoSuchMethod { .. })));
	}

	#[test]
	fn ambiguous_interface_defaults_fail_incompatible_class_change() {
		let mut ctx = Context::new();
		let ia = ctx.interner_mut().intern_type(TypeKey { base: BaseType::Object(obj("IA")), dimensions: 0 });
		let ib = ctx.interner_mut().intern_type(TypeKey { base: BaseType::Object(obj("IB")), dimensions: 0 });
		let c = ctx.interner_mut().intern_type(TypeKey { base: BaseType::Object(obj("C")), dimensions: 0 });

		let mut iface_access = ClassAccess::default();
		iface_access.is_interface = true;
		ctx.add_class(ClassDef::new(ia, ClassOrigin::Program, iface_access, None, vec![]));
		ctx.add_class(ClassDef::new(ib, ClassOrigin::Program, iface_access, None, vec![]));
		ctx.add_class(ClassDef::new(c, ClassOrigin::Program, ClassAccess::default(), None, vec![ia, ib]));

		let default_access = MethodAccess { is_public: true, ..no_access() };
		let m1 = declare(&mut ctx, ia, "foo", "()V", default_access, InitializerFlavor::None);
		let m2 = declare(&mut ctx, ib, "foo", "()V", default_access, InitializerFlavor::None);

		let result = resolve_instance_method(&ctx, c, &name("foo"), &desc("()V"));
		match result {
			ResolutionResult::Failed(ResolutionFailure::IncompatibleClassChange { mut contributors }) => {
				contributors.sort();
				let mut expected = vec![m1, m2];
				expected.sort();
				assert_eq!(contributors, expected);
			}
			other => panic!("expected IncompatibleClassChange, got {other:?}"),
		}
	}

	#[test]
	fn private_method_resolves_only_at_declaring_class() {
		let mut ctx = Context::new();
		let base = ctx.interner_mut().intern_type(TypeKey { base: BaseType::Object(obj("Base")), dimensions: 0 });
		let derived = ctx.interner_mut().intern_type(TypeKey { base: BaseType::Object(obj("Derived")), dimensions: 0 });
		ctx.add_class(ClassDef::new(base, ClassOrigin::Program, ClassAccess::default(), None, vec![]));
		ctx.add_class(ClassDef::new(derived, ClassOrigin::Program, ClassAccess::default(), Some(base), vec![]));

		let private_access = MethodAccess { is_private: true, ..no_access() };
		let declared = declare(&mut ctx, base, "helper", "()V", private_access, InitializerFlavor::None);

		let result = resolve_instance_method(&ctx, derived, &name("helper"), &desc("()V"));
		assert_eq!(result.single_method(), Some(declared));
	}
}
