//! Virtual dispatch enumeration (§4.B): given a resolved method, work out every concrete runtime
//! target a virtual/interface invocation against it might reach.

use app_model::Context;
use app_model::interning::{MethodId, TypeId};
use crate::result::{AccessOverride, DispatchTarget, LookupResult};

/// Enumerates the instantiated subclasses and lambda instances of a type. The enqueuer's liveness
/// state is the only thing that knows this at any point during the fixed-point computation, so
/// dispatch enumeration is parameterized over it rather than depending on the enqueuer crate.
pub trait InstantiatedSubtypeOracle {
	/// Instantiated subclasses (including `ty` itself, if instantiated) of `ty`, in a stable order.
	fn instantiated_subclasses(&self, ctx: &Context, ty: TypeId) -> Vec<TypeId>;

	/// Lambda instances whose functional interface is `ty`, as `(implemented_interfaces,
	/// implementation_method)` pairs.
	fn lambda_instances(&self, ty: TypeId) -> Vec<(Vec<TypeId>, MethodId)>;

	/// Whether this oracle's enumeration of `ty`'s instantiated subclasses is known to be complete
	/// (false once reflection or an open-world classpath could hide further subtypes).
	fn subtypes_known_complete(&self, ty: TypeId) -> bool;
}

/// Whether a class or method must be treated as though unknown code could override/replace it.
pub trait PinnedPredicate {
	fn class_is_pinned(&self, ty: TypeId) -> bool;
	fn method_is_pinned(&self, method: MethodId) -> bool;
}

fn same_package(a: &app_model::interning::TypeKey, b: &app_model::interning::TypeKey) -> bool {
	use app_model::interning::BaseType;
	match (&a.base, &b.base) {
		(BaseType::Object(x), BaseType::Object(y)) => package_of(x) == package_of(y),
		_ => false,
	}
}

fn package_of(class: &duke::tree::class::ObjClassName) -> String {
	let s = class.to_string();
	match s.rfind('/') {
		Some(i) => s[..i].to_string(),
		None => String::new(),
	}
}

/// Finds a class-declared method matching `(name, desc)` at `candidate_holder`.
fn declared_at(ctx: &Context, candidate_holder: TypeId, name: &duke::tree::method::MethodName, desc: &duke::tree::method::MethodDescriptor) -> Option<MethodId> {
	let key = app_model::interning::MethodKey { holder: candidate_holder, name: name.clone(), desc: desc.clone() };
	ctx.interner().find_method(&key)
}

fn overrides(ctx: &Context, resolved_access: &duke::tree::method::MethodAccess, resolved_holder: TypeId, candidate_holder: TypeId) -> bool {
	if resolved_access.is_public || resolved_access.is_protected {
		return true;
	}
	// package-private: only overridden by a same-package candidate.
	same_package(ctx.interner().type_key(resolved_holder), ctx.interner().type_key(candidate_holder))
}

/// Walks up from `receiver` looking for a class-declared override of the resolved method, or (for
/// an interface holder) the maximally-specific default among the receiver's super-interfaces.
fn single_receiver_lookup(ctx: &Context, receiver: TypeId, resolved_holder: TypeId, resolved_method: MethodId) -> Option<DispatchTarget> {
	let method_def = ctx.method(resolved_method)?;
	let key = ctx.interner().method_key(resolved_method).clone();

	let mut package_private_candidate = None;
	for class in std::iter::once(receiver).chain(ctx.superclasses(receiver)) {
		if let Some(found) = declared_at(ctx, class, &key.name, &key.desc) {
			if overrides(ctx, &method_def.access, resolved_holder, class) {
				let access_override = package_private_candidate.map(|candidate| AccessOverride {
					package_private_candidate: candidate,
					widening_override: found,
				});
				return Some(DispatchTarget::Method { holder: class, method: found, access_override });
			} else if package_private_candidate.is_none() {
				package_private_candidate = Some(found);
			}
		}
	}

	if let Some(def) = ctx.class_definition_of(resolved_holder) {
		if def.is_interface() {
			let candidates = crate::resolve::maximally_specific_default(ctx, receiver, &key.name, &key.desc);
			if let Some((holder, method)) = candidates {
				return Some(DispatchTarget::Method { holder, method, access_override: None });
			}
		}
	}

	None
}

/// The virtual dispatch enumeration algorithm (§4.B).
pub fn enumerate_virtual_dispatch(
	ctx: &Context,
	resolved_holder: TypeId,
	resolved_method: MethodId,
	oracle: &impl InstantiatedSubtypeOracle,
	pinned: &impl PinnedPredicate,
) -> LookupResult {
	let Some(method_def) = ctx.method(resolved_method) else {
		return LookupResult::empty(true);
	};

	if method_def.access.is_private {
		let incomplete = pinned.class_is_pinned(resolved_holder) && pinned.method_is_pinned(resolved_method);
		return LookupResult {
			targets: vec![DispatchTarget::Method { holder: resolved_holder, method: resolved_method, access_override: None }],
			complete: !incomplete,
		};
	}

	let mut targets = Vec::new();
	let mut complete = true;

	for subclass in oracle.instantiated_subclasses(ctx, resolved_holder) {
		if pinned.class_is_pinned(subclass) {
			complete = false;
		}
		if let Some(target) = single_receiver_lookup(ctx, subclass, resolved_holder, resolved_method) {
			if let DispatchTarget::Method { holder, method, .. } = &target {
				if pinned.class_is_pinned(*holder) || pinned.method_is_pinned(*method) {
					complete = false;
				}
			}
			targets.push(target);
		}
		if !oracle.subtypes_known_complete(subclass) {
			complete = false;
		}
	}

	for (interfaces, implementation) in oracle.lambda_instances(resolved_holder) {
		let key = ctx.interner().method_key(resolved_method).clone();
		let direct_match = ctx.method(implementation)
			.map(|impl_def| !impl_def.is_abstract())
			.unwrap_or(false);
		if direct_match {
			targets.push(DispatchTarget::Lambda { descriptor: resolved_method, implementation });
		} else {
			for iface in interfaces {
				if let Some((_, method)) = crate::resolve::maximally_specific_default(ctx, iface, &key.name, &key.desc) {
					targets.push(DispatchTarget::Lambda { descriptor: resolved_method, implementation: method });
					break;
				}
			}
		}
	}

	if !oracle.subtypes_known_complete(resolved_holder) {
		complete = false;
	}

	LookupResult { targets, complete }
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;
	use app_model::class::{ClassDef, ClassOrigin};
	use app_model::interning::{BaseType, MethodKey, TypeKey};
	use app_model::method::{InitializerFlavor, MethodDef};
	use duke::tree::class::ClassAccess;
	use super::*;

	fn obj(name: &str) -> duke::tree::class::ObjClassName {
		duke::tree::class::ObjClassName::try_from(java_string::JavaString::from(name)).unwrap()
	}

	fn no_access() -> duke::tree::method::MethodAccess {
		duke::tree::method::MethodAccess {
			is_public: false, is_private: false, is_protected: false, is_static: false,
			is_final: false, is_synchronized: false, is_bridge: false, is_varargs: false,
			is_native: false, is_abstract: false, is_strict: false, is_synthetic: false,
		}
	}

	fn declare(ctx: &mut Context, holder: TypeId, n: &str, access: duke::tree::method::MethodAccess) -> MethodId {
		let key = MethodKey {
			holder,
			name: duke::tree::method::MethodName::try_from(java_string::JavaString::from(n)).unwrap(),
			desc: duke::tree::method::MethodDescriptor::try_from(java_string::JavaString::from("()V")).unwrap(),
		};
		let id = ctx.interner_mut().intern_method(key);
		ctx.add_method(MethodDef::new(id, access, InitializerFlavor::None));
		id
	}

	struct NoSubtypes;
	impl InstantiatedSubtypeOracle for NoSubtypes {
		fn instantiated_subclasses(&self, _ctx: &Context, ty: TypeId) -> Vec<TypeId> { vec![ty] }
		fn lambda_instances(&self, _ty: TypeId) -> Vec<(Vec<TypeId>, MethodId)> { vec![] }
		fn subtypes_known_complete(&self, _ty: TypeId) -> bool { true }
	}

	struct NotPinned;
	impl PinnedPredicate for NotPinned {
		fn class_is_pinned(&self, _ty: TypeId) -> bool { false }
		fn method_is_pinned(&self, _method: MethodId) -> bool { false }
	}

	#[test]
	fn private_method_dispatches_only_to_itself() {
		let mut ctx = Context::new();
		let holder = ctx.interner_mut().intern_type(TypeKey { base: BaseType::Object(obj("C")), dimensions: 0 });
		ctx.add_class(ClassDef::new(holder, ClassOrigin::Program, ClassAccess::default(), None, vec![]));
		let private_access = duke::tree::method::MethodAccess { is_private: true, ..no_access() };
		let method = declare(&mut ctx, holder, "secret", private_access);

		let result = enumerate_virtual_dispatch(&ctx, holder, method, &NoSubtypes, &NotPinned);
		assert!(result.complete);
		assert_eq!(result.targets, vec![DispatchTarget::Method { holder, method, access_override: None }]);
	}

	#[test]
	fn public_override_in_subclass_is_the_single_receiver_target() {
		let mut ctx = Context::new();
		let base = ctx.interner_mut().intern_type(TypeKey { base: BaseType::Object(obj("Base")), dimensions: 0 });
		let derived = ctx.interner_mut().intern_type(TypeKey { base: BaseType::Object(obj("Derived")), dimensions: 0 });
		ctx.add_class(ClassDef::new(base, ClassOrigin::Program, ClassAccess::default(), None, vec![]));
		ctx.add_class(ClassDef::new(derived, ClassOrigin::Program, ClassAccess::default(), Some(base), vec![]));

		let public_access = duke::tree::method::MethodAccess { is_public: true, ..no_access() };
		let base_method = declare(&mut ctx, base, "greet", public_access);
		let override_method = declare(&mut ctx, derived, "greet", public_access);

		struct OnlyDerived(TypeId);
		impl InstantiatedSubtypeOracle for OnlyDerived {
			fn instantiated_subclasses(&self, _ctx: &Context, _ty: TypeId) -> Vec<TypeId> { vec![self.0] }
			fn lambda_instances(&self, _ty: TypeId) -> Vec<(Vec<TypeId>, MethodId)> { vec![] }
			fn subtypes_known_complete(&self, _ty: TypeId) -> bool { true }
		}

		let result = enumerate_virtual_dispatch(&ctx, base, base_method, &OnlyDerived(derived), &NotPinned);
		assert!(result.complete);
		assert_eq!(result.targets, vec![DispatchTarget::Method { holder: derived, method: override_method, access_override: None }]);
	}
}
