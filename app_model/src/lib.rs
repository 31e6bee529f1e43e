//! The in-memory program graph: classes, methods, fields, types, and code bodies (§2 component A).
//!
//! Built once from the program/classpath/library inputs and immutable during tracing, except for
//! synthetic items appended through the external interfaces and the IR bodies while being
//! rewritten (§3 "Lifecycle"). There is no hidden global state: everything lives in one
//! [`Context`], passed down by reference, per the "Global state" design note.

pub mod interning;
pub mod class;
pub mod method;
pub mod field;

use indexmap::IndexMap;
use crate::class::ClassDef;
use crate::field::FieldDef;
use crate::interning::{FieldId, Interner, MethodId, TypeId};
use crate::method::MethodDef;

/// The external-interface contract named `AppModel` in the core's collaborator list: a
/// class-definition lookup plus iteration over the program classes. [`Context`] is the concrete
/// implementation the rest of this workspace uses; kept as a trait so the enqueuer/resolver crates
/// depend on the contract, not on `Context`'s internals.
pub trait AppModel {
	fn class_definition_of(&self, ty: TypeId) -> Option<&ClassDef>;
	fn program_classes(&self) -> Box<dyn Iterator<Item = &ClassDef> + '_>;
}

/// The whole program graph: the interning arenas plus every class/method/field definition built
/// from them.
#[derive(Debug, Default)]
pub struct Context {
	interner: Interner,
	classes: IndexMap<TypeId, ClassDef>,
	methods: IndexMap<MethodId, MethodDef>,
	fields: IndexMap<FieldId, FieldDef>,
}

impl Context {
	pub fn new() -> Context {
		Context::default()
	}

	pub fn interner(&self) -> &Interner {
		&self.interner
	}

	pub fn interner_mut(&mut self) -> &mut Interner {
		&mut self.interner
	}

	pub fn add_class(&mut self, def: ClassDef) {
		self.classes.insert(def.ty, def);
	}

	pub fn add_method(&mut self, def: MethodDef) {
		self.methods.insert(def.id, def);
	}

	pub fn add_field(&mut self, def: FieldDef) {
		self.fields.insert(def.id, def);
	}

	pub fn method(&self, id: MethodId) -> Option<&MethodDef> {
		self.methods.get(&id)
	}

	pub fn method_mut(&mut self, id: MethodId) -> Option<&mut MethodDef> {
		self.methods.get_mut(&id)
	}

	pub fn field(&self, id: FieldId) -> Option<&FieldDef> {
		self.fields.get(&id)
	}

	/// All classes in insertion order — the enumeration order later passes (and the output
	/// summary) observe, per §5's determinism guarantee.
	pub fn classes(&self) -> impl Iterator<Item = &ClassDef> {
		self.classes.values()
	}

	/// Walks `ty`'s superclass chain (not including `ty` itself), stopping at the first class
	/// without a known definition or without a superclass.
	pub fn superclasses(&self, ty: TypeId) -> impl Iterator<Item = TypeId> + '_ {
		std::iter::successors(self.class_definition_of(ty).and_then(|c| c.super_class), move |&t| {
			self.class_definition_of(t).and_then(|c| c.super_class)
		})
	}

	/// All superinterfaces reachable from `ty`, including indirect ones (interfaces extending
	/// interfaces), visited at most once each.
	pub fn superinterfaces(&self, ty: TypeId) -> Vec<TypeId> {
		let mut seen = indexmap::IndexSet::new();
		let mut stack: Vec<TypeId> = self.class_definition_of(ty).map(|c| c.interfaces.clone()).unwrap_or_default();
		while let Some(iface) = stack.pop() {
			if seen.insert(iface) {
				if let Some(def) = self.class_definition_of(iface) {
					stack.extend(def.interfaces.iter().copied());
				}
			}
		}
		seen.into_iter().collect()
	}

	/// Whether `sub` is `sup` or a (possibly indirect) sub-type of it, walking both the
	/// superclass chain and all superinterfaces.
	pub fn is_subtype_of(&self, sub: TypeId, sup: TypeId) -> bool {
		if sub == sup {
			return true;
		}
		if self.superclasses(sub).any(|t| t == sup) {
			return true;
		}
		self.superinterfaces(sub).contains(&sup)
	}
}

impl AppModel for Context {
	fn class_definition_of(&self, ty: TypeId) -> Option<&ClassDef> {
		self.classes.get(&ty)
	}

	fn program_classes(&self) -> Box<dyn Iterator<Item = &ClassDef> + '_> {
		Box::new(self.classes.values().filter(|c| c.origin == class::ClassOrigin::Program))
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;
	use duke::tree::class::ClassAccess;
	use crate::class::ClassOrigin;
	use crate::interning::{BaseType, TypeKey};
	use super::*;

	fn obj(name: &str) -> duke::tree::class::ObjClassName {
		duke::tree::class::ObjClassName::try_from(java_string::JavaString::from(name)).unwrap()
	}

	#[test]
	fn subtype_walks_superclass_chain() {
		let mut ctx = Context::new();
		let object = ctx.interner_mut().intern_type(TypeKey::object(obj("java/lang/Object")));
		let base = ctx.interner_mut().intern_type(TypeKey::object(obj("Base")));
		let derived = ctx.interner_mut().intern_type(TypeKey::object(obj("Derived")));

		ctx.add_class(ClassDef::new(object, ClassOrigin::Library, ClassAccess::default(), None, vec![]));
		ctx.add_class(ClassDef::new(base, ClassOrigin::Program, ClassAccess::default(), Some(object), vec![]));
		ctx.add_class(ClassDef::new(derived, ClassOrigin::Program, ClassAccess::default(), Some(base), vec![]));

		assert!(ctx.is_subtype_of(derived, base));
		assert!(ctx.is_subtype_of(derived, object));
		assert!(!ctx.is_subtype_of(base, derived));
		assert_eq!(ctx.superclasses(derived).collect::<Vec<_>>(), vec![base, object]);
	}
}
