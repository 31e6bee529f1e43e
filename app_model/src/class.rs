//! Class definitions in the app model: one of program / classpath / library, per the data model.

use duke::tree::class::{ClassAccess, EnclosingMethod, InnerClass};
use duke::tree::annotation::Annotation;
use crate::interning::{FieldId, MethodId, TypeId};

/// Which of the three collaborating inputs a class came from. Only `Program` classes are subject
/// to rewriting and emitted (possibly shrunk); `Classpath` classes are referenced but not
/// emitted; `Library` classes are platform classes, kept verbatim and never touched.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ClassOrigin {
	Program,
	Classpath,
	Library,
}

/// A class, interface, or array-pseudo-class in the app model.
///
/// A class exclusively owns its methods and fields (by [`MethodId`]/[`FieldId`], which index
/// into the owning [`crate::Context`]); references to other types are non-owning [`TypeId`]s.
#[derive(Debug, Clone)]
pub struct ClassDef {
	pub ty: TypeId,
	pub origin: ClassOrigin,
	pub access: ClassAccess,
	pub super_class: Option<TypeId>,
	pub interfaces: Vec<TypeId>,

	/// Private/static/initializer methods — never subject to virtual dispatch.
	pub direct_methods: Vec<MethodId>,
	/// Everything else: candidates for virtual/interface dispatch.
	pub virtual_methods: Vec<MethodId>,

	pub static_fields: Vec<FieldId>,
	pub instance_fields: Vec<FieldId>,

	pub nest_host: Option<TypeId>,
	pub nest_members: Vec<TypeId>,
	pub inner_classes: Vec<InnerClass>,
	pub enclosing_method: Option<EnclosingMethod>,

	pub annotations: Vec<Annotation>,
}

impl ClassDef {
	pub fn new(ty: TypeId, origin: ClassOrigin, access: ClassAccess, super_class: Option<TypeId>, interfaces: Vec<TypeId>) -> ClassDef {
		ClassDef {
			ty,
			origin,
			access,
			super_class,
			interfaces,
			direct_methods: Vec::new(),
			virtual_methods: Vec::new(),
			static_fields: Vec::new(),
			instance_fields: Vec::new(),
			nest_host: None,
			nest_members: Vec::new(),
			inner_classes: Vec::new(),
			enclosing_method: None,
			annotations: Vec::new(),
		}
	}

	pub fn is_interface(&self) -> bool {
		self.access.is_interface
	}

	pub fn all_methods(&self) -> impl Iterator<Item = MethodId> + '_ {
		self.direct_methods.iter().copied().chain(self.virtual_methods.iter().copied())
	}
}
