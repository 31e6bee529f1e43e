//! The interning arenas for type, method and field references.
//!
//! Per the data model, type/method/field references are interned identifiers whose equality is
//! identity: two references to `java/lang/String` are the same [`TypeId`] no matter how many
//! times the name is looked up. This module is the only place that turns a [`duke`] name into a
//! handle; everywhere else compares handles, never names.

use duke::tree::class::{ClassName, ObjClassName};
use duke::tree::field::{FieldDescriptor, FieldName};
use duke::tree::method::{MethodDescriptor, MethodName};
use indexmap::IndexSet;

/// A non-array primitive or object base type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BaseType {
	Boolean, Byte, Char, Short, Int, Long, Float, Double,
	Object(ObjClassName),
}

/// The interned key for a [`TypeId`]: a base type plus an array-dimension count (`0` for a
/// non-array type), matching the data model's "array types decompose into (base, dimensions)".
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeKey {
	pub base: BaseType,
	pub dimensions: u8,
}

impl TypeKey {
	pub fn object(class: ObjClassName) -> TypeKey {
		TypeKey { base: BaseType::Object(class), dimensions: 0 }
	}

	pub fn is_array(&self) -> bool {
		self.dimensions > 0
	}
}

/// A stable, interned handle to a type (class, array, or primitive). Equality is identity.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypeId(u32);

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodKey {
	pub holder: TypeId,
	pub name: MethodName,
	pub desc: MethodDescriptor,
}

/// A stable, interned handle to a (holder, name, descriptor) method reference.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MethodId(u32);

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldKey {
	pub holder: TypeId,
	pub name: FieldName,
	pub desc: FieldDescriptor,
}

/// A stable, interned handle to a (holder, name, descriptor) field reference.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FieldId(u32);

/// The three interning arenas. Owned by the [`crate::Context`]; never exposed for direct mutation
/// outside of `intern_*`, so that a `TypeId`/`MethodId`/`FieldId` obtained from one `Interner` is
/// never accidentally used to index another.
#[derive(Debug, Default)]
pub struct Interner {
	types: IndexSet<TypeKey>,
	methods: IndexSet<MethodKey>,
	fields: IndexSet<FieldKey>,
}

impl Interner {
	pub fn new() -> Interner {
		Interner::default()
	}

	pub fn intern_type(&mut self, key: TypeKey) -> TypeId {
		let (index, _) = self.types.insert_full(key);
		TypeId(index as u32)
	}

	pub fn type_key(&self, id: TypeId) -> &TypeKey {
		&self.types[id.0 as usize]
	}

	pub fn find_type(&self, key: &TypeKey) -> Option<TypeId> {
		self.types.get_index_of(key).map(|i| TypeId(i as u32))
	}

	pub fn intern_method(&mut self, key: MethodKey) -> MethodId {
		let (index, _) = self.methods.insert_full(key);
		MethodId(index as u32)
	}

	pub fn method_key(&self, id: MethodId) -> &MethodKey {
		&self.methods[id.0 as usize]
	}

	pub fn find_method(&self, key: &MethodKey) -> Option<MethodId> {
		self.methods.get_index_of(key).map(|i| MethodId(i as u32))
	}

	pub fn intern_field(&mut self, key: FieldKey) -> FieldId {
		let (index, _) = self.fields.insert_full(key);
		FieldId(index as u32)
	}

	pub fn field_key(&self, id: FieldId) -> &FieldKey {
		&self.fields[id.0 as usize]
	}

	pub fn find_field(&self, key: &FieldKey) -> Option<FieldId> {
		self.fields.get_index_of(key).map(|i| FieldId(i as u32))
	}
}

/// Decomposes a [`ClassName`] (which may be an array class name like `[[Ljava/lang/String;` or
/// a primitive array name like `[I`) into a [`TypeKey`].
pub fn type_key_of_class_name(class: &ClassName) -> anyhow::Result<TypeKey> {
	let s = class.as_slice().as_inner().as_str().ok_or_else(|| anyhow::anyhow!("class name is not valid UTF-8: {class:?}"))?;
	let dimensions = s.chars().take_while(|&c| c == '[').count() as u8;
	let rest = &s[dimensions as usize..];
	let base = match rest.as_bytes().first() {
		Some(b'Z') => BaseType::Boolean,
		Some(b'B') => BaseType::Byte,
		Some(b'C') => BaseType::Char,
		Some(b'S') => BaseType::Short,
		Some(b'I') => BaseType::Int,
		Some(b'J') => BaseType::Long,
		Some(b'F') => BaseType::Float,
		Some(b'D') => BaseType::Double,
		Some(b'L') if rest.ends_with(';') => {
			let inner = &rest[1..rest.len() - 1];
			let obj = ObjClassName::try_from(java_string::JavaString::from(inner))?;
			BaseType::Object(obj)
		}
		_ if dimensions == 0 => {
			let obj = ObjClassName::try_from(java_string::JavaString::from(rest))?;
			BaseType::Object(obj)
		}
		_ => anyhow::bail!("malformed array class name: {class:?}"),
	};
	Ok(TypeKey { base, dimensions })
}
