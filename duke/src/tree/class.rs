use std::fmt::{Debug, Display, Formatter};
use anyhow::bail;
use java_string::{JavaStr, JavaString};
use crate::macros::make_string_str_like;
use crate::tree::annotation::Annotation;
use crate::tree::attribute::Attribute;
use crate::tree::field::Field;
use crate::tree::method::{Method, MethodNameAndDesc};
use crate::tree::module::{Module, PackageName};
use crate::tree::record::RecordComponent;
use crate::tree::type_annotation::{TargetInfoClass, TypeAnnotation};
use crate::tree::version::Version;

#[derive(Debug, Clone, PartialEq)]
pub struct ClassFile {
	pub version: Version,
	pub access: ClassAccess,
	pub name: ClassName,
	pub super_class: Option<ClassName>,
	pub interfaces: Vec<ClassName>,

	pub fields: Vec<Field>,
	pub methods: Vec<Method>,

	pub has_deprecated_attribute: bool,
	pub has_synthetic_attribute: bool,

	pub inner_classes: Option<Vec<InnerClass>>,
	pub enclosing_method: Option<EnclosingMethod>,
	pub signature: Option<ClassSignature>,

	pub source_file: Option<JavaString>,
	pub source_debug_extension: Option<JavaString>,

	pub runtime_visible_annotations: Vec<Annotation>,
	pub runtime_invisible_annotations: Vec<Annotation>,
	pub runtime_visible_type_annotations: Vec<TypeAnnotation<TargetInfoClass>>,
	pub runtime_invisible_type_annotations: Vec<TypeAnnotation<TargetInfoClass>>,

	pub module: Option<Module>,
	pub module_packages: Option<Vec<PackageName>>,
	pub module_main_class: Option<ClassName>,

	pub nest_host_class: Option<ClassName>,
	pub nest_members: Option<Vec<ClassName>>,
	pub permitted_subclasses: Option<Vec<ClassName>>,

	pub record_components: Vec<RecordComponent>,

	pub attributes: Vec<Attribute>,
}

impl ClassFile {
	pub fn new(version: Version, access: ClassAccess, name: ClassName, super_class: Option<ClassName>, interfaces: Vec<ClassName>) -> ClassFile {
		ClassFile {
			version,
			access,
			name,
			super_class,
			interfaces,

			fields: Vec::new(),
			methods: Vec::new(),

			has_deprecated_attribute: false,
			has_synthetic_attribute: false,

			inner_classes: None,
			enclosing_method: None,
			signature: None,

			source_file: None,
			source_debug_extension: None,

			runtime_visible_annotations: Vec::new(),
			runtime_invisible_annotations: Vec::new(),
			runtime_visible_type_annotations: Vec::new(),
			runtime_invisible_type_annotations: Vec::new(),

			module: None,
			module_packages: None,
			module_main_class: None,

			nest_host_class: None,
			nest_members: None,
			permitted_subclasses: None,

			record_components: Vec::new(),

			attributes: Vec::new(),
		}
	}

}

/// Represents the access flags a class can have.
///
/// Take a look at the [Java Virtual Machine Specification](https://docs.oracle.com/javase/specs/jvms/se22/html/jvms-4.html#jvms-4.1-200-E.1), for
/// the meanings of these fields, and what combinations are legal and which not.
// TODO: add Default as for all false for other *Access as well (+ document it)
#[derive(Copy, Clone, Default, PartialEq)]
pub struct ClassAccess {
	pub is_public: bool,
	pub is_final: bool,
	pub is_super: bool,
	pub is_interface: bool,
	pub is_abstract: bool,
	pub is_synthetic: bool,
	pub is_annotation: bool,
	pub is_enum: bool,
	pub is_module: bool,
}

impl Debug for ClassAccess {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str("ClassAccess { ")?;
		if self.is_public     { f.write_str("public ")?; }
		if self.is_final      { f.write_str("final ")?; }
		if self.is_super      { f.write_str("super ")?; }
		if self.is_interface  { f.write_str("interface ")?; }
		if self.is_abstract   { f.write_str("abstract ")?; }
		if self.is_synthetic  { f.write_str("synthetic ")?; }
		if self.is_annotation { f.write_str("annotation ")?; }
		if self.is_enum       { f.write_str("enum ")?; }
		if self.is_module     { f.write_str("module ")?; }
		f.write_str("}")
	}
}

/// Interprets an `u16` as the `access_flags` item of the `ClassFile` structure of the Java Virtual Machine Specification.
impl From<u16> for ClassAccess {
	fn from(value: u16) -> Self {
		ClassAccess {
			is_public:     value & 0x0001 != 0,
			is_final:      value & 0x0010 != 0,
			is_super:      value & 0x0020 != 0,
			is_interface:  value & 0x0200 != 0,
			is_abstract:   value & 0x0400 != 0,
			is_synthetic:  value & 0x1000 != 0,
			is_annotation: value & 0x2000 != 0,
			is_enum:       value & 0x4000 != 0,
			is_module:     value & 0x8000 != 0,
		}
	}
}

/// Creates an `u16` according to the `access_flags` item of the `ClassFile` structure of the Java Virtual Machine Specification.
impl From<ClassAccess> for u16 {
	fn from(value: ClassAccess) -> Self {
		(if value.is_public     { 0x0001 } else { 0 }) |
		(if value.is_final      { 0x0010 } else { 0 }) |
		(if value.is_super      { 0x0020 } else { 0 }) |
		(if value.is_interface  { 0x0200 } else { 0 }) |
		(if value.is_abstract   { 0x0400 } else { 0 }) |
		(if value.is_synthetic  { 0x1000 } else { 0 }) |
		(if value.is_annotation { 0x2000 } else { 0 }) |
		(if value.is_enum       { 0x4000 } else { 0 }) |
		(if value.is_module     { 0x8000 } else { 0 })
	}
}

// TODO: make it an error to construct a class name containing "illegal" (see jvm spec) chars, like `;`
// TODO: same goes for the other Name/Desc types
//  (this means removal of the From impls and instead making TryFrom methods...)
make_string_str_like!(
	/// Represents a class name. The class name uses [internal binary names](https://docs.oracle.com/javase/specs/jvms/se22/html/jvms-4.html#jvms-4.2.1),
	/// i.e. with complete path written out and using slashes.
	///
	/// # Examples
	/// The java class `java.lang.Thread` would get:
	/// ```
	/// use duke::tree::class::ClassName;
	/// use java_string::JavaString;
	/// let java_lang_thread: ClassName = JavaString::from("java/lang/Thread").try_into().unwrap();
	/// ```
	/// Note that there's an associated constant holding the name of the `java.lang.Object` class:
	/// ```
	/// # use pretty_assertions::assert_eq;
	/// use duke::tree::class::ClassName;
	/// use java_string::JavaString;
	/// let java_lang_object = ClassName::JAVA_LANG_OBJECT.to_owned();
	/// assert_eq!(java_lang_object, ClassName::try_from(JavaString::from("java/lang/Object")).unwrap());
	/// ```
	pub ClassName(JavaString);
	/// A [`ClassName`] slice.
	pub ClassNameSlice(JavaStr);
	is_valid(s) = if crate::tree::names::is_valid_class_name(s) {
		Ok(())
	} else {
		bail!("invalid class name: must be either array field descriptor; or must consist out of `/` separated non-empty parts, and not contain any of `.`, `;`, `[`")
	};
);

impl ClassName {
	/// A constant holding the class name of `Object`.
	pub const JAVA_LANG_OBJECT: &'static ClassNameSlice = unsafe { ClassNameSlice::from_inner_unchecked(JavaStr::from_str("java/lang/Object")) };

	// TODO: doc, check with JVM spec
	pub fn get_simple_name(&self) -> &JavaStr {
		let s = self.as_inner();
		s.rsplit_once('/')
			.map_or(s, |(_, simple)| simple)
	}
}

impl Display for ClassName {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		Display::fmt(self.as_slice(), f)
	}
}
impl Display for ClassNameSlice {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.as_inner())
	}
}

make_string_str_like!(
	/// Like [`ClassName`], but restricted to array class names, i.e. those starting with `[`.
	pub ArrClassName(JavaString);
	/// An [`ArrClassName`] slice.
	pub ArrClassNameSlice(JavaStr);
	is_valid(s) = if crate::tree::names::is_valid_arr_class_name(s) {
		Ok(())
	} else {
		bail!("invalid array class name: must start with `[`")
	};
);

make_string_str_like!(
	/// Like [`ClassName`], but restricted to object (i.e. non-array) class names.
	///
	/// Useful wherever array classes can't occur, such as for the class a field is declared on.
	pub ObjClassName(JavaString);
	/// An [`ObjClassName`] slice.
	pub ObjClassNameSlice(JavaStr);
	is_valid(s) = if crate::tree::names::is_valid_obj_class_name(s) {
		Ok(())
	} else {
		bail!("invalid object class name: must not start with `[`, and must consist out of `/` separated non-empty parts, not containing any of `.`, `;`, `[`")
	};
);

impl From<ObjClassName> for ClassName {
	fn from(value: ObjClassName) -> Self {
		// SAFETY: every valid object class name is a valid class name.
		unsafe { ClassName::from_inner_unchecked(value.into_inner()) }
	}
}

impl From<ArrClassName> for ClassName {
	fn from(value: ArrClassName) -> Self {
		// SAFETY: every valid array class name is a valid class name.
		unsafe { ClassName::from_inner_unchecked(value.into_inner()) }
	}
}

make_string_str_like!(
	/// Represents a class signature, from a generic such as `Foo<T extends Bar>`.
	pub ClassSignature(JavaString);
	pub ClassSignatureSlice(JavaStr);
	is_valid(__) = Ok(()); // TODO: signature format is even more complicated
);

#[derive(Debug, Clone, PartialEq)]
pub struct InnerClass {
	pub inner_class: ClassName,
	pub outer_class: Option<ClassName>,
	pub inner_name: Option<JavaString>,
	pub flags: InnerClassFlags,
}

#[derive(Copy, Clone, PartialEq)]
pub struct InnerClassFlags {
	pub is_public: bool,
	pub is_private: bool,
	pub is_protected: bool,
	pub is_static: bool,
	pub is_final: bool,
	pub is_interface: bool,
	pub is_abstract: bool,
	pub is_synthetic: bool,
	pub is_annotation: bool,
	pub is_enum: bool,
}

impl Debug for InnerClassFlags {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str("InnerClassFlags { ")?;
		if self.is_public     { f.write_str("public ")?; }
		if self.is_private    { f.write_str("private ")?; }
		if self.is_protected  { f.write_str("protected ")?; }
		if self.is_static     { f.write_str("static ")?; }
		if self.is_final      { f.write_str("final ")?; }
		if self.is_interface  { f.write_str("interface ")?; }
		if self.is_abstract   { f.write_str("abstract ")?; }
		if self.is_synthetic  { f.write_str("synthetic ")?; }
		if self.is_annotation { f.write_str("annotation ")?; }
		if self.is_enum       { f.write_str("enum ")?; }
		f.write_str("}")
	}
}

impl From<u16> for InnerClassFlags {
	fn from(value: u16) -> Self {
		InnerClassFlags {
			is_public:     value & 0x0001 != 0,
			is_private:    value & 0x0002 != 0,
			is_protected:  value & 0x0004 != 0,
			is_static:     value & 0x0008 != 0,
			is_final:      value & 0x0010 != 0,
			is_interface:  value & 0x0200 != 0,
			is_abstract:   value & 0x0400 != 0,
			is_synthetic:  value & 0x1000 != 0,
			is_annotation: value & 0x2000 != 0,
			is_enum:       value & 0x4000 != 0,
		}
	}
}

impl From<InnerClassFlags> for u16 {
	fn from(value: InnerClassFlags) -> Self {
		(if value.is_public     { 0x0001 } else { 0 }) |
		(if value.is_private    { 0x0002 } else { 0 }) |
		(if value.is_protected  { 0x0004 } else { 0 }) |
		(if value.is_static     { 0x0008 } else { 0 }) |
		(if value.is_final      { 0x0010 } else { 0 }) |
		(if value.is_interface  { 0x0200 } else { 0 }) |
		(if value.is_abstract   { 0x0400 } else { 0 }) |
		(if value.is_synthetic  { 0x1000 } else { 0 }) |
		(if value.is_annotation { 0x2000 } else { 0 }) |
		(if value.is_enum       { 0x4000 } else { 0 })
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnclosingMethod {
	pub class: ClassName,
	pub method: Option<MethodNameAndDesc>,
}