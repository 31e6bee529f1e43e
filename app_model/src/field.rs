//! Field definitions.

use duke::tree::field::{ConstantValue, FieldAccess};
use crate::interning::FieldId;

#[derive(Debug, Clone)]
pub struct FieldDef {
	pub id: FieldId,
	pub access: FieldAccess,
	pub constant_value: Option<ConstantValue>,
}

impl FieldDef {
	pub fn new(id: FieldId, access: FieldAccess) -> FieldDef {
		FieldDef { id, access, constant_value: None }
	}

	pub fn is_static(&self) -> bool {
		self.access.is_static
	}
}
