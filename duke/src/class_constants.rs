//! Numeric constants defined by the Java Virtual Machine Specification that don't deserve a
//! full enum of their own.

/// Values of the `atype` operand of the `newarray` instruction (JVMS §6.5 `newarray`).
pub mod atype {
	pub const T_BOOLEAN: u8 = 4;
	pub const T_CHAR: u8 = 5;
	pub const T_FLOAT: u8 = 6;
	pub const T_DOUBLE: u8 = 7;
	pub const T_BYTE: u8 = 8;
	pub const T_SHORT: u8 = 9;
	pub const T_INT: u8 = 10;
	pub const T_LONG: u8 = 11;
}
