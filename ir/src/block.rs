//! Basic blocks and terminators.

use duke::tree::class::ClassName;
use crate::value::{Operand, ValueId};

/// A stable handle to a basic block within one [`crate::body::Body`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BlockId(pub(crate) u32);

/// A catch handler entry: exceptions of `catch_type` (or any, if `None`) reaching this block
/// transfer control to `handler`.
#[derive(Debug, Clone, PartialEq)]
pub struct CatchHandler {
	pub catch_type: Option<ClassName>,
	pub handler: BlockId,
}

/// The single instruction that ends a basic block and determines its successors.
#[derive(Debug, Clone, PartialEq)]
pub enum Terminator {
	Goto(BlockId),
	If {
		cond: Condition,
		then: BlockId,
		els: BlockId,
	},
	/// An `int`-keyed switch. `default` is always present; `cases` pairs a key with its target,
	/// and per the data model is restructured in place by the rewriter (packed/sparse/if-chain)
	/// without changing this representation's meaning.
	Switch {
		scrutinee: ValueId,
		cases: Vec<(i32, BlockId)>,
		default: BlockId,
	},
	Throw(ValueId),
	Return(Option<ValueId>),
	/// Placeholder used only mid-construction/mid-rewrite; never valid in a finished body.
	Unreachable,
}

impl Terminator {
	/// The blocks this terminator may transfer control to, in a fixed order.
	pub fn successors(&self) -> Vec<BlockId> {
		match self {
			Terminator::Goto(b) => vec![*b],
			Terminator::If { then, els, .. } => vec![*then, *els],
			Terminator::Switch { cases, default, .. } => {
				let mut v: Vec<BlockId> = cases.iter().map(|(_, b)| *b).collect();
				v.push(*default);
				v
			}
			Terminator::Throw(_) | Terminator::Return(_) | Terminator::Unreachable => vec![],
		}
	}
}

/// A comparison against zero or between two values, as used by `if`/`if_icmp`/`if_acmp`/`ifnull`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CmpKind {
	Eq, Ne, Lt, Ge, Gt, Le,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
	IntCmpZero(CmpKind, Operand),
	IntCmp(CmpKind, Operand, Operand),
	RefCmp(CmpKind, Operand, Operand),
	RefIsNull(Operand),
	RefIsNonNull(Operand),
}

/// An ordered list of non-terminator instructions (and the phis that logically precede them)
/// followed by exactly one [`Terminator`].
#[derive(Debug, Clone, PartialEq)]
pub struct BasicBlock {
	pub id: BlockId,
	/// Values defined by a phi at the head of this block, in declaration order.
	pub phis: Vec<ValueId>,
	/// Values defined by a regular instruction in this block, in execution order.
	pub instructions: Vec<ValueId>,
	pub terminator: Terminator,
	pub catch_handlers: Vec<CatchHandler>,
	/// Non-owning back-references, populated by [`crate::body::Body::recompute_edges`].
	pub predecessors: Vec<BlockId>,
}

impl BasicBlock {
	pub fn new(id: BlockId) -> BasicBlock {
		BasicBlock {
			id,
			phis: Vec::new(),
			instructions: Vec::new(),
			terminator: Terminator::Unreachable,
			catch_handlers: Vec::new(),
			predecessors: Vec::new(),
		}
	}

	pub fn successors(&self) -> Vec<BlockId> {
		self.terminator.successors()
	}

	/// A block whose only instruction is an unconditional branch: a trivial-goto-collapse candidate.
	pub fn is_trivial_goto(&self) -> bool {
		self.phis.is_empty() && self.instructions.is_empty() && matches!(self.terminator, Terminator::Goto(_))
	}
}
