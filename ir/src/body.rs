//! The SSA code body: an arena of blocks and an arena of values, plus the dominator tree the
//! rewriter's CSE and narrowing passes walk.

use anyhow::Result;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::algo::dominators;
use crate::block::{BasicBlock, BlockId};
use crate::value::{ValueDef, ValueDefKind, ValueId};

/// One method's code in SSA form: the ordered sequence of basic blocks (§3 "Code body"), each
/// owning its instructions and phis, plus the arena of values they define.
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
	blocks: Vec<BasicBlock>,
	values: Vec<ValueDef>,
	pub entry: BlockId,
}

impl Body {
	/// Creates an empty body with a single, not-yet-terminated entry block.
	pub fn new() -> Body {
		let entry = BlockId(0);
		Body {
			blocks: vec![BasicBlock::new(entry)],
			values: Vec::new(),
			entry,
		}
	}

	pub fn new_block(&mut self) -> BlockId {
		let id = BlockId(self.blocks.len() as u32);
		self.blocks.push(BasicBlock::new(id));
		id
	}

	pub fn block(&self, id: BlockId) -> &BasicBlock {
		&self.blocks[id.0 as usize]
	}

	pub fn block_mut(&mut self, id: BlockId) -> &mut BasicBlock {
		&mut self.blocks[id.0 as usize]
	}

	pub fn blocks(&self) -> impl Iterator<Item = &BasicBlock> {
		self.blocks.iter()
	}

	pub fn block_ids(&self) -> impl Iterator<Item = BlockId> + '_ {
		self.blocks.iter().map(|b| b.id)
	}

	pub fn define(&mut self, block: BlockId, def: ValueDef) -> ValueId {
		let id = ValueId(self.values.len() as u32);
		self.values.push(def);
		match &self.values[id.0 as usize].kind {
			ValueDefKind::Phi(_) => self.block_mut(block).phis.push(id),
			ValueDefKind::Instr(_) | ValueDefKind::Param(_) => self.block_mut(block).instructions.push(id),
		}
		id
	}

	pub fn value(&self, id: ValueId) -> &ValueDef {
		&self.values[id.0 as usize]
	}

	pub fn value_mut(&mut self, id: ValueId) -> &mut ValueDef {
		&mut self.values[id.0 as usize]
	}

	pub fn values(&self) -> impl Iterator<Item = (ValueId, &ValueDef)> {
		self.values.iter().enumerate().map(|(i, v)| (ValueId(i as u32), v))
	}

	/// Removes a block entirely. Used by trivial-goto collapse and dead-branch elimination; callers
	/// must have already redirected every predecessor away from `id` first.
	pub fn remove_block(&mut self, id: BlockId) {
		self.blocks[id.0 as usize].instructions.clear();
		self.blocks[id.0 as usize].phis.clear();
		self.blocks[id.0 as usize].terminator = crate::block::Terminator::Unreachable;
	}

	/// Recomputes each block's `predecessors` list from the current terminators. Must be called
	/// after any pass that changes control flow, before the next dominator computation.
	pub fn recompute_edges(&mut self) {
		for block in &mut self.blocks {
			block.predecessors.clear();
		}
		let succs: Vec<(BlockId, Vec<BlockId>)> = self.blocks.iter()
			.map(|b| (b.id, b.successors()))
			.collect();
		for (from, tos) in succs {
			for to in tos {
				self.blocks[to.0 as usize].predecessors.push(from);
			}
		}
	}

	/// Builds the dominator tree over reachable blocks. `recompute_edges` must have been called
	/// with up-to-date terminators first.
	pub fn dominator_tree(&self) -> Result<DominatorTree> {
		let mut graph = DiGraph::<BlockId, ()>::new();
		let mut nodes = vec![NodeIndex::end(); self.blocks.len()];
		for block in &self.blocks {
			nodes[block.id.0 as usize] = graph.add_node(block.id);
		}
		for block in &self.blocks {
			for succ in block.successors() {
				graph.add_edge(nodes[block.id.0 as usize], nodes[succ.0 as usize], ());
			}
		}
		let entry_node = nodes[self.entry.0 as usize];
		let dom = dominators::simple_fast(&graph, entry_node);

		let mut idom = vec![None; self.blocks.len()];
		let mut children = vec![Vec::new(); self.blocks.len()];
		for block in &self.blocks {
			if block.id == self.entry {
				continue;
			}
			if let Some(parent_node) = dom.immediate_dominator(nodes[block.id.0 as usize]) {
				let parent = graph[parent_node];
				idom[block.id.0 as usize] = Some(parent);
				children[parent.0 as usize].push(block.id);
			}
		}
		Ok(DominatorTree { idom, children })
	}
}

impl Default for Body {
	fn default() -> Body {
		Body::new()
	}
}

/// The dominator tree: for each block (except the entry), its immediate dominator, and for each
/// block, its children in the tree. Built fresh by [`Body::dominator_tree`] whenever a pass needs
/// it — the IR doesn't maintain it incrementally, since most rewriter passes invalidate it anyway.
#[derive(Debug, Clone)]
pub struct DominatorTree {
	idom: Vec<Option<BlockId>>,
	children: Vec<Vec<BlockId>>,
}

impl DominatorTree {
	pub fn immediate_dominator(&self, block: BlockId) -> Option<BlockId> {
		self.idom[block.0 as usize]
	}

	pub fn children(&self, block: BlockId) -> &[BlockId] {
		&self.children[block.0 as usize]
	}

	/// Whether `a` dominates `b` (reflexively: a block dominates itself).
	pub fn dominates(&self, a: BlockId, b: BlockId) -> bool {
		let mut cur = b;
		loop {
			if cur == a {
				return true;
			}
			match self.idom[cur.0 as usize] {
				Some(p) => cur = p,
				None => return false,
			}
		}
	}

	/// Visits the tree in preorder (a block before its dominator-children): the order CSE needs
	/// to see a definition before any block it can legally replace a use in.
	pub fn preorder(&self, root: BlockId) -> Vec<BlockId> {
		let mut out = Vec::new();
		let mut stack = vec![root];
		while let Some(b) = stack.pop() {
			out.push(b);
			for &child in self.children(b).iter().rev() {
				stack.push(child);
			}
		}
		out
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;
	use crate::block::Terminator;
	use super::*;

	/// entry -> (left, right) -> join, a diamond: join's idom is entry, not left or right.
	#[test]
	fn dominator_tree_diamond() {
		let mut body = Body::new();
		let left = body.new_block();
		let right = body.new_block();
		let join = body.new_block();

		body.block_mut(body.entry).terminator = Terminator::If {
			cond: crate::block::Condition::RefIsNull(crate::value::Operand::Value(crate::value::ValueId(0))),
			then: left,
			els: right,
		};
		body.block_mut(left).terminator = Terminator::Goto(join);
		body.block_mut(right).terminator = Terminator::Goto(join);
		body.block_mut(join).terminator = Terminator::Return(None);

		body.recompute_edges();
		let tree = body.dominator_tree().unwrap();

		assert_eq!(tree.immediate_dominator(left), Some(body.entry));
		assert_eq!(tree.immediate_dominator(right), Some(body.entry));
		assert_eq!(tree.immediate_dominator(join), Some(body.entry));
		assert!(tree.dominates(body.entry, join));
		assert!(!tree.dominates(left, join));
	}

	#[test]
	fn trivial_goto_detected() {
		let mut body = Body::new();
		let target = body.new_block();
		body.block_mut(body.entry).terminator = Terminator::Goto(target);
		assert!(body.block(body.entry).is_trivial_goto());
	}
}
