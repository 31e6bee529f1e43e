//! The two external-interface contracts the enqueuer drives but does not itself implement (§6):
//! `SyntheticItems` (lambda metafactory / bridge-method style class generation) and
//! `DesugaringCollection` (rewriting a live method's body to remove constructs the core's IR
//! doesn't model directly, e.g. `invokedynamic` string concatenation). Both are traits so a caller
//! can supply a real implementation; the `No*` types here are the identity implementation used
//! when a run has nothing to synthesize or desugar.

use app_model::Context;
use app_model::interning::{FieldId, MethodId, TypeId};

/// Classes/methods/fields a [`SyntheticItems`] round added to the app model this pass, so the
/// enqueuer can seed them into the work-list as though the program had declared them itself.
#[derive(Debug, Default)]
pub struct SynthesizedBatch {
	pub classes: Vec<TypeId>,
	pub methods: Vec<MethodId>,
	pub fields: Vec<FieldId>,
}

impl SynthesizedBatch {
	pub fn is_empty(&self) -> bool {
		self.classes.is_empty() && self.methods.is_empty() && self.fields.is_empty()
	}
}

/// Generates the synthetic classes/methods a live program needs that weren't present in the
/// original input — lambda classes for `invokedynamic` call sites, bridge methods for generic
/// override covariance, and similar. Mutates `ctx` directly since [`Context`] is otherwise
/// immutable during tracing (§3 "Lifecycle").
pub trait SyntheticItems {
	fn synthesize(&mut self, ctx: &mut Context) -> SynthesizedBatch;
}

/// Rewrites a live method's body to remove constructs the core's IR doesn't model directly.
/// Queried once per live method per round; the enqueuer keeps re-polling until every live method
/// reports `false`, since desugaring one method can make another newly reachable.
pub trait DesugaringCollection {
	fn needs_desugaring(&self, ctx: &Context, method: MethodId) -> bool;
	fn desugar(&mut self, ctx: &mut Context, method: MethodId) -> anyhow::Result<()>;
}

/// The identity [`SyntheticItems`] implementation: nothing to add.
#[derive(Debug, Default)]
pub struct NoSyntheticItems;

impl SyntheticItems for NoSyntheticItems {
	fn synthesize(&mut self, _ctx: &mut Context) -> SynthesizedBatch {
		SynthesizedBatch::default()
	}
}

/// The identity [`DesugaringCollection`] implementation: nothing needs desugaring.
#[derive(Debug, Default)]
pub struct NoDesugaring;

impl DesugaringCollection for NoDesugaring {
	fn needs_desugaring(&self, _ctx: &Context, _method: MethodId) -> bool {
		false
	}

	fn desugar(&mut self, _ctx: &mut Context, _method: MethodId) -> anyhow::Result<()> {
		Ok(())
	}
}
