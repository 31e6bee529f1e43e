//! The enqueuer (§2 component E, §4.E): the work-list fixed-point computation that starts from the
//! root set and grows the live/instantiated sets until nothing more follows, driving method
//! resolution and virtual dispatch enumeration as it goes.

pub mod app_info;
pub mod external;

use std::collections::VecDeque;
use indexmap::{IndexMap, IndexSet};
use anyhow::Result;
use app_model::{AppModel, Context};
use app_model::class::ClassOrigin;
use app_model::interning::{FieldId, FieldKey, MethodId, MethodKey, TypeId, TypeKey};
use app_model::method::CodeBody;
use duke::tree::class::ClassName;
use duke::tree::field::FieldRef;
use duke::tree::method::MethodRef;
use ir::uses::Reference;
use keep_model::KeepInfoCollection;
use keep_model::keep_info::KeepInfo;
use keep_model::options::Options;
use keep_model::root::{KeepConfiguration, KeepRule, Target};
use resolver::dispatch::{self, InstantiatedSubtypeOracle, PinnedPredicate};
use resolver::resolve;
use resolver::result::{DispatchTarget, ResolutionResult};
use crate::app_info::{AppInfoWithLiveness, MissingReference};
use crate::external::{DesugaringCollection, SyntheticItems};

/// One unit of growth the work-list loop processes. Public so callers can seed the root set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkItem {
	ClassLive(TypeId),
	ClassInstantiated(TypeId),
	MethodLive(MethodId),
	FieldLive(FieldId),
}

type AnalysisHook = Box<dyn FnMut(&Context, &IndexSet<TypeId>, &IndexSet<MethodId>, &IndexSet<TypeId>) -> Vec<WorkItem>>;

/// A reference observed while tracing a method body, converted to an owned value so it outlives
/// the borrow of the body it came from.
enum TracedRef {
	Type(ClassName),
	NewInstance(ClassName),
	Field(FieldRef),
	InvokeStatic(MethodRef),
	InvokeSpecial(MethodRef),
	InvokeVirtual(MethodRef),
	InvokeInterface(MethodRef),
}

fn owned_reference(r: Reference<'_>) -> TracedRef {
	match r {
		Reference::Type(c) => TracedRef::Type(c.clone()),
		Reference::NewInstance(c) => TracedRef::NewInstance(c.clone()),
		Reference::Field(f) => TracedRef::Field(f.clone()),
		Reference::InvokeStatic(m) => TracedRef::InvokeStatic(m.clone()),
		Reference::InvokeSpecial(m) => TracedRef::InvokeSpecial(m.clone()),
		Reference::InvokeVirtual(m) => TracedRef::InvokeVirtual(m.clone()),
		Reference::InvokeInterface(m) => TracedRef::InvokeInterface(m.clone()),
	}
}

fn type_of(ctx: &Context, class: &ClassName) -> Option<TypeId> {
	let key = app_model::interning::type_key_of_class_name(class).ok()?;
	ctx.interner().find_type(&key)
}

/// Lets [`dispatch::enumerate_virtual_dispatch`] see the enqueuer's instantiated-type state without
/// the `resolver` crate depending back on `enqueuer`.
struct LivenessOracle<'a> {
	ctx: &'a Context,
	instantiated: &'a IndexSet<TypeId>,
	open_world: bool,
}

impl InstantiatedSubtypeOracle for LivenessOracle<'_> {
	fn instantiated_subclasses(&self, ctx: &Context, ty: TypeId) -> Vec<TypeId> {
		self.instantiated.iter().copied().filter(|&t| ctx.is_subtype_of(t, ty)).collect()
	}

	/// Lambda instances would need `invokedynamic` bootstrap metadata this minimal core doesn't
	/// model; a caller that needs them supplies them through [`SyntheticItems`] instead, so every
	/// lambda target already exists as an ordinary synthesized class by the time dispatch runs.
	fn lambda_instances(&self, _ty: TypeId) -> Vec<(Vec<TypeId>, MethodId)> {
		Vec::new()
	}

	fn subtypes_known_complete(&self, ty: TypeId) -> bool {
		!self.open_world && matches!(self.ctx.class_definition_of(ty).map(|c| c.origin), Some(ClassOrigin::Program))
	}
}

/// Treats a program entity as pinned once its keep info forbids optimizing it; a classpath/library
/// entity is always pinned, since unknown code elsewhere could subclass or call it.
struct KeepPinned<'a> {
	ctx: &'a Context,
	keep_info: &'a KeepInfoCollection,
}

impl PinnedPredicate for KeepPinned<'_> {
	fn class_is_pinned(&self, ty: TypeId) -> bool {
		match self.ctx.class_definition_of(ty).map(|c| c.origin) {
			Some(ClassOrigin::Program) => !self.keep_info.class_info(ty).may_optimize,
			_ => true,
		}
	}

	fn method_is_pinned(&self, method: MethodId) -> bool {
		!self.keep_info.method_info(method).may_optimize
	}
}

/// The work-list fixed-point driver (§4.E). Owns every piece of bookkeeping state except the app
/// model itself, which every method takes as an explicit `&mut Context` — the same convention the
/// resolver crate uses, so a caller can interleave enqueuer growth with other `Context` access.
pub struct Enqueuer<'cfg, S, D> {
	keep_config: &'cfg KeepConfiguration,
	options: &'cfg Options,
	synthetic: S,
	desugaring: D,

	keep_info: KeepInfoCollection,
	live_classes: IndexSet<TypeId>,
	live_methods: IndexSet<MethodId>,
	live_fields: IndexSet<FieldId>,
	instantiated_classes: IndexSet<TypeId>,
	directly_initialized: IndexSet<TypeId>,
	/// The caller that first discovered each resolved virtual/interface call site, so a later
	/// re-dispatch (`reevaluate_dispatch_sites`) can attribute the graph edge to the real caller
	/// instead of the callee itself.
	virtual_call_sites: IndexMap<(TypeId, MethodId), MethodId>,
	traced_methods: IndexSet<MethodId>,
	graph: app_info::KeptGraph,
	worklist: VecDeque<(WorkItem, Option<MethodId>)>,
	reflective_widening_applied: bool,
	analyses: Vec<AnalysisHook>,
	missing: Vec<MissingReference>,
}

impl<'cfg, S: SyntheticItems, D: DesugaringCollection> Enqueuer<'cfg, S, D> {
	pub fn new(keep_config: &'cfg KeepConfiguration, options: &'cfg Options, synthetic: S, desugaring: D) -> Self {
		Enqueuer {
			keep_config,
			options,
			synthetic,
			desugaring,
			keep_info: KeepInfoCollection::new(),
			live_classes: IndexSet::new(),
			live_methods: IndexSet::new(),
			live_fields: IndexSet::new(),
			instantiated_classes: IndexSet::new(),
			directly_initialized: IndexSet::new(),
			virtual_call_sites: IndexMap::new(),
			traced_methods: IndexSet::new(),
			graph: app_info::KeptGraph::default(),
			worklist: VecDeque::new(),
			reflective_widening_applied: false,
			analyses: Vec::new(),
			missing: Vec::new(),
		}
	}

	/// Seeds the root set. Called once per [`keep_model::root::KeepRule`] before [`Self::run`], and
	/// as many more times as the caller's entry-point discovery (e.g. a `main` method, or a
	/// platform-called lifecycle method) requires.
	pub fn enqueue(&mut self, item: WorkItem) {
		self.worklist.push_back((item, None));
	}

	/// Registers an externally-supplied analysis invoked once per outer fixed-point round
	/// (`invoke_registered_analyses_fixpoint_hook` in §4.E's pseudocode) — a caller-defined
	/// reachability rule that can look at the current live/instantiated sets and contribute more
	/// work items, without the enqueuer needing to know what the rule is.
	pub fn register_analysis(&mut self, f: impl FnMut(&Context, &IndexSet<TypeId>, &IndexSet<MethodId>, &IndexSet<TypeId>) -> Vec<WorkItem> + 'static) {
		self.analyses.push(Box::new(f));
	}

	/// Runs the fixed-point computation per §4.E's pseudocode: drain the work-list, evaluate
	/// conditional rules, poll reflective widening and registered analyses, run one round of
	/// desugaring/synthesis, and repeat until none of those steps produces anything new.
	pub fn run(mut self, ctx: &mut Context) -> AppInfoWithLiveness {
		for rule in &self.keep_config.unconditional.clone() {
			self.apply_keep_rule(rule);
		}

		loop {
			self.reach_inner_fixed_point(ctx);

			let mut grew = false;
			grew |= self.process_pending_reflective_uses(ctx);
			grew |= self.invoke_registered_analyses_fixpoint_hook(ctx);
			grew |= self.run_desugaring_and_synthesize(ctx);

			if !grew && self.worklist.is_empty() {
				break;
			}
		}

		AppInfoWithLiveness {
			live_classes: self.live_classes,
			live_methods: self.live_methods,
			live_fields: self.live_fields,
			instantiated_classes: self.instantiated_classes,
			keep_info: self.keep_info,
			graph: self.graph,
			missing: self.missing,
		}
	}

	fn reach_inner_fixed_point(&mut self, ctx: &mut Context) {
		while let Some((item, caller)) = self.worklist.pop_front() {
			self.apply(ctx, item, caller);
		}
	}

	fn apply(&mut self, ctx: &mut Context, item: WorkItem, caller: Option<MethodId>) {
		match item {
			WorkItem::ClassLive(ty) => self.mark_class_live(ctx, ty),
			WorkItem::ClassInstantiated(ty) => self.mark_class_instantiated(ctx, ty),
			WorkItem::MethodLive(method) => self.mark_method_live(ctx, method, caller),
			WorkItem::FieldLive(field) => self.mark_field_live(field),
		}
	}

	fn mark_class_live(&mut self, ctx: &mut Context, ty: TypeId) {
		if !self.live_classes.insert(ty) {
			return;
		}
		log::debug!("class live: {:?}", ctx.interner().type_key(ty));
		self.evaluate_conditional_rules_for(ty);

		if ctx.interner().type_key(ty).is_array() {
			return;
		}
		self.initialize_class_chain(ctx, ty);
	}

	fn mark_class_instantiated(&mut self, ctx: &mut Context, ty: TypeId) {
		self.mark_class_live(ctx, ty);
		if !self.instantiated_classes.insert(ty) {
			return;
		}
		log::debug!("class instantiated: {:?}", ctx.interner().type_key(ty));
		self.reevaluate_dispatch_sites(ctx);
	}

	/// JVM class initialization (§4.E "class initialization semantics"): initializing a class first
	/// initializes its superclass, then any superinterface that itself declares a default method
	/// (directly or — since [`app_model::Context::superclasses`]'s interface analogue isn't
	/// transitive through non-default interfaces — indirectly, via that interface's own defaults),
	/// then runs `<clinit>` if present.
	fn initialize_class_chain(&mut self, ctx: &mut Context, ty: TypeId) {
		if !self.directly_initialized.insert(ty) {
			return;
		}
		if let Some(super_ty) = ctx.class_definition_of(ty).and_then(|c| c.super_class) {
			self.initialize_class_chain(ctx, super_ty);
		}
		for iface in self.interfaces_requiring_direct_initialization(ctx, ty) {
			self.initialize_class_chain(ctx, iface);
		}
		if let Some(clinit) = find_clinit(ctx, ty) {
			self.enqueue_internal(WorkItem::MethodLive(clinit), None);
		}
	}

	fn interfaces_requiring_direct_initialization(&self, ctx: &Context, ty: TypeId) -> Vec<TypeId> {
		let Some(def) = ctx.class_definition_of(ty) else { return Vec::new() };
		def.interfaces.iter().copied().filter(|&iface| declares_default_method(ctx, iface)).collect()
	}

	fn mark_method_live(&mut self, ctx: &mut Context, method: MethodId, caller: Option<MethodId>) {
		if let Some(caller) = caller {
			self.graph.record(caller, method);
		}
		self.evaluate_conditional_rules_for_method(method);
		if !self.live_methods.insert(method) {
			return;
		}
		log::debug!("method live: {:?}", ctx.interner().method_key(method));
		if !self.traced_methods.insert(method) {
			return;
		}
		self.trace_method(ctx, method);
	}

	fn mark_field_live(&mut self, field: FieldId) {
		self.live_fields.insert(field);
	}

	fn trace_method(&mut self, ctx: &mut Context, method: MethodId) {
		let Some(method_def) = ctx.method(method) else { return };
		let Some(CodeBody::Ssa(body)) = &method_def.code else {
			// a raw (unbuilt) or abstract/native method has nothing to trace yet.
			return;
		};

		let mut references = Vec::new();
		ir::uses::visit_references(body, |r| references.push(owned_reference(r)));

		let caller_holder = ctx.interner().method_key(method).holder;
		for reference in references {
			self.handle_reference(ctx, method, caller_holder, reference);
		}
	}

	fn handle_reference(&mut self, ctx: &mut Context, caller: MethodId, caller_holder: TypeId, reference: TracedRef) {
		match reference {
			TracedRef::Type(class) => {
				if let Some(ty) = type_of(ctx, &class) {
					self.enqueue_internal(WorkItem::ClassLive(ty), Some(caller));
				}
			}
			TracedRef::NewInstance(class) => {
				if let Some(ty) = type_of(ctx, &class) {
					self.enqueue_internal(WorkItem::ClassInstantiated(ty), Some(caller));
				}
			}
			TracedRef::Field(field_ref) => {
				let key = FieldKey {
					holder: ctx.interner_mut().intern_type(TypeKey::object(field_ref.class.clone())),
					name: field_ref.name.clone(),
					desc: field_ref.desc.clone(),
				};
				if let Some(id) = ctx.interner().find_field(&key) {
					self.enqueue_internal(WorkItem::FieldLive(id), Some(caller));
				}
			}
			TracedRef::InvokeStatic(method_ref) => {
				if let Some(holder) = type_of(ctx, &method_ref.class) {
					let result = resolve::resolve_invoke_static(ctx, holder, &method_ref.name, &method_ref.desc);
					self.enqueue_resolution(caller, result);
				}
			}
			TracedRef::InvokeSpecial(method_ref) => {
				if let Some(holder) = type_of(ctx, &method_ref.class) {
					// the IR's use registry doesn't carry the `invokespecial` super-call flag
					// through to this level; treating every site as a direct (non-`super`) call is
					// exact for constructor chaining and private-method calls, the overwhelming
					// majority of `invokespecial` sites, and conservative-but-imprecise for an
					// explicit `super.foo()` override call.
					let result = resolve::resolve_invoke_special(ctx, caller_holder, holder, &method_ref.name, &method_ref.desc, false);
					self.enqueue_resolution(caller, result);
				}
			}
			TracedRef::InvokeVirtual(method_ref) | TracedRef::InvokeInterface(method_ref) => {
				if let Some(holder) = type_of(ctx, &method_ref.class) {
					let result = resolve::resolve_instance_method(ctx, holder, &method_ref.name, &method_ref.desc);
					if let ResolutionResult::Single { holder: resolved_holder, method: resolved_method, .. } = result {
						if let indexmap::map::Entry::Vacant(entry) = self.virtual_call_sites.entry((resolved_holder, resolved_method)) {
							entry.insert(caller);
							self.dispatch_call_site(ctx, caller, resolved_holder, resolved_method);
						}
					} else {
						self.enqueue_resolution(caller, result);
					}
				}
			}
		}
	}

	/// Unwraps a [`ResolutionResult`], enqueuing every `Single` it (possibly transitively, through
	/// `Multi`) names and recording every failure into `missing` — per the invariant that a
	/// reference which fails to resolve is reported, never silently elided.
	fn enqueue_resolution(&mut self, caller: MethodId, result: ResolutionResult) {
		match result {
			ResolutionResult::Single { method, .. } => self.enqueue_internal(WorkItem::MethodLive(method), Some(caller)),
			ResolutionResult::Multi { primary, library_results, failures } => {
				self.enqueue_resolution(caller, *primary);
				for lib in library_results {
					self.enqueue_resolution(caller, lib);
				}
				for failure in failures {
					self.missing.push(MissingReference { caller, failure });
				}
			}
			ResolutionResult::ArrayClone => {}
			ResolutionResult::Failed(failure) => self.missing.push(MissingReference { caller, failure }),
		}
	}

	fn dispatch_call_site(&mut self, ctx: &mut Context, caller: MethodId, resolved_holder: TypeId, resolved_method: MethodId) {
		let oracle = LivenessOracle { ctx, instantiated: &self.instantiated_classes, open_world: self.options.compatibility_mode };
		let pinned = KeepPinned { ctx, keep_info: &self.keep_info };
		let lookup = dispatch::enumerate_virtual_dispatch(ctx, resolved_holder, resolved_method, &oracle, &pinned);
		for target in lookup.targets {
			match target {
				DispatchTarget::Method { method, .. } => self.enqueue_internal(WorkItem::MethodLive(method), Some(caller)),
				DispatchTarget::Lambda { implementation, .. } => self.enqueue_internal(WorkItem::MethodLive(implementation), Some(caller)),
			}
		}
	}

	/// Re-runs every previously observed virtual/interface call site against the (just grown)
	/// instantiated set, since a newly instantiated subtype can make a previously-unreachable
	/// override reachable. Simpler than tracking which call sites a given type could affect, at the
	/// cost of rescanning every known call site on every instantiation growth.
	fn reevaluate_dispatch_sites(&mut self, ctx: &mut Context) {
		let sites: Vec<_> = self.virtual_call_sites.iter().map(|(&site, &caller)| (site, caller)).collect();
		for ((resolved_holder, resolved_method), caller) in sites {
			self.dispatch_call_site(ctx, caller, resolved_holder, resolved_method);
		}
	}

	fn evaluate_conditional_rules_for(&mut self, antecedent: TypeId) {
		for rule in self.keep_config.consequents_for(antecedent).to_vec() {
			self.apply_keep_rule(&rule);
		}
	}

	/// Conditional rules are indexed by class antecedent only (§4.E); a method/field becoming live
	/// never itself fires one, but its holder already did when it became live.
	fn evaluate_conditional_rules_for_method(&mut self, _method: MethodId) {}

	fn apply_keep_rule(&mut self, rule: &KeepRule) {
		self.keep_info.apply(rule.target, rule.min_keep_info);
		match rule.target {
			Target::Class(ty) => {
				self.enqueue_internal(WorkItem::ClassLive(ty), None);
				if rule.also_instantiate {
					self.enqueue_internal(WorkItem::ClassInstantiated(ty), None);
				}
			}
			Target::Method(method) => self.enqueue_internal(WorkItem::MethodLive(method), None),
			Target::Field(field) => self.enqueue_internal(WorkItem::FieldLive(field), None),
		}
	}

	/// Reflective entry points (§4.E): a call to a recognized reflective-instantiation pattern
	/// (`Class#newInstance`, `Constructor#newInstance`) can construct any class in the program whose
	/// identity isn't visible to static analysis. Without constant-class-literal tracking, the only
	/// sound response is the widened one `compatibility_mode` asks for: once any such call is seen,
	/// treat every program class as a potential instantiation target, mark its default constructor
	/// (the one a no-argument reflective `newInstance()` actually invokes) live, and disallow
	/// optimizing the class away, the same tightening a keep rule with `also_instantiate` would
	/// apply to an explicitly named entry point. Runs at most once.
	fn process_pending_reflective_uses(&mut self, ctx: &mut Context) -> bool {
		if self.reflective_widening_applied || !self.options.compatibility_mode {
			return false;
		}
		let saw_reflective_call = self.live_methods.iter().any(|&m| method_invokes_reflective_constructor(ctx, m));
		if !saw_reflective_call {
			return false;
		}
		self.reflective_widening_applied = true;
		let program_classes: Vec<TypeId> = ctx.program_classes().map(|c| c.ty).collect();
		for ty in program_classes {
			self.enqueue_internal(WorkItem::ClassInstantiated(ty), None);
			if let Some(init) = find_default_init(ctx, ty) {
				self.enqueue_internal(WorkItem::MethodLive(init), None);
			}
			self.keep_info.apply(Target::Class(ty), KeepInfo { may_optimize: false, ..KeepInfo::default() });
		}
		true
	}

	fn invoke_registered_analyses_fixpoint_hook(&mut self, ctx: &mut Context) -> bool {
		let mut analyses = std::mem::take(&mut self.analyses);
		let mut grew = false;
		for analysis in analyses.iter_mut() {
			let items = analysis(ctx, &self.live_classes, &self.live_methods, &self.instantiated_classes);
			for item in items {
				self.enqueue_internal(item, None);
				grew = true;
			}
		}
		self.analyses = analyses;
		grew
	}

	fn run_desugaring_and_synthesize(&mut self, ctx: &mut Context) -> bool {
		let mut grew = false;

		let live_methods: Vec<_> = self.live_methods.iter().copied().collect();
		for method in live_methods {
			if self.desugaring.needs_desugaring(ctx, method) {
				if let Err(err) = self.desugaring.desugar(ctx, method) {
					log::warn!("desugaring failed for {:?}: {err:#}", ctx.interner().method_key(method));
					continue;
				}
				self.traced_methods.shift_remove(&method);
				self.live_methods.shift_remove(&method);
				self.enqueue_internal(WorkItem::MethodLive(method), None);
				grew = true;
			}
		}

		let batch = self.synthetic.synthesize(ctx);
		if !batch.is_empty() {
			grew = true;
			for ty in batch.classes {
				self.enqueue_internal(WorkItem::ClassLive(ty), None);
			}
			for method in batch.methods {
				self.enqueue_internal(WorkItem::MethodLive(method), None);
			}
			for field in batch.fields {
				self.enqueue_internal(WorkItem::FieldLive(field), None);
			}
		}

		grew
	}

	fn enqueue_internal(&mut self, item: WorkItem, caller: Option<MethodId>) {
		self.worklist.push_back((item, caller));
	}
}

fn find_clinit(ctx: &Context, ty: TypeId) -> Option<MethodId> {
	let key = MethodKey { holder: ty, name: duke::tree::method::MethodName::CLINIT.to_owned(), desc: no_arg_void_descriptor() };
	ctx.interner().find_method(&key)
}

/// The class's no-argument instance initializer, if it has one — the constructor a reflective
/// `newInstance()` call actually runs.
fn find_default_init(ctx: &Context, ty: TypeId) -> Option<MethodId> {
	let key = MethodKey { holder: ty, name: duke::tree::method::MethodName::INIT.to_owned(), desc: no_arg_void_descriptor() };
	ctx.interner().find_method(&key)
}

fn no_arg_void_descriptor() -> duke::tree::method::MethodDescriptor {
	duke::tree::method::MethodDescriptor::try_from(java_string::JavaString::from("()V")).expect("valid descriptor")
}

fn declares_default_method(ctx: &Context, iface: TypeId) -> bool {
	ctx.class_definition_of(iface)
		.map(|def| def.virtual_methods.iter().any(|&m| ctx.method(m).map(|d| !d.is_abstract()).unwrap_or(false)))
		.unwrap_or(false)
}

/// Recognizes the handful of JDK reflective-construction call sites this enqueuer treats as
/// reflective entry points, by symbolic name — a purely syntactic heuristic, since this core has no
/// constant-class-literal propagation to resolve the actual target class.
fn method_invokes_reflective_constructor(ctx: &Context, method: MethodId) -> bool {
	let Some(def) = ctx.method(method) else { return false };
	let Some(CodeBody::Ssa(body)) = &def.code else { return false };
	let mut found = false;
	ir::uses::visit_references(body, |r| {
		if let Reference::InvokeVirtual(m) | Reference::InvokeInterface(m) = r {
			let class = m.class.as_slice().as_inner().as_str().unwrap_or_default();
			let name = m.name.as_slice().as_inner().as_str().unwrap_or_default();
			if (class == "java/lang/Class" && name == "newInstance")
				|| (class == "java/lang/reflect/Constructor" && name == "newInstance") {
				found = true;
			}
		}
	});
	found
}

#[cfg(test)]
mod tests {
	use app_model::class::{ClassDef, ClassOrigin};
	use app_model::interning::{BaseType, TypeKey};
	use app_model::method::{CodeBody, InitializerFlavor, MethodDef};
	use duke::tree::class::ClassAccess;
	use duke::tree::method::{MethodAccess, MethodDescriptor, MethodName};
	use ir::block::Terminator;
	use ir::body::Body;
	use ir::ty::{LatticeType, Type};
	use ir::value::{Instr, ValueDef, ValueDefKind};
	use pretty_assertions::assert_eq;
	use super::*;

	fn obj(name: &str) -> duke::tree::class::ObjClassName {
		duke::tree::class::ObjClassName::try_from(java_string::JavaString::from(name)).unwrap()
	}

	fn name(s: &str) -> MethodName {
		MethodName::try_from(java_string::JavaString::from(s)).unwrap()
	}

	fn desc(s: &str) -> MethodDescriptor {
		MethodDescriptor::try_from(java_string::JavaString::from(s)).unwrap()
	}

	fn no_access() -> MethodAccess {
		MethodAccess {
			is_public: true, is_private: false, is_protected: false, is_static: false,
			is_final: false, is_synchronized: false, is_bridge: false, is_varargs: false,
			is_native: false, is_abstract: false, is_strict: false, is_synthetic: false,
		}
	}

	/// A method whose body does nothing but `new Callee(); invokespecial <init>; return` — enough
	/// to exercise instantiation plus a direct (non-virtual) call.
	fn trivial_new_and_return(class: duke::tree::class::ClassName, init_ref: MethodRef) -> Body {
		let mut body = Body::new();
		let instance = body.define(body.entry, ValueDef {
			block: body.entry,
			ty: LatticeType::new(Type::Object { class: class.clone(), array_dimensions: 0 }),
			kind: ValueDefKind::Instr(Instr::New(class)),
		});
		body.define(body.entry, ValueDef {
			block: body.entry,
			ty: LatticeType::new(Type::Boolean),
			kind: ValueDefKind::Instr(Instr::InvokeSpecial(init_ref, ir::value::Operand::Value(instance), vec![], false)),
		});
		body.block_mut(body.entry).terminator = Terminator::Return(None);
		body
	}

	#[test]
	fn instantiating_a_class_initializes_it_and_traces_the_constructor() {
		let mut ctx = Context::new();
		let callee = ctx.interner_mut().intern_type(TypeKey { base: BaseType::Object(obj("Callee")), dimensions: 0 });
		ctx.add_class(ClassDef::new(callee, ClassOrigin::Program, ClassAccess::default(), None, vec![]));

		let init_key = MethodKey { holder: callee, name: MethodName::INIT.to_owned(), desc: desc("()V") };
		let init_id = ctx.interner_mut().intern_method(init_key);
		ctx.add_method(MethodDef::new(init_id, no_access(), InitializerFlavor::InstanceInit));

		let caller = ctx.interner_mut().intern_type(TypeKey { base: BaseType::Object(obj("Caller")), dimensions: 0 });
		ctx.add_class(ClassDef::new(caller, ClassOrigin::Program, ClassAccess::default(), None, vec![]));
		let main_key = MethodKey { holder: caller, name: name("main"), desc: desc("()V") };
		let main_id = ctx.interner_mut().intern_method(main_key);
		let mut main_def = MethodDef::new(main_id, MethodAccess { is_static: true, ..no_access() }, InitializerFlavor::None);

		let class_name: duke::tree::class::ClassName = obj("Callee").into();
		let init_ref = MethodRef { class: class_name.clone(), name: MethodName::INIT.to_owned(), desc: desc("()V") };
		main_def.set_code(CodeBody::Ssa(trivial_new_and_return(class_name, init_ref)));
		ctx.add_method(main_def);

		let keep_config = KeepConfiguration::new();
		let options = Options::default();
		let mut enqueuer = Enqueuer::new(&keep_config, &options, external::NoSyntheticItems, external::NoDesugaring);
		enqueuer.enqueue(WorkItem::MethodLive(main_id));
		let info = enqueuer.run(&mut ctx);

		assert!(info.is_method_live(main_id));
		assert!(info.is_class_live(callee));
		assert!(info.is_instantiated(callee));
		assert!(info.is_method_live(init_id), "the constructor called by invokespecial must be live");
	}

	#[test]
	fn keep_rule_joins_keep_info_and_seeds_liveness() {
		let mut ctx = Context::new();
		let kept = ctx.interner_mut().intern_type(TypeKey { base: BaseType::Object(obj("Kept")), dimensions: 0 });
		ctx.add_class(ClassDef::new(kept, ClassOrigin::Program, ClassAccess::default(), None, vec![]));

		let mut keep_config = KeepConfiguration::new();
		keep_config.add_unconditional(KeepRule { target: Target::Class(kept), min_keep_info: KeepInfo::fully_pinned(), also_instantiate: true });

		let options = Options::default();
		let enqueuer = Enqueuer::new(&keep_config, &options, external::NoSyntheticItems, external::NoDesugaring);
		let info = enqueuer.run(&mut ctx);

		assert!(info.is_class_live(kept));
		assert!(info.is_instantiated(kept));
		assert_eq!(info.keep_info().class_info(kept), KeepInfo::fully_pinned());
	}
}
