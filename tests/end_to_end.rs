//! The six literal end-to-end scenarios of §8, each built directly against the public
//! `app_model`/`keep_model`/`enqueuer`/`ir`/`rewriter` API rather than through any textual format.

mod common;

use app_model::class::ClassOrigin;
use app_model::Context;
use common::*;
use duke::tree::method::MethodRef;
use enqueuer::external::{NoDesugaring, NoSyntheticItems};
use enqueuer::Enqueuer;
use ir::block::{Condition, Terminator};
use ir::body::Body;
use ir::ty::{LatticeType, Nullability, Type};
use ir::value::{ConstValue, Instr, Operand, ValueDef, ValueDefKind};
use keep_model::options::Options;
use keep_model::root::{KeepConfiguration, KeepRule, Target};
use pretty_assertions::assert_eq;

fn new_and_invoke_virtual(class_name: duke::tree::class::ObjClassName, call_holder: duke::tree::class::ObjClassName, call_name: &str) -> Body {
	let class_name: duke::tree::class::ClassName = class_name.into();
	let mut body = Body::new();
	let instance = body.define(body.entry, ValueDef {
		block: body.entry,
		ty: LatticeType::new(Type::Object { class: class_name.clone(), array_dimensions: 0 }),
		kind: ValueDefKind::Instr(Instr::New(class_name)),
	});
	let method_ref = MethodRef { class: call_holder.into(), name: mname(call_name), desc: mdesc("()V") };
	body.define(body.entry, ValueDef {
		block: body.entry,
		ty: LatticeType::new(Type::Boolean),
		kind: ValueDefKind::Instr(Instr::InvokeVirtual(method_ref, Operand::Value(instance), vec![])),
	});
	body.block_mut(body.entry).terminator = Terminator::Return(None);
	body
}

/// Scenario 1: `interface Greeter { default void greet(){} }`, `class Impl implements Greeter`,
/// root keeps `new Impl().greet()`. After trace: `Greeter`, `Impl`, `Greeter.greet` live;
/// `Impl.greet` absent (never declared — the call dispatches to the inherited default).
#[test]
fn interface_default_with_unused_implementor() {
	let mut ctx = Context::new();
	let iface = intern_class(&mut ctx, "scenario1/Greeter", ClassOrigin::Program, true, None, vec![]);
	let default_method = add_method(&mut ctx, iface, "greet", instance_access());
	let impl_class = intern_class(&mut ctx, "scenario1/Impl", ClassOrigin::Program, false, None, vec![iface]);

	let caller = intern_class(&mut ctx, "scenario1/Main", ClassOrigin::Program, false, None, vec![]);
	let main_id = add_method(&mut ctx, caller, "main", static_access());
	set_body(&mut ctx, main_id, new_and_invoke_virtual(obj("scenario1/Impl"), obj("scenario1/Greeter"), "greet"));

	let mut keep_config = KeepConfiguration::new();
	keep_config.add_unconditional(KeepRule::keep(Target::Method(main_id)));
	let options = Options::default();
	let info = Enqueuer::new(&keep_config, &options, NoSyntheticItems, NoDesugaring).run(&mut ctx);

	assert!(info.is_class_live(iface));
	assert!(info.is_class_live(impl_class));
	assert!(info.is_instantiated(impl_class));
	assert!(info.is_method_live(default_method));
	// main + Greeter.greet only; Impl never declares its own greet.
	assert_eq!(info.live_methods().count(), 2);
}

/// Scenario 2: `class Base { void g(){} }`, `class Derived extends Base { void g(){} }`; root
/// keeps a call site invoking `Base.g` on a value whose declared type is `Base`; only `Derived`
/// is instantiated. Live targets: `Derived.g` only.
#[test]
fn virtual_dispatch_narrows_to_the_instantiated_subtype() {
	let mut ctx = Context::new();
	let base = intern_class(&mut ctx, "scenario2/Base", ClassOrigin::Program, false, None, vec![]);
	let base_method = add_method(&mut ctx, base, "g", instance_access());
	let derived = intern_class(&mut ctx, "scenario2/Derived", ClassOrigin::Program, false, Some(base), vec![]);
	let derived_method = add_method(&mut ctx, derived, "g", instance_access());

	let caller = intern_class(&mut ctx, "scenario2/Main", ClassOrigin::Program, false, None, vec![]);
	let main_id = add_method(&mut ctx, caller, "main", static_access());
	set_body(&mut ctx, main_id, new_and_invoke_virtual(obj("scenario2/Derived"), obj("scenario2/Base"), "g"));

	let mut keep_config = KeepConfiguration::new();
	keep_config.add_unconditional(KeepRule::keep(Target::Method(main_id)));
	let options = Options::default();
	let info = Enqueuer::new(&keep_config, &options, NoSyntheticItems, NoDesugaring).run(&mut ctx);

	assert!(!info.is_method_live(base_method), "Base.g is never instantiated and must not be live");
	assert!(info.is_method_live(derived_method));
}

/// Scenario 3: a switch with keys `{1,2,3,100,101,102}` all branching to the same block collapses
/// to a single goto (dead-case elimination + behavioral subsumption).
#[test]
fn switch_with_uniform_targets_collapses_to_a_goto() {
	let mut body = Body::new();
	let target = body.new_block();
	body.block_mut(target).terminator = Terminator::Return(None);

	let scrutinee = body.define(body.entry, ValueDef {
		block: body.entry,
		ty: LatticeType::new(Type::Int),
		kind: ValueDefKind::Instr(Instr::Const(ConstValue::Int(2))),
	});
	body.block_mut(body.entry).terminator = Terminator::Switch {
		scrutinee,
		cases: vec![(1, target), (2, target), (3, target), (100, target), (101, target), (102, target)],
		default: target,
	};
	body.recompute_edges();

	assert!(rewriter::passes::cfg::collapse_uniform_switch(&mut body));
	assert_eq!(body.block(body.entry).terminator, Terminator::Goto(target));
}

/// Scenario 4: `if (x != null)` where `x` is statically known non-null folds to the unconditional
/// true branch; the dead false branch is unlinked.
#[test]
fn constant_if_on_a_known_non_null_value_folds() {
	let mut body = Body::new();
	let then_block = body.new_block();
	let else_block = body.new_block();
	body.block_mut(then_block).terminator = Terminator::Return(None);
	body.block_mut(else_block).terminator = Terminator::Return(None);

	let object_class: duke::tree::class::ClassName = obj("java/lang/Object").into();
	let non_null = body.define(body.entry, ValueDef {
		block: body.entry,
		ty: LatticeType::new(Type::Object { class: object_class.clone(), array_dimensions: 0 }).with_nullability(Nullability::NonNull),
		kind: ValueDefKind::Instr(Instr::New(object_class)),
	});
	body.block_mut(body.entry).terminator = Terminator::If {
		cond: Condition::RefIsNonNull(Operand::Value(non_null)),
		then: then_block,
		els: else_block,
	};
	body.recompute_edges();

	assert!(rewriter::passes::cfg::simplify_branches(&mut body));
	assert_eq!(body.block(body.entry).terminator, Terminator::Goto(then_block));
}

/// Scenario 5 (scoped to the dead-array-store sub-case this workspace's IR can represent — see
/// `rewriter::passes::array_materialize`'s doc comment): `a[0]=1; a[0]=2;` with nothing observing
/// the array in between removes the first, superseded store.
#[test]
fn a_superseded_array_store_is_eliminated() {
	let mut body = Body::new();
	let array_class: duke::tree::class::ClassName = obj("java/lang/Object").into();
	let length = body.define(body.entry, ValueDef {
		block: body.entry,
		ty: LatticeType::new(Type::Int),
		kind: ValueDefKind::Instr(Instr::Const(ConstValue::Int(1))),
	});
	let array = body.define(body.entry, ValueDef {
		block: body.entry,
		ty: LatticeType::new(Type::Object { class: array_class, array_dimensions: 1 }),
		kind: ValueDefKind::Instr(Instr::NewArray(duke::tree::method::code::ArrayType::Int, Operand::Value(length))),
	});
	let index = body.define(body.entry, ValueDef {
		block: body.entry,
		ty: LatticeType::new(Type::Int),
		kind: ValueDefKind::Instr(Instr::Const(ConstValue::Int(0))),
	});
	let first_value = body.define(body.entry, ValueDef {
		block: body.entry,
		ty: LatticeType::new(Type::Int),
		kind: ValueDefKind::Instr(Instr::Const(ConstValue::Int(1))),
	});
	let first_store = body.define(body.entry, ValueDef {
		block: body.entry,
		ty: LatticeType::new(Type::Boolean),
		kind: ValueDefKind::Instr(Instr::ArrayStore(Operand::Value(array), Operand::Value(index), Operand::Value(first_value))),
	});
	let second_value = body.define(body.entry, ValueDef {
		block: body.entry,
		ty: LatticeType::new(Type::Int),
		kind: ValueDefKind::Instr(Instr::Const(ConstValue::Int(2))),
	});
	body.define(body.entry, ValueDef {
		block: body.entry,
		ty: LatticeType::new(Type::Boolean),
		kind: ValueDefKind::Instr(Instr::ArrayStore(Operand::Value(array), Operand::Value(index), Operand::Value(second_value))),
	});
	body.block_mut(body.entry).terminator = Terminator::Return(None);

	assert!(rewriter::passes::array_materialize::run(&mut body));
	assert!(!body.block(body.entry).instructions.contains(&first_store));
}

/// Scenario 6: `Class.forName("X").newInstance()`-style reflective construction, modeled here at
/// the granularity this core actually tracks it (§4.E "Reflective entry points" / §9 open question
/// (b)): any recognized reflective-`newInstance` call site, with `compatibility_mode` on, widens
/// every program class to instantiated, since there is no constant-class-literal propagation to
/// pin down which one the string names.
#[test]
fn reflective_new_instance_widens_every_program_class_in_compatibility_mode() {
	let mut ctx = Context::new();
	let target = intern_class(&mut ctx, "scenario6/Target", ClassOrigin::Program, false, None, vec![]);
	let target_init = add_method(&mut ctx, target, "<init>", instance_access());

	let caller = intern_class(&mut ctx, "scenario6/Main", ClassOrigin::Program, false, None, vec![]);
	let main_id = add_method(&mut ctx, caller, "main", static_access());

	let mut body = Body::new();
	let class_literal = body.define(body.entry, ValueDef {
		block: body.entry,
		ty: LatticeType::new(Type::Object { class: obj("java/lang/Class").into(), array_dimensions: 0 }),
		kind: ValueDefKind::Instr(Instr::Const(ConstValue::Null)),
	});
	let method_ref = MethodRef { class: obj("java/lang/Class").into(), name: mname("newInstance"), desc: mdesc("()Ljava/lang/Object;") };
	body.define(body.entry, ValueDef {
		block: body.entry,
		ty: LatticeType::new(Type::Object { class: obj("java/lang/Object").into(), array_dimensions: 0 }),
		kind: ValueDefKind::Instr(Instr::InvokeVirtual(method_ref, Operand::Value(class_literal), vec![])),
	});
	body.block_mut(body.entry).terminator = Terminator::Return(None);
	set_body(&mut ctx, main_id, body);

	let mut keep_config = KeepConfiguration::new();
	keep_config.add_unconditional(KeepRule::keep(Target::Method(main_id)));
	let options = Options { compatibility_mode: true, ..Options::default() };
	let info = Enqueuer::new(&keep_config, &options, NoSyntheticItems, NoDesugaring).run(&mut ctx);

	assert!(info.is_instantiated(target), "compatibility_mode must conservatively widen to every program class");
	assert!(info.is_method_live(target_init), "a reflective no-arg newInstance() runs the default constructor");
	assert!(!info.keep_info().class_info(target).may_optimize, "a reflectively instantiated class must not be optimized away");
}
