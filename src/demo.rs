//! Worked examples over the public `app_model`/`keep_model`/`enqueuer` API — the kind of thing a
//! real keep-rule file and classpath loader would set up, built by hand here since parsing either
//! is out of scope for the core (§1's Non-goals).

use anyhow::Result;
use clap::ValueEnum;

use app_model::class::{ClassDef, ClassOrigin};
use app_model::interning::TypeKey;
use app_model::method::{CodeBody, InitializerFlavor, MethodDef};
use app_model::Context;
use duke::tree::class::{ClassAccess, ObjClassName};
use duke::tree::method::{MethodAccess, MethodDescriptor, MethodName, MethodRef};
use enqueuer::external::{NoDesugaring, NoSyntheticItems};
use enqueuer::Enqueuer;
use ir::block::Terminator;
use ir::body::Body;
use ir::ty::{LatticeType, Type};
use ir::value::{Instr, Operand, ValueDef, ValueDefKind};
use keep_model::options::Options;
use keep_model::root::{KeepConfiguration, KeepRule, Target};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Scenario {
	/// §8 scenario 1: an interface default method with an implementor that never overrides it.
	InterfaceDefault,
	/// §8 scenario 2: virtual dispatch narrows to the single instantiated override.
	DispatchNarrowing,
}

fn obj(name: &str) -> ObjClassName {
	ObjClassName::try_from(java_string::JavaString::from(name)).expect("valid class name")
}

fn mname(name: &str) -> MethodName {
	MethodName::try_from(java_string::JavaString::from(name)).expect("valid method name")
}

fn mdesc(desc: &str) -> MethodDescriptor {
	MethodDescriptor::try_from(java_string::JavaString::from(desc)).expect("valid method descriptor")
}

fn instance_access() -> MethodAccess {
	MethodAccess {
		is_public: true, is_private: false, is_protected: false, is_static: false,
		is_final: false, is_synchronized: false, is_bridge: false, is_varargs: false,
		is_native: false, is_abstract: false, is_strict: false, is_synthetic: false,
	}
}

fn static_access() -> MethodAccess {
	MethodAccess { is_static: true, ..instance_access() }
}

fn intern_class(ctx: &mut Context, name: &str, origin: ClassOrigin, is_interface: bool, super_class: Option<app_model::interning::TypeId>, interfaces: Vec<app_model::interning::TypeId>) -> app_model::interning::TypeId {
	let ty = ctx.interner_mut().intern_type(TypeKey::object(obj(name)));
	let access = ClassAccess { is_interface, ..ClassAccess::default() };
	ctx.add_class(ClassDef::new(ty, origin, access, super_class, interfaces));
	ty
}

fn add_empty_method(ctx: &mut Context, holder: app_model::interning::TypeId, name: &str, access: MethodAccess) -> app_model::interning::MethodId {
	let key = app_model::interning::MethodKey { holder, name: mname(name), desc: mdesc("()V") };
	let id = ctx.interner_mut().intern_method(key);
	let mut def = MethodDef::new(id, access, InitializerFlavor::None);
	let mut body = Body::new();
	body.block_mut(body.entry).terminator = Terminator::Return(None);
	def.set_code(CodeBody::Ssa(body));
	ctx.add_method(def);
	id
}

/// A method body that does `new <class>(); receiver_decl.<call_name>(instance)`: allocates an
/// instance and immediately invokes a virtual method on it through a symbolic holder that may
/// differ from the instance's concrete class (the declared-type-vs-runtime-type gap scenario 2
/// exercises).
fn new_and_invoke(class_name: ObjClassName, call_holder: ObjClassName, call_name: &str) -> Body {
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

fn run_interface_default() -> Result<()> {
	let mut ctx = Context::new();

	let iface = intern_class(&mut ctx, "demo/Greeter", ClassOrigin::Program, true, None, vec![]);
	let default_method = add_empty_method(&mut ctx, iface, "greet", instance_access());

	let impl_class = intern_class(&mut ctx, "demo/FriendlyGreeter", ClassOrigin::Program, false, None, vec![iface]);

	let caller = intern_class(&mut ctx, "demo/Main", ClassOrigin::Program, false, None, vec![]);
	let main_id = {
		let key = app_model::interning::MethodKey { holder: caller, name: mname("main"), desc: mdesc("()V") };
		let id = ctx.interner_mut().intern_method(key);
		let mut def = MethodDef::new(id, static_access(), InitializerFlavor::None);
		def.set_code(CodeBody::Ssa(new_and_invoke(obj("demo/FriendlyGreeter"), obj("demo/Greeter"), "greet")));
		ctx.add_method(def);
		id
	};

	let mut keep_config = KeepConfiguration::new();
	keep_config.add_unconditional(KeepRule::keep(Target::Method(main_id)));

	let options = Options::default();
	let enqueuer = Enqueuer::new(&keep_config, &options, NoSyntheticItems, NoDesugaring);
	let info = enqueuer.run(&mut ctx);

	log::info!("interface live: {}", info.is_class_live(iface));
	log::info!("implementor live: {}", info.is_class_live(impl_class));
	log::info!("implementor instantiated: {}", info.is_instantiated(impl_class));
	log::info!("default method live: {}", info.is_method_live(default_method));
	log::info!("total live methods: {}", info.live_methods().count());

	Ok(())
}

fn run_dispatch_narrowing() -> Result<()> {
	let mut ctx = Context::new();

	let base = intern_class(&mut ctx, "demo/Base", ClassOrigin::Program, false, None, vec![]);
	let base_method = add_empty_method(&mut ctx, base, "g", instance_access());

	let derived = intern_class(&mut ctx, "demo/Derived", ClassOrigin::Program, false, Some(base), vec![]);
	let derived_method = add_empty_method(&mut ctx, derived, "g", instance_access());

	let caller = intern_class(&mut ctx, "demo/Main", ClassOrigin::Program, false, None, vec![]);
	let main_id = {
		let key = app_model::interning::MethodKey { holder: caller, name: mname("main"), desc: mdesc("()V") };
		let id = ctx.interner_mut().intern_method(key);
		let mut def = MethodDef::new(id, static_access(), InitializerFlavor::None);
		def.set_code(CodeBody::Ssa(new_and_invoke(obj("demo/Derived"), obj("demo/Base"), "g")));
		ctx.add_method(def);
		id
	};

	let mut keep_config = KeepConfiguration::new();
	keep_config.add_unconditional(KeepRule::keep(Target::Method(main_id)));

	let options = Options::default();
	let enqueuer = Enqueuer::new(&keep_config, &options, NoSyntheticItems, NoDesugaring);
	let info = enqueuer.run(&mut ctx);

	log::info!("Base.g live: {}", info.is_method_live(base_method));
	log::info!("Derived.g live: {}", info.is_method_live(derived_method));

	Ok(())
}

pub fn run(scenario: Scenario) -> Result<()> {
	match scenario {
		Scenario::InterfaceDefault => run_interface_default(),
		Scenario::DispatchNarrowing => run_dispatch_narrowing(),
	}
}
