use std::sync::Arc;

use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;
use stately_dispatch::{
	AliasMap, Arity, Class, CollisionKind, DefineError, DispatchError, Extension, GroupSpec, HandlerError, Instance,
	PartitionError, Value, WILDCARD,
};

const AXIS: &str = "action_name";

struct Controller {
	action_name: &'static str,
	defined: bool,
}

impl Controller {
	fn at(action_name: &'static str) -> Self {
		Self {
			action_name,
			defined: false,
		}
	}
}

impl Instance for Controller {
	fn state(&self, axis: &str) -> Option<&str> {
		(axis == AXIS).then_some(self.action_name)
	}

	fn send(&self, name: &str, args: &[Value]) -> Result<Value, HandlerError> {
		match name {
			"defined" if self.defined && args.is_empty() => Ok(json!("defined")),
			_ => Err(HandlerError::undefined(name)),
		}
	}
}

fn init_tracing() {
	let _ = tracing_subscriber::fmt()
		.with_test_writer()
		.with_max_level(tracing::Level::TRACE)
		.try_init();
}

fn crud_groups() -> GroupSpec {
	GroupSpec::new()
		.group("C", ["new", "create"])
		.group("R", ["show", "index"])
		.group("U", ["edit", "update"])
		.group("D", ["destroy"])
}

fn constant(value: Value) -> impl Fn(&Controller, &[Value]) -> Result<Value, HandlerError> + Send + Sync + 'static {
	move |_, _| Ok(value.clone())
}

fn defaults_class(name: &str) -> stately_dispatch::ClassBuilder<Controller> {
	Class::builder(name)
		.define_partition(AXIS, &crud_groups())
		.unwrap()
		.extend_partition(AXIS, Extension::UseDefaults)
		.unwrap()
		.state_method("test", AXIS)
		.unwrap()
}

#[test]
fn undeclared_value_falls_back_to_wildcard() {
	init_tracing();
	let class = defaults_class("Wildcard")
		.on("test", WILDCARD, Arity::exact(0), constant(json!(0)))
		.unwrap()
		.build();

	assert_eq!(class.dispatch(&Controller::at("unknown"), "test", &[]), Ok(json!(0)));
}

#[rstest]
#[case::alias_first(true)]
#[case::group_first(false)]
fn alias_handler_beats_group_handler(#[case] alias_first: bool) {
	init_tracing();
	let mut builder = defaults_class("Specific");
	let registrations = [("show", json!("show!")), ("R", json!("R")), (WILDCARD, json!(0))];
	let ordered: Vec<_> = if alias_first {
		registrations.into_iter().collect()
	} else {
		registrations.into_iter().rev().collect()
	};
	for (key, value) in ordered {
		builder = builder.on("test", key, Arity::exact(0), constant(value)).unwrap();
	}
	let class = builder.build();

	assert_eq!(class.dispatch(&Controller::at("show"), "test", &[]), Ok(json!("show!")));
	assert_eq!(class.dispatch(&Controller::at("index"), "test", &[]), Ok(json!("R")));
	assert_eq!(class.dispatch(&Controller::at("new"), "test", &[]), Ok(json!(0)));
}

#[test]
fn identical_redeclaration_is_a_no_op() {
	init_tracing();
	let browse = || AliasMap::new().alias("browse", ["list", "search"]);
	let builder = Class::<Controller>::builder("Redeclare")
		.define_partition(AXIS, &crud_groups())
		.unwrap()
		.extend_partition(AXIS, browse())
		.unwrap()
		.extend_partition(AXIS, browse())
		.unwrap();

	let redeclared: Vec<&str> = builder
		.partition(AXIS)
		.unwrap()
		.collisions()
		.iter()
		.filter(|c| c.kind == CollisionKind::AliasRedeclared)
		.map(|c| &*c.key)
		.collect();
	assert_eq!(redeclared, vec!["browse"]);

	let err = builder
		.extend_partition(AXIS, AliasMap::new().alias("browse", ["list"]))
		.unwrap_err();
	assert_eq!(
		err,
		DefineError::Partition(PartitionError::CannotOverride {
			alias: "browse".into(),
			existing: vec!["list".into(), "search".into()],
			incoming: vec!["list".into()],
		})
	);
	assert!(err.to_string().contains("browse"));
}

#[test]
fn alias_cannot_claim_a_value_owned_elsewhere() {
	init_tracing();
	let builder = Class::<Controller>::builder("Claim")
		.define_partition(AXIS, &crud_groups())
		.unwrap()
		.extend_partition(AXIS, AliasMap::new().alias("browse", ["list", "search"]))
		.unwrap();

	let err = builder
		.extend_partition(AXIS, AliasMap::new().alias("find", ["search"]))
		.unwrap_err();
	assert_eq!(
		err,
		DefineError::Partition(PartitionError::CannotOverride {
			alias: "search".into(),
			existing: vec!["browse".into()],
			incoming: vec!["find".into()],
		})
	);
	assert!(err.to_string().contains("browse"));
}

#[test]
fn subclass_specific_handler_shadows_only_its_key() {
	init_tracing();
	let superclass = defaults_class("Super")
		.on("test", "R", Arity::exact(0), constant(json!("superclass R")))
		.unwrap()
		.build();
	let subclass = superclass
		.subclass("Sub")
		.on("test", "index", Arity::exact(0), constant(json!("subclass index")))
		.unwrap()
		.build();

	assert_eq!(
		subclass.dispatch(&Controller::at("show"), "test", &[]),
		Ok(json!("superclass R"))
	);
	assert_eq!(
		subclass.dispatch(&Controller::at("index"), "test", &[]),
		Ok(json!("subclass index"))
	);
	assert_eq!(
		superclass.dispatch(&Controller::at("index"), "test", &[]),
		Ok(json!("superclass R"))
	);
}

#[test]
fn arguments_reach_handler_untouched() {
	init_tracing();
	let class = defaults_class("Args")
		.on("test", "index", Arity::at_least(1), |_, args| Ok(Value::Array(args.to_vec())))
		.unwrap()
		.build();
	let controller = Controller::at("index");

	let err = class.dispatch(&controller, "test", &[]).unwrap_err();
	assert_eq!(
		err,
		DispatchError::Handler(HandlerError::Arity {
			given: 0,
			expected: Arity::at_least(1)
		})
	);
	assert!(err.to_string().starts_with("wrong number of arguments"));

	assert_eq!(class.dispatch(&controller, "test", &[json!(0)]), Ok(json!([0])));
	assert_eq!(
		class.dispatch(&controller, "test", &[json!(0), json!("a"), json!(null)]),
		Ok(json!([0, "a", null]))
	);
}

#[test]
fn undefined_name_propagates_unchanged() {
	init_tracing();
	let class = defaults_class("Names")
		.on("test", WILDCARD, Arity::exact(0), |this: &Controller, _| {
			this.send("test1", &[])
		})
		.unwrap()
		.on("test", "show", Arity::exact(0), |this: &Controller, _| {
			this.send("defined", &[])
		})
		.unwrap()
		.build();

	assert_eq!(
		class.dispatch(&Controller::at("index"), "test", &[]),
		Err(DispatchError::Handler(HandlerError::undefined("test1")))
	);

	let controller = Controller {
		action_name: "show",
		defined: true,
	};
	assert_eq!(class.dispatch(&controller, "test", &[]), Ok(json!("defined")));
}

#[test]
fn no_wildcard_means_unresolved() {
	init_tracing();
	let class = defaults_class("Strict")
		.on("test", "R", Arity::exact(0), constant(json!("R")))
		.unwrap()
		.build();

	assert!(matches!(
		class.dispatch(&Controller::at("unknown"), "test", &[]),
		Err(DispatchError::Unresolved { .. })
	));
	assert_eq!(class.try_dispatch(&Controller::at("destroy"), "test", &[]), Ok(None));
}

#[test]
fn classes_dispatch_across_threads() {
	init_tracing();
	let class = defaults_class("Shared")
		.on("test", "R", Arity::exact(0), constant(json!("R")))
		.unwrap()
		.on("test", WILDCARD, Arity::exact(0), constant(json!(0)))
		.unwrap()
		.build();

	let handles: Vec<_> = ["show", "new", "index", "destroy"]
		.into_iter()
		.map(|action| {
			let class = Arc::clone(&class);
			std::thread::spawn(move || class.dispatch(&Controller::at(action), "test", &[]))
		})
		.collect();
	let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

	assert_eq!(
		results,
		vec![Ok(json!("R")), Ok(json!(0)), Ok(json!("R")), Ok(json!(0))]
	);
}
