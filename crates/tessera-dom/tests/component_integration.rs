//! Component Integration Tests
//!
//! Runs components end to end against the in-memory [`Document`] with a
//! [`VirtualTimer`]: lifecycle, debounced updates, event markers, styles,
//! props observation and error handling.
//!
//! Test Categories:
//! - Category 1: Lifecycle and debouncing
//! - Category 2: Event markers
//! - Category 3: Styles, props and children
//! - Category 4: Nested components
//! - Category 5: Errors

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use rstest::{fixture, rstest};
use serde_json::json;
use tessera_core::{
	ComponentRegistry, ConfigError, Event, EventRegistry, Host, Instance, Marker, MarkerBinder,
	Phase, RenderError, Settings, TesseraError, Timer, Value,
};
use tessera_dom::{Document, NodeId, VirtualTimer};

const WINDOW: Duration = Duration::from_millis(60);

struct Page {
	document: Rc<RefCell<Document>>,
	timer: Rc<VirtualTimer>,
	element: NodeId,
}

impl Page {
	fn new(markup: &str) -> Self {
		let mut document = Document::new();
		let body = document.body();
		let element = document.insert_markup(body, markup).unwrap()[0];
		Self {
			document: Rc::new(RefCell::new(document)),
			timer: Rc::new(VirtualTimer::new()),
			element,
		}
	}

	fn shadow_markup(&self, instance: &Instance<Document>) -> String {
		self.document.borrow().inner_markup(instance.root())
	}

	fn find(&self, instance: &Instance<Document>, tag: &str) -> NodeId {
		self.document
			.borrow()
			.find_element(*instance.root(), tag)
			.unwrap()
	}

	fn click(&self, node: NodeId) -> usize {
		Document::dispatch(&self.document, node, &Event::new("click"))
	}

	fn advance(&self, delta: Duration) {
		self.timer.advance(delta).unwrap();
	}
}

fn counter_registry() -> ComponentRegistry {
	let mut registry = ComponentRegistry::new();
	registry
		.register_fn("click-counter", |ctx, _props| {
			let state = ctx.state([("count", 0)]);
			let handle = state.clone();
			ctx.create_event("buttonClick", move |_| {
				handle.update("count", |count| {
					json!(count.and_then(Value::as_i64).unwrap_or(0) + 1)
				});
			});
			let count = state.get_as::<i64>("count").unwrap_or(0);
			Ok(format!(
				"<button click=#buttonClick>Clicked ({count}) times</button>"
			))
		})
		.unwrap();
	registry
}

#[fixture]
fn counter() -> (Page, Instance<Document>) {
	let page = Page::new("<click-counter></click-counter>");
	let instance = counter_registry()
		.instantiate(
			"click-counter",
			Rc::clone(&page.document),
			page.timer.clone(),
			page.element,
		)
		.unwrap();
	(page, instance)
}

// ============================================================================
// Category 1: Lifecycle and debouncing
// ============================================================================

#[rstest]
fn test_connect_renders_after_window(counter: (Page, Instance<Document>)) {
	let (page, instance) = counter;
	assert_eq!(instance.phase(), Phase::Unmounted);

	instance.connect();
	assert_eq!(instance.phase(), Phase::Mounted { first_render: true });
	assert!(instance.has_pending_update());

	page.advance(WINDOW - Duration::from_millis(1));
	assert_eq!(page.shadow_markup(&instance), "");

	page.advance(Duration::from_millis(1));
	assert_eq!(
		page.shadow_markup(&instance),
		"<button>Clicked (0) times</button>"
	);
	assert_eq!(instance.phase(), Phase::Mounted { first_render: false });
	assert_eq!(instance.render_count(), 1);
}

#[rstest]
fn test_connect_twice_is_noop(counter: (Page, Instance<Document>)) {
	let (page, instance) = counter;
	instance.connect();
	instance.connect();
	page.advance(WINDOW);
	assert_eq!(page.timer.pending(), 0);
	assert_eq!(instance.render_count(), 1);
	assert_eq!(page.shadow_markup(&instance), "<button>Clicked (0) times</button>");
}

#[rstest]
fn test_burst_of_sets_renders_once_with_last_value(counter: (Page, Instance<Document>)) {
	let (page, instance) = counter;
	instance.connect();
	page.advance(WINDOW);

	let state = instance.context().state([("count", 0)]);
	state.set("count", 1);
	page.advance(Duration::from_millis(10));
	state.set("count", 2);
	page.advance(WINDOW);

	assert_eq!(instance.render_count(), 2);
	assert_eq!(
		page.shadow_markup(&instance),
		"<button>Clicked (2) times</button>"
	);
}

#[rstest]
fn test_equal_set_does_not_schedule(counter: (Page, Instance<Document>)) {
	let (page, instance) = counter;
	instance.flush().unwrap();

	let state = instance.context().state([("count", 0)]);
	state.set("count", 0);
	assert!(!instance.has_pending_update());
	assert_eq!(page.timer.pending(), 0);
}

#[rstest]
fn test_solid_data_never_schedules() {
	let page = Page::new("<x-notes></x-notes>");
	let instance = Instance::builder()
		.kind("x-notes")
		.host(Rc::clone(&page.document))
		.timer(page.timer.clone())
		.element(page.element)
		.render(|ctx, _| {
			let data = ctx.data([("note", "draft")]);
			Ok(format!("<p>{}</p>", data.get_as::<String>("note").unwrap_or_default()))
		})
		.build()
		.unwrap();
	instance.flush().unwrap();

	let data = instance.context().data([("note", "ignored")]);
	data.set("note", "final");
	assert!(!instance.has_pending_update());
	assert_eq!(page.shadow_markup(&instance), "<p>draft</p>");

	instance.update();
	page.advance(WINDOW);
	assert_eq!(page.shadow_markup(&instance), "<p>final</p>");
}

#[rstest]
fn test_custom_debounce_window() {
	let page = Page::new("<x-slow></x-slow>");
	let instance = Instance::builder()
		.host(Rc::clone(&page.document))
		.timer(page.timer.clone())
		.element(page.element)
		.settings(Settings::default().with_debounce(Duration::from_millis(250)))
		.render(|_, _| Ok("<i>slow</i>".to_string()))
		.build()
		.unwrap();

	instance.connect();
	page.advance(WINDOW);
	assert_eq!(instance.render_count(), 0);
	page.advance(Duration::from_millis(190));
	assert_eq!(instance.render_count(), 1);
}

#[rstest]
fn test_dropped_instance_never_renders(counter: (Page, Instance<Document>)) {
	let (page, instance) = counter;
	instance.connect();
	drop(instance);

	assert_eq!(page.timer.advance(WINDOW).unwrap(), 1);
	let host = page.document.borrow();
	let root = host.shadow_root(page.element).unwrap();
	assert_eq!(host.inner_markup(&root), "");
}

// ============================================================================
// Category 2: Event markers
// ============================================================================

#[rstest]
fn test_click_updates_in_place(counter: (Page, Instance<Document>)) {
	let (page, instance) = counter;
	instance.connect();
	page.advance(WINDOW);
	let button = page.find(&instance, "button");

	assert_eq!(page.click(button), 1);
	assert!(instance.has_pending_update());
	page.advance(WINDOW);

	assert_eq!(page.find(&instance, "button"), button);
	assert_eq!(
		page.shadow_markup(&instance),
		"<button>Clicked (1) times</button>"
	);
	// Re-rendering the same element never stacks listeners.
	assert_eq!(page.document.borrow().listener_count(button), 1);

	page.click(button);
	page.click(button);
	page.advance(WINDOW);
	assert_eq!(
		page.shadow_markup(&instance),
		"<button>Clicked (3) times</button>"
	);
	assert_eq!(page.document.borrow().listener_count(button), 1);
}

#[rstest]
fn test_shared_callback_binds_every_marker() {
	let page = Page::new("<x-pair></x-pair>");
	let clicks = Rc::new(Cell::new(0));
	let counter = Rc::clone(&clicks);
	let instance = Instance::builder()
		.host(Rc::clone(&page.document))
		.timer(page.timer.clone())
		.element(page.element)
		.render(move |ctx, _| {
			let counter = Rc::clone(&counter);
			ctx.create_event("onClick", move |_| counter.set(counter.get() + 1));
			Ok("<button click=#onClick>A</button><button click=#onClick>B</button>".to_string())
		})
		.build()
		.unwrap();
	instance.flush().unwrap();

	let buttons = page.document.borrow().children(instance.root());
	assert_eq!(buttons.len(), 2);
	for button in &buttons {
		assert!(page.document.borrow().attributes(button).is_empty());
		assert_eq!(page.click(*button), 1);
	}
	assert_eq!(clicks.get(), 2);
}

#[rstest]
fn test_callback_resolved_at_dispatch_time() {
	let page = Page::new("<x-late></x-late>");
	let instance = Instance::builder()
		.host(Rc::clone(&page.document))
		.timer(page.timer.clone())
		.element(page.element)
		.render(|_, _| Ok("<button click=#later>Go</button>".to_string()))
		.build()
		.unwrap();
	instance.flush().unwrap();
	let button = page.find(&instance, "button");

	// Unknown callback: the listener fires but nothing happens.
	assert_eq!(page.click(button), 1);

	let fired = Rc::new(Cell::new(false));
	let flag = Rc::clone(&fired);
	instance
		.context()
		.create_event("later", move |_| flag.set(true));
	page.click(button);
	assert!(fired.get());
}

#[rstest]
fn test_input_event_carries_value() {
	let page = Page::new("<x-input></x-input>");
	let instance = Instance::builder()
		.host(Rc::clone(&page.document))
		.timer(page.timer.clone())
		.element(page.element)
		.render(|ctx, _| {
			let state = ctx.state([("nombre", "")]);
			let handle = state.clone();
			ctx.create_event("inputNombre", move |event| {
				handle.set("nombre", event.value.clone().unwrap_or_default());
			});
			let nombre = state.get_as::<String>("nombre").unwrap_or_default();
			Ok(format!(
				"<input input=#inputNombre><p>Hola {nombre}</p>"
			))
		})
		.build()
		.unwrap();
	instance.flush().unwrap();
	let input = page.find(&instance, "input");

	Document::dispatch(
		&page.document,
		input,
		&Event::new("input").with_value("Elias"),
	);
	page.advance(WINDOW);

	assert_eq!(page.find(&instance, "input"), input);
	assert_eq!(page.shadow_markup(&instance), "<input><p>Hola Elias</p>");
}

#[rstest]
fn test_custom_token_prefix() {
	let page = Page::new("<x-custom></x-custom>");
	let instance = Instance::builder()
		.host(Rc::clone(&page.document))
		.timer(page.timer.clone())
		.element(page.element)
		.settings(Settings::default().with_token_prefix("evt"))
		.render(|ctx, _| {
			ctx.create_event("go", |_| {});
			Ok("<a click=#go>go</a>".to_string())
		})
		.build()
		.unwrap();
	instance.flush().unwrap();

	let link = page.find(&instance, "a");
	assert_eq!(page.document.borrow().listener_count(link), 1);
	assert_eq!(page.shadow_markup(&instance), "<a>go</a>");
}

#[rstest]
fn test_marker_in_text_is_skipped() {
	let page = Page::new("<x-palette></x-palette>");
	let instance = Instance::builder()
		.host(Rc::clone(&page.document))
		.timer(page.timer.clone())
		.element(page.element)
		.render(|ctx, _| {
			ctx.create_event("go", |_| {});
			Ok("<p>color=#fff</p><button click=#go>x</button>".to_string())
		})
		.build()
		.unwrap();

	instance.flush().unwrap();

	assert_eq!(
		page.shadow_markup(&instance),
		"<p>bindEvt0</p><button>x</button>"
	);
	let button = page.find(&instance, "button");
	assert_eq!(page.document.borrow().listener_count(button), 1);
	assert_eq!(page.click(button), 1);
}

#[rstest]
fn test_binder_forgets_removed_elements() {
	let mut document = Document::new();
	let body = document.body();
	let button = document
		.insert_markup(body, "<button bindEvt0>x</button>")
		.unwrap()[0];
	let events = EventRegistry::new();
	let markers = vec![Marker {
		attribute: "click".to_string(),
		callback: "go".to_string(),
		token: "bindEvt0".to_string(),
	}];
	let mut binder = MarkerBinder::new();

	let outcome = binder.bind(&mut document, &body, &markers, &events);
	assert_eq!(outcome.attached, 1);
	assert!(binder.is_bound("go", &button));

	document.remove_child(&body, &button);
	let outcome = binder.bind(&mut document, &body, &[], &events);
	assert_eq!(outcome.missing, 0);
	assert!(!binder.is_bound("go", &button));
	assert!(binder.is_empty());
}

// ============================================================================
// Category 3: Styles, props and children
// ============================================================================

#[rstest]
fn test_styles_are_prefixed_in_registration_order() {
	let page = Page::new("<x-styled></x-styled>");
	let instance = Instance::builder()
		.host(Rc::clone(&page.document))
		.timer(page.timer.clone())
		.element(page.element)
		.render(|ctx, _| {
			ctx.add_styles(["a.css", "b.css", "a.css"]);
			ctx.add_style("c.css");
			Ok("<p>styled</p>".to_string())
		})
		.build()
		.unwrap();
	instance.flush().unwrap();

	assert_eq!(instance.context().styles(), vec!["a.css", "b.css", "c.css"]);
	assert_eq!(
		page.shadow_markup(&instance),
		"<link rel=\"stylesheet\" href=\"a.css\">\
		 <link rel=\"stylesheet\" href=\"b.css\">\
		 <link rel=\"stylesheet\" href=\"c.css\">\
		 <p>styled</p>"
	);

	// Re-registering on every render keeps the stylesheet nodes stable.
	let before = page.document.borrow().mutation_count();
	instance.update();
	page.advance(WINDOW);
	assert_eq!(page.document.borrow().mutation_count(), before);
}

#[rstest]
fn test_attribute_change_rerenders_with_new_props() {
	let page = Page::new("<hello-name name=\"Ada\"></hello-name>");
	let mut registry = ComponentRegistry::new();
	registry
		.register_fn("hello-name", |_, props| {
			Ok(format!(
				"<p>Hello {}</p>",
				props.get("name").map_or("stranger", String::as_str)
			))
		})
		.unwrap();
	let instance = registry
		.instantiate(
			"hello-name",
			Rc::clone(&page.document),
			page.timer.clone(),
			page.element,
		)
		.unwrap();
	instance.connect();
	page.advance(WINDOW);
	assert_eq!(page.shadow_markup(&instance), "<p>Hello Ada</p>");
	let paragraph = page.find(&instance, "p");

	page.document
		.borrow_mut()
		.set_attribute(&page.element, "name", "Grace");
	assert!(instance.has_pending_update());
	page.advance(WINDOW);

	assert_eq!(page.shadow_markup(&instance), "<p>Hello Grace</p>");
	assert_eq!(page.find(&instance, "p"), paragraph);

	page.document
		.borrow_mut()
		.remove_attribute(&page.element, "name");
	page.advance(WINDOW);
	assert_eq!(page.shadow_markup(&instance), "<p>Hello stranger</p>");
}

#[rstest]
fn test_children_snapshot_is_frozen() {
	let page = Page::new("<x-card><b>light</b> dom</x-card>");
	let instance = Instance::builder()
		.host(Rc::clone(&page.document))
		.timer(page.timer.clone())
		.element(page.element)
		.render(|ctx, _| Ok(format!("<div class=\"card\">{}</div>", ctx.children())))
		.build()
		.unwrap();
	assert_eq!(instance.context().children(), "<b>light</b> dom");
	instance.flush().unwrap();

	let text = page.document.borrow_mut().create_text("late");
	page.document.borrow_mut().append_child(&page.element, text);
	instance.update();
	page.advance(WINDOW);

	assert_eq!(instance.context().children(), "<b>light</b> dom");
	assert_eq!(
		page.shadow_markup(&instance),
		"<div class=\"card\"><b>light</b> dom</div>"
	);
}

// ============================================================================
// Category 4: Nested components
// ============================================================================

fn nested_registry() -> ComponentRegistry {
	let mut registry = ComponentRegistry::new();
	registry
		.register_fn("x-parent", |ctx, _| {
			let state = ctx.state([("label", "first"), ("show", "yes")]);
			let label = state.get_as::<String>("label").unwrap_or_default();
			if state.get_as::<String>("show").as_deref() == Some("yes") {
				Ok(format!("<section><x-child label=\"{label}\"></x-child></section>"))
			} else {
				Ok("<section><p>hidden</p></section>".to_string())
			}
		})
		.unwrap();
	registry
		.register_fn("x-child", |_, props| {
			Ok(format!(
				"<span>{}</span>",
				props.get("label").map_or("", String::as_str)
			))
		})
		.unwrap();
	registry
}

#[rstest]
fn test_nested_child_is_upgraded_and_observes_parent_props() {
	let page = Page::new("<x-parent></x-parent>");
	let parent = nested_registry()
		.instantiate(
			"x-parent",
			Rc::clone(&page.document),
			page.timer.clone(),
			page.element,
		)
		.unwrap();
	parent.connect();
	page.advance(WINDOW);

	let nested = parent.nested();
	assert_eq!(nested.len(), 1);
	let child = &nested[0];
	let child_element = page.find(&parent, "x-child");
	assert_eq!(child.element(), &child_element);
	assert_eq!(child.phase(), Phase::Mounted { first_render: true });
	assert_eq!(page.shadow_markup(child), "");

	page.advance(WINDOW);
	assert_eq!(page.shadow_markup(child), "<span>first</span>");

	parent.context().state([("label", "")]).set("label", "second");
	page.advance(WINDOW);
	// The parent patched the child's attribute; the child renders one window later.
	assert_eq!(page.find(&parent, "x-child"), child_element);
	assert_eq!(parent.nested().len(), 1);
	assert_eq!(page.shadow_markup(child), "<span>first</span>");
	assert!(child.has_pending_update());

	page.advance(WINDOW);
	assert_eq!(page.shadow_markup(child), "<span>second</span>");
	assert_eq!(parent.render_count(), 2);
	assert_eq!(child.render_count(), 2);
}

#[rstest]
fn test_removed_nested_child_is_released() {
	let page = Page::new("<x-parent></x-parent>");
	let parent = nested_registry()
		.instantiate(
			"x-parent",
			Rc::clone(&page.document),
			page.timer.clone(),
			page.element,
		)
		.unwrap();
	parent.flush().unwrap();
	page.advance(WINDOW);
	assert_eq!(parent.nested().len(), 1);

	parent.context().state([("show", "")]).set("show", "no");
	page.advance(WINDOW);

	assert!(parent.nested().is_empty());
	assert_eq!(
		page.shadow_markup(&parent),
		"<section><p>hidden</p></section>"
	);
}

#[rstest]
fn test_upgrade_instantiates_registered_elements_once() {
	let mut document = Document::new();
	let body = document.body();
	document
		.insert_markup(
			body,
			"<div><click-counter></click-counter></div><p>plain</p><click-counter></click-counter>",
		)
		.unwrap();
	let document = Rc::new(RefCell::new(document));
	let timer = Rc::new(VirtualTimer::new());
	let dyn_timer: Rc<dyn Timer> = timer.clone();
	let registry = counter_registry();

	let instances = registry.upgrade(&document, &dyn_timer, &body).unwrap();
	assert_eq!(instances.len(), 2);
	assert!(instances.iter().all(Instance::has_pending_update));

	// Elements that already host an instance are skipped.
	assert!(registry.upgrade(&document, &dyn_timer, &body).unwrap().is_empty());

	timer.advance(WINDOW).unwrap();
	for instance in &instances {
		assert_eq!(
			document.borrow().inner_markup(instance.root()),
			"<button>Clicked (0) times</button>"
		);
	}
}

// ============================================================================
// Category 5: Errors
// ============================================================================

#[rstest]
fn test_missing_renderer_is_reported_at_build() {
	let page = Page::new("<x-empty></x-empty>");
	let err = Instance::<Document>::builder()
		.host(Rc::clone(&page.document))
		.timer(page.timer.clone())
		.element(page.element)
		.build()
		.unwrap_err();
	assert_eq!(err, ConfigError::MissingRenderer);
}

#[rstest]
#[case::host(ConfigError::MissingHost)]
#[case::timer(ConfigError::MissingTimer)]
#[case::element(ConfigError::MissingElement)]
fn test_missing_collaborator_is_reported_at_build(#[case] expected: ConfigError) {
	let page = Page::new("<x-empty></x-empty>");
	let mut builder = Instance::<Document>::builder().render(|_, _| Ok(String::new()));
	if expected != ConfigError::MissingHost {
		builder = builder.host(Rc::clone(&page.document));
	}
	if expected != ConfigError::MissingTimer {
		builder = builder.timer(page.timer.clone());
	}
	if expected != ConfigError::MissingElement {
		builder = builder.element(page.element);
	}
	assert_eq!(builder.build().unwrap_err(), expected);
}

#[rstest]
fn test_invalid_settings_are_reported_at_build() {
	let page = Page::new("<x-bad></x-bad>");
	let err = Instance::builder()
		.host(Rc::clone(&page.document))
		.timer(page.timer.clone())
		.element(page.element)
		.settings(Settings::default().with_token_prefix("bind evt"))
		.render(|_, _| Ok("<button click=#go>go</button>".to_string()))
		.build()
		.unwrap_err();

	assert!(matches!(err, ConfigError::InvalidSettings(_)));
	assert_eq!(page.document.borrow().shadow_root(page.element), None);
}

#[rstest]
fn test_second_instance_on_same_element_is_rejected(counter: (Page, Instance<Document>)) {
	let (page, instance) = counter;
	let err = counter_registry()
		.instantiate(
			"click-counter",
			Rc::clone(&page.document),
			page.timer.clone(),
			page.element,
		)
		.unwrap_err();

	assert_eq!(err, ConfigError::AlreadyMounted(format!("{:?}", page.element)));
	instance.flush().unwrap();
	assert_eq!(
		page.shadow_markup(&instance),
		"<button>Clicked (0) times</button>"
	);
}

#[rstest]
fn test_unknown_kind() {
	let page = Page::new("<x-unknown></x-unknown>");
	let err = counter_registry()
		.instantiate(
			"x-unknown",
			Rc::clone(&page.document),
			page.timer.clone(),
			page.element,
		)
		.unwrap_err();
	assert_eq!(err, ConfigError::UnknownComponent("x-unknown".to_string()));
}

#[rstest]
fn test_render_error_leaves_tree_untouched() {
	let page = Page::new("<x-fragile></x-fragile>");
	let instance = Instance::builder()
		.host(Rc::clone(&page.document))
		.timer(page.timer.clone())
		.element(page.element)
		.render(|ctx, _| {
			let state = ctx.state([("broken", false)]);
			if state.get_as::<bool>("broken").unwrap_or(false) {
				return Err(RenderError::new("cannot render"));
			}
			Ok("<p>fine</p>".to_string())
		})
		.build()
		.unwrap();
	instance.flush().unwrap();
	let before = page.document.borrow().mutation_count();

	instance.context().state([("broken", false)]).set("broken", true);
	let result = page.timer.advance(WINDOW);

	assert!(matches!(result, Err(TesseraError::Render(_))));
	assert_eq!(page.shadow_markup(&instance), "<p>fine</p>");
	assert_eq!(page.document.borrow().mutation_count(), before);
	assert_eq!(instance.render_count(), 1);
}

#[rstest]
fn test_parse_error_leaves_tree_untouched() {
	let mut document = Document::new().with_strict_parsing(true);
	let body = document.body();
	let element = document.insert_markup(body, "<x-strict></x-strict>").unwrap()[0];
	let document = Rc::new(RefCell::new(document));
	let timer = Rc::new(VirtualTimer::new());

	let instance = Instance::builder()
		.host(Rc::clone(&document))
		.timer(timer.clone())
		.element(element)
		.render(|ctx, _| {
			let state = ctx.state([("close", "")]);
			let close = state.get_as::<String>("close").unwrap_or_default();
			Ok(format!("<p>ok</p>{close}"))
		})
		.build()
		.unwrap();
	instance.flush().unwrap();

	instance.context().state([("close", "")]).set("close", "</div>");
	let result = timer.advance(WINDOW);

	assert!(matches!(result, Err(TesseraError::Host(_))));
	assert_eq!(document.borrow().inner_markup(instance.root()), "<p>ok</p>");
	assert_eq!(instance.phase(), Phase::Mounted { first_render: false });
}
