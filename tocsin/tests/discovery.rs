use std::sync::Arc;
use tocsin::{
    BuildError, Container, Emitter, EventListener, LISTENER_CATEGORY, Strategy, discover,
    testing::CountingListener,
};

mod common;
use common::{DoubleBound, Echo, Journal, Lifecycle, Order, Shipping, StartListener, Stray};

fn discovered(events: &[&'static str], container: &Container<Order>) -> Emitter<Order> {
    Emitter::<Order>::builder(events.iter().copied())
        .strategy(Strategy::ContainerDiscovery)
        .source(container)
        .build()
        .unwrap()
}

#[tokio::test]
async fn method_annotation_binds_one_method() {
    let journal = Journal::new();
    let mut container = Container::new();
    container.register_listener(StartListener {
        journal: journal.clone(),
    });

    let emitter = discovered(&["start", "stop"], &container);
    assert_eq!(emitter.listener_count("start"), 1);
    assert_eq!(emitter.listener_count("stop"), 0);

    emitter.emit_with("start", &Order::new(1)).await.unwrap();
    emitter.emit("stop", None).await.unwrap();

    assert_eq!(journal.entries(), [("on_start", Some(Order::new(1)))]);
}

#[tokio::test]
async fn class_annotation_fans_out_to_every_method() {
    let journal = Journal::new();
    let mut container = Container::new();
    container.register_listener(Lifecycle::new(journal.clone()));

    let emitter = discovered(&["start", "stop"], &container);
    assert_eq!(emitter.listener_count("start"), 2);
    assert_eq!(emitter.listener_count("stop"), 2);

    emitter.emit_with("start", &Order::new(1)).await.unwrap();
    emitter.emit_with("stop", &Order::new(2)).await.unwrap();

    assert_eq!(journal.calls("a"), 2);
    assert_eq!(journal.calls("b"), 2);
    assert_eq!(
        journal.payloads("a"),
        [Some(Order::new(1)), Some(Order::new(2))]
    );
    assert_eq!(
        journal.payloads("b"),
        [Some(Order::new(1)), Some(Order::new(2))]
    );
}

#[tokio::test]
async fn class_fan_out_follows_declaration_order() {
    let journal = Journal::new();
    let mut container = Container::new();
    container.register_listener(Lifecycle::new(journal.clone()));

    let emitter = discovered(&["start", "stop"], &container);
    emitter.emit("start", None).await.unwrap();

    // Both methods finish without suspending, so start order is visible.
    assert_eq!(journal.entries(), [("a", None), ("b", None)]);
}

#[tokio::test]
async fn class_and_method_annotations_bind_a_method_twice() {
    let journal = Journal::new();
    let mut container = Container::new();
    container.register_listener(DoubleBound {
        journal: journal.clone(),
    });

    let emitter = discovered(&["start"], &container);
    assert_eq!(emitter.listener_count("start"), 3);

    emitter.emit_with("start", &Order::new(8)).await.unwrap();

    assert_eq!(journal.calls("double.a"), 2);
    assert_eq!(journal.calls("double.b"), 1);
    assert_eq!(
        journal.entries(),
        [
            ("double.a", Some(Order::new(8))),
            ("double.b", Some(Order::new(8))),
            ("double.a", Some(Order::new(8))),
        ]
    );
}

#[test]
fn helper_methods_are_not_listeners() {
    let echo = Echo::default();
    assert_eq!(EventListener::<Order>::methods(&echo), ["echo", "total"]);
    assert_eq!(echo.scale(3), 6);

    let mut container = Container::new();
    container.register_listener(echo);

    let emitter = discovered(&["start", "stop"], &container);
    assert_eq!(emitter.listener_count("start"), 1);
    assert_eq!(emitter.listener_count("stop"), 1);
}

#[tokio::test]
async fn returned_values_are_ignored() {
    let journal = Journal::new();
    let echo = Echo {
        journal: journal.clone(),
    };
    let mut container = Container::new();
    container.register_listener(echo.clone());

    let emitter = discovered(&["start", "stop"], &container);
    emitter.emit_with("start", &Order::new(5)).await.unwrap();
    emitter.emit("stop", None).await.unwrap();

    assert_eq!(echo.seen(), 1);
    assert_eq!(
        journal.entries(),
        [("echo", Some(Order::new(5))), ("echo.total", None)]
    );
}

#[tokio::test]
async fn listeners_dispatch_across_types() {
    let journal = Journal::new();
    let mut container = Container::new();
    container
        .register_listener(StartListener {
            journal: journal.clone(),
        })
        .register_listener(Shipping {
            journal: journal.clone(),
        });

    let emitter = discovered(&["start", "stop"], &container);

    emitter.emit("start", None).await.unwrap();
    emitter.emit("stop", None).await.unwrap();
    emitter.emit("stop", None).await.unwrap();

    assert_eq!(journal.calls("on_start"), 1);
    assert_eq!(journal.calls("shipping.test"), 2);
    assert_eq!(journal.calls("shipping.test2"), 1);
}

#[tokio::test]
async fn repeated_emissions_invoke_each_time() {
    let journal = Journal::new();
    let mut container = Container::new();
    container.register_listener(StartListener {
        journal: journal.clone(),
    });

    let emitter = discovered(&["start"], &container);
    for _ in 0..3 {
        emitter.emit("start", None).await.unwrap();
    }

    assert_eq!(journal.calls("on_start"), 3);
}

#[test]
fn empty_source_is_not_an_error() {
    let container = Container::<Order>::new();

    let emitter = discovered(&["start", "stop"], &container);
    assert_eq!(emitter.listener_count("start"), 0);
    assert_eq!(emitter.listener_count("stop"), 0);

    let empty = discovered(&[], &container);
    assert!(empty.events().is_empty());
}

#[test]
fn undeclared_annotated_event_aborts_construction() {
    let mut container = Container::new();
    container.register_listener(Stray);

    let err = Emitter::<Order>::builder(["start"])
        .strategy(Strategy::ContainerDiscovery)
        .source(&container)
        .build()
        .unwrap_err();

    match &err {
        BuildError::Discovery(unregistered) => assert_eq!(unregistered.event, "refund"),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(
        err.to_string(),
        "discovery failed: event `refund` is not registered"
    );
}

#[test]
fn strategy_and_source_must_agree() {
    let container = Container::<Order>::new();

    let missing = Emitter::<Order>::builder(["start"])
        .strategy(Strategy::ContainerDiscovery)
        .build()
        .unwrap_err();
    assert_eq!(missing, BuildError::MissingSource);

    let unexpected = Emitter::<Order>::builder(["start"])
        .source(&container)
        .build()
        .unwrap_err();
    assert_eq!(unexpected, BuildError::UnexpectedSource);
}

#[test]
fn strategy_parses_from_configuration_strings() {
    assert_eq!("none".parse::<Strategy>().unwrap(), Strategy::None);
    assert_eq!(
        "container".parse::<Strategy>().unwrap(),
        Strategy::ContainerDiscovery
    );
    assert_eq!(
        "tsyringe".parse::<Strategy>().unwrap(),
        Strategy::ContainerDiscovery
    );
    assert!("broker".parse::<Strategy>().is_err());
    assert!("".parse::<Strategy>().is_err());
}

#[tokio::test]
async fn explicit_subscriptions_add_to_discovered_ones() {
    let journal = Journal::new();
    let mut container = Container::new();
    container.register_listener(StartListener {
        journal: journal.clone(),
    });

    let emitter = Emitter::<Order>::with_source(["start"], &container).unwrap();
    let counter = CountingListener::new();
    emitter.subscribe("start", counter.clone()).unwrap();

    emitter.emit("start", None).await.unwrap();
    assert_eq!(journal.calls("on_start"), 1);
    assert_eq!(counter.count(), 1);
}

#[tokio::test]
async fn discovered_methods_share_their_instance() {
    let journal = Journal::new();
    let instance: Arc<dyn EventListener<Order>> = Arc::new(Lifecycle::new(journal.clone()));
    let mut container = Container::new();
    container.register(LISTENER_CATEGORY, instance.clone());

    let _emitter = discovered(&["start", "stop"], &container);

    // One reference here, one in the container, four bound methods.
    assert_eq!(Arc::strong_count(&instance), 6);
}

#[tokio::test]
async fn factories_give_each_emitter_its_own_instance() {
    let journal = Journal::new();
    let factory_journal = journal.clone();
    let mut container = Container::<Order>::new();
    container.register_with(LISTENER_CATEGORY, move || {
        Arc::new(StartListener {
            journal: factory_journal.clone(),
        }) as Arc<dyn EventListener<Order>>
    });

    let first = discovered(&["start"], &container);
    let second = discovered(&["start"], &container);

    first.emit("start", None).await.unwrap();
    second.emit("start", None).await.unwrap();
    assert_eq!(journal.calls("on_start"), 2);
}

#[tokio::test]
async fn plain_list_is_a_listener_source() {
    let journal = Journal::new();
    let listeners: Vec<Arc<dyn EventListener<Order>>> = vec![
        Arc::new(StartListener {
            journal: journal.clone(),
        }),
        Arc::new(Shipping {
            journal: journal.clone(),
        }),
    ];

    let emitter = Emitter::<Order>::new(["start", "stop"]);
    let bound = discover(&emitter, &listeners).unwrap();
    assert_eq!(bound, 3);

    emitter.emit("start", None).await.unwrap();
    assert_eq!(journal.calls("on_start"), 1);
    assert_eq!(journal.calls("shipping.test2"), 1);
}
