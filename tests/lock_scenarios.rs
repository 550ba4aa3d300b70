mod common;

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use ui_lock::services::ui::{Component, Document, Element};
use ui_lock::{
    by_selector, unlock_all, Guard, GuardSet, Invocation, LockConfig, LockOptions, LockOwner,
    LockReflector, Outcome,
};

#[tokio::test(start_paused = true)]
async fn delayed_future_scenario() {
    common::init_logger();
    let counter = Arc::new(AtomicU32::new(0));
    let calls = counter.clone();
    let guard: Guard<(), u32> = Guard::new(
        "refresh",
        LockConfig::default().without_locator(),
        move |_, _| {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            Outcome::future(async move {
                tokio::time::sleep(Duration::from_millis(100)).await;
                n
            })
        },
    )
    .unwrap();

    let first = guard.invoke(&(), &[]).unwrap();
    assert_eq!(counter.load(Ordering::SeqCst), 1);
    assert!(guard.is_locked());

    assert!(guard.invoke(&(), &[]).unwrap().is_locked());
    assert_eq!(counter.load(Ordering::SeqCst), 1);

    tokio::time::sleep(Duration::from_millis(110)).await;
    assert!(!guard.is_locked());
    assert_eq!(first.settle().await, Some(1));

    guard.invoke(&(), &[]).unwrap();
    assert_eq!(counter.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn options_loaded_from_json() {
    common::init_logger();
    let options =
        LockOptions::from_json(r#"{ "maxCall": 2, "unlockTimeout": 500, "debug": true }"#)
            .unwrap();
    let guard: Guard<(), ()> = Guard::new(
        "save",
        LockConfig::from_options(options).without_locator(),
        |_, _| Outcome::Value(()),
    )
    .unwrap();

    guard.invoke(&(), &[]).unwrap();
    assert!(!guard.is_locked());
    guard.invoke(&(), &[]).unwrap();
    assert!(guard.is_locked());

    tokio::time::sleep(Duration::from_millis(501)).await;
    assert!(!guard.is_locked());
}

#[test]
fn selector_target_is_marked_while_locked() {
    common::init_logger();
    let document = Arc::new(Document::new());
    let save = Element::build("button", Some("save-btn"), &["primary"]);
    document.append(Element::new("div"));
    document.append(save.clone());

    let config = LockConfig::default().with_locator(by_selector(document, "#save-btn"));
    let guard: Guard<(), ()> = Guard::new("save", config, |_, _| Outcome::Value(())).unwrap();

    guard.invoke(&(), &[]).unwrap();
    assert_eq!(save.class_name(), "primary ui-lock-locked");
    assert!(save.has_attribute("disabled"));

    guard.release("saved");
    assert_eq!(save.class_name(), "primary");
}

#[test]
fn click_target_is_marked_by_default() {
    common::init_logger();
    let button = Element::new("button");
    let guard: Guard<(), ()> = Guard::with_defaults("save", |_, _| Outcome::Value(())).unwrap();

    guard.invoke(&(), &common::click(&button)).unwrap();
    assert!(button.has_class(ui_lock::DEFAULT_LOCKED_CLASS));
}

// ─── Owners ──────────────────────────────────────────────────────────────────

struct Form {
    save: Guard<Form, u32>,
    load: Guard<Form, u32>,
    reset: Guard<Form, u32>,
}

impl Component for Form {}

impl LockOwner for Form {
    fn lock_handles(&self) -> Vec<ui_lock::LockHandle> {
        vec![self.save.handle(), self.load.handle(), self.reset.handle()]
    }
}

fn form() -> Form {
    let guard = |name: &str| {
        Guard::new(name, LockConfig::default().without_locator(), |_: &Form, _| {
            Outcome::Value(1u32)
        })
        .unwrap()
    };
    Form {
        save: guard("save"),
        load: guard("load"),
        reset: guard("reset"),
    }
}

#[test]
fn bulk_release_of_an_owner() {
    common::init_logger();
    let form = form();
    form.save.invoke(&form, &[]).unwrap();
    form.load.invoke(&form, &[]).unwrap();
    assert!(form.save.is_locked() && form.load.is_locked());
    assert!(!form.reset.is_locked());

    assert_eq!(unlock_all(&form), 3);
    assert!(!form.save.is_locked());
    assert!(!form.load.is_locked());
    assert!(!form.reset.is_locked());
}

#[test]
fn guard_set_by_name() {
    common::init_logger();
    let form = form();
    let mut set = GuardSet::new();
    for handle in form.lock_handles() {
        set.register(handle);
    }

    form.save.invoke(&form, &[]).unwrap();
    assert_eq!(set.is_locked("save"), Ok(true));
    set.release("save", None).unwrap();
    assert!(!form.save.is_locked());

    let err = set.is_locked("submit").unwrap_err();
    assert_eq!(
        err.to_string(),
        "is_locked: \"submit\" must be a guarded method registered on the owner"
    );
}

// ─── Observers ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn status_stream_and_reflector_follow_the_guard() {
    common::init_logger();
    let guard: Guard<(), u32> = Guard::new(
        "sync",
        LockConfig::default().without_locator(),
        |_, _| Outcome::stream(futures_util::stream::iter(vec![Ok(1), Ok(2)])),
    )
    .unwrap();
    let badge = Element::new("span");
    let _reflector = LockReflector::bind(&guard.handle(), &badge).unwrap();
    let mut statuses = Box::pin(guard.status().into_stream());
    assert_eq!(statuses.next().await, Some(false));

    let items = match guard.invoke(&(), &[]).unwrap() {
        Invocation::Streaming(items) => items,
        other => panic!("expected a stream, got {other:?}"),
    };
    assert_eq!(statuses.next().await, Some(true));
    for _ in 0..3 {
        tokio::task::yield_now().await;
    }
    assert!(badge.has_attribute("disabled"));

    let values: Vec<u32> = items.map(|item| item.unwrap()).collect().await;
    assert_eq!(values, vec![1, 2]);
    assert_eq!(statuses.next().await, Some(false));
    for _ in 0..3 {
        tokio::task::yield_now().await;
    }
    assert!(!badge.has_attribute("disabled"));
}
