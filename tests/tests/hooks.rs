use tests::*;

use crumb::{filter, DeleteMode, Event, Filter, Mapper, QueryOptions, Value};

use pretty_assertions::assert_eq;
use std::{
    ops::ControlFlow,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};
use std_util::prelude::*;

fn users(s: &impl Setup) -> Mapper {
    let conn = s.setup();
    let table = s.create(&conn, "users", "name TEXT");
    assert_ok!(Mapper::new(&conn, &table))
}

fn counter() -> (Arc<AtomicUsize>, impl Fn(&Mapper) + Send + Sync + 'static) {
    let count = Arc::new(AtomicUsize::new(0));
    let hook = {
        let count = count.clone();
        move |_: &Mapper| {
            count.fetch_add(1, Ordering::SeqCst);
        }
    };
    (count, hook)
}

fn locked(mapper: &Mapper) -> ControlFlow<()> {
    if mapper.peek("name") == Some(&Value::from("locked")) {
        ControlFlow::Break(())
    } else {
        ControlFlow::Continue(())
    }
}

fn before_insert_veto(s: &impl Setup) {
    let mut user = users(s);
    let (inserted, hook) = counter();
    user.before(Event::Insert, locked).after(Event::Insert, hook);

    user.set("name", "locked");
    assert_eq!(assert_ok!(user.insert()), 0);
    assert!(user.dry());
    assert_eq!(inserted.load(Ordering::SeqCst), 0);
    assert_eq!(assert_ok!(user.count(Filter::new(), QueryOptions::new())), 0);

    user.set("name", "open");
    assert_eq!(assert_ok!(user.insert()), 1);
    assert_eq!(inserted.load(Ordering::SeqCst), 1);
}

fn before_update_veto(s: &impl Setup) {
    let mut user = users(s);
    user.set("name", "ann");
    assert_ok!(user.insert());

    user.before(Event::Update, |_| ControlFlow::Break(()));
    user.set("name", "bob");
    assert_eq!(assert_ok!(user.update()), 0);

    // The change is still pending
    assert!(user.changed("name"));
}

fn before_load_veto(s: &impl Setup) {
    let mut user = users(s);
    user.set("name", "ann");
    assert_ok!(user.insert());

    let (loads, hook) = counter();
    user.after(Event::Load, hook);
    assert_ok!(user.load(Filter::new(), QueryOptions::new()));
    assert_eq!(loads.load(Ordering::SeqCst), 1);

    user.before(Event::Load, |_| ControlFlow::Break(()));
    assert_ok!(user.load(Filter::new(), QueryOptions::new()));
    assert!(user.dry());
    assert_eq!(loads.load(Ordering::SeqCst), 1);
}

fn hooks_are_shared_with_found_mappers(s: &impl Setup) {
    let mut user = users(s);
    let (loads, hook) = counter();
    user.after(Event::Load, hook);

    let found = assert_ok!(user.find(Filter::new(), QueryOptions::new()));
    assert!(found.dry());
    assert_eq!(loads.load(Ordering::SeqCst), 1);
}

fn per_row_delete_runs_hooks(s: &impl Setup) {
    let mut user = users(s);
    for name in ["ann", "locked", "bob"] {
        user.reset();
        user.set("name", name);
        assert_ok!(user.insert());
    }

    let (deleted, hook) = counter();
    user.before(Event::Delete, locked).after(Event::Delete, hook);

    let affected = assert_ok!(user.delete_where(Filter::new(), DeleteMode::PerRow));
    assert_eq!(affected, 2);
    assert_eq!(deleted.load(Ordering::SeqCst), 2);

    let left = assert_ok!(user.find(Filter::new(), QueryOptions::new()));
    assert_eq!(left.loaded(), 1);
    assert_eq!(left.peek("name"), Some(&Value::from("locked")));
}

fn batch_delete_skips_hooks(s: &impl Setup) {
    let mut user = users(s);
    for name in ["ann", "locked"] {
        user.reset();
        user.set("name", name);
        assert_ok!(user.insert());
    }

    user.before(Event::Delete, |_| ControlFlow::Break(()));

    let affected = assert_ok!(user.delete_where(filter! { "name" => "locked" }, DeleteMode::Batch));
    assert_eq!(affected, 1);

    // A vetoed single-row delete is a no-op
    assert_ok!(user.load(Filter::new(), QueryOptions::new()));
    assert_eq!(assert_ok!(user.delete()), 0);
    assert_eq!(user.loaded(), 1);
}

tests!(
    before_insert_veto,
    before_update_veto,
    before_load_veto,
    hooks_are_shared_with_found_mappers,
    per_row_delete_runs_hooks,
    batch_delete_skips_hooks,
);
