use tests::*;

use crumb::{Connection, Filter, Mapper, QueryOptions};

use std::time::Duration;
use std_util::prelude::*;

fn items(s: &impl Setup) -> (Connection, Mapper) {
    let conn = s.setup();
    let table = s.create(&conn, "items", "label TEXT");
    let items = assert_ok!(Mapper::new(&conn, &table));
    (conn, items)
}

fn count(items: &Mapper) -> u64 {
    assert_ok!(items.count(Filter::new(), QueryOptions::new()))
}

fn commit_on_ok(s: &impl Setup) {
    let (conn, items) = items(s);

    assert_ok!(conn.transaction(|_| {
        let mut item = items.clone();
        item.set("label", "a");
        item.insert()
    }));

    assert!(!conn.in_transaction());
    assert_eq!(count(&items), 1);
}

fn rollback_on_err(s: &impl Setup) {
    let (conn, items) = items(s);

    let result: crumb::Result<()> = conn.transaction(|_| {
        let mut item = items.clone();
        item.set("label", "a");
        item.insert()?;
        crumb::bail!("changed my mind")
    });

    assert_err!(result);
    assert!(!conn.in_transaction());
    assert_eq!(count(&items), 0);
}

fn driver_error_rolls_back(s: &impl Setup) {
    let (conn, items) = items(s);

    assert_ok!(conn.begin());
    assert!(conn.in_transaction());

    let mut item = items.clone();
    item.set("label", "a");
    assert_ok!(item.insert());

    let err = assert_err!(conn.exec("SELECT * FROM no_such_table", (), Duration::ZERO));
    assert!(err.is_driver_operation_failed());
    assert!(!conn.in_transaction());
    assert_eq!(count(&items), 0);
}

fn nested_begin_is_rejected(s: &impl Setup) {
    let (conn, _) = items(s);

    assert_ok!(conn.begin());
    assert!(assert_err!(conn.begin()).is_invalid_statement());
    assert_ok!(conn.rollback());
    assert!(assert_err!(conn.commit()).is_invalid_statement());
}

tests!(
    commit_on_ok,
    rollback_on_err,
    driver_error_rolls_back,
    nested_begin_is_rejected,
);
