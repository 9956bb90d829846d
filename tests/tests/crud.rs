use tests::*;

use crumb::{filter, Connection, Filter, Mapper, QueryOptions, Value};

use pretty_assertions::assert_eq;
use std::time::Duration;
use std_util::prelude::*;

fn users(s: &impl Setup, conn: &Connection) -> String {
    s.create(
        conn,
        "users",
        "name TEXT NOT NULL DEFAULT 'anon', age INTEGER, active BOOLEAN",
    )
}

fn count(conn: &Connection, table: &str) -> i64 {
    let response = assert_ok!(conn.exec(
        &format!("SELECT COUNT(*) AS n FROM {table}"),
        (),
        Duration::ZERO
    ));
    response.scalar().and_then(Value::as_i64).unwrap()
}

fn insert_reloads_generated_key(s: &impl Setup) {
    let conn = s.setup();
    let table = users(s, &conn);

    let mut user = assert_ok!(Mapper::new(&conn, &table));
    assert!(user.dry());
    assert_eq!(user.peek("name"), Some(&Value::from("anon")));
    assert_eq!(user.peek("id"), Some(&Value::Null));

    user.set("age", 30).set("active", true);
    assert_eq!(assert_ok!(user.insert()), 1);

    assert!(user.valid());
    assert_eq!(user.loaded(), 1);
    assert!(!user.dirty());
    assert_eq!(user.peek("id"), Some(&Value::I64(1)));
    assert_eq!(user.peek("name"), Some(&Value::from("anon")));
    assert_eq!(user.peek("age"), Some(&Value::I64(30)));
    assert_eq!(user.peek("active"), Some(&Value::Bool(true)));

    let mut second = assert_ok!(Mapper::new(&conn, &table));
    second.set("name", "bob");
    assert_eq!(assert_ok!(second.insert()), 1);
    assert_eq!(second.peek("id"), Some(&Value::I64(2)));
}

fn load_round_trip(s: &impl Setup) {
    let conn = s.setup();
    let table = users(s, &conn);

    let mut user = assert_ok!(Mapper::new(&conn, &table));
    user.set("name", "ann").set("age", 41);
    assert_ok!(user.insert());

    let mut loaded = assert_ok!(Mapper::new(&conn, &table));
    assert_ok!(loaded.load(filter! { "name" => "ann" }, QueryOptions::new()));

    assert_eq!(loaded.loaded(), 1);
    assert_eq!(loaded.cast(), user.cast());
    assert_eq!(loaded.peek("age"), Some(&Value::I64(41)));
    assert_eq!(loaded.peek("active"), Some(&Value::Null));

    // No match leaves the mapper dry
    assert_ok!(loaded.load(filter! { "name" => "nobody" }, QueryOptions::new()));
    assert!(loaded.dry());
    assert_eq!(loaded.loaded(), 0);
}

fn update_writes_changed_fields(s: &impl Setup) {
    let conn = s.setup();
    let table = users(s, &conn);

    let mut user = assert_ok!(Mapper::new(&conn, &table));
    user.set("name", "ann").set("age", 20);
    assert_ok!(user.insert());

    // Nothing changed yet
    assert_eq!(assert_ok!(user.update()), 0);

    user.set("age", 21);
    assert!(user.changed("age"));
    assert!(!user.changed("name"));
    assert_eq!(assert_ok!(user.update()), 1);
    assert!(!user.dirty());

    let mut reloaded = assert_ok!(Mapper::new(&conn, &table));
    assert_ok!(reloaded.load_by_key(&[Value::from(1)]));
    assert_eq!(reloaded.peek("age"), Some(&Value::I64(21)));
    assert_eq!(reloaded.peek("name"), Some(&Value::from("ann")));
}

fn update_can_change_primary_key(s: &impl Setup) {
    let conn = s.setup();
    let table = users(s, &conn);

    let mut user = assert_ok!(Mapper::new(&conn, &table));
    user.set("name", "ann");
    assert_ok!(user.insert());

    // Rows are matched on the committed key, not the assigned one
    user.set("id", 100);
    assert_eq!(assert_ok!(user.update()), 1);

    let mut moved = assert_ok!(Mapper::new(&conn, &table));
    assert_ok!(moved.load_by_key(&[Value::from(100)]));
    assert_eq!(moved.peek("name"), Some(&Value::from("ann")));
}

fn save_inserts_then_updates(s: &impl Setup) {
    let conn = s.setup();
    let table = users(s, &conn);

    let mut user = assert_ok!(Mapper::new(&conn, &table));
    user.set("name", "ann");
    assert_eq!(assert_ok!(user.save()), 1);
    assert_eq!(count(&conn, &table), 1);

    user.set("name", "anne");
    assert_eq!(assert_ok!(user.save()), 1);
    assert_eq!(count(&conn, &table), 1);

    let found = assert_ok!(user.find_one(filter! { "name" => "anne" }, QueryOptions::new()));
    assert!(found.valid());
}

fn delete_advances_cursor(s: &impl Setup) {
    let conn = s.setup();
    let table = users(s, &conn);

    for name in ["ann", "bob", "cy"] {
        let mut user = assert_ok!(Mapper::new(&conn, &table));
        user.set("name", name);
        assert_ok!(user.insert());
    }

    let mut users = assert_ok!(Mapper::new(&conn, &table));
    assert_ok!(users.load(Filter::new(), QueryOptions::new().order("id")));
    assert_eq!(users.loaded(), 3);

    assert_eq!(assert_ok!(users.delete()), 1);
    assert_eq!(users.loaded(), 2);
    assert_eq!(users.position(), Some(0));
    assert_eq!(users.peek("name"), Some(&Value::from("bob")));

    users.last();
    assert_eq!(assert_ok!(users.delete()), 1);
    assert!(users.dry());
    assert_eq!(count(&conn, &table), 1);

    // Deleting while dry is a no-op
    assert_eq!(assert_ok!(users.delete()), 0);
}

fn delete_where_batch(s: &impl Setup) {
    let conn = s.setup();
    let table = users(s, &conn);

    for age in [10, 20, 30] {
        let mut user = assert_ok!(Mapper::new(&conn, &table));
        user.set("age", age);
        assert_ok!(user.insert());
    }

    let users = assert_ok!(Mapper::new(&conn, &table));
    let deleted = assert_ok!(users.delete_where(filter! { "age >=" => 20 }, crumb::DeleteMode::Batch));
    assert_eq!(deleted, 2);
    assert_eq!(count(&conn, &table), 1);
}

fn insert_composite_key_requeries(s: &impl Setup) {
    let conn = s.setup();
    let table = s.create_raw(
        &conn,
        "pairs",
        "a INTEGER NOT NULL, b INTEGER NOT NULL, label TEXT, created TEXT DEFAULT CURRENT_TIMESTAMP, PRIMARY KEY (a, b)",
    );

    let mut pair = assert_ok!(Mapper::new(&conn, &table));
    assert!(pair.schema().auto_increment_key().is_none());

    pair.set("a", 1).set("b", 2).set("label", "x");
    assert_eq!(pair.peek("created"), Some(&Value::Null));
    assert_eq!(assert_ok!(pair.insert()), 1);

    // The row comes back from the database with its server-side default
    assert!(pair.valid());
    assert_eq!(pair.peek("label"), Some(&Value::from("x")));
    assert!(!assert_some!(pair.peek("created")).is_null());

    assert_ok!(pair.load_by_key(&[Value::from(1), Value::from(2)]));
    assert_eq!(pair.loaded(), 1);

    let err = assert_err!(pair.load_by_key(&[Value::from(1)]));
    assert!(err.is_insufficient_primary_key());
}

fn table_without_primary_key(s: &impl Setup) {
    let conn = s.setup();
    let table = s.create_raw(&conn, "logs", "message TEXT");

    let mut log = assert_ok!(Mapper::new(&conn, &table));
    log.set("message", "hello");
    assert_eq!(assert_ok!(log.insert()), 1);

    // Fabricated from the submitted values
    assert!(log.valid());
    assert_eq!(log.peek("message"), Some(&Value::from("hello")));
    assert!(!log.dirty());

    log.set("message", "bye");
    assert!(assert_err!(log.update()).is_missing_primary_key());
    assert!(assert_err!(log.delete()).is_missing_primary_key());
    assert!(assert_err!(log.load_by_key(&[Value::from(1)])).is_missing_primary_key());
}

fn restricted_fields(s: &impl Setup) {
    let conn = s.setup();
    let table = users(s, &conn);

    let mut user = assert_ok!(Mapper::new(&conn, &table));
    user.set("name", "ann").set("age", 5);
    assert_ok!(user.insert());

    let mut names = assert_ok!(Mapper::with_options(&conn, &table, &["id", "name"], None));
    assert_eq!(names.fields().collect::<Vec<_>>(), ["id", "name"]);

    assert_ok!(names.load(Filter::new(), QueryOptions::new()));
    assert_eq!(names.peek("name"), Some(&Value::from("ann")));
    assert!(!names.exists("age"));
}

fn missing_table(s: &impl Setup) {
    let conn = s.setup();
    assert_err!(Mapper::new(&conn, &s.table("missing")));
}

fn decimal_and_date_columns(s: &impl Setup) {
    let conn = s.setup();
    let table = s.create(&conn, "invoices", "price NUMERIC(10,2), due DATE");

    let mut invoice = assert_ok!(Mapper::new(&conn, &table));
    invoice.set("price", "12.50").set("due", "2024-01-02");
    assert_eq!(assert_ok!(invoice.insert()), 1);
    assert_eq!(invoice.peek("price"), Some(&Value::F64(12.5)));
    assert_eq!(invoice.peek("due"), Some(&Value::from("2024-01-02")));

    invoice.set("price", 13);
    assert_eq!(assert_ok!(invoice.update()), 1);

    let found = assert_ok!(invoice.find(filter! { "due" => "2024-01-02" }, QueryOptions::new()));
    assert_eq!(found.loaded(), 1);
    assert_eq!(found.peek("price"), Some(&Value::F64(13.0)));
}

tests!(
    insert_reloads_generated_key,
    load_round_trip,
    update_writes_changed_fields,
    update_can_change_primary_key,
    save_inserts_then_updates,
    delete_advances_cursor,
    delete_where_batch,
    insert_composite_key_requeries,
    table_without_primary_key,
    restricted_fields,
    missing_table,
    decimal_and_date_columns,
);
