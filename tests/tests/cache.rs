use tests::*;

use crumb::{Connection, Mapper, MemoryCache, Value};

use pretty_assertions::assert_eq;
use std::time::Duration;
use std_util::prelude::*;

const MINUTE: Duration = Duration::from_secs(60);

fn cached(s: &impl Setup) -> Connection {
    let mut builder = Connection::builder();
    builder.cache(MemoryCache::new()).schema_ttl(MINUTE);
    assert_ok!(s.connect(builder))
}

fn fetched_rows_are_cached(s: &impl Setup) {
    let conn = cached(s);
    let table = s.create(&conn, "items", "label TEXT");
    let select = format!("SELECT label FROM {table} ORDER BY id");
    let insert = format!("INSERT INTO {table} (label) VALUES (:label)");

    assert_ok!(conn.exec(&insert, vec![(":label", Value::from("a"))], Duration::ZERO));
    assert_eq!(assert_ok!(conn.exec(&select, (), MINUTE)).affected(), 1);

    assert_ok!(conn.exec(&insert, vec![(":label", Value::from("b"))], Duration::ZERO));

    // Served from the cache until the entry expires
    assert_eq!(assert_ok!(conn.exec(&select, (), MINUTE)).affected(), 1);
    assert_eq!(assert_ok!(conn.exec(&select, (), Duration::ZERO)).affected(), 2);
}

fn cache_keys_include_arguments(s: &impl Setup) {
    let conn = cached(s);
    let table = s.create(&conn, "items", "label TEXT");
    assert_ok!(conn.exec(
        &format!("INSERT INTO {table} (label) VALUES ('a'), ('b')"),
        (),
        Duration::ZERO
    ));

    let select = format!("SELECT label FROM {table} WHERE label = :label");
    let a = assert_ok!(conn.exec(&select, vec![(":label", Value::from("a"))], MINUTE));
    let b = assert_ok!(conn.exec(&select, vec![(":label", Value::from("b"))], MINUTE));

    assert_eq!(a.scalar(), Some(&Value::from("a")));
    assert_eq!(b.scalar(), Some(&Value::from("b")));
}

fn mutations_are_never_cached(s: &impl Setup) {
    let conn = cached(s);
    let table = s.create(&conn, "items", "label TEXT");
    let insert = format!("INSERT INTO {table} (label) VALUES ('a')");

    assert_ok!(conn.exec(&insert, (), MINUTE));
    assert_ok!(conn.exec(&insert, (), MINUTE));

    let items = assert_ok!(Mapper::new(&conn, &table));
    assert_eq!(
        assert_ok!(items.count(crumb::Filter::new(), crumb::QueryOptions::new())),
        2
    );
}

fn schemas_are_cached(s: &impl Setup) {
    let conn = cached(s);
    let table = s.create(&conn, "items", "label TEXT");

    let first = assert_ok!(conn.schema(&table, &[], None));
    assert_ok!(conn.exec(
        &format!("ALTER TABLE {table} ADD COLUMN extra TEXT"),
        (),
        Duration::ZERO
    ));

    let second = assert_ok!(conn.schema(&table, &[], None));
    assert_eq!(second.len(), first.len());

    // A zero TTL bypasses the cache
    let fresh = assert_ok!(conn.schema(&table, &[], Some(Duration::ZERO)));
    assert_eq!(fresh.len(), first.len() + 1);
    assert!(fresh.contains("extra"));
}

fn empty_statements_are_rejected(s: &impl Setup) {
    let conn = s.setup();
    assert!(assert_err!(conn.exec("  ", (), Duration::ZERO)).is_invalid_statement());
}

tests!(
    fetched_rows_are_cached,
    cache_keys_include_arguments,
    mutations_are_never_cached,
    schemas_are_cached,
    empty_statements_are_rejected,
);
