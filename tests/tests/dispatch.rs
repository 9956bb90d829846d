use tests::*;

use crumb::{Dispatched, Mapper, Value};

use pretty_assertions::assert_eq;
use std_util::prelude::*;

fn users(s: &impl Setup) -> Mapper {
    let conn = s.setup();
    let table = s.create(&conn, "users", "user_name TEXT, age INTEGER");

    let mut user = assert_ok!(Mapper::new(&conn, &table));
    for (name, age) in [("ann", 30), ("bob", 30), ("cy", 40)] {
        user.reset();
        user.set("user_name", name).set("age", age);
        assert_ok!(user.insert());
    }

    user.reset();
    user
}

fn get_field(s: &impl Setup) {
    let mut user = users(s);
    user.set("user_name", "dee");

    match assert_ok!(user.call("getUserName", vec![])) {
        Dispatched::Value(value) => assert_eq!(value, Value::from("dee")),
        other => panic!("unexpected dispatch; actual={other:?}"),
    }
}

fn find_by(s: &impl Setup) {
    let mut user = users(s);

    match assert_ok!(user.call("findByAge", vec![Value::from(30)])) {
        Dispatched::Found(found) => assert_eq!(found.loaded(), 2),
        other => panic!("unexpected dispatch; actual={other:?}"),
    }

    match assert_ok!(user.call("FINDONEBYage", vec![Value::from(30)])) {
        Dispatched::Found(found) => assert_eq!(found.loaded(), 1),
        other => panic!("unexpected dispatch; actual={other:?}"),
    }

    // Finding leaves the caller untouched
    assert!(user.dry());
}

fn load_by(s: &impl Setup) {
    let mut user = users(s);

    assert!(matches!(
        assert_ok!(user.call("loadByUserName", vec![Value::from("cy")])),
        Dispatched::Loaded
    ));
    assert_eq!(user.loaded(), 1);
    assert_eq!(user.peek("age"), Some(&Value::I64(40)));
}

fn unknown_methods(s: &impl Setup) {
    let mut user = users(s);

    assert!(assert_err!(user.call("deleteByAge", vec![])).is_undefined_method());
    assert!(assert_err!(user.call("getMissing", vec![])).is_undefined_field());
}

tests!(get_field, find_by, load_by, unknown_methods);
