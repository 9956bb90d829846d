use tests::*;

use crumb::{filter, Filter, Mapper, NamedArgs, QueryOptions, Value};

use pretty_assertions::assert_eq;
use std_util::prelude::*;

fn people(s: &impl Setup) -> Mapper {
    let conn = s.setup();
    let table = s.create(&conn, "people", "name TEXT, age INTEGER");

    let mut person = assert_ok!(Mapper::new(&conn, &table));
    for (name, age) in [("ann", Some(20)), ("bob", Some(35)), ("cat", None), ("dan", Some(50))] {
        person.reset();
        person.set("name", name).set("age", age);
        assert_ok!(person.insert());
    }

    person.reset();
    person
}

fn names(people: &Mapper, filter: Filter) -> Vec<String> {
    let mut found = assert_ok!(people.find(filter, QueryOptions::new().order("name")));
    let mut names = vec![];
    while found.valid() {
        names.push(found.peek("name").unwrap().to_string());
        found.next();
    }
    names
}

fn comparisons(s: &impl Setup) {
    let people = people(s);

    assert_eq!(names(&people, filter! { "age >" => 30 }), ["bob", "dan"]);
    assert_eq!(names(&people, filter! { "age <=" => 35, "name !=" => "ann" }), ["bob"]);
    assert_eq!(names(&people, filter! { "name ~" => "%a%" }), ["ann", "cat", "dan"]);
    assert_eq!(names(&people, filter! { "name !~" => "%a%" }), ["bob"]);
}

fn nulls(s: &impl Setup) {
    let people = people(s);

    assert_eq!(names(&people, filter! { "age" => Value::Null }), ["cat"]);
    assert_eq!(names(&people, filter! { "age !=" => Value::Null }), ["ann", "bob", "dan"]);
}

fn lists(s: &impl Setup) {
    let people = people(s);

    assert_eq!(names(&people, filter! { "name" => ["ann", "dan"] }), ["ann", "dan"]);
    assert_eq!(names(&people, filter! { "name ![]" => ["ann", "dan"] }), ["bob", "cat"]);
    assert_eq!(names(&people, filter! { "age ><" => [20, 35] }), ["ann", "bob"]);

    // Empty lists match nothing, or everything when negated
    assert_eq!(names(&people, filter! { "name []" => Value::List(vec![]) }), Vec::<String>::new());
    assert_eq!(names(&people, filter! { "name ![]" => Value::List(vec![]) }).len(), 4);
}

fn malformed_between(s: &impl Setup) {
    let people = people(s);

    let err = assert_err!(people.find(filter! { "age ><" => [20] }, QueryOptions::new()));
    assert!(err.is_operand_type_mismatch());
}

fn connectors_and_groups(s: &impl Setup) {
    let people = people(s);

    assert_eq!(
        names(&people, filter! { "name" => "ann", "|name" => "bob" }),
        ["ann", "bob"]
    );

    let filter = Filter::new()
        .with("age >=", 20)
        .group(filter! { "name" => "ann", "|age >" => 40 });
    assert_eq!(names(&people, filter), ["ann", "dan"]);

    let filter = Filter::new().with("age >", 0).with("!name", "bob");
    assert_eq!(names(&people, filter), ["ann", "dan"]);
}

fn raw_fragments(s: &impl Setup) {
    let people = people(s);

    let mut args = NamedArgs::new();
    args.insert(":min".to_string(), Value::from(30));
    let filter = Filter::new().raw_with("age > :min", args).with("name !=", "dan");
    assert_eq!(names(&people, filter), ["bob"]);

    assert_eq!(names(&people, Filter::from("age IS NULL")), ["cat"]);
    assert_eq!(names(&people, filter! { "age" => "```age" }), ["ann", "bob", "dan"]);
}

tests!(
    comparisons,
    nulls,
    lists,
    malformed_between,
    connectors_and_groups,
    raw_fragments,
);
