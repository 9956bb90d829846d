use tests::*;

use crumb::{filter, Filter, Mapper, QueryOptions, Value};

use pretty_assertions::assert_eq;
use std_util::prelude::*;

fn three_rows(s: &impl Setup) -> Mapper {
    let conn = s.setup();
    let table = s.create(&conn, "items", "label TEXT, kind TEXT");

    for (label, kind) in [("a", "x"), ("b", "y"), ("c", "x")] {
        let mut item = assert_ok!(Mapper::new(&conn, &table));
        item.set("label", label).set("kind", kind);
        assert_ok!(item.insert());
    }

    assert_ok!(Mapper::new(&conn, &table))
}

fn page_within_range(s: &impl Setup) {
    let items = three_rows(s);

    let page = assert_ok!(items.paginate(2, 1, Filter::new(), QueryOptions::new().order("id")));
    assert_eq!(
        (page.total, page.pages, page.page, page.start, page.end, page.count),
        (3, 3, 2, 2, 2, 1)
    );
    assert_eq!(page.subset.peek("label"), Some(&Value::from("b")));
    assert!(items.dry());
}

fn page_past_the_end(s: &impl Setup) {
    let items = three_rows(s);

    let page = assert_ok!(items.paginate(4, 1, Filter::new(), QueryOptions::new().order("id")));
    assert_eq!(page.count, 0);
    assert_eq!(page.start, 4);
    assert_eq!(page.end, 3);
    assert!(page.is_empty());
    assert!(page.subset.dry());
}

fn huge_page_numbers(s: &impl Setup) {
    let items = three_rows(s);

    let page = assert_ok!(items.paginate(u64::MAX, 2, Filter::new(), QueryOptions::new()));
    assert_eq!((page.total, page.pages, page.page, page.count), (3, 2, u64::MAX, 0));
    assert_eq!(page.start, u64::MAX);
    assert_eq!(page.end, u64::MAX);
    assert!(page.subset.dry());

    let page = assert_ok!(items.paginate(1, u64::MAX, Filter::new(), QueryOptions::new()));
    assert_eq!((page.total, page.pages, page.count), (3, 1, 3));
    assert_eq!((page.start, page.end), (1, 3));
}

fn page_with_filter(s: &impl Setup) {
    let items = three_rows(s);

    let page = assert_ok!(items.paginate(1, 10, filter! { "kind" => "x" }, QueryOptions::new()));
    assert_eq!((page.total, page.pages, page.count), (2, 1, 2));
    assert_eq!(page.end, 2);
}

fn count_rows(s: &impl Setup) {
    let items = three_rows(s);

    assert_eq!(assert_ok!(items.count(Filter::new(), QueryOptions::new())), 3);
    assert_eq!(assert_ok!(items.count(filter! { "kind" => "y" }, QueryOptions::new())), 1);

    // Paging does not apply to counts
    assert_eq!(assert_ok!(items.count(Filter::new(), QueryOptions::new().limit(1))), 3);

    // One per group
    assert_eq!(assert_ok!(items.count(Filter::new(), QueryOptions::new().group("kind"))), 2);
}

fn limit_and_offset(s: &impl Setup) {
    let items = three_rows(s);

    let found = assert_ok!(items.find(
        Filter::new(),
        QueryOptions::new().order("id").limit(2).offset(1)
    ));
    assert_eq!(found.loaded(), 2);
    assert_eq!(found.peek("label"), Some(&Value::from("b")));

    let found = assert_ok!(items.find(Filter::new(), QueryOptions::new().order("id").offset(2)));
    assert_eq!(found.loaded(), 1);
    assert_eq!(found.peek("label"), Some(&Value::from("c")));
}

tests!(
    page_within_range,
    page_past_the_end,
    huge_page_numbers,
    page_with_filter,
    count_rows,
    limit_and_offset,
);
