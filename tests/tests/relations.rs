use tests::*;

use crumb::{filter, Connection, Mapper, QueryOptions, Value};

use pretty_assertions::assert_eq;
use std::time::Duration;
use std_util::prelude::*;

struct Blog {
    conn: Connection,
    authors: String,
    posts: String,
    tags: String,
    post_tags: String,
}

fn blog(s: &impl Setup) -> Blog {
    let conn = s.setup();
    let authors = s.create(&conn, "authors", "name TEXT");
    let posts = s.create(&conn, "posts", "author_id INTEGER, title TEXT");
    let tags = s.create(&conn, "tags", "label TEXT");
    let post_tags = s.create_raw(
        &conn,
        "post_tags",
        "post_id INTEGER NOT NULL, tag_id INTEGER NOT NULL, PRIMARY KEY (post_id, tag_id)",
    );

    let statements = [
        format!("INSERT INTO {authors} (name) VALUES ('ann'), ('bob')"),
        format!(
            "INSERT INTO {posts} (author_id, title) VALUES (1, 'first'), (1, 'second'), (2, 'third')"
        ),
        format!("INSERT INTO {tags} (label) VALUES ('rust'), ('sql'), ('web')"),
        format!("INSERT INTO {post_tags} (post_id, tag_id) VALUES (1, 2), (1, 1), (2, 3)"),
    ];
    for sql in &statements {
        assert_ok!(conn.exec(sql, (), Duration::ZERO));
    }

    Blog {
        conn,
        authors,
        posts,
        tags,
        post_tags,
    }
}

fn titles(mut mapper: Mapper) -> Vec<String> {
    let mut titles = vec![];
    mapper.first();
    while mapper.valid() {
        titles.push(mapper.peek("title").unwrap().to_string());
        mapper.next();
    }
    titles
}

fn has_many(s: &impl Setup) {
    let blog = blog(s);

    let mut author = assert_ok!(Mapper::new(&blog.conn, &blog.authors));
    assert_ok!(author.load(filter! { "name" => "ann" }, QueryOptions::new()));

    let posts = assert_ok!(author.has_many(
        &blog.posts,
        Some("author_id=id"),
        QueryOptions::new().order("id")
    ));
    assert_eq!(posts.table(), blog.posts);
    assert_eq!(titles(posts), ["first", "second"]);

    // The author mapper is untouched
    assert_eq!(author.loaded(), 1);
}

fn has_one(s: &impl Setup) {
    let blog = blog(s);

    let mut author = assert_ok!(Mapper::new(&blog.conn, &blog.authors));
    assert_ok!(author.load_by_key(&[Value::from(2)]));

    let post = assert_ok!(author.has_one(&blog.posts, Some("author_id=id")));
    assert_eq!(post.loaded(), 1);
    assert_eq!(post.peek("title"), Some(&Value::from("third")));
}

fn belongs_to(s: &impl Setup) {
    let blog = blog(s);

    let mut post = assert_ok!(Mapper::new(&blog.conn, &blog.posts));
    assert_ok!(post.load(filter! { "title" => "third" }, QueryOptions::new()));

    let author = assert_ok!(post.belongs_to(&blog.authors, Some("author_id=id")));
    assert_eq!(author.table(), blog.authors);
    assert_eq!(author.peek("name"), Some(&Value::from("bob")));
}

fn belongs_to_many(s: &impl Setup) {
    let blog = blog(s);

    let mut post = assert_ok!(Mapper::new(&blog.conn, &blog.posts));
    assert_ok!(post.load_by_key(&[Value::from(1)]));

    let mut tags = assert_ok!(post.belongs_to_many(
        &blog.tags,
        &blog.post_tags,
        Some(("post_id=id", "tag_id=id")),
        QueryOptions::new().order("t.label"),
    ));
    assert_eq!(tags.table(), blog.tags);
    assert_eq!(tags.loaded(), 2);
    assert_eq!(tags.peek("label"), Some(&Value::from("rust")));
    tags.next();
    assert_eq!(tags.peek("label"), Some(&Value::from("sql")));

    // Related rows are regular loaded rows
    tags.set("label", "sequel");
    assert_eq!(assert_ok!(tags.update()), 1);

    let mut post = assert_ok!(Mapper::new(&blog.conn, &blog.posts));
    assert_ok!(post.load_by_key(&[Value::from(3)]));
    let none = assert_ok!(post.belongs_to_many(
        &blog.tags,
        &blog.post_tags,
        Some(("post_id=id", "tag_id=id")),
        QueryOptions::new(),
    ));
    assert!(none.dry());
}

fn relation_from_dry_mapper(s: &impl Setup) {
    let blog = blog(s);

    // A draft has no key yet, so nothing matches
    let author = assert_ok!(Mapper::new(&blog.conn, &blog.authors));
    let posts = assert_ok!(author.has_many(&blog.posts, Some("author_id=id"), QueryOptions::new()));
    assert!(posts.dry());

    let err = assert_err!(author.has_one(&blog.posts, Some("author_id=missing")));
    assert!(err.is_undefined_field());
}

fn null_keys_have_no_relations(s: &impl Setup) {
    let blog = blog(s);
    assert_ok!(blog.conn.exec(
        &format!("INSERT INTO {} (author_id, title) VALUES (NULL, 'orphan')", blog.posts),
        (),
        Duration::ZERO,
    ));

    let author = assert_ok!(Mapper::new(&blog.conn, &blog.authors));
    let posts = assert_ok!(author.has_many(&blog.posts, Some("author_id=id"), QueryOptions::new()));
    assert_eq!(posts.loaded(), 0);
    let post = assert_ok!(author.has_one(&blog.posts, Some("author_id=id")));
    assert_eq!(post.loaded(), 0);
    let tags = assert_ok!(author.belongs_to_many(
        &blog.tags,
        &blog.post_tags,
        Some(("post_id=id", "tag_id=id")),
        QueryOptions::new(),
    ));
    assert_eq!(tags.loaded(), 0);

    // A stored row with a null foreign key references nothing either
    let mut orphan = assert_ok!(Mapper::new(&blog.conn, &blog.posts));
    assert_ok!(orphan.load(filter! { "title" => "orphan" }, QueryOptions::new()));
    assert_eq!(orphan.loaded(), 1);
    let author = assert_ok!(orphan.belongs_to(&blog.authors, Some("author_id=id")));
    assert!(author.dry());
    assert_eq!(author.loaded(), 0);
}

fn paged_belongs_to_many(s: &impl Setup) {
    let blog = blog(s);

    let mut post = assert_ok!(Mapper::new(&blog.conn, &blog.posts));
    assert_ok!(post.load_by_key(&[Value::from(1)]));

    // Without an explicit order, paging falls back to the target's key
    let tags = assert_ok!(post.belongs_to_many(
        &blog.tags,
        &blog.post_tags,
        Some(("post_id=id", "tag_id=id")),
        QueryOptions::new().limit(1).offset(1),
    ));
    assert_eq!(tags.loaded(), 1);
}

tests!(
    has_many,
    has_one,
    belongs_to,
    belongs_to_many,
    relation_from_dry_mapper,
    null_keys_have_no_relations,
    paged_belongs_to_many,
);
