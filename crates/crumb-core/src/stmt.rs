mod args;
pub use args::{ArgKey, Args, NamedArgs, Param};

mod param_type;
pub use param_type::ParamType;

mod value;
pub use value::Value;

/// Returns `true` when `sql` is a statement that produces a result set by
/// its leading keyword.
///
/// Drivers additionally treat any statement that yields columns (for example
/// `INSERT ... RETURNING` or `CALL`) as fetchable; this check only covers the
/// keyword-level cases and is used before a statement is prepared.
pub fn is_fetchable(sql: &str) -> bool {
    let keyword = leading_keyword(sql);

    ["SELECT", "EXPLAIN", "SHOW", "PRAGMA", "WITH", "VALUES", "DESCRIBE"]
        .iter()
        .any(|k| keyword.eq_ignore_ascii_case(k))
}

/// Returns the first keyword of `sql`, skipping whitespace, opening
/// parentheses and SQL comments.
pub fn leading_keyword(sql: &str) -> &str {
    let mut rest = sql;

    loop {
        rest = rest.trim_start_matches(|c: char| c.is_whitespace() || c == '(');

        if let Some(comment) = rest.strip_prefix("--") {
            rest = comment.split_once('\n').map(|(_, r)| r).unwrap_or("");
        } else if let Some(comment) = rest.strip_prefix("/*") {
            rest = comment.split_once("*/").map(|(_, r)| r).unwrap_or("");
        } else {
            break;
        }
    }

    let end = rest
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(rest.len());
    &rest[..end]
}
