use crate::{
    filter::{Entry, Filter, Joint},
    key::{Key, Op},
    placeholders::Placeholders,
};

use crumb_core::{
    stmt::{NamedArgs, Value},
    Dialect, Error, Result, Schema,
};

/// Generates SQL for one table.
///
/// The builder holds no per-query state: each call returns a fresh statement
/// and its named arguments.
#[derive(Debug, Clone, Copy)]
pub struct QueryBuilder<'a> {
    pub(crate) schema: &'a Schema,
    pub(crate) dialect: &'a dyn Dialect,
}

/// A rendered filter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Clause {
    pub sql: String,
    pub args: NamedArgs,
}

impl<'a> QueryBuilder<'a> {
    pub fn new(schema: &'a Schema, dialect: &'a dyn Dialect) -> QueryBuilder<'a> {
        QueryBuilder { schema, dialect }
    }

    pub fn table(&self) -> &'a str {
        &self.schema.table
    }

    pub fn schema(&self) -> &'a Schema {
        self.schema
    }

    pub fn dialect(&self) -> &'a dyn Dialect {
        self.dialect
    }

    pub fn quote(&self, ident: &str) -> String {
        self.dialect.quote_identifier(ident)
    }

    /// Renders `filter` into a SQL condition and its named arguments.
    ///
    /// Each condition key reads `[connector] column [operator] [# comment]`:
    ///
    /// * connectors: `&` AND (default), `|` OR, `^` XOR, `!` NOT; they combine,
    ///   so `|!` is `OR NOT`.
    /// * operators: `=`, `<`, `>`, `<=`, `>=`, `<>`, `!=`, `~` (LIKE),
    ///   `!~` (NOT LIKE), `@` (SOUNDS LIKE), `[]` (IN), `![]` (NOT IN),
    ///   `><` (BETWEEN), `!><` (NOT BETWEEN). Without an operator, lists
    ///   become `IN` and anything else `=`.
    /// * anything after `#` is ignored, which allows the same column to appear
    ///   in several keys.
    ///
    /// Placeholders are named after the column. A name already present in
    /// `lookup` (or used earlier in the filter) is suffixed with `__2`, `__3`,
    /// and so on.
    pub fn filter(&self, filter: &Filter, lookup: &[&str]) -> Result<Clause> {
        let mut placeholders = Placeholders::new(lookup.iter().copied());
        reserve_raw_args(filter, &mut placeholders);

        let mut args = NamedArgs::new();
        let sql = self.render(filter, &mut placeholders, &mut args)?;
        Ok(Clause { sql, args })
    }

    fn render(
        &self,
        filter: &Filter,
        placeholders: &mut Placeholders,
        args: &mut NamedArgs,
    ) -> Result<String> {
        let mut fragments: Vec<String> = vec![];

        for entry in filter.entries() {
            let (joint, sql) = match entry {
                Entry::Cond { key, value } => {
                    let parsed = Key::parse(key)?;
                    let sql = self.condition(key, &parsed, value, placeholders, args)?;
                    (parsed.joint, sql)
                }
                Entry::Raw { sql, args: raw } => {
                    for (name, value) in raw {
                        args.insert(placeholder_name(name), value.clone());
                    }
                    (Joint::default(), sql.trim().to_string())
                }
                Entry::Group { joint, filter } => {
                    let inner = self.render(filter, placeholders, args)?;
                    if inner.is_empty() {
                        continue;
                    }
                    (*joint, format!("({inner})"))
                }
            };

            if sql.is_empty() {
                continue;
            }

            if !fragments.is_empty() {
                fragments.push(joint.connector.as_sql().to_string());
            }
            if joint.not {
                fragments.push("NOT".to_string());
            }
            fragments.push(sql);
        }

        Ok(fragments.join(" "))
    }

    fn condition(
        &self,
        key: &str,
        parsed: &Key<'_>,
        value: &Value,
        placeholders: &mut Placeholders,
        args: &mut NamedArgs,
    ) -> Result<String> {
        let column = if parsed.is_expression() {
            parsed.column.to_string()
        } else {
            self.quote(parsed.column)
        };

        if let Some(raw) = value.as_str().and_then(|s| s.strip_prefix("```")) {
            let op = parsed.op.as_sql();
            return Ok(match parsed.op {
                Op::In | Op::NotIn => format!("{column} {op} ({raw})"),
                _ => format!("{column} {op} {raw}"),
            });
        }

        match (parsed.op, value) {
            (Op::Implicit | Op::Eq, Value::Null) => Ok(format!("{column} IS NULL")),
            (Op::NotEq | Op::BangEq, Value::Null) => Ok(format!("{column} IS NOT NULL")),
            (Op::Implicit, Value::List(items)) => {
                Ok(in_list(&column, parsed, Op::In, items, placeholders, args))
            }
            (Op::In | Op::NotIn, Value::List(items)) => {
                Ok(in_list(&column, parsed, parsed.op, items, placeholders, args))
            }
            (Op::Between | Op::NotBetween, Value::List(items)) if items.len() == 2 => {
                let names = placeholders.next_series(parsed.column, 2);
                for (name, item) in names.iter().zip(items) {
                    args.insert(name.clone(), item.clone());
                }
                Ok(format!(
                    "{column} {} {} AND {}",
                    parsed.op.as_sql(),
                    names[0],
                    names[1]
                ))
            }
            (Op::In | Op::NotIn | Op::Between | Op::NotBetween, _) | (_, Value::List(_)) => {
                Err(Error::operand_type_mismatch(key))
            }
            (op, value) => {
                let name = placeholders.next(parsed.column);
                let sql = format!("{column} {} {name}", op.as_sql());
                args.insert(name, value.clone());
                Ok(sql)
            }
        }
    }
}

fn in_list(
    column: &str,
    parsed: &Key<'_>,
    op: Op,
    items: &[Value],
    placeholders: &mut Placeholders,
    args: &mut NamedArgs,
) -> String {
    // An empty set matches nothing; its negation matches everything
    if items.is_empty() {
        return if op.is_negated() { "1 = 1" } else { "1 = 0" }.to_string();
    }

    let names = placeholders.next_series(parsed.column, items.len());
    for (name, item) in names.iter().zip(items) {
        args.insert(name.clone(), item.clone());
    }

    format!("{column} {} ({})", op.as_sql(), names.join(", "))
}

fn reserve_raw_args(filter: &Filter, placeholders: &mut Placeholders) {
    for entry in filter.entries() {
        match entry {
            Entry::Raw { args, .. } => {
                for name in args.keys() {
                    placeholders.reserve(name);
                }
            }
            Entry::Group { filter, .. } => reserve_raw_args(filter, placeholders),
            Entry::Cond { .. } => {}
        }
    }
}

pub(crate) fn placeholder_name(name: &str) -> String {
    if name.starts_with(':') {
        name.to_string()
    } else {
        format!(":{name}")
    }
}
