use crate::{builder::Clause, Filter, QueryBuilder};

use crumb_core::{
    dialect::{Paging, PagingClause},
    Dialect, Result,
};

/// Everything after the WHERE condition of a SELECT.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryOptions {
    pub group: Option<String>,
    pub having: Option<Filter>,
    pub order: Option<String>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    pub joins: Vec<Join>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub kind: JoinKind,
    pub table: String,
    pub alias: Option<String>,

    /// Raw join condition.
    pub on: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
}

/// The rendered clauses following `FROM table`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tail {
    /// JOIN, WHERE, GROUP BY, HAVING, ORDER BY and inline paging, with the
    /// named arguments of WHERE and HAVING.
    pub clause: Clause,

    /// Set when the dialect pages through a `ROW_NUMBER()` subquery instead
    /// of an inline clause.
    pub row_number: Option<RowNumber>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowNumber {
    pub order: String,
    pub limit: Option<u64>,
    pub offset: u64,
}

impl QueryOptions {
    pub fn new() -> QueryOptions {
        QueryOptions::default()
    }

    pub fn group(mut self, group: impl Into<String>) -> QueryOptions {
        self.group = Some(group.into());
        self
    }

    pub fn having(mut self, having: Filter) -> QueryOptions {
        self.having = Some(having);
        self
    }

    pub fn order(mut self, order: impl Into<String>) -> QueryOptions {
        self.order = Some(order.into());
        self
    }

    pub fn limit(mut self, limit: u64) -> QueryOptions {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> QueryOptions {
        self.offset = Some(offset);
        self
    }

    pub fn join(mut self, join: Join) -> QueryOptions {
        self.joins.push(join);
        self
    }

    /// A copy without ORDER BY and paging, as used for counting.
    pub fn unpaged(&self) -> QueryOptions {
        QueryOptions {
            order: None,
            limit: None,
            offset: None,
            ..self.clone()
        }
    }
}

impl Join {
    pub fn inner(table: impl Into<String>, on: impl Into<String>) -> Join {
        Join::new(JoinKind::Inner, table, on)
    }

    pub fn left(table: impl Into<String>, on: impl Into<String>) -> Join {
        Join::new(JoinKind::Left, table, on)
    }

    pub fn right(table: impl Into<String>, on: impl Into<String>) -> Join {
        Join::new(JoinKind::Right, table, on)
    }

    fn new(kind: JoinKind, table: impl Into<String>, on: impl Into<String>) -> Join {
        Join {
            kind,
            table: table.into(),
            alias: None,
            on: on.into(),
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Join {
        self.alias = Some(alias.into());
        self
    }

    pub fn to_sql(&self, dialect: &dyn Dialect) -> String {
        let kind = match self.kind {
            JoinKind::Inner => "INNER",
            JoinKind::Left => "LEFT",
            JoinKind::Right => "RIGHT",
        };
        let table = dialect.quote_identifier(&self.table);

        match &self.alias {
            Some(alias) => format!(
                "{kind} JOIN {table} AS {} ON {}",
                dialect.quote_identifier(alias),
                self.on
            ),
            None => format!("{kind} JOIN {table} ON {}", self.on),
        }
    }
}

impl QueryBuilder<'_> {
    /// Renders the clauses following `FROM table`.
    ///
    /// HAVING placeholders never collide with WHERE placeholders. When the
    /// dialect pages with `ROW_NUMBER()`, ORDER BY is left out of the clause
    /// and returned in [`Tail::row_number`].
    pub fn filter_options(&self, filter: &Filter, options: &QueryOptions) -> Result<Tail> {
        self.tail(filter, options, None)
    }

    /// Like [`QueryBuilder::filter_options`] for a table selected under
    /// `alias`; the default paging order names the aliased key columns.
    pub(crate) fn tail(
        &self,
        filter: &Filter,
        options: &QueryOptions,
        alias: Option<&str>,
    ) -> Result<Tail> {
        let mut parts: Vec<String> = options
            .joins
            .iter()
            .map(|join| join.to_sql(self.dialect))
            .collect();

        let Clause { sql, mut args } = self.filter(filter, &[])?;
        if !sql.is_empty() {
            parts.push(format!("WHERE {sql}"));
        }

        if let Some(group) = non_empty(&options.group) {
            parts.push(format!("GROUP BY {group}"));
        }

        if let Some(having) = &options.having {
            let lookup: Vec<&str> = args.keys().map(String::as_str).collect();
            let clause = self.filter(having, &lookup)?;
            if !clause.sql.is_empty() {
                parts.push(format!("HAVING {}", clause.sql));
                args.extend(clause.args);
            }
        }

        let order = non_empty(&options.order);
        let primary_keys: Vec<String> = self
            .schema
            .primary_keys()
            .map(|column| match alias {
                Some(alias) => format!("{alias}.{}", column.name),
                None => column.name.clone(),
            })
            .collect();
        let primary_keys: Vec<&str> = primary_keys.iter().map(String::as_str).collect();
        let paging = Paging {
            limit: options.limit,
            offset: options.offset,
            order,
            primary_keys: &primary_keys,
        };

        let mut row_number = None;
        match self.dialect.paging(&paging) {
            Some(PagingClause::RowNumber { order }) => {
                row_number = Some(RowNumber {
                    order,
                    limit: paging.limit,
                    offset: paging.skip().unwrap_or(0),
                });
            }
            inline => {
                if let Some(order) = order {
                    parts.push(format!("ORDER BY {order}"));
                }
                if let Some(PagingClause::Inline(clause)) = inline {
                    parts.push(clause);
                }
            }
        }

        Ok(Tail {
            clause: Clause {
                sql: parts.join(" "),
                args,
            },
            row_number,
        })
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}
