use crumb_core::stmt::{NamedArgs, Value};

/// A filter expression: an ordered list of conditions, raw fragments and
/// nested groups.
///
/// Condition keys carry their own connector and operator, e.g. `"|age >="`
/// reads as `OR age >= :age`. See [`QueryBuilder::filter`] for the full key
/// grammar.
///
/// [`QueryBuilder::filter`]: crate::QueryBuilder::filter
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    entries: Vec<Entry>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    /// `key => value` condition.
    Cond { key: String, value: Value },

    /// Raw SQL, with its own named arguments.
    Raw { sql: String, args: NamedArgs },

    /// Parenthesized sub-filter.
    Group { joint: Joint, filter: Filter },
}

/// How a fragment attaches to the fragment before it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Joint {
    pub connector: Connector,
    pub not: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Connector {
    #[default]
    And,
    Or,
    Xor,
}

impl Filter {
    pub fn new() -> Filter {
        Filter::default()
    }

    /// Adds a `key => value` condition.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Filter {
        self.entries.push(Entry::Cond {
            key: key.into(),
            value: value.into(),
        });
        self
    }

    /// Adds a raw SQL fragment, joined with `AND`.
    pub fn raw(self, sql: impl Into<String>) -> Filter {
        self.raw_with(sql, NamedArgs::new())
    }

    /// Adds a raw SQL fragment using named placeholders bound from `args`.
    pub fn raw_with(mut self, sql: impl Into<String>, args: NamedArgs) -> Filter {
        self.entries.push(Entry::Raw {
            sql: sql.into(),
            args,
        });
        self
    }

    /// Adds a parenthesized sub-filter joined with `AND`.
    pub fn group(self, filter: Filter) -> Filter {
        self.group_with(Joint::default(), filter)
    }

    /// Adds a parenthesized sub-filter joined with `OR`.
    pub fn or_group(self, filter: Filter) -> Filter {
        self.group_with(
            Joint {
                connector: Connector::Or,
                not: false,
            },
            filter,
        )
    }

    pub fn group_with(mut self, joint: Joint, filter: Filter) -> Filter {
        self.entries.push(Entry::Group { joint, filter });
        self
    }

    /// Appends every entry of `other`.
    pub fn extend(mut self, other: Filter) -> Filter {
        self.entries.extend(other.entries);
        self
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Filter {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Filter {
        iter.into_iter()
            .fold(Filter::new(), |filter, (key, value)| filter.with(key, value))
    }
}

impl From<&str> for Filter {
    fn from(sql: &str) -> Filter {
        Filter::new().raw(sql)
    }
}

impl From<String> for Filter {
    fn from(sql: String) -> Filter {
        Filter::new().raw(sql)
    }
}

impl Connector {
    pub fn as_sql(self) -> &'static str {
        match self {
            Connector::And => "AND",
            Connector::Or => "OR",
            Connector::Xor => "XOR",
        }
    }
}
