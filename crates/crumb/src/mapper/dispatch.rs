use super::Mapper;

use crumb_core::{stmt::Value, Error, Result};
use crumb_sql::{Filter, QueryOptions};

use heck::ToSnakeCase;

/// A convenience method recognized by name, such as `findByEmail`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    /// `get<Field>`
    Get(String),

    /// `findBy<Field>`
    FindBy(String),

    /// `findOneBy<Field>`
    FindOneBy(String),

    /// `loadBy<Field>`
    LoadBy(String),
}

/// The outcome of [`Mapper::call`].
#[derive(Debug)]
pub enum Dispatched {
    Value(Value),
    Found(Mapper),

    /// The calling mapper was loaded in place.
    Loaded,
}

impl Method {
    /// Parses a method name. Prefixes match case-insensitively and the
    /// field name is converted to snake case.
    pub fn parse(name: &str) -> Option<Method> {
        // Longest prefix first: `findoneby` would otherwise match `findby`
        const PREFIXES: [(&str, fn(String) -> Method); 4] = [
            ("findoneby", Method::FindOneBy),
            ("findby", Method::FindBy),
            ("loadby", Method::LoadBy),
            ("get", Method::Get),
        ];

        PREFIXES.iter().find_map(|(prefix, method)| {
            let head = name.get(..prefix.len())?;
            let field = &name[prefix.len()..];

            if head.eq_ignore_ascii_case(prefix) && !field.is_empty() {
                Some(method(field.to_snake_case()))
            } else {
                None
            }
        })
    }

    pub fn field(&self) -> &str {
        match self {
            Method::Get(field)
            | Method::FindBy(field)
            | Method::FindOneBy(field)
            | Method::LoadBy(field) => field,
        }
    }
}

impl Mapper {
    /// Calls a convenience method by name. The first argument is the value
    /// the field is matched against; further arguments are ignored.
    pub fn call(&mut self, name: &str, args: Vec<Value>) -> Result<Dispatched> {
        let method = Method::parse(name).ok_or_else(|| Error::undefined_method(name))?;
        let value = args.into_iter().next().unwrap_or_default();
        let filter = || Filter::new().with(method.field(), value.clone());

        Ok(match &method {
            Method::Get(field) => Dispatched::Value(self.get(field)?),
            Method::FindBy(_) => Dispatched::Found(self.find(filter(), QueryOptions::new())?),
            Method::FindOneBy(_) => Dispatched::Found(self.find_one(filter(), QueryOptions::new())?),
            Method::LoadBy(_) => {
                self.load(filter(), QueryOptions::new())?;
                Dispatched::Loaded
            }
        })
    }
}
