use super::{ParamType, Value};

use indexmap::IndexMap;

/// Named arguments keyed by placeholder, including the leading colon
/// (`:name`). Order follows the placeholders in the generated SQL.
pub type NamedArgs = IndexMap<String, Value>;

/// A bound argument: the value plus an optional explicit parameter type.
///
/// When `ty` is `None` the driver binds using [`ParamType::detect`].
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub value: Value,
    pub ty: Option<ParamType>,
}

/// Statement arguments.
///
/// Positional arguments are bound starting at parameter index 1, whatever
/// their position in the vector. Named keys are normalized to start with `:`.
#[derive(Debug, Clone, PartialEq)]
pub enum Args {
    Positional(Vec<Param>),
    Named(Vec<(String, Param)>),
}

impl Param {
    pub fn new(value: impl Into<Value>) -> Param {
        Param {
            value: value.into(),
            ty: None,
        }
    }

    /// A value with an explicit parameter type, overriding detection.
    pub fn typed(value: impl Into<Value>, ty: ParamType) -> Param {
        Param {
            value: value.into(),
            ty: Some(ty),
        }
    }

    /// The parameter type used for binding.
    pub fn param_type(&self) -> ParamType {
        self.ty.unwrap_or_else(|| ParamType::detect(&self.value))
    }

    /// The value coerced to the binding type.
    pub fn bound_value(&self) -> Value {
        match self.ty {
            Some(ty) => ty.coerce(self.value.clone()),
            None => self.value.clone(),
        }
    }
}

impl Args {
    pub fn none() -> Args {
        Args::Positional(vec![])
    }

    pub fn len(&self) -> usize {
        match self {
            Args::Positional(params) => params.len(),
            Args::Named(params) => params.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns a copy of the arguments with every named key prefixed by `:`.
    pub fn normalized(self) -> Args {
        match self {
            Args::Named(params) => Args::Named(
                params
                    .into_iter()
                    .map(|(key, param)| (normalize_key(&key), param))
                    .collect(),
            ),
            positional => positional,
        }
    }

    /// Iterates `(placeholder, param)` pairs, with positional arguments
    /// rendered as their 1-based index.
    pub fn iter(&self) -> impl Iterator<Item = (ArgKey<'_>, &Param)> {
        let (positional, named) = match self {
            Args::Positional(params) => (Some(params), None),
            Args::Named(params) => (None, Some(params)),
        };

        let positional = positional
            .into_iter()
            .flatten()
            .enumerate()
            .map(|(i, param)| (ArgKey::Index(i + 1), param));
        let named = named
            .into_iter()
            .flatten()
            .map(|(key, param)| (ArgKey::Name(key.as_str()), param));

        positional.chain(named)
    }
}

/// Where an argument is bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKey<'a> {
    /// 1-based positional index.
    Index(usize),
    Name(&'a str),
}

fn normalize_key(key: &str) -> String {
    if key.starts_with(':') {
        key.to_string()
    } else {
        format!(":{key}")
    }
}

impl From<()> for Args {
    fn from(_: ()) -> Self {
        Args::none()
    }
}

impl From<Vec<Value>> for Args {
    fn from(values: Vec<Value>) -> Self {
        Args::Positional(values.into_iter().map(Param::new).collect())
    }
}

impl From<Vec<Param>> for Args {
    fn from(params: Vec<Param>) -> Self {
        Args::Positional(params)
    }
}

impl<T: Into<Value>, const N: usize> From<[T; N]> for Args {
    fn from(values: [T; N]) -> Self {
        Args::Positional(values.into_iter().map(Param::new).collect())
    }
}

impl From<NamedArgs> for Args {
    fn from(args: NamedArgs) -> Self {
        Args::Named(
            args.into_iter()
                .map(|(key, value)| (normalize_key(&key), Param::new(value)))
                .collect(),
        )
    }
}

impl From<&NamedArgs> for Args {
    fn from(args: &NamedArgs) -> Self {
        Args::from(args.clone())
    }
}

impl<K: Into<String>> From<Vec<(K, Value)>> for Args {
    fn from(args: Vec<(K, Value)>) -> Self {
        Args::Named(
            args.into_iter()
                .map(|(key, value)| (normalize_key(&key.into()), Param::new(value)))
                .collect(),
        )
    }
}
