//! Placeholder rewriting.

use crumb_core::{
    stmt::{Args, Param},
    Dialect,
};

enum Placeholder<'a> {
    /// `:name`, including the colon.
    Named(&'a str),
    Positional,
}

/// Renders `sql` with every bound placeholder replaced by the literal value
/// of its argument. Used for logging and cache keys, never for execution.
pub fn interpolate(sql: &str, args: &Args) -> String {
    match args {
        Args::Named(params) => rewrite(sql, |placeholder| match placeholder {
            Placeholder::Named(name) => params
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, param)| param.bound_value().to_literal()),
            Placeholder::Positional => None,
        }),
        Args::Positional(params) => {
            let mut params = params.iter();
            rewrite(sql, |placeholder| match placeholder {
                Placeholder::Positional => params.next().map(|param| param.bound_value().to_literal()),
                Placeholder::Named(_) => None,
            })
        }
    }
}

/// Rewrites named placeholders into the positional form of `dialect`,
/// returning the parameters in binding order. A name used twice is bound
/// twice. Positional arguments are renumbered for dialects with indexed
/// placeholders.
pub fn positional(sql: &str, args: &Args, dialect: &dyn Dialect) -> (String, Vec<Param>) {
    let mut bound: Vec<Param> = vec![];

    let sql = match args {
        Args::Named(params) => rewrite(sql, |placeholder| match placeholder {
            Placeholder::Named(name) => {
                let (_, param) = params.iter().find(|(key, _)| key == name)?;
                bound.push(param.clone());
                Some(dialect.placeholder(bound.len()))
            }
            Placeholder::Positional => None,
        }),
        Args::Positional(params) => {
            let mut params = params.iter();
            rewrite(sql, |placeholder| match placeholder {
                Placeholder::Positional => {
                    bound.push(params.next()?.clone());
                    Some(dialect.placeholder(bound.len()))
                }
                Placeholder::Named(_) => None,
            })
        }
    };

    (sql, bound)
}

/// Walks `sql` outside of quoted strings and identifiers, replacing each
/// placeholder for which `f` returns a value.
fn rewrite(sql: &str, mut f: impl FnMut(Placeholder<'_>) -> Option<String>) -> String {
    let mut out = String::with_capacity(sql.len());
    let mut chars = sql.char_indices().peekable();
    let mut quote: Option<char> = None;

    while let Some((start, c)) = chars.next() {
        if let Some(open) = quote {
            out.push(c);
            if c == open {
                quote = None;
            }
            continue;
        }

        match c {
            '\'' | '"' | '`' => {
                quote = Some(c);
                out.push(c);
            }
            ':' => {
                // `::` is a cast, not a placeholder
                if let Some((_, ':')) = chars.peek() {
                    chars.next();
                    out.push_str("::");
                    continue;
                }

                let mut end = start + 1;
                while let Some(&(i, next)) = chars.peek() {
                    if next.is_ascii_alphanumeric() || next == '_' {
                        end = i + next.len_utf8();
                        chars.next();
                    } else {
                        break;
                    }
                }

                let name = &sql[start..end];
                if name.len() == 1 {
                    out.push(':');
                    continue;
                }

                match f(Placeholder::Named(name)) {
                    Some(replacement) => out.push_str(&replacement),
                    None => out.push_str(name),
                }
            }
            '?' => match f(Placeholder::Positional) {
                Some(replacement) => out.push_str(&replacement),
                None => out.push('?'),
            },
            _ => out.push(c),
        }
    }

    out
}
