use std::collections::HashSet;

/// Hands out unique named placeholders for one statement.
///
/// A column `foo` gets `:foo`; later uses of the same base get `:foo__2`,
/// `:foo__3`, ... Names already bound elsewhere in the statement are
/// reserved up front so they are never reused.
#[derive(Debug, Default)]
pub(crate) struct Placeholders {
    taken: HashSet<String>,
}

impl Placeholders {
    pub(crate) fn new<'a>(reserved: impl IntoIterator<Item = &'a str>) -> Placeholders {
        let mut placeholders = Placeholders::default();
        for name in reserved {
            placeholders.reserve(name);
        }
        placeholders
    }

    pub(crate) fn reserve(&mut self, name: &str) {
        self.taken.insert(normalize(name));
    }

    /// Allocates a single placeholder for `column`.
    pub(crate) fn next(&mut self, column: &str) -> String {
        self.next_series(column, 0).remove(0)
    }

    /// Allocates `len` numbered placeholders (`:foo1`, `:foo2`, ...) sharing
    /// one base, or the bare base when `len` is zero.
    pub(crate) fn next_series(&mut self, column: &str, len: usize) -> Vec<String> {
        let base = sanitize(column);

        let mut attempt = 1usize;

        loop {
            let candidate = if attempt == 1 {
                format!(":{base}")
            } else {
                format!(":{base}__{attempt}")
            };

            let names: Vec<String> = if len == 0 {
                vec![candidate.clone()]
            } else {
                (1..=len).map(|i| format!("{candidate}{i}")).collect()
            };

            let free = !self.taken.contains(&candidate)
                && names.iter().all(|name| !self.taken.contains(name));

            if free {
                self.taken.insert(candidate);
                self.taken.extend(names.iter().cloned());
                return names;
            }

            attempt += 1;
        }
    }
}

fn normalize(name: &str) -> String {
    if name.starts_with(':') {
        name.to_string()
    } else {
        format!(":{name}")
    }
}

/// Reduces a column or expression to identifier characters.
fn sanitize(column: &str) -> String {
    let base: String = column
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    let base = base.trim_matches('_');

    if base.is_empty() {
        "p".to_string()
    } else {
        base.to_string()
    }
}
