use super::{limit_offset, quote_parts, Dialect, Paging, PagingClause};

#[derive(Debug, Clone, Copy)]
pub struct Postgresql;

impl Dialect for Postgresql {
    fn name(&self) -> &'static str {
        "pgsql"
    }

    fn quote_identifier(&self, ident: &str) -> String {
        quote_parts(ident, '"', '"')
    }

    fn paging(&self, paging: &Paging<'_>) -> Option<PagingClause> {
        limit_offset(paging, None)
    }

    fn returning(&self, columns: &[&str]) -> Option<String> {
        if columns.is_empty() {
            return None;
        }

        let columns = columns
            .iter()
            .map(|column| self.quote_identifier(column))
            .collect::<Vec<_>>();
        Some(format!("RETURNING {}", columns.join(", ")))
    }

    fn placeholder(&self, index: usize) -> String {
        format!("${index}")
    }
}
