use super::{quote_parts, Dialect, Paging, PagingClause};

/// Oracle 12c and later (row limiting clause).
#[derive(Debug, Clone, Copy)]
pub struct Oracle;

impl Dialect for Oracle {
    fn name(&self) -> &'static str {
        "oci"
    }

    fn quote_identifier(&self, ident: &str) -> String {
        quote_parts(ident, '"', '"')
    }

    fn paging(&self, paging: &Paging<'_>) -> Option<PagingClause> {
        let clause = match (paging.limit, paging.skip()) {
            (None, None) => return None,
            (Some(limit), None) => format!("FETCH FIRST {limit} ROWS ONLY"),
            (Some(limit), Some(offset)) => {
                format!("OFFSET {offset} ROWS FETCH NEXT {limit} ROWS ONLY")
            }
            (None, Some(offset)) => format!("OFFSET {offset} ROWS"),
        };
        Some(PagingClause::Inline(clause))
    }

    fn placeholder(&self, index: usize) -> String {
        format!(":{index}")
    }
}
