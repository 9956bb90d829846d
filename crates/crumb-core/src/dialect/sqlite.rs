use super::{limit_offset, Dialect, Paging, PagingClause};

#[derive(Debug, Clone, Copy)]
pub struct Sqlite;

impl Dialect for Sqlite {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn paging(&self, paging: &Paging<'_>) -> Option<PagingClause> {
        // SQLite only accepts OFFSET after a LIMIT; -1 means "no limit"
        limit_offset(paging, Some("-1"))
    }

    fn placeholder(&self, index: usize) -> String {
        format!("?{index}")
    }
}
