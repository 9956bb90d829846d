use super::{limit_offset, Dialect, Paging, PagingClause};

#[derive(Debug, Clone, Copy)]
pub struct Mysql;

impl Dialect for Mysql {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn paging(&self, paging: &Paging<'_>) -> Option<PagingClause> {
        // MySQL has no "all rows" limit; the documented workaround is the
        // largest unsigned BIGINT.
        limit_offset(paging, Some("18446744073709551615"))
    }
}
