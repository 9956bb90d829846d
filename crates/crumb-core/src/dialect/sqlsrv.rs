use super::{quote_parts, Dialect, Paging, PagingClause};

/// SQL Server 2012 and later, paging with `OFFSET ... FETCH`.
#[derive(Debug, Clone, Copy)]
pub struct SqlServer;

/// SQL Server family drivers without `OFFSET` support (mssql, dblib, sybase,
/// odbc). Paging is emulated with `ROW_NUMBER()`.
#[derive(Debug, Clone, Copy)]
pub struct LegacySqlServer;

impl Dialect for SqlServer {
    fn name(&self) -> &'static str {
        "sqlsrv"
    }

    fn quote_identifier(&self, ident: &str) -> String {
        quote_parts(ident, '[', ']')
    }

    fn paging(&self, paging: &Paging<'_>) -> Option<PagingClause> {
        if paging.is_empty() {
            return None;
        }

        let mut clause = String::new();

        // OFFSET/FETCH is only valid after an ORDER BY
        if !paging.order.is_some_and(|order| !order.trim().is_empty()) {
            clause.push_str("ORDER BY ");
            clause.push_str(&paging.order_or_keys(self));
            clause.push(' ');
        }

        clause.push_str(&format!("OFFSET {} ROWS", paging.offset.unwrap_or(0)));

        if let Some(limit) = paging.limit {
            clause.push_str(&format!(" FETCH NEXT {limit} ROWS ONLY"));
        }

        Some(PagingClause::Inline(clause))
    }

    fn identity_insert(&self, table: &str, enable: bool) -> Option<String> {
        identity_insert(self, table, enable)
    }
}

impl Dialect for LegacySqlServer {
    fn name(&self) -> &'static str {
        "mssql"
    }

    fn quote_identifier(&self, ident: &str) -> String {
        quote_parts(ident, '[', ']')
    }

    fn paging(&self, paging: &Paging<'_>) -> Option<PagingClause> {
        if paging.is_empty() {
            return None;
        }

        Some(PagingClause::RowNumber {
            order: paging.order_or_keys(self),
        })
    }

    fn identity_insert(&self, table: &str, enable: bool) -> Option<String> {
        identity_insert(self, table, enable)
    }
}

fn identity_insert(dialect: &dyn Dialect, table: &str, enable: bool) -> Option<String> {
    Some(format!(
        "SET IDENTITY_INSERT {} {}",
        dialect.quote_identifier(table),
        if enable { "ON" } else { "OFF" }
    ))
}
