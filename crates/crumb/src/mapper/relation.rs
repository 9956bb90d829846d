//! Relations load a new, independent mapper for the related table.
//!
//! Key pairs are written `"fk=pk"`: the foreign key column and the key it
//! references. A row whose key is null, such as the draft of a dry mapper,
//! has no related rows; the related mapper is returned empty without a
//! query.

use super::Mapper;

use crumb_core::{stmt::Value, Error, Record, Result};
use crumb_sql::{Filter, Join, QueryOptions};

use std::time::Duration;

impl Mapper {
    /// The first `target` row whose foreign key references this row.
    /// `keys` defaults to `{table}_id=id`.
    pub fn has_one(&self, target: &str, keys: Option<&str>) -> Result<Mapper> {
        let (fk, pk) = parse_keys(keys, || format!("{}_id", self.table()))?;

        let mut related = Mapper::new(&self.conn, target)?;
        let Some(value) = self.key_value(&pk)? else {
            return Ok(related);
        };

        related.load(Filter::new().with(fk, value), QueryOptions::new().limit(1))?;
        Ok(related)
    }

    /// Every `target` row whose foreign key references this row.
    /// `keys` defaults to `{table}_id=id`.
    pub fn has_many(&self, target: &str, keys: Option<&str>, options: QueryOptions) -> Result<Mapper> {
        let (fk, pk) = parse_keys(keys, || format!("{}_id", self.table()))?;

        let mut related = Mapper::new(&self.conn, target)?;
        let Some(value) = self.key_value(&pk)? else {
            return Ok(related);
        };

        related.load(Filter::new().with(fk, value), options)?;
        Ok(related)
    }

    /// The `target` row referenced by a foreign key of this row.
    /// `keys` defaults to `{target}_id=id`.
    pub fn belongs_to(&self, target: &str, keys: Option<&str>) -> Result<Mapper> {
        let (fk, pk) = parse_keys(keys, || format!("{target}_id"))?;

        let mut related = Mapper::new(&self.conn, target)?;
        let Some(value) = self.key_value(&fk)? else {
            return Ok(related);
        };

        related.load(Filter::new().with(pk, value), QueryOptions::new().limit(1))?;
        Ok(related)
    }

    /// The `target` rows linked to this row through the `bridge` table.
    ///
    /// `keys` holds the bridge key pair referencing this table and the one
    /// referencing `target`, defaulting to `{table}_id=id` and
    /// `{target}_id=id`. In `options`, columns of the target, bridge and
    /// this table are reachable through the aliases `t`, `b` and `s`.
    pub fn belongs_to_many(
        &self,
        target: &str,
        bridge: &str,
        keys: Option<(&str, &str)>,
        mut options: QueryOptions,
    ) -> Result<Mapper> {
        let (own_keys, target_keys) = keys.unzip();
        let (own_fk, own_pk) = parse_keys(own_keys, || format!("{}_id", self.table()))?;
        let (target_fk, target_pk) = parse_keys(target_keys, || format!("{target}_id"))?;

        let mut related = Mapper::new(&self.conn, target)?;
        let Some(value) = self.key_value(&own_pk)? else {
            return Ok(related);
        };

        let dialect = self.conn.dialect();
        let quote = |ident: String| dialect.quote_identifier(&ident);

        let joins = [
            Join::inner(
                bridge,
                format!(
                    "{} = {}",
                    quote(format!("b.{target_fk}")),
                    quote(format!("t.{target_pk}"))
                ),
            )
            .alias("b"),
            Join::inner(
                self.table(),
                format!(
                    "{} = {}",
                    quote(format!("s.{own_pk}")),
                    quote(format!("b.{own_fk}"))
                ),
            )
            .alias("s"),
        ];
        options.joins = joins.into_iter().chain(std::mem::take(&mut options.joins)).collect();

        let fields = related
            .fields()
            .map(|name| quote(format!("t.{name}")))
            .collect::<Vec<_>>()
            .join(", ");
        let filter = Filter::new().with(format!("s.{own_pk}"), value);

        let statement = related
            .builder()
            .select_from(&fields, "t", &filter, &options)?;
        let rows = self
            .conn
            .exec(&statement.sql, statement.args, Duration::ZERO)?
            .into_rows();

        related.rows = rows
            .iter()
            .map(|row| Record::hydrate(&related.schema, &related.template, row))
            .collect();
        related.cursor = 0;
        Ok(related)
    }

    /// The value of a key field, or `None` while it is null.
    fn key_value(&self, field: &str) -> Result<Option<Value>> {
        match self.peek(field) {
            Some(value) => Ok(Some(value.clone()).filter(|value| !value.is_null())),
            None => Err(Error::undefined_field(self.table(), field)),
        }
    }
}

fn parse_keys(keys: Option<&str>, default_fk: impl FnOnce() -> String) -> Result<(String, String)> {
    let Some(keys) = keys else {
        return Ok((default_fk(), "id".to_string()));
    };

    match keys.split_once('=') {
        Some((fk, pk)) if !fk.trim().is_empty() && !pk.trim().is_empty() => {
            Ok((fk.trim().to_string(), pk.trim().to_string()))
        }
        _ => Err(Error::invalid_filter(keys, "relation keys must be written `fk=pk`")),
    }
}
