use crate::filter::{Connector, Joint};

use crumb_core::{Error, Result};

const CONNECTOR_CHARS: &[char] = &['&', '|', '^', '!'];
const OPERATOR_CHARS: &[char] = &['=', '<', '>', '!', '~', '@', '[', ']'];

/// A parsed filter key: `[connector] column [operator] [# comment]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Key<'a> {
    pub joint: Joint,
    pub column: &'a str,
    pub op: Op,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Op {
    /// No operator given; `=`, `IN` or `IS NULL` depending on the value.
    Implicit,
    Eq,
    NotEq,
    BangEq,
    Lt,
    Gt,
    Le,
    Ge,
    Like,
    NotLike,
    SoundsLike,
    In,
    NotIn,
    Between,
    NotBetween,
}

impl<'a> Key<'a> {
    pub(crate) fn parse(key: &'a str) -> Result<Key<'a>> {
        let body = match key.split_once('#') {
            Some((body, _)) => body,
            None => key,
        }
        .trim();

        let column_start = body
            .find(|c: char| !CONNECTOR_CHARS.contains(&c) && !c.is_whitespace())
            .ok_or_else(|| Error::invalid_filter(key, "missing column"))?;
        let column_end = body
            .rfind(|c: char| !OPERATOR_CHARS.contains(&c) && !c.is_whitespace())
            .map(|i| i + body[i..].chars().next().map_or(1, char::len_utf8))
            .unwrap_or(column_start);

        if column_end <= column_start {
            return Err(Error::invalid_filter(key, "missing column"));
        }

        let joint = parse_joint(&body[..column_start]);
        let op: String = body[column_end..]
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        let op = Op::parse(&op).ok_or_else(|| Error::invalid_filter(key, "unknown operator"))?;

        Ok(Key {
            joint,
            column: body[column_start..column_end].trim(),
            op,
        })
    }

    /// Columns holding parentheses or spaces are SQL expressions and are used
    /// verbatim.
    pub(crate) fn is_expression(&self) -> bool {
        self.column.contains(['(', ' '])
    }
}

fn parse_joint(prefix: &str) -> Joint {
    let mut joint = Joint::default();

    for c in prefix.chars() {
        match c {
            '&' => joint.connector = Connector::And,
            '|' => joint.connector = Connector::Or,
            '^' => joint.connector = Connector::Xor,
            '!' => joint.not = true,
            _ => {}
        }
    }

    joint
}

impl Op {
    fn parse(op: &str) -> Option<Op> {
        Some(match op {
            "" => Op::Implicit,
            "=" => Op::Eq,
            "<>" => Op::NotEq,
            "!=" => Op::BangEq,
            "<" => Op::Lt,
            ">" => Op::Gt,
            "<=" => Op::Le,
            ">=" => Op::Ge,
            "~" => Op::Like,
            "!~" => Op::NotLike,
            "@" => Op::SoundsLike,
            "[]" => Op::In,
            "![]" => Op::NotIn,
            "><" => Op::Between,
            "!><" => Op::NotBetween,
            _ => return None,
        })
    }

    pub(crate) fn as_sql(self) -> &'static str {
        match self {
            Op::Implicit | Op::Eq => "=",
            Op::NotEq => "<>",
            Op::BangEq => "!=",
            Op::Lt => "<",
            Op::Gt => ">",
            Op::Le => "<=",
            Op::Ge => ">=",
            Op::Like => "LIKE",
            Op::NotLike => "NOT LIKE",
            Op::SoundsLike => "SOUNDS LIKE",
            Op::In => "IN",
            Op::NotIn => "NOT IN",
            Op::Between => "BETWEEN",
            Op::NotBetween => "NOT BETWEEN",
        }
    }

    pub(crate) fn is_negated(self) -> bool {
        matches!(
            self,
            Op::NotEq | Op::BangEq | Op::NotLike | Op::NotIn | Op::NotBetween
        )
    }
}
