#[macro_use]
mod macros;

mod builder;
pub use builder::{Clause, QueryBuilder};

pub mod filter;
pub use filter::{Connector, Filter, Joint};

mod key;

pub mod options;
pub use options::{Join, JoinKind, QueryOptions, RowNumber, Tail};

pub mod params;

mod placeholders;

pub mod statement;
pub use statement::{IdentityInsert, InsertStatement, Statement};
