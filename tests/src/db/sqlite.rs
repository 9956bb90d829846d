use crumb::{db::Builder, Connection};

use crate::Setup;

pub struct SetupSqlite;

impl SetupSqlite {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SetupSqlite {
    fn default() -> Self {
        Self::new()
    }
}

impl Setup for SetupSqlite {
    fn connect(&self, mut builder: Builder) -> crumb::Result<Connection> {
        // Every connection opens its own in-memory database
        builder.connect("sqlite::memory:")
    }

    fn serial_key(&self) -> &'static str {
        "INTEGER PRIMARY KEY AUTOINCREMENT"
    }
}
