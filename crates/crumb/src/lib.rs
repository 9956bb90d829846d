pub mod cache;
pub use cache::{Cache, Cached, MemoryCache};

pub mod db;
pub use db::Connection;

pub mod mapper;
pub use mapper::{DeleteMode, Dispatched, Event, Mapper, Method, Page};

pub use crumb_core::{
    bail,
    driver::{Response, Row},
    err,
    stmt::{Args, NamedArgs, Param, ParamType, Value},
    Error, Record, Result, Schema,
};

pub use crumb_sql::{filter, Filter, Join, QueryOptions};
