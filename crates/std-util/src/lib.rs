pub mod option;
pub mod result;

pub mod prelude {
    pub use crate::{assert_empty, assert_err, assert_none, assert_ok, assert_some};
}

/// Asserts that a collection has no elements.
#[macro_export]
macro_rules! assert_empty {
    ($e:expr) => {{
        let value = &$e;
        assert!(value.is_empty(), "expected empty; actual={:?}", value);
    }};
}
