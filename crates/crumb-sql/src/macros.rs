/// Builds a [`Filter`](crate::Filter) from `key => value` pairs.
///
/// ```
/// use crumb_sql::filter;
///
/// let filter = filter! {
///     "name ~" => "a%",
///     "age >=" => 18,
/// };
/// assert_eq!(filter.len(), 2);
/// ```
#[macro_export]
macro_rules! filter {
    () => {
        $crate::Filter::new()
    };
    ( $( $key:expr => $value:expr ),+ $(,)? ) => {{
        let mut filter = $crate::Filter::new();
        $(
            filter = filter.with($key, $value);
        )+
        filter
    }};
}
