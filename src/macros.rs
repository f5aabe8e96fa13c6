//! The [`collection!`] macro for building documents literally.

/// Builds a [`Document`](crate::Document) from `key => value` pairs.
///
/// A bracketed value list builds a multi-valued item set; a bare value
/// builds a single-valued one. Values go through [`Value::from`](crate::Value),
/// so string, integer, float, and boolean literals all work directly.
///
/// # Panics
///
/// Panics if a key literal is invalid; keys in a `collection!` literal are
/// author-controlled, so this is treated like an out-of-bounds index.
///
/// # Examples
///
/// ```rust
/// use collex::collection;
///
/// let mut doc = collection! {
///     "name" => "Ann",
///     "age" => 30,
///     "tags" => ["x", "y"],
/// };
///
/// assert_eq!(doc.strings("tags").unwrap(), vec!["x", "y"]);
/// assert_eq!(doc.ints("age").unwrap(), vec![30]);
/// ```
#[macro_export]
macro_rules! collection {
    ($($key:literal => $value:tt),* $(,)?) => {{
        #[allow(unused_mut)]
        let mut doc = $crate::Document::new();
        $( $crate::collection_entry!(doc, $key, $value); )*
        doc
    }};
}

#[doc(hidden)]
#[macro_export]
macro_rules! collection_entry {
    ($doc:ident, $key:literal, [$($value:expr),+ $(,)?]) => {
        $doc.put($key, vec![$($crate::Value::from($value)),+])
            .expect("invalid key in collection! literal");
    };
    ($doc:ident, $key:literal, $value:expr) => {
        $doc.put_one($key, $crate::Value::from($value))
            .expect("invalid key in collection! literal");
    };
}
