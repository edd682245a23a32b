/// Convenient macro for constructing a [`Value`][crate::Value] map.
///
/// The input is the contents of a map: `key: value` pairs where keys are
/// identifiers and values are nested maps `{ ... }`, lists `[ ... ]`, `None`
/// or any expression that implements `Into<Value>`.
///
/// # Examples
///
/// ```
/// let ctx = stencil::value! {
///     user: {
///         name: "John Smith",
///         age: 42,
///     },
///     tags: ["admin", "staff"],
///     manager: None,
/// };
/// ```
// Heavily based on `serde_json::json!`
#[macro_export]
macro_rules! value {
    () => {
        $crate::Value::Map($crate::Map::new())
    };
    ($($tt:tt)+) => {
        $crate::_value!({ $($tt)+ })
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! _value {
    //////////////////////////////////////////////////////////////////////////
    // TT muncher for parsing the inside of a list [...]. Produces a List of
    // the elements.
    //
    // Must be invoked as: _value!(@list [] $($tt)*)
    //////////////////////////////////////////////////////////////////////////

    // Done with trailing comma.
    (@list [$($elems:expr,)*]) => {
        $crate::_value_list![$($elems,)*]
    };

    // Done without trailing comma.
    (@list [$($elems:expr),*]) => {
        $crate::_value_list![$($elems),*]
    };

    // Next element is `None`.
    (@list [$($elems:expr,)*] None $($rest:tt)*) => {
        $crate::_value!(@list [$($elems,)* $crate::_value!(None)] $($rest)*)
    };

    // Next element is a list.
    (@list [$($elems:expr,)*] [$($list:tt)*] $($rest:tt)*) => {
        $crate::_value!(@list [$($elems,)* $crate::_value!([$($list)*])] $($rest)*)
    };

    // Next element is a map.
    (@list [$($elems:expr,)*] {$($map:tt)*} $($rest:tt)*) => {
        $crate::_value!(@list [$($elems,)* $crate::_value!({$($map)*})] $($rest)*)
    };

    // Next element is an expression followed by comma.
    (@list [$($elems:expr,)*] $next:expr, $($rest:tt)*) => {
        $crate::_value!(@list [$($elems,)* $crate::_value!($next),] $($rest)*)
    };

    // Last element is an expression with no trailing comma.
    (@list [$($elems:expr,)*] $last:expr) => {
        $crate::_value!(@list [$($elems,)* $crate::_value!($last)])
    };

    // Comma after the most recent element.
    (@list [$($elems:expr),*] , $($rest:tt)*) => {
        $crate::_value!(@list [$($elems,)*] $($rest)*)
    };

    //////////////////////////////////////////////////////////////////////////
    // TT muncher for parsing the inside of a map {...}. Each entry is
    // inserted into the given map variable.
    //
    // Must be invoked as: _value!(@map $map () ($($tt)*))
    //////////////////////////////////////////////////////////////////////////

    // Done.
    (@map $map:ident () ()) => {};

    // Insert the current entry followed by trailing comma.
    (@map $map:ident [$key:ident] ($value:expr) , $($rest:tt)*) => {
        let _ = $map.insert(::std::string::String::from(stringify!($key)), $value);
        $crate::_value!(@map $map () ($($rest)*));
    };

    // Insert the last entry without trailing comma.
    (@map $map:ident [$key:ident] ($value:expr)) => {
        let _ = $map.insert(::std::string::String::from(stringify!($key)), $value);
    };

    // Next value is `None`.
    (@map $map:ident () ($key:ident : None $($rest:tt)*)) => {
        $crate::_value!(@map $map [$key] ($crate::_value!(None)) $($rest)*);
    };

    // Next value is a list.
    (@map $map:ident () ($key:ident : [$($list:tt)*] $($rest:tt)*)) => {
        $crate::_value!(@map $map [$key] ($crate::_value!([$($list)*])) $($rest)*);
    };

    // Next value is a map.
    (@map $map:ident () ($key:ident : {$($inner:tt)*} $($rest:tt)*)) => {
        $crate::_value!(@map $map [$key] ($crate::_value!({$($inner)*})) $($rest)*);
    };

    // Next value is an expression followed by comma.
    (@map $map:ident () ($key:ident : $value:expr , $($rest:tt)*)) => {
        $crate::_value!(@map $map [$key] ($crate::_value!($value)) , $($rest)*);
    };

    // Last value is an expression with no trailing comma.
    (@map $map:ident () ($key:ident : $value:expr)) => {
        $crate::_value!(@map $map [$key] ($crate::_value!($value)));
    };

    //////////////////////////////////////////////////////////////////////////
    // The main implementation.
    //////////////////////////////////////////////////////////////////////////

    (None) => {
        $crate::Value::None
    };

    ([]) => {
        $crate::Value::List($crate::_value_list![])
    };

    ([ $($tt:tt)+ ]) => {
        $crate::Value::List($crate::_value!(@list [] $($tt)+))
    };

    ({}) => {
        $crate::Value::Map($crate::Map::new())
    };

    ({ $($tt:tt)+ }) => {
        $crate::Value::Map({
            let mut map = $crate::Map::new();
            $crate::_value!(@map map () ($($tt)+));
            map
        })
    };

    // Default to `From` implementation.
    ($other:expr) => {
        $crate::Value::from($other)
    };
}

// The value macro above cannot invoke vec directly because it uses
// local_inner_macros. A vec invocation there would resolve to $crate::vec.
// Instead invoke vec here outside of local_inner_macros.
#[macro_export]
#[doc(hidden)]
macro_rules! _value_list {
    ($($content:tt)*) => {
        ::std::vec![$($content)*]
    };
}
