//! Helper macros for entry-point generation.

/// Generate a Winsock-shaped `extern "C"` entry point.
///
/// # Usage
///
/// ```ignore
/// entry_point! {
///     /// Doc comment for the function.
///     fn closesocket(s: SOCKET) -> c_int {
///         // dispatch body
///     }
/// }
/// ```
///
/// Expands to a `pub unsafe extern "C" fn`. With the `interpose` feature the
/// symbol is also exported unmangled so C callers resolve the real API name
/// to it.
macro_rules! entry_point {
    (
        $(#[$meta:meta])*
        fn $name:ident( $($arg:ident : $argty:ty),* $(,)? ) -> $ret:ty
        $body:block
    ) => {
        $(#[$meta])*
        #[cfg_attr(feature = "interpose", unsafe(no_mangle))]
        pub unsafe extern "C" fn $name( $($arg : $argty),* ) -> $ret $body
    };

    // Variant without return type (returns ())
    (
        $(#[$meta:meta])*
        fn $name:ident( $($arg:ident : $argty:ty),* $(,)? )
        $body:block
    ) => {
        $(#[$meta])*
        #[cfg_attr(feature = "interpose", unsafe(no_mangle))]
        pub unsafe extern "C" fn $name( $($arg : $argty),* ) $body
    };
}
