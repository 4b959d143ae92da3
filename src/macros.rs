//! `options!` and `budget!`: start from `Default`, override the named fields.

/// Build [`crate::Options`], overriding the listed fields.
///
/// ```rust
/// use saphyr_decode::DuplicateKeyPolicy;
///
/// let options = saphyr_decode::options! {
///     duplicate_keys: DuplicateKeyPolicy::Error,
///     max_depth: 32,
/// };
/// assert_eq!(options.max_depth, 32);
/// ```
#[macro_export]
macro_rules! options {
    ( $( $field:ident : $value:expr ),* $(,)? ) => {{
        let mut options = $crate::Options::default();
        $(
            options.$field = $value;
        )*
        options
    }};
}

/// Build [`crate::Budget`], overriding the listed fields.
///
/// ```rust
/// let budget = saphyr_decode::budget! {
///     max_documents: 1,
///     max_depth: 64,
/// };
/// assert_eq!(budget.max_documents, 1);
/// ```
#[macro_export]
macro_rules! budget {
    ( $( $field:ident : $value:expr ),* $(,)? ) => {{
        let mut budget = $crate::Budget::default();
        $(
            budget.$field = $value;
        )*
        budget
    }};
}
