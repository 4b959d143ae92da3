use crate::budget::Budget;
use serde::{Deserialize, Serialize};

/// Duplicate key handling policy for mappings decoded into map and dynamic targets.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DuplicateKeyPolicy {
    /// Fail with [`Error::DuplicateKey`](crate::Error::DuplicateKey).
    Error,
    /// First key wins: later duplicate pairs are skipped.
    FirstWins,
    /// Last key wins: later duplicate pairs overwrite the value, keeping the key's position.
    #[default]
    LastWins,
}

/// Caps on alias expansion in the loader.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct AliasLimits {
    /// Nodes cloned through aliases, summed over the whole stream.
    pub max_total_expanded_nodes: usize,
    /// How often one anchor may be referenced; `usize::MAX` disables the check.
    pub max_alias_expansions_per_anchor: usize,
}

impl Default for AliasLimits {
    fn default() -> Self {
        Self {
            max_total_expanded_nodes: 1_000_000,
            max_alias_expansions_per_anchor: usize::MAX,
        }
    }
}

/// Loader and decoder configuration.
///
/// ```rust
/// use saphyr_decode::{from_str_with_options, DuplicateKeyPolicy, Target};
///
/// let options = saphyr_decode::options! {
///     duplicate_keys: DuplicateKeyPolicy::FirstWins,
///     max_depth: 64,
/// };
/// let value = from_str_with_options("a: 1\na: 2\n", &Target::Dynamic, options).unwrap();
/// assert_eq!(value.get("a").and_then(|v| v.as_i64()), Some(1));
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Options {
    /// Optional YAML budget enforced while loading (counts raw parser events).
    pub budget: Option<Budget>,
    /// Limits for alias expansion.
    pub alias_limits: AliasLimits,
    /// Policy for duplicate keys in map and dynamic targets.
    pub duplicate_keys: DuplicateKeyPolicy,
    /// Maximum nesting of sequences and mappings the decoder descends into.
    pub max_depth: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            budget: Some(Budget::default()),
            alias_limits: AliasLimits::default(),
            duplicate_keys: DuplicateKeyPolicy::LastWins,
            max_depth: 512,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_default() {
        let opts = Options::default();
        assert!(opts.budget.is_some());
        assert_eq!(opts.duplicate_keys, DuplicateKeyPolicy::LastWins);
        assert_eq!(opts.alias_limits.max_total_expanded_nodes, 1_000_000);
        assert_eq!(opts.alias_limits.max_alias_expansions_per_anchor, usize::MAX);
        assert_eq!(opts.max_depth, 512);
    }

    #[test]
    fn test_options_macro() {
        let opts = crate::options! {
            duplicate_keys: DuplicateKeyPolicy::Error,
            budget: None,
        };
        assert_eq!(opts.duplicate_keys, DuplicateKeyPolicy::Error);
        assert!(opts.budget.is_none());
        assert_eq!(opts.max_depth, 512);
    }
}
