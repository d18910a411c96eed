//! Rendering value sets for failure messages.

use std::collections::HashSet;
use std::fmt::Display;
use std::hash::Hash;

/// Sets larger than this are rendered in iteration order instead of sorted.
pub const MAX_SORT_SIZE: usize = 8192;

/// Renders up to `max_len` values of `set` as `{'a', 'b'}`, followed by
/// ` (N more suppressed)` when values were left out.
pub fn stringify_set<T>(set: &HashSet<T>, max_len: usize) -> String
where
    T: Display + Ord + Hash,
{
    stringify_set_with(set, max_len, MAX_SORT_SIZE)
}

/// As [`stringify_set`], with an explicit sort threshold.
///
/// Sets of at most `max_sort_size` values are sampled in sorted order.
/// Larger sets are sampled in arbitrary order.
pub fn stringify_set_with<T>(set: &HashSet<T>, max_len: usize, max_sort_size: usize) -> String
where
    T: Display + Ord + Hash,
{
    let quote = |value: &T| format!("'{value}'");
    let samples: Vec<String> = if set.len() <= max_sort_size {
        let mut sorted: Vec<&T> = set.iter().collect();
        sorted.sort_unstable();
        sorted.into_iter().take(max_len).map(quote).collect()
    } else {
        set.iter().take(max_len).map(quote).collect()
    };

    let mut text = format!("{{{}}}", samples.join(", "));
    if set.len() > max_len {
        text.push_str(&format!(" ({} more suppressed)", set.len() - max_len));
    }
    text
}
