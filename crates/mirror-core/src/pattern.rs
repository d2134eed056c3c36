//! Wildcard pattern matching for file names
//!
//! Classic shell globbing without character classes or alternation:
//! `?` matches exactly one character, `*` matches zero or more, every
//! other character matches itself. Anchored at both ends. No escaping.

/// Does `name` match `pattern` in full?
///
/// Iterative greedy matching with backtracking on the most recent `*`:
/// two cursors plus one saved restart point, so pathological patterns
/// stay linear in `name.len() * pattern.len()` instead of recursing.
///
/// Matching is per `char`, so multi-byte names count characters, not
/// bytes, under `?`.
pub fn matches(name: &str, pattern: &str) -> bool {
    let name: Vec<char> = name.chars().collect();
    let pattern: Vec<char> = pattern.chars().collect();

    let mut n = 0;
    let mut p = 0;
    // (pattern index after the star, name index the star has consumed up to)
    let mut backtrack: Option<(usize, usize)> = None;

    while n < name.len() {
        if p < pattern.len() && pattern[p] == '*' {
            backtrack = Some((p + 1, n));
            p += 1;
        } else if p < pattern.len() && (pattern[p] == '?' || pattern[p] == name[n]) {
            n += 1;
            p += 1;
        } else if let Some((star_p, star_n)) = backtrack {
            // Mismatch: let the last star swallow one more character
            p = star_p;
            n = star_n + 1;
            backtrack = Some((star_p, star_n + 1));
        } else {
            return false;
        }
    }

    // Name exhausted; only trailing stars may remain
    while p < pattern.len() && pattern[p] == '*' {
        p += 1;
    }
    p == pattern.len()
}
