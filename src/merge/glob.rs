//! Normalization of exclusion entries into the scanner's `glob(...)` syntax.

/// Wrap an exclusion entry as an explicit scanner glob.
///
/// Entries already written as `glob(...)` pass through trimmed but otherwise
/// unchanged. The prefix match is case-insensitive. Anything else is treated
/// as a literal path: `**` collapses to `*` and each remaining `*` is
/// escaped as `[*]`.
#[must_use]
pub fn normalize_exclusion(entry: &str) -> String {
    let trimmed = entry.trim();
    if is_explicit_glob(trimmed) {
        return trimmed.to_string();
    }
    format!("glob({})", trimmed.replace("**", "*").replace('*', "[*]"))
}

/// Normalize every entry, keeping order and duplicates.
#[must_use]
pub fn normalize_exclusions(entries: &[String]) -> Vec<String> {
    entries.iter().map(|e| normalize_exclusion(e)).collect()
}

fn is_explicit_glob(entry: &str) -> bool {
    entry
        .get(..5)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("glob("))
        && entry.ends_with(')')
}
