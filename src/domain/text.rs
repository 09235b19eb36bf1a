//! Small string predicates used when talking to the binary

use std::sync::OnceLock;

use regex::Regex;

/// True if any line of `stdout`, trimmed, equals `expected`.
pub fn stdout_line_matches(expected: &str, stdout: &str) -> bool {
    stdout.split('\n').map(str::trim).any(|line| line == expected)
}

/// Loose semver check: `1`, `1.2`, `1.2.3`, `1.2.*`.
pub fn is_semver(s: &str) -> bool {
    static SEMVER: OnceLock<Option<Regex>> = OnceLock::new();
    SEMVER
        .get_or_init(|| Regex::new(r"^(\d+\.)?(\d+\.)?(\*|\d+)$").ok())
        .as_ref()
        .is_some_and(|re| re.is_match(s))
}
