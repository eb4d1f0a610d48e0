use semver::Version;
use tracing::debug;

fn parse_loose(raw: &str) -> Option<Version> {
    let trimmed = raw.trim().trim_start_matches(['v', '=']);
    Version::parse(trimmed).ok()
}

/// Exact semantic-version equality (precedence, build metadata ignored).
/// Anything that does not parse compares unequal.
pub fn versions_equal(a: &str, b: &str) -> bool {
    match (parse_loose(a), parse_loose(b)) {
        (Some(left), Some(right)) => left.cmp_precedence(&right).is_eq(),
        _ => {
            debug!("Version comparison fell through for '{}' vs '{}'", a, b);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_versions() {
        assert!(versions_equal("28.0.0", "28.0.0"));
        assert!(versions_equal("v28.0.0", "28.0.0"));
        assert!(versions_equal("28.0.0+build.1", "28.0.0"));
        assert!(versions_equal(" 28.0.0 ", "=28.0.0"));
    }

    #[test]
    fn unequal_versions() {
        assert!(!versions_equal("28.0.0", "28.0.1"));
        assert!(!versions_equal("28.0.0-beta.1", "28.0.0"));
        assert!(!versions_equal("not-a-version", "28.0.0"));
        assert!(!versions_equal("", ""));
    }
}
