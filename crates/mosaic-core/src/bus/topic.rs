//! Topic name matching.
//!
//! Topics are `/`-separated hierarchical names. A subscription pattern may
//! use `+` to match exactly one level (`chart/+` matches `chart/vix` but not
//! `chart/us/vix` or `chart`). There is no multi-level wildcard — the mosaic
//! topic tree is only ever two levels deep.

/// Returns `true` if `topic` matches the subscription `pattern`.
pub fn matches(pattern: &str, topic: &str) -> bool {
    let mut pat = pattern.split('/');
    let mut top = topic.split('/');
    loop {
        match (pat.next(), top.next()) {
            (None, None) => return true,
            (Some("+"), Some(_)) => {}
            (Some(p), Some(t)) if p == t => {}
            _ => return false,
        }
    }
}

/// Returns the last level of a topic name — the fragment name for
/// `<source>/<fragment-name>` topics.
pub fn leaf(topic: &str) -> &str {
    topic.rsplit('/').next().unwrap_or(topic)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match() {
        assert!(matches("poloniex/public", "poloniex/public"));
        assert!(!matches("poloniex/public", "poloniex/account"));
        assert!(!matches("poloniex/public", "poloniex"));
    }

    #[test]
    fn single_level_wildcard() {
        assert!(matches("chart/+", "chart/vix"));
        assert!(matches("chart/+", "chart/sunday_dow"));
        assert!(!matches("chart/+", "chart"));
        assert!(!matches("chart/+", "chart/us/vix"));
        assert!(!matches("chart/+", "pool/vix"));
    }

    #[test]
    fn wildcard_in_the_middle() {
        assert!(matches("a/+/c", "a/b/c"));
        assert!(!matches("a/+/c", "a/b/d"));
    }

    #[test]
    fn leaf_extraction() {
        assert_eq!(leaf("chart/vix"), "vix");
        assert_eq!(leaf("p2pool"), "p2pool");
    }
}
