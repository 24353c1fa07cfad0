//! Category include/exclude filtering

/// Decides whether a message category is excluded, given include/exclude
/// rule sets.
///
/// A pattern is either an exact category string or a prefix pattern ending
/// in `*`. Exclude rules always win; a non-empty include list acts as an
/// allow-list.
#[derive(Debug, Clone, Default)]
pub struct CategoryFilter {
    include: Vec<String>,
    exclude: Vec<String>,
}

impl CategoryFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the include rule set
    pub fn include(&mut self, categories: impl IntoIterator<Item = impl Into<String>>) {
        self.include = categories.into_iter().map(Into::into).collect();
    }

    /// Replace the exclude rule set
    pub fn exclude(&mut self, categories: impl IntoIterator<Item = impl Into<String>>) {
        self.exclude = categories.into_iter().map(Into::into).collect();
    }

    /// Pure decision over the immutable rule sets.
    pub fn is_excluded(&self, category: &str) -> bool {
        for pattern in &self.exclude {
            let prefix = pattern.trim_end_matches('*');
            if category == pattern || (prefix != pattern && category.starts_with(prefix)) {
                return true;
            }
        }

        if self.include.is_empty() {
            return false;
        }

        for pattern in &self.include {
            if category == pattern
                || (!pattern.is_empty()
                    && pattern.ends_with('*')
                    && category.starts_with(pattern.trim_end_matches('*')))
            {
                return false;
            }
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(
        include: impl IntoIterator<Item = &'static str>,
        exclude: impl IntoIterator<Item = &'static str>,
    ) -> CategoryFilter {
        let mut f = CategoryFilter::new();
        f.include(include);
        f.exclude(exclude);
        f
    }

    #[test]
    fn test_empty_filter_allows_everything() {
        let f = CategoryFilter::new();
        assert!(!f.is_excluded("application"));
        assert!(!f.is_excluded(""));
    }

    #[test]
    fn test_exact_exclude_match() {
        let f = filter([], ["db"]);
        assert!(f.is_excluded("db"));
        assert!(!f.is_excluded("db.query"));
    }

    #[test]
    fn test_prefix_exclude_match() {
        let f = filter([], ["db.*"]);
        assert!(f.is_excluded("db.*"));
        assert!(f.is_excluded("db.query"));
        assert!(f.is_excluded("db."));
        assert!(!f.is_excluded("db"));
    }

    #[test]
    fn test_exclude_wins_over_include() {
        let f = filter(["db.*"], ["db.query*"]);
        assert!(!f.is_excluded("db.connection"));
        assert!(f.is_excluded("db.query.slow"));
    }

    #[test]
    fn test_nonempty_include_acts_as_allow_list() {
        let f = filter(["app", "net.*"], []);
        assert!(!f.is_excluded("app"));
        assert!(!f.is_excluded("net.http"));
        assert!(f.is_excluded("db"));
        assert!(f.is_excluded("application"));
    }

    #[test]
    fn test_exact_include_requires_equality() {
        let f = filter(["app"], []);
        assert!(f.is_excluded("app.sub"));
    }

    #[test]
    fn test_rule_sets_are_replaced_not_appended() {
        let mut f = filter(["a"], []);
        f.include(["b"]);
        assert!(f.is_excluded("a"));
        assert!(!f.is_excluded("b"));
    }
}
