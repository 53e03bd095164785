//! Completion configuration.

/// What a completion request reports and how candidates are filtered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletionConfig {
    /// Offer keywords that the grammar allows at the cursor.
    pub include_keywords: bool,
    /// Report the token kinds the grammar allows at the cursor.
    pub include_token_kinds: bool,
    /// Offer names bound in the module when a NAME may follow.
    pub include_names: bool,
    /// Match the typed prefix case-insensitively.
    pub case_insensitive: bool,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            include_keywords: true,
            include_token_kinds: true,
            include_names: true,
            case_insensitive: false,
        }
    }
}

impl CompletionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_keywords(mut self, include: bool) -> Self {
        self.include_keywords = include;
        self
    }

    pub fn with_token_kinds(mut self, include: bool) -> Self {
        self.include_token_kinds = include;
        self
    }

    pub fn with_names(mut self, include: bool) -> Self {
        self.include_names = include;
        self
    }

    pub fn with_case_insensitive(mut self, enabled: bool) -> Self {
        self.case_insensitive = enabled;
        self
    }

    /// True if `candidate` starts with the typed `prefix` under this configuration.
    pub fn matches(&self, candidate: &str, prefix: &str) -> bool {
        if self.case_insensitive {
            candidate.to_lowercase().starts_with(&prefix.to_lowercase())
        } else {
            candidate.starts_with(prefix)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_include_everything() {
        let config = CompletionConfig::default();
        assert!(config.include_keywords && config.include_token_kinds && config.include_names);
        assert!(!config.case_insensitive);
    }

    #[test]
    fn test_prefix_matching() {
        let config = CompletionConfig::new().with_keywords(false);
        assert!(!config.include_keywords);
        assert!(config.matches("import", "imp"));
        assert!(!config.matches("Import", "imp"));
        assert!(config.with_case_insensitive(true).matches("Import", "imp"));
        assert!(config.matches("anything", ""));
    }
}
