// ABOUTME: Configuration for text normalization: ignored tags and tag separation.
// ABOUTME: NormalizerBuilder provides a fluent API for constructing TextNormalizer instances.

use crate::text::TextNormalizer;

/// Tags whose text never reaches normalized output by default.
pub const DEFAULT_IGNORED_TAGS: &[&str] = &["script", "noscript", "style"];

/// Configuration options for [`TextNormalizer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Elements whose text content is cleared before extraction.
    pub ignored_tags: Vec<String>,
    /// Insert a space before every tag so adjacent text runs keep a word boundary.
    pub separate_tags: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            ignored_tags: DEFAULT_IGNORED_TAGS.iter().map(|t| t.to_string()).collect(),
            separate_tags: true,
        }
    }
}

impl Options {
    pub(crate) fn is_ignored(&self, tag: &str) -> bool {
        self.ignored_tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}

/// Builder for constructing TextNormalizer instances with custom configuration.
#[derive(Debug, Clone)]
pub struct NormalizerBuilder {
    opts: Options,
}

impl NormalizerBuilder {
    /// Create a new NormalizerBuilder with default options.
    pub fn new() -> Self {
        Self {
            opts: Options::default(),
        }
    }

    /// Add a tag to the ignored set.
    pub fn ignore_tag(mut self, tag: impl Into<String>) -> Self {
        let tag = tag.into().to_ascii_lowercase();
        if !self.opts.is_ignored(&tag) {
            self.opts.ignored_tags.push(tag);
        }
        self
    }

    /// Replace the ignored set entirely.
    pub fn ignored_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.opts.ignored_tags = tags
            .into_iter()
            .map(|t| t.into().to_ascii_lowercase())
            .collect();
        self
    }

    /// Enable or disable the space inserted before each tag.
    pub fn separate_tags(mut self, separate: bool) -> Self {
        self.opts.separate_tags = separate;
        self
    }

    /// Build the TextNormalizer with the configured options.
    pub fn build(self) -> TextNormalizer {
        TextNormalizer::new(self.opts)
    }
}

impl Default for NormalizerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = Options::default();
        assert!(opts.separate_tags);
        assert!(opts.is_ignored("script"));
        assert!(opts.is_ignored("NOSCRIPT"));
        assert!(opts.is_ignored("style"));
        assert!(!opts.is_ignored("p"));
    }

    #[test]
    fn test_ignore_tag_dedupes() {
        let normalizer = NormalizerBuilder::new()
            .ignore_tag("Script")
            .ignore_tag("nav")
            .build();
        let opts = normalizer.options();
        assert_eq!(opts.ignored_tags, vec!["script", "noscript", "style", "nav"]);
    }

    #[test]
    fn test_replace_ignored_tags() {
        let normalizer = NormalizerBuilder::new()
            .ignored_tags(["aside"])
            .separate_tags(false)
            .build();
        let opts = normalizer.options();
        assert_eq!(opts.ignored_tags, vec!["aside"]);
        assert!(!opts.separate_tags);
    }
}
