//! Appcast documents for tests.

/// Builds an RSS appcast with the Sparkle namespace bound to `sparkle:`.
#[derive(Debug, Clone, Default)]
pub struct FeedBuilder {
    items: Vec<String>,
}

impl FeedBuilder {
    /// Empty channel.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a raw `<item>` body.
    #[must_use]
    pub fn item(mut self, body: impl Into<String>) -> Self {
        self.items.push(format!("<item>{}</item>", body.into()));
        self
    }

    /// Append an entry with a single generic enclosure.
    #[must_use]
    pub fn release(self, title: &str, version: &str, url: &str) -> Self {
        self.item(format!("<title>{title}</title>{}", enclosure(url, version, "")))
    }

    /// The complete document.
    #[must_use]
    pub fn build(&self) -> String {
        format!(
            concat!(
                "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n",
                "<rss version=\"2.0\" xmlns:sparkle=\"http://www.andymatuschak.org/xml-namespaces/sparkle\">\n",
                "<channel>\n<title>Test feed</title>\n{}\n</channel>\n</rss>\n"
            ),
            self.items.join("\n")
        )
    }
}

/// An `<enclosure>` with `url`, `sparkle:version`, and extra raw attributes.
#[must_use]
pub fn enclosure(url: &str, version: &str, extra: &str) -> String {
    format!(r#"<enclosure url="{url}" sparkle:version="{version}" {extra}/>"#)
}
