//! Appcast feed parsing.
//!
//! A feed is an RSS document whose `channel` elements contain `item` entries.
//! Each entry describes one release; its `enclosure` children are the
//! per-platform artifacts. Sparkle-specific data lives in attributes and child
//! elements under [`SPARKLE_NAMESPACE`]:
//!
//! ```xml
//! <rss version="2.0" xmlns:sparkle="http://www.andymatuschak.org/xml-namespaces/sparkle">
//!   <channel>
//!     <item>
//!       <title>Version 1.2</title>
//!       <sparkle:releaseNotesLink>https://example.com/notes/1.2.html</sparkle:releaseNotesLink>
//!       <enclosure url="https://example.com/app-1.2.tar.gz"
//!                  sparkle:version="1.2" sparkle:os="linux-x86_64" sparkle:dist="ubuntu"
//!                  length="1048576"/>
//!     </item>
//!   </channel>
//! </rss>
//! ```
//!
//! [`FeedParser::parse`] reduces every entry to at most one [`ReleaseCandidate`]:
//!
//! 1. the most specific enclosure that fits the running platform provides the
//!    download (see [`attachment::select_attachment`]);
//! 2. without a fitting enclosure, an entry-level `link` plus `sparkle:version`
//!    child gives a candidate that only points at a release page;
//! 3. otherwise the entry is dropped.
//!
//! Links inside the feed are resolved against the feed's own location (see
//! [`FeedParser::with_feed_url`]). A remote feed can never point at local files.
//!
//! Entry-level problems never fail the parse. Only a document that is not
//! well-formed markup produces [`crate::core::UpdateError::FeedFormat`].

pub mod attachment;
pub mod candidate;
pub mod xml;


pub use attachment::{ArtifactAttachment, PlatformMatch};
pub use candidate::ReleaseCandidate;

use crate::core::Result;
use crate::platform::PlatformIdentity;
use crate::transport::{Transport, resolve_feed_link};
use attachment::{non_empty, select_attachment};
use tracing::debug;
use xml::Element;

/// Namespace URI of the Sparkle appcast vocabulary.
pub const SPARKLE_NAMESPACE: &str = "http://www.andymatuschak.org/xml-namespaces/sparkle";

/// Turns feed documents into release candidates for one platform.
pub struct FeedParser<'a, T: Transport> {
    platform: &'a PlatformIdentity,
    transport: &'a T,
    feed_url: Option<&'a str>,
}

impl<'a, T: Transport> FeedParser<'a, T> {
    /// Create a parser. `transport` is only used to fetch external release notes.
    pub const fn new(platform: &'a PlatformIdentity, transport: &'a T) -> Self {
        Self {
            platform,
            transport,
            feed_url: None,
        }
    }

    /// Resolve links inside the feed against `feed_url`.
    ///
    /// Without it only absolute `http(s)` links are followed.
    #[must_use]
    pub const fn with_feed_url(mut self, feed_url: &'a str) -> Self {
        self.feed_url = Some(feed_url);
        self
    }

    /// Parse a feed document.
    ///
    /// Candidates are returned in document order. When `include_notes` is false
    /// no request is ever made through the transport.
    pub async fn parse(&self, document: &[u8], include_notes: bool) -> Result<Vec<ReleaseCandidate>> {
        let root = xml::parse_document(document)?;
        let mut candidates = Vec::new();

        for channel in root.descendants_named(None, "channel") {
            for item in channel.children_named(None, "item") {
                match self.parse_item(item, include_notes).await {
                    Some(candidate) => candidates.push(candidate),
                    None => debug!(
                        "Skipping feed entry '{}': no usable enclosure or link",
                        item.child_text(None, "title").unwrap_or_default()
                    ),
                }
            }
        }

        debug!("Feed yielded {} candidate(s) for {}", candidates.len(), self.platform.tag);
        Ok(candidates)
    }

    async fn parse_item(&self, item: &Element, include_notes: bool) -> Option<ReleaseCandidate> {
        let title = item.child_text(None, "title").unwrap_or_default().to_string();
        let attachment = select_attachment(
            item.children_named(None, "enclosure")
                .filter_map(ArtifactAttachment::from_element)
                .filter_map(|attachment| {
                    let url = resolve_feed_link(self.feed_url, &attachment.url)?;
                    Some(ArtifactAttachment { url, ..attachment })
                }),
            self.platform,
        );

        let candidate = match attachment {
            Some(attachment) => ReleaseCandidate::from_attachment(title, None, attachment),
            None => {
                let ns = Some(SPARKLE_NAMESPACE);
                let link = non_empty(item.child_text(None, "link"))
                    .and_then(|link| resolve_feed_link(self.feed_url, &link))?;
                let version_code = non_empty(item.child_text(ns, "version"))?;
                let display_version = non_empty(item.child_text(ns, "shortVersionString"));
                ReleaseCandidate::from_link(title, None, link, version_code, display_version)
            }
        };

        let release_notes = if include_notes {
            Some(self.release_notes(item).await)
        } else {
            None
        };
        Some(ReleaseCandidate {
            release_notes,
            ..candidate
        })
    }

    /// Inline `description`, or the body behind `sparkle:releaseNotesLink`.
    ///
    /// A failed notes fetch yields empty notes.
    async fn release_notes(&self, item: &Element) -> String {
        if let Some(description) = item.child_text(None, "description") {
            return description.trim().to_string();
        }

        let Some(link) = non_empty(item.child_text(Some(SPARKLE_NAMESPACE), "releaseNotesLink"))
            .and_then(|link| resolve_feed_link(self.feed_url, &link))
        else {
            return String::new();
        };
        match self.transport.fetch(&link).await {
            Ok(body) => String::from_utf8_lossy(&body).trim().to_string(),
            Err(e) => {
                debug!("Ignoring release notes from {}: {}", link, e);
                String::new()
            }
        }
    }
}
