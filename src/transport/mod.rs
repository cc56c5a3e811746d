//! Byte-stream transport for feeds, release notes, and artifacts.
//!
//! The feed parser and the update session never talk to the network directly;
//! they go through the [`Transport`] capability. [`HttpTransport`] is the real
//! implementation, and tests substitute a scripted one.
//!
//! Every call performs exactly one attempt. Timeouts and connection failures are
//! reported as [`UpdateError::Transport`]; retrying is left to the caller.
//!
//! # Local feeds
//!
//! `file://` URLs and plain filesystem paths are read from disk, which makes it
//! possible to test a feed before publishing it:
//!
//! ```rust,no_run
//! use appcast_notify::transport::{HttpTransport, Transport};
//! use std::time::Duration;
//!
//! # async fn example() -> appcast_notify::core::Result<()> {
//! let transport = HttpTransport::new(Duration::from_secs(30))?;
//! let feed = transport.fetch("file:///srv/www/appcast.xml").await?;
//! # Ok(())
//! # }
//! ```

use crate::core::{Result, UpdateError};
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Url;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// Default timeout for every request, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Something that can turn a URL into bytes.
pub trait Transport: Send + Sync {
    /// Fetch the complete body behind `url`.
    fn fetch(&self, url: &str) -> impl Future<Output = Result<Vec<u8>>> + Send;

    /// Store the body behind `url` in `destination`, returning the byte count.
    ///
    /// The default implementation buffers the whole body through [`Transport::fetch`].
    fn download(&self, url: &str, destination: &Path) -> impl Future<Output = Result<u64>> + Send {
        async move {
            let bytes = self.fetch(url).await?;
            tokio::fs::write(destination, &bytes).await?;
            Ok(bytes.len() as u64)
        }
    }
}

/// Credentials sent only to the host that serves the feed.
#[derive(Debug, Clone)]
struct BasicAuth {
    host: String,
    user: String,
    password: Option<String>,
}

/// reqwest-backed transport with a per-request timeout.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    timeout: Duration,
    auth: Option<BasicAuth>,
    show_progress: bool,
}

impl HttpTransport {
    /// Create a transport whose requests time out after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("appcast-notify/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| UpdateError::config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            timeout,
            auth: None,
            show_progress: false,
        })
    }

    /// Send HTTP basic credentials with every request to the host of `feed_url`.
    ///
    /// Requests to any other host (for example a CDN serving the artifacts) are
    /// sent without credentials. Ignored if `feed_url` has no host.
    #[must_use]
    pub fn with_basic_auth(mut self, feed_url: &str, user: impl Into<String>, password: Option<String>) -> Self {
        match Url::parse(feed_url).ok().and_then(|url| url.host_str().map(str::to_string)) {
            Some(host) => {
                self.auth = Some(BasicAuth {
                    host,
                    user: user.into(),
                    password,
                });
            }
            None => debug!("Not using credentials: {} has no host", feed_url),
        }
        self
    }

    /// Show a progress bar while downloading artifacts.
    #[must_use]
    pub const fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// The configured request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn send(&self, url: &str) -> Result<reqwest::Response> {
        let parsed = Url::parse(url).map_err(|e| UpdateError::transport(url, e))?;
        let mut request = self.client.get(parsed.clone());
        if let Some(auth) = &self.auth {
            if parsed.host_str() == Some(auth.host.as_str()) {
                request = request.basic_auth(&auth.user, auth.password.as_deref());
            }
        }

        let response = request.send().await.map_err(|e| UpdateError::transport(url, describe(&e)))?;
        response.error_for_status().map_err(|e| UpdateError::transport(url, describe(&e)))
    }

    fn progress_bar(&self, length: Option<u64>, url: &str) -> Option<ProgressBar> {
        if !self.show_progress {
            return None;
        }
        let length = length?;
        let style = ProgressStyle::with_template(
            "{msg} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})",
        )
        .map(|style| style.progress_chars("=> "))
        .unwrap_or_else(|_| ProgressStyle::default_bar());

        let bar = ProgressBar::new(length).with_style(style);
        bar.set_message(file_name(url).to_string());
        Some(bar)
    }
}

impl Transport for HttpTransport {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        if let Some(path) = local_path(url) {
            debug!("Reading {}", path.display());
            return tokio::fs::read(&path).await.map_err(|e| UpdateError::transport(url, e));
        }

        debug!("Fetching {} (timeout {:?})", url, self.timeout);
        let response = self.send(url).await?;
        let body = response.bytes().await.map_err(|e| UpdateError::transport(url, describe(&e)))?;
        debug!("Fetched {} bytes from {}", body.len(), url);
        Ok(body.to_vec())
    }

    async fn download(&self, url: &str, destination: &Path) -> Result<u64> {
        if let Some(path) = local_path(url) {
            debug!("Copying {} to {}", path.display(), destination.display());
            return tokio::fs::copy(&path, destination).await.map_err(|e| UpdateError::transport(url, e));
        }

        debug!("Downloading {} to {}", url, destination.display());
        let mut response = self.send(url).await?;
        let progress = self.progress_bar(response.content_length(), url);
        let mut file = tokio::fs::File::create(destination).await?;
        let mut written = 0u64;

        while let Some(chunk) =
            response.chunk().await.map_err(|e| UpdateError::transport(url, describe(&e)))?
        {
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
            if let Some(bar) = &progress {
                bar.set_position(written);
            }
        }
        file.flush().await?;

        if let Some(bar) = progress {
            bar.finish_and_clear();
        }
        debug!("Downloaded {} bytes from {}", written, url);
        Ok(written)
    }
}

/// Interpret `url` as a local file if it is a `file://` URL or has no scheme.
fn local_path(url: &str) -> Option<PathBuf> {
    if url.starts_with("file://") {
        return Url::parse(url).ok()?.to_file_path().ok();
    }
    if url.contains("://") {
        return None;
    }
    Some(PathBuf::from(url))
}

/// Resolve a URL found inside a feed against the location of the feed.
///
/// Relative links are joined onto `feed_url`. Only `http`, `https` and `file`
/// URLs are returned, and `file` URLs only when the feed itself was read from
/// disk. `None` means the link must not be followed.
#[must_use]
pub fn resolve_feed_link(feed_url: Option<&str>, link: &str) -> Option<String> {
    let base = feed_url.and_then(feed_base);
    let feed_is_local = base.as_ref().is_some_and(|base| base.scheme() == "file");

    let (resolved, text) = match Url::parse(link) {
        Ok(url) => (url, link.to_string()),
        Err(_) => match base.as_ref().map(|base| base.join(link)) {
            Some(Ok(joined)) => {
                let text = joined.to_string();
                (joined, text)
            }
            _ => {
                debug!("Ignoring feed link '{}': cannot resolve it against {:?}", link, feed_url);
                return None;
            }
        },
    };

    match resolved.scheme() {
        "http" | "https" => Some(text),
        "file" if feed_is_local => Some(text),
        scheme => {
            debug!("Ignoring feed link '{}' with disallowed scheme '{}'", link, scheme);
            None
        }
    }
}

/// The feed location as a URL, turning local paths into `file://` URLs.
fn feed_base(feed_url: &str) -> Option<Url> {
    match local_path(feed_url) {
        Some(path) => Url::from_file_path(std::path::absolute(path).ok()?).ok(),
        None => Url::parse(feed_url).ok(),
    }
}

/// Last path segment of a URL, used to name downloaded files.
#[must_use]
pub fn file_name(url: &str) -> &str {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.rsplit('/').next().filter(|name| !name.is_empty()).unwrap_or("update")
}

fn describe(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        "request timed out".to_string()
    } else if let Some(status) = error.status() {
        format!("HTTP {status}")
    } else {
        error.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_local_path_detection() {
        assert_eq!(local_path("/tmp/feed.xml"), Some(PathBuf::from("/tmp/feed.xml")));
        assert!(local_path("https://example.com/feed.xml").is_none());
        #[cfg(unix)]
        assert_eq!(local_path("file:///tmp/feed.xml"), Some(PathBuf::from("/tmp/feed.xml")));
    }

    #[test]
    fn test_file_name() {
        assert_eq!(file_name("https://example.com/dl/app-1.2.tar.gz"), "app-1.2.tar.gz");
        assert_eq!(file_name("https://example.com/dl/setup.exe?token=1"), "setup.exe");
        assert_eq!(file_name("https://example.com/"), "update");
    }

    #[tokio::test]
    async fn test_fetch_and_download_local_file() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("appcast.xml");
        std::fs::write(&source, b"<rss/>").unwrap();
        let transport = HttpTransport::new(Duration::from_secs(5)).unwrap();

        let url = Url::from_file_path(&source).unwrap().to_string();
        assert_eq!(transport.fetch(&url).await.unwrap(), b"<rss/>");

        let dest = dir.path().join("copy.xml");
        let written = transport.download(source.to_str().unwrap(), &dest).await.unwrap();
        assert_eq!(written, 6);
        assert_eq!(std::fs::read(&dest).unwrap(), b"<rss/>");
    }

    #[tokio::test]
    async fn test_missing_local_file_is_transport_error() {
        let transport = HttpTransport::new(Duration::from_secs(5)).unwrap();
        let err = transport.fetch("/nonexistent/appcast.xml").await.unwrap_err();
        assert_eq!(err.kind(), "transport");
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        let transport = HttpTransport::new(Duration::from_secs(2)).unwrap();
        let err = transport.fetch("http://127.0.0.1:9/appcast.xml").await.unwrap_err();
        assert!(matches!(err, UpdateError::Transport { .. }));
    }

    #[test]
    fn test_remote_feed_links_stay_remote() {
        let feed = Some("https://updates.example.com/app/appcast.xml");
        assert_eq!(
            resolve_feed_link(feed, "https://cdn.example.com/app-1.2.tgz").as_deref(),
            Some("https://cdn.example.com/app-1.2.tgz")
        );
        assert_eq!(
            resolve_feed_link(feed, "notes/1.2.html").as_deref(),
            Some("https://updates.example.com/app/notes/1.2.html")
        );
        assert_eq!(
            resolve_feed_link(feed, "/etc/passwd").as_deref(),
            Some("https://updates.example.com/etc/passwd")
        );
        assert_eq!(resolve_feed_link(feed, "file:///etc/passwd"), None);
        assert_eq!(resolve_feed_link(feed, "ftp://example.com/app.tgz"), None);
    }

    #[test]
    fn test_links_without_feed_location_must_be_absolute() {
        assert_eq!(resolve_feed_link(None, "notes.html"), None);
        assert_eq!(resolve_feed_link(None, "file:///etc/passwd"), None);
        assert_eq!(
            resolve_feed_link(None, "http://example.com/notes.html").as_deref(),
            Some("http://example.com/notes.html")
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_local_feed_links_resolve_next_to_feed() {
        assert_eq!(
            resolve_feed_link(Some("/srv/updates/appcast.xml"), "app-1.2.tgz").as_deref(),
            Some("file:///srv/updates/app-1.2.tgz")
        );
        assert_eq!(
            resolve_feed_link(Some("file:///srv/updates/appcast.xml"), "file:///srv/other/notes.txt").as_deref(),
            Some("file:///srv/other/notes.txt")
        );
    }

    #[test]
    fn test_basic_auth_bound_to_feed_host() {
        let transport = HttpTransport::new(Duration::from_secs(5))
            .unwrap()
            .with_basic_auth("https://updates.example.com/appcast.xml", "user", Some("secret".into()));
        assert_eq!(transport.auth.as_ref().map(|a| a.host.as_str()), Some("updates.example.com"));

        let transport = HttpTransport::new(Duration::from_secs(5)).unwrap().with_basic_auth(
            "/local/appcast.xml",
            "user",
            None,
        );
        assert!(transport.auth.is_none());
    }
}
