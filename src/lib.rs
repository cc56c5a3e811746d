//! appcast-notify - application update notifier driven by appcast feeds
//!
//! An application embeds an [`session::UpdateSession`] (or runs the
//! `appcast-notify` binary) to learn whether a newer release exists for the
//! platform it runs on, and to offer it to the user.
//!
//! # Flow
//!
//! 1. [`transport`] fetches the feed document.
//! 2. [`feed`] parses it into [`feed::ReleaseCandidate`]s, keeping only the
//!    entries that carry an attachment for this [`platform`].
//! 3. [`resolver`] orders the candidates with [`version`] and decides between
//!    "no information", "up to date" and "update available".
//! 4. [`session`] presents the offer through a [`session::UserInterface`],
//!    records the user's decision and hands the downloaded artifact to the
//!    installer.
//!
//! # Feed Format
//!
//! ```xml
//! <rss xmlns:sparkle="http://www.andymatuschak.org/xml-namespaces/sparkle">
//!   <channel>
//!     <item>
//!       <title>Version 1.2</title>
//!       <description>Fixes a crash on startup.</description>
//!       <enclosure url="https://example.com/app-1.2.tar.gz"
//!                  sparkle:version="1.2"
//!                  sparkle:os="linux-x86_64"
//!                  sparkle:installerArguments="tar -xzf {{ file }}"/>
//!     </item>
//!   </channel>
//! </rss>
//! ```
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface
//! - [`config`] - User configuration file (`~/.appcast-notify/config.toml`)
//! - [`core`] - Error types and user-facing error formatting
//! - [`feed`] - Appcast parsing and per-platform attachment selection
//! - [`platform`] - Host identity: OS, architecture, distribution chain
//! - [`resolver`] - Newest-candidate selection and release-note collection
//! - [`session`] - The check/offer/install state machine and its collaborators
//! - [`transport`] - HTTP and local-file fetching
//! - [`version`] - Version ordering

pub mod cli;
pub mod config;
pub mod core;
pub mod feed;
pub mod platform;
pub mod resolver;
pub mod session;
pub mod transport;
pub mod version;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
