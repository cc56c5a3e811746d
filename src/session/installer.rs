//! Retrieving an accepted artifact and handing over to its installer.
//!
//! The installer command comes from the enclosure's install hint: a
//! whitespace-separated list of tokens, each rendered with `tera` with `file`,
//! `version` and `url` available. Whitespace inside `{{ }}` or `{% %}` does not
//! split a token, and rendered values are never split again:
//!
//! ```text
//! sparkle:installerArguments="msiexec /i {{ file }} /passive"
//! ```
//!
//! Without a hint the downloaded file itself is executed.

use crate::core::{Result, UpdateError};
use crate::feed::ReleaseCandidate;
use crate::transport::{Transport, file_name};
use std::path::{Path, PathBuf};
use tera::{Context, Tera};
use tracing::{debug, info, warn};

/// A resolved program invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallCommand {
    /// Program to run
    pub program: String,
    /// Arguments, in order
    pub args: Vec<String>,
}

/// Process-level side effects of accepting an update.
pub trait Handoff: Send {
    /// Replace the current process with `command`.
    ///
    /// Returning `Ok` means the installer took over; the caller terminates.
    fn launch(&mut self, command: &InstallCommand) -> Result<()>;

    /// Open `url` in the user's browser.
    fn open_url(&mut self, url: &str) -> Result<()>;
}

/// The real handoff: `exec` on Unix, spawn on other systems, and the system
/// URL opener.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemHandoff;

impl Handoff for SystemHandoff {
    fn launch(&mut self, command: &InstallCommand) -> Result<()> {
        info!("Launching installer: {} {}", command.program, command.args.join(" "));
        let mut process = std::process::Command::new(&command.program);
        process.args(&command.args);

        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            // exec only returns on failure
            let error = process.exec();
            Err(UpdateError::install(format!("cannot execute {}: {error}", command.program)))
        }

        #[cfg(not(unix))]
        {
            process
                .spawn()
                .map_err(|e| UpdateError::install(format!("cannot start {}: {e}", command.program)))?;
            Ok(())
        }
    }

    fn open_url(&mut self, url: &str) -> Result<()> {
        info!("Opening {} in the browser", url);
        opener::open(url).map_err(|e| UpdateError::install(format!("cannot open {url}: {e}")))
    }
}

/// Download `url` to a fresh temporary file named after the artifact.
///
/// The file is kept on success; a failed download leaves nothing behind.
pub async fn download_artifact<T: Transport>(transport: &T, url: &str) -> Result<PathBuf> {
    let temp = tempfile::Builder::new()
        .prefix("appcast-notify-")
        .suffix(&format!("-{}", file_name(url)))
        .tempfile()?
        .into_temp_path();

    let bytes = transport.download(url, &temp).await?;
    let path = temp.keep().map_err(|e| UpdateError::install(format!("cannot keep download: {e}")))?;
    debug!("Stored {} bytes from {} at {}", bytes, url, path.display());
    Ok(path)
}

/// Build the command that installs the artifact stored at `file`.
pub fn build_command(candidate: &ReleaseCandidate, file: &Path) -> Result<InstallCommand> {
    let Some(hint) = candidate.install_hint.as_deref().filter(|h| !h.trim().is_empty()) else {
        make_executable(file)?;
        return Ok(InstallCommand {
            program: file.display().to_string(),
            args: Vec::new(),
        });
    };

    let mut context = Context::new();
    context.insert("file", &file.display().to_string());
    context.insert("version", &candidate.version_code);
    context.insert("url", candidate.download_url.as_deref().unwrap_or_default());

    let mut tokens = template_tokens(hint)
        .iter()
        .map(|token| {
            Tera::one_off(token, &context, false)
                .map_err(|e| UpdateError::install(format!("invalid installer arguments '{token}': {e}")))
        })
        .collect::<Result<Vec<_>>>()?
        .into_iter();

    let program = tokens
        .next()
        .ok_or_else(|| UpdateError::install("installer arguments are empty"))?;
    Ok(InstallCommand {
        program,
        args: tokens.collect(),
    })
}

/// Split an install hint on whitespace outside template tags.
fn template_tokens(hint: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_tag = false;
    let mut chars = hint.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '{' if matches!(chars.peek(), Some('{' | '%')) => {
                in_tag = true;
                current.push(ch);
            }
            '}' | '%' if in_tag && chars.peek() == Some(&'}') => {
                in_tag = false;
                current.push(ch);
                current.extend(chars.next());
            }
            c if c.is_whitespace() && !in_tag => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

/// Delete a downloaded artifact, ignoring failures.
pub fn discard(file: &Path) {
    if let Err(e) = std::fs::remove_file(file) {
        warn!("Could not remove {}: {}", file.display(), e);
    }
}

#[cfg(unix)]
fn make_executable(file: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(file, std::fs::Permissions::from_mode(0o755))?;
    Ok(())
}

#[cfg(not(unix))]
fn make_executable(_file: &Path) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MockTransport;
    use tempfile::TempDir;

    fn candidate(hint: Option<&str>) -> ReleaseCandidate {
        ReleaseCandidate {
            version_code: "1.2".into(),
            display_version: "1.2".into(),
            download_url: Some("https://example.com/app-1.2.msi".into()),
            install_hint: hint.map(str::to_string),
            ..ReleaseCandidate::default()
        }
    }

    #[test]
    fn test_command_from_hint() {
        let file = Path::new("/tmp/app-1.2.msi");
        let command = build_command(&candidate(Some("msiexec /i {{ file }} /passive VERSION={{version}}")), file).unwrap();
        assert_eq!(command.program, "msiexec");
        assert_eq!(command.args, ["/i", "/tmp/app-1.2.msi", "/passive", "VERSION=1.2"]);
    }

    #[test]
    fn test_template_tokens() {
        assert_eq!(template_tokens("  a {{ b }}  c{{d}} "), ["a", "{{ b }}", "c{{d}}"]);
        assert_eq!(template_tokens("{% if true %}x{% endif %} y"), ["{% if true %}x{% endif %}", "y"]);
    }

    #[test]
    fn test_rendered_values_are_not_split() {
        let command = build_command(&candidate(Some("setup.exe {{ file }}")), Path::new("/tmp/with space.msi")).unwrap();
        assert_eq!(command.args, ["/tmp/with space.msi"]);
    }

    #[test]
    fn test_invalid_hint() {
        let err = build_command(&candidate(Some("run {{ file")), Path::new("/tmp/x")).unwrap_err();
        assert_eq!(err.kind(), "install");
    }

    #[test]
    fn test_command_without_hint_runs_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("installer.run");
        std::fs::write(&file, b"#!/bin/sh\n").unwrap();

        let command = build_command(&candidate(None), &file).unwrap();
        assert_eq!(command.program, file.display().to_string());
        assert!(command.args.is_empty());

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(&file).unwrap().permissions().mode() & 0o777;
            assert_eq!(mode, 0o755);
        }
    }

    #[tokio::test]
    async fn test_download_artifact_keeps_file_name() {
        let transport = MockTransport::new().with_response("https://example.com/app-1.2.tar.gz", b"payload");
        let path = download_artifact(&transport, "https://example.com/app-1.2.tar.gz").await.unwrap();
        assert!(path.file_name().unwrap().to_string_lossy().ends_with("-app-1.2.tar.gz"));
        assert_eq!(std::fs::read(&path).unwrap(), b"payload");
        discard(&path);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_failed_download() {
        let transport = MockTransport::new();
        let err = download_artifact(&transport, "https://example.com/missing.zip").await.unwrap_err();
        assert_eq!(err.kind(), "transport");
    }
}
