//! Terminal adapter for the [`UserInterface`] capability.
//!
//! Prompts are answered with a line of input, or taken from answers preset on
//! the command line so the binary can run unattended.

use crate::feed::ReleaseCandidate;
use crate::session::{Decision, UserInterface};
use colored::Colorize;
use std::io::{BufRead, BufReader, Stdin, Stdout, Write};

/// Answers given up front with `--autocheck` and `--answer`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PresetAnswers {
    /// Reply to the automatic-check question
    pub autocheck: Option<bool>,
    /// Reply to an update offer
    pub decision: Option<Decision>,
}

/// Line-oriented prompts on a reader/writer pair.
pub struct TerminalUi<R: BufRead + Send, W: Write + Send> {
    app_name: String,
    app_version: String,
    preset: PresetAnswers,
    input: R,
    output: W,
}

impl TerminalUi<BufReader<Stdin>, Stdout> {
    /// Prompts on standard input and output.
    #[must_use]
    pub fn stdio(app_name: &str, app_version: &str, preset: PresetAnswers) -> Self {
        Self::new(app_name, app_version, preset, BufReader::new(std::io::stdin()), std::io::stdout())
    }
}

impl<R: BufRead + Send, W: Write + Send> TerminalUi<R, W> {
    /// Prompts on explicit streams.
    pub fn new(app_name: &str, app_version: &str, preset: PresetAnswers, input: R, output: W) -> Self {
        Self {
            app_name: app_name.to_string(),
            app_version: app_version.to_string(),
            preset,
            input,
            output,
        }
    }

    /// Consume the adapter, returning the output stream.
    pub fn into_output(self) -> W {
        self.output
    }

    /// Write one line. Write errors are dropped.
    fn say(&mut self, text: impl std::fmt::Display) {
        let _ = writeln!(self.output, "{text}");
    }

    /// Print `prompt` and read one trimmed, lowercased line. `None` on EOF.
    fn ask(&mut self, prompt: &str) -> Option<String> {
        let _ = write!(self.output, "{prompt} ");
        let _ = self.output.flush();
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim().to_lowercase()),
        }
    }
}

impl<R: BufRead + Send, W: Write + Send> UserInterface for TerminalUi<R, W> {
    fn ask_for_autocheck(&mut self) -> bool {
        if let Some(answer) = self.preset.autocheck {
            return answer;
        }
        self.say(format!("Should {} automatically check for updates?", self.app_name).bold());
        self.say("You can always check for updates manually with 'appcast-notify check'.");
        matches!(self.ask("[y/N]").as_deref(), Some("y" | "yes"))
    }

    fn report_error(&mut self, message: &str) {
        self.say(format!("{}", "Update Error!".red().bold()));
        self.say(
            "An error occurred in retrieving update information; are you connected to the internet? \
             Please try again later.",
        );
        self.say(message.dimmed());
    }

    fn report_no_info(&mut self) {
        self.say(format!("{}", "No update information!".yellow().bold()));
        self.say(format!(
            "There is no update information for {}.\n\nMaybe the software is not supported for your operating system...",
            self.app_name
        ));
    }

    fn report_up_to_date(&mut self, app_name: &str, app_version: &str) {
        self.say(format!("{}", "You're up to date!".green().bold()));
        self.say(format!("{app_name} {app_version} is currently the newest version available."));
    }

    fn present_update(&mut self, app_name: &str, candidate: &ReleaseCandidate, notes: &[ReleaseCandidate]) -> Decision {
        self.say(format!("A new version of {app_name} is available!").green().bold());
        self.say(format!(
            "{} {} is now available (you have {}).",
            app_name, candidate.display_version, self.app_version
        ));

        if notes.iter().any(|c| c.notes().is_some()) {
            self.say(format!("\n{}", "Release notes:".bold()));
            for entry in notes {
                self.say(format!("\n{}", entry.title.cyan().bold()));
                if let Some(text) = entry.notes() {
                    self.say(text);
                }
            }
            self.say("");
        }

        if let Some(decision) = self.preset.decision {
            return decision;
        }
        loop {
            match self.ask("Would you like to download it now? [g]et update / [s]kip this version / remind me [l]ater:").as_deref() {
                Some("g" | "get") => return Decision::Accept,
                Some("s" | "skip") => return Decision::Skip,
                Some("l" | "later" | "") | None => return Decision::Defer,
                Some(other) => self.say(format!("Unrecognized answer '{other}'")),
            }
        }
    }
}
