// UI layer: the two output channels a command writes to and the message
// templates shown to the user.
//
// `out` carries only what scripts may want to consume (the solution URL).
// Everything else (warnings, confirmations, configuration summaries) goes
// to `err`.

use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;

use crate::config::EffectiveConfig;
use crate::workspace::Solution;

/// Primary and diagnostic streams for one command invocation.
pub struct Output<O: Write, E: Write> {
    pub out: O,
    pub err: E,
    progress: bool,
}

impl Output<io::Stdout, io::Stderr> {
    /// Process stdout/stderr, with a spinner while requests are in flight.
    pub fn stdio() -> Self {
        Output {
            out: io::stdout(),
            err: io::stderr(),
            progress: true,
        }
    }
}

impl<O: Write, E: Write> Output<O, E> {
    /// Custom streams, no spinner. Used by tests and embedding callers.
    pub fn new(out: O, err: E) -> Self {
        Output {
            out,
            err,
            progress: false,
        }
    }

    pub fn warn_empty_file(&mut self, path: &Path) -> io::Result<()> {
        write!(
            self.err,
            "\n\n    WARNING: Skipping empty file\n             {}\n\n",
            path.display()
        )
    }

    /// Confirmation preamble on `err`, the view URL alone on `out`.
    pub fn submitted(&mut self, solution: &Solution) -> io::Result<()> {
        let suffix = if solution.auto_approve_on_completion {
            "You can complete the exercise and unlock the next core exercise at:\n"
        } else {
            "View it at:\n\n    "
        };
        write!(
            self.err,
            "\n\n    Your solution has been submitted successfully.\n    {suffix}\n"
        )?;
        write!(self.out, "    {}\n\n", solution.view_url)?;
        self.out.flush()
    }

    pub fn configured(
        &mut self,
        config_dir: &Path,
        cfg: &EffectiveConfig,
        saved: bool,
    ) -> io::Result<()> {
        let heading = if saved {
            "You have configured the Exercism command-line client:"
        } else {
            "Current configuration of the Exercism command-line client:"
        };
        write!(
            self.err,
            "\n    {heading}\n\n    Config dir:                       {}\n    Token:         (-t, --token)      {}\n    Workspace:     (-w, --workspace)  {}\n    API Base URL:  (-a, --api)        {}\n\n",
            config_dir.display(),
            mask_token(&cfg.token),
            cfg.workspace.display(),
            cfg.api_base_url,
        )
    }

    /// Spinner on stderr while `msg` is in progress. Hidden when stderr is
    /// not a terminal or the output was built with [`Output::new`].
    pub fn spinner(&self, msg: &str) -> ProgressBar {
        if !self.progress {
            return ProgressBar::hidden();
        }
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
            spinner.set_style(style);
        }
        spinner.set_message(msg.to_string());
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner
    }
}

/// Show only the last four characters of a token.
pub fn mask_token(token: &str) -> String {
    if token.is_empty() {
        return String::new();
    }
    let chars: Vec<char> = token.chars().collect();
    let keep = chars.len().min(4);
    let visible: String = chars[chars.len() - keep..].iter().collect();
    format!("{}{}", "*".repeat(chars.len() - keep), visible)
}
