//! Operator-facing colored output.

use std::fmt::Display;
use std::io::Write;
use std::path::Path;

use console::{Style, Term};
use shipit_stage::OutputSummary;

/// Kind of message, which decides how it is decorated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Header,
    Info,
    Success,
    Warning,
    Error,
}

/// Terminal style for a message category.
pub fn style_for(category: Category) -> Style {
    match category {
        Category::Header => Style::new().magenta().bright().bold(),
        Category::Info => Style::new().blue().bright(),
        Category::Success => Style::new().green().bright(),
        Category::Warning => Style::new().yellow().bright(),
        Category::Error => Style::new().red().bright(),
    }
}

/// Decorate `text` for `category`. With `colors` off the text is returned as is.
pub fn render(category: Category, text: &str, colors: bool) -> String {
    style_for(category)
        .force_styling(colors)
        .apply_to(text)
        .to_string()
}

const PUBLISH_STEPS: &[&str] = &[
    "Push the contents of the 'dist' directory to your GitHub repository.",
    "In the repository settings, enable GitHub Pages and pick the root folder or /docs as the source.",
    "Wait a few minutes for the site to be published.",
];

const APK_STEPS: &[&str] = &[
    "Make sure the app works correctly on GitHub Pages.",
    "Visit PWABuilder: https://www.pwabuilder.com",
    "Enter the URL of the app published on GitHub Pages.",
    "Follow the instructions to generate an APK package.",
    "Download the APK file and install it on your Android device.",
];

const NOTES: &[&str] = &[
    "If you publish from a branch other than 'main' or 'master', select it in the GitHub Pages settings.",
    "Make sure manifest.json has all the information needed to package the app as an APK.",
    "Make sure service-worker.js works correctly so the app keeps working offline.",
    "You may need to adjust some PWABuilder settings to customize your Android app.",
];

/// Prints categorized messages to the terminal. Output errors are ignored.
pub struct Reporter {
    out: Box<dyn Write>,
    err: Box<dyn Write>,
    colors: bool,
}

impl Reporter {
    /// Reporter on stdout/stderr, colored when the terminal supports it.
    pub fn stdout() -> Self {
        Self {
            out: Box::new(Term::stdout()),
            err: Box::new(Term::stderr()),
            colors: console::colors_enabled(),
        }
    }

    /// Reporter writing to arbitrary sinks.
    #[cfg(test)]
    pub fn with_writers(out: impl Write + 'static, err: impl Write + 'static, colors: bool) -> Self {
        Self {
            out: Box::new(out),
            err: Box::new(err),
            colors,
        }
    }

    /// Print `text` decorated for `category`. Errors go to stderr.
    pub fn message(&mut self, category: Category, text: impl Display) {
        let line = render(category, &text.to_string(), self.colors);
        let sink = match category {
            Category::Error => &mut self.err,
            _ => &mut self.out,
        };
        let _ = writeln!(sink, "{}", line);
    }

    /// Section heading, preceded by a blank line.
    pub fn header(&mut self, text: impl Display) {
        self.blank();
        self.message(Category::Header, format!("=== {} ===", text));
    }

    pub fn info(&mut self, text: impl Display) {
        self.message(Category::Info, text);
    }

    pub fn success(&mut self, text: impl Display) {
        self.message(Category::Success, text);
    }

    pub fn warning(&mut self, text: impl Display) {
        self.message(Category::Warning, text);
    }

    pub fn error(&mut self, text: impl Display) {
        self.message(Category::Error, text);
    }

    /// Undecorated text, e.g. captured tool output.
    pub fn plain(&mut self, text: impl Display) {
        let _ = writeln!(self.out, "{}", text);
    }

    /// Undecorated text on stderr.
    pub fn plain_err(&mut self, text: impl Display) {
        let _ = writeln!(self.err, "{}", text);
    }

    pub fn blank(&mut self) {
        let _ = writeln!(self.out);
    }

    pub fn summary(&mut self, dir: &Path, summary: &OutputSummary) {
        self.info(format!("{} now holds {}", dir.display(), summary));
    }

    /// Fixed follow-up instructions printed after a successful run.
    pub fn instructions(&mut self) {
        self.blank();
        self.message(Category::Header, "Next steps to publish on GitHub Pages:");
        self.numbered(PUBLISH_STEPS);

        self.blank();
        self.message(Category::Header, "Turning the app into an Android app (APK):");
        self.numbered(APK_STEPS);

        self.blank();
        self.message(Category::Warning, "Important notes:");
        for note in NOTES {
            self.plain(format!("- {}", note));
        }

        let _ = self.out.flush();
    }

    fn numbered(&mut self, steps: &[&str]) {
        for (index, step) in steps.iter().enumerate() {
            self.plain(format!("{}. {}", index + 1, step));
        }
    }
}

/// Shared in-memory sink for inspecting reporter output in tests.
#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct Capture(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

#[cfg(test)]
impl Capture {
    pub(crate) fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }

    pub(crate) fn reporter() -> (Reporter, Capture, Capture) {
        let out = Capture::default();
        let err = Capture::default();
        (
            Reporter::with_writers(out.clone(), err.clone(), false),
            out,
            err,
        )
    }
}

#[cfg(test)]
impl Write for Capture {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
