//! Operator prompts.

use std::io::{self, BufRead, IsTerminal, Write};

use dialoguer::theme::ColorfulTheme;
use dialoguer::Input;

/// Answers accepted as "yes", compared after trimming and lowercasing.
pub const AFFIRMATIVE: &[&str] = &["نعم", "y", "yes"];

/// Whether an answer to a yes/no question means yes.
pub fn is_affirmative(answer: &str) -> bool {
    let answer = answer.trim().to_lowercase();
    AFFIRMATIVE.contains(&answer.as_str())
}

/// Source of operator answers.
pub trait PromptProvider {
    /// Ask a free-text question and return the trimmed answer.
    fn input(&mut self, question: &str) -> io::Result<String>;

    /// Ask a yes/no question. Anything but an affirmative answer is a no.
    fn confirm(&mut self, question: &str) -> io::Result<bool> {
        let answer = self.input(&format!("{} (yes/no, نعم/لا)", question))?;
        Ok(is_affirmative(&answer))
    }
}

/// Interactive prompt on a terminal.
pub struct TerminalPrompt {
    theme: ColorfulTheme,
}

impl TerminalPrompt {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }
}

impl Default for TerminalPrompt {
    fn default() -> Self {
        Self::new()
    }
}

impl PromptProvider for TerminalPrompt {
    fn input(&mut self, question: &str) -> io::Result<String> {
        let answer: String = Input::with_theme(&self.theme)
            .with_prompt(question)
            .allow_empty(true)
            .interact_text()
            .map_err(io::Error::other)?;
        Ok(answer.trim().to_string())
    }
}

/// Line-based prompt: writes the question, reads one line.
///
/// End of input reads as an empty answer.
pub struct LinePrompt<R, W> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> LinePrompt<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }
}

impl<R: BufRead, W: Write> PromptProvider for LinePrompt<R, W> {
    fn input(&mut self, question: &str) -> io::Result<String> {
        write!(self.writer, "{} ", question)?;
        self.writer.flush()?;

        let mut line = String::new();
        self.reader.read_line(&mut line)?;
        writeln!(self.writer)?;

        Ok(line.trim().to_string())
    }
}

/// Prompt for the current process: dialoguer on a terminal, plain lines
/// from stdin when it is piped.
pub fn for_stdin() -> Box<dyn PromptProvider> {
    if io::stdin().is_terminal() {
        Box::new(TerminalPrompt::new())
    } else {
        Box::new(LinePrompt::new(io::stdin().lock(), io::stdout()))
    }
}
