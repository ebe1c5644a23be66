//! Line-based console I/O: messages, prompts and the component menu.

use std::io::{self, BufRead, Write};

use thiserror::Error;

use crate::api::Credential;
use crate::selection::{is_confirmation, menu_prompt, parse_menu_choice, render_menu};

/// Invalid menu answers tolerated before giving up.
pub const MAX_PROMPT_ATTEMPTS: usize = 5;

/// Errors from interactive prompting.
#[derive(Debug, Error)]
pub enum PromptError {
    #[error("console I/O failed: {0}")]
    Io(#[from] io::Error),

    /// Input ended before an answer was given.
    #[error("input closed before a selection was made")]
    Closed,

    #[error("no valid selection after {0} attempts")]
    Exhausted(usize),
}

/// Reads answers from `R` and writes text to `W`.
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl Console<io::StdinLock<'static>, io::Stdout> {
    /// A console on the process's stdin and stdout.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Print a line.
    pub fn say(&mut self, text: impl AsRef<str>) -> io::Result<()> {
        writeln!(self.output, "{}", text.as_ref())
    }

    /// Print `question` and read one trimmed line. `None` at end of input.
    pub fn ask(&mut self, question: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", question)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Ask a yes/no question; only `y`/`yes` count as yes.
    pub fn confirm(&mut self, question: &str) -> io::Result<bool> {
        Ok(self
            .ask(&format!("{} (y/N): ", question))?
            .map(|answer| is_confirmation(&answer))
            .unwrap_or(false))
    }

    /// Ask for an access token.
    pub fn ask_token(&mut self) -> io::Result<Option<Credential>> {
        Ok(self
            .ask("\nEnter your PAT token: ")?
            .and_then(Credential::new))
    }

    /// Show the menu and read a selection, re-asking on invalid input.
    pub fn choose_components(&mut self, components: &[String]) -> Result<Vec<String>, PromptError> {
        self.say(render_menu(components))?;
        let prompt = format!("\n{}", menu_prompt(components));

        for _ in 0..MAX_PROMPT_ATTEMPTS {
            let answer = self.ask(&prompt)?.ok_or(PromptError::Closed)?;
            match parse_menu_choice(&answer, components) {
                Ok(picks) => return Ok(picks),
                Err(e) => self.say(e.to_string())?,
            }
        }
        Err(PromptError::Exhausted(MAX_PROMPT_ATTEMPTS))
    }

    /// Consume the console, returning the writer.
    pub fn into_output(self) -> W {
        self.output
    }
}
