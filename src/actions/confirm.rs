//! Yes/no decisions for interactive deletion.

use std::io::{self, BufRead, Write};
use std::path::Path;

/// Decides whether a duplicate should be deleted.
///
/// Implemented for closures so tests can inject a fixed answer.
pub trait Confirm {
    /// Return `true` to delete `path`.
    fn confirm(&mut self, path: &Path) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&Path) -> bool,
{
    fn confirm(&mut self, path: &Path) -> bool {
        self(path)
    }
}

/// Always gives the same answer.
#[derive(Debug, Clone, Copy)]
pub struct FixedAnswer(pub bool);

impl Confirm for FixedAnswer {
    fn confirm(&mut self, _path: &Path) -> bool {
        self.0
    }
}

/// Whether an operator response means "yes".
///
/// Only `y` (any case, surrounding whitespace ignored) counts.
#[must_use]
pub fn is_affirmative(response: &str) -> bool {
    response.trim().eq_ignore_ascii_case("y")
}

/// Prompts on one stream and reads the answer from another.
pub struct PromptConfirm<R, W> {
    input: R,
    output: W,
}

/// Prompt on stdout, read from stdin.
///
/// Stdin is only locked while a prompt is waiting for an answer.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&mut self, path: &Path) -> bool {
        PromptConfirm::new(io::stdin().lock(), io::stdout()).confirm(path)
    }
}

impl<R: BufRead, W: Write> PromptConfirm<R, W> {
    /// Create a confirmer over arbitrary streams.
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn ask(&mut self, path: &Path) -> io::Result<bool> {
        write!(
            self.output,
            "\nDo you want to delete {}? (y/n): ",
            path.display()
        )?;
        self.output.flush()?;

        let mut response = String::new();
        self.input.read_line(&mut response)?;
        Ok(is_affirmative(&response))
    }
}

impl<R: BufRead, W: Write> Confirm for PromptConfirm<R, W> {
    fn confirm(&mut self, path: &Path) -> bool {
        match self.ask(path) {
            Ok(answer) => answer,
            Err(e) => {
                log::warn!("Could not read answer for {}: {}", path.display(), e);
                false
            }
        }
    }
}
