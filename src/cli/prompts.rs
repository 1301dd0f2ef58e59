//! Interactive prompts using dialoguer

use std::io::{self, BufRead, BufReader, IsTerminal};

use dialoguer::Confirm;

use crate::pipeline::OverwritePrompt;

/// Asks on the terminal, or reads one line from piped stdin.
///
/// Only `y` (any case) counts as yes; anything else, including EOF, is no.
pub struct TerminalPrompt<R> {
    input: R,
    interactive: bool,
}

impl TerminalPrompt<BufReader<io::Stdin>> {
    pub fn stdin() -> Self {
        let stdin = io::stdin();
        let interactive = stdin.is_terminal();
        Self {
            input: BufReader::new(stdin),
            interactive,
        }
    }
}

impl<R: BufRead> TerminalPrompt<R> {
    /// Prompt that reads answers from `input` instead of the terminal
    pub fn from_reader(input: R) -> Self {
        Self {
            input,
            interactive: false,
        }
    }
}

/// Question shown for an existing output file
pub fn overwrite_question(file_name: &str) -> String {
    format!("File \"{}\" exists. Overwrite?", file_name)
}

/// Whether a typed answer means yes
pub fn is_yes(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("y")
}

impl<R: BufRead> OverwritePrompt for TerminalPrompt<R> {
    fn confirm_overwrite(&mut self, file_name: &str) -> io::Result<bool> {
        let question = overwrite_question(file_name);
        if self.interactive {
            return Confirm::new()
                .with_prompt(question)
                .default(false)
                .interact()
                .map_err(io::Error::other);
        }

        println!("{} (y/n [n])", question);
        let mut answer = String::new();
        self.input.read_line(&mut answer)?;
        Ok(is_yes(&answer))
    }
}
