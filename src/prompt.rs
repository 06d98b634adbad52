//! Interactive prompting.
//!
//! Multi-step actions (vm creation, image narrowing, ssh target choice)
//! ask their questions through the [`Prompter`] trait instead of the
//! terminal directly. The trait provides the retry loops; implementors
//! only supply the line primitives. [`TermPrompter`] is the interactive
//! surface, [`ScriptedPrompter`] feeds canned answers in tests.

use std::collections::VecDeque;
use std::io::{self, Write};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PromptError {
    /// The operator closed the input stream mid-question.
    #[error("end of input")]
    Eof,

    #[error("terminal error: {0}")]
    Io(#[from] io::Error),
}

pub trait Prompter {
    fn read_line(&mut self, prompt: &str) -> Result<String, PromptError>;
    fn read_secret(&mut self, prompt: &str) -> Result<String, PromptError>;

    /// Candidate data the next question refers to.
    fn show(&mut self, text: &str);
    fn warn(&mut self, text: &str);

    /// A non-empty string.
    fn ask_string(&mut self, name: &str) -> Result<String, PromptError> {
        let mut answer = self.read_line(&format!("Please provide {name} (str): "))?;
        while answer.trim().is_empty() {
            answer = self.read_line(&format!("Please provide NOT EMPTY {name} (str): "))?;
        }
        Ok(answer.trim().to_string())
    }

    /// A string, empty input meaning `default`.
    fn ask_string_default(&mut self, name: &str, default: &str) -> Result<String, PromptError> {
        let answer =
            self.read_line(&format!("Please provide {name} (str) (default: '{default}'): "))?;
        let answer = answer.trim();
        if answer.is_empty() {
            Ok(default.to_string())
        } else {
            Ok(answer.to_string())
        }
    }

    /// An integer, empty input meaning `default`. Non-numeric answers
    /// warn and re-ask.
    fn ask_int(&mut self, name: &str, default: i64) -> Result<i64, PromptError> {
        loop {
            let answer =
                self.read_line(&format!("Please provide {name} (int) (default: {default}): "))?;
            let answer = answer.trim();
            if answer.is_empty() {
                return Ok(default);
            }
            match answer.parse::<i64>() {
                Ok(value) => return Ok(value),
                Err(_) => self.warn(&format!("'{answer}' is not an integer")),
            }
        }
    }

    /// An integer that must satisfy `accept`; `hint` tells the operator
    /// what would.
    fn ask_int_where(
        &mut self,
        name: &str,
        default: i64,
        accept: &dyn Fn(i64) -> bool,
        hint: &str,
    ) -> Result<i64, PromptError> {
        loop {
            let value = self.ask_int(name, default)?;
            if accept(value) {
                return Ok(value);
            }
            self.warn(&format!("{value} does not fit constraint: {hint}"));
        }
    }

    /// A string read without echo.
    fn ask_secret(&mut self, name: &str) -> Result<String, PromptError> {
        self.read_secret(&format!("Please provide {name}: "))
    }
}

/// Prompter over the process terminal.
#[derive(Debug, Default)]
pub struct TermPrompter;

impl Prompter for TermPrompter {
    fn read_line(&mut self, prompt: &str) -> Result<String, PromptError> {
        print!("{prompt}");
        io::stdout().flush()?;
        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            return Err(PromptError::Eof);
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    fn read_secret(&mut self, prompt: &str) -> Result<String, PromptError> {
        rpassword::prompt_password(prompt).map_err(PromptError::Io)
    }

    fn show(&mut self, text: &str) {
        println!("{text}");
    }

    fn warn(&mut self, text: &str) {
        crate::output::warn(text);
    }
}

/// Canned-answer prompter. Every question consumes one queued answer;
/// running dry reads as end of input. Shown and warned text is kept in
/// a transcript so tests can assert on the conversation.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<String>,
    transcript: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new<I, S>(answers: I) -> ScriptedPrompter
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ScriptedPrompter {
            answers: answers.into_iter().map(Into::into).collect(),
            transcript: Vec::new(),
        }
    }

    /// Everything asked, shown and warned, in order.
    pub fn transcript(&self) -> &[String] {
        &self.transcript
    }
}

impl Prompter for ScriptedPrompter {
    fn read_line(&mut self, prompt: &str) -> Result<String, PromptError> {
        self.transcript.push(format!("ask: {prompt}"));
        self.answers.pop_front().ok_or(PromptError::Eof)
    }

    fn read_secret(&mut self, prompt: &str) -> Result<String, PromptError> {
        self.transcript.push(format!("secret: {prompt}"));
        self.answers.pop_front().ok_or(PromptError::Eof)
    }

    fn show(&mut self, text: &str) {
        self.transcript.push(format!("show: {text}"));
    }

    fn warn(&mut self, text: &str) {
        self.transcript.push(format!("warn: {text}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ask_string_retries_until_non_empty() {
        let mut io = ScriptedPrompter::new(["", "  ", "web1"]);
        assert_eq!(io.ask_string("hostname").unwrap(), "web1");
        assert_eq!(io.transcript().len(), 3);
    }

    #[test]
    fn test_ask_string_default_takes_empty() {
        let mut io = ScriptedPrompter::new([""]);
        assert_eq!(io.ask_string_default("name", "sys").unwrap(), "sys");
        let mut io = ScriptedPrompter::new(["data"]);
        assert_eq!(io.ask_string_default("name", "sys").unwrap(), "data");
    }

    #[test]
    fn test_ask_int_defaults_and_retries() {
        let mut io = ScriptedPrompter::new([""]);
        assert_eq!(io.ask_int("cores", 1).unwrap(), 1);

        let mut io = ScriptedPrompter::new(["four", "4"]);
        assert_eq!(io.ask_int("cores", 1).unwrap(), 4);
        assert!(io
            .transcript()
            .iter()
            .any(|line| line == "warn: 'four' is not an integer"));
    }

    #[test]
    fn test_ask_int_where_loops_until_constraint_holds() {
        let mut io = ScriptedPrompter::new(["100", "300", "320"]);
        let value = io
            .ask_int_where("memory", 256, &|m| m >= 256 && m % 64 == 0, "at least 256, multiple of 64")
            .unwrap();
        assert_eq!(value, 320);
        let warnings: Vec<_> = io
            .transcript()
            .iter()
            .filter(|line| line.starts_with("warn:"))
            .collect();
        assert_eq!(warnings.len(), 2);
    }

    #[test]
    fn test_running_dry_is_eof() {
        let mut io = ScriptedPrompter::new(Vec::<String>::new());
        assert!(matches!(io.ask_string("login"), Err(PromptError::Eof)));
    }
}
