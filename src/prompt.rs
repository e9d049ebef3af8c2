use crate::error::AppError;
use std::io::{self, BufRead, Write};

/// Line-oriented question/answer helper over any reader and writer.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Blank answers and end of input both mean "skip".
    pub fn ask_optional(&mut self, question: &str) -> Result<Option<String>, AppError> {
        Ok(self
            .read_answer(question)?
            .filter(|answer| !answer.trim().is_empty()))
    }

    pub fn ask_required(&mut self, question: &str) -> Result<String, AppError> {
        match self.ask_optional(question)? {
            Some(answer) => Ok(answer.trim().to_string()),
            None => Err(AppError::InvalidInput(format!("no answer given for '{question}'"))),
        }
    }

    pub fn ask_count(&mut self, question: &str) -> Result<i64, AppError> {
        let answer = self.ask_required(question)?;
        answer
            .parse::<i64>()
            .map_err(|_| AppError::InvalidInput(format!("'{answer}' is not a whole number")))
    }

    fn read_answer(&mut self, question: &str) -> io::Result<Option<String>> {
        write!(self.output, "{question}: ")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let answer = line.trim_end_matches(['\r', '\n']).to_string();
        Ok(Some(answer))
    }
}
