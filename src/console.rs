//! Line-oriented console dialogue
//!
//! Input is read through `tokio`'s async reader so a pending prompt never
//! blocks the runtime (Ctrl+C stays observable). Output goes to any
//! `std::io::Write`, which lets tests capture the whole dialogue.

use std::io::Write;
use std::ops::RangeInclusive;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Stdin};

use crate::error::Result;

/// The only answer that confirms a deletion (compared case-insensitively).
pub const AFFIRMATIVE: &str = "да";

/// Result of parsing a numbered menu answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Number(usize),
    OutOfRange,
    NotANumber,
}

/// Parse a menu answer against an inclusive range of accepted numbers.
pub fn parse_choice(input: &str, range: RangeInclusive<usize>) -> Choice {
    match input.trim().parse::<usize>() {
        Ok(n) if range.contains(&n) => Choice::Number(n),
        Ok(_) => Choice::OutOfRange,
        Err(_) => Choice::NotANumber,
    }
}

pub fn is_affirmative(input: &str) -> bool {
    input.trim().to_lowercase() == AFFIRMATIVE
}

pub struct Console<R, W> {
    input: R,
    output: W,
}

/// Console bound to the process stdin/stdout
pub type StdConsole = Console<BufReader<Stdin>, std::io::Stdout>;

impl StdConsole {
    pub fn stdio() -> Self {
        Console::new(BufReader::new(tokio::io::stdin()), std::io::stdout())
    }
}

impl<R, W> Console<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: Write + Send,
{
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Print one line
    pub fn say(&mut self, text: impl AsRef<str>) -> Result<()> {
        writeln!(self.output, "{}", text.as_ref())?;
        self.output.flush()?;
        Ok(())
    }

    /// Show `text` and read one trimmed line. `None` means end of input.
    pub async fn prompt(&mut self, text: impl AsRef<str>) -> Result<Option<String>> {
        write!(self.output, "{}", text.as_ref())?;
        self.output.flush()?;

        let mut line = String::new();
        let read = self.input.read_line(&mut line).await?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Ask a yes/no question; anything but the affirmative word (or EOF) is "no".
    pub async fn confirm(&mut self, question: impl AsRef<str>) -> Result<bool> {
        let answer = self
            .prompt(format!("{} ({}/нет): ", question.as_ref(), AFFIRMATIVE))
            .await?;
        Ok(answer.as_deref().is_some_and(is_affirmative))
    }

    /// Block until the user presses Enter (or input ends)
    pub async fn pause(&mut self, text: impl AsRef<str>) -> Result<()> {
        self.prompt(text).await?;
        Ok(())
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }
}
