use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

/// Line-based operator terminal.
#[async_trait]
pub trait Console: Send {
    /// Shows `prompt` and returns the next input line without its line
    /// terminator. Fails once input is exhausted.
    async fn read_line(&mut self, prompt: &str) -> Result<String>;

    fn say(&mut self, line: &str);
}

pub struct StdConsole {
    lines: Lines<BufReader<Stdin>>,
}

impl StdConsole {
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }
}

#[async_trait]
impl Console for StdConsole {
    async fn read_line(&mut self, prompt: &str) -> Result<String> {
        print!("{}", prompt);
        std::io::stdout().flush()?;
        match self.lines.next_line().await? {
            Some(line) => Ok(line.trim_end_matches('\r').to_string()),
            None => Err(anyhow!("console input closed")),
        }
    }

    fn say(&mut self, line: &str) {
        println!("{}", line);
    }
}
