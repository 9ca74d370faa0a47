//! # Input Module
//!
//! Line-oriented command input for the text interface.

pub mod commands;

pub use commands::*;

use crate::DelveResult;
use std::io::BufRead;

/// Reads player commands one line at a time.
///
/// Generic over the reader so the game loop can run against stdin or a
/// scripted buffer.
pub struct InputHandler<R> {
    reader: R,
    line: String,
}

impl<R: BufRead> InputHandler<R> {
    /// Creates a new input handler.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::{Command, InputHandler};
    /// use std::io::Cursor;
    ///
    /// let mut input = InputHandler::new(Cursor::new("explore\n"));
    /// assert_eq!(input.next_command().unwrap().unwrap(), Command::Explore);
    /// assert!(input.next_command().is_none());
    /// ```
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: String::new(),
        }
    }

    /// Reads and parses the next non-blank line.
    ///
    /// Returns `None` at end of input. A read failure or an unrecognized
    /// command is returned as an error so the caller can report it and carry
    /// on.
    pub fn next_command(&mut self) -> Option<DelveResult<Command>> {
        loop {
            self.line.clear();
            match self.reader.read_line(&mut self.line) {
                Ok(0) => return None,
                Ok(_) if self.line.trim().is_empty() => continue,
                Ok(_) => return Some(Command::parse(&self.line)),
                Err(err) => return Some(Err(err.into())),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Direction;
    use crate::DelveError;
    use std::io::Cursor;

    #[test]
    fn test_reads_commands_in_order_skipping_blank_lines() {
        let mut input = InputHandler::new(Cursor::new("n\n\n  \nexplore\nfly\nq\n"));

        assert_eq!(input.next_command().unwrap().unwrap(), Command::Move(Direction::North));
        assert_eq!(input.next_command().unwrap().unwrap(), Command::Explore);
        assert!(matches!(
            input.next_command().unwrap(),
            Err(DelveError::InvalidParameter(_))
        ));
        assert_eq!(input.next_command().unwrap().unwrap(), Command::Quit);
        assert!(input.next_command().is_none());
    }

    #[test]
    fn test_last_line_without_newline() {
        let mut input = InputHandler::new(Cursor::new("map"));
        assert_eq!(input.next_command().unwrap().unwrap(), Command::ShowMap);
        assert!(input.next_command().is_none());
    }
}
