//! Splits one input line into arguments and redirections.
//!
//! The scan is a single left-to-right pass. Between tokens the only state is
//! which redirection, if any, the next bare word belongs to.

use crate::command::ParsedCommand;
use std::error::Error;
use std::fmt;

/// Redirection operators recognised by the scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectKind {
    /// `<`: standard input from a file.
    Input,
    /// `>`: standard output to a file, truncating it.
    Output,
    /// `>>`: standard output to a file, appending to it.
    Append,
}

impl RedirectKind {
    pub fn operator(self) -> &'static str {
        match self {
            RedirectKind::Input => "<",
            RedirectKind::Output => ">",
            RedirectKind::Append => ">>",
        }
    }
}

/// Malformed lines. Nothing is executed for a line that fails to parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsingError {
    /// A `"` was opened at `column` (1-based) and never closed.
    UnfinishedQuote { column: usize },
    /// A redirection operator was not followed by a filename.
    MissingRedirectTarget { operator: RedirectKind },
}

impl fmt::Display for ParsingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParsingError::UnfinishedQuote { column } => {
                write!(f, "unterminated quote starting at column {}", column)
            }
            ParsingError::MissingRedirectTarget { operator } => {
                write!(f, "missing filename after '{}'", operator.operator())
            }
        }
    }
}

impl Error for ParsingError {}

struct LineScanner {
    input: Vec<char>,
    pos: usize,
    command: ParsedCommand,
}

impl LineScanner {
    fn new(line: &str) -> Self {
        LineScanner {
            input: line.chars().collect(),
            pos: 0,
            command: ParsedCommand::default(),
        }
    }

    fn scan(mut self) -> Result<ParsedCommand, ParsingError> {
        loop {
            self.skip_blanks();
            let Some(ch) = self.peek_char() else {
                break;
            };
            match ch {
                '"' => self.read_quoted()?,
                '<' => {
                    self.read_char();
                    self.read_redirect(RedirectKind::Input)?;
                }
                '>' => {
                    self.read_char();
                    if self.peek_char() == Some('>') {
                        self.read_char();
                        self.read_redirect(RedirectKind::Append)?;
                    } else {
                        self.read_redirect(RedirectKind::Output)?;
                    }
                }
                _ => {
                    let word = self.read_bare_word();
                    self.command.arguments.push(word);
                }
            }
        }
        Ok(self.command)
    }

    fn read_char(&mut self) -> Option<char> {
        let ch = self.input.get(self.pos).copied();
        if ch.is_some() {
            self.pos += 1;
        }
        ch
    }

    fn peek_char(&self) -> Option<char> {
        self.input.get(self.pos).copied()
    }

    fn skip_blanks(&mut self) {
        while self.peek_char().is_some_and(is_word_break) {
            self.pos += 1;
        }
    }

    /// Consumes up to the next blank. Quotes and operators inside the word are literal.
    fn read_bare_word(&mut self) -> String {
        let mut word = String::new();
        while let Some(ch) = self.peek_char() {
            if is_word_break(ch) {
                break;
            }
            word.push(ch);
            self.pos += 1;
        }
        word
    }

    /// Text between a pair of `"` becomes one argument, blanks included.
    /// There is no escape for `"` itself.
    fn read_quoted(&mut self) -> Result<(), ParsingError> {
        let column = self.pos + 1;
        self.read_char();
        let mut text = String::new();
        loop {
            match self.read_char() {
                Some('"') => break,
                Some(ch) => text.push(ch),
                None => return Err(ParsingError::UnfinishedQuote { column }),
            }
        }
        if !text.is_empty() {
            self.command.arguments.push(text);
        }
        Ok(())
    }

    /// The operator has been consumed; the next bare word is the filename.
    fn read_redirect(&mut self, kind: RedirectKind) -> Result<(), ParsingError> {
        self.skip_blanks();
        let target = self.read_bare_word();
        if target.is_empty() {
            return Err(ParsingError::MissingRedirectTarget { operator: kind });
        }
        match kind {
            RedirectKind::Input => self.command.input_redirect = Some(target),
            RedirectKind::Output | RedirectKind::Append => {
                self.command.output_redirect = Some(target);
                self.command.append = kind == RedirectKind::Append;
            }
        }
        Ok(())
    }
}

fn is_word_break(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\n')
}

/// Parses one line of input (without its trailing newline).
///
/// A blank line yields a command with no arguments. When the same kind of
/// redirection appears more than once, the last one wins; a later `>` also
/// clears the append flag set by an earlier `>>`.
///
/// # Errors
///
/// Returns a [`ParsingError`] for an unterminated `"` or a redirection
/// operator with no filename after it.
pub fn parse_line(line: &str) -> Result<ParsedCommand, ParsingError> {
    LineScanner::new(line).scan()
}
