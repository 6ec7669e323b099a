//! Parsing of the lines typed into the prompt.

use std::error::Error as StdError;
use std::fmt::{self, Display, Formatter};

use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// Help text listing every command.
pub const HELP: &str = "\
/file <path>    attach a .txt or .pdf file
/url <address>  use a web page as context (takes precedence over the file)
/url            stop using the web page, the file is used again
/detach         forget the attached file and URL
/history        show the conversation so far
/help           show this help
/quit           leave
Anything else is sent as a question.";

/// A parsed input line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command<'a> {
    /// Ask the model a question.
    Ask(&'a str),
    /// Attach the file at the given path.
    File(&'a str),
    /// Use the page at the given address as context.
    Url(&'a str),
    /// Stop using a web page as context.
    ClearUrl,
    /// Clear the attached file and URL.
    Detach,
    /// Print the transcript.
    History,
    /// Print the help text.
    Help,
    /// Exit the program.
    Quit,
}

impl<'a> Command<'a> {
    /// Parses a line, returning `None` for a blank one.
    pub fn parse(line: &'a str) -> Result<Option<Self>, ParseError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let Some(command) = line.strip_prefix('/') else {
            return Ok(Some(Command::Ask(line)));
        };

        let (name, arg) = match command.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (command, ""),
        };
        let command = match name {
            "file" => Command::File(required(arg, "/file <path>")?),
            "url" if arg.is_empty() => Command::ClearUrl,
            "url" => Command::Url(arg),
            "detach" => Command::Detach,
            "history" => Command::History,
            "help" => Command::Help,
            "quit" | "exit" => Command::Quit,
            _ => return Err(ParseError::Unknown(name.to_owned())),
        };
        Ok(Some(command))
    }
}

/// Reads the next input line, `None` once the input is exhausted.
///
/// Keep one reader for the whole session. Whatever it buffered past the
/// returned line is only seen by later calls on the same reader.
pub async fn read_line<R: AsyncBufRead + Unpin>(
    reader: &mut R,
) -> Option<String> {
    let mut line = String::new();
    match reader.read_line(&mut line).await {
        Ok(0) => None,
        Ok(_) => Some(line),
        Err(err) => {
            error!("error reading input: {err}");
            None
        }
    }
}

#[inline]
fn required<'a>(
    arg: &'a str,
    usage: &'static str,
) -> Result<&'a str, ParseError> {
    if arg.is_empty() {
        Err(ParseError::MissingArgument(usage))
    } else {
        Ok(arg)
    }
}

/// The error returned for lines that look like commands but aren't valid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParseError {
    /// The command needs an argument; carries the usage line.
    MissingArgument(&'static str),
    /// No command has this name.
    Unknown(String),
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::MissingArgument(usage) => write!(f, "usage: {usage}"),
            ParseError::Unknown(name) => {
                write!(f, "unknown command `/{name}`, try /help")
            }
        }
    }
}

impl StdError for ParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_questions() {
        assert_eq!(
            Command::parse("When is the deadline?\n"),
            Ok(Some(Command::Ask("When is the deadline?")))
        );
        assert_eq!(Command::parse("   \n"), Ok(None));
    }

    #[test]
    fn test_commands_with_arguments() {
        assert_eq!(
            Command::parse("/file  notes/project x.txt \n"),
            Ok(Some(Command::File("notes/project x.txt")))
        );
        assert_eq!(
            Command::parse("/url https://example.com/a"),
            Ok(Some(Command::Url("https://example.com/a")))
        );
        assert_eq!(
            Command::parse("/file"),
            Err(ParseError::MissingArgument("/file <path>"))
        );
        assert_eq!(
            Command::parse("/file  ").unwrap_err().to_string(),
            "usage: /file <path>"
        );
        assert_eq!(Command::parse("/url   "), Ok(Some(Command::ClearUrl)));
    }

    #[test]
    fn test_plain_commands() {
        assert_eq!(Command::parse("/detach"), Ok(Some(Command::Detach)));
        assert_eq!(Command::parse("/history"), Ok(Some(Command::History)));
        assert_eq!(Command::parse("/help"), Ok(Some(Command::Help)));
        assert_eq!(Command::parse("/quit"), Ok(Some(Command::Quit)));
        assert_eq!(Command::parse("/exit"), Ok(Some(Command::Quit)));
    }

    #[tokio::test]
    async fn test_read_lines_from_one_buffer() {
        let input: &[u8] = b"/file notes.txt\nWhen is the deadline?\n";
        let mut reader = tokio::io::BufReader::new(input);

        let line = read_line(&mut reader).await.unwrap();
        assert_eq!(
            Command::parse(&line),
            Ok(Some(Command::File("notes.txt")))
        );
        let line = read_line(&mut reader).await.unwrap();
        assert_eq!(
            Command::parse(&line),
            Ok(Some(Command::Ask("When is the deadline?")))
        );
        assert_eq!(read_line(&mut reader).await, None);
    }

    #[tokio::test]
    async fn test_read_unterminated_line() {
        let mut reader: &[u8] = b"/quit";
        assert_eq!(read_line(&mut reader).await.as_deref(), Some("/quit"));
        assert_eq!(read_line(&mut reader).await, None);
    }

    #[test]
    fn test_unknown_command() {
        let err = Command::parse("/summarize now").unwrap_err();
        assert_eq!(err, ParseError::Unknown("summarize".to_owned()));
        assert_eq!(err.to_string(), "unknown command `/summarize`, try /help");
    }
}
