//! REPL input parsing.

/// One line of REPL input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `/upload <path>...`
    Upload(Vec<String>),
    /// `/remove <name>`
    Remove(String),
    /// `/docs`
    Docs,
    /// `/select <name|number>`
    Select(String),
    /// `/history`
    History,
    /// `/clear`
    Clear,
    /// `/help`
    Help,
    /// `/quit` or `/exit`
    Quit,
    /// Anything that is not a command.
    Ask(String),
    /// A blank line.
    Empty,
    /// A malformed command, with the message to show.
    Invalid(String),
}

pub const HELP: &str = "\
Commands:
  /upload <path>...      index one or more PDF files
  /remove <name>         drop an uploaded file and its history
  /docs                  list uploaded files
  /select <name|number>  choose the file questions are about
  /history               show questions and answers for the selected file
  /clear                 clear the selected file's history
  /help                  show this help
  /quit                  exit
Any other input is a question about the selected file.";

impl Command {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Self::Empty;
        }
        let Some(rest) = line.strip_prefix('/') else {
            return Self::Ask(line.to_string());
        };

        let (name, arg) = match rest.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (rest, ""),
        };

        match name.to_ascii_lowercase().as_str() {
            "upload" => {
                let paths: Vec<String> = arg.split_whitespace().map(str::to_string).collect();
                if paths.is_empty() {
                    Self::Invalid("usage: /upload <path>...".into())
                } else {
                    Self::Upload(paths)
                }
            }
            "remove" => Self::required(arg, Self::Remove, "usage: /remove <name>"),
            "select" => Self::required(arg, Self::Select, "usage: /select <name|number>"),
            "docs" => Self::Docs,
            "history" => Self::History,
            "clear" => Self::Clear,
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => Self::Invalid(format!("unknown command '/{other}', try /help")),
        }
    }

    fn required(arg: &str, make: fn(String) -> Self, usage: &str) -> Self {
        if arg.is_empty() { Self::Invalid(usage.to_string()) } else { make(arg.to_string()) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_a_question() {
        assert_eq!(Command::parse("  What are cats? \n"), Command::Ask("What are cats?".into()));
        assert_eq!(Command::parse("   "), Command::Empty);
    }

    #[test]
    fn commands_take_arguments() {
        assert_eq!(
            Command::parse("/upload a.pdf  docs/b.pdf"),
            Command::Upload(vec!["a.pdf".into(), "docs/b.pdf".into()])
        );
        assert_eq!(Command::parse("/remove my report.pdf"), Command::Remove("my report.pdf".into()));
        assert_eq!(Command::parse("/SELECT 2"), Command::Select("2".into()));
        assert_eq!(Command::parse("/exit"), Command::Quit);
        assert_eq!(Command::parse("/docs"), Command::Docs);
    }

    #[test]
    fn missing_arguments_and_unknown_commands_are_invalid() {
        assert!(matches!(Command::parse("/upload"), Command::Invalid(_)));
        assert!(matches!(Command::parse("/remove   "), Command::Invalid(_)));
        assert!(matches!(Command::parse("/frobnicate"), Command::Invalid(m) if m.contains("/frobnicate")));
    }
}
