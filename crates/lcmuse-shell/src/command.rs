//! REPL input parsing.

pub const COMMANDS: [&str; 6] = ["/send", "/clear", "/show", "/whoami", "/help", "/quit"];

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Any line that is not a slash command is a description to submit
    Prompt(String),
    Send,
    Clear,
    Show,
    WhoAmI,
    Help,
    Quit,
    Unknown(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        if !trimmed.starts_with('/') {
            return Command::Prompt(line.to_string());
        }
        match trimmed {
            "/send" => Command::Send,
            "/clear" => Command::Clear,
            "/show" => Command::Show,
            "/whoami" => Command::WhoAmI,
            "/help" => Command::Help,
            "/quit" | "/exit" => Command::Quit,
            other => Command::Unknown(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_prompt() {
        assert_eq!(
            Command::parse("slow arpeggio in A minor"),
            Command::Prompt("slow arpeggio in A minor".to_string())
        );
        // Blank input still reaches the shell model, which rejects it
        assert_eq!(Command::parse("   "), Command::Prompt("   ".to_string()));
    }

    #[test]
    fn test_slash_commands() {
        assert_eq!(Command::parse("/send"), Command::Send);
        assert_eq!(Command::parse(" /clear "), Command::Clear);
        assert_eq!(Command::parse("/exit"), Command::Quit);
        assert_eq!(
            Command::parse("/play"),
            Command::Unknown("/play".to_string())
        );
    }
}
