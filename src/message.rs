//! Parsed protocol messages and the field parser.
//!
//! Incoming lines follow the shape `[':' prefix SP] command SP [params...]
//! [SP ':' trailing]`. [`Message::parse`] walks a line one character at a
//! time; a line that ends before a complete command token was read yields an
//! empty command, which callers treat as "drop silently" rather than an
//! error.

/// Numeric reply marking the end of the server's message-of-the-day banner.
///
/// Receipt of this numeric is the signal that the login handshake finished.
pub const RPL_ENDOFMOTD: &str = "376";

/// A single parsed protocol message.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Message {
    /// Sender annotation; empty when the line carried no prefix.
    pub prefix: String,
    /// Command token or three-digit numeric; empty for an unparsable line.
    pub command: String,
    /// Ordered parameters. The final parameter may contain spaces when it
    /// was introduced by the trailing marker.
    pub params: Vec<String>,
}

/// Parser position within a line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ParseState {
    /// Nothing consumed yet; a leading `:` starts a prefix.
    Start,
    /// Accumulating the prefix up to the first space.
    Prefix,
    /// Between prefix and command; skips spaces.
    PreCommand,
    /// Accumulating the command token.
    Command,
    /// Between parameters; a `:` starts the trailing parameter.
    PreParameter,
    /// Accumulating a normal (space-terminated) parameter.
    Parameter,
    /// Accumulating the trailing parameter; consumes the rest of the line.
    TrailingParameter,
}

impl Message {
    /// Parse one protocol line (terminator already stripped).
    ///
    /// Lines ending before the command token completed parse to a message
    /// with an empty command; a bare `COMMAND` with no parameters is valid.
    #[must_use]
    pub fn parse(line: &str) -> Self {
        let mut state = ParseState::Start;
        let mut prefix = String::new();
        let mut command = String::new();
        let mut params = Vec::new();
        let mut current = String::new();

        for ch in line.chars() {
            state = match state {
                ParseState::Start => {
                    if ch == ':' {
                        ParseState::Prefix
                    } else {
                        command.push(ch);
                        ParseState::Command
                    }
                }
                ParseState::Prefix => {
                    if ch == ' ' {
                        ParseState::PreCommand
                    } else {
                        prefix.push(ch);
                        ParseState::Prefix
                    }
                }
                ParseState::PreCommand => {
                    if ch == ' ' {
                        ParseState::PreCommand
                    } else {
                        command.push(ch);
                        ParseState::Command
                    }
                }
                ParseState::Command => {
                    if ch == ' ' {
                        ParseState::PreParameter
                    } else {
                        command.push(ch);
                        ParseState::Command
                    }
                }
                ParseState::PreParameter => match ch {
                    ':' => ParseState::TrailingParameter,
                    ' ' => ParseState::PreParameter,
                    _ => {
                        current.push(ch);
                        ParseState::Parameter
                    }
                },
                ParseState::Parameter => {
                    if ch == ' ' {
                        params.push(std::mem::take(&mut current));
                        ParseState::PreParameter
                    } else {
                        current.push(ch);
                        ParseState::Parameter
                    }
                }
                ParseState::TrailingParameter => {
                    current.push(ch);
                    ParseState::TrailingParameter
                }
            };
        }

        match state {
            // The line ended before a command token completed; clear
            // everything so callers see the single "unparsable" signal.
            ParseState::Start | ParseState::Prefix | ParseState::PreCommand => Self::default(),
            ParseState::Command | ParseState::PreParameter => Self {
                prefix,
                command,
                params,
            },
            ParseState::Parameter | ParseState::TrailingParameter => {
                params.push(current);
                Self {
                    prefix,
                    command,
                    params,
                }
            }
        }
    }

    /// Whether the line was well-formed through at least the command token.
    #[must_use]
    pub fn is_valid(&self) -> bool { !self.command.is_empty() }

    /// Nick portion of the prefix (`nick!user@host` yields `nick`).
    ///
    /// Returns the whole prefix when it carries no user/host annotation.
    #[must_use]
    pub fn sender_nick(&self) -> &str {
        self.prefix
            .split_once('!')
            .map_or(self.prefix.as_str(), |(nick, _)| nick)
    }
}

#[cfg(test)]
mod tests;
