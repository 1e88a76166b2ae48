//! Unit tests for the message field parser.

use rstest::rstest;

use super::*;

#[test]
fn full_message_with_prefix_and_trailing() {
    let message = Message::parse(":nick!u@h PRIVMSG #chan :hello world");
    assert_eq!(message.prefix, "nick!u@h");
    assert_eq!(message.command, "PRIVMSG");
    assert_eq!(message.params, vec!["#chan", "hello world"]);
}

#[test]
fn bare_command_is_valid() {
    let message = Message::parse("COMMAND");
    assert!(message.is_valid());
    assert_eq!(message.command, "COMMAND");
    assert!(message.prefix.is_empty());
    assert!(message.params.is_empty());
}

#[test]
fn numeric_command_with_trailing() {
    let message = Message::parse(":server 376 someuser :End of /MOTD command");
    assert_eq!(message.command, RPL_ENDOFMOTD);
    assert_eq!(message.params, vec!["someuser", "End of /MOTD command"]);
}

#[rstest]
#[case("")]
#[case(":bad")]
#[case(":prefix ")]
#[case(":")]
fn truncated_lines_are_invalid(#[case] line: &str) {
    let message = Message::parse(line);
    assert!(!message.is_valid());
    assert!(message.command.is_empty());
    assert!(message.params.is_empty());
}

#[test]
fn command_with_trailing_space_is_valid() {
    let message = Message::parse("COMMAND ");
    assert!(message.is_valid());
    assert_eq!(message.command, "COMMAND");
    assert!(message.params.is_empty());
}

#[test]
fn parameters_without_trailing_marker() {
    let message = Message::parse("JOIN #rust #tokio");
    assert_eq!(message.command, "JOIN");
    assert_eq!(message.params, vec!["#rust", "#tokio"]);
}

#[test]
fn repeated_spaces_between_parameters_are_skipped() {
    let message = Message::parse("MODE  #chan   +o");
    assert_eq!(message.params, vec!["#chan", "+o"]);
}

#[test]
fn empty_trailing_parameter_is_kept() {
    let message = Message::parse("QUIT :");
    assert_eq!(message.command, "QUIT");
    assert_eq!(message.params, vec![String::new()]);
}

#[test]
fn trailing_parameter_may_contain_colons() {
    let message = Message::parse("PING :irc.example.net:6667");
    assert_eq!(message.params, vec!["irc.example.net:6667"]);
}

#[rstest]
#[case("nick!user@host", "nick")]
#[case("server.example.net", "server.example.net")]
#[case("", "")]
fn sender_nick_strips_user_and_host(#[case] prefix: &str, #[case] expected: &str) {
    let message = Message {
        prefix: prefix.to_owned(),
        ..Message::default()
    };
    assert_eq!(message.sender_nick(), expected);
}
