//! Command-line tokenizer.
//!
//! Turns the raw text of a shell prompt into [`CommandToken`]s. Only the last
//! command of a pipeline or list is tokenized, since that is the one being
//! completed.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

static COMMAND_DELIMITER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\|\||&&|;|\|").expect("static regex must compile"));

/// One lexical unit of a command line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandToken {
    /// Token text without surrounding quotes. Backslash escapes are kept.
    pub text: String,
    /// `false` only for the token still being typed.
    pub complete: bool,
    pub is_option: bool,
    pub is_quoted: bool,
    /// Set during resolution when the token names a filesystem path.
    pub is_path: bool,
    /// Set with `is_path` when the path is fully typed.
    pub is_path_complete: bool,
    /// Set when the token was accepted as a persistent option.
    pub is_persistent: bool,
}

impl CommandToken {
    /// A complete, unquoted token; option-ness is derived from the text.
    pub fn complete(text: &str) -> Self {
        Self {
            text: text.to_string(),
            complete: true,
            is_option: text.starts_with('-'),
            ..Default::default()
        }
    }

    /// The token being typed.
    pub fn partial(text: &str) -> Self {
        Self {
            complete: false,
            ..Self::complete(text)
        }
    }

    /// Text after the last `/`, or the whole text.
    pub fn basename(&self) -> &str {
        self.text.rsplit('/').next().unwrap_or_default()
    }
}

/// Tokenizes the last command of `line`.
///
/// # Examples
///
/// ```
/// use spec_complete_engine::parse_command;
///
/// let tokens = parse_command("cat notes.txt | grep -i ");
/// let texts: Vec<_> = tokens.iter().map(|t| t.text.as_str()).collect();
/// assert_eq!(texts, ["grep", "-i"]);
/// assert!(tokens.iter().all(|t| t.complete));
///
/// let tokens = parse_command("git commit --message=\"wip");
/// assert_eq!(tokens[2].text, "--message");
/// assert!(tokens[2].is_option);
/// assert_eq!(tokens[3].text, "wip");
/// assert!(tokens[3].is_quoted && !tokens[3].complete);
/// ```
pub fn parse_command(line: &str) -> Vec<CommandToken> {
    let segment = COMMAND_DELIMITER_RE
        .split(line)
        .last()
        .unwrap_or_default()
        .trim_start();
    lex(segment)
}

fn lex(segment: &str) -> Vec<CommandToken> {
    let chars: Vec<char> = segment.chars().collect();
    let len = chars.len();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < len {
        let c = chars[i];
        if c.is_whitespace() {
            i += 1;
            continue;
        }

        if c == '"' || c == '\'' {
            let start = i + 1;
            let mut j = start;
            while j < len && chars[j] != c {
                j += if chars[j] == '\\' && j + 1 < len { 2 } else { 1 };
            }
            let end = j.min(len);
            tokens.push(CommandToken {
                text: chars[start.min(len)..end].iter().collect(),
                // closed and followed by anything
                complete: j + 1 < len,
                is_quoted: true,
                ..Default::default()
            });
            i = j + 1;
            continue;
        }

        let is_option = c == '-';
        let mut j = i;
        while j < len {
            let ch = chars[j];
            if ch == '\\' && j + 1 < len {
                j += 2;
                continue;
            }
            if ch.is_whitespace() || (is_option && ch == '=') {
                break;
            }
            j += 1;
        }
        let end = j.min(len);
        tokens.push(CommandToken {
            text: chars[i..end].iter().collect(),
            complete: end < len,
            is_option,
            ..Default::default()
        });
        i = end + 1;
    }

    tokens
}

/// Rebuilds a command line from tokens.
///
/// Quoted tokens are re-wrapped in quotes and a trailing space is emitted
/// when the last token is complete, so re-tokenizing the result gives back
/// the same tokens.
///
/// # Examples
///
/// ```
/// use spec_complete_engine::{parse_command, stringify_tokens};
///
/// let tokens = parse_command("echo 'a b' c ");
/// assert_eq!(stringify_tokens(&tokens), "echo \"a b\" c ");
/// ```
pub fn stringify_tokens(tokens: &[CommandToken]) -> String {
    let mut out = tokens
        .iter()
        .map(|t| {
            if t.is_quoted {
                let quote = if t.text.contains('"') && !t.text.contains('\'') {
                    '\''
                } else {
                    '"'
                };
                format!("{quote}{}{quote}", t.text)
            } else {
                t.text.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(" ");
    if tokens.last().is_some_and(|t| t.complete) {
        out.push(' ');
    }
    out
}
