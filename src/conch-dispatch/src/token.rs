//! Command-line tokenization.
//!
//! A raw input line is split into a command name plus an ordered sequence of
//! argument tokens. Three token forms exist:
//!
//! - bare tokens: any run of non-whitespace characters, returned verbatim,
//! - quoted strings: `"..."` with a fixed escape set, returned descaped and
//!   with the enclosing quotes stripped,
//! - brace literals: `{...}` with nested braces balanced, returned verbatim
//!   including the braces (the array literal form; its inner structure is
//!   the converter's business).
//!
//! A leading `--` or `--not-` on a bare token means nothing here; that
//! interpretation belongs to the resolver.

use thiserror::Error;

/// Errors produced while tokenizing a command line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    /// The line was empty or contained only whitespace.
    #[error("empty command line")]
    EmptyLine,

    /// The first word does not conform to the command-name grammar.
    #[error("invalid command name: '{name}'")]
    InvalidCommandName { name: String },

    /// A quoted string was not closed before the end of the line.
    #[error("unterminated quoted string")]
    UnterminatedString,

    /// A brace literal was not balanced before the end of the line.
    #[error("unterminated brace literal")]
    UnterminatedBrace,

    /// An escape sequence used a character outside the supported set.
    #[error("unsupported escape sequence '\\{escape}'")]
    UnsupportedEscape { escape: char },
}

/// A tokenized command line: the command name plus its argument tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    /// The command name (token 0).
    pub name: String,

    /// The remaining argument tokens, in order.
    pub args: Vec<String>,
}

/// Check a string against the name grammar `[_a-zA-Z][_a-zA-Z0-9]*`.
///
/// The same grammar governs command names and parameter names.
pub fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
}

/// Split a raw command line into a [`CommandLine`].
///
/// Fails when the line is empty, when the first word violates the name
/// grammar, when a quoted string or brace literal is unterminated, or when
/// an escape sequence is not recognized.
pub fn tokenize(line: &str) -> Result<CommandLine, SyntaxError> {
    let chars: Vec<char> = line.chars().collect();
    let mut pos = 0;

    skip_whitespace(&chars, &mut pos);
    if pos == chars.len() {
        return Err(SyntaxError::EmptyLine);
    }

    let name = read_bare(&chars, &mut pos);
    if !is_valid_name(&name) {
        return Err(SyntaxError::InvalidCommandName { name });
    }

    let mut args = Vec::new();
    loop {
        skip_whitespace(&chars, &mut pos);
        if pos == chars.len() {
            break;
        }
        let token = match chars[pos] {
            '"' => read_quoted(&chars, &mut pos)?,
            '{' => read_brace_literal(&chars, &mut pos)?,
            _ => read_bare(&chars, &mut pos),
        };
        args.push(token);
    }

    Ok(CommandLine { name, args })
}

fn skip_whitespace(chars: &[char], pos: &mut usize) {
    while *pos < chars.len() && chars[*pos].is_whitespace() {
        *pos += 1;
    }
}

fn read_bare(chars: &[char], pos: &mut usize) -> String {
    let start = *pos;
    while *pos < chars.len() && !chars[*pos].is_whitespace() {
        *pos += 1;
    }
    chars[start..*pos].iter().collect()
}

/// Read a `"..."` token, descaping as it goes.
///
/// Supported escapes: `\\`, `\"`, `\'`, `\t`, `\n`, `\b`, `\r`, `\f`.
fn read_quoted(chars: &[char], pos: &mut usize) -> Result<String, SyntaxError> {
    debug_assert_eq!(chars[*pos], '"');
    *pos += 1;

    let mut out = String::new();
    while *pos < chars.len() {
        match chars[*pos] {
            '"' => {
                *pos += 1;
                return Ok(out);
            }
            '\\' => {
                *pos += 1;
                let Some(&escaped) = chars.get(*pos) else {
                    return Err(SyntaxError::UnterminatedString);
                };
                out.push(descape(escaped)?);
                *pos += 1;
            }
            c => {
                out.push(c);
                *pos += 1;
            }
        }
    }
    Err(SyntaxError::UnterminatedString)
}

fn descape(escaped: char) -> Result<char, SyntaxError> {
    match escaped {
        '\\' => Ok('\\'),
        '"' => Ok('"'),
        '\'' => Ok('\''),
        't' => Ok('\t'),
        'n' => Ok('\n'),
        'b' => Ok('\u{0008}'),
        'r' => Ok('\r'),
        'f' => Ok('\u{000C}'),
        other => Err(SyntaxError::UnsupportedEscape { escape: other }),
    }
}

/// Read a `{...}` token verbatim, balancing nested braces.
///
/// The literal may span whitespace; it ends at the brace that returns the
/// nesting depth to zero.
fn read_brace_literal(chars: &[char], pos: &mut usize) -> Result<String, SyntaxError> {
    debug_assert_eq!(chars[*pos], '{');

    let start = *pos;
    let mut depth = 0usize;
    while *pos < chars.len() {
        match chars[*pos] {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    *pos += 1;
                    return Ok(chars[start..*pos].iter().collect());
                }
            }
            _ => {}
        }
        *pos += 1;
    }
    Err(SyntaxError::UnterminatedBrace)
}
