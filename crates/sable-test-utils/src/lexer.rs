//! Trivia-preserving lexer for fixture sources
//!
//! Every byte of the input ends up in exactly one token, so parsing the
//! tokens back into a tree is lossless.

use sable_core::SyntaxKind;

/// A token with its syntax kind and source text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixtureToken<'a> {
    pub kind: SyntaxKind,
    pub text: &'a str,
}

fn next_char(input: &str, index: usize) -> Option<(char, usize)> {
    input[index..].chars().next().map(|c| (c, c.len_utf8()))
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '@'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Consume chars while `pred` holds, returning the end index
fn take_while(input: &str, mut end: usize, pred: impl Fn(char) -> bool) -> usize {
    while let Some((c, size)) = next_char(input, end) {
        if !pred(c) {
            break;
        }
        end += size;
    }
    end
}

/// End index of a quoted literal starting at `start` (the opening quote)
fn quoted_end(input: &str, start: usize, quote: char, verbatim: bool) -> usize {
    let mut end = start + 1;
    while let Some((c, size)) = next_char(input, end) {
        end += size;
        if c == quote {
            // "" is an escaped quote inside verbatim strings
            if verbatim && next_char(input, end).map(|(n, _)| n) == Some(quote) {
                end += 1;
                continue;
            }
            break;
        }
        if c == '\\' && !verbatim {
            if let Some((_, escaped)) = next_char(input, end) {
                end += escaped;
            }
        }
        if c == '\n' && !verbatim {
            break;
        }
    }
    end
}

/// Lex `input` preserving all trivia
pub fn lex(input: &str) -> Vec<FixtureToken<'_>> {
    let mut tokens = Vec::new();
    let len = input.len();
    let mut i = 0usize;

    while let Some((current, size)) = next_char(input, i) {
        let start = i;
        let rest = &input[start..];

        let (kind, end) = match current {
            '\n' => (SyntaxKind::Newline, i + size),
            '\r' => {
                let end = if rest.starts_with("\r\n") { i + 2 } else { i + size };
                (SyntaxKind::Newline, end)
            }
            c if c.is_whitespace() => (
                SyntaxKind::Whitespace,
                take_while(input, i, |c| c.is_whitespace() && c != '\n' && c != '\r'),
            ),
            '/' if rest.starts_with("//") => {
                let end = take_while(input, i, |c| c != '\n' && c != '\r');
                let kind = if rest.starts_with("///") && !rest.starts_with("////") {
                    SyntaxKind::DocLineComment
                } else {
                    SyntaxKind::LineComment
                };
                (kind, end)
            }
            '/' if rest.starts_with("/*") => {
                let end = rest[2..].find("*/").map(|p| start + 2 + p + 2).unwrap_or(len);
                let kind = if rest.starts_with("/**") && !rest.starts_with("/**/") {
                    SyntaxKind::DocBlockComment
                } else {
                    SyntaxKind::BlockComment
                };
                (kind, end)
            }
            '"' => (SyntaxKind::StringLiteral, quoted_end(input, i, '"', false)),
            '\'' => (SyntaxKind::StringLiteral, quoted_end(input, i, '\'', false)),
            '@' if rest.starts_with("@\"") => (
                SyntaxKind::StringLiteral,
                quoted_end(input, i + 1, '"', true),
            ),
            c if is_ident_start(c) => {
                let end = take_while(input, i + size, is_ident_continue);
                let kind = SyntaxKind::from_keyword(&input[start..end]).unwrap_or(SyntaxKind::Ident);
                (kind, end)
            }
            c if c.is_ascii_digit() => (
                SyntaxKind::NumberLiteral,
                take_while(input, i, |c| c.is_ascii_alphanumeric() || c == '.' || c == '_'),
            ),
            '{' => (SyntaxKind::LBrace, i + 1),
            '}' => (SyntaxKind::RBrace, i + 1),
            '(' => (SyntaxKind::LParen, i + 1),
            ')' => (SyntaxKind::RParen, i + 1),
            '[' => (SyntaxKind::LBracket, i + 1),
            ']' => (SyntaxKind::RBracket, i + 1),
            ';' => (SyntaxKind::Semicolon, i + 1),
            ',' => (SyntaxKind::Comma, i + 1),
            '.' => (SyntaxKind::Dot, i + 1),
            ':' if !rest.starts_with("::") => (SyntaxKind::Colon, i + 1),
            '=' if rest.starts_with("=>") => (SyntaxKind::FatArrow, i + 2),
            '=' if !rest.starts_with("==") => (SyntaxKind::Equals, i + 1),
            '<' if !rest.starts_with("<=") && !rest.starts_with("<<") => (SyntaxKind::Lt, i + 1),
            '>' if !rest.starts_with(">=") => (SyntaxKind::Gt, i + 1),
            c if "+-*/%&|^!~?=<>:$".contains(c) => (
                SyntaxKind::Operator,
                take_while(input, i + size, |c| "+-*%&|^!~?=<>:$".contains(c)),
            ),
            _ => (SyntaxKind::Error, i + size),
        };

        tokens.push(FixtureToken {
            kind,
            text: &input[start..end],
        });
        i = end;
    }

    tokens
}
