//! Tokenizer for fish source.
//!
//! Produces a flat token stream the structure parser consumes. Quoting,
//! comments, line continuations, and redirection operators are resolved
//! here; block keywords stay plain `Word` tokens and are recognized by the
//! parser in statement position only.

use fishls_common::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Word,
    SingleQuote,
    DoubleQuote,
    Comment,
    Redirect,
    Newline,
    Semi,
    Pipe,
    AndAnd,
    OrOr,
    Background,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    fn new(kind: TokenKind, start: usize, end: usize) -> Self {
        Token {
            kind,
            span: Span::new(start as u32, end as u32),
        }
    }
}

pub fn tokenize(source: &str) -> Vec<Token> {
    let bytes = source.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i];
        match c {
            b' ' | b'\t' | b'\r' => i += 1,
            // Line continuation: backslash-newline is whitespace.
            b'\\' if bytes.get(i + 1) == Some(&b'\n') => i += 2,
            b'\n' => {
                tokens.push(Token::new(TokenKind::Newline, i, i + 1));
                i += 1;
            }
            b';' => {
                tokens.push(Token::new(TokenKind::Semi, i, i + 1));
                i += 1;
            }
            b'|' if bytes.get(i + 1) == Some(&b'|') => {
                tokens.push(Token::new(TokenKind::OrOr, i, i + 2));
                i += 2;
            }
            b'|' => {
                tokens.push(Token::new(TokenKind::Pipe, i, i + 1));
                i += 1;
            }
            b'&' if bytes.get(i + 1) == Some(&b'&') => {
                tokens.push(Token::new(TokenKind::AndAnd, i, i + 2));
                i += 2;
            }
            b'&' => {
                tokens.push(Token::new(TokenKind::Background, i, i + 1));
                i += 1;
            }
            b'#' => {
                let start = i;
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += 1;
                }
                tokens.push(Token::new(TokenKind::Comment, start, i));
            }
            b'\'' => {
                let start = i;
                i += 1;
                while i < bytes.len() && bytes[i] != b'\'' {
                    if bytes[i] == b'\\' && i + 1 < bytes.len() {
                        i += 1;
                    }
                    i += 1;
                }
                // Unterminated strings run to end of input.
                if i < bytes.len() {
                    i += 1;
                }
                tokens.push(Token::new(TokenKind::SingleQuote, start, i));
            }
            b'"' => {
                let start = i;
                i += 1;
                while i < bytes.len() && bytes[i] != b'"' {
                    if bytes[i] == b'\\' && i + 1 < bytes.len() {
                        i += 1;
                    }
                    i += 1;
                }
                if i < bytes.len() {
                    i += 1;
                }
                tokens.push(Token::new(TokenKind::DoubleQuote, start, i));
            }
            b'<' | b'>' => {
                let start = i;
                i = scan_redirect(bytes, i);
                tokens.push(Token::new(TokenKind::Redirect, start, i));
            }
            _ => {
                let start = i;
                // `2>`, `2>>` style redirects: digits directly followed by
                // a redirect operator.
                let mut j = i;
                while j < bytes.len() && bytes[j].is_ascii_digit() {
                    j += 1;
                }
                if j > i && j < bytes.len() && (bytes[j] == b'>' || bytes[j] == b'<') {
                    i = scan_redirect(bytes, j);
                    tokens.push(Token::new(TokenKind::Redirect, start, i));
                    continue;
                }
                while i < bytes.len() && !is_word_terminator(bytes[i]) {
                    if bytes[i] == b'\\' && i + 1 < bytes.len() {
                        i += 2;
                        continue;
                    }
                    i += 1;
                }
                tokens.push(Token::new(TokenKind::Word, start, i));
            }
        }
    }
    tokens
}

/// Consume a redirect operator plus its immediate target word, e.g.
/// `>file`, `>> out.log` keeps the operator only (target lexes separately
/// when whitespace intervenes).
fn scan_redirect(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && (bytes[i] == b'>' || bytes[i] == b'<' || bytes[i] == b'?') {
        i += 1;
    }
    // `&1` style fd targets are part of the operator.
    if bytes.get(i) == Some(&b'&') {
        i += 1;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
    }
    i
}

fn is_word_terminator(c: u8) -> bool {
    matches!(
        c,
        b' ' | b'\t' | b'\r' | b'\n' | b';' | b'|' | b'&' | b'\'' | b'"' | b'<' | b'>'
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn words_and_separators() {
        assert_eq!(
            kinds("set -l x 1; echo $x"),
            vec![
                TokenKind::Word,
                TokenKind::Word,
                TokenKind::Word,
                TokenKind::Word,
                TokenKind::Semi,
                TokenKind::Word,
                TokenKind::Word,
            ]
        );
    }

    #[test]
    fn comments_run_to_end_of_line() {
        assert_eq!(
            kinds("echo hi # trailing\nset x"),
            vec![
                TokenKind::Word,
                TokenKind::Word,
                TokenKind::Comment,
                TokenKind::Newline,
                TokenKind::Word,
                TokenKind::Word,
            ]
        );
    }

    #[test]
    fn fd_redirects_are_single_tokens() {
        assert_eq!(
            kinds("cmd 2>&1 >out"),
            vec![
                TokenKind::Word,
                TokenKind::Redirect,
                TokenKind::Redirect,
                TokenKind::Word
            ]
        );
    }

    #[test]
    fn unterminated_string_reaches_eof() {
        let tokens = tokenize("echo 'oops");
        assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::SingleQuote));
        assert_eq!(tokens.last().map(|t| t.span.end), Some(10));
    }
}
