use logos::Logos;
use std::fmt;

/// Token type for the effect-script language.
///
/// Words are lower-cased while lexing: keywords and variable names are
/// case-insensitive. String literals keep their casing.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `,` (optional separator between choice pairs).
    Comma,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `==`
    EqEq,
    /// `!=`
    NotEq,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// Newline character (statement separator).
    Newline,
    /// Double-quoted string literal.
    Str(String),
    /// Integer literal.
    Integer(i64),
    /// Floating-point literal.
    Float(f64),
    /// Keyword or variable name, lower-cased.
    Word(String),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::Comma => write!(f, ","),
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
            Token::Star => write!(f, "*"),
            Token::Slash => write!(f, "/"),
            Token::EqEq => write!(f, "=="),
            Token::NotEq => write!(f, "!="),
            Token::Lt => write!(f, "<"),
            Token::Le => write!(f, "<="),
            Token::Gt => write!(f, ">"),
            Token::Ge => write!(f, ">="),
            Token::Newline => write!(f, "newline"),
            Token::Str(s) => write!(f, "\"{s}\""),
            Token::Integer(n) => write!(f, "{n}"),
            Token::Float(x) => write!(f, "{x}"),
            Token::Word(w) => write!(f, "{w}"),
        }
    }
}

#[derive(Logos, Debug)]
#[logos(skip r"[ \t\r]+")]
#[logos(skip r";[^\n]*")]
enum RawToken {
    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token(",")]
    Comma,

    #[token("+")]
    Plus,

    #[token("-")]
    Minus,

    #[token("*")]
    Star,

    #[token("/")]
    Slash,

    #[token("==")]
    EqEq,

    #[token("!=")]
    NotEq,

    #[token("<")]
    Lt,

    #[token("<=")]
    Le,

    #[token(">")]
    Gt,

    #[token(">=")]
    Ge,

    #[token("\n")]
    Newline,

    #[regex(r#""[^"\n]*""#)]
    Str,

    #[regex(r"[0-9]+\.[0-9]+")]
    Float,

    #[regex(r"[0-9]+")]
    Integer,

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Word,
}

/// A lexer error with source location.
#[derive(Debug, Clone)]
pub struct LexError {
    /// Byte range of the offending input.
    pub span: std::ops::Range<usize>,
    /// Human-readable description.
    pub message: String,
}

/// Lex script source into `(Token, Span)` pairs plus any lexer errors.
pub fn lex(source: &str) -> (Vec<(Token, std::ops::Range<usize>)>, Vec<LexError>) {
    let mut tokens = Vec::new();
    let mut errors = Vec::new();
    let mut lexer = RawToken::lexer(source);

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let token = match result {
            Ok(RawToken::LParen) => Token::LParen,
            Ok(RawToken::RParen) => Token::RParen,
            Ok(RawToken::Comma) => Token::Comma,
            Ok(RawToken::Plus) => Token::Plus,
            Ok(RawToken::Minus) => Token::Minus,
            Ok(RawToken::Star) => Token::Star,
            Ok(RawToken::Slash) => Token::Slash,
            Ok(RawToken::EqEq) => Token::EqEq,
            Ok(RawToken::NotEq) => Token::NotEq,
            Ok(RawToken::Lt) => Token::Lt,
            Ok(RawToken::Le) => Token::Le,
            Ok(RawToken::Gt) => Token::Gt,
            Ok(RawToken::Ge) => Token::Ge,
            Ok(RawToken::Newline) => Token::Newline,
            Ok(RawToken::Str) => {
                let slice = lexer.slice();
                Token::Str(slice[1..slice.len() - 1].to_string())
            }
            Ok(RawToken::Float) => match lexer.slice().parse::<f64>() {
                Ok(x) => Token::Float(x),
                Err(_) => {
                    errors.push(LexError {
                        span: span.clone(),
                        message: format!("invalid float literal: {}", lexer.slice()),
                    });
                    continue;
                }
            },
            Ok(RawToken::Integer) => match lexer.slice().parse::<i64>() {
                Ok(n) => Token::Integer(n),
                Err(_) => {
                    errors.push(LexError {
                        span: span.clone(),
                        message: format!("integer literal out of range: {}", lexer.slice()),
                    });
                    continue;
                }
            },
            Ok(RawToken::Word) => Token::Word(lexer.slice().to_lowercase()),
            Err(()) => {
                errors.push(LexError {
                    span: span.clone(),
                    message: format!("unexpected character: {:?}", &source[span.clone()]),
                });
                continue;
            }
        };
        tokens.push((token, span));
    }

    (tokens, errors)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<String> {
        let (tokens, errors) = lex(source);
        assert!(errors.is_empty(), "errors: {errors:?}");
        tokens.iter().map(|(t, _)| t.to_string()).collect()
    }

    #[test]
    fn lex_set_statement() {
        assert_eq!(
            kinds("Set PaidToll to PaidToll + 1"),
            vec!["set", "paidtoll", "to", "paidtoll", "+", "1"]
        );
    }

    #[test]
    fn lex_choice_keeps_string_case() {
        let (tokens, _) = lex(r#"Choice "Yes, I will" 1, "No" 2"#);
        assert!(matches!(&tokens[1].0, Token::Str(s) if s == "Yes, I will"));
        assert_eq!(tokens[3].0, Token::Comma);
    }

    #[test]
    fn lex_comparison_operators() {
        assert_eq!(kinds("<= >= == != < >"), vec!["<=", ">=", "==", "!=", "<", ">"]);
    }

    #[test]
    fn comments_are_skipped() {
        assert_eq!(kinds("; pay the toll\ngoodbye"), vec!["newline", "goodbye"]);
    }

    #[test]
    fn lex_float() {
        let (tokens, errors) = lex("0.25");
        assert!(errors.is_empty());
        assert!(matches!(tokens[0].0, Token::Float(x) if (x - 0.25).abs() < f64::EPSILON));
    }

    #[test]
    fn unexpected_character_is_reported() {
        let (tokens, errors) = lex("set x to 1 @");
        assert_eq!(tokens.len(), 4);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].span, 11..12);
    }

    #[test]
    fn integer_overflow_is_reported() {
        let (_, errors) = lex("99999999999999999999");
        assert!(errors[0].message.contains("out of range"));
    }
}
