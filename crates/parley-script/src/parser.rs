use chumsky::input::{Stream, ValueInput};
use chumsky::prelude::*;

use crate::ast::*;
use crate::lexer::Token;

type ChumskySpan = SimpleSpan;

/// Parse error with source span.
#[derive(Debug, Clone)]
pub struct ParseError {
    /// Byte range of the offending input.
    pub span: std::ops::Range<usize>,
    /// Human-readable description.
    pub message: String,
}

fn spanned<T>(node: T, span: ChumskySpan) -> Spanned<T> {
    Spanned {
        node,
        span: span.into_range(),
    }
}

const KEYWORDS: &[&str] = &[
    "set",
    "to",
    "addtopic",
    "choice",
    "goodbye",
    "moddisposition",
    "journal",
    "if",
    "elseif",
    "else",
    "endif",
];

fn is_keyword(w: &str) -> bool {
    KEYWORDS.contains(&w)
}

fn binary(lhs: Expr, (op, rhs): (BinOp, Expr)) -> Expr {
    Expr::Binary {
        op,
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
    }
}

/// Build the script parser.
///
/// Sub-parsers are defined inline so chumsky can infer the generic input type.
fn script_parser<'a, I>() -> impl Parser<'a, I, Script, extra::Err<Rich<'a, Token>>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = ChumskySpan>,
{
    let kw = |k: &'static str| select! { Token::Word(ref w) if w.as_str() == k => () }.labelled(k);
    let ident = select! { Token::Word(w) if !is_keyword(&w) => w }.labelled("variable name");
    let string_lit = select! { Token::Str(s) => s }.labelled("string");
    let integer = select! { Token::Integer(n) => n }.labelled("integer");
    let signed_int = just(Token::Minus)
        .or_not()
        .then(integer)
        .map(|(neg, n)| if neg.is_some() { -n } else { n });

    let nl = just(Token::Newline).repeated().to(());
    let nl1 = just(Token::Newline).repeated().at_least(1).to(());

    // -- Expressions, loosest binding last --
    let expr = recursive(|expr| {
        let atom = choice((
            select! { Token::Integer(n) => Expr::Integer(n) },
            select! { Token::Float(x) => Expr::Float(x) },
            ident
                .clone()
                .map_with(|name, e| Expr::Var(spanned(name, e.span()))),
            expr.delimited_by(just(Token::LParen), just(Token::RParen)),
        ))
        .labelled("expression");

        let unary = just(Token::Minus)
            .or_not()
            .then(atom)
            .map(|(neg, e)| if neg.is_some() { Expr::Neg(Box::new(e)) } else { e });

        let product = unary.clone().foldl(
            choice((
                just(Token::Star).to(BinOp::Mul),
                just(Token::Slash).to(BinOp::Div),
            ))
            .then(unary)
            .repeated(),
            binary,
        );

        let sum = product.clone().foldl(
            choice((
                just(Token::Plus).to(BinOp::Add),
                just(Token::Minus).to(BinOp::Sub),
            ))
            .then(product)
            .repeated(),
            binary,
        );

        let comparison_op = choice((
            just(Token::EqEq).to(BinOp::Eq),
            just(Token::NotEq).to(BinOp::Ne),
            just(Token::Le).to(BinOp::Le),
            just(Token::Ge).to(BinOp::Ge),
            just(Token::Lt).to(BinOp::Lt),
            just(Token::Gt).to(BinOp::Gt),
        ));

        sum.clone()
            .then(comparison_op.then(sum).or_not())
            .map(|(lhs, rest)| match rest {
                Some(rest) => binary(lhs, rest),
                None => lhs,
            })
    });

    // -- Statements --
    let block_sep = nl1.clone();
    let statement = recursive(|stmt| {
        let block = stmt
            .separated_by(block_sep.clone())
            .allow_trailing()
            .collect::<Vec<Spanned<Stmt>>>();

        let set_stmt = kw("set")
            .ignore_then(ident.map_with(|name, e| spanned(name, e.span())))
            .then_ignore(kw("to"))
            .then(expr.clone())
            .map(|(name, value)| Stmt::Set { name, value })
            .labelled("set statement");

        let choice_code = signed_int.clone().try_map(|n, span| {
            i32::try_from(n).map_err(|_| Rich::custom(span, "choice code out of range"))
        });
        let choice_stmt = kw("choice")
            .ignore_then(
                string_lit
                    .clone()
                    .then(choice_code)
                    .then_ignore(just(Token::Comma).or_not())
                    .repeated()
                    .at_least(1)
                    .collect::<Vec<(String, i32)>>(),
            )
            .map(Stmt::Choice)
            .labelled("choice statement");

        let add_topic = kw("addtopic").ignore_then(string_lit.clone()).map(Stmt::AddTopic);
        let goodbye = kw("goodbye").to(Stmt::Goodbye);
        let mod_disposition = kw("moddisposition")
            .ignore_then(expr.clone())
            .map(Stmt::ModDisposition);
        let journal = kw("journal")
            .ignore_then(string_lit)
            .then(signed_int)
            .map(|(id, index)| Stmt::Journal { id, index });

        let if_stmt = kw("if")
            .ignore_then(expr.clone())
            .then_ignore(block_sep.clone())
            .then(block.clone())
            .then(
                kw("elseif")
                    .ignore_then(expr.clone())
                    .then_ignore(block_sep.clone())
                    .then(block.clone())
                    .repeated()
                    .collect::<Vec<_>>(),
            )
            .then(
                kw("else")
                    .ignore_then(block_sep.clone())
                    .ignore_then(block)
                    .or_not(),
            )
            .then_ignore(kw("endif"))
            .map(|(((cond, body), elseifs), otherwise)| {
                let mut branches = vec![(cond, body)];
                branches.extend(elseifs);
                Stmt::If {
                    branches,
                    otherwise: otherwise.unwrap_or_default(),
                }
            })
            .labelled("if statement");

        choice((
            set_stmt,
            add_topic,
            choice_stmt,
            goodbye,
            mod_disposition,
            journal,
            if_stmt,
        ))
        .map_with(|s, e| spanned(s, e.span()))
    });

    statement
        .separated_by(nl1)
        .allow_trailing()
        .collect::<Vec<_>>()
        .padded_by(nl)
        .then_ignore(end())
        .map(|statements| Script { statements })
}

/// Parse a token stream into a script AST.
pub fn parse(tokens: &[(Token, std::ops::Range<usize>)]) -> Result<Script, Vec<ParseError>> {
    let token_iter = tokens
        .iter()
        .map(|(tok, span)| (tok.clone(), ChumskySpan::from(span.clone())));

    let len = tokens.last().map_or(0, |(_, s)| s.end);
    let eoi: ChumskySpan = (len..len).into();
    let stream = Stream::from_iter(token_iter).map(eoi, |(t, s): (_, _)| (t, s));

    let (output, errors) = script_parser().parse(stream).into_output_errors();

    match output {
        Some(script) if errors.is_empty() => Ok(script),
        _ => Err(errors
            .into_iter()
            .map(|e| ParseError {
                span: e.span().into_range(),
                message: e.to_string(),
            })
            .collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer;

    fn parse_source(source: &str) -> Result<Script, Vec<ParseError>> {
        let (tokens, errors) = lexer::lex(source);
        assert!(errors.is_empty(), "lex errors: {errors:?}");
        parse(&tokens)
    }

    fn statements(source: &str) -> Vec<Stmt> {
        parse_source(source)
            .unwrap()
            .statements
            .into_iter()
            .map(|s| s.node)
            .collect()
    }

    #[test]
    fn empty_script() {
        assert!(statements("").is_empty());
        assert!(statements("\n\n; nothing here\n").is_empty());
    }

    #[test]
    fn parse_simple_statements() {
        let stmts = statements("addtopic \"Latest Rumors\"\nGoodbye\njournal \"MG_Join\" 10");
        assert_eq!(
            stmts,
            vec![
                Stmt::AddTopic("Latest Rumors".to_string()),
                Stmt::Goodbye,
                Stmt::Journal {
                    id: "MG_Join".to_string(),
                    index: 10,
                },
            ]
        );
    }

    #[test]
    fn parse_choice_pairs_with_and_without_commas() {
        let stmts = statements(r#"Choice "Yes" 1, "No" 2 "Maybe later" -1"#);
        assert_eq!(
            stmts,
            vec![Stmt::Choice(vec![
                ("Yes".to_string(), 1),
                ("No".to_string(), 2),
                ("Maybe later".to_string(), -1),
            ])]
        );
    }

    #[test]
    fn choice_needs_at_least_one_pair() {
        assert!(parse_source("choice").is_err());
    }

    #[test]
    fn arithmetic_precedence() {
        let stmts = statements("set x to 1 + 2 * 3");
        let Stmt::Set { name, value } = &stmts[0] else {
            panic!("expected set, got {stmts:?}");
        };
        assert_eq!(name.node, "x");
        assert_eq!(name.span, 4..5);
        assert_eq!(
            *value,
            Expr::Binary {
                op: BinOp::Add,
                lhs: Box::new(Expr::Integer(1)),
                rhs: Box::new(Expr::Binary {
                    op: BinOp::Mul,
                    lhs: Box::new(Expr::Integer(2)),
                    rhs: Box::new(Expr::Integer(3)),
                }),
            }
        );
    }

    #[test]
    fn subtraction_is_left_associative() {
        let stmts = statements("moddisposition 10 - 3 - 2");
        let Stmt::ModDisposition(Expr::Binary { op, lhs, rhs }) = &stmts[0] else {
            panic!("expected moddisposition, got {stmts:?}");
        };
        assert_eq!(*op, BinOp::Sub);
        assert_eq!(**rhs, Expr::Integer(2));
        assert!(matches!(**lhs, Expr::Binary { op: BinOp::Sub, .. }));
    }

    #[test]
    fn unary_minus_and_parentheses() {
        let stmts = statements("moddisposition -(5 + 5)");
        assert!(matches!(&stmts[0], Stmt::ModDisposition(Expr::Neg(_))));
    }

    #[test]
    fn parse_if_chain() {
        let source = "\
if PCRank >= 3
    addtopic \"promotion\"
elseif PCRank == 2
    moddisposition 5
else
    goodbye
endif
";
        let stmts = statements(source);
        assert_eq!(stmts.len(), 1);
        let Stmt::If { branches, otherwise } = &stmts[0] else {
            panic!("expected if, got {stmts:?}");
        };
        assert_eq!(branches.len(), 2);
        assert_eq!(branches[0].1.len(), 1);
        assert_eq!(otherwise.len(), 1);
        assert_eq!(otherwise[0].node, Stmt::Goodbye);
    }

    #[test]
    fn nested_if_with_empty_body() {
        let source = "if 1\n if 0\n endif\nendif";
        let stmts = statements(source);
        let Stmt::If { branches, .. } = &stmts[0] else {
            panic!("expected if");
        };
        assert!(matches!(branches[0].1[0].node, Stmt::If { .. }));
    }

    #[test]
    fn keyword_is_not_a_variable() {
        assert!(parse_source("set goodbye to 1").is_err());
    }

    #[test]
    fn unknown_command_is_an_error() {
        let errors = parse_source("messagebox \"hello\"").unwrap_err();
        assert!(!errors.is_empty());
        assert_eq!(errors[0].span.start, 0);
    }

    #[test]
    fn missing_endif_is_an_error() {
        assert!(parse_source("if 1\n goodbye\n").is_err());
    }
}
