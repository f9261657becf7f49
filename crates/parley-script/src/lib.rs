//! Effect scripts attached to dialogue responses.
//!
//! Source text is lexed with logos, parsed with chumsky, lowered to bytecode
//! against a [`CompileScope`] and run by a small stack interpreter that talks
//! to the outside world only through [`ExecutionContext`].

/// Syntax tree produced by the parser.
pub mod ast;
/// Name resolution and lowering to bytecode.
pub mod compiler;
/// Compile errors and their ariadne rendering.
pub mod diagnostics;
/// Tokenizer.
pub mod lexer;
/// Script grammar.
pub mod parser;
/// Bytecode interpreter.
pub mod vm;

pub use compiler::{CompileScope, Op, Program};
pub use diagnostics::{Diagnostic, render_diagnostics};
pub use vm::{ExecutionContext, RuntimeError, run};

/// Lex, parse and compile script source in one step.
///
/// Lexer and parser errors are reported together; compilation only runs on
/// a clean parse.
pub fn compile_source(source: &str, scope: &CompileScope<'_>) -> Result<Program, Vec<Diagnostic>> {
    let (tokens, lex_errors) = lexer::lex(source);
    let mut diagnostics: Vec<Diagnostic> = lex_errors.into_iter().map(Diagnostic::from).collect();

    match parser::parse(&tokens) {
        Ok(script) if diagnostics.is_empty() => compiler::compile(&script, scope),
        Ok(_) => Err(diagnostics),
        Err(parse_errors) => {
            diagnostics.extend(parse_errors.into_iter().map(Diagnostic::from));
            Err(diagnostics)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_core::{Locals, VarKind};

    #[test]
    fn compile_source_snapshot() {
        let locals = Locals::new().with("count", VarKind::Short);
        let scope = CompileScope::new().with_locals(&locals);
        let program = compile_source("set count to 2", &scope).unwrap();
        insta::assert_debug_snapshot!(program.ops(), @r"
        [
            Push(
                Integer(
                    2,
                ),
            ),
            StoreLocal(
                0,
            ),
        ]
        ");
    }

    #[test]
    fn lex_error_blocks_compilation() {
        let errors = compile_source("goodbye $", &CompileScope::new()).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("unexpected character"));
    }

    #[test]
    fn parse_error_is_a_diagnostic() {
        let errors = compile_source("set to", &CompileScope::new()).unwrap_err();
        assert!(!errors.is_empty());
        assert!(errors.iter().all(|d| d.to_string().starts_with("error: ")));
    }
}
