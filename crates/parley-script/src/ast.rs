use std::fmt;

/// Source span as a byte range.
pub type Span = std::ops::Range<usize>;

/// An AST node with source location.
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    /// The wrapped node.
    pub node: T,
    /// Byte range of the node in the script text.
    pub span: Span,
}

/// A parsed effect script.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Script {
    /// Statements in execution order.
    pub statements: Vec<Spanned<Stmt>>,
}

/// One statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// `set <var> to <expr>`
    Set {
        /// Target variable.
        name: Spanned<String>,
        /// Assigned value.
        value: Expr,
    },
    /// `addtopic "<topic>"`
    AddTopic(String),
    /// `choice "<text>" <code> ["<text>" <code> ...]`
    Choice(Vec<(String, i32)>),
    /// `goodbye`
    Goodbye,
    /// `moddisposition <expr>`
    ModDisposition(Expr),
    /// `journal "<quest>" <index>`
    Journal {
        /// Quest id.
        id: String,
        /// New journal index.
        index: i64,
    },
    /// `if` / `elseif` / `else` / `endif`
    If {
        /// Condition and body of the `if` and every `elseif`, in order.
        branches: Vec<(Expr, Vec<Spanned<Stmt>>)>,
        /// Body of the `else`, empty when absent.
        otherwise: Vec<Spanned<Stmt>>,
    },
}

/// An expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Integer literal.
    Integer(i64),
    /// Float literal.
    Float(f64),
    /// A local or global variable reference.
    Var(Spanned<String>),
    /// Unary minus.
    Neg(Box<Expr>),
    /// Binary operation.
    Binary {
        /// Operator.
        op: BinOp,
        /// Left operand.
        lhs: Box<Expr>,
        /// Right operand.
        rhs: Box<Expr>,
    },
}

/// Binary operators. Comparisons evaluate to 1 or 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
            BinOp::Lt => "<",
            BinOp::Le => "<=",
            BinOp::Gt => ">",
            BinOp::Ge => ">=",
        };
        write!(f, "{s}")
    }
}
