//! AST node definitions.
//!
//! Two sorts of nodes: expressions and statements, each a closed tagged
//! sum. Every operator- or name-bearing node retains the originating
//! token so the evaluator can report diagnostics with line numbers.
//!
//! Function and class declarations sit behind `Rc` so closures and class
//! objects created at runtime can share them without cloning bodies.

use std::fmt;
use std::rc::Rc;

use ember_lex::Token;

/// A literal value pre-parsed by the parser.
#[derive(Clone, Debug, PartialEq)]
pub enum Lit {
    Null,
    Bool(bool),
    Number(f64),
    Str(String),
}

/// Expression node.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// Prefix operator application: `-x`, `!x`
    Unary(UnaryExpr),

    /// Arithmetic, comparison, and equality operators. Compound
    /// assignments desugar into this node with the `+=`/`-=` operator
    /// token preserved.
    Binary(BinaryExpr),

    /// Short-circuiting `and` / `or`
    Logical(LogicalExpr),

    /// Ternary `cond ? a : b`
    Conditional(ConditionalExpr),

    /// Pre-parsed literal plus its originating token
    Literal(LiteralExpr),

    /// Parenthesized expression
    Grouping(Box<Expr>),

    /// Variable reference; the token is the name
    Variable(Token),

    /// Assignment to a variable
    Assign(AssignExpr),

    /// Call with the `(` token retained for error reporting
    Call(CallExpr),

    /// Attribute read: `object.name`
    GetAttr(GetAttrExpr),

    /// Attribute write: `object.name = value`
    SetAttr(SetAttrExpr),

    /// The `self` keyword inside a method
    SelfRef(Token),

    /// `super.attr`
    Super(SuperExpr),
}

#[derive(Clone, Debug, PartialEq)]
pub struct UnaryExpr {
    pub op: Token,
    pub operand: Box<Expr>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BinaryExpr {
    pub left: Box<Expr>,
    pub op: Token,
    pub right: Box<Expr>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LogicalExpr {
    pub left: Box<Expr>,
    pub op: Token,
    pub right: Box<Expr>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ConditionalExpr {
    pub cond: Box<Expr>,
    pub then_branch: Box<Expr>,
    pub else_branch: Box<Expr>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LiteralExpr {
    pub token: Token,
    pub value: Lit,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AssignExpr {
    pub name: Token,
    pub value: Box<Expr>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CallExpr {
    pub callee: Box<Expr>,
    pub paren: Token,
    pub args: Vec<Expr>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GetAttrExpr {
    pub object: Box<Expr>,
    pub name: Token,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SetAttrExpr {
    pub object: Box<Expr>,
    pub name: Token,
    pub value: Box<Expr>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SuperExpr {
    pub super_token: Token,
    pub attr: Token,
}

/// Statement node.
#[derive(Clone, Debug, PartialEq)]
pub enum Stmt {
    /// Expression evaluated for its side effects
    Expr(Expr),

    /// `var name (= initializer)? ;`
    VarDecl(VarDecl),

    /// `{ ... }` with its own scope
    Block(Block),

    /// `echo e1, e2, ...;`
    Echo(EchoStmt),

    /// `if cond { ... } (else ...)?`
    If(IfStmt),

    /// `while cond { ... }`
    While(WhileStmt),

    /// `for init; cond; incr { ... }`
    For(ForStmt),

    /// `break;` (token retained for diagnostics)
    Break(Token),

    /// `continue;` (token retained for diagnostics)
    Continue(Token),

    /// `return value?;`
    Return(ReturnStmt),

    /// `def name(params) { ... }`
    Function(Rc<FunctionDecl>),

    /// `class Name (< Super)? { fields and methods }`
    Class(Rc<ClassDecl>),
}

#[derive(Clone, Debug, PartialEq)]
pub struct VarDecl {
    pub name: Token,
    pub initializer: Option<Expr>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Block {
    pub statements: Vec<Stmt>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EchoStmt {
    pub exprs: Vec<Expr>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct IfStmt {
    pub cond: Expr,
    pub then_block: Block,
    /// Either a nested `If` (else-if chain) or a `Block`.
    pub else_stmt: Option<Box<Stmt>>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct WhileStmt {
    pub cond: Expr,
    pub body: Block,
}

/// A `for` loop is kept as a distinct node rather than desugared into
/// `while`: `continue` must still run the increment expression before the
/// next condition check.
#[derive(Clone, Debug, PartialEq)]
pub struct ForStmt {
    pub initializer: Option<Box<Stmt>>,
    /// An omitted condition is filled in with a synthesized `true`
    /// literal by the parser.
    pub cond: Expr,
    pub increment: Option<Expr>,
    pub body: Block,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ReturnStmt {
    pub keyword: Token,
    pub value: Option<Expr>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FunctionDecl {
    pub name: Token,
    pub params: Vec<Token>,
    pub body: Block,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ClassDecl {
    pub name: Token,
    /// Superclass name token; the evaluator resolves it like a variable.
    pub superclass: Option<Token>,
    pub methods: Vec<Rc<FunctionDecl>>,
    pub fields: Vec<VarDecl>,
}

impl fmt::Display for Lit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lit::Null => f.write_str("null"),
            Lit::Bool(b) => write!(f, "{b}"),
            Lit::Number(n) => write!(f, "{n}"),
            Lit::Str(s) => write!(f, "'{s}'"),
        }
    }
}

/// Parenthesized pretty form, used by the `debug_expr` subcommand.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Unary(e) => write!(f, "({} {})", e.op.lexeme, e.operand),
            Expr::Binary(e) => write!(f, "({} {} {})", e.op.lexeme, e.left, e.right),
            Expr::Logical(e) => write!(f, "({} {} {})", e.op.lexeme, e.left, e.right),
            Expr::Conditional(e) => {
                write!(f, "(? {} {} {})", e.cond, e.then_branch, e.else_branch)
            }
            Expr::Literal(e) => write!(f, "{}", e.value),
            Expr::Grouping(inner) => write!(f, "(GROUP {inner})"),
            Expr::Variable(name) => f.write_str(&name.lexeme),
            Expr::Assign(e) => write!(f, "(= {} {})", e.name.lexeme, e.value),
            Expr::Call(e) => write!(f, "(CALL {})", e.callee),
            Expr::GetAttr(e) => write!(f, "(GET {} {})", e.object, e.name.lexeme),
            Expr::SetAttr(e) => {
                write!(f, "(SET {} {} {})", e.object, e.name.lexeme, e.value)
            }
            Expr::SelfRef(_) => f.write_str("self"),
            Expr::Super(e) => write!(f, "(SUPER {})", e.attr.lexeme),
        }
    }
}
