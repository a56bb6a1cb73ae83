//! Syntax tree node definitions.
//!
//! One compilation unit holds exactly one class. Every non-terminal owns its
//! children outright; the tree is built once by the parser and only read by
//! the emitter. Identifier usages carry the `Resolution` the parser computed
//! for them, so the emitter never has to consult a subroutine scope.

use crate::syntax_kind::SyntaxKind;
use crate::types::{Resolution, SymbolKind, TypeName};
use jackc_core::text::TextRange;

// ============================================================================
// Terminals
// ============================================================================

/// A declared name (class, subroutine, variable or parameter).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identifier {
    pub text: String,
    pub range: TextRange,
}

/// A usage of a name, annotated with what it resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameRef {
    pub name: String,
    pub range: TextRange,
    pub resolution: Resolution,
}

// ============================================================================
// Declarations
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Class {
    pub name: Identifier,
    pub var_decs: Vec<ClassVarDec>,
    pub subroutines: Vec<SubroutineDec>,
    pub range: TextRange,
}

/// `static` or `field`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassVarKind {
    Static,
    Field,
}

impl From<ClassVarKind> for SymbolKind {
    fn from(kind: ClassVarKind) -> Self {
        match kind {
            ClassVarKind::Static => SymbolKind::Static,
            ClassVarKind::Field => SymbolKind::Field,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassVarDec {
    pub kind: ClassVarKind,
    pub ty: TypeName,
    pub names: Vec<Identifier>,
    pub range: TextRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubroutineKind {
    Constructor,
    Function,
    Method,
}

impl SubroutineKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SubroutineKind::Constructor => "constructor",
            SubroutineKind::Function => "function",
            SubroutineKind::Method => "method",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReturnType {
    Void,
    Type(TypeName),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubroutineDec {
    pub kind: SubroutineKind,
    pub return_type: ReturnType,
    pub name: Identifier,
    pub parameters: Vec<Parameter>,
    pub body: SubroutineBody,
    pub range: TextRange,
}

impl SubroutineDec {
    /// Number of individually named locals across every `var` declaration.
    pub fn local_count(&self) -> usize {
        self.body.var_decs.iter().map(|dec| dec.names.len()).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub ty: TypeName,
    pub name: Identifier,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubroutineBody {
    pub var_decs: Vec<VarDec>,
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarDec {
    pub ty: TypeName,
    pub names: Vec<Identifier>,
    pub range: TextRange,
}

// ============================================================================
// Statements
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Let(LetStatement),
    If(IfStatement),
    While(WhileStatement),
    Do(DoStatement),
    Return(ReturnStatement),
}

impl Statement {
    pub fn kind(&self) -> SyntaxKind {
        match self {
            Statement::Let(_) => SyntaxKind::LetStatement,
            Statement::If(_) => SyntaxKind::IfStatement,
            Statement::While(_) => SyntaxKind::WhileStatement,
            Statement::Do(_) => SyntaxKind::DoStatement,
            Statement::Return(_) => SyntaxKind::ReturnStatement,
        }
    }

    pub fn range(&self) -> TextRange {
        match self {
            Statement::Let(n) => n.range,
            Statement::If(n) => n.range,
            Statement::While(n) => n.range,
            Statement::Do(n) => n.range,
            Statement::Return(n) => n.range,
        }
    }
}

/// `let target = value;` or `let target[index] = value;`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LetStatement {
    pub target: NameRef,
    pub index: Option<Expression>,
    pub value: Expression,
    pub range: TextRange,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IfStatement {
    pub condition: Expression,
    pub then_branch: Vec<Statement>,
    pub else_branch: Option<Vec<Statement>>,
    pub range: TextRange,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhileStatement {
    pub condition: Expression,
    pub body: Vec<Statement>,
    pub range: TextRange,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoStatement {
    pub call: SubroutineCall,
    pub range: TextRange,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnStatement {
    pub value: Option<Expression>,
    pub range: TextRange,
}

// ============================================================================
// Expressions
// ============================================================================

/// `term (op term)*`, kept flat: operators combine strictly left to right
/// in source order with no precedence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expression {
    pub head: Term,
    pub tail: Vec<(BinaryOp, Term)>,
    pub range: TextRange,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Term {
    IntegerConstant { value: u16, range: TextRange },
    StringConstant { value: String, range: TextRange },
    KeywordConstant { value: KeywordConstant, range: TextRange },
    Variable(NameRef),
    ArrayAccess { array: NameRef, index: Box<Expression> },
    Call(SubroutineCall),
    Parenthesized { inner: Box<Expression>, range: TextRange },
    Unary { op: UnaryOp, operand: Box<Term>, range: TextRange },
}

impl Term {
    pub fn range(&self) -> TextRange {
        match self {
            Term::IntegerConstant { range, .. }
            | Term::StringConstant { range, .. }
            | Term::KeywordConstant { range, .. }
            | Term::Parenthesized { range, .. }
            | Term::Unary { range, .. } => *range,
            Term::Variable(name) => name.range,
            Term::ArrayAccess { array, index } => array.range.cover(index.range),
            Term::Call(call) => call.range,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeywordConstant {
    True,
    False,
    Null,
    This,
}

/// `receiver.name(arguments)` or `name(arguments)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubroutineCall {
    pub receiver: Option<NameRef>,
    pub name: Identifier,
    pub arguments: Vec<Expression>,
    pub range: TextRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    And,
    Or,
    Lt,
    Gt,
    Eq,
}

impl BinaryOp {
    pub fn from_symbol(ch: char) -> Option<BinaryOp> {
        match ch {
            '+' => Some(BinaryOp::Add),
            '-' => Some(BinaryOp::Sub),
            '*' => Some(BinaryOp::Mul),
            '/' => Some(BinaryOp::Div),
            '%' => Some(BinaryOp::Mod),
            '&' => Some(BinaryOp::And),
            '|' => Some(BinaryOp::Or),
            '<' => Some(BinaryOp::Lt),
            '>' => Some(BinaryOp::Gt),
            '=' => Some(BinaryOp::Eq),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            BinaryOp::Add => '+',
            BinaryOp::Sub => '-',
            BinaryOp::Mul => '*',
            BinaryOp::Div => '/',
            BinaryOp::Mod => '%',
            BinaryOp::And => '&',
            BinaryOp::Or => '|',
            BinaryOp::Lt => '<',
            BinaryOp::Gt => '>',
            BinaryOp::Eq => '=',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Neg,
    Not,
}

impl UnaryOp {
    pub fn from_symbol(ch: char) -> Option<UnaryOp> {
        match ch {
            '-' => Some(UnaryOp::Neg),
            '~' => Some(UnaryOp::Not),
            _ => None,
        }
    }
}
