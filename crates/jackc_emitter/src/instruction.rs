//! VM instruction model.

use jackc_ast::types::SymbolKind;
use std::fmt;

/// A virtual memory segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Segment {
    Constant,
    Argument,
    Local,
    Static,
    This,
    That,
    Pointer,
    Temp,
}

impl Segment {
    pub fn as_str(self) -> &'static str {
        match self {
            Segment::Constant => "constant",
            Segment::Argument => "argument",
            Segment::Local => "local",
            Segment::Static => "static",
            Segment::This => "this",
            Segment::That => "that",
            Segment::Pointer => "pointer",
            Segment::Temp => "temp",
        }
    }
}

/// Where a variable of each storage class lives.
impl From<SymbolKind> for Segment {
    fn from(kind: SymbolKind) -> Self {
        match kind {
            SymbolKind::Static => Segment::Static,
            SymbolKind::Field => Segment::This,
            SymbolKind::Argument => Segment::Argument,
            SymbolKind::Local => Segment::Local,
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Zero-operand stack operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArithmeticOp {
    Add,
    Sub,
    Neg,
    Eq,
    Gt,
    Lt,
    And,
    Or,
    Not,
}

impl ArithmeticOp {
    pub fn as_str(self) -> &'static str {
        match self {
            ArithmeticOp::Add => "add",
            ArithmeticOp::Sub => "sub",
            ArithmeticOp::Neg => "neg",
            ArithmeticOp::Eq => "eq",
            ArithmeticOp::Gt => "gt",
            ArithmeticOp::Lt => "lt",
            ArithmeticOp::And => "and",
            ArithmeticOp::Or => "or",
            ArithmeticOp::Not => "not",
        }
    }
}

/// One line of VM output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VmInstruction {
    Push { segment: Segment, index: u16 },
    Pop { segment: Segment, index: u16 },
    Arithmetic(ArithmeticOp),
    Label(String),
    Goto(String),
    IfGoto(String),
    Function { name: String, n_locals: u16 },
    Call { name: String, n_args: u16 },
    Return,
    /// A `//` line ignored by the VM.
    Comment(String),
}

impl VmInstruction {
    pub fn push(segment: Segment, index: u16) -> Self {
        VmInstruction::Push { segment, index }
    }

    pub fn pop(segment: Segment, index: u16) -> Self {
        VmInstruction::Pop { segment, index }
    }

    pub fn call(name: impl Into<String>, n_args: u16) -> Self {
        VmInstruction::Call {
            name: name.into(),
            n_args,
        }
    }

    /// Net change in stack depth, for instructions with a fixed effect.
    /// Calls and returns depend on the callee and yield `None`.
    pub fn stack_effect(&self) -> Option<i32> {
        match self {
            VmInstruction::Push { .. } => Some(1),
            VmInstruction::Pop { .. } => Some(-1),
            VmInstruction::Arithmetic(ArithmeticOp::Neg | ArithmeticOp::Not) => Some(0),
            VmInstruction::Arithmetic(_) => Some(-1),
            VmInstruction::IfGoto(_) => Some(-1),
            VmInstruction::Label(_)
            | VmInstruction::Goto(_)
            | VmInstruction::Function { .. }
            | VmInstruction::Comment(_) => Some(0),
            VmInstruction::Call { .. } | VmInstruction::Return => None,
        }
    }
}

impl fmt::Display for VmInstruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VmInstruction::Push { segment, index } => write!(f, "push {segment} {index}"),
            VmInstruction::Pop { segment, index } => write!(f, "pop {segment} {index}"),
            VmInstruction::Arithmetic(op) => f.write_str(op.as_str()),
            VmInstruction::Label(label) => write!(f, "label {label}"),
            VmInstruction::Goto(label) => write!(f, "goto {label}"),
            VmInstruction::IfGoto(label) => write!(f, "if-goto {label}"),
            VmInstruction::Function { name, n_locals } => write!(f, "function {name} {n_locals}"),
            VmInstruction::Call { name, n_args } => write!(f, "call {name} {n_args}"),
            VmInstruction::Return => f.write_str("return"),
            VmInstruction::Comment(text) => write!(f, "// {text}"),
        }
    }
}
