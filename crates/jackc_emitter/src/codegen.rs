//! The code generator.
//!
//! One emission method per grammar production. Operands come from the
//! resolutions the parser attached to every name usage; only the class
//! scope is consulted directly (for the constructor's field count).

use crate::instruction::{ArithmeticOp, Segment, VmInstruction};
use crate::labels::{LabelContext, LabelKind};
use jackc_ast::node::*;
use jackc_ast::types::{Resolution, SymbolEntry, SymbolKind, TypeName};
use jackc_binder::SymbolTable;
use jackc_core::text::TextRange;
use jackc_diagnostics::{CodeGenAssertionError, CompileError, UnresolvedOperatorError};
use jackc_options::{CompilerOptions, TrueEncoding};
use tracing::trace;

type EmitResult<T = ()> = Result<T, CompileError>;

const MEMORY_ALLOC: &str = "Memory.alloc";
const MATH_MULTIPLY: &str = "Math.multiply";
const MATH_DIVIDE: &str = "Math.divide";
const STRING_NEW: &str = "String.new";
const STRING_APPEND_CHAR: &str = "String.appendChar";

/// Lower one parsed class to VM instructions.
///
/// `source` is the unit text the tree was parsed from; it is only read when
/// statement annotations are enabled.
pub fn generate(
    class: &Class,
    class_scope: &SymbolTable,
    source: &str,
    options: &CompilerOptions,
) -> Result<Vec<VmInstruction>, CompileError> {
    let mut cg = CodeGen {
        class_name: &class.name.text,
        field_count: class_scope.count_of(SymbolKind::Field),
        options,
        source,
        labels: LabelContext::new(),
        out: Vec::new(),
        subroutine_kind: SubroutineKind::Function,
    };
    for subroutine in &class.subroutines {
        cg.emit_subroutine(subroutine)?;
    }
    Ok(cg.out)
}

/// Generation state for one unit.
struct CodeGen<'a> {
    class_name: &'a str,
    field_count: u16,
    options: &'a CompilerOptions,
    source: &'a str,
    labels: LabelContext,
    out: Vec<VmInstruction>,
    /// Kind of the subroutine being emitted; decides whether `this` exists.
    subroutine_kind: SubroutineKind,
}

impl<'a> CodeGen<'a> {
    #[inline]
    fn emit(&mut self, instruction: VmInstruction) {
        self.out.push(instruction);
    }

    #[inline]
    fn emit_op(&mut self, op: ArithmeticOp) {
        self.emit(VmInstruction::Arithmetic(op));
    }

    // ========================================================================
    // Declarations
    // ========================================================================

    fn emit_subroutine(&mut self, subroutine: &SubroutineDec) -> EmitResult {
        let full_name = format!("{}.{}", self.class_name, subroutine.name.text);
        let n_locals = to_u16(subroutine.local_count(), "local variables", subroutine.range)?;
        trace!(subroutine = %full_name, locals = n_locals, "emitting subroutine");

        self.subroutine_kind = subroutine.kind;
        self.emit(VmInstruction::Function {
            name: full_name,
            n_locals,
        });

        match subroutine.kind {
            SubroutineKind::Constructor => {
                let n_fields = to_u16(usize::from(self.field_count), "fields", subroutine.range)?;
                self.emit(VmInstruction::push(Segment::Constant, n_fields));
                self.emit(VmInstruction::call(MEMORY_ALLOC, 1));
                self.emit(VmInstruction::pop(Segment::Pointer, 0));
            }
            SubroutineKind::Method => {
                self.emit(VmInstruction::push(Segment::Argument, 0));
                self.emit(VmInstruction::pop(Segment::Pointer, 0));
            }
            SubroutineKind::Function => {}
        }

        self.emit_statements(&subroutine.body.statements)
    }

    // ========================================================================
    // Statements
    // ========================================================================

    fn emit_statements(&mut self, statements: &[Statement]) -> EmitResult {
        for statement in statements {
            self.emit_statement(statement)?;
        }
        Ok(())
    }

    fn emit_statement(&mut self, statement: &Statement) -> EmitResult {
        if self.options.annotate_statements() {
            let text = self.annotation(statement);
            self.emit(VmInstruction::Comment(text));
        }

        match statement {
            Statement::Let(stmt) => self.emit_let(stmt),
            Statement::If(stmt) => self.emit_if(stmt),
            Statement::While(stmt) => self.emit_while(stmt),
            Statement::Do(stmt) => self.emit_do(stmt),
            Statement::Return(stmt) => self.emit_return(stmt),
        }
    }

    /// Source text of a statement with whitespace collapsed. Compound
    /// statements stop after their condition.
    fn annotation(&self, statement: &Statement) -> String {
        let (range, suffix) = match statement {
            Statement::If(stmt) => (TextRange::new(stmt.range.pos, stmt.condition.range.end), ")"),
            Statement::While(stmt) => (TextRange::new(stmt.range.pos, stmt.condition.range.end), ")"),
            _ => (statement.range(), ""),
        };

        match self.source.get(range.to_range()) {
            Some(text) if !text.is_empty() => {
                let mut header = text.split_whitespace().collect::<Vec<_>>().join(" ");
                header.push_str(suffix);
                header
            }
            _ => statement.kind().as_str().to_string(),
        }
    }

    fn emit_let(&mut self, stmt: &LetStatement) -> EmitResult {
        let (segment, slot) = operand_of(&stmt.target)?;
        match &stmt.index {
            None => {
                self.emit_expression(&stmt.value)?;
                self.emit(VmInstruction::pop(segment, slot));
            }
            Some(index) => {
                // Address first, value second; the value may itself use `that`.
                self.emit(VmInstruction::push(segment, slot));
                self.emit_expression(index)?;
                self.emit_op(ArithmeticOp::Add);
                self.emit_expression(&stmt.value)?;
                self.emit(VmInstruction::pop(Segment::Temp, 0));
                self.emit(VmInstruction::pop(Segment::Pointer, 1));
                self.emit(VmInstruction::push(Segment::Temp, 0));
                self.emit(VmInstruction::pop(Segment::That, 0));
            }
        }
        Ok(())
    }

    fn emit_if(&mut self, stmt: &IfStatement) -> EmitResult {
        let false_label = self.labels.fresh(LabelKind::IfFalse);
        let end_label = self.labels.fresh(LabelKind::IfEnd);

        self.emit_expression(&stmt.condition)?;
        self.emit_op(ArithmeticOp::Not);

        match &stmt.else_branch {
            None => {
                self.emit(VmInstruction::IfGoto(end_label.clone()));
                self.emit_statements(&stmt.then_branch)?;
            }
            Some(else_branch) => {
                self.emit(VmInstruction::IfGoto(false_label.clone()));
                self.emit_statements(&stmt.then_branch)?;
                self.emit(VmInstruction::Goto(end_label.clone()));
                self.emit(VmInstruction::Label(false_label));
                self.emit_statements(else_branch)?;
            }
        }

        self.emit(VmInstruction::Label(end_label));
        Ok(())
    }

    fn emit_while(&mut self, stmt: &WhileStatement) -> EmitResult {
        let start_label = self.labels.fresh(LabelKind::WhileStart);
        let end_label = self.labels.fresh(LabelKind::WhileEnd);

        self.emit(VmInstruction::Label(start_label.clone()));
        self.emit_expression(&stmt.condition)?;
        self.emit_op(ArithmeticOp::Not);
        self.emit(VmInstruction::IfGoto(end_label.clone()));
        self.emit_statements(&stmt.body)?;
        self.emit(VmInstruction::Goto(start_label));
        self.emit(VmInstruction::Label(end_label));
        Ok(())
    }

    fn emit_do(&mut self, stmt: &DoStatement) -> EmitResult {
        self.emit_call(&stmt.call)?;
        // Every call leaves one value.
        self.emit(VmInstruction::pop(Segment::Temp, 0));
        Ok(())
    }

    fn emit_return(&mut self, stmt: &ReturnStatement) -> EmitResult {
        match &stmt.value {
            Some(value) => self.emit_expression(value)?,
            None => self.emit(VmInstruction::push(Segment::Constant, 0)),
        }
        self.emit(VmInstruction::Return);
        Ok(())
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    /// Operands strictly left to right, each operator right after its
    /// right-hand term.
    fn emit_expression(&mut self, expr: &Expression) -> EmitResult {
        self.emit_term(&expr.head)?;
        for (op, term) in &expr.tail {
            self.emit_term(term)?;
            self.emit_binary(*op, term.range())?;
        }
        Ok(())
    }

    fn emit_binary(&mut self, op: BinaryOp, span: TextRange) -> EmitResult {
        let instruction = match op {
            BinaryOp::Add => VmInstruction::Arithmetic(ArithmeticOp::Add),
            BinaryOp::Sub => VmInstruction::Arithmetic(ArithmeticOp::Sub),
            BinaryOp::And => VmInstruction::Arithmetic(ArithmeticOp::And),
            BinaryOp::Or => VmInstruction::Arithmetic(ArithmeticOp::Or),
            BinaryOp::Lt => VmInstruction::Arithmetic(ArithmeticOp::Lt),
            BinaryOp::Gt => VmInstruction::Arithmetic(ArithmeticOp::Gt),
            BinaryOp::Eq => VmInstruction::Arithmetic(ArithmeticOp::Eq),
            // No native instruction; lowered to runtime routines.
            BinaryOp::Mul => VmInstruction::call(MATH_MULTIPLY, 2),
            BinaryOp::Div => VmInstruction::call(MATH_DIVIDE, 2),
            BinaryOp::Mod => match self.options.modulo_routine() {
                Some(routine) => VmInstruction::call(routine, 2),
                None => {
                    return Err(UnresolvedOperatorError {
                        operator: op.symbol(),
                        span,
                    }
                    .into())
                }
            },
        };
        self.emit(instruction);
        Ok(())
    }

    fn emit_term(&mut self, term: &Term) -> EmitResult {
        match term {
            Term::IntegerConstant { value, .. } => {
                self.emit(VmInstruction::push(Segment::Constant, *value));
            }
            Term::StringConstant { value, range } => self.emit_string(value, *range)?,
            Term::KeywordConstant { value, .. } => self.emit_keyword_constant(*value),
            Term::Variable(name) => {
                let (segment, slot) = operand_of(name)?;
                self.emit(VmInstruction::push(segment, slot));
            }
            Term::ArrayAccess { array, index } => {
                let (segment, slot) = operand_of(array)?;
                self.emit(VmInstruction::push(segment, slot));
                self.emit_expression(index)?;
                self.emit_op(ArithmeticOp::Add);
                self.emit(VmInstruction::pop(Segment::Pointer, 1));
                self.emit(VmInstruction::push(Segment::That, 0));
            }
            Term::Call(call) => self.emit_call(call)?,
            Term::Parenthesized { inner, .. } => self.emit_expression(inner)?,
            Term::Unary { op, operand, .. } => {
                self.emit_term(operand)?;
                self.emit_op(match op {
                    UnaryOp::Neg => ArithmeticOp::Neg,
                    UnaryOp::Not => ArithmeticOp::Not,
                });
            }
        }
        Ok(())
    }

    fn emit_keyword_constant(&mut self, value: KeywordConstant) {
        match value {
            KeywordConstant::True => match self.options.true_encoding() {
                TrueEncoding::NotZero => {
                    self.emit(VmInstruction::push(Segment::Constant, 0));
                    self.emit_op(ArithmeticOp::Not);
                }
                TrueEncoding::NegateOne => {
                    self.emit(VmInstruction::push(Segment::Constant, 1));
                    self.emit_op(ArithmeticOp::Neg);
                }
            },
            KeywordConstant::False | KeywordConstant::Null => {
                self.emit(VmInstruction::push(Segment::Constant, 0));
            }
            KeywordConstant::This => self.emit(VmInstruction::push(Segment::Pointer, 0)),
        }
    }

    /// `String.new(len)` then one `appendChar` per character.
    fn emit_string(&mut self, value: &str, range: TextRange) -> EmitResult {
        let len = to_u16(value.chars().count(), "string characters", range)?;
        self.emit(VmInstruction::push(Segment::Constant, len));
        self.emit(VmInstruction::call(STRING_NEW, 1));
        for ch in value.chars() {
            let code = u16::try_from(u32::from(ch))
                .ok()
                .filter(|code| *code <= i16::MAX as u16)
                .ok_or_else(|| {
                    CodeGenAssertionError::new(
                        format!("character `{ch}` has no VM character code"),
                        Some(range),
                    )
                })?;
            self.emit(VmInstruction::push(Segment::Constant, code));
            self.emit(VmInstruction::call(STRING_APPEND_CHAR, 2));
        }
        Ok(())
    }

    // ========================================================================
    // Calls
    // ========================================================================

    fn emit_arguments(&mut self, arguments: &[Expression]) -> EmitResult {
        for argument in arguments {
            self.emit_expression(argument)?;
        }
        Ok(())
    }

    fn emit_call(&mut self, call: &SubroutineCall) -> EmitResult {
        let n_args = to_u16(call.arguments.len(), "arguments", call.range)?;
        let name = &call.name.text;

        let Some(receiver) = &call.receiver else {
            // `name(args)`: a method of the current object.
            if self.subroutine_kind == SubroutineKind::Function {
                return Err(CodeGenAssertionError::new(
                    format!("`{name}` is called without a receiver inside a function, which has no `this`"),
                    Some(call.range),
                )
                .into());
            }
            self.emit(VmInstruction::push(Segment::Pointer, 0));
            self.emit_arguments(&call.arguments)?;
            self.emit(VmInstruction::call(
                format!("{}.{}", self.class_name, name),
                n_args + 1,
            ));
            return Ok(());
        };

        match &receiver.resolution {
            // `obj.name(args)`: a method of obj's declared class.
            Resolution::Variable(entry) => {
                let class = match &entry.ty {
                    TypeName::Class(class) => class,
                    primitive => {
                        return Err(CodeGenAssertionError::new(
                            format!("`{}` has primitive type {primitive} and no methods", receiver.name),
                            Some(receiver.range),
                        )
                        .into())
                    }
                };
                let (segment, slot) = operand_of(receiver)?;
                self.emit(VmInstruction::push(segment, slot));
                self.emit_arguments(&call.arguments)?;
                self.emit(VmInstruction::call(format!("{class}.{name}"), n_args + 1));
            }
            // `Class.name(args)`: a function or constructor, no receiver.
            Resolution::Class => {
                self.emit_arguments(&call.arguments)?;
                self.emit(VmInstruction::call(format!("{}.{}", receiver.name, name), n_args));
            }
            Resolution::Subroutine => {
                return Err(CodeGenAssertionError::new(
                    format!("`{}` is neither a declared variable nor a class", receiver.name),
                    Some(receiver.range),
                )
                .into())
            }
        }
        Ok(())
    }
}

/// The symbol a name in variable position resolved to.
fn variable_of(name: &NameRef) -> Result<&SymbolEntry, CodeGenAssertionError> {
    match &name.resolution {
        Resolution::Variable(entry) => Ok(entry),
        Resolution::Class => Err(CodeGenAssertionError::new(
            format!("`{}` names a class, not a variable", name.name),
            Some(name.range),
        )),
        Resolution::Subroutine => Err(CodeGenAssertionError::new(
            format!("`{}` is not a declared variable", name.name),
            Some(name.range),
        )),
    }
}

/// Segment and index of a name in variable position.
fn operand_of(name: &NameRef) -> Result<(Segment, u16), CodeGenAssertionError> {
    let entry = variable_of(name)?;
    let index = to_u16(usize::from(entry.index), "variables", name.range)?;
    Ok((entry.kind.into(), index))
}

fn to_u16(count: usize, what: &str, span: TextRange) -> Result<u16, CodeGenAssertionError> {
    u16::try_from(count)
        .ok()
        .filter(|n| *n <= i16::MAX as u16)
        .ok_or_else(|| CodeGenAssertionError::new(format!("too many {what}: {count}"), Some(span)))
}
