//! The Jack parser implementation.
//!
//! A recursive descent parser with one method per grammar production and a
//! single token of lookahead. It never backtracks and never recovers: the
//! first token that fits no alternative aborts the unit with a `ParseError`.

use crate::utilities::*;
use jackc_ast::node::*;
use jackc_ast::syntax_kind::{Keyword, SyntaxKind, TokenKind};
use jackc_ast::types::{SymbolKind, TypeName};
use jackc_binder::{Binder, SymbolTable};
use jackc_core::text::{TextPos, TextRange};
use jackc_diagnostics::{CompileError, ParseError};
use jackc_scanner::Token;

type ParseResult<T> = Result<T, CompileError>;

/// Maximum nesting of expressions, unary operators and statement blocks.
/// Parsing, generation and dropping the tree all recurse once per level, and
/// this bound has to hold on 2 MiB worker threads in unoptimized builds.
pub const MAX_NESTING_DEPTH: u32 = 64;

/// Tokens shown before and after the offending one in a `ParseError`.
const CONTEXT_BEFORE: usize = 3;
const CONTEXT_AFTER: usize = 2;

/// The result of parsing one unit: the class tree and its populated class scope.
#[derive(Debug, Clone)]
pub struct ParsedUnit {
    pub class: Class,
    pub class_scope: SymbolTable,
}

/// Parse a whole unit. Every token must be consumed.
pub fn parse(tokens: &[Token]) -> Result<ParsedUnit, CompileError> {
    Parser::new(tokens).parse_unit()
}

pub struct Parser<'t> {
    tokens: &'t [Token],
    pos: usize,
    binder: Binder,
    /// Name of the class being parsed; the type of a method's receiver.
    class_name: String,
    depth: u32,
}

impl<'t> Parser<'t> {
    pub fn new(tokens: &'t [Token]) -> Self {
        Self {
            tokens,
            pos: 0,
            binder: Binder::new(),
            class_name: String::new(),
            depth: 0,
        }
    }

    pub fn parse_unit(mut self) -> ParseResult<ParsedUnit> {
        let class = self.parse_class()?;
        if self.current().is_some() {
            return Err(self.error("end of input", SyntaxKind::Class));
        }
        Ok(ParsedUnit {
            class,
            class_scope: self.binder.into_class_scope(),
        })
    }

    // ========================================================================
    // Token management
    // ========================================================================

    #[inline]
    fn current(&self) -> Option<&'t Token> {
        let tokens: &'t [Token] = self.tokens;
        tokens.get(self.pos)
    }

    #[inline]
    fn peek(&self) -> Option<&'t Token> {
        let tokens: &'t [Token] = self.tokens;
        tokens.get(self.pos + 1)
    }

    #[inline]
    fn next_token(&mut self) {
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
    }

    /// End of the last consumed token.
    fn prev_end(&self) -> TextPos {
        match self.pos.checked_sub(1).and_then(|i| self.tokens.get(i)) {
            Some(token) => token.range.end,
            None => 0,
        }
    }

    /// Start of the current token, or the end of the input.
    fn token_pos(&self) -> TextPos {
        match self.current() {
            Some(token) => token.range.pos,
            None => self.prev_end(),
        }
    }

    fn range_from(&self, start: TextPos) -> TextRange {
        TextRange::new(start, self.prev_end().max(start))
    }

    fn at_keyword(&self, keyword: Keyword) -> bool {
        self.current().is_some_and(|t| t.is_keyword(keyword))
    }

    fn at_symbol(&self, ch: char) -> bool {
        self.current().is_some_and(|t| t.is_symbol(ch))
    }

    fn at(&self, pred: impl Fn(&Token) -> bool) -> bool {
        self.current().is_some_and(pred)
    }

    fn error(&self, expected: impl Into<String>, rule: SyntaxKind) -> CompileError {
        let (found, span) = match self.current() {
            Some(token) => (token.text.clone(), token.range),
            None => ("end of input".to_string(), TextRange::empty(self.prev_end())),
        };
        let start = self.pos.saturating_sub(CONTEXT_BEFORE);
        let end = (self.pos + CONTEXT_AFTER).min(self.tokens.len());
        let context = self.tokens[start..end]
            .iter()
            .map(|t| t.text.clone())
            .collect();

        ParseError {
            expected: expected.into(),
            found,
            rule: rule.as_str(),
            span,
            context,
        }
        .into()
    }

    fn expect_keyword(&mut self, keyword: Keyword, rule: SyntaxKind) -> ParseResult<()> {
        if self.at_keyword(keyword) {
            self.next_token();
            Ok(())
        } else {
            Err(self.error(format!("`{keyword}`"), rule))
        }
    }

    fn expect_symbol(&mut self, ch: char, rule: SyntaxKind) -> ParseResult<()> {
        if self.at_symbol(ch) {
            self.next_token();
            Ok(())
        } else {
            Err(self.error(format!("`{ch}`"), rule))
        }
    }

    fn expect_identifier(&mut self, rule: SyntaxKind) -> ParseResult<Identifier> {
        match self.current() {
            Some(token) if token.is_identifier() => {
                self.next_token();
                Ok(Identifier {
                    text: token.text.clone(),
                    range: token.range,
                })
            }
            _ => Err(self.error("an identifier", rule)),
        }
    }

    /// Closing brace of a block whose body ends with `statements`.
    fn expect_block_end(&mut self, rule: SyntaxKind) -> ParseResult<()> {
        if self.at_symbol('}') {
            self.next_token();
            Ok(())
        } else {
            Err(self.error("a statement or `}`", rule))
        }
    }

    fn enter_nesting(&mut self, rule: SyntaxKind) -> ParseResult<()> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(self.error("less deeply nested code", rule));
        }
        self.depth += 1;
        Ok(())
    }

    fn leave_nesting(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Resolve a usage against the live scopes.
    fn name_ref(&self, name: Identifier) -> NameRef {
        NameRef {
            resolution: self.binder.resolve(&name.text),
            name: name.text,
            range: name.range,
        }
    }

    // ========================================================================
    // Declarations
    // ========================================================================

    fn parse_class(&mut self) -> ParseResult<Class> {
        let start = self.token_pos();
        self.expect_keyword(Keyword::Class, SyntaxKind::Class)?;
        let name = self.expect_identifier(SyntaxKind::Class)?;
        self.class_name = name.text.clone();
        self.expect_symbol('{', SyntaxKind::Class)?;

        let mut var_decs = Vec::new();
        while self.at(is_class_var_start) {
            var_decs.push(self.parse_class_var_dec()?);
        }

        let mut subroutines = Vec::new();
        while self.at(is_subroutine_start) {
            subroutines.push(self.parse_subroutine_dec()?);
        }

        if !self.at_symbol('}') {
            return Err(self.error("a class member or `}`", SyntaxKind::Class));
        }
        self.next_token();

        Ok(Class {
            name,
            var_decs,
            subroutines,
            range: self.range_from(start),
        })
    }

    fn parse_class_var_dec(&mut self) -> ParseResult<ClassVarDec> {
        let start = self.token_pos();
        let kind = if self.at_keyword(Keyword::Static) {
            ClassVarKind::Static
        } else if self.at_keyword(Keyword::Field) {
            ClassVarKind::Field
        } else {
            return Err(self.error("`static` or `field`", SyntaxKind::ClassVarDec));
        };
        self.next_token();

        let ty = self.parse_type()?;
        let names = self.parse_declared_names(&ty, kind.into(), SyntaxKind::ClassVarDec)?;
        self.expect_symbol(';', SyntaxKind::ClassVarDec)?;

        Ok(ClassVarDec {
            kind,
            ty,
            names,
            range: self.range_from(start),
        })
    }

    /// `name (',' name)*`, defining each name as it is read.
    fn parse_declared_names(
        &mut self,
        ty: &TypeName,
        kind: SymbolKind,
        rule: SyntaxKind,
    ) -> ParseResult<Vec<Identifier>> {
        let mut names = Vec::new();
        loop {
            let name = self.expect_identifier(rule)?;
            self.binder.define(&name, ty.clone(), kind)?;
            names.push(name);
            if !self.at_symbol(',') {
                break;
            }
            self.next_token();
        }
        Ok(names)
    }

    fn parse_type(&mut self) -> ParseResult<TypeName> {
        let token = match self.current() {
            Some(token) if can_start_type(token) => token,
            _ => return Err(self.error("a type", SyntaxKind::Type)),
        };
        let ty = match token.keyword() {
            Some(Keyword::Int) => TypeName::Int,
            Some(Keyword::Char) => TypeName::Char,
            Some(Keyword::Boolean) => TypeName::Boolean,
            _ => TypeName::Class(token.text.clone()),
        };
        self.next_token();
        Ok(ty)
    }

    fn parse_subroutine_dec(&mut self) -> ParseResult<SubroutineDec> {
        let start = self.token_pos();
        let kind = match self.current().and_then(Token::keyword) {
            Some(Keyword::Constructor) => SubroutineKind::Constructor,
            Some(Keyword::Function) => SubroutineKind::Function,
            Some(Keyword::Method) => SubroutineKind::Method,
            _ => {
                return Err(self.error(
                    "`constructor`, `function` or `method`",
                    SyntaxKind::SubroutineDec,
                ))
            }
        };
        self.next_token();

        let return_type = if self.at_keyword(Keyword::Void) {
            self.next_token();
            ReturnType::Void
        } else {
            ReturnType::Type(self.parse_type()?)
        };
        let name = self.expect_identifier(SyntaxKind::SubroutineDec)?;

        self.binder.enter_subroutine();
        if kind == SubroutineKind::Method {
            // The receiver occupies argument 0.
            let receiver = Identifier {
                text: Keyword::This.as_str().to_string(),
                range: name.range,
            };
            let ty = TypeName::Class(self.class_name.clone());
            self.binder.define(&receiver, ty, SymbolKind::Argument)?;
        }

        self.expect_symbol('(', SyntaxKind::SubroutineDec)?;
        let parameters = self.parse_parameter_list()?;
        self.expect_symbol(')', SyntaxKind::SubroutineDec)?;
        let body = self.parse_subroutine_body()?;
        self.binder.exit_subroutine();

        Ok(SubroutineDec {
            kind,
            return_type,
            name,
            parameters,
            body,
            range: self.range_from(start),
        })
    }

    fn parse_parameter_list(&mut self) -> ParseResult<Vec<Parameter>> {
        let mut parameters = Vec::new();
        if self.at_symbol(')') {
            return Ok(parameters);
        }
        loop {
            let ty = self.parse_type()?;
            let name = self.expect_identifier(SyntaxKind::ParameterList)?;
            self.binder.define(&name, ty.clone(), SymbolKind::Argument)?;
            parameters.push(Parameter { ty, name });
            if !self.at_symbol(',') {
                break;
            }
            self.next_token();
        }
        Ok(parameters)
    }

    fn parse_subroutine_body(&mut self) -> ParseResult<SubroutineBody> {
        self.expect_symbol('{', SyntaxKind::SubroutineBody)?;
        let mut var_decs = Vec::new();
        while self.at_keyword(Keyword::Var) {
            var_decs.push(self.parse_var_dec()?);
        }
        let statements = self.parse_statements()?;
        self.expect_block_end(SyntaxKind::SubroutineBody)?;
        Ok(SubroutineBody {
            var_decs,
            statements,
        })
    }

    fn parse_var_dec(&mut self) -> ParseResult<VarDec> {
        let start = self.token_pos();
        self.expect_keyword(Keyword::Var, SyntaxKind::VarDec)?;
        let ty = self.parse_type()?;
        let names = self.parse_declared_names(&ty, SymbolKind::Local, SyntaxKind::VarDec)?;
        self.expect_symbol(';', SyntaxKind::VarDec)?;
        Ok(VarDec {
            ty,
            names,
            range: self.range_from(start),
        })
    }

    // ========================================================================
    // Statements
    // ========================================================================

    fn parse_statements(&mut self) -> ParseResult<Vec<Statement>> {
        self.enter_nesting(SyntaxKind::Statements)?;
        let mut statements = Vec::new();
        while self.at(can_start_statement) {
            statements.push(self.parse_statement()?);
        }
        self.leave_nesting();
        Ok(statements)
    }

    fn parse_statement(&mut self) -> ParseResult<Statement> {
        match self.current().and_then(Token::keyword) {
            Some(Keyword::Let) => self.parse_let_statement().map(Statement::Let),
            Some(Keyword::If) => self.parse_if_statement().map(Statement::If),
            Some(Keyword::While) => self.parse_while_statement().map(Statement::While),
            Some(Keyword::Do) => self.parse_do_statement().map(Statement::Do),
            Some(Keyword::Return) => self.parse_return_statement().map(Statement::Return),
            _ => Err(self.error("a statement", SyntaxKind::Statements)),
        }
    }

    fn parse_let_statement(&mut self) -> ParseResult<LetStatement> {
        let start = self.token_pos();
        self.expect_keyword(Keyword::Let, SyntaxKind::LetStatement)?;
        let name = self.expect_identifier(SyntaxKind::LetStatement)?;
        let target = self.name_ref(name);

        let index = if self.at_symbol('[') {
            self.next_token();
            let index = self.parse_expression()?;
            self.expect_symbol(']', SyntaxKind::LetStatement)?;
            Some(index)
        } else {
            None
        };

        self.expect_symbol('=', SyntaxKind::LetStatement)?;
        let value = self.parse_expression()?;
        self.expect_symbol(';', SyntaxKind::LetStatement)?;

        Ok(LetStatement {
            target,
            index,
            value,
            range: self.range_from(start),
        })
    }

    /// `'{' statements '}'`
    fn parse_block(&mut self, rule: SyntaxKind) -> ParseResult<Vec<Statement>> {
        self.expect_symbol('{', rule)?;
        let statements = self.parse_statements()?;
        self.expect_block_end(rule)?;
        Ok(statements)
    }

    fn parse_if_statement(&mut self) -> ParseResult<IfStatement> {
        let start = self.token_pos();
        self.expect_keyword(Keyword::If, SyntaxKind::IfStatement)?;
        self.expect_symbol('(', SyntaxKind::IfStatement)?;
        let condition = self.parse_expression()?;
        self.expect_symbol(')', SyntaxKind::IfStatement)?;
        let then_branch = self.parse_block(SyntaxKind::IfStatement)?;

        let else_branch = if self.at_keyword(Keyword::Else) {
            self.next_token();
            Some(self.parse_block(SyntaxKind::IfStatement)?)
        } else {
            None
        };

        Ok(IfStatement {
            condition,
            then_branch,
            else_branch,
            range: self.range_from(start),
        })
    }

    fn parse_while_statement(&mut self) -> ParseResult<WhileStatement> {
        let start = self.token_pos();
        self.expect_keyword(Keyword::While, SyntaxKind::WhileStatement)?;
        self.expect_symbol('(', SyntaxKind::WhileStatement)?;
        let condition = self.parse_expression()?;
        self.expect_symbol(')', SyntaxKind::WhileStatement)?;
        let body = self.parse_block(SyntaxKind::WhileStatement)?;
        Ok(WhileStatement {
            condition,
            body,
            range: self.range_from(start),
        })
    }

    fn parse_do_statement(&mut self) -> ParseResult<DoStatement> {
        let start = self.token_pos();
        self.expect_keyword(Keyword::Do, SyntaxKind::DoStatement)?;
        let call = self.parse_subroutine_call()?;
        self.expect_symbol(';', SyntaxKind::DoStatement)?;
        Ok(DoStatement {
            call,
            range: self.range_from(start),
        })
    }

    fn parse_return_statement(&mut self) -> ParseResult<ReturnStatement> {
        let start = self.token_pos();
        self.expect_keyword(Keyword::Return, SyntaxKind::ReturnStatement)?;
        let value = if self.at_symbol(';') {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect_symbol(';', SyntaxKind::ReturnStatement)?;
        Ok(ReturnStatement {
            value,
            range: self.range_from(start),
        })
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    /// `term (op term)*`, kept flat in source order.
    fn parse_expression(&mut self) -> ParseResult<Expression> {
        self.enter_nesting(SyntaxKind::Expression)?;
        let start = self.token_pos();
        let head = self.parse_term()?;
        let mut tail = Vec::new();
        while let Some(op) = self
            .current()
            .and_then(Token::symbol)
            .and_then(BinaryOp::from_symbol)
        {
            self.next_token();
            tail.push((op, self.parse_term()?));
        }
        self.leave_nesting();
        Ok(Expression {
            head,
            tail,
            range: self.range_from(start),
        })
    }

    fn parse_term(&mut self) -> ParseResult<Term> {
        let token = match self.current() {
            Some(token) if can_start_term(token) => token,
            _ => return Err(self.error("a term", SyntaxKind::Term)),
        };
        let start = token.range.pos;

        match token.kind {
            TokenKind::IntegerConstant => {
                let value = token
                    .text
                    .parse::<u16>()
                    .map_err(|_| self.error("an integer constant", SyntaxKind::Term))?;
                self.next_token();
                Ok(Term::IntegerConstant {
                    value,
                    range: token.range,
                })
            }
            TokenKind::StringConstant => {
                self.next_token();
                Ok(Term::StringConstant {
                    value: token.text.clone(),
                    range: token.range,
                })
            }
            TokenKind::Keyword => {
                let value = match token.keyword() {
                    Some(Keyword::True) => KeywordConstant::True,
                    Some(Keyword::False) => KeywordConstant::False,
                    Some(Keyword::Null) => KeywordConstant::Null,
                    Some(Keyword::This) => KeywordConstant::This,
                    _ => return Err(self.error("a term", SyntaxKind::Term)),
                };
                self.next_token();
                Ok(Term::KeywordConstant {
                    value,
                    range: token.range,
                })
            }
            TokenKind::Symbol => {
                if token.is_symbol('(') {
                    self.next_token();
                    let inner = self.parse_expression()?;
                    self.expect_symbol(')', SyntaxKind::Term)?;
                    return Ok(Term::Parenthesized {
                        inner: Box::new(inner),
                        range: self.range_from(start),
                    });
                }
                let op = match token.symbol().and_then(UnaryOp::from_symbol) {
                    Some(op) => op,
                    None => return Err(self.error("a term", SyntaxKind::Term)),
                };
                self.next_token();
                self.enter_nesting(SyntaxKind::Term)?;
                let operand = self.parse_term()?;
                self.leave_nesting();
                Ok(Term::Unary {
                    op,
                    operand: Box::new(operand),
                    range: self.range_from(start),
                })
            }
            TokenKind::Identifier => match self.peek().and_then(Token::symbol) {
                Some('[') => {
                    let name = self.expect_identifier(SyntaxKind::Term)?;
                    let array = self.name_ref(name);
                    self.next_token(); // '['
                    let index = self.parse_expression()?;
                    self.expect_symbol(']', SyntaxKind::Term)?;
                    Ok(Term::ArrayAccess {
                        array,
                        index: Box::new(index),
                    })
                }
                Some('.' | '(') => Ok(Term::Call(self.parse_subroutine_call()?)),
                _ => {
                    let name = self.expect_identifier(SyntaxKind::Term)?;
                    Ok(Term::Variable(self.name_ref(name)))
                }
            },
        }
    }

    /// `name '(' args ')'` or `receiver '.' name '(' args ')'`.
    fn parse_subroutine_call(&mut self) -> ParseResult<SubroutineCall> {
        let start = self.token_pos();
        let first = self.expect_identifier(SyntaxKind::SubroutineCall)?;
        let (receiver, name) = if self.at_symbol('.') {
            self.next_token();
            let name = self.expect_identifier(SyntaxKind::SubroutineCall)?;
            (Some(self.name_ref(first)), name)
        } else {
            (None, first)
        };

        self.expect_symbol('(', SyntaxKind::SubroutineCall)?;
        let arguments = self.parse_expression_list()?;
        self.expect_symbol(')', SyntaxKind::SubroutineCall)?;

        Ok(SubroutineCall {
            receiver,
            name,
            arguments,
            range: self.range_from(start),
        })
    }

    fn parse_expression_list(&mut self) -> ParseResult<Vec<Expression>> {
        let mut expressions = Vec::new();
        if self.at_symbol(')') {
            return Ok(expressions);
        }
        loop {
            expressions.push(self.parse_expression()?);
            if !self.at_symbol(',') {
                break;
            }
            self.next_token();
        }
        Ok(expressions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jackc_ast::types::Resolution;
    use jackc_scanner::tokenize;

    fn parse_src(src: &str) -> ParseResult<ParsedUnit> {
        let tokens = tokenize(src)?;
        parse(&tokens)
    }

    #[test]
    fn test_minimal_class() {
        let unit = parse_src("class Empty { }").unwrap();
        assert_eq!(unit.class.name.text, "Empty");
        assert!(unit.class.subroutines.is_empty());
        assert!(unit.class_scope.is_empty());
        assert_eq!(unit.class.range, TextRange::new(0, 15));
    }

    #[test]
    fn test_method_receiver_is_argument_zero() {
        let src = "class P { method int get(int a) { return a; } }";
        let unit = parse_src(src).unwrap();
        let body = &unit.class.subroutines[0].body;
        let Statement::Return(ret) = &body.statements[0] else {
            panic!("expected return");
        };
        let Some(Expression {
            head: Term::Variable(name),
            ..
        }) = &ret.value
        else {
            panic!("expected variable");
        };
        let entry = name.resolution.as_variable().unwrap();
        assert_eq!(entry.kind, SymbolKind::Argument);
        assert_eq!(entry.index, 1);
    }

    #[test]
    fn test_error_context_window() {
        let err = parse_src("class A { function void f() { let x 1; } }").unwrap_err();
        let CompileError::Parse(err) = err else {
            panic!("expected parse error");
        };
        assert_eq!(err.found, "1");
        assert_eq!(err.expected, "`=`");
        assert_eq!(err.rule, "letStatement");
        assert_eq!(err.context, ["{", "let", "x", "1", ";"]);
    }

    #[test]
    fn test_unknown_names_use_heuristic() {
        let src = "class A { function void f() { do Sys.halt(); return; } }";
        let unit = parse_src(src).unwrap();
        let Statement::Do(stmt) = &unit.class.subroutines[0].body.statements[0] else {
            panic!("expected do");
        };
        let receiver = stmt.call.receiver.as_ref().unwrap();
        assert_eq!(receiver.resolution, Resolution::Class);
    }
}
