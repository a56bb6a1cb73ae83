//! Token categories, reserved words and grammar tags.

use std::fmt;
use std::str::FromStr;

/// The lexical category of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Keyword,
    Identifier,
    Symbol,
    IntegerConstant,
    StringConstant,
}

impl TokenKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TokenKind::Keyword => "keyword",
            TokenKind::Identifier => "identifier",
            TokenKind::Symbol => "symbol",
            TokenKind::IntegerConstant => "integerConstant",
            TokenKind::StringConstant => "stringConstant",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The fixed set of reserved words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    Class,
    Constructor,
    Function,
    Method,
    Field,
    Static,
    Var,
    Int,
    Char,
    Boolean,
    Void,
    True,
    False,
    Null,
    This,
    Let,
    Do,
    If,
    Else,
    While,
    Return,
}

impl Keyword {
    #[rustfmt::skip]
    pub fn as_str(self) -> &'static str {
        use Keyword as K;
        match self {
            K::Class       => "class",
            K::Constructor => "constructor",
            K::Function    => "function",
            K::Method      => "method",
            K::Field       => "field",
            K::Static      => "static",
            K::Var         => "var",
            K::Int         => "int",
            K::Char        => "char",
            K::Boolean     => "boolean",
            K::Void        => "void",
            K::True        => "true",
            K::False       => "false",
            K::Null        => "null",
            K::This        => "this",
            K::Let         => "let",
            K::Do          => "do",
            K::If          => "if",
            K::Else        => "else",
            K::While       => "while",
            K::Return      => "return",
        }
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Keyword {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use Keyword as K;
        match s {
            "class" => Ok(K::Class),
            "constructor" => Ok(K::Constructor),
            "function" => Ok(K::Function),
            "method" => Ok(K::Method),
            "field" => Ok(K::Field),
            "static" => Ok(K::Static),
            "var" => Ok(K::Var),
            "int" => Ok(K::Int),
            "char" => Ok(K::Char),
            "boolean" => Ok(K::Boolean),
            "void" => Ok(K::Void),
            "true" => Ok(K::True),
            "false" => Ok(K::False),
            "null" => Ok(K::Null),
            "this" => Ok(K::This),
            "let" => Ok(K::Let),
            "do" => Ok(K::Do),
            "if" => Ok(K::If),
            "else" => Ok(K::Else),
            "while" => Ok(K::While),
            "return" => Ok(K::Return),
            _ => Err(()),
        }
    }
}

/// Whether `ch` is one of the single-character symbols of the language.
pub fn is_symbol_char(ch: char) -> bool {
    matches!(
        ch,
        '{' | '}' | '(' | ')' | '[' | ']' | '.' | ',' | ';'
            | '+' | '-' | '*' | '/' | '%' | '&' | '|' | '<' | '>' | '=' | '~'
    )
}

/// Grammar rule tags, one per production.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyntaxKind {
    Class,
    ClassVarDec,
    Type,
    SubroutineDec,
    ParameterList,
    SubroutineBody,
    VarDec,
    Statements,
    LetStatement,
    IfStatement,
    WhileStatement,
    DoStatement,
    ReturnStatement,
    Expression,
    Term,
    SubroutineCall,
    ExpressionList,
}

impl SyntaxKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SyntaxKind::Class => "class",
            SyntaxKind::ClassVarDec => "classVarDec",
            SyntaxKind::Type => "type",
            SyntaxKind::SubroutineDec => "subroutineDec",
            SyntaxKind::ParameterList => "parameterList",
            SyntaxKind::SubroutineBody => "subroutineBody",
            SyntaxKind::VarDec => "varDec",
            SyntaxKind::Statements => "statements",
            SyntaxKind::LetStatement => "letStatement",
            SyntaxKind::IfStatement => "ifStatement",
            SyntaxKind::WhileStatement => "whileStatement",
            SyntaxKind::DoStatement => "doStatement",
            SyntaxKind::ReturnStatement => "returnStatement",
            SyntaxKind::Expression => "expression",
            SyntaxKind::Term => "term",
            SyntaxKind::SubroutineCall => "subroutineCall",
            SyntaxKind::ExpressionList => "expressionList",
        }
    }
}

impl fmt::Display for SyntaxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
