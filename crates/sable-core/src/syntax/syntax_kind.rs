//! Syntax kind enumeration for the C-family CST
//!
//! This module defines all node and token types the engine understands.
//! The producing parser is external; it only has to emit these kinds.

use std::fmt;

/// Syntax kind for C-family language elements
///
/// This enum represents all possible types of nodes and tokens in the CST.
/// It includes:
/// - Trivia (whitespace, newlines, comments)
/// - Keywords (class, try, catch, throw, etc.)
/// - Punctuation and operators
/// - Literals and identifiers
/// - Structural nodes (declarations, statements, expressions)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum SyntaxKind {
    // ==================
    // Trivia (0-9)
    // ==================
    /// Whitespace (spaces, tabs)
    Whitespace = 0,
    /// Newline (`\n` or `\r\n`)
    Newline = 1,
    /// Line comment starting with //
    LineComment = 2,
    /// Block comment /* ... */
    BlockComment = 3,
    /// Documentation line comment starting with ///
    DocLineComment = 4,
    /// Documentation block comment /** ... */
    DocBlockComment = 5,

    // ==================
    // Keywords (10-99)
    // ==================
    UsingKw = 10,
    NamespaceKw = 11,
    ClassKw = 12,
    StructKw = 13,
    TryKw = 20,
    CatchKw = 21,
    FinallyKw = 22,
    ThrowKw = 23,
    WhenKw = 24,
    NewKw = 25,
    ReturnKw = 26,
    PublicKw = 40,
    PrivateKw = 41,
    ProtectedKw = 42,
    InternalKw = 43,
    StaticKw = 44,
    SealedKw = 45,
    AbstractKw = 46,
    ReadonlyKw = 47,
    VoidKw = 60,
    VarKw = 61,
    BaseKw = 62,
    ThisKw = 63,

    // ==================
    // Punctuation (100-149)
    // ==================
    LBrace = 100,
    RBrace = 101,
    LParen = 102,
    RParen = 103,
    LBracket = 104,
    RBracket = 105,
    Semicolon = 106,
    Colon = 107,
    Comma = 108,
    Dot = 109,
    Lt = 110,
    Gt = 111,
    Equals = 112,
    FatArrow = 113,
    /// Any other operator run (`+`, `==`, `&&`, ...)
    Operator = 114,

    // ==================
    // Literals & identifiers (150-199)
    // ==================
    Ident = 150,
    StringLiteral = 151,
    NumberLiteral = 152,

    // ==================
    // Structure nodes (200-399)
    // ==================
    CompilationUnit = 200,
    UsingDirective = 201,
    NamespaceDeclaration = 202,
    ClassDeclaration = 210,
    TypeParameterList = 211,
    BaseList = 212,
    ConstructorDeclaration = 213,
    MethodDeclaration = 214,
    FieldDeclaration = 215,
    PropertyDeclaration = 216,
    ParameterList = 217,
    TypeRef = 218,
    Block = 250,
    TryStatement = 251,
    CatchClause = 252,
    CatchDeclaration = 253,
    CatchFilter = 254,
    FinallyClause = 255,
    ThrowStatement = 256,
    ReturnStatement = 257,
    ExpressionStatement = 258,
    Expression = 300,
    ObjectCreationExpression = 301,
    ArgumentList = 302,

    // ==================
    // Special (400+)
    // ==================
    /// Unparseable input kept for losslessness
    Error = 400,
}

impl SyntaxKind {
    /// Convert a raw rowan kind back to a `SyntaxKind`
    ///
    /// Returns `None` for values that do not name a kind.
    pub fn from_raw(raw: u16) -> Option<Self> {
        use SyntaxKind::*;
        let kind = match raw {
            0 => Whitespace,
            1 => Newline,
            2 => LineComment,
            3 => BlockComment,
            4 => DocLineComment,
            5 => DocBlockComment,

            10 => UsingKw,
            11 => NamespaceKw,
            12 => ClassKw,
            13 => StructKw,
            20 => TryKw,
            21 => CatchKw,
            22 => FinallyKw,
            23 => ThrowKw,
            24 => WhenKw,
            25 => NewKw,
            26 => ReturnKw,
            40 => PublicKw,
            41 => PrivateKw,
            42 => ProtectedKw,
            43 => InternalKw,
            44 => StaticKw,
            45 => SealedKw,
            46 => AbstractKw,
            47 => ReadonlyKw,
            60 => VoidKw,
            61 => VarKw,
            62 => BaseKw,
            63 => ThisKw,

            100 => LBrace,
            101 => RBrace,
            102 => LParen,
            103 => RParen,
            104 => LBracket,
            105 => RBracket,
            106 => Semicolon,
            107 => Colon,
            108 => Comma,
            109 => Dot,
            110 => Lt,
            111 => Gt,
            112 => Equals,
            113 => FatArrow,
            114 => Operator,

            150 => Ident,
            151 => StringLiteral,
            152 => NumberLiteral,

            200 => CompilationUnit,
            201 => UsingDirective,
            202 => NamespaceDeclaration,
            210 => ClassDeclaration,
            211 => TypeParameterList,
            212 => BaseList,
            213 => ConstructorDeclaration,
            214 => MethodDeclaration,
            215 => FieldDeclaration,
            216 => PropertyDeclaration,
            217 => ParameterList,
            218 => TypeRef,
            250 => Block,
            251 => TryStatement,
            252 => CatchClause,
            253 => CatchDeclaration,
            254 => CatchFilter,
            255 => FinallyClause,
            256 => ThrowStatement,
            257 => ReturnStatement,
            258 => ExpressionStatement,
            300 => Expression,
            301 => ObjectCreationExpression,
            302 => ArgumentList,

            400 => Error,
            _ => return None,
        };
        Some(kind)
    }

    /// Check if this kind is trivia (whitespace, newline or comment)
    pub fn is_trivia(self) -> bool {
        (self as u16) < 10
    }

    /// Check if this kind is any flavour of comment
    pub fn is_comment(self) -> bool {
        matches!(
            self,
            Self::LineComment | Self::BlockComment | Self::DocLineComment | Self::DocBlockComment
        )
    }

    /// Check if this kind is a documentation comment
    pub fn is_doc_comment(self) -> bool {
        matches!(self, Self::DocLineComment | Self::DocBlockComment)
    }

    /// Check if this kind is a keyword
    pub fn is_keyword(self) -> bool {
        (10..100).contains(&(self as u16))
    }

    /// Check if this kind is a member or statement modifier keyword
    pub fn is_modifier(self) -> bool {
        matches!(
            self,
            Self::PublicKw
                | Self::PrivateKw
                | Self::ProtectedKw
                | Self::InternalKw
                | Self::StaticKw
                | Self::SealedKw
                | Self::AbstractKw
                | Self::ReadonlyKw
        )
    }

    /// Check if this kind is a structural node (vs. a token)
    pub fn is_node(self) -> bool {
        (200..400).contains(&(self as u16)) || self == Self::Error
    }

    /// Check if this kind is a statement node
    pub fn is_statement(self) -> bool {
        matches!(
            self,
            Self::Block
                | Self::TryStatement
                | Self::ThrowStatement
                | Self::ReturnStatement
                | Self::ExpressionStatement
        )
    }

    /// Get the keyword text for keyword kinds
    pub fn keyword_text(self) -> Option<&'static str> {
        match self {
            Self::UsingKw => Some("using"),
            Self::NamespaceKw => Some("namespace"),
            Self::ClassKw => Some("class"),
            Self::StructKw => Some("struct"),
            Self::TryKw => Some("try"),
            Self::CatchKw => Some("catch"),
            Self::FinallyKw => Some("finally"),
            Self::ThrowKw => Some("throw"),
            Self::WhenKw => Some("when"),
            Self::NewKw => Some("new"),
            Self::ReturnKw => Some("return"),
            Self::PublicKw => Some("public"),
            Self::PrivateKw => Some("private"),
            Self::ProtectedKw => Some("protected"),
            Self::InternalKw => Some("internal"),
            Self::StaticKw => Some("static"),
            Self::SealedKw => Some("sealed"),
            Self::AbstractKw => Some("abstract"),
            Self::ReadonlyKw => Some("readonly"),
            Self::VoidKw => Some("void"),
            Self::VarKw => Some("var"),
            Self::BaseKw => Some("base"),
            Self::ThisKw => Some("this"),
            _ => None,
        }
    }

    /// Look up the keyword kind for an identifier-shaped word
    pub fn from_keyword(text: &str) -> Option<Self> {
        let kind = match text {
            "using" => Self::UsingKw,
            "namespace" => Self::NamespaceKw,
            "class" => Self::ClassKw,
            "struct" => Self::StructKw,
            "try" => Self::TryKw,
            "catch" => Self::CatchKw,
            "finally" => Self::FinallyKw,
            "throw" => Self::ThrowKw,
            "when" => Self::WhenKw,
            "new" => Self::NewKw,
            "return" => Self::ReturnKw,
            "public" => Self::PublicKw,
            "private" => Self::PrivateKw,
            "protected" => Self::ProtectedKw,
            "internal" => Self::InternalKw,
            "static" => Self::StaticKw,
            "sealed" => Self::SealedKw,
            "abstract" => Self::AbstractKw,
            "readonly" => Self::ReadonlyKw,
            "void" => Self::VoidKw,
            "var" => Self::VarKw,
            "base" => Self::BaseKw,
            "this" => Self::ThisKw,
            _ => return None,
        };
        Some(kind)
    }
}

impl fmt::Display for SyntaxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trivia_classification() {
        assert!(SyntaxKind::Whitespace.is_trivia());
        assert!(SyntaxKind::Newline.is_trivia());
        assert!(SyntaxKind::DocBlockComment.is_trivia());
        assert!(!SyntaxKind::TryKw.is_trivia());
        assert!(!SyntaxKind::Whitespace.is_comment());
        assert!(SyntaxKind::DocLineComment.is_comment());
    }

    #[test]
    fn test_keyword_classification() {
        assert!(SyntaxKind::CatchKw.is_keyword());
        assert!(SyntaxKind::ThisKw.is_keyword());
        assert!(!SyntaxKind::Ident.is_keyword());
        assert!(SyntaxKind::StaticKw.is_modifier());
        assert!(!SyntaxKind::ClassKw.is_modifier());
    }

    #[test]
    fn test_keyword_text_roundtrip() {
        for raw in 10..100 {
            if let Some(kind) = SyntaxKind::from_raw(raw) {
                let text = kind.keyword_text().expect("every keyword has text");
                assert_eq!(SyntaxKind::from_keyword(text), Some(kind));
            }
        }
        assert_eq!(SyntaxKind::from_keyword("catchy"), None);
    }

    #[test]
    fn test_node_classification() {
        assert!(SyntaxKind::TryStatement.is_node());
        assert!(SyntaxKind::Error.is_node());
        assert!(!SyntaxKind::Ident.is_node());
        assert!(SyntaxKind::ThrowStatement.is_statement());
        assert!(!SyntaxKind::CatchClause.is_statement());
    }
}
