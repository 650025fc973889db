//! Typed AST layer over the CST
//!
//! Ergonomic, type-safe wrappers over raw CST nodes. Each wrapper implements
//! `AstNode::cast()` to safely convert from a `SyntaxNode`.
//!
//! # Example
//!
//! ```ignore
//! use sable_core::syntax::ast::{AstNode, TryStatement};
//!
//! let try_stmt = TryStatement::cast(node).unwrap();
//! assert_eq!(try_stmt.catch_clauses().count(), 1);
//! assert!(try_stmt.finally_clause().is_none());
//! ```

use super::{SyntaxKind, SyntaxNode, SyntaxToken};

/// Helper trait for casting CST nodes to typed wrappers
pub trait AstNode: Sized {
    fn can_cast(kind: SyntaxKind) -> bool;
    fn cast(node: SyntaxNode) -> Option<Self>;
    fn syntax(&self) -> &SyntaxNode;
}

macro_rules! ast_node {
    ($(#[$meta:meta])* $name:ident, $kind:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name {
            syntax: SyntaxNode,
        }

        impl AstNode for $name {
            fn can_cast(kind: SyntaxKind) -> bool {
                kind == SyntaxKind::$kind
            }

            fn cast(node: SyntaxNode) -> Option<Self> {
                if Self::can_cast(node.kind()) {
                    Some(Self { syntax: node })
                } else {
                    None
                }
            }

            fn syntax(&self) -> &SyntaxNode {
                &self.syntax
            }
        }
    };
}

/// Helper function to find first child node of a specific kind
fn child_of_kind(parent: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxNode> {
    parent.children().find(|n| n.kind() == kind)
}

/// Helper function to find first direct token of a specific kind
fn token_of_kind(parent: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxToken> {
    parent
        .children_with_tokens()
        .filter_map(|e| e.into_token())
        .find(|t| t.kind() == kind)
}

/// Modifier keywords written directly on a declaration
pub fn modifiers(node: &SyntaxNode) -> Vec<SyntaxKind> {
    node.children_with_tokens()
        .filter_map(|e| e.into_token())
        .map(|t| t.kind())
        .filter(|kind| kind.is_modifier())
        .collect()
}

/// Name of a `TypeRef` node: its first identifier, generic arguments dropped
fn type_ref_name(type_ref: &SyntaxNode) -> Option<String> {
    token_of_kind(type_ref, SyntaxKind::Ident).map(|t| t.text().to_string())
}

// ============================================================================
// Declarations
// ============================================================================

ast_node!(
    /// Root of a parsed file
    CompilationUnit,
    CompilationUnit
);

impl CompilationUnit {
    /// All class declarations in the file, nested ones included
    pub fn classes(&self) -> impl Iterator<Item = ClassDeclaration> + '_ {
        self.syntax.descendants().filter_map(ClassDeclaration::cast)
    }
}

ast_node!(
    /// `class Name<T> : Base { members }`
    ClassDeclaration,
    ClassDeclaration
);

impl ClassDeclaration {
    /// The identifier token naming the class
    pub fn name_token(&self) -> Option<SyntaxToken> {
        self.syntax
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .skip_while(|t| !matches!(t.kind(), SyntaxKind::ClassKw | SyntaxKind::StructKw))
            .find(|t| t.kind() == SyntaxKind::Ident)
    }

    pub fn name(&self) -> Option<String> {
        self.name_token().map(|t| t.text().to_string())
    }

    pub fn is_generic(&self) -> bool {
        child_of_kind(&self.syntax, SyntaxKind::TypeParameterList).is_some()
    }

    pub fn base_list(&self) -> Option<BaseList> {
        child_of_kind(&self.syntax, SyntaxKind::BaseList).and_then(BaseList::cast)
    }

    /// Member declarations directly inside the class body
    pub fn members(&self) -> impl Iterator<Item = MemberDeclaration> + '_ {
        self.syntax.children().filter_map(MemberDeclaration::cast)
    }

    pub fn constructors(&self) -> impl Iterator<Item = MemberDeclaration> + '_ {
        self.members()
            .filter(|m| m.syntax().kind() == SyntaxKind::ConstructorDeclaration)
    }

    /// Classes nested at any depth below this one
    pub fn nested_classes(&self) -> impl Iterator<Item = ClassDeclaration> + '_ {
        self.syntax
            .descendants()
            .skip(1)
            .filter_map(ClassDeclaration::cast)
    }
}

ast_node!(
    /// `: Base, IInterface`
    BaseList,
    BaseList
);

impl BaseList {
    /// Names of the listed base types, generic arguments dropped
    pub fn type_names(&self) -> Vec<String> {
        self.syntax
            .children()
            .filter(|n| n.kind() == SyntaxKind::TypeRef)
            .filter_map(|n| type_ref_name(&n))
            .collect()
    }
}

/// Any declaration that can appear in a class body
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MemberDeclaration {
    syntax: SyntaxNode,
}

impl AstNode for MemberDeclaration {
    fn can_cast(kind: SyntaxKind) -> bool {
        matches!(
            kind,
            SyntaxKind::ConstructorDeclaration
                | SyntaxKind::MethodDeclaration
                | SyntaxKind::FieldDeclaration
                | SyntaxKind::PropertyDeclaration
                | SyntaxKind::ClassDeclaration
        )
    }

    fn cast(node: SyntaxNode) -> Option<Self> {
        if Self::can_cast(node.kind()) {
            Some(Self { syntax: node })
        } else {
            None
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        &self.syntax
    }
}

impl MemberDeclaration {
    pub fn modifiers(&self) -> Vec<SyntaxKind> {
        modifiers(&self.syntax)
    }

    pub fn is_static(&self) -> bool {
        self.modifiers().contains(&SyntaxKind::StaticKw)
    }

    /// Members without an access modifier default to private
    pub fn is_private(&self) -> bool {
        let modifiers = self.modifiers();
        let has_access = modifiers.iter().any(|m| {
            matches!(
                m,
                SyntaxKind::PublicKw | SyntaxKind::ProtectedKw | SyntaxKind::InternalKw
            )
        });
        !has_access
    }
}

// ============================================================================
// Statements
// ============================================================================

ast_node!(
    /// `{ statements }`
    Block,
    Block
);

impl Block {
    /// Statement nodes in source order
    pub fn statements(&self) -> impl Iterator<Item = SyntaxNode> + '_ {
        self.syntax.children().filter(|n| n.kind().is_statement())
    }

    pub fn l_brace(&self) -> Option<SyntaxToken> {
        token_of_kind(&self.syntax, SyntaxKind::LBrace)
    }

    pub fn r_brace(&self) -> Option<SyntaxToken> {
        token_of_kind(&self.syntax, SyntaxKind::RBrace)
    }
}

ast_node!(
    /// `try { } catch (E e) { } finally { }`
    TryStatement,
    TryStatement
);

impl TryStatement {
    /// The protected body
    pub fn block(&self) -> Option<Block> {
        child_of_kind(&self.syntax, SyntaxKind::Block).and_then(Block::cast)
    }

    pub fn catch_clauses(&self) -> impl Iterator<Item = CatchClause> + '_ {
        self.syntax.children().filter_map(CatchClause::cast)
    }

    pub fn finally_clause(&self) -> Option<FinallyClause> {
        child_of_kind(&self.syntax, SyntaxKind::FinallyClause).and_then(FinallyClause::cast)
    }
}

ast_node!(
    /// `catch (Type name) when (filter) { }`
    CatchClause,
    CatchClause
);

impl CatchClause {
    /// The `(Type name)` part, absent for a general `catch { }`
    pub fn declaration(&self) -> Option<SyntaxNode> {
        child_of_kind(&self.syntax, SyntaxKind::CatchDeclaration)
    }

    /// Caught exception type name
    pub fn exception_type(&self) -> Option<String> {
        self.declaration()
            .and_then(|decl| child_of_kind(&decl, SyntaxKind::TypeRef))
            .and_then(|type_ref| type_ref_name(&type_ref))
    }

    /// The `when (...)` filter
    pub fn filter(&self) -> Option<SyntaxNode> {
        child_of_kind(&self.syntax, SyntaxKind::CatchFilter)
    }

    pub fn is_filtered(&self) -> bool {
        self.filter().is_some()
    }

    pub fn block(&self) -> Option<Block> {
        child_of_kind(&self.syntax, SyntaxKind::Block).and_then(Block::cast)
    }

    /// The guarded block this handler belongs to
    pub fn try_statement(&self) -> Option<TryStatement> {
        self.syntax.parent().and_then(TryStatement::cast)
    }

    /// True if the body does nothing but `throw;`
    pub fn only_rethrows(&self) -> bool {
        let Some(block) = self.block() else {
            return false;
        };
        let mut statements = block.statements();
        match (statements.next(), statements.next()) {
            (Some(only), None) => ThrowStatement::cast(only).is_some_and(|t| t.is_bare_rethrow()),
            _ => false,
        }
    }
}

ast_node!(
    /// `finally { }`
    FinallyClause,
    FinallyClause
);

impl FinallyClause {
    pub fn block(&self) -> Option<Block> {
        child_of_kind(&self.syntax, SyntaxKind::Block).and_then(Block::cast)
    }
}

ast_node!(
    /// `throw;` or `throw expr;`
    ThrowStatement,
    ThrowStatement
);

impl ThrowStatement {
    pub fn expression(&self) -> Option<SyntaxNode> {
        self.syntax.children().find(|n| {
            matches!(
                n.kind(),
                SyntaxKind::Expression | SyntaxKind::ObjectCreationExpression
            )
        })
    }

    /// `throw;`: re-raises the caught exception unchanged
    pub fn is_bare_rethrow(&self) -> bool {
        self.expression().is_none()
    }
}

// ============================================================================
// Expressions
// ============================================================================

ast_node!(
    /// `new Type<Args>(arguments)`
    ObjectCreationExpression,
    ObjectCreationExpression
);

impl ObjectCreationExpression {
    pub fn type_name(&self) -> Option<String> {
        child_of_kind(&self.syntax, SyntaxKind::TypeRef).and_then(|t| type_ref_name(&t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::SyntaxTreeBuilder;

    fn catch_clause(filtered: bool, body: &[&str]) -> SyntaxNode {
        let mut b = SyntaxTreeBuilder::new();
        b.start_node(SyntaxKind::CatchClause);
        b.token(SyntaxKind::CatchKw, "catch");
        if filtered {
            b.start_node(SyntaxKind::CatchFilter);
            b.token(SyntaxKind::WhenKw, "when");
            b.token(SyntaxKind::LParen, "(");
            b.start_node(SyntaxKind::Expression);
            b.token(SyntaxKind::Ident, "retry");
            b.finish_node();
            b.token(SyntaxKind::RParen, ")");
            b.finish_node();
        }
        b.start_node(SyntaxKind::Block);
        b.token(SyntaxKind::LBrace, "{");
        for stmt in body {
            match *stmt {
                "throw;" => {
                    b.start_node(SyntaxKind::ThrowStatement);
                    b.token(SyntaxKind::ThrowKw, "throw");
                    b.token(SyntaxKind::Semicolon, ";");
                    b.finish_node();
                }
                "throw e;" => {
                    b.start_node(SyntaxKind::ThrowStatement);
                    b.token(SyntaxKind::ThrowKw, "throw");
                    b.token(SyntaxKind::Whitespace, " ");
                    b.start_node(SyntaxKind::Expression);
                    b.token(SyntaxKind::Ident, "e");
                    b.finish_node();
                    b.token(SyntaxKind::Semicolon, ";");
                    b.finish_node();
                }
                other => {
                    b.start_node(SyntaxKind::ExpressionStatement);
                    b.token(SyntaxKind::Ident, other);
                    b.token(SyntaxKind::Semicolon, ";");
                    b.finish_node();
                }
            }
        }
        b.token(SyntaxKind::RBrace, "}");
        b.finish_node();
        b.finish_node();
        b.finish().root()
    }

    #[test]
    fn test_only_rethrows() {
        let clause = CatchClause::cast(catch_clause(false, &["throw;"])).unwrap();
        assert!(clause.only_rethrows());
        assert!(!clause.is_filtered());
    }

    #[test]
    fn test_throw_with_expression_is_not_a_rethrow() {
        let clause = CatchClause::cast(catch_clause(false, &["throw e;"])).unwrap();
        assert!(!clause.only_rethrows());
    }

    #[test]
    fn test_extra_statements_are_not_a_rethrow() {
        let clause = CatchClause::cast(catch_clause(false, &["log", "throw;"])).unwrap();
        assert!(!clause.only_rethrows());

        let empty = CatchClause::cast(catch_clause(false, &[])).unwrap();
        assert!(!empty.only_rethrows());
    }

    #[test]
    fn test_filter_is_detected() {
        let clause = CatchClause::cast(catch_clause(true, &["throw;"])).unwrap();
        assert!(clause.is_filtered());
        assert!(clause.try_statement().is_none());
    }

    #[test]
    fn test_member_access_defaults_to_private() {
        let mut b = SyntaxTreeBuilder::new();
        b.start_node(SyntaxKind::ConstructorDeclaration);
        b.token(SyntaxKind::Ident, "Thing");
        b.start_node(SyntaxKind::ParameterList);
        b.token(SyntaxKind::LParen, "(");
        b.token(SyntaxKind::RParen, ")");
        b.finish_node();
        b.finish_node();
        let member = MemberDeclaration::cast(b.finish().root()).unwrap();
        assert!(member.is_private());
        assert!(!member.is_static());
    }
}
