//! Fixture parser for a C# subset
//!
//! Builds a `SyntaxTree` with the node shapes the rule engine expects. It is
//! lenient: anything it does not understand is kept as plain tokens in the
//! enclosing node, so `parse_fixture(src).text() == src` always holds.
//!
//! Trivia is only consumed once the next real token is known to belong to
//! the node being built. Every node therefore starts and ends with a
//! non-trivia token and whitespace between nodes stays in the parent.

use sable_core::{SyntaxKind, SyntaxTree, SyntaxTreeBuilder};

use crate::lexer::{FixtureToken, lex};

/// Parse a fixture source into a syntax tree
///
/// # Example
///
/// ```rust,ignore
/// use sable_test_utils::parse_fixture;
///
/// let tree = parse_fixture("try { Run(); } catch { throw; }");
/// assert_eq!(tree.text(), "try { Run(); } catch { throw; }");
/// ```
pub fn parse_fixture(source: &str) -> SyntaxTree {
    let tokens = lex(source);
    let mut parser = Parser::new(&tokens);
    parser.parse_compilation_unit();
    parser.finish()
}

/// Token stream parser
struct Parser<'t, 'a> {
    tokens: &'t [FixtureToken<'a>],
    pos: usize,
    builder: SyntaxTreeBuilder,
}

impl<'t, 'a> Parser<'t, 'a> {
    fn new(tokens: &'t [FixtureToken<'a>]) -> Self {
        Self {
            tokens,
            pos: 0,
            builder: SyntaxTreeBuilder::new(),
        }
    }

    fn finish(self) -> SyntaxTree {
        self.builder.finish()
    }

    // ------------------------------------------------------------------
    // Declarations
    // ------------------------------------------------------------------

    fn parse_compilation_unit(&mut self) {
        self.builder.start_node(SyntaxKind::CompilationUnit);
        while self.peek().is_some() {
            self.parse_item();
        }
        self.eat_trivia();
        self.builder.finish_node();
    }

    /// Namespace-level item: using, namespace, type or top-level statement
    fn parse_item(&mut self) {
        match self.peek() {
            Some(SyntaxKind::UsingKw) => self.parse_using(),
            Some(SyntaxKind::NamespaceKw) => self.parse_namespace(),
            Some(kind) if kind.is_modifier() || is_type_keyword(kind) || kind == SyntaxKind::LBracket => {
                self.parse_member()
            }
            _ => self.parse_statement(),
        }
    }

    fn parse_using(&mut self) {
        self.start_node(SyntaxKind::UsingDirective);
        self.bump();
        while !matches!(
            self.peek(),
            None | Some(SyntaxKind::Semicolon | SyntaxKind::LBrace | SyntaxKind::RBrace)
        ) {
            self.bump();
        }
        self.eat(SyntaxKind::Semicolon);
        self.builder.finish_node();
    }

    fn parse_namespace(&mut self) {
        self.start_node(SyntaxKind::NamespaceDeclaration);
        self.bump();
        while matches!(self.peek(), Some(SyntaxKind::Ident | SyntaxKind::Dot)) {
            self.bump();
        }
        if self.eat(SyntaxKind::LBrace) {
            loop {
                match self.peek() {
                    None => break,
                    Some(SyntaxKind::RBrace) => {
                        self.bump();
                        break;
                    }
                    _ => self.parse_item(),
                }
            }
        } else {
            self.eat(SyntaxKind::Semicolon);
        }
        self.builder.finish_node();
    }

    /// Attributes, modifiers, then a type or member declaration
    fn parse_member(&mut self) {
        self.eat_trivia();
        let checkpoint = self.builder.checkpoint();
        let mut consumed = self.skip_attributes();
        while self.peek().is_some_and(SyntaxKind::is_modifier) {
            self.bump();
            consumed = true;
        }

        match self.peek() {
            Some(SyntaxKind::ClassKw | SyntaxKind::StructKw) => self.parse_class_rest(checkpoint),
            Some(SyntaxKind::Ident) if self.peek_nth(1) == Some(SyntaxKind::LParen) => {
                self.parse_constructor_rest(checkpoint)
            }
            Some(kind) if is_type_start(kind) => self.parse_typed_member_rest(checkpoint),
            _ if !consumed => self.bump(),
            _ => {}
        }
    }

    /// `[Attr(...)]` lists are kept as plain tokens
    fn skip_attributes(&mut self) -> bool {
        let mut consumed = false;
        while self.peek() == Some(SyntaxKind::LBracket) {
            self.bump_balanced(SyntaxKind::LBracket, SyntaxKind::RBracket);
            consumed = true;
        }
        consumed
    }

    fn parse_class_rest(&mut self, checkpoint: rowan::Checkpoint) {
        self.builder
            .start_node_at(checkpoint, SyntaxKind::ClassDeclaration);
        self.bump();
        self.eat(SyntaxKind::Ident);

        if self.peek() == Some(SyntaxKind::Lt) {
            self.parse_type_parameter_list();
        }
        if self.peek() == Some(SyntaxKind::Colon) {
            self.parse_base_list();
        }
        // generic constraints
        while !matches!(
            self.peek(),
            None | Some(SyntaxKind::LBrace | SyntaxKind::RBrace | SyntaxKind::Semicolon)
        ) {
            self.bump();
        }

        if self.eat(SyntaxKind::LBrace) {
            loop {
                match self.peek() {
                    None => break,
                    Some(SyntaxKind::RBrace) => {
                        self.bump();
                        break;
                    }
                    _ => self.parse_member(),
                }
            }
        } else {
            self.eat(SyntaxKind::Semicolon);
        }
        self.builder.finish_node();
    }

    fn parse_type_parameter_list(&mut self) {
        self.start_node(SyntaxKind::TypeParameterList);
        self.bump();
        loop {
            match self.peek() {
                None | Some(SyntaxKind::LBrace) => break,
                Some(SyntaxKind::Gt) => {
                    self.bump();
                    break;
                }
                _ => self.bump(),
            }
        }
        self.builder.finish_node();
    }

    fn parse_base_list(&mut self) {
        self.start_node(SyntaxKind::BaseList);
        self.bump();
        loop {
            match self.peek() {
                Some(kind) if is_type_start(kind) => self.parse_type(),
                Some(SyntaxKind::Comma) => self.bump(),
                _ => break,
            }
        }
        self.builder.finish_node();
    }

    fn parse_constructor_rest(&mut self, checkpoint: rowan::Checkpoint) {
        self.builder
            .start_node_at(checkpoint, SyntaxKind::ConstructorDeclaration);
        self.bump();
        self.parse_parameter_list();
        if self.eat(SyntaxKind::Colon) {
            if matches!(self.peek(), Some(SyntaxKind::BaseKw | SyntaxKind::ThisKw)) {
                self.bump();
            }
            if self.peek() == Some(SyntaxKind::LParen) {
                self.parse_argument_list();
            }
        }
        self.parse_member_body();
        self.builder.finish_node();
    }

    /// Method, property or field: all start with a type and a name
    fn parse_typed_member_rest(&mut self, checkpoint: rowan::Checkpoint) {
        self.parse_type();
        self.eat(SyntaxKind::Ident);

        match self.peek() {
            Some(SyntaxKind::LParen | SyntaxKind::Lt) => {
                self.builder
                    .start_node_at(checkpoint, SyntaxKind::MethodDeclaration);
                if self.peek() == Some(SyntaxKind::Lt) {
                    self.parse_type_parameter_list();
                }
                self.parse_parameter_list();
                while !matches!(
                    self.peek(),
                    None | Some(
                        SyntaxKind::LBrace
                            | SyntaxKind::RBrace
                            | SyntaxKind::FatArrow
                            | SyntaxKind::Semicolon
                    )
                ) {
                    self.bump();
                }
                self.parse_member_body();
            }
            Some(SyntaxKind::LBrace) => {
                self.builder
                    .start_node_at(checkpoint, SyntaxKind::PropertyDeclaration);
                self.bump_balanced(SyntaxKind::LBrace, SyntaxKind::RBrace);
                if self.eat(SyntaxKind::Equals) {
                    self.parse_expression();
                    self.eat(SyntaxKind::Semicolon);
                }
            }
            Some(SyntaxKind::FatArrow) => {
                self.builder
                    .start_node_at(checkpoint, SyntaxKind::PropertyDeclaration);
                self.parse_member_body();
            }
            _ => {
                self.builder
                    .start_node_at(checkpoint, SyntaxKind::FieldDeclaration);
                loop {
                    if self.eat(SyntaxKind::Equals) {
                        self.parse_expression();
                    }
                    if self.eat(SyntaxKind::Comma) {
                        self.eat(SyntaxKind::Ident);
                        continue;
                    }
                    break;
                }
                self.eat(SyntaxKind::Semicolon);
            }
        }
        self.builder.finish_node();
    }

    /// `( ... )` kept as plain tokens
    fn parse_parameter_list(&mut self) {
        if self.peek() != Some(SyntaxKind::LParen) {
            return;
        }
        self.start_node(SyntaxKind::ParameterList);
        self.bump_balanced(SyntaxKind::LParen, SyntaxKind::RParen);
        self.builder.finish_node();
    }

    /// Block, expression body or `;`
    fn parse_member_body(&mut self) {
        match self.peek() {
            Some(SyntaxKind::LBrace) => self.parse_block(),
            Some(SyntaxKind::FatArrow) => {
                self.bump();
                self.parse_expression();
                self.eat(SyntaxKind::Semicolon);
            }
            Some(SyntaxKind::Semicolon) => self.bump(),
            _ => {}
        }
    }

    /// `Name.Qualified<Args>[]`
    fn parse_type(&mut self) {
        self.start_node(SyntaxKind::TypeRef);
        self.bump();
        while self.peek() == Some(SyntaxKind::Dot) && self.peek_nth(1) == Some(SyntaxKind::Ident) {
            self.bump();
            self.bump();
        }
        if self.peek() == Some(SyntaxKind::Lt) {
            self.bump();
            loop {
                match self.peek() {
                    Some(SyntaxKind::Gt) => {
                        self.bump();
                        break;
                    }
                    Some(SyntaxKind::Comma) => self.bump(),
                    Some(kind) if is_type_start(kind) => self.parse_type(),
                    _ => break,
                }
            }
        }
        while self.peek() == Some(SyntaxKind::LBracket) && self.peek_nth(1) == Some(SyntaxKind::RBracket) {
            self.bump();
            self.bump();
        }
        if self.at_text("?") {
            self.bump();
        }
        self.builder.finish_node();
    }

    // ------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------

    fn parse_statement(&mut self) {
        match self.peek() {
            Some(SyntaxKind::LBrace) => self.parse_block(),
            Some(SyntaxKind::TryKw) => self.parse_try(),
            Some(SyntaxKind::ThrowKw) => self.parse_keyword_statement(SyntaxKind::ThrowStatement),
            Some(SyntaxKind::ReturnKw) => self.parse_keyword_statement(SyntaxKind::ReturnStatement),
            Some(kind) if kind.is_modifier() || is_type_keyword(kind) => self.parse_member(),
            // stray closers and empty statements stay plain tokens
            Some(
                SyntaxKind::Semicolon
                | SyntaxKind::RParen
                | SyntaxKind::RBracket
                | SyntaxKind::RBrace
                | SyntaxKind::Comma,
            ) => self.bump(),
            Some(_) => {
                self.start_node(SyntaxKind::ExpressionStatement);
                if !self.parse_expression() {
                    self.bump();
                }
                self.eat(SyntaxKind::Semicolon);
                self.builder.finish_node();
            }
            None => {}
        }
    }

    fn parse_block(&mut self) {
        self.start_node(SyntaxKind::Block);
        self.bump();
        loop {
            match self.peek() {
                None => break,
                Some(SyntaxKind::RBrace) => {
                    self.bump();
                    break;
                }
                _ => self.parse_statement(),
            }
        }
        self.builder.finish_node();
    }

    fn parse_try(&mut self) {
        self.start_node(SyntaxKind::TryStatement);
        self.bump();
        if self.peek() == Some(SyntaxKind::LBrace) {
            self.parse_block();
        }
        while self.peek() == Some(SyntaxKind::CatchKw) {
            self.parse_catch();
        }
        if self.peek() == Some(SyntaxKind::FinallyKw) {
            self.start_node(SyntaxKind::FinallyClause);
            self.bump();
            if self.peek() == Some(SyntaxKind::LBrace) {
                self.parse_block();
            }
            self.builder.finish_node();
        }
        self.builder.finish_node();
    }

    fn parse_catch(&mut self) {
        self.start_node(SyntaxKind::CatchClause);
        self.bump();

        if self.peek() == Some(SyntaxKind::LParen) {
            self.start_node(SyntaxKind::CatchDeclaration);
            self.bump();
            if self.peek().is_some_and(is_type_start) {
                self.parse_type();
            }
            self.eat(SyntaxKind::Ident);
            self.eat(SyntaxKind::RParen);
            self.builder.finish_node();
        }

        if self.peek() == Some(SyntaxKind::WhenKw) {
            self.start_node(SyntaxKind::CatchFilter);
            self.bump();
            if self.eat(SyntaxKind::LParen) {
                self.parse_expression();
                self.eat(SyntaxKind::RParen);
            }
            self.builder.finish_node();
        }

        if self.peek() == Some(SyntaxKind::LBrace) {
            self.parse_block();
        }
        self.builder.finish_node();
    }

    /// `throw expr?;` and `return expr?;`
    fn parse_keyword_statement(&mut self, kind: SyntaxKind) {
        self.start_node(kind);
        self.bump();
        self.parse_expression();
        self.eat(SyntaxKind::Semicolon);
        self.builder.finish_node();
    }

    // ------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------

    /// Flat token run up to the enclosing terminator; returns false if empty
    fn parse_expression(&mut self) -> bool {
        if self.at_expression_end(0) {
            return false;
        }

        self.start_node(SyntaxKind::Expression);
        let mut depth = 0usize;
        while !self.at_expression_end(depth) {
            match self.peek() {
                Some(SyntaxKind::NewKw) => self.parse_object_creation(),
                Some(SyntaxKind::LParen | SyntaxKind::LBracket) => {
                    depth += 1;
                    self.bump();
                }
                Some(SyntaxKind::RParen | SyntaxKind::RBracket) => {
                    depth = depth.saturating_sub(1);
                    self.bump();
                }
                _ => self.bump(),
            }
        }
        self.builder.finish_node();
        true
    }

    fn at_expression_end(&self, depth: usize) -> bool {
        match self.peek() {
            None => true,
            Some(SyntaxKind::Semicolon | SyntaxKind::LBrace | SyntaxKind::RBrace) => true,
            Some(SyntaxKind::Comma | SyntaxKind::RParen | SyntaxKind::RBracket) => depth == 0,
            _ => false,
        }
    }

    /// `new Type<Args>(arguments) { initializer }`
    fn parse_object_creation(&mut self) {
        self.start_node(SyntaxKind::ObjectCreationExpression);
        self.bump();
        if self.peek().is_some_and(is_type_start) {
            self.parse_type();
        }
        if self.peek() == Some(SyntaxKind::LParen) {
            self.parse_argument_list();
        }
        if self.peek() == Some(SyntaxKind::LBrace) {
            self.bump_balanced(SyntaxKind::LBrace, SyntaxKind::RBrace);
        }
        self.builder.finish_node();
    }

    fn parse_argument_list(&mut self) {
        self.start_node(SyntaxKind::ArgumentList);
        self.bump();
        loop {
            match self.peek() {
                None | Some(SyntaxKind::LBrace | SyntaxKind::RBrace | SyntaxKind::Semicolon) => break,
                Some(SyntaxKind::RParen) => {
                    self.bump();
                    break;
                }
                Some(SyntaxKind::Comma) => self.bump(),
                _ => {
                    if !self.parse_expression() {
                        self.bump();
                    }
                }
            }
        }
        self.builder.finish_node();
    }

    // ------------------------------------------------------------------
    // Token helpers
    // ------------------------------------------------------------------

    /// Kind of the n-th upcoming non-trivia token
    fn peek_nth(&self, n: usize) -> Option<SyntaxKind> {
        self.tokens[self.pos..]
            .iter()
            .filter(|t| !t.kind.is_trivia())
            .nth(n)
            .map(|t| t.kind)
    }

    fn peek(&self) -> Option<SyntaxKind> {
        self.peek_nth(0)
    }

    fn at_text(&self, text: &str) -> bool {
        self.tokens[self.pos..]
            .iter()
            .find(|t| !t.kind.is_trivia())
            .is_some_and(|t| t.text == text)
    }

    /// Add pending trivia to the current node
    fn eat_trivia(&mut self) {
        while let Some(token) = self.tokens.get(self.pos) {
            if !token.kind.is_trivia() {
                break;
            }
            self.builder.token(token.kind, token.text);
            self.pos += 1;
        }
    }

    /// Add pending trivia and the next real token to the current node
    fn bump(&mut self) {
        self.eat_trivia();
        if let Some(token) = self.tokens.get(self.pos) {
            self.builder.token(token.kind, token.text);
            self.pos += 1;
        }
    }

    fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.peek() == Some(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Bump a bracketed run including nested pairs of the same bracket
    fn bump_balanced(&mut self, open: SyntaxKind, close: SyntaxKind) {
        let mut depth = 0usize;
        while let Some(kind) = self.peek() {
            self.bump();
            if kind == open {
                depth += 1;
            } else if kind == close {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    break;
                }
            }
        }
    }

    /// Trivia goes to the parent, then the node opens on a real token
    fn start_node(&mut self, kind: SyntaxKind) {
        self.eat_trivia();
        self.builder.start_node(kind);
    }
}

fn is_type_keyword(kind: SyntaxKind) -> bool {
    matches!(kind, SyntaxKind::ClassKw | SyntaxKind::StructKw)
}

fn is_type_start(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::Ident | SyntaxKind::VoidKw | SyntaxKind::VarKw
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{assert_lossless, assert_nodes_trimmed, first_node, nodes_of_kind};
    use sable_core::syntax::ast::{AstNode, CatchClause, ClassDeclaration, TryStatement};

    const SAMPLE: &str = r#"using System;

namespace Demo
{
    // helper class
    public sealed class Worker : Base, IDisposable
    {
        private Worker() { }

        public static Worker Create() => new Worker();

        private int count = 0;

        public string Name { get; set; }

        public void Run()
        {
            try
            {
                Step(); // first
            }
            catch (InvalidOperationException e) when (e.Message != null)
            {
                throw;
            }
            catch
            {
                throw;
            }
            finally
            {
                Done();
            }
        }
    }
}
"#;

    #[test]
    fn test_sample_is_lossless_and_trimmed() {
        let tree = assert_lossless(SAMPLE);
        assert_nodes_trimmed(&tree);
    }

    #[test]
    fn test_class_shape() {
        let tree = parse_fixture(SAMPLE);
        let class = ClassDeclaration::cast(first_node(&tree, SyntaxKind::ClassDeclaration)).unwrap();
        assert_eq!(class.name().as_deref(), Some("Worker"));
        assert_eq!(
            class.base_list().unwrap().type_names(),
            vec!["Base".to_string(), "IDisposable".to_string()]
        );

        let kinds: Vec<_> = class.members().map(|m| m.syntax().kind()).collect();
        assert_eq!(
            kinds,
            vec![
                SyntaxKind::ConstructorDeclaration,
                SyntaxKind::MethodDeclaration,
                SyntaxKind::FieldDeclaration,
                SyntaxKind::PropertyDeclaration,
                SyntaxKind::MethodDeclaration,
            ]
        );
        assert_eq!(nodes_of_kind(&tree, SyntaxKind::ObjectCreationExpression).len(), 1);
    }

    #[test]
    fn test_try_shape() {
        let tree = parse_fixture(SAMPLE);
        let try_stmt = TryStatement::cast(first_node(&tree, SyntaxKind::TryStatement)).unwrap();
        let catches: Vec<CatchClause> = try_stmt.catch_clauses().collect();
        assert_eq!(catches.len(), 2);
        assert!(catches[0].is_filtered());
        assert_eq!(catches[0].exception_type().as_deref(), Some("InvalidOperationException"));
        assert!(catches[1].only_rethrows());
        assert!(try_stmt.finally_clause().is_some());
        assert_eq!(try_stmt.block().unwrap().statements().count(), 1);
    }

    #[test]
    fn test_top_level_statements() {
        let tree = assert_lossless("try { Run(); } catch { throw; }\n// done\n");
        assert_nodes_trimmed(&tree);
        let root = tree.root();
        assert_eq!(
            root.children().map(|n| n.kind()).collect::<Vec<_>>(),
            vec![SyntaxKind::TryStatement]
        );
    }

    #[test]
    fn test_garbage_is_still_lossless() {
        for source in ["}}) ;;", "class", "try catch finally", "new", "a(b[c{d", "@\"x\"\"y\""] {
            assert_lossless(source);
        }
    }

    #[test]
    fn test_generic_object_creation() {
        let tree = parse_fixture("return new MyClassGeneric2<int>();");
        let creation = first_node(&tree, SyntaxKind::ObjectCreationExpression);
        let creation =
            sable_core::syntax::ast::ObjectCreationExpression::cast(creation).unwrap();
        assert_eq!(creation.type_name().as_deref(), Some("MyClassGeneric2"));
    }
}
