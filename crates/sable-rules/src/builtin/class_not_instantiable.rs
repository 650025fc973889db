//! Classes that can never be instantiated
//!
//! A class whose constructors are all private is dead unless something
//! inside it creates instances or exposes the type: a non-private static
//! member, a nested class deriving from it, or a `new ClassName(...)` in
//! its own body.

use sable_core::syntax::ast::{AstNode, ClassDeclaration, ObjectCreationExpression};
use sable_core::{Diagnostic, RuleCategory, RuleDescriptor, Severity, SyntaxKind, SyntaxNode};

/// Rule ID for non-instantiable class detection
pub const RULE_ID: &str = "S3453";

pub const TITLE: &str = "Classes should not have only \"private\" constructors";

/// `{0}` is the class name
pub const MESSAGE: &str = "Class '{0}' can't be instantiated; make its constructor 'public'.";

pub fn descriptor() -> RuleDescriptor {
    RuleDescriptor::structural(RULE_ID, TITLE)
        .with_message(MESSAGE)
        .with_category(RuleCategory::Design)
        .with_severity(Severity::Major)
}

/// Report classes that cannot be instantiated, at their name
pub fn check(root: &SyntaxNode, rule: &RuleDescriptor) -> Vec<Diagnostic> {
    root.descendants()
        .filter_map(ClassDeclaration::cast)
        .filter_map(|class| {
            let name_token = class.name_token()?;
            let name = name_token.text().to_string();
            if !is_never_instantiated(&class, &name) {
                return None;
            }
            Some(Diagnostic::new(
                &rule.id,
                rule.render_message(&[name.as_str()]),
                name_token.text_range(),
                rule.severity,
            ))
        })
        .collect()
}

fn is_never_instantiated(class: &ClassDeclaration, name: &str) -> bool {
    let constructors: Vec<_> = class
        .constructors()
        .filter(|ctor| !ctor.is_static())
        .collect();
    if constructors.is_empty() || !constructors.iter().all(|ctor| ctor.is_private()) {
        return false;
    }

    let exposes_static_member = class.members().any(|member| {
        matches!(
            member.syntax().kind(),
            SyntaxKind::MethodDeclaration | SyntaxKind::PropertyDeclaration | SyntaxKind::FieldDeclaration
        ) && member.is_static()
            && !member.is_private()
    });
    if exposes_static_member {
        return false;
    }

    let derived_inside = class.nested_classes().any(|nested| {
        nested
            .base_list()
            .is_some_and(|bases| bases.type_names().iter().any(|base| base == name))
    });
    if derived_inside {
        return false;
    }

    !class
        .syntax()
        .descendants()
        .filter_map(ObjectCreationExpression::cast)
        .any(|creation| creation.type_name().as_deref() == Some(name))
}
