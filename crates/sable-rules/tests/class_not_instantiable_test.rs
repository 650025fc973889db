//! Classes with only private constructors

use sable_rules::Analyzer;
use sable_test_utils::{extract_ranges, parse_fixture};

const FIXTURE: &str = r#"using System.Collections.Generic;

namespace Tests.Diagnostics
{
    public class Class0
    {
        public void M() { }
    }

    public class [|Class1|] // Noncompliant
    {
        private Class1() { }
    }
    public sealed class [|Class1b|] // Noncompliant
    {
        private Class1b() { }
        private Class1b(int i) { }
        public void M() { }
    }

    public class Class2 // Compliant, exposes a static factory
    {
        private Class2() { }

        public static void M() { }
    }

    public sealed class Class3
    {
        private Class3() { }

        public void M() { }
        public static Class3 instance => new Class3();
    }

    public sealed class Class4
    {
        public void M() { }
    }

    public class Class6 // Compliant, derived inside
    {
        private Class6() { }

        public class Intermediate
        {
            public class [|Nested|] : Class6 // Noncompliant
            {
                private Nested()
                {

                }
            }
        }
    }
    public class MyClassGeneric<T>
    {
        private MyClassGeneric()
        {

        }
        public class Nested : MyClassGeneric<int> { }
    }

    public class MyClassGeneric2<T>
    {
        private MyClassGeneric2()
        {

        }
        public object Create()
        {
            return new MyClassGeneric2<int>();
        }
    }
}
"#;

fn class_diagnostics(source: &str) -> Vec<sable_core::Diagnostic> {
    Analyzer::with_builtin_rules()
        .unwrap()
        .analyze(&parse_fixture(source))
        .into_iter()
        .filter(|d| d.rule_id == "S3453")
        .collect()
}

#[test]
fn test_reports_exactly_the_marked_classes() {
    let (source, expected) = extract_ranges(FIXTURE);
    let found: Vec<_> = class_diagnostics(&source)
        .iter()
        .map(|d| d.range())
        .collect();
    assert_eq!(found, expected);
}

#[test]
fn test_message_names_the_class() {
    let messages: Vec<_> = class_diagnostics("class Hidden { Hidden() { } }")
        .into_iter()
        .map(|d| d.message)
        .collect();
    insta::assert_snapshot!(
        messages.join("\n"),
        @"Class 'Hidden' can't be instantiated; make its constructor 'public'."
    );
}

#[test]
fn test_static_constructor_does_not_count() {
    assert!(class_diagnostics("class Registry { static Registry() { } }").is_empty());
}

#[test]
fn test_protected_or_internal_constructor_is_accessible() {
    assert!(class_diagnostics("class A { protected A() { } }").is_empty());
    assert!(class_diagnostics("class B { internal B() { } }").is_empty());
}

#[test]
fn test_private_static_member_does_not_expose() {
    let found = class_diagnostics(
        "class Cache { private Cache() { } private static Cache shared = null; }",
    );
    assert_eq!(found.len(), 1);
}

#[test]
fn test_attributes_do_not_hide_the_name() {
    let (source, expected) =
        extract_ranges("[Serializable]\npublic class [|Frozen|] { private Frozen() { } }");
    let found: Vec<_> = class_diagnostics(&source).iter().map(|d| d.range()).collect();
    assert_eq!(found, expected);
}
