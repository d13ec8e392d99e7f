//! Translates C#-family source text into PowerShell source text.
//!
//! ```text
//!  C# source ──(tree-sitter-c-sharp)──▶ concrete tree
//!                                           │
//!                                     visitor::visit
//!                                           ▼
//!                                        ir::Node
//!                                           │
//!                          ┌────────────────┴────────────────┐
//!                          ▼                                 ▼
//!              writer::function::PowerShellWriter   writer::type_dialect::PowerShell5Writer
//!                 (standalone functions,                (class/interface/enum
//!                  C-style control flow)                 declarations, PS 5.0+)
//! ```
//!
//! This mirrors the shape `normalize-surface-syntax` uses for its own
//! surface-to-surface translation: a `Reader` stage that narrows a concrete
//! tree down to a shared IR, and one `Writer` implementation per output
//! dialect. Unlike that crate there is exactly one front end here, so the
//! registry indirection is dropped in favor of a single [`transpile`]
//! entry point and an explicit [`Dialect`] choice.

pub mod error;
pub mod ir;
pub mod visitor;
pub mod writer;

pub use error::TranspileError;
pub use writer::WriterConfig;

use std::fs;
use std::path::Path;

/// Where the C# source comes from.
pub enum Source<'a> {
    Text(&'a str),
    Path(&'a Path),
}

/// Which PowerShell surface to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// Standalone script functions, C-style control flow.
    Function,
    /// PowerShell 5.0+ `class`/`interface` declarations.
    Type,
}

impl Default for Dialect {
    fn default() -> Self {
        Dialect::Function
    }
}

/// Translates `source` and either writes the result to `output` or returns
/// it, depending on whether `output` is given. No output is written if
/// translation fails.
#[tracing::instrument(skip(source))]
pub fn transpile(
    source: Source<'_>,
    output: Option<&Path>,
    dialect: Dialect,
) -> Result<Option<String>, TranspileError> {
    transpile_with_config(source, output, dialect, WriterConfig::default())
}

/// As [`transpile`], with an explicit [`WriterConfig`] (e.g. a non-default
/// indent unit).
pub fn transpile_with_config(
    source: Source<'_>,
    output: Option<&Path>,
    dialect: Dialect,
    config: WriterConfig,
) -> Result<Option<String>, TranspileError> {
    let owned_text;
    let text: &str = match source {
        Source::Text(text) => text,
        Source::Path(path) => {
            owned_text = fs::read_to_string(path).map_err(|source| TranspileError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            &owned_text
        }
    };

    let root = visitor::visit(text)?;

    let rendered = match dialect {
        Dialect::Function => writer::function::PowerShellWriter::with_config(config).write_program(&root),
        Dialect::Type => writer::type_dialect::PowerShell5Writer::with_config(config).write_program(&root),
    };

    match output {
        Some(path) => {
            fs::write(path, &rendered).map_err(|source| TranspileError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            Ok(None)
        }
        None => Ok(Some(rendered)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::*;

    fn function_dialect(source: &str) -> String {
        transpile(Source::Text(source), None, Dialect::Function)
            .unwrap()
            .unwrap()
    }

    fn type_dialect(source: &str) -> String {
        transpile(Source::Text(source), None, Dialect::Type)
            .unwrap()
            .unwrap()
    }

    #[test]
    fn default_dialect_is_function() {
        assert_eq!(Dialect::default(), Dialect::Function);
    }

    #[test]
    fn end_to_end_empty_class_becomes_no_functions() {
        let out = function_dialect("class Empty {}");
        assert!(!out.contains("function"));
    }

    #[test]
    fn end_to_end_method_with_if_else() {
        let out = function_dialect(
            "class C { void Go(int x) { if (x > 0) { return; } else { return; } } }",
        );
        assert!(out.contains("function C_Go {"));
        assert!(out.contains("if ($x -gt 0) {"));
        assert!(out.contains("} else {"));
    }

    #[test]
    fn end_to_end_foreach_and_invocation() {
        let out = function_dialect(
            "class C { void Go() { foreach (var item in items) { Console.WriteLine(item); } } }",
        );
        assert!(out.contains("foreach ($item in $items) {"));
        assert!(out.contains("[Console]::WriteLine($item)"));
    }

    #[test]
    fn end_to_end_try_catch_finally() {
        let out = function_dialect(
            "class C { void Go() { try { DoWork(); } catch (Exception e) { Log(); } finally { Cleanup(); } } }",
        );
        assert!(out.contains("try {"));
        assert!(out.contains("} catch [Exception] {"));
        assert!(out.contains("} finally {"));
    }

    #[test]
    fn end_to_end_type_dialect_emits_class_with_typed_method() {
        let out = type_dialect("class C { public int Add(int a) { return a; } }");
        assert!(out.contains("class C {"));
        assert!(out.contains("[int] Add([int] $a) {"));
    }

    #[test]
    fn end_to_end_object_creation_differs_by_dialect() {
        let source = "class C { void Go() { var x = new Widget(); } }";
        assert!(function_dialect(source).contains("(New-Object -TypeName Widget)"));
        assert!(type_dialect(source).contains("[Widget]::new()"));
    }

    #[test]
    fn end_to_end_object_creation_with_args_differs_by_dialect() {
        let source = "class C { void Go() { var x = new Foo(1, 2); } }";
        assert!(function_dialect(source)
            .contains("(New-Object -TypeName Foo -ArgumentList 1, 2)"));
        assert!(type_dialect(source).contains("[Foo]::new(1, 2)"));
    }

    #[test]
    fn parse_failure_is_the_only_error_kind_surfaced() {
        let err = transpile(Source::Text("class {{{"), None, Dialect::Function).unwrap_err();
        assert!(matches!(err, TranspileError::ParseFailure(_)));
    }

    #[test]
    fn end_to_end_explicitly_typed_local_gets_bracketed_type() {
        let out = function_dialect("class C { void Go() { int x = 1; var y = 2; } }");
        assert!(out.contains("[int] $x = 1"));
        assert!(out.contains("$y = 2"));
        assert!(!out.contains("[var]"));
    }

    #[test]
    fn end_to_end_operator_rewrite_uses_this_prefix_for_known_fields() {
        let out = function_dialect(
            "class C { int a; int b; int c; void Go() { if (a == b) { c = 1; } } }",
        );
        assert!(out.contains("if ($this.a -eq $this.b)"));
        assert!(out.contains("$this.c = 1"));
    }

    #[test]
    fn end_to_end_cast_with_generic_rewrites_angle_brackets() {
        let out = function_dialect(
            "class C { object x; void Go() { var y = (List<int>)x; } }",
        );
        assert!(out.contains("[List[int]]$this.x"));
    }

    #[test]
    fn end_to_end_using_resource_lowers_to_try_finally() {
        let out = function_dialect(
            "class C { void Go() { using (var s = new S()) { s.Go(); } } }",
        );
        assert!(out.contains("$s = $null"));
        assert!(out.contains("try {"));
        assert!(out.contains("$s = (New-Object -TypeName S)"));
        assert!(out.contains("$s.Go()"));
        assert!(out.contains("} finally {\n        $s.Dispose()\n    }"));
    }

    #[test]
    fn end_to_end_method_parameter_has_bracketed_type() {
        let out = function_dialect("class C { void Go(int x, ref string y) { } }");
        assert!(out.contains("param(\n        [int] $x, [ref] [string] $y\n    )"));
    }

    #[test]
    fn end_to_end_class_with_attribute_and_abstract_method() {
        let out = type_dialect(
            "[Cmdlet(VerbsCommunications.Send, \"Greeting\", SupportPaging = true)] \
             public abstract class Node { abstract void Go(); }",
        );
        assert!(out.contains("[Cmdlet(VerbsCommunications.Send, \"Greeting\""));
        assert!(out.contains("class Node {"));
        assert!(out.contains("hidden Go() {"));
        assert!(!out.contains("[void]"));
        assert!(out.contains("throw [NotImplementedException]"));
    }

    /// A small class with a constructor, a loop, and a switch, rendered
    /// against a hand-built IR tree so the expected text can be verified by
    /// inspection rather than via a stored snapshot (see SPEC_FULL.md §8).
    #[test]
    fn composite_fixture_constructor_loop_and_switch() {
        let program = Node::Namespace(Namespace {
            name: String::new(),
            usings: vec![],
            members: vec![Node::ClassDeclaration(TypeDeclaration {
                name: "Greeter".into(),
                modifiers: vec!["public".into()],
                attributes: vec![],
                bases: vec![],
                members: vec![
                    Node::Constructor(Constructor {
                        identifier: "Greeter".into(),
                        argument_list: ArgumentList::from_exprs(vec![Node::ident("name")]),
                        body: Some(Block { statements: vec![] }),
                    }),
                    Node::MethodDeclaration(MethodDeclaration {
                        name: "Run".into(),
                        return_type: "void".into(),
                        modifiers: vec!["public".into()],
                        attributes: vec![],
                        parameters: vec![],
                        body: Some(Block {
                            statements: vec![Node::For(For {
                                declaration: Some(VariableDeclaration {
                                    ty: "int".into(),
                                    variables: vec![VariableDeclarator {
                                        name: "i".into(),
                                        initializer: Some(Box::new(Node::Literal("0".into()))),
                                    }],
                                }),
                                initializers: vec![],
                                condition: Some(Box::new(Node::binary(
                                    Node::ident("i"),
                                    BinaryOp::LessThan,
                                    Node::Literal("3".into()),
                                ))),
                                incrementors: vec![Node::PostfixUnaryExpression(UnaryExpression {
                                    op: "++".into(),
                                    operand: Box::new(Node::ident("i")),
                                })],
                                statement: Box::new(Node::block(vec![Node::Switch(Switch {
                                    expression: Box::new(Node::ident("i")),
                                    sections: vec![
                                        SwitchSection {
                                            labels: vec![Node::Literal("0".into())],
                                            statements: vec![Node::Break],
                                        },
                                        SwitchSection {
                                            labels: vec![Node::IdentifierName("default".into())],
                                            statements: vec![Node::Break],
                                        },
                                    ],
                                })])),
                            })],
                        }),
                        original_source: String::new(),
                    }),
                ],
            })],
        });

        let rendered = writer::function::PowerShellWriter::new().write_program(&program);

        let expected = "\
function New_Greeter {
    param(
        $name
    )

}

function Greeter_Run {
    for ($i = 0; $i -lt 3; $i++) {
        switch ($i) {
            0 {
                break
            }
            default {
                break
            }
        }
    }
}

";

        assert_eq!(rendered, expected);
    }
}
