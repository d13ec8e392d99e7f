//! PowerShell 5 (type) dialect: `class`/`interface` declarations.
//!
//! Composition over inheritance: a `PowerShell5Writer` wraps a
//! [`PowerShellWriter`] and reuses it for everything statement- and
//! expression-shaped (control flow, `using` lowering, switch fall-through
//! suppression, the `$`/`this.` identifier rules), since none of that
//! changes between dialects. Only the outer declaration shape — `class`
//! bodies, typed method signatures, `[Type]::new(...)` construction, and
//! attribute argument rendering — is dialect-specific and lives here.

use crate::ir::*;
use super::function::PowerShellWriter;
use super::{bracket_type, join_args, strip_leading_at, ObjectCreationStyle, WriterConfig};

pub struct PowerShell5Writer {
    inner: PowerShellWriter,
    output: String,
    indent: usize,
}

impl PowerShell5Writer {
    pub fn new() -> Self {
        Self::with_config(WriterConfig::default())
    }

    pub fn with_config(config: WriterConfig) -> Self {
        let mut inner = PowerShellWriter::with_config(config);
        inner.set_object_creation_style(ObjectCreationStyle::StaticNew);
        PowerShell5Writer {
            inner,
            output: String::new(),
            indent: 0,
        }
    }

    pub fn write_program(&mut self, node: &Node) -> String {
        self.output.clear();
        self.indent = 0;
        match node {
            Node::Namespace(ns) => {
                if !ns.name.is_empty() {
                    self.emit_line(&format!("# module {}", ns.name));
                }
                for using in &ns.usings {
                    self.emit_line(&format!("using namespace {}", using.name));
                }
                if !ns.usings.is_empty() {
                    self.emit_line("");
                }
                for member in &ns.members {
                    self.write_member(member);
                }
            }
            other => self.write_member(other),
        }
        self.output.clone()
    }

    fn write_member(&mut self, node: &Node) {
        match node {
            Node::ClassDeclaration(decl) => self.write_type(decl, "class"),
            Node::InterfaceDeclaration(decl) => self.write_type(decl, "interface"),
            // A bare top-level method has no enclosing class; the function
            // dialect's own flattening already covers that shape.
            Node::MethodDeclaration(_) => {
                let rendered = PowerShellWriter::new().write_program(node);
                self.output.push_str(&rendered);
            }
            _ => {}
        }
    }

    fn write_type(&mut self, decl: &TypeDeclaration, keyword: &str) {
        if !decl.modifiers.is_empty() {
            self.emit_line(&format!("# Class Modifiers: {}", decl.modifiers.join(", ")));
        }
        for attr in &decl.attributes {
            let line = self.write_attribute(attr);
            self.emit_line(&line);
        }
        let header = if decl.bases.is_empty() {
            format!("{} {} {{", keyword, decl.name)
        } else {
            format!("{} {} : {} {{", keyword, decl.name, decl.bases.join(", "))
        };
        self.emit_line(&header);
        self.indent += 1;

        self.inner.set_current_fields(PowerShellWriter::field_names(decl));

        let is_interface = keyword == "interface";
        for member in &decl.members {
            match member {
                Node::FieldDeclaration(f) => self.write_field(f),
                Node::PropertyDeclaration(p) => self.write_property(p),
                Node::Constructor(ctor) if !is_interface => self.write_constructor(ctor, &decl.name),
                Node::MethodDeclaration(m) => self.write_method(m, is_interface),
                _ => {}
            }
            self.emit_line("");
        }

        self.inner.set_current_fields(Vec::new());
        self.indent -= 1;
        self.emit_line("}");
    }

    /// `hidden`/`static` prefixing per spec.md §4.4: `hidden` when `public`
    /// is absent from the modifier set, `static` when present. Shared by
    /// methods, properties, fields, and (implicitly) constructors.
    fn hidden_static_prefix(modifiers: &[String]) -> String {
        let mut prefix = String::new();
        if !modifiers.iter().any(|m| m == "public") {
            prefix.push_str("hidden ");
        }
        if modifiers.iter().any(|m| m == "static") {
            prefix.push_str("static ");
        }
        prefix
    }

    fn write_modifier_comment(&mut self, modifiers: &[String]) {
        if !modifiers.is_empty() {
            self.emit_line(&format!("# Modifiers: {}", modifiers.join(", ")));
        }
    }

    fn not_implemented_body(&mut self, name: &str) {
        self.indent += 1;
        self.emit_line(&format!("throw [NotImplementedException]\"{} is not implemented\"", name));
        self.indent -= 1;
    }

    /// Bracketed return-type prefix, per spec.md §4.4: omitted entirely for
    /// `void`, since PowerShell methods with no return type annotation are
    /// already implicitly void.
    fn return_type_prefix(ty: &str) -> String {
        if ty == "void" {
            String::new()
        } else {
            format!("{} ", bracket_type(ty))
        }
    }

    fn write_field(&mut self, field: &FieldDeclaration) {
        self.write_modifier_comment(&field.modifiers);
        let prefix = Self::hidden_static_prefix(&field.modifiers);
        self.emit_line(&format!("{}{} ${}", prefix, bracket_type(&field.ty), strip_leading_at(&field.name)));
    }

    fn write_property(&mut self, prop: &PropertyDeclaration) {
        self.write_modifier_comment(&prop.modifiers);
        let prefix = Self::hidden_static_prefix(&prop.modifiers);
        self.emit_line(&format!("{}{} ${}", prefix, bracket_type(&prop.ty), strip_leading_at(&prop.name)));
    }

    fn write_constructor(&mut self, ctor: &Constructor, class_name: &str) {
        self.emit_line("# Constructor");
        let params: Vec<String> = ctor
            .argument_list
            .arguments
            .iter()
            .map(|a| self.inner.write_expr(&a.expression))
            .collect();
        self.emit_line(&format!("{}({}) {{", class_name, join_args(&params)));
        match &ctor.body {
            Some(body) => {
                self.indent += 1;
                let rendered = self.inner.render_statement_block(body, 0);
                self.emit_rendered_block(&rendered);
                self.indent -= 1;
            }
            None => self.not_implemented_body(class_name),
        }
        self.emit_line("}");
    }

    fn write_method(&mut self, m: &MethodDeclaration, is_interface: bool) {
        let exactly_public_or_public_static = match m.modifiers.as_slice() {
            [a] => a == "public",
            [a, b] => (a == "public" && b == "static") || (a == "static" && b == "public"),
            _ => false,
        };
        if !exactly_public_or_public_static {
            self.write_modifier_comment(&m.modifiers);
        }
        for attr in &m.attributes {
            let line = self.write_attribute(attr);
            self.emit_line(&line);
        }
        // Interface members are implicitly public in C#; the hidden/static
        // rule only applies to concrete class members.
        let prefix = if is_interface {
            String::new()
        } else {
            Self::hidden_static_prefix(&m.modifiers)
        };
        let params: Vec<String> = m
            .parameters
            .iter()
            .map(|p| format!("{} ${}", bracket_type(&p.ty), strip_leading_at(&p.name)))
            .collect();
        let signature = format!(
            "{}{}{}({})",
            prefix,
            Self::return_type_prefix(&m.return_type),
            m.name,
            join_args(&params)
        );

        if is_interface {
            self.emit_line(&format!("{};", signature));
            return;
        }

        self.emit_line(&format!("{} {{", signature));
        match &m.body {
            Some(body) => {
                self.indent += 1;
                let rendered = self.inner.render_statement_block(body, 0);
                self.emit_rendered_block(&rendered);
                self.indent -= 1;
            }
            None => self.not_implemented_body(&m.name),
        }
        self.emit_line("}");
    }

    /// `render_statement_block` returns text indented as if at depth 0;
    /// re-indent each of its lines to this writer's current depth before
    /// splicing it in, so nested control flow still lines up visually.
    fn emit_rendered_block(&mut self, rendered: &str) {
        for line in rendered.lines() {
            if line.is_empty() {
                self.output.push('\n');
            } else {
                self.output.push_str(&"    ".repeat(self.indent));
                self.output.push_str(line);
                self.output.push('\n');
            }
        }
    }

    fn write_attribute(&self, attr: &Attribute) -> String {
        if attr.arguments.is_empty() {
            format!("[{}()]", attr.name)
        } else {
            let args: Vec<String> = attr
                .arguments
                .iter()
                .map(|a| self.write_attribute_expr(&a.expression))
                .collect();
            format!("[{}({})]", attr.name, join_args(&args))
        }
    }

    /// Attribute argument lists are a grammar position, not a runtime
    /// expression: the open question of whether they should suppress `$`
    /// and `this.` is resolved yes, see DESIGN.md.
    fn write_attribute_expr(&self, node: &Node) -> String {
        match node {
            Node::IdentifierName(name) => name.clone(),
            Node::TypeExpression(name) => name.clone(),
            Node::MemberAccess(member) => {
                format!("{}.{}", self.write_attribute_expr(&member.expression), member.identifier)
            }
            Node::ThisExpression => "this".to_string(),
            other => self.inner.write_expr(other),
        }
    }

    fn emit_line(&mut self, text: &str) {
        if text.is_empty() {
            self.output.push('\n');
            return;
        }
        self.output.push_str(&"    ".repeat(self.indent));
        self.output.push_str(text);
        self.output.push('\n');
    }
}

impl Default for PowerShell5Writer {
    fn default() -> Self {
        Self::new()
    }
}
