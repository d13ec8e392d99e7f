//! Function dialect: standalone script functions, C-style control flow.
//!
//! Shaped like `normalize-surface-syntax::output::typescript::TypeScriptWriter`
//! — one struct owning an `output: String` buffer and an `indent: usize`
//! counter, one `write_*` method per IR shape, falling back to a textual
//! marker rather than panicking on anything the IR can't fully resolve.

use crate::ir::*;
use super::{binary_op_text, bracket_type, join_args, strip_leading_at, ObjectCreationStyle, WriterConfig};

/// Emits PowerShell functions with brace-delimited, C-style control flow.
/// Classes are flattened: each method becomes `ClassName_MethodName`, each
/// constructor becomes `New_ClassName`.
pub struct PowerShellWriter {
    pub(crate) output: String,
    pub(crate) indent: usize,
    config: WriterConfig,
    in_switch: bool,
    current_fields: Vec<String>,
    object_creation_style: ObjectCreationStyle,
}

impl PowerShellWriter {
    pub fn new() -> Self {
        Self::with_config(WriterConfig::default())
    }

    pub fn with_config(config: WriterConfig) -> Self {
        PowerShellWriter {
            output: String::new(),
            indent: 0,
            config,
            in_switch: false,
            current_fields: Vec::new(),
            object_creation_style: ObjectCreationStyle::NewObject,
        }
    }

    pub(crate) fn set_object_creation_style(&mut self, style: ObjectCreationStyle) {
        self.object_creation_style = style;
    }

    /// Field/property names in scope for the `this.`-prefix heuristic (see
    /// `write_expr`'s `IdentifierName` arm). Exposed so the type dialect can
    /// populate it too — `PowerShell5Writer::write_type` wraps this same
    /// writer for expression/statement rendering and must set the field list
    /// up itself before delegating, since it never goes through
    /// `write_type_as_functions`.
    pub(crate) fn set_current_fields(&mut self, fields: Vec<String>) {
        self.current_fields = fields;
    }

    pub(crate) fn field_names(decl: &TypeDeclaration) -> Vec<String> {
        decl.members
            .iter()
            .filter_map(|m| match m {
                Node::FieldDeclaration(f) => Some(f.name.clone()),
                Node::PropertyDeclaration(p) => Some(p.name.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn write_program(&mut self, node: &Node) -> String {
        self.output.clear();
        self.indent = 0;
        match node {
            Node::Namespace(ns) => self.write_namespace(ns),
            other => self.write_member(other),
        }
        self.output.clone()
    }

    fn write_namespace(&mut self, ns: &Namespace) {
        for using in &ns.usings {
            self.emit_line(&format!("# using {}", using.name));
        }
        if !ns.usings.is_empty() {
            self.emit_line("");
        }
        for member in &ns.members {
            self.write_member(member);
        }
    }

    fn write_member(&mut self, node: &Node) {
        match node {
            Node::ClassDeclaration(decl) => self.write_type_as_functions(decl),
            Node::InterfaceDeclaration(decl) => {
                self.emit_line(&format!("# interface {} omitted in function dialect", decl.name));
            }
            Node::MethodDeclaration(m) => self.write_method(m, None),
            other => self.write_stmt(other),
        }
    }

    fn write_type_as_functions(&mut self, decl: &TypeDeclaration) {
        self.current_fields = Self::field_names(decl);

        for member in &decl.members {
            match member {
                Node::Constructor(ctor) => self.write_constructor(ctor, &decl.name),
                Node::MethodDeclaration(m) => self.write_method(m, Some(&decl.name)),
                Node::FieldDeclaration(_) | Node::PropertyDeclaration(_) => {}
                other => self.write_stmt(other),
            }
            self.emit_line("");
        }

        self.current_fields.clear();
    }

    fn write_constructor(&mut self, ctor: &Constructor, class_name: &str) {
        self.emit_line(&format!("function New_{} {{", class_name));
        self.indent += 1;
        if !ctor.argument_list.arguments.is_empty() {
            self.emit_line("param(");
            self.indent += 1;
            let params: Vec<String> = ctor
                .argument_list
                .arguments
                .iter()
                .map(|a| self.write_expr(&a.expression))
                .collect();
            self.emit_line(&join_args(&params));
            self.indent -= 1;
            self.emit_line(")");
            self.emit_line("");
        }
        if let Some(body) = &ctor.body {
            self.write_block_statements(body);
        }
        self.indent -= 1;
        self.emit_line("}");
    }

    fn write_method(&mut self, m: &MethodDeclaration, class_name: Option<&str>) {
        if self.is_pinvoke(m) {
            self.write_pinvoke(m);
            return;
        }

        let name = match class_name {
            Some(class) => format!("{}_{}", class, m.name),
            None => m.name.clone(),
        };
        self.emit_line(&format!("function {} {{", name));
        self.indent += 1;
        if !m.parameters.is_empty() {
            self.emit_line("param(");
            self.indent += 1;
            let params: Vec<String> = m.parameters.iter().map(|p| self.write_parameter(p)).collect();
            self.emit_line(&join_args(&params));
            self.indent -= 1;
            self.emit_line(")");
            self.emit_line("");
        }
        if let Some(body) = &m.body {
            self.write_block_statements(body);
        }
        self.indent -= 1;
        self.emit_line("}");
    }

    /// `[ref] ` when a `ref`/`out` modifier is present, then the bracketed
    /// type (if any), then `$name`, per spec.md §4.3's `Parameter` rule.
    fn write_parameter(&self, param: &Parameter) -> String {
        let ref_prefix = if param.modifiers.iter().any(|m| m == "ref" || m == "out") {
            "[ref] "
        } else {
            ""
        };
        let ty_prefix = if param.ty.is_empty() {
            String::new()
        } else {
            format!("{} ", bracket_type(&param.ty))
        };
        format!("{}{}${}", ref_prefix, ty_prefix, strip_leading_at(&param.name))
    }

    fn is_pinvoke(&self, m: &MethodDeclaration) -> bool {
        m.modifiers.iter().any(|mod_| mod_ == "extern")
            && m.attributes.iter().any(|a| a.name.contains("DllImport"))
    }

    /// Interop methods are wrapped with `Add-Type -TypeDefinition`, declaring
    /// a `public static class PInvoke` that carries the verbatim C#
    /// signature (split on carriage returns and re-indented), per spec.md
    /// §6's "Attribute → P/Invoke contract". A forwarding function follows,
    /// calling `[PInvoke]::Name(...)` with the declared parameters, per
    /// spec.md §4.3's "followed by a `[PInvoke]::Name(...)` call site
    /// forwarding the parameters".
    fn write_pinvoke(&mut self, m: &MethodDeclaration) {
        self.emit_line("Add-Type -TypeDefinition @\"");
        self.indent += 1;
        self.emit_line("public static class PInvoke");
        self.emit_line("{");
        self.indent += 1;
        for line in m.original_source.split(['\r', '\n']) {
            let trimmed = line.trim();
            if !trimmed.is_empty() {
                self.emit_line(trimmed);
            }
        }
        self.indent -= 1;
        self.emit_line("}");
        self.indent -= 1;
        self.emit_line("\"@");
        self.emit_line("");

        self.emit_line(&format!("function {} {{", m.name));
        self.indent += 1;
        if !m.parameters.is_empty() {
            self.emit_line("param(");
            self.indent += 1;
            let params: Vec<String> = m.parameters.iter().map(|p| self.write_parameter(p)).collect();
            self.emit_line(&join_args(&params));
            self.indent -= 1;
            self.emit_line(")");
            self.emit_line("");
        }
        let args: Vec<String> = m.parameters.iter().map(|p| format!("${}", p.name)).collect();
        self.emit_line(&format!("[PInvoke]::{}({})", m.name, join_args(&args)));
        self.indent -= 1;
        self.emit_line("}");
    }

    fn write_block_statements(&mut self, block: &Block) {
        for stmt in &block.statements {
            self.write_stmt(stmt);
        }
    }

    /// Renders `block` in isolation at the given indent depth, leaving this
    /// writer's own buffer and indent untouched. Lets
    /// [`super::type_dialect::PowerShell5Writer`] reuse the full statement
    /// dispatch (control flow, switch fall-through suppression, `using`
    /// lowering) inside a PowerShell 5 class method body.
    pub(crate) fn render_statement_block(&mut self, block: &Block, indent: usize) -> String {
        let saved_output = std::mem::take(&mut self.output);
        let saved_indent = self.indent;
        self.indent = indent;
        self.write_block_statements(block);
        let rendered = std::mem::replace(&mut self.output, saved_output);
        self.indent = saved_indent;
        rendered
    }

    fn write_stmt(&mut self, node: &Node) {
        match node {
            Node::Block(block) => {
                self.emit_line("{");
                self.indent += 1;
                self.write_block_statements(block);
                self.indent -= 1;
                self.emit_line("}");
            }
            Node::If(if_node) => self.write_if(if_node),
            Node::For(for_node) => self.write_for(for_node),
            Node::ForEach(foreach) => self.write_foreach(foreach),
            Node::While(while_node) => self.write_while(while_node),
            Node::Switch(switch) => self.write_switch(switch),
            Node::Try(try_node) => self.write_try(try_node),
            Node::Using(using) => self.write_using(using),
            Node::Throw(expr) => match expr {
                Some(e) => self.emit_line(&format!("throw {}", self.write_expr(e))),
                None => self.emit_line("throw"),
            },
            Node::Break => {
                if !self.in_switch {
                    self.emit_line("break");
                }
            }
            Node::Continue => self.emit_line("continue"),
            Node::Return(expr) => match expr {
                Some(e) => self.emit_line(&format!("return {}", self.write_expr(e))),
                None => self.emit_line("return"),
            },
            Node::VariableDeclaration(decl) => self.write_variable_declaration(decl),
            other => {
                let text = self.write_expr(other);
                self.emit_line(&text);
            }
        }
    }

    /// Bracketed type prefix for a `VariableDeclaration`, per spec.md §4.3.
    /// C#'s `var` is an implicit-typing keyword, not a real type name, so it
    /// is never bracketed; neither is a missing type.
    fn type_prefix(ty: &str) -> String {
        if ty.is_empty() || ty == "var" {
            String::new()
        } else {
            format!("{} ", bracket_type(ty))
        }
    }

    fn write_variable_declaration(&mut self, decl: &VariableDeclaration) {
        let prefix = Self::type_prefix(&decl.ty);
        for var in &decl.variables {
            let init = var
                .initializer
                .as_ref()
                .map(|e| self.write_expr(e))
                .unwrap_or_else(|| "$null".to_string());
            self.emit_line(&format!("{}${} = {}", prefix, var.name, init));
        }
    }

    fn write_if(&mut self, if_node: &If) {
        self.emit_line(&format!("if ({}) {{", self.write_expr(&if_node.condition)));
        self.indent += 1;
        self.write_stmt_body(&if_node.body);
        self.indent -= 1;
        self.write_else(if_node.else_clause.as_deref());
    }

    fn write_else(&mut self, else_clause: Option<&ElseClause>) {
        match else_clause {
            None => self.emit_line("}"),
            Some(clause) => match &*clause.body {
                Node::If(nested) => {
                    self.emit_line(&format!("}} elseif ({}) {{", self.write_expr(&nested.condition)));
                    self.indent += 1;
                    self.write_stmt_body(&nested.body);
                    self.indent -= 1;
                    self.write_else(nested.else_clause.as_deref());
                }
                other => {
                    self.emit_line("} else {");
                    self.indent += 1;
                    self.write_stmt_body(other);
                    self.indent -= 1;
                    self.emit_line("}");
                }
            },
        }
    }

    /// A statement used as a loop/if/while body may itself be a `Block` (and
    /// so already bring its own braces) or a single bare statement; either
    /// way we only want the inner statements indented once here.
    fn write_stmt_body(&mut self, node: &Node) {
        match node {
            Node::Block(block) => self.write_block_statements(block),
            other => self.write_stmt(other),
        }
    }

    fn write_for(&mut self, for_node: &For) {
        let init = match &for_node.declaration {
            Some(decl) => decl
                .variables
                .iter()
                .map(|v| {
                    format!(
                        "${} = {}",
                        v.name,
                        v.initializer
                            .as_ref()
                            .map(|e| self.write_expr(e))
                            .unwrap_or_else(|| "$null".to_string())
                    )
                })
                .collect::<Vec<_>>()
                .join(", "),
            None => for_node
                .initializers
                .iter()
                .map(|e| self.write_expr(e))
                .collect::<Vec<_>>()
                .join(", "),
        };
        let condition = for_node
            .condition
            .as_ref()
            .map(|c| self.write_expr(c))
            .unwrap_or_default();
        let update = for_node
            .incrementors
            .iter()
            .map(|e| self.write_expr(e))
            .collect::<Vec<_>>()
            .join(", ");

        self.emit_line(&format!("for ({}; {}; {}) {{", init, condition, update));
        self.indent += 1;
        self.write_stmt_body(&for_node.statement);
        self.indent -= 1;
        self.emit_line("}");
    }

    fn write_foreach(&mut self, foreach: &ForEach) {
        self.emit_line(&format!(
            "foreach (${} in {}) {{",
            foreach.identifier,
            self.write_expr(&foreach.expression)
        ));
        self.indent += 1;
        self.write_stmt_body(&foreach.statement);
        self.indent -= 1;
        self.emit_line("}");
    }

    fn write_while(&mut self, while_node: &While) {
        self.emit_line(&format!("while ({}) {{", self.write_expr(&while_node.condition)));
        self.indent += 1;
        self.write_stmt_body(&while_node.statement);
        self.indent -= 1;
        self.emit_line("}");
    }

    fn write_switch(&mut self, switch: &Switch) {
        self.emit_line(&format!("switch ({}) {{", self.write_expr(&switch.expression)));
        self.indent += 1;
        let was_in_switch = self.in_switch;
        self.in_switch = true;
        for section in &switch.sections {
            for label in &section.labels {
                if matches!(label, Node::IdentifierName(n) if n == "default") {
                    self.emit_line("default {");
                } else {
                    self.emit_line(&format!("{} {{", self.write_expr(label)));
                }
                self.indent += 1;
                for stmt in &section.statements {
                    self.write_stmt(stmt);
                }
                // PowerShell switch clauses do not fall through; the
                // explicit C# `break` is swallowed above, and we supply our
                // own so later clauses aren't also tested.
                self.emit_line("break");
                self.indent -= 1;
                self.emit_line("}");
            }
        }
        self.in_switch = was_in_switch;
        self.indent -= 1;
        self.emit_line("}");
    }

    fn write_try(&mut self, try_node: &Try) {
        self.emit_line("try {");
        self.indent += 1;
        self.write_block_statements(&try_node.block);
        self.indent -= 1;
        for catch in &try_node.catches {
            match &catch.declaration {
                Some(decl) => self.emit_line(&format!("}} catch {} {{", bracket_type(&decl.ty))),
                None => self.emit_line("} catch {"),
            }
            self.indent += 1;
            self.write_block_statements(&catch.block);
            self.indent -= 1;
        }
        if let Some(finally) = &try_node.finally {
            self.emit_line("} finally {");
            self.indent += 1;
            self.write_block_statements(&finally.body);
            self.indent -= 1;
        }
        self.emit_line("}");
    }

    fn write_using(&mut self, using: &UsingResource) {
        let (var_name, init_expr) = match &*using.declaration {
            Node::VariableDeclaration(decl) => {
                let var = decl.variables.first();
                (
                    var.map(|v| v.name.clone()).unwrap_or_default(),
                    var.and_then(|v| v.initializer.as_deref()).map(|e| self.write_expr(e)),
                )
            }
            other => ("resource".to_string(), Some(self.write_expr(other))),
        };

        self.emit_line(&format!("${} = $null", var_name));
        self.emit_line("try {");
        self.indent += 1;
        if let Some(init) = init_expr {
            self.emit_line(&format!("${} = {}", var_name, init));
        }
        self.write_stmt_body(&using.expression);
        self.indent -= 1;
        self.emit_line("} finally {");
        self.indent += 1;
        self.emit_line(&format!("${}.Dispose()", var_name));
        self.indent -= 1;
        self.emit_line("}");
    }

    pub(crate) fn write_expr(&self, node: &Node) -> String {
        match node {
            Node::IdentifierName(name) => {
                let name = strip_leading_at(name);
                // Underscore-leading names always get `this.` (spec.md §8
                // boundary behavior); otherwise fall back to known-field
                // matching (see DESIGN.md's resolution of the §4.3/§8
                // scenario 1 contradiction).
                if self.current_fields.iter().any(|f| f == name) || name.starts_with('_') {
                    format!("$this.{}", name)
                } else {
                    format!("${}", name)
                }
            }
            Node::TypeExpression(name) => bracket_type(name),
            Node::Literal(text) => match text.as_str() {
                "true" => "$true".to_string(),
                "false" => "$false".to_string(),
                "null" => "$null".to_string(),
                other => other.to_string(),
            },
            // Single-quoted to suppress PowerShell string interpolation,
            // per spec.md §4.3; `'` is escaped by doubling.
            Node::StringConstant(s) => format!("'{}'", s.replace('\'', "''")),
            Node::TemplateStringConstant(raw) => raw.clone(),
            Node::ThisExpression => "$this".to_string(),
            Node::ParenthesizedExpression(inner) => format!("({})", self.write_expr(inner)),
            Node::Assignment(assign) => {
                format!("{} = {}", self.write_expr(&assign.left), self.write_expr(&assign.right))
            }
            Node::BinaryExpression(bin) => format!(
                "{} {} {}",
                self.write_expr(&bin.left),
                binary_op_text(bin.op),
                self.write_expr(&bin.right)
            ),
            Node::Invocation(inv) => format!(
                "{}({})",
                self.write_expr(&inv.expression),
                join_args(&self.write_argument_list(&inv.arguments))
            ),
            Node::ObjectCreation(oc) => {
                let args = join_args(&self.write_argument_list(&oc.arguments));
                match self.object_creation_style {
                    ObjectCreationStyle::NewObject if oc.arguments.arguments.is_empty() => {
                        format!("(New-Object -TypeName {})", oc.ty)
                    }
                    ObjectCreationStyle::NewObject => {
                        format!("(New-Object -TypeName {} -ArgumentList {})", oc.ty, args)
                    }
                    ObjectCreationStyle::StaticNew => format!("{}::new({})", bracket_type(&oc.ty), args),
                }
            }
            Node::ArrayCreation(items) => {
                let rendered: Vec<String> = items.iter().map(|i| self.write_expr(i)).collect();
                format!("@({})", join_args(&rendered))
            }
            Node::MemberAccess(member) => self.write_member_access(member),
            Node::ElementAccess(elem) => format!(
                "{}[{}]",
                self.write_expr(&elem.expression),
                join_args(
                    &elem
                        .arguments
                        .arguments
                        .iter()
                        .map(|a| self.write_expr(&a.expression))
                        .collect::<Vec<_>>()
                )
            ),
            Node::Cast(cast) => format!("{}{}", bracket_type(&cast.ty), self.write_expr(&cast.expression)),
            Node::VariableDeclaration(decl) => decl
                .variables
                .iter()
                .map(|v| {
                    format!(
                        "${} = {}",
                        v.name,
                        v.initializer
                            .as_ref()
                            .map(|e| self.write_expr(e))
                            .unwrap_or_else(|| "$null".to_string())
                    )
                })
                .collect::<Vec<_>>()
                .join("; "),
            Node::PostfixUnaryExpression(u) => format!("{}{}", self.write_expr(&u.operand), u.op),
            Node::PrefixUnaryExpression(u) => format!("{}{}", u.op, self.write_expr(&u.operand)),
            Node::RawCode(raw) => raw.clone(),
            Node::Unknown(text) => format!("# unsupported: {}", text),
            other => format!("# unsupported: {:?}", other),
        }
    }

    /// Deciding whether `Foo.Bar` is a static member access or an instance
    /// field read is not possible without semantic analysis, which the
    /// front end never performs (spec.md §1). A capitalized base that isn't
    /// a known field of the enclosing class is treated as a type reference,
    /// matching the common C# convention that local variables and fields
    /// are camelCase while types are PascalCase.
    fn write_member_access(&self, member: &MemberAccess) -> String {
        match &*member.expression {
            Node::TypeExpression(ty) => format!("{}::{}", bracket_type(ty), member.identifier),
            Node::IdentifierName(name)
                if looks_like_type_name(name) && !self.current_fields.contains(name) =>
            {
                format!("{}::{}", bracket_type(name), member.identifier)
            }
            other => format!("{}.{}", self.write_expr(other), member.identifier),
        }
    }

    fn write_argument_list(&self, list: &ArgumentList) -> Vec<String> {
        list.arguments.iter().map(|a| self.write_expr(&a.expression)).collect()
    }

    fn emit_line(&mut self, text: &str) {
        if text.is_empty() {
            self.output.push('\n');
            return;
        }
        self.output.push_str(&self.config.indent_unit.repeat(self.indent));
        self.output.push_str(text);
        self.output.push('\n');
    }
}

impl Default for PowerShellWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn looks_like_type_name(name: &str) -> bool {
    name.chars().next().is_some_and(|c| c.is_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(node: &Node) -> String {
        PowerShellWriter::new().write_program(node)
    }

    #[test]
    fn leading_at_is_stripped_from_identifiers_and_parameters() {
        let w = PowerShellWriter::new();
        assert_eq!(w.write_expr(&Node::ident("@class")), "$class");
        assert_eq!(
            w.write_parameter(&Parameter {
                name: "@event".into(),
                ty: "string".into(),
                modifiers: vec![],
            }),
            "[string] $event"
        );
    }

    #[test]
    fn underscore_leading_identifier_gets_this_prefix() {
        let w = PowerShellWriter::new();
        assert_eq!(w.write_expr(&Node::ident("_tmp")), "$this._tmp");
    }

    #[test]
    fn variable_is_dollar_prefixed() {
        let ns = Node::Namespace(Namespace {
            name: "N".into(),
            usings: vec![],
            members: vec![Node::MethodDeclaration(MethodDeclaration {
                name: "Go".into(),
                return_type: "void".into(),
                modifiers: vec![],
                attributes: vec![],
                parameters: vec![],
                body: Some(Block {
                    statements: vec![Node::VariableDeclaration(VariableDeclaration {
                        ty: "int".into(),
                        variables: vec![VariableDeclarator {
                            name: "x".into(),
                            initializer: Some(Box::new(Node::Literal("1".into()))),
                        }],
                    })],
                }),
                original_source: String::new(),
            })],
        });
        let out = render(&ns);
        assert!(out.contains("$x = 1"));
    }

    #[test]
    fn class_members_flatten_to_named_functions() {
        let decl = TypeDeclaration {
            name: "Greeter".into(),
            modifiers: vec!["public".into()],
            attributes: vec![],
            bases: vec![],
            members: vec![Node::MethodDeclaration(MethodDeclaration {
                name: "Greet".into(),
                return_type: "void".into(),
                modifiers: vec!["public".into()],
                attributes: vec![],
                parameters: vec![],
                body: Some(Block { statements: vec![] }),
                original_source: String::new(),
            })],
        };
        let out = render(&Node::ClassDeclaration(decl));
        assert!(out.contains("function Greeter_Greet {"));
    }

    #[test]
    fn string_constant_is_single_quoted() {
        let w = PowerShellWriter::new();
        assert_eq!(w.write_expr(&Node::StringConstant("hi".into())), "'hi'");
        assert_eq!(
            w.write_expr(&Node::StringConstant("it's".into())),
            "'it''s'"
        );
    }

    #[test]
    fn static_new_object_creation_rewrites_generic_angle_brackets() {
        let mut w = PowerShellWriter::new();
        w.set_object_creation_style(ObjectCreationStyle::StaticNew);
        let expr = Node::object_creation("List<int>", vec![]);
        assert_eq!(w.write_expr(&expr), "[List[int]]::new()");
    }

    #[test]
    fn static_member_access_uses_double_colon() {
        let expr = Node::member(Node::TypeExpression("Console".into()), "WriteLine");
        assert_eq!(PowerShellWriter::new().write_expr(&expr), "[Console]::WriteLine");
    }

    #[test]
    fn switch_default_and_sections_get_explicit_break() {
        let switch = Switch {
            expression: Box::new(Node::ident("x")),
            sections: vec![SwitchSection {
                labels: vec![Node::IdentifierName("default".into())],
                statements: vec![Node::Break],
            }],
        };
        let mut w = PowerShellWriter::new();
        w.write_stmt(&Node::Switch(switch));
        assert_eq!(w.output.matches("break").count(), 1);
        assert!(w.output.contains("default {"));
    }

    #[test]
    fn using_lowers_to_try_finally_with_predeclared_variable() {
        let using = UsingResource {
            declaration: Box::new(Node::VariableDeclaration(VariableDeclaration {
                ty: "StreamReader".into(),
                variables: vec![VariableDeclarator {
                    name: "reader".into(),
                    initializer: Some(Box::new(Node::object_creation("StreamReader", vec![]))),
                }],
            })),
            expression: Box::new(Node::block(vec![])),
        };
        let mut w = PowerShellWriter::new();
        w.write_stmt(&Node::Using(using));
        assert!(w.output.contains("$reader = $null"));
        assert!(w.output.contains("try {"));
        assert!(w.output.contains("} finally {\n    $reader.Dispose()\n}"));
    }

    #[test]
    fn pinvoke_method_wraps_original_source_and_forwards_call() {
        let m = MethodDeclaration {
            name: "MessageBox".into(),
            return_type: "int".into(),
            modifiers: vec!["public".into(), "static".into(), "extern".into()],
            attributes: vec![Attribute {
                name: "DllImport".into(),
                arguments: vec![AttributeArgument {
                    expression: Box::new(Node::StringConstant("user32.dll".into())),
                }],
            }],
            parameters: vec![Parameter {
                name: "hWnd".into(),
                ty: "IntPtr".into(),
                modifiers: vec![],
            }],
            body: None,
            original_source: "[DllImport(\"user32.dll\")]\r\npublic static extern int MessageBox(IntPtr hWnd);".into(),
        };
        let out = render(&Node::MethodDeclaration(m));
        assert!(out.contains("Add-Type -TypeDefinition @\""));
        assert!(out.contains("public static class PInvoke"));
        assert!(out.contains("public static extern int MessageBox(IntPtr hWnd);"));
        assert!(out.contains("function MessageBox {"));
        assert!(out.contains("[PInvoke]::MessageBox($hWnd)"));
    }
}
