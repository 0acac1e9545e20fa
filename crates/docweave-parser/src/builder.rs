//! Tree builder.
//!
//! Consumes source units one at a time, visiting declarations depth-first in
//! document order. Every declaration is dispatched by kind to a handler that
//! creates its element, wires it to its lexical parent, and registers or
//! queues identities with the [`ReferenceTable`]. [`TreeBuilder::finish`]
//! resolves all queued references once every unit has been added.

use log::{debug, info, trace};

use docweave_core::{
    ProjectTree,
    docs::DocBlock,
    element::{Element, ElementBody, ElementId, ElementKind},
    identity::Identity,
    index::{IndexNodeId, ProjectIndex},
    model::CodeModel,
    reference::{ReferenceTable, ResolutionStats},
};

use crate::{
    declaration,
    doc_comment::DocCommentParser,
    error::{Diagnostic, DiagnosticCollector, ErrorCode, Origin, ParseError},
    semantic::SemanticModel,
    syntax::{DeclarationSyntax, SourceUnit, SyntaxKind, TypeSyntax},
};

/// Name of the namespace holding declarations made outside of any namespace.
pub const GLOBAL_NAMESPACE: &str = "global";

type Visit = Result<(), Diagnostic>;

/// Settings that affect which units are built.
#[derive(Debug, Clone, Default)]
pub struct BuildConfig {
    excluded_projects: Vec<String>,
}

impl BuildConfig {
    pub fn new(excluded_projects: Vec<String>) -> Self {
        Self { excluded_projects }
    }

    pub fn excluded_projects(&self) -> &[String] {
        &self.excluded_projects
    }

    pub fn is_excluded(&self, project: &str) -> bool {
        self.excluded_projects.iter().any(|p| p == project)
    }
}

/// A successfully built project.
#[derive(Debug)]
pub struct BuildOutput {
    tree: ProjectTree,
    warnings: Vec<Diagnostic>,
    stats: ResolutionStats,
}

impl BuildOutput {
    pub fn tree(&self) -> &ProjectTree {
        &self.tree
    }

    pub fn into_tree(self) -> ProjectTree {
        self.tree
    }

    /// Non-fatal diagnostics collected while building.
    pub fn warnings(&self) -> &[Diagnostic] {
        &self.warnings
    }

    pub fn stats(&self) -> ResolutionStats {
        self.stats
    }
}

/// Per-declaration visit state.
#[derive(Clone, Copy)]
struct VisitContext<'a> {
    unit: &'a SourceUnit,
    semantics: &'a dyn SemanticModel,
    /// Index node of the enclosing namespace.
    node: IndexNodeId,
    /// Lexical parent; `None` outside of every namespace and type.
    parent: Option<ElementId>,
}

/// Builds a [`ProjectTree`] from source units.
#[derive(Debug)]
pub struct TreeBuilder {
    config: BuildConfig,
    model: CodeModel,
    index: ProjectIndex,
    references: ReferenceTable,
    diagnostics: DiagnosticCollector,
    units: usize,
}

impl TreeBuilder {
    pub fn new(config: BuildConfig) -> Self {
        Self {
            config,
            model: CodeModel::new(),
            index: ProjectIndex::new(),
            references: ReferenceTable::new(),
            diagnostics: DiagnosticCollector::new(),
            units: 0,
        }
    }

    /// Visits every declaration of `unit`.
    ///
    /// Units of excluded projects are skipped. Malformed declarations are
    /// reported when the build finishes; visiting carries on past them.
    pub fn add_unit(&mut self, unit: &SourceUnit, semantics: &dyn SemanticModel) {
        if self.config.is_excluded(&unit.project) {
            info!(project = unit.project.as_str(), path = unit.path.as_str(); "Skipping unit of excluded project");
            return;
        }

        info!(path = unit.path.as_str(), declarations = unit.nodes.len(); "Adding source unit");
        let ctx = VisitContext {
            unit,
            semantics,
            node: self.index.root(),
            parent: None,
        };
        for node in &unit.nodes {
            self.visit(node, ctx);
        }
        self.units += 1;
    }

    /// Resolves every queued reference and hands over the tree.
    ///
    /// # Errors
    ///
    /// Returns every collected diagnostic if any of them is an error.
    pub fn finish(self) -> Result<BuildOutput, ParseError> {
        let warnings = self.diagnostics.finish()?;
        let stats = self.references.finalize();

        info!(
            units = self.units,
            elements = self.model.len(),
            resolved = stats.resolved,
            unresolved = stats.unresolved;
            "Project tree built"
        );

        Ok(BuildOutput {
            tree: ProjectTree::new(self.model, self.index),
            warnings,
            stats,
        })
    }

    fn visit(&mut self, node: &DeclarationSyntax, ctx: VisitContext<'_>) {
        if node.kind == SyntaxKind::Unknown {
            trace!(name = node.name.as_str(); "Skipping unsupported declaration");
            return;
        }

        let owner = describe(node, ctx.unit);
        let documentation = DocCommentParser::new(
            ctx.semantics,
            &mut self.references,
            &mut self.diagnostics,
        )
        .parse(&node.doc, &owner);
        if documentation.as_ref().is_some_and(DocBlock::is_skipped) {
            debug!(declaration = owner; "Declaration skipped by documentation");
            return;
        }

        let result = match node.kind {
            SyntaxKind::Namespace | SyntaxKind::FileScopedNamespace => {
                self.visit_namespace(node, documentation, ctx)
            }
            SyntaxKind::Class => self.visit_type(node, ElementKind::Class, documentation, ctx),
            SyntaxKind::Struct => self.visit_type(node, ElementKind::Struct, documentation, ctx),
            SyntaxKind::Interface => {
                self.visit_type(node, ElementKind::Interface, documentation, ctx)
            }
            SyntaxKind::Record => self.visit_type(node, ElementKind::Record, documentation, ctx),
            SyntaxKind::Enum => self.visit_enum(node, documentation, ctx),
            SyntaxKind::Delegate => self.visit_delegate(node, documentation, ctx),
            SyntaxKind::Method => self.visit_method(node, documentation, ctx),
            SyntaxKind::Constructor => self.visit_constructor(node, documentation, ctx),
            SyntaxKind::Destructor => self.visit_destructor(node, documentation, ctx),
            SyntaxKind::Operator | SyntaxKind::ConversionOperator => {
                self.visit_operator(node, documentation, ctx)
            }
            SyntaxKind::Field => self.visit_field(node, documentation, ctx),
            SyntaxKind::Property => self.visit_property(node, documentation, ctx),
            SyntaxKind::Unknown => Ok(()),
        };

        if let Err(diagnostic) = result {
            self.diagnostics.emit(diagnostic);
        }
    }

    fn visit_namespace(
        &mut self,
        node: &DeclarationSyntax,
        documentation: Option<DocBlock>,
        ctx: VisitContext<'_>,
    ) -> Visit {
        if node.name.trim().is_empty() {
            return Err(Diagnostic::error(format!(
                "namespace declaration in {} has no name",
                ctx.unit.path
            ))
            .with_code(ErrorCode::E200)
            .with_origin(origin(node, ctx.unit))
            .with_help("the global namespace is implicit; named namespaces need a name"));
        }

        let index_node = self.index.node_for_path(ctx.node, &node.name);
        let namespace = match self.index.node(index_node).namespace() {
            Some(existing) => {
                self.model.merge_documentation(existing, documentation);
                existing
            }
            None => {
                let path = self.index.full_path(index_node);
                debug!(namespace = path.as_str(); "Creating namespace");
                let identity = Identity::plain(path.clone(), Some(path));
                let element = Element::new(
                    ElementKind::Namespace,
                    identity.clone(),
                    ElementBody::Namespace { types: Vec::new() },
                )
                .with_documentation(documentation);
                let id = self.model.insert_root(element);
                self.index.set_namespace(index_node, id);
                self.register(&identity, id);
                id
            }
        };

        let inner = VisitContext {
            node: index_node,
            parent: Some(namespace),
            ..ctx
        };
        for member in &node.members {
            self.visit(member, inner);
        }
        self.model.sort_children_by_kind(namespace);
        Ok(())
    }

    fn visit_type(
        &mut self,
        node: &DeclarationSyntax,
        kind: ElementKind,
        documentation: Option<DocBlock>,
        ctx: VisitContext<'_>,
    ) -> Visit {
        let parent = self.container(ctx);

        let partial = node
            .has_modifier("partial")
            .then(|| self.model.find_child(parent, kind, &node.name))
            .flatten();
        if let Some(existing) = partial {
            debug!(name = node.name.as_str(), kind:?; "Merging partial declaration");
            self.model.merge_documentation(existing, documentation);
            self.add_record_fields(node, kind, existing, ctx)?;
            self.visit_members(node, existing, ctx);
            return Ok(());
        }

        let owner = self.qualified_name(parent);
        let symbol = ctx.semantics.declared_symbol(node);
        let identity = declaration::type_identity(node, symbol.as_ref(), owner.as_deref());
        let element = Element::new(
            kind,
            identity.clone(),
            ElementBody::Type {
                members: Vec::new(),
            },
        )
        .with_modifiers(modifiers(node))
        .with_documentation(documentation);

        let id = self.add_child(parent, element, node, ctx)?;
        self.register(&identity, id);
        self.add_record_fields(node, kind, id, ctx)?;
        self.visit_members(node, id, ctx);
        Ok(())
    }

    fn visit_members(&mut self, node: &DeclarationSyntax, owner: ElementId, ctx: VisitContext<'_>) {
        let inner = VisitContext {
            parent: Some(owner),
            ..ctx
        };
        for member in &node.members {
            self.visit(member, inner);
        }
        self.model.sort_children_by_kind(owner);
    }

    /// Positional parameters of a record become its leading fields.
    fn add_record_fields(
        &mut self,
        node: &DeclarationSyntax,
        kind: ElementKind,
        record: ElementId,
        ctx: VisitContext<'_>,
    ) -> Visit {
        if kind != ElementKind::Record {
            return Ok(());
        }
        let owner = self.qualified_name(record);
        for parameter in &node.parameters {
            let value_type = self.usage(&parameter.ty, ctx);
            let element = Element::new(
                ElementKind::Field,
                declaration::member_identity(&parameter.name, owner.as_deref()),
                ElementBody::Field {
                    value_type,
                    names: vec![parameter.name.clone()],
                },
            )
            .with_modifiers(Some("public".to_string()));
            self.add_child(record, element, node, ctx)?;
        }
        Ok(())
    }

    fn visit_enum(
        &mut self,
        node: &DeclarationSyntax,
        documentation: Option<DocBlock>,
        ctx: VisitContext<'_>,
    ) -> Visit {
        let parent = self.container(ctx);
        let owner = self.qualified_name(parent);
        let symbol = ctx.semantics.declared_symbol(node);
        let identity = declaration::type_identity(node, symbol.as_ref(), owner.as_deref());
        let element = Element::new(
            ElementKind::Enum,
            identity.clone(),
            ElementBody::Enum {
                items: node.enum_members.clone(),
            },
        )
        .with_modifiers(modifiers(node))
        .with_documentation(documentation);

        let id = self.add_child(parent, element, node, ctx)?;
        self.register(&identity, id);
        Ok(())
    }

    fn visit_delegate(
        &mut self,
        node: &DeclarationSyntax,
        documentation: Option<DocBlock>,
        ctx: VisitContext<'_>,
    ) -> Visit {
        let return_type = self.return_type(node, ctx)?;
        let parent = self.container(ctx);
        let owner = self.qualified_name(parent);
        let symbol = ctx.semantics.declared_symbol(node);
        let identity = declaration::type_identity(node, symbol.as_ref(), owner.as_deref());
        let element = Element::new(
            ElementKind::Delegate,
            identity.clone(),
            ElementBody::Delegate {
                return_type,
                parameters: Vec::new(),
            },
        )
        .with_modifiers(modifiers(node))
        .with_documentation(documentation);

        let id = self.add_child(parent, element, node, ctx)?;
        self.register(&identity, id);
        self.add_parameters(node, id, ctx)
    }

    fn visit_method(
        &mut self,
        node: &DeclarationSyntax,
        documentation: Option<DocBlock>,
        ctx: VisitContext<'_>,
    ) -> Visit {
        let return_type = self.return_type(node, ctx)?;
        let body = ElementBody::Method {
            return_type,
            parameters: Vec::new(),
        };
        self.add_callable(node, ElementKind::Method, &node.name, body, documentation, ctx)
    }

    fn visit_constructor(
        &mut self,
        node: &DeclarationSyntax,
        documentation: Option<DocBlock>,
        ctx: VisitContext<'_>,
    ) -> Visit {
        let name = self.member_name(node, ctx);
        let body = ElementBody::Constructor {
            parameters: Vec::new(),
        };
        self.add_callable(node, ElementKind::Constructor, &name, body, documentation, ctx)
    }

    fn visit_destructor(
        &mut self,
        node: &DeclarationSyntax,
        documentation: Option<DocBlock>,
        ctx: VisitContext<'_>,
    ) -> Visit {
        let name = self.member_name(node, ctx);
        let name = if name.starts_with('~') {
            name
        } else {
            format!("~{name}")
        };
        let parent = self.container(ctx);
        let owner = self.qualified_name(parent);
        let symbol = ctx.semantics.declared_symbol(node);
        let identity = declaration::callable_identity(node, &name, symbol.as_ref(), owner.as_deref());
        // Destructors carry no modifiers.
        let element = Element::new(ElementKind::Destructor, identity, ElementBody::Destructor)
            .with_documentation(documentation);
        self.add_child(parent, element, node, ctx)?;
        Ok(())
    }

    /// Regular operators keep their return type. Conversion operators are
    /// named after their target type and have none.
    fn visit_operator(
        &mut self,
        node: &DeclarationSyntax,
        documentation: Option<DocBlock>,
        ctx: VisitContext<'_>,
    ) -> Visit {
        let (name, return_type) = if node.kind == SyntaxKind::ConversionOperator {
            let target = node
                .declared_type
                .as_ref()
                .or(node.return_type.as_ref())
                .map(|ty| ty.text.clone())
                .unwrap_or_else(|| node.name.clone());
            (target, None)
        } else {
            let return_type = node.return_type.as_ref().map(|ty| self.usage(ty, ctx));
            (node.name.clone(), return_type)
        };
        let body = ElementBody::Operator {
            return_type,
            parameters: Vec::new(),
        };
        self.add_callable(node, ElementKind::Operator, &name, body, documentation, ctx)
    }

    fn visit_field(
        &mut self,
        node: &DeclarationSyntax,
        documentation: Option<DocBlock>,
        ctx: VisitContext<'_>,
    ) -> Visit {
        let names = if node.variables.is_empty() {
            vec![node.name.clone()]
        } else {
            node.variables.clone()
        };
        let value_type = self.value_type(node, &names.join(", "), ctx)?;
        let parent = self.container(ctx);
        let owner = self.qualified_name(parent);
        let identity = Identity::plain(
            names.join(", "),
            owner.map(|owner| format!("{owner}.{}", names.join(","))),
        );
        let element = Element::new(
            ElementKind::Field,
            identity,
            ElementBody::Field { value_type, names },
        )
        .with_modifiers(modifiers(node))
        .with_documentation(documentation);
        self.add_child(parent, element, node, ctx)?;
        Ok(())
    }

    fn visit_property(
        &mut self,
        node: &DeclarationSyntax,
        documentation: Option<DocBlock>,
        ctx: VisitContext<'_>,
    ) -> Visit {
        let value_type = self.value_type(node, &node.name, ctx)?;
        let parent = self.container(ctx);
        let owner = self.qualified_name(parent);
        let element = Element::new(
            ElementKind::Property,
            declaration::member_identity(&node.name, owner.as_deref()),
            ElementBody::Property {
                value_type,
                accessors: node.accessors.clone(),
            },
        )
        .with_modifiers(modifiers(node))
        .with_documentation(documentation);
        self.add_child(parent, element, node, ctx)?;
        Ok(())
    }

    fn add_callable(
        &mut self,
        node: &DeclarationSyntax,
        kind: ElementKind,
        name: &str,
        body: ElementBody,
        documentation: Option<DocBlock>,
        ctx: VisitContext<'_>,
    ) -> Visit {
        let parent = self.container(ctx);
        let owner = self.qualified_name(parent);
        let symbol = ctx.semantics.declared_symbol(node);
        let identity = declaration::callable_identity(node, name, symbol.as_ref(), owner.as_deref());
        let element = Element::new(kind, identity, body)
            .with_modifiers(modifiers(node))
            .with_documentation(documentation);
        let id = self.add_child(parent, element, node, ctx)?;
        self.add_parameters(node, id, ctx)
    }

    fn add_parameters(
        &mut self,
        node: &DeclarationSyntax,
        owner: ElementId,
        ctx: VisitContext<'_>,
    ) -> Visit {
        let owner_name = self.qualified_name(owner);
        for parameter in &node.parameters {
            let value_type = self.usage(&parameter.ty, ctx);
            let element = Element::new(
                ElementKind::Field,
                declaration::member_identity(&parameter.name, owner_name.as_deref()),
                ElementBody::Field {
                    value_type,
                    names: vec![parameter.name.clone()],
                },
            );
            self.model
                .add_parameter(owner, element)
                .map_err(|err| misplaced(err.to_string(), node, ctx.unit))?;
        }
        Ok(())
    }

    fn add_child(
        &mut self,
        parent: ElementId,
        element: Element,
        node: &DeclarationSyntax,
        ctx: VisitContext<'_>,
    ) -> Result<ElementId, Diagnostic> {
        let kind = element.kind();
        let id = self
            .model
            .add_child(parent, element)
            .map_err(|err| misplaced(err.to_string(), node, ctx.unit))?;
        debug!(name = self.model[id].name(), kind:?; "Added declaration");
        Ok(id)
    }

    /// Registers a declaration and queues its own identity, so it resolves
    /// to itself.
    fn register(&mut self, identity: &Identity, id: ElementId) {
        self.references.register(identity, id);
        self.references.enqueue(identity);
    }

    /// Creates and queues the identity of a type usage.
    fn usage(&mut self, ty: &TypeSyntax, ctx: VisitContext<'_>) -> Identity {
        let identity = declaration::usage_identity(ty, ctx.semantics);
        self.references.enqueue(&identity);
        identity
    }

    fn return_type(&mut self, node: &DeclarationSyntax, ctx: VisitContext<'_>) -> Result<Identity, Diagnostic> {
        match &node.return_type {
            Some(ty) => Ok(self.usage(ty, ctx)),
            None => Err(Diagnostic::error(format!(
                "{} `{}` has no return type",
                kind_label(node.kind),
                node.name
            ))
            .with_code(ErrorCode::E202)
            .with_origin(origin(node, ctx.unit))
            .with_help("export `returnType`, using `void` when nothing is returned")),
        }
    }

    fn value_type(
        &mut self,
        node: &DeclarationSyntax,
        name: &str,
        ctx: VisitContext<'_>,
    ) -> Result<Identity, Diagnostic> {
        match &node.declared_type {
            Some(ty) => Ok(self.usage(ty, ctx)),
            None => Err(Diagnostic::error(format!(
                "{} `{name}` has no type",
                kind_label(node.kind)
            ))
            .with_code(ErrorCode::E201)
            .with_origin(origin(node, ctx.unit))
            .with_help("export the declared `type` of the member")),
        }
    }

    /// The lexical parent, or the global namespace outside of every
    /// namespace.
    fn container(&mut self, ctx: VisitContext<'_>) -> ElementId {
        match ctx.parent {
            Some(parent) => parent,
            None => self.global_namespace(),
        }
    }

    fn global_namespace(&mut self) -> ElementId {
        let root = self.index.root();
        if let Some(global) = self.index.node(root).namespace() {
            return global;
        }
        debug!("Creating global namespace");
        let element = Element::new(
            ElementKind::Namespace,
            Identity::plain(GLOBAL_NAMESPACE, None),
            ElementBody::Namespace { types: Vec::new() },
        );
        let id = self.model.insert_root(element);
        self.index.set_namespace(root, id);
        id
    }

    fn qualified_name(&self, id: ElementId) -> Option<String> {
        self.model[id].declaration().qualified_name().map(str::to_string)
    }

    /// Constructor and destructor names default to their type's name.
    fn member_name(&self, node: &DeclarationSyntax, ctx: VisitContext<'_>) -> String {
        if !node.name.is_empty() {
            return node.name.clone();
        }
        ctx.parent
            .map(|parent| self.model[parent].name().to_string())
            .unwrap_or_default()
    }
}

fn modifiers(node: &DeclarationSyntax) -> Option<String> {
    (!node.modifiers.is_empty()).then(|| node.modifiers.join(" "))
}

fn kind_label(kind: SyntaxKind) -> &'static str {
    match kind {
        SyntaxKind::Field => "field",
        SyntaxKind::Property => "property",
        SyntaxKind::Delegate => "delegate",
        _ => "method",
    }
}

fn describe(node: &DeclarationSyntax, unit: &SourceUnit) -> String {
    format!("`{}` ({})", node.name, origin(node, unit))
}

fn origin(node: &DeclarationSyntax, unit: &SourceUnit) -> Origin {
    let origin = Origin::new(unit.path.as_str());
    match node.location {
        Some(location) => origin.at(location.line, location.column),
        None => origin,
    }
}

fn misplaced(message: String, node: &DeclarationSyntax, unit: &SourceUnit) -> Diagnostic {
    Diagnostic::error(message)
        .with_code(ErrorCode::E203)
        .with_origin(origin(node, unit))
}
