//! Syntax tree for the Java subset the resolver understands
//!
//! The tree is a flat arena: every node lives in one `Vec`, addressed by
//! [`NodeId`], and carries an explicit parent link. The resolver needs
//! parent navigation (a lambda is typed through its enclosing call, a
//! declarator through its enclosing field declaration), which a plain owned
//! tree cannot answer; the arena makes it a single index lookup.
//!
//! There is no parser here. Trees are produced programmatically through
//! [`AstBuilder`] or deserialized from JSON; the builder assigns parent
//! links as children are attached.

mod node;
mod span;
mod types;

pub use node::*;
pub use span::*;
pub use types::*;

use serde::{Deserialize, Serialize};

/// Index of a node in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A single arena slot: kind payload, source span, parent link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
    pub parent: Option<NodeId>,
}

/// An immutable syntax tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ast {
    nodes: Vec<Node>,
}

impl Ast {
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.node(id).kind
    }

    pub fn span(&self, id: NodeId) -> Span {
        self.node(id).span
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All node ids in arena order.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len() as u32).map(NodeId)
    }

    /// Position of `arg` among the arguments of the call `call`, if it is
    /// a direct argument of it.
    pub fn arg_position(&self, call: NodeId, arg: NodeId) -> Option<usize> {
        match self.kind(call) {
            NodeKind::MethodCall { args, .. } => args.iter().position(|a| *a == arg),
            _ => None,
        }
    }

    /// Walks ancestors of `id` (excluding `id` itself), innermost first.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let mut current = self.parent(id);
        std::iter::from_fn(move || {
            let next = current?;
            current = self.parent(next);
            Some(next)
        })
    }

    /// The nearest enclosing node matching `pred`, excluding `id` itself.
    pub fn enclosing<F>(&self, id: NodeId, pred: F) -> Option<NodeId>
    where
        F: Fn(&NodeKind) -> bool,
    {
        self.ancestors(id).find(|n| pred(self.kind(*n)))
    }
}

/// Incremental tree construction.
///
/// Children are created first; creating a parent node attaches them and
/// fixes their parent links. Attaching the same node twice is a programming
/// error and panics.
#[derive(Debug, Default)]
pub struct AstBuilder {
    nodes: Vec<Node>,
}

impl AstBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, kind: NodeKind, span: Span) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            kind,
            span,
            parent: None,
        });
        id
    }

    fn adopt(&mut self, parent: NodeId, child: NodeId) {
        let slot = &mut self.nodes[child.index()].parent;
        if let Some(existing) = slot {
            panic!("node {child} already attached to {existing}");
        }
        *slot = Some(parent);
    }

    fn adopt_all(&mut self, parent: NodeId, children: &[NodeId]) {
        for child in children {
            self.adopt(parent, *child);
        }
    }

    // -- expressions --------------------------------------------------------

    pub fn name(&mut self, name: impl Into<String>, span: Span) -> NodeId {
        self.push(NodeKind::Name { name: name.into() }, span)
    }

    pub fn method_call(
        &mut self,
        scope: Option<NodeId>,
        name: impl Into<String>,
        args: Vec<NodeId>,
        span: Span,
    ) -> NodeId {
        let id = self.push(
            NodeKind::MethodCall {
                scope,
                name: name.into(),
                args: args.clone(),
            },
            span,
        );
        if let Some(scope) = scope {
            self.adopt(id, scope);
        }
        self.adopt_all(id, &args);
        id
    }

    pub fn lambda(&mut self, params: Vec<String>, body: NodeId, span: Span) -> NodeId {
        let id = self.push(NodeKind::Lambda { params, body }, span);
        self.adopt(id, body);
        id
    }

    pub fn field_access(
        &mut self,
        scope: NodeId,
        field: impl Into<String>,
        span: Span,
    ) -> NodeId {
        let id = self.push(
            NodeKind::FieldAccess {
                scope,
                field: field.into(),
            },
            span,
        );
        self.adopt(id, scope);
        id
    }

    pub fn object_creation(&mut self, ty: TypeRef, args: Vec<NodeId>, span: Span) -> NodeId {
        let id = self.push(
            NodeKind::ObjectCreation {
                ty,
                args: args.clone(),
            },
            span,
        );
        self.adopt_all(id, &args);
        id
    }

    pub fn binary(&mut self, left: NodeId, op: BinOp, right: NodeId, span: Span) -> NodeId {
        let id = self.push(NodeKind::Binary { left, op, right }, span);
        self.adopt(id, left);
        self.adopt(id, right);
        id
    }

    pub fn literal(&mut self, value: LiteralKind, span: Span) -> NodeId {
        self.push(NodeKind::Literal { value }, span)
    }

    // -- statements ---------------------------------------------------------

    pub fn expr_stmt(&mut self, expr: NodeId, span: Span) -> NodeId {
        let id = self.push(NodeKind::ExprStmt { expr }, span);
        self.adopt(id, expr);
        id
    }

    pub fn return_stmt(&mut self, expr: Option<NodeId>, span: Span) -> NodeId {
        let id = self.push(NodeKind::Return { expr }, span);
        if let Some(expr) = expr {
            self.adopt(id, expr);
        }
        id
    }

    pub fn block(&mut self, stmts: Vec<NodeId>, span: Span) -> NodeId {
        let id = self.push(
            NodeKind::Block {
                stmts: stmts.clone(),
            },
            span,
        );
        self.adopt_all(id, &stmts);
        id
    }

    pub fn local_decl(&mut self, ty: TypeRef, declarators: Vec<NodeId>, span: Span) -> NodeId {
        let id = self.push(
            NodeKind::LocalDecl {
                ty,
                declarators: declarators.clone(),
            },
            span,
        );
        self.adopt_all(id, &declarators);
        id
    }

    pub fn var_declarator(
        &mut self,
        name: impl Into<String>,
        init: Option<NodeId>,
        span: Span,
    ) -> NodeId {
        let id = self.push(
            NodeKind::VarDeclarator {
                name: name.into(),
                init,
            },
            span,
        );
        if let Some(init) = init {
            self.adopt(id, init);
        }
        id
    }

    // -- declarations -------------------------------------------------------

    pub fn param(&mut self, name: impl Into<String>, ty: TypeRef, span: Span) -> NodeId {
        self.push(
            NodeKind::Param {
                name: name.into(),
                ty,
            },
            span,
        )
    }

    pub fn field_decl(&mut self, ty: TypeRef, declarators: Vec<NodeId>, span: Span) -> NodeId {
        let id = self.push(
            NodeKind::FieldDecl {
                ty,
                declarators: declarators.clone(),
            },
            span,
        );
        self.adopt_all(id, &declarators);
        id
    }

    pub fn method_decl(
        &mut self,
        name: impl Into<String>,
        type_params: Vec<String>,
        params: Vec<NodeId>,
        return_ty: TypeRef,
        body: Option<NodeId>,
        span: Span,
    ) -> NodeId {
        let id = self.push(
            NodeKind::MethodDecl {
                name: name.into(),
                type_params,
                params: params.clone(),
                return_ty,
                body,
            },
            span,
        );
        self.adopt_all(id, &params);
        if let Some(body) = body {
            self.adopt(id, body);
        }
        id
    }

    pub fn class_decl(
        &mut self,
        name: impl Into<String>,
        type_params: Vec<String>,
        members: Vec<NodeId>,
        span: Span,
    ) -> NodeId {
        let id = self.push(
            NodeKind::ClassDecl {
                name: name.into(),
                type_params,
                members: members.clone(),
            },
            span,
        );
        self.adopt_all(id, &members);
        id
    }

    pub fn compilation_unit(
        &mut self,
        package: Option<String>,
        imports: Vec<ImportDecl>,
        types: Vec<NodeId>,
        span: Span,
    ) -> NodeId {
        let id = self.push(
            NodeKind::CompilationUnit {
                package,
                imports,
                types: types.clone(),
            },
            span,
        );
        self.adopt_all(id, &types);
        id
    }

    pub fn finish(self) -> Ast {
        Ast { nodes: self.nodes }
    }
}
