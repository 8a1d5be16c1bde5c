//! Node kinds of the syntax tree
//!
//! One closed enum covers declarations, statements and expressions. The
//! resolver dispatches on these kinds; kinds without a resolution rule
//! (binary expressions, literals) are rejected with an unsupported-construct
//! error rather than guessed at.

use serde::{Deserialize, Serialize};

use super::types::{ImportDecl, TypeRef};
use super::NodeId;

/// The payload of a single tree node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    /// Root of a parsed source file.
    CompilationUnit {
        package: Option<String>,
        imports: Vec<ImportDecl>,
        types: Vec<NodeId>,
    },
    /// Class or interface declaration.
    ClassDecl {
        name: String,
        type_params: Vec<String>,
        members: Vec<NodeId>,
    },
    /// Field declaration; one syntactic type, one or more declarators.
    FieldDecl {
        ty: TypeRef,
        declarators: Vec<NodeId>,
    },
    /// Method declaration.
    MethodDecl {
        name: String,
        type_params: Vec<String>,
        params: Vec<NodeId>,
        return_ty: TypeRef,
        body: Option<NodeId>,
    },
    /// Method parameter.
    Param { name: String, ty: TypeRef },
    /// A single `name = init` declarator inside a field or local declaration.
    VarDeclarator {
        name: String,
        init: Option<NodeId>,
    },

    /// Statement block.
    Block { stmts: Vec<NodeId> },
    /// Local variable declaration statement.
    LocalDecl {
        ty: TypeRef,
        declarators: Vec<NodeId>,
    },
    /// Expression statement.
    ExprStmt { expr: NodeId },
    /// Return statement.
    Return { expr: Option<NodeId> },

    /// Bare identifier expression.
    Name { name: String },
    /// Method call, with optional scope expression: `scope.name(args)`.
    MethodCall {
        scope: Option<NodeId>,
        name: String,
        args: Vec<NodeId>,
    },
    /// Lambda expression: `(params) -> body`. Parameter types are never
    /// written; they depend on the call site.
    Lambda { params: Vec<String>, body: NodeId },
    /// Field access expression: `scope.field`.
    FieldAccess { scope: NodeId, field: String },
    /// Constructor call: `new ty(args)`.
    ObjectCreation { ty: TypeRef, args: Vec<NodeId> },
    /// Binary expression. No resolution rule is defined for these.
    Binary {
        left: NodeId,
        op: BinOp,
        right: NodeId,
    },
    /// Literal expression. No resolution rule is defined for these.
    Literal { value: LiteralKind },
}

impl NodeKind {
    /// Stable kind label, used in unsupported-construct diagnostics.
    pub fn label(&self) -> &'static str {
        match self {
            NodeKind::CompilationUnit { .. } => "compilation unit",
            NodeKind::ClassDecl { .. } => "class declaration",
            NodeKind::FieldDecl { .. } => "field declaration",
            NodeKind::MethodDecl { .. } => "method declaration",
            NodeKind::Param { .. } => "parameter",
            NodeKind::VarDeclarator { .. } => "variable declarator",
            NodeKind::Block { .. } => "block",
            NodeKind::LocalDecl { .. } => "local declaration",
            NodeKind::ExprStmt { .. } => "expression statement",
            NodeKind::Return { .. } => "return statement",
            NodeKind::Name { .. } => "name expression",
            NodeKind::MethodCall { .. } => "method call",
            NodeKind::Lambda { .. } => "lambda expression",
            NodeKind::FieldAccess { .. } => "field access",
            NodeKind::ObjectCreation { .. } => "object creation",
            NodeKind::Binary { .. } => "binary expression",
            NodeKind::Literal { .. } => "literal",
        }
    }
}

/// Binary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    Ne,
    Lt,
    Gt,
    And,
    Or,
}

/// Literal value kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LiteralKind {
    Int(i64),
    Bool(bool),
    Str(String),
    Char(char),
    Null,
}
