#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SourceUnit {
    pub statements: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Class(ClassDecl),
    Function(FunctionDecl),
    Declaration(Declaration),
    ExportDefault(Expr),
    Variable(Vec<VariableDeclarator>),
    Return(Option<Expr>),
    If {
        condition: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
    },
    For {
        init: Option<ForInit>,
        condition: Option<Expr>,
        update: Option<Expr>,
        body: Box<Stmt>,
    },
    ForEach {
        binding: String,
        kind: ForEachKind,
        iterable: Expr,
        body: Box<Stmt>,
    },
    While {
        condition: Expr,
        body: Box<Stmt>,
    },
    DoWhile {
        body: Box<Stmt>,
        condition: Expr,
    },
    Switch {
        discriminant: Expr,
        cases: Vec<SwitchCase>,
    },
    Throw(Expr),
    Try {
        block: Vec<Stmt>,
        handler: Option<Vec<Stmt>>,
        finalizer: Option<Vec<Stmt>>,
    },
    Break,
    Continue,
    Block(Vec<Stmt>),
    Expression(Expr),
    Empty,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub kind: DeclarationKind,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationKind {
    Interface,
    TypeAlias,
    Enum,
    Import,
    Export,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ForInit {
    Variable(Vec<VariableDeclarator>),
    Expression(Expr),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForEachKind {
    Of,
    In,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SwitchCase {
    /// `None` for `default:`.
    pub test: Option<Expr>,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
    /// `None` for `export default class { ... }`.
    pub name: Option<String>,
    pub heritage: Vec<String>,
    pub members: Vec<ClassMember>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClassMember {
    Property(PropertyDecl),
    Method(MethodDecl),
    Accessor(AccessorDecl),
    Constructor(ConstructorDecl),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDecl {
    pub name: String,
    pub modifiers: Vec<String>,
    pub type_annotation: Option<String>,
    pub initializer: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodDecl {
    pub name: String,
    pub decorators: Vec<Decorator>,
    pub modifiers: Vec<String>,
    pub params: Vec<Parameter>,
    pub return_type: Option<String>,
    pub body: Option<Vec<Stmt>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessorKind {
    Get,
    Set,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AccessorDecl {
    pub kind: AccessorKind,
    pub name: String,
    pub params: Vec<Parameter>,
    pub body: Option<Vec<Stmt>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConstructorDecl {
    pub params: Vec<Parameter>,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub name: Option<String>,
    pub params: Vec<Parameter>,
    pub return_type: Option<String>,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Decorator {
    pub name: String,
    /// `Some` when written as a call, `@name(...)`.
    pub arguments: Option<Vec<Expr>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub type_annotation: Option<String>,
    pub optional: bool,
    pub default: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableDeclarator {
    pub name: String,
    pub type_annotation: Option<String>,
    pub initializer: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    This,
    Super,
    Identifier(String),
    Literal(String),
    Member {
        object: Box<Expr>,
        property: String,
        optional: bool,
    },
    Index {
        object: Box<Expr>,
        index: Box<Expr>,
        optional: bool,
    },
    Call {
        callee: Box<Expr>,
        arguments: Vec<Expr>,
        optional: bool,
    },
    New {
        callee: Box<Expr>,
        arguments: Vec<Expr>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Update {
        op: UpdateOp,
        operand: Box<Expr>,
    },
    Binary {
        lhs: Box<Expr>,
        op: BinaryOp,
        rhs: Box<Expr>,
    },
    Assign {
        target: Box<Expr>,
        op: AssignOp,
        value: Box<Expr>,
    },
    Conditional {
        test: Box<Expr>,
        consequent: Box<Expr>,
        alternate: Box<Expr>,
    },
    Arrow {
        params: Vec<Parameter>,
        body: ArrowBody,
    },
    Array(Vec<Expr>),
    Object(Vec<ObjectMember>),
    Spread(Box<Expr>),
    NonNull(Box<Expr>),
    As {
        expr: Box<Expr>,
        ty: String,
    },
    Paren(Box<Expr>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ArrowBody {
    Expression(Box<Expr>),
    Block(Vec<Stmt>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ObjectMember {
    Property { key: String, value: Expr },
    Shorthand(String),
    Spread(Expr),
    Method { key: String, body: Vec<Stmt> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Neg,
    Plus,
    BitNot,
    Typeof,
    Void,
    Delete,
    Await,
    PreIncrement,
    PreDecrement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOp {
    Increment,
    Decrement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Comma,
    Coalesce,
    Or,
    And,
    BitOr,
    BitXor,
    BitAnd,
    StrictEq,
    StrictNe,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    InstanceOf,
    In,
    Shl,
    Shr,
    UShr,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Pow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    Assign,
    AddAssign,
    SubAssign,
    /// Any other compound form, `*=`, `??=`, `<<=` and so on.
    Compound(BinaryOp),
}

#[derive(Debug, Clone, Copy)]
pub enum Child<'a> {
    Stmt(&'a Stmt),
    Expr(&'a Expr),
}

impl<'a> Child<'a> {
    pub fn children(self) -> Vec<Child<'a>> {
        match self {
            Child::Stmt(stmt) => stmt.children(),
            Child::Expr(expr) => expr.children(),
        }
    }
}

fn statements(body: &[Stmt]) -> impl Iterator<Item = Child<'_>> {
    body.iter().map(Child::Stmt)
}

impl Expr {
    pub fn self_member(&self) -> Option<&str> {
        match &self.kind {
            ExprKind::Member {
                object, property, ..
            } if object.kind == ExprKind::This => Some(property.as_str()),
            _ => None,
        }
    }

    /// Direct children in source order. Arrow bodies are included since they
    /// share the enclosing `this`.
    pub fn children(&self) -> Vec<Child<'_>> {
        match &self.kind {
            ExprKind::This | ExprKind::Super | ExprKind::Identifier(_) | ExprKind::Literal(_) => {
                Vec::new()
            }
            ExprKind::Member { object, .. } => vec![Child::Expr(object)],
            ExprKind::Index { object, index, .. } => vec![Child::Expr(object), Child::Expr(index)],
            ExprKind::Call {
                callee, arguments, ..
            }
            | ExprKind::New { callee, arguments } => {
                let mut children = vec![Child::Expr(callee.as_ref())];
                children.extend(arguments.iter().map(Child::Expr));
                children
            }
            ExprKind::Unary { operand, .. } | ExprKind::Update { operand, .. } => {
                vec![Child::Expr(operand)]
            }
            ExprKind::Spread(inner) | ExprKind::NonNull(inner) | ExprKind::Paren(inner) => {
                vec![Child::Expr(inner)]
            }
            ExprKind::As { expr, .. } => vec![Child::Expr(expr)],
            ExprKind::Binary { lhs, rhs, .. } => vec![Child::Expr(lhs), Child::Expr(rhs)],
            ExprKind::Assign { target, value, .. } => {
                vec![Child::Expr(target), Child::Expr(value)]
            }
            ExprKind::Conditional {
                test,
                consequent,
                alternate,
            } => vec![
                Child::Expr(test),
                Child::Expr(consequent),
                Child::Expr(alternate),
            ],
            ExprKind::Arrow { params, body } => {
                let mut children: Vec<Child> = params
                    .iter()
                    .filter_map(|p| p.default.as_ref())
                    .map(Child::Expr)
                    .collect();
                match body {
                    ArrowBody::Expression(expr) => children.push(Child::Expr(expr)),
                    ArrowBody::Block(body) => children.extend(statements(body)),
                }
                children
            }
            ExprKind::Array(items) => items.iter().map(Child::Expr).collect(),
            ExprKind::Object(members) => {
                let mut children = Vec::new();
                for member in members {
                    match member {
                        ObjectMember::Property { value, .. } | ObjectMember::Spread(value) => {
                            children.push(Child::Expr(value))
                        }
                        ObjectMember::Method { body, .. } => children.extend(statements(body)),
                        ObjectMember::Shorthand(_) => {}
                    }
                }
                children
            }
        }
    }
}

impl Stmt {
    /// Direct children in source order. Class and function declarations are
    /// scopes of their own and report none.
    pub fn children(&self) -> Vec<Child<'_>> {
        match self {
            Stmt::Class(_)
            | Stmt::Function(_)
            | Stmt::Declaration(_)
            | Stmt::Break
            | Stmt::Continue
            | Stmt::Empty => Vec::new(),
            Stmt::ExportDefault(expr) | Stmt::Expression(expr) | Stmt::Throw(expr) => {
                vec![Child::Expr(expr)]
            }
            Stmt::Return(expr) => expr.iter().map(Child::Expr).collect(),
            Stmt::Variable(declarators) => initializers(declarators).collect(),
            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                let mut children = vec![Child::Expr(condition), Child::Stmt(then_branch.as_ref())];
                children.extend(else_branch.as_deref().map(Child::Stmt));
                children
            }
            Stmt::For {
                init,
                condition,
                update,
                body,
            } => {
                let mut children = Vec::new();
                match init {
                    Some(ForInit::Variable(declarators)) => {
                        children.extend(initializers(declarators))
                    }
                    Some(ForInit::Expression(expr)) => children.push(Child::Expr(expr)),
                    None => {}
                }
                children.extend(condition.iter().map(Child::Expr));
                children.extend(update.iter().map(Child::Expr));
                children.push(Child::Stmt(body));
                children
            }
            Stmt::ForEach { iterable, body, .. } => {
                vec![Child::Expr(iterable), Child::Stmt(body)]
            }
            Stmt::While { condition, body } => vec![Child::Expr(condition), Child::Stmt(body)],
            Stmt::DoWhile { body, condition } => vec![Child::Stmt(body), Child::Expr(condition)],
            Stmt::Switch {
                discriminant,
                cases,
            } => {
                let mut children = vec![Child::Expr(discriminant)];
                for case in cases {
                    children.extend(case.test.iter().map(Child::Expr));
                    children.extend(statements(&case.body));
                }
                children
            }
            Stmt::Try {
                block,
                handler,
                finalizer,
            } => {
                let mut children: Vec<Child> = statements(block).collect();
                for body in handler.iter().chain(finalizer) {
                    children.extend(statements(body));
                }
                children
            }
            Stmt::Block(body) => statements(body).collect(),
        }
    }
}

fn initializers(declarators: &[VariableDeclarator]) -> impl Iterator<Item = Child<'_>> {
    declarators
        .iter()
        .filter_map(|d| d.initializer.as_ref())
        .map(Child::Expr)
}
