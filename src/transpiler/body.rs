use tracing::{debug, trace};

use super::ast::{AssignOp, Child, Expr, ExprKind, Stmt};
use super::model::{ArithOp, Expression, Instruction, Visibility};

fn preorder(body: &[Stmt]) -> Vec<Child<'_>> {
    let mut nodes = Vec::new();
    for stmt in body {
        push(Child::Stmt(stmt), &mut nodes);
    }
    nodes
}

fn push<'a>(node: Child<'a>, nodes: &mut Vec<Child<'a>>) {
    nodes.push(node);
    for child in node.children() {
        push(child, nodes);
    }
}

pub fn analyze(body: &[Stmt], visibility: Visibility) -> Vec<Instruction> {
    let instructions = match visibility {
        Visibility::View => analyze_view(body),
        Visibility::External => analyze_external(body),
    };
    trace!(?visibility, count = instructions.len(), "analyzed body");
    instructions
}

pub fn analyze_view(body: &[Stmt]) -> Vec<Instruction> {
    let reads = state_accesses(body);
    if reads.len() > 1 {
        debug!(
            kept = %reads[0],
            dropped = reads.len() - 1,
            "view body touches several fields, returning the first"
        );
    }
    reads.into_iter().next().map(Instruction::ReadReturn).into_iter().collect()
}

pub fn analyze_external(body: &[Stmt]) -> Vec<Instruction> {
    let mut instructions = state_writes(body);
    instructions.extend(terminal_return(body));
    instructions
}

pub fn state_accesses(body: &[Stmt]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for node in preorder(body) {
        if let Child::Expr(expr) = node {
            if let Some(name) = expr.self_member() {
                if !names.iter().any(|n| n == name) {
                    names.push(name.to_string());
                }
            }
        }
    }
    names
}

// An assignment nested in the value of another comes after its parent.
pub fn state_writes(body: &[Stmt]) -> Vec<Instruction> {
    preorder(body)
        .into_iter()
        .filter_map(|node| match node {
            Child::Expr(expr) => write_instruction(expr),
            Child::Stmt(_) => None,
        })
        .collect()
}

fn write_instruction(expr: &Expr) -> Option<Instruction> {
    let ExprKind::Assign { target, op, value } = &expr.kind else {
        return None;
    };
    let variable = target.self_member()?;

    let written = match op {
        AssignOp::AddAssign => offset(variable, ArithOp::Add, value),
        AssignOp::SubAssign => offset(variable, ArithOp::Sub, value),
        AssignOp::Assign => match value.self_member() {
            Some(source) => Expression::Read(source.to_string()),
            None => Expression::Raw(value.text.clone()),
        },
        AssignOp::Compound(_) => {
            debug!(variable, text = %expr.text, "unsupported compound assignment skipped");
            return None;
        }
    };

    Some(Instruction::Write(variable.to_string(), written))
}

fn offset(variable: &str, op: ArithOp, amount: &Expr) -> Expression {
    Expression::Binary(
        Box::new(Expression::Read(variable.to_string())),
        op,
        Box::new(Expression::Raw(amount.text.clone())),
    )
}

/// Last `return` in the body, when it returns `this.x` or a binary expression
/// whose left operand is `this.x`.
pub fn terminal_return(body: &[Stmt]) -> Option<Instruction> {
    let returned = preorder(body)
        .into_iter()
        .filter_map(|node| match node {
            Child::Stmt(Stmt::Return(value)) => Some(value),
            _ => None,
        })
        .last()?
        .as_ref()?;

    let variable = match &returned.kind {
        ExprKind::Binary { lhs, .. } => lhs.self_member(),
        _ => returned.self_member(),
    }?;

    Some(Instruction::ReadReturn(variable.to_string()))
}
