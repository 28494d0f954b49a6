use std::sync::OnceLock;

use pest::iterators::Pair;
use pest::pratt_parser::{Assoc, Op, PrattParser};
use pest::Parser;
use pest_derive::Parser;
use thiserror::Error;
use tracing::{debug, trace};

use crate::transpiler::ast::*;

#[derive(Parser)]
#[grammar = "parser/typescript.pest"]
pub struct TypeScriptParser;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("syntax error in TypeScript source\n{0}")]
    Syntax(#[from] Box<pest::error::Error<Rule>>),
    #[error("malformed {what}: `{text}`")]
    Malformed { what: &'static str, text: String },
}

pub type Result<T> = std::result::Result<T, ParseError>;

fn malformed(what: &'static str, text: &str) -> ParseError {
    ParseError::Malformed {
        what,
        text: text.to_string(),
    }
}

fn span_of(pair: &Pair<Rule>) -> Span {
    let span = pair.as_span();
    Span {
        start: span.start(),
        end: span.end(),
    }
}

fn pratt() -> &'static PrattParser<Rule> {
    static PRATT: OnceLock<PrattParser<Rule>> = OnceLock::new();
    PRATT.get_or_init(|| {
        PrattParser::new()
            .op(Op::infix(Rule::coalesce, Assoc::Left) | Op::infix(Rule::or, Assoc::Left))
            .op(Op::infix(Rule::and, Assoc::Left))
            .op(Op::infix(Rule::bit_or, Assoc::Left))
            .op(Op::infix(Rule::bit_xor, Assoc::Left))
            .op(Op::infix(Rule::bit_and, Assoc::Left))
            .op(Op::infix(Rule::strict_eq, Assoc::Left)
                | Op::infix(Rule::strict_ne, Assoc::Left)
                | Op::infix(Rule::eq, Assoc::Left)
                | Op::infix(Rule::ne, Assoc::Left))
            .op(Op::infix(Rule::lt, Assoc::Left)
                | Op::infix(Rule::le, Assoc::Left)
                | Op::infix(Rule::gt, Assoc::Left)
                | Op::infix(Rule::ge, Assoc::Left)
                | Op::infix(Rule::instance_of, Assoc::Left)
                | Op::infix(Rule::in_op, Assoc::Left))
            .op(Op::infix(Rule::shl, Assoc::Left)
                | Op::infix(Rule::shr, Assoc::Left)
                | Op::infix(Rule::ushr, Assoc::Left))
            .op(Op::infix(Rule::add, Assoc::Left) | Op::infix(Rule::sub, Assoc::Left))
            .op(Op::infix(Rule::mul, Assoc::Left)
                | Op::infix(Rule::div, Assoc::Left)
                | Op::infix(Rule::rem, Assoc::Left))
            .op(Op::infix(Rule::pow, Assoc::Right))
    })
}

pub fn parse(source: &str) -> Result<SourceUnit> {
    let mut pairs = TypeScriptParser::parse(Rule::program, source).map_err(Box::new)?;
    let program = pairs
        .next()
        .ok_or_else(|| malformed("program", source))?;

    let builder = TreeBuilder { source };
    let mut statements = Vec::new();
    for pair in program.into_inner() {
        if pair.as_rule() == Rule::EOI {
            continue;
        }
        statements.push(builder.statement(pair)?);
    }

    debug!(statements = statements.len(), "parsed source unit");
    Ok(SourceUnit { statements })
}

/// Turns pest pairs into tree nodes. Holds the source so that combined
/// expressions can recover their exact text.
struct TreeBuilder<'s> {
    source: &'s str,
}

impl<'s> TreeBuilder<'s> {
    /// Rule spans can end in skipped whitespace, which is not part of the text.
    fn node(&self, kind: ExprKind, span: Span) -> Expr {
        let text = self.source[span.start..span.end].trim_end();
        Expr {
            kind,
            span: Span {
                start: span.start,
                end: span.start + text.len(),
            },
            text: text.to_string(),
        }
    }

    fn statement(&self, pair: Pair<Rule>) -> Result<Stmt> {
        trace!(rule = ?pair.as_rule(), "statement");
        let text = pair.as_str();
        match pair.as_rule() {
            Rule::class_declaration => Ok(Stmt::Class(self.class_declaration(pair)?)),
            Rule::function_declaration => Ok(Stmt::Function(self.function_declaration(pair)?)),
            Rule::interface_declaration => Ok(declaration(pair, DeclarationKind::Interface)),
            Rule::type_alias => Ok(declaration(pair, DeclarationKind::TypeAlias)),
            Rule::enum_declaration => Ok(declaration(pair, DeclarationKind::Enum)),
            Rule::import_declaration => Ok(declaration(pair, DeclarationKind::Import)),
            Rule::export_list => Ok(declaration(pair, DeclarationKind::Export)),
            Rule::export_default => {
                let value = pair
                    .into_inner()
                    .find(|p| !matches!(p.as_rule(), Rule::kw_export | Rule::kw_default))
                    .ok_or_else(|| malformed("export", text))?;
                Ok(Stmt::ExportDefault(self.expression(value)?))
            }
            Rule::block => Ok(Stmt::Block(self.block(pair)?)),
            Rule::variable_statement => Ok(Stmt::Variable(self.variable_declarators(pair)?)),
            Rule::return_statement => {
                let value = pair
                    .into_inner()
                    .find(|p| p.as_rule() == Rule::sequence)
                    .map(|p| self.sequence(p))
                    .transpose()?;
                Ok(Stmt::Return(value))
            }
            Rule::if_statement => {
                let mut condition = None;
                let mut branches = Vec::new();
                for item in pair.into_inner() {
                    match item.as_rule() {
                        Rule::kw_if | Rule::kw_else => {}
                        Rule::sequence => condition = Some(self.sequence(item)?),
                        _ => branches.push(self.statement(item)?),
                    }
                }
                let condition = condition.ok_or_else(|| malformed("if condition", text))?;
                let mut branches = branches.into_iter();
                let then_branch = branches
                    .next()
                    .ok_or_else(|| malformed("if branch", text))?;
                Ok(Stmt::If {
                    condition,
                    then_branch: Box::new(then_branch),
                    else_branch: branches.next().map(Box::new),
                })
            }
            Rule::for_statement => {
                let mut init = None;
                let mut condition = None;
                let mut update = None;
                let mut body = None;
                for item in pair.into_inner() {
                    match item.as_rule() {
                        Rule::kw_for => {}
                        Rule::for_init => init = Some(self.for_init(item)?),
                        Rule::sequence => condition = Some(self.sequence(item)?),
                        Rule::for_update => update = Some(self.inner_sequence(item)?),
                        _ => body = Some(self.statement(item)?),
                    }
                }
                Ok(Stmt::For {
                    init,
                    condition,
                    update,
                    body: Box::new(body.ok_or_else(|| malformed("for body", text))?),
                })
            }
            Rule::for_each_statement => {
                let mut binding = None;
                let mut kind = ForEachKind::Of;
                let mut iterable = None;
                let mut body = None;
                for item in pair.into_inner() {
                    match item.as_rule() {
                        Rule::kw_for | Rule::kw_await | Rule::kw_binding => {}
                        Rule::kw_of => kind = ForEachKind::Of,
                        Rule::kw_in => kind = ForEachKind::In,
                        Rule::binding_target => binding = Some(item.as_str().to_string()),
                        Rule::sequence => iterable = Some(self.sequence(item)?),
                        _ => body = Some(self.statement(item)?),
                    }
                }
                Ok(Stmt::ForEach {
                    binding: binding.ok_or_else(|| malformed("loop binding", text))?,
                    kind,
                    iterable: iterable.ok_or_else(|| malformed("loop iterable", text))?,
                    body: Box::new(body.ok_or_else(|| malformed("loop body", text))?),
                })
            }
            Rule::while_statement => {
                let mut condition = None;
                let mut body = None;
                for item in pair.into_inner() {
                    match item.as_rule() {
                        Rule::kw_while => {}
                        Rule::sequence => condition = Some(self.sequence(item)?),
                        _ => body = Some(self.statement(item)?),
                    }
                }
                Ok(Stmt::While {
                    condition: condition.ok_or_else(|| malformed("while condition", text))?,
                    body: Box::new(body.ok_or_else(|| malformed("while body", text))?),
                })
            }
            Rule::do_while_statement => {
                let mut condition = None;
                let mut body = None;
                for item in pair.into_inner() {
                    match item.as_rule() {
                        Rule::kw_do | Rule::kw_while => {}
                        Rule::sequence => condition = Some(self.sequence(item)?),
                        _ => body = Some(self.statement(item)?),
                    }
                }
                Ok(Stmt::DoWhile {
                    body: Box::new(body.ok_or_else(|| malformed("do body", text))?),
                    condition: condition.ok_or_else(|| malformed("do condition", text))?,
                })
            }
            Rule::switch_statement => {
                let mut discriminant = None;
                let mut cases = Vec::new();
                for item in pair.into_inner() {
                    match item.as_rule() {
                        Rule::sequence => discriminant = Some(self.sequence(item)?),
                        Rule::switch_clause => cases.push(self.switch_clause(item)?),
                        _ => {}
                    }
                }
                Ok(Stmt::Switch {
                    discriminant: discriminant.ok_or_else(|| malformed("switch value", text))?,
                    cases,
                })
            }
            Rule::throw_statement => {
                let value = pair
                    .into_inner()
                    .find(|p| p.as_rule() == Rule::sequence)
                    .ok_or_else(|| malformed("throw", text))?;
                Ok(Stmt::Throw(self.sequence(value)?))
            }
            Rule::try_statement => {
                let mut block = Vec::new();
                let mut handler = None;
                let mut finalizer = None;
                for item in pair.into_inner() {
                    match item.as_rule() {
                        Rule::block => block = self.block(item)?,
                        Rule::catch_clause => handler = Some(self.clause_block(item)?),
                        Rule::finally_clause => finalizer = Some(self.clause_block(item)?),
                        _ => {}
                    }
                }
                Ok(Stmt::Try {
                    block,
                    handler,
                    finalizer,
                })
            }
            Rule::break_statement => Ok(Stmt::Break),
            Rule::continue_statement => Ok(Stmt::Continue),
            Rule::empty_statement => Ok(Stmt::Empty),
            Rule::expression_statement => {
                let value = pair
                    .into_inner()
                    .next()
                    .ok_or_else(|| malformed("expression statement", text))?;
                Ok(Stmt::Expression(self.sequence(value)?))
            }
            _ => Err(malformed("statement", text)),
        }
    }

    fn block(&self, pair: Pair<Rule>) -> Result<Vec<Stmt>> {
        pair.into_inner().map(|stmt| self.statement(stmt)).collect()
    }

    fn clause_block(&self, pair: Pair<Rule>) -> Result<Vec<Stmt>> {
        let text = pair.as_str();
        let block = pair
            .into_inner()
            .find(|p| p.as_rule() == Rule::block)
            .ok_or_else(|| malformed("clause body", text))?;
        self.block(block)
    }

    fn for_init(&self, pair: Pair<Rule>) -> Result<ForInit> {
        let text = pair.as_str();
        let first = pair
            .clone()
            .into_inner()
            .next()
            .ok_or_else(|| malformed("loop initializer", text))?;
        if first.as_rule() == Rule::sequence {
            return Ok(ForInit::Expression(self.sequence(first)?));
        }
        Ok(ForInit::Variable(self.variable_declarators(pair)?))
    }

    fn switch_clause(&self, pair: Pair<Rule>) -> Result<SwitchCase> {
        let mut case = SwitchCase {
            test: None,
            body: Vec::new(),
        };
        for item in pair.into_inner() {
            match item.as_rule() {
                Rule::kw_case | Rule::kw_default => {}
                Rule::sequence => case.test = Some(self.sequence(item)?),
                _ => case.body.push(self.statement(item)?),
            }
        }
        Ok(case)
    }

    fn class_declaration(&self, pair: Pair<Rule>) -> Result<ClassDecl> {
        let mut class = ClassDecl {
            name: None,
            heritage: Vec::new(),
            members: Vec::new(),
        };

        for item in pair.into_inner() {
            match item.as_rule() {
                Rule::identifier => class.name = Some(item.as_str().to_string()),
                Rule::heritage_clause => class.heritage.push(item.as_str().trim_end().to_string()),
                Rule::class_body => {
                    for member in item.into_inner() {
                        class.members.push(self.class_member(member)?);
                    }
                }
                _ => {}
            }
        }

        debug!(name = ?class.name, members = class.members.len(), "parsed class declaration");
        Ok(class)
    }

    fn class_member(&self, pair: Pair<Rule>) -> Result<ClassMember> {
        match pair.as_rule() {
            Rule::property_declaration => Ok(ClassMember::Property(self.property(pair)?)),
            Rule::method_declaration => Ok(ClassMember::Method(self.method(pair)?)),
            Rule::accessor_declaration => Ok(ClassMember::Accessor(self.accessor(pair)?)),
            Rule::constructor_declaration => {
                let mut constructor = ConstructorDecl {
                    params: Vec::new(),
                    body: Vec::new(),
                };
                for item in pair.into_inner() {
                    match item.as_rule() {
                        Rule::parameter_list => constructor.params = self.parameter_list(item)?,
                        Rule::block => constructor.body = self.block(item)?,
                        _ => {}
                    }
                }
                Ok(ClassMember::Constructor(constructor))
            }
            _ => Err(malformed("class member", pair.as_str())),
        }
    }

    fn property(&self, pair: Pair<Rule>) -> Result<PropertyDecl> {
        let mut property = PropertyDecl {
            name: String::new(),
            modifiers: Vec::new(),
            type_annotation: None,
            initializer: None,
        };

        for item in pair.into_inner() {
            match item.as_rule() {
                Rule::modifier => property.modifiers.push(item.as_str().to_string()),
                Rule::member_name => property.name = item.as_str().to_string(),
                Rule::type_annotation => property.type_annotation = Some(type_text(item)?),
                Rule::initializer => property.initializer = Some(self.initializer(item)?),
                _ => {}
            }
        }

        trace!(name = %property.name, ty = ?property.type_annotation, "parsed property");
        Ok(property)
    }

    fn method(&self, pair: Pair<Rule>) -> Result<MethodDecl> {
        let mut method = MethodDecl {
            name: String::new(),
            decorators: Vec::new(),
            modifiers: Vec::new(),
            params: Vec::new(),
            return_type: None,
            body: None,
        };

        for item in pair.into_inner() {
            match item.as_rule() {
                Rule::decorator => method.decorators.push(self.decorator(item)?),
                Rule::modifier => method.modifiers.push(item.as_str().to_string()),
                Rule::member_name => method.name = item.as_str().to_string(),
                Rule::parameter_list => method.params = self.parameter_list(item)?,
                Rule::type_annotation => method.return_type = Some(type_text(item)?),
                Rule::block => method.body = Some(self.block(item)?),
                _ => {}
            }
        }

        trace!(name = %method.name, decorators = method.decorators.len(), "parsed method");
        Ok(method)
    }

    fn accessor(&self, pair: Pair<Rule>) -> Result<AccessorDecl> {
        let mut accessor = AccessorDecl {
            kind: AccessorKind::Get,
            name: String::new(),
            params: Vec::new(),
            body: None,
        };

        for item in pair.into_inner() {
            match item.as_rule() {
                Rule::accessor_kind if item.as_str() == "set" => accessor.kind = AccessorKind::Set,
                Rule::member_name => accessor.name = item.as_str().to_string(),
                Rule::parameter_list => accessor.params = self.parameter_list(item)?,
                Rule::block => accessor.body = Some(self.block(item)?),
                _ => {}
            }
        }

        trace!(name = %accessor.name, kind = ?accessor.kind, "parsed accessor");
        Ok(accessor)
    }

    fn decorator(&self, pair: Pair<Rule>) -> Result<Decorator> {
        let mut decorator = Decorator {
            name: String::new(),
            arguments: None,
        };
        for item in pair.into_inner() {
            match item.as_rule() {
                Rule::decorator_name => decorator.name = item.as_str().to_string(),
                Rule::arguments => decorator.arguments = Some(self.arguments(item)?),
                _ => {}
            }
        }
        Ok(decorator)
    }

    fn function_declaration(&self, pair: Pair<Rule>) -> Result<FunctionDecl> {
        let mut function = FunctionDecl {
            name: None,
            params: Vec::new(),
            return_type: None,
            body: Vec::new(),
        };

        for item in pair.into_inner() {
            match item.as_rule() {
                Rule::identifier => function.name = Some(item.as_str().to_string()),
                Rule::parameter_list => function.params = self.parameter_list(item)?,
                Rule::type_annotation => function.return_type = Some(type_text(item)?),
                Rule::block => function.body = self.block(item)?,
                _ => {}
            }
        }

        Ok(function)
    }

    fn parameter_list(&self, pair: Pair<Rule>) -> Result<Vec<Parameter>> {
        pair.into_inner()
            .filter(|p| p.as_rule() == Rule::parameter)
            .map(|p| self.parameter(p))
            .collect()
    }

    fn parameter(&self, pair: Pair<Rule>) -> Result<Parameter> {
        let mut param = Parameter {
            name: String::new(),
            type_annotation: None,
            optional: false,
            default: None,
        };
        for item in pair.into_inner() {
            match item.as_rule() {
                Rule::binding_target => param.name = item.as_str().to_string(),
                Rule::optional_marker => param.optional = true,
                Rule::type_annotation => param.type_annotation = Some(type_text(item)?),
                Rule::initializer => param.default = Some(self.initializer(item)?),
                _ => {}
            }
        }
        Ok(param)
    }

    fn variable_declarators(&self, pair: Pair<Rule>) -> Result<Vec<VariableDeclarator>> {
        pair.into_inner()
            .filter(|p| p.as_rule() == Rule::variable_declarator)
            .map(|p| self.variable_declarator(p))
            .collect()
    }

    fn variable_declarator(&self, pair: Pair<Rule>) -> Result<VariableDeclarator> {
        let mut declarator = VariableDeclarator {
            name: String::new(),
            type_annotation: None,
            initializer: None,
        };
        for item in pair.into_inner() {
            match item.as_rule() {
                Rule::binding_target => declarator.name = item.as_str().to_string(),
                Rule::type_annotation => declarator.type_annotation = Some(type_text(item)?),
                Rule::initializer => declarator.initializer = Some(self.initializer(item)?),
                _ => {}
            }
        }
        Ok(declarator)
    }

    fn initializer(&self, pair: Pair<Rule>) -> Result<Expr> {
        let text = pair.as_str();
        let value = pair
            .into_inner()
            .next()
            .ok_or_else(|| malformed("initializer", text))?;
        self.expression(value)
    }

    fn arguments(&self, pair: Pair<Rule>) -> Result<Vec<Expr>> {
        pair.into_inner().map(|arg| self.expression(arg)).collect()
    }

    /// Comma-separated expressions fold left into `BinaryOp::Comma` nodes.
    fn sequence(&self, pair: Pair<Rule>) -> Result<Expr> {
        let text = pair.as_str();
        let mut items = pair.into_inner();
        let first = items.next().ok_or_else(|| malformed("expression", text))?;
        let mut expr = self.expression(first)?;
        for item in items {
            let rhs = self.expression(item)?;
            expr = self.binary_node(expr, BinaryOp::Comma, rhs);
        }
        Ok(expr)
    }

    fn inner_sequence(&self, pair: Pair<Rule>) -> Result<Expr> {
        let text = pair.as_str();
        let inner = pair
            .into_inner()
            .next()
            .ok_or_else(|| malformed("expression", text))?;
        self.sequence(inner)
    }

    fn expression(&self, pair: Pair<Rule>) -> Result<Expr> {
        match pair.as_rule() {
            Rule::assignment => self.assignment(pair),
            Rule::conditional => self.conditional(pair),
            Rule::arrow_function => self.arrow_function(pair),
            Rule::binary => self.binary(pair),
            Rule::sequence => self.sequence(pair),
            Rule::spread => {
                let span = span_of(&pair);
                let inner = self.inner_expression(pair, "spread")?;
                Ok(self.node(ExprKind::Spread(Box::new(inner)), span))
            }
            _ => Err(malformed("expression", pair.as_str())),
        }
    }

    fn inner_expression(&self, pair: Pair<Rule>, what: &'static str) -> Result<Expr> {
        let text = pair.as_str();
        let inner = pair
            .into_inner()
            .next()
            .ok_or_else(|| malformed(what, text))?;
        self.expression(inner)
    }

    fn assignment(&self, pair: Pair<Rule>) -> Result<Expr> {
        let text = pair.as_str();
        let mut inner = pair.into_inner();

        let target = inner
            .next()
            .ok_or_else(|| malformed("assignment target", text))?;
        let target = self.unary(target)?;
        let op = match inner.next().map(|p| p.as_str()) {
            Some("=") => AssignOp::Assign,
            Some("+=") => AssignOp::AddAssign,
            Some("-=") => AssignOp::SubAssign,
            Some(other) => AssignOp::Compound(
                compound_op(other).ok_or_else(|| malformed("assignment operator", text))?,
            ),
            None => return Err(malformed("assignment operator", text)),
        };
        let value = inner
            .next()
            .ok_or_else(|| malformed("assignment value", text))?;
        let value = self.expression(value)?;

        let span = Span {
            start: target.span.start,
            end: value.span.end,
        };
        Ok(self.node(
            ExprKind::Assign {
                target: Box::new(target),
                op,
                value: Box::new(value),
            },
            span,
        ))
    }

    fn conditional(&self, pair: Pair<Rule>) -> Result<Expr> {
        let text = pair.as_str();
        let mut inner = pair.into_inner().filter(|p| p.as_rule() != Rule::ternary_q);

        let test = inner.next().ok_or_else(|| malformed("condition", text))?;
        let test = self.binary(test)?;
        let Some(consequent) = inner.next() else {
            return Ok(test);
        };
        let consequent = self.expression(consequent)?;
        let alternate = inner
            .next()
            .ok_or_else(|| malformed("conditional branch", text))?;
        let alternate = self.expression(alternate)?;

        let span = Span {
            start: test.span.start,
            end: alternate.span.end,
        };
        Ok(self.node(
            ExprKind::Conditional {
                test: Box::new(test),
                consequent: Box::new(consequent),
                alternate: Box::new(alternate),
            },
            span,
        ))
    }

    fn arrow_function(&self, pair: Pair<Rule>) -> Result<Expr> {
        let span = span_of(&pair);
        let text = pair.as_str();
        let mut params = Vec::new();
        let mut body = None;

        for item in pair.into_inner() {
            match item.as_rule() {
                Rule::kw_async | Rule::type_annotation => {}
                Rule::arrow_params => params = self.arrow_params(item)?,
                Rule::block => body = Some(ArrowBody::Block(self.block(item)?)),
                _ => body = Some(ArrowBody::Expression(Box::new(self.expression(item)?))),
            }
        }

        let body = body.ok_or_else(|| malformed("arrow body", text))?;
        Ok(self.node(ExprKind::Arrow { params, body }, span))
    }

    fn arrow_params(&self, pair: Pair<Rule>) -> Result<Vec<Parameter>> {
        let mut params = Vec::new();
        for item in pair.into_inner() {
            match item.as_rule() {
                Rule::identifier => params.push(Parameter {
                    name: item.as_str().to_string(),
                    type_annotation: None,
                    optional: false,
                    default: None,
                }),
                Rule::parameter_list => params = self.parameter_list(item)?,
                _ => {}
            }
        }
        Ok(params)
    }

    fn binary(&self, pair: Pair<Rule>) -> Result<Expr> {
        pratt()
            .map_primary(|operand| self.unary(operand))
            .map_infix(|lhs, op, rhs| {
                let op = binary_op(&op)?;
                Ok(self.binary_node(lhs?, op, rhs?))
            })
            .parse(pair.into_inner())
    }

    fn binary_node(&self, lhs: Expr, op: BinaryOp, rhs: Expr) -> Expr {
        let span = Span {
            start: lhs.span.start,
            end: rhs.span.end,
        };
        self.node(
            ExprKind::Binary {
                lhs: Box::new(lhs),
                op,
                rhs: Box::new(rhs),
            },
            span,
        )
    }

    fn unary(&self, pair: Pair<Rule>) -> Result<Expr> {
        let text = pair.as_str();
        let mut prefixes = Vec::new();
        let mut operand = None;

        for item in pair.into_inner() {
            match item.as_rule() {
                Rule::prefix_op => {
                    let op = match item.as_str() {
                        "!" => UnaryOp::Not,
                        "-" => UnaryOp::Neg,
                        "+" => UnaryOp::Plus,
                        "~" => UnaryOp::BitNot,
                        "++" => UnaryOp::PreIncrement,
                        "--" => UnaryOp::PreDecrement,
                        "typeof" => UnaryOp::Typeof,
                        "void" => UnaryOp::Void,
                        "delete" => UnaryOp::Delete,
                        "await" => UnaryOp::Await,
                        other => return Err(malformed("prefix operator", other)),
                    };
                    prefixes.push((span_of(&item).start, op));
                }
                Rule::postfix => operand = Some(self.postfix(item)?),
                _ => {}
            }
        }

        let mut expr = operand.ok_or_else(|| malformed("operand", text))?;
        for (start, op) in prefixes.into_iter().rev() {
            let span = Span {
                start,
                end: expr.span.end,
            };
            expr = self.node(
                ExprKind::Unary {
                    op,
                    operand: Box::new(expr),
                },
                span,
            );
        }
        Ok(expr)
    }

    fn postfix(&self, pair: Pair<Rule>) -> Result<Expr> {
        let text = pair.as_str();
        let mut items = pair.into_inner();
        let primary = items.next().ok_or_else(|| malformed("primary", text))?;
        let mut expr = self.primary(primary)?;

        for suffix in items {
            expr = self.suffix(expr, suffix)?;
        }

        Ok(expr)
    }

    fn suffix(&self, expr: Expr, suffix: Pair<Rule>) -> Result<Expr> {
        let span = Span {
            start: expr.span.start,
            end: suffix.as_span().end(),
        };
        let suffix_text = suffix.as_str();
        let kind = match suffix.as_rule() {
            Rule::member_suffix => {
                let mut optional = false;
                let mut property = None;
                for item in suffix.into_inner() {
                    match item.as_rule() {
                        Rule::optional_chain => optional = true,
                        Rule::member_name => property = Some(item.as_str().to_string()),
                        _ => {}
                    }
                }
                ExprKind::Member {
                    object: Box::new(expr),
                    property: property.ok_or_else(|| malformed("member access", suffix_text))?,
                    optional,
                }
            }
            Rule::call_suffix => {
                let mut optional = false;
                let mut arguments = None;
                for item in suffix.into_inner() {
                    match item.as_rule() {
                        Rule::optional_chain => optional = true,
                        Rule::arguments => arguments = Some(self.arguments(item)?),
                        _ => {}
                    }
                }
                ExprKind::Call {
                    callee: Box::new(expr),
                    arguments: arguments.ok_or_else(|| malformed("call arguments", suffix_text))?,
                    optional,
                }
            }
            Rule::index_suffix => {
                let mut optional = false;
                let mut index = None;
                for item in suffix.into_inner() {
                    match item.as_rule() {
                        Rule::optional_chain => optional = true,
                        Rule::sequence => index = Some(self.sequence(item)?),
                        _ => {}
                    }
                }
                ExprKind::Index {
                    object: Box::new(expr),
                    index: Box::new(index.ok_or_else(|| malformed("index", suffix_text))?),
                    optional,
                }
            }
            Rule::non_null => ExprKind::NonNull(Box::new(expr)),
            Rule::as_suffix => {
                let ty = suffix
                    .into_inner()
                    .find(|p| p.as_rule() == Rule::type_operand)
                    .ok_or_else(|| malformed("type assertion", suffix_text))?;
                ExprKind::As {
                    expr: Box::new(expr),
                    ty: ty.as_str().trim_end().to_string(),
                }
            }
            Rule::update_op => ExprKind::Update {
                op: if suffix_text == "++" {
                    UpdateOp::Increment
                } else {
                    UpdateOp::Decrement
                },
                operand: Box::new(expr),
            },
            _ => return Err(malformed("postfix", suffix_text)),
        };
        Ok(self.node(kind, span))
    }

    fn primary(&self, pair: Pair<Rule>) -> Result<Expr> {
        let span = span_of(&pair);
        let text = pair.as_str();
        let kind = match pair.as_rule() {
            Rule::this => ExprKind::This,
            Rule::super_kw => ExprKind::Super,
            Rule::identifier => ExprKind::Identifier(text.to_string()),
            Rule::boolean | Rule::null | Rule::number | Rule::string => {
                ExprKind::Literal(text.to_string())
            }
            Rule::parenthesized => {
                let inner = pair
                    .into_inner()
                    .next()
                    .ok_or_else(|| malformed("parenthesized expression", text))?;
                ExprKind::Paren(Box::new(self.sequence(inner)?))
            }
            Rule::array_literal => ExprKind::Array(self.arguments(pair)?),
            Rule::new_expression => {
                let mut callee = None;
                let mut arguments = Vec::new();
                for item in pair.into_inner() {
                    match item.as_rule() {
                        Rule::new_callee => callee = Some(self.new_callee(item)?),
                        Rule::arguments => arguments = self.arguments(item)?,
                        _ => {}
                    }
                }
                ExprKind::New {
                    callee: Box::new(callee.ok_or_else(|| malformed("constructor", text))?),
                    arguments,
                }
            }
            Rule::object_literal => ExprKind::Object(
                pair.into_inner()
                    .map(|member| self.object_member(member))
                    .collect::<Result<Vec<_>>>()?,
            ),
            _ => return Err(malformed("primary expression", text)),
        };
        Ok(self.node(kind, span))
    }

    fn new_callee(&self, pair: Pair<Rule>) -> Result<Expr> {
        let text = pair.as_str();
        let mut items = pair.into_inner();
        let name = items.next().ok_or_else(|| malformed("constructor", text))?;
        let mut expr = self.primary(name)?;
        for suffix in items {
            expr = self.suffix(expr, suffix)?;
        }
        Ok(expr)
    }

    fn object_member(&self, pair: Pair<Rule>) -> Result<ObjectMember> {
        let text = pair.as_str();
        match pair.as_rule() {
            Rule::shorthand => Ok(ObjectMember::Shorthand(text.trim_end().to_string())),
            Rule::spread => Ok(ObjectMember::Spread(self.inner_expression(pair, "spread")?)),
            Rule::object_property => {
                let mut key = None;
                let mut value = None;
                for item in pair.into_inner() {
                    match item.as_rule() {
                        Rule::property_key => key = Some(item.as_str().to_string()),
                        _ => value = Some(self.expression(item)?),
                    }
                }
                Ok(ObjectMember::Property {
                    key: key.ok_or_else(|| malformed("property key", text))?,
                    value: value.ok_or_else(|| malformed("property value", text))?,
                })
            }
            Rule::object_method => {
                let mut key = None;
                let mut body = Vec::new();
                for item in pair.into_inner() {
                    match item.as_rule() {
                        Rule::property_key => key = Some(item.as_str().to_string()),
                        Rule::block => body = self.block(item)?,
                        _ => {}
                    }
                }
                Ok(ObjectMember::Method {
                    key: key.ok_or_else(|| malformed("method key", text))?,
                    body,
                })
            }
            _ => Err(malformed("object member", text)),
        }
    }
}

fn declaration(pair: Pair<Rule>, kind: DeclarationKind) -> Stmt {
    let name = pair
        .into_inner()
        .find(|p| p.as_rule() == Rule::identifier)
        .map(|p| p.as_str().to_string());
    trace!(?kind, ?name, "skipped declaration");
    Stmt::Declaration(Declaration { kind, name })
}

fn binary_op(pair: &Pair<Rule>) -> Result<BinaryOp> {
    let op = match pair.as_rule() {
        Rule::coalesce => BinaryOp::Coalesce,
        Rule::or => BinaryOp::Or,
        Rule::and => BinaryOp::And,
        Rule::bit_or => BinaryOp::BitOr,
        Rule::bit_xor => BinaryOp::BitXor,
        Rule::bit_and => BinaryOp::BitAnd,
        Rule::strict_eq => BinaryOp::StrictEq,
        Rule::strict_ne => BinaryOp::StrictNe,
        Rule::eq => BinaryOp::Eq,
        Rule::ne => BinaryOp::Ne,
        Rule::lt => BinaryOp::Lt,
        Rule::le => BinaryOp::Le,
        Rule::gt => BinaryOp::Gt,
        Rule::ge => BinaryOp::Ge,
        Rule::instance_of => BinaryOp::InstanceOf,
        Rule::in_op => BinaryOp::In,
        Rule::shl => BinaryOp::Shl,
        Rule::shr => BinaryOp::Shr,
        Rule::ushr => BinaryOp::UShr,
        Rule::add => BinaryOp::Add,
        Rule::sub => BinaryOp::Sub,
        Rule::mul => BinaryOp::Mul,
        Rule::div => BinaryOp::Div,
        Rule::rem => BinaryOp::Rem,
        Rule::pow => BinaryOp::Pow,
        _ => return Err(malformed("binary operator", pair.as_str())),
    };
    Ok(op)
}

fn compound_op(op: &str) -> Option<BinaryOp> {
    let op = match op {
        "*=" => BinaryOp::Mul,
        "/=" => BinaryOp::Div,
        "%=" => BinaryOp::Rem,
        "**=" => BinaryOp::Pow,
        "??=" => BinaryOp::Coalesce,
        "||=" => BinaryOp::Or,
        "&&=" => BinaryOp::And,
        "|=" => BinaryOp::BitOr,
        "&=" => BinaryOp::BitAnd,
        "^=" => BinaryOp::BitXor,
        "<<=" => BinaryOp::Shl,
        ">>=" => BinaryOp::Shr,
        ">>>=" => BinaryOp::UShr,
        _ => return None,
    };
    Some(op)
}

fn type_text(pair: Pair<Rule>) -> Result<String> {
    let text = pair.as_str();
    pair.into_inner()
        .next()
        .map(|ty| ty.as_str().trim_end().to_string())
        .ok_or_else(|| malformed("type annotation", text))
}
