use std::fmt;

use super::types::StorageType;

/// Name used when the source has no class, or the class is anonymous.
pub const DEFAULT_CONTRACT_NAME: &str = "Contract";

#[derive(Debug, Clone, PartialEq)]
pub struct ContractModel {
    pub name: String,
    pub storage: Vec<StorageVariable>,
    pub functions: Vec<ContractFunction>,
}

impl ContractModel {
    pub fn empty() -> Self {
        ContractModel {
            name: DEFAULT_CONTRACT_NAME.to_string(),
            storage: Vec::new(),
            functions: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StorageVariable {
    pub name: String,
    pub ty: StorageType,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContractParameter {
    pub name: String,
    pub ty: StorageType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    View,
    External,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContractFunction {
    pub name: String,
    pub params: Vec<ContractParameter>,
    pub return_type: StorageType,
    pub visibility: Visibility,
    pub body: Vec<Instruction>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    Write(String, Expression),
    ReadReturn(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Read(String),
    Raw(String),
    Binary(Box<Expression>, ArithOp, Box<Expression>),
}

impl fmt::Display for ArithOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArithOp::Add => f.write_str("+"),
            ArithOp::Sub => f.write_str("-"),
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Read(var) => write!(f, "self.{}.read()", var),
            Expression::Raw(text) => f.write_str(text),
            Expression::Binary(lhs, op, rhs) => write!(f, "{} {} {}", lhs, op, rhs),
        }
    }
}
