use tracing::{debug, warn};

use super::annotations;
use super::ast::*;
use super::body;
use super::model::*;
use super::types::convert_annotation;

pub fn convert_unit(unit: &SourceUnit) -> ContractModel {
    match find_contract_class(&unit.statements) {
        Some(class) => convert_class(class),
        None => {
            warn!("no class declaration found, emitting an empty contract");
            ContractModel::empty()
        }
    }
}

pub fn find_contract_class(statements: &[Stmt]) -> Option<&ClassDecl> {
    statements.iter().find_map(find_in_statement)
}

fn find_in_statement(stmt: &Stmt) -> Option<&ClassDecl> {
    match stmt {
        Stmt::Class(class) => Some(class),
        Stmt::Function(function) => find_contract_class(&function.body),
        _ => stmt.children().into_iter().find_map(find_in_child),
    }
}

fn find_in_child(child: Child<'_>) -> Option<&ClassDecl> {
    match child {
        Child::Stmt(stmt) => find_in_statement(stmt),
        Child::Expr(_) => child.children().into_iter().find_map(find_in_child),
    }
}

pub fn convert_class(class: &ClassDecl) -> ContractModel {
    let name = match &class.name {
        Some(name) => name.clone(),
        None => {
            debug!("anonymous class, using default contract name");
            DEFAULT_CONTRACT_NAME.to_string()
        }
    };

    if !class.heritage.is_empty() {
        debug!(heritage = ?class.heritage, "inherited members are not translated");
    }

    let model = ContractModel {
        storage: extract_storage(&class.members),
        functions: extract_functions(&class.members),
        name,
    };
    debug!(
        name = %model.name,
        storage = model.storage.len(),
        functions = model.functions.len(),
        "built contract model"
    );
    model
}

pub fn extract_storage(members: &[ClassMember]) -> Vec<StorageVariable> {
    let mut storage: Vec<StorageVariable> = Vec::new();
    for member in members {
        let ClassMember::Property(property) = member else {
            continue;
        };
        if storage.iter().any(|var| var.name == property.name) {
            warn!(name = %property.name, "duplicate property ignored");
            continue;
        }
        storage.push(StorageVariable {
            name: property.name.clone(),
            ty: convert_annotation(property.type_annotation.as_deref()),
        });
    }
    storage
}

pub fn extract_functions(members: &[ClassMember]) -> Vec<ContractFunction> {
    let mut functions: Vec<ContractFunction> = Vec::new();
    for member in members {
        let ClassMember::Method(method) = member else {
            continue;
        };
        if functions.iter().any(|f| f.name == method.name) {
            warn!(name = %method.name, "duplicate method ignored");
            continue;
        }
        functions.push(extract_function(method));
    }
    functions
}

pub fn extract_function(method: &MethodDecl) -> ContractFunction {
    let visibility = annotations::classify(&method.decorators);
    if visibility == Visibility::External && !annotations::is_external(&method.decorators) {
        debug!(name = %method.name, "no visibility marker, treating as external");
    }

    let body = match &method.body {
        Some(statements) => body::analyze(statements, visibility),
        None => Vec::new(),
    };

    ContractFunction {
        name: method.name.clone(),
        params: extract_parameters(&method.params),
        return_type: convert_annotation(method.return_type.as_deref()),
        visibility,
        body,
    }
}

pub fn extract_parameters(params: &[Parameter]) -> Vec<ContractParameter> {
    params
        .iter()
        .map(|param| ContractParameter {
            name: param.name.clone(),
            ty: convert_annotation(param.type_annotation.as_deref()),
        })
        .collect()
}
