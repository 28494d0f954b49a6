pub mod annotations;
pub mod ast;
pub mod body;
pub mod converter;
pub mod model;
pub mod types;

use ast::SourceUnit;
use model::ContractModel;

pub fn convert(unit: &SourceUnit) -> ContractModel {
    converter::convert_unit(unit)
}
