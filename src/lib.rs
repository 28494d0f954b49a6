pub mod generator;
pub mod parser;
pub mod transpiler;

#[cfg(test)]
mod tests;

pub use parser::ParseError;
pub use transpiler::ast::SourceUnit;
pub use transpiler::model::ContractModel;

pub fn build_model(unit: &SourceUnit) -> ContractModel {
    transpiler::convert(unit)
}

/// The only failure is a syntax error in `source`. Missing classes, unknown
/// types and unsupported method bodies degrade the output instead.
pub fn convert(source: &str) -> Result<String, ParseError> {
    let unit = parser::parse(source)?;
    let model = build_model(&unit);
    Ok(generator::generate(model))
}
