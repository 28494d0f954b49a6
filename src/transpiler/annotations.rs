use super::ast::Decorator;
use super::model::Visibility;

pub const VIEW_MARKER: &str = "view";
pub const EXTERNAL_MARKER: &str = "external";

// Only the bare `@name` form counts. `@view()` is some other decorator.
fn has_marker(decorators: &[Decorator], marker: &str) -> bool {
    decorators
        .iter()
        .any(|d| d.name == marker && d.arguments.is_none())
}

pub fn is_view(decorators: &[Decorator]) -> bool {
    has_marker(decorators, VIEW_MARKER)
}

pub fn is_external(decorators: &[Decorator]) -> bool {
    has_marker(decorators, EXTERNAL_MARKER)
}

/// `@view` wins over everything, including an `@external` on the same method.
pub fn classify(decorators: &[Decorator]) -> Visibility {
    if is_view(decorators) {
        Visibility::View
    } else {
        Visibility::External
    }
}
