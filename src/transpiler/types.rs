use std::fmt;

use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageType {
    Felt252,
    Bool,
    U256,
}

impl StorageType {
    pub const DEFAULT: StorageType = StorageType::Felt252;

    pub fn as_cairo(self) -> &'static str {
        match self {
            StorageType::Felt252 => "felt252",
            StorageType::Bool => "bool",
            StorageType::U256 => "u256",
        }
    }
}

impl fmt::Display for StorageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_cairo())
    }
}

static PRIMITIVES: &[(&str, StorageType)] = &[
    ("number", StorageType::Felt252),
    ("string", StorageType::Felt252),
    ("boolean", StorageType::Bool),
    ("bigint", StorageType::U256),
];

pub fn lookup(type_name: &str) -> Option<StorageType> {
    PRIMITIVES
        .iter()
        .find(|(name, _)| *name == type_name)
        .map(|(_, ty)| *ty)
}

pub fn convert_type(type_name: &str) -> StorageType {
    lookup(type_name).unwrap_or_else(|| {
        debug!(type_name, fallback = %StorageType::DEFAULT, "unmapped type");
        StorageType::DEFAULT
    })
}

pub fn convert_annotation(annotation: Option<&str>) -> StorageType {
    annotation.map_or(StorageType::DEFAULT, convert_type)
}
