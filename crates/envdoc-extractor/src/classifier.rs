//! Type classification for resolved fields
//!
//! Decides how a field is expanded. The cascade, first match wins:
//! 1. the (pointer-stripped) type is a struct declared in the same blob
//! 2. the type is a slice of such a struct
//! 3. the type, as written or pointer-stripped, keys a dependency blob
//! 4. anything else is a scalar
//!
//! A leading `map[K]` declarator is split off before the cascade runs and is
//! re-attached to the reported type afterwards.

use crate::naming;
use crate::patterns;
use crate::source::{DependencyMap, SourceBlob};

/// A declared type with its map declarator split off
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeclaredType<'t> {
    /// `map[K]` or `map[K][]` when present
    pub map: Option<&'t str>,
    /// The remaining element type
    pub element: &'t str,
}

impl DeclaredType<'_> {
    /// Re-attach the map declarator to `type_name`
    pub fn with_map(&self, type_name: &str) -> String {
        match self.map {
            Some(map) => format!("{}{}", map, type_name),
            None => type_name.to_string(),
        }
    }
}

/// Split `map[K]` (and an immediately following `[]`) off the front of `raw`
pub fn split_map_declarator(raw: &str) -> DeclaredType<'_> {
    match patterns::MAP_DECLARATOR.find(raw) {
        Some(declarator) => DeclaredType {
            map: Some(declarator.as_str()),
            element: &raw[declarator.end()..],
        },
        None => DeclaredType {
            map: None,
            element: raw,
        },
    }
}

/// Outcome of classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeClass<'d> {
    /// Struct declared in the current blob
    Struct { name: String },
    /// Slice of a struct declared in the current blob
    SliceOfStruct { name: String },
    /// Struct living in a dependency blob
    External { blob: &'d SourceBlob, name: String },
    /// Leaf type, aliases normalized and map declarator re-attached
    Scalar { type_name: String },
}

/// Classify `declared` against the current blob and the dependency map
pub fn classify<'d>(
    declared: &DeclaredType<'_>,
    blob: &SourceBlob,
    deps: &'d DependencyMap,
) -> TypeClass<'d> {
    let element = declared.element;
    let target = element.trim_start_matches('*');

    if blob.declares(target) {
        return TypeClass::Struct {
            name: target.to_string(),
        };
    }

    if let Some(inner) = element.strip_prefix("[]") {
        let inner = inner.trim_start_matches('*');
        if blob.declares(inner) {
            return TypeClass::SliceOfStruct {
                name: inner.to_string(),
            };
        }
    }

    if let Some(dependency) = deps.get(element).or_else(|| deps.get(target)) {
        return TypeClass::External {
            blob: dependency,
            name: naming::last_segment(target).to_string(),
        };
    }

    TypeClass::Scalar {
        type_name: scalar_type_name(declared),
    }
}

/// Reported type of a scalar field
///
/// Known aliases are replaced by their canonical form; the alias wins over
/// any map declarator.
pub fn scalar_type_name(declared: &DeclaredType<'_>) -> String {
    match TypeAlias::from_name(declared.element) {
        Some(alias) => alias.canonical().to_string(),
        None => declared.with_map(declared.element),
    }
}

/// Named types reported under their underlying type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeAlias {
    IpsHandleStrategy,
    EnvMapString,
    UserPermissionObject,
    MongoType,
}

impl TypeAlias {
    pub const ALL: [TypeAlias; 4] = [
        TypeAlias::IpsHandleStrategy,
        TypeAlias::EnvMapString,
        TypeAlias::UserPermissionObject,
        TypeAlias::MongoType,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|alias| alias.name() == name)
    }

    /// Name as written in source
    pub fn name(self) -> &'static str {
        match self {
            TypeAlias::IpsHandleStrategy => "IPsHandleStrategy",
            TypeAlias::EnvMapString => "EnvMapString",
            TypeAlias::UserPermissionObject => "UserPermissionObject",
            TypeAlias::MongoType => "MongoType",
        }
    }

    pub fn canonical(self) -> &'static str {
        match self {
            TypeAlias::IpsHandleStrategy => "string",
            TypeAlias::EnvMapString => "map[string]string",
            TypeAlias::UserPermissionObject => "map[ObjectGroup]string",
            TypeAlias::MongoType => "int",
        }
    }
}
