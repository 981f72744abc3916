// closed shape classification: simple | collection | complex
use crate::core::config::SynthesisConfig;
use crate::core::error::SynthesisError;
use crate::core::metadata::TypeMetadata;
use crate::core::types::{SequenceFlavor, TypeId, TypeKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionKind {
    Array,
    List,
    ReadOnly,
    Enumerable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeShape {
    Simple,
    Collection { kind: CollectionKind, element: TypeId },
    Complex,
}

impl TypeShape {
    pub fn is_simple(self) -> bool {
        matches!(self, TypeShape::Simple)
    }

    pub fn is_collection(self) -> bool {
        matches!(self, TypeShape::Collection { .. })
    }
}

/// Collection shapes win over the simple allow-list; value types and
/// allow-listed names are simple; everything else is complex.
pub fn classify(
    metadata: &dyn TypeMetadata,
    config: &SynthesisConfig,
    ty: TypeId,
) -> Result<TypeShape, SynthesisError> {
    let shape = match metadata.kind(ty)? {
        TypeKind::Array { element } => TypeShape::Collection { kind: CollectionKind::Array, element },
        TypeKind::Sequence { element, flavor } => {
            let kind = match flavor {
                SequenceFlavor::Enumerable => CollectionKind::Enumerable,
                SequenceFlavor::List => CollectionKind::List,
                SequenceFlavor::ReadOnly => CollectionKind::ReadOnly,
            };
            TypeShape::Collection { kind, element }
        }
        TypeKind::Value => TypeShape::Simple,
        TypeKind::Class => {
            if config.is_simple_name(metadata.type_name(ty)?) {
                TypeShape::Simple
            } else {
                TypeShape::Complex
            }
        }
    };
    Ok(shape)
}

pub fn is_simple(
    metadata: &dyn TypeMetadata,
    config: &SynthesisConfig,
    ty: TypeId,
) -> Result<bool, SynthesisError> {
    Ok(classify(metadata, config, ty)?.is_simple())
}

/// Both sides are collection-shaped. An enumerable target receives a list.
pub fn is_mapping_between_collections(
    metadata: &dyn TypeMetadata,
    config: &SynthesisConfig,
    target: TypeId,
    source: TypeId,
) -> Result<bool, SynthesisError> {
    if !classify(metadata, config, target)?.is_collection() {
        return Ok(false);
    }
    Ok(classify(metadata, config, source)?.is_collection())
}
