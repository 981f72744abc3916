// wrapper detection: unwrap a source value through a single property or method
use crate::core::error::SynthesisError;
use crate::core::metadata::TypeMetadata;
use crate::core::syntax::Expr;
use crate::core::types::{MethodDescriptor, PropertyDescriptor, TypeId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WrapperInfo {
    None,
    Property(PropertyDescriptor),
    Method(MethodDescriptor),
}

impl WrapperInfo {
    /// Rewrites `source` to read the wrapped value, or returns it unchanged.
    pub fn unwrap_access(&self, source: Expr) -> Expr {
        match self {
            WrapperInfo::None => source,
            WrapperInfo::Property(p) => Expr::member(source, p.name.clone()),
            WrapperInfo::Method(m) => Expr::invoke(Expr::member(source, m.name.clone()), vec![]),
        }
    }
}

/// Exactly one unwrapping candidate, property or method, or nothing.
/// Several candidates are ambiguous and count as none.
pub fn detect_wrapper(
    metadata: &dyn TypeMetadata,
    wrapper: TypeId,
    wrapped: TypeId,
) -> Result<WrapperInfo, SynthesisError> {
    let mut properties: Vec<_> = metadata
        .public_readable_properties(wrapper)?
        .into_iter()
        .filter(|p| p.ty == wrapped)
        .collect();
    let mut methods: Vec<_> = metadata
        .parameterless_methods(wrapper)?
        .into_iter()
        .filter(|m| m.returns == wrapped)
        .collect();

    let info = match (properties.len(), methods.len()) {
        (1, 0) => properties.pop().map_or(WrapperInfo::None, WrapperInfo::Property),
        (0, 1) => methods.pop().map_or(WrapperInfo::None, WrapperInfo::Method),
        _ => WrapperInfo::None,
    };
    Ok(info)
}
