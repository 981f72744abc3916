// read-only type metadata capability consumed by the synthesizer
use crate::core::error::SynthesisError;
use crate::core::types::{
    Conversion, ConstructorRef, MethodDescriptor, PropertyDescriptor, TypeId, TypeKind,
};

/// Answers questions about types. Implementations must be side-effect free:
/// the synthesizer may ask the same question any number of times during one
/// call.
pub trait TypeMetadata {
    /// Simple name of the type, e.g. `List` for `List<Int>`.
    fn type_name(&self, ty: TypeId) -> Result<&str, SynthesisError>;

    /// Name used when the type appears in emitted code, e.g. `List<Int>`.
    fn display_name(&self, ty: TypeId) -> Result<&str, SynthesisError>;

    fn kind(&self, ty: TypeId) -> Result<TypeKind, SynthesisError>;

    /// Properties carrying a setter, in declaration order.
    fn public_writable_properties(&self, ty: TypeId) -> Result<Vec<PropertyDescriptor>, SynthesisError>;

    /// Properties with a public getter, in declaration order.
    fn public_readable_properties(&self, ty: TypeId) -> Result<Vec<PropertyDescriptor>, SynthesisError>;

    /// Public methods taking no arguments and returning a value.
    fn parameterless_methods(&self, ty: TypeId) -> Result<Vec<MethodDescriptor>, SynthesisError>;

    fn classify_conversion(&self, from: TypeId, to: TypeId) -> Result<Conversion, SynthesisError>;

    /// A public constructor of `ty` taking exactly one parameter of type `param`.
    fn single_arg_constructor(&self, ty: TypeId, param: TypeId) -> Result<Option<ConstructorRef>, SynthesisError>;

    //array element or the single type argument of a sequence
    fn element_type(&self, ty: TypeId) -> Result<TypeId, SynthesisError> {
        match self.kind(ty)? {
            TypeKind::Array { element } | TypeKind::Sequence { element, .. } => Ok(element),
            TypeKind::Value | TypeKind::Class => Err(SynthesisError::UnsupportedShape {
                type_name: self.display_name(ty)?.to_string(),
            }),
        }
    }
}
