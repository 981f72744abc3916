// in-memory type model, the provider hosts and tests hand to the synthesizer
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::core::error::{ConfigError, SynthesisError};
use crate::core::metadata::TypeMetadata;
use crate::core::types::{
    Accessibility, ConstructorDef, ConstructorRef, Conversion, MethodDef, MethodDescriptor,
    PropertyDef, PropertyDescriptor, SequenceFlavor, TypeDef, TypeId, TypeKind,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionRule {
    pub from: TypeId,
    pub to: TypeId,
    pub kind: Conversion,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TypeTable {
    //indexed by TypeId
    types: Vec<TypeDef>,
    #[serde(default)]
    conversions: Vec<ConversionRule>,
    //display name -> id, rebuilt after deserialization
    #[serde(skip)]
    by_display: HashMap<String, TypeId>,
}

impl TypeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table seeded with the usual primitive types and the numeric
    /// conversion lattice between them.
    pub fn with_primitives() -> Self {
        let mut t = Self::new();
        for name in ["Int", "Long", "Double", "Bool", "Decimal", "DateTime", "Guid"] {
            t.declare_struct(name).ok();
        }
        t.declare_class("String").ok();

        let id = |t: &Self, n: &str| t.by_display.get(n).copied();
        let implicit = [
            ("Int", "Long"),
            ("Int", "Double"),
            ("Int", "Decimal"),
            ("Long", "Double"),
            ("Long", "Decimal"),
        ];
        let explicit = [
            ("Long", "Int"),
            ("Double", "Int"),
            ("Double", "Long"),
            ("Decimal", "Int"),
            ("Decimal", "Long"),
            ("Double", "Decimal"),
            ("Decimal", "Double"),
        ];
        let rules = implicit
            .iter()
            .map(|p| (p, Conversion::Implicit))
            .chain(explicit.iter().map(|p| (p, Conversion::Explicit)));
        for (&(from, to), kind) in rules {
            if let (Some(from), Some(to)) = (id(&t, from), id(&t, to)) {
                t.conversions.push(ConversionRule { from, to, kind });
            }
        }
        t
    }

    pub fn from_toon(doc: &str) -> Result<Self, ConfigError> {
        let mut table: Self =
            toon_format::decode_default(doc).map_err(|e| ConfigError::Decode(e.to_string()))?;
        table.reindex();
        Ok(table)
    }

    pub fn to_toon(&self) -> Result<String, ConfigError> {
        toon_format::encode_default(self).map_err(|e| ConfigError::Encode(e.to_string()))
    }

    fn reindex(&mut self) {
        self.by_display = self
            .types
            .iter()
            .map(|t| (t.display.clone(), t.id))
            .collect();
    }

    /// Registers a type and returns its id. The `id` field of `def` is overwritten.
    pub fn add_type(&mut self, mut def: TypeDef) -> Result<TypeId, SynthesisError> {
        if self.by_display.contains_key(&def.display) {
            return Err(SynthesisError::DuplicateType(def.display));
        }
        let id = self.types.len() as TypeId;
        def.id = id;
        self.by_display.insert(def.display.clone(), id);
        self.types.push(def);
        Ok(id)
    }

    pub fn declare_class(&mut self, name: &str) -> Result<TypeId, SynthesisError> {
        self.add_type(TypeDef::new(name, TypeKind::Class))
    }

    pub fn declare_struct(&mut self, name: &str) -> Result<TypeId, SynthesisError> {
        self.add_type(TypeDef::new(name, TypeKind::Value))
    }

    pub fn lookup(&self, display: &str) -> Option<TypeId> {
        self.by_display.get(display).copied()
    }

    pub fn get(&self, ty: TypeId) -> Result<&TypeDef, SynthesisError> {
        self.types
            .get(ty as usize)
            .ok_or(SynthesisError::UnknownType(ty))
    }

    fn get_mut(&mut self, ty: TypeId) -> Result<&mut TypeDef, SynthesisError> {
        self.types
            .get_mut(ty as usize)
            .ok_or(SynthesisError::UnknownType(ty))
    }

    pub fn add_property(&mut self, ty: TypeId, prop: PropertyDef) -> Result<(), SynthesisError> {
        self.get(prop.ty)?;
        self.get_mut(ty)?.properties.push(prop);
        Ok(())
    }

    pub fn add_method(&mut self, ty: TypeId, method: MethodDef) -> Result<(), SynthesisError> {
        for &p in method.params.iter().chain(method.returns.iter()) {
            self.get(p)?;
        }
        self.get_mut(ty)?.methods.push(method);
        Ok(())
    }

    pub fn add_constructor(&mut self, ty: TypeId, params: Vec<TypeId>) -> Result<(), SynthesisError> {
        for &p in &params {
            self.get(p)?;
        }
        self.get_mut(ty)?.constructors.push(ConstructorDef {
            params,
            access: Accessibility::Public,
        });
        Ok(())
    }

    pub fn add_conversion(&mut self, from: TypeId, to: TypeId, kind: Conversion) -> Result<(), SynthesisError> {
        self.get(from)?;
        self.get(to)?;
        self.conversions.retain(|r| !(r.from == from && r.to == to));
        self.conversions.push(ConversionRule { from, to, kind });
        Ok(())
    }

    pub fn array_of(&mut self, element: TypeId) -> Result<TypeId, SynthesisError> {
        let elem = self.get(element)?.display.clone();
        let mut def = TypeDef::new("Array", TypeKind::Array { element });
        def.display = format!("{elem}[]");
        self.get_or_add(def)
    }

    pub fn list_of(&mut self, element: TypeId) -> Result<TypeId, SynthesisError> {
        self.sequence_of("List", element, SequenceFlavor::List)
    }

    pub fn read_only_collection_of(&mut self, element: TypeId) -> Result<TypeId, SynthesisError> {
        self.sequence_of("ReadOnlyCollection", element, SequenceFlavor::ReadOnly)
    }

    pub fn enumerable_of(&mut self, element: TypeId) -> Result<TypeId, SynthesisError> {
        self.sequence_of("IEnumerable", element, SequenceFlavor::Enumerable)
    }

    fn sequence_of(&mut self, name: &str, element: TypeId, flavor: SequenceFlavor) -> Result<TypeId, SynthesisError> {
        let elem = self.get(element)?.display.clone();
        let mut def = TypeDef::new(name, TypeKind::Sequence { element, flavor });
        def.display = format!("{name}<{elem}>");
        self.get_or_add(def)
    }

    fn get_or_add(&mut self, def: TypeDef) -> Result<TypeId, SynthesisError> {
        match self.lookup(&def.display) {
            Some(existing) => Ok(existing),
            None => self.add_type(def),
        }
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl TypeMetadata for TypeTable {
    fn type_name(&self, ty: TypeId) -> Result<&str, SynthesisError> {
        Ok(&self.get(ty)?.name)
    }

    fn display_name(&self, ty: TypeId) -> Result<&str, SynthesisError> {
        Ok(&self.get(ty)?.display)
    }

    fn kind(&self, ty: TypeId) -> Result<TypeKind, SynthesisError> {
        Ok(self.get(ty)?.kind)
    }

    fn public_writable_properties(&self, ty: TypeId) -> Result<Vec<PropertyDescriptor>, SynthesisError> {
        Ok(self
            .get(ty)?
            .properties
            .iter()
            .filter(|p| p.getter.is_public())
            .filter_map(|p| {
                p.setter.map(|setter| PropertyDescriptor {
                    name: p.name.clone(),
                    ty: p.ty,
                    is_publicly_settable: setter.is_public(),
                })
            })
            .collect())
    }

    fn public_readable_properties(&self, ty: TypeId) -> Result<Vec<PropertyDescriptor>, SynthesisError> {
        Ok(self
            .get(ty)?
            .properties
            .iter()
            .filter(|p| p.getter.is_public())
            .map(|p| PropertyDescriptor {
                name: p.name.clone(),
                ty: p.ty,
                is_publicly_settable: p.setter.is_some_and(Accessibility::is_public),
            })
            .collect())
    }

    fn parameterless_methods(&self, ty: TypeId) -> Result<Vec<MethodDescriptor>, SynthesisError> {
        Ok(self
            .get(ty)?
            .methods
            .iter()
            .filter(|m| m.access.is_public() && m.params.is_empty())
            .filter_map(|m| {
                m.returns.map(|returns| MethodDescriptor {
                    name: m.name.clone(),
                    returns,
                })
            })
            .collect())
    }

    fn classify_conversion(&self, from: TypeId, to: TypeId) -> Result<Conversion, SynthesisError> {
        self.get(from)?;
        self.get(to)?;
        if from == to {
            return Ok(Conversion::Implicit);
        }
        Ok(self
            .conversions
            .iter()
            .find(|r| r.from == from && r.to == to)
            .map(|r| r.kind)
            .unwrap_or(Conversion::None))
    }

    fn single_arg_constructor(&self, ty: TypeId, param: TypeId) -> Result<Option<ConstructorRef>, SynthesisError> {
        Ok(self
            .get(ty)?
            .constructors
            .iter()
            .position(|c| c.access.is_public() && c.params.as_slice() == [param])
            .map(|index| ConstructorRef { owner: ty, index }))
    }
}
