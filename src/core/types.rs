// type model shared by the provider and the synthesizer
use serde::{Deserialize, Serialize};

pub type TypeId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Accessibility {
    Public,
    NonPublic,
}

impl Accessibility {
    pub fn is_public(self) -> bool {
        matches!(self, Accessibility::Public)
    }
}

/// Which concrete shape a sequence-bearing generic type has. Every flavor
/// can receive a collection mapping; `Enumerable` gets a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SequenceFlavor {
    Enumerable,
    List,
    ReadOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeKind {
    Value,
    Class,
    Array { element: TypeId },
    Sequence { element: TypeId, flavor: SequenceFlavor },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Conversion {
    None,
    Implicit,
    Explicit,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDef {
    pub name: String,
    pub ty: TypeId,
    pub getter: Accessibility,
    //None => read-only property
    pub setter: Option<Accessibility>,
}

impl PropertyDef {
    //public get + public set
    pub fn new(name: impl Into<String>, ty: TypeId) -> Self {
        Self {
            name: name.into(),
            ty,
            getter: Accessibility::Public,
            setter: Some(Accessibility::Public),
        }
    }

    pub fn read_only(name: impl Into<String>, ty: TypeId) -> Self {
        Self { setter: None, ..Self::new(name, ty) }
    }

    pub fn with_setter(mut self, setter: Accessibility) -> Self {
        self.setter = Some(setter);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDef {
    pub name: String,
    pub params: Vec<TypeId>,
    pub returns: Option<TypeId>,
    pub access: Accessibility,
}

impl MethodDef {
    pub fn getter(name: impl Into<String>, returns: TypeId) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            returns: Some(returns),
            access: Accessibility::Public,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstructorDef {
    pub params: Vec<TypeId>,
    pub access: Accessibility,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDef {
    pub id: TypeId,
    //simple name, e.g. "List" for List<Int>
    pub name: String,
    //rendered name, e.g. "List<Int>"
    pub display: String,
    pub kind: TypeKind,
    #[serde(default)]
    pub properties: Vec<PropertyDef>,
    #[serde(default)]
    pub methods: Vec<MethodDef>,
    #[serde(default)]
    pub constructors: Vec<ConstructorDef>,
}

impl TypeDef {
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        let name = name.into();
        Self {
            id: 0, // overwritten by TypeTable::add_type
            display: name.clone(),
            name,
            kind,
            properties: Vec::new(),
            methods: Vec::new(),
            constructors: Vec::new(),
        }
    }
}

/// A property as seen by the synthesizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDescriptor {
    pub name: String,
    pub ty: TypeId,
    pub is_publicly_settable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDescriptor {
    pub name: String,
    pub returns: TypeId,
}

/// Handle to a constructor found by the provider: owning type plus its
/// position in that type's constructor list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstructorRef {
    pub owner: TypeId,
    pub index: usize,
}
