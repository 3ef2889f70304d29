use indexmap::IndexMap;
use serde::Serialize;

/// Scalar shapes. They carry no generated name and are never registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimitiveType {
    String,
    Int32,
    Int64,
    Boolean,
}

/// A resolved schema shape.
///
/// `Reference` edges are the only back-references in the graph. They are
/// followed for name lookup only, never for structural comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeDescriptor {
    Primitive(PrimitiveType),
    Array(ArrayType),
    Object(ObjectType),
    Union(UnionType),
    /// Key into the reference registry (for example `#/components/schemas/Pet`).
    Reference(String),
}

impl TypeDescriptor {
    /// Generated class name of a structural descriptor.
    pub fn class_name(&self) -> Option<&str> {
        match self {
            TypeDescriptor::Array(a) => Some(&a.class_name),
            TypeDescriptor::Object(o) => Some(&o.class_name),
            TypeDescriptor::Union(u) => Some(&u.class_name),
            TypeDescriptor::Primitive(_) | TypeDescriptor::Reference(_) => None,
        }
    }
}

/// A named list type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArrayType {
    pub class_name: String,
    pub item: Box<TypeDescriptor>,
}

/// A named record type. Property names are unique; order is declaration order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectType {
    pub class_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub properties: Vec<PropertyDescriptor>,
}

impl ObjectType {
    pub fn property(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.properties.iter().find(|p| p.name == name)
    }
}

/// A discriminated union keyed by status code or media-type tag.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnionType {
    pub class_name: String,
    pub branches: IndexMap<String, UnionBranch>,
}

/// One alternative of a union: its class name and payload components
/// (a body and/or a headers object; empty for a bare status).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnionBranch {
    pub class_name: String,
    pub components: Vec<TypeDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub type_descriptor: TypeDescriptor,
    /// Advisory format hint (`date-time`, `int64`, ...); not enforced.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
