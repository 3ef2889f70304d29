use std::collections::HashMap;

use heck::ToPascalCase;

use crate::error::ModelError;
use crate::ir::{ArrayType, ObjectType, PrimitiveType, PropertyDescriptor, TypeDescriptor};
use crate::parse::ref_resolve::{RefLookup, pointer};
use crate::parse::schema::{Schema, SchemaOrRef, SchemaType};

use super::name_normalizer::normalize_name;
use super::registry::ReferenceRegistry;

/// Key prefix of component schemas.
pub const COMPONENT_SCHEMAS: &str = "#/components/schemas";

/// What a schema node describes, before any name is attached.
#[derive(Clone, Copy)]
enum Shape {
    Primitive(PrimitiveType),
    Array,
    Object,
}

/// Turns raw schema nodes into descriptors, registering every named shape.
///
/// Inline shapes are registered under their JSON-pointer location, component
/// schemas under `#/components/schemas/<name>`. `$ref` nodes become lazy
/// [`TypeDescriptor::Reference`] edges and are never expanded here.
pub struct SchemaResolver<'a> {
    lookup: RefLookup<'a>,
    registry: ReferenceRegistry,
    /// Generated class name to the key that claimed it.
    claimed: HashMap<String, String>,
}

impl<'a> SchemaResolver<'a> {
    pub fn new(lookup: RefLookup<'a>) -> Self {
        Self {
            lookup,
            registry: ReferenceRegistry::new(),
            claimed: HashMap::new(),
        }
    }

    pub fn lookup(&self) -> RefLookup<'a> {
        self.lookup
    }

    pub fn registry(&self) -> &ReferenceRegistry {
        &self.registry
    }

    pub fn into_registry(self) -> ReferenceRegistry {
        self.registry
    }

    /// Reserve a generated class name for `owner`.
    ///
    /// Claiming the same name twice for the same owner is a no-op; a second
    /// owner is a [`ModelError::NameCollision`].
    pub fn claim_name(&mut self, name: &str, owner: &str) -> Result<(), ModelError> {
        match self.claimed.get(name) {
            Some(first) if first == owner => Ok(()),
            Some(first) => Err(ModelError::NameCollision {
                name: name.to_string(),
                first: first.clone(),
                second: owner.to_string(),
            }),
            None => {
                self.claimed.insert(name.to_string(), owner.to_string());
                Ok(())
            }
        }
    }

    /// Resolve a declared component schema.
    ///
    /// Alias components (a bare `$ref`) and primitive components are not
    /// registered: references to them are followed to their final target.
    pub fn resolve_component(
        &mut self,
        name: &str,
        node: &'a SchemaOrRef,
    ) -> Result<(), ModelError> {
        let key = format!("{COMPONENT_SCHEMAS}/{name}");
        if self.registry.contains(&key) {
            return Ok(());
        }
        let SchemaOrRef::Schema(schema) = node else {
            log::debug!("{key} is an alias, resolved through its target");
            return Ok(());
        };
        if let Shape::Primitive(_) = shape_of(schema, &key)? {
            return Ok(());
        }
        let class_name = normalize_name(name).pascal_case;
        self.resolve_schema(schema, &key, &class_name)?;
        Ok(())
    }

    /// Resolve a schema node found at document location `key`.
    ///
    /// `class_name` names the shape when the node is inline; it is ignored for
    /// `$ref` nodes, which keep the name of their target.
    pub fn resolve(
        &mut self,
        node: &'a SchemaOrRef,
        key: &str,
        class_name: &str,
    ) -> Result<TypeDescriptor, ModelError> {
        match node {
            SchemaOrRef::Ref { ref_path } => self.resolve_ref(ref_path, key),
            SchemaOrRef::Schema(schema) => self.resolve_schema(schema, key, class_name),
        }
    }

    /// Resolve a node that must describe a string, integer or boolean.
    pub fn resolve_primitive(
        &mut self,
        node: &'a SchemaOrRef,
        key: &str,
    ) -> Result<(PrimitiveType, Option<String>), ModelError> {
        let schema = match node {
            SchemaOrRef::Ref { ref_path } => {
                self.lookup
                    .schema(ref_path)
                    .map_err(|err| relocate(err, key))?
                    .1
            }
            SchemaOrRef::Schema(schema) => schema.as_ref(),
        };
        match shape_of(schema, key)? {
            Shape::Primitive(primitive) => Ok((primitive, schema.format.clone())),
            Shape::Array | Shape::Object => Err(ModelError::UnsupportedSchemaShape {
                location: key.to_string(),
                detail: "expected a string, integer or boolean schema".to_string(),
            }),
        }
    }

    /// Resolve a `$ref` found at `key` without expanding its target.
    pub fn resolve_ref(&self, ref_path: &str, key: &str) -> Result<TypeDescriptor, ModelError> {
        let (target, schema) = self
            .lookup
            .schema(ref_path)
            .map_err(|err| relocate(err, key))?;
        match shape_of(schema, &target)? {
            Shape::Primitive(primitive) => Ok(TypeDescriptor::Primitive(primitive)),
            Shape::Array | Shape::Object => Ok(TypeDescriptor::Reference(target)),
        }
    }

    fn resolve_schema(
        &mut self,
        schema: &'a Schema,
        key: &str,
        class_name: &str,
    ) -> Result<TypeDescriptor, ModelError> {
        let shape = shape_of(schema, key)?;
        if let Shape::Primitive(primitive) = shape {
            return Ok(TypeDescriptor::Primitive(primitive));
        }
        self.claim_name(class_name, key)?;
        let descriptor = match shape {
            Shape::Primitive(primitive) => TypeDescriptor::Primitive(primitive),
            Shape::Array => {
                let items = schema.items.as_deref().ok_or_else(|| {
                    ModelError::UnsupportedSchemaShape {
                        location: key.to_string(),
                        detail: "array schema without `items`".to_string(),
                    }
                })?;
                let item_key = pointer(key, &["items"]);
                let item = self.resolve(items, &item_key, &format!("{class_name}Item"))?;
                TypeDescriptor::Array(ArrayType {
                    class_name: class_name.to_string(),
                    item: Box::new(item),
                })
            }
            Shape::Object => {
                let mut properties = Vec::with_capacity(schema.properties.len());
                for (name, property) in &schema.properties {
                    let property_key = pointer(key, &["properties", name]);
                    let property_class = format!("{class_name}{}Properties", name.to_pascal_case());
                    let type_descriptor = self.resolve(property, &property_key, &property_class)?;
                    let (format, description) = match property {
                        SchemaOrRef::Schema(inline) => {
                            (inline.format.clone(), inline.description.clone())
                        }
                        SchemaOrRef::Ref { .. } => (None, None),
                    };
                    properties.push(PropertyDescriptor {
                        name: name.clone(),
                        type_descriptor,
                        format,
                        required: schema.is_required(name),
                        description,
                    });
                }
                TypeDescriptor::Object(ObjectType {
                    class_name: class_name.to_string(),
                    description: schema.description.clone(),
                    properties,
                })
            }
        };
        self.registry.add_ref(key, descriptor.clone());
        log::debug!("resolved {key} as {class_name}");
        Ok(descriptor)
    }
}

/// Classify a schema node, rejecting shapes the descriptor model cannot hold.
fn shape_of(schema: &Schema, location: &str) -> Result<Shape, ModelError> {
    if let Some(combinator) = schema.combinator() {
        return Err(ModelError::UnsupportedSchemaShape {
            location: location.to_string(),
            detail: format!("`{combinator}` composition is not supported"),
        });
    }
    let Some(set) = &schema.schema_type else {
        return Ok(Shape::Object);
    };
    let Some(schema_type) = set.single() else {
        return Err(ModelError::UnsupportedSchemaShape {
            location: location.to_string(),
            detail: format!("multiple types [{set}] are not supported"),
        });
    };
    match schema_type {
        SchemaType::String => Ok(Shape::Primitive(PrimitiveType::String)),
        SchemaType::Boolean => Ok(Shape::Primitive(PrimitiveType::Boolean)),
        SchemaType::Integer if schema.format.as_deref() == Some("int64") => {
            Ok(Shape::Primitive(PrimitiveType::Int64))
        }
        SchemaType::Integer => Ok(Shape::Primitive(PrimitiveType::Int32)),
        SchemaType::Array => Ok(Shape::Array),
        SchemaType::Object => Ok(Shape::Object),
        SchemaType::Number | SchemaType::Null => Err(ModelError::UnsupportedSchemaShape {
            location: location.to_string(),
            detail: format!("type `{schema_type}` is not supported"),
        }),
    }
}

/// Report a failed lookup at the location that referenced it.
pub(crate) fn relocate(err: ModelError, location: &str) -> ModelError {
    match err {
        ModelError::UnresolvedReference { reference, .. } => ModelError::UnresolvedReference {
            location: location.to_string(),
            reference,
        },
        other => other,
    }
}
