use std::collections::HashSet;

use apigen_core::error::GeneratorError;
use apigen_core::ir::{
    ArrayType, DEFAULT_STATUS, ObjectType, RequestBodyDescriptor, ResponseDescriptor, SpecMetadata,
    TypeDescriptor,
};
use log::debug;
use minijinja::{Value, context};

use super::operations::doc_lines;
use super::{header_context, render};
use crate::type_mapper::{descriptor_to_rust, property_idents, string_literal, type_ident};

/// Class names already emitted by one `emit_types` invocation.
#[derive(Debug, Default)]
pub struct GeneratedNames {
    names: HashSet<String>,
}

impl GeneratedNames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `name`; returns `false` if it was already emitted.
    pub fn insert(&mut self, name: &str) -> bool {
        self.names.insert(name.to_string())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Emit `types.rs`: one item per structural descriptor and per operation union.
pub fn emit_types(spec: &SpecMetadata) -> Result<String, GeneratorError> {
    let mut emitter = TypesEmitter {
        spec,
        names: GeneratedNames::new(),
        items: Vec::new(),
    };
    for descriptor in spec.refs.values() {
        emitter.visit(descriptor);
    }
    for op in &spec.operations {
        if let Some(body) = &op.request_body {
            emitter.request_union(body);
        }
        emitter.response_union(&op.response);
    }
    debug!("types.rs: {} items", emitter.items.len());

    render(
        "types.rs.j2",
        include_str!("../../templates/types.rs.j2"),
        context! {
            header => header_context(spec),
            items => emitter.items,
        },
    )
}

struct TypesEmitter<'a> {
    spec: &'a SpecMetadata,
    names: GeneratedNames,
    items: Vec<Value>,
}

impl TypesEmitter<'_> {
    fn visit(&mut self, descriptor: &TypeDescriptor) {
        match descriptor {
            TypeDescriptor::Primitive(_) => {}
            TypeDescriptor::Reference(_) => {
                let spec = self.spec;
                if let Some(resolved) = spec.resolve(descriptor)
                    && !matches!(resolved, TypeDescriptor::Reference(_))
                {
                    self.visit(resolved);
                }
            }
            TypeDescriptor::Array(array) => self.array(array),
            TypeDescriptor::Object(object) => self.object(object),
            // Unions only come from operations and are emitted there.
            TypeDescriptor::Union(_) => {}
        }
    }

    fn array(&mut self, array: &ArrayType) {
        if !self.names.insert(&array.class_name) {
            return;
        }
        self.items.push(context! {
            kind => "array",
            name => type_ident(&array.class_name),
            docs => Vec::<String>::new(),
            item_type => descriptor_to_rust(self.spec, &array.item),
        });
        self.visit(&array.item);
    }

    fn object(&mut self, object: &ObjectType) {
        if !self.names.insert(&object.class_name) {
            return;
        }
        self.items.push(struct_context(self.spec, object));
        for property in &object.properties {
            self.visit(&property.type_descriptor);
        }
    }

    fn request_union(&mut self, body: &RequestBodyDescriptor) {
        for descriptor in body.content.values() {
            self.visit(descriptor);
        }
        if !self.names.insert(&body.class_name) {
            return;
        }
        let variants: Vec<Value> = body
            .content
            .iter()
            .map(|(media, descriptor)| {
                context! {
                    name => media.branch_name(),
                    type => descriptor_to_rust(self.spec, descriptor),
                }
            })
            .collect();
        self.items.push(context! {
            kind => "request",
            name => type_ident(&body.class_name),
            docs => Vec::<String>::new(),
            variants => variants,
        });
    }

    fn response_union(&mut self, response: &ResponseDescriptor) {
        for branch in response.branches.values() {
            if let Some(payload) = branch.payload() {
                self.visit(payload);
            }
            if let Some(headers) = branch.headers() {
                self.object(headers);
            }
        }
        if !self.names.insert(&response.class_name) {
            return;
        }
        let variants: Vec<Value> = response
            .branches
            .iter()
            .map(|(status, branch)| {
                let mut fields = Vec::new();
                if status == DEFAULT_STATUS {
                    fields.push(context! { ident => "status", type => "u16" });
                }
                if let Some(payload) = branch.payload() {
                    fields.push(context! {
                        ident => "body",
                        type => descriptor_to_rust(self.spec, payload),
                    });
                }
                if let Some(headers) = branch.headers() {
                    fields.push(context! {
                        ident => "headers",
                        type => type_ident(&headers.class_name),
                    });
                }
                context! {
                    name => type_ident(branch.class_name()),
                    fields => fields,
                }
            })
            .collect();
        self.items.push(context! {
            kind => "response",
            name => type_ident(&response.class_name),
            docs => vec!["Responses by status code.".to_string()],
            variants => variants,
        });
    }
}

fn struct_context(spec: &SpecMetadata, object: &ObjectType) -> Value {
    let idents = property_idents(&object.properties);
    let fields: Vec<Value> = object
        .properties
        .iter()
        .zip(idents)
        .map(|(property, ident)| {
            let mut rust_type = descriptor_to_rust(spec, &property.type_descriptor);
            if is_recursive_edge(spec, &property.type_descriptor, &object.class_name) {
                rust_type = format!("Box<{rust_type}>");
            }
            if !property.required {
                rust_type = format!("Option<{rust_type}>");
            }
            let bare = ident.trim_start_matches("r#");
            context! {
                ident => ident.clone(),
                rename => bare != property.name,
                wire => string_literal(&property.name),
                type => rust_type,
                optional => !property.required,
                docs => doc_lines(None, property.description.as_deref()),
            }
        })
        .collect();

    context! {
        kind => "struct",
        name => type_ident(&object.class_name),
        docs => doc_lines(None, object.description.as_deref()),
        fields => fields,
    }
}

/// Whether a property of `owner` leads back to `owner` through struct fields
/// only. Such fields need indirection; arrays already provide it.
fn is_recursive_edge(spec: &SpecMetadata, property: &TypeDescriptor, owner: &str) -> bool {
    let mut visited = HashSet::new();
    reaches(spec, property, owner, &mut visited)
}

fn reaches<'a>(
    spec: &'a SpecMetadata,
    descriptor: &'a TypeDescriptor,
    target: &str,
    visited: &mut HashSet<&'a str>,
) -> bool {
    let Some(TypeDescriptor::Object(object)) = spec.resolve(descriptor) else {
        return false;
    };
    if object.class_name == target {
        return true;
    }
    if !visited.insert(object.class_name.as_str()) {
        return false;
    }
    object
        .properties
        .iter()
        .any(|p| reaches(spec, &p.type_descriptor, target, visited))
}
