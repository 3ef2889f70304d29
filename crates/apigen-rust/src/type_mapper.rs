use std::collections::HashSet;

use apigen_core::ir::{PrimitiveType, PropertyDescriptor, SpecMetadata, TypeDescriptor};
use heck::{ToPascalCase, ToSnakeCase};

const KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "dyn", "else", "enum", "extern",
    "false", "fn", "for", "gen", "if", "impl", "in", "let", "loop", "match", "mod", "move",
    "mut", "pub", "ref", "return", "static", "struct", "trait", "true", "type", "unsafe", "use",
    "where", "while", "abstract", "become", "box", "do", "final", "macro", "override", "priv",
    "try", "typeof", "unsized", "virtual", "yield",
];

/// Keywords that cannot be written as raw identifiers.
const RESERVED: &[&str] = &["self", "Self", "super", "crate", "_"];

pub fn primitive_to_rust(primitive: PrimitiveType) -> &'static str {
    match primitive {
        PrimitiveType::String => "String",
        PrimitiveType::Int32 => "i32",
        PrimitiveType::Int64 => "i64",
        PrimitiveType::Boolean => "bool",
    }
}

/// Map a descriptor to the Rust type that represents it in generated code.
///
/// Structural descriptors are known by their class name; references are
/// followed through the registry snapshot.
pub fn descriptor_to_rust(spec: &SpecMetadata, descriptor: &TypeDescriptor) -> String {
    match descriptor {
        TypeDescriptor::Primitive(p) => primitive_to_rust(*p).to_string(),
        TypeDescriptor::Array(a) => type_ident(&a.class_name),
        TypeDescriptor::Object(o) => type_ident(&o.class_name),
        TypeDescriptor::Union(u) => type_ident(&u.class_name),
        TypeDescriptor::Reference(_) => match spec.resolve(descriptor) {
            Some(TypeDescriptor::Primitive(p)) => primitive_to_rust(*p).to_string(),
            Some(resolved) => resolved
                .class_name()
                .map(type_ident)
                .unwrap_or_else(|| "serde_json::Value".to_string()),
            None => "serde_json::Value".to_string(),
        },
    }
}

/// A snake_case Rust identifier for a wire name.
pub fn field_ident(name: &str) -> String {
    let mut ident = name.to_snake_case();
    if ident.is_empty() {
        ident = "field".to_string();
    }
    if ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    if RESERVED.contains(&ident.as_str()) {
        ident.push('_');
    } else if KEYWORDS.contains(&ident.as_str()) {
        ident.insert_str(0, "r#");
    }
    ident
}

/// Field identifiers for an object's properties, in order.
///
/// Names that collapse to the same identifier get `_2`, `_3`, ... suffixes.
/// Struct definitions and every expression that builds or reads one of
/// those structs go through here.
pub fn property_idents(properties: &[PropertyDescriptor]) -> Vec<String> {
    let mut used = HashSet::new();
    properties
        .iter()
        .map(|property| {
            let base = field_ident(&property.name);
            let mut ident = base.clone();
            let mut n = 2;
            while !used.insert(ident.clone()) {
                ident = format!("{}_{n}", base.trim_start_matches("r#"));
                n += 1;
            }
            ident
        })
        .collect()
}

/// A PascalCase Rust type or variant name.
pub fn type_ident(name: &str) -> String {
    let is_ident = name.starts_with(|c: char| c.is_ascii_uppercase())
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if is_ident && name != "Self" {
        return name.to_string();
    }
    let mut ident = name.to_pascal_case();
    if ident.is_empty() {
        ident = "Unnamed".to_string();
    }
    if ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    if ident == "Self" {
        ident.push('_');
    }
    ident
}

/// Quote a string as a Rust string literal.
pub fn string_literal(value: &str) -> String {
    format!("{value:?}")
}
