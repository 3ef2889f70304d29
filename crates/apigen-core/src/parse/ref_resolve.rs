use std::collections::HashSet;

use indexmap::IndexMap;

use super::content::{RequestBody, RequestBodyOrRef, Response, ResponseOrRef};
use super::parameter::{Parameter, ParameterOrRef};
use super::schema::{Schema, SchemaOrRef};
use super::spec::{Components, OpenApiSpec};
use crate::error::ModelError;

/// One step of a `$ref`-or-inline node.
pub enum Node<'n, T> {
    Inline(&'n T),
    Ref(&'n str),
}

/// A `$ref`-or-inline node from one of the component sections.
pub trait RefOr {
    type Target;

    fn node(&self) -> Node<'_, Self::Target>;
}

macro_rules! impl_ref_or {
    ($ty:ty, $target:ty, $variant:ident) => {
        impl RefOr for $ty {
            type Target = $target;

            fn node(&self) -> Node<'_, $target> {
                match self {
                    Self::Ref { ref_path } => Node::Ref(ref_path),
                    Self::$variant(item) => Node::Inline(item),
                }
            }
        }
    };
}

impl_ref_or!(ParameterOrRef, Parameter, Parameter);
impl_ref_or!(RequestBodyOrRef, RequestBody, RequestBody);
impl_ref_or!(ResponseOrRef, Response, Response);
impl_ref_or!(SchemaOrRef, Schema, Schema);

/// Follows `$ref` pointers into `#/components/*`.
///
/// Parameters, request bodies and responses are followed eagerly and handed
/// back inline. Schema references are only looked up, never expanded: the
/// schema resolver keeps them as lazy references.
#[derive(Debug, Clone, Copy)]
pub struct RefLookup<'a> {
    components: Option<&'a Components>,
}

impl<'a> RefLookup<'a> {
    pub fn new(spec: &'a OpenApiSpec) -> Self {
        Self {
            components: spec.components.as_ref(),
        }
    }

    pub fn parameter(&self, node: &'a ParameterOrRef) -> Result<&'a Parameter, ModelError> {
        self.follow(node, "parameters", |c| &c.parameters)
            .map(|(_, item)| item)
    }

    pub fn request_body(
        &self,
        node: &'a RequestBodyOrRef,
    ) -> Result<&'a RequestBody, ModelError> {
        self.follow(node, "requestBodies", |c| &c.request_bodies)
            .map(|(_, item)| item)
    }

    pub fn response(&self, node: &'a ResponseOrRef) -> Result<&'a Response, ModelError> {
        self.follow(node, "responses", |c| &c.responses)
            .map(|(_, item)| item)
    }

    /// Look up a schema reference, following alias components to the schema
    /// that actually declares a shape. Returns that schema's reference key.
    pub fn schema(&self, ref_path: &str) -> Result<(String, &'a Schema), ModelError> {
        let node = self.lookup(ref_path, "schemas", |c| &c.schemas)?;
        let (key, schema) = self.follow(node, "schemas", |c| &c.schemas)?;
        Ok((key.unwrap_or_else(|| ref_path.to_string()), schema))
    }

    /// Names of all component schemas, in declaration order.
    pub fn schema_entries(&self) -> impl Iterator<Item = (&'a String, &'a SchemaOrRef)> {
        self.components.into_iter().flat_map(|c| c.schemas.iter())
    }

    fn follow<T: RefOr>(
        &self,
        node: &'a T,
        section: &str,
        select: impl Fn(&'a Components) -> &'a IndexMap<String, T>,
    ) -> Result<(Option<String>, &'a T::Target), ModelError> {
        let mut current = node;
        let mut last_key = None;
        let mut visited = HashSet::new();
        loop {
            let ref_path = match current.node() {
                Node::Inline(item) => return Ok((last_key, item)),
                Node::Ref(ref_path) => ref_path,
            };
            if !visited.insert(ref_path.to_string()) {
                return Err(ModelError::UnresolvedReference {
                    location: ref_path.to_string(),
                    reference: format!("circular alias chain through {ref_path}"),
                });
            }
            current = self.lookup(ref_path, section, &select)?;
            last_key = Some(ref_path.to_string());
        }
    }

    fn lookup<T>(
        &self,
        ref_path: &str,
        section: &str,
        select: impl Fn(&'a Components) -> &'a IndexMap<String, T>,
    ) -> Result<&'a T, ModelError> {
        let name = parse_ref_name(ref_path, section)?;
        self.components
            .and_then(|c| select(c).get(name))
            .ok_or_else(|| ModelError::UnresolvedReference {
                location: ref_path.to_string(),
                reference: ref_path.to_string(),
            })
    }
}

/// Parse a `$ref` path like `#/components/schemas/Foo` and extract the name.
pub fn parse_ref_name<'a>(ref_path: &'a str, expected_section: &str) -> Result<&'a str, ModelError> {
    let invalid = || ModelError::UnresolvedReference {
        location: ref_path.to_string(),
        reference: format!("expected a #/components/{expected_section}/<name> reference"),
    };
    let stripped = ref_path.strip_prefix("#/components/").ok_or_else(invalid)?;
    let (section, name) = stripped.split_once('/').ok_or_else(invalid)?;
    if section != expected_section || name.is_empty() {
        return Err(invalid());
    }
    Ok(name)
}

/// Escape one JSON-pointer reference token (RFC 6901).
pub fn escape_pointer_token(token: &str) -> String {
    token.replace('~', "~0").replace('/', "~1")
}

/// Append reference tokens to a JSON pointer.
pub fn pointer(base: &str, tokens: &[&str]) -> String {
    let mut out = base.to_string();
    for token in tokens {
        out.push('/');
        out.push_str(&escape_pointer_token(token));
    }
    out
}
