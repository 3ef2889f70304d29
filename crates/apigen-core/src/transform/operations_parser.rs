use std::collections::HashMap;

use heck::ToPascalCase;
use indexmap::IndexMap;

use crate::error::ModelError;
use crate::ir::*;
use crate::parse::content::{Header, RequestBodyOrRef, Response, ResponseOrRef};
use crate::parse::operation::{Operation, PathItem};
use crate::parse::parameter::{Parameter, ParameterLocation, ParameterOrRef};
use crate::parse::ref_resolve::pointer;
use crate::parse::schema::SchemaOrRef;
use crate::parse::spec::OpenApiSpec;

use super::name_normalizer::normalize_name;
use super::schema_resolver::{SchemaResolver, relocate};

/// Branch names of payload-less responses.
const BARE_STATUS_NAMES: &[(&str, &str)] = &[
    ("200", "Ok"),
    ("201", "Created"),
    ("302", "Redirect"),
    ("404", "NotFound"),
    (DEFAULT_STATUS, "Default"),
];

/// Name of a payload-less branch, if the status has one.
pub fn bare_status_name(status: &str) -> Option<&'static str> {
    BARE_STATUS_NAMES
        .iter()
        .find(|(code, _)| *code == status)
        .map(|(_, name)| *name)
}

/// Where an operation sits in the document and the name it generates under.
struct OperationContext<'o> {
    path: &'o str,
    location: String,
    class_name: String,
}

/// Build one descriptor per (path, method), in declaration order.
pub fn parse_operations<'a>(
    spec: &'a OpenApiSpec,
    resolver: &mut SchemaResolver<'a>,
) -> Result<Vec<OperationDescriptor>, ModelError> {
    let mut operations = Vec::new();
    // snake_case operation id -> location that declared it
    let mut seen_ids: HashMap<String, String> = HashMap::new();

    for (path, item) in &spec.paths {
        let path_location = pointer("#/paths", &[path]);
        for (method, operation) in path_operations(item, &path_location)? {
            let location = pointer(&path_location, &[method.as_lower()]);
            let operation_id = operation
                .operation_id
                .as_deref()
                .filter(|id| !id.trim().is_empty())
                .ok_or_else(|| ModelError::MissingRequiredOperationShape {
                    location: location.clone(),
                    detail: "operationId is required".to_string(),
                })?;
            let name = normalize_name(operation_id);
            if let Some(first) = seen_ids.get(&name.snake_case) {
                return Err(ModelError::DuplicateOperationId {
                    operation_id: operation_id.to_string(),
                    first: first.clone(),
                    second: location,
                });
            }
            seen_ids.insert(name.snake_case.clone(), location.clone());

            let ctx = OperationContext {
                path,
                location,
                class_name: name.pascal_case.clone(),
            };
            let parameters = parse_parameters(
                resolver,
                &ctx,
                (&item.parameters, &path_location),
                &operation.parameters,
            )?;
            let request_body = match &operation.request_body {
                Some(body) => parse_request_body(resolver, &ctx, body)?,
                None => None,
            };
            let response = parse_responses(resolver, &ctx, &operation.responses)?;
            log::debug!("parsed {} {path} as {operation_id}", method.as_str());

            operations.push(OperationDescriptor {
                path: path.clone(),
                method,
                summary: operation.summary.clone(),
                description: operation.description.clone(),
                operation_id: operation_id.to_string(),
                name,
                parameters,
                request_body,
                response,
            });
        }
    }

    Ok(operations)
}

fn path_operations<'a>(
    item: &'a PathItem,
    location: &str,
) -> Result<Vec<(HttpMethod, &'a Operation)>, ModelError> {
    let mut operations = Vec::new();
    let mut unsupported = Vec::new();
    for (name, operation) in item.operations() {
        match HttpMethod::from_lower(name) {
            Some(method) => operations.push((method, operation)),
            None => unsupported.push(name),
        }
    }
    if !unsupported.is_empty() {
        return Err(ModelError::MissingRequiredOperationShape {
            location: location.to_string(),
            detail: format!(
                "unsupported method(s) {}; only get, post, put and delete are bound",
                unsupported.join(", ")
            ),
        });
    }
    if operations.is_empty() {
        return Err(ModelError::MissingRequiredOperationShape {
            location: location.to_string(),
            detail: "path declares no operation".to_string(),
        });
    }
    Ok(operations)
}

/// Merge path-level and operation parameters and resolve their types.
///
/// An operation parameter replaces a path-level one with the same name and
/// placement.
fn parse_parameters<'a>(
    resolver: &mut SchemaResolver<'a>,
    ctx: &OperationContext<'_>,
    (shared, shared_location): (&'a [ParameterOrRef], &str),
    own: &'a [ParameterOrRef],
) -> Result<Vec<ParameterDescriptor>, ModelError> {
    let lookup = resolver.lookup();
    let declared = shared
        .iter()
        .enumerate()
        .map(|(i, p)| (p, pointer(shared_location, &["parameters", &i.to_string()])))
        .chain(
            own.iter()
                .enumerate()
                .map(|(i, p)| (p, pointer(&ctx.location, &["parameters", &i.to_string()]))),
        );

    let mut merged: Vec<(&'a Parameter, String)> = Vec::new();
    for (node, location) in declared {
        let parameter = lookup
            .parameter(node)
            .map_err(|err| relocate(err, &location))?;
        let slot = merged
            .iter_mut()
            .find(|(p, _)| p.same_slot(parameter));
        match slot {
            Some(slot) => *slot = (parameter, location),
            None => merged.push((parameter, location)),
        }
    }

    let mut parameters = Vec::with_capacity(merged.len());
    for (parameter, location) in merged {
        let placement = match parameter.location {
            ParameterLocation::Query => ParameterPlacement::Query,
            ParameterLocation::Path => ParameterPlacement::Path,
            ParameterLocation::Header => ParameterPlacement::Header,
            ParameterLocation::Cookie => {
                return Err(ModelError::UnsupportedSchemaShape {
                    location,
                    detail: format!("cookie parameter `{}` is not supported", parameter.name),
                });
            }
        };
        let schema = parameter
            .schema
            .as_ref()
            .ok_or_else(|| ModelError::UnsupportedSchemaShape {
                location: location.clone(),
                detail: format!("parameter `{}` declares no schema", parameter.name),
            })?;
        let (primitive, format) = resolver.resolve_primitive(schema, &pointer(&location, &["schema"]))?;
        parameters.push(ParameterDescriptor {
            name: parameter.name.clone(),
            placement,
            property: PropertyDescriptor {
                name: parameter.name.clone(),
                type_descriptor: TypeDescriptor::Primitive(primitive),
                format,
                required: parameter.required || placement == ParameterPlacement::Path,
                description: parameter.description.clone(),
            },
        });
    }

    for placeholder in path_placeholders(ctx.path) {
        let declared = parameters
            .iter()
            .any(|p| p.placement == ParameterPlacement::Path && p.name == placeholder);
        if !declared {
            return Err(ModelError::MissingRequiredOperationShape {
                location: ctx.location.clone(),
                detail: format!("path placeholder `{{{placeholder}}}` has no path parameter"),
            });
        }
    }

    Ok(parameters)
}

/// Names of the `{placeholder}` segments of a path template.
pub fn path_placeholders(path: &str) -> impl Iterator<Item = &str> {
    path.split('{')
        .skip(1)
        .filter_map(|rest| rest.split_once('}').map(|(name, _)| name))
}

fn parse_request_body<'a>(
    resolver: &mut SchemaResolver<'a>,
    ctx: &OperationContext<'_>,
    node: &'a RequestBodyOrRef,
) -> Result<Option<RequestBodyDescriptor>, ModelError> {
    let location = pointer(&ctx.location, &["requestBody"]);
    let body = resolver
        .lookup()
        .request_body(node)
        .map_err(|err| relocate(err, &location))?;

    let mut content = IndexMap::new();
    for (media_type, media) in &body.content {
        let media_location = pointer(&location, &["content", media_type]);
        let tag = RequestMediaType::from_media_type(media_type).ok_or_else(|| {
            ModelError::UnsupportedMediaType {
                location: media_location.clone(),
                media_type: media_type.clone(),
            }
        })?;
        let Some(ref_path) = media.schema_ref() else {
            log::warn!("skipping {media_type} request body at {media_location}: only $ref schemas are generated");
            continue;
        };
        if content.contains_key(&tag) {
            log::warn!("skipping {media_type} at {media_location}: {} already declared", tag.mime());
            continue;
        }
        let descriptor = resolver.resolve_ref(ref_path, &pointer(&media_location, &["schema"]))?;
        content.insert(tag, descriptor);
    }

    if content.is_empty() {
        log::warn!("request body at {location} has no generated media type; treated as absent");
        return Ok(None);
    }

    let class_name = format!("{}Request", ctx.class_name);
    resolver.claim_name(&class_name, &location)?;
    let branches = content
        .iter()
        .map(|(tag, descriptor)| {
            let name = tag.branch_name().to_string();
            let branch = UnionBranch {
                class_name: name.clone(),
                components: vec![descriptor.clone()],
            };
            (name, branch)
        })
        .collect();

    Ok(Some(RequestBodyDescriptor {
        class_name: class_name.clone(),
        required: body.required,
        content,
        union: UnionType {
            class_name,
            branches,
        },
    }))
}

fn parse_responses<'a>(
    resolver: &mut SchemaResolver<'a>,
    ctx: &OperationContext<'_>,
    responses: &'a IndexMap<String, ResponseOrRef>,
) -> Result<ResponseDescriptor, ModelError> {
    if responses.is_empty() {
        return Err(ModelError::MissingRequiredOperationShape {
            location: ctx.location.clone(),
            detail: "operation declares no responses".to_string(),
        });
    }
    let location = pointer(&ctx.location, &["responses"]);
    let class_name = format!("{}Response", ctx.class_name);
    resolver.claim_name(&class_name, &location)?;

    let mut branches: IndexMap<String, ResponseBranch> = IndexMap::new();
    let mut union_branches = IndexMap::new();
    for (status, node) in responses {
        let status_location = pointer(&location, &[status]);
        if status != DEFAULT_STATUS && status_code(status).is_none() {
            return Err(ModelError::UnresolvableStatusCode {
                location: status_location,
                status: status.clone(),
            });
        }
        let response = resolver
            .lookup()
            .response(node)
            .map_err(|err| relocate(err, &status_location))?;

        let payload = match json_schema(response, &status_location)? {
            Some((media_type, schema)) => {
                let key = pointer(&status_location, &["content", media_type, "schema"]);
                let body_name = format!("{class_name}{}Body", status.to_pascal_case());
                Some(resolver.resolve(schema, &key, &body_name)?)
            }
            None => None,
        };

        let payload_name = payload
            .as_ref()
            .and_then(|p| resolver.registry().class_name_of(p))
            .map(str::to_string);
        let base_name = match payload_name {
            Some(name) => name,
            None => bare_status_name(status)
                .ok_or_else(|| ModelError::UnresolvableStatusCode {
                    location: status_location.clone(),
                    status: status.clone(),
                })?
                .to_string(),
        };
        let branch_name = unique_branch_name(&branches, base_name, status, &location)?;

        let headers = parse_headers(
            resolver,
            &format!("{class_name}{branch_name}Headers"),
            &response.headers,
            &status_location,
        )?;

        let mut components: Vec<TypeDescriptor> = payload.iter().cloned().collect();
        if let Some(headers) = &headers {
            components.push(TypeDescriptor::Object(headers.clone()));
        }
        union_branches.insert(
            status.clone(),
            UnionBranch {
                class_name: branch_name.clone(),
                components,
            },
        );

        let branch = match payload {
            Some(payload) => ResponseBranch::Parametrized {
                class_name: branch_name,
                payload,
                headers,
            },
            None => ResponseBranch::JustStatus {
                class_name: branch_name,
                headers,
            },
        };
        branches.insert(status.clone(), branch);
    }

    Ok(ResponseDescriptor {
        class_name: class_name.clone(),
        branches,
        union: UnionType {
            class_name,
            branches: union_branches,
        },
    })
}

/// Suffix a repeated branch name with its status key (`Error404`, `ErrorDefault`).
fn unique_branch_name(
    branches: &IndexMap<String, ResponseBranch>,
    base_name: String,
    status: &str,
    responses_location: &str,
) -> Result<String, ModelError> {
    let owner = |name: &str| {
        branches
            .iter()
            .find(|(_, branch)| branch.class_name() == name)
            .map(|(key, _)| key.clone())
    };
    if owner(&base_name).is_none() {
        return Ok(base_name);
    }
    let suffixed = format!("{base_name}{}", status.to_pascal_case());
    match owner(&suffixed) {
        None => Ok(suffixed),
        Some(first) => Err(ModelError::NameCollision {
            name: suffixed,
            first: pointer(responses_location, &[&first]),
            second: pointer(responses_location, &[status]),
        }),
    }
}

/// The JSON schema of a response, if any. XML and form bodies are accepted
/// but do not contribute a payload.
fn json_schema<'a>(
    response: &'a Response,
    location: &str,
) -> Result<Option<(&'a str, &'a SchemaOrRef)>, ModelError> {
    let mut json = None;
    for (media_type, media) in &response.content {
        match RequestMediaType::from_media_type(media_type) {
            Some(RequestMediaType::Json) => {
                if json.is_none() {
                    json = media.schema.as_ref().map(|s| (media_type.as_str(), s));
                }
            }
            Some(RequestMediaType::Xml | RequestMediaType::FormData) => {
                log::debug!("ignoring {media_type} body at {location}");
            }
            None => {
                return Err(ModelError::UnsupportedMediaType {
                    location: pointer(location, &["content", media_type]),
                    media_type: media_type.clone(),
                });
            }
        }
    }
    Ok(json)
}

fn parse_headers<'a>(
    resolver: &mut SchemaResolver<'a>,
    class_name: &str,
    headers: &'a IndexMap<String, Header>,
    status_location: &str,
) -> Result<Option<ObjectType>, ModelError> {
    if headers.is_empty() {
        return Ok(None);
    }
    let location = pointer(status_location, &["headers"]);
    resolver.claim_name(class_name, &location)?;

    let mut properties: Vec<PropertyDescriptor> = Vec::with_capacity(headers.len());
    for (name, header) in headers {
        let header_location = pointer(&location, &[name]);
        let lower = name.to_ascii_lowercase();
        if properties.iter().any(|p| p.name == lower) {
            return Err(ModelError::UnsupportedSchemaShape {
                location: header_location,
                detail: format!("header `{lower}` is declared more than once"),
            });
        }
        let (primitive, format) = match &header.schema {
            Some(schema) => {
                resolver.resolve_primitive(schema, &pointer(&header_location, &["schema"]))?
            }
            None => (PrimitiveType::String, None),
        };
        properties.push(PropertyDescriptor {
            name: lower,
            type_descriptor: TypeDescriptor::Primitive(primitive),
            format,
            required: header.required,
            description: header.description.clone(),
        });
    }

    Ok(Some(ObjectType {
        class_name: class_name.to_string(),
        description: None,
        properties,
    }))
}
