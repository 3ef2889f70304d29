use std::collections::HashSet;

use apigen_core::ir::{
    DEFAULT_STATUS, ObjectType, OperationDescriptor, ParameterPlacement, RequestBodyDescriptor,
    RequestMediaType, ResponseBranch, ResponseDescriptor, SpecMetadata, status_code,
};
use minijinja::{Value, context};

use crate::type_mapper::{
    descriptor_to_rust, field_ident, property_idents, string_literal, type_ident,
};

/// Identifier of the request body argument in every generated signature.
const BODY_IDENT: &str = "body";

/// Build the template context of every operation, in declaration order.
///
/// The spec trait, the client, and the server all render from these
/// contexts, so argument names and order agree across the three files.
pub fn operation_contexts(spec: &SpecMetadata) -> Vec<Value> {
    spec.operations
        .iter()
        .map(|op| operation_context(spec, op))
        .collect()
}

fn operation_context(spec: &SpecMetadata, op: &OperationDescriptor) -> Value {
    let mut used = HashSet::new();
    if op.request_body.is_some() {
        used.insert(BODY_IDENT.to_string());
    }

    let mut params = Vec::with_capacity(op.parameters.len());
    let mut call_args = Vec::with_capacity(op.parameters.len() + 1);
    let mut path_idents = Vec::new();
    for param in &op.parameters {
        let mut ident = field_ident(&param.name);
        if !used.insert(ident.clone()) {
            ident = format!("{}_{}", ident.trim_start_matches("r#"), param.placement.as_str());
            used.insert(ident.clone());
        }
        let base_type = descriptor_to_rust(spec, &param.property.type_descriptor);
        let required = param.property.required;
        let full_type = if required {
            base_type.clone()
        } else {
            format!("Option<{base_type}>")
        };
        let wire = string_literal(&param.name);
        let source = match param.placement {
            ParameterPlacement::Path => format!("path.get({wire}).map(String::as_str)"),
            ParameterPlacement::Query => format!("query.get({wire}).map(String::as_str)"),
            ParameterPlacement::Header => format!("header_str(&headers, {wire})"),
        };
        let parsed = format!("parse_param::<{base_type}>({source}, {wire})?");
        let extract = if required {
            format!("required({parsed}, {wire})?")
        } else {
            parsed
        };
        if param.placement == ParameterPlacement::Path {
            path_idents.push((param.name.clone(), ident.clone()));
        }
        call_args.push(ident.clone());
        params.push(context! {
            ident => ident,
            name => param.name.clone(),
            wire => wire,
            placement => param.placement.as_str(),
            base_type => base_type,
            type => full_type,
            required => required,
            extract => extract,
        });
    }

    let body = op.request_body.as_ref().map(|body| body_context(spec, body));
    if body.is_some() {
        call_args.push(BODY_IDENT.to_string());
    }

    let name = field_ident(&op.name.snake_case);
    context! {
        name => name.clone(),
        handler => format!("handle_{}", name.trim_start_matches("r#")),
        operation_id => op.operation_id.clone(),
        method => op.method.as_lower(),
        path => string_literal(&op.path),
        path_segments => path_segments(&op.path, &path_idents),
        has_path_params => !path_idents.is_empty(),
        docs => doc_lines(op.summary.as_deref(), op.description.as_deref()),
        params => params,
        call_args => call_args,
        body => body,
        response => response_context(spec, &op.response),
    }
}

fn body_context(spec: &SpecMetadata, body: &RequestBodyDescriptor) -> Value {
    let type_name = type_ident(&body.class_name);
    let variants: Vec<Value> = body
        .content
        .iter()
        .map(|(media, descriptor)| {
            let rust_type = descriptor_to_rust(spec, descriptor);
            let variant = media.branch_name();
            let encode = match media {
                RequestMediaType::Json => "request.json(&payload)".to_string(),
                RequestMediaType::FormData => "request.form(&payload)".to_string(),
                RequestMediaType::Xml => "request\n                .header(reqwest::header::CONTENT_TYPE, \"application/xml\")\n                .body(quick_xml::se::to_string(&payload).map_err(|err| ClientError::Xml(err.to_string()))?)".to_string(),
            };
            let decode = match media {
                RequestMediaType::Json => format!(
                    "axum::Json::<{rust_type}>::from_request(request, &()).await.map_err(IntoResponse::into_response)?.0"
                ),
                RequestMediaType::FormData => format!(
                    "axum::Form::<{rust_type}>::from_request(request, &()).await.map_err(IntoResponse::into_response)?.0"
                ),
                RequestMediaType::Xml => format!("decode_xml::<{rust_type}>(request).await?"),
            };
            let value = format!("{type_name}::{variant}({decode})");
            let pattern = format!("{type_name}::{variant}(payload)");
            context! {
                name => variant,
                pattern => if body.required { pattern } else { format!("Some({pattern})") },
                mime => string_literal(media.mime()),
                type => rust_type,
                encode => encode,
                decode => if body.required { value } else { format!("Some({value})") },
            }
        })
        .collect();

    let param_type = if body.required {
        type_name.clone()
    } else {
        format!("Option<{type_name}>")
    };
    context! {
        ident => BODY_IDENT,
        type => type_name,
        param_type => param_type,
        required => body.required,
        variants => variants,
    }
}

fn response_context(spec: &SpecMetadata, response: &ResponseDescriptor) -> Value {
    let mut branches = Vec::with_capacity(response.branches.len());
    let mut default_branch = None;
    for (status, branch) in &response.branches {
        let ctx = branch_context(spec, status, branch);
        if status == DEFAULT_STATUS {
            default_branch = Some(ctx);
        } else {
            branches.push(ctx);
        }
    }
    // The catch-all arm has to come last in a `match`.
    let has_default = default_branch.is_some();
    branches.extend(default_branch);
    context! {
        name => type_ident(&response.class_name),
        branches => branches,
        has_default => has_default,
    }
}

fn branch_context(spec: &SpecMetadata, status: &str, branch: &ResponseBranch) -> Value {
    let is_default = status == DEFAULT_STATUS;
    let code = status_code(status);
    let body_type = branch.payload().map(|p| descriptor_to_rust(spec, p));
    let headers = branch.headers();

    let mut names: Vec<&str> = Vec::new();
    if is_default {
        names.push("status");
    }
    if body_type.is_some() {
        names.push("body");
    }
    if headers.is_some() {
        names.push("headers");
    }
    let pattern = if names.is_empty() {
        String::new()
    } else {
        format!(" {{ {} }}", names.join(", "))
    };

    let status_expr = if is_default {
        "status_code(status)".to_string()
    } else {
        format!("status_code({})", code.unwrap_or(500))
    };
    let into_response = match &body_type {
        Some(_) => format!("({status_expr}, axum::Json(body)).into_response()"),
        None => format!("{status_expr}.into_response()"),
    };

    let match_arm = match code {
        Some(code) if !is_default => code.to_string(),
        _ => "status".to_string(),
    };

    context! {
        variant => type_ident(branch.class_name()),
        status => code,
        match_arm => match_arm,
        is_default => is_default,
        body_type => body_type,
        headers_type => headers.map(|h| type_ident(&h.class_name)),
        headers => headers.map(|h| header_contexts(spec, h)).unwrap_or_default(),
        pattern => pattern,
        into_response => into_response,
    }
}

fn header_contexts(spec: &SpecMetadata, headers: &ObjectType) -> Vec<Value> {
    let idents = property_idents(&headers.properties);
    headers
        .properties
        .iter()
        .zip(idents)
        .map(|(p, ident)| {
            context! {
                ident => ident,
                wire => string_literal(&p.name),
                type => descriptor_to_rust(spec, &p.type_descriptor),
                required => p.required,
            }
        })
        .collect()
}

/// Rust expressions for the URL path segments, with placeholders substituted.
fn path_segments(path: &str, path_idents: &[(String, String)]) -> Vec<String> {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            if !segment.contains('{') {
                return string_literal(segment);
            }
            let mut template = String::new();
            let mut args = Vec::new();
            let mut rest = segment;
            while let Some(start) = rest.find('{') {
                let Some(len) = rest[start..].find('}') else {
                    break;
                };
                template.push_str(&rest[..start]);
                template.push_str("{}");
                let name = &rest[start + 1..start + len];
                let ident = path_idents
                    .iter()
                    .find(|(wire, _)| wire == name)
                    .map(|(_, ident)| ident.clone())
                    .unwrap_or_else(|| field_ident(name));
                args.push(ident);
                rest = &rest[start + len + 1..];
            }
            template.push_str(rest);
            if template == "{}" && args.len() == 1 {
                format!("&{}.to_string()", args[0])
            } else {
                format!("&format!({}, {})", string_literal(&template), args.join(", "))
            }
        })
        .collect()
}

/// Doc comment lines from an optional summary and description.
pub fn doc_lines(summary: Option<&str>, description: Option<&str>) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    for text in [summary, description].into_iter().flatten() {
        if text.trim().is_empty() {
            continue;
        }
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.extend(text.trim().lines().map(|l| l.trim_end().to_string()));
    }
    lines
}
