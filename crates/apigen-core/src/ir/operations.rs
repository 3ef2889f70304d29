use indexmap::IndexMap;
use serde::Serialize;

use super::descriptors::{ObjectType, PropertyDescriptor, TypeDescriptor, UnionType};
use super::types::NormalizedName;

/// HTTP methods the generator binds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }

    pub fn as_lower(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
            HttpMethod::Delete => "delete",
        }
    }

    /// The bindable method for a lower-case OpenAPI method key.
    pub fn from_lower(name: &str) -> Option<Self> {
        match name {
            "get" => Some(HttpMethod::Get),
            "post" => Some(HttpMethod::Post),
            "put" => Some(HttpMethod::Put),
            "delete" => Some(HttpMethod::Delete),
            _ => None,
        }
    }
}

/// A fully resolved operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationDescriptor {
    /// Path template with `{param}` placeholders.
    pub path: String,
    pub method: HttpMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Verbatim `operationId`; unique across the document.
    pub operation_id: String,
    pub name: NormalizedName,
    pub parameters: Vec<ParameterDescriptor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_body: Option<RequestBodyDescriptor>,
    pub response: ResponseDescriptor,
}

/// Parameter placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterPlacement {
    Query,
    Path,
    Header,
}

impl ParameterPlacement {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterPlacement::Query => "query",
            ParameterPlacement::Path => "path",
            ParameterPlacement::Header => "header",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterDescriptor {
    pub name: String,
    pub placement: ParameterPlacement,
    /// Type and required-ness. Always required for path parameters.
    pub property: PropertyDescriptor,
}

/// Request encodings a handler can receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RequestMediaType {
    Json,
    Xml,
    FormData,
}

impl RequestMediaType {
    /// Map a declared media type (parameters such as `charset` ignored).
    pub fn from_media_type(media_type: &str) -> Option<Self> {
        let essence = media_type.split(';').next().unwrap_or_default().trim();
        match essence.to_ascii_lowercase().as_str() {
            "application/json" => Some(RequestMediaType::Json),
            "application/xml" => Some(RequestMediaType::Xml),
            "application/x-www-form-urlencoded" => Some(RequestMediaType::FormData),
            _ => None,
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            RequestMediaType::Json => "application/json",
            RequestMediaType::Xml => "application/xml",
            RequestMediaType::FormData => "application/x-www-form-urlencoded",
        }
    }

    /// Union branch key and variant name.
    pub fn branch_name(&self) -> &'static str {
        match self {
            RequestMediaType::Json => "Json",
            RequestMediaType::Xml => "Xml",
            RequestMediaType::FormData => "Form",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestBodyDescriptor {
    pub class_name: String,
    pub required: bool,
    pub content: IndexMap<RequestMediaType, TypeDescriptor>,
    /// The same content as a union keyed by [`RequestMediaType::branch_name`].
    #[serde(rename = "type")]
    pub union: UnionType,
}

/// One response alternative.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseBranch {
    /// No payload; the name comes from the well-known status table.
    JustStatus {
        class_name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        headers: Option<ObjectType>,
    },
    /// A JSON payload, named after the payload's class.
    Parametrized {
        class_name: String,
        payload: TypeDescriptor,
        #[serde(skip_serializing_if = "Option::is_none")]
        headers: Option<ObjectType>,
    },
}

impl ResponseBranch {
    pub fn class_name(&self) -> &str {
        match self {
            ResponseBranch::JustStatus { class_name, .. }
            | ResponseBranch::Parametrized { class_name, .. } => class_name,
        }
    }

    pub fn headers(&self) -> Option<&ObjectType> {
        match self {
            ResponseBranch::JustStatus { headers, .. }
            | ResponseBranch::Parametrized { headers, .. } => headers.as_ref(),
        }
    }

    pub fn payload(&self) -> Option<&TypeDescriptor> {
        match self {
            ResponseBranch::JustStatus { .. } => None,
            ResponseBranch::Parametrized { payload, .. } => Some(payload),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseDescriptor {
    pub class_name: String,
    /// Status code (or `default`) to branch, in declaration order.
    pub branches: IndexMap<String, ResponseBranch>,
    /// The same branches as a union keyed by status code.
    #[serde(rename = "type")]
    pub union: UnionType,
}

/// Key of the catch-all response.
pub const DEFAULT_STATUS: &str = "default";

/// Numeric status of a response key; `None` for `default`.
pub fn status_code(key: &str) -> Option<u16> {
    key.parse::<u16>().ok().filter(|c| (100..=599).contains(c))
}
