use serde::{Deserialize, Serialize};

use super::schema::SchemaOrRef;

/// The `in` keyword of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
    Cookie,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,

    #[serde(rename = "in")]
    pub location: ParameterLocation,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub required: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaOrRef>,
}

impl Parameter {
    /// Whether both declarations name the same parameter. Header names
    /// compare case-insensitively.
    pub fn same_slot(&self, other: &Parameter) -> bool {
        if self.location != other.location {
            return false;
        }
        match self.location {
            ParameterLocation::Header => self.name.eq_ignore_ascii_case(&other.name),
            _ => self.name == other.name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterOrRef {
    Ref {
        #[serde(rename = "$ref")]
        ref_path: String,
    },
    Parameter(Parameter),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn param(name: &str, location: ParameterLocation) -> Parameter {
        Parameter {
            name: name.to_string(),
            location,
            description: None,
            required: false,
            schema: None,
        }
    }

    #[test]
    fn test_same_slot() {
        let trace = param("X-Trace-Id", ParameterLocation::Header);
        assert!(trace.same_slot(&param("x-trace-id", ParameterLocation::Header)));
        assert!(!trace.same_slot(&param("X-Trace-Id", ParameterLocation::Query)));

        let limit = param("limit", ParameterLocation::Query);
        assert!(!limit.same_slot(&param("Limit", ParameterLocation::Query)));
    }
}
