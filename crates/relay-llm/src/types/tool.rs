use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::schema::Schema;

/// A tool the model may use
///
/// Only function declarations can be forwarded to the Responses API. The
/// built-in capability fields exist so that requests written for other
/// backends are rejected loudly instead of silently losing a tool.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tool {
    /// Callable functions
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub function_declarations: Vec<FunctionDeclaration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retrieval: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_search: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_search_retrieval: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enterprise_web_search: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maps: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_context: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub computer_use: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_execution: Option<Value>,
}

impl Tool {
    /// Tool exposing the given functions
    pub fn functions(declarations: Vec<FunctionDeclaration>) -> Self {
        Self {
            function_declarations: declarations,
            ..Self::default()
        }
    }

    /// Name of the first built-in capability declared on this tool
    pub fn builtin_capability(&self) -> Option<&'static str> {
        [
            ("retrieval", &self.retrieval),
            ("web_search", &self.web_search),
            ("web_search_retrieval", &self.web_search_retrieval),
            ("enterprise_web_search", &self.enterprise_web_search),
            ("maps", &self.maps),
            ("url_context", &self.url_context),
            ("computer_use", &self.computer_use),
            ("code_execution", &self.code_execution),
        ]
        .into_iter()
        .find_map(|(name, field)| field.is_some().then_some(name))
    }
}

/// Declaration of a callable function
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FunctionDeclaration {
    /// Function name
    pub name: String,
    /// Human-readable description
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Parameters as a native schema
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Schema>,
    /// Parameters as a raw JSON schema, used when `parameters` is absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters_json_schema: Option<Value>,
}

/// Tool usage policy
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_calling_config: Option<FunctionCallingConfig>,
}

/// Function calling mode and allow-list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionCallingConfig {
    #[serde(default)]
    pub mode: FunctionCallingMode,
    /// Restrict calls to these function names
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allowed_function_names: Vec<String>,
}

/// How the model may call functions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FunctionCallingMode {
    /// Let the backend decide
    #[default]
    #[serde(rename = "MODE_UNSPECIFIED")]
    Unspecified,
    /// Model decides whether to call a function
    Auto,
    /// Model must call a function
    Any,
    /// Model must not call functions
    None,
    /// Model output is validated against the declarations; no Responses API equivalent
    Validated,
}

impl FunctionCallingMode {
    /// Canonical mode name
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unspecified => "MODE_UNSPECIFIED",
            Self::Auto => "AUTO",
            Self::Any => "ANY",
            Self::None => "NONE",
            Self::Validated => "VALIDATED",
        }
    }
}
