//! Chat tools and the tool calls a model echoes back.
//!
//! Every tool travels as `{"type": <tag>, <tag>: {...fields}}`.

use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::common::null_to_default;

pub const TOOL_TYPE_FUNCTION: &str = "function";
pub const TOOL_TYPE_RETRIEVAL: &str = "retrieval";
pub const TOOL_TYPE_WEB_SEARCH: &str = "web_search";
pub const TOOL_TYPE_CODE_INTERPRETER: &str = "code_interpreter";
pub const TOOL_TYPE_DRAWING_TOOL: &str = "drawing_tool";
pub const TOOL_TYPE_WEB_BROWSER: &str = "web_browser";

pub const CODE_INTERPRETER_SANDBOX_NONE: &str = "none";
pub const CODE_INTERPRETER_SANDBOX_AUTO: &str = "auto";

pub const TOOL_CHOICE_AUTO: &str = "auto";

/// A function the model may call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionToolFunction {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// JSON Schema of the arguments object.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<serde_json::Value>,
}

impl ChatCompletionToolFunction {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: None,
        }
    }

    pub fn with_parameters(mut self, schema: serde_json::Value) -> Self {
        self.parameters = Some(schema);
        self
    }

    /// Derive the parameter schema from an arguments type.
    #[cfg(feature = "schema")]
    pub fn with_parameters_of<T: schemars::JsonSchema>(self) -> crate::Result<Self> {
        let schema = schemars::schema_for!(T);
        let mut value = serde_json::to_value(schema)?;
        if let Some(obj) = value.as_object_mut() {
            obj.remove("$schema");
            obj.remove("title");
        }
        Ok(self.with_parameters(value))
    }
}

/// Search a knowledge base and answer from the hits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatCompletionToolRetrieval {
    pub knowledge_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub prompt_template: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatCompletionToolWebSearch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable: Option<bool>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub search_query: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub search_result: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatCompletionToolCodeInterpreter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sandbox: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatCompletionToolDrawingTool {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatCompletionToolWebBrowser {}

/// Any tool accepted by the chat endpoint.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatCompletionTool {
    Function(ChatCompletionToolFunction),
    Retrieval(ChatCompletionToolRetrieval),
    WebSearch(ChatCompletionToolWebSearch),
    CodeInterpreter(ChatCompletionToolCodeInterpreter),
    DrawingTool(ChatCompletionToolDrawingTool),
    WebBrowser(ChatCompletionToolWebBrowser),
}

impl ChatCompletionTool {
    pub fn tool_type(&self) -> &'static str {
        match self {
            ChatCompletionTool::Function(_) => TOOL_TYPE_FUNCTION,
            ChatCompletionTool::Retrieval(_) => TOOL_TYPE_RETRIEVAL,
            ChatCompletionTool::WebSearch(_) => TOOL_TYPE_WEB_SEARCH,
            ChatCompletionTool::CodeInterpreter(_) => TOOL_TYPE_CODE_INTERPRETER,
            ChatCompletionTool::DrawingTool(_) => TOOL_TYPE_DRAWING_TOOL,
            ChatCompletionTool::WebBrowser(_) => TOOL_TYPE_WEB_BROWSER,
        }
    }
}

impl Serialize for ChatCompletionTool {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let tag = self.tool_type();
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("type", tag)?;
        match self {
            ChatCompletionTool::Function(v) => map.serialize_entry(tag, v)?,
            ChatCompletionTool::Retrieval(v) => map.serialize_entry(tag, v)?,
            ChatCompletionTool::WebSearch(v) => map.serialize_entry(tag, v)?,
            ChatCompletionTool::CodeInterpreter(v) => map.serialize_entry(tag, v)?,
            ChatCompletionTool::DrawingTool(v) => map.serialize_entry(tag, v)?,
            ChatCompletionTool::WebBrowser(v) => map.serialize_entry(tag, v)?,
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ChatCompletionTool {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut obj = serde_json::Map::<String, serde_json::Value>::deserialize(deserializer)?;
        let tag = match obj.remove("type") {
            Some(serde_json::Value::String(s)) => s,
            _ => return Err(D::Error::missing_field("type")),
        };
        let payload = obj
            .remove(&tag)
            .unwrap_or_else(|| serde_json::Value::Object(Default::default()));

        fn inner<T: serde::de::DeserializeOwned, E: serde::de::Error>(
            v: serde_json::Value,
        ) -> Result<T, E> {
            serde_json::from_value(v).map_err(E::custom)
        }

        match tag.as_str() {
            TOOL_TYPE_FUNCTION => inner(payload).map(ChatCompletionTool::Function),
            TOOL_TYPE_RETRIEVAL => inner(payload).map(ChatCompletionTool::Retrieval),
            TOOL_TYPE_WEB_SEARCH => inner(payload).map(ChatCompletionTool::WebSearch),
            TOOL_TYPE_CODE_INTERPRETER => inner(payload).map(ChatCompletionTool::CodeInterpreter),
            TOOL_TYPE_DRAWING_TOOL => inner(payload).map(ChatCompletionTool::DrawingTool),
            TOOL_TYPE_WEB_BROWSER => inner(payload).map(ChatCompletionTool::WebBrowser),
            other => Err(D::Error::unknown_variant(
                other,
                &[
                    TOOL_TYPE_FUNCTION,
                    TOOL_TYPE_RETRIEVAL,
                    TOOL_TYPE_WEB_SEARCH,
                    TOOL_TYPE_CODE_INTERPRETER,
                    TOOL_TYPE_DRAWING_TOOL,
                    TOOL_TYPE_WEB_BROWSER,
                ],
            )),
        }
    }
}

impl From<ChatCompletionToolFunction> for ChatCompletionTool {
    fn from(v: ChatCompletionToolFunction) -> Self {
        ChatCompletionTool::Function(v)
    }
}

impl From<ChatCompletionToolRetrieval> for ChatCompletionTool {
    fn from(v: ChatCompletionToolRetrieval) -> Self {
        ChatCompletionTool::Retrieval(v)
    }
}

impl From<ChatCompletionToolWebSearch> for ChatCompletionTool {
    fn from(v: ChatCompletionToolWebSearch) -> Self {
        ChatCompletionTool::WebSearch(v)
    }
}

impl From<ChatCompletionToolCodeInterpreter> for ChatCompletionTool {
    fn from(v: ChatCompletionToolCodeInterpreter) -> Self {
        ChatCompletionTool::CodeInterpreter(v)
    }
}

impl From<ChatCompletionToolDrawingTool> for ChatCompletionTool {
    fn from(v: ChatCompletionToolDrawingTool) -> Self {
        ChatCompletionTool::DrawingTool(v)
    }
}

impl From<ChatCompletionToolWebBrowser> for ChatCompletionTool {
    fn from(v: ChatCompletionToolWebBrowser) -> Self {
        ChatCompletionTool::WebBrowser(v)
    }
}

// Response side.

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionToolCallFunction {
    #[serde(default, deserialize_with = "null_to_default")]
    pub name: String,
    /// Raw JSON, as produced by the model.
    #[serde(default)]
    pub arguments: serde_json::Value,
}

impl ChatCompletionToolCallFunction {
    /// Decode the arguments into a concrete type.
    ///
    /// Some models send the arguments object as a JSON-encoded string; both
    /// forms are accepted.
    pub fn parse_arguments<T: serde::de::DeserializeOwned>(&self) -> crate::Result<T> {
        match &self.arguments {
            serde_json::Value::String(s) => Ok(serde_json::from_str(s)?),
            other => Ok(T::deserialize(other)?),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatCompletionToolCallCodeInterpreterOutput {
    #[serde(rename = "type", default, deserialize_with = "null_to_default")]
    pub output_type: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub logs: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub file: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatCompletionToolCallCodeInterpreter {
    #[serde(default, deserialize_with = "null_to_default")]
    pub input: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub outputs: Vec<ChatCompletionToolCallCodeInterpreterOutput>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatCompletionToolCallDrawingToolOutput {
    #[serde(default, deserialize_with = "null_to_default")]
    pub image: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatCompletionToolCallDrawingTool {
    #[serde(default, deserialize_with = "null_to_default")]
    pub input: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub outputs: Vec<ChatCompletionToolCallDrawingToolOutput>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatCompletionToolCallWebBrowserOutput {
    #[serde(default, deserialize_with = "null_to_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub link: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub content: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatCompletionToolCallWebBrowser {
    #[serde(default, deserialize_with = "null_to_default")]
    pub input: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub outputs: Vec<ChatCompletionToolCallWebBrowserOutput>,
}

/// A tool invocation reported by the model. The payload matching `type` is set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionToolCall {
    #[serde(default, deserialize_with = "null_to_default")]
    pub id: String,
    #[serde(rename = "type", default, deserialize_with = "null_to_default")]
    pub call_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function: Option<ChatCompletionToolCallFunction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_interpreter: Option<ChatCompletionToolCallCodeInterpreter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drawing_tool: Option<ChatCompletionToolCallDrawingTool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_browser: Option<ChatCompletionToolCallWebBrowser>,
}
