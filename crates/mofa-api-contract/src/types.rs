//! API contract types for the MoFA Stage agent REST service

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

use crate::error::ApiContractError;
use crate::routes;

/// Timeout the backend applies to `run` when the caller does not pick one
pub const DEFAULT_RUN_TIMEOUT_SECS: u64 = 5;

/// File extensions the backend serves as raw image bytes instead of JSON
pub const IMAGE_EXTENSIONS: &[&str] = &[
    ".png", ".jpg", ".jpeg", ".gif", ".svg", ".webp", ".bmp", ".ico",
];

/// File extensions the backend serves as raw video bytes instead of JSON
pub const VIDEO_EXTENSIONS: &[&str] = &[
    ".mp4", ".webm", ".ogg", ".avi", ".mov", ".mkv", ".flv", ".wmv", ".m4v", ".3gp",
];

/// Where an agent lives on the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgentType {
    #[serde(rename = "agent-hub")]
    AgentHub,
    #[serde(rename = "examples")]
    Examples,
}

impl AgentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentType::AgentHub => "agent-hub",
            AgentType::Examples => "examples",
        }
    }
}

impl fmt::Display for AgentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgentType {
    type Err = ApiContractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "agent-hub" => Ok(AgentType::AgentHub),
            "examples" => Ok(AgentType::Examples),
            other => Err(ApiContractError::InvalidAgentType(other.to_string())),
        }
    }
}

/// How the backend should launch an agent; `Auto` probes agent-hub first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunTarget {
    Auto,
    Example,
    Atomic,
}

impl RunTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunTarget::Auto => "auto",
            RunTarget::Example => "example",
            RunTarget::Atomic => "atomic",
        }
    }
}

impl fmt::Display for RunTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RunTarget {
    type Err = ApiContractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(RunTarget::Auto),
            "example" => Ok(RunTarget::Example),
            "atomic" => Ok(RunTarget::Atomic),
            other => Err(ApiContractError::InvalidRunTarget(other.to_string())),
        }
    }
}

/// Identifier of a running agent process
///
/// The backend has returned both numeric and string pids, so either is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProcessId {
    Number(u64),
    Text(String),
}

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessId::Number(n) => write!(f, "{}", n),
            ProcessId::Text(s) => f.write_str(s),
        }
    }
}

impl From<u64> for ProcessId {
    fn from(value: u64) -> Self {
        ProcessId::Number(value)
    }
}

impl From<&str> for ProcessId {
    fn from(value: &str) -> Self {
        ProcessId::Text(value.to_string())
    }
}

/// Agent creation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct AgentDescriptor {
    #[validate(length(min = 1, message = "Agent name is required"))]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub authors: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub agent_type: Option<AgentType>,
}

impl AgentDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
            authors: None,
            agent_type: None,
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_authors(mut self, authors: impl Into<String>) -> Self {
        self.authors = Some(authors.into());
        self
    }

    pub fn with_agent_type(mut self, agent_type: AgentType) -> Self {
        self.agent_type = Some(agent_type);
        self
    }
}

/// Copy request; `agent_type: null` asks the server to detect the source type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CopyAgentRequest {
    #[validate(length(min = 1, message = "Source agent name is required"))]
    pub source: String,
    #[validate(length(min = 1, message = "Target agent name is required"))]
    pub target: String,
    pub agent_type: Option<AgentType>,
}

/// Run request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunAgentRequest {
    pub timeout: u64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub agent_type: Option<RunTarget>,
}

impl Default for RunAgentRequest {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_RUN_TIMEOUT_SECS,
            agent_type: None,
        }
    }
}

impl RunAgentRequest {
    pub fn with_timeout(timeout: u64) -> Self {
        Self {
            timeout,
            agent_type: None,
        }
    }

    pub fn target(mut self, target: RunTarget) -> Self {
        self.agent_type = Some(target);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateFileRequest {
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct RenameRequest {
    #[validate(length(min = 1, message = "New name is required"))]
    pub new_name: String,
}

/// Dataflow generation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct DataflowRequest {
    #[validate(length(min = 1, message = "At least one node must be selected"))]
    pub selected_nodes: Vec<String>,
    #[validate(length(min = 1, message = "Flow description is required"))]
    pub flow_description: String,
    #[validate(length(min = 1, message = "Flow name is required"))]
    pub flow_name: String,
}

impl DataflowRequest {
    pub fn new<I, S>(
        selected_nodes: I,
        flow_description: impl Into<String>,
        flow_name: impl Into<String>,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            selected_nodes: selected_nodes.into_iter().map(Into::into).collect(),
            flow_description: flow_description.into(),
            flow_name: flow_name.into(),
        }
    }
}

/// A file inside an agent's directory
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileReference {
    pub agent_name: String,
    pub file_path: String,
    pub agent_type: Option<AgentType>,
}

impl FileReference {
    pub fn new(agent_name: impl Into<String>, file_path: impl Into<String>) -> Self {
        Self {
            agent_name: agent_name.into(),
            file_path: file_path.into(),
            agent_type: None,
        }
    }

    pub fn with_agent_type(mut self, agent_type: AgentType) -> Self {
        self.agent_type = Some(agent_type);
        self
    }

    /// Absolute endpoint path for this file
    pub fn path(&self) -> String {
        routes::agent_file(&self.agent_name, &self.file_path)
    }

    pub fn rename_path(&self) -> String {
        routes::rename_file(&self.agent_name, &self.file_path)
    }

    /// Whether the backend answers a read of this file with raw bytes
    pub fn is_media(&self) -> bool {
        is_media_path(&self.file_path)
    }
}

/// Whether `path` has an image or video extension (case-insensitive)
pub fn is_media_path(path: &str) -> bool {
    let lower = path.to_lowercase();
    IMAGE_EXTENSIONS
        .iter()
        .chain(VIDEO_EXTENSIONS.iter())
        .any(|ext| lower.ends_with(ext))
}

/// Path a file ends up at after a rename: the last segment is replaced
pub fn renamed_path(file_path: &str, new_name: &str) -> String {
    match file_path.rsplit_once('/') {
        Some((parent, _)) => format!("{}/{}", parent, new_name),
        None => new_name.to_string(),
    }
}

/// Generic `{ success, message, ... }` reply
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OperationResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub message: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl OperationResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            ..Default::default()
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn field(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }
}

/// `GET /agents/`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentListResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub hub_agents: Vec<String>,
    #[serde(default)]
    pub example_agents: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentDetails {
    #[serde(default)]
    pub files: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `GET /agents/{name}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentDetailsResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub agent: AgentDetails,
}

/// `POST /agents/{name}/run`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunAgentResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub process_id: Option<ProcessId>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// `GET /agents/{name}/logs`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentLogsResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub logs: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
}

/// `GET /agents/{name}/files`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentFilesResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub files: Vec<Value>,
}

/// `GET /agents/{name}/files/{path}` for text files
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileContentResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub content: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none", default)]
    pub file_type: Option<String>,
}

/// `POST /agents/{name}/files/{path}/rename`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub new_path: Option<String>,
}

/// `GET /agents/{name}/dataflow-file`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataflowFileResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub dataflow_file: String,
    #[serde(default)]
    pub agent_path: String,
    #[serde(default)]
    pub all_dataflow_files: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_agent_descriptor_omits_absent_fields() {
        let body = serde_json::to_value(AgentDescriptor::new("demo")).unwrap();
        assert_eq!(body, json!({ "name": "demo" }));

        let full = AgentDescriptor::new("demo")
            .with_version("0.1.0")
            .with_authors("Ada")
            .with_agent_type(AgentType::Examples);
        assert_eq!(
            serde_json::to_value(full).unwrap(),
            json!({ "name": "demo", "version": "0.1.0", "authors": "Ada", "agent_type": "examples" })
        );
    }

    #[test]
    fn test_copy_request_sends_null_agent_type() {
        let request = CopyAgentRequest {
            source: "a".into(),
            target: "b".into(),
            agent_type: None,
        };
        assert_eq!(
            serde_json::to_value(request).unwrap(),
            json!({ "source": "a", "target": "b", "agent_type": null })
        );
    }

    #[test]
    fn test_run_request_defaults_to_five_seconds() {
        assert_eq!(
            serde_json::to_value(RunAgentRequest::default()).unwrap(),
            json!({ "timeout": 5 })
        );
        assert_eq!(
            serde_json::to_value(RunAgentRequest::with_timeout(30).target(RunTarget::Atomic))
                .unwrap(),
            json!({ "timeout": 30, "agent_type": "atomic" })
        );
    }

    #[test]
    fn test_dataflow_request_wire_names() {
        let request = DataflowRequest::new(["n1", "n2"], "desc", "flow1");
        assert_eq!(
            serde_json::to_value(request).unwrap(),
            json!({
                "selected_nodes": ["n1", "n2"],
                "flow_description": "desc",
                "flow_name": "flow1"
            })
        );
    }

    #[test]
    fn test_agent_type_parsing() {
        assert_eq!("agent-hub".parse::<AgentType>().unwrap(), AgentType::AgentHub);
        assert_eq!("examples".parse::<AgentType>().unwrap(), AgentType::Examples);
        assert!(matches!(
            "hub".parse::<AgentType>(),
            Err(ApiContractError::InvalidAgentType(s)) if s == "hub"
        ));
        assert_eq!(RunTarget::Example.to_string(), "example");
        assert!("remote".parse::<RunTarget>().is_err());
    }

    #[test]
    fn test_process_id_accepts_numbers_and_strings() {
        let response: RunAgentResponse =
            serde_json::from_str(r#"{"success":true,"process_id":1234}"#).unwrap();
        assert_eq!(response.process_id, Some(ProcessId::Number(1234)));

        let response: RunAgentResponse =
            serde_json::from_str(r#"{"success":true,"process_id":"abc-1","log_file":"x.log"}"#)
                .unwrap();
        assert_eq!(response.process_id.as_ref().unwrap().to_string(), "abc-1");
        assert_eq!(response.extra.get("log_file"), Some(&json!("x.log")));
    }

    #[test]
    fn test_operation_response_keeps_unknown_fields() {
        let response: OperationResponse =
            serde_json::from_str(r#"{"success":true,"nodes":[{"name":"n1"}]}"#).unwrap();
        assert!(response.success);
        assert_eq!(response.message, None);
        assert_eq!(response.field("nodes"), Some(&json!([{ "name": "n1" }])));
    }

    #[test]
    fn test_file_reference_paths() {
        let file = FileReference::new("demo", "a/b.py");
        assert_eq!(file.path(), "/api/agents/demo/files/a/b.py");
        assert_eq!(file.rename_path(), "/api/agents/demo/files/a/b.py/rename");
        assert!(!file.is_media());
        assert_eq!(file.agent_type, None);
        assert!(FileReference::new("demo", "assets/Logo.PNG").is_media());

        let typed = FileReference::new("demo", "a/b.py").with_agent_type(AgentType::Examples);
        assert_eq!(typed.agent_type, Some(AgentType::Examples));
        assert_eq!(typed.path(), file.path());
    }

    #[test]
    fn test_media_detection() {
        assert!(is_media_path("clip.mp4"));
        assert!(is_media_path("img/icon.SVG"));
        assert!(!is_media_path("dataflow.yml"));
        assert!(!is_media_path("png"));
    }

    #[test]
    fn test_renamed_path_replaces_last_segment() {
        assert_eq!(renamed_path("src/old.py", "new.py"), "src/new.py");
        assert_eq!(renamed_path("old.py", "new.py"), "new.py");
        assert_eq!(renamed_path("a/b/c", "d"), "a/b/d");
    }
}
