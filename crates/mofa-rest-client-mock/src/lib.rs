//! In-memory mock of the agent service for consumers' tests
//!
//! `MockClient` implements [`AgentApi`] against a small in-process model of
//! the backend: agents with files, running processes and a node catalog. It
//! answers with the same envelopes and the same 400/404 rules as the real
//! service, and records every call so tests can assert request counts.

use async_trait::async_trait;
use mofa_api_contract::validation::*;
use mofa_api_contract::{routes, *};
use mofa_client_api::{AgentApi, ClientApiError, ClientApiResult};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};
use thiserror::Error;
use tracing::debug;

const DEFAULT_VERSION: &str = "0.0.1";
const DEFAULT_AUTHORS: &str = "MoFA_Stage User";
const FIRST_PID: u64 = 1000;

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("invalid fixture JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// A request the mock received
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub method: &'static str,
    pub path: String,
    /// Query string as the REST client would send it, e.g. `agent_type=examples`
    pub query: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MockAgent {
    pub agent_type: AgentType,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default = "default_authors")]
    pub authors: String,
    #[serde(default)]
    pub files: BTreeMap<String, String>,
}

fn default_version() -> String {
    DEFAULT_VERSION.to_string()
}

fn default_authors() -> String {
    DEFAULT_AUTHORS.to_string()
}

impl MockAgent {
    pub fn new(agent_type: AgentType) -> Self {
        Self {
            agent_type,
            version: default_version(),
            authors: default_authors(),
            files: BTreeMap::new(),
        }
    }

    pub fn with_file(mut self, path: impl Into<String>, content: impl Into<String>) -> Self {
        self.files.insert(path.into(), content.into());
        self
    }

    fn file_list(&self) -> Vec<Value> {
        self.files.keys().map(|path| json!(path)).collect()
    }
}

/// Seed data for [`MockClient::from_fixture`]
#[derive(Debug, Default, Deserialize)]
struct Fixture {
    #[serde(default)]
    agents: BTreeMap<String, MockAgent>,
    #[serde(default)]
    nodes: Vec<Value>,
}

#[derive(Debug)]
struct RunningProcess {
    agent_name: String,
    timeout: u64,
}

#[derive(Debug)]
struct MockState {
    agents: BTreeMap<String, MockAgent>,
    nodes: Vec<Value>,
    processes: BTreeMap<u64, RunningProcess>,
    logs: BTreeMap<String, String>,
    next_pid: u64,
    calls: Vec<RecordedCall>,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            agents: BTreeMap::new(),
            nodes: Vec::new(),
            processes: BTreeMap::new(),
            logs: BTreeMap::new(),
            next_pid: FIRST_PID,
            calls: Vec::new(),
        }
    }
}

impl MockState {
    fn record(&mut self, method: &'static str, path: String) {
        self.record_with_agent_type(method, path, None);
    }

    fn record_with_agent_type(
        &mut self,
        method: &'static str,
        path: String,
        agent_type: Option<AgentType>,
    ) {
        let query = agent_type.map(|agent_type| format!("agent_type={}", agent_type));
        debug!(method, %path, ?query, "mock request");
        self.calls.push(RecordedCall {
            method,
            path,
            query,
        });
    }

    fn agent(&self, agent_name: &str) -> ClientApiResult<&MockAgent> {
        self.agents
            .get(agent_name)
            .ok_or_else(|| not_found(format!("Agent {} not found", agent_name)))
    }

    fn agent_of_type(
        &self,
        agent_name: &str,
        agent_type: Option<AgentType>,
    ) -> ClientApiResult<&MockAgent> {
        let agent = self.agent(agent_name)?;
        match agent_type {
            Some(wanted) if wanted != agent.agent_type => {
                Err(not_found(format!("Agent {} not found", agent_name)))
            }
            _ => Ok(agent),
        }
    }

    fn agent_mut(&mut self, agent_name: &str) -> ClientApiResult<&mut MockAgent> {
        self.agents
            .get_mut(agent_name)
            .ok_or_else(|| not_found(format!("Agent {} not found", agent_name)))
    }
}

fn status(status: u16, message: impl Into<String>) -> ClientApiError {
    ClientApiError::Status {
        status,
        message: message.into(),
    }
}

fn bad_request(message: impl Into<String>) -> ClientApiError {
    status(400, message)
}

fn not_found(message: impl Into<String>) -> ClientApiError {
    status(404, message)
}

fn failure(message: impl Into<String>) -> OperationResponse {
    OperationResponse {
        success: false,
        message: Some(message.into()),
        extra: Map::new(),
    }
}

/// Whether `candidate` is `path` itself or lives underneath it
fn is_within(candidate: &str, path: &str) -> bool {
    candidate == path
        || candidate
            .strip_prefix(path)
            .is_some_and(|rest| rest.starts_with('/'))
}

pub struct MockClient {
    state: Mutex<MockState>,
}

impl Default for MockClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MockClient {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MockState::default()),
        }
    }

    /// Build a mock from JSON of the form
    /// `{"agents": {"name": {"agent_type": "agent-hub", "files": {...}}}, "nodes": [...]}`
    pub fn from_fixture(json: &str) -> Result<Self, FixtureError> {
        let fixture: Fixture = serde_json::from_str(json)?;
        let client = Self::new();
        {
            let mut state = client.state();
            state.agents = fixture.agents;
            state.nodes = fixture.nodes;
        }
        Ok(client)
    }

    pub fn with_agent(self, name: impl Into<String>, agent: MockAgent) -> Self {
        self.state().agents.insert(name.into(), agent);
        self
    }

    pub fn with_node(self, node: Value) -> Self {
        self.state().nodes.push(node);
        self
    }

    /// Every call received so far, oldest first
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state().calls.clone()
    }

    /// Pids of processes started and not yet stopped
    pub fn running_processes(&self) -> Vec<u64> {
        self.state().processes.keys().copied().collect()
    }

    /// Current content of an agent file, if it exists
    pub fn file(&self, agent_name: &str, file_path: &str) -> Option<String> {
        self.state()
            .agents
            .get(agent_name)
            .and_then(|agent| agent.files.get(file_path).cloned())
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl AgentApi for MockClient {
    async fn get_all_agents(&self) -> ClientApiResult<AgentListResponse> {
        let mut state = self.state();
        state.record("GET", routes::agents());

        let names_of = |wanted: AgentType| -> Vec<String> {
            state
                .agents
                .iter()
                .filter(|(_, agent)| agent.agent_type == wanted)
                .map(|(name, _)| name.clone())
                .collect()
        };
        Ok(AgentListResponse {
            success: true,
            hub_agents: names_of(AgentType::AgentHub),
            example_agents: names_of(AgentType::Examples),
        })
    }

    async fn get_agent_details(&self, agent_name: &str) -> ClientApiResult<AgentDetailsResponse> {
        let mut state = self.state();
        state.record("GET", routes::agent(agent_name));

        let agent = state.agent(agent_name)?;
        let mut extra = Map::new();
        extra.insert("name".into(), json!(agent_name));
        extra.insert("version".into(), json!(agent.version));
        extra.insert("authors".into(), json!(agent.authors));
        extra.insert("agent_type".into(), json!(agent.agent_type));
        Ok(AgentDetailsResponse {
            success: true,
            agent: AgentDetails {
                files: agent.file_list(),
                extra,
            },
        })
    }

    async fn create_agent(
        &self,
        descriptor: &AgentDescriptor,
    ) -> ClientApiResult<OperationResponse> {
        let mut state = self.state();
        state.record("POST", routes::agents());

        if validate_agent_descriptor(descriptor).is_err() {
            return Err(bad_request("Agent name is required"));
        }
        if state.agents.contains_key(&descriptor.name) {
            return Ok(failure(format!("Agent {} already exists", descriptor.name)));
        }

        let agent = MockAgent {
            agent_type: descriptor.agent_type.unwrap_or(AgentType::AgentHub),
            version: descriptor.version.clone().unwrap_or_else(default_version),
            authors: descriptor.authors.clone().unwrap_or_else(default_authors),
            files: BTreeMap::new(),
        };
        state.agents.insert(descriptor.name.clone(), agent);
        Ok(OperationResponse::ok().with_message(format!("Agent {} created", descriptor.name)))
    }

    async fn copy_agent(
        &self,
        source: &str,
        target: &str,
        agent_type: Option<AgentType>,
    ) -> ClientApiResult<OperationResponse> {
        let mut state = self.state();
        state.record("POST", routes::copy_agent());

        let request = CopyAgentRequest {
            source: source.to_string(),
            target: target.to_string(),
            agent_type,
        };
        if validate_copy_request(&request).is_err() {
            return Err(bad_request("Source and target agent names are required"));
        }

        let Some(source_agent) = state.agents.get(source) else {
            return Ok(failure(format!("Source agent {} not found", source)));
        };
        if state.agents.contains_key(target) {
            return Ok(failure(format!("Agent {} already exists", target)));
        }

        let mut copy = source_agent.clone();
        if let Some(agent_type) = agent_type {
            copy.agent_type = agent_type;
        }
        state.agents.insert(target.to_string(), copy);
        Ok(OperationResponse::ok().with_message(format!("Agent {} copied to {}", source, target)))
    }

    async fn delete_agent(&self, agent_name: &str) -> ClientApiResult<OperationResponse> {
        let mut state = self.state();
        state.record("DELETE", routes::agent(agent_name));

        match state.agents.remove(agent_name) {
            Some(_) => {
                state.logs.remove(agent_name);
                state
                    .processes
                    .retain(|_, process| process.agent_name != agent_name);
                Ok(OperationResponse::ok().with_message(format!("Agent {} deleted", agent_name)))
            }
            None => Ok(failure(format!("Agent {} not found", agent_name))),
        }
    }

    async fn run_agent(
        &self,
        agent_name: &str,
        request: &RunAgentRequest,
    ) -> ClientApiResult<RunAgentResponse> {
        let mut state = self.state();
        state.record("POST", routes::run_agent(agent_name));

        let runnable = match (state.agents.get(agent_name), request.agent_type) {
            (Some(agent), Some(RunTarget::Atomic)) => agent.agent_type == AgentType::AgentHub,
            (Some(agent), Some(RunTarget::Example)) => agent.agent_type == AgentType::Examples,
            (Some(_), _) => true,
            (None, _) => false,
        };
        if !runnable {
            return Ok(RunAgentResponse {
                success: false,
                message: Some(format!(
                    "Agent or example '{}' not found in either agent-hub or examples directory",
                    agent_name
                )),
                ..Default::default()
            });
        }

        let pid = state.next_pid;
        state.next_pid += 1;
        state.processes.insert(
            pid,
            RunningProcess {
                agent_name: agent_name.to_string(),
                timeout: request.timeout,
            },
        );
        state
            .logs
            .entry(agent_name.to_string())
            .or_default()
            .push_str(&format!("process {} started (timeout {}s)\n", pid, request.timeout));

        Ok(RunAgentResponse {
            success: true,
            message: Some(format!("Agent {} started", agent_name)),
            process_id: Some(ProcessId::Number(pid)),
            extra: Map::new(),
        })
    }

    async fn stop_agent(&self, process_id: &ProcessId) -> ClientApiResult<OperationResponse> {
        let mut state = self.state();
        state.record("POST", routes::stop_process(&process_id.to_string()));

        let pid = match process_id {
            ProcessId::Number(n) => Some(*n),
            ProcessId::Text(s) => s.parse().ok(),
        };
        let stopped = pid.and_then(|pid| state.processes.remove(&pid).map(|p| (pid, p)));
        match stopped {
            Some((pid, process)) => {
                state
                    .logs
                    .entry(process.agent_name)
                    .or_default()
                    .push_str(&format!("process {} stopped\n", pid));
                Ok(OperationResponse::ok().with_message(format!("Process {} stopped", pid)))
            }
            None => Ok(failure(format!("Process {} not found", process_id))),
        }
    }

    async fn fetch_agent_logs(&self, agent_name: &str) -> ClientApiResult<AgentLogsResponse> {
        let mut state = self.state();
        state.record("GET", routes::agent_logs(agent_name));

        let logs = state.logs.get(agent_name).cloned().unwrap_or_else(|| {
            format!(
                "No log file found for {}. The agent may not have run yet.",
                agent_name
            )
        });
        Ok(AgentLogsResponse {
            success: true,
            logs,
            error: None,
        })
    }

    async fn fetch_process_output(&self, agent_name: &str) -> ClientApiResult<OperationResponse> {
        let mut state = self.state();
        state.record("GET", routes::process_output(agent_name));

        let running: Vec<(u64, u64)> = state
            .processes
            .iter()
            .filter(|(_, process)| process.agent_name == agent_name)
            .map(|(pid, process)| (*pid, process.timeout))
            .collect();
        let Some(&(pid, timeout)) = running.last() else {
            return Ok(failure(format!("No running process for {}", agent_name)));
        };

        let mut response = OperationResponse::ok();
        response.extra.insert("process_id".into(), json!(pid));
        response.extra.insert("timeout".into(), json!(timeout));
        response.extra.insert(
            "output".into(),
            json!(state.logs.get(agent_name).cloned().unwrap_or_default()),
        );
        Ok(response)
    }

    async fn get_agent_files(
        &self,
        agent_name: &str,
        agent_type: Option<AgentType>,
    ) -> ClientApiResult<AgentFilesResponse> {
        let mut state = self.state();
        state.record_with_agent_type("GET", routes::agent_files(agent_name), agent_type);

        let agent = state.agent_of_type(agent_name, agent_type)?;
        Ok(AgentFilesResponse {
            success: true,
            files: agent.file_list(),
        })
    }

    async fn get_file_content(
        &self,
        file: &FileReference,
    ) -> ClientApiResult<FileContentResponse> {
        let mut state = self.state();
        state.record_with_agent_type("GET", file.path(), file.agent_type);

        let agent = state.agent_of_type(&file.agent_name, file.agent_type)?;
        let content = agent
            .files
            .get(&file.file_path)
            .ok_or_else(|| not_found(format!("File {} not found", file.file_path)))?;
        if file.is_media() {
            return Err(ClientApiError::Unexpected(format!(
                "{} is served as raw bytes",
                file.file_path
            )));
        }
        Ok(FileContentResponse {
            success: true,
            content: content.clone(),
            file_type: None,
        })
    }

    async fn download_file(&self, file: &FileReference) -> ClientApiResult<Vec<u8>> {
        let mut state = self.state();
        state.record_with_agent_type("GET", file.path(), file.agent_type);

        let agent = state.agent_of_type(&file.agent_name, file.agent_type)?;
        agent
            .files
            .get(&file.file_path)
            .map(|content| content.clone().into_bytes())
            .ok_or_else(|| not_found(format!("File {} not found", file.file_path)))
    }

    async fn update_file_content(
        &self,
        file: &FileReference,
        content: &str,
    ) -> ClientApiResult<OperationResponse> {
        let mut state = self.state();
        state.record("PUT", file.path());

        let agent = state.agent_mut(&file.agent_name)?;
        agent.files.insert(file.file_path.clone(), content.to_string());
        Ok(OperationResponse::ok())
    }

    async fn delete_file_or_folder(
        &self,
        file: &FileReference,
    ) -> ClientApiResult<OperationResponse> {
        let mut state = self.state();
        state.record("DELETE", file.path());

        let agent = state.agent_mut(&file.agent_name)?;
        let before = agent.files.len();
        agent.files.retain(|path, _| !is_within(path, &file.file_path));
        if agent.files.len() == before {
            return Err(not_found("File or folder not found"));
        }
        Ok(OperationResponse::ok())
    }

    async fn rename_file_or_folder(
        &self,
        file: &FileReference,
        new_name: &str,
    ) -> ClientApiResult<RenameResponse> {
        let mut state = self.state();
        state.record("POST", file.rename_path());

        let request = RenameRequest {
            new_name: new_name.to_string(),
        };
        if validate_rename_request(&request).is_err() {
            return Err(bad_request("New name is required"));
        }

        let agent = state.agent_mut(&file.agent_name)?;
        let moved: Vec<String> = agent
            .files
            .keys()
            .filter(|path| is_within(path, &file.file_path))
            .cloned()
            .collect();
        if moved.is_empty() {
            return Err(not_found("File or folder not found"));
        }

        let new_path = renamed_path(&file.file_path, new_name);
        for old in moved {
            if let Some(content) = agent.files.remove(&old) {
                let renamed = format!("{}{}", new_path, &old[file.file_path.len()..]);
                agent.files.insert(renamed, content);
            }
        }
        Ok(RenameResponse {
            success: true,
            message: Some(format!("Renamed to {}", new_name)),
            new_path: Some(new_path),
        })
    }

    async fn get_dataflow_file(&self, agent_name: &str) -> ClientApiResult<DataflowFileResponse> {
        let mut state = self.state();
        state.record("GET", routes::dataflow_file(agent_name));

        let agent = state
            .agents
            .get(agent_name)
            .filter(|agent| agent.agent_type == AgentType::Examples)
            .ok_or_else(|| {
                not_found(format!("Agent {} not found in examples directory", agent_name))
            })?;

        // Only top-level files count; conventionally named ones win.
        let top_level: Vec<&String> = agent.files.keys().filter(|p| !p.contains('/')).collect();
        let mut dataflows: Vec<String> = top_level
            .iter()
            .filter(|p| p.ends_with("_dataflow.yml"))
            .map(|p| p.to_string())
            .collect();
        if dataflows.is_empty() {
            dataflows = top_level
                .iter()
                .filter(|p| p.ends_with(".yml") || p.ends_with(".yaml"))
                .map(|p| p.to_string())
                .collect();
        }

        let Some(first) = dataflows.first().cloned() else {
            return Err(not_found(format!(
                "No dataflow configuration file found in {}",
                agent_name
            )));
        };
        Ok(DataflowFileResponse {
            success: true,
            dataflow_file: first,
            agent_path: format!("examples/{}", agent_name),
            all_dataflow_files: dataflows,
        })
    }

    async fn get_available_nodes(&self) -> ClientApiResult<OperationResponse> {
        let mut state = self.state();
        state.record("GET", routes::available_nodes());

        let mut response = OperationResponse::ok();
        response
            .extra
            .insert("nodes".into(), Value::Array(state.nodes.clone()));
        Ok(response)
    }

    async fn generate_dataflow(
        &self,
        request: &DataflowRequest,
    ) -> ClientApiResult<OperationResponse> {
        let mut state = self.state();
        state.record("POST", routes::generate_dataflow());

        if validate_dataflow_request(request).is_err() {
            return Err(bad_request(
                "Missing required parameters: selected_nodes, flow_description, flow_name",
            ));
        }

        let mut response = OperationResponse::ok()
            .with_message(format!("Dataflow {} generated", request.flow_name));
        response
            .extra
            .insert("flow_name".into(), json!(request.flow_name));
        response
            .extra
            .insert("selected_nodes".into(), json!(request.selected_nodes));
        Ok(response)
    }
}
