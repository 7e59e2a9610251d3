//! Endpoint paths for the agent API
//!
//! Every builder returns an absolute path (starting with [`API_BASE_PATH`])
//! suitable for joining onto the service origin. Agent names and file paths
//! are inserted verbatim; any percent-encoding is left to the URL layer.

/// Base path all agent endpoints live under
pub const API_BASE_PATH: &str = "/api";

/// `GET /agents/` and `POST /agents/`
pub fn agents() -> String {
    format!("{}/agents/", API_BASE_PATH)
}

pub fn agent(agent_name: &str) -> String {
    format!("{}/agents/{}", API_BASE_PATH, agent_name)
}

pub fn copy_agent() -> String {
    format!("{}/agents/copy", API_BASE_PATH)
}

pub fn run_agent(agent_name: &str) -> String {
    format!("{}/agents/{}/run", API_BASE_PATH, agent_name)
}

pub fn stop_process(process_id: &str) -> String {
    format!("{}/agents/stop/{}", API_BASE_PATH, process_id)
}

pub fn agent_logs(agent_name: &str) -> String {
    format!("{}/agents/{}/logs", API_BASE_PATH, agent_name)
}

pub fn process_output(agent_name: &str) -> String {
    format!("{}/agents/{}/process-output", API_BASE_PATH, agent_name)
}

pub fn agent_files(agent_name: &str) -> String {
    format!("{}/agents/{}/files", API_BASE_PATH, agent_name)
}

/// `/agents/{name}/files/{path}`; `file_path` may contain `/`
pub fn agent_file(agent_name: &str, file_path: &str) -> String {
    format!("{}/agents/{}/files/{}", API_BASE_PATH, agent_name, file_path)
}

pub fn rename_file(agent_name: &str, file_path: &str) -> String {
    format!("{}/rename", agent_file(agent_name, file_path))
}

pub fn dataflow_file(agent_name: &str) -> String {
    format!("{}/agents/{}/dataflow-file", API_BASE_PATH, agent_name)
}

pub fn available_nodes() -> String {
    format!("{}/agents/available-nodes", API_BASE_PATH)
}

pub fn generate_dataflow() -> String {
    format!("{}/agents/generate-dataflow", API_BASE_PATH)
}
