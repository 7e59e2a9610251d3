//! Client API trait for the MoFA Stage agent service

use async_trait::async_trait;
use mofa_api_contract::*;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientApiError {
    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("transport error: {0}")]
    Transport(String),
    #[error("unexpected: {0}")]
    Unexpected(String),
}

impl ClientApiError {
    /// HTTP status, when the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type ClientApiResult<T> = Result<T, ClientApiError>;

/// One method per agent endpoint. Implementations issue exactly one request
/// per call and do not retry.
#[async_trait]
pub trait AgentApi: Send + Sync {
    async fn get_all_agents(&self) -> ClientApiResult<AgentListResponse>;
    async fn get_agent_details(&self, agent_name: &str) -> ClientApiResult<AgentDetailsResponse>;
    async fn create_agent(&self, descriptor: &AgentDescriptor)
        -> ClientApiResult<OperationResponse>;
    async fn copy_agent(
        &self,
        source: &str,
        target: &str,
        agent_type: Option<AgentType>,
    ) -> ClientApiResult<OperationResponse>;
    async fn delete_agent(&self, agent_name: &str) -> ClientApiResult<OperationResponse>;
    async fn run_agent(
        &self,
        agent_name: &str,
        request: &RunAgentRequest,
    ) -> ClientApiResult<RunAgentResponse>;
    async fn stop_agent(&self, process_id: &ProcessId) -> ClientApiResult<OperationResponse>;
    async fn fetch_agent_logs(&self, agent_name: &str) -> ClientApiResult<AgentLogsResponse>;
    async fn fetch_process_output(&self, agent_name: &str) -> ClientApiResult<OperationResponse>;

    async fn get_agent_files(
        &self,
        agent_name: &str,
        agent_type: Option<AgentType>,
    ) -> ClientApiResult<AgentFilesResponse>;
    async fn get_file_content(&self, file: &FileReference)
        -> ClientApiResult<FileContentResponse>;
    async fn download_file(&self, file: &FileReference) -> ClientApiResult<Vec<u8>>;
    async fn update_file_content(
        &self,
        file: &FileReference,
        content: &str,
    ) -> ClientApiResult<OperationResponse>;
    async fn delete_file_or_folder(&self, file: &FileReference)
        -> ClientApiResult<OperationResponse>;
    async fn rename_file_or_folder(
        &self,
        file: &FileReference,
        new_name: &str,
    ) -> ClientApiResult<RenameResponse>;
    async fn get_dataflow_file(&self, agent_name: &str) -> ClientApiResult<DataflowFileResponse>;

    async fn get_available_nodes(&self) -> ClientApiResult<OperationResponse>;
    async fn generate_dataflow(&self, request: &DataflowRequest)
        -> ClientApiResult<OperationResponse>;
}
