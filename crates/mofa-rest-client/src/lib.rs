//! REST API client for the MoFA Stage agent service
//!
//! This crate provides a thin HTTP client over the `/api/agents` endpoints:
//! listing, creating, copying, running and stopping agents, editing agent
//! files, and generating dataflows. It adds no retries, caching or timeouts
//! of its own.

pub mod client;
pub mod config;
pub mod error;

pub use client::*;
pub use config::*;
pub use error::*;

use async_trait::async_trait;
use mofa_api_contract::*;
use mofa_client_api::{AgentApi, ClientApiError, ClientApiResult};

impl From<RestClientError> for ClientApiError {
    fn from(err: RestClientError) -> Self {
        match err {
            RestClientError::ServerError { status, details } => ClientApiError::Status {
                status: status.as_u16(),
                message: details.reason().to_string(),
            },
            RestClientError::UnexpectedResponse { status, body } => ClientApiError::Status {
                status: status.as_u16(),
                message: body,
            },
            RestClientError::Http(e) => ClientApiError::Transport(e.to_string()),
            other => ClientApiError::Unexpected(other.to_string()),
        }
    }
}

#[async_trait]
impl AgentApi for client::RestClient {
    async fn get_all_agents(&self) -> ClientApiResult<AgentListResponse> {
        Ok(self.get_all_agents().await?)
    }

    async fn get_agent_details(&self, agent_name: &str) -> ClientApiResult<AgentDetailsResponse> {
        Ok(self.get_agent_details(agent_name).await?)
    }

    async fn create_agent(
        &self,
        descriptor: &AgentDescriptor,
    ) -> ClientApiResult<OperationResponse> {
        Ok(self.create_agent(descriptor).await?)
    }

    async fn copy_agent(
        &self,
        source: &str,
        target: &str,
        agent_type: Option<AgentType>,
    ) -> ClientApiResult<OperationResponse> {
        Ok(self.copy_agent(source, target, agent_type).await?)
    }

    async fn delete_agent(&self, agent_name: &str) -> ClientApiResult<OperationResponse> {
        Ok(self.delete_agent(agent_name).await?)
    }

    async fn run_agent(
        &self,
        agent_name: &str,
        request: &RunAgentRequest,
    ) -> ClientApiResult<RunAgentResponse> {
        Ok(self.run_agent_with(agent_name, request).await?)
    }

    async fn stop_agent(&self, process_id: &ProcessId) -> ClientApiResult<OperationResponse> {
        Ok(self.stop_agent(process_id).await?)
    }

    async fn fetch_agent_logs(&self, agent_name: &str) -> ClientApiResult<AgentLogsResponse> {
        Ok(self.fetch_agent_logs(agent_name).await?)
    }

    async fn fetch_process_output(&self, agent_name: &str) -> ClientApiResult<OperationResponse> {
        Ok(self.fetch_process_output(agent_name).await?)
    }

    async fn get_agent_files(
        &self,
        agent_name: &str,
        agent_type: Option<AgentType>,
    ) -> ClientApiResult<AgentFilesResponse> {
        Ok(self.get_agent_files(agent_name, agent_type).await?)
    }

    async fn get_file_content(
        &self,
        file: &FileReference,
    ) -> ClientApiResult<FileContentResponse> {
        Ok(self
            .get_file_content(&file.agent_name, &file.file_path, file.agent_type)
            .await?)
    }

    async fn download_file(&self, file: &FileReference) -> ClientApiResult<Vec<u8>> {
        Ok(self
            .download_file(&file.agent_name, &file.file_path, file.agent_type)
            .await?)
    }

    async fn update_file_content(
        &self,
        file: &FileReference,
        content: &str,
    ) -> ClientApiResult<OperationResponse> {
        Ok(self
            .update_file_content(&file.agent_name, &file.file_path, content)
            .await?)
    }

    async fn delete_file_or_folder(
        &self,
        file: &FileReference,
    ) -> ClientApiResult<OperationResponse> {
        Ok(self
            .delete_file_or_folder(&file.agent_name, &file.file_path)
            .await?)
    }

    async fn rename_file_or_folder(
        &self,
        file: &FileReference,
        new_name: &str,
    ) -> ClientApiResult<RenameResponse> {
        Ok(self
            .rename_file_or_folder(&file.agent_name, &file.file_path, new_name)
            .await?)
    }

    async fn get_dataflow_file(&self, agent_name: &str) -> ClientApiResult<DataflowFileResponse> {
        Ok(self.get_dataflow_file(agent_name).await?)
    }

    async fn get_available_nodes(&self) -> ClientApiResult<OperationResponse> {
        Ok(self.get_available_nodes().await?)
    }

    async fn generate_dataflow(
        &self,
        request: &DataflowRequest,
    ) -> ClientApiResult<OperationResponse> {
        Ok(self.generate_dataflow(request).await?)
    }
}
