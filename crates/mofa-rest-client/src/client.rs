//! Main REST API client implementation

use mofa_api_contract::{routes, *};
use reqwest::{Client as HttpClient, Method, Response};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};
use url::Url;

use crate::config::ClientConfig;
use crate::error::{RestClientError, RestClientResult};

/// REST API client for the MoFA Stage agent service
///
/// Every method issues exactly one request. Non-2xx replies become
/// [`RestClientError::ServerError`]; a 2xx reply with `"success": false` is
/// returned as data.
#[derive(Debug, Clone)]
pub struct RestClient {
    http_client: HttpClient,
    base_url: Url,
}

impl RestClient {
    /// Create a new REST client
    pub fn new(config: ClientConfig) -> RestClientResult<Self> {
        let http_client = HttpClient::builder().user_agent(config.user_agent).build()?;

        Ok(Self {
            http_client,
            base_url: config.base_url,
        })
    }

    /// Create a client from a base URL string
    pub fn from_url(base_url: &str) -> RestClientResult<Self> {
        Self::new(ClientConfig::from_url(base_url)?)
    }

    /// Get the base URL
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// List all agents, grouped into hub agents and examples
    pub async fn get_all_agents(&self) -> RestClientResult<AgentListResponse> {
        self.get(self.endpoint(&routes::agents(), None)?).await
    }

    pub async fn get_agent_details(&self, agent_name: &str) -> RestClientResult<AgentDetailsResponse> {
        self.get(self.endpoint(&routes::agent(agent_name), None)?).await
    }

    /// Create a new agent
    pub async fn create_agent(
        &self,
        descriptor: &AgentDescriptor,
    ) -> RestClientResult<OperationResponse> {
        self.post(self.endpoint(&routes::agents(), None)?, descriptor).await
    }

    /// Copy an existing agent. `agent_type` is sent as `null` when absent.
    pub async fn copy_agent(
        &self,
        source: &str,
        target: &str,
        agent_type: Option<AgentType>,
    ) -> RestClientResult<OperationResponse> {
        let body = CopyAgentRequest {
            source: source.to_string(),
            target: target.to_string(),
            agent_type,
        };
        self.post(self.endpoint(&routes::copy_agent(), None)?, &body).await
    }

    pub async fn delete_agent(&self, agent_name: &str) -> RestClientResult<OperationResponse> {
        self.delete(self.endpoint(&routes::agent(agent_name), None)?).await
    }

    /// Run an agent; the timeout defaults to [`DEFAULT_RUN_TIMEOUT_SECS`]
    pub async fn run_agent(
        &self,
        agent_name: &str,
        timeout: Option<u64>,
    ) -> RestClientResult<RunAgentResponse> {
        let request = RunAgentRequest::with_timeout(timeout.unwrap_or(DEFAULT_RUN_TIMEOUT_SECS));
        self.run_agent_with(agent_name, &request).await
    }

    /// Run an agent with a full request body, including the run target
    pub async fn run_agent_with(
        &self,
        agent_name: &str,
        request: &RunAgentRequest,
    ) -> RestClientResult<RunAgentResponse> {
        self.post(self.endpoint(&routes::run_agent(agent_name), None)?, request).await
    }

    /// Stop a running agent process
    pub async fn stop_agent(&self, process_id: &ProcessId) -> RestClientResult<OperationResponse> {
        let path = routes::stop_process(&process_id.to_string());
        self.post_empty(self.endpoint(&path, None)?).await
    }

    pub async fn fetch_agent_logs(&self, agent_name: &str) -> RestClientResult<AgentLogsResponse> {
        self.get(self.endpoint(&routes::agent_logs(agent_name), None)?).await
    }

    pub async fn fetch_process_output(
        &self,
        agent_name: &str,
    ) -> RestClientResult<OperationResponse> {
        self.get(self.endpoint(&routes::process_output(agent_name), None)?).await
    }

    /// List an agent's files
    pub async fn get_agent_files(
        &self,
        agent_name: &str,
        agent_type: Option<AgentType>,
    ) -> RestClientResult<AgentFilesResponse> {
        self.get(self.endpoint(&routes::agent_files(agent_name), agent_type)?).await
    }

    /// Read a text file
    pub async fn get_file_content(
        &self,
        agent_name: &str,
        file_path: &str,
        agent_type: Option<AgentType>,
    ) -> RestClientResult<FileContentResponse> {
        let url = self.endpoint(&routes::agent_file(agent_name, file_path), agent_type)?;
        self.get(url).await
    }

    /// Read a file as raw bytes. Image and video files are only served this way.
    pub async fn download_file(
        &self,
        agent_name: &str,
        file_path: &str,
        agent_type: Option<AgentType>,
    ) -> RestClientResult<Vec<u8>> {
        let url = self.endpoint(&routes::agent_file(agent_name, file_path), agent_type)?;
        let response = self.send(Method::GET, url, None::<&()>).await?;
        Ok(response.bytes().await?.to_vec())
    }

    pub async fn update_file_content(
        &self,
        agent_name: &str,
        file_path: &str,
        content: &str,
    ) -> RestClientResult<OperationResponse> {
        let body = UpdateFileRequest {
            content: content.to_string(),
        };
        let url = self.endpoint(&routes::agent_file(agent_name, file_path), None)?;
        self.request(Method::PUT, url, Some(&body)).await
    }

    pub async fn delete_file_or_folder(
        &self,
        agent_name: &str,
        file_path: &str,
    ) -> RestClientResult<OperationResponse> {
        self.delete(self.endpoint(&routes::agent_file(agent_name, file_path), None)?).await
    }

    /// Rename the last segment of `file_path` to `new_name`
    pub async fn rename_file_or_folder(
        &self,
        agent_name: &str,
        file_path: &str,
        new_name: &str,
    ) -> RestClientResult<RenameResponse> {
        let body = RenameRequest {
            new_name: new_name.to_string(),
        };
        let url = self.endpoint(&routes::rename_file(agent_name, file_path), None)?;
        self.post(url, &body).await
    }

    /// Locate the dataflow YAML inside an example agent
    pub async fn get_dataflow_file(&self, agent_name: &str) -> RestClientResult<DataflowFileResponse> {
        self.get(self.endpoint(&routes::dataflow_file(agent_name), None)?).await
    }

    pub async fn get_available_nodes(&self) -> RestClientResult<OperationResponse> {
        self.get(self.endpoint(&routes::available_nodes(), None)?).await
    }

    /// Ask the server to generate a dataflow from the selected nodes
    pub async fn generate_dataflow(
        &self,
        request: &DataflowRequest,
    ) -> RestClientResult<OperationResponse> {
        self.post(self.endpoint(&routes::generate_dataflow(), None)?, request).await
    }

    // Private helper methods

    /// Join `path` onto the base URL, adding `agent_type` only when present
    fn endpoint(&self, path: &str, agent_type: Option<AgentType>) -> RestClientResult<Url> {
        let mut url = self.base_url.join(path)?;
        if let Some(agent_type) = agent_type {
            url.query_pairs_mut().append_pair("agent_type", agent_type.as_str());
        }
        Ok(url)
    }

    async fn get<T: DeserializeOwned>(&self, url: Url) -> RestClientResult<T> {
        self.request(Method::GET, url, None::<&()>).await
    }

    async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        url: Url,
        body: &B,
    ) -> RestClientResult<T> {
        self.request(Method::POST, url, Some(body)).await
    }

    /// POST without a body
    async fn post_empty<T: DeserializeOwned>(&self, url: Url) -> RestClientResult<T> {
        self.request(Method::POST, url, None::<&()>).await
    }

    async fn delete<T: DeserializeOwned>(&self, url: Url) -> RestClientResult<T> {
        self.request(Method::DELETE, url, None::<&()>).await
    }

    async fn request<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> RestClientResult<T> {
        let response = self.send(method, url, body).await?;
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(RestClientError::from)
    }

    /// Issue the request and turn non-2xx statuses into errors
    async fn send<B: Serialize>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> RestClientResult<Response> {
        debug!(%method, %url, "sending request");

        let mut request = self.http_client.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        debug!(%status, "received response");

        if status.is_success() {
            Ok(response)
        } else {
            Err(self.error_from_response(response).await)
        }
    }

    async fn error_from_response(&self, response: Response) -> RestClientError {
        let status = response.status();
        let text = match response.text().await {
            Ok(text) => text,
            Err(e) => return RestClientError::Http(e),
        };

        // Only bodies carrying a reason count as the backend envelope; any
        // other payload is passed through verbatim.
        match serde_json::from_str::<ErrorBody>(&text) {
            Ok(details) if details.message.is_some() || details.error.is_some() => {
                RestClientError::ServerError { status, details }
            }
            _ => {
                warn!(%status, "error response is not the backend envelope");
                RestClientError::UnexpectedResponse { status, body: text }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> RestClient {
        RestClient::from_url("http://localhost:5000").unwrap()
    }

    #[test]
    fn test_client_creation() {
        let client = client();
        assert_eq!(client.base_url().as_str(), "http://localhost:5000/");
        assert!(RestClient::from_url("::not-a-url").is_err());
    }

    #[test]
    fn test_endpoint_without_agent_type_has_no_query() {
        let url = client().endpoint(&routes::agent_files("demo"), None).unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/api/agents/demo/files");
        assert_eq!(url.query(), None);
    }

    #[test]
    fn test_endpoint_with_agent_type() {
        let url = client()
            .endpoint(&routes::agent_file("demo", "a/b.py"), Some(AgentType::AgentHub))
            .unwrap();
        assert_eq!(url.path(), "/api/agents/demo/files/a/b.py");
        assert_eq!(url.query(), Some("agent_type=agent-hub"));
    }

    #[test]
    fn test_endpoint_replaces_base_path() {
        let client = RestClient::from_url("http://stage.local:8080/ui/").unwrap();
        let url = client.endpoint(&routes::agents(), None).unwrap();
        assert_eq!(url.as_str(), "http://stage.local:8080/api/agents/");
    }
}
