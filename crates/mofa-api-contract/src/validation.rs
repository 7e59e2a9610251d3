//! Validation helpers for API contract types
//!
//! These mirror the checks the backend answers with `400 Bad Request`. The
//! REST client never calls them; they exist for callers that want to reject
//! a request before it leaves the process, and for the mock client.

use crate::error::ApiContractError;
use crate::types::*;
use validator::Validate;

/// Validate an agent creation request
pub fn validate_agent_descriptor(descriptor: &AgentDescriptor) -> Result<(), ApiContractError> {
    descriptor.validate()?;
    Ok(())
}

/// Validate a copy request
pub fn validate_copy_request(request: &CopyAgentRequest) -> Result<(), ApiContractError> {
    request.validate()?;
    Ok(())
}

/// Validate a rename request
pub fn validate_rename_request(request: &RenameRequest) -> Result<(), ApiContractError> {
    request.validate()?;
    Ok(())
}

/// Validate a dataflow generation request
pub fn validate_dataflow_request(request: &DataflowRequest) -> Result<(), ApiContractError> {
    request.validate()?;
    Ok(())
}

/// Validate an `agent_type` string as the backend accepts it
pub fn validate_agent_type(agent_type: &str) -> Result<AgentType, ApiContractError> {
    agent_type.parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_agent_descriptor() {
        assert!(validate_agent_descriptor(&AgentDescriptor::new("demo")).is_ok());
        assert!(matches!(
            validate_agent_descriptor(&AgentDescriptor::new("")),
            Err(ApiContractError::Validation(_))
        ));
    }

    #[test]
    fn test_validate_copy_request_requires_both_names() {
        let request = CopyAgentRequest {
            source: "a".into(),
            target: "".into(),
            agent_type: None,
        };
        let err = validate_copy_request(&request).unwrap_err();
        assert!(err.to_string().contains("Target agent name is required"));

        let request = CopyAgentRequest {
            source: "a".into(),
            target: "b".into(),
            agent_type: Some(AgentType::AgentHub),
        };
        assert!(validate_copy_request(&request).is_ok());
    }

    #[test]
    fn test_validate_rename_request() {
        assert!(validate_rename_request(&RenameRequest {
            new_name: "b.py".into()
        })
        .is_ok());
        assert!(validate_rename_request(&RenameRequest {
            new_name: String::new()
        })
        .is_err());
    }

    #[test]
    fn test_validate_dataflow_request() {
        assert!(validate_dataflow_request(&DataflowRequest::new(["n1"], "desc", "flow")).is_ok());

        let no_nodes = DataflowRequest::new(Vec::<String>::new(), "desc", "flow");
        assert!(validate_dataflow_request(&no_nodes).is_err());

        let no_name = DataflowRequest::new(["n1"], "desc", "");
        assert!(validate_dataflow_request(&no_name).is_err());
    }

    #[test]
    fn test_validate_agent_type() {
        assert_eq!(validate_agent_type("examples").unwrap(), AgentType::Examples);
        assert!(validate_agent_type("other").is_err());
    }
}
