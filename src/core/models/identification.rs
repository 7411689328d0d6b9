use crate::global_constants::{
    USER_MESSAGE_CALL_FAILED_HINT, USER_MESSAGE_CALL_FAILED_PREFIX, USER_MESSAGE_NO_RESPONSE,
    USER_MESSAGE_UNKNOWN_ERROR,
};

/// What a single identification call produced.
#[derive(Debug, Clone, PartialEq)]
pub enum IdentificationOutcome {
    Identified(String),
    EmptyResponse,
    CallFailed(String),
}

impl IdentificationOutcome {
    pub fn from_service_result(result: anyhow::Result<Option<String>>) -> Self {
        match result {
            Ok(Some(text)) if !text.trim().is_empty() => Self::Identified(text),
            Ok(_) => Self::EmptyResponse,
            Err(e) => Self::CallFailed(e.to_string()),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Identified(_))
    }

    pub fn user_message(&self) -> String {
        match self {
            Self::Identified(text) => text.clone(),
            Self::EmptyResponse => USER_MESSAGE_NO_RESPONSE.to_string(),
            Self::CallFailed(error) if error.trim().is_empty() => {
                USER_MESSAGE_UNKNOWN_ERROR.to_string()
            }
            Self::CallFailed(error) => format!(
                "{}: {}. {}",
                USER_MESSAGE_CALL_FAILED_PREFIX, error, USER_MESSAGE_CALL_FAILED_HINT
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowState {
    Idle,
    Loading,
    Identified(String),
    Failed(String),
    LimitReached { last_message: Option<String> },
}

impl WorkflowState {
    pub fn displayed_message(&self) -> Option<&str> {
        match self {
            WorkflowState::Identified(text) | WorkflowState::Failed(text) => Some(text),
            WorkflowState::LimitReached { last_message } => last_message.as_deref(),
            WorkflowState::Idle | WorkflowState::Loading => None,
        }
    }
}
