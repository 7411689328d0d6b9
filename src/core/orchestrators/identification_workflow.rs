use std::sync::Arc;
use std::time::Duration;

use crate::core::interfaces::adapters::PlantIdentificationService;
use crate::core::models::{IdentificationOutcome, PlantImage, WorkflowState};
use crate::global_constants::{LOG_TAG_WORKFLOW, USER_MESSAGE_TIMEOUT};

#[derive(Debug, Clone)]
pub enum IdentificationRequest {
    Started { attempt_id: u64, image: PlantImage },
    MissingImage,
    AlreadyInFlight,
    LimitReached,
}

/// Session-scoped state machine behind the identify button.
///
/// `Idle -> Loading -> Identified | Failed`, with `Idle -> LimitReached` once
/// `query_limit` successful calls have been made. Selecting a new image resets
/// to `Idle`, except while a call is in flight: the call keeps the workflow
/// `Loading` and its result is dropped once it lands. Nothing here is persisted.
pub struct IdentificationWorkflow {
    current_image: Option<PlantImage>,
    state: WorkflowState,
    completed_queries: u32,
    query_limit: u32,
    in_flight_attempt: Option<u64>,
    in_flight_superseded: bool,
    next_attempt_id: u64,
}

impl IdentificationWorkflow {
    pub fn build(query_limit: u32) -> Self {
        Self {
            current_image: None,
            state: WorkflowState::Idle,
            completed_queries: 0,
            query_limit,
            in_flight_attempt: None,
            in_flight_superseded: false,
            next_attempt_id: 1,
        }
    }

    pub fn current_image(&self) -> Option<&PlantImage> {
        self.current_image.as_ref()
    }

    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    pub fn completed_queries(&self) -> u32 {
        self.completed_queries
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight_attempt.is_some()
    }

    pub fn can_identify(&self) -> bool {
        self.current_image.is_some() && !self.is_loading()
    }

    pub fn select_image(&mut self, image: PlantImage) {
        log::info!(
            "{} New image selected: {:?}",
            LOG_TAG_WORKFLOW,
            image
        );

        self.current_image = Some(image);

        if let Some(attempt_id) = self.in_flight_attempt {
            log::debug!(
                "{} Attempt {} superseded by new image, waiting for it to finish",
                LOG_TAG_WORKFLOW,
                attempt_id
            );
            self.in_flight_superseded = true;
            return;
        }

        self.state = WorkflowState::Idle;
    }

    pub fn begin_identification(&mut self) -> IdentificationRequest {
        let Some(image) = self.current_image.clone() else {
            log::debug!("{} Identify requested without an image", LOG_TAG_WORKFLOW);
            return IdentificationRequest::MissingImage;
        };

        if self.is_loading() {
            log::debug!("{} Identification already in flight", LOG_TAG_WORKFLOW);
            return IdentificationRequest::AlreadyInFlight;
        }

        if self.completed_queries >= self.query_limit {
            log::info!(
                "{} Query limit of {} reached, showing donation prompt",
                LOG_TAG_WORKFLOW,
                self.query_limit
            );
            let last_message = self.state.displayed_message().map(str::to_string);
            self.state = WorkflowState::LimitReached { last_message };
            return IdentificationRequest::LimitReached;
        }

        let attempt_id = self.next_attempt_id;
        self.next_attempt_id += 1;
        self.in_flight_attempt = Some(attempt_id);
        self.in_flight_superseded = false;
        self.state = WorkflowState::Loading;

        log::info!(
            "{} Starting attempt {} ({} of {} used)",
            LOG_TAG_WORKFLOW,
            attempt_id,
            self.completed_queries,
            self.query_limit
        );

        IdentificationRequest::Started { attempt_id, image }
    }

    pub fn complete_identification(&mut self, attempt_id: u64, outcome: IdentificationOutcome) {
        if self.in_flight_attempt != Some(attempt_id) {
            log::warn!(
                "{} Ignoring completion of unknown attempt {}",
                LOG_TAG_WORKFLOW,
                attempt_id
            );
            return;
        }

        self.in_flight_attempt = None;
        if outcome.is_success() {
            self.completed_queries += 1;
        }

        if std::mem::take(&mut self.in_flight_superseded) {
            log::info!(
                "{} Dropping result of attempt {} made for a replaced image (success={})",
                LOG_TAG_WORKFLOW,
                attempt_id,
                outcome.is_success()
            );
            self.state = WorkflowState::Idle;
            return;
        }

        self.state = match outcome {
            IdentificationOutcome::Identified(text) => {
                log::info!(
                    "{} Attempt {} identified, {} queries completed",
                    LOG_TAG_WORKFLOW,
                    attempt_id,
                    self.completed_queries
                );
                WorkflowState::Identified(text)
            }
            failed => {
                log::warn!(
                    "{} Attempt {} failed: {:?}",
                    LOG_TAG_WORKFLOW,
                    attempt_id,
                    failed
                );
                WorkflowState::Failed(failed.user_message())
            }
        };
    }
}

pub async fn run_identification_call(
    service: Arc<dyn PlantIdentificationService>,
    image: PlantImage,
    timeout_duration: Duration,
) -> IdentificationOutcome {
    log::debug!(
        "{} Sending {} bytes ({}) for identification",
        LOG_TAG_WORKFLOW,
        image.size_in_bytes(),
        image.mime_type
    );

    match tokio::time::timeout(timeout_duration, service.identify_plant(&image)).await {
        Ok(result) => IdentificationOutcome::from_service_result(result),
        Err(_) => {
            log::error!(
                "{} Identification timed out after {:?}",
                LOG_TAG_WORKFLOW,
                timeout_duration
            );
            IdentificationOutcome::CallFailed(USER_MESSAGE_TIMEOUT.to_string())
        }
    }
}
