use std::sync::Arc;

use iced::window::Id;
use iced::{Element, Task};

use crate::adapters::{GeminiIdentificationService, NokhwaCameraDevice, RfdImagePicker};
use crate::core::interfaces::adapters::PlantIdentificationService;
use crate::core::models::{PlantImage, UserSettings};
use crate::core::orchestrators::app_orchestrator::{AppOrchestrator, OrchestratorMessage};
use crate::global_constants::{
    API_KEY_ENV_VAR, CAMERA_PREVIEW_INTERVAL_MILLIS, LOG_TAG_APP, USER_MESSAGE_MISSING_API_KEY,
};

struct UnconfiguredIdentificationService;

#[async_trait::async_trait]
impl PlantIdentificationService for UnconfiguredIdentificationService {
    async fn identify_plant(&self, _image: &PlantImage) -> anyhow::Result<Option<String>> {
        anyhow::bail!(USER_MESSAGE_MISSING_API_KEY)
    }
}

pub struct PlantApp {
    orchestrator: AppOrchestrator,
}

fn build_identification_service(settings: &UserSettings) -> Arc<dyn PlantIdentificationService> {
    match UserSettings::resolve_api_key() {
        Some(api_key) => {
            log::info!(
                "{} Gemini service configured with model {}",
                LOG_TAG_APP,
                settings.gemini_model
            );
            Arc::new(GeminiIdentificationService::new(api_key, settings))
        }
        None => {
            log::warn!(
                "{} No API key found in {}, identification calls will fail",
                LOG_TAG_APP,
                API_KEY_ENV_VAR
            );
            Arc::new(UnconfiguredIdentificationService)
        }
    }
}

impl PlantApp {
    pub fn build() -> (Self, Task<OrchestratorMessage>) {
        log::info!("{} Initializing application", LOG_TAG_APP);

        let settings = UserSettings::load().unwrap_or_else(|e| {
            log::warn!("{} Failed to load settings: {:#}, using defaults", LOG_TAG_APP, e);
            UserSettings::default()
        });

        let orchestrator = AppOrchestrator::build(
            build_identification_service(&settings),
            Arc::new(NokhwaCameraDevice::initialize(settings.camera_index)),
            Arc::new(RfdImagePicker::new()),
            settings,
        );

        (
            Self { orchestrator },
            Task::done(OrchestratorMessage::OpenMainWindow),
        )
    }

    pub fn handle_update(&mut self, message: OrchestratorMessage) -> Task<OrchestratorMessage> {
        self.orchestrator.update(message)
    }

    pub fn render_view(&self, window_id: Id) -> Element<'_, OrchestratorMessage> {
        self.orchestrator.render_view(window_id)
    }

    pub fn handle_subscription(&self) -> iced::Subscription<OrchestratorMessage> {
        use iced::window;

        let mut subscriptions = vec![iced::event::listen_with(|event, _status, id| {
            if let iced::Event::Window(window::Event::Closed) = event {
                return Some(OrchestratorMessage::WindowClosed(id));
            }
            None
        })];

        if self.orchestrator.is_identifying() {
            subscriptions.push(iced::Subscription::run(|| {
                iced::stream::channel(
                    10,
                    |mut output: futures::channel::mpsc::Sender<OrchestratorMessage>| async move {
                        loop {
                            tokio::time::sleep(std::time::Duration::from_millis(80)).await;
                            let _ = output.try_send(OrchestratorMessage::SpinnerTick);
                        }
                    },
                )
            }));
        }

        if self.orchestrator.is_capturing() {
            subscriptions.push(iced::Subscription::run(|| {
                iced::stream::channel(
                    10,
                    |mut output: futures::channel::mpsc::Sender<OrchestratorMessage>| async move {
                        loop {
                            tokio::time::sleep(std::time::Duration::from_millis(
                                CAMERA_PREVIEW_INTERVAL_MILLIS,
                            ))
                            .await;
                            let _ = output.try_send(OrchestratorMessage::CameraPreviewTick);
                        }
                    },
                )
            }));
        }

        iced::Subscription::batch(subscriptions)
    }
}
