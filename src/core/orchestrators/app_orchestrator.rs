use std::sync::Arc;

use iced::widget::{button, column, container, row, scrollable, text, Space};
use iced::window::{self, Id};
use iced::{Alignment, Background, Border, Color, Element, Length, Size, Task};

use crate::core::interfaces::adapters::{CameraDevice, ImagePicker, PlantIdentificationService};
use crate::core::models::{
    DonationPromptStyle, IdentificationOutcome, PlantImage, UserSettings, WorkflowState,
};
use crate::core::orchestrators::capture_session::CaptureSession;
use crate::core::orchestrators::identification_workflow::{
    run_identification_call, IdentificationRequest, IdentificationWorkflow,
};
use crate::global_constants;
use crate::global_constants::LOG_TAG_ORCHESTRATOR;
use crate::presentation::app_theme;

pub struct AppOrchestrator {
    identification_service: Arc<dyn PlantIdentificationService>,
    camera_device: Arc<dyn CameraDevice>,
    image_picker: Arc<dyn ImagePicker>,
    workflow: IdentificationWorkflow,
    capture_session: CaptureSession,
    settings: UserSettings,
    main_window_id: Option<Id>,
    spinner_frame: usize,
}

#[derive(Clone)]
pub enum OrchestratorMessage {
    OpenMainWindow,
    WindowClosed(Id),
    ChooseFile,
    ImagePicked(Option<PlantImage>),
    ImagePickFailed(String),
    StartCamera,
    CameraPreviewTick,
    CapturePhoto,
    CancelCamera,
    IdentifyPlant,
    IdentificationFinished(u64, IdentificationOutcome),
    OpenDonationPage,
    SpinnerTick,
}

impl std::fmt::Debug for OrchestratorMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrchestratorMessage::OpenMainWindow => write!(f, "OpenMainWindow"),
            OrchestratorMessage::WindowClosed(id) => write!(f, "WindowClosed({:?})", id),
            OrchestratorMessage::ChooseFile => write!(f, "ChooseFile"),
            OrchestratorMessage::ImagePicked(image) => {
                write!(f, "ImagePicked({:?})", image.as_ref().map(|i| &i.file_name))
            }
            OrchestratorMessage::ImagePickFailed(e) => write!(f, "ImagePickFailed({})", e),
            OrchestratorMessage::StartCamera => write!(f, "StartCamera"),
            OrchestratorMessage::CameraPreviewTick => write!(f, "CameraPreviewTick"),
            OrchestratorMessage::CapturePhoto => write!(f, "CapturePhoto"),
            OrchestratorMessage::CancelCamera => write!(f, "CancelCamera"),
            OrchestratorMessage::IdentifyPlant => write!(f, "IdentifyPlant"),
            OrchestratorMessage::IdentificationFinished(attempt_id, outcome) => write!(
                f,
                "IdentificationFinished({}, success={})",
                attempt_id,
                outcome.is_success()
            ),
            OrchestratorMessage::OpenDonationPage => write!(f, "OpenDonationPage"),
            OrchestratorMessage::SpinnerTick => write!(f, "SpinnerTick"),
        }
    }
}

impl AppOrchestrator {
    pub fn build(
        identification_service: Arc<dyn PlantIdentificationService>,
        camera_device: Arc<dyn CameraDevice>,
        image_picker: Arc<dyn ImagePicker>,
        settings: UserSettings,
    ) -> Self {
        Self {
            identification_service,
            camera_device,
            image_picker,
            workflow: IdentificationWorkflow::build(settings.query_limit),
            capture_session: CaptureSession::default(),
            settings,
            main_window_id: None,
            spinner_frame: 0,
        }
    }

    pub fn is_identifying(&self) -> bool {
        self.workflow.is_loading()
    }

    pub fn is_capturing(&self) -> bool {
        self.capture_session.is_capturing()
    }

    pub fn update(&mut self, message: OrchestratorMessage) -> Task<OrchestratorMessage> {
        if !matches!(
            message,
            OrchestratorMessage::SpinnerTick | OrchestratorMessage::CameraPreviewTick
        ) {
            log::info!("{} Received message: {:?}", LOG_TAG_ORCHESTRATOR, message);
        }

        match message {
            OrchestratorMessage::OpenMainWindow => {
                return self.handle_open_main_window();
            }
            OrchestratorMessage::WindowClosed(id) => {
                return self.handle_window_closed(id);
            }
            OrchestratorMessage::ChooseFile => {
                return self.handle_choose_file();
            }
            OrchestratorMessage::ImagePicked(Some(image)) => {
                self.workflow.select_image(image);
            }
            OrchestratorMessage::ImagePicked(None) => {
                log::debug!("{} File selection dismissed", LOG_TAG_ORCHESTRATOR);
            }
            OrchestratorMessage::ImagePickFailed(error) => {
                log::error!("{} Could not load selected file: {}", LOG_TAG_ORCHESTRATOR, error);
            }
            OrchestratorMessage::StartCamera => {
                self.capture_session.start(self.camera_device.as_ref());
            }
            OrchestratorMessage::CameraPreviewTick => {
                self.capture_session.refresh_preview();
            }
            OrchestratorMessage::CapturePhoto => {
                self.handle_capture_photo();
            }
            OrchestratorMessage::CancelCamera => {
                self.capture_session.cancel();
            }
            OrchestratorMessage::IdentifyPlant => {
                return self.handle_identify_plant();
            }
            OrchestratorMessage::IdentificationFinished(attempt_id, outcome) => {
                self.workflow.complete_identification(attempt_id, outcome);
            }
            OrchestratorMessage::OpenDonationPage => {
                self.handle_open_donation_page();
            }
            OrchestratorMessage::SpinnerTick => {
                self.spinner_frame =
                    (self.spinner_frame + 1) % global_constants::SPINNER_FRAMES.len();
            }
        }

        Task::none()
    }

    pub fn render_view(&self, window_id: Id) -> Element<'_, OrchestratorMessage> {
        if Some(window_id) == self.main_window_id {
            self.render_main_window()
        } else {
            text("Cargando...").into()
        }
    }

    fn handle_open_main_window(&mut self) -> Task<OrchestratorMessage> {
        if self.main_window_id.is_some() {
            log::warn!("{} Main window already exists and is open", LOG_TAG_ORCHESTRATOR);
            return Task::none();
        }

        let (id, task) = window::open(window::Settings {
            size: Size::new(720.0, 860.0),
            position: window::Position::Centered,
            resizable: true,
            ..Default::default()
        });

        self.main_window_id = Some(id);
        log::info!("{} Main window created with ID: {:?}", LOG_TAG_ORCHESTRATOR, id);
        task.discard()
    }

    fn handle_window_closed(&mut self, id: Id) -> Task<OrchestratorMessage> {
        log::info!("{} Window closed: {:?}", LOG_TAG_ORCHESTRATOR, id);

        if Some(id) != self.main_window_id {
            return Task::none();
        }

        self.main_window_id = None;
        self.capture_session.cancel();
        log::info!("{} Main window closed, exiting application", LOG_TAG_ORCHESTRATOR);
        iced::exit()
    }

    fn handle_choose_file(&mut self) -> Task<OrchestratorMessage> {
        let image_picker = Arc::clone(&self.image_picker);

        Task::future(async move {
            match image_picker.pick_image().await {
                Ok(image) => OrchestratorMessage::ImagePicked(image),
                Err(e) => OrchestratorMessage::ImagePickFailed(format!("{:#}", e)),
            }
        })
    }

    fn handle_capture_photo(&mut self) {
        match self.capture_session.capture_photo() {
            Ok(Some(image)) => self.workflow.select_image(image),
            Ok(None) => {}
            Err(e) => log::error!("{} Failed to capture photo: {:#}", LOG_TAG_ORCHESTRATOR, e),
        }
    }

    fn handle_identify_plant(&mut self) -> Task<OrchestratorMessage> {
        match self.workflow.begin_identification() {
            IdentificationRequest::Started { attempt_id, image } => {
                let service = Arc::clone(&self.identification_service);
                let timeout_duration = self.settings.request_timeout();

                Task::future(async move {
                    let outcome = run_identification_call(service, image, timeout_duration).await;
                    OrchestratorMessage::IdentificationFinished(attempt_id, outcome)
                })
            }
            IdentificationRequest::MissingImage
            | IdentificationRequest::AlreadyInFlight
            | IdentificationRequest::LimitReached => Task::none(),
        }
    }

    fn handle_open_donation_page(&self) {
        log::info!(
            "{} Opening donation page {}",
            LOG_TAG_ORCHESTRATOR,
            self.settings.donation_url
        );
        if let Err(e) = open::that(&self.settings.donation_url) {
            log::error!("{} Failed to open donation page: {}", LOG_TAG_ORCHESTRATOR, e);
        }
    }

    fn render_main_window(&self) -> Element<'_, OrchestratorMessage> {
        let theme = app_theme::get_theme(&self.settings.theme_mode);
        let card_theme = theme.clone();

        let header_section = column![
            text(global_constants::APPLICATION_HEADLINE).size(34),
            text(global_constants::APPLICATION_TAGLINE)
                .size(16)
                .style(|_theme: &iced::Theme| iced::widget::text::Style {
                    color: Some(Color::from_rgba(0.45, 0.45, 0.45, 1.0)),
                }),
        ]
        .spacing(8)
        .align_x(Alignment::Center);

        let mut card = column![self.render_image_source_section()]
            .spacing(16)
            .align_x(Alignment::Center);

        if let Some(image) = self.workflow.current_image() {
            card = card.push(
                iced::widget::image(image.image_handle.clone())
                    .width(Length::Fixed(300.0))
                    .height(Length::Fixed(300.0)),
            );
        }

        card = card.push(self.render_identify_button());

        if let Some(message) = self.workflow.state().displayed_message() {
            card = card.push(self.render_result_section(message));
        }

        if matches!(self.workflow.state(), WorkflowState::LimitReached { .. }) {
            card = card.push(self.render_donation_prompt());
        }

        let content = column![
            header_section,
            Space::new().height(Length::Fixed(24.0)),
            container(card)
                .padding(32)
                .max_width(640.0)
                .style(move |_theme| app_theme::card_container_style(&card_theme)),
        ]
        .spacing(4)
        .padding(32)
        .align_x(Alignment::Center);

        container(scrollable(content))
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .style(move |_theme| {
                let palette = theme.palette();
                iced::widget::container::Style {
                    background: Some(Background::Color(palette.background)),
                    text_color: Some(palette.text),
                    ..Default::default()
                }
            })
            .into()
    }

    fn render_image_source_section(&self) -> Element<'_, OrchestratorMessage> {
        if self.capture_session.is_capturing() {
            let preview: Element<'_, OrchestratorMessage> =
                match self.capture_session.preview_handle() {
                    Some(handle) => iced::widget::image(handle.clone())
                        .width(Length::Fill)
                        .into(),
                    None => container(text(global_constants::LABEL_WAITING_FOR_CAMERA).size(14))
                        .padding(40)
                        .center_x(Length::Fill)
                        .into(),
                };

            let capture_btn = button(
                centered_label(global_constants::LABEL_CAPTURE_PHOTO),
            )
            .padding([10, 16])
            .width(Length::Fill)
            .style(|theme, status| app_theme::purple_button_style(theme, status))
            .on_press(OrchestratorMessage::CapturePhoto);

            let cancel_btn = button(text(global_constants::LABEL_CANCEL_CAMERA))
                .padding([10, 16])
                .style(|theme, status| app_theme::secondary_button_style(theme, status))
                .on_press(OrchestratorMessage::CancelCamera);

            return column![preview, row![capture_btn, cancel_btn].spacing(12)]
                .spacing(16)
                .into();
        }

        let choose_file_btn = button(
            centered_label(global_constants::LABEL_CHOOSE_FILE),
        )
        .padding([10, 16])
        .width(Length::Fill)
        .style(|theme, status| app_theme::secondary_button_style(theme, status))
        .on_press(OrchestratorMessage::ChooseFile);

        let camera_btn = button(
            centered_label(global_constants::LABEL_USE_CAMERA),
        )
        .padding([10, 16])
        .width(Length::Fill)
        .style(|theme, status| app_theme::primary_button_style(theme, status))
        .on_press(OrchestratorMessage::StartCamera);

        column![choose_file_btn, camera_btn].spacing(12).into()
    }

    fn render_identify_button(&self) -> Element<'_, OrchestratorMessage> {
        let label = if self.workflow.is_loading() {
            format!(
                "{} {}",
                global_constants::SPINNER_FRAMES[self.spinner_frame],
                global_constants::LABEL_IDENTIFYING
            )
        } else {
            global_constants::LABEL_IDENTIFY.to_string()
        };

        button(centered_label(label))
            .padding([12, 16])
            .width(Length::Fill)
            .style(|theme, status| app_theme::primary_button_style(theme, status))
            .on_press_maybe(
                self.workflow
                    .can_identify()
                    .then_some(OrchestratorMessage::IdentifyPlant),
            )
            .into()
    }

    fn render_result_section<'a>(&'a self, message: &'a str) -> Element<'a, OrchestratorMessage> {
        let is_failure = matches!(self.workflow.state(), WorkflowState::Failed(_));
        let message_color = if is_failure {
            Color::from_rgb(0.8, 0.2, 0.2)
        } else {
            Color::from_rgb(0.15, 0.15, 0.15)
        };

        let section = column![
            text(global_constants::LABEL_RESULT_HEADER)
                .size(22)
                .style(|_theme: &iced::Theme| iced::widget::text::Style {
                    color: Some(app_theme::BRAND_GREEN),
                }),
            text(message)
                .size(16)
                .style(move |_theme: &iced::Theme| iced::widget::text::Style {
                    color: Some(message_color),
                }),
        ]
        .spacing(12);

        let divider = container(text(""))
            .width(Length::Fill)
            .height(Length::Fixed(1.0))
            .style(|_theme| iced::widget::container::Style {
                background: Some(Background::Color(Color::from_rgba(0.5, 0.5, 0.5, 0.3))),
                ..Default::default()
            });

        let section = section
            .push(divider)
            .push(
                text(global_constants::LABEL_CREATED_BY)
                    .size(13)
                    .style(|_theme: &iced::Theme| iced::widget::text::Style {
                        color: Some(Color::from_rgba(0.5, 0.5, 0.5, 1.0)),
                    }),
            )
            .push(self.render_support_button());

        container(section)
            .padding(24)
            .width(Length::Fill)
            .style(|_theme| iced::widget::container::Style {
                background: Some(Background::Color(Color::WHITE)),
                border: Border {
                    color: Color::from_rgba(0.0, 0.0, 0.0, 0.1),
                    width: 1.0,
                    radius: 8.0.into(),
                },
                ..Default::default()
            })
            .into()
    }

    fn render_donation_prompt(&self) -> Element<'_, OrchestratorMessage> {
        match self.settings.donation_prompt_style {
            DonationPromptStyle::Banner => {
                let banner = column![
                    text(global_constants::LABEL_DONATION_THANKS).size(18),
                    text(global_constants::LABEL_DONATION_BODY).size(14),
                    self.render_support_button(),
                ]
                .spacing(12)
                .align_x(Alignment::Center);

                container(banner)
                    .padding(24)
                    .width(Length::Fill)
                    .style(app_theme::donation_banner_style)
                    .into()
            }
            DonationPromptStyle::Inline => row![
                text(global_constants::LABEL_DONATION_THANKS).size(14),
                self.render_support_button(),
            ]
            .spacing(12)
            .align_y(Alignment::Center)
            .into(),
        }
    }

    fn render_support_button(&self) -> Element<'_, OrchestratorMessage> {
        button(text(global_constants::LABEL_SUPPORT))
            .padding([8, 16])
            .style(|theme, status| app_theme::donation_button_style(theme, status))
            .on_press(OrchestratorMessage::OpenDonationPage)
            .into()
    }
}

fn centered_label<'a>(
    label: impl text::IntoFragment<'a>,
) -> iced::widget::Container<'a, OrchestratorMessage> {
    container(text(label)).center_x(Length::Fill)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::interfaces::adapters::CameraStream;
    use crate::core::models::CameraFrame;
    use async_trait::async_trait;

    struct MockIdentificationService;
    #[async_trait]
    impl PlantIdentificationService for MockIdentificationService {
        async fn identify_plant(&self, _image: &PlantImage) -> anyhow::Result<Option<String>> {
            Ok(Some("Rosa".to_string()))
        }
    }

    struct MockCameraStream;
    impl CameraStream for MockCameraStream {
        fn poll_latest_frame(&mut self) -> anyhow::Result<Option<CameraFrame>> {
            Ok(Some(CameraFrame::build_from_raw_data(2, 2, vec![50u8; 16])))
        }

        fn stop(&mut self) {}
    }

    struct MockCameraDevice {
        deny_access: bool,
    }
    impl CameraDevice for MockCameraDevice {
        fn open_stream(&self) -> anyhow::Result<Box<dyn CameraStream>> {
            if self.deny_access {
                anyhow::bail!("Permission denied");
            }
            Ok(Box::new(MockCameraStream))
        }
    }

    struct MockImagePicker;
    #[async_trait]
    impl ImagePicker for MockImagePicker {
        async fn pick_image(&self) -> anyhow::Result<Option<PlantImage>> {
            Ok(None)
        }
    }

    fn create_test_orchestrator_with(deny_camera: bool, settings: UserSettings) -> AppOrchestrator {
        AppOrchestrator::build(
            Arc::new(MockIdentificationService),
            Arc::new(MockCameraDevice {
                deny_access: deny_camera,
            }),
            Arc::new(MockImagePicker),
            settings,
        )
    }

    fn create_test_orchestrator() -> AppOrchestrator {
        create_test_orchestrator_with(false, UserSettings::default())
    }

    fn create_test_image(name: &str) -> PlantImage {
        PlantImage::build_from_bytes(name.to_string(), "image/jpeg".to_string(), vec![9, 9, 9])
    }

    #[test]
    fn test_build_creates_orchestrator_with_correct_initial_state() {
        let orchestrator = create_test_orchestrator();

        assert!(orchestrator.main_window_id.is_none());
        assert!(!orchestrator.is_identifying());
        assert!(!orchestrator.is_capturing());
        assert_eq!(orchestrator.workflow.state(), &WorkflowState::Idle);
    }

    #[test]
    fn test_image_picked_sets_current_image() {
        let mut orchestrator = create_test_orchestrator();

        let _ = orchestrator.update(OrchestratorMessage::ImagePicked(Some(create_test_image(
            "ficus.jpg",
        ))));

        assert_eq!(
            orchestrator.workflow.current_image().unwrap().file_name,
            "ficus.jpg"
        );
    }

    #[test]
    fn test_dismissed_or_failed_pick_keeps_current_image() {
        let mut orchestrator = create_test_orchestrator();
        let _ = orchestrator.update(OrchestratorMessage::ImagePicked(Some(create_test_image(
            "ficus.jpg",
        ))));

        let _ = orchestrator.update(OrchestratorMessage::ImagePicked(None));
        let _ = orchestrator.update(OrchestratorMessage::ImagePickFailed("denied".to_string()));

        assert_eq!(
            orchestrator.workflow.current_image().unwrap().file_name,
            "ficus.jpg"
        );
    }

    #[test]
    fn test_identify_without_image_stays_idle() {
        let mut orchestrator = create_test_orchestrator();

        let _ = orchestrator.update(OrchestratorMessage::IdentifyPlant);

        assert!(!orchestrator.is_identifying());
        assert_eq!(orchestrator.workflow.state(), &WorkflowState::Idle);
    }

    #[test]
    fn test_identify_then_finish_shows_result() {
        let mut orchestrator = create_test_orchestrator();
        let _ = orchestrator.update(OrchestratorMessage::ImagePicked(Some(create_test_image(
            "ficus.jpg",
        ))));

        let _ = orchestrator.update(OrchestratorMessage::IdentifyPlant);
        assert!(orchestrator.is_identifying());

        let _ = orchestrator.update(OrchestratorMessage::IdentificationFinished(
            1,
            IdentificationOutcome::Identified("Ficus lyrata".to_string()),
        ));

        assert_eq!(
            orchestrator.workflow.state(),
            &WorkflowState::Identified("Ficus lyrata".to_string())
        );
        assert_eq!(orchestrator.workflow.completed_queries(), 1);
    }

    #[test]
    fn test_image_picked_while_loading_does_not_start_second_call() {
        let mut orchestrator = create_test_orchestrator();
        let _ = orchestrator.update(OrchestratorMessage::ImagePicked(Some(create_test_image(
            "ficus.jpg",
        ))));
        let _ = orchestrator.update(OrchestratorMessage::IdentifyPlant);

        let _ = orchestrator.update(OrchestratorMessage::ImagePicked(Some(create_test_image(
            "monstera.jpg",
        ))));
        let _ = orchestrator.update(OrchestratorMessage::IdentifyPlant);
        assert!(orchestrator.is_identifying());

        let _ = orchestrator.update(OrchestratorMessage::IdentificationFinished(
            1,
            IdentificationOutcome::Identified("Ficus lyrata".to_string()),
        ));

        assert!(!orchestrator.is_identifying());
        assert_eq!(orchestrator.workflow.state(), &WorkflowState::Idle);
        assert_eq!(orchestrator.workflow.completed_queries(), 1);
        assert_eq!(
            orchestrator.workflow.current_image().unwrap().file_name,
            "monstera.jpg"
        );
    }

    #[test]
    fn test_failed_call_keeps_message_for_result_card() {
        let mut orchestrator = create_test_orchestrator();
        let _ = orchestrator.update(OrchestratorMessage::ImagePicked(Some(create_test_image(
            "ficus.jpg",
        ))));
        let _ = orchestrator.update(OrchestratorMessage::IdentifyPlant);

        let _ = orchestrator.update(OrchestratorMessage::IdentificationFinished(
            1,
            IdentificationOutcome::CallFailed("offline".to_string()),
        ));

        let message = orchestrator.workflow.state().displayed_message().unwrap();
        assert!(message.contains("offline"));
        assert_eq!(orchestrator.workflow.completed_queries(), 0);
    }

    #[test]
    fn test_limit_from_settings_is_enforced() {
        let settings = UserSettings {
            query_limit: 0,
            ..UserSettings::default()
        };
        let mut orchestrator = create_test_orchestrator_with(false, settings);
        let _ = orchestrator.update(OrchestratorMessage::ImagePicked(Some(create_test_image(
            "ficus.jpg",
        ))));

        let _ = orchestrator.update(OrchestratorMessage::IdentifyPlant);

        assert!(!orchestrator.is_identifying());
        assert!(matches!(
            orchestrator.workflow.state(),
            WorkflowState::LimitReached { .. }
        ));
    }

    #[test]
    fn test_camera_capture_replaces_image_and_releases_camera() {
        let mut orchestrator = create_test_orchestrator();
        let _ = orchestrator.update(OrchestratorMessage::ImagePicked(Some(create_test_image(
            "ficus.jpg",
        ))));

        let _ = orchestrator.update(OrchestratorMessage::StartCamera);
        assert!(orchestrator.is_capturing());
        let _ = orchestrator.update(OrchestratorMessage::CameraPreviewTick);
        let _ = orchestrator.update(OrchestratorMessage::CapturePhoto);

        assert!(!orchestrator.is_capturing());
        assert_eq!(
            orchestrator.workflow.current_image().unwrap().file_name,
            global_constants::CAPTURED_IMAGE_FILE_NAME
        );
    }

    #[test]
    fn test_denied_camera_keeps_previous_state() {
        let mut orchestrator = create_test_orchestrator_with(true, UserSettings::default());
        let _ = orchestrator.update(OrchestratorMessage::ImagePicked(Some(create_test_image(
            "ficus.jpg",
        ))));

        let _ = orchestrator.update(OrchestratorMessage::StartCamera);

        assert!(!orchestrator.is_capturing());
        assert_eq!(
            orchestrator.workflow.current_image().unwrap().file_name,
            "ficus.jpg"
        );
    }

    #[test]
    fn test_spinner_tick_wraps_around() {
        let mut orchestrator = create_test_orchestrator();

        for _ in 0..global_constants::SPINNER_FRAMES.len() {
            let _ = orchestrator.update(OrchestratorMessage::SpinnerTick);
        }

        assert_eq!(orchestrator.spinner_frame, 0);
    }
}
