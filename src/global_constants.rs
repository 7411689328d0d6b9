pub const APPLICATION_TITLE: &str = "Itzamná";
pub const APPLICATION_HEADLINE: &str = "Itzamná - Identificador de Plantas";
pub const APPLICATION_TAGLINE: &str = "Descubre el mundo vegetal con IA";

pub const LOG_TAG_APP: &str = "[APP]";
pub const LOG_TAG_CAMERA: &str = "[CAMERA]";
pub const LOG_TAG_GEMINI: &str = "[GEMINI]";
pub const LOG_TAG_WORKFLOW: &str = "[WORKFLOW]";
pub const LOG_TAG_MAIN: &str = "[MAIN]";
pub const LOG_TAG_ORCHESTRATOR: &str = "[ORCHESTRATOR]";
pub const LOG_TAG_SETTINGS: &str = "[SETTINGS]";
pub const LOG_TAG_FILE_PICKER: &str = "[FILE_PICKER]";
pub const LOG_TAG_PLANT_IMAGE: &str = "[PLANT_IMAGE]";
pub const LOG_TAG_CAMERA_FRAME: &str = "[CAMERA_FRAME]";

pub const API_KEY_ENV_VAR: &str = "ITZAMNA_GEMINI_API_KEY";
pub const API_KEY_FALLBACK_ENV_VAR: &str = "GEMINI_API_KEY";
pub const API_KEY_HEADER: &str = "x-goog-api-key";

pub const DEFAULT_GEMINI_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_IDENTIFICATION_PROMPT: &str =
    "Identifica esta planta y proporciona información importante sobre ella en español.";
pub const DEFAULT_QUERY_LIMIT: u32 = 5;
pub const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 30;
pub const DEFAULT_DONATION_URL: &str = "https://www.patreon.com/neuralcodelab";

pub const CAPTURED_IMAGE_FILE_NAME: &str = "captured.png";
pub const CAPTURED_IMAGE_MIME_TYPE: &str = "image/png";
pub const FALLBACK_MIME_TYPE: &str = "application/octet-stream";
pub const SELECTABLE_IMAGE_EXTENSIONS: &[&str] =
    &["png", "jpg", "jpeg", "webp", "gif", "bmp", "tif", "tiff", "heic"];

pub const PREFERRED_CAMERA_KEYWORDS: &[&str] = &["back", "rear", "environment", "trasera"];
pub const CAMERA_PREVIEW_INTERVAL_MILLIS: u64 = 33;
pub const CAMERA_FRAME_CHANNEL_CAPACITY: usize = 2;
pub const CAMERA_REQUESTED_WIDTH: u32 = 1280;
pub const CAMERA_REQUESTED_HEIGHT: u32 = 720;
pub const CAMERA_REQUESTED_FPS: u32 = 30;

pub const SETTINGS_DIRECTORY_NAME: &str = "itzamna";
pub const SETTINGS_FILE_NAME: &str = "settings.json";

pub const USER_MESSAGE_NO_RESPONSE: &str =
    "No se pudo obtener una respuesta del modelo. Por favor, intenta de nuevo.";
pub const USER_MESSAGE_CALL_FAILED_PREFIX: &str = "Error al identificar la planta";
pub const USER_MESSAGE_CALL_FAILED_HINT: &str =
    "Por favor, verifica tu conexión a internet y la clave API.";
pub const USER_MESSAGE_UNKNOWN_ERROR: &str =
    "Error desconocido al identificar la planta. Por favor, intenta de nuevo.";
pub const USER_MESSAGE_MISSING_API_KEY: &str = "no hay una clave API configurada";
pub const USER_MESSAGE_TIMEOUT: &str = "la solicitud tardó demasiado en responder";

pub const LABEL_CHOOSE_FILE: &str = "Elegir archivo";
pub const LABEL_USE_CAMERA: &str = "Usar Cámara";
pub const LABEL_CAPTURE_PHOTO: &str = "Capturar Foto";
pub const LABEL_CANCEL_CAMERA: &str = "Cancelar";
pub const LABEL_IDENTIFY: &str = "Identificar Planta";
pub const LABEL_IDENTIFYING: &str = "Identificando";
pub const LABEL_RESULT_HEADER: &str = "Resultado:";
pub const LABEL_SUPPORT: &str = "Apoyar en Patreon";
pub const LABEL_CREATED_BY: &str = "Creado por neuralcodelab.com";
pub const LABEL_WAITING_FOR_CAMERA: &str = "Esperando la cámara...";
pub const LABEL_DONATION_THANKS: &str = "¡Gracias por usar nuestra aplicación!";
pub const LABEL_DONATION_BODY: &str = "Hemos notado que has usado el servicio varias veces. Si te ha sido útil, considera apoyarnos en Patreon.";

pub const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
