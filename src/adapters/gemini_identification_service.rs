use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::interfaces::adapters::PlantIdentificationService;
use crate::core::models::{PlantImage, UserSettings};
use crate::global_constants::{API_KEY_HEADER, LOG_TAG_GEMINI};

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum RequestPart<'a> {
    Text { text: &'a str },
    InlineData { inline_data: InlineData<'a> },
}

#[derive(Serialize)]
struct InlineData<'a> {
    mime_type: &'a str,
    data: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Deserialize)]
struct ApiErrorEnvelope {
    error: ApiError,
}

#[derive(Deserialize)]
struct ApiError {
    message: String,
    status: Option<String>,
}

/// Gemini `generateContent` over REST with the image inlined as base64.
pub struct GeminiIdentificationService {
    client: reqwest::Client,
    api_key: String,
    endpoint_url: String,
    prompt: String,
}

impl GeminiIdentificationService {
    pub fn new(api_key: String, settings: &UserSettings) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            endpoint_url: build_endpoint_url(&settings.gemini_api_base_url, &settings.gemini_model),
            prompt: settings.identification_prompt.clone(),
        }
    }

    async fn send_generate_content(&self, image: &PlantImage) -> Result<String> {
        let request_body = build_request_body(&self.prompt, image);

        log::info!(
            "{} Requesting identification from {}",
            LOG_TAG_GEMINI,
            self.endpoint_url
        );

        let response = self
            .client
            .post(&self.endpoint_url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        let response_text = response.text().await?;
        log::debug!(
            "{} Gemini responded with {} ({} bytes)",
            LOG_TAG_GEMINI,
            status,
            response_text.len()
        );

        if !status.is_success() {
            anyhow::bail!(describe_api_error(status.as_u16(), &response_text));
        }

        Ok(response_text)
    }
}

#[async_trait]
impl PlantIdentificationService for GeminiIdentificationService {
    async fn identify_plant(&self, image: &PlantImage) -> Result<Option<String>> {
        let response_text = self.send_generate_content(image).await?;
        let identification = extract_response_text(&response_text)?;

        match &identification {
            Some(text) => log::info!(
                "{} Identification received ({} characters)",
                LOG_TAG_GEMINI,
                text.len()
            ),
            None => log::warn!("{} Gemini returned no text payload", LOG_TAG_GEMINI),
        }

        Ok(identification)
    }
}

fn build_endpoint_url(base_url: &str, model: &str) -> String {
    format!(
        "{}/models/{}:generateContent",
        base_url.trim_end_matches('/'),
        model
    )
}

fn build_request_body<'a>(prompt: &'a str, image: &'a PlantImage) -> GenerateContentRequest<'a> {
    GenerateContentRequest {
        contents: vec![RequestContent {
            parts: vec![
                RequestPart::Text { text: prompt },
                RequestPart::InlineData {
                    inline_data: InlineData {
                        mime_type: &image.mime_type,
                        data: image.encode_base64(),
                    },
                },
            ],
        }],
    }
}

/// Joins the text parts of the first candidate. `None` when there are none.
fn extract_response_text(response_text: &str) -> Result<Option<String>> {
    let response: GenerateContentResponse = serde_json::from_str(response_text)?;

    if let Some(reason) = response
        .prompt_feedback
        .as_ref()
        .and_then(|feedback| feedback.block_reason.as_deref())
    {
        log::warn!("{} Prompt blocked: {}", LOG_TAG_GEMINI, reason);
    }

    let Some(candidate) = response.candidates.into_iter().next() else {
        return Ok(None);
    };

    if let Some(reason) = candidate.finish_reason.as_deref() {
        log::debug!("{} Finish reason: {}", LOG_TAG_GEMINI, reason);
    }

    let text: String = candidate
        .content
        .map(|content| content.parts)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|part| part.text)
        .collect();

    if text.trim().is_empty() {
        return Ok(None);
    }

    Ok(Some(text))
}

fn describe_api_error(status_code: u16, response_text: &str) -> String {
    match serde_json::from_str::<ApiErrorEnvelope>(response_text) {
        Ok(envelope) => match envelope.error.status {
            Some(status) => format!("{} ({} {})", envelope.error.message, status_code, status),
            None => format!("{} ({})", envelope.error.message, status_code),
        },
        Err(_) => format!("HTTP {}", status_code),
    }
}
