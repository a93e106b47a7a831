use std::time::Duration;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::assistant::audio::{SpeechClip, pcm16_from_le_bytes};

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const CHAT_MODEL: &str = "gemini-3-pro-preview";
const TTS_MODEL: &str = "gemini-2.5-flash-preview-tts";
const TTS_VOICE: &str = "Kore";
const DEFAULT_SAMPLE_RATE: u32 = 24_000;

const SYSTEM_PROMPT: &str = "You are an expert professor in renewable energy, \
specializing in hydrogen production technologies. You are assisting a student \
or audience member during a presentation about 'Hydrogen Production: \
Industrial and Academic Frontiers'. Answer questions concisely and accurately \
based on current academic and industrial knowledge.";

const VISION_PROMPT: &str = "Analyze this image in the context of renewable \
energy and hydrogen production. Explain what technical diagrams, chemical \
reactions, or industrial equipment are shown.";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("service returned {status}: {message}")]
    Api { status: u16, message: String },
    #[error("response contained no usable content")]
    EmptyResponse,
    #[error("audio payload was not valid base64: {0}")]
    AudioDecode(#[from] base64::DecodeError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Model,
}

impl Role {
    fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Model => "model",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub role: Role,
    pub text: String,
}

/// The three assistant operations, behind a trait so the worker thread can be
/// exercised with a stub in tests.
pub trait AssistantBackend: Send {
    fn chat(&self, history: &[ChatMessage], message: &str) -> Result<String, ClientError>;
    fn analyze_image(&self, image: &[u8], mime: &str) -> Result<String, ClientError>;
    fn synthesize(&self, text: &str) -> Result<SpeechClip, ClientError>;
}

// --- Wire types (camelCase per the generateContent REST surface) ---

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<Part>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    response_modalities: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    speech_config: Option<SpeechConfig>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SpeechConfig {
    voice_config: VoiceConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceConfig {
    prebuilt_voice_config: PrebuiltVoiceConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PrebuiltVoiceConfig {
    voice_name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct GenerateResponse {
    candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Candidate {
    content: Option<Content>,
}

fn text_part(text: impl Into<String>) -> Part {
    Part {
        text: Some(text.into()),
        inline_data: None,
    }
}

fn chat_request(history: &[ChatMessage], message: &str) -> GenerateRequest {
    let mut contents: Vec<Content> = history
        .iter()
        .map(|msg| Content {
            role: Some(msg.role.as_str().to_string()),
            parts: vec![text_part(msg.text.clone())],
        })
        .collect();
    contents.push(Content {
        role: Some(Role::User.as_str().to_string()),
        parts: vec![text_part(message)],
    });
    GenerateRequest {
        contents,
        system_instruction: Some(Content {
            role: None,
            parts: vec![text_part(SYSTEM_PROMPT)],
        }),
        generation_config: None,
    }
}

fn vision_request(image: &[u8], mime: &str) -> GenerateRequest {
    GenerateRequest {
        contents: vec![Content {
            role: Some(Role::User.as_str().to_string()),
            parts: vec![
                Part {
                    text: None,
                    inline_data: Some(InlineData {
                        mime_type: mime.to_string(),
                        data: STANDARD.encode(image),
                    }),
                },
                text_part(VISION_PROMPT),
            ],
        }],
        system_instruction: None,
        generation_config: None,
    }
}

fn speech_request(text: &str) -> GenerateRequest {
    GenerateRequest {
        contents: vec![Content {
            role: None,
            parts: vec![text_part(text)],
        }],
        system_instruction: None,
        generation_config: Some(GenerationConfig {
            response_modalities: vec!["AUDIO".to_string()],
            speech_config: Some(SpeechConfig {
                voice_config: VoiceConfig {
                    prebuilt_voice_config: PrebuiltVoiceConfig {
                        voice_name: TTS_VOICE.to_string(),
                    },
                },
            }),
        }),
    }
}

fn first_text(response: GenerateResponse) -> Option<String> {
    response
        .candidates
        .into_iter()
        .next()?
        .content?
        .parts
        .into_iter()
        .find_map(|p| p.text)
}

fn first_inline_data(response: GenerateResponse) -> Option<InlineData> {
    response
        .candidates
        .into_iter()
        .next()?
        .content?
        .parts
        .into_iter()
        .find_map(|p| p.inline_data)
}

/// PCM responses carry their rate in the MIME type, e.g.
/// `audio/L16;codec=pcm;rate=24000`.
fn sample_rate_from_mime(mime: &str) -> u32 {
    mime.split(';')
        .filter_map(|param| param.trim().strip_prefix("rate="))
        .find_map(|rate| rate.parse().ok())
        .unwrap_or(DEFAULT_SAMPLE_RATE)
}

/// Blocking HTTP client for the generateContent API. Lives on the assistant
/// worker thread, never on the UI loop.
pub struct GeminiClient {
    http: reqwest::blocking::Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: String) -> Result<Self, ClientError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()?;
        Ok(Self {
            http,
            api_key,
            base_url: BASE_URL.to_string(),
        })
    }

    fn generate(&self, model: &str, request: &GenerateRequest) -> Result<GenerateResponse, ClientError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, model);
        let response = self
            .http
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Api {
                status: status.as_u16(),
                message: response.text().unwrap_or_default(),
            });
        }
        Ok(response.json()?)
    }
}

impl AssistantBackend for GeminiClient {
    fn chat(&self, history: &[ChatMessage], message: &str) -> Result<String, ClientError> {
        let response = self.generate(CHAT_MODEL, &chat_request(history, message))?;
        first_text(response).ok_or(ClientError::EmptyResponse)
    }

    fn analyze_image(&self, image: &[u8], mime: &str) -> Result<String, ClientError> {
        let response = self.generate(CHAT_MODEL, &vision_request(image, mime))?;
        first_text(response).ok_or(ClientError::EmptyResponse)
    }

    fn synthesize(&self, text: &str) -> Result<SpeechClip, ClientError> {
        let response = self.generate(TTS_MODEL, &speech_request(text))?;
        let inline = first_inline_data(response).ok_or(ClientError::EmptyResponse)?;
        let raw = STANDARD.decode(inline.data)?;
        Ok(SpeechClip {
            sample_rate: sample_rate_from_mime(&inline.mime_type),
            samples: pcm16_from_le_bytes(&raw),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history() -> Vec<ChatMessage> {
        vec![
            ChatMessage { role: Role::User, text: "what is SMR?".into() },
            ChatMessage { role: Role::Model, text: "Steam methane reforming.".into() },
        ]
    }

    #[test]
    fn chat_request_appends_the_new_message_after_history() {
        let request = chat_request(&history(), "and its efficiency?");
        assert_eq!(request.contents.len(), 3);
        assert_eq!(request.contents[0].role.as_deref(), Some("user"));
        assert_eq!(request.contents[1].role.as_deref(), Some("model"));
        assert_eq!(
            request.contents[2].parts[0].text.as_deref(),
            Some("and its efficiency?")
        );
        assert!(request.system_instruction.is_some());
    }

    #[test]
    fn requests_serialize_with_camel_case_keys() {
        let json = serde_json::to_string(&chat_request(&[], "hi")).unwrap();
        assert!(json.contains("\"systemInstruction\""));
        assert!(!json.contains("\"generationConfig\""), "config omitted when unset");

        let json = serde_json::to_string(&vision_request(b"\x01\x02", "image/png")).unwrap();
        assert!(json.contains("\"inlineData\""));
        assert!(json.contains("\"mimeType\":\"image/png\""));

        let json = serde_json::to_string(&speech_request("read this")).unwrap();
        assert!(json.contains("\"responseModalities\":[\"AUDIO\"]"));
        assert!(json.contains("\"prebuiltVoiceConfig\""));
        assert!(json.contains("\"voiceName\":\"Kore\""));
    }

    #[test]
    fn first_text_reads_the_first_candidate() {
        let response: GenerateResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"grey, blue, green"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(first_text(response).as_deref(), Some("grey, blue, green"));
    }

    #[test]
    fn empty_or_malformed_candidates_yield_none() {
        let response: GenerateResponse = serde_json::from_str(r#"{"candidates":[]}"#).unwrap();
        assert!(first_text(response).is_none());

        let response: GenerateResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert!(first_inline_data(response).is_none());

        let response: GenerateResponse =
            serde_json::from_str(r#"{"candidates":[{"content":{"parts":[{}]}}]}"#).unwrap();
        assert!(first_text(response).is_none());
    }

    #[test]
    fn inline_audio_round_trips_from_a_response() {
        let encoded = STANDARD.encode([0x34, 0x12, 0xCC, 0xFF]);
        let json = format!(
            r#"{{"candidates":[{{"content":{{"parts":[{{"inlineData":{{"mimeType":"audio/L16;codec=pcm;rate=24000","data":"{encoded}"}}}}]}}}}]}}"#
        );
        let response: GenerateResponse = serde_json::from_str(&json).unwrap();
        let inline = first_inline_data(response).unwrap();
        assert_eq!(sample_rate_from_mime(&inline.mime_type), 24_000);
        let samples = pcm16_from_le_bytes(&STANDARD.decode(inline.data).unwrap());
        assert_eq!(samples, vec![0x1234, -52]);
    }

    #[test]
    fn sample_rate_defaults_when_mime_is_odd() {
        assert_eq!(sample_rate_from_mime("audio/L16;rate=16000"), 16_000);
        assert_eq!(sample_rate_from_mime("audio/L16; rate=8000"), 8_000);
        assert_eq!(sample_rate_from_mime("audio/wav"), 24_000);
        assert_eq!(sample_rate_from_mime("audio/L16;rate=abc"), 24_000);
    }
}
