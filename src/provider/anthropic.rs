use std::sync::Mutex;

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};

use crate::consts::{API_URL, API_VERSION, DEFAULT_MODEL};
use crate::error::{Error, Result};

use super::{ImagePayload, Provider, Reply, Request, TokenUsage};

/// Talks to the Anthropic Messages API with an `x-api-key` credential.
///
/// The key is held here and sent only to the API itself — it never transits
/// any other component.
pub struct AnthropicProvider {
    model: String,
    api_key: String,
    client: reqwest::Client,
    usage: Mutex<TokenUsage>,
}

impl AnthropicProvider {
    pub fn new(model: Option<String>, api_key: String) -> Self {
        Self {
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            api_key,
            client: reqwest::Client::new(),
            usage: Mutex::new(TokenUsage::default()),
        }
    }

    fn build_body<'a>(&'a self, request: &'a Request) -> ApiRequest<'a> {
        let content = match &request.image {
            Some(image) => MessageContent::Blocks(vec![
                ContentBlock::Image {
                    source: ImageSource::base64(image),
                },
                ContentBlock::Text {
                    text: request.prompt.clone(),
                },
            ]),
            None => MessageContent::Text(request.prompt.clone()),
        };

        ApiRequest {
            model: &self.model,
            max_tokens: request.max_tokens,
            messages: vec![ApiMessage {
                role: "user",
                content,
            }],
        }
    }
}

#[async_trait]
impl Provider for AnthropicProvider {
    async fn complete(&self, request: Request) -> Result<Reply> {
        let body = self.build_body(&request);

        let resp = self
            .client
            .post(API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Api { status, body });
        }

        let api_resp: ApiResponse = resp.json().await?;

        // Concatenate the text blocks of the reply
        let text: String = api_resp
            .content
            .iter()
            .filter_map(|block| {
                if block.block_type == "text" {
                    block.text.as_deref()
                } else {
                    None
                }
            })
            .collect::<Vec<_>>()
            .join("");

        if text.is_empty() {
            return Err(Error::EmptyReply);
        }

        let usage = api_resp.usage.map(|u| TokenUsage {
            input_tokens: u.input_tokens,
            output_tokens: u.output_tokens,
        });

        if let Some(usage) = usage {
            eprintln!(
                "  [tokens] input: {}, output: {}",
                usage.input_tokens, usage.output_tokens
            );
            self.usage.lock().unwrap().add(usage);
        }

        Ok(Reply { text, usage })
    }

    fn session_usage(&self) -> TokenUsage {
        *self.usage.lock().unwrap()
    }
}

// --- API types ---

#[derive(Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<ApiMessage>,
}

#[derive(Serialize)]
struct ApiMessage {
    role: &'static str,
    content: MessageContent,
}

#[derive(Serialize)]
#[serde(untagged)]
enum MessageContent {
    Text(String),
    Blocks(Vec<ContentBlock>),
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum ContentBlock {
    Image { source: ImageSource },
    Text { text: String },
}

#[derive(Serialize)]
struct ImageSource {
    #[serde(rename = "type")]
    source_type: &'static str,
    media_type: String,
    data: String,
}

impl ImageSource {
    fn base64(image: &ImagePayload) -> Self {
        Self {
            source_type: "base64",
            media_type: image.media_type.clone(),
            data: BASE64.encode(&image.data),
        }
    }
}

#[derive(Deserialize)]
struct ApiResponse {
    content: Vec<ResponseBlock>,
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct ResponseBlock {
    #[serde(rename = "type")]
    block_type: String,
    text: Option<String>,
}

#[derive(Deserialize)]
struct Usage {
    input_tokens: u64,
    output_tokens: u64,
}
