pub mod anthropic;
pub mod mock;

use async_trait::async_trait;

use crate::error::Result;

/// A single request to the model: a prompt, optionally with an image attached.
#[derive(Debug, Clone)]
pub struct Request {
    pub prompt: String,
    pub image: Option<ImagePayload>,
    pub max_tokens: u32,
}

impl Request {
    /// A text-only request.
    pub fn text(prompt: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            prompt: prompt.into(),
            image: None,
            max_tokens,
        }
    }
}

/// Raw image bytes plus their declared media type. The provider handles
/// base64 encoding at the wire boundary.
#[derive(Debug, Clone)]
pub struct ImagePayload {
    pub media_type: String,
    pub data: Vec<u8>,
}

/// What the model sent back: the concatenated text blocks of the reply.
#[derive(Debug, Clone)]
pub struct Reply {
    pub text: String,
    pub usage: Option<TokenUsage>,
}

/// Token usage from a single API call.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl TokenUsage {
    /// Accumulate another usage into this one.
    pub fn add(&mut self, other: TokenUsage) {
        self.input_tokens += other.input_tokens;
        self.output_tokens += other.output_tokens;
    }

    /// Total tokens (input + output).
    pub fn total(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }
}

/// The upstream model. Real calls go through [`anthropic::AnthropicProvider`];
/// tests script replies with [`mock::MockProvider`].
#[async_trait]
pub trait Provider: Send + Sync {
    async fn complete(&self, request: Request) -> Result<Reply>;

    /// Tokens consumed across all calls made through this provider.
    fn session_usage(&self) -> TokenUsage {
        TokenUsage::default()
    }
}

/// Extract JSON from text that may be wrapped in markdown code fences.
pub fn extract_json(text: &str) -> &str {
    let trimmed = text.trim();

    // Try to strip ```json ... ``` fences
    if let Some(after) = trimmed.strip_prefix("```json")
        && let Some(json) = after.strip_suffix("```")
    {
        return json.trim();
    }
    if let Some(after) = trimmed.strip_prefix("```")
        && let Some(json) = after.strip_suffix("```")
    {
        return json.trim();
    }

    trimmed
}
