use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde_json::{json, Value};

use crate::config::{Backend, ProviderConfig};
use crate::error::GatewayError;
use crate::models::Message;

/** \brief Plain conversational calls. */
pub const CHAT_TIMEOUT: Duration = Duration::from_secs(40);
/** \brief Analysis tools with a moderate JSON reply. */
pub const TOOL_TIMEOUT: Duration = Duration::from_secs(60);
/** \brief Generation-heavy tools (scripts, slides, funnels). */
pub const GENERATION_TIMEOUT: Duration = Duration::from_secs(80);

/**
 * \brief Single chokepoint for outbound model calls.
 *
 * One attempt per call, no retries. Callers must check
 * `ProviderConfig::is_configured` first; a remote call without credential
 * fails with `NotConfigured` and performs no I/O.
 */
#[async_trait]
pub trait Completer: Send + Sync {
    /**
     * \brief Send role-tagged messages and return the reply text.
     * \param model_hint overrides the configured model for this call; empty means default
     */
    async fn complete(
        &self,
        messages: &[Message],
        model_hint: &str,
        timeout: Duration,
    ) -> Result<String, GatewayError>;
}

/**
 * \brief Response layouts accepted from a local backend.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalReplyShape {
    /** \brief `choices[0].message.content` */
    ChatCompletions,
    /** \brief `message.content` */
    MessageObject,
    /** \brief `content` */
    BareContent,
}

impl LocalReplyShape {
    pub fn detect(v: &Value) -> Option<Self> {
        [Self::ChatCompletions, Self::MessageObject, Self::BareContent]
            .into_iter()
            .find(|shape| shape.extract(v).is_some())
    }

    pub fn extract(self, v: &Value) -> Option<&str> {
        let content = match self {
            Self::ChatCompletions => v
                .get("choices")
                .and_then(|c| c.get(0))
                .and_then(|c| c.get("message"))
                .and_then(|m| m.get("content")),
            Self::MessageObject => v.get("message").and_then(|m| m.get("content")),
            Self::BareContent => v.get("content"),
        };
        content.and_then(|c| c.as_str())
    }
}

/**
 * \brief HTTP gateway over the configured backend, sharing one connection pool.
 */
pub struct Gateway {
    client: reqwest::Client,
    config: Arc<ProviderConfig>,
}

impl Gateway {
    pub fn new(config: Arc<ProviderConfig>) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self { client, config })
    }

    fn model<'a>(&'a self, hint: &'a str) -> &'a str {
        if hint.trim().is_empty() {
            self.config.default_model()
        } else {
            hint
        }
    }

    async fn complete_remote(
        &self,
        messages: &[Message],
        model: &str,
        timeout: Duration,
    ) -> Result<String, GatewayError> {
        let api_key = self.config.api_key().ok_or(GatewayError::NotConfigured)?;
        let body = json!({
            "model": model,
            "messages": messages,
        });

        let resp = self
            .client
            .post(&self.config.remote_url)
            .timeout(timeout)
            .header(CONTENT_TYPE, "application/json")
            .header(AUTHORIZATION, format!("Bearer {}", api_key))
            .json(&body)
            .send()
            .await?;

        let v = read_json(resp).await?;
        extract_openai_content(&v)
    }

    async fn complete_local(
        &self,
        messages: &[Message],
        model: &str,
        timeout: Duration,
    ) -> Result<String, GatewayError> {
        let body = json!({
            "model": model,
            "messages": messages,
            "stream": false,
        });

        let resp = self
            .client
            .post(&self.config.local_url)
            .timeout(timeout)
            .header(CONTENT_TYPE, "application/json")
            .json(&body)
            .send()
            .await?;

        let v = read_json(resp).await?;
        extract_local_content(&v)
    }
}

#[async_trait]
impl Completer for Gateway {
    async fn complete(
        &self,
        messages: &[Message],
        model_hint: &str,
        timeout: Duration,
    ) -> Result<String, GatewayError> {
        let model = self.model(model_hint);
        let result = match self.config.backend {
            Backend::Remote => self.complete_remote(messages, model, timeout).await,
            Backend::Local => self.complete_local(messages, model, timeout).await,
        };
        if let Err(err) = &result {
            tracing::warn!(
                backend = %self.config.backend,
                model,
                error = %err,
                "llm call failed"
            );
        }
        result
    }
}

async fn read_json(resp: reqwest::Response) -> Result<Value, GatewayError> {
    if !resp.status().is_success() {
        let code = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        return Err(GatewayError::Status { code, body });
    }
    let text = resp.text().await?;
    serde_json::from_str(&text).map_err(|e| GatewayError::MalformedBody(e.to_string()))
}

fn extract_openai_content(v: &Value) -> Result<String, GatewayError> {
    LocalReplyShape::ChatCompletions
        .extract(v)
        .map(|s| s.trim().to_string())
        .ok_or_else(|| GatewayError::MalformedBody("missing choices[0].message.content".into()))
}

fn extract_local_content(v: &Value) -> Result<String, GatewayError> {
    let shape = LocalReplyShape::detect(v).ok_or(GatewayError::UnknownShape)?;
    shape
        .extract(v)
        .map(|s| s.trim().to_string())
        .ok_or(GatewayError::UnknownShape)
}
