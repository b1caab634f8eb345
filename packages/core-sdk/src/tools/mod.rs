use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::ProviderConfig;
use crate::error::GatewayError;
use crate::llm::{Completer, Gateway, TOOL_TIMEOUT};
use crate::models::Message;
use crate::normalize::{normalize, Normalized, ToolSchema};

pub mod ads;
pub mod chat;
pub mod content;
pub mod hooks;
pub mod seo;

/** \brief Degraded-mode explanation when no backend can be called. */
pub const NOT_CONFIGURED_MESSAGE: &str = "AI.D no tiene configurado un modelo de IA en este momento. \
     Pídele al equipo que revise la variable OPENAI_API_KEY (o AID_LLM_BACKEND) en el servidor.";

/** \brief Explanation used when the model call failed or came back empty. */
pub const CALL_FAILED_MESSAGE: &str = "No pude conectar con el modelo de IA en este momento. \
     Inténtalo de nuevo en unos minutos.";

/**
 * \brief Shared, read-only state handed to every tool call.
 */
#[derive(Clone)]
pub struct ToolContext {
    pub config: Arc<ProviderConfig>,
    pub completer: Arc<dyn Completer>,
}

impl ToolContext {
    pub fn new(config: Arc<ProviderConfig>, completer: Arc<dyn Completer>) -> Self {
        Self { config, completer }
    }

    /**
     * \brief Context backed by the real HTTP gateway.
     */
    pub fn from_config(config: ProviderConfig) -> Result<Self, GatewayError> {
        let config = Arc::new(config);
        let gateway = Gateway::new(config.clone())?;
        Ok(Self::new(config, Arc::new(gateway)))
    }
}

/**
 * \brief Terminal state a tool call ended in.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /** \brief Backend unconfigured, no call attempted. */
    Degraded,
    /** \brief Call failed or returned nothing. */
    ErrorFallback,
    /** \brief Model output matched the schema. */
    Typed,
    /** \brief Model output was not JSON; carried verbatim. */
    RawText,
}

impl Outcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Degraded => "degraded",
            Outcome::ErrorFallback => "error_fallback",
            Outcome::Typed => "typed",
            Outcome::RawText => "raw_text",
        }
    }
}

/**
 * \brief One marketing tool: the data that parameterizes `run`.
 *
 * Every tool runs through the same pipeline and only contributes its
 * persona, prompt, response schema and fallback literals.
 */
pub trait Tool {
    /** \brief Stable identifier used in logs. */
    const ID: &'static str;
    const TIMEOUT: Duration = TOOL_TIMEOUT;

    type Request: Send + Sync;
    type Response: ToolSchema + Send;

    /** \brief Explicit response language requested by the caller, if any. */
    fn language(_req: &Self::Request) -> Option<&str> {
        None
    }

    /** \brief System-prompt persona. */
    fn persona(req: &Self::Request) -> String;

    /**
     * \brief User prompt built from the validated request.
     *
     * Tools that forward a caller-supplied conversation override `messages`
     * instead and keep this empty.
     */
    fn prompt(_req: &Self::Request, _lang: &str) -> String {
        String::new()
    }

    fn messages(req: &Self::Request, lang: &str) -> Vec<Message> {
        vec![
            Message::system(Self::persona(req)),
            Message::user(Self::prompt(req, lang)),
        ]
    }

    /** \brief Model override for this tool; empty uses the configured model. */
    fn model_hint() -> &'static str {
        ""
    }

    fn parse(raw: &str) -> Normalized<Self::Response> {
        normalize(raw)
    }

    /** \brief Literal returned when no backend is configured. */
    fn degraded(req: &Self::Request) -> Self::Response;

    /** \brief Literal returned when the call fails. */
    fn error_fallback(req: &Self::Request) -> Self::Response {
        Self::degraded(req)
    }

    /** \brief Post-processing applied in every terminal state. */
    fn finish(_req: &Self::Request, _lang: &str, resp: Self::Response) -> Self::Response {
        resp
    }
}

/**
 * \brief Run a tool request through the fixed pipeline; never fails.
 */
pub async fn run<T: Tool>(ctx: &ToolContext, req: &T::Request) -> T::Response {
    let started = Instant::now();
    let lang = T::language(req)
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .unwrap_or(ctx.config.default_language.as_str())
        .to_string();

    let (resp, outcome) = if !ctx.config.is_configured() {
        (T::degraded(req), Outcome::Degraded)
    } else {
        let messages = T::messages(req, &lang);
        match ctx
            .completer
            .complete(&messages, T::model_hint(), T::TIMEOUT)
            .await
        {
            Ok(raw) if !raw.trim().is_empty() => match T::parse(&raw) {
                Normalized::Structured(r) => (r, Outcome::Typed),
                Normalized::RawText(r) => (r, Outcome::RawText),
            },
            Ok(_) => {
                tracing::warn!(tool = T::ID, "model returned an empty reply");
                (T::error_fallback(req), Outcome::ErrorFallback)
            }
            Err(err) => {
                tracing::warn!(tool = T::ID, error = %err, "model call failed");
                (T::error_fallback(req), Outcome::ErrorFallback)
            }
        }
    };

    let resp = T::finish(req, &lang, resp);
    tracing::info!(
        tool = T::ID,
        outcome = outcome.as_str(),
        backend = %ctx.config.backend,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "tool call finished"
    );
    resp
}

/**
 * \brief Closing instruction shared by every JSON-producing prompt.
 */
pub(crate) fn json_contract(lang: &str, shape: &str) -> String {
    format!(
        "Responde ÚNICAMENTE con un objeto JSON válido, sin texto adicional ni bloques de código, \
         con exactamente esta forma:\n{}\n\nIdioma de respuesta: {}.",
        shape, lang
    )
}

/**
 * \brief "Label: value" line for optional request fields, empty when absent.
 */
pub(crate) fn optional_line(label: &str, value: Option<&str>) -> String {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => format!("{}: {}\n", label, v),
        None => String::new(),
    }
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;
    use crate::normalize::{text, text_list, UNSTRUCTURED_NOTE};
    use serde_json::Value;

    #[derive(Debug, Default, PartialEq)]
    struct Echo {
        answer: String,
        tags: Vec<String>,
        note: String,
    }

    impl ToolSchema for Echo {
        fn from_json(v: &Value) -> Self {
            Self {
                answer: text(v, "answer"),
                tags: text_list(v, "tags"),
                note: String::new(),
            }
        }

        fn raw_text(raw: &str) -> Self {
            Self {
                answer: raw.to_string(),
                note: UNSTRUCTURED_NOTE.to_string(),
                ..Default::default()
            }
        }
    }

    struct EchoTool;

    impl Tool for EchoTool {
        const ID: &'static str = "test/echo";
        type Request = Option<String>;
        type Response = Echo;

        fn language(req: &Self::Request) -> Option<&str> {
            req.as_deref()
        }

        fn persona(_req: &Self::Request) -> String {
            "persona".into()
        }

        fn prompt(_req: &Self::Request, lang: &str) -> String {
            format!("lang={}", lang)
        }

        fn degraded(_req: &Self::Request) -> Echo {
            Echo {
                answer: "degraded".into(),
                ..Default::default()
            }
        }

        fn error_fallback(_req: &Self::Request) -> Echo {
            Echo {
                answer: "failed".into(),
                ..Default::default()
            }
        }
    }

    #[tokio::test]
    async fn unconfigured_backend_short_circuits() {
        let stub = StubCompleter::replying(r#"{"answer":"x"}"#);
        let out = run::<EchoTool>(&unconfigured(stub.clone()), &None).await;
        assert_eq!(out.answer, "degraded");
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn failed_call_uses_error_fallback() {
        let stub = StubCompleter::failing();
        let out = run::<EchoTool>(&configured(stub.clone()), &None).await;
        assert_eq!(out.answer, "failed");
        assert_eq!(stub.calls(), 1);
    }

    #[tokio::test]
    async fn empty_reply_uses_error_fallback() {
        let stub = StubCompleter::replying("   ");
        let out = run::<EchoTool>(&configured(stub), &None).await;
        assert_eq!(out.answer, "failed");
    }

    #[tokio::test]
    async fn json_reply_is_typed() {
        let stub = StubCompleter::replying(r#"{"answer":"ok","tags":["a",1],"extra":true}"#);
        let out = run::<EchoTool>(&configured(stub), &None).await;
        assert_eq!(
            out,
            Echo {
                answer: "ok".into(),
                tags: vec!["a".into(), "1".into()],
                note: String::new()
            }
        );
    }

    #[tokio::test]
    async fn prose_reply_is_carried_verbatim() {
        let stub = StubCompleter::replying("Claro, aquí tienes ideas sueltas.");
        let out = run::<EchoTool>(&configured(stub), &None).await;
        assert_eq!(out.answer, "Claro, aquí tienes ideas sueltas.");
        assert_eq!(out.note, UNSTRUCTURED_NOTE);
    }

    #[tokio::test]
    async fn language_falls_back_to_default() {
        let stub = StubCompleter::replying("{}");
        run::<EchoTool>(&configured(stub.clone()), &Some("  ".into())).await;
        let sent = stub.last_messages.lock().unwrap().clone();
        assert_eq!(sent[0], Message::system("persona"));
        assert_eq!(sent[1], Message::user("lang=es"));

        run::<EchoTool>(&configured(stub.clone()), &Some("en".into())).await;
        let sent = stub.last_messages.lock().unwrap().clone();
        assert_eq!(sent[1], Message::user("lang=en"));
    }

    #[tokio::test]
    async fn configured_default_language_applies() {
        let stub = StubCompleter::replying("{}");
        let config = ProviderConfig::remote(Some("sk-test")).with_default_language("pt");
        let ctx = ToolContext::new(Arc::new(config), stub.clone());
        run::<EchoTool>(&ctx, &None).await;
        let sent = stub.last_messages.lock().unwrap().clone();
        assert_eq!(sent[1], Message::user("lang=pt"));
    }

    #[test]
    fn optional_line_skips_blank_values() {
        assert_eq!(optional_line("Audiencia", Some(" pymes ")), "Audiencia: pymes\n");
        assert_eq!(optional_line("Audiencia", Some("  ")), "");
        assert_eq!(optional_line("Audiencia", None), "");
    }
}
