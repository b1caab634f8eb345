use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::llm::CHAT_TIMEOUT;
use crate::models::{Message, Role};
use crate::normalize::{text, text_list, Normalized, ToolSchema, UNSTRUCTURED_NOTE};
use crate::tools::{json_contract, optional_line, Tool, CALL_FAILED_MESSAGE, NOT_CONFIGURED_MESSAGE};

const AID_PERSONA: &str = "Eres AI.D, la IA que se adapta al contexto donde se instala. \
     Responde de forma clara, estratégica y accionable.";

const BASIC_MODE_REPLY: &str = "Hola, soy AI.D en modo básico (sin modelo configurado o con error de conexión). \
     Cuéntame sobre tu contexto y lo que quieres lograr, y te ayudo a ordenar tus \
     próximos 3 pasos con lo que sé hasta ahora.";

const WIDGET_NOT_CONFIGURED: &str = "Ahora mismo AI.D no tiene configurada la clave de OpenAI. \
     Pídele al equipo que revise la variable OPENAI_API_KEY en el servidor.";

const WIDGET_CALL_FAILED: &str = "No pude conectar con el modelo de IA en este momento. \
     Si necesitas ayuda urgente, te recomiendo contactar directamente con MKT 360.";

/**
 * \brief Assistant personality for `/chat`.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatMode {
    /** \brief Advertising advisor inside Ad.AI. */
    #[default]
    Adai,
    /** \brief Generic assistant embedded in a third-party app. */
    External,
}

impl ChatMode {
    fn context(self) -> &'static str {
        match self {
            ChatMode::Adai => {
                "Eres AI.D como asesor de publicidad dentro de Ad.AI. \
                 Ayudas a PYMEs y emprendedores a mejorar sus campañas, \
                 definir presupuestos, audiencias, creatividades y embudos."
            }
            ChatMode::External => {
                "Eres AI.D en modo externo, asistente genérico instalable en cualquier app. \
                 Te adaptas al tema de la aplicación y das respuestas claras y accionables."
            }
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub mode: ChatMode,
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChatResponse {
    pub reply: String,
    pub mode: ChatMode,
    pub used_language: String,
    pub fallback: bool,
}

impl ToolSchema for ChatResponse {
    fn from_json(v: &Value) -> Self {
        Self {
            reply: text(v, "reply"),
            ..Default::default()
        }
    }

    fn raw_text(raw: &str) -> Self {
        Self {
            reply: raw.to_string(),
            ..Default::default()
        }
    }
}

/**
 * \brief `POST /chat`: two-mode assistant answering in plain text.
 */
pub struct Chat;

impl Tool for Chat {
    const ID: &'static str = "chat";
    const TIMEOUT: Duration = CHAT_TIMEOUT;
    type Request = ChatRequest;
    type Response = ChatResponse;

    fn language(req: &ChatRequest) -> Option<&str> {
        req.language.as_deref()
    }

    fn persona(_req: &ChatRequest) -> String {
        AID_PERSONA.to_string()
    }

    fn prompt(req: &ChatRequest, lang: &str) -> String {
        format!(
            "{}\n\nIdioma de respuesta: {}\n\nMensaje del usuario:\n{}",
            req.mode.context(),
            lang,
            req.message
        )
    }

    fn parse(raw: &str) -> Normalized<ChatResponse> {
        Normalized::Structured(ChatResponse::raw_text(raw))
    }

    fn degraded(_req: &ChatRequest) -> ChatResponse {
        ChatResponse {
            reply: BASIC_MODE_REPLY.to_string(),
            fallback: true,
            ..Default::default()
        }
    }

    fn finish(req: &ChatRequest, lang: &str, resp: ChatResponse) -> ChatResponse {
        ChatResponse {
            mode: req.mode,
            used_language: lang.to_string(),
            ..resp
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct WidgetChatRequest {
    pub system_prompt: String,
    pub messages: Vec<Message>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WidgetChatResponse {
    pub reply: String,
}

impl ToolSchema for WidgetChatResponse {
    fn from_json(v: &Value) -> Self {
        Self {
            reply: text(v, "reply"),
        }
    }

    fn raw_text(raw: &str) -> Self {
        Self {
            reply: raw.to_string(),
        }
    }
}

/**
 * \brief `POST /api/aid-chat`: the embeddable widget; caller owns persona and history.
 */
pub struct WidgetChat;

impl Tool for WidgetChat {
    const ID: &'static str = "aid-chat";
    const TIMEOUT: Duration = CHAT_TIMEOUT;
    type Request = WidgetChatRequest;
    type Response = WidgetChatResponse;

    fn persona(req: &WidgetChatRequest) -> String {
        req.system_prompt.clone()
    }

    fn messages(req: &WidgetChatRequest, _lang: &str) -> Vec<Message> {
        let mut out = Vec::with_capacity(req.messages.len() + 1);
        out.push(Message::system(Self::persona(req)));
        out.extend(req.messages.iter().cloned());
        out
    }

    fn parse(raw: &str) -> Normalized<WidgetChatResponse> {
        Normalized::Structured(WidgetChatResponse::raw_text(raw.trim()))
    }

    fn degraded(_req: &WidgetChatRequest) -> WidgetChatResponse {
        WidgetChatResponse {
            reply: WIDGET_NOT_CONFIGURED.to_string(),
        }
    }

    fn error_fallback(_req: &WidgetChatRequest) -> WidgetChatResponse {
        WidgetChatResponse {
            reply: WIDGET_CALL_FAILED.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BrainChatRequest {
    pub message: String,
    #[serde(default)]
    pub history: Vec<Message>,
    #[serde(default)]
    pub context: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BrainChatResponse {
    pub reply: String,
    pub suggestions: Vec<String>,
    pub fallback: bool,
    pub note: String,
}

impl ToolSchema for BrainChatResponse {
    fn from_json(v: &Value) -> Self {
        Self {
            reply: text(v, "reply"),
            suggestions: text_list(v, "suggestions"),
            ..Default::default()
        }
    }

    fn raw_text(raw: &str) -> Self {
        Self {
            reply: raw.to_string(),
            note: UNSTRUCTURED_NOTE.to_string(),
            ..Default::default()
        }
    }
}

/**
 * \brief `POST /api/chat/aid`: the general marketing brain with follow-up suggestions.
 */
pub struct BrainChat;

impl Tool for BrainChat {
    const ID: &'static str = "chat/aid";
    const TIMEOUT: Duration = CHAT_TIMEOUT;
    type Request = BrainChatRequest;
    type Response = BrainChatResponse;

    fn language(req: &BrainChatRequest) -> Option<&str> {
        req.language.as_deref()
    }

    fn persona(_req: &BrainChatRequest) -> String {
        "Eres AI.D, el cerebro de marketing de MKT 360. Combinas estrategia de contenidos, \
         publicidad digital y SEO para PYMEs. Respondes con criterio, ejemplos concretos \
         y próximos pasos accionables."
            .to_string()
    }

    fn prompt(req: &BrainChatRequest, lang: &str) -> String {
        format!(
            "{}Mensaje del usuario:\n{}\n\n{}",
            optional_line("Contexto del negocio", req.context.as_deref()),
            req.message,
            json_contract(
                lang,
                r#"{"reply": "respuesta completa", "suggestions": ["siguiente pregunta o acción sugerida"]}"#
            )
        )
    }

    fn messages(req: &BrainChatRequest, lang: &str) -> Vec<Message> {
        let mut out = Vec::with_capacity(req.history.len() + 2);
        out.push(Message::system(Self::persona(req)));
        out.extend(
            req.history
                .iter()
                .filter(|m| m.role != Role::System)
                .cloned(),
        );
        out.push(Message::user(Self::prompt(req, lang)));
        out
    }

    fn degraded(_req: &BrainChatRequest) -> BrainChatResponse {
        BrainChatResponse {
            reply: NOT_CONFIGURED_MESSAGE.to_string(),
            fallback: true,
            ..Default::default()
        }
    }

    fn error_fallback(_req: &BrainChatRequest) -> BrainChatResponse {
        BrainChatResponse {
            reply: CALL_FAILED_MESSAGE.to_string(),
            fallback: true,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::run;
    use crate::tools::testing::*;

    fn chat_request(mode: ChatMode, language: Option<&str>) -> ChatRequest {
        ChatRequest {
            message: "¿Cómo reparto 500 USD en Meta?".into(),
            mode,
            language: language.map(String::from),
        }
    }

    #[tokio::test]
    async fn chat_reply_is_plain_text() {
        let stub = StubCompleter::replying("{\"not\": \"parsed\"}");
        let out = run::<Chat>(&configured(stub), &chat_request(ChatMode::External, Some("en"))).await;
        assert_eq!(out.reply, "{\"not\": \"parsed\"}");
        assert_eq!(out.mode, ChatMode::External);
        assert_eq!(out.used_language, "en");
        assert!(!out.fallback);
    }

    #[tokio::test]
    async fn chat_prompt_embeds_mode_context_and_language() {
        let stub = StubCompleter::replying("ok");
        run::<Chat>(&configured(stub.clone()), &chat_request(ChatMode::Adai, None)).await;
        let sent = stub.last_messages.lock().unwrap().clone();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].content, AID_PERSONA);
        assert!(sent[1].content.contains("asesor de publicidad"));
        assert!(sent[1].content.contains("Idioma de respuesta: es"));
        assert!(sent[1].content.ends_with("¿Cómo reparto 500 USD en Meta?"));
    }

    #[tokio::test]
    async fn chat_degraded_and_failed_share_basic_reply() {
        let degraded = run::<Chat>(&unconfigured(StubCompleter::failing()), &chat_request(ChatMode::Adai, None)).await;
        let failed = run::<Chat>(&configured(StubCompleter::failing()), &chat_request(ChatMode::Adai, None)).await;
        for out in [degraded, failed] {
            assert!(out.fallback);
            assert_eq!(out.reply, BASIC_MODE_REPLY);
            assert_eq!(out.used_language, "es");
        }
    }

    #[test]
    fn chat_mode_defaults_to_adai() {
        let req: ChatRequest = serde_json::from_str(r#"{"message":"hola"}"#).unwrap();
        assert_eq!(req.mode, ChatMode::Adai);
        assert!(serde_json::from_str::<ChatRequest>(r#"{"message":"hola","mode":"otro"}"#).is_err());
    }

    fn widget_request() -> WidgetChatRequest {
        WidgetChatRequest {
            system_prompt: "Eres el asistente de una panadería.".into(),
            messages: vec![
                Message::user("hola"),
                Message::assistant("¡Hola! ¿En qué te ayudo?"),
                Message::user("¿abren el domingo?"),
            ],
        }
    }

    #[tokio::test]
    async fn widget_forwards_history_in_order() {
        let stub = StubCompleter::replying("  Sí, de 9 a 14.  ");
        let out = run::<WidgetChat>(&configured(stub.clone()), &widget_request()).await;
        assert_eq!(out.reply, "Sí, de 9 a 14.");
        let sent = stub.last_messages.lock().unwrap().clone();
        assert_eq!(sent.len(), 4);
        assert_eq!(sent[0], Message::system("Eres el asistente de una panadería."));
        assert_eq!(sent[3], Message::user("¿abren el domingo?"));
    }

    #[tokio::test]
    async fn widget_distinguishes_missing_key_from_failure() {
        let degraded = run::<WidgetChat>(&unconfigured(StubCompleter::failing()), &widget_request()).await;
        let failed = run::<WidgetChat>(&configured(StubCompleter::failing()), &widget_request()).await;
        assert_eq!(degraded.reply, WIDGET_NOT_CONFIGURED);
        assert_eq!(failed.reply, WIDGET_CALL_FAILED);
    }

    #[tokio::test]
    async fn brain_chat_structured_and_raw() {
        let req = BrainChatRequest {
            message: "Ideas para Black Friday".into(),
            history: vec![Message::system("ignorado"), Message::user("hola")],
            context: Some("Tienda de ropa".into()),
            language: None,
        };
        let stub = StubCompleter::replying(r#"{"reply":"Tres ideas...","suggestions":["¿Presupuesto?"]}"#);
        let out = run::<BrainChat>(&configured(stub.clone()), &req).await;
        assert_eq!(out.reply, "Tres ideas...");
        assert_eq!(out.suggestions, vec!["¿Presupuesto?"]);
        assert!(out.note.is_empty());
        let sent = stub.last_messages.lock().unwrap().clone();
        assert_eq!(sent.len(), 3);
        assert!(sent[2].content.contains("Contexto del negocio: Tienda de ropa"));

        let raw = run::<BrainChat>(&configured(StubCompleter::replying("Texto libre")), &req).await;
        assert_eq!(raw.reply, "Texto libre");
        assert!(raw.suggestions.is_empty());
        assert_eq!(raw.note, UNSTRUCTURED_NOTE);
    }
}
