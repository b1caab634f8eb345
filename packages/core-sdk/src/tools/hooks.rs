use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::normalize::{text, text_list, ToolSchema, UNSTRUCTURED_NOTE};
use crate::scorer::{self, Level, Platform, ScoreResult};
use crate::tools::{json_contract, optional_line, Tool, CALL_FAILED_MESSAGE, NOT_CONFIGURED_MESSAGE};

#[derive(Debug, Clone, Deserialize)]
pub struct ScrollStopRequest {
    pub platform: Platform,
    pub topic: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScrollStopResponse {
    pub text: String,
    pub platform: Platform,
    #[serde(flatten)]
    pub result: ScoreResult,
}

/**
 * \brief `POST /api/content/scroll-stop`: pure heuristic, no model call.
 */
pub fn scroll_stop(req: &ScrollStopRequest) -> ScrollStopResponse {
    let result = scorer::score_hook(&req.topic, req.platform);
    tracing::info!(
        tool = "content/scroll-stop",
        score = result.score,
        level = ?result.level,
        "hook scored"
    );
    ScrollStopResponse {
        text: req.topic.clone(),
        platform: req.platform,
        result,
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct HookOptimizerRequest {
    pub hook: String,
    pub platform: Platform,
    #[serde(default)]
    pub audience: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HookOptimizerResponse {
    pub original_hook: String,
    pub improved_hook: String,
    pub alternatives: Vec<String>,
    pub original_score: u8,
    pub original_level: Level,
    pub improved_score: u8,
    pub improved_level: Level,
    pub explanation: String,
    pub fallback: bool,
    pub note: String,
}

impl ToolSchema for HookOptimizerResponse {
    fn from_json(v: &Value) -> Self {
        Self {
            improved_hook: text(v, "improved_hook"),
            alternatives: text_list(v, "alternatives"),
            explanation: text(v, "explanation"),
            ..Default::default()
        }
    }

    fn raw_text(raw: &str) -> Self {
        Self {
            explanation: raw.to_string(),
            note: UNSTRUCTURED_NOTE.to_string(),
            ..Default::default()
        }
    }
}

/**
 * \brief `POST /api/content/hook-optimizer`: rewrite a hook and score both versions.
 */
pub struct HookOptimizer;

impl Tool for HookOptimizer {
    const ID: &'static str = "content/hook-optimizer";
    type Request = HookOptimizerRequest;
    type Response = HookOptimizerResponse;

    fn language(req: &HookOptimizerRequest) -> Option<&str> {
        req.language.as_deref()
    }

    fn persona(_req: &HookOptimizerRequest) -> String {
        "Eres AI.D, copywriter experto en ganchos para redes sociales. \
         Escribes frases cortas que detienen el scroll: concretas, con cifras, \
         preguntas o tensiones claras, sin clickbait engañoso."
            .to_string()
    }

    fn prompt(req: &HookOptimizerRequest, lang: &str) -> String {
        format!(
            "Mejora este gancho para {}.\nGancho original: {}\n{}\
             Mantén la idea, máximo 14 palabras. Propón además 3 alternativas distintas \
             y explica brevemente qué cambiaste.\n\n{}",
            req.platform,
            req.hook,
            optional_line("Audiencia", req.audience.as_deref()),
            json_contract(
                lang,
                r#"{"improved_hook": "", "alternatives": [""], "explanation": ""}"#
            )
        )
    }

    fn degraded(_req: &HookOptimizerRequest) -> HookOptimizerResponse {
        HookOptimizerResponse {
            explanation: NOT_CONFIGURED_MESSAGE.to_string(),
            fallback: true,
            ..Default::default()
        }
    }

    fn error_fallback(_req: &HookOptimizerRequest) -> HookOptimizerResponse {
        HookOptimizerResponse {
            explanation: CALL_FAILED_MESSAGE.to_string(),
            fallback: true,
            ..Default::default()
        }
    }

    /** \brief Scores both hooks; without a usable rewrite the original stands in. */
    fn finish(
        req: &HookOptimizerRequest,
        _lang: &str,
        resp: HookOptimizerResponse,
    ) -> HookOptimizerResponse {
        let platform = req.platform;
        let improved_hook = if resp.improved_hook.trim().is_empty() {
            req.hook.clone()
        } else {
            resp.improved_hook.trim().to_string()
        };
        let (original_score, _) = scorer::evaluate(&req.hook, platform);
        let (improved_score, _) = scorer::evaluate(&improved_hook, platform);
        HookOptimizerResponse {
            original_hook: req.hook.clone(),
            improved_hook,
            original_score,
            original_level: Level::from_score(original_score),
            improved_score,
            improved_level: Level::from_score(improved_score),
            ..resp
        }
    }
}
