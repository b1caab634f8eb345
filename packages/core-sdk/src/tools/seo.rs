use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::normalize::{integer, records, text, text_list, ToolSchema, UNSTRUCTURED_NOTE};
use crate::tools::{json_contract, optional_line, Tool, CALL_FAILED_MESSAGE, NOT_CONFIGURED_MESSAGE};

/** \brief Page text beyond this many characters is not sent to the model. */
const MAX_CONTENT_CHARS: usize = 6000;

#[derive(Debug, Clone, Deserialize)]
pub struct SeoAuditRequest {
    pub url: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct KeywordInsight {
    pub keyword: String,
    pub usage: String,
    pub recommendation: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SeoAuditResponse {
    pub seo_score: i64,
    pub title_suggestions: Vec<String>,
    pub meta_description: String,
    pub keyword_insights: Vec<KeywordInsight>,
    pub technical_issues: Vec<String>,
    pub content_gaps: Vec<String>,
    pub summary: String,
    pub fallback: bool,
    pub note: String,
}

impl ToolSchema for SeoAuditResponse {
    fn from_json(v: &Value) -> Self {
        Self {
            seo_score: integer(v, "seo_score").clamp(0, 100),
            title_suggestions: text_list(v, "title_suggestions"),
            meta_description: text(v, "meta_description"),
            keyword_insights: records(v, "keyword_insights", |k| KeywordInsight {
                keyword: text(k, "keyword"),
                usage: text(k, "usage"),
                recommendation: text(k, "recommendation"),
            }),
            technical_issues: text_list(v, "technical_issues"),
            content_gaps: text_list(v, "content_gaps"),
            summary: text(v, "summary"),
            ..Default::default()
        }
    }

    fn raw_text(raw: &str) -> Self {
        Self {
            summary: raw.to_string(),
            note: UNSTRUCTURED_NOTE.to_string(),
            ..Default::default()
        }
    }
}

/**
 * \brief `POST /api/seo/audit`: on-page SEO review from URL, keywords and optional page text.
 *
 * The page is never fetched; the model works from what the caller sends.
 */
pub struct SeoAudit;

impl Tool for SeoAudit {
    const ID: &'static str = "seo/audit";
    type Request = SeoAuditRequest;
    type Response = SeoAuditResponse;

    fn language(req: &SeoAuditRequest) -> Option<&str> {
        req.language.as_deref()
    }

    fn persona(_req: &SeoAuditRequest) -> String {
        "Eres AI.D, consultor SEO técnico y de contenidos. Priorizas los cambios \
         de mayor impacto y explicas cada recomendación en una frase."
            .to_string()
    }

    fn prompt(req: &SeoAuditRequest, lang: &str) -> String {
        let keywords = if req.keywords.is_empty() {
            "deduce las más probables a partir de la URL".to_string()
        } else {
            req.keywords.join(", ")
        };
        let content: Option<String> = req
            .content
            .as_deref()
            .map(|c| c.chars().take(MAX_CONTENT_CHARS).collect());
        format!(
            "Audita el SEO de esta página.\nURL: {}\nPalabras clave objetivo: {}\n{}\n\
             Puntúa de 0 a 100.\n\n{}",
            req.url,
            keywords,
            optional_line("Contenido de la página", content.as_deref()),
            json_contract(
                lang,
                r#"{"seo_score": 0, "title_suggestions": [""], "meta_description": "", "keyword_insights": [{"keyword": "", "usage": "", "recommendation": ""}], "technical_issues": [""], "content_gaps": [""], "summary": ""}"#
            )
        )
    }

    fn degraded(_req: &SeoAuditRequest) -> SeoAuditResponse {
        SeoAuditResponse {
            summary: NOT_CONFIGURED_MESSAGE.to_string(),
            fallback: true,
            ..Default::default()
        }
    }

    fn error_fallback(_req: &SeoAuditRequest) -> SeoAuditResponse {
        SeoAuditResponse {
            summary: CALL_FAILED_MESSAGE.to_string(),
            fallback: true,
            ..Default::default()
        }
    }
}
