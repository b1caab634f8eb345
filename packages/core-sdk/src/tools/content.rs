use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::llm::GENERATION_TIMEOUT;
use crate::normalize::{integer, records, text, text_list, ToolSchema, UNSTRUCTURED_NOTE};
use crate::scorer::Platform;
use crate::tools::{json_contract, optional_line, Tool, CALL_FAILED_MESSAGE, NOT_CONFIGURED_MESSAGE};

const CONTENT_PERSONA: &str = "Eres AI.D, estratega de contenidos para redes sociales. \
     Conoces los formatos, ritmos y algoritmos de Instagram, TikTok, LinkedIn, YouTube y Threads, \
     y escribes para PYMEs con un tono cercano y profesional.";

pub const FUNNEL_STAGES: [&str; 4] = ["awareness", "consideration", "conversion", "retention"];

const MIN_SLIDES: i64 = 3;
const MAX_SLIDES: i64 = 12;

#[derive(Debug, Clone, Deserialize)]
pub struct ContentAnalyzerRequest {
    pub content: String,
    pub platform: Platform,
    #[serde(default)]
    pub goal: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ContentAnalyzerResponse {
    pub overall_score: i64,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub suggestions: Vec<String>,
    pub improved_version: String,
    pub summary: String,
    pub fallback: bool,
    pub note: String,
}

impl ToolSchema for ContentAnalyzerResponse {
    fn from_json(v: &Value) -> Self {
        Self {
            overall_score: integer(v, "overall_score").clamp(0, 100),
            strengths: text_list(v, "strengths"),
            weaknesses: text_list(v, "weaknesses"),
            suggestions: text_list(v, "suggestions"),
            improved_version: text(v, "improved_version"),
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
 * \brief `POST /api/content/analyzer`: critique of an existing post.
 */
pub struct ContentAnalyzer;

impl Tool for ContentAnalyzer {
    const ID: &'static str = "content/analyzer";
    type Request = ContentAnalyzerRequest;
    type Response = ContentAnalyzerResponse;

    fn language(req: &ContentAnalyzerRequest) -> Option<&str> {
        req.language.as_deref()
    }

    fn persona(_req: &ContentAnalyzerRequest) -> String {
        CONTENT_PERSONA.to_string()
    }

    fn prompt(req: &ContentAnalyzerRequest, lang: &str) -> String {
        format!(
            "Analiza este contenido para {}.\n{}Contenido:\n{}\n\n\
             Puntúa de 0 a 100 su capacidad de captar atención y cumplir el objetivo.\n\n{}",
            req.platform,
            optional_line("Objetivo", req.goal.as_deref()),
            req.content,
            json_contract(
                lang,
                r#"{"overall_score": 0, "strengths": [""], "weaknesses": [""], "suggestions": [""], "improved_version": "", "summary": ""}"#
            )
        )
    }

    fn degraded(_req: &ContentAnalyzerRequest) -> ContentAnalyzerResponse {
        ContentAnalyzerResponse {
            summary: NOT_CONFIGURED_MESSAGE.to_string(),
            fallback: true,
            ..Default::default()
        }
    }

    fn error_fallback(_req: &ContentAnalyzerRequest) -> ContentAnalyzerResponse {
        ContentAnalyzerResponse {
            summary: CALL_FAILED_MESSAGE.to_string(),
            fallback: true,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Professional,
    Casual,
    Inspirational,
    Humorous,
    Educational,
}

impl Tone {
    fn describe(self) -> &'static str {
        match self {
            Tone::Professional => "profesional",
            Tone::Casual => "cercano e informal",
            Tone::Inspirational => "inspirador",
            Tone::Humorous => "con humor",
            Tone::Educational => "didáctico",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContentGeneratorRequest {
    pub topic: String,
    pub platform: Platform,
    #[serde(default)]
    pub tone: Tone,
    #[serde(default)]
    pub audience: Option<String>,
    #[serde(default)]
    pub cta: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ContentGeneratorResponse {
    pub title: String,
    pub body: String,
    pub hashtags: Vec<String>,
    pub cta: String,
    pub variations: Vec<String>,
    pub fallback: bool,
    pub note: String,
}

impl ToolSchema for ContentGeneratorResponse {
    fn from_json(v: &Value) -> Self {
        Self {
            title: text(v, "title"),
            body: text(v, "body"),
            hashtags: text_list(v, "hashtags"),
            cta: text(v, "cta"),
            variations: text_list(v, "variations"),
            ..Default::default()
        }
    }

    fn raw_text(raw: &str) -> Self {
        Self {
            body: raw.to_string(),
            note: UNSTRUCTURED_NOTE.to_string(),
            ..Default::default()
        }
    }
}

/**
 * \brief `POST /api/content/generator`: a ready-to-publish post plus variations.
 */
pub struct ContentGenerator;

impl Tool for ContentGenerator {
    const ID: &'static str = "content/generator";
    const TIMEOUT: Duration = GENERATION_TIMEOUT;
    type Request = ContentGeneratorRequest;
    type Response = ContentGeneratorResponse;

    fn language(req: &ContentGeneratorRequest) -> Option<&str> {
        req.language.as_deref()
    }

    fn persona(_req: &ContentGeneratorRequest) -> String {
        CONTENT_PERSONA.to_string()
    }

    fn prompt(req: &ContentGeneratorRequest, lang: &str) -> String {
        format!(
            "Escribe una publicación para {} sobre: {}\nTono: {}\n{}{}\
             Incluye 2 variaciones alternativas del texto y hashtags relevantes sin repetir.\n\n{}",
            req.platform,
            req.topic,
            req.tone.describe(),
            optional_line("Audiencia", req.audience.as_deref()),
            optional_line("Llamada a la acción deseada", req.cta.as_deref()),
            json_contract(
                lang,
                r##"{"title": "", "body": "", "hashtags": ["#"], "cta": "", "variations": [""]}"##
            )
        )
    }

    fn degraded(_req: &ContentGeneratorRequest) -> ContentGeneratorResponse {
        ContentGeneratorResponse {
            body: NOT_CONFIGURED_MESSAGE.to_string(),
            fallback: true,
            ..Default::default()
        }
    }

    fn error_fallback(_req: &ContentGeneratorRequest) -> ContentGeneratorResponse {
        ContentGeneratorResponse {
            body: CALL_FAILED_MESSAGE.to_string(),
            fallback: true,
            ..Default::default()
        }
    }
}

fn default_slide_count() -> i64 {
    6
}

#[derive(Debug, Clone, Deserialize)]
pub struct SlideGeneratorRequest {
    pub topic: String,
    #[serde(default = "default_slide_count")]
    pub slide_count: i64,
    pub platform: Platform,
    #[serde(default)]
    pub audience: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
}

impl SlideGeneratorRequest {
    /** \brief Requested count clamped into the supported range; out-of-range values are not an error. */
    pub fn effective_slide_count(&self) -> u8 {
        self.slide_count.clamp(MIN_SLIDES, MAX_SLIDES) as u8
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Slide {
    pub number: i64,
    pub headline: String,
    pub body: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SlideGeneratorResponse {
    pub title: String,
    pub slides: Vec<Slide>,
    pub caption: String,
    pub hashtags: Vec<String>,
    pub fallback: bool,
    pub note: String,
}

impl ToolSchema for SlideGeneratorResponse {
    fn from_json(v: &Value) -> Self {
        Self {
            title: text(v, "title"),
            slides: records(v, "slides", |s| Slide {
                number: integer(s, "number"),
                headline: text(s, "headline"),
                body: text(s, "body"),
            }),
            caption: text(v, "caption"),
            hashtags: text_list(v, "hashtags"),
            ..Default::default()
        }
    }

    fn raw_text(raw: &str) -> Self {
        Self {
            caption: raw.to_string(),
            note: UNSTRUCTURED_NOTE.to_string(),
            ..Default::default()
        }
    }
}

/**
 * \brief `POST /api/content/slide-generator`: carousel outline.
 */
pub struct SlideGenerator;

impl Tool for SlideGenerator {
    const ID: &'static str = "content/slide-generator";
    const TIMEOUT: Duration = GENERATION_TIMEOUT;
    type Request = SlideGeneratorRequest;
    type Response = SlideGeneratorResponse;

    fn language(req: &SlideGeneratorRequest) -> Option<&str> {
        req.language.as_deref()
    }

    fn persona(_req: &SlideGeneratorRequest) -> String {
        CONTENT_PERSONA.to_string()
    }

    fn prompt(req: &SlideGeneratorRequest, lang: &str) -> String {
        format!(
            "Diseña un carrusel de {} diapositivas para {} sobre: {}\n{}\
             La primera diapositiva es el gancho y la última una llamada a la acción. \
             Numera las diapositivas desde 1.\n\n{}",
            req.effective_slide_count(),
            req.platform,
            req.topic,
            optional_line("Audiencia", req.audience.as_deref()),
            json_contract(
                lang,
                r##"{"title": "", "slides": [{"number": 1, "headline": "", "body": ""}], "caption": "", "hashtags": ["#"]}"##
            )
        )
    }

    fn degraded(_req: &SlideGeneratorRequest) -> SlideGeneratorResponse {
        SlideGeneratorResponse {
            caption: NOT_CONFIGURED_MESSAGE.to_string(),
            fallback: true,
            ..Default::default()
        }
    }

    fn error_fallback(_req: &SlideGeneratorRequest) -> SlideGeneratorResponse {
        SlideGeneratorResponse {
            caption: CALL_FAILED_MESSAGE.to_string(),
            fallback: true,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FunnelMapRequest {
    pub business: String,
    pub product: String,
    #[serde(default)]
    pub audience: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FunnelStage {
    pub stage: String,
    pub goal: String,
    pub content_ideas: Vec<String>,
    pub channels: Vec<String>,
    pub kpis: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FunnelMapResponse {
    pub stages: Vec<FunnelStage>,
    pub summary: String,
    pub fallback: bool,
    pub note: String,
}

impl FunnelMapResponse {
    /** \brief Stage names with nothing filled in, so the UI can still draw the funnel. */
    fn skeleton(summary: &str) -> Self {
        Self {
            stages: FUNNEL_STAGES
                .iter()
                .map(|s| FunnelStage {
                    stage: s.to_string(),
                    ..Default::default()
                })
                .collect(),
            summary: summary.to_string(),
            fallback: true,
            note: String::new(),
        }
    }
}

impl ToolSchema for FunnelMapResponse {
    fn from_json(v: &Value) -> Self {
        Self {
            stages: records(v, "stages", |s| FunnelStage {
                stage: text(s, "stage"),
                goal: text(s, "goal"),
                content_ideas: text_list(s, "content_ideas"),
                channels: text_list(s, "channels"),
                kpis: text_list(s, "kpis"),
            }),
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
 * \brief `POST /api/content/funnel-map`: content plan per funnel stage.
 */
pub struct FunnelMap;

impl Tool for FunnelMap {
    const ID: &'static str = "content/funnel-map";
    const TIMEOUT: Duration = GENERATION_TIMEOUT;
    type Request = FunnelMapRequest;
    type Response = FunnelMapResponse;

    fn language(req: &FunnelMapRequest) -> Option<&str> {
        req.language.as_deref()
    }

    fn persona(_req: &FunnelMapRequest) -> String {
        CONTENT_PERSONA.to_string()
    }

    fn prompt(req: &FunnelMapRequest, lang: &str) -> String {
        format!(
            "Crea un mapa de embudo de contenidos.\nNegocio: {}\nProducto/servicio: {}\n{}\
             Usa exactamente estas etapas, en este orden: {}.\n\n{}",
            req.business,
            req.product,
            optional_line("Audiencia", req.audience.as_deref()),
            FUNNEL_STAGES.join(", "),
            json_contract(
                lang,
                r#"{"stages": [{"stage": "awareness", "goal": "", "content_ideas": [""], "channels": [""], "kpis": [""]}], "summary": ""}"#
            )
        )
    }

    fn degraded(_req: &FunnelMapRequest) -> FunnelMapResponse {
        FunnelMapResponse::skeleton(NOT_CONFIGURED_MESSAGE)
    }

    fn error_fallback(_req: &FunnelMapRequest) -> FunnelMapResponse {
        FunnelMapResponse::skeleton(CALL_FAILED_MESSAGE)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoStyle {
    #[default]
    Educational,
    Storytelling,
    Promotional,
    Entertainment,
}

impl VideoStyle {
    fn describe(self) -> &'static str {
        match self {
            VideoStyle::Educational => "educativo",
            VideoStyle::Storytelling => "storytelling",
            VideoStyle::Promotional => "promocional",
            VideoStyle::Entertainment => "entretenimiento",
        }
    }
}

fn default_duration() -> u32 {
    30
}

#[derive(Debug, Clone, Deserialize)]
pub struct VideoScriptRequest {
    pub topic: String,
    pub platform: Platform,
    #[serde(default = "default_duration")]
    pub duration_seconds: u32,
    #[serde(default)]
    pub style: VideoStyle,
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Scene {
    pub timestamp: String,
    pub visual: String,
    pub voiceover: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VideoScriptResponse {
    pub hook: String,
    pub scenes: Vec<Scene>,
    pub cta: String,
    pub caption: String,
    pub hashtags: Vec<String>,
    pub fallback: bool,
    pub note: String,
}

impl ToolSchema for VideoScriptResponse {
    fn from_json(v: &Value) -> Self {
        Self {
            hook: text(v, "hook"),
            scenes: records(v, "scenes", |s| Scene {
                timestamp: text(s, "timestamp"),
                visual: text(s, "visual"),
                voiceover: text(s, "voiceover"),
            }),
            cta: text(v, "cta"),
            caption: text(v, "caption"),
            hashtags: text_list(v, "hashtags"),
            ..Default::default()
        }
    }

    fn raw_text(raw: &str) -> Self {
        Self {
            caption: raw.to_string(),
            note: UNSTRUCTURED_NOTE.to_string(),
            ..Default::default()
        }
    }
}

/**
 * \brief `POST /api/content/video-script`: short-form video script by scene.
 */
pub struct VideoScript;

impl Tool for VideoScript {
    const ID: &'static str = "content/video-script";
    const TIMEOUT: Duration = GENERATION_TIMEOUT;
    type Request = VideoScriptRequest;
    type Response = VideoScriptResponse;

    fn language(req: &VideoScriptRequest) -> Option<&str> {
        req.language.as_deref()
    }

    fn persona(_req: &VideoScriptRequest) -> String {
        CONTENT_PERSONA.to_string()
    }

    fn prompt(req: &VideoScriptRequest, lang: &str) -> String {
        format!(
            "Escribe el guion de un vídeo de {} segundos para {} sobre: {}\nEstilo: {}\n\
             El gancho ocupa los primeros 3 segundos. Marca cada escena con su rango de tiempo \
             (por ejemplo \"0-3s\").\n\n{}",
            req.duration_seconds,
            req.platform,
            req.topic,
            req.style.describe(),
            json_contract(
                lang,
                r##"{"hook": "", "scenes": [{"timestamp": "0-3s", "visual": "", "voiceover": ""}], "cta": "", "caption": "", "hashtags": ["#"]}"##
            )
        )
    }

    fn degraded(_req: &VideoScriptRequest) -> VideoScriptResponse {
        VideoScriptResponse {
            caption: NOT_CONFIGURED_MESSAGE.to_string(),
            fallback: true,
            ..Default::default()
        }
    }

    fn error_fallback(_req: &VideoScriptRequest) -> VideoScriptResponse {
        VideoScriptResponse {
            caption: CALL_FAILED_MESSAGE.to_string(),
            fallback: true,
            ..Default::default()
        }
    }
}
