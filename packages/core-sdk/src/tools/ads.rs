use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::normalize::{number, records, text, text_list, ToolSchema, UNSTRUCTURED_NOTE};
use crate::scorer::Platform;
use crate::tools::{json_contract, optional_line, Tool, CALL_FAILED_MESSAGE, NOT_CONFIGURED_MESSAGE};

const ADS_PERSONA: &str = "Eres AI.D, estratega senior de publicidad digital (Meta, Google, TikTok, LinkedIn) \
     para PYMEs y emprendedores. Das recomendaciones cuantificadas, realistas y accionables.";

/**
 * \brief Campaign objective.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Objective {
    #[serde(alias = "alcance", alias = "reconocimiento")]
    Awareness,
    #[serde(alias = "trafico", alias = "tráfico")]
    Traffic,
    #[serde(alias = "clientes_potenciales")]
    Leads,
    #[serde(alias = "ventas", alias = "conversions")]
    Sales,
    #[serde(alias = "interaccion", alias = "interacción")]
    Engagement,
}

impl Objective {
    pub fn as_str(self) -> &'static str {
        match self {
            Objective::Awareness => "awareness",
            Objective::Traffic => "traffic",
            Objective::Leads => "leads",
            Objective::Sales => "sales",
            Objective::Engagement => "engagement",
        }
    }
}

fn default_currency() -> String {
    "USD".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdsOptimizerRequest {
    pub business: String,
    pub product: String,
    pub objective: Objective,
    /** \brief Ad networks to spread the budget over (Meta, Google, TikTok Ads...); free text. */
    #[serde(default)]
    pub platforms: Vec<String>,
    pub monthly_budget: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub audience: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BudgetShare {
    pub platform: String,
    pub percentage: f64,
    pub amount: f64,
    pub rationale: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AdsOptimizerResponse {
    pub summary: String,
    pub budget_distribution: Vec<BudgetShare>,
    pub audiences: Vec<String>,
    pub creatives: Vec<String>,
    pub kpis: Vec<String>,
    pub next_steps: Vec<String>,
    pub fallback: bool,
    pub note: String,
}

impl ToolSchema for AdsOptimizerResponse {
    fn from_json(v: &Value) -> Self {
        Self {
            summary: text(v, "summary"),
            budget_distribution: records(v, "budget_distribution", |r| BudgetShare {
                platform: text(r, "platform"),
                percentage: number(r, "percentage"),
                amount: number(r, "amount"),
                rationale: text(r, "rationale"),
            }),
            audiences: text_list(v, "audiences"),
            creatives: text_list(v, "creatives"),
            kpis: text_list(v, "kpis"),
            next_steps: text_list(v, "next_steps"),
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
 * \brief `POST /api/ads/optimizer`: monthly budget split and campaign plan.
 */
pub struct AdsOptimizer;

impl Tool for AdsOptimizer {
    const ID: &'static str = "ads/optimizer";
    type Request = AdsOptimizerRequest;
    type Response = AdsOptimizerResponse;

    fn language(req: &AdsOptimizerRequest) -> Option<&str> {
        req.language.as_deref()
    }

    fn persona(_req: &AdsOptimizerRequest) -> String {
        ADS_PERSONA.to_string()
    }

    fn prompt(req: &AdsOptimizerRequest, lang: &str) -> String {
        let platforms = if req.platforms.is_empty() {
            "elige tú las más adecuadas".to_string()
        } else {
            req.platforms.join(", ")
        };
        format!(
            "Optimiza la inversión publicitaria mensual de este negocio.\n\
             Negocio: {}\nProducto/servicio: {}\nObjetivo: {}\nPlataformas: {}\n\
             Presupuesto mensual: {:.2} {}\n{}\n\
             Reparte el presupuesto completo entre plataformas (los porcentajes suman 100).\n\n{}",
            req.business,
            req.product,
            req.objective.as_str(),
            platforms,
            req.monthly_budget,
            req.currency,
            optional_line("Audiencia", req.audience.as_deref()),
            json_contract(
                lang,
                r#"{"summary": "", "budget_distribution": [{"platform": "", "percentage": 0, "amount": 0, "rationale": ""}], "audiences": [""], "creatives": [""], "kpis": [""], "next_steps": [""]}"#
            )
        )
    }

    fn degraded(_req: &AdsOptimizerRequest) -> AdsOptimizerResponse {
        AdsOptimizerResponse {
            summary: NOT_CONFIGURED_MESSAGE.to_string(),
            fallback: true,
            ..Default::default()
        }
    }

    fn error_fallback(_req: &AdsOptimizerRequest) -> AdsOptimizerResponse {
        AdsOptimizerResponse {
            summary: CALL_FAILED_MESSAGE.to_string(),
            fallback: true,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdsPredictorRequest {
    pub ad_copy: String,
    pub platform: Platform,
    pub objective: Objective,
    #[serde(default)]
    pub budget: Option<f64>,
    #[serde(default)]
    pub audience: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AdsPredictorResponse {
    /** \brief Percent, e.g. 1.8 for 1.8 %. */
    pub predicted_ctr: f64,
    pub predicted_cpc: f64,
    /** \brief Percent. */
    pub predicted_conversion_rate: f64,
    /** \brief 0-100. */
    pub confidence: f64,
    pub risks: Vec<String>,
    pub recommendations: Vec<String>,
    pub summary: String,
    pub fallback: bool,
    pub note: String,
}

impl ToolSchema for AdsPredictorResponse {
    fn from_json(v: &Value) -> Self {
        Self {
            predicted_ctr: number(v, "predicted_ctr"),
            predicted_cpc: number(v, "predicted_cpc"),
            predicted_conversion_rate: number(v, "predicted_conversion_rate"),
            confidence: number(v, "confidence").clamp(0.0, 100.0),
            risks: text_list(v, "risks"),
            recommendations: text_list(v, "recommendations"),
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
 * \brief `POST /api/ads/predictor`: expected performance of an ad before launch.
 */
pub struct AdsPredictor;

impl Tool for AdsPredictor {
    const ID: &'static str = "ads/predictor";
    type Request = AdsPredictorRequest;
    type Response = AdsPredictorResponse;

    fn language(req: &AdsPredictorRequest) -> Option<&str> {
        req.language.as_deref()
    }

    fn persona(_req: &AdsPredictorRequest) -> String {
        ADS_PERSONA.to_string()
    }

    fn prompt(req: &AdsPredictorRequest, lang: &str) -> String {
        let budget = req.budget.map(|b| format!("{:.2}", b));
        format!(
            "Estima el rendimiento de este anuncio antes de lanzarlo, usando benchmarks \
             habituales de la plataforma.\nPlataforma: {}\nObjetivo: {}\n{}{}\
             Texto del anuncio:\n{}\n\n\
             Expresa CTR y tasa de conversión en porcentaje, CPC en la moneda local y la \
             confianza de 0 a 100.\n\n{}",
            req.platform,
            req.objective.as_str(),
            optional_line("Presupuesto", budget.as_deref()),
            optional_line("Audiencia", req.audience.as_deref()),
            req.ad_copy,
            json_contract(
                lang,
                r#"{"predicted_ctr": 0, "predicted_cpc": 0, "predicted_conversion_rate": 0, "confidence": 0, "risks": [""], "recommendations": [""], "summary": ""}"#
            )
        )
    }

    fn degraded(_req: &AdsPredictorRequest) -> AdsPredictorResponse {
        AdsPredictorResponse {
            summary: NOT_CONFIGURED_MESSAGE.to_string(),
            fallback: true,
            ..Default::default()
        }
    }

    fn error_fallback(_req: &AdsPredictorRequest) -> AdsPredictorResponse {
        AdsPredictorResponse {
            summary: CALL_FAILED_MESSAGE.to_string(),
            fallback: true,
            ..Default::default()
        }
    }
}
