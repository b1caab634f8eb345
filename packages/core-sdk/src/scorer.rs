use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UnknownPlatform;

/**
 * \brief Terms associated with urgency, authority or results.
 *
 * Matched as substrings of the lower-cased hook; entries must not contain
 * one another.
 */
pub const STRONG_WORDS: &[&str] = &[
    "error",
    "secreto",
    "sistema",
    "resultado",
    "diagnóstico",
    "estrategia",
    "nadie",
    "urgente",
    "gratis",
    "dinero",
    "ventas",
    "clave",
    "verdad",
    "mistake",
    "secrets",
    "system",
    "results",
    "diagnosis",
    "strategy",
    "nobody",
    "money",
    "sales",
];

/** \brief Invitational verbs and phrases that read as a soft call to action. */
pub const SOFT_CTA: &[&str] = &[
    "descubre",
    "aprende",
    "mira",
    "guarda",
    "comenta",
    "comparte",
    "sígueme",
    "escríbeme",
    "te muestro",
    "te explico",
    "discover",
    "learn",
    "watch",
    "save this",
    "comment",
    "follow",
];

pub const GENERAL_OPENING: &str =
    "Tu gancho necesita provocar una emoción inmediata (curiosidad, sorpresa o identificación) en el primer segundo.";
pub const LINKEDIN_OPENING: &str =
    "En LinkedIn, el gancho debe transmitir autoridad y una promesa profesional concreta desde la primera línea.";

/**
 * \brief Publishing platform named in a request.
 *
 * Serialized by canonical name; unknown names are rejected.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum Platform {
    Instagram,
    TikTok,
    Threads,
    YoutubeShorts,
    LinkedIn,
    Facebook,
    Youtube,
    X,
    /** \brief Any other channel; scored without a platform adjustment. */
    Other,
}

impl Platform {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Instagram => "instagram",
            Self::TikTok => "tiktok",
            Self::Threads => "threads",
            Self::YoutubeShorts => "youtube_shorts",
            Self::LinkedIn => "linkedin",
            Self::Facebook => "facebook",
            Self::Youtube => "youtube",
            Self::X => "x",
            Self::Other => "other",
        }
    }

    /** \brief Short-attention vertical feeds. */
    pub fn is_fast_feed(self) -> bool {
        matches!(
            self,
            Self::Instagram | Self::TikTok | Self::Threads | Self::YoutubeShorts
        )
    }

    pub fn is_professional(self) -> bool {
        self == Self::LinkedIn
    }
}

impl FromStr for Platform {
    type Err = UnknownPlatform;

    /**
     * \brief Case-insensitive; spaces, dashes and underscores are ignored.
     */
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let key: String = raw
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect();
        match key.as_str() {
            "instagram" | "ig" | "reels" => Ok(Self::Instagram),
            "tiktok" => Ok(Self::TikTok),
            "threads" => Ok(Self::Threads),
            "youtubeshorts" | "shorts" => Ok(Self::YoutubeShorts),
            "linkedin" => Ok(Self::LinkedIn),
            "facebook" | "fb" => Ok(Self::Facebook),
            "youtube" => Ok(Self::Youtube),
            "x" | "twitter" => Ok(Self::X),
            "other" | "otra" | "otro" => Ok(Self::Other),
            _ => Err(UnknownPlatform(raw.trim().to_string())),
        }
    }
}

impl TryFrom<String> for Platform {
    type Error = UnknownPlatform;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        raw.parse()
    }
}

impl From<Platform> for &'static str {
    fn from(platform: Platform) -> Self {
        platform.as_str()
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Level {
    #[default]
    Low,
    Medium,
    High,
}

impl Level {
    pub fn from_score(score: u8) -> Self {
        if score >= 80 {
            Level::High
        } else if score >= 55 {
            Level::Medium
        } else {
            Level::Low
        }
    }
}

/**
 * \brief Full evaluation of one hook.
 */
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub score: u8,
    pub level: Level,
    pub details: Vec<String>,
    pub advice: String,
}

/**
 * \brief Score a hook for the given platform.
 * \return clamped score in [0, 100] and the ordered evaluation notes
 */
pub fn evaluate(text: &str, platform: Platform) -> (u8, Vec<String>) {
    let words = text.split_whitespace().count();
    if words == 0 {
        return (0, vec!["⚠️ No hay texto para evaluar.".to_string()]);
    }

    let lower = text.to_lowercase();
    let mut points: i32 = 0;
    let mut details = Vec::with_capacity(8);

    if (4..=10).contains(&words) {
        points += 25;
        details.push(format!("✅ Longitud clara ({} palabras).", words));
    } else if (2..=14).contains(&words) {
        points += 15;
        details.push(format!(
            "🟡 Longitud aceptable ({} palabras), aunque podría ser más directa.",
            words
        ));
    } else {
        points += 5;
        details.push(format!(
            "⚠️ Longitud poco efectiva ({} palabras) para captar atención.",
            words
        ));
    }

    if text.chars().any(|c| c.is_numeric()) {
        points += 10;
        details.push("✅ Incluye números, lo que aporta concreción.".to_string());
    } else {
        details.push("🟡 Sin números; una cifra concreta suele frenar el scroll.".to_string());
    }

    if text.contains('?') || text.contains('¿') {
        points += 10;
        details.push("✅ Plantea una pregunta que invita a responder mentalmente.".to_string());
    } else {
        details.push("🟡 No hay pregunta; considera abrir un bucle de curiosidad.".to_string());
    }

    let strong = STRONG_WORDS.iter().filter(|w| lower.contains(*w)).count();
    match strong {
        0 => {
            points += 4;
            details.push("⚠️ No usa palabras de alto impacto.".to_string());
        }
        1 => {
            points += 10;
            details.push("🟡 Usa una palabra de alto impacto.".to_string());
        }
        n => {
            points += 18;
            details.push(format!("✅ Usa {} palabras de alto impacto.", n));
        }
    }

    if words <= 18 {
        points += 12;
        details.push("✅ Texto breve, fácil de leer de un vistazo.".to_string());
    } else if words <= 25 {
        points += 6;
        details.push("🟡 Texto algo extenso para un gancho.".to_string());
    } else {
        points += 2;
        details.push("⚠️ Texto demasiado largo para un gancho.".to_string());
    }

    if SOFT_CTA.iter().any(|cta| lower.contains(cta)) {
        points += 8;
        details.push("✅ Incluye una invitación suave a la acción.".to_string());
    } else {
        details.push("🟡 Sin invitación a la acción.".to_string());
    }

    if platform.is_fast_feed() {
        if words <= 14 {
            points += 8;
            details.push("✅ Extensión adecuada para un feed rápido.".to_string());
        } else {
            points -= 5;
            details.push("⚠️ Demasiado largo para un feed rápido.".to_string());
        }
    } else if platform.is_professional() {
        if (6..=18).contains(&words) {
            points += 6;
            details.push("✅ Extensión adecuada para una red profesional.".to_string());
        } else if words < 6 {
            details.push(
                "🟡 En una red profesional conviene algo más de contexto.".to_string(),
            );
        } else {
            details.push("🟡 En una red profesional, recorta hasta ~18 palabras.".to_string());
        }
    } else {
        details.push("🟡 Sin ajuste específico para esta plataforma.".to_string());
    }

    (points.clamp(0, 100) as u8, details)
}

/**
 * \brief One paragraph of strategy text for a score band.
 */
pub fn advice(score: u8, platform: Platform) -> String {
    let opening = if platform.is_professional() {
        LINKEDIN_OPENING
    } else {
        GENERAL_OPENING
    };
    let body = match Level::from_score(score) {
        Level::High => {
            "Este gancho ya tiene un gran potencial: mantenlo, pruébalo en los primeros segundos del contenido y mide la retención para confirmarlo."
        }
        Level::Medium => {
            "Va por buen camino, pero puede ser más contundente: añade una cifra concreta, una palabra de alto impacto o una pregunta que obligue a detenerse."
        }
        Level::Low => {
            "Ahora mismo es fácil pasarlo de largo: acórtalo, nombra un problema o un error concreto de tu audiencia y promete un resultado claro."
        }
    };
    format!("{} {}", opening, body)
}

/**
 * \brief Evaluate and bundle score, level, notes and advice.
 */
pub fn score_hook(text: &str, platform: Platform) -> ScoreResult {
    let (score, details) = evaluate(text, platform);
    ScoreResult {
        score,
        level: Level::from_score(score),
        details,
        advice: advice(score, platform),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_is_terminal() {
        for text in ["", "   ", "\n\t "] {
            let (score, details) = evaluate(text, Platform::Instagram);
            assert_eq!(score, 0);
            assert_eq!(details.len(), 1);
        }
    }

    #[test]
    fn every_step_leaves_a_note() {
        let (_, details) = evaluate("hola mundo", Platform::Other);
        assert_eq!(details.len(), 7);
    }

    #[test]
    fn level_boundaries() {
        assert_eq!(Level::from_score(79), Level::Medium);
        assert_eq!(Level::from_score(80), Level::High);
        assert_eq!(Level::from_score(54), Level::Low);
        assert_eq!(Level::from_score(55), Level::Medium);
        assert_eq!(Level::from_score(0), Level::Low);
        assert_eq!(Level::from_score(100), Level::High);
    }

    #[test]
    fn scores_stay_in_range() {
        let long = "palabra ".repeat(200);
        let samples = [
            "a",
            "¿Sabías que 9 de cada 10 negocios cometen este error de estrategia? Descubre el sistema",
            long.as_str(),
            "dinero ventas secreto error sistema resultado 100% gratis ¿urgente?",
        ];
        for text in samples {
            for platform in [Platform::TikTok, Platform::LinkedIn, Platform::Other] {
                let (score, _) = evaluate(text, platform);
                assert!(score <= 100);
            }
        }
    }

    #[test]
    fn evaluation_is_idempotent() {
        let text = "3 errores que te cuestan clientes";
        assert_eq!(
            score_hook(text, Platform::Threads),
            score_hook(text, Platform::Threads)
        );
    }

    #[test]
    fn exact_point_sum() {
        // 6 words: +25, digit +10, no question 0, "error" +10, brevity +12,
        // no CTA 0, fast feed <=14 +8
        let (score, details) = evaluate("3 errores que te cuestan clientes", Platform::Instagram);
        assert_eq!(score, 65);
        assert_eq!(details.len(), 7);
    }

    #[test]
    fn any_two_strong_words_give_the_same_bonus() {
        let pairs = [
            ("error", "sistema"),
            ("dinero", "ventas"),
            ("secreto", "verdad"),
            ("results", "strategy"),
        ];
        let scores: Vec<u8> = pairs
            .iter()
            .map(|(a, b)| evaluate(&format!("tu {} y tu {} hoy", a, b), Platform::Other).0)
            .collect();
        // 6 words +25, no digit, no question, two strong +18, brevity +12
        assert!(scores.iter().all(|s| *s == 55), "{:?}", scores);

        let (one, _) = evaluate("tu error y tu plan hoy", Platform::Other);
        assert_eq!(one, 47);
        let (none, _) = evaluate("tu idea y tu plan hoy", Platform::Other);
        assert_eq!(none, 41);
    }

    #[test]
    fn platform_adjustment_on_long_text() {
        let text = "uno dos tres cuatro cinco seis siete ocho nueve diez once doce trece catorce quince dieciséis diecisiete dieciocho diecinueve veinte";
        assert_eq!(text.split_whitespace().count(), 20);
        let (fast, _) = evaluate(text, Platform::TikTok);
        let (pro, _) = evaluate(text, Platform::LinkedIn);
        let (neutral, _) = evaluate(text, Platform::Facebook);
        assert_eq!(pro, neutral);
        assert_eq!(pro - fast, 5);
    }

    #[test]
    fn linkedin_bonus_window() {
        let short = "crece tus ventas";
        let mid = "así ordené las ventas de mi empresa este año";
        let (short_li, _) = evaluate(short, Platform::LinkedIn);
        let (short_other, _) = evaluate(short, Platform::Other);
        assert_eq!(short_li, short_other);
        let (mid_li, _) = evaluate(mid, Platform::LinkedIn);
        let (mid_other, _) = evaluate(mid, Platform::Other);
        assert_eq!(mid_li, mid_other + 6);
    }

    #[test]
    fn question_and_cta_are_detected() {
        let (plain, _) = evaluate("tu plan de hoy", Platform::Other);
        let (asked, _) = evaluate("¿tu plan de hoy", Platform::Other);
        let (invited, _) = evaluate("descubre tu plan de hoy", Platform::Other);
        assert_eq!(asked, plain + 10);
        // one more word keeps the same length band
        assert_eq!(invited, plain + 8);
    }

    #[test]
    fn non_ascii_digits_count_as_numbers() {
        let (ascii, _) = evaluate("3 errores que te cuestan clientes", Platform::Instagram);
        let (arabic, _) = evaluate("٣ errores que te cuestan clientes", Platform::Instagram);
        let (none, _) = evaluate("tres errores que te cuestan clientes", Platform::Instagram);
        assert_eq!(arabic, ascii);
        assert_eq!(none + 10, ascii);
    }

    #[test]
    fn advice_framing_depends_on_platform() {
        assert!(advice(90, Platform::Instagram).starts_with(GENERAL_OPENING));
        assert!(advice(10, Platform::LinkedIn).starts_with(LINKEDIN_OPENING));
        assert_ne!(advice(90, Platform::Other), advice(60, Platform::Other));
        assert_ne!(advice(60, Platform::Other), advice(20, Platform::Other));
    }

    #[test]
    fn platform_names_and_aliases() {
        assert_eq!("YouTube-Shorts".parse::<Platform>().unwrap(), Platform::YoutubeShorts);
        assert_eq!(" TikTok ".parse::<Platform>().unwrap(), Platform::TikTok);
        assert_eq!("LinkedIn".parse::<Platform>().unwrap(), Platform::LinkedIn);
        assert_eq!("reels".parse::<Platform>().unwrap(), Platform::Instagram);
        assert_eq!("twitter".parse::<Platform>().unwrap(), Platform::X);
        assert_eq!("other".parse::<Platform>().unwrap(), Platform::Other);
        let err = "pinterest".parse::<Platform>().unwrap_err();
        assert_eq!(err.0, "pinterest");
    }

    #[test]
    fn platform_serde_uses_canonical_names() {
        let p: Platform = serde_json::from_str("\"shorts\"").unwrap();
        assert_eq!(p, Platform::YoutubeShorts);
        assert_eq!(serde_json::to_value(p).unwrap(), "youtube_shorts");
        assert!(serde_json::from_str::<Platform>("\"banana\"").is_err());
    }
}
