use std::fmt;
use std::str::FromStr;

use secrecy::{ExposeSecret, SecretString};

use crate::error::ConfigError;

pub const DEFAULT_REMOTE_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_REMOTE_MODEL: &str = "gpt-4.1-mini";
pub const DEFAULT_LOCAL_URL: &str = "http://127.0.0.1:11434/v1/chat/completions";
pub const DEFAULT_LOCAL_MODEL: &str = "llama3.1";
pub const DEFAULT_LANGUAGE: &str = "es";

/**
 * \brief Which model backend answers outbound calls.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backend {
    /** \brief Hosted chat-completions API, bearer credential required. */
    #[default]
    Remote,
    /** \brief Self-hosted model reachable over plain HTTP. */
    Local,
}

impl FromStr for Backend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "remote" | "openai" => Ok(Self::Remote),
            "local" | "ollama" => Ok(Self::Local),
            other => Err(ConfigError::InvalidBackend(other.to_string())),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remote => write!(f, "remote"),
            Self::Local => write!(f, "local"),
        }
    }
}

/**
 * \brief Process-wide provider configuration.
 *
 * Built once at startup and shared behind an `Arc`; nothing mutates it
 * afterwards.
 */
#[derive(Debug)]
pub struct ProviderConfig {
    pub backend: Backend,
    api_key: Option<SecretString>,
    pub remote_url: String,
    pub remote_model: String,
    pub local_url: String,
    pub local_model: String,
    pub default_language: String,
}

impl ProviderConfig {
    /**
     * \brief Remote backend with an optional credential; blank keys count as absent.
     */
    pub fn remote(api_key: Option<&str>) -> Self {
        Self {
            backend: Backend::Remote,
            api_key: api_key
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(|k| SecretString::from(k.to_string())),
            remote_url: DEFAULT_REMOTE_URL.to_string(),
            remote_model: DEFAULT_REMOTE_MODEL.to_string(),
            local_url: DEFAULT_LOCAL_URL.to_string(),
            local_model: DEFAULT_LOCAL_MODEL.to_string(),
            default_language: DEFAULT_LANGUAGE.to_string(),
        }
    }

    /**
     * \brief Local backend at the given chat endpoint.
     */
    pub fn local(url: impl Into<String>) -> Self {
        Self {
            backend: Backend::Local,
            local_url: url.into(),
            ..Self::remote(None)
        }
    }

    pub fn with_remote_url(mut self, url: impl Into<String>) -> Self {
        self.remote_url = url.into();
        self
    }

    pub fn with_remote_model(mut self, model: impl Into<String>) -> Self {
        self.remote_model = model.into();
        self
    }

    pub fn with_local_model(mut self, model: impl Into<String>) -> Self {
        self.local_model = model.into();
        self
    }

    pub fn with_default_language(mut self, lang: impl Into<String>) -> Self {
        self.default_language = lang.into();
        self
    }

    /**
     * \brief Load from the process environment, honouring a local `.env` file.
     */
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Err(err) = dotenv_outcome(dotenvy::dotenv()) {
            tracing::warn!(error = %err, "ignoring unreadable .env file");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /**
     * \brief Build from an arbitrary key lookup so tests never touch the real environment.
     */
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let backend = match non_empty("AID_LLM_BACKEND") {
            Some(raw) => raw.parse()?,
            None => Backend::default(),
        };

        let mut cfg = Self::remote(lookup("OPENAI_API_KEY").as_deref());
        cfg.backend = backend;
        if let Some(url) = non_empty("AID_REMOTE_URL") {
            cfg.remote_url = url;
        }
        if let Some(model) = non_empty("AID_REMOTE_MODEL") {
            cfg.remote_model = model;
        }
        if let Some(url) = non_empty("AID_LOCAL_LLM_URL") {
            cfg.local_url = url;
        }
        if let Some(model) = non_empty("AID_LOCAL_MODEL") {
            cfg.local_model = model;
        }
        if let Some(lang) = non_empty("AID_DEFAULT_LANG") {
            cfg.default_language = lang;
        }
        Ok(cfg)
    }

    /**
     * \brief Whether a call could be attempted at all. Local endpoints always have a default.
     */
    pub fn is_configured(&self) -> bool {
        match self.backend {
            Backend::Remote => self.api_key.is_some(),
            Backend::Local => true,
        }
    }

    pub(crate) fn api_key(&self) -> Option<&str> {
        self.api_key.as_ref().map(|k| k.expose_secret())
    }

    /**
     * \brief Model used when the caller passes no hint.
     */
    pub fn default_model(&self) -> &str {
        match self.backend {
            Backend::Remote => &self.remote_model,
            Backend::Local => &self.local_model,
        }
    }
}

/**
 * \brief A missing `.env` file is the normal case; anything else is reported.
 */
fn dotenv_outcome<T>(result: Result<T, dotenvy::Error>) -> Result<(), dotenvy::Error> {
    match result {
        Ok(_) => Ok(()),
        Err(err) if err.not_found() => Ok(()),
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn missing_dotenv_is_silent_but_malformed_is_reported() {
        let dir = std::env::temp_dir().join(format!("aid-dotenv-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let missing = dir.join("absent.env");
        assert!(dotenv_outcome(dotenvy::from_path(&missing)).is_ok());

        let malformed = dir.join("broken.env");
        std::fs::write(&malformed, "this is not a dotenv line\n").unwrap();
        assert!(dotenv_outcome(dotenvy::from_path(&malformed)).is_err());

        std::fs::remove_dir_all(&dir).unwrap();
    }

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_to_unconfigured_remote() {
        let cfg = ProviderConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg.backend, Backend::Remote);
        assert!(!cfg.is_configured());
        assert_eq!(cfg.default_language, "es");
        assert_eq!(cfg.default_model(), DEFAULT_REMOTE_MODEL);
    }

    #[test]
    fn blank_key_counts_as_absent() {
        let cfg = ProviderConfig::from_lookup(lookup(&[("OPENAI_API_KEY", "   ")])).unwrap();
        assert!(!cfg.is_configured());
        assert!(cfg.api_key().is_none());
    }

    #[test]
    fn local_backend_with_overrides() {
        let cfg = ProviderConfig::from_lookup(lookup(&[
            ("AID_LLM_BACKEND", "Ollama"),
            ("AID_LOCAL_LLM_URL", "http://gpu-box:8080/chat"),
            ("AID_LOCAL_MODEL", "mistral"),
            ("AID_DEFAULT_LANG", "en"),
        ]))
        .unwrap();
        assert_eq!(cfg.backend, Backend::Local);
        assert!(cfg.is_configured());
        assert_eq!(cfg.local_url, "http://gpu-box:8080/chat");
        assert_eq!(cfg.default_model(), "mistral");
        assert_eq!(cfg.default_language, "en");
    }

    #[test]
    fn unknown_backend_is_an_error() {
        let err = ProviderConfig::from_lookup(lookup(&[("AID_LLM_BACKEND", "gemini")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBackend(ref b) if b == "gemini"));
    }

    #[test]
    fn debug_output_hides_credential() {
        let cfg = ProviderConfig::remote(Some("sk-very-secret"));
        assert!(cfg.is_configured());
        assert!(!format!("{:?}", cfg).contains("sk-very-secret"));
    }
}
