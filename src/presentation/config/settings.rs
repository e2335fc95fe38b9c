use super::Environment;

/// Process configuration, sourced from environment variables.
///
/// The model backend credential lives server-side only; its absence is a
/// startup-fatal configuration error, never a per-request one.
#[derive(Debug, Clone)]
pub struct Settings {
    pub environment: Environment,
    pub server: ServerSettings,
    pub gemini: GeminiSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct GeminiSettings {
    pub api_key: String,
    pub base_url: String,
    pub image_model: String,
    pub video_model: String,
    pub tts_model: String,
    pub voice: String,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: String,
    pub enable_json: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("missing required environment variable: {0}")]
    MissingVar(&'static str),
    #[error("invalid value for {0}: {1}")]
    InvalidVar(&'static str, String),
}

impl Settings {
    pub fn from_env() -> Result<Self, SettingsError> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or(SettingsError::MissingVar("GEMINI_API_KEY"))?;

        let environment = Environment::try_from(env_or("APP_ENV", "local"))
            .map_err(|e| SettingsError::InvalidVar("APP_ENV", e))?;

        let port = match std::env::var("SERVER_PORT") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| SettingsError::InvalidVar("SERVER_PORT", raw))?,
            Err(_) => 3000,
        };

        Ok(Self {
            environment,
            server: ServerSettings {
                host: env_or("SERVER_HOST", "0.0.0.0"),
                port,
            },
            gemini: GeminiSettings {
                api_key,
                base_url: env_or("GEMINI_BASE_URL", "https://generativelanguage.googleapis.com"),
                image_model: env_or("GEMINI_IMAGE_MODEL", "gemini-2.5-flash"),
                video_model: env_or("GEMINI_VIDEO_MODEL", "gemini-2.5-pro"),
                tts_model: env_or("GEMINI_TTS_MODEL", "gemini-2.5-flash-preview-tts"),
                voice: env_or("GEMINI_TTS_VOICE", "Zephyr"),
            },
            logging: LoggingSettings {
                level: env_or("LOG_LEVEL", "info"),
                enable_json: std::env::var("LOG_FORMAT")
                    .map(|v| v.to_lowercase() == "json")
                    .unwrap_or_else(|_| environment.json_logs_by_default()),
            },
        })
    }
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}
