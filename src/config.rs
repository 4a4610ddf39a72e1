use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Which remote completion service to call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    OpenAI,
    Gemini,
}

impl FromStr for ProviderKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(ProviderKind::OpenAI),
            "gemini" => Ok(ProviderKind::Gemini),
            other => Err(anyhow::anyhow!("unknown chat provider: {}", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub provider: ProviderKind,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_base_url: String,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub provider_timeout: Duration,
    pub bind_addr: String,
    pub db_path: PathBuf,
    pub history_limit: usize,
    pub system_prompt: String,
}

pub const SYSTEM_PROMPT: &str = "You are HeritaGo AI Assistant, an expert guide for tourists exploring Sri Lanka. Your knowledge includes:

CULTURAL HERITAGE:
- Ancient cities (Anuradhapura, Polonnaruwa, Sigiriya)
- Temples and religious sites
- Traditional arts and crafts
- Local festivals and ceremonies

TRAVEL INFORMATION:
- Best times to visit each region
- Transportation options and tips
- Accommodation recommendations
- Local cuisine and dining etiquette

PRACTICAL ADVICE:
- Weather patterns and seasonal changes
- Safety tips and emergency contacts
- Local customs and dress codes
- Currency and payment methods

EXPERIENCES:
- Wildlife safaris and national parks
- Beach destinations
- Tea plantation tours
- Adventure activities

Provide accurate, culturally sensitive information in a friendly, concise manner. Focus on authentic experiences while ensuring tourist safety and comfort.";

/// Empty credentials are treated as missing.
fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parsed_var<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

impl Config {
    /// Credential for the selected provider, if one is configured.
    pub fn provider_api_key(&self) -> Option<&str> {
        match self.provider {
            ProviderKind::OpenAI => self.openai_api_key.as_deref(),
            ProviderKind::Gemini => self.gemini_api_key.as_deref(),
        }
    }

    pub fn provider_enabled(&self) -> bool {
        self.provider_api_key().is_some()
    }
}

impl Default for Config {
    fn default() -> Self {
        dotenv::dotenv().ok();

        let provider = match env::var("CHAT_PROVIDER") {
            Ok(value) => value.parse::<ProviderKind>().unwrap_or_else(|e| {
                log::warn!("⚠️ {}, using openai", e);
                ProviderKind::OpenAI
            }),
            Err(_) => ProviderKind::OpenAI,
        };

        let db_path = env::var("HERITAGO_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
                home.join(".config/heritago/chat.db")
            });

        Self {
            provider,
            openai_api_key: non_empty_var("OPENAI_API_KEY"),
            openai_model: env::var("OPENAI_MODEL")
                .unwrap_or_else(|_| "gpt-3.5-turbo".to_string()),
            openai_base_url: env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| crate::ai::openai::DEFAULT_BASE_URL.to_string()),
            gemini_api_key: non_empty_var("GEMINI_API_KEY"),
            gemini_model: env::var("GEMINI_MODEL").unwrap_or_else(|_| "gemini-pro".to_string()),
            gemini_base_url: env::var("GEMINI_BASE_URL")
                .unwrap_or_else(|_| crate::ai::gemini::DEFAULT_BASE_URL.to_string()),
            temperature: parsed_var("CHAT_TEMPERATURE", 0.7),
            max_tokens: parsed_var("CHAT_MAX_TOKENS", 500),
            provider_timeout: Duration::from_secs(parsed_var("PROVIDER_TIMEOUT_SECS", 60)),
            bind_addr: env::var("HERITAGO_BIND").unwrap_or_else(|_| "0.0.0.0:5000".to_string()),
            db_path,
            history_limit: parsed_var("CHAT_HISTORY_LIMIT", 50),
            system_prompt: SYSTEM_PROMPT.to_string(),
        }
    }
}
