use std::env;
use std::str::FromStr;

use crate::group_chat::GroupChatConfig;

pub const DEFAULT_MODEL_ID: &str = "gpt-4o-mini";
pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
pub const MISSING_API_KEY_WARNING: &str =
    "OPENAI_API_KEY is not set - completion requests will be sent without credentials";
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 7860;
const DEFAULT_MAX_ROUNDS: usize = 3;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

#[derive(Clone, Debug)]
pub struct Config {
    pub openai_api_key: Option<String>,
    pub model_id: String,
    pub endpoint: String,
    pub host: String,
    pub port: u16,
    pub max_rounds: usize,
    pub max_tokens: Option<u32>,
    pub request_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup (the process env in production)
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let max_rounds: usize = parse_or(&lookup, "MAX_ROUNDS", DEFAULT_MAX_ROUNDS);
        if max_rounds == 0 {
            log::warn!("MAX_ROUNDS must be at least 1, using 1");
        }

        Self {
            openai_api_key: non_empty("OPENAI_API_KEY"),
            model_id: non_empty("MODEL_ID").unwrap_or_else(|| DEFAULT_MODEL_ID.to_string()),
            endpoint: non_empty("OPENAI_ENDPOINT").unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            host: non_empty("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: parse_or(&lookup, "PORT", DEFAULT_PORT),
            max_rounds: max_rounds.max(1),
            max_tokens: non_empty("MAX_TOKENS").and_then(|v| match v.trim().parse() {
                Ok(n) => Some(n),
                Err(_) => {
                    log::warn!("Ignoring invalid MAX_TOKENS value '{}'", v);
                    None
                }
            }),
            request_timeout_secs: parse_or(
                &lookup,
                "REQUEST_TIMEOUT_SECS",
                DEFAULT_REQUEST_TIMEOUT_SECS,
            ),
        }
    }

    pub fn group_chat_config(&self) -> GroupChatConfig {
        GroupChatConfig {
            max_rounds: self.max_rounds,
            ..Default::default()
        }
    }

    /// Startup warning shown by every binary when no credential is configured
    pub fn credentials_warning(&self) -> Option<&'static str> {
        match self.openai_api_key {
            Some(_) => None,
            None => Some(MISSING_API_KEY_WARNING),
        }
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + std::fmt::Display,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw.trim().parse().unwrap_or_else(|_| {
            log::warn!("Invalid {} value '{}', using default {}", key, raw, default);
            default
        }),
        _ => default,
    }
}
