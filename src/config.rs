//! Validated runtime configuration.
//!
//! [`Config::from_cli`] turns raw CLI/env input into a value object and fails
//! with [`ConfigError`] before any client is built or any request is sent.

use crate::cli::Cli;
use crate::engine::RelaySettings;
use crate::error::ConfigError;
use crate::notifier::TelegramTarget;
use crate::source::{NaverCredentials, MAX_DISPLAY};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

#[derive(Debug, Clone)]
pub struct Config {
    pub relay: RelaySettings,
    pub state_file: PathBuf,
    pub timeout: Duration,
    pub naver_api_base: Url,
    pub telegram_api_base: Url,
    pub naver: NaverCredentials,
    pub telegram: TelegramTarget,
}

impl Config {
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let naver = NaverCredentials {
            client_id: required("NAVER_CLIENT_ID", &cli.naver_client_id)?,
            client_secret: required("NAVER_CLIENT_SECRET", &cli.naver_client_secret)?,
        };
        let telegram = TelegramTarget {
            bot_token: required("TELEGRAM_BOT_TOKEN", &cli.telegram_bot_token)?,
            chat_id: required("TELEGRAM_CHAT_ID", &cli.telegram_chat_id)?,
        };

        let keyword = cli.keyword.trim();
        if keyword.is_empty() {
            return Err(ConfigError::Missing {
                name: "NEWS_KEYWORD",
            });
        }
        if cli.display == 0 {
            return Err(ConfigError::NotPositive {
                name: "NEWS_DISPLAY",
            });
        }
        if cli.display > MAX_DISPLAY {
            return Err(ConfigError::TooLarge {
                name: "NEWS_DISPLAY",
                max: MAX_DISPLAY.into(),
                value: cli.display.into(),
            });
        }
        if cli.timeout_secs == 0 {
            return Err(ConfigError::NotPositive {
                name: "HTTP_TIMEOUT_SECS",
            });
        }

        Ok(Self {
            relay: RelaySettings {
                keyword: keyword.to_string(),
                display: cli.display,
            },
            state_file: PathBuf::from(&cli.state_file),
            timeout: Duration::from_secs(cli.timeout_secs),
            naver_api_base: parse_url("NAVER_API_BASE", &cli.naver_api_base)?,
            telegram_api_base: parse_url("TELEGRAM_API_BASE", &cli.telegram_api_base)?,
            naver,
            telegram,
        })
    }
}

fn required(name: &'static str, value: &Option<String>) -> Result<String, ConfigError> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or(ConfigError::Missing { name })
}

fn parse_url(name: &'static str, value: &str) -> Result<Url, ConfigError> {
    Url::parse(value).map_err(|source| ConfigError::InvalidUrl { name, source })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli() -> Cli {
        Cli {
            keyword: "무역협회".into(),
            display: 20,
            state_file: ".state/state.json".into(),
            timeout_secs: 20,
            naver_api_base: "https://openapi.naver.com".into(),
            telegram_api_base: "https://api.telegram.org".into(),
            naver_client_id: Some("id".into()),
            naver_client_secret: Some("secret".into()),
            telegram_bot_token: Some("123:abc".into()),
            telegram_chat_id: Some("-1001".into()),
        }
    }

    #[test]
    fn test_from_cli_complete() {
        let mut args = cli();
        args.timeout_secs = 7;
        let config = Config::from_cli(&args).unwrap();
        assert_eq!(config.relay.keyword, "무역협회");
        assert_eq!(config.timeout, Duration::from_secs(7));
        assert_eq!(config.naver.client_secret, "secret");
        assert_eq!(config.telegram.chat_id, "-1001");
    }

    #[test]
    fn test_required_rejects_absent_and_blank() {
        assert!(matches!(
            required("TELEGRAM_CHAT_ID", &None),
            Err(ConfigError::Missing { name: "TELEGRAM_CHAT_ID" })
        ));
        assert!(required("TELEGRAM_CHAT_ID", &Some("   ".into())).is_err());
        assert_eq!(required("X", &Some(" v ".into())).unwrap(), "v");
    }

    #[test]
    fn test_from_cli_rejects_blank_credential() {
        let mut args = cli();
        args.telegram_bot_token = Some(String::new());
        let err = Config::from_cli(&args).unwrap_err();
        assert!(matches!(err, ConfigError::Missing { name: "TELEGRAM_BOT_TOKEN" }));
    }

    #[test]
    fn test_from_cli_rejects_bad_url() {
        let mut args = cli();
        args.naver_api_base = "not a url".into();
        let err = Config::from_cli(&args).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { name: "NAVER_API_BASE", .. }));
    }

    #[test]
    fn test_from_cli_rejects_zero_display() {
        let mut args = cli();
        args.display = 0;
        let err = Config::from_cli(&args).unwrap_err();
        assert!(matches!(err, ConfigError::NotPositive { name: "NEWS_DISPLAY" }));
    }

    #[test]
    fn test_from_cli_rejects_display_above_api_limit() {
        let mut args = cli();
        args.display = 100;
        assert_eq!(Config::from_cli(&args).unwrap().relay.display, 100);

        args.display = 101;
        let err = Config::from_cli(&args).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::TooLarge { name: "NEWS_DISPLAY", max: 100, value: 101 }
        ));
    }
}
