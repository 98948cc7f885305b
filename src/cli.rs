//! Command-line interface definitions for News Relay.
//!
//! Every option can also come from the environment (or a `.env` file loaded
//! at startup). Credentials are declared optional here so that their absence
//! is reported by [`crate::config::Config::from_cli`] as a typed error rather
//! than a clap usage message.

use clap::Parser;

/// Command-line arguments for the News Relay application.
///
/// # Examples
///
/// ```sh
/// # credentials from the environment, defaults for everything else
/// NAVER_CLIENT_ID=... NAVER_CLIENT_SECRET=... \
/// TELEGRAM_BOT_TOKEN=... TELEGRAM_CHAT_ID=... news_relay
///
/// # different keyword and state location
/// news_relay --keyword 수출 --state-file /var/lib/news_relay/state.json
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Search keyword; also used as the message prefix
    #[arg(short, long, env = "NEWS_KEYWORD", default_value = "무역협회")]
    pub keyword: String,

    /// Number of results to request (one page, 1-100)
    #[arg(short, long, env = "NEWS_DISPLAY", default_value_t = 20)]
    pub display: u32,

    /// Path of the JSON watermark file
    #[arg(short, long, env = "STATE_FILE", default_value = ".state/state.json")]
    pub state_file: String,

    /// Timeout for each HTTP request, in seconds
    #[arg(long, env = "HTTP_TIMEOUT_SECS", default_value_t = 20)]
    pub timeout_secs: u64,

    /// Naver Open API base URL
    #[arg(long, env = "NAVER_API_BASE", default_value = "https://openapi.naver.com")]
    pub naver_api_base: String,

    /// Telegram Bot API base URL
    #[arg(long, env = "TELEGRAM_API_BASE", default_value = "https://api.telegram.org")]
    pub telegram_api_base: String,

    /// Naver application client id
    #[arg(long, env = "NAVER_CLIENT_ID", hide_env_values = true)]
    pub naver_client_id: Option<String>,

    /// Naver application client secret
    #[arg(long, env = "NAVER_CLIENT_SECRET", hide_env_values = true)]
    pub naver_client_secret: Option<String>,

    /// Telegram bot token
    #[arg(long, env = "TELEGRAM_BOT_TOKEN", hide_env_values = true)]
    pub telegram_bot_token: Option<String>,

    /// Telegram chat id that receives the articles
    #[arg(long, env = "TELEGRAM_CHAT_ID")]
    pub telegram_chat_id: Option<String>,
}
