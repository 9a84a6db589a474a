use crate::storage::{self, StorageManager};
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

const DEFAULT_LISTEN: &str = "0.0.0.0:8080";
const DEFAULT_STATIC_DIR: &str = "static";

/// Proxy in front of the Data API, needs no key.
const DEFAULT_PROXY_URL: &str = "https://api-server.youtubetools.xyz";
const DEFAULT_DATA_API_URL: &str = "https://www.googleapis.com";

const DEFAULT_SUGGEST_URL: &str = "https://suggestqueries.google.com/complete/search";
const DEFAULT_SUGGEST_CLIENT: &str = "firefox";
pub const USER_AGENT_DEFAULT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:124.0) Gecko/20100101 Firefox/124.0";

const CONFIG_FILE: &str = "config.yaml";

/// Where video metadata (tags) comes from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "provider", rename_all = "snake_case")]
pub enum MetadataConfig {
    /// Internal proxy: `GET {base_url}/videos?id=<id>`
    Proxy { base_url: String },

    /// YouTube Data API v3, `YOUTUBE_API_KEY` overrides `api_key`
    DataApi {
        #[serde(default = "default_data_api_url")]
        base_url: String,
        #[serde(default)]
        api_key: Option<String>,
    },
}

impl Default for MetadataConfig {
    fn default() -> Self {
        MetadataConfig::Proxy {
            base_url: DEFAULT_PROXY_URL.to_string(),
        }
    }
}

fn default_data_api_url() -> String {
    DEFAULT_DATA_API_URL.to_string()
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SuggestConfig {
    #[serde(default = "default_suggest_url")]
    pub url: String,

    /// Value of the `client` query parameter; `firefox` yields plain json
    #[serde(default = "default_suggest_client")]
    pub client: String,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for SuggestConfig {
    fn default() -> Self {
        Self {
            url: default_suggest_url(),
            client: default_suggest_client(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_suggest_url() -> String {
    DEFAULT_SUGGEST_URL.to_string()
}

fn default_suggest_client() -> String {
    DEFAULT_SUGGEST_CLIENT.to_string()
}

fn default_user_agent() -> String {
    USER_AGENT_DEFAULT.to_string()
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Directory with the browser page, served at `/`
    #[serde(default = "default_static_dir")]
    pub static_dir: String,

    #[serde(default)]
    pub metadata: MetadataConfig,

    #[serde(default)]
    pub suggest: SuggestConfig,

    /// Append every answered request to `requests.jsonl`
    #[serde(default)]
    pub request_log: bool,

    #[serde(skip_serializing, skip_deserializing)]
    base_path: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            static_dir: default_static_dir(),
            metadata: MetadataConfig::default(),
            suggest: SuggestConfig::default(),
            request_log: false,
            base_path: String::new(),
        }
    }
}

fn default_listen() -> String {
    DEFAULT_LISTEN.to_string()
}

fn default_static_dir() -> String {
    DEFAULT_STATIC_DIR.to_string()
}

impl Config {
    fn apply_env(&mut self) {
        if let Ok(listen) = std::env::var("YTT_LISTEN") {
            self.listen = listen;
        }

        if let MetadataConfig::DataApi { api_key, .. } = &mut self.metadata {
            if let Ok(key) = std::env::var("YOUTUBE_API_KEY") {
                *api_key = Some(key);
            }
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        self.listen_addr()?;

        match &self.metadata {
            MetadataConfig::Proxy { base_url } => {
                url::Url::parse(base_url)
                    .with_context(|| format!("metadata.base_url is not a valid url: {base_url}"))?;
            }
            MetadataConfig::DataApi { base_url, api_key } => {
                url::Url::parse(base_url)
                    .with_context(|| format!("metadata.base_url is not a valid url: {base_url}"))?;
                if api_key.as_deref().map_or(true, str::is_empty) {
                    bail!("metadata.api_key (or YOUTUBE_API_KEY) is required for the data_api provider");
                }
            }
        }

        url::Url::parse(&self.suggest.url)
            .with_context(|| format!("suggest.url is not a valid url: {}", self.suggest.url))?;

        if self.suggest.user_agent.trim().is_empty() {
            bail!("suggest.user_agent must not be empty");
        }

        Ok(())
    }

    pub fn listen_addr(&self) -> anyhow::Result<SocketAddr> {
        self.listen
            .parse()
            .with_context(|| format!("listen is not a valid socket address: {}", self.listen))
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    pub fn load_with(base_path: &str) -> anyhow::Result<Self> {
        let store = storage::BackendLocal::new(base_path)?;

        // create new if does not exist
        if !store.exists(CONFIG_FILE) {
            store.write(
                CONFIG_FILE,
                serde_yml::to_string(&Self::default())?.as_bytes(),
            )?;
        }

        let config_str =
            String::from_utf8(store.read(CONFIG_FILE)?).context("config file is not valid utf8")?;
        let mut config: Self = serde_yml::from_str(&config_str).context("config is malformed")?;

        config.base_path = base_path.to_string();

        // resave in case config version needs an upgrade
        if config_str != serde_yml::to_string(&config)? {
            config.save()?;
        }

        config.apply_env();
        config.validate()?;

        Ok(config)
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let store = storage::BackendLocal::new(&self.base_path)?;

        let config_str = serde_yml::to_string(&self)?;
        store.write(CONFIG_FILE, config_str.as_bytes())?;
        Ok(())
    }
}

/// `YTT_BASE_PATH`, or `~/.local/share/ytt`
pub fn base_path() -> anyhow::Result<String> {
    if let Ok(base_path) = std::env::var("YTT_BASE_PATH") {
        return Ok(base_path);
    }

    let home = homedir::my_home()?.context("could not determine home directory")?;
    Ok(format!("{}/.local/share/ytt", home.to_string_lossy()))
}
