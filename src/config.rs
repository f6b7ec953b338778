use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Name of the JSON index file kept inside `data_dir`
pub const INDEX_FILE_NAME: &str = "files.json";

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Server bind address
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory holding uploaded files, served under `/uploads`
    #[serde(default = "default_upload_dir")]
    pub upload_dir: PathBuf,

    /// Maximum upload request body size in bytes. Zero, negative or
    /// unparseable values fall back to the default.
    #[serde(
        default = "default_max_upload_size",
        deserialize_with = "deserialize_upload_size"
    )]
    pub max_upload_size: usize,

    /// Directory holding the metadata index
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Built frontend assets
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,

    /// SPA entry document, relative to `static_dir`
    #[serde(default = "default_index_file")]
    pub index_file: String,

    /// Backup directory, created at startup
    #[serde(default = "default_backup_dir")]
    pub backup_dir: PathBuf,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Enable CORS
    #[serde(default = "default_true")]
    pub enable_cors: bool,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            port: default_port(),
            upload_dir: default_upload_dir(),
            max_upload_size: default_max_upload_size(),
            data_dir: default_data_dir(),
            static_dir: default_static_dir(),
            index_file: default_index_file(),
            backup_dir: default_backup_dir(),
            timeout_secs: default_timeout_secs(),
            enable_cors: default_true(),
            log_level: default_log_level(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from `.env`, an optional `server.*` file and the
    /// process environment, in increasing priority.
    ///
    /// Environment variables are unprefixed (`PORT`, `UPLOAD_DIR`,
    /// `MAX_UPLOAD_SIZE`, ...) so existing deployments keep working.
    pub fn load() -> anyhow::Result<Self> {
        if let Err(err) = dotenvy::dotenv() {
            if !err.not_found() {
                tracing::warn!("Could not load .env file: {err}");
            }
        }

        Self::from_environment(config::Environment::default())
    }

    /// Build from the optional `server.*` file overlaid with `environment`
    pub fn from_environment(environment: config::Environment) -> anyhow::Result<Self> {
        let builder = config::Config::builder()
            .add_source(config::File::with_name("server").required(false))
            .add_source(environment.try_parsing(true));

        Ok(builder.build()?.try_deserialize()?)
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let addr_str = format!("{}:{}", self.bind_addr, self.port);
        Ok(addr_str.parse()?)
    }

    /// Get request timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Path of the JSON metadata index
    pub fn index_path(&self) -> PathBuf {
        self.data_dir.join(INDEX_FILE_NAME)
    }

    /// Path of the SPA entry document
    pub fn index_document(&self) -> PathBuf {
        self.static_dir.join(&self.index_file)
    }

    /// Directories created at startup
    pub fn bootstrap_dirs(&self) -> [&PathBuf; 4] {
        [
            &self.upload_dir,
            &self.data_dir,
            &self.static_dir,
            &self.backup_dir,
        ]
    }
}

fn default_bind_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_upload_dir() -> PathBuf {
    PathBuf::from("./uploads")
}

fn default_max_upload_size() -> usize {
    10 * 1024 * 1024
}

fn deserialize_upload_size<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawSize {
        Number(i64),
        Text(String),
        Other(serde::de::IgnoredAny),
    }

    let size = match RawSize::deserialize(deserializer)? {
        RawSize::Number(n) => usize::try_from(n).ok(),
        RawSize::Text(text) => text.trim().parse::<usize>().ok(),
        RawSize::Other(_) => None,
    };
    Ok(size
        .filter(|&n| n > 0)
        .unwrap_or_else(default_max_upload_size))
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./db")
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("./dist")
}

fn default_index_file() -> String {
    "index.html".to_string()
}

fn default_backup_dir() -> PathBuf {
    PathBuf::from("./backups")
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}
