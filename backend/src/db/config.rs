//! Postgres connection settings and environment variable handling.
//!
//! The connection URL is resolved in layers: the built-in default URL, then
//! the `[postgres]` section of `repository.toml`, then a full `DATABASE_URL`
//! from the environment. The `PG_*` component variables then replace
//! individual parts of whichever URL won.

use std::env;

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use url::Url;

pub const DEFAULT_DATABASE_URL: &str = "postgres://postgres@localhost:5432/test";

/// Characters RFC 1738 reserves inside the user and password fields.
const USERINFO_RESERVED: &AsciiSet = &CONTROLS.add(b':').add(b'@').add(b'/').add(b'%');

const NO_DATABASE: &str = "Database URL has no database specified, specify PG_DBNAME in settings";

/// Configuration for connecting to Postgres.
#[derive(Debug, Clone, PartialEq)]
pub struct PostgresConfig {
    /// Base connection URL; set components below replace its parts
    pub database_url: String,
    /// Role used to connect
    pub user: Option<String>,
    /// Password for the role; empty removes any password from the URL
    pub password: Option<String>,
    /// Server hostname or IP literal
    pub host: Option<String>,
    /// Server port
    pub port: Option<u16>,
    /// Database name
    pub dbname: Option<String>,
    /// Maximum number of connections in the pool
    pub max_pool_size: u32,
    /// Minimum number of connections in the pool
    pub min_pool_size: u32,
    /// Connection timeout in seconds
    pub connection_timeout_sec: u64,
    /// Idle connection timeout in seconds
    pub idle_timeout_sec: u64,
    /// Maximum number of retry attempts for transient failures
    pub max_retries: u32,
    /// Initial retry delay in milliseconds (doubles with each retry)
    pub retry_delay_ms: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            user: None,
            password: None,
            host: None,
            port: None,
            dbname: None,
            max_pool_size: 10,
            min_pool_size: 1,
            connection_timeout_sec: 30,
            idle_timeout_sec: 600,
            max_retries: 3,
            retry_delay_ms: 100,
        }
    }
}

impl PostgresConfig {
    /// Create configuration from defaults plus environment variables.
    ///
    /// # Environment Variables
    /// - `DATABASE_URL` or `PG_DATABASE_URL`: replaces the base connection URL
    /// - `PG_USER`, `PG_PASSWORD`, `PG_HOST`, `PG_PORT`, `PG_DBNAME`: replace URL components
    /// - `PG_POOL_MAX`: Maximum pool size (default: 10)
    /// - `PG_POOL_MIN`: Minimum pool size (default: 1)
    /// - `PG_CONN_TIMEOUT_SEC`: Connection timeout in seconds (default: 30)
    /// - `PG_IDLE_TIMEOUT_SEC`: Idle connection timeout in seconds (default: 600)
    /// - `PG_MAX_RETRIES`: Maximum retry attempts (default: 3)
    /// - `PG_RETRY_DELAY_MS`: Initial retry delay in milliseconds (default: 100)
    ///
    /// # Errors
    /// Returns an error if `PG_PORT` is not a port number, the URL does not
    /// parse, or the resulting URL names no database.
    pub fn from_env() -> Result<Self, String> {
        Self::default().with_env_overrides()
    }

    /// Create a new configuration on top of a complete database URL.
    pub fn with_url(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            ..Default::default()
        }
    }

    /// Apply process environment overrides on top of `self`.
    pub fn with_env_overrides(self) -> Result<Self, String> {
        self.with_overrides(|key| env::var(key).ok())
    }

    /// Apply overrides from `lookup` (an environment-like key/value source).
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("DATABASE_URL").or_else(|| lookup("PG_DATABASE_URL")) {
            if !url.is_empty() {
                self.database_url = url;
            }
        }

        if let Some(user) = lookup("PG_USER") {
            self.user = Some(user);
        }
        if let Some(password) = lookup("PG_PASSWORD") {
            self.password = Some(password);
        }
        if let Some(host) = lookup("PG_HOST") {
            self.host = Some(host);
        }
        if let Some(port) = lookup("PG_PORT") {
            self.port = Some(
                port.parse()
                    .map_err(|_| "PG_PORT must be a valid port number".to_string())?,
            );
        }
        if let Some(dbname) = lookup("PG_DBNAME") {
            self.dbname = Some(dbname);
        }

        let parse_u32 = |key: &str| lookup(key).and_then(|v| v.parse::<u32>().ok());
        let parse_u64 = |key: &str| lookup(key).and_then(|v| v.parse::<u64>().ok());

        if let Some(v) = parse_u32("PG_POOL_MAX") {
            self.max_pool_size = v;
        }
        if let Some(v) = parse_u32("PG_POOL_MIN") {
            self.min_pool_size = v;
        }
        if let Some(v) = parse_u64("PG_CONN_TIMEOUT_SEC") {
            self.connection_timeout_sec = v;
        }
        if let Some(v) = parse_u64("PG_IDLE_TIMEOUT_SEC") {
            self.idle_timeout_sec = v;
        }
        if let Some(v) = parse_u32("PG_MAX_RETRIES") {
            self.max_retries = v;
        }
        if let Some(v) = parse_u64("PG_RETRY_DELAY_MS") {
            self.retry_delay_ms = v;
        }

        self.connection_url()?;
        Ok(self)
    }

    /// The URL handed to the connection manager.
    pub fn connection_url(&self) -> Result<String, String> {
        self.resolve_url().map(String::from)
    }

    /// The connection URL with the password masked, for logging.
    ///
    /// A URL that does not parse is never echoed back.
    pub fn display_url(&self) -> String {
        match self.resolve_url() {
            Ok(mut url) => {
                if url.password().is_some() {
                    let _ = url.set_password(Some("***"));
                }
                url.into()
            }
            Err(_) => "<invalid database url>".to_string(),
        }
    }

    fn resolve_url(&self) -> Result<Url, String> {
        let mut url = Url::parse(&self.database_url)
            .map_err(|e| format!("Invalid database URL: {}", e))?;
        if !url.has_host() {
            return Err("Invalid database URL: no host".to_string());
        }

        let user = match &self.user {
            Some(user) => user.clone(),
            None => decode_component(url.username())?,
        };
        let password = match &self.password {
            Some(password) => Some(password.clone()).filter(|p| !p.is_empty()),
            None => url.password().map(decode_component).transpose()?,
        };

        if let Some(host) = &self.host {
            let host = if host.contains(':') && !host.starts_with('[') {
                format!("[{}]", host)
            } else {
                host.clone()
            };
            url.set_host(Some(&host))
                .map_err(|e| format!("Invalid database host: {}", e))?;
        }
        if let Some(port) = self.port {
            url.set_port(Some(port))
                .map_err(|_| "Invalid database URL: cannot set port".to_string())?;
        }

        let quoted_user = utf8_percent_encode(&user, USERINFO_RESERVED).to_string();
        url.set_username(&quoted_user)
            .map_err(|_| "Invalid database URL: cannot set user".to_string())?;
        // Password only makes sense alongside a user
        let quoted_password = password
            .filter(|_| !user.is_empty())
            .map(|p| utf8_percent_encode(&p, USERINFO_RESERVED).to_string());
        url.set_password(quoted_password.as_deref())
            .map_err(|_| "Invalid database URL: cannot set password".to_string())?;

        let dbname = match &self.dbname {
            Some(dbname) => dbname.clone(),
            None => decode_component(url.path().trim_start_matches('/'))?,
        };
        if dbname.is_empty() {
            return Err(NO_DATABASE.to_string());
        }
        url.set_path(&format!("/{}", dbname));

        Ok(url)
    }
}

/// Interpret a settings string as a boolean flag.
pub fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "true" | "yes" | "on" | "1" | "y" | "t"
    )
}

/// Percent-decode a URL component into plain text.
fn decode_component(text: &str) -> Result<String, String> {
    percent_decode_str(text)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .map_err(|e| format!("Invalid database URL: {}", e))
}
