use anyhow::{Context, Result, bail};
use clap::Parser;
use std::env;

/// Default shared secret used outside production. Startup refuses to run
/// with this value when `MEDIA_SHARE_ENV=production`.
pub const DEFAULT_JWT_SECRET: &str = "development_secret_key";

/// MIME types accepted for upload.
pub const ALLOWED_FILE_TYPES: [&str; 8] = [
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "video/mp4",
    "video/webm",
    "video/mov",
    "application/pdf",
];

/// Centralized application configuration.
/// Combines environment variables and CLI arguments; built once at startup
/// and passed by reference to every component that needs it.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub storage_dir: String,
    pub database_url: String,
    /// Base URL prefixed onto stored file keys to form public links.
    pub public_url: String,
    /// Frontend origin used for OAuth redirects and CORS.
    pub frontend_url: String,
    pub cors_origin: String,
    pub jwt_secret: String,
    pub jwt_expiry_days: i64,
    pub google_client_id: String,
    pub google_client_secret: Option<String>,
    pub google_callback_url: String,
    pub max_upload_bytes: usize,
}

/// Command-line + environment configuration.
#[derive(Parser, Debug)]
#[command(author, version, about = "Media sharing API")]
pub struct Args {
    /// Host to bind to (overrides MEDIA_SHARE_HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to (overrides MEDIA_SHARE_PORT)
    #[arg(long)]
    pub port: Option<u16>,

    /// Directory where uploaded files are stored (overrides MEDIA_SHARE_STORAGE_DIR)
    #[arg(long)]
    pub storage_dir: Option<String>,

    /// Database URL (overrides MEDIA_SHARE_DATABASE_URL)
    #[arg(long)]
    pub database_url: Option<String>,

    /// Run migrations and exit
    #[arg(long)]
    pub migrate: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 3000,
            environment: "development".into(),
            storage_dir: "./data/files".into(),
            database_url: "sqlite://./data/meta/media_share.db".into(),
            public_url: "http://localhost:3000".into(),
            frontend_url: "http://localhost:5173".into(),
            cors_origin: "http://localhost:5173".into(),
            jwt_secret: DEFAULT_JWT_SECRET.into(),
            jwt_expiry_days: 30,
            google_client_id: String::new(),
            google_client_secret: None,
            google_callback_url: "http://localhost:3000/api/auth/google/callback".into(),
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

impl AppConfig {
    /// Parse environment variables + CLI args into AppConfig and migrate flag.
    pub fn from_env_and_args() -> Result<(Self, bool)> {
        let args = Args::parse();
        let defaults = Self::default();

        let env_port = match env::var("MEDIA_SHARE_PORT") {
            Ok(value) => Some(
                value
                    .parse::<u16>()
                    .with_context(|| format!("parsing MEDIA_SHARE_PORT value `{}`", value))?,
            ),
            Err(env::VarError::NotPresent) => None,
            Err(err) => return Err(err).context("reading MEDIA_SHARE_PORT"),
        };
        let env_expiry = match env::var("MEDIA_SHARE_JWT_EXPIRY_DAYS") {
            Ok(value) => Some(value.parse::<i64>().with_context(|| {
                format!("parsing MEDIA_SHARE_JWT_EXPIRY_DAYS value `{}`", value)
            })?),
            Err(env::VarError::NotPresent) => None,
            Err(err) => return Err(err).context("reading MEDIA_SHARE_JWT_EXPIRY_DAYS"),
        };
        let env_max_upload = match env::var("MEDIA_SHARE_MAX_FILE_SIZE") {
            Ok(value) => Some(value.parse::<usize>().with_context(|| {
                format!("parsing MEDIA_SHARE_MAX_FILE_SIZE value `{}`", value)
            })?),
            Err(env::VarError::NotPresent) => None,
            Err(err) => return Err(err).context("reading MEDIA_SHARE_MAX_FILE_SIZE"),
        };

        let frontend_url =
            env::var("MEDIA_SHARE_FRONTEND_URL").unwrap_or(defaults.frontend_url.clone());

        let cfg = Self {
            host: args
                .host
                .or_else(|| env::var("MEDIA_SHARE_HOST").ok())
                .unwrap_or(defaults.host),
            port: args.port.or(env_port).unwrap_or(defaults.port),
            environment: env::var("MEDIA_SHARE_ENV").unwrap_or(defaults.environment),
            storage_dir: args
                .storage_dir
                .or_else(|| env::var("MEDIA_SHARE_STORAGE_DIR").ok())
                .unwrap_or(defaults.storage_dir),
            database_url: args
                .database_url
                .or_else(|| env::var("MEDIA_SHARE_DATABASE_URL").ok())
                .unwrap_or(defaults.database_url),
            public_url: env::var("MEDIA_SHARE_PUBLIC_URL").unwrap_or(defaults.public_url),
            cors_origin: env::var("MEDIA_SHARE_CORS_ORIGIN").unwrap_or(frontend_url.clone()),
            frontend_url,
            jwt_secret: env::var("MEDIA_SHARE_JWT_SECRET").unwrap_or(defaults.jwt_secret),
            jwt_expiry_days: env_expiry.unwrap_or(defaults.jwt_expiry_days),
            google_client_id: env::var("GOOGLE_CLIENT_ID").unwrap_or(defaults.google_client_id),
            google_client_secret: env::var("GOOGLE_CLIENT_SECRET").ok(),
            google_callback_url: env::var("GOOGLE_CALLBACK_URL")
                .unwrap_or(defaults.google_callback_url),
            max_upload_bytes: env_max_upload.unwrap_or(defaults.max_upload_bytes),
        };

        cfg.validate()?;

        Ok((cfg, args.migrate))
    }

    /// Refuse configurations that must never reach production.
    pub fn validate(&self) -> Result<()> {
        if self.is_production() {
            if self.jwt_secret.is_empty() || self.jwt_secret == DEFAULT_JWT_SECRET {
                bail!("MEDIA_SHARE_JWT_SECRET must be set to a non-default value in production");
            }
            if self.google_client_id.is_empty() {
                bail!("GOOGLE_CLIENT_ID must be set in production");
            }
        }
        if self.jwt_expiry_days <= 0 {
            bail!("MEDIA_SHARE_JWT_EXPIRY_DAYS must be positive");
        }
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Public download URL for a stored file key.
    pub fn file_url(&self, key: &str) -> String {
        format!("{}/files/{}", self.public_url.trim_end_matches('/'), key)
    }
}
