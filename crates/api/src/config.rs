use artlab_core::naming::DEFAULT_BUCKET;
use artlab_db::supabase::SupabaseConfig;

/// Which data platform the server talks to.
#[derive(Debug, Clone)]
pub enum BackendConfig {
    /// The hosted platform over REST.
    Supabase(SupabaseConfig),
    /// Everything in process; data is lost on restart.
    Memory { bucket: String },
}

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development,
/// except the platform credentials when `BACKEND=supabase`.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `120`, uploads are slow).
    pub request_timeout_secs: u64,
    /// Largest accepted request body, covering every file of one form.
    pub max_body_bytes: usize,
    /// Data platform selection and credentials.
    pub backend: BackendConfig,
    /// ffprobe binary used to read video durations.
    pub ffprobe_path: String,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `120`                      |
    /// | `MAX_BODY_BYTES`       | `268435456`                |
    /// | `BACKEND`              | `supabase`                 |
    /// | `SUPABASE_URL`         | required for `supabase`    |
    /// | `SUPABASE_ANON_KEY`    | required for `supabase`    |
    /// | `STORAGE_BUCKET`       | `lab-upload`               |
    /// | `FFPROBE_PATH`         | `ffprobe`                  |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "120".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let max_body_bytes: usize = std::env::var("MAX_BODY_BYTES")
            .unwrap_or_else(|_| "268435456".into())
            .parse()
            .expect("MAX_BODY_BYTES must be a valid usize");

        let bucket = std::env::var("STORAGE_BUCKET").unwrap_or_else(|_| DEFAULT_BUCKET.into());

        let backend = match std::env::var("BACKEND")
            .unwrap_or_else(|_| "supabase".into())
            .as_str()
        {
            "supabase" => BackendConfig::Supabase(SupabaseConfig {
                url: std::env::var("SUPABASE_URL").expect("SUPABASE_URL must be set"),
                api_key: std::env::var("SUPABASE_ANON_KEY")
                    .expect("SUPABASE_ANON_KEY must be set"),
                bucket,
            }),
            "memory" => BackendConfig::Memory { bucket },
            other => panic!("BACKEND must be 'supabase' or 'memory', got '{other}'"),
        };

        let ffprobe_path = std::env::var("FFPROBE_PATH").unwrap_or_else(|_| "ffprobe".into());

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            max_body_bytes,
            backend,
            ffprobe_path,
        }
    }
}
