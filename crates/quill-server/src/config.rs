use anyhow::Context;

/// Process configuration, read from the environment exactly once at startup
/// and passed by reference from there on. Only the signing secret is
/// mandatory; everything else has a development default.
#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub seed_base_url: String,
    pub seed_user_id: i64,
    pub google_client_id: String,
    pub google_client_secret: String,
    pub google_redirect_url: String,
    pub oauth_state: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let jwt_secret =
            std::env::var("QUILL_JWT_SECRET").context("QUILL_JWT_SECRET must be set")?;

        let port: u16 = std::env::var("QUILL_PORT")
            .unwrap_or_else(|_| "8080".into())
            .parse()
            .context("QUILL_PORT must be a port number")?;

        let seed_user_id: i64 = std::env::var("QUILL_SEED_USER_ID")
            .unwrap_or_else(|_| quill_seed::DEFAULT_SEED_USER.to_string())
            .parse()
            .context("QUILL_SEED_USER_ID must be an integer")?;

        Ok(Self {
            db_path: std::env::var("QUILL_DB_PATH").unwrap_or_else(|_| "quill.db".into()),
            host: std::env::var("QUILL_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port,
            jwt_secret,
            seed_base_url: std::env::var("QUILL_SEED_BASE_URL")
                .unwrap_or_else(|_| quill_seed::DEFAULT_BASE_URL.into()),
            seed_user_id,
            google_client_id: std::env::var("GOOGLE_CLIENT_ID").unwrap_or_default(),
            google_client_secret: std::env::var("GOOGLE_CLIENT_SECRET").unwrap_or_default(),
            google_redirect_url: std::env::var("GOOGLE_REDIRECT_URL").unwrap_or_default(),
            oauth_state: std::env::var("OAUTH_STATE_STRING").unwrap_or_default(),
        })
    }
}
