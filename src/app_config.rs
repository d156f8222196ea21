use std::env;

// Defaults matching the deployment the backend was written for
const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:3001";
const DEFAULT_FIRESTORE_BASE_URL: &str = "https://firestore.googleapis.com/v1";

/// Runtime configuration, loaded once at startup from the environment
/// (a `.env` file is honored via dotenv). The admin document id and admin
/// email are deliberately injected here instead of living as literals in
/// the handlers.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_address: String,

    // Generation service (Flowise)
    pub flowise_api_url: String,
    pub flowise_api_key: Option<String>,

    // Firestore
    pub firestore_project_id: String,
    pub firestore_base_url: String,
    pub firestore_access_token: Option<String>,

    // Admin surface
    pub admin_doc_id: String,
    pub admin_email: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let flowise_api_url = env::var("FLOWISE_API_URL")
            .map_err(|_| "FLOWISE_API_URL environment variable not set".to_string())?;

        // Catch obviously broken endpoint values before the first request
        if !(flowise_api_url.starts_with("http://") || flowise_api_url.starts_with("https://")) {
            return Err(format!("Invalid FLOWISE_API_URL format: {}", flowise_api_url));
        }

        let firestore_project_id = env::var("FIRESTORE_PROJECT_ID")
            .map_err(|_| "FIRESTORE_PROJECT_ID environment variable not set".to_string())?;

        let admin_doc_id = env::var("ADMIN_DOC_ID")
            .map_err(|_| "ADMIN_DOC_ID environment variable not set".to_string())?;

        let admin_email = env::var("ADMIN_EMAIL")
            .map_err(|_| "ADMIN_EMAIL environment variable not set".to_string())?;

        Ok(Self {
            bind_address: env::var("BIND_ADDRESS")
                .unwrap_or_else(|_| DEFAULT_BIND_ADDRESS.to_string()),
            flowise_api_url,
            flowise_api_key: env::var("FLOWISE_API_KEY").ok(),
            firestore_project_id,
            firestore_base_url: env::var("FIRESTORE_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_FIRESTORE_BASE_URL.to_string()),
            firestore_access_token: env::var("FIRESTORE_ACCESS_TOKEN").ok(),
            admin_doc_id,
            admin_email,
        })
    }
}
