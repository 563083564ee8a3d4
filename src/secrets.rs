use std::collections::HashMap;
use std::env;
use tracing::info;

pub const CONFIG_SECRET_ARN: &str = "CONFIG_SECRET_ARN";

#[derive(Debug, thiserror::Error)]
pub enum SecretsError {
    #[error("Failed to fetch secret from Secrets Manager: {0}")]
    Fetch(String),

    #[error("Secret does not contain a string value")]
    NotAString,

    #[error("Failed to parse secret JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Load setting overrides from AWS Secrets Manager
///
/// If CONFIG_SECRET_ARN is set, the secret's string value is parsed as a flat
/// JSON object whose keys are the same names as the environment variables
/// `Settings` reads. Without the variable an empty map is returned.
///
/// Runs once during cold start, before the first request.
pub async fn load_secret_overrides() -> Result<HashMap<String, String>, SecretsError> {
    let secret_arn = match env::var(CONFIG_SECRET_ARN) {
        Ok(arn) if !arn.trim().is_empty() => arn,
        _ => {
            info!("CONFIG_SECRET_ARN not set, skipping secrets loading");
            return Ok(HashMap::new());
        }
    };

    info!("Loading settings from AWS Secrets Manager: {}", secret_arn);

    let config = aws_config::load_from_env().await;
    let client = aws_sdk_secretsmanager::Client::new(&config);

    let response = client
        .get_secret_value()
        .secret_id(&secret_arn)
        .send()
        .await
        .map_err(|e| SecretsError::Fetch(e.to_string()))?;

    let secret_string = response.secret_string().ok_or(SecretsError::NotAString)?;
    let overrides = parse_secret_string(secret_string)?;

    // Values may be credentials, only the keys are logged
    info!(
        keys = ?overrides.keys().collect::<Vec<_>>(),
        "Loaded {} settings from Secrets Manager",
        overrides.len()
    );

    Ok(overrides)
}

fn parse_secret_string(secret_string: &str) -> Result<HashMap<String, String>, SecretsError> {
    Ok(serde_json::from_str(secret_string)?)
}
