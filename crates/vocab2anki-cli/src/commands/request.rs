use serde_json::Value;

use crate::commands::common::{load_config, open_client};
use crate::error::CliError;

pub async fn run_request(
    action: &str,
    raw_params: Option<&str>,
    anki_url: Option<String>,
) -> Result<(), CliError> {
    let params = parse_params(raw_params)?;
    let client = open_client(&load_config()?, anki_url)?;
    let result = client.send_request(action, params).await?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

/// Parse `--params`; only JSON objects are accepted.
pub fn parse_params(raw: Option<&str>) -> Result<Value, CliError> {
    let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return Ok(Value::Null);
    };
    match serde_json::from_str::<Value>(raw) {
        Ok(value @ Value::Object(_)) => Ok(value),
        Ok(other) => Err(CliError::InvalidParams(format!(
            "expected a JSON object, got {other}"
        ))),
        Err(error) => Err(CliError::InvalidParams(error.to_string())),
    }
}
