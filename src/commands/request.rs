//! `salonhub request <METHOD> <PATH>`

use clap::Args;
use reqwest::Method;

use salonhub_client::ApiRequest;
use salonhub_core::error::AppError;

use crate::context::Context;
use crate::output::{self, OutputFormat};

/// Arguments for the request command
#[derive(Debug, Args)]
pub struct RequestArgs {
    /// HTTP method (GET, POST, PUT, PATCH, DELETE)
    pub method: String,
    /// Path relative to the configured API base URL
    pub path: String,
    /// JSON request body
    #[arg(short, long)]
    pub body: Option<String>,
    /// Query parameter as key=value (repeatable)
    #[arg(short, long, value_parser = parse_query_pair)]
    pub query: Vec<(String, String)>,
    /// Send without the bearer token
    #[arg(long)]
    pub anonymous: bool,
}

/// Send one request through the authenticated client and print the response
pub async fn execute(args: &RequestArgs, ctx: &Context, format: OutputFormat) -> Result<(), AppError> {
    let mut request = ApiRequest::new(parse_method(&args.method)?, args.path.as_str());

    for (key, value) in &args.query {
        request = request.query(key.as_str(), value);
    }
    if let Some(body) = &args.body {
        let value: serde_json::Value = serde_json::from_str(body)
            .map_err(|e| AppError::validation(format!("Invalid JSON body: {e}")))?;
        request = request.json(&value)?;
    }
    if args.anonymous {
        request = request.anonymous();
    }

    let response = ctx.client.execute(request).await?;
    let status = response.status().as_u16();
    let body = response
        .text()
        .await
        .map_err(|e| AppError::external_service(format!("Failed to read response body: {e}")))?;

    output::print_response(status, &body, format);
    Ok(())
}

fn parse_method(raw: &str) -> Result<Method, AppError> {
    Method::from_bytes(raw.to_ascii_uppercase().as_bytes())
        .map_err(|_| AppError::validation(format!("Invalid HTTP method '{raw}'")))
}

fn parse_query_pair(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got '{raw}'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_method_is_case_insensitive() {
        assert_eq!(parse_method("get").unwrap(), Method::GET);
        assert_eq!(parse_method("Patch").unwrap(), Method::PATCH);
        assert!(parse_method("NOT A METHOD").is_err());
    }

    #[test]
    fn test_parse_query_pair() {
        assert_eq!(
            parse_query_pair("date=2026-10-18").unwrap(),
            ("date".to_string(), "2026-10-18".to_string())
        );
        assert_eq!(parse_query_pair("q=a=b").unwrap().1, "a=b");
        assert!(parse_query_pair("flag").is_err());
    }
}
