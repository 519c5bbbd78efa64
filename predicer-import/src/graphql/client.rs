//! HTTP submission of mutation envelopes

use std::time::Duration;

use anyhow::{Context, Result};
use serde_json::Value;

use super::Envelope;

/// Client for the model service's GraphQL endpoint.
#[derive(Debug, Clone)]
pub struct GraphQlClient {
    http: reqwest::Client,
    endpoint: String,
    bearer_token: Option<String>,
}

/// What came back for one dispatched envelope.
#[derive(Debug, Clone)]
pub struct DispatchOutcome {
    /// HTTP status code.
    pub status: u16,
    /// Error entries found in the response body (GraphQL top-level errors
    /// plus per-mutation error lists).
    pub errors: Vec<String>,
    /// The response body. Kept verbatim when it is not JSON.
    pub body: String,
}

impl DispatchOutcome {
    /// An item succeeded when the status is 2xx and the body carries no
    /// error list.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status) && self.errors.is_empty()
    }
}

impl GraphQlClient {
    pub fn new(endpoint: &str, bearer_token: Option<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            http,
            endpoint: endpoint.to_string(),
            bearer_token,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// POST one envelope as a JSON body and report the outcome.
    ///
    /// Transport errors (refused connection, timeout) surface as `Err`;
    /// anything the server answered, including non-2xx and non-JSON
    /// bodies, becomes a [`DispatchOutcome`].
    pub async fn submit(&self, envelope: &Envelope) -> Result<DispatchOutcome> {
        let mut request = self.http.post(&self.endpoint).json(envelope);
        if let Some(token) = &self.bearer_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("request to {} failed", self.endpoint))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .context("failed to read response body")?;

        let errors = match serde_json::from_str::<Value>(&body) {
            Ok(json) => collect_errors(&json),
            // non-JSON bodies are kept verbatim, not treated as parse failures
            Err(_) => Vec::new(),
        };

        Ok(DispatchOutcome {
            status,
            errors,
            body,
        })
    }
}

/// Collect every non-empty `errors` array in the response: the GraphQL
/// top-level list plus any nested per-mutation lists under `data`.
pub fn collect_errors(json: &Value) -> Vec<String> {
    let mut errors = Vec::new();
    walk_errors(json, &mut errors);
    errors
}

fn walk_errors(value: &Value, out: &mut Vec<String>) {
    let Value::Object(map) = value else {
        return;
    };

    for (key, entry) in map {
        if key == "errors" {
            if let Value::Array(list) = entry {
                for item in list {
                    out.push(format_error(item));
                }
            }
            continue;
        }
        walk_errors(entry, out);
    }
}

fn format_error(error: &Value) -> String {
    match (error.get("field"), error.get("message")) {
        (Some(Value::String(field)), Some(Value::String(message))) => {
            format!("{}: {}", field, message)
        }
        (_, Some(Value::String(message))) => message.clone(),
        _ => error.to_string(),
    }
}
