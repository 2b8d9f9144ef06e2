//! JSON over HTTPS through the `curl` executable
//!
//! Requests run through the [`ProcessRunner`] like every other tool. Headers
//! (credentials included) are written to a private temporary file and passed
//! with `-H @file`, so secrets never show up in the argument list. The body is
//! streamed on stdin and the status code is appended to stdout with `-w`.

use std::io::Write;

use serde::de::DeserializeOwned;
use tempfile::NamedTempFile;
use tracing::{debug, instrument};

use crate::error::{Error, Result};
use crate::process::{CommandSpec, ProcessRunner};

pub const CURL: &str = "curl";

#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: &'static str,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn new(method: &'static str, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn json(mut self, body: &serde_json::Value) -> Self {
        self.body = Some(body.to_string());
        self.header("Content-Type", "application/json")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_str(&self.body)?)
    }

    /// `message` (or `error.message`) from a JSON error body, else the raw body
    pub fn error_message(&self) -> String {
        let parsed: Option<serde_json::Value> = serde_json::from_str(&self.body).ok();
        parsed
            .as_ref()
            .and_then(|v| {
                v.get("message")
                    .or_else(|| v.get("error").and_then(|e| e.get("message")))
                    .and_then(|m| m.as_str())
            })
            .map(str::to_string)
            .unwrap_or_else(|| self.body.trim().to_string())
    }
}

/// Send a request and return the response, whatever its status
#[instrument(skip_all, fields(method = request.method, url = %request.url))]
pub fn send(runner: &dyn ProcessRunner, request: &HttpRequest) -> Result<HttpResponse> {
    let mut header_file = NamedTempFile::new()?;
    for (name, value) in &request.headers {
        writeln!(header_file, "{}: {}", name, value)?;
    }
    header_file.flush()?;

    let mut spec = CommandSpec::new(CURL)
        .args(["--silent", "--show-error", "--location", "-X", request.method])
        .arg("-H")
        .arg(format!("@{}", header_file.path().display()))
        .args(["-w", "\n%{http_code}"]);
    if let Some(body) = &request.body {
        spec = spec.args(["--data-binary", "@-"]).stdin(body.clone());
    }
    spec = spec.arg(&request.url);

    let outcome = runner.checked(&spec)?;
    let response = parse_response(&outcome.stdout).ok_or_else(|| Error::CommandFailed {
        command: outcome.command.clone(),
        code: outcome.code,
        stderr: "could not read the HTTP status from curl output".to_string(),
    })?;

    debug!(status = response.status, "response received");
    Ok(response)
}

/// Split `<body>\n<status>` as produced by `-w "\n%{http_code}"`
fn parse_response(stdout: &str) -> Option<HttpResponse> {
    let (body, status) = stdout.rsplit_once('\n').unwrap_or(("", stdout));
    let status = status.trim().parse().ok()?;
    Some(HttpResponse {
        status,
        body: body.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::ProcessOutcome;
    use crate::test_utils::RecordingRunner;
    use serde_json::json;

    #[test]
    fn test_parse_response() {
        let response = parse_response("{\"id\":1}\n201").unwrap();
        assert_eq!(response.status, 201);
        assert_eq!(response.body, "{\"id\":1}");
        assert!(response.is_success());

        let response = parse_response("204").unwrap();
        assert_eq!(response.body, "");
        assert!(parse_response("no status here").is_none());
    }

    #[test]
    fn test_error_message() {
        let response = HttpResponse {
            status: 422,
            body: r#"{"message":"Validation Failed"}"#.to_string(),
        };
        assert_eq!(response.error_message(), "Validation Failed");

        let response = HttpResponse {
            status: 400,
            body: r#"{"error":{"message":"bad model"}}"#.to_string(),
        };
        assert_eq!(response.error_message(), "bad model");

        let response = HttpResponse {
            status: 502,
            body: "Bad Gateway\n".to_string(),
        };
        assert_eq!(response.error_message(), "Bad Gateway");
    }

    #[test]
    fn test_send_keeps_secrets_out_of_arguments() {
        let runner = RecordingRunner::new().on("curl", ProcessOutcome::ok("{}\n200"));
        let request = HttpRequest::new("POST", "https://api.example.com/v1")
            .header("Authorization", "Bearer s3cret")
            .json(&json!({"name": "x"}));

        let response = send(&runner, &request).unwrap();
        assert_eq!(response.status, 200);

        let call = &runner.calls()[0];
        assert_eq!(call.program, "curl");
        assert!(call.args.iter().all(|a| !a.contains("s3cret")));
        assert_eq!(call.args.last().map(String::as_str), Some("https://api.example.com/v1"));
        assert_eq!(call.stdin.as_deref(), Some(r#"{"name":"x"}"#));
    }

    #[test]
    fn test_send_missing_curl() {
        let runner = RecordingRunner::new().missing("curl");
        let err = send(&runner, &HttpRequest::new("GET", "https://x")).unwrap_err();
        assert!(matches!(err, Error::ToolNotFound { .. }));
    }
}
