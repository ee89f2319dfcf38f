//! Execute Command

use anyhow::{Context as _, Result};
use apiprobe_common::RequestBuilder;
use clap::Args;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::Context;
use crate::client::ApiResponse;
use crate::output::{print_block, print_error, spinner, status_line, OutputFormat};

#[derive(Args)]
pub struct ExecArgs {
    /// API index (1-based) or name
    pub api: String,

    /// Endpoint to call instead of the descriptor's
    #[arg(short, long)]
    pub endpoint: Option<String>,

    /// Request body as JSON text instead of the example payload
    #[arg(short, long, conflicts_with = "data_file")]
    pub data: Option<String>,

    /// Read the request body from a file ("-" for stdin)
    #[arg(long)]
    pub data_file: Option<PathBuf>,

    /// Path parameter substitution, e.g. --param id=42
    #[arg(short, long = "param", value_name = "NAME=VALUE")]
    pub params: Vec<String>,

    /// Do not send the stored bearer token
    #[arg(long)]
    pub no_auth: bool,

    /// Print the resolved request without sending it
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Serialize)]
struct ExecReport<'a> {
    method: String,
    url: &'a str,
    #[serde(flatten)]
    response: &'a ApiResponse,
}

/// Run a request. Returns false when the server answered with a non-2xx status.
pub async fn execute(args: ExecArgs, ctx: &Context) -> Result<bool> {
    let service = ctx.service()?;
    let api = service.find(&args.api)?;

    let payload = match (args.data, args.data_file) {
        (Some(text), _) => Some(text),
        (None, Some(file)) => Some(read_payload(&file)?),
        (None, None) => None,
    };
    let bearer = if args.no_auth {
        None
    } else {
        ctx.sessions.token(&ctx.service_id)?
    };
    debug!(api = %api.name, authorized = bearer.is_some(), "Preparing request");

    let request = RequestBuilder::new()
        .endpoint(args.endpoint)
        .payload(payload)
        .params(&args.params)?
        .bearer(bearer)
        .build(&service.base_url, api)?;

    if args.dry_run {
        println!("{}", serde_json::to_string_pretty(&request)?);
        return Ok(true);
    }

    let client = ctx.client()?;
    let pb = spinner(&format!("Executing {} {}", request.method, request.url), ctx.format);
    let result = client.execute(&request).await;
    pb.finish_and_clear();

    let response = match result {
        Ok(response) => response,
        Err(e) => {
            // Transport failure: there is no response body to show
            print_error(&format!("{:#}", e));
            return Ok(false);
        }
    };

    match ctx.format {
        OutputFormat::Json => {
            let report = ExecReport {
                method: request.method.to_string(),
                url: &request.url,
                response: &response,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Yaml => {
            let report = ExecReport {
                method: request.method.to_string(),
                url: &request.url,
                response: &response,
            };
            print!("{}", serde_yaml::to_string(&report)?);
        }
        OutputFormat::Plain => {
            println!("{}", response.render());
        }
        OutputFormat::Table => {
            println!("{} {}", request.method, request.url);
            println!("{}", status_line(response.status, response.elapsed));
            println!();
            print_block("Response", &response.render());
        }
    }

    Ok(response.ok)
}

fn read_payload(file: &Path) -> Result<String> {
    if file.as_os_str() == "-" {
        let mut text = String::new();
        std::io::Read::read_to_string(&mut std::io::stdin(), &mut text)?;
        return Ok(text);
    }
    std::fs::read_to_string(file).with_context(|| format!("Failed to read {}", file.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::context;
    use serde_json::json;
    use tempfile::TempDir;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, Request, ResponseTemplate};

    fn args(api: &str) -> ExecArgs {
        ExecArgs {
            api: api.to_string(),
            endpoint: None,
            data: None,
            data_file: None,
            params: Vec::new(),
            no_auth: false,
            dry_run: false,
        }
    }

    #[tokio::test]
    async fn test_exec_uses_stored_token_and_params() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/admin/reports/3/resolve"))
            .and(header("authorization", "Bearer admin-jwt"))
            .and(body_json(json!({ "action": "reject" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "rejected" })))
            .expect(1)
            .mount(&server)
            .await;

        let tmp = TempDir::new().unwrap();
        let ctx = context(&tmp, "movies", Some(server.uri()));
        ctx.sessions.set("movies", "admin-jwt", "admin").unwrap();

        let mut a = args("resolve");
        a.params = vec!["id=3".to_string()];
        a.data = Some(r#"{"action": "reject"}"#.to_string());
        assert!(execute(a, &ctx).await.unwrap());
    }

    #[tokio::test]
    async fn test_exec_endpoint_override_and_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/movies/unknown"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "message": "Not found" })))
            .expect(1)
            .mount(&server)
            .await;

        let tmp = TempDir::new().unwrap();
        let ctx = context(&tmp, "movies", Some(server.uri()));

        let mut a = args("3");
        a.endpoint = Some("/movies/unknown".to_string());
        assert!(!execute(a, &ctx).await.unwrap());
    }

    #[tokio::test]
    async fn test_exec_body_from_file() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/add"))
            .and(body_json(json!({ "objectID": "9", "name": "Lamp" })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "objectID": "9" })))
            .expect(1)
            .mount(&server)
            .await;

        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("body.json");
        std::fs::write(&file, r#"{"objectID": "9", "name": "Lamp"}"#).unwrap();
        let ctx = context(&tmp, "search", Some(server.uri()));

        let mut a = args("Add Product");
        a.data_file = Some(file);
        assert!(execute(a, &ctx).await.unwrap());
    }

    #[tokio::test]
    async fn test_exec_no_auth_skips_stored_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/movies"))
            .respond_with(|req: &Request| {
                assert!(req.headers.get("authorization").is_none());
                ResponseTemplate::new(200).set_body_json(json!([]))
            })
            .expect(1)
            .mount(&server)
            .await;

        let tmp = TempDir::new().unwrap();
        let ctx = context(&tmp, "movies", Some(server.uri()));
        ctx.sessions.set("movies", "user-jwt", "user").unwrap();

        let mut a = args("get all movies");
        a.no_auth = true;
        assert!(execute(a, &ctx).await.unwrap());
    }

    #[tokio::test]
    async fn test_exec_invalid_payload_sends_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let tmp = TempDir::new().unwrap();
        let ctx = context(&tmp, "movies", Some(server.uri()));

        let mut a = args("create movie");
        a.data = Some("{ title: ".to_string());
        assert!(execute(a, &ctx).await.is_err());
    }

    #[tokio::test]
    async fn test_exec_transport_failure_reports_false() {
        let tmp = TempDir::new().unwrap();
        let ctx = context(&tmp, "search", Some("http://127.0.0.1:9".to_string()));
        assert!(!execute(args("test api"), &ctx).await.unwrap());
    }

    #[tokio::test]
    async fn test_dry_run_does_not_send() {
        let tmp = TempDir::new().unwrap();
        let ctx = context(&tmp, "search", Some("http://127.0.0.1:9".to_string()));
        let mut a = args("1");
        a.dry_run = true;
        assert!(execute(a, &ctx).await.unwrap());
    }
}
