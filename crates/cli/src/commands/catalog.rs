//! Catalog Commands

use anyhow::Result;
use apiprobe_common::request::join_url;
use apiprobe_common::{ApiDescriptor, Service};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use serde_json::Value;

use super::Context;
use crate::output::{print_block, print_item, print_list, OutputFormat, TableDisplay};

#[derive(Args)]
pub struct ShowArgs {
    /// API index (1-based) or name
    pub api: String,
}

/// Service display wrapper for serialization
#[derive(Serialize)]
pub struct ServiceDisplay {
    pub id: String,
    pub title: String,
    pub base_url: String,
    pub authorization: String,
    pub apis: usize,
}

impl From<&Service> for ServiceDisplay {
    fn from(s: &Service) -> Self {
        Self {
            id: s.id.clone(),
            title: s.title.clone(),
            base_url: s.base_url.clone(),
            authorization: s.auth_note.clone().unwrap_or_else(|| "-".to_string()),
            apis: s.apis.len(),
        }
    }
}

impl TableDisplay for ServiceDisplay {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Title", "Base URL", "Authorization", "APIs"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.title.clone(),
            self.base_url.clone(),
            self.authorization.clone(),
            self.apis.to_string(),
        ]
    }
}

/// Descriptor display wrapper for serialization
#[derive(Serialize)]
pub struct ApiDisplay {
    pub index: usize,
    pub name: String,
    pub method: String,
    pub endpoint: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub path_params: Vec<String>,
}

impl ApiDisplay {
    fn new(index: usize, api: &ApiDescriptor) -> Self {
        Self {
            index,
            name: api.name.clone(),
            method: api.method.to_string(),
            endpoint: api.endpoint.clone(),
            description: api.description.clone(),
            payload: api.payload.clone(),
            path_params: api.path_params(),
        }
    }
}

impl TableDisplay for ApiDisplay {
    fn headers() -> Vec<&'static str> {
        vec!["#", "Name", "Method", "Endpoint"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.index.to_string(),
            self.name.clone(),
            self.method.clone(),
            self.endpoint.clone(),
        ]
    }
}

pub fn services(ctx: &Context) -> Result<()> {
    let items: Vec<ServiceDisplay> = ctx.catalog.services.iter().map(ServiceDisplay::from).collect();
    print_list(&items, ctx.format);
    Ok(())
}

pub fn list(ctx: &Context) -> Result<()> {
    let service = ctx.service()?;
    let items: Vec<ApiDisplay> = service
        .apis
        .iter()
        .enumerate()
        .map(|(i, api)| ApiDisplay::new(i + 1, api))
        .collect();
    print_list(&items, ctx.format);
    Ok(())
}

pub fn show(args: ShowArgs, ctx: &Context) -> Result<()> {
    let service = ctx.service()?;
    let api = service.find(&args.api)?;
    let index = service
        .apis
        .iter()
        .position(|a| std::ptr::eq(a, api))
        .map(|i| i + 1)
        .unwrap_or_default();
    let display = ApiDisplay::new(index, api);

    if ctx.format != OutputFormat::Table {
        print_item(&display, ctx.format);
        return Ok(());
    }

    println!("{} {}", api.method.to_string().cyan().bold(), api.name.bold());
    println!("{}", api.description.dimmed());
    println!();
    println!("{} {}", "URL:".bold(), api_url(service, api)?);
    if !display.path_params.is_empty() {
        println!("{} {}", "Path parameters:".bold(), display.path_params.join(", "));
    }
    if let Some(ref note) = service.auth_note {
        println!("{} {}", "Authorization:".bold(), note);
    }
    if api.method.has_body() {
        println!();
        print_block("Request body:", &api.default_payload_text());
    }
    Ok(())
}

fn api_url(service: &Service, api: &ApiDescriptor) -> Result<String> {
    Ok(join_url(&service.base_url, &api.endpoint)?)
}
