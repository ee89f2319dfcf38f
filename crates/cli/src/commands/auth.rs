//! Authorization Commands
//!
//! Obtain a bearer token from the selected service's `/login` endpoint and
//! keep it for later `exec` calls.

use anyhow::Result;
use apiprobe_common::{token, Profile};
use clap::Args;
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use super::Context;
use crate::output::{
    print_block, print_error, print_info, print_item, print_success, print_warning, OutputFormat,
    TableDisplay,
};

#[derive(Args)]
pub struct LoginArgs {
    /// Credential profile to log in with (user, admin, or one from config.toml)
    #[arg(long = "as", default_value = "user", conflicts_with = "email")]
    pub profile: String,

    /// Log in with an explicit email instead of a profile
    #[arg(long, requires = "password")]
    pub email: Option<String>,

    /// Password for --email
    #[arg(long, env = "APIPROBE_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

#[derive(Args)]
pub struct TokenArgs {
    /// Decode the JWT header and claims (signature is not verified)
    #[arg(long)]
    pub decode: bool,
}

/// Token display wrapper for serialization
#[derive(Serialize)]
pub struct TokenDisplay {
    pub service: String,
    pub profile: String,
    pub obtained_at: String,
    pub token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub claims: Option<Value>,
}

impl TableDisplay for TokenDisplay {
    fn headers() -> Vec<&'static str> {
        vec!["Service", "Profile", "Obtained", "Token"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.service.clone(),
            self.profile.clone(),
            self.obtained_at.clone(),
            self.token.clone(),
        ]
    }
}

/// Log in and store the token. Returns false when the login was rejected.
pub async fn login(args: LoginArgs, ctx: &Context) -> Result<bool> {
    let (label, profile) = resolve_profile(&args, ctx)?;
    let client = ctx.client()?;

    match client.login(&profile.email, &profile.password).await {
        Ok(jwt) => {
            ctx.sessions.set(&ctx.service_id, &jwt, &label)?;
            info!(service = %ctx.service_id, profile = %label, "Token stored");
            if ctx.format == OutputFormat::Table {
                print_success(&format!("Logged in to {} as {}", ctx.service_id, label));
                print_block("JWT Token", &jwt);
            } else {
                print_item(&display(ctx, &label, &jwt, None), ctx.format);
            }
            Ok(true)
        }
        Err(e) => {
            // A failed login never leaves a stale token behind
            ctx.sessions.clear(&ctx.service_id)?;
            print_error(&e.to_string());
            Ok(false)
        }
    }
}

pub fn logout(ctx: &Context) -> Result<()> {
    if ctx.sessions.clear(&ctx.service_id)? {
        print_success(&format!("Token for {} cleared", ctx.service_id));
    } else {
        print_info(&format!("No token held for {}", ctx.service_id));
    }
    Ok(())
}

pub fn show_token(args: TokenArgs, ctx: &Context) -> Result<bool> {
    let Some(stored) = ctx.sessions.get(&ctx.service_id)? else {
        print_info(&format!(
            "No token held for {}. Run `apiprobe login` first.",
            ctx.service_id
        ));
        return Ok(false);
    };

    let mut claims = None;
    if args.decode {
        let decoded = token::decode(&stored.token)?;
        if decoded.is_expired() {
            print_warning("Stored token has expired. Run `apiprobe login` again.");
        }
        claims = Some(decoded.claims);
    }

    let item = display(ctx, &stored.profile, &stored.token, claims);
    if ctx.format == OutputFormat::Table {
        print_block("JWT Token", &item.token);
        if let Some(ref claims) = item.claims {
            println!();
            print_block("Claims", &serde_json::to_string_pretty(claims)?);
        }
    } else {
        print_item(&item, ctx.format);
    }
    Ok(true)
}

fn resolve_profile(args: &LoginArgs, ctx: &Context) -> Result<(String, Profile)> {
    match (&args.email, &args.password) {
        (Some(email), Some(password)) => Ok((
            email.clone(),
            Profile {
                email: email.clone(),
                password: password.clone(),
            },
        )),
        _ => Ok((args.profile.clone(), ctx.config.profile(&args.profile)?.clone())),
    }
}

fn display(ctx: &Context, profile: &str, jwt: &str, claims: Option<Value>) -> TokenDisplay {
    let obtained_at = ctx
        .sessions
        .get(&ctx.service_id)
        .ok()
        .flatten()
        .map(|t| t.obtained_at.to_rfc3339())
        .unwrap_or_default();
    TokenDisplay {
        service: ctx.service_id.clone(),
        profile: profile.to_string(),
        obtained_at,
        token: jwt.to_string(),
        claims,
    }
}
