//! Authentication commands.

use super::{invalid, Context};
use crate::output::{self, OutputFormat};
use anyhow::Result;
use chrono::Utc;
use clap::Args;
use eco_api_client::AuthError;
use eco_types::{LoginForm, RegistrationForm};
use std::io::{self, Write};
use tracing::warn;

fn prompt(label: &str) -> Result<String> {
    print!("{}: ", label);
    io::stdout().flush()?;
    let mut value = String::new();
    io::stdin().read_line(&mut value)?;
    Ok(value.trim().to_string())
}

/// Login with email and password.
pub async fn login(ctx: &Context, email: Option<String>, format: &OutputFormat) -> Result<()> {
    if let Some(session) = ctx.session.current_session() {
        output::print_success(&format!("Already logged in as {}", session.email), format);
        return Ok(());
    }

    let email = match email {
        Some(email) => email,
        None => prompt("Email")?,
    };
    let password = rpassword::prompt_password("Password: ")?;

    let form = LoginForm::new(email, password);
    let session = match ctx.api.authenticator().login(&form).await {
        Ok(session) => session,
        Err(e @ AuthError::Validation(_)) => {
            output::print_error(&e.to_string(), format);
            return Ok(());
        }
        Err(e) => {
            ctx.session.record_error(e.to_string());
            output::print_error(&format!("Login failed: {}", e), format);
            return Ok(());
        }
    };

    let email = session.email.clone();
    if let Err(e) = ctx.session.login(session) {
        warn!(error = %e, "Session not persisted");
        eprintln!("Warning: session could not be saved and will not survive this run");
    }
    output::print_success(&format!("Logged in as {}", email), format);
    Ok(())
}

/// Logout and clear the stored session.
pub fn logout(ctx: &Context, format: &OutputFormat) -> Result<()> {
    ctx.session.log_out()?;
    output::print_success("Logged out successfully", format);
    Ok(())
}

/// Show the current session.
pub fn status(ctx: &Context, format: &OutputFormat) -> Result<()> {
    let session = ctx.session.current_session();

    match format {
        OutputFormat::Text => match &session {
            Some(session) => {
                println!("Auth:     logged in");
                output::print_row("Email", &session.email);
                output::print_row(
                    "User ID",
                    &session
                        .id
                        .map(|id| id.to_string())
                        .unwrap_or_else(|| "-".to_string()),
                );
                output::print_row("Role", &format!("{:?}", session.role()));
                output::print_row("Manage recipes", yes_no(session.can_manage_recipes()));
                output::print_row("Manage blogs", yes_no(session.can_manage_blogs()));
                output::print_row("View reports", yes_no(session.can_view_reports()));
            }
            None => println!("Auth:     not logged in"),
        },
        OutputFormat::Json => {
            output::print_json(&serde_json::json!({
                "logged_in": session.is_some(),
                "session": session,
            }))?;
        }
    }
    Ok(())
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

/// Registration details. The password is always prompted.
#[derive(Args)]
pub struct RegisterArgs {
    #[arg(long)]
    names: String,
    #[arg(long)]
    last_names: String,
    /// Gender ID
    #[arg(long)]
    gender: Option<i64>,
    /// Country ID
    #[arg(long)]
    country: Option<i64>,
    /// User type ID
    #[arg(long)]
    user_type: Option<i64>,
    /// Identification type (e.g. CC, TI)
    #[arg(long, default_value = "")]
    id_type: String,
    /// Identification number
    #[arg(long, default_value = "")]
    id_number: String,
    /// Birth date (YYYY-MM-DD)
    #[arg(long, default_value = "")]
    birth_date: String,
    #[arg(long)]
    email: String,
    /// Contact phone number
    #[arg(long, default_value = "")]
    contact: String,
    /// Accept the terms and conditions
    #[arg(long)]
    accept_terms: bool,
}

/// Create an account.
pub async fn register(ctx: &Context, args: RegisterArgs, format: &OutputFormat) -> Result<()> {
    let password = rpassword::prompt_password("Password: ")?;
    let confirm_password = rpassword::prompt_password("Confirm password: ")?;

    let form = RegistrationForm {
        names: args.names,
        last_names: args.last_names,
        gender_id: args.gender,
        country_id: args.country,
        user_type_id: args.user_type,
        identification_type: args.id_type,
        identification_number: args.id_number,
        birth_date: args.birth_date,
        email: args.email,
        password,
        confirm_password,
        contact: args.contact,
        accepted_terms: args.accept_terms,
    };

    match ctx.api.registrar().register(&form, Utc::now()).await {
        Ok(()) => {
            output::print_success("Account created. You can now log in.", format);
            Ok(())
        }
        Err(AuthError::Validation(issues)) => Err(invalid(issues)),
        Err(e) => Err(e.into()),
    }
}
