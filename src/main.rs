//! PlanPay CLI - manage a PlanPay subscription from the terminal.
//!
//! Provides login/logout session management plus plan browsing and the
//! payment flow against the PlanPay service API. The session token is
//! persisted under the platform cache directory so a login survives
//! restarts.

use std::io::{self, Write};
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use planpay::api::ApiClient;
use planpay::auth::{CredentialStore, SessionManager};
use planpay::config::Config;
use planpay::storage::FileTokenStore;

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();

    let args: Vec<String> = std::env::args().collect();
    let command = args.get(1).map(String::as_str).unwrap_or("status");

    let mut config = Config::load()?;
    let api = ApiClient::new(config.resolved_api_url())?;
    let store = Arc::new(FileTokenStore::new(config.cache_dir()?));
    let session = SessionManager::new(api, store)?;

    // Re-arm the bearer header from any persisted token
    session.initialize();
    info!(authenticated = session.is_authenticated(), "PlanPay CLI starting");

    match command {
        "login" => cmd_login(&session, &mut config, args.get(2).cloned()).await,
        "register" => cmd_register(&session, args.get(2), args.get(3)).await,
        "logout" => cmd_logout(&session),
        "status" => cmd_status(&session, &config),
        "plans" => cmd_plans(&session).await,
        "subscriptions" => cmd_subscriptions(&session).await,
        "subscribe" => cmd_subscribe(&session, args.get(2)).await,
        "confirm" => cmd_confirm(&session, args.get(2)).await,
        "payment-status" => cmd_payment_status(&session, args.get(2)).await,
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {}", other);
            print_usage();
            std::process::exit(2);
        }
    }
}

fn print_usage() {
    eprintln!("Usage: planpay <command>");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  login [email]                Log in and persist the session");
    eprintln!("  register [name] [email]      Create an account");
    eprintln!("  logout                       Clear the session");
    eprintln!("  status                       Show whether a session is active");
    eprintln!("  plans                        List available subscription plans");
    eprintln!("  subscriptions                List your subscriptions");
    eprintln!("  subscribe <plan-id>          Start a payment for a plan");
    eprintln!("  confirm <payment-id>         Execute a created payment");
    eprintln!("  payment-status <payment-id>  Check a payment with the provider");
}

fn prompt_line(prompt: &str) -> Result<String> {
    print!("{}", prompt);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// Exit with a message unless a session is active
fn require_auth(session: &SessionManager) {
    if !session.is_authenticated() {
        eprintln!("Not logged in. Run `planpay login` first.");
        std::process::exit(1);
    }
}

async fn cmd_login(
    session: &SessionManager,
    config: &mut Config,
    email_arg: Option<String>,
) -> Result<()> {
    let email = match email_arg
        .or_else(|| std::env::var("PLANPAY_EMAIL").ok())
        .or_else(|| config.last_email.clone())
    {
        Some(e) => e,
        None => prompt_line("Email: ")?,
    };

    // Password source: env var, then keychain, then prompt
    let (password, from_prompt) = if let Ok(p) = std::env::var("PLANPAY_PASSWORD") {
        (p, false)
    } else if CredentialStore::has_credentials(&email) {
        (CredentialStore::get_password(&email)?, false)
    } else {
        let p = rpassword::prompt_password("Password: ").context("Failed to read password")?;
        (p, true)
    };

    match session.login(&email, &password).await {
        Ok(()) => {
            println!("Logged in as {}", email);
            config.last_email = Some(email.clone());
            config.save()?;
            if from_prompt {
                // Keychain errors are not fatal; next login prompts again
                if let Err(e) = CredentialStore::store(&email, &password) {
                    warn!(error = %e, "Could not save password to keychain");
                }
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", e.message());
            std::process::exit(1);
        }
    }
}

async fn cmd_register(
    session: &SessionManager,
    name: Option<&String>,
    email: Option<&String>,
) -> Result<()> {
    let name = match name {
        Some(n) => n.clone(),
        None => prompt_line("Name: ")?,
    };
    let email = match email {
        Some(e) => e.clone(),
        None => prompt_line("Email: ")?,
    };
    let password = rpassword::prompt_password("Password: ").context("Failed to read password")?;

    match session.register(&name, &email, &password).await {
        Ok(()) => {
            println!("Account created. Run `planpay login {}` to sign in.", email);
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", e.message());
            std::process::exit(1);
        }
    }
}

fn cmd_logout(session: &SessionManager) -> Result<()> {
    session.logout()?;
    println!("Logged out");
    Ok(())
}

fn cmd_status(session: &SessionManager, config: &Config) -> Result<()> {
    if session.is_authenticated() {
        match &config.last_email {
            Some(email) => println!("Logged in as {}", email),
            None => println!("Logged in"),
        }
    } else {
        println!("Not logged in");
    }
    Ok(())
}

async fn cmd_plans(session: &SessionManager) -> Result<()> {
    let plans = session.api().fetch_plans().await?;
    if plans.is_empty() {
        println!("No plans available");
        return Ok(());
    }
    for plan in plans {
        println!(
            "{:>3}  {:<16} {:>8.2} / {}",
            plan.id, plan.name, plan.price, plan.duration
        );
    }
    Ok(())
}

async fn cmd_subscriptions(session: &SessionManager) -> Result<()> {
    require_auth(session);
    let subs = session.api().fetch_user_subscriptions().await?;
    if subs.is_empty() {
        println!("No subscriptions");
        return Ok(());
    }
    for sub in subs {
        println!("#{:<4} plan {:<4} {}", sub.id, sub.subscription_id, sub.status);
    }
    Ok(())
}

async fn cmd_subscribe(session: &SessionManager, plan_id: Option<&String>) -> Result<()> {
    require_auth(session);
    let plan_id: i64 = plan_id
        .context("Usage: planpay subscribe <plan-id>")?
        .parse()
        .context("Plan id must be a number")?;

    let plans = session.api().fetch_plans().await?;
    let plan = plans
        .iter()
        .find(|p| p.id == plan_id)
        .with_context(|| format!("No plan with id {}", plan_id))?;

    let checkout = session.api().create_payment(plan.id, plan.price).await?;
    println!(
        "Payment #{} created for {} ({:.2})",
        checkout.payment_id, plan.name, plan.price
    );
    if let Some(url) = &checkout.checkout_url {
        println!("Complete the payment at: {}", url);
    }
    if let Some(provider_id) = &checkout.provider_payment_id {
        println!("Then run: planpay confirm {}", provider_id);
    }
    if checkout.demo_mode {
        println!("(provider sandbox unavailable - running in demo mode)");
    }
    Ok(())
}

async fn cmd_confirm(session: &SessionManager, payment_id: Option<&String>) -> Result<()> {
    require_auth(session);
    let payment_id = payment_id.context("Usage: planpay confirm <payment-id>")?;

    let outcome = session.api().execute_payment(payment_id).await?;
    if outcome.is_completed() {
        match &outcome.transaction_id {
            Some(txn) => println!("Payment completed (transaction {})", txn),
            None => println!("Payment completed"),
        }
    } else {
        println!("Payment {}", outcome.status);
    }
    Ok(())
}

async fn cmd_payment_status(session: &SessionManager, payment_id: Option<&String>) -> Result<()> {
    require_auth(session);
    let payment_id = payment_id.context("Usage: planpay payment-status <payment-id>")?;

    let status = session.api().fetch_payment_status(payment_id).await?;
    let message = status.status_message.as_deref().unwrap_or("unknown");
    if status.is_successful() {
        println!("Settled: {}", message);
    } else {
        println!("Pending: {}", message);
    }
    if let Some(txn) = &status.transaction_id {
        println!("Transaction: {}", txn);
    }
    Ok(())
}
