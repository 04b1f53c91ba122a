use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use hgs_models::check_budget_compliance;
use rust_decimal::Decimal;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "hgs", about = "Holiday Gift Savior - multi-agent gift recommendations")]
struct Cli {
    /// Path to a TOML configuration file (defaults are used when omitted)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the startup banner
    Info,

    /// List every user and their recipient profiles
    Users,

    /// Print the profile lookup result for a user as JSON
    Profiles {
        /// User id (defaults to CURRENT_USER_ID, then the configured default)
        #[arg(short, long)]
        user: Option<String>,
    },

    /// Check a gift price against a budget
    CheckBudget {
        #[arg(long)]
        price: Decimal,

        #[arg(long)]
        budget: Decimal,

        #[arg(long, default_value = "USD")]
        currency: String,
    },

    /// Ask the concierge for gift recommendations
    Ask {
        query: String,

        /// User id (defaults to CURRENT_USER_ID, then the configured default)
        #[arg(short, long)]
        user: Option<String>,

        /// Print the full gift plan as JSON instead of the reply text
        #[arg(long)]
        json: bool,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },
}

fn to_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<String> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(out)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing (respects RUST_LOG env var)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = hgs::load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Info => {
            println!("{}", hgs::banner(&config.agents));
        }
        Command::Users => {
            let store = hgs::build_profile_store(&config).context("Failed to build profile store")?;
            println!("{}", hgs::render_users(&store)?);
        }
        Command::Profiles { user } => {
            let store = hgs::build_profile_store(&config).context("Failed to build profile store")?;
            let user_id = config.active_user_id(user.as_deref());
            let lookup = store
                .lookup(&user_id)
                .with_context(|| format!("Failed to look up user: {user_id}"))?;
            println!("{}", to_json(&lookup.to_payload(), true)?);
        }
        Command::CheckBudget {
            price,
            budget,
            currency,
        } => {
            let report = check_budget_compliance(price, budget, &currency)
                .context("Budget check rejected its input")?;
            println!("{}", to_json(&report, true)?);
        }
        Command::Ask {
            query,
            user,
            json,
            pretty,
        } => {
            let store = Arc::new(
                hgs::build_profile_store(&config).context("Failed to build profile store")?,
            );
            let user_id = config.active_user_id(user.as_deref());
            info!(user_id = %user_id, researchers = config.agents.num_researchers, "Starting concierge");
            let concierge = hgs::build_concierge(&config, store, &user_id);

            let greeting = concierge
                .greeting()
                .with_context(|| format!("Failed to load profiles for user: {user_id}"))?;
            if !json {
                println!("{greeting}\n");
            }

            let reply = concierge.respond(&query).await;
            if json {
                let output = match &reply.plan {
                    Some(plan) => to_json(plan, pretty)?,
                    None => to_json(
                        &serde_json::json!({ "reply": reply.text, "degraded": reply.degraded }),
                        pretty,
                    )?,
                };
                println!("{output}");
            } else {
                println!("{}", reply.text);
            }
        }
    }

    Ok(())
}
