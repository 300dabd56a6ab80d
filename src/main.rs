use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};

use authorize::authz::{
    AuthorizationEngine, AuthzMode, Gate, LevelRegistry, Principal, RoleCatalog, Subject,
};
use authorize::AuthorizeConfig;

#[derive(Parser, Debug)]
#[command(author, version, about = "Inspect permission levels and check access", long_about = None)]
struct Cli {
    /// Authorization config (JSON); falls back to AUTHORIZE_CONFIG
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List roles as picker options, ascending by rank
    Roles {
        /// Prepend a placeholder option with this text
        #[arg(long, num_args = 0..=1, default_missing_value = authorize::authz::DEFAULT_PLACEHOLDER)]
        placeholder: Option<String>,
    },
    /// List the per-level subject scopes
    Scopes,
    /// List the configured permission tables
    Tables,
    /// Show the required level of every action in a table
    Table { name: String },
    /// Check whether a subject may perform an action (exit code 1 on deny)
    Check {
        table: String,
        action: String,
        /// Subject level, by name or rank; unset when omitted
        #[arg(long)]
        level: Option<String>,
        #[arg(long)]
        super_user: bool,
    },
}

fn main() -> anyhow::Result<ExitCode> {
    load_env();
    init_tracing();

    let cli = Cli::parse();

    let config = match cli.config.or_else(AuthorizeConfig::path_from_env) {
        Some(path) => AuthorizeConfig::from_path(&path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => AuthorizeConfig::default(),
    };
    let registry = LevelRegistry::install(config.registry()?)?;
    let catalog = RoleCatalog::new(registry);

    match cli.command {
        Commands::Roles { placeholder } => {
            let options = catalog.select_options(placeholder.is_some(), placeholder.as_deref());
            for option in options {
                let value = option.value.map(|rank| rank.to_string()).unwrap_or_default();
                println!("{:<8} {}", value, option.label);
            }
        }
        Commands::Scopes => {
            for scope in catalog.scopes() {
                println!("{:<20} role >= {}", scope.name, scope.min_rank);
            }
        }
        Commands::Tables => {
            for name in config.table_names() {
                println!("{name}");
            }
        }
        Commands::Table { name } => {
            let table = config.table(registry, &name)?;
            println!("{:<24} {}", "Action", "Required");
            for (action, level) in table.iter() {
                println!("{:<24} {}", action, level);
            }
            println!("{:<24} {}", "(default)", table.default_level());
        }
        Commands::Check {
            table,
            action,
            level,
            super_user,
        } => {
            let table = config.table(registry, &table)?;
            let mut subject = Principal::anonymous().with_super_user(super_user);
            if let Some(level) = level {
                let rank = match level.trim().parse::<i64>() {
                    Ok(rank) => rank,
                    Err(_) => registry.resolve(&level)?.rank,
                };
                subject = subject.with_level(rank);
            }

            let required = table.required_level(&action).clone();
            let gate = Gate::new(AuthorizationEngine::new(registry), table)
                .with_mode(AuthzMode::from_env())
                .on_denied(|subject, action| {
                    tracing::warn!(action = %action, level = ?subject.level(), "access denied");
                });
            let allowed = gate.check(&subject, &action);
            println!(
                "{} {} `{}` (requires {}, mode {})",
                catalog.role_name(&subject),
                if allowed { "may" } else { "may not" },
                action,
                required,
                gate.mode().as_str()
            );
            if !allowed {
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn load_env() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

    let crate_env = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join(".env");
    let _ = dotenvy::from_path(crate_env);
}

fn init_tracing() {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    let filter_layer = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}
