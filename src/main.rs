use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use registrar_bot::catalog::{PanelDirectoryCatalog, SnapshotCatalog};
use registrar_bot::context::RunContext;
use registrar_bot::error::{RegistrarError, Result};
use registrar_bot::logging;
use registrar_bot::portal::RegistrarClient;
use registrar_bot::report;
use registrar_bot::runner::{Registrar, ResolveReport};
use registrar_bot::settings::{self, Settings};
use registrar_bot::storage::LocalStorage;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;
use tracing::error;

#[derive(Parser)]
#[command(name = "registrar-bot")]
#[command(about = "Resolves a course wishlist against the registrar portal and registers it")]
#[command(version)]
struct Cli {
    /// User config with credentials, user id and courses to register
    #[arg(long, global = true, default_value = settings::DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Saved portal session (cookies and CSRF token)
    #[arg(long, global = true, default_value = settings::DEFAULT_SESSION_FILE)]
    session: PathBuf,

    /// Portal base URL
    #[arg(long, global = true, default_value = settings::DEFAULT_BASE_URL)]
    base_url: String,

    /// Skip TLS certificate verification
    #[arg(long, global = true)]
    insecure: bool,

    /// Debug-level logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct ResolveArgs {
    /// Wishlist file, one `COURSE: 1L, 2Lb` line per course
    #[arg(long, default_value = settings::DEFAULT_WISHLIST_FILE)]
    wishlist: PathBuf,

    /// JSON catalog snapshot to resolve against
    #[arg(long, conflicts_with = "panels", required_unless_present = "panels")]
    catalog: Option<PathBuf>,

    /// Directory of saved section panels (`CSCI_361.html`, ...)
    #[arg(long)]
    panels: Option<PathBuf>,

    /// Also write the fetched section data as a JSON snapshot
    #[arg(long)]
    save_catalog: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in with the config credentials and save the session
    Login,
    /// Resolve the wishlist and print what would be registered
    Resolve(ResolveArgs),
    /// Resolve the wishlist and store the result in the config
    UpdateIds(ResolveArgs),
    /// Register every course stored in the config
    Register {
        /// Add each course to the shopping cart first
        #[arg(long)]
        cart: bool,
        /// Print the requests without sending them
        #[arg(long)]
        dry_run: bool,
        /// Pause between submissions, in milliseconds
        #[arg(long, default_value_t = settings::DEFAULT_SUBMIT_DELAY_MS)]
        delay_ms: u64,
        /// Refuse sessions older than this many minutes (0 disables the check)
        #[arg(long, default_value_t = settings::DEFAULT_SESSION_MAX_AGE_MINS)]
        max_age_mins: u64,
    },
}

fn save_snapshot(path: Option<&Path>, report: &ResolveReport) -> Result<()> {
    if let Some(path) = path {
        SnapshotCatalog::save(path, &report.catalog)?;
        println!("{} {}", "💾 Catalog snapshot written to".green(), path.display());
    }
    Ok(())
}

fn resolve_context(settings: Settings, args: ResolveArgs) -> RunContext {
    let settings = Settings {
        wishlist_file: args.wishlist,
        ..settings
    };
    let context = RunContext::new(settings);
    match (args.catalog, args.panels) {
        (Some(path), _) => context.with_catalog(SnapshotCatalog::new(path)),
        (None, Some(dir)) => context.with_catalog(PanelDirectoryCatalog::new(dir)),
        (None, None) => context,
    }
}

fn run(cli: Cli) -> Result<()> {
    let settings = Settings {
        config_file: cli.config,
        session_file: cli.session,
        base_url: cli.base_url,
        accept_invalid_certs: cli.insecure,
        ..Settings::default()
    };
    let storage = LocalStorage::new(settings.config_file.clone(), settings.session_file.clone());

    match cli.command {
        Commands::Login => {
            let config = storage.load_config()?;
            let client = RegistrarClient::new(&settings.base_url, settings.accept_invalid_certs)?;
            let session = client.login(&config.credentials)?;
            storage.save_session(&session)?;
            println!("{}", "✅ Session saved.".green());
        }
        Commands::Resolve(args) => {
            let save_to = args.save_catalog.clone();
            let mut registrar = Registrar::new(resolve_context(settings, args));
            let outcome = registrar.resolve()?;
            report::print_resolution(&outcome);
            save_snapshot(save_to.as_deref(), &outcome)?;
        }
        Commands::UpdateIds(args) => {
            let save_to = args.save_catalog.clone();
            let mut registrar = Registrar::new(resolve_context(settings, args));
            let outcome = registrar.update_ids(&storage)?;
            report::print_resolution(&outcome);
            save_snapshot(save_to.as_deref(), &outcome)?;
        }
        Commands::Register {
            cart,
            dry_run,
            delay_ms,
            max_age_mins,
        } => {
            let settings = Settings {
                submit_delay: Duration::from_millis(delay_ms),
                session_max_age: settings::session_max_age_from_mins(max_age_mins),
                ..settings
            };
            let config = storage.load_config()?;
            let user_id = config.user_info.user_id.trim();
            if user_id.is_empty() || config.courses_to_register.is_empty() {
                return Err(RegistrarError::Config(
                    "user_info.user_id and courses_to_register must both be set".into(),
                ));
            }

            let mut context = RunContext::new(settings);
            if dry_run {
                context = context.enable_dry_run();
            }
            let mut registrar = Registrar::new(context);

            if registrar.context.dry_run {
                let requests = registrar.plan_requests(&config.courses_to_register, user_id);
                report::print_requests(&requests);
                return Ok(());
            }

            let session = storage.load_session(registrar.context.settings.session_max_age)?;
            if session.csrf_token.is_empty() {
                return Err(RegistrarError::Config("session data has no csrf_token".into()));
            }
            let client = RegistrarClient::new(
                &registrar.context.settings.base_url,
                registrar.context.settings.accept_invalid_certs,
            )?;
            if !client.is_session_valid(&session)? {
                return Err(RegistrarError::Portal(
                    "session is invalid or expired, run `registrar-bot login` again".into(),
                ));
            }

            let summary = registrar.register(
                &client,
                &session,
                user_id,
                &config.courses_to_register,
                cart,
            );
            report::print_course_log(registrar.context.journal());
            report::print_summary(&summary);
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("{} {}", "❌ ABORTING:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
