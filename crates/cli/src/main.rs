use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cli::interactive;
use cli::render;
use pawscout_core::api::build_api;
use pawscout_core::config::{self, AppConfig};
use pawscout_core::gallery::{GalleryFilter, GallerySession};
use pawscout_core::images::collect_images;
use pawscout_core::review::ReviewSession;
use pawscout_core::session::{load_session_user, SessionUser};
use pawscout_core::shell::Shell;
use pawscout_core::sightings::{MapSession, SightingFilter};
use pawscout_core::upload::{ProgressSink, UploadFlow, UploadForm, UploadPhase};
use providers::{MatchQuery, ReportType};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tokio::io::BufReader;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Upload(args) => run_upload(cfg, args).await,
        Commands::Gallery {
            pet_type,
            status,
            search,
            json,
        } => run_gallery(cfg, pet_type, status, search, json).await,
        Commands::Search => run_search(cfg).await,
        Commands::Matches { json } => run_matches(cfg, json).await,
        Commands::Review => run_review(cfg).await,
        Commands::Map { filter } => run_map(cfg, filter).await,
        Commands::Shell => run_shell(cfg).await,
        Commands::Whoami { session } => run_whoami(cfg, session),
    }
}

#[derive(Parser)]
#[command(name = "pawscout")]
#[command(about = "Lost-and-found pet reports, matches and sightings", long_about = None)]
struct Cli {
    /// Path to config TOML
    #[arg(short, long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report a lost or found pet with one or more photos
    Upload(UploadArgs),
    /// List reported pets
    Gallery {
        /// Pet type filter, e.g. Dog or Cat
        #[arg(long = "type")]
        pet_type: Option<String>,
        /// lost or found
        #[arg(long)]
        status: Option<ReportType>,
        /// Free-text search
        #[arg(long, default_value = "")]
        search: String,
        /// Output JSON
        #[arg(long)]
        json: bool,
    },
    /// Interactive gallery search; each line replaces the query
    Search,
    /// List pending matches
    Matches {
        /// Output JSON
        #[arg(long)]
        json: bool,
    },
    /// Review pending matches one at a time
    Review,
    /// Reports grouped by location
    Map {
        /// all, lost or found
        #[arg(long, default_value = "all")]
        filter: SightingFilter,
    },
    /// Navigate between all views in one session
    Shell,
    /// Show the signed-in user
    Whoami {
        /// Session file written by the login flow
        #[arg(long)]
        session: Option<PathBuf>,
    },
}

#[derive(clap::Args)]
struct UploadArgs {
    /// lost or found
    #[arg(long = "type", default_value = "lost")]
    report_type: ReportType,
    /// Pet's name
    #[arg(long)]
    name: String,
    /// Dog, Cat, Bird, Rabbit or Other
    #[arg(long, default_value = "Dog")]
    pet_type: String,
    #[arg(long)]
    user_name: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    phone: String,
    /// Where the pet was lost or found
    #[arg(long)]
    location: String,
    #[arg(long, default_value = "")]
    description: String,
    /// Session file used to prefill name and email
    #[arg(long)]
    session: Option<PathBuf>,
    /// Image files or directories
    #[arg(required = true)]
    paths: Vec<PathBuf>,
    /// Output JSON
    #[arg(long)]
    json: bool,
}

struct StderrProgress;

impl ProgressSink for StderrProgress {
    fn on_phase(&self, phase: UploadPhase) {
        eprintln!("{}", render::phase(phase));
    }
}

fn configured_session(cfg: &AppConfig) -> Option<PathBuf> {
    cfg.session
        .path
        .as_deref()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from)
}

fn session_user(cfg: &AppConfig, explicit: Option<&Path>) -> Option<SessionUser> {
    let path = explicit
        .map(Path::to_path_buf)
        .or_else(|| configured_session(cfg))?;
    match load_session_user(&path) {
        Ok(user) => Some(user),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "could not read session");
            None
        }
    }
}

async fn run_upload(cfg: AppConfig, args: UploadArgs) -> Result<()> {
    let paths = args.paths.clone();
    let excludes = cfg.upload.exclude.clone();
    let collected = tokio::task::spawn_blocking(move || collect_images(&paths, &excludes))
        .await
        .context("image collection task")??;
    for skipped in &collected.skipped {
        eprintln!("skipping {}: {}", skipped.path.display(), skipped.reason);
    }

    let mut form = UploadForm::new();
    form.report_type = args.report_type;
    form.pet_name = args.name;
    form.pet_type = args.pet_type;
    form.user_name = args.user_name.unwrap_or_default();
    form.user_email = args.email.unwrap_or_default();
    form.user_phone = args.phone;
    form.user_location = args.location;
    form.description = args.description;
    if let Some(user) = session_user(&cfg, args.session.as_deref()) {
        form.prefill_contact(&user);
    }
    form.add_images(collected.images)?;

    let mut flow = UploadFlow::new(build_api(&cfg), &cfg.upload);
    let receipt = flow.submit(&form, &StderrProgress).await?;
    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "status": "ok",
                "report": receipt.report,
                "matches": receipt.related_matches,
            }))?
        );
    } else {
        print!("{}", render::receipt(&receipt));
    }
    Ok(())
}

async fn run_gallery(
    cfg: AppConfig,
    pet_type: Option<String>,
    status: Option<ReportType>,
    search: String,
    json: bool,
) -> Result<()> {
    let mut gallery = GallerySession::new(build_api(&cfg), &cfg.gallery);
    gallery.set_filter(GalleryFilter {
        pet_type,
        report_type: status,
        search,
    });
    gallery.refresh().await?;
    if json {
        let cards: Vec<_> = gallery.cards().iter().map(render::card_json).collect();
        println!("{}", serde_json::to_string_pretty(&cards)?);
    } else {
        print!("{}", render::gallery(gallery.state(), gallery.filter()));
    }
    Ok(())
}

async fn run_search(cfg: AppConfig) -> Result<()> {
    let mut gallery = GallerySession::new(build_api(&cfg), &cfg.gallery);
    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = io::stdout();
    interactive::search_loop(&mut gallery, stdin, cfg.gallery.debounce(), &mut stdout).await
}

async fn run_matches(cfg: AppConfig, json: bool) -> Result<()> {
    let api = build_api(&cfg);
    let matches = api
        .list_matches(&MatchQuery::pending(cfg.review.fetch_limit))
        .await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&matches)?);
    } else if matches.is_empty() {
        println!("No pending matches.");
    } else {
        let mut stdout = io::stdout().lock();
        for m in &matches {
            writeln!(stdout, "{}", render::match_line(m))?;
        }
    }
    Ok(())
}

async fn run_review(cfg: AppConfig) -> Result<()> {
    let mut session = ReviewSession::new(build_api(&cfg), &cfg.review);
    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = io::stdout();
    interactive::review_loop(&mut session, stdin, &mut stdout).await
}

async fn run_map(cfg: AppConfig, filter: SightingFilter) -> Result<()> {
    let mut map = MapSession::new(build_api(&cfg), &cfg.gallery);
    map.set_filter(filter);
    map.refresh().await?;
    print!("{}", render::clusters(&map.clusters(), map.filter()));
    Ok(())
}

async fn run_shell(cfg: AppConfig) -> Result<()> {
    let mut shell = Shell::new(build_api(&cfg), &cfg);
    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = io::stdout();
    interactive::shell_loop(&mut shell, stdin, &mut stdout).await
}

fn run_whoami(cfg: AppConfig, session: Option<PathBuf>) -> Result<()> {
    let path = session
        .or_else(|| configured_session(&cfg))
        .context("no session file configured; pass --session or set session.path")?;
    let user = load_session_user(&path)?;
    println!("{}", user.display_name());
    if let Some(email) = &user.email {
        println!("{email}");
    }
    Ok(())
}
