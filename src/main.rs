mod analyze;
mod gitea;
mod model;
mod report;
mod utils;

use crate::analyze::{collect_activity, count_daily, merge_accounts, DEFAULT_START};
use crate::gitea::{HostingQuery, Session};
use crate::model::{Account, ConfigError, Repository, Result, CREDENTIAL_FILE};
use crate::report::{AccountSummary, Overview, OverviewRequest, StreakReport};
use crate::utils::date::DISPLAY_DATE_FORMAT;
use crate::utils::{progress_group, DateConfig, MultiProgressNew, ProgressStyleTemplate, Zone};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use indicatif::ProgressBar;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug, Clone)]
#[command(version, about = "Who is working on what in a Gitea repository, and for how long")]
struct Args {
    #[arg(long = "url", env = "GITEA_URL", global = true)]
    gitea_url: Option<String>,
    #[arg(long = "credentials", default_value = CREDENTIAL_FILE, global = true)]
    credentials_path: PathBuf,
    /// IANA timezone name, or `local`
    #[arg(long, default_value = "local", global = true)]
    timezone: String,
    #[arg(long, global = true)]
    debug: bool,
    /// Hide progress spinners
    #[arg(long, global = true)]
    quiet: bool,
    /// Never write prompted credentials back to the credentials file
    #[arg(long = "no-save", global = true)]
    no_save: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// Milestones, open issues per member, recently closed issues and recent commits
    Overview {
        #[arg(long)]
        repo: Option<String>,
        /// Team member login or display name prefix
        #[arg(short, long)]
        user: Option<String>,
        /// 0 = current milestone, 1 = next one, ...
        #[arg(short, long, default_value_t = 0)]
        milestone: usize,
    },
    /// Contribution counts and streaks across one or more accounts
    Streak {
        /// JSON file of accounts: { "name": { "url": ..., "credentials": ... } }
        #[arg(long = "accounts")]
        accounts_path: Option<String>,
        #[arg(long, default_value = DEFAULT_START)]
        start: NaiveDate,
        #[arg(long, default_value = DISPLAY_DATE_FORMAT)]
        format: String,
        #[arg(long)]
        show_log: bool,
    },
}

impl Args {
    fn server_url(&self) -> std::result::Result<&str, ConfigError> {
        self.gitea_url.as_deref().ok_or(ConfigError::MissingUrl)
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.debug);
    match run(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(debug: bool) {
    let level = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("warn,{}={level}", env!("CARGO_CRATE_NAME")))
    });
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

async fn run(args: &Args) -> Result<()> {
    let zone = Zone::parse(&args.timezone)?;
    match &args.command {
        Command::Overview {
            repo,
            user,
            milestone,
        } => {
            let config = DateConfig::new(zone, DISPLAY_DATE_FORMAT);
            let request = OverviewRequest {
                user: user.clone(),
                milestone: *milestone,
            };
            overview(args, &config, repo.as_deref(), &request).await
        }
        Command::Streak {
            accounts_path,
            start,
            format,
            show_log,
        } => {
            let config = DateConfig::new(zone, format);
            streak(args, &config, accounts_path.as_deref(), *start, *show_log).await
        }
    }
}

async fn overview(
    args: &Args,
    config: &DateConfig,
    repo_name: Option<&str>,
    request: &OverviewRequest,
) -> Result<()> {
    let session = Session::login(args.server_url()?, &args.credentials_path, !args.no_save).await?;
    let repo = match repo_name {
        Some(name) => session.hosting.find_repository(name).await?,
        None => default_repository(&session).await?,
    };
    info!("Overview of {} @ {}", repo.full_name, session.hosting.url());
    Overview::new(&session.hosting, &repo, config)
        .write(request, &mut io::stdout())
        .await
}

async fn default_repository(session: &Session) -> Result<Repository> {
    let repo = session
        .hosting
        .list_repositories()
        .await?
        .into_iter()
        .find(|repo| !repo.empty)
        .ok_or_else(|| ConfigError::NoRepositories(session.login.clone()))?;
    Ok(repo)
}

async fn streak(
    args: &Args,
    config: &DateConfig,
    accounts_path: Option<&str>,
    start: NaiveDate,
    show_log: bool,
) -> Result<()> {
    let accounts = match accounts_path {
        Some(path) => Account::from_config(path)?,
        None => vec![Account::new(
            "default",
            args.server_url()?,
            args.credentials_path.clone(),
        )],
    };

    let multi_progress = progress_group(args.quiet);
    let mut activities = Vec::with_capacity(accounts.len());
    let mut summaries = Vec::with_capacity(accounts.len());
    for account in &accounts {
        let session = Session::login(&account.url, &account.credentials, !args.no_save).await?;
        let pb = multi_progress.add_with_style(
            ProgressBar::new_spinner(),
            ProgressStyleTemplate::fetch_counter(),
        );
        let activity = collect_activity(&session.hosting, &session.login, &pb).await?;
        pb.set_style(ProgressStyleTemplate::only_message());
        pb.finish_with_message(format!(
            "✅ Completed `{}` as {} (find {} contributions)",
            account.name,
            session.login,
            activity.len()
        ));
        summaries.push(AccountSummary::from_activity(&account.name, &session.login, &activity));
        activities.push(activity);
    }

    let merged = merge_accounts(activities);
    let counts = count_daily(&merged, config);
    let report = StreakReport {
        accounts: &summaries,
        counts: &counts,
        start,
        today: config.zone.date(&Utc::now()),
        show_log,
    };
    report.write(config, &mut io::stdout())
}
