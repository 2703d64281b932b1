use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use planetvote::config::AppConfig;
use planetvote::kernel::catalog::{self, Bundle};
use planetvote::kernel::display::Roster;
use planetvote::kernel::quiz::{recommend, QuizAnswers, QuizSubmission, Tier, QUESTION_COUNT};
use planetvote::kernel::reactor::VoteReactor;
use planetvote::kernel::telemetry::DeliveryStats;
use planetvote::kernel::vote::{Relay, VoteNotice, VoterInfo};
use planetvote::services::{ApiClient, DisabledRelay, RelayFrame, WsRelay};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(name = "planetvote")]
#[command(about = "Extension bundle quiz and combo voting client")]
#[command(version)]
struct Cli {
    /// TOML config file
    #[arg(short, long, env = "PLANETVOTE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Answer the quiz and print the recommended bundle
    Recommend(RecommendArgs),
    /// List the bundle catalog
    Catalog {
        /// Show a single bundle
        #[arg(long)]
        id: Option<u8>,
    },
    /// Vote for extensions, one name per stdin line
    Vote(VoterArgs),
    /// Show the extension vote leaderboard
    Display {
        /// Rows to print
        #[arg(long, default_value_t = 10)]
        top: usize,
        /// Keep running, applying live launches and periodic refreshes
        #[arg(long)]
        watch: bool,
    },
}

#[derive(Args, Debug)]
struct VoterArgs {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    job: Option<String>,
}

impl VoterArgs {
    fn voter(&self) -> VoterInfo {
        VoterInfo::new(
            self.name.clone().unwrap_or_default(),
            self.job.clone().unwrap_or_default(),
        )
    }
}

#[derive(Args, Debug)]
struct RecommendArgs {
    #[arg(long)]
    experience: Option<String>,
    #[arg(long)]
    tech_field: Option<String>,
    #[arg(long)]
    project_scale: Option<String>,
    #[arg(long)]
    dev_style: Option<String>,
    #[arg(long)]
    visual_style: Option<String>,
    #[arg(long)]
    focus_area: Option<String>,

    /// Post the result to the backend
    #[arg(long)]
    submit: bool,

    #[command(flatten)]
    voter: VoterArgs,
}

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to install tracing subscriber")?;

    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;

    match cli.command {
        Command::Recommend(args) => run_recommend(args, &config).await,
        Command::Catalog { id } => run_catalog(id),
        Command::Vote(args) => run_vote(args, &config).await,
        Command::Display { top, watch } => run_display(top, watch, &config).await,
    }
}

async fn run_recommend(args: RecommendArgs, config: &AppConfig) -> Result<()> {
    let started_at = Utc::now();
    let given = [
        args.experience.as_deref(),
        args.tech_field.as_deref(),
        args.project_scale.as_deref(),
        args.dev_style.as_deref(),
        args.visual_style.as_deref(),
        args.focus_area.as_deref(),
    ];

    let mut answers = QuizAnswers::default();
    for (index, value) in (1..=QUESTION_COUNT).zip(given) {
        if let Some(value) = value {
            answers.set(index, value).with_context(|| format!("Question {index}"))?;
        }
    }

    let missing = QUESTION_COUNT as usize - answers.answered();
    if missing > 0 {
        tracing::info!("Auto-filling {} unanswered questions", missing);
        answers.fill_missing(&mut rand::thread_rng());
    }

    let recommendation = recommend(&answers);
    let bundle = catalog::bundle(recommendation.bundle);

    for (question, value) in answers.to_raw() {
        println!("  {question}: {value}");
    }
    match recommendation.tier {
        Tier::Override { rule } => println!("Matched override rule {rule}"),
        Tier::Secondary { rule } => println!("Matched secondary rule {rule}"),
        Tier::Weighted(scores) => println!("Weighted scores: {:?}", scores.as_array()),
    }
    print_bundle(bundle);

    if args.submit {
        let api = ApiClient::new(&config.api)?;
        let submission = QuizSubmission::new(&answers, args.voter.voter(), Some(started_at), Utc::now());
        if api.submit_quiz(&submission).await.is_err() {
            println!("(quiz result was not saved, the recommendation above still stands)");
        }
    }

    Ok(())
}

fn run_catalog(id: Option<u8>) -> Result<()> {
    match id {
        Some(id) => print_bundle(catalog::lookup(id)?),
        None => {
            for bundle in catalog::bundles() {
                print_bundle(bundle);
            }
        }
    }
    Ok(())
}

fn print_bundle(bundle: &Bundle) {
    println!("\n{} #{} {}", bundle.emoji, bundle.id, bundle.name);
    println!("   {}", bundle.description);
    for extension in &bundle.extensions {
        println!("   {} {} [{}]", extension.icon, extension.name, extension.id());
        println!("      {}", extension.description);
    }
}

async fn run_vote(args: VoterArgs, config: &AppConfig) -> Result<()> {
    let api = Arc::new(ApiClient::new(&config.api)?);

    let mut ws = None;
    let relay: Arc<dyn Relay> = if config.relay.enabled {
        let (relay, task) = WsRelay::spawn(&config.relay);
        let relay = Arc::new(relay);
        ws = Some((Arc::clone(&relay), task));
        relay
    } else {
        Arc::new(DisabledRelay)
    };

    let (handle, mut notices, session) = VoteReactor::spawn(config.vote.clone(), api, relay);
    let voter = args.voter();

    println!("Type an extension name and press Enter to vote. Ctrl+D or Ctrl+C to finish.");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            line = lines.next_line() => match line.context("Failed to read stdin")? {
                Some(line) => {
                    let name = line.trim();
                    if name.is_empty() {
                        continue;
                    }
                    let receipt = handle.cast(name, voter.clone()).await?;
                    match receipt.label {
                        Some(label) => println!("🚀 {} voted {} {}", receipt.display_name, receipt.extension_id, label),
                        None => println!("🚀 {} voted {}", receipt.display_name, receipt.extension_id),
                    }
                }
                None => break,
            },
            Some(notice) = notices.recv() => print_notice(&notice),
            _ = &mut ctrl_c => {
                tracing::info!("Ctrl+C received, flushing pending votes");
                break;
            }
        }
    }

    let stats = handle.shutdown().await?;
    session.await.context("Vote session task failed")?;
    while let Ok(notice) = notices.try_recv() {
        print_notice(&notice);
    }

    if let Some((relay, task)) = ws {
        relay.close();
        task.await.context("Relay task failed")?;
    }

    print_stats(&stats);
    Ok(())
}

/// Pulls counts and totals from the backend. Failures leave the roster as it was.
async fn refresh(api: &ApiClient, roster: &mut Roster) -> bool {
    let changed = match api.extensions().await {
        Ok(remote) => roster.merge(&remote),
        Err(e) => {
            tracing::warn!("Could not load extension counts: {}", e);
            return false;
        }
    };
    match api.stats().await {
        Ok(stats) => tracing::debug!("Backend totals: {:?}", stats.total_votes),
        Err(e) => tracing::debug!("Stats unavailable: {}", e),
    }
    changed > 0
}

async fn run_display(top: usize, watch: bool, config: &AppConfig) -> Result<()> {
    let api = ApiClient::new(&config.api)?;
    let mut roster = Roster::from_catalog();

    refresh(&api, &mut roster).await;
    print_ranking(&roster, top);
    if !watch {
        return Ok(());
    }

    let mut ws = None;
    let mut frames = None;
    if config.relay.enabled {
        let (relay, rx, task) = WsRelay::watch(&config.relay);
        ws = Some((relay, task));
        frames = Some(rx);
    }

    let mut ticker = tokio::time::interval(config.display.refresh_interval());
    ticker.tick().await;
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            frame = async {
                match frames.as_mut() {
                    Some(rx) => rx.recv().await,
                    None => std::future::pending().await,
                }
            } => match frame {
                Some(RelayFrame::LaunchRocket { extension_id, voter_name }) => {
                    match roster.record_launch(&extension_id) {
                        Some(votes) => {
                            println!("🚀 {voter_name} launched a rocket for {extension_id} ({votes})");
                            print_ranking(&roster, top);
                        }
                        None => tracing::debug!("Launch for {} is not on the roster", extension_id),
                    }
                }
                Some(RelayFrame::Stats(_)) => {}
                None => frames = None,
            },
            _ = ticker.tick() => {
                if refresh(&api, &mut roster).await {
                    print_ranking(&roster, top);
                }
            }
            _ = &mut ctrl_c => break,
        }
    }

    if let Some((relay, task)) = ws {
        relay.close();
        task.await.context("Relay task failed")?;
    }
    Ok(())
}

fn print_ranking(roster: &Roster, top: usize) {
    println!("\n🪐 {} votes in total", roster.total_votes());
    for (place, standing) in roster.ranking().into_iter().take(top).enumerate() {
        println!("{:>3}. {} {:<24} {}", place + 1, standing.icon, standing.name, standing.votes);
    }
}

fn print_notice(notice: &VoteNotice) {
    match notice {
        VoteNotice::DeliveryDegraded { batch_size, reason } => {
            println!("⚠️  Batch of {batch_size} votes failed ({reason}), sending one by one")
        }
        VoteNotice::VoteLost { event, reason } => {
            println!("⚠️  Vote for {} was not recorded: {}", event.extension_id, reason)
        }
    }
}

fn print_stats(stats: &DeliveryStats) {
    println!(
        "\n{} votes, best combo {}x, {} delivered, {} lost ({} batches, {} fell back)",
        stats.votes, stats.max_combo, stats.delivered, stats.lost, stats.batches, stats.fallbacks
    );
}
