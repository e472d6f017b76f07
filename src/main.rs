mod api;
mod server;

use clap::{Args, Parser, Subcommand};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use venture_sim::config::{self, SimConfig};
use venture_sim::ideas::IdeaCatalog;
use venture_sim::store::{Scenario, ScenarioInput, Workspace};
use venture_sim::{
    compose, format_number, Allocation, MarketingChannel, RngJitter, SimError, SimResult,
    SimulationResult, TeamRole, ViabilityTier,
};

#[derive(Parser)]
#[command(name = "venture-sim", about = "Startup idea viability simulator")]
struct Cli {
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Score an idea, budget, team and allocation.
    Simulate(SimulateArgs),
    /// Saved scenario history.
    #[command(subcommand)]
    Scenarios(ScenariosCommand),
    /// List idea cards, optionally filtered by tag.
    Ideas(IdeasArgs),
    /// Starred idea titles.
    #[command(subcommand)]
    Favorites(FavoritesCommand),
    /// Leave a message through the contact form.
    Contact(ContactArgs),
    /// Show the result of the most recent simulation.
    LastRun,
    /// Serve the JSON API and the static web page.
    Serve(ServeArgs),
    /// Write a starter config file with the built-in idea catalog.
    InitConfig {
        #[arg(long)]
        force: bool,
    },
}

#[derive(Args, Debug, Clone)]
struct SimulateArgs {
    /// Idea id; defaults to the first catalog entry.
    #[arg(long)]
    idea: Option<String>,
    #[arg(long, default_value_t = 50_000.0, allow_negative_numbers = true)]
    budget: f64,
    #[arg(long, default_value_t = 40.0, allow_negative_numbers = true)]
    dev: f64,
    #[arg(long, default_value_t = 35.0, allow_negative_numbers = true)]
    mkt: f64,
    #[arg(long, default_value_t = 25.0, allow_negative_numbers = true)]
    ops: f64,
    #[arg(long = "team")]
    team: Vec<String>,
    #[arg(long, default_value = "hybrid")]
    marketing: String,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long)]
    save: bool,
    #[arg(long)]
    details: bool,
}

impl Default for SimulateArgs {
    fn default() -> Self {
        Self {
            idea: None,
            budget: 50_000.0,
            dev: 40.0,
            mkt: 35.0,
            ops: 25.0,
            team: Vec::new(),
            marketing: "hybrid".to_string(),
            seed: None,
            save: false,
            details: false,
        }
    }
}

#[derive(Subcommand)]
enum ScenariosCommand {
    /// Most recently saved scenarios, newest first.
    List {
        #[arg(long)]
        limit: Option<usize>,
    },
    Show {
        id: u64,
    },
    /// Keep only the newest scenarios.
    Prune {
        #[arg(long)]
        retain: usize,
    },
}

#[derive(Args, Debug, Clone)]
struct IdeasArgs {
    #[arg(long, default_value = "all")]
    tag: String,
}

#[derive(Subcommand)]
enum FavoritesCommand {
    /// Star an idea by id or title.
    Add { idea: String },
    List,
}

#[derive(Args, Debug, Clone)]
struct ContactArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    message: String,
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    #[arg(long)]
    host: Option<String>,
    #[arg(long)]
    port: Option<u16>,
    #[arg(long)]
    web_root: Option<String>,
}

#[tokio::main]
async fn main() {
    load_dotenv();
    init_tracing();
    if let Err(err) = run().await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

async fn run() -> SimResult<()> {
    let cli = Cli::parse();
    if let Some(Command::InitConfig { force }) = cli.command {
        return run_init_config(cli.config, force);
    }
    let (config, config_path) = SimConfig::load(cli.config)?;
    if config_path.exists() {
        info!(path = %config_path.display(), "loaded config");
    }
    let workspace = Workspace::open(config.storage.data_dir.clone());
    let catalog = config.catalog();
    let command = cli
        .command
        .unwrap_or(Command::Simulate(SimulateArgs::default()));

    match command {
        Command::Simulate(args) => run_simulate(args, &config, &catalog, &workspace),
        Command::Scenarios(command) => run_scenarios(command, &config, &catalog, &workspace),
        Command::Ideas(args) => run_ideas(args, &catalog, &workspace),
        Command::Favorites(command) => run_favorites(command, &catalog, &workspace),
        Command::Contact(args) => run_contact(args, &workspace),
        Command::LastRun => run_last_run(&workspace),
        Command::Serve(args) => server::serve(args, config, catalog, workspace).await,
        Command::InitConfig { .. } => Ok(()),
    }
}

fn run_init_config(path: Option<PathBuf>, force: bool) -> SimResult<()> {
    let path = config::resolve_path(path);
    SimConfig::starter().write(&path, force)?;
    info!(path = %path.display(), "wrote starter config");
    println!("Wrote {}.", path.display());
    Ok(())
}

fn run_simulate(
    args: SimulateArgs,
    config: &SimConfig,
    catalog: &IdeaCatalog,
    workspace: &Workspace,
) -> SimResult<()> {
    let idea_id = match args.idea {
        Some(idea) => idea,
        None => catalog
            .first()
            .map(|idea| idea.id.clone())
            .ok_or_else(|| SimError::invalid("no idea selected"))?,
    };
    let team = parse_team(&args.team)?;
    let marketing = MarketingChannel::from_str(&args.marketing)
        .ok_or_else(|| SimError::invalid(format!("invalid marketing channel: {}", args.marketing)))?;
    let allocation = Allocation::new(args.dev, args.mkt, args.ops);
    let input = catalog.input_for(&idea_id, args.budget, allocation, team, marketing)?;

    let mut jitter = RngJitter::from_seed(args.seed.or(config.jitter.seed));
    let result = compose(&input, &mut jitter)?;

    // A broken cache must not hide the score.
    if let Err(err) = workspace.last_run.store(&result) {
        warn!(error = %err, "failed to cache last run");
    }

    let title = catalog
        .get(&input.idea_id)
        .map(|idea| idea.title.as_str())
        .unwrap_or(input.idea_id.as_str());
    println!(
        "Viability score: {}/100 ({})",
        result.composite_score,
        result.tier().label()
    );
    println!(
        "Idea: {} | Budget: {} PKR | Team: {} | Marketing: {}",
        title,
        format_number(input.budget),
        team_label(input.team.iter().copied()),
        input.marketing.label()
    );
    print_breakdown(&result);

    if args.details {
        println!(
            "\nAllocation: dev {}% | mkt {}% | ops {}% (total {}%)",
            input.allocation.dev_pct,
            input.allocation.mkt_pct,
            input.allocation.ops_pct,
            input.allocation.total()
        );
        println!(
            "Sub-score total before jitter: {}",
            result.breakdown.total()
        );
    }

    print_tips(&result);

    if args.save {
        let scenario = workspace
            .scenarios
            .save(ScenarioInput::from_run(&input, &result))?;
        println!("\nSaved scenario {}.", scenario.id);
    }

    Ok(())
}

fn run_scenarios(
    command: ScenariosCommand,
    config: &SimConfig,
    catalog: &IdeaCatalog,
    workspace: &Workspace,
) -> SimResult<()> {
    match command {
        ScenariosCommand::List { limit } => {
            let limit = limit.unwrap_or(config.storage.list_limit);
            let scenarios = workspace.scenarios.list_recent(limit)?;
            if scenarios.is_empty() {
                println!("No saved scenarios.");
            }
            for scenario in scenarios {
                println!(
                    "{} | {} | {} | {}/100",
                    scenario.id,
                    scenario.created.format("%Y-%m-%d %H:%M:%S"),
                    idea_title(catalog, &scenario.idea),
                    scenario.score
                );
            }
        }
        ScenariosCommand::Show { id } => {
            let scenario = workspace.scenarios.load_by_id(id)?;
            print_scenario(catalog, &scenario);
        }
        ScenariosCommand::Prune { retain } => {
            let dropped = workspace.scenarios.prune(retain)?;
            println!("Removed {} scenario(s).", dropped);
        }
    }
    Ok(())
}

fn run_ideas(args: IdeasArgs, catalog: &IdeaCatalog, workspace: &Workspace) -> SimResult<()> {
    let favorites = workspace.favorites.list().unwrap_or_else(|err| {
        warn!(error = %err, "failed to read favourites");
        Vec::new()
    });
    for idea in catalog.filter(&args.tag) {
        let marker = if favorites.contains(&idea.title) { "*" } else { " " };
        println!(
            "{} {} | {} | risk {} | market {} | tags {}",
            marker,
            idea.id,
            idea.title,
            idea.risk.label(),
            idea.market,
            idea.tags.join(", ")
        );
    }
    Ok(())
}

fn run_favorites(
    command: FavoritesCommand,
    catalog: &IdeaCatalog,
    workspace: &Workspace,
) -> SimResult<()> {
    match command {
        FavoritesCommand::Add { idea } => {
            let title = catalog
                .get(&idea)
                .map(|card| card.title.clone())
                .unwrap_or(idea);
            if workspace.favorites.add(&title)? {
                println!("Saved {}.", title);
            } else {
                println!("{} is already a favourite.", title);
            }
        }
        FavoritesCommand::List => {
            for title in workspace.favorites.list()? {
                println!("{}", title);
            }
        }
    }
    Ok(())
}

fn run_contact(args: ContactArgs, workspace: &Workspace) -> SimResult<()> {
    workspace
        .contacts
        .submit(&args.name, &args.email, &args.message)?;
    println!("Message saved locally. Thank you!");
    Ok(())
}

fn run_last_run(workspace: &Workspace) -> SimResult<()> {
    match workspace.last_run.load()? {
        Some(result) => {
            println!(
                "Last score: {}/100 ({})",
                result.composite_score,
                ViabilityTier::from_score(result.composite_score).label()
            );
            print_breakdown(&result);
            print_tips(&result);
        }
        None => println!("No simulation has been run yet."),
    }
    Ok(())
}

fn print_breakdown(result: &SimulationResult) {
    println!("\nBreakdown:");
    for (label, value) in result.breakdown.entries() {
        println!("  {}: {}", label, value);
    }
}

fn print_tips(result: &SimulationResult) {
    if !result.tips.is_empty() {
        println!("\nTips:");
        for tip in &result.tips {
            println!("- {}", tip);
        }
    }
}

fn print_scenario(catalog: &IdeaCatalog, scenario: &Scenario) {
    println!("Scenario {}", scenario.id);
    println!("  Created: {}", scenario.created.to_rfc3339());
    println!("  Idea: {}", idea_title(catalog, &scenario.idea));
    println!("  Budget: {} PKR", format_number(scenario.budget));
    println!(
        "  Allocation: dev {}% | mkt {}% | ops {}%",
        scenario.allocation.dev_pct, scenario.allocation.mkt_pct, scenario.allocation.ops_pct
    );
    println!("  Team: {}", team_label(scenario.team.iter().copied()));
    println!("  Marketing: {}", scenario.marketing.label());
    println!("  Score: {}/100", scenario.score);
}

fn idea_title<'a>(catalog: &'a IdeaCatalog, idea_id: &'a str) -> &'a str {
    catalog
        .get(idea_id)
        .map(|idea| idea.title.as_str())
        .unwrap_or(idea_id)
}

fn team_label(roles: impl Iterator<Item = TeamRole>) -> String {
    let labels: Vec<&str> = roles.map(TeamRole::label).collect();
    if labels.is_empty() {
        "Founder".to_string()
    } else {
        labels.join(", ")
    }
}

fn parse_team(values: &[String]) -> SimResult<BTreeSet<TeamRole>> {
    values
        .iter()
        .flat_map(|value| value.split(','))
        .filter(|value| !value.trim().is_empty())
        .map(|value| {
            TeamRole::from_str(value)
                .ok_or_else(|| SimError::invalid(format!("invalid team role: {}", value.trim())))
        })
        .collect()
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("VENTURE_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_dotenv() {
    let _ = dotenvy::dotenv();
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    let manifest_path = Path::new(manifest_dir).join(".env");
    let _ = dotenvy::from_path(manifest_path);
}
