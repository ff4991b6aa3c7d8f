//! CLI entry point: wires the pipeline together for one CI invocation.

use std::process::ExitCode;

use clap::Parser;

use flagref::config::Settings;
use flagref::styling::{eprintln, println, success_message, warning_message};
use flagref::{flags, parse, search, serialize, sink};

/// Scan a working tree for feature-flag code references and publish them.
#[derive(Parser, Debug)]
#[command(name = "flagref", version, about)]
struct Cli {
    /// Workspace directory to scan.
    #[arg(long)]
    dir: Option<String>,

    /// Project key identifying which flag list to fetch.
    #[arg(long)]
    proj_key: Option<String>,

    /// Number of context lines around each match, in [-1, 5].
    #[arg(long)]
    context_lines: Option<i64>,

    /// Regex of paths to exclude from the scan.
    #[arg(long)]
    exclude: Option<String>,

    /// Base URL of the flag management service.
    #[arg(long)]
    base_uri: Option<String>,

    /// Access token for the flag management service.
    #[arg(long)]
    access_token: Option<String>,

    /// Repository identifier used to namespace the published payload.
    #[arg(long)]
    repo_name: Option<String>,

    /// Compute the payload but do not publish it; print it to stdout instead.
    #[arg(long)]
    dry_run: bool,

    /// Increase log verbosity (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl From<Cli> for Settings {
    fn from(cli: Cli) -> Self {
        Settings {
            dir: cli.dir,
            proj_key: cli.proj_key,
            context_lines: cli.context_lines,
            exclude: cli.exclude,
            base_uri: cli.base_uri,
            access_token: cli.access_token,
            repo_name: cli.repo_name,
            dry_run: cli.dry_run,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "off",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let settings: Settings = cli.into();
    let ctx = settings.layered_over_env().resolve()?;

    log::info!(
        "workspace resolved: {} @ {} ({})",
        ctx.workspace.display(),
        ctx.branch,
        &ctx.sha[..12.min(ctx.sha.len())]
    );

    let known_flags = flags::fetch_flags(&ctx)?;
    log::info!("{} flags fetched for project {}", known_flags.len(), ctx.proj_key);
    if known_flags.is_empty() {
        eprintln!(
            "{}",
            warning_message(format!(
                "project {} has no known flags; the scan will find nothing to publish",
                ctx.proj_key
            ))
        );
    }

    let raw = search::search(&ctx.workspace, &known_flags, ctx.context_lines)?;

    let workspace_prefix = ctx.workspace.display().to_string();
    let lines = parse::generate_references_from_grep(
        &raw,
        &known_flags,
        &workspace_prefix,
        ctx.exclude.as_ref(),
        ctx.context_lines,
    );
    log::info!("searcher returned {} usable records", lines.len());

    let reps = serialize::make_reference_hunks_reps(lines, ctx.context_lines, &ctx.proj_key);
    let hunk_count: usize = reps.iter().map(|r| r.hunks.len()).sum();
    log::info!("{} paths / {} hunks produced", reps.len(), hunk_count);

    if ctx.dry_run {
        let payload = serde_json::to_string_pretty(&reps).expect("payload serializes to JSON");
        println!("{payload}");
    } else {
        sink::publish(&ctx, &reps)?;
        log::info!("payload published for {}@{}", ctx.repo_name, ctx.branch);
    }

    println!(
        "{}",
        success_message(format!("{} paths, {} hunks", reps.len(), hunk_count))
    );

    Ok(())
}
