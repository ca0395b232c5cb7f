mod logic;
mod util;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tycoon_game::EngineConfig;

use logic::{BotStrategy, LogicTester, RunPlan, ScenarioResult};
use util::{parse_seeds, split_csv};

#[derive(Debug, Parser)]
#[command(name = "tycoon-tester", version = "0.1.0")]
#[command(about = "Automated QA for Gym Tycoon - seeded bot playthroughs with invariant checks")]
struct Args {
    /// Bots to run (comma-separated, or "all")
    #[arg(long, default_value = "all")]
    bots: String,

    /// List all available bots and exit
    #[arg(long)]
    list_bots: bool,

    /// Seeds to run (comma-separated)
    #[arg(long, default_value = "1337")]
    seeds: String,

    /// Simulated days per playthrough
    #[arg(long, default_value_t = 14)]
    days: u32,

    /// Number of iterations per bot and seed
    #[arg(long, default_value_t = 1)]
    iterations: usize,

    /// Skip every Nth day to exercise streak resets
    #[arg(long)]
    skip_every: Option<u32>,

    /// JSON file overriding the engine tuning
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["json", "markdown", "console"])]
    report: String,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if maybe_list_bots(&args)? {
        return Ok(());
    }

    announce_banner();

    let start_time = Instant::now();
    let bots = expand_bots(&args.bots)?;
    let seeds = parse_seeds(&split_csv(&args.seeds))?;
    let plan = RunPlan {
        days: args.days,
        skip_every: args.skip_every,
        engine_config: load_engine_config(args.config.as_deref())?,
    };

    let results = run_bots(&args, plan, &bots, &seeds);
    write_reports(&args, &results, start_time)?;

    if results.iter().any(|r| !r.passed) {
        std::process::exit(1);
    }
    Ok(())
}

fn maybe_list_bots(args: &Args) -> Result<bool> {
    if !args.list_bots {
        return Ok(false);
    }
    let mut output_target = OutputTarget::new(args.output.clone())?;
    writeln!(output_target.writer(), "Available bots:")?;
    for strategy in BotStrategy::ALL {
        writeln!(
            output_target.writer(),
            "  {:10} - {}",
            strategy.key(),
            strategy.description()
        )?;
    }
    output_target.flush_inner()?;
    Ok(true)
}

fn announce_banner() {
    println!("{}", "🎮 Gym Tycoon Automated Tester".bright_cyan().bold());
    println!("{}", "================================".cyan());
}

fn expand_bots(bots_arg: &str) -> Result<Vec<BotStrategy>> {
    let mut bots = Vec::new();
    for token in split_csv(bots_arg) {
        if token.eq_ignore_ascii_case("all") {
            bots.extend_from_slice(BotStrategy::ALL);
        } else {
            bots.push(token.parse::<BotStrategy>()?);
        }
    }
    bots.dedup();
    Ok(bots)
}

fn load_engine_config(path: Option<&Path>) -> Result<EngineConfig> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    EngineConfig::from_json(&raw).with_context(|| format!("invalid config in {}", path.display()))
}

fn run_bots(
    args: &Args,
    plan: RunPlan,
    bots: &[BotStrategy],
    seeds: &[u64],
) -> Vec<ScenarioResult> {
    println!("{}", "🧠 Running Bot Playthroughs".bright_yellow().bold());
    println!("{}", "-".repeat(30).yellow());

    let tester = LogicTester::new(plan, args.verbose);
    bots.iter()
        .flat_map(|&strategy| tester.run_bot(strategy, seeds, args.iterations))
        .collect()
}

fn write_reports(args: &Args, results: &[ScenarioResult], start_time: Instant) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;

    match args.report.as_str() {
        "json" => logic::reports::generate_json_report(&mut output_target, results)?,
        "markdown" => {
            if results.is_empty() {
                writeln!(
                    &mut output_target,
                    "# Gym Tycoon Bot Test Results\n\n_No runs executed._"
                )?;
            } else {
                logic::reports::generate_markdown_report(&mut output_target, results)?;
            }
        }
        _ => {
            if results.is_empty() {
                writeln!(&mut output_target, "No bot runs executed.")?;
            } else {
                logic::reports::generate_console_report(
                    &mut output_target,
                    results,
                    start_time.elapsed(),
                )?;
            }
        }
    }

    if args.report != "json" {
        let duration = start_time.elapsed();
        writeln!(&mut output_target)?;
        writeln!(&mut output_target, "🏁 Total time: {duration:?}")?;
    }
    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}
