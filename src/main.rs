//! Orakl CLI
//!
//! Usage:
//!   orakl -q "Should I take the job?" -s "Butterfly appeared" -s "Rainbow appeared"
//!   orakl -q "..." -s "..." --json          # Full evaluation as JSON
//!   orakl -q "..." -s "..." --prompt        # Print the rendered prompt
//!   orakl -q "..." -s "..." --generate      # Call the text generator too
//!   orakl --serve [--addr 0.0.0.0:3000]     # HTTP API server

use clap::Parser;
use colored::{ColoredString, Colorize};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::error;
use tracing_subscriber::EnvFilter;

use orakl::config::Config;
use orakl::core::{
    generate_reading, run_server, AnthropicGenerator, AppState, FileReadingStore,
    MemoryReadingStore, Oracle, ReadingStore,
};
use orakl::types::{Lean, ReadingPlan, ReadingRequest};
use orakl::{OraklError, JOURNEY_DAYS, VERSION};

#[derive(Parser, Debug)]
#[command(
    name = "orakl",
    version = VERSION,
    about = "The Orakl - interpret signs from the universe into a verdict",
    long_about = "The Orakl weighs the signs you noticed against your question and\n\
                  decides a lean before any text is written.\n\n\
                  Leans:\n  \
                  YES          - The signs align positively\n  \
                  NO           - The signs carry warnings\n  \
                  WAIT         - Timing is not right or signals are mixed\n  \
                  INSUFFICIENT - Not enough signs to speak clearly"
)]
struct Args {
    /// The question to ask
    #[arg(short, long)]
    question: Option<String>,

    /// A sign you noticed (repeatable)
    #[arg(short, long = "sign")]
    signs: Vec<String>,

    /// Deep Reading (5-day synthesis)
    #[arg(long)]
    deep: bool,

    /// Days covered by a Deep Reading
    #[arg(long, default_value_t = JOURNEY_DAYS)]
    days: u8,

    /// Output as JSON
    #[arg(long)]
    json: bool,

    /// Print the rendered prompt
    #[arg(long)]
    prompt: bool,

    /// Disable colors in output
    #[arg(long)]
    no_color: bool,

    /// Call the text generator for a full reading
    #[arg(short, long)]
    generate: bool,

    /// Run as HTTP API server
    #[arg(long)]
    serve: bool,

    /// Server address (overrides config)
    #[arg(long)]
    addr: Option<String>,

    /// Path to orakl.toml
    #[arg(long, default_value = orakl::config::CONFIG_PATH)]
    config: PathBuf,

    /// Keep readings in memory only
    #[arg(long)]
    no_persist: bool,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("orakl=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    if args.no_color {
        colored::control::set_override(false);
    }

    if let Err(e) = run(&args).await {
        error!("[{}] {}", e.code(), e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(args: &Args) -> Result<(), OraklError> {
    let config = Config::load(&args.config)?;
    let oracle = Oracle::from_config(&config)?;

    if args.serve {
        return run_serve(args, &config, oracle).await;
    }

    let Some(question) = &args.question else {
        return Err(OraklError::InvalidRequest(
            "--question is required (or use --serve)".to_string(),
        ));
    };

    let mut request = ReadingRequest::new(question.clone(), args.signs.clone());
    if args.deep {
        request = request.deep(args.days);
    }
    let plan = oracle.evaluate(&request);

    if args.generate {
        return run_generate(args, &config, &plan).await;
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        print_plan(&plan);
    }
    if args.prompt {
        println!();
        println!("{}", plan.prompt);
    }
    Ok(())
}

fn reading_store(args: &Args, config: &Config) -> Option<Arc<dyn ReadingStore>> {
    if args.no_persist {
        Some(Arc::new(MemoryReadingStore::new()))
    } else if config.store.enabled {
        Some(Arc::new(FileReadingStore::new(config.store.dir.clone())))
    } else {
        None
    }
}

async fn run_generate(args: &Args, config: &Config, plan: &ReadingPlan) -> Result<(), OraklError> {
    let generator = AnthropicGenerator::from_config(&config.generator)?;
    let store = reading_store(args, config);
    let outcome = generate_reading(plan, &generator, store.as_deref()).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    print_plan(plan);
    println!();
    println!("{}", outcome.reading);
    println!();
    println!("{}", lean_color(plan.verdict.final_lean, &outcome.verdict).bold());
    if let Some(id) = outcome.id {
        println!("{}", format!("Saved as {}", id).dimmed());
    }
    Ok(())
}

async fn run_serve(args: &Args, config: &Config, oracle: Oracle) -> Result<(), OraklError> {
    let generator = AnthropicGenerator::from_config(&config.generator)?;
    let state = Arc::new(AppState::new(oracle, Arc::new(generator), reading_store(args, config)));
    let addr = args.addr.clone().unwrap_or_else(|| config.server.addr.clone());

    println!("{}", format!("The Orakl API v{}", VERSION).bold());
    println!("  GET   /health               - Health check");
    println!("  GET   /signs?tier=          - Sign catalog");
    println!("  POST  /reading              - Generate a reading");
    println!("  POST  /analyze              - Deterministic plan");
    println!("  GET   /reading/:id          - Stored reading");
    println!("  POST  /journey              - Start a Deep Reading");
    println!("  GET   /journey/:id          - Journey status");
    println!("  PATCH /journey/:id          - Update journey");
    println!("  POST  /journey/:id/signs    - Log signs");
    println!("  POST  /journey/:id/reading  - Reveal the Deep Reading");
    println!();

    run_server(&addr, state).await
}

fn lean_color(lean: Lean, text: &str) -> ColoredString {
    match lean {
        Lean::Yes => text.green(),
        Lean::No => text.red(),
        Lean::Wait => text.yellow(),
        Lean::Insufficient => text.magenta(),
    }
}

fn print_plan(plan: &ReadingPlan) {
    let a = &plan.analysis;
    let v = &plan.verdict;

    println!(
        "{} {} ({:.0}%)",
        "Verdict:".bold(),
        lean_color(v.final_lean, &v.final_lean.as_str().to_uppercase()).bold(),
        v.final_confidence
    );
    println!(
        "  question: {} / {} / urgency {} / {}",
        a.question_type,
        a.domain,
        a.urgency.as_str(),
        a.sentiment.as_str()
    );
    println!(
        "  weights:  +{} -{} ~{} ({} neutral)",
        plan.weights.positive_score,
        plan.weights.negative_score,
        plan.weights.wait_score,
        plan.weights.neutral_count
    );
    println!(
        "  rule:     {} - {}",
        plan.weight_lean.rule.code(),
        plan.weight_lean.reasoning
    );
    if !plan.sign_check.sufficient {
        println!("  {}", plan.sign_check.reason.dimmed());
    }
    for combo in &plan.combinations {
        println!(
            "  combo:    {} (power {}, {})",
            combo.name.cyan(),
            combo.power_level,
            combo.verdict_lean
        );
    }
    if v.combination_applied {
        println!("  {}", "combination override applied".dimmed());
    }
    println!("  template: {} ({} tokens)", plan.template.as_str(), plan.max_output_tokens);
}
