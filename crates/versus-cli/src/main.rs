//! Versus CLI: compare anything with an LLM-generated radar chart and table.

mod report;

use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use versus_core::radar::{PolarProjector, RadialProjector};
use versus_core::render::radar_svg;
use versus_core::session::{Phase, Session};
use versus_core::{
    ai_configured, normalize, read_settings_file, settings_path, write_settings, ComparisonResult,
    MAX_ITEMS,
};

/// How long the "understanding context" phase is shown before switching to "comparing".
const ANALYZING_PAUSE: Duration = Duration::from_millis(1500);

/// Versus: side-by-side comparisons of anything, scored by an LLM
#[derive(Parser, Debug)]
#[command(name = "versus", version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Ask the model to compare 2-4 items
    Compare {
        /// Items to compare
        #[arg(required = true)]
        items: Vec<String>,

        #[command(flatten)]
        output: OutputArgs,

        /// LLM provider (openai, anthropic, google, ollama, groq, mistral, deepseek)
        #[arg(long)]
        provider: Option<String>,

        /// Model name
        #[arg(short, long)]
        model: Option<String>,
    },
    /// Render a saved comparison payload without calling the model
    Render {
        /// JSON file to read, or `-` for stdin
        file: PathBuf,

        /// Number of items the comparison was requested for
        #[arg(long, default_value_t = MAX_ITEMS)]
        items: usize,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Print the structured-output schema sent to the model
    Schema,
    /// Show the saved AI settings, or update them when any flag is given
    Config(ConfigArgs),
}

#[derive(clap::Args, Debug)]
struct ConfigArgs {
    /// LLM provider to save
    #[arg(long)]
    provider: Option<String>,

    /// Model name to save
    #[arg(long)]
    model: Option<String>,

    /// API key to save
    #[arg(long)]
    api_key: Option<String>,

    /// Sampling temperature to save
    #[arg(long)]
    temperature: Option<f32>,

    /// Per-attempt timeout in seconds to save
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Retries for transient failures to save
    #[arg(long)]
    max_retries: Option<u32>,
}

#[derive(clap::Args, Debug)]
struct OutputArgs {
    /// Write the radar chart to this SVG file
    #[arg(long)]
    svg: Option<PathBuf>,

    /// Print the normalized comparison as JSON instead of a table
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Compare {
            items,
            output,
            provider,
            model,
        } => compare(items, provider, model, &output).await,
        Command::Render {
            file,
            items,
            output,
        } => render_file(&file, items, &output),
        Command::Schema => {
            println!("{}", serde_json::to_string_pretty(&versus_core::response_schema())?);
            Ok(())
        }
        Command::Config(args) => configure(args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

async fn compare(
    items: Vec<String>,
    provider: Option<String>,
    model: Option<String>,
    output: &OutputArgs,
) -> anyhow::Result<()> {
    let mut settings = versus_core::read_settings()?;
    if let Some(provider) = provider {
        settings.provider = provider;
    }
    if let Some(model) = model {
        settings.model = model;
    }
    if !ai_configured(&settings) {
        bail!(
            "no AI provider configured: set VERSUS_PROVIDER, VERSUS_MODEL and VERSUS_API_KEY, or edit {}",
            settings_path().display()
        );
    }

    let mut session = Session::new();
    for (i, item) in items.iter().enumerate() {
        if i >= session.items().len() && !session.add_item() {
            tracing::warn!(ignored = items.len() - i, "at most {MAX_ITEMS} items can be compared");
            break;
        }
        session.set_item(i, item.as_str());
    }

    let to_send = session.submit_comparison()?;
    report::status(session.phase());

    let request = versus_suggest::generate_comparison(&to_send, &settings);
    tokio::pin!(request);
    let outcome = tokio::select! {
        outcome = &mut request => outcome,
        _ = tokio::time::sleep(ANALYZING_PAUSE) => {
            session.begin_generating();
            report::status(session.phase());
            request.await
        }
    };

    match outcome {
        Ok(raw) => session.receive_result(&raw),
        Err(e) => session.receive_error(&e),
    }

    match (session.phase(), session.result()) {
        (Phase::Complete, Some(result)) => emit(result, output),
        _ => bail!(
            "{}",
            session.error().unwrap_or(versus_core::session::FAILURE_MESSAGE)
        ),
    }
}

fn configure(args: ConfigArgs) -> anyhow::Result<()> {
    let path = settings_path();
    let mut settings = read_settings_file(&path)?;
    let before = settings.clone();

    if let Some(provider) = args.provider {
        settings.provider = provider;
    }
    if let Some(model) = args.model {
        settings.model = model;
    }
    if let Some(api_key) = args.api_key {
        settings.api_key = api_key;
    }
    if let Some(temperature) = args.temperature {
        settings.temperature = temperature;
    }
    if let Some(timeout_secs) = args.timeout_secs {
        settings.timeout_secs = timeout_secs;
    }
    if let Some(max_retries) = args.max_retries {
        settings.max_retries = max_retries;
    }

    if settings != before {
        write_settings(&settings)?;
        tracing::info!(path = %path.display(), "settings saved");
    }

    let mut shown = serde_json::to_value(&settings)?;
    if !settings.api_key.is_empty() {
        shown["api_key"] = serde_json::Value::from("********");
    }
    println!("{}", serde_json::to_string_pretty(&shown)?);
    Ok(())
}

fn render_file(path: &Path, requested: usize, output: &OutputArgs) -> anyhow::Result<()> {
    let text = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?
    };

    let raw: serde_json::Value = serde_json::from_str(&text).context("payload is not JSON")?;
    let result = normalize(&raw, requested).map_err(|e| {
        tracing::error!(kind = "schema", error = %e, "payload rejected");
        e
    })?;
    emit(&result, output)
}

fn emit(result: &ComparisonResult, output: &OutputArgs) -> anyhow::Result<()> {
    if let Some(path) = &output.svg {
        let plot = PolarProjector::default().project(result);
        std::fs::write(path, radar_svg(&plot, result))
            .with_context(|| format!("writing {}", path.display()))?;
        tracing::info!(path = %path.display(), "radar chart written");
    }

    if output.json {
        println!("{}", serde_json::to_string_pretty(result)?);
    } else {
        print!("{}", report::render(result, report::terminal_width()));
    }
    Ok(())
}
