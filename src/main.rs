use anyhow::{Context, Result, bail};
use clap::Parser;
use std::path::{Path, PathBuf};
use trip_planner::config::Config;
use trip_planner::planner::{self, Services};
use trip_planner::trip::{TripForm, TripRequest};
use trip_planner::{build_llm_client, history, make_llm_override, output, web};

#[derive(Parser)]
#[command(
    name = "trip-planner",
    about = "AI travel planner — day-by-day itinerary, cost table, photos and weather in one page"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Serve the planner form in the browser
    Serve {
        /// Path to config file
        #[arg(short, long, default_value = "config.toml")]
        config: PathBuf,

        /// Bind address (overrides server.host)
        #[arg(long)]
        host: Option<String>,

        /// Port (overrides server.port)
        #[arg(short, long)]
        port: Option<u16>,

        /// LLM provider override: gemini, anthropic, openrouter, openai
        #[arg(long)]
        provider: Option<String>,

        /// LLM model override
        #[arg(long)]
        model: Option<String>,
    },

    /// Generate one trip plan and write it as an HTML page
    Plan {
        /// Destination city
        #[arg(short, long)]
        destination: String,

        /// City the trip starts from
        #[arg(short, long, default_value = "")]
        source: String,

        /// Number of days (1-30)
        #[arg(long, default_value_t = 3)]
        days: u32,

        /// Interests, e.g. "nature, food, history"
        #[arg(short, long, default_value = "")]
        interests: String,

        /// Travel style: Budget, Mid-range, Luxury
        #[arg(long, default_value = "Budget")]
        style: String,

        /// Total budget in the configured currency
        #[arg(long)]
        budget: Option<u64>,

        /// Output path for the HTML page
        #[arg(short, long, default_value = "trip.html")]
        output: PathBuf,

        /// Also write the plan as JSON (re-render later with `render`)
        #[arg(long)]
        json: Option<PathBuf>,

        /// Save the plan to the history directory
        #[arg(long)]
        save: bool,

        /// Path to config file
        #[arg(short, long, default_value = "config.toml")]
        config: PathBuf,

        /// LLM provider override: gemini, anthropic, openrouter, openai
        #[arg(long)]
        provider: Option<String>,

        /// LLM model override
        #[arg(long)]
        model: Option<String>,
    },

    /// Render a page from a saved plan JSON (no API calls)
    Render {
        /// Path to plan JSON file
        #[arg(long)]
        plan: PathBuf,

        /// Output path for the HTML page
        #[arg(short, long, default_value = "trip.html")]
        output: PathBuf,
    },

    /// List saved plans, newest first
    History,
}

fn load_services(
    config_path: &Path,
    provider: Option<String>,
    model: Option<String>,
) -> Result<(Services, trip_planner::config::ServerConfig)> {
    let mut cfg = Config::load_or_default(config_path)
        .with_context(|| format!("load config {}", config_path.display()))?;
    cfg.validate()?;
    let llm_override = make_llm_override(provider, model);
    let llm = build_llm_client(&cfg.llm, llm_override.as_ref())?;
    tracing::info!(provider = ?llm.provider(), model = llm.model(), "LLM configured");
    let server = std::mem::take(&mut cfg.server);
    Ok((Services::new(cfg, llm)?, server))
}

fn write_page(path: &Path, html: &str) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html).with_context(|| format!("write {}", path.display()))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    tracing_subscriber::EnvFilter::new("trip_planner=info,tower_http=info")
                }),
        )
        .init();

    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve {
            config,
            host,
            port,
            provider,
            model,
        } => {
            let (services, server) = load_services(&config, provider, model)?;
            let host = host.unwrap_or(server.host);
            let port = port.unwrap_or(server.port);
            web::run(services, &host, port).await
        }
        Command::Plan {
            destination,
            source,
            days,
            interests,
            style,
            budget,
            output: output_path,
            json,
            save,
            config,
            provider,
            model,
        } => {
            let form = TripForm {
                source_city: source,
                destination,
                days: days.to_string(),
                interests,
                travel_style: style,
                budget: budget.map(|b| b.to_string()).unwrap_or_default(),
            };
            let request = TripRequest::try_from(&form)?;
            let (services, _) = load_services(&config, provider, model)?;

            let plan = match planner::generate_trip_plan(&services, &request).await {
                Ok(plan) => plan,
                Err(e) => bail!("Something went wrong: {e}"),
            };

            write_page(&output_path, &output::render_trip_page(&plan)?)?;
            if let Some(json_path) = json {
                write_page(&json_path, &serde_json::to_string_pretty(&plan)?)?;
                println!("Plan JSON: {}", json_path.display());
            }
            if save {
                let saved = history::save_plan(&plan)?;
                println!("Saved to history: {}", saved.display());
            }
            println!(
                "Trip page rendered: {} ({} days, {} photos)",
                output_path.display(),
                plan.request.days,
                plan.image_urls.len()
            );
            Ok(())
        }
        Command::Render { plan, output } => render_from_file(plan, output),
        Command::History => {
            let plans = history::list_plans()?;
            if plans.is_empty() {
                println!("No saved plans in {}", history::history_dir().display());
            }
            for path in plans {
                println!("{}", path.display());
            }
            Ok(())
        }
    }
}

fn render_from_file(plan_path: PathBuf, output_path: PathBuf) -> Result<()> {
    let plan = history::load_plan(&plan_path)?;
    let html = output::render_trip_page(&plan)?;
    write_page(&output_path, &html)?;

    println!(
        "Trip page rendered: {} ({} to {}, {} days)",
        output_path.display(),
        if plan.request.source_city.is_empty() {
            "?"
        } else {
            plan.request.source_city.as_str()
        },
        plan.request.destination,
        plan.request.days
    );
    Ok(())
}
