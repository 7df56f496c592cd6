use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use salvage_client::{AnalysisClient, ClientConfig, ClientError};
use salvage_core::core_api::{PlannerState, common_salvage};
use salvage_core::paste::SUPPORTED_FORMATS_HELP;
use salvage_core::{
    ParseReport, ReprocessingEfficiency, SalvageItem, SkillLevels, parse_inventory_report,
};
use salvage_render::{
    JsonStyle, TextRenderOptions, format_isk, render_analysis_json, render_analysis_text,
    render_items_json, render_items_text,
};
use serde_json::Value as JsonValue;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Cli {
    /// Base URL of the analysis service.
    #[arg(long, global = true, env = "SALVAGE_API_URL", value_name = "URL")]
    api_url: Option<String>,
    /// Request timeout in seconds.
    #[arg(long, global = true, env = "SALVAGE_API_TIMEOUT_SECS", value_name = "SECS")]
    timeout_secs: Option<u64>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse pasted inventory text and print the recognised items.
    Parse {
        /// Paste file; `-` or absent reads stdin.
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
    /// Send items to the analysis service and print materials and builds.
    Analyze(AnalyzeArgs),
    /// Ask the service to refresh market prices (all types when none given).
    UpdatePrices {
        #[arg(value_name = "TYPE_ID")]
        type_ids: Vec<i32>,
        #[arg(long)]
        json: bool,
    },
    /// Print cached market prices.
    Prices {
        #[arg(value_name = "TYPE_ID", required = true)]
        type_ids: Vec<i32>,
        #[arg(long)]
        json: bool,
    },
    /// Print the service health string.
    Health,
    /// List quick-add salvage names.
    Common {
        #[arg(value_name = "PREFIX")]
        prefix: Option<String>,
    },
}

#[derive(Debug, Args)]
struct AnalyzeArgs {
    /// Paste file; `-` reads stdin. Stdin is also read when no --item is given.
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,
    /// Manual entry as NAME=QUANTITY; repeatable.
    #[arg(long = "item", value_name = "NAME=QTY")]
    items: Vec<String>,
    #[arg(long, value_name = "0.5..0.69575", conflicts_with = "skills")]
    efficiency: Option<f64>,
    /// Skill levels as REPROCESSING,EFFICIENCY,SPECIFIC (each 0-5).
    #[arg(long, value_name = "R,E,S")]
    skills: Option<String>,
    #[arg(long)]
    json: bool,
    /// Include the item list and missing materials.
    #[arg(long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Parse { ref file, json } => run_parse(file.as_deref(), json),
        Command::Common { ref prefix } => run_common(prefix.as_deref()),
        Command::Analyze(ref args) => run_analyze(&cli, args).await,
        Command::UpdatePrices { ref type_ids, json } => {
            let client = build_client(&cli);
            let response = client
                .update_market_prices(type_ids)
                .await
                .unwrap_or_else(|e| exit_service_error("updating market prices", &e));
            if json {
                print_json(&serde_json::to_value(&response).unwrap_or_else(|e| {
                    eprintln!("Error rendering JSON output: {e}");
                    process::exit(1);
                }));
                return;
            }
            println!("updated_count={}", response.updated_count);
        }
        Command::Prices { ref type_ids, json } => {
            let client = build_client(&cli);
            let prices = client
                .market_prices(type_ids)
                .await
                .unwrap_or_else(|e| exit_service_error("loading market prices", &e));
            if json {
                print_json(&serde_json::to_value(&prices).unwrap_or_else(|e| {
                    eprintln!("Error rendering JSON output: {e}");
                    process::exit(1);
                }));
                return;
            }
            for price in &prices {
                println!(
                    "type_id={} region={} sell={} buy={} volume={} updated_at={}",
                    price.type_id,
                    price.region_id,
                    format_optional_isk(price.sell_price),
                    format_optional_isk(price.buy_price),
                    price
                        .daily_volume
                        .map(|v| v.to_string())
                        .unwrap_or_else(|| "-".to_string()),
                    price.updated_at
                );
            }
        }
        Command::Health => {
            let client = build_client(&cli);
            let status = client
                .health()
                .await
                .unwrap_or_else(|e| exit_service_error("checking service health", &e));
            println!("{status}");
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(io::stderr().is_terminal())
        .with_writer(io::stderr)
        .init();
}

fn run_parse(file: Option<&Path>, json: bool) {
    let text = read_paste(file).unwrap_or_else(|e| {
        eprintln!("{e}");
        process::exit(1);
    });

    let report = parse_inventory_report(&text);
    log_report(&report);
    if report.is_empty() {
        eprintln!("{SUPPORTED_FORMATS_HELP}");
        process::exit(1);
    }

    if json {
        print_json(&render_items_json(&report.items));
        return;
    }
    for item in &report.items {
        println!("item={}x {}", item.quantity, item.name);
    }
}

fn log_report(report: &ParseReport) {
    let formats: Vec<&str> = report.formats.iter().map(|f| f.as_str()).collect();
    debug!(
        items = report.items.len(),
        skipped = report.skipped_lines,
        formats = ?formats,
        "parsed paste"
    );
}

fn run_common(prefix: Option<&str>) {
    for name in common_salvage::suggest(prefix.unwrap_or("")) {
        println!("{name}");
    }
}

async fn run_analyze(cli: &Cli, args: &AnalyzeArgs) {
    let mut planner = PlannerState::new();

    let efficiency = resolve_efficiency(args).unwrap_or_else(|e| {
        eprintln!("{e}");
        process::exit(2);
    });
    planner.set_efficiency(efficiency);

    // Paste text comes from FILE, or from stdin when neither FILE nor
    // --item was given. Pasted rows precede manual ones.
    let paste_source = match &args.file {
        Some(path) => Some(Some(path.as_path())),
        None if args.items.is_empty() => Some(None),
        None => None,
    };
    if let Some(source) = paste_source {
        let text = read_paste(source).unwrap_or_else(|e| {
            eprintln!("{e}");
            process::exit(1);
        });
        let report = parse_inventory_report(&text);
        log_report(&report);
        if report.is_empty() && !args.items.is_empty() {
            warn!(
                skipped = report.skipped_lines,
                "no salvage items recognised in paste; continuing with --item entries"
            );
        }
        planner.add_items(report.items);
    }

    for raw in &args.items {
        let item = SalvageItem::from_pair(raw).unwrap_or_else(|e| {
            eprintln!("Invalid --item '{raw}': {}", e.message);
            process::exit(2);
        });
        planner.add_item(item);
    }

    let request = planner.begin_analysis().unwrap_or_else(|e| {
        eprintln!("{}", e.message);
        process::exit(2);
    });
    info!(
        items = request.salvage_items.len(),
        efficiency = %efficiency,
        "submitting analysis"
    );

    let client = build_client(cli);
    let outcome = client.analyze(&request).await;
    planner.finish_analysis(outcome.map_err(|e| e.user_message()));

    if let Some(message) = planner.error() {
        eprintln!("Error analyzing salvage: {message}");
        process::exit(1);
    }
    let Some(response) = planner.result() else {
        eprintln!("Error analyzing salvage: no result");
        process::exit(1);
    };

    if args.json {
        print_json(&render_analysis_json(response, JsonStyle::CanonicalV1));
        return;
    }

    if args.verbose {
        println!("{}", render_items_text(planner.items().items()));
    }
    print!(
        "{}",
        render_analysis_text(
            response,
            TextRenderOptions {
                verbose: args.verbose
            }
        )
    );
}

fn resolve_efficiency(args: &AnalyzeArgs) -> Result<ReprocessingEfficiency, String> {
    if let Some(value) = args.efficiency {
        return ReprocessingEfficiency::new(value).map_err(|e| e.message);
    }
    if let Some(raw) = &args.skills {
        let skills = SkillLevels::parse(raw).map_err(|e| e.message)?;
        return ReprocessingEfficiency::from_skills(skills).map_err(|e| e.message);
    }
    Ok(ReprocessingEfficiency::default())
}

fn build_client(cli: &Cli) -> AnalysisClient {
    let mut config = ClientConfig::default();
    if let Some(url) = &cli.api_url {
        config.base_url = url.clone();
    }
    if let Some(secs) = cli.timeout_secs {
        config.timeout = Duration::from_secs(secs.max(1));
    }
    AnalysisClient::new(config).unwrap_or_else(|e| {
        eprintln!("{e}");
        process::exit(2);
    })
}

fn exit_service_error(action: &str, err: &ClientError) -> ! {
    eprintln!("Error {action}: {}", err.user_message());
    process::exit(1);
}

fn read_paste(file: Option<&Path>) -> Result<String, String> {
    match file {
        Some(path) if path != Path::new("-") => fs::read_to_string(path)
            .map_err(|e| format!("Error reading {}: {e}", path.display())),
        _ => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .map_err(|e| format!("Error reading stdin: {e}"))?;
            Ok(text)
        }
    }
}

fn print_json(value: &JsonValue) {
    let rendered = serde_json::to_string_pretty(value).unwrap_or_else(|e| {
        eprintln!("Error rendering JSON output: {e}");
        process::exit(1);
    });
    println!("{rendered}");
}

fn format_optional_isk(value: Option<f64>) -> String {
    value.map(format_isk).unwrap_or_else(|| "-".to_string())
}
