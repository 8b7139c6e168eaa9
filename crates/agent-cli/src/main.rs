//! Command-line front end for the stock analysis agents

mod render;

use agent_llm::providers::GeminiProvider;
use agent_stock::{
    ResponseLanguage, RunId, StatusBoard, StatusUpdate, StockAnalysisEngine, StockConfig, StockError,
};
use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "stock-agents")]
#[command(about = "Multi-agent stock analysis backed by Gemini search grounding", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze a ticker such as 2330.TW or AAPL
    Analyze {
        ticker: String,

        /// Report language (defaults to STOCK_LANGUAGE, then zh)
        #[arg(long, value_enum)]
        lang: Option<Lang>,

        /// Model identifier (defaults to STOCK_MODEL)
        #[arg(long)]
        model: Option<String>,

        /// Print the full result as JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Lang {
    Zh,
    En,
}

impl From<Lang> for ResponseLanguage {
    fn from(lang: Lang) -> Self {
        match lang {
            Lang::Zh => ResponseLanguage::TraditionalChinese,
            Lang::En => ResponseLanguage::English,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let app = agent_utils::Config::from_env()?;
    let fallback = if app.is_production() {
        "warn"
    } else {
        "warn,agent_stock=info"
    };
    agent_utils::init_tracing_with(app.log_format, fallback);

    let args = Args::parse();
    match args.command {
        Command::Analyze {
            ticker,
            lang,
            model,
            json,
        } => analyze(&ticker, lang, model, json).await,
    }
}

fn stock_config(lang: Option<Lang>, model: Option<String>) -> anyhow::Result<StockConfig> {
    let mut config = StockConfig::from_env().context("invalid stock configuration")?;
    if let Some(lang) = lang {
        config.response_language = lang.into();
    }
    if let Some(model) = model {
        config.model = model;
    }
    config.validate()?;
    Ok(config)
}

/// Gemini provider from the environment; a missing key is a startup error
fn provider() -> agent_stock::Result<GeminiProvider> {
    GeminiProvider::from_env().map_err(StockError::provider_setup)
}

async fn analyze(
    ticker: &str,
    lang: Option<Lang>,
    model: Option<String>,
    json: bool,
) -> anyhow::Result<()> {
    let config = stock_config(lang, model)?;
    let lang = config.response_language;
    let provider = provider().context("set GEMINI_API_KEY or API_KEY")?;

    let ticker = ticker.trim().to_uppercase();
    info!(ticker = %ticker, model = %config.model, "starting analysis");
    let engine = StockAnalysisEngine::new(Arc::new(provider), config);

    let run_id = RunId::new();
    let board = Arc::new(StatusBoard::for_run(run_id));
    let (tx, mut rx) = mpsc::unbounded_channel::<StatusUpdate>();
    let printer = {
        let board = Arc::clone(&board);
        tokio::spawn(async move {
            while let Some(update) = rx.recv().await {
                if board.apply(&update) {
                    eprintln!("{}", render::status_line(&board.snapshot()));
                }
            }
        })
    };

    let outcome = engine.run_analysis_as(run_id, &ticker, &tx).await;
    drop(tx);
    printer.await.context("progress printer panicked")?;

    let result = outcome?;
    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", render::status_table(&board.snapshot(), lang));
        println!();
        print!("{}", render::report(&result, lang));
    }

    Ok(())
}
