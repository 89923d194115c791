//! readiness-advisor command line
//!
//! Scores investment readiness, reports the market mood and asks the
//! configured text-generation provider for beginner-friendly guidance.
//! Results are printed as JSON on stdout; logs go to stderr.

use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use advisor_core::LlmProvider;
use advisor_runtime::{LlmSettings, build_provider};
use readiness_advisor::history::DEFAULT_HISTORY_LIMIT;
use readiness_advisor::notifications::Notification;
use readiness_advisor::{
    AdviceEngine, AdviceResult, FinancialMetrics, MarketDataService, MarketRiskLevel,
    MemorySnapshotStore, ReadinessEngine, ReadinessResult, ReadinessSnapshot, RiskLevel,
    RiskProfile, Settings, SnapshotStore, preview_notifications,
};

#[derive(Debug, Parser)]
#[command(name = "readiness-advisor", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Compute the investment readiness score
    Score(ProfileArgs),

    /// Today's market mood, sectors and movers
    Market {
        /// Also fetch a quote for this stock symbol
        #[arg(long)]
        symbol: Option<String>,
    },

    /// Personalized SIP / lump-sum / long-term / trader guidance
    Advice(ProfileArgs),

    /// Beginner lesson on a topic, or today's pattern insight when omitted
    Learn {
        topic: Option<String>,
    },

    /// Explain a piece of text for a first-time investor
    Explain {
        context: String,
    },
}

#[derive(Debug, Args)]
struct ProfileArgs {
    /// Monthly take-home income
    #[arg(long)]
    income: Decimal,

    /// Monthly expenses
    #[arg(long)]
    expenses: Decimal,

    #[arg(long, default_value_t = Decimal::ZERO)]
    emergency_fund: Decimal,

    #[arg(long, default_value_t = Decimal::ZERO)]
    savings: Decimal,

    /// Outstanding debt; omit when debt-free
    #[arg(long)]
    debt: Option<Decimal>,

    /// CONSERVATIVE, MODERATE or AGGRESSIVE; omit if not assessed yet
    #[arg(long)]
    risk_level: Option<RiskLevel>,

    /// Override the classified market risk (LOW, MEDIUM, HIGH)
    #[arg(long)]
    market_risk: Option<MarketRiskLevel>,

    /// Tag the stored snapshot with this user
    #[arg(long, default_value = "local")]
    user: String,
}

impl ProfileArgs {
    fn financial(&self) -> FinancialMetrics {
        let financial = FinancialMetrics::new(self.income, self.expenses)
            .with_emergency_fund(self.emergency_fund)
            .with_savings(self.savings);
        match self.debt {
            Some(amount) => financial.with_debt(amount),
            None => financial,
        }
    }

    fn risk_profile(&self) -> Option<RiskProfile> {
        self.risk_level.map(RiskProfile::new)
    }
}

#[derive(Serialize)]
struct ScoreReport {
    readiness: ReadinessResult,
    market_risk: MarketRiskLevel,
    history: Vec<ReadinessSnapshot>,
    notifications: Vec<Notification>,
}

#[derive(Serialize)]
struct AdviceReport {
    readiness: ReadinessResult,
    advice: AdviceResult,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let settings = Settings::from_env().context("invalid readiness settings")?;
    let market = Arc::new(
        MarketDataService::from_settings(&settings.market_data, settings.market_risk)
            .context("market data setup failed")?,
    );
    let engine = ReadinessEngine::new(settings.readiness.clone());

    match cli.command {
        Command::Score(args) => {
            let assessment = market.market_risk().await.context("market risk unavailable")?;
            let market_risk = args.market_risk.unwrap_or(assessment.risk_level);
            let readiness = engine.calculate_score(&args.financial(), args.risk_profile().as_ref(), market_risk);

            let store = MemorySnapshotStore::new();
            store.append(ReadinessSnapshot::new(&args.user, &readiness, market_risk))?;
            let history = store.history(&args.user, DEFAULT_HISTORY_LIMIT)?;
            let notifications = preview_notifications(history.first(), &assessment);

            print_json(&ScoreReport {
                readiness,
                market_risk,
                history,
                notifications,
            })
        }

        Command::Market { symbol } => {
            let summary = market.market_summary().await.context("market summary unavailable")?;
            let risk = market.classifier().classify(summary.index.change_percent);
            let quote = match symbol {
                Some(symbol) => Some(market.stock_quote(&symbol).await?),
                None => None,
            };

            print_json(&serde_json::json!({
                "summary": summary,
                "risk": risk,
                "quote": quote,
            }))
        }

        Command::Advice(args) => {
            let advisor = advice_engine(market.clone())?;
            let market_risk = match args.market_risk {
                Some(level) => level,
                None => market.market_risk().await?.risk_level,
            };
            let profile = args.risk_profile();
            let readiness = engine.calculate_score(&args.financial(), profile.as_ref(), market_risk);
            let advice = advisor
                .personalized_advice(&readiness, profile.as_ref(), market_risk)
                .await?;

            print_json(&AdviceReport { readiness, advice })
        }

        Command::Learn { topic } => {
            let advisor = advice_engine(market)?;
            match topic {
                Some(topic) => print_json(&advisor.education_card(&topic).await?),
                None => print_json(&advisor.pattern_insight().await?),
            }
        }

        Command::Explain { context } => {
            let advisor = advice_engine(market)?;
            print_json(&advisor.beginner_explanation(&context).await)
        }
    }
}

fn advice_engine(market: Arc<MarketDataService>) -> anyhow::Result<AdviceEngine> {
    let llm_settings = LlmSettings::from_env().context("invalid LLM settings")?;
    let provider = build_provider(&llm_settings);
    tracing::info!(provider = %provider.name(), "Text generation ready");
    Ok(AdviceEngine::new(provider, market))
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
