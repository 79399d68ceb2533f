//! Retirement Planner CLI
//!
//! Command-line interface for growth simulations, retirement plans, bond
//! valuation and investor profiling

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};

use retirement_planner::config::PlannerConfig;
use retirement_planner::export;
use retirement_planner::profile::{catalog, FeatureInput, ProfileClassifier, ProfileOutcome};
use retirement_planner::retirement::compute_scenarios_with_factor;
use retirement_planner::{plan_retirement, simulate_growth, value_bond, GrowthResult, RateFrequency, TaxRegime};

/// Rows printed to the console before eliding the rest of a schedule
const CONSOLE_ROWS: usize = 24;

#[derive(Parser, Debug)]
#[command(name = "retirement-planner", version)]
#[command(about = "Retirement planning: portfolio growth, pensions, bonds and investor profiles")]
struct Cli {
    /// JSON config file (defaults apply for missing keys)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Simulate portfolio growth with periodic contributions
    Growth {
        #[command(flatten)]
        growth: GrowthArgs,
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Tax the accumulated gain and compare pension options
    Retire(RetireArgs),
    /// Value a fixed-coupon bond
    Bond(BondArgs),
    /// Classify an investor risk profile from questionnaire answers
    Profile(ProfileArgs),
}

#[derive(Args, Debug)]
struct GrowthArgs {
    /// Initial deposit
    #[arg(long, default_value_t = 0.0)]
    initial: f64,
    /// Contribution per period (from period 2)
    #[arg(long, default_value_t = 0.0)]
    contribution: f64,
    /// monthly, bimonthly, quarterly, four-monthly, semiannual or annual
    #[arg(long, default_value = "monthly")]
    frequency: RateFrequency,
    /// Annual effective return, as a decimal
    #[arg(long)]
    rate: f64,
    /// Term in whole years
    #[arg(long)]
    years: u32,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum RegimeArg {
    ForeignSource,
    LocalExchange,
}

impl From<RegimeArg> for TaxRegime {
    fn from(arg: RegimeArg) -> Self {
        match arg {
            RegimeArg::ForeignSource => TaxRegime::ForeignSource,
            RegimeArg::LocalExchange => TaxRegime::LocalExchange,
        }
    }
}

#[derive(Args, Debug)]
struct RetireArgs {
    #[command(flatten)]
    growth: GrowthArgs,
    /// Explicit tax rate on the gain, as a decimal
    #[arg(long, conflicts_with = "regime")]
    tax_rate: Option<f64>,
    /// Tax regime preset
    #[arg(long, value_enum)]
    regime: Option<RegimeArg>,
    /// Annual return during the payout phase
    #[arg(long)]
    withdrawal_rate: Option<f64>,
    /// Years of pension payments
    #[arg(long)]
    pension_years: Option<u32>,
    /// Share of net capital converted into a pension
    #[arg(long)]
    payout_factor: Option<f64>,
    /// Scenario withdrawal rate (repeatable)
    #[arg(long = "scenario-rate")]
    scenario_rates: Vec<f64>,
    /// Scenario pension duration in years (repeatable)
    #[arg(long = "scenario-years")]
    scenario_years: Vec<u32>,
    #[arg(long)]
    csv: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct BondArgs {
    #[arg(long)]
    face: f64,
    /// Nominal annual coupon rate
    #[arg(long)]
    coupon_rate: f64,
    #[arg(long, default_value = "semiannual")]
    frequency: RateFrequency,
    #[arg(long)]
    years: u32,
    /// Annual effective market rate
    #[arg(long)]
    market_rate: f64,
    #[arg(long)]
    csv: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ProfileArgs {
    #[arg(long)]
    age: Option<f64>,
    #[arg(long)]
    horizon: Option<f64>,
    /// 1 (lowest) to 5
    #[arg(long)]
    risk_tolerance: Option<f64>,
    #[arg(long)]
    monthly_income: Option<f64>,
    #[arg(long)]
    savings_percentage: Option<f64>,
    #[arg(long)]
    experience_years: Option<f64>,
    #[arg(long)]
    net_worth: Option<f64>,
    #[arg(long)]
    education_level: Option<f64>,
    #[arg(long)]
    goal: Option<f64>,
    #[arg(long)]
    financial_knowledge: Option<f64>,
    #[arg(long)]
    debt_capacity: Option<f64>,
    /// Write the wealth projections here
    #[arg(long)]
    csv: Option<PathBuf>,
}

impl ProfileArgs {
    fn to_input(&self) -> FeatureInput {
        [
            ("age", self.age),
            ("horizon", self.horizon),
            ("risk_tolerance", self.risk_tolerance),
            ("monthly_income", self.monthly_income),
            ("savings_percentage", self.savings_percentage),
            ("experience_years", self.experience_years),
            ("net_worth", self.net_worth),
            ("education_level", self.education_level),
            ("goal", self.goal),
            ("financial_knowledge", self.financial_knowledge),
            ("debt_capacity", self.debt_capacity),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.map(|v| (name.to_string(), v)))
        .collect()
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => PlannerConfig::from_json_path(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => PlannerConfig::default(),
    }
    .with_env_overrides();

    match cli.command {
        Command::Growth { growth, csv } => run_growth(&growth, csv.as_deref()),
        Command::Retire(args) => run_retire(&args, &config),
        Command::Bond(args) => run_bond(&args),
        Command::Profile(args) => run_profile(&args, &config),
    }
}

fn simulate(args: &GrowthArgs) -> Result<GrowthResult> {
    simulate_growth(args.initial, args.contribution, args.frequency, args.rate, args.years)
        .context("growth simulation failed")
}

fn print_growth(result: &GrowthResult, frequency: RateFrequency) {
    println!("Growth Schedule ({} {} periods):", result.records.len(), frequency);
    println!("{:>6} {:>16} {:>14} {:>14} {:>16}", "Period", "Opening", "Contribution", "Interest", "Closing");
    println!("{}", "-".repeat(70));

    for row in result.records.iter().take(CONSOLE_ROWS) {
        println!(
            "{:>6} {:>16.2} {:>14.2} {:>14.2} {:>16.2}",
            row.period, row.opening_balance, row.contribution, row.interest, row.closing_balance,
        );
    }
    if result.records.len() > CONSOLE_ROWS {
        println!("... ({} more periods)", result.records.len() - CONSOLE_ROWS);
    }

    let summary = result.summary();
    println!("\nSummary:");
    println!("  Total Periods: {}", summary.total_periods);
    println!("  Total Contributed: ${:.2}", summary.total_contributed);
    println!("  Total Interest: ${:.2}", summary.total_interest);
    println!("  Final Capital: ${:.2}", summary.final_capital);
}

fn run_growth(args: &GrowthArgs, csv: Option<&Path>) -> Result<()> {
    let result = simulate(args)?;
    print_growth(&result, args.frequency);

    if let Some(path) = csv {
        export::to_path(path, |w| export::write_growth(w, &result))
            .with_context(|| format!("writing {}", path.display()))?;
        println!("\nFull schedule written to: {}", path.display());
    }
    Ok(())
}

fn run_retire(args: &RetireArgs, config: &PlannerConfig) -> Result<()> {
    let defaults = &config.retirement;
    let tax_rate = match (args.tax_rate, args.regime) {
        (Some(rate), _) => rate,
        (None, Some(regime)) => TaxRegime::from(regime).rate(),
        (None, None) => defaults.tax_rate,
    };
    let withdrawal_rate = args.withdrawal_rate.unwrap_or(defaults.withdrawal_rate);
    let pension_years = args.pension_years.unwrap_or(defaults.pension_years);
    let payout_factor = args.payout_factor.unwrap_or(defaults.payout_factor);

    let growth = simulate(&args.growth)?;
    let plan = plan_retirement(&growth, tax_rate, withdrawal_rate, pension_years, payout_factor)
        .context("retirement plan failed")?;

    println!("Retirement Plan:");
    println!("  Final Capital: ${:.2}", growth.final_capital);
    println!("  Total Contributed: ${:.2}", growth.total_contributed);
    println!("  Gain: ${:.2}", plan.gain);
    println!("  Tax ({:.1}%): ${:.2}", tax_rate * 100.0, plan.tax);
    println!("  Net Lump Sum: ${:.2}", plan.net_capital);
    println!(
        "  Monthly Pension ({} years at {:.2}%): ${:.2}",
        pension_years,
        withdrawal_rate * 100.0,
        plan.monthly_pension
    );

    let rates = if args.scenario_rates.is_empty() {
        vec![withdrawal_rate]
    } else {
        args.scenario_rates.clone()
    };
    let years = if args.scenario_years.is_empty() {
        vec![pension_years]
    } else {
        args.scenario_years.clone()
    };
    let scenarios = compute_scenarios_with_factor(plan.net_capital, &rates, &years, payout_factor)
        .context("pension scenarios failed")?;

    println!("\nPension Scenarios:");
    println!("{:>10} {:>8} {:>16}", "Rate", "Years", "Monthly");
    println!("{}", "-".repeat(36));
    for s in &scenarios {
        println!(
            "{:>9.2}% {:>8} {:>16.2}",
            s.annual_withdrawal_rate * 100.0,
            s.pension_years,
            s.monthly_pension
        );
    }

    if let Some(path) = &args.csv {
        export::to_path(path, |w| export::write_scenarios(w, &scenarios))
            .with_context(|| format!("writing {}", path.display()))?;
        println!("\nScenarios written to: {}", path.display());
    }
    Ok(())
}

fn run_bond(args: &BondArgs) -> Result<()> {
    let valuation = value_bond(args.face, args.coupon_rate, args.frequency, args.years, args.market_rate)
        .context("bond valuation failed")?;

    println!("Bond Valuation:");
    println!("  Face Value: ${:.2}", valuation.face_value);
    println!("  Coupon per Period: ${:.2}", valuation.coupon_amount);
    println!("  Periodic Discount Rate: {:.6}", valuation.periodic_discount_rate);
    println!("  Present Value: ${:.2}", valuation.present_value);
    println!("  Price Position: {:?}", valuation.price_position());

    println!("\n{:>6} {:>14} {:>14}", "Period", "Cash Flow", "PV");
    println!("{}", "-".repeat(36));
    for row in &valuation.cash_flows {
        println!("{:>6} {:>14.2} {:>14.2}", row.period, row.cash_flow, row.present_value);
    }

    if let Some(path) = &args.csv {
        export::to_path(path, |w| export::write_bond(w, &valuation))
            .with_context(|| format!("writing {}", path.display()))?;
        println!("\nCash flows written to: {}", path.display());
    }
    Ok(())
}

fn run_profile(args: &ProfileArgs, config: &PlannerConfig) -> Result<()> {
    let classifier = ProfileClassifier::load_or_train(&config.classifier).context("profile model unavailable")?;
    let outcome = classifier.predict(&args.to_input());

    if let ProfileOutcome::Fallback { reason, .. } = &outcome {
        println!("Profile could not be classified ({}); showing default result.\n", reason);
    }
    let result = outcome.result();
    let description = catalog::describe(result.profile);

    println!("Investor Profile: {} ({:.1}% confidence)", result.profile, result.confidence);
    println!("  {}: {}", description.title, description.objective);
    println!(
        "  Suggested Return: {:.1}% - {:.1}% (mean {:.1}%)",
        result.suggested_return.min, result.suggested_return.max, result.suggested_return.mean
    );

    if !result.asset_allocation.is_empty() {
        println!("\nAsset Allocation:");
        for w in &result.asset_allocation.weights {
            println!("  {:<24} {:>5.1}%", w.category, w.percentage);
        }
    }

    if !result.feature_importances.is_empty() {
        println!("\nFeature Importances:");
        let mut ranked: Vec<_> = result.feature_importances.iter().collect();
        ranked.sort_by(|a, b| b.1.total_cmp(a.1));
        for (name, value) in ranked {
            println!("  {:<22} {:>6.3}", name, value);
        }
    }

    for block in &result.recommendations {
        println!("\n{}: {}", block.title, block.body);
        for action in &block.actions {
            println!("  - {}", action);
        }
    }

    if !result.projections.is_empty() {
        println!("\nWealth Projections:");
        for (profile, projection) in &result.projections {
            println!("  {} ({:.0}% per year)", profile, projection.annual_return * 100.0);
            for point in &projection.points {
                println!("    age {:>3}: ${:>16.2}", point.age, point.patrimony);
            }
        }
    }

    if let Some(path) = &args.csv {
        export::to_path(path, |w| export::write_projections(w, &result.projections))
            .with_context(|| format!("writing {}", path.display()))?;
        println!("\nProjections written to: {}", path.display());
    }
    Ok(())
}
