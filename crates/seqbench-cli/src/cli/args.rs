use clap::{Parser, Subcommand, ValueEnum};
use seqbench_core::layout::Tier;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "seqbench",
    version,
    about = "Benchmark harness: can LLMs compute integer sequences instead of hardcoding them?"
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Fetch OEIS metadata into the cache and write per-sequence prompts
    Fetch(FetchArgs),
    /// Call each model on every prompt and store the raw responses
    Generate(GenerateArgs),
    /// Extract the final code block of each response into a program file
    Extract(ExtractArgs),
    /// Judge candidate programs for lookup-table cheating
    Classify(ClassifyArgs),
    /// Execute candidate programs against the catalogue and persist scores
    Eval(EvalArgs),
    /// Render the LaTeX results table from persisted scores
    Report(ReportArgs),
    Version,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum TierArg {
    Easy,
    Hard,
}

impl From<TierArg> for Tier {
    fn from(arg: TierArg) -> Self {
        match arg {
            TierArg::Easy => Tier::Easy,
            TierArg::Hard => Tier::Hard,
        }
    }
}

pub fn tiers(args: &[TierArg]) -> Vec<Tier> {
    args.iter().map(|&t| t.into()).collect()
}

#[derive(clap::Args, Debug, Clone)]
pub struct FetchArgs {
    /// Benchmark workspace root
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// OEIS metadata cache directory
    #[arg(long, default_value = "oeis_cache")]
    pub cache_dir: PathBuf,

    /// Sequences to collect per tier
    #[arg(long, default_value_t = 250)]
    pub per_tier: usize,

    /// Highest OEIS number to scan
    #[arg(long, default_value_t = 10_000)]
    pub max_number: u32,
}

#[derive(clap::Args, Debug, Clone)]
pub struct GenerateArgs {
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    #[arg(long = "tier", value_enum, default_values_t = vec![TierArg::Easy, TierArg::Hard])]
    pub tiers: Vec<TierArg>,

    /// Model to prompt; repeat for several
    #[arg(long = "model", required = true)]
    pub models: Vec<String>,

    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: String,
}

#[derive(clap::Args, Debug, Clone)]
pub struct ExtractArgs {
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    #[arg(long = "tier", value_enum, default_values_t = vec![TierArg::Easy, TierArg::Hard])]
    pub tiers: Vec<TierArg>,

    #[arg(long = "model", required = true)]
    pub models: Vec<String>,
}

#[derive(clap::Args, Debug, Clone)]
pub struct ClassifyArgs {
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    #[arg(long = "tier", value_enum, default_values_t = vec![TierArg::Easy, TierArg::Hard])]
    pub tiers: Vec<TierArg>,

    /// Model whose candidate programs get judged; repeat for several
    #[arg(long = "model", required = true)]
    pub models: Vec<String>,

    /// Model acting as the judge
    #[arg(long, default_value = "gpt-4o")]
    pub judge_model: String,

    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// Attempts per program before giving up
    #[arg(long, default_value_t = 5)]
    pub retries: u32,

    /// Delay between attempts, in seconds
    #[arg(long, default_value_t = 1.0)]
    pub retry_delay: f64,
}

#[derive(clap::Args, Debug, Clone)]
pub struct EvalArgs {
    /// OEIS stripped-format catalogue of expected terms
    #[arg(long, default_value = "stripped")]
    pub catalogue: PathBuf,

    #[arg(long, default_value = "oeis_cache")]
    pub cache_dir: PathBuf,

    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    #[arg(long = "tier", value_enum, default_values_t = vec![TierArg::Easy, TierArg::Hard])]
    pub tiers: Vec<TierArg>,

    #[arg(long = "model", required = true)]
    pub models: Vec<String>,

    /// Wall-clock budget in seconds; repeat for several
    #[arg(long = "timeout", default_values_t = vec![0.5, 1.0, 2.0, 4.0])]
    pub timeouts: Vec<f64>,

    /// Interpreter the candidate programs run under
    #[arg(long, default_value = "python3")]
    pub interpreter: String,
}

#[derive(clap::Args, Debug, Clone)]
pub struct ReportArgs {
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    #[arg(long = "model", required = true)]
    pub models: Vec<String>,

    /// Budgets to include as table columns
    #[arg(long = "timeout", default_values_t = vec![0.5, 4.0])]
    pub timeouts: Vec<f64>,
}
