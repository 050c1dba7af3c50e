mod logging;
mod query;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use thiserror::Error;

use datamend_damage::{DamageEngine, DamageError, DamageOptions, DamagePlan};
use datamend_eval::{EvalError, EvaluateOptions, QualityEngine};
use datamend_heal::{HealEngine, HealError, HealOptions, ImputationStrategy};
use datamend_profile::{ProfileError, ProfileOptions, SchemaBuilder};
use query::{QueryError, SchemaQuery};

#[derive(Debug, Error)]
enum CliError {
    #[error("profile error: {0}")]
    Profile(#[from] ProfileError),
    #[error("damage error: {0}")]
    Damage(#[from] DamageError),
    #[error("heal error: {0}")]
    Heal(#[from] HealError),
    #[error("eval error: {0}")]
    Eval(#[from] EvalError),
    #[error("query error: {0}")]
    Query(#[from] QueryError),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "datamend", version, about = "Datamend CLI")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build schema artifacts from a dataset directory.
    Profile(ProfileArgs),
    /// Inject synthetic defects into a dataset.
    Damage(DamageArgs),
    /// Heal a damaged dataset against the schema.
    Heal(HealArgs),
    /// Score a dataset variant against the schema.
    Eval(EvalArgs),
    /// Query the built schema documents.
    Query(QueryArgs),
}

#[derive(Args, Debug)]
struct ProfileArgs {
    /// Dataset directory of CSV tables.
    dataset: PathBuf,
    /// Directory for schema artifacts.
    #[arg(long, default_value = "schema")]
    schema_dir: PathBuf,
    /// How many top values to record per column.
    #[arg(long, default_value_t = 5)]
    top_values: usize,
    /// How many distinct sample values to record per column.
    #[arg(long, default_value_t = 10)]
    sample_values: usize,
}

#[derive(Args, Debug)]
struct DamageArgs {
    /// Clean dataset directory.
    dataset: PathBuf,
    /// Damage plan file (JSON or TOML).
    #[arg(long)]
    plan: PathBuf,
    /// Output directory override; defaults to `<dataset>_damaged`.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct HealArgs {
    /// Damaged dataset directory.
    dataset: PathBuf,
    /// Directory holding schema artifacts.
    #[arg(long, default_value = "schema")]
    schema_dir: PathBuf,
    /// Output directory override; defaults to `<dataset>_healed`.
    #[arg(long)]
    out: Option<PathBuf>,
    /// Imputation strategy for numeric columns.
    #[arg(long, value_enum, default_value_t = Strategy::Mean)]
    strategy: Strategy,
}

#[derive(Args, Debug)]
struct EvalArgs {
    /// Base dataset directory (the original, without variant suffix).
    dataset: PathBuf,
    /// Which dataset variant to score.
    #[arg(long, value_enum, default_value_t = Variant::Original)]
    variant: Variant,
    /// Directory holding schema artifacts.
    #[arg(long, default_value = "schema")]
    schema_dir: PathBuf,
    /// Output directory override; defaults to `quality/<variant>`.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct QueryArgs {
    /// Directory holding schema artifacts.
    #[arg(long, default_value = "schema")]
    schema_dir: PathBuf,
    #[command(subcommand)]
    query: QueryCommand,
}

#[derive(Subcommand, Debug)]
enum QueryCommand {
    /// List all tables alphabetically with record counts.
    Tables,
    /// List all columns in a table with their statistics.
    Columns { table: String },
    /// Get all distinct values for a table column.
    Values {
        /// Target as `table.column`.
        target: String,
    },
    /// Find all tables and columns containing a value.
    WhereValue { value: String },
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum Strategy {
    Mean,
    Median,
}

impl From<Strategy> for ImputationStrategy {
    fn from(strategy: Strategy) -> Self {
        match strategy {
            Strategy::Mean => ImputationStrategy::Mean,
            Strategy::Median => ImputationStrategy::Median,
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strategy::Mean => write!(f, "mean"),
            Strategy::Median => write!(f, "median"),
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum Variant {
    Original,
    Damaged,
    Healed,
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl Variant {
    fn label(self) -> &'static str {
        match self {
            Variant::Original => "original",
            Variant::Damaged => "damaged",
            Variant::Healed => "healed",
        }
    }

    /// Resolve the dataset directory for this variant by naming convention.
    fn resolve(self, dataset: &PathBuf) -> PathBuf {
        match self {
            Variant::Original => dataset.clone(),
            Variant::Damaged | Variant::Healed => {
                let name = dataset
                    .file_name()
                    .map(|name| name.to_string_lossy().to_string())
                    .unwrap_or_default();
                dataset.with_file_name(format!("{name}_{}", self.label()))
            }
        }
    }
}

fn main() -> Result<(), CliError> {
    logging::init_logging();
    let cli = Cli::parse();

    match cli.command {
        Command::Profile(args) => run_profile(args),
        Command::Damage(args) => run_damage(args),
        Command::Heal(args) => run_heal(args),
        Command::Eval(args) => run_eval(args),
        Command::Query(args) => run_query(args),
    }
}

fn run_profile(args: ProfileArgs) -> Result<(), CliError> {
    let options = ProfileOptions {
        schema_dir: args.schema_dir,
        top_values: args.top_values,
        sample_values: args.sample_values,
    };
    let result = SchemaBuilder::new(options).run(&args.dataset)?;
    println!(
        "profiled {} table(s) into {}",
        result.report.tables.len(),
        result.schema_dir.display()
    );
    Ok(())
}

fn run_damage(args: DamageArgs) -> Result<(), CliError> {
    let plan = DamagePlan::from_path(&args.plan)?;
    let options = DamageOptions { out_dir: args.out };
    let result = DamageEngine::new(options).run(&plan, &args.dataset)?;
    println!(
        "damaged {} table(s) into {} (blanked {}, corrupted {}, duplicated {})",
        result.report.tables.len(),
        result.out_dir.display(),
        result.report.cells_blanked_total,
        result.report.cells_corrupted_total,
        result.report.rows_duplicated_total
    );
    Ok(())
}

fn run_heal(args: HealArgs) -> Result<(), CliError> {
    let options = HealOptions {
        out_dir: args.out,
        numeric_imputation: args.strategy.into(),
    };
    let result = HealEngine::new(options).run(&args.schema_dir, &args.dataset)?;
    println!(
        "healed {} table(s) into {} (normalized {}, imputed {}, deduplicated {})",
        result.report.tables.len(),
        result.out_dir.display(),
        result.report.cells_normalized_total,
        result.report.cells_imputed_total,
        result.report.duplicate_rows_removed_total
    );
    Ok(())
}

fn run_eval(args: EvalArgs) -> Result<(), CliError> {
    let dataset_dir = args.variant.resolve(&args.dataset);
    let options = EvaluateOptions {
        variant: args.variant.label().to_string(),
        out_dir: args.out,
    };
    let result = QualityEngine::new(options).run(&args.schema_dir, &dataset_dir)?;
    println!(
        "scored {} table(s): completeness {:.2}, consistency {:.2}, uniqueness {:.2}, validity {:.2} (score {:.2})",
        result.metrics.aggregate.tables_scored,
        result.metrics.aggregate.completeness,
        result.metrics.aggregate.consistency,
        result.metrics.aggregate.uniqueness,
        result.metrics.aggregate.validity,
        result.metrics.aggregate.score
    );
    Ok(())
}

fn run_query(args: QueryArgs) -> Result<(), CliError> {
    let schema = SchemaQuery::load(&args.schema_dir)?;
    let result = match args.query {
        QueryCommand::Tables => schema.tables(),
        QueryCommand::Columns { table } => schema.columns(&table)?,
        QueryCommand::Values { target } => schema.values(&target)?,
        QueryCommand::WhereValue { value } => schema.where_value(&value),
    };
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
