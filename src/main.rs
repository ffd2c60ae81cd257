use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{ArgGroup, Args, Parser, Subcommand};
use serde::Serialize;

use wordzy_ranking::config::AppConfig;
use wordzy_ranking::report::{self, format_entry};
use wordzy_ranking::source::{snapshot, CsvFileSource, JsonFileSource};
use wordzy_ranking::{
    build_ranking, cohorts_for_program, compute_metrics, programs_for_cohort, ranking,
    telemetry, PeriodFilter, RankingScope, RawStudentRecord,
};

#[derive(Parser)]
#[command(name = "wordzy-ranking")]
#[command(about = "Learner rankings and filter options for Wordzy", long_about = None)]
struct Cli {
    /// Saved user listing (API JSON payload, or CSV with --csv)
    #[arg(long, global = true, default_value = "users.json")]
    input: PathBuf,
    /// Read the input as a flat CSV export
    #[arg(long, global = true)]
    csv: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct PeriodArgs {
    #[arg(long)]
    year: Option<i32>,
    /// 1-12 or a month name
    #[arg(long)]
    month: Option<String>,
}

impl PeriodArgs {
    fn filter(&self) -> anyhow::Result<PeriodFilter> {
        let month = match self.month.as_deref() {
            Some(value) => Some(
                ranking::parse_month(value)
                    .with_context(|| format!("unrecognized month '{value}'"))?,
            ),
            None => None,
        };
        Ok(PeriodFilter::new(self.year, month))
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print a ranking
    Rank {
        /// global, cohort or program
        #[arg(long, default_value = "global")]
        scope: String,
        /// Cohort code or program name for scoped rankings
        #[arg(long)]
        value: Option<String>,
        #[command(flatten)]
        period: PeriodArgs,
        #[arg(long, default_value_t = 10)]
        limit: usize,
        #[arg(long)]
        json: bool,
    },
    /// List cohort and program filter options
    #[command(group(
        ArgGroup::new("cross")
            .args(["cohort", "program"])
            .multiple(false)
    ))]
    Options {
        #[arg(long)]
        cohort: Option<String>,
        #[arg(long)]
        program: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Print dashboard summary counts
    Metrics {
        #[arg(long)]
        json: bool,
    },
    /// Generate a markdown report
    Report {
        #[arg(long)]
        cohort: Option<String>,
        #[arg(long)]
        program: Option<String>,
        #[command(flatten)]
        period: PeriodArgs,
        #[arg(long, default_value_t = 10)]
        limit: usize,
        #[arg(long, default_value = "ranking.md")]
        out: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load().context("failed to load configuration")?;
    telemetry::init(&config.telemetry).context("failed to initialise logging")?;

    let records = load_records(&cli.input, cli.csv).await;
    let ranking_config = &config.ranking;

    match cli.command {
        Commands::Rank {
            scope,
            value,
            period,
            limit,
            json,
        } => {
            let scope = RankingScope::from_label(&scope);
            let entries = build_ranking(
                &records,
                scope,
                value.as_deref(),
                &period.filter()?,
                ranking_config,
            );

            if json {
                print_json(&entries)?;
            } else if entries.is_empty() {
                println!("No learners with points for this selection.");
            } else {
                for entry in entries.iter().take(limit) {
                    println!("{}", format_entry(entry));
                }
            }
        }
        Commands::Options {
            cohort,
            program,
            json,
        } => {
            let cohorts = cohorts_for_program(&records, program.as_deref(), ranking_config);
            let programs = programs_for_cohort(&records, cohort.as_deref(), ranking_config);

            if json {
                #[derive(Serialize)]
                struct OptionLists<'a> {
                    cohorts: &'a [wordzy_ranking::CohortOption],
                    programs: &'a [wordzy_ranking::ProgramOption],
                }
                print_json(&OptionLists {
                    cohorts: &cohorts,
                    programs: &programs,
                })?;
            } else {
                println!("Cohorts:");
                for option in &cohorts {
                    println!("- {} ({})", option.display_name, option.id);
                }
                println!("Programs:");
                for option in &programs {
                    println!("- {} [{}]", option.display_name, option.code);
                }
            }
        }
        Commands::Metrics { json } => {
            let metrics = compute_metrics(&records, ranking_config);
            if json {
                print_json(&metrics)?;
            } else {
                println!("Learners: {}", metrics.total_learners);
                println!("Cohorts: {}", metrics.total_cohorts);
                println!("Programs: {}", metrics.total_programs);
            }
        }
        Commands::Report {
            cohort,
            program,
            period,
            limit,
            out,
        } => {
            let report = report::build_report(
                &records,
                cohort.as_deref(),
                program.as_deref(),
                &period.filter()?,
                limit,
                ranking_config,
            );
            std::fs::write(&out, report)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}

/// Load failures are logged by `snapshot` and leave the tool with no records.
async fn load_records(input: &Path, csv: bool) -> Vec<RawStudentRecord> {
    if csv {
        snapshot(&CsvFileSource::new(input)).await
    } else {
        snapshot(&JsonFileSource::new(input)).await
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
