use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use itertools::Itertools;
use log::LevelFilter;
use parse_display::{Display, FromStr};
use pitchstats::{PlayerQuery, PositionCategory, Scale, Selection, Table};
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};
use std::path::PathBuf;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Display, FromStr)]
#[display(style = "lowercase")]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[arg(short = 'f', long = "file", value_name = "FILE")]
    file: PathBuf,

    /// Field delimiter of the input file.
    #[arg(short = 'd', long, default_value = ",", value_parser = parse_delimiter)]
    delimiter: u8,

    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Filter players and optionally rescale stat columns to a common range.
    Query(QueryArgs),
    /// List the distinct values of a column.
    Values {
        #[arg(short, long)]
        column: String,
    },
    /// Print the integer min and max of a numeric column.
    Range {
        #[arg(short, long)]
        column: String,
    },
    /// List squads, optionally only those in the given competitions.
    Squads {
        #[arg(short, long = "comp")]
        competitions: Vec<String>,
    },
    /// Look up a player's position and category.
    Position {
        #[arg(short, long)]
        player: String,
    },
}

#[derive(Args, Debug)]
struct QueryArgs {
    /// JSON file with predicates; flags given on the command line win.
    #[arg(long, value_name = "FILE")]
    query_file: Option<PathBuf>,

    #[arg(long)]
    min_goals: Option<f64>,

    #[arg(long)]
    min_assists: Option<f64>,

    /// Competition to keep; repeat to keep several.
    #[arg(short, long = "comp")]
    competitions: Vec<String>,

    /// Squad to keep; repeat to keep several.
    #[arg(short, long = "squad")]
    squads: Vec<String>,

    #[arg(long)]
    min_age: Option<i64>,

    #[arg(long)]
    max_age: Option<i64>,

    #[arg(long)]
    min_minutes: Option<f64>,

    /// Columns to rescale.
    #[arg(short, long, value_delimiter = ',')]
    normalize: Vec<String>,

    /// Rescale the comparison columns of a position category.
    #[arg(long, value_parser = parse_category, conflicts_with = "normalize")]
    category: Option<PositionCategory>,

    #[arg(long, default_value_t = 0.0)]
    scale_min: f64,

    #[arg(long, default_value_t = 100.0)]
    scale_max: f64,

    #[arg(long, default_value = "table")]
    format: OutputFormat,
}

fn parse_delimiter(s: &str) -> std::result::Result<u8, String> {
    match s.as_bytes() {
        [byte] => Ok(*byte),
        _ if s == "\\t" => Ok(b'\t'),
        _ => Err(format!("delimiter must be a single byte, got {:?}", s)),
    }
}

fn parse_category(s: &str) -> std::result::Result<PositionCategory, String> {
    s.to_uppercase()
        .parse()
        .map_err(|_| format!("unknown category {:?}, use attack, defense or goalkeeper", s))
}

/// Wraps repeated flag values: one value is an equality test, more a membership test.
fn selection(values: Vec<String>) -> Option<Selection> {
    match values.len() {
        0 => None,
        1 => values.into_iter().next().map(Selection::Equals),
        _ => Some(Selection::OneOf(values)),
    }
}

fn build_query(args: &QueryArgs) -> Result<PlayerQuery> {
    let mut query = match &args.query_file {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?
        }
        None => PlayerQuery::new(),
    };

    if let Some(goals) = args.min_goals {
        query = query.min_goals(goals);
    }
    if let Some(assists) = args.min_assists {
        query = query.min_assists(assists);
    }
    if let Some(competitions) = selection(args.competitions.clone()) {
        query = query.competitions(competitions);
    }
    if let Some(squads) = selection(args.squads.clone()) {
        query = query.squads(squads);
    }
    match (args.min_age, args.max_age) {
        (None, None) => {}
        (low, high) => {
            let low = low.unwrap_or(i64::MIN);
            let high = high.unwrap_or(i64::MAX);
            if low > high {
                bail!("--min-age {} is greater than --max-age {}", low, high);
            }
            query = query.age_range(low, high);
        }
    }
    if let Some(minutes) = args.min_minutes {
        query = query.min_minutes(minutes);
    }
    Ok(query)
}

fn run_query(table: &Table, args: &QueryArgs) -> Result<()> {
    let query = build_query(args)?;
    log::debug!("Query {:?}", query);
    if query.is_empty() {
        log::info!("No predicates given, keeping every player");
    }

    let filtered = table.filter(&query)?;
    log::info!("{} of {} players match", filtered.height(), table.height());

    let columns: Vec<String> = match args.category {
        Some(category) => category
            .stat_columns()
            .iter()
            .map(|c| c.to_string())
            .collect(),
        None => args.normalize.clone(),
    };
    let normalized = if columns.is_empty() {
        None
    } else {
        let scale = Scale::new(args.scale_min, args.scale_max);
        Some(filtered.normalize(columns.as_slice(), scale)?)
    };

    match args.format {
        OutputFormat::Table => {
            println!("{}", filtered);
            if let Some(normalized) = &normalized {
                if let Some(category) = args.category {
                    println!("{}", category.title());
                }
                println!("{}", normalized);
            }
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "raw": filtered.records()?,
                "normalized": normalized.map(|t| t.records()).transpose()?,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set the default level based on verbosity
    let default_level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    let config = ConfigBuilder::new()
        .add_filter_allow_str("pitchstats")
        .build();

    TermLogger::init(
        default_level,
        config,
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )?;

    log::trace!("Args {:#?}", cli);

    let table = Table::load_with(&cli.file, cli.delimiter)
        .with_context(|| format!("loading {}", cli.file.display()))?;
    log::info!("Loaded {} players", table.height());

    match &cli.command {
        Command::Query(args) => run_query(&table, args)?,
        Command::Values { column } => {
            let values = table.unique_values(column)?;
            println!("{}", values.to_strings().iter().join("\n"));
        }
        Command::Range { column } => {
            let (min, max) = table.column_range(column)?;
            println!("{} {}", min, max);
        }
        Command::Squads { competitions } => {
            let squads = table.squads_for_competitions(competitions.as_slice())?;
            println!("{}", squads.iter().join("\n"));
        }
        Command::Position { player } => match table.position_of(player)? {
            Some(pos) => println!("{} ({})", pos, PositionCategory::of(&pos)),
            None => bail!("No player named {:?}", player),
        },
    }

    Ok(())
}
