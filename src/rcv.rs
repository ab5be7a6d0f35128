use log::{debug, info, warn};

use instant_runoff::builder::Builder;
use instant_runoff::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::path::{Path, PathBuf};

use calamine::{open_workbook, Reader, Xlsx};

use serde_json::json;
use serde_json::Map as JSMap;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;
use crate::rcv::config_reader::*;

mod config_reader;
mod io_common;
mod io_csv;
mod io_xlsx;

#[derive(Debug, Snafu)]
pub enum RcvError {
    #[snafu(display("Error opening file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("Worksheet {name} not found in file {path}"))]
    MissingWorksheet { path: String, name: String },
    #[snafu(display("No data found in {path}"))]
    EmptyInput { path: String },
    #[snafu(display("Error opening file {path}"))]
    OpeningCsv { source: csv::Error, path: String },
    #[snafu(display("Error reading line {lineno}"))]
    CsvLineParse { source: csv::Error, lineno: usize },
    #[snafu(display("Line {lineno}, column {column}: expected a rank, found {content}"))]
    WrongCellType {
        lineno: usize,
        column: String,
        content: String,
    },
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Field {field} is not a valid number"))]
    ParsingJsonNumber { field: String },
    #[snafu(display("No input file: pass a file on the command line or a filePath in the config"))]
    MissingInput {},
    #[snafu(display("Unknown input type {input_type} (supported: xlsx, csv)"))]
    UnknownInputType { input_type: String },
    #[snafu(display(
        "Unknown tie-breaking rule {rule} (supported: refuse, candidate-order, random, rvh)"
    ))]
    UnknownTiebreakMode { rule: String },
    #[snafu(display("The tie-breaking rule {rule} requires a seed"))]
    MissingSeed { rule: String },
    #[snafu(display("Invalid election: {source}"))]
    Voting { source: VotingErrors },
    #[snafu(display("Error writing the summary to {path}"))]
    WritingSummary {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Difference detected between calculated summary and reference summary {path}"))]
    ReferenceMismatch { path: String },
}

pub type RcvResult<T> = Result<T, RcvError>;

/// A ballot, as parsed by the readers: the rank of each candidate it ranks.
#[derive(PartialEq, Debug, Clone)]
pub struct ParsedBallot {
    pub lineno: usize,
    pub ranks: Vec<(String, f64)>,
}

/// The content of a spreadsheet: the names of the candidates, in column order, and the ballots.
#[derive(PartialEq, Debug, Clone)]
pub struct ParsedTable {
    pub candidates: Vec<String>,
    pub ballots: Vec<ParsedBallot>,
}

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
enum InputType {
    Xlsx,
    Csv,
}

impl InputType {
    fn parse(s: &str) -> RcvResult<InputType> {
        match s.to_lowercase().as_str() {
            "xlsx" | "xlsm" | "excel" | "msforms" => Ok(InputType::Xlsx),
            "csv" => Ok(InputType::Csv),
            _ => UnknownInputTypeSnafu { input_type: s }.fail(),
        }
    }

    fn from_path(path: &str) -> RcvResult<InputType> {
        let ext = Path::new(path)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("");
        InputType::parse(ext)
    }
}

/// Everything needed to run an election, once the command line and the config file are merged.
#[derive(PartialEq, Debug, Clone)]
struct ElectionSettings {
    input_path: String,
    input_type: InputType,
    first_column_index: usize,
    worksheet_name: Option<String>,
    rules: ElectionRules,
    contest: String,
    out: Option<String>,
}

fn parse_tiebreak(rule: &str, seed: Option<u32>) -> RcvResult<TieBreakMode> {
    let normalized: String = rule
        .chars()
        .filter(|c| *c != '-' && *c != '_')
        .collect::<String>()
        .to_lowercase();
    let with_seed = |f: fn(u32) -> TieBreakMode| match seed {
        Some(s) => Ok(f(s)),
        None => MissingSeedSnafu { rule }.fail(),
    };
    match normalized.as_str() {
        "refuse" | "all" => Ok(TieBreakMode::Refuse),
        "candidateorder" | "usecandidateorder" => Ok(TieBreakMode::UseCandidateOrder),
        "random" => with_seed(TieBreakMode::Random),
        "rvh" | "randomvoterhierarchy" => with_seed(TieBreakMode::RandomVoterHierarchy),
        _ => UnknownTiebreakModeSnafu { rule }.fail(),
    }
}

fn resolve_settings(args: &Args, config: Option<(&Path, &RcvConfig)>) -> RcvResult<ElectionSettings> {
    let default_config = RcvConfig::default();
    let (config_dir, config) = match config {
        Some((p, c)) => (Some(p), c),
        None => (None, &default_config),
    };

    let input_path: String = match (&args.input, &config.source.file_path) {
        (Some(p), _) => p.clone(),
        // Relative to the location of the config file.
        (None, Some(p)) => {
            let full: PathBuf = config_dir.unwrap_or_else(|| Path::new("")).join(p);
            full.display().to_string()
        }
        (None, None) => return MissingInputSnafu {}.fail(),
    };

    let input_type = match args
        .input_type
        .as_ref()
        .or(config.source.provider.as_ref())
    {
        Some(t) => InputType::parse(t)?,
        None => InputType::from_path(&input_path)?,
    };

    let first_column_index = match args.first_column_index {
        Some(x) => x,
        None => config.source.first_vote_column_index()?.unwrap_or(1),
    };

    let seed = match args.seed {
        Some(s) => Some(s),
        None => config.rules.random_seed()?,
    };
    let rule = args
        .tie_breaking_rule
        .as_ref()
        .or(config.rules.tiebreak_mode.as_ref())
        .map(|s| s.as_str())
        .unwrap_or("refuse");
    let rules = ElectionRules::with_tiebreak(parse_tiebreak(rule, seed)?);

    let contest = config
        .output_settings
        .contest_name
        .clone()
        .unwrap_or_else(|| io_common::simplify_file_name(&input_path));

    let out = match (&args.out, &config.output_settings.output_directory) {
        (Some(o), _) => Some(o.clone()),
        (None, Some(dir)) => {
            let full: PathBuf = config_dir
                .unwrap_or_else(|| Path::new(""))
                .join(dir)
                .join("summary.json");
            Some(full.display().to_string())
        }
        (None, None) => None,
    };

    Ok(ElectionSettings {
        input_path,
        input_type,
        first_column_index,
        worksheet_name: args
            .excel_worksheet_name
            .clone()
            .or_else(|| config.source.excel_worksheet_name.clone()),
        rules,
        contest,
        out,
    })
}

fn read_ranking_data(settings: &ElectionSettings) -> RcvResult<ParsedTable> {
    info!(
        "Attempting to read rank file {:?} ({:?})",
        settings.input_path, settings.input_type
    );
    match settings.input_type {
        InputType::Xlsx => io_xlsx::read_xlsx_ranking(
            &settings.input_path,
            settings.first_column_index,
            settings.worksheet_name.as_deref(),
        ),
        InputType::Csv => {
            io_csv::read_csv_ranking(&settings.input_path, settings.first_column_index)
        }
    }
}

fn build_election(table: &ParsedTable, rules: &ElectionRules) -> RcvResult<Election> {
    let mut builder = Builder::new(rules)
        .and_then(|b| b.candidates(&table.candidates))
        .context(VotingSnafu {})?;
    for pb in table.ballots.iter() {
        debug!("build_election: line {}: {:?}", pb.lineno, pb.ranks);
        builder.add_vote(&pb.ranks).context(VotingSnafu {})?;
    }
    builder.build().context(VotingSnafu {})
}

fn names(candidates: &[Candidate]) -> String {
    let names: Vec<&str> = candidates.iter().map(|c| c.name()).collect();
    names.join(", ")
}

/// The progress of the election, round by round, in a human-readable form.
fn format_rounds(election: &Election, result: &ElectionResult) -> String {
    let num_ballots = election.ballots().len();
    let mut lines: Vec<String> = Vec::new();
    for (idx, stats) in result.round_stats.iter().enumerate() {
        if idx > 0 {
            lines.push("".to_string());
        }
        lines.push("-------------------------------------".to_string());
        lines.push(format!(
            "Round #{} of election with {} ballots and {} candidates",
            stats.round,
            num_ballots,
            stats.tally.len()
        ));
        lines.push("".to_string());

        for (c, pct) in stats.tally.standings() {
            lines.push(format!("{}: {:.2}%", c, pct));
        }

        if let Some(winner) = &stats.elected {
            lines.push("".to_string());
            lines.push(format!("Majority winner: {}", winner));
            continue;
        }
        lines.push("".to_string());
        lines.push("The top-preference candidates do not have absolute majority.".to_string());

        let least_voted = stats.tally.bottom_candidates();
        lines.push("".to_string());
        if least_voted.len() > 1 {
            lines.push(format!(
                "Tied candidates with the least preferences: {}",
                names(&least_voted)
            ));
        } else {
            lines.push(format!(
                "Candidate with the least preferences: {}",
                names(&least_voted)
            ));
        }

        lines.push("".to_string());
        if stats.eliminated.is_empty() {
            if let Outcome::Tie(tied) = &result.outcome {
                lines.push(format!("All remaining candidates are tied: {}", names(tied)));
            }
        } else {
            lines.push(format!(
                "Eliminating candidate{} with the least preferences: {}",
                if stats.eliminated.len() > 1 { "s" } else { "" },
                names(&stats.eliminated)
            ));
        }
    }
    lines.join("\n")
}

fn result_stats_to_json(rs: &ElectionResult) -> Vec<JSValue> {
    let mut l: Vec<JSValue> = Vec::new();
    for round_stat in rs.round_stats.iter() {
        let mut tally: JSMap<String, JSValue> = JSMap::new();
        for (c, count) in round_stat.tally.iter() {
            tally.insert(c.name().to_string(), json!(count.to_string()));
        }

        let mut tally_results: Vec<JSValue> = Vec::new();
        for c in round_stat.eliminated.iter() {
            tally_results.push(json!({ "eliminated": c.name() }));
        }
        if let Some(c) = &round_stat.elected {
            tally_results.push(json!({ "elected": c.name() }));
        }

        let js = json!({"round": round_stat.round, "tally": tally, "tallyResults": tally_results});
        l.push(js);
    }
    l
}

fn build_summary_js(contest: &str, rules: &ElectionRules, rv: &ElectionResult) -> JSValue {
    let c = OutputConfig {
        contest: contest.to_string(),
        tiebreak_mode: rules.tiebreak_mode.name().to_string(),
        random_seed: rules.tiebreak_mode.seed().map(|s| s.to_string()),
    };
    let outcome = match &rv.outcome {
        Outcome::Winner(c) => json!({ "winner": c.name() }),
        Outcome::Tie(cs) => {
            let tied: Vec<&str> = cs.iter().map(|c| c.name()).collect();
            json!({ "tie": tied })
        }
    };
    json!({
        "config": c,
        "results": result_stats_to_json(rv),
        "outcome": outcome })
}

fn write_summary(out: &str, pretty_js: &str) -> RcvResult<()> {
    if out == "stdout" {
        println!("{}", pretty_js);
        return Ok(());
    }
    if let Some(dir) = Path::new(out).parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir).context(WritingSummarySnafu { path: out })?;
        }
    }
    info!("Writing summary to {:?}", out);
    fs::write(out, pretty_js).context(WritingSummarySnafu { path: out })
}

fn check_reference(reference_path: &str, pretty_js_stats: &str) -> RcvResult<()> {
    let summary_ref = read_summary(reference_path)?;
    debug!("summary: {:?}", summary_ref);
    let pretty_js_summary_ref =
        serde_json::to_string_pretty(&summary_ref).context(ParsingJsonSnafu {})?;
    if pretty_js_summary_ref != pretty_js_stats {
        warn!("Found differences with the reference string");
        print_diff(pretty_js_summary_ref.as_str(), pretty_js_stats, "\n");
        return ReferenceMismatchSnafu {
            path: reference_path,
        }
        .fail();
    }
    info!("The summary matches the reference {:?}", reference_path);
    Ok(())
}

/// Runs an election as described by the command line, and prints its progress.
pub fn run_election(args: &Args) -> RcvResult<ElectionResult> {
    let config: Option<(PathBuf, RcvConfig)> = match &args.config {
        Some(config_path) => {
            let config = read_config(config_path)?;
            let config_dir = Path::new(config_path)
                .parent()
                .unwrap_or_else(|| Path::new(""))
                .to_path_buf();
            Some((config_dir, config))
        }
        None => None,
    };
    let settings = resolve_settings(
        args,
        config.as_ref().map(|(p, c)| (p.as_path(), c)),
    )?;
    info!("settings: {:?}", settings);

    let table = read_ranking_data(&settings)?;
    let election = build_election(&table, &settings.rules)?;
    let mut sorted_names = table.candidates.clone();
    sorted_names.sort();
    println!(
        "Read {} ballots and {} candidates from {}.",
        election.ballots().len(),
        election.candidates().len(),
        settings.input_path
    );
    println!("Candidates: {}", sorted_names.join(", "));
    println!();

    let result = election.instant_runoff();
    println!("{}", format_rounds(&election, &result));

    let result_js = build_summary_js(&settings.contest, &settings.rules, &result);
    let pretty_js_stats = serde_json::to_string_pretty(&result_js).context(ParsingJsonSnafu {})?;
    if let Some(out) = &settings.out {
        write_summary(out, &pretty_js_stats)?;
    }

    // The reference summary, if provided for comparison
    if let Some(reference) = &args.reference {
        check_reference(reference, &pretty_js_stats)?;
    }

    Ok(result)
}
