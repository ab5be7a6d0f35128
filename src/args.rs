use clap::Parser;

/// Reads ranked ballots from a spreadsheet and runs an instant-runoff election.
#[derive(Parser, Debug, Clone, Default)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path) The spreadsheet containing the ballots (Excel .xlsx or .csv). One column per
    /// candidate, one row per ballot, the names of the candidates in the first row.
    #[clap(value_parser)]
    pub input: Option<String>,

    /// (default 1) The 0-based index of the first column containing candidate rankings.
    /// The columns before it (timestamps, emails, ...) are ignored.
    #[clap(short = 'f', long, value_parser)]
    pub first_column_index: Option<usize>,

    /// (default refuse) The rule to use for breaking ties between the candidates with the
    /// fewest votes: refuse, candidate-order, random or rvh (random voter hierarchy).
    #[clap(short = 't', long, value_parser)]
    pub tie_breaking_rule: Option<String>,

    /// (number) The seed of the random tie-breaking rules.
    #[clap(short = 's', long, value_parser)]
    pub seed: Option<u32>,

    /// (file path, optional) A JSON file describing the election. The other options take
    /// precedence over the values in this file.
    #[clap(short = 'c', long, value_parser)]
    pub config: Option<String>,

    /// (file path or 'stdout') If specified, the summary of the election will be written in JSON format to the given
    /// location. Setting this option overrides the output directory that may be specified with the --config option.
    #[clap(short = 'o', long, value_parser)]
    pub out: Option<String>,

    /// (file path) A reference file containing the outcome of an election in JSON format. If provided, runoff will
    /// check that the tabulated output matches the reference.
    #[clap(short = 'r', long, value_parser)]
    pub reference: Option<String>,

    /// (xlsx or csv) The type of the input. By default, it is guessed from the extension of the file.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// When using an Excel file, indicates the name of the worksheet to use. The first worksheet is used otherwise.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
