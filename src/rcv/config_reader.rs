use crate::rcv::*;

use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize, Default)]
pub struct OutputSettings {
    #[serde(rename = "contestName")]
    pub contest_name: Option<String>,
    #[serde(rename = "outputDirectory")]
    pub output_directory: Option<String>,
}

/// What is written in the "config" section of the summary.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub contest: String,
    #[serde(rename = "tieBreakMode")]
    pub tiebreak_mode: String,
    #[serde(rename = "randomSeed", skip_serializing_if = "Option::is_none")]
    pub random_seed: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileSource {
    pub provider: Option<String>,
    #[serde(rename = "filePath")]
    pub file_path: Option<String>,
    #[serde(rename = "firstVoteColumnIndex")]
    _first_vote_column_index: Option<JSValue>,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
}

impl FileSource {
    /// The index of the first column of candidates, counting from 0.
    pub fn first_vote_column_index(&self) -> RcvResult<Option<usize>> {
        read_js_int(&self._first_vote_column_index, "firstVoteColumnIndex")
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize, Default)]
pub struct RcvRules {
    #[serde(rename = "tiebreakMode")]
    pub tiebreak_mode: Option<String>,
    #[serde(rename = "randomSeed")]
    _random_seed: Option<JSValue>,
}

impl RcvRules {
    pub fn random_seed(&self) -> RcvResult<Option<u32>> {
        match read_js_int(&self._random_seed, "randomSeed")? {
            Some(x) => u32::try_from(x)
                .ok()
                .map(Some)
                .context(ParsingJsonNumberSnafu { field: "randomSeed" }),
            None => Ok(None),
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize, Default)]
pub struct RcvConfig {
    #[serde(rename = "outputSettings", default)]
    pub output_settings: OutputSettings,
    #[serde(default)]
    pub source: FileSource,
    #[serde(default)]
    pub rules: RcvRules,
}

pub fn read_config(path: &str) -> RcvResult<RcvConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    parse_config(&contents)
}

pub fn parse_config(contents: &str) -> RcvResult<RcvConfig> {
    let config: RcvConfig = serde_json::from_str(contents).context(ParsingJsonSnafu {})?;
    debug!("parse_config: {:?}", config);
    Ok(config)
}

pub fn read_summary(path: &str) -> RcvResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(js)
}

fn read_js_int(x: &Option<JSValue>, field: &str) -> RcvResult<Option<usize>> {
    match x {
        None | Some(JSValue::Null) => Ok(None),
        Some(JSValue::Number(n)) => n
            .as_u64()
            .map(|x| Some(x as usize))
            .context(ParsingJsonNumberSnafu { field }),
        Some(JSValue::String(s)) => s
            .trim()
            .parse::<usize>()
            .ok()
            .map(Some)
            .context(ParsingJsonNumberSnafu { field }),
        _ => None.context(ParsingJsonNumberSnafu { field }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_config() {
        let config = parse_config(
            r#"{
                "outputSettings": { "contestName": "Board", "outputDirectory": "out" },
                "source": {
                    "filePath": "ballots.xlsx",
                    "provider": "xlsx",
                    "firstVoteColumnIndex": "2",
                    "excelWorksheetName": "Form1"
                },
                "rules": { "tiebreakMode": "random", "randomSeed": 42 }
            }"#,
        )
        .unwrap();
        assert_eq!(config.output_settings.contest_name, Some("Board".to_string()));
        assert_eq!(config.source.file_path, Some("ballots.xlsx".to_string()));
        assert_eq!(config.source.first_vote_column_index().unwrap(), Some(2));
        assert_eq!(config.rules.tiebreak_mode, Some("random".to_string()));
        assert_eq!(config.rules.random_seed().unwrap(), Some(42));
    }

    #[test]
    fn empty_config() {
        let config = parse_config("{}").unwrap();
        assert_eq!(config, RcvConfig::default());
        assert_eq!(config.source.first_vote_column_index().unwrap(), None);
        assert_eq!(config.rules.random_seed().unwrap(), None);
    }

    #[test]
    fn bad_numbers() {
        let config = parse_config(
            r#"{ "source": { "firstVoteColumnIndex": "B" },
                 "rules": { "randomSeed": -3 } }"#,
        )
        .unwrap();
        assert!(matches!(
            config.source.first_vote_column_index(),
            Err(RcvError::ParsingJsonNumber { .. })
        ));
        assert!(config.rules.random_seed().is_err());
        assert!(matches!(
            parse_config("{ \"rules\": "),
            Err(RcvError::ParsingJson { .. })
        ));
    }
}
