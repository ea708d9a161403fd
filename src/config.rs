use anyhow::Context;
use chrono::NaiveDate;
use etfperf::models::AnswerSets;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_TICKER_FILE: &str = "etfs.txt";
pub const DEFAULT_CHART_OUTPUT: &str = "etf_performance.svg";
pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart/";

// Market data provider settings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSourceConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub rate_limit_per_minute: u32,
    pub random_agent: bool,
}

impl Default for DataSourceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
            rate_limit_per_minute: 60,
            random_agent: true,
        }
    }
}

// YAML-serializable configuration structure
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct ConfigYaml {
    pub ticker_file: Option<PathBuf>,
    pub chart_output: Option<PathBuf>,
    pub answers: Option<AnswerSets>,
    pub data_source: Option<DataSourceConfig>,
    // dd/mm/yyyy, like the interactive prompts
    pub extra_holidays: Option<Vec<String>>,
    pub report_failed_tickers: Option<bool>,
}

// Holds application-wide settings
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub ticker_file: PathBuf,
    pub chart_output: PathBuf,
    pub answers: AnswerSets,
    pub data_source: DataSourceConfig,
    pub extra_holidays: Vec<NaiveDate>,
    pub report_failed_tickers: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            ticker_file: PathBuf::from(DEFAULT_TICKER_FILE),
            chart_output: PathBuf::from(DEFAULT_CHART_OUTPUT),
            answers: AnswerSets::default(),
            data_source: DataSourceConfig::default(),
            extra_holidays: Vec::new(),
            report_failed_tickers: false,
        }
    }
}

impl AppConfig {
    // Load configuration from an explicit YAML file, CONFIG_FILE, or environment variables
    pub fn load(config_file: Option<&Path>) -> anyhow::Result<Self> {
        if let Some(path) = config_file {
            return Self::from_yaml(path);
        }
        match env::var("CONFIG_FILE") {
            Ok(path) => Self::from_yaml(Path::new(&path)),
            Err(_) => Self::from_env(),
        }
    }

    // Load configuration from YAML file
    pub fn from_yaml(file_path: &Path) -> anyhow::Result<Self> {
        let yaml_content = fs::read_to_string(file_path)
            .with_context(|| format!("Failed to read config file {}", file_path.display()))?;
        Self::from_yaml_str(&yaml_content)
    }

    pub fn from_yaml_str(yaml_content: &str) -> anyhow::Result<Self> {
        let yaml_config: ConfigYaml =
            serde_yaml::from_str(yaml_content).context("Failed to parse YAML config")?;
        let defaults = Self::default();

        Ok(Self {
            ticker_file: yaml_config.ticker_file.unwrap_or(defaults.ticker_file),
            chart_output: yaml_config.chart_output.unwrap_or(defaults.chart_output),
            answers: yaml_config.answers.unwrap_or_default(),
            data_source: yaml_config.data_source.unwrap_or_default(),
            extra_holidays: parse_holidays(yaml_config.extra_holidays.unwrap_or_default())?,
            report_failed_tickers: yaml_config.report_failed_tickers.unwrap_or(false),
        })
    }

    // Load all configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if present
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let list = |key: &str, fallback: Vec<String>| {
            lookup(key)
                .map(|raw| {
                    raw.split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(String::from)
                        .collect::<Vec<String>>()
                })
                .filter(|values| !values.is_empty())
                .unwrap_or(fallback)
        };

        let answers = AnswerSets {
            open_file: list("OPEN_FILE_ANSWERS", defaults.answers.open_file),
            write: list("WRITE_ANSWERS", defaults.answers.write),
            positive: list("POSITIVE_ANSWERS", defaults.answers.positive),
            negative: list("NEGATIVE_ANSWERS", defaults.answers.negative),
        };

        let data_source = DataSourceConfig {
            base_url: lookup("DATA_SOURCE_URL").unwrap_or(defaults.data_source.base_url),
            timeout_secs: lookup("DATA_SOURCE_TIMEOUT")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.data_source.timeout_secs),
            rate_limit_per_minute: lookup("DATA_SOURCE_RATE_LIMIT")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.data_source.rate_limit_per_minute),
            random_agent: lookup("DATA_SOURCE_RANDOM_AGENT")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.data_source.random_agent),
        };

        Ok(Self {
            ticker_file: lookup("ETF_FILE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.ticker_file),
            chart_output: lookup("CHART_OUTPUT")
                .map(PathBuf::from)
                .unwrap_or(defaults.chart_output),
            answers,
            data_source,
            extra_holidays: parse_holidays(list("EXTRA_HOLIDAYS", Vec::new()))?,
            report_failed_tickers: lookup("REPORT_FAILED_TICKERS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(false),
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.data_source.timeout_secs)
    }
}

fn parse_holidays(raw: Vec<String>) -> anyhow::Result<Vec<NaiveDate>> {
    raw.iter()
        .map(|value| {
            etfperf::utils::parse_input_date(value)
                .with_context(|| format!("Invalid holiday date {:?}, expected dd/mm/yyyy", value))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_env_defaults() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.ticker_file, PathBuf::from("etfs.txt"));
        assert_eq!(config.chart_output, PathBuf::from("etf_performance.svg"));
        assert_eq!(config.answers, AnswerSets::default());
        assert_eq!(config.data_source, DataSourceConfig::default());
        assert!(config.extra_holidays.is_empty());
        assert!(!config.report_failed_tickers);
    }

    #[test]
    fn test_env_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            ("ETF_FILE_PATH", "/data/funds.txt"),
            ("POSITIVE_ANSWERS", "y, yes, s"),
            ("DATA_SOURCE_RATE_LIMIT", "10"),
            ("EXTRA_HOLIDAYS", "09/01/2025"),
            ("REPORT_FAILED_TICKERS", "true"),
        ]))
        .unwrap();

        assert_eq!(config.ticker_file, PathBuf::from("/data/funds.txt"));
        assert_eq!(config.answers.positive, vec!["y", "yes", "s"]);
        assert_eq!(config.answers.negative, vec!["n", "no"]);
        assert_eq!(config.data_source.rate_limit_per_minute, 10);
        assert_eq!(
            config.extra_holidays,
            vec![NaiveDate::from_ymd_opt(2025, 1, 9).unwrap()]
        );
        assert!(config.report_failed_tickers);
    }

    #[test]
    fn test_yaml_config() {
        let config = AppConfig::from_yaml_str(
            r#"
ticker_file: my_etfs.txt
chart_output: out/chart.svg
data_source:
  timeout_secs: 5
report_failed_tickers: true
"#,
        )
        .unwrap();

        assert_eq!(config.ticker_file, PathBuf::from("my_etfs.txt"));
        assert_eq!(config.chart_output, PathBuf::from("out/chart.svg"));
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
        assert_eq!(config.data_source.base_url, DEFAULT_BASE_URL);
        assert!(config.report_failed_tickers);
    }

    #[test]
    fn test_bad_holiday_is_rejected() {
        let err = AppConfig::from_yaml_str("extra_holidays: [\"2025-01-09\"]").unwrap_err();
        assert!(err.to_string().contains("Invalid holiday date"));
    }
}
