pub mod defaults;

use crate::error::{CliError, Result};
use adscreen::core::io::exemplars::DEFAULT_EXEMPLAR_SHEET;
use adscreen::engine::config::{
    self as core_config, ClassificationThresholds, ComparisonConfigBuilder, NovelConfig,
    ScoringConfigBuilder, ScreenConfig,
};
use adscreen::engine::regions::default_dbd_keywords;
use defaults::DefaultsConfig;
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct PartialScoringConfig {
    pae_cutoff: Option<f64>,
    models: Option<usize>,
    predictions: Option<usize>,
    partition_chain: Option<char>,
    result_template: Option<String>,
    pdb_name: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct PartialClassificationConfig {
    best_lis: Option<f64>,
    best_lia: Option<f64>,
    average_lis: Option<f64>,
    average_lia: Option<f64>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct PartialRegionsConfig {
    keywords: Option<Vec<String>>,
    exemplar_sheet: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct PartialComparisonConfig {
    reference_chain: Option<char>,
    target_chain: Option<char>,
    residue_start: Option<isize>,
    residue_end: Option<isize>,
    contact_threshold: Option<f64>,
    key_pairs: Option<Vec<(isize, isize)>>,
    model_file: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct PartialNovelConfig {
    score_high: Option<f64>,
    score_low: Option<f64>,
    plddt_high: Option<f64>,
    plddt_low: Option<f64>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct PartialScreenConfig {
    pae_cutoff: Option<f64>,
    pdb_name: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct PartialNetworkConfig {
    user_agent: Option<String>,
    timeout_secs: Option<u64>,
    request_delay_ms: Option<u64>,
}

/// Every configuration section, each optional, as read from a TOML file and `--set`.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialConfig {
    scoring: Option<PartialScoringConfig>,
    classification: Option<PartialClassificationConfig>,
    regions: Option<PartialRegionsConfig>,
    comparison: Option<PartialComparisonConfig>,
    novel: Option<PartialNovelConfig>,
    screen: Option<PartialScreenConfig>,
    network: Option<PartialNetworkConfig>,
}

/// HTTP client settings for the UniProt and AlphaMissense lookups.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkSettings {
    pub user_agent: String,
    pub timeout: Duration,
    /// Pause after every request.
    pub request_delay: Duration,
}

fn parse_value<T: FromStr>(key: &str, value: &str, kind: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| CliError::Config(format!("Invalid {} value for {}: {}", kind, key, value)))
}

fn parse_char(key: &str, value: &str) -> Result<char> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(CliError::Config(format!(
            "Invalid chain value for {}: '{}' (expected a single character)",
            key, value
        ))),
    }
}

impl PartialConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    /// Reads the optional config file and applies `--set` overrides on top.
    pub fn load(path: Option<&Path>, set_values: &[String]) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_set_values(set_values)?;
        Ok(config)
    }

    pub fn scoring_config(
        &self,
        pae_cutoff: Option<f64>,
        partition_chain: Option<char>,
    ) -> Result<core_config::ScoringConfig> {
        let defaults = DefaultsConfig::default();
        let scoring = self.scoring.as_ref();
        let classification = self.classification.as_ref();
        let default_thresholds = ClassificationThresholds::default();
        let thresholds = ClassificationThresholds {
            best_lis: classification
                .and_then(|c| c.best_lis)
                .unwrap_or(default_thresholds.best_lis),
            best_lia: classification
                .and_then(|c| c.best_lia)
                .unwrap_or(default_thresholds.best_lia),
            average_lis: classification
                .and_then(|c| c.average_lis)
                .unwrap_or(default_thresholds.average_lis),
            average_lia: classification
                .and_then(|c| c.average_lia)
                .unwrap_or(default_thresholds.average_lia),
        };

        let builder = ScoringConfigBuilder::new()
            .pae_cutoff(
                pae_cutoff
                    .or(scoring.and_then(|s| s.pae_cutoff))
                    .unwrap_or(defaults.pae_cutoff),
            )
            .models(scoring.and_then(|s| s.models).unwrap_or(defaults.models))
            .predictions(
                scoring
                    .and_then(|s| s.predictions)
                    .unwrap_or(defaults.predictions),
            )
            .partition_chain(partition_chain.or(scoring.and_then(|s| s.partition_chain)))
            .result_template(
                scoring
                    .and_then(|s| s.result_template.clone())
                    .unwrap_or(defaults.result_template),
            )
            .pdb_name(
                scoring
                    .and_then(|s| s.pdb_name.clone())
                    .unwrap_or(defaults.pdb_name),
            )
            .thresholds(thresholds);
        Ok(builder.build()?)
    }

    pub fn comparison_config(&self, contact_threshold: Option<f64>) -> Result<core_config::ComparisonConfig> {
        let defaults = DefaultsConfig::default();
        let comparison = self.comparison.as_ref();
        let start = comparison
            .and_then(|c| c.residue_start)
            .unwrap_or(defaults.residue_start);
        let end = comparison
            .and_then(|c| c.residue_end)
            .unwrap_or(defaults.residue_end);
        let builder = ComparisonConfigBuilder::new()
            .reference_chain(
                comparison
                    .and_then(|c| c.reference_chain)
                    .unwrap_or(defaults.reference_chain),
            )
            .target_chain(
                comparison
                    .and_then(|c| c.target_chain)
                    .unwrap_or(defaults.target_chain),
            )
            .residues(start..=end)
            .contact_threshold(
                contact_threshold
                    .or(comparison.and_then(|c| c.contact_threshold))
                    .unwrap_or(defaults.contact_threshold),
            )
            .key_pairs(
                comparison
                    .and_then(|c| c.key_pairs.clone())
                    .unwrap_or(defaults.key_pairs),
            )
            .model_file(
                comparison
                    .and_then(|c| c.model_file.clone())
                    .unwrap_or(defaults.model_file),
            );
        Ok(builder.build()?)
    }

    pub fn novel_config(&self) -> Result<NovelConfig> {
        let base = NovelConfig::default();
        let novel = self.novel.as_ref();
        let config = NovelConfig {
            score_high: novel.and_then(|n| n.score_high).unwrap_or(base.score_high),
            score_low: novel.and_then(|n| n.score_low).unwrap_or(base.score_low),
            plddt_high: novel.and_then(|n| n.plddt_high).unwrap_or(base.plddt_high),
            plddt_low: novel.and_then(|n| n.plddt_low).unwrap_or(base.plddt_low),
        };
        config.validate()?;
        Ok(config)
    }

    /// The screen configuration and the structure file whose chains partition the PAE matrix.
    pub fn screen_config(&self, cutoff: Option<f64>) -> Result<(ScreenConfig, String)> {
        let defaults = DefaultsConfig::default();
        let screen = self.screen.as_ref();
        let pae_cutoff = cutoff
            .or(screen.and_then(|s| s.pae_cutoff))
            .unwrap_or(defaults.screen_cutoff);
        if pae_cutoff <= 0.0 {
            return Err(CliError::Config(format!(
                "`screen.pae-cutoff` must be positive, got {}",
                pae_cutoff
            )));
        }
        let pdb_name = screen
            .and_then(|s| s.pdb_name.clone())
            .unwrap_or(defaults.pdb_name);
        Ok((ScreenConfig { pae_cutoff }, pdb_name))
    }

    pub fn dbd_keywords(&self) -> Vec<String> {
        self.regions
            .as_ref()
            .and_then(|r| r.keywords.clone())
            .unwrap_or_else(default_dbd_keywords)
    }

    pub fn exemplar_sheet(&self) -> String {
        self.regions
            .as_ref()
            .and_then(|r| r.exemplar_sheet.clone())
            .unwrap_or_else(|| DEFAULT_EXEMPLAR_SHEET.to_string())
    }

    pub fn network_settings(&self) -> NetworkSettings {
        let defaults = DefaultsConfig::default();
        let network = self.network.as_ref();
        NetworkSettings {
            user_agent: network
                .and_then(|n| n.user_agent.clone())
                .unwrap_or(defaults.user_agent),
            timeout: Duration::from_secs(
                network
                    .and_then(|n| n.timeout_secs)
                    .unwrap_or(defaults.timeout_secs),
            ),
            request_delay: Duration::from_millis(
                network
                    .and_then(|n| n.request_delay_ms)
                    .unwrap_or(defaults.request_delay_ms),
            ),
        }
    }

    fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let Some((key, value)) = kv_pair.split_once('=') else {
                return Err(CliError::Config(format!(
                    "Invalid --set format: '{}'. Expected KEY=VALUE.",
                    kv_pair
                )));
            };

            match key {
                "scoring.pae-cutoff" => {
                    self.scoring.get_or_insert_with(Default::default).pae_cutoff =
                        Some(parse_value(key, value, "float")?);
                }
                "scoring.models" => {
                    self.scoring.get_or_insert_with(Default::default).models =
                        Some(parse_value(key, value, "integer")?);
                }
                "scoring.predictions" => {
                    self.scoring.get_or_insert_with(Default::default).predictions =
                        Some(parse_value(key, value, "integer")?);
                }
                "scoring.partition-chain" => {
                    self.scoring.get_or_insert_with(Default::default).partition_chain =
                        Some(parse_char(key, value)?);
                }
                "scoring.result-template" => {
                    self.scoring.get_or_insert_with(Default::default).result_template =
                        Some(value.to_string());
                }
                "scoring.pdb-name" => {
                    self.scoring.get_or_insert_with(Default::default).pdb_name = Some(value.to_string());
                }
                "classification.best-lis" => {
                    self.classification.get_or_insert_with(Default::default).best_lis =
                        Some(parse_value(key, value, "float")?);
                }
                "classification.best-lia" => {
                    self.classification.get_or_insert_with(Default::default).best_lia =
                        Some(parse_value(key, value, "float")?);
                }
                "classification.average-lis" => {
                    self.classification.get_or_insert_with(Default::default).average_lis =
                        Some(parse_value(key, value, "float")?);
                }
                "classification.average-lia" => {
                    self.classification.get_or_insert_with(Default::default).average_lia =
                        Some(parse_value(key, value, "float")?);
                }
                "regions.exemplar-sheet" => {
                    self.regions.get_or_insert_with(Default::default).exemplar_sheet =
                        Some(value.to_string());
                }
                "comparison.reference-chain" => {
                    self.comparison.get_or_insert_with(Default::default).reference_chain =
                        Some(parse_char(key, value)?);
                }
                "comparison.target-chain" => {
                    self.comparison.get_or_insert_with(Default::default).target_chain =
                        Some(parse_char(key, value)?);
                }
                "comparison.residue-start" => {
                    self.comparison.get_or_insert_with(Default::default).residue_start =
                        Some(parse_value(key, value, "integer")?);
                }
                "comparison.residue-end" => {
                    self.comparison.get_or_insert_with(Default::default).residue_end =
                        Some(parse_value(key, value, "integer")?);
                }
                "comparison.contact-threshold" => {
                    self.comparison.get_or_insert_with(Default::default).contact_threshold =
                        Some(parse_value(key, value, "float")?);
                }
                "comparison.model-file" => {
                    self.comparison.get_or_insert_with(Default::default).model_file =
                        Some(value.to_string());
                }
                "novel.score-high" => {
                    self.novel.get_or_insert_with(Default::default).score_high =
                        Some(parse_value(key, value, "float")?);
                }
                "novel.score-low" => {
                    self.novel.get_or_insert_with(Default::default).score_low =
                        Some(parse_value(key, value, "float")?);
                }
                "novel.plddt-high" => {
                    self.novel.get_or_insert_with(Default::default).plddt_high =
                        Some(parse_value(key, value, "float")?);
                }
                "novel.plddt-low" => {
                    self.novel.get_or_insert_with(Default::default).plddt_low =
                        Some(parse_value(key, value, "float")?);
                }
                "screen.pae-cutoff" => {
                    self.screen.get_or_insert_with(Default::default).pae_cutoff =
                        Some(parse_value(key, value, "float")?);
                }
                "screen.pdb-name" => {
                    self.screen.get_or_insert_with(Default::default).pdb_name = Some(value.to_string());
                }
                "network.user-agent" => {
                    self.network.get_or_insert_with(Default::default).user_agent =
                        Some(value.to_string());
                }
                "network.timeout-secs" => {
                    self.network.get_or_insert_with(Default::default).timeout_secs =
                        Some(parse_value(key, value, "integer")?);
                }
                "network.request-delay-ms" => {
                    self.network.get_or_insert_with(Default::default).request_delay_ms =
                        Some(parse_value(key, value, "integer")?);
                }
                _ => {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                }
            }
        }
        Ok(())
    }
}
