use std::ops::RangeInclusive;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for '{parameter}': {reason}")]
    InvalidValue {
        parameter: &'static str,
        reason: String,
    },
}

/// Positive-call thresholds applied to the best and average LIS/LIA of a protein pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassificationThresholds {
    pub best_lis: f64,
    pub best_lia: f64,
    pub average_lis: f64,
    pub average_lia: f64,
}

impl Default for ClassificationThresholds {
    fn default() -> Self {
        Self {
            best_lis: 0.100,
            best_lia: 3432.0,
            average_lis: 0.060,
            average_lia: 1610.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoringConfig {
    pub pae_cutoff: f64,
    /// Model indices are `1..=models`.
    pub models: usize,
    /// Prediction indices are `0..predictions`.
    pub predictions: usize,
    /// Chain whose residue count is the partition point.
    ///
    /// When unset, the first chain in file order is used, not a chain named `B`.
    /// For the usual `A`/`B` complex the two choices split the PAE matrix at
    /// different rows; set `Some('B')` to split at the length of chain `B`.
    pub partition_chain: Option<char>,
    /// File-name template with `{model}` and `{pred}` placeholders, without extension.
    pub result_template: String,
    pub pdb_name: String,
    pub thresholds: ClassificationThresholds,
}

impl ScoringConfig {
    /// Expands the result template for one sample.
    pub fn result_file_name(&self, model: usize, pred: usize) -> String {
        format!(
            "{}.json",
            self.result_template
                .replace("{model}", &model.to_string())
                .replace("{pred}", &pred.to_string())
        )
    }

    /// All `(model, prediction)` pairs in model-major order.
    pub fn samples(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (1..=self.models).flat_map(move |m| (0..self.predictions).map(move |r| (m, r)))
    }
}

#[derive(Default)]
pub struct ScoringConfigBuilder {
    pae_cutoff: Option<f64>,
    models: Option<usize>,
    predictions: Option<usize>,
    partition_chain: Option<char>,
    result_template: Option<String>,
    pdb_name: Option<String>,
    thresholds: Option<ClassificationThresholds>,
}

impl ScoringConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pae_cutoff(mut self, cutoff: f64) -> Self {
        self.pae_cutoff = Some(cutoff);
        self
    }
    pub fn models(mut self, n: usize) -> Self {
        self.models = Some(n);
        self
    }
    pub fn predictions(mut self, n: usize) -> Self {
        self.predictions = Some(n);
        self
    }
    pub fn partition_chain(mut self, chain: Option<char>) -> Self {
        self.partition_chain = chain;
        self
    }
    pub fn result_template(mut self, template: impl Into<String>) -> Self {
        self.result_template = Some(template.into());
        self
    }
    pub fn pdb_name(mut self, name: impl Into<String>) -> Self {
        self.pdb_name = Some(name.into());
        self
    }
    pub fn thresholds(mut self, thresholds: ClassificationThresholds) -> Self {
        self.thresholds = Some(thresholds);
        self
    }

    pub fn build(self) -> Result<ScoringConfig, ConfigError> {
        let pae_cutoff = self
            .pae_cutoff
            .ok_or(ConfigError::MissingParameter("pae_cutoff"))?;
        if !(pae_cutoff > 0.0 && pae_cutoff.is_finite()) {
            return Err(ConfigError::InvalidValue {
                parameter: "pae_cutoff",
                reason: format!("must be a positive number, got {}", pae_cutoff),
            });
        }
        let result_template = self
            .result_template
            .ok_or(ConfigError::MissingParameter("result_template"))?;
        if !result_template.contains("{model}") || !result_template.contains("{pred}") {
            return Err(ConfigError::InvalidValue {
                parameter: "result_template",
                reason: "must contain both '{model}' and '{pred}'".into(),
            });
        }
        let models = self.models.ok_or(ConfigError::MissingParameter("models"))?;
        let predictions = self
            .predictions
            .ok_or(ConfigError::MissingParameter("predictions"))?;
        for (parameter, count) in [("models", models), ("predictions", predictions)] {
            if count == 0 {
                return Err(ConfigError::InvalidValue {
                    parameter,
                    reason: "must be at least 1".into(),
                });
            }
        }
        Ok(ScoringConfig {
            pae_cutoff,
            models,
            predictions,
            partition_chain: self.partition_chain,
            result_template,
            pdb_name: self
                .pdb_name
                .ok_or(ConfigError::MissingParameter("pdb_name"))?,
            thresholds: self.thresholds.unwrap_or_default(),
        })
    }
}

/// Selection and thresholds for comparing a domain against a reference structure.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonConfig {
    pub reference_chain: char,
    pub target_chain: char,
    pub residues: RangeInclusive<isize>,
    pub contact_threshold: f64,
    pub key_pairs: Vec<(isize, isize)>,
    /// File name of the predicted structures to compare, e.g. `ranked_0.pdb`.
    pub model_file: String,
}

#[derive(Default)]
pub struct ComparisonConfigBuilder {
    reference_chain: Option<char>,
    target_chain: Option<char>,
    residues: Option<RangeInclusive<isize>>,
    contact_threshold: Option<f64>,
    key_pairs: Option<Vec<(isize, isize)>>,
    model_file: Option<String>,
}

impl ComparisonConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reference_chain(mut self, chain: char) -> Self {
        self.reference_chain = Some(chain);
        self
    }
    pub fn target_chain(mut self, chain: char) -> Self {
        self.target_chain = Some(chain);
        self
    }
    pub fn residues(mut self, residues: RangeInclusive<isize>) -> Self {
        self.residues = Some(residues);
        self
    }
    pub fn contact_threshold(mut self, threshold: f64) -> Self {
        self.contact_threshold = Some(threshold);
        self
    }
    pub fn key_pairs(mut self, pairs: Vec<(isize, isize)>) -> Self {
        self.key_pairs = Some(pairs);
        self
    }
    pub fn model_file(mut self, name: impl Into<String>) -> Self {
        self.model_file = Some(name.into());
        self
    }

    pub fn build(self) -> Result<ComparisonConfig, ConfigError> {
        let residues = self
            .residues
            .ok_or(ConfigError::MissingParameter("residues"))?;
        if residues.is_empty() {
            return Err(ConfigError::InvalidValue {
                parameter: "residues",
                reason: format!("{}..={} selects nothing", residues.start(), residues.end()),
            });
        }
        let contact_threshold = self
            .contact_threshold
            .ok_or(ConfigError::MissingParameter("contact_threshold"))?;
        if !(contact_threshold > 0.0 && contact_threshold.is_finite()) {
            return Err(ConfigError::InvalidValue {
                parameter: "contact_threshold",
                reason: format!("must be a positive number, got {}", contact_threshold),
            });
        }
        Ok(ComparisonConfig {
            reference_chain: self
                .reference_chain
                .ok_or(ConfigError::MissingParameter("reference_chain"))?,
            target_chain: self
                .target_chain
                .ok_or(ConfigError::MissingParameter("target_chain"))?,
            residues,
            contact_threshold,
            key_pairs: self.key_pairs.unwrap_or_default(),
            model_file: self
                .model_file
                .ok_or(ConfigError::MissingParameter("model_file"))?,
        })
    }
}

/// Thresholds for the pathogenicity/pLDDT region rule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NovelConfig {
    pub score_high: f64,
    pub score_low: f64,
    pub plddt_high: f64,
    /// Carried for completeness; the region rule only consults `plddt_high`.
    pub plddt_low: f64,
}

impl Default for NovelConfig {
    fn default() -> Self {
        Self {
            score_high: 0.564,
            score_low: 0.2,
            plddt_high: 60.0,
            plddt_low: 50.0,
        }
    }
}

impl NovelConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.score_low > self.score_high {
            return Err(ConfigError::InvalidValue {
                parameter: "score_low",
                reason: format!(
                    "{} is above score_high {}",
                    self.score_low, self.score_high
                ),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenConfig {
    pub pae_cutoff: f64,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self { pae_cutoff: 10.0 }
    }
}
