//! Defines the `AnalysisParameters` struct, which represents the contents of `analysis.toml`.
use crate::input::{input_err_msg, read_toml};
use crate::units::Miles;
use anyhow::{Context, Result, ensure};
use log::warn;
use serde::Deserialize;
use std::path::Path;

const ANALYSIS_PARAMETERS_FILE_NAME: &str = "analysis.toml";

macro_rules! define_unit_param_default {
    ($name:ident, $type: ty, $value: expr) => {
        fn $name() -> $type {
            <$type>::from($value)
        }
    };
}

define_unit_param_default!(default_build_threshold, Miles, 1.0);
define_unit_param_default!(default_city_threshold, Miles, 30.0);

/// Thresholds used when looking for interferences
#[derive(Debug, Deserialize, PartialEq, Clone, Copy)]
#[serde(deny_unknown_fields)]
pub struct AnalysisParameters {
    /// Maximum distance between a construction site and an existing building for the pair to
    /// count as an interference
    #[serde(default = "default_build_threshold")]
    pub build_threshold: Miles,
    /// Maximum distance between a location and the nearest metro for the location to be
    /// considered part of that metro
    #[serde(default = "default_city_threshold")]
    pub city_threshold: Miles,
}

impl Default for AnalysisParameters {
    fn default() -> Self {
        Self {
            build_threshold: default_build_threshold(),
            city_threshold: default_city_threshold(),
        }
    }
}

/// Check that a threshold is a finite number greater than zero
fn check_threshold(name: &str, value: Miles) -> Result<()> {
    ensure!(
        value.value().is_finite() && value > Miles(0.0),
        "{name} must be a finite number greater than zero"
    );

    Ok(())
}

impl AnalysisParameters {
    /// Read the analysis parameters file from the specified directory.
    ///
    /// If the file is not present, default values are used.
    ///
    /// # Arguments
    ///
    /// * `input_dir` - Folder containing input files
    pub fn from_path<P: AsRef<Path>>(input_dir: P) -> Result<AnalysisParameters> {
        let file_path = input_dir.as_ref().join(ANALYSIS_PARAMETERS_FILE_NAME);
        if !file_path.is_file() {
            warn!(
                "No {ANALYSIS_PARAMETERS_FILE_NAME} file provided; using default thresholds"
            );
            return Ok(Self::default());
        }

        let params: AnalysisParameters = read_toml(&file_path)?;
        params
            .validate()
            .with_context(|| input_err_msg(&file_path))?;

        Ok(params)
    }

    /// Replace thresholds with those given on the command line, if any
    pub fn with_overrides(
        mut self,
        build_threshold: Option<f64>,
        city_threshold: Option<f64>,
    ) -> Result<Self> {
        if let Some(value) = build_threshold {
            self.build_threshold = Miles(value);
        }
        if let Some(value) = city_threshold {
            self.city_threshold = Miles(value);
        }
        self.validate()?;

        Ok(self)
    }

    /// Validate parameters after reading in file
    fn validate(&self) -> Result<()> {
        check_threshold("build_threshold", self.build_threshold)?;
        check_threshold("city_threshold", self.city_threshold)?;

        Ok(())
    }
}
