//! Input parameters: a TOML configuration file, overridden by command line flags.
//!
//! This is the only place where input is checked. The calculation itself accepts any value and
//! lets degenerate layouts show up as `NaN` or infinite results.

use std::{fs, path::Path};

use clap::Args;
use serde::Deserialize;

use crate::{
    annotation::AnnotationStyle,
    apparatus::{Apparatus, Placement},
    error::{Error, Result},
    intermediate_representation::DisplayOptions,
};

/// Contents of a configuration file. Every table and key is optional.
///
/// ```toml
/// [apparatus]
/// cell_length = 80
/// cell_width = 42
///
/// [placement]
/// cell_x = 200
/// detector_x = 800
///
/// [display]
/// annotation = "on-axis"
/// legend = false
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub apparatus: Apparatus,
    pub placement: Placement,
    pub display: DisplayOptions,
}

/// Command line flags that take precedence over the configuration file.
#[derive(Args, Debug, Default)]
pub struct Overrides {
    /// Length of the sample cell along the beam (mm).
    #[arg(long)]
    pub cell_length: Option<f64>,
    /// Width of the sample cell (mm).
    #[arg(long)]
    pub cell_width: Option<f64>,
    /// Length of the coil along the beam (mm).
    #[arg(long)]
    pub coil_length: Option<f64>,
    /// Width of the coil (mm).
    #[arg(long)]
    pub coil_width: Option<f64>,
    /// Height of the detector (mm).
    #[arg(long)]
    pub detector_width: Option<f64>,
    /// Distance from the sample to the cell center (mm).
    #[arg(long)]
    pub cell_position: Option<f64>,
    /// Vertical offset of the cell center from the beam axis (mm).
    #[arg(long)]
    pub cell_position_y: Option<f64>,
    /// Distance from the sample to the detector (mm).
    #[arg(long)]
    pub detector_position: Option<f64>,
    /// Width of the sample (mm).
    #[arg(long)]
    pub sample_width: Option<f64>,
    /// Annotation style.
    #[arg(long, value_enum)]
    pub annotation: Option<AnnotationStyle>,
    /// Do not draw the legend.
    #[arg(long)]
    pub hide_legend: bool,
}

impl Config {
    pub fn load(path: &Path) -> Result<Config> {
        let content = fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_owned(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| Error::ConfigParse {
            path: path.to_owned(),
            source,
        })
    }

    pub fn apply(&mut self, overrides: &Overrides) {
        fn set(slot: &mut f64, value: Option<f64>) {
            if let Some(value) = value {
                *slot = value;
            }
        }
        let apparatus = &mut self.apparatus;
        set(&mut apparatus.cell_length, overrides.cell_length);
        set(&mut apparatus.cell_width, overrides.cell_width);
        set(&mut apparatus.coil_length, overrides.coil_length);
        set(&mut apparatus.coil_width, overrides.coil_width);
        set(&mut apparatus.detector_width, overrides.detector_width);
        let placement = &mut self.placement;
        set(&mut placement.cell_x, overrides.cell_position);
        set(&mut placement.cell_y, overrides.cell_position_y);
        set(&mut placement.detector_x, overrides.detector_position);
        set(&mut placement.sample_width, overrides.sample_width);
        if let Some(annotation) = overrides.annotation {
            self.display.annotation = annotation;
        }
        if overrides.hide_legend {
            self.display.legend = false;
        }
    }

    /// Rejects parameters that are not finite numbers.
    pub fn validate(&self) -> Result<()> {
        let Apparatus {
            cell_length,
            cell_width,
            coil_length,
            coil_width,
            detector_width,
        } = self.apparatus;
        let Placement {
            cell_x,
            cell_y,
            detector_x,
            sample_width,
        } = self.placement;
        [
            ("cell_length", cell_length),
            ("cell_width", cell_width),
            ("coil_length", coil_length),
            ("coil_width", coil_width),
            ("detector_width", detector_width),
            ("cell_x", cell_x),
            ("cell_y", cell_y),
            ("detector_x", detector_x),
            ("sample_width", sample_width),
        ]
        .into_iter()
        .try_for_each(|(name, value)| {
            if value.is_finite() {
                Ok(())
            } else {
                Err(Error::NonFinite { name, value })
            }
        })
    }
}
