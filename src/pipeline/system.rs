//! Fault-system inputs and forecast outputs.

use serde::{Deserialize, Serialize};

use super::config::ForecastConfig;
use crate::error::ForecastError;
use crate::fault::{build_sections, ParentFault, SectionConfig, SectionGeometry, SlipAnchor};
use crate::geometry::{Location, Trace};
use crate::mfd::MfdBranch;
use crate::rupture::{GenerationReport, RuptureSet};

/// Sections of one parent fault, listed along strike.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaultRun {
    pub name: String,
    pub sections: Vec<usize>,
}

/// Sectioned fault system ready for synthesis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaultSystem {
    pub name: String,
    pub sections: Vec<SectionGeometry>,
    /// Each run gets its own moment budget, MFD and ruptures.
    pub faults: Vec<FaultRun>,
}

impl FaultSystem {
    /// A system whose sections form a single run in the given order.
    pub fn new(name: impl Into<String>, sections: Vec<SectionGeometry>) -> Self {
        let name = name.into();
        let run = FaultRun {
            name: name.clone(),
            sections: sections.iter().map(|s| s.index).collect(),
        };
        Self {
            name,
            sections,
            faults: vec![run],
        }
    }

    pub fn section_count(&self) -> usize {
        self.sections.len()
    }
}

/// Unsectioned description of a fault system, as read from TOML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaultSystemSpec {
    pub name: String,
    #[serde(default)]
    pub faults: Vec<ParentFault>,
}

impl FaultSystemSpec {
    /// Subsections every parent fault, numbering sections consecutively.
    pub fn to_fault_system(&self, config: &SectionConfig) -> Result<FaultSystem, ForecastError> {
        let mut sections = Vec::new();
        let mut faults = Vec::with_capacity(self.faults.len());
        for parent in &self.faults {
            let built = build_sections(parent, config, sections.len())?;
            faults.push(FaultRun {
                name: parent.name.clone(),
                sections: built.iter().map(|s| s.index).collect(),
            });
            sections.extend(built);
        }
        Ok(FaultSystem {
            name: self.name.clone(),
            sections,
            faults,
        })
    }

    /// A straight, vertical, right-lateral fault striking north from 35°N 120°W
    /// with uniform slip rate.
    pub fn demo(length_km: f64, slip_rate: f64, config: &SectionConfig) -> Result<Self, ForecastError> {
        let start = Location::new(35.0, -120.0, 0.0);
        let trace = Trace::new(vec![start, start.destination(0.0, length_km)])?;
        let last = trace.section_count(config.target_section_length_km).saturating_sub(1);
        let fault = ParentFault {
            name: "Demo Fault".to_string(),
            trace,
            dip: 90.0,
            dip_direction: None,
            top_depth: 0.0,
            lower_depth: 12.0,
            aseismic_slip_factor: 0.1,
            rake: 180.0,
            slip_anchors: vec![
                SlipAnchor { section: 0, rate: slip_rate },
                SlipAnchor { section: last, rate: slip_rate },
            ],
        };
        Ok(Self {
            name: format!("demo {length_km} km"),
            faults: vec![fault],
        })
    }
}

/// Batch input file: shared config plus any number of systems.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSpec {
    #[serde(default)]
    pub config: ForecastConfig,
    #[serde(default, rename = "system")]
    pub systems: Vec<FaultSystemSpec>,
}

/// MFD branch set for one fault run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FaultMfd {
    pub fault: String,
    /// Slip-derived moment budget, N·m/yr.
    pub moment_rate: f64,
    pub area_km2: f64,
    pub branches: Vec<MfdBranch>,
}

impl FaultMfd {
    /// Weighted moment rate of all branches; equals `moment_rate`.
    pub fn branch_moment_rate(&self) -> f64 {
        self.branches.iter().map(MfdBranch::moment_rate).sum()
    }
}

/// Synthesized forecast for one fault system.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Forecast {
    pub name: String,
    pub section_count: usize,
    pub moment_rate: f64,
    pub faults: Vec<FaultMfd>,
    pub ruptures: RuptureSet,
    pub report: GenerationReport,
    pub aftershock_filtered: bool,
}

impl Forecast {
    pub fn branch_count(&self) -> usize {
        self.faults.iter().map(|f| f.branches.len()).sum()
    }
}
