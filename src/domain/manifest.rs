//! Sample manifests
//!
//! The full per-sample record returned by `getSampleManifest`: patient and
//! specimen metadata, libraries with their sequencing runs, and QC reports.
//! Every field defaults when absent; the service routinely omits fields for
//! samples that have not been sequenced yet.

use serde::{Deserialize, Serialize};

/// Full manifest for one IGO sample
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SampleManifest {
    pub bait_set: String,
    #[serde(rename = "cfDNA2dBarcode")]
    pub cf_dna_2d_barcode: String,
    pub cmo_info_igo_id: String,
    pub cmo_patient_id: String,
    pub cmo_sample_class: String,
    pub cmo_sample_name: String,
    pub collection_year: String,
    pub igo_id: String,
    pub investigator_sample_id: String,
    pub libraries: Vec<Library>,
    pub onco_tree_code: String,
    pub preservation: String,
    pub qc_reports: Vec<QcReport>,
    pub sample_name: String,
    pub sample_origin: String,
    pub sex: String,
    pub species: String,
    pub specimen_type: String,
    pub tissue_location: String,
    pub tube_id: String,
    pub tumor_or_normal: String,
}

/// A sequencing library prepared from a sample
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Library {
    pub barcode_id: String,
    pub barcode_index: String,
    pub capture_concentration_nm: String,
    pub capture_input_ng: String,
    pub capture_name: String,
    pub dna_input_ng: f64,
    pub library_concentration_ngul: f64,
    pub library_igo_id: String,
    pub library_volume: f64,
    pub runs: Vec<Run>,
}

/// One sequencing run of a library
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Run {
    pub fastqs: Vec<String>,
    pub flow_cell_id: String,
    pub flow_cell_lanes: Vec<i64>,
    pub read_length: String,
    pub run_date: String,
    pub run_id: String,
    pub run_mode: String,
}

/// QC decision attached to a sample
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QcReport {
    #[serde(rename = "IGORecommendation")]
    pub igo_recommendation: String,
    pub comments: String,
    pub investigator_decision: String,
    pub qc_report_type: String,
}

impl SampleManifest {
    /// Total number of runs across all libraries
    pub fn run_count(&self) -> usize {
        self.libraries.iter().map(|library| library.runs.len()).sum()
    }
}
