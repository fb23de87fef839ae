use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Structured clinical report extracted from one emergency-call transcript.
///
/// The root aggregate has no identity of its own until it is persisted;
/// patient identity is resolved by the persistence layer from the inline
/// `patient` section. Unknown fields are rejected at the serde boundary so
/// that nothing the extraction model invents can slip through unvalidated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ClinicalReport {
    /// Who declared the patient's identity (the patient, a relative, documents...).
    #[serde(default)]
    pub reporter_source: Option<String>,
    #[serde(default)]
    pub call_info: CallInfo,
    #[serde(default)]
    pub authorities_present: BTreeSet<Authority>,
    pub patient: PatientDetails,
    #[serde(default)]
    pub death_info: DeathInfo,
    #[serde(default)]
    pub vitals: Vitals,
    #[serde(default)]
    pub interventions: Interventions,
    #[serde(default)]
    pub notes: Option<String>,
}

impl ClinicalReport {
    /// A report is critical exactly when the Red exit code is set.
    pub fn is_critical(&self) -> bool {
        self.call_info.exit_code.red
    }
}

/// Emergency-call context: when and where the intervention happened.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct CallInfo {
    pub call_date: Option<NaiveDate>,
    /// Time the call was received, free text ("14:32").
    pub call_time: Option<String>,
    /// Time of arrival on scene, free text.
    pub arrival_time: Option<String>,
    pub location: Option<String>,
    /// Condition as reported by the caller, free text.
    pub reported_condition: Option<String>,
    pub exit_code: ExitCodeFlags,
}

/// Triage severity flags as they arrive from extraction.
///
/// The source representation allows any combination of flags; normalization
/// reduces them to exactly one before the record leaves the extraction
/// boundary (see [`crate::normalize`]).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct ExitCodeFlags {
    pub white: bool,
    pub green: bool,
    pub yellow: bool,
    pub red: bool,
}

impl ExitCodeFlags {
    pub fn count_set(&self) -> usize {
        usize::from(self.white)
            + usize::from(self.green)
            + usize::from(self.yellow)
            + usize::from(self.red)
    }

    /// The most severe flag currently set, if any.
    pub fn selected(&self) -> Option<ExitCode> {
        if self.red {
            Some(ExitCode::Red)
        } else if self.yellow {
            Some(ExitCode::Yellow)
        } else if self.green {
            Some(ExitCode::Green)
        } else if self.white {
            Some(ExitCode::White)
        } else {
            None
        }
    }

    /// Flags ordered most severe first, for one-of collapsing.
    pub(crate) fn ranked_mut(&mut self) -> [&mut bool; 4] {
        [
            &mut self.red,
            &mut self.yellow,
            &mut self.green,
            &mut self.white,
        ]
    }
}

/// Triage severity color. Variant order is ascending severity, so the
/// derived `Ord` compares severity directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ExitCode {
    White,
    Green,
    Yellow,
    Red,
}

impl ExitCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::White => "white",
            Self::Green => "green",
            Self::Yellow => "yellow",
            Self::Red => "red",
        }
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Authorities that can be present at the scene. Closed vocabulary; unknown
/// tags fail deserialization.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "camelCase")]
pub enum Authority {
    Police,
    TrafficPolice,
    MunicipalPolice,
    FireBrigade,
    OnCallDoctor,
    SecondAmbulance,
}

/// Patient identity details as extracted from the transcript.
///
/// Sex is the one hard-required field: a record without it fails validation
/// rather than being defaulted. Everything else may legitimately be missing
/// from a spoken report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PatientDetails {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    pub sex: Sex,
    #[serde(default)]
    pub age: Option<u16>,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub birth_place: Option<String>,
    #[serde(default)]
    pub residence: Option<String>,
}

impl PatientDetails {
    pub fn new(sex: Sex) -> Self {
        Self {
            first_name: None,
            last_name: None,
            sex,
            age: None,
            birth_date: None,
            birth_place: None,
            residence: None,
        }
    }
}

/// Patient sex code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Sex {
    M,
    F,
}

impl Sex {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::M => "M",
            Self::F => "F",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct DeathInfo {
    pub died: bool,
    /// Time of death, free text ("03:15").
    pub time_of_death: Option<String>,
}

/// Vital signs observed on scene.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct Vitals {
    pub consciousness: ConsciousnessFlags,
    pub skin: SkinFlags,
    pub breathing: BreathingFlags,
    /// Free text ("120/80").
    pub blood_pressure: Option<String>,
    /// Beats per minute.
    pub pulse: Option<u16>,
    /// Percentage, 0-100.
    pub oxygen_saturation: Option<u8>,
}

/// AVPU consciousness scale as independent flags; at most one may survive
/// normalization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct ConsciousnessFlags {
    pub alert: bool,
    pub responds_to_voice: bool,
    pub responds_to_pain: bool,
    pub unresponsive: bool,
}

impl ConsciousnessFlags {
    pub(crate) fn ranked_mut(&mut self) -> [&mut bool; 4] {
        [
            &mut self.unresponsive,
            &mut self.responds_to_pain,
            &mut self.responds_to_voice,
            &mut self.alert,
        ]
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct SkinFlags {
    pub normal: bool,
    pub pale: bool,
    pub cyanotic: bool,
    pub sweaty: bool,
}

impl SkinFlags {
    pub(crate) fn ranked_mut(&mut self) -> [&mut bool; 4] {
        [
            &mut self.cyanotic,
            &mut self.pale,
            &mut self.sweaty,
            &mut self.normal,
        ]
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct BreathingFlags {
    pub normal: bool,
    pub tachypneic: bool,
    pub bradypneic: bool,
    pub absent: bool,
}

impl BreathingFlags {
    pub(crate) fn ranked_mut(&mut self) -> [&mut bool; 4] {
        [
            &mut self.absent,
            &mut self.bradypneic,
            &mut self.tachypneic,
            &mut self.normal,
        ]
    }
}

/// Interventions performed on scene, grouped the way crews record them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct Interventions {
    pub breathing: BreathingInterventions,
    pub circulation: CirculationInterventions,
    pub immobilization: ImmobilizationInterventions,
    pub other: Option<String>,
    pub medications: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct BreathingInterventions {
    pub suction: bool,
    pub oropharyngeal_airway: bool,
    pub spo2_monitor: bool,
    pub oxygen: bool,
    /// Only meaningful while `oxygen` is true; cleared by normalization
    /// otherwise.
    pub oxygen_liters_per_min: Option<f32>,
    pub ventilation: bool,
    pub intubation: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct CirculationInterventions {
    pub hemostasis: bool,
    pub venous_access: bool,
    pub ecg_monitor: bool,
    pub nibp_monitor: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct ImmobilizationInterventions {
    pub cervical_collar: bool,
    pub scoop_stretcher: bool,
    pub spinal_board: bool,
    pub splint: bool,
}
