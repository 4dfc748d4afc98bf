//! Duty-time policy parameters.
//!
//! The values mirror the operator's current regulation summary and are edited
//! through the `[policy]` table of `config.toml`. At runtime the policy is an
//! immutable value handed to every calculation.

use serde::{Deserialize, Serialize};

use crate::clock::format_hhmm;

/// Numeric policy record. All durations are minutes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyParams {
    /// Floor of the minimum rest (PD).
    #[serde(default = "default_duty_base_minutes")]
    pub duty_base_minutes: i64,
    /// Added to the service time (PS) when computing the minimum rest.
    #[serde(default = "default_duty_offset_minutes")]
    pub duty_offset_minutes: i64,
    /// Longitude delta above which the rest surcharge applies.
    #[serde(default = "default_lon_trigger_degrees")]
    pub lon_trigger_degrees: i64,
    #[serde(default = "default_lon_base_extra_minutes")]
    pub lon_base_extra_minutes: i64,
    #[serde(default = "default_lon_step_degrees")]
    pub lon_step_degrees: i64,
    #[serde(default = "default_lon_step_minutes")]
    pub lon_step_minutes: i64,
    /// Flight time (HV) ceiling.
    #[serde(default = "default_hv_max_minutes")]
    pub hv_max_minutes: i64,
    /// Service time (PS) ceiling.
    #[serde(default = "default_ps_max_minutes")]
    pub ps_max_minutes: i64,
    /// Longest allowed run of consecutive red-zone nights.
    #[serde(default = "default_max_consecutive_nights")]
    pub max_consecutive_nights: usize,
}

fn default_duty_base_minutes() -> i64 {
    600
}
fn default_duty_offset_minutes() -> i64 {
    120
}
fn default_lon_trigger_degrees() -> i64 {
    45
}
fn default_lon_base_extra_minutes() -> i64 {
    120
}
fn default_lon_step_degrees() -> i64 {
    15
}
fn default_lon_step_minutes() -> i64 {
    30
}
fn default_hv_max_minutes() -> i64 {
    510
}
fn default_ps_max_minutes() -> i64 {
    780
}
fn default_max_consecutive_nights() -> usize {
    2
}

impl Default for PolicyParams {
    fn default() -> Self {
        Self {
            duty_base_minutes: default_duty_base_minutes(),
            duty_offset_minutes: default_duty_offset_minutes(),
            lon_trigger_degrees: default_lon_trigger_degrees(),
            lon_base_extra_minutes: default_lon_base_extra_minutes(),
            lon_step_degrees: default_lon_step_degrees(),
            lon_step_minutes: default_lon_step_minutes(),
            hv_max_minutes: default_hv_max_minutes(),
            ps_max_minutes: default_ps_max_minutes(),
            max_consecutive_nights: default_max_consecutive_nights(),
        }
    }
}

impl PolicyParams {
    /// Human-readable parameter sheet, one line per rule.
    pub fn summary(&self) -> String {
        format!(
            "Parámetros de política (editar en config.toml, tabla [policy]):\n\
             - duty_base_minutes = {} min ({})\n\
             - duty_offset_minutes = +{} min\n\
             - ΔLON: base {} min si > {}°, +{} min por cada {}° adicionales\n\
             - hv_max_minutes = {} min ({})\n\
             - ps_max_minutes = {} min ({})\n\
             - max_consecutive_nights = {}",
            self.duty_base_minutes,
            format_hhmm(self.duty_base_minutes),
            self.duty_offset_minutes,
            self.lon_base_extra_minutes,
            self.lon_trigger_degrees,
            self.lon_step_minutes,
            self.lon_step_degrees,
            self.hv_max_minutes,
            format_hhmm(self.hv_max_minutes),
            self.ps_max_minutes,
            format_hhmm(self.ps_max_minutes),
            self.max_consecutive_nights,
        )
    }
}
