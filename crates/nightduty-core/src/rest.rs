//! Minimum-rest and limit calculations.

use serde::{Deserialize, Serialize};

use crate::clock::format_hhmm;
use crate::policy::PolicyParams;

/// Minimum rest (PD) after a service period of `service_minutes`, given the
/// longitude delta crossed in whole degrees.
pub fn minimum_rest(policy: &PolicyParams, service_minutes: i64, lon_delta_degrees: i64) -> i64 {
    let base = policy
        .duty_base_minutes
        .max(service_minutes + policy.duty_offset_minutes);
    base + longitude_surcharge(policy, lon_delta_degrees)
}

/// Extra rest owed for crossing more than the trigger longitude delta.
pub fn longitude_surcharge(policy: &PolicyParams, lon_delta_degrees: i64) -> i64 {
    if lon_delta_degrees <= policy.lon_trigger_degrees {
        return 0;
    }
    let steps = if policy.lon_step_degrees > 0 {
        (lon_delta_degrees - policy.lon_trigger_degrees).div_euclid(policy.lon_step_degrees)
    } else {
        0
    };
    policy.lon_base_extra_minutes + steps * policy.lon_step_minutes
}

/// `true` when `value_minutes` does not exceed `max_minutes`.
pub fn check_against_max(value_minutes: i64, max_minutes: i64) -> bool {
    value_minutes <= max_minutes
}

/// Outcome of comparing a planned rest with the computed minimum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "minutes", rename_all = "snake_case")]
pub enum RestComparison {
    Surplus(i64),
    Deficit(i64),
}

impl RestComparison {
    pub fn compare(planned_minutes: i64, minimum_minutes: i64) -> Self {
        let diff = planned_minutes - minimum_minutes;
        if diff >= 0 {
            Self::Surplus(diff)
        } else {
            Self::Deficit(-diff)
        }
    }

    pub fn is_compliant(&self) -> bool {
        matches!(self, Self::Surplus(_))
    }

    /// `margen +HH:MM` or `déficit HH:MM`.
    pub fn describe(&self) -> String {
        match self {
            Self::Surplus(m) => format!("margen +{}", format_hhmm(*m)),
            Self::Deficit(m) => format!("déficit {}", format_hhmm(*m)),
        }
    }
}
