//! Night classification against the red zone.
//!
//! The red zone is the fixed window `[00:30, 05:30)` local time, recurring
//! every day. A duty interval is normalized once (an arrival at or before
//! the departure means the duty crossed midnight) and then measured against
//! the window of its own day and of the next one.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::clock::{interval_overlap, MINUTES_PER_DAY};

/// Red zone start, 00:30.
pub const RED_ZONE_START: i64 = 30;
/// Red zone end (exclusive), 05:30.
pub const RED_ZONE_END: i64 = 330;
/// Width of the red zone in minutes.
pub const RED_ZONE_WIDTH: i64 = RED_ZONE_END - RED_ZONE_START;
/// Overlap at which a duty counts as a full night (50% of the window).
pub const FULL_NIGHT_THRESHOLD: i64 = 150;
/// The 01:30 cutoff used by the half-night rule.
pub const HALF_NIGHT_CUTOFF: i64 = 90;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NightLabel {
    FullNight,
    HalfNight,
}

impl NightLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FullNight => "full night",
            Self::HalfNight => "half night",
        }
    }
}

/// Operator-facing wording used in replies.
impl fmt::Display for NightLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FullNight => f.write_str("Noche completa"),
            Self::HalfNight => f.write_str("Media noche"),
        }
    }
}

/// Which branch of the decision produced the label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NightBasis {
    /// Overlap reached the full-night threshold.
    RedZoneMajority,
    /// Starts at/after 01:30 or ends at/before 01:30.
    Cutoff,
    /// Neither rule applied; the regulation defaults to half night.
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NightClassification {
    pub label: NightLabel,
    pub red_zone_minutes: i64,
    pub basis: NightBasis,
}

impl NightClassification {
    /// Share of the red zone covered, rounded to whole percent.
    pub fn red_zone_percent(&self) -> i64 {
        (self.red_zone_minutes as f64 / RED_ZONE_WIDTH as f64 * 100.0).round() as i64
    }
}

/// Apply the midnight-crossing rule: arrival at or before departure is
/// read as next-day arrival.
pub fn normalize_interval(departure: i64, arrival: i64) -> (i64, i64) {
    if arrival <= departure {
        (departure, arrival + MINUTES_PER_DAY)
    } else {
        (departure, arrival)
    }
}

/// Minutes of `[departure, arrival)` inside the red zone, summed over the
/// base-day window and its next-day recurrence.
pub fn red_zone_overlap(departure: i64, arrival: i64) -> i64 {
    let (a, b) = normalize_interval(departure, arrival);
    normalized_overlap(a, b)
}

/// Overlap of an interval that already went through [`normalize_interval`].
fn normalized_overlap(a: i64, b: i64) -> i64 {
    [0, MINUTES_PER_DAY]
        .iter()
        .map(|shift| interval_overlap(a, b, RED_ZONE_START + shift, RED_ZONE_END + shift))
        .sum()
}

/// Classify a duty from its departure and arrival minute values.
pub fn classify_night(departure: i64, arrival: i64) -> NightClassification {
    let (a, b) = normalize_interval(departure, arrival);
    let red_zone_minutes = normalized_overlap(a, b);

    let starts_after_cutoff = a.rem_euclid(MINUTES_PER_DAY) >= HALF_NIGHT_CUTOFF;
    let ends_before_cutoff = b.rem_euclid(MINUTES_PER_DAY) <= HALF_NIGHT_CUTOFF;

    let (label, basis) = if red_zone_minutes >= FULL_NIGHT_THRESHOLD {
        (NightLabel::FullNight, NightBasis::RedZoneMajority)
    } else if starts_after_cutoff || ends_before_cutoff {
        (NightLabel::HalfNight, NightBasis::Cutoff)
    } else {
        tracing::debug!(departure, arrival, red_zone_minutes, "night rule fell back to half night");
        (NightLabel::HalfNight, NightBasis::Fallback)
    };

    NightClassification {
        label,
        red_zone_minutes,
        basis,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn hm(h: i64, m: i64) -> i64 {
        h * 60 + m
    }

    #[test]
    fn overnight_duty_covering_whole_window_is_full_night() {
        let c = classify_night(hm(22, 10), hm(6, 40));
        assert_eq!(c.red_zone_minutes, 300);
        assert_eq!(c.label, NightLabel::FullNight);
        assert_eq!(c.basis, NightBasis::RedZoneMajority);
        assert_eq!(c.red_zone_percent(), 100);
    }

    #[test]
    fn partial_overlap_uses_next_day_window() {
        // 23:50 -> 04:10 covers 00:30..04:10 of the next day.
        assert_eq!(red_zone_overlap(hm(23, 50), hm(4, 10)), 220);
        let c = classify_night(hm(23, 50), hm(4, 10));
        assert_eq!(c.label, NightLabel::FullNight);
    }

    #[test]
    fn exactly_threshold_is_full_night() {
        // 00:30 -> 03:00 is exactly 150 minutes of red zone.
        let c = classify_night(hm(0, 30), hm(3, 0));
        assert_eq!(c.red_zone_minutes, 150);
        assert_eq!(c.label, NightLabel::FullNight);
    }

    #[test]
    fn late_start_is_half_night() {
        let c = classify_night(hm(4, 0), hm(10, 0));
        assert_eq!(c.red_zone_minutes, 90);
        assert_eq!(c.label, NightLabel::HalfNight);
        assert_eq!(c.basis, NightBasis::Cutoff);
    }

    #[test]
    fn early_finish_is_half_night() {
        let c = classify_night(hm(20, 0), hm(1, 15));
        assert_eq!(c.red_zone_minutes, 45);
        assert_eq!(c.label, NightLabel::HalfNight);
        assert_eq!(c.basis, NightBasis::Cutoff);
    }

    #[test]
    fn short_duty_straddling_cutoff_reaches_fallback() {
        let c = classify_night(hm(1, 0), hm(2, 0));
        assert_eq!(c.red_zone_minutes, 60);
        assert_eq!(c.label, NightLabel::HalfNight);
        assert_eq!(c.basis, NightBasis::Fallback);
    }

    #[test]
    fn daytime_duty_has_no_overlap() {
        let c = classify_night(hm(8, 0), hm(17, 0));
        assert_eq!(c.red_zone_minutes, 0);
        assert_eq!(c.label, NightLabel::HalfNight);
    }

    #[test]
    fn out_of_range_departure_is_normalized_once() {
        // 25:00 -> 00:10 reads as 25:00 -> 24:10, which never reaches a window.
        let c = classify_night(hm(25, 0), hm(0, 10));
        assert_eq!(c.red_zone_minutes, red_zone_overlap(hm(25, 0), hm(0, 10)));
        assert_eq!(c.red_zone_minutes, 0);
        assert_eq!(c.label, NightLabel::HalfNight);
    }

    #[test]
    fn labels_render_for_operators() {
        assert_eq!(NightLabel::FullNight.to_string(), "Noche completa");
        assert_eq!(NightLabel::HalfNight.as_str(), "half night");
    }

    proptest! {
        #[test]
        fn equal_endpoints_span_a_full_day(t in 0i64..1440) {
            prop_assert_eq!(red_zone_overlap(t, t), RED_ZONE_WIDTH);
        }

        #[test]
        fn daytime_intervals_never_touch_the_red_zone(
            (dep, len) in (330i64..1440).prop_flat_map(|dep| (Just(dep), 1i64..=(1470 - dep))),
        ) {
            let arr = dep + len;
            let c = classify_night(dep, arr % 1440);
            prop_assert_eq!(c.red_zone_minutes, 0);
            prop_assert_eq!(c.label, NightLabel::HalfNight);
        }

        #[test]
        fn classifier_agrees_with_overlap_for_any_clock_shape(
            dh in 0i64..100, dm in 0i64..100, ah in 0i64..100, am in 0i64..100,
        ) {
            let (dep, arr) = (dh * 60 + dm, ah * 60 + am);
            prop_assert_eq!(classify_night(dep, arr).red_zone_minutes, red_zone_overlap(dep, arr));
        }

        #[test]
        fn below_threshold_is_always_half_night(dep in 0i64..1440, arr in 0i64..1440) {
            let c = classify_night(dep, arr);
            prop_assert!((0..=RED_ZONE_WIDTH).contains(&c.red_zone_minutes));
            if c.red_zone_minutes < FULL_NIGHT_THRESHOLD {
                prop_assert_eq!(c.label, NightLabel::HalfNight);
            } else {
                prop_assert_eq!(c.label, NightLabel::FullNight);
            }
        }
    }
}
