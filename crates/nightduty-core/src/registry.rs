//! Session registry of classified duties (PSVs).
//!
//! Entries are appended in the order the user reports them, which is taken
//! to be chronological. Any red-zone overlap at all counts toward a run of
//! consecutive nights.

use serde::{Deserialize, Serialize};

use crate::clock::{format_hhmm, ClockTime};
use crate::night::{classify_night, NightLabel};

/// One registered duty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PsvEntry {
    /// Departure as `HH:MM`.
    pub departure: String,
    /// Arrival as `HH:MM`.
    pub arrival: String,
    /// `ORG–DST`, empty when unknown.
    #[serde(default)]
    pub route: String,
    pub label: NightLabel,
    pub red_zone_minutes: i64,
}

impl PsvEntry {
    /// Classify the interval and build an entry from it.
    pub fn classify(departure: ClockTime, arrival: ClockTime, route: Option<String>) -> Self {
        let night = classify_night(departure.to_minutes(), arrival.to_minutes());
        Self {
            departure: departure.to_string(),
            arrival: arrival.to_string(),
            route: route.unwrap_or_default(),
            label: night.label,
            red_zone_minutes: night.red_zone_minutes,
        }
    }

    pub fn counts_as_night(&self) -> bool {
        self.red_zone_minutes > 0
    }

    /// `22:10–06:40 SCL–MIA · Noche completa · ZR 05:00`
    pub fn summary_line(&self) -> String {
        let route = if self.route.is_empty() {
            String::new()
        } else {
            format!(" {}", self.route)
        };
        format!(
            "{}–{}{} · {} · ZR {}",
            self.departure,
            self.arrival,
            route,
            self.label,
            format_hhmm(self.red_zone_minutes)
        )
    }
}

/// Run lengths of consecutive red-zone nights.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsecutiveRuns {
    /// Run ending at the last entry.
    pub current_run: usize,
    /// Longest run seen anywhere in the registry.
    pub max_run: usize,
}

/// Scan entries in order, counting runs of overlapping nights.
pub fn count_consecutive(entries: &[PsvEntry]) -> ConsecutiveRuns {
    entries
        .iter()
        .fold(ConsecutiveRuns::default(), |mut runs, entry| {
            if entry.counts_as_night() {
                runs.current_run += 1;
            } else {
                runs.current_run = 0;
            }
            runs.max_run = runs.max_run.max(runs.current_run);
            runs
        })
}

/// Ordered, append-only list of PSVs for the session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PsvRegistry {
    entries: Vec<PsvEntry>,
}

impl PsvRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry and return the runs including it.
    pub fn add_entry(&mut self, entry: PsvEntry) -> ConsecutiveRuns {
        tracing::info!(
            departure = %entry.departure,
            arrival = %entry.arrival,
            red_zone_minutes = entry.red_zone_minutes,
            "registered psv"
        );
        self.entries.push(entry);
        self.runs()
    }

    pub fn clear(&mut self) {
        tracing::info!(count = self.entries.len(), "cleared psv registry");
        self.entries.clear();
    }

    pub fn entries(&self) -> &[PsvEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn runs(&self) -> ConsecutiveRuns {
        count_consecutive(&self.entries)
    }

    /// Whether the current run is over the allowed number of nights.
    pub fn exceeds_limit(&self, max_consecutive: usize) -> bool {
        self.runs().current_run > max_consecutive
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(dep: (u32, u32), arr: (u32, u32)) -> PsvEntry {
        PsvEntry::classify(
            ClockTime::new(dep.0, dep.1),
            ClockTime::new(arr.0, arr.1),
            None,
        )
    }

    #[test]
    fn classify_formats_times_and_route() {
        let e = PsvEntry::classify(
            ClockTime::new(22, 10),
            ClockTime::new(6, 40),
            Some("SCL–MIA".into()),
        );
        assert_eq!(e.departure, "22:10");
        assert_eq!(e.arrival, "06:40");
        assert_eq!(e.label, NightLabel::FullNight);
        assert_eq!(e.red_zone_minutes, 300);
        assert_eq!(
            e.summary_line(),
            "22:10–06:40 SCL–MIA · Noche completa · ZR 05:00"
        );
    }

    #[test]
    fn three_nights_in_a_row_exceed_limit() {
        let mut reg = PsvRegistry::new();
        reg.add_entry(entry((22, 10), (6, 40)));
        reg.add_entry(entry((23, 50), (4, 10)));
        let runs = reg.add_entry(entry((1, 10), (7, 5)));
        assert_eq!(runs.current_run, 3);
        assert_eq!(runs.max_run, 3);
        assert!(reg.exceeds_limit(2));
    }

    #[test]
    fn daytime_duty_resets_current_run() {
        let mut reg = PsvRegistry::new();
        reg.add_entry(entry((22, 10), (6, 40)));
        reg.add_entry(entry((23, 50), (4, 10)));
        let runs = reg.add_entry(entry((8, 0), (17, 0)));
        assert_eq!(runs.current_run, 0);
        assert_eq!(runs.max_run, 2);
        assert!(!reg.exceeds_limit(2));

        let runs = reg.add_entry(entry((23, 0), (3, 0)));
        assert_eq!(runs.current_run, 1);
        assert_eq!(runs.max_run, 2);
    }

    #[test]
    fn empty_registry_has_no_runs() {
        assert_eq!(count_consecutive(&[]), ConsecutiveRuns::default());
    }

    #[test]
    fn clear_empties_registry() {
        let mut reg = PsvRegistry::new();
        reg.add_entry(entry((22, 10), (6, 40)));
        reg.clear();
        assert!(reg.is_empty());
        assert_eq!(reg.runs().current_run, 0);
    }

    #[test]
    fn serializes_as_plain_list() {
        let mut reg = PsvRegistry::new();
        reg.add_entry(entry((22, 10), (6, 40)));
        let json = serde_json::to_value(&reg).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["label"], "full_night");
        let back: PsvRegistry = serde_json::from_value(json).unwrap();
        assert_eq!(back, reg);
    }
}
