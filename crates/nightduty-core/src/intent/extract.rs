//! Field extraction shared by the intent rules.
//!
//! Every extractor returns `None` when its field is absent or unparseable,
//! which lets the router move on to the next rule.

use std::sync::LazyLock;

use regex::Regex;

use crate::clock::{parse_duration, parse_time, ClockTime};
use crate::session::SessionMemory;

/// A time token as it appears in a schedule: `22:10`, `22.10`, `2210`.
const TIME_TOKEN: &str = r"\d{1,2}[:.]?\d{2}";
/// A duration token: `10:20`, `10.20`, `10`, `10h`, `10h30m`.
const DURATION_TOKEN: &str = r"\d{1,2}[:.]?\d{2}|\d{1,2}(?:h(?:\s*\d{1,2}m)?)?";

static INTERVAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"({TIME_TOKEN})\s*[–-]\s*({TIME_TOKEN})(?:\s+([A-Z]{{3}})\s*[–-]\s*([A-Z]{{3}}))?"
    ))
    .expect("interval pattern")
});

static ROUTE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b([A-Z]{3})\s*[–-]\s*([A-Z]{3})\b").expect("route pattern")
});

static LON_DELTA_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:Δ?LON|delta\s*lon|longitud)\s*=?\s*(\d{1,3})°?").expect("longitude pattern")
});

static SERVICE_LOOSE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:ps|psv|servicio)\s*(\d{1,2}[:.]?\d{2}|\d{1,2})").expect("service pattern")
});

static BARE_HOURS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d{1,2})\s*h").expect("hours pattern"));

static PS_RE: LazyLock<Regex> = LazyLock::new(|| labeled(r"ps"));
static PD_RE: LazyLock<Regex> = LazyLock::new(|| labeled(r"pd"));
static HV_RE: LazyLock<Regex> = LazyLock::new(|| labeled(r"(?:hv|horas\s*de\s*vuelo)"));

fn labeled(tag: &str) -> Regex {
    Regex::new(&format!(r"(?i){tag}\s*({DURATION_TOKEN})")).expect("labeled duration pattern")
}

/// Origin and destination station codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub origin: String,
    pub destination: String,
}

impl Route {
    pub fn new(origin: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
        }
    }

    /// `ORG–DST`, or an empty string when both codes are blank.
    pub fn label(&self) -> String {
        if self.origin.is_empty() && self.destination.is_empty() {
            String::new()
        } else {
            format!("{}–{}", self.origin, self.destination)
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.origin.is_empty() && !self.destination.is_empty()
    }
}

/// A departure/arrival pair found in the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleInterval {
    pub departure: ClockTime,
    pub arrival: ClockTime,
    /// Route written right after the interval, if any.
    pub route: Option<Route>,
}

/// First `HH:MM–HH:MM [ORG–DST]` in the text.
pub fn schedule_interval(text: &str) -> Option<ScheduleInterval> {
    let caps = INTERVAL_RE.captures(text)?;
    let departure = parse_time(&caps[1])?;
    let arrival = parse_time(&caps[2])?;
    let route = match (caps.get(3), caps.get(4)) {
        (Some(o), Some(d)) => Some(Route::new(o.as_str(), d.as_str())),
        _ => None,
    };
    Some(ScheduleInterval {
        departure,
        arrival,
        route,
    })
}

/// Route written anywhere in the text, else the one remembered from an
/// earlier turn. Either code may be blank when memory only has one.
pub fn route_or_remembered(text: &str, memory: &SessionMemory) -> Option<Route> {
    if let Some(caps) = ROUTE_RE.captures(text) {
        return Some(Route::new(&caps[1], &caps[2]));
    }
    memory
        .has_route()
        .then(|| Route::new(memory.last_dep.clone(), memory.last_arr.clone()))
}

/// Degrees after a `ΔLON` / `delta lon` / `longitud` label.
pub fn lon_delta(text: &str) -> Option<i64> {
    LON_DELTA_RE.captures(text)?[1].parse().ok()
}

/// Service time after a `ps` label.
pub fn labeled_ps(text: &str) -> Option<i64> {
    labeled_duration(&PS_RE, text)
}

/// Planned rest after a `pd` label.
pub fn labeled_pd(text: &str) -> Option<i64> {
    labeled_duration(&PD_RE, text)
}

/// Flight time after an `hv` / `horas de vuelo` label.
pub fn labeled_hv(text: &str) -> Option<i64> {
    labeled_duration(&HV_RE, text)
}

fn labeled_duration(re: &Regex, text: &str) -> Option<i64> {
    parse_duration(&re.captures(text)?[1])
}

/// Lenient service-time lookup for the minimum-rest question: a
/// `ps`/`psv`/`servicio` label, else any bare `<N> h`, else zero.
pub fn service_or_zero(text: &str) -> i64 {
    if let Some(caps) = SERVICE_LOOSE_RE.captures(text) {
        let token = &caps[1];
        return parse_duration(token)
            .or_else(|| parse_time(token).map(ClockTime::to_minutes))
            .unwrap_or(0);
    }
    BARE_HOURS_RE
        .captures(text)
        .and_then(|caps| caps[1].parse::<i64>().ok())
        .map(|h| h * 60)
        .unwrap_or(0)
}
