//! Ordered pattern dispatch over free-text questions.
//!
//! Each rule pairs a case-insensitive trigger with a handler. Rules are tried
//! in priority order; a rule whose trigger matches but whose handler cannot
//! extract its fields is skipped, so a looser rule further down still gets a
//! chance. When nothing answers, the caller falls back to
//! [`crate::fallback::fallback_reply`].

pub mod extract;
mod rules;

use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::policy::PolicyParams;
use crate::registry::PsvRegistry;
use crate::session::{ContextUpdate, SessionMemory};

/// The rules the router knows, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentKind {
    AddScheduleEntry,
    ValidatePlannedRest,
    ClassifySchedule,
    RedZoneMinutes,
    MinimumRest,
    ConsecutiveNights,
    HalfNightDefinition,
    ValidateFlightTime,
    ValidateServiceTime,
    ShowPolicy,
    ListRegistry,
    ClearRegistry,
}

impl IntentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AddScheduleEntry => "add_schedule_entry",
            Self::ValidatePlannedRest => "validate_planned_rest",
            Self::ClassifySchedule => "classify_schedule",
            Self::RedZoneMinutes => "red_zone_minutes",
            Self::MinimumRest => "minimum_rest",
            Self::ConsecutiveNights => "consecutive_nights",
            Self::HalfNightDefinition => "half_night_definition",
            Self::ValidateFlightTime => "validate_flight_time",
            Self::ValidateServiceTime => "validate_service_time",
            Self::ShowPolicy => "show_policy",
            Self::ListRegistry => "list_registry",
            Self::ClearRegistry => "clear_registry",
        }
    }
}

impl fmt::Display for IntentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// State a handler may read or update during one turn.
pub struct TurnContext<'a> {
    pub policy: &'a PolicyParams,
    pub memory: &'a SessionMemory,
    pub registry: &'a mut PsvRegistry,
    registry_changed: bool,
}

impl<'a> TurnContext<'a> {
    pub fn new(
        policy: &'a PolicyParams,
        memory: &'a SessionMemory,
        registry: &'a mut PsvRegistry,
    ) -> Self {
        Self {
            policy,
            memory,
            registry,
            registry_changed: false,
        }
    }

    /// Whether a handler added to or cleared the registry.
    pub fn registry_changed(&self) -> bool {
        self.registry_changed
    }

    fn mark_registry_changed(&mut self) {
        self.registry_changed = true;
    }
}

/// What a handler produces when it recognises its fields.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Handled {
    reply: String,
    context: ContextUpdate,
}

impl Handled {
    fn reply(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            context: ContextUpdate::default(),
        }
    }

    fn with_context(mut self, context: ContextUpdate) -> Self {
        self.context = context;
        self
    }
}

type Handler = fn(&str, &mut TurnContext<'_>) -> Option<Handled>;

struct Rule {
    kind: IntentKind,
    trigger: Regex,
    handler: Handler,
}

impl Rule {
    fn new(kind: IntentKind, pattern: &str, handler: Handler) -> Self {
        let trigger = Regex::new(&format!("(?i){pattern}")).expect("intent trigger pattern");
        Self {
            kind,
            trigger,
            handler,
        }
    }
}

/// The rule that answered, with its reply and memory hints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentMatch {
    pub kind: IntentKind,
    pub reply: String,
    pub context: ContextUpdate,
}

/// Ordered rule list.
pub struct Router {
    rules: Vec<Rule>,
}

impl Router {
    pub fn new() -> Self {
        Self {
            rules: rules::catalogue(),
        }
    }

    /// Rule kinds in the order they are tried.
    pub fn kinds(&self) -> impl Iterator<Item = IntentKind> + '_ {
        self.rules.iter().map(|r| r.kind)
    }

    /// First rule whose trigger matches and whose handler answers.
    pub fn route(&self, text: &str, ctx: &mut TurnContext<'_>) -> Option<IntentMatch> {
        let text = text.trim();
        for rule in &self.rules {
            if !rule.trigger.is_match(text) {
                continue;
            }
            match (rule.handler)(text, ctx) {
                Some(handled) => {
                    tracing::debug!(intent = %rule.kind, "intent answered");
                    return Some(IntentMatch {
                        kind: rule.kind,
                        reply: handled.reply,
                        context: handled.context,
                    });
                }
                None => {
                    tracing::debug!(intent = %rule.kind, "trigger matched but extraction failed");
                }
            }
        }
        None
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}
