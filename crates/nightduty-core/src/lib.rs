//! # Nightduty Core Library
//!
//! A rule-based assistant for flight-duty-time questions: night
//! classification against the red zone (00:30–05:30), minimum rest after a
//! service period, flight/service time limits and consecutive-night runs.
//!
//! ## Architecture
//!
//! - **Clock**: time-token parsing and minute arithmetic
//! - **Night / Rest**: pure regulatory calculations over a [`PolicyParams`] value
//! - **Intent router**: ordered trigger/handler rules with fall-through
//! - **Registry**: PSVs reported during the session and their consecutive runs
//! - **Session / Storage**: memory, history and registry persisted in a SQLite
//!   key-value table; TOML configuration for the policy
//!
//! ## Key Components
//!
//! - [`Assistant`]: one call per user turn, always answers
//! - [`Router`]: the rule catalogue
//! - [`Database`]: session key-value store
//! - [`Config`]: policy configuration file

pub mod assistant;
pub mod clock;
pub mod error;
pub mod fallback;
pub mod intent;
pub mod night;
pub mod policy;
pub mod registry;
pub mod rest;
pub mod session;
pub mod storage;

pub use assistant::{Assistant, Reply};
pub use clock::{format_hhmm, overlap_minutes, parse_duration, parse_time, to_minutes, ClockTime};
pub use error::{ConfigError, CoreError, StorageError};
pub use fallback::{fallback_reply, FallbackReply, QuickPrompt, QUICK_PROMPTS};
pub use intent::{IntentKind, IntentMatch, Router, TurnContext};
pub use night::{classify_night, red_zone_overlap, NightBasis, NightClassification, NightLabel};
pub use policy::PolicyParams;
pub use registry::{count_consecutive, ConsecutiveRuns, PsvEntry, PsvRegistry};
pub use rest::{check_against_max, minimum_rest, RestComparison};
pub use session::{ContextUpdate, ExportSnapshot, Role, SessionMemory, SessionStore, Turn};
pub use storage::{Config, Database, KvStore};
