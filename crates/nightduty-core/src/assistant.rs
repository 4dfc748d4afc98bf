//! Turn orchestration.
//!
//! One call to [`Assistant::handle_utterance`] is one turn: session state is
//! read from the store, the router (or the fallback) produces the answer,
//! and memory, registry and history are written back. Blank input is
//! answered but not recorded. A turn never fails; storage problems are
//! logged and the reply is still returned.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::fallback::fallback_reply;
use crate::intent::{IntentKind, Router, TurnContext};
use crate::policy::PolicyParams;
use crate::registry::PsvRegistry;
use crate::session::{ContextUpdate, ExportSnapshot, SessionMemory, SessionStore, Turn};
use crate::storage::KvStore;

/// Answer to one utterance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    /// Rule that answered; `None` for the fallback.
    pub intent: Option<IntentKind>,
    pub text: String,
    pub context: ContextUpdate,
    /// Follow-up queries, only filled in by the fallback.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl Reply {
    pub fn is_fallback(&self) -> bool {
        self.intent.is_none()
    }
}

pub struct Assistant<S> {
    policy: PolicyParams,
    router: Router,
    store: SessionStore<S>,
}

impl<S: KvStore> Assistant<S> {
    pub fn new(policy: PolicyParams, kv: S) -> Self {
        Self {
            policy,
            router: Router::new(),
            store: SessionStore::new(kv),
        }
    }

    pub fn policy(&self) -> &PolicyParams {
        &self.policy
    }

    /// Run one turn. Always returns a reply.
    pub fn handle_utterance(&self, text: &str) -> Reply {
        let text = text.trim();
        let mut memory = self.store.load_memory();
        let mut registry = self.store.load_registry();

        let mut ctx = TurnContext::new(&self.policy, &memory, &mut registry);
        let matched = if text.is_empty() {
            None
        } else {
            self.router.route(text, &mut ctx)
        };
        let registry_changed = ctx.registry_changed();

        let reply = match matched {
            Some(m) => Reply {
                intent: Some(m.kind),
                text: m.reply,
                context: m.context,
                suggestions: Vec::new(),
            },
            None => {
                let fb = fallback_reply(text);
                Reply {
                    intent: None,
                    text: fb.reply,
                    context: ContextUpdate::default(),
                    suggestions: fb.suggestions,
                }
            }
        };

        if !reply.context.is_empty() {
            memory.merge(&reply.context);
            self.persist("memory", self.store.save_memory(&memory));
        }
        if registry_changed {
            self.persist("registry", self.store.save_registry(&registry));
        }

        if !text.is_empty() {
            let mut history = self.store.load_history();
            history.push(Turn::user(text));
            history.push(Turn::assistant(reply.text.clone()));
            self.persist("history", self.store.save_history(&history));
        }

        reply
    }

    pub fn memory(&self) -> SessionMemory {
        self.store.load_memory()
    }

    /// Replace session memory wholesale (manual edit).
    pub fn set_memory(&self, memory: &SessionMemory) -> Result<()> {
        self.store.save_memory(memory)
    }

    pub fn history(&self) -> Vec<Turn> {
        self.store.load_history()
    }

    pub fn registry(&self) -> PsvRegistry {
        self.store.load_registry()
    }

    pub fn clear_history(&self) -> Result<()> {
        self.store.save_history(&[])
    }

    pub fn clear_registry(&self) -> Result<()> {
        self.store.save_registry(&PsvRegistry::new())
    }

    /// Clear memory, history and registry together.
    pub fn reset_session(&self) -> Result<()> {
        let removed = self.store.clear()?;
        tracing::info!(removed, "session reset");
        Ok(())
    }

    /// Snapshot of the transcript as of `now`.
    pub fn export_history(&self, now: DateTime<Utc>) -> ExportSnapshot {
        ExportSnapshot::new(self.history(), now)
    }

    fn persist(&self, what: &str, result: Result<()>) {
        if let Err(e) = result {
            tracing::warn!(what, error = %e, "failed to persist session state");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Role;
    use crate::storage::Database;

    fn assistant() -> Assistant<Database> {
        Assistant::new(PolicyParams::default(), Database::open_memory().unwrap())
    }

    #[test]
    fn fallback_for_unknown_text() {
        let a = assistant();
        let r = a.handle_utterance("hola");
        assert!(r.is_fallback());
        assert_eq!(r.suggestions, crate::fallback::suggestions());
    }

    #[test]
    fn blank_input_gets_fallback_without_history() {
        let a = assistant();
        assert!(a.handle_utterance("   ").is_fallback());
        assert!(a.handle_utterance("").is_fallback());
        assert!(a.history().is_empty());
    }

    #[test]
    fn history_records_both_sides() {
        let a = assistant();
        a.handle_utterance("Valida 22:10–06:40 SCL–MIA");
        a.handle_utterance("hola");
        let h = a.history();
        assert_eq!(h.len(), 4);
        assert_eq!(h[0], Turn::user("Valida 22:10–06:40 SCL–MIA"));
        assert_eq!(h[1].role, Role::Assistant);
        assert!(h[3].text.starts_with("No pude entender"));
    }

    #[test]
    fn route_is_remembered_between_turns() {
        let a = assistant();
        a.handle_utterance("Valida 22:10–06:40 SCL–MIA");
        let mem = a.memory();
        assert_eq!(mem.last_dep, "SCL");
        assert_eq!(mem.last_arr, "MIA");

        let r = a.handle_utterance("Agrega PSV 23:50–04:10");
        assert!(r.text.contains("SCL–MIA"));
        assert_eq!(a.registry().entries()[0].route, "SCL–MIA");
    }

    #[test]
    fn base_reference_survives_turns() {
        let a = assistant();
        a.set_memory(&SessionMemory {
            base_lt: "UTC-3".into(),
            ..SessionMemory::default()
        })
        .unwrap();
        a.handle_utterance("Valida 22:10–06:40 SCL–MIA");
        assert_eq!(a.memory().base_lt, "UTC-3");
    }

    #[test]
    fn clear_and_reset() {
        let a = assistant();
        a.handle_utterance("Agrega PSV 22:10–06:40 SCL–MIA");
        assert_eq!(a.registry().len(), 1);
        a.clear_registry().unwrap();
        assert!(a.registry().is_empty());
        assert!(!a.history().is_empty());

        a.handle_utterance("Agrega PSV 23:50–04:10");
        a.reset_session().unwrap();
        assert!(a.history().is_empty());
        assert!(a.registry().is_empty());
        assert_eq!(a.memory(), SessionMemory::default());
    }

    #[test]
    fn export_contains_history() {
        let a = assistant();
        a.handle_utterance("hola");
        let now = Utc::now();
        let snap = a.export_history(now);
        assert_eq!(snap.history.len(), 2);
        assert_eq!(snap.exported_at, now);
    }
}
