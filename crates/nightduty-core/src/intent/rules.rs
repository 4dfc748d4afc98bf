//! Rule catalogue and handlers.
//!
//! Trigger vocabulary is Spanish, as used by the crews and schedulers the
//! assistant serves. Replies use light markdown (`**bold**`).

use indoc::indoc;

use super::extract::{self, Route};
use super::{Handled, IntentKind, Rule, TurnContext};
use crate::clock::format_hhmm;
use crate::night::{classify_night, red_zone_overlap};
use crate::registry::PsvEntry;
use crate::rest::{check_against_max, minimum_rest, RestComparison};
use crate::session::ContextUpdate;

/// Duration token as it may follow an `hv` label in the trigger itself.
const HV_TRIGGER_DURATION: &str = r"(\d{1,2}[:.]?\d{2}|\d{1,2}(?:h(?:\s*\d{1,2}m)?)?)";

pub(super) fn catalogue() -> Vec<Rule> {
    vec![
        Rule::new(
            IntentKind::AddScheduleEntry,
            r"(agrega|añade|sumar|registrar).*(psv|tramo)",
            add_schedule_entry,
        ),
        Rule::new(
            IntentKind::ValidatePlannedRest,
            r"(valida|validar).*(pd\s*\d)",
            validate_planned_rest,
        ),
        Rule::new(
            IntentKind::ClassifySchedule,
            r"(valida|validar|es\s+noche|media\s+noche|clasifica)",
            classify_schedule,
        ),
        Rule::new(
            IntentKind::RedZoneMinutes,
            r"(zona\s+roja|cómputo|minutos\s+en\s+zona)",
            red_zone_minutes,
        ),
        Rule::new(
            IntentKind::MinimumRest,
            r"(descanso|minimo|minimo de descanso|min de descanso|min\s+descanso)",
            minimum_rest_from_service,
        ),
        Rule::new(
            IntentKind::ConsecutiveNights,
            r"(consecutiv|3\s*noches|dos\s*noches|tres\s*noches)",
            consecutive_nights,
        ),
        Rule::new(
            IntentKind::HalfNightDefinition,
            r"(definici[oó]n|explica|cu[aá]ndo).*(media\s+noche)",
            half_night_definition,
        ),
        Rule::new(
            IntentKind::ValidateFlightTime,
            &format!(r"(valida|validar).*(hv|horas\s*de\s*vuelo)\s*{HV_TRIGGER_DURATION}"),
            validate_flight_time,
        ),
        Rule::new(
            IntentKind::ValidateServiceTime,
            r"(valida|validar).*(ps\s*\d)",
            validate_service_time,
        ),
        Rule::new(
            IntentKind::ShowPolicy,
            r"(pol[ií]tica|par[aá]metros|l[ií]mites)\s*(vigentes|actuales)?",
            show_policy,
        ),
        Rule::new(
            IntentKind::ListRegistry,
            r"(resumen|lista|mostrar).*(psv|tramos)",
            list_registry,
        ),
        Rule::new(
            IntentKind::ClearRegistry,
            r"(limpia|borrar|reinicia).*(psv|tramos)",
            clear_registry,
        ),
    ]
}

fn route_context(route: Option<&Route>) -> ContextUpdate {
    match route {
        Some(r) => ContextUpdate::route(r.origin.clone(), r.destination.clone()),
        None => ContextUpdate::default(),
    }
}

fn add_schedule_entry(text: &str, ctx: &mut TurnContext<'_>) -> Option<Handled> {
    let interval = extract::schedule_interval(text)?;
    let route = extract::route_or_remembered(text, ctx.memory);

    let route_label = route
        .as_ref()
        .filter(|r| r.is_complete())
        .map(Route::label);
    let entry = PsvEntry::classify(interval.departure, interval.arrival, route_label);
    let limit = ctx.policy.max_consecutive_nights;

    let runs = ctx.registry.add_entry(entry.clone());
    ctx.mark_registry_changed();

    let route_txt = if entry.route.is_empty() {
        String::new()
    } else {
        format!(" {}", entry.route)
    };
    let warn = if runs.current_run > limit {
        format!(" (¡Excede {limit} consecutivas!)")
    } else {
        String::new()
    };

    Some(
        Handled::reply(format!(
            "PSV agregado: {}–{}{} ⇒ **{}**, ZR={}. Consecutivas actuales: **{}**.{}",
            entry.departure,
            entry.arrival,
            route_txt,
            entry.label,
            format_hhmm(entry.red_zone_minutes),
            runs.current_run,
            warn
        ))
        .with_context(route_context(route.as_ref())),
    )
}

fn validate_planned_rest(text: &str, ctx: &mut TurnContext<'_>) -> Option<Handled> {
    let service = extract::labeled_ps(text)?;
    let planned = extract::labeled_pd(text)?;
    let lon = extract::lon_delta(text).unwrap_or(0);

    let minimum = minimum_rest(ctx.policy, service, lon);
    let comparison = RestComparison::compare(planned, minimum);
    let status = if comparison.is_compliant() {
        "✅ Cumple"
    } else {
        "❌ No cumple"
    };

    Some(Handled::reply(format!(
        "{status}. PD plan={} vs PD mínimo={} (PS {}, ΔLON={lon}° → regla base+ajuste). {}.",
        format_hhmm(planned),
        format_hhmm(minimum),
        format_hhmm(service),
        comparison.describe()
    )))
}

fn classify_schedule(text: &str, _ctx: &mut TurnContext<'_>) -> Option<Handled> {
    let interval = extract::schedule_interval(text)?;
    let night = classify_night(
        interval.departure.to_minutes(),
        interval.arrival.to_minutes(),
    );
    let route_txt = interval
        .route
        .as_ref()
        .map(|r| format!(" {}", r.label()))
        .unwrap_or_default();

    Some(
        Handled::reply(format!(
            "Clasificación: **{}**.\nZona roja computada: **{}** ({}%).\nPSV: {}–{}{}.",
            night.label,
            format_hhmm(night.red_zone_minutes),
            night.red_zone_percent(),
            interval.departure,
            interval.arrival,
            route_txt
        ))
        .with_context(route_context(interval.route.as_ref())),
    )
}

fn red_zone_minutes(text: &str, _ctx: &mut TurnContext<'_>) -> Option<Handled> {
    let interval = extract::schedule_interval(text)?;
    let minutes = red_zone_overlap(
        interval.departure.to_minutes(),
        interval.arrival.to_minutes(),
    );
    Some(Handled::reply(format!(
        "Minutos en zona roja (00:30–05:30 LT): **{minutes} min** ({}).",
        format_hhmm(minutes)
    )))
}

fn minimum_rest_from_service(text: &str, ctx: &mut TurnContext<'_>) -> Option<Handled> {
    let service = extract::service_or_zero(text);
    let lon = extract::lon_delta(text).unwrap_or(0);
    let rest = minimum_rest(ctx.policy, service, lon);
    Some(Handled::reply(format!(
        "Descanso mínimo estimado: **{}** (PS {}, base + ajustes por ΔLON={lon}°).",
        format_hhmm(rest),
        format_hhmm(service)
    )))
}

fn consecutive_nights(_text: &str, ctx: &mut TurnContext<'_>) -> Option<Handled> {
    let mut reply = format!(
        "Según las reglas vigentes, solo se permiten **{} noches consecutivas** dentro de zona roja. \
         Una 'media noche' **sí computa** como noche a efectos de consecutividad si cumple criterios \
         (zona roja ≥ 50% o corte 01:30).",
        ctx.policy.max_consecutive_nights
    );
    if !ctx.registry.is_empty() {
        let runs = ctx.registry.runs();
        reply.push_str(&format!(
            "\nEn esta sesión: **{}** consecutivas actuales (máx. {}).",
            runs.current_run, runs.max_run
        ));
    }
    Some(Handled::reply(reply))
}

fn half_night_definition(_text: &str, _ctx: &mut TurnContext<'_>) -> Option<Handled> {
    Some(Handled::reply(
        indoc! {"
            Se considera **media noche** cuando:
            - El PSV **comienza después de 01:30** *o*
            - **Termina hasta 01:30** *o*
            - Abarca **< 50%** de la zona roja (00:30–05:30).

            Si el traslape con zona roja es **≥ 50% (≥150 min)** o cruza 01:30 desde antes, se clasifica como **Noche completa**."}
        .to_string(),
    ))
}

fn validate_flight_time(text: &str, ctx: &mut TurnContext<'_>) -> Option<Handled> {
    let flight = extract::labeled_hv(text)?;
    let max = ctx.policy.hv_max_minutes;
    let status = if check_against_max(flight, max) {
        "✅ Dentro de límite"
    } else {
        "⚠️ Excede límite"
    };
    Some(Handled::reply(format!(
        "{status}. HV={} vs límite={} (parámetro editable).",
        format_hhmm(flight),
        format_hhmm(max)
    )))
}

fn validate_service_time(text: &str, ctx: &mut TurnContext<'_>) -> Option<Handled> {
    let service = extract::labeled_ps(text)?;
    let max = ctx.policy.ps_max_minutes;
    let status = if check_against_max(service, max) {
        "✅ Dentro de límite"
    } else {
        "⚠️ Excede límite"
    };
    Some(Handled::reply(format!(
        "{status}. PS={} vs máximo={} (parámetro editable).",
        format_hhmm(service),
        format_hhmm(max)
    )))
}

fn show_policy(_text: &str, ctx: &mut TurnContext<'_>) -> Option<Handled> {
    Some(Handled::reply(ctx.policy.summary()))
}

fn list_registry(_text: &str, ctx: &mut TurnContext<'_>) -> Option<Handled> {
    if ctx.registry.is_empty() {
        return Some(Handled::reply(
            "No hay PSVs registrados aún. Usa: 'Agrega PSV 22:10–06:40 SCL–MIA'.",
        ));
    }
    let runs = ctx.registry.runs();
    let lines: Vec<String> = ctx
        .registry
        .entries()
        .iter()
        .enumerate()
        .map(|(i, e)| format!("{}. {}", i + 1, e.summary_line()))
        .collect();
    Some(Handled::reply(format!(
        "PSVs ({}):\n{}\n\nConsecutivas actuales: **{}** (máx histórico {}).",
        ctx.registry.len(),
        lines.join("\n"),
        runs.current_run,
        runs.max_run
    )))
}

fn clear_registry(_text: &str, ctx: &mut TurnContext<'_>) -> Option<Handled> {
    ctx.registry.clear();
    ctx.mark_registry_changed();
    Some(Handled::reply("Se limpiaron los PSVs de la sesión."))
}

#[cfg(test)]
mod tests {
    use super::super::Router;
    use super::*;
    use crate::policy::PolicyParams;
    use crate::registry::PsvRegistry;
    use crate::session::SessionMemory;

    struct Fixture {
        policy: PolicyParams,
        memory: SessionMemory,
        registry: PsvRegistry,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                policy: PolicyParams::default(),
                memory: SessionMemory::default(),
                registry: PsvRegistry::new(),
            }
        }

        fn ask(&mut self, text: &str) -> Option<super::super::IntentMatch> {
            let mut ctx = TurnContext::new(&self.policy, &self.memory, &mut self.registry);
            let out = Router::new().route(text, &mut ctx);
            if let Some(m) = &out {
                self.memory.merge(&m.context);
            }
            out
        }
    }

    #[test]
    fn catalogue_order_is_fixed() {
        let kinds: Vec<_> = Router::new().kinds().collect();
        assert_eq!(kinds.len(), 12);
        assert_eq!(kinds[0], IntentKind::AddScheduleEntry);
        assert_eq!(kinds[1], IntentKind::ValidatePlannedRest);
        assert_eq!(kinds[2], IntentKind::ClassifySchedule);
        assert_eq!(kinds[11], IntentKind::ClearRegistry);
    }

    #[test]
    fn classify_full_night_with_route() {
        let mut f = Fixture::new();
        let m = f.ask("Valida 22:10–06:40 SCL–MIA").unwrap();
        assert_eq!(m.kind, IntentKind::ClassifySchedule);
        assert!(m.reply.contains("**Noche completa**"));
        assert!(m.reply.contains("**05:00** (100%)"));
        assert!(m.reply.contains("PSV: 22:10–06:40 SCL–MIA."));
        assert_eq!(m.context, ContextUpdate::route("SCL", "MIA"));
    }

    #[test]
    fn classify_without_route_leaves_context_empty() {
        let mut f = Fixture::new();
        let m = f.ask("¿Es noche 04:00-10:00?").unwrap();
        assert_eq!(m.kind, IntentKind::ClassifySchedule);
        assert!(m.reply.contains("**Media noche**"));
        assert!(m.context.is_empty());
    }

    #[test]
    fn red_zone_minutes_two_block_union() {
        let mut f = Fixture::new();
        let m = f.ask("Calcula minutos en zona roja 23:50–04:10").unwrap();
        assert_eq!(m.kind, IntentKind::RedZoneMinutes);
        assert!(m.reply.contains("**220 min** (03:40)"));
    }

    #[test]
    fn minimum_rest_without_surcharge() {
        let mut f = Fixture::new();
        let m = f.ask("Descanso mínimo PS 10:20 con ΔLON=30°").unwrap();
        assert_eq!(m.kind, IntentKind::MinimumRest);
        assert!(m.reply.contains("**12:20**"));
        assert!(m.reply.contains("ΔLON=30°"));
    }

    #[test]
    fn minimum_rest_with_surcharge() {
        let mut f = Fixture::new();
        let m = f.ask("descanso para PS 10:20 con ΔLON=60°").unwrap();
        assert!(m.reply.contains("**14:50**"));
    }

    #[test]
    fn minimum_rest_always_answers() {
        let mut f = Fixture::new();
        let m = f.ask("¿cuánto descanso necesito?").unwrap();
        assert_eq!(m.kind, IntentKind::MinimumRest);
        assert!(m.reply.contains("**10:00**"));
    }

    #[test]
    fn planned_rest_surplus_and_deficit() {
        let mut f = Fixture::new();
        let ok = f.ask("Valida PD 13:00 para PS 10:20").unwrap();
        assert_eq!(ok.kind, IntentKind::ValidatePlannedRest);
        assert!(ok.reply.starts_with("✅ Cumple"));
        assert!(ok.reply.contains("margen +00:40"));

        let short = f.ask("Valida PD 10 para PS 10:20 ΔLON=60").unwrap();
        assert!(short.reply.starts_with("❌ No cumple"));
        assert!(short.reply.contains("PD mínimo=14:50"));
        assert!(short.reply.contains("déficit 04:50"));
    }

    #[test]
    fn planned_rest_without_ps_falls_through() {
        let mut f = Fixture::new();
        // PD present but no PS: the rest-plan rule declines, the classify rule
        // declines (no interval) and the minimum-rest rule answers.
        let m = f.ask("valida pd 12:00 de descanso").unwrap();
        assert_eq!(m.kind, IntentKind::MinimumRest);
    }

    #[test]
    fn flight_time_limit() {
        let mut f = Fixture::new();
        let ok = f.ask("Valida HV 8:00").unwrap();
        assert_eq!(ok.kind, IntentKind::ValidateFlightTime);
        assert!(ok.reply.starts_with("✅ Dentro de límite"));
        let over = f.ask("validar horas de vuelo 9h15m").unwrap();
        assert!(over.reply.starts_with("⚠️ Excede límite"));
        assert!(over.reply.contains("HV=09:15 vs límite=08:30"));
    }

    #[test]
    fn service_time_limit() {
        let mut f = Fixture::new();
        let m = f.ask("Valida PS 13:30").unwrap();
        assert_eq!(m.kind, IntentKind::ValidateServiceTime);
        assert!(m.reply.contains("⚠️ Excede límite. PS=13:30 vs máximo=13:00"));
    }

    #[test]
    fn service_time_uses_injected_policy() {
        let mut f = Fixture::new();
        f.policy.ps_max_minutes = 840;
        let m = f.ask("Valida PS 13:30").unwrap();
        assert!(m.reply.starts_with("✅ Dentro de límite"));
    }

    #[test]
    fn consecutive_and_definition_texts() {
        let mut f = Fixture::new();
        let c = f.ask("¿Puedo programar 3 noches consecutivas?").unwrap();
        assert_eq!(c.kind, IntentKind::ConsecutiveNights);
        assert!(c.reply.contains("**2 noches consecutivas**"));
        assert!(!c.reply.contains("En esta sesión"));

        let d = f
            .ask("Explícame cuándo un PSV se clasifica como 'media noche'")
            .unwrap();
        assert_eq!(d.kind, IntentKind::HalfNightDefinition);
        assert!(d.reply.starts_with("Se considera **media noche** cuando:"));
    }

    #[test]
    fn show_policy_lists_parameters() {
        let mut f = Fixture::new();
        let m = f.ask("Muestra la política vigente").unwrap();
        assert_eq!(m.kind, IntentKind::ShowPolicy);
        assert!(m.reply.contains("hv_max_minutes = 510"));
    }

    #[test]
    fn add_list_clear_registry() {
        let mut f = Fixture::new();
        let empty = f.ask("Mostrar resumen de PSV").unwrap();
        assert_eq!(empty.kind, IntentKind::ListRegistry);
        assert!(empty.reply.starts_with("No hay PSVs registrados"));

        let a = f.ask("Agrega PSV 22:10–06:40 SCL–MIA").unwrap();
        assert_eq!(a.kind, IntentKind::AddScheduleEntry);
        assert!(a.reply.contains("PSV agregado: 22:10–06:40 SCL–MIA ⇒ **Noche completa**"));
        assert!(a.reply.contains("Consecutivas actuales: **1**."));

        f.ask("Agrega PSV 23:50–04:10").unwrap();
        let third = f.ask("agrega psv 01:10-07:05").unwrap();
        assert!(third.reply.contains("Consecutivas actuales: **3**."));
        assert!(third.reply.contains("(¡Excede 2 consecutivas!)"));
        assert_eq!(f.registry.len(), 3);

        let list = f.ask("lista de psv").unwrap();
        assert!(list.reply.starts_with("PSVs (3):"));
        assert!(list.reply.contains("1. 22:10–06:40 SCL–MIA · Noche completa · ZR 05:00"));
        assert!(list.reply.contains("máx histórico 3"));

        let cleared = f.ask("limpia los psv").unwrap();
        assert_eq!(cleared.kind, IntentKind::ClearRegistry);
        assert!(f.registry.is_empty());

        let after = f.ask("resumen psv").unwrap();
        assert!(after.reply.starts_with("No hay PSVs registrados"));
    }

    #[test]
    fn added_entry_inherits_remembered_route() {
        let mut f = Fixture::new();
        f.ask("Valida 22:10–06:40 MIA–QRO").unwrap();
        let a = f.ask("Agrega PSV 01:10–07:05").unwrap();
        assert!(a.reply.contains("01:10–07:05 MIA–QRO ⇒"));
        assert_eq!(f.registry.entries()[0].route, "MIA–QRO");
    }

    #[test]
    fn add_without_interval_falls_through() {
        let mut f = Fixture::new();
        let m = f.ask("agrega el psv de ayer");
        assert!(m.is_none());
        assert!(f.registry.is_empty());
    }

    #[test]
    fn registry_flag_tracks_mutation() {
        let policy = PolicyParams::default();
        let memory = SessionMemory::default();
        let mut registry = PsvRegistry::new();
        let router = Router::new();

        let mut ctx = TurnContext::new(&policy, &memory, &mut registry);
        router.route("valida 22:10-06:40", &mut ctx).unwrap();
        assert!(!ctx.registry_changed());

        let mut ctx = TurnContext::new(&policy, &memory, &mut registry);
        router.route("agrega psv 22:10-06:40", &mut ctx).unwrap();
        assert!(ctx.registry_changed());
    }

    #[test]
    fn unknown_text_matches_nothing() {
        let mut f = Fixture::new();
        assert!(f.ask("hola").is_none());
        assert!(f.ask("").is_none());
    }
}
