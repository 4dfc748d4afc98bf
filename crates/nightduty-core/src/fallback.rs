//! Replies for questions no rule understood, and the canned prompt list.

use serde::{Deserialize, Serialize};

/// Follow-up queries offered when nothing matched.
pub const SUGGESTIONS: [&str; 4] = [
    "Valida si el PSV 22:10–06:40 SCL–MIA es noche completa.",
    "Calcula minutos en zona roja para 23:50–04:10.",
    "Descanso mínimo para PS 10:20 con ΔLON=60°.",
    "¿Puedo programar 3 noches consecutivas?",
];

const FALLBACK_TEXT: &str = "No pude entender la consulta con precisión. Prueba con formatos como:\n\
     - **'Valida HH:MM–HH:MM ORIG–DEST'**\n\
     - **'Minutos en zona roja para HH:MM–HH:MM'**\n\
     - **'Descanso mínimo PS hh:mm con ΔLON=XX°'**";

/// Generic reply plus suggestions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallbackReply {
    pub reply: String,
    pub suggestions: Vec<String>,
}

/// The fallback never looks at the text; it is the same for every miss.
pub fn fallback_reply(_text: &str) -> FallbackReply {
    FallbackReply {
        reply: FALLBACK_TEXT.to_string(),
        suggestions: suggestions(),
    }
}

pub fn suggestions() -> Vec<String> {
    SUGGESTIONS.iter().map(|s| s.to_string()).collect()
}

/// A labelled shortcut question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuickPrompt {
    pub label: &'static str,
    pub text: &'static str,
}

pub const QUICK_PROMPTS: [QuickPrompt; 6] = [
    QuickPrompt {
        label: "Validar PSV nocturno",
        text: "Valida si el PSV 22:10–06:40 SCL–MIA cuenta como noche completa, media noche o diurna.",
    },
    QuickPrompt {
        label: "Cómputo zona roja",
        text: "Calcula minutos dentro de zona roja (00:30–05:30 LT) para PSV 23:50–04:10 SCL–LIM.",
    },
    QuickPrompt {
        label: "Descanso mínimo",
        text: "Indica el descanso mínimo para PS de 10:20 con ΔLON=30° y un solo relevo.",
    },
    QuickPrompt {
        label: "Consecutivas",
        text: "¿Puedo programar 3 noches consecutivas si 1 de ellas es 'media noche'?",
    },
    QuickPrompt {
        label: "Def. media noche",
        text: "Explícame cuándo un PSV se clasifica como 'media noche' según las reglas vigentes.",
    },
    QuickPrompt {
        label: "Ejemplo completo",
        text: "Tengo PSV 01:10–07:05 MIA–QRO y ayer volé 23:40–05:20. ¿Suma consecutivas?",
    },
];
