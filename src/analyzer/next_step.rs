// File: ./src/analyzer/next_step.rs
use crate::analyzer::intent::{IntentKind, IntentSet};
use crate::model::{CalendarEvent, ContextType, NextStep, Priority, Task};

const MAX_CHECKLIST_ITEMS: usize = 3;
const FALLBACK_ACTION: &str = "Valutare il messaggio e decidere il prossimo passo";

fn step(action: impl Into<String>, items: &[&str]) -> (String, Vec<String>) {
    (
        action.into(),
        items.iter().map(|s| s.to_string()).collect(),
    )
}

fn event_step(event: &CalendarEvent) -> (String, Vec<String>) {
    if event.is_confirmed {
        return step(
            "Salvare l'appuntamento in calendario",
            &[
                "Scaricare il file .ics",
                "Importare nel calendario",
                "Confermare partecipazione",
            ],
        );
    }

    let mut items = vec!["Verifica data e orario proposti"];
    if event.location.is_none() {
        items.push("Chiedere conferma del luogo");
    }
    items.push("Inviare conferma o proposta alternativa");
    step("Confermare i dettagli dell'appuntamento", &items)
}

fn intent_step(primary: IntentKind, tasks: &[Task]) -> (String, Vec<String>) {
    match primary {
        IntentKind::Request if tasks.is_empty() => (String::new(), Vec::new()),
        IntentKind::Request => match tasks.iter().find(|t| t.priority == Priority::High) {
            Some(task) => step(
                format!("Completare: \"{}\"", task.title),
                &[
                    "Valuta cosa viene richiesto",
                    "Prepara quanto necessario",
                    "Rispondi confermando l'azione",
                ],
            ),
            None => step(
                "Rispondere confermando la presa in carico",
                &[
                    "Leggere attentamente la richiesta",
                    "Inviare risposta di conferma",
                ],
            ),
        },
        IntentKind::Payment => step(
            "Verificare e completare il pagamento",
            &[
                "Controllare importo e scadenza",
                "Effettuare il pagamento",
                "Inviare conferma dell'avvenuto pagamento",
            ],
        ),
        IntentKind::Question => step(
            "Rispondere alla domanda",
            &[
                "Preparare la risposta",
                "Verificare che sia completa",
                "Inviare la risposta",
            ],
        ),
        IntentKind::Information => step(
            "Prendere nota e confermare ricezione",
            &[
                "Salvare le informazioni importanti",
                "Ringraziare per l'aggiornamento",
            ],
        ),
        IntentKind::Confirmation => step("Confermare di aver ricevuto", &["Inviare breve conferma"]),
        IntentKind::Appointment | IntentKind::Urgency | IntentKind::Other => step(
            "Valutare il messaggio e rispondere",
            &[
                "Leggere con attenzione",
                "Identificare eventuali azioni necessarie",
                "Rispondere in modo appropriato",
            ],
        ),
    }
}

fn context_tip(context: ContextType, primary: IntentKind, checklist: &[String]) -> Option<&'static str> {
    match context {
        ContextType::University if !checklist.iter().any(|c| c.contains("formal")) => {
            Some("Usare tono formale nella risposta")
        }
        ContextType::Work if primary == IntentKind::Request => {
            Some("Definire tempistiche se necessario")
        }
        ContextType::Gym if primary == IntentKind::Payment => {
            Some("Verificare termini di disdetta/rinnovo")
        }
        ContextType::Sales if !checklist.iter().any(|c| c.contains("call to action")) => {
            Some("Includere proposta chiara nella risposta")
        }
        _ => None,
    }
}

/// Picks the single most useful action. Urgency beats a pending event, which beats
/// the primary intent.
pub fn generate_next_step(
    text: &str,
    tasks: &[Task],
    event: Option<&CalendarEvent>,
    context: ContextType,
) -> NextStep {
    let intents = IntentSet::detect(text);
    let primary = intents.primary_kind();

    let (mut action, mut checklist) = if intents.has_urgency() {
        step(
            "Rispondere immediatamente al messaggio",
            &[
                "Leggi attentamente il messaggio",
                "Prepara una risposta rapida",
                "Invia entro 5 minuti",
            ],
        )
    } else if let Some(event) = event {
        event_step(event)
    } else {
        intent_step(primary, tasks)
    };

    if let Some(tip) = context_tip(context, primary, &checklist) {
        checklist.push(tip.to_string());
    }
    checklist.truncate(MAX_CHECKLIST_ITEMS);

    if action.is_empty() {
        action = FALLBACK_ACTION.to_string();
    }

    NextStep { action, checklist }
}
