use chrono::{DateTime, Duration, TimeZone, Utc};
use chrono_tz::Europe::Rome;
use messaggio_azione::analyzer::{Clock, MessageContext, generate_tasks};
use messaggio_azione::model::{ContextType, Priority, SourceType, TaskTag};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 18, 8, 0, 0).unwrap()
}

fn clock() -> Clock {
    Clock::new(now(), Rome)
}

fn message(text: &str) -> MessageContext<'_> {
    MessageContext::new(text, ContextType::Other, SourceType::Other)
}

#[test]
fn test_request_with_date_and_question() {
    let text = "Ciao, puoi chiamarmi domani alle 15 per il pagamento della quota?";
    let msg = MessageContext::new(text, ContextType::Gym, SourceType::Chat);
    let tasks = generate_tasks(&msg, &clock());

    assert_eq!(tasks.len(), 2);

    let call = &tasks[0];
    assert_eq!(call.title, "Chiamarmi domani alle 15 per il pagamento della quota");
    assert_eq!(call.priority, Priority::Medium);
    assert_eq!(call.due_date, Some(Utc.with_ymd_and_hms(2026, 10, 19, 13, 0, 0).unwrap()));
    assert_eq!(
        call.due_date_reason.as_deref(),
        Some("Data menzionata nel messaggio (domani)")
    );
    assert_eq!(call.tags, vec![TaskTag::Call, TaskTag::Payment]);
    assert_eq!(call.description, "Abbonamento/palestra - via WhatsApp");

    let follow_up = &tasks[1];
    assert_eq!(follow_up.title, "Inviare risposta");
    assert!(follow_up.has_tag(TaskTag::Reply));
    assert_eq!(follow_up.due_date, call.due_date);
    assert_ne!(follow_up.id, call.id);
}

#[test]
fn test_deadline_word_raises_priority() {
    let tasks = generate_tasks(&message("Mi mandi il contratto firmato entro venerdì?"), &clock());

    assert_eq!(tasks[0].title, "Il contratto firmato entro venerdì");
    assert!(tasks.iter().all(|t| t.priority == Priority::High));
    assert_eq!(
        tasks[0].due_date,
        Some(Utc.with_ymd_and_hms(2026, 10, 22, 22, 0, 0).unwrap())
    );
    assert_eq!(
        tasks[0].due_date_reason.as_deref(),
        Some("Data menzionata nel messaggio (venerdì)")
    );
    assert_eq!(tasks[0].tags, vec![TaskTag::Documents]);
    assert_eq!(tasks[1].tags, vec![TaskTag::Documents, TaskTag::Reply]);
}

#[test]
fn test_inferred_date_reason() {
    let tasks = generate_tasks(&message("Puoi passare gio a ritirarlo"), &clock());
    assert_eq!(
        tasks[0].due_date_reason.as_deref(),
        Some("Data rilevata ma da confermare")
    );
}

#[test]
fn test_generic_task_when_nothing_actionable() {
    let tasks = generate_tasks(&message("Buonasera"), &clock());

    assert_eq!(tasks.len(), 1);
    let task = &tasks[0];
    assert_eq!(task.title, "Valutare e rispondere al messaggio");
    assert_eq!(task.description, "Messaggio da valutare");
    assert_eq!(task.priority, Priority::Medium);
    assert_eq!(task.tags, vec![TaskTag::Reply]);
    assert_eq!(task.due_date, Some(now() + Duration::days(7)));
    assert_eq!(task.due_date_reason.as_deref(), Some("Scadenza standard suggerita"));

    let msg = message("Buonasera").with_person(Some("Mario"), Some("Prof"));
    let tasks = generate_tasks(&msg, &clock());
    assert_eq!(tasks[0].description, "Messaggio da Mario (Prof) da valutare");
}

#[test]
fn test_urgent_message_due_tomorrow() {
    let tasks = generate_tasks(
        &message("Urgente! Il prima possibile, non c'è tempo, è fondamentale"),
        &clock(),
    );

    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].priority, Priority::High);
    assert_eq!(tasks[0].due_date, Some(now() + Duration::days(1)));
    assert_eq!(
        tasks[0].due_date_reason.as_deref(),
        Some("Urgente - suggerito entro domani")
    );
}

#[test]
fn test_soon_words_shorten_default_due_date() {
    let tasks = generate_tasks(&message("Quando puoi mandami il file"), &clock());

    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].title, "Mandami il file");
    assert_eq!(tasks[0].priority, Priority::Medium);
    assert_eq!(tasks[0].due_date, Some(now() + Duration::days(3)));
    assert_eq!(tasks[0].due_date_reason.as_deref(), Some("Richiesta sollecita"));
}

#[test]
fn test_intent_fallback_title() {
    let tasks = generate_tasks(&message("Grazie per l'aggiornamento, tutto chiaro."), &clock());
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].title, "Prendere nota dell'informazione");
    assert_eq!(tasks[0].tags, vec![TaskTag::Other]);
}

#[test]
fn test_description_with_person_role_and_source() {
    let msg = MessageContext::new("Puoi rivedere la bozza?", ContextType::Work, SourceType::Email)
        .with_person(Some("Anna"), Some("Manager"));
    let tasks = generate_tasks(&msg, &clock());
    assert_eq!(tasks[0].description, "Per Anna (Manager). Ambito lavorativo - via email");
}

#[test]
fn test_duplicate_titles_are_collapsed() {
    let tasks = generate_tasks(&message("Puoi chiamarmi? Puoi chiamarmi?"), &clock());
    let titles: Vec<&str> = tasks.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["Chiamarmi", "Inviare risposta"]);
}

#[test]
fn test_existing_reply_title_suppresses_follow_up() {
    let tasks = generate_tasks(&message("Puoi rispondere al cliente?"), &clock());
    let titles: Vec<&str> = tasks.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["Rispondere al cliente"]);
}

#[test]
fn test_never_empty() {
    for text in ["", "   ", "ok", "?", "Ti informo che domani piove", "€€€"] {
        let tasks = generate_tasks(&message(text), &clock());
        assert!(!tasks.is_empty(), "no tasks for {text:?}");
        for t in &tasks {
            assert!(!t.title.is_empty());
            assert!(!t.tags.is_empty());
            assert!(t.due_date.is_some());
        }
    }
}
