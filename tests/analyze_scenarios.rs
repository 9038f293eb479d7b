// File: tests/analyze_scenarios.rs
// End-to-end runs of the analyzer on realistic messages with a fixed clock.
use chrono::{DateTime, Duration, TimeZone, Utc};
use messaggio_azione::analyzer::{AnalyzerOptions, EventDurations, analyze};
use messaggio_azione::model::{AnalysisInput, ContextType, Priority, SourceType, TaskTag};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 18, 8, 0, 0).unwrap()
}

#[test]
fn test_gym_call_request() {
    let input = AnalysisInput::new(
        "Ciao, puoi chiamarmi domani alle 15 per il pagamento della quota?",
        SourceType::Chat,
        ContextType::Gym,
    );
    let result = analyze(&input, &AnalyzerOptions::default(), now());

    assert_eq!(result.tasks.len(), 2);
    let first = &result.tasks[0];
    assert_eq!(first.title, "Chiamarmi domani alle 15 per il pagamento della quota");
    assert_eq!(first.priority, Priority::Medium);
    assert!(first.has_tag(TaskTag::Call));
    assert!(first.has_tag(TaskTag::Payment));
    assert_eq!(
        first.due_date,
        Some(Utc.with_ymd_and_hms(2026, 10, 19, 13, 0, 0).unwrap())
    );
    assert_eq!(result.tasks[1].title, "Inviare risposta");

    let event = result.event.as_ref().expect("call request with a date");
    assert_eq!(event.title, "Chiamata");
    assert_eq!(event.duration_minutes(), 30);
    assert!(event.is_confirmed);
    assert_eq!(event.location, None);

    assert_eq!(result.next_step.action, "Salvare l'appuntamento in calendario");
    assert!(result.replies.formal.starts_with("Gentili,"));
}

#[test]
fn test_plain_acknowledgement() {
    let input = AnalysisInput::new(
        "Grazie per l'aggiornamento, tutto chiaro.",
        SourceType::Other,
        ContextType::Other,
    );
    let result = analyze(&input, &AnalyzerOptions::default(), now());

    assert!(result.event.is_none());
    assert_eq!(result.tasks.len(), 1);
    assert_eq!(result.tasks[0].due_date, Some(now() + Duration::days(7)));
    assert_eq!(result.next_step.action, "Prendere nota e confermare ricezione");
    assert_eq!(
        result.replies.formal,
        "Buongiorno,\n\nLa ringrazio per l'informazione.\n\nCordiali saluti"
    );
    assert_eq!(
        result.replies.cordial,
        "Ciao,\n\nGrazie per avermi avvisato!\n\nGrazie"
    );
    assert_eq!(result.replies.terse, "Ricevuto, grazie.");
}

#[test]
fn test_work_meeting_with_person() {
    let input = AnalysisInput::new(
        "Buongiorno, fissiamo una riunione: vediamoci giovedì alle 10:30 presso Sede Centrale. Fammi sapere.",
        SourceType::Email,
        ContextType::Work,
    )
    .with_person("Paola", Some("Direttrice".to_string()));
    let result = analyze(&input, &AnalyzerOptions::default(), now());

    let event = result.event.as_ref().expect("meeting with a date");
    assert_eq!(event.title, "Riunione con Paola");
    assert_eq!(event.location.as_deref(), Some("Sede Centrale"));
    assert_eq!(
        event.start_date,
        Utc.with_ymd_and_hms(2026, 10, 22, 8, 30, 0).unwrap()
    );
    assert_eq!(event.duration_minutes(), 60);
    assert!(event.is_confirmed);

    assert!(
        result
            .tasks
            .iter()
            .all(|t| t.description.starts_with("Per Paola (Direttrice)."))
    );
    assert!(result.replies.formal.starts_with("Gentile Paola (Direttrice),"));
    assert!(result.replies.cordial.starts_with("Buongiorno Paola,"));
}

#[test]
fn test_dotted_time_event_and_task_disagree() {
    let input = AnalysisInput::new(
        "Ci vediamo domani alle 15.30",
        SourceType::Chat,
        ContextType::Family,
    );
    let result = analyze(&input, &AnalyzerOptions::default(), now());

    // the event takes the first segment ("domani alle 15"), the task the whole text
    let event = result.event.expect("meeting with a date");
    assert_eq!(
        event.start_date,
        Utc.with_ymd_and_hms(2026, 10, 19, 13, 0, 0).unwrap()
    );
    assert_eq!(
        result.tasks[0].due_date,
        Some(Utc.with_ymd_and_hms(2026, 10, 19, 13, 30, 0).unwrap())
    );
}

#[test]
fn test_options_flow_through() {
    let input = AnalysisInput::new(
        "Sentiamoci in videochiamata domani alle 18",
        SourceType::Chat,
        ContextType::Family,
    );
    let options = AnalyzerOptions {
        durations: EventDurations {
            call_minutes: 45,
            meeting_minutes: 60,
        },
        timezone: chrono_tz::UTC,
    };
    let result = analyze(&input, &options, now());
    let event = result.event.expect("call with a date");

    // wall-clock time is read in the configured zone
    assert_eq!(
        event.start_date,
        Utc.with_ymd_and_hms(2026, 10, 19, 18, 0, 0).unwrap()
    );
    assert_eq!(event.duration_minutes(), 45);
    assert_eq!(event.location.as_deref(), Some("Online"));
}

#[test]
fn test_analysis_is_total() {
    let long = "parola ".repeat(2_000);
    let inputs = [
        "",
        "?!?!",
        "🙂🙂🙂",
        "31/02/2026 alle 99:99",
        "ALLE ORE H DOMANI DOMENICA",
        long.as_str(),
    ];
    for text in inputs {
        let input = AnalysisInput::new(text, SourceType::Other, ContextType::Other);
        let result = analyze(&input, &AnalyzerOptions::default(), now());
        assert!(!result.tasks.is_empty());
        assert!(!result.next_step.action.is_empty());
        assert!(result.next_step.checklist.len() <= 3);
        if let Some(event) = result.event {
            assert!(event.end_date > event.start_date);
        }
    }
}

#[test]
fn test_result_serializes_with_wire_names() {
    let input = AnalysisInput::new("Ci vediamo domani alle 9?", SourceType::Chat, ContextType::Work);
    let result = analyze(&input, &AnalyzerOptions::default(), now());
    let json = serde_json::to_value(&result).unwrap();

    assert!(json["tasks"][0]["dueDate"].is_string());
    assert!(json["tasks"][0]["dueDateReason"].is_string());
    assert!(json["replies"]["formale"].is_string());
    assert!(json["replies"]["sintetica"].is_string());
    assert_eq!(json["event"]["isConfirmed"], serde_json::json!(true));
    assert!(json["nextStep"]["checklist"].is_array());
}
