use messaggio_azione::analyzer::{MessageContext, generate_email_subject, generate_replies};
use messaggio_azione::model::{ContextType, SourceType, Tone};

fn message(text: &str, context: ContextType) -> MessageContext<'_> {
    MessageContext::new(text, context, SourceType::Other)
}

#[test]
fn test_university_greetings_use_name_and_role() {
    let msg = message("Quando è l'appello?", ContextType::University)
        .with_person(Some("Rossi"), Some("docente"));
    let replies = generate_replies(&msg);

    assert_eq!(
        replies.formal,
        "Gentile Professore/Professoressa Rossi (docente),\n\nIn merito alla Sua domanda:\n\nCordiali saluti"
    );
    assert_eq!(
        replies.cordial,
        "Buongiorno Rossi,\n\nRiguardo alla tua domanda:\n\nGrazie e buona giornata"
    );
    // empty body is dropped from the terse draft
    assert_eq!(replies.terse, "Buongiorno Rossi,\nGrazie");
}

#[test]
fn test_appointment_without_details_asks_for_them() {
    let replies = generate_replies(&message("Fissiamo un appuntamento", ContextType::Work));

    assert_eq!(
        replies.formal,
        "Gentile,\n\nConfermo la mia disponibilità per l'incontro proposto.\n\n\
         Avrei bisogno di alcune informazioni aggiuntive: data dell'incontro, luogo dell'incontro.\n\n\
         Distinti saluti"
    );
    assert_eq!(
        replies.cordial,
        "Buongiorno,\n\nPerfetto, per me va bene!\n\n\
         Mi servirebbe sapere: data dell'incontro, luogo dell'incontro. Puoi farmi sapere?\n\n\
         Cordiali saluti"
    );
    assert_eq!(
        replies.terse,
        "Buongiorno,\nOk, confermo.\n\nMi servono: data dell'incontro, luogo dell'incontro.\nGrazie"
    );
}

#[test]
fn test_family_terse_has_no_greeting() {
    let msg = message("Va bene, ricevuto", ContextType::Family).with_person(Some("Marco"), None);
    let replies = generate_replies(&msg);

    assert_eq!(
        replies.formal,
        "Ciao Marco,\n\nConfermo la ricezione del messaggio.\n\nUn abbraccio"
    );
    assert_eq!(replies.terse, "Ok!");
}

#[test]
fn test_gym_payment_replies() {
    let msg = message(
        "Ciao, puoi chiamarmi domani alle 15 per il pagamento della quota?",
        ContextType::Gym,
    );
    let replies = generate_replies(&msg);

    assert_eq!(
        replies.formal,
        "Gentili,\n\nHo preso nota delle informazioni relative al pagamento.\n\nCordiali saluti"
    );
    assert_eq!(replies.terse, "Ciao,\nOk, provvedo.\nGrazie");
    assert_eq!(replies.get(Tone::Cordial), replies.cordial);
}

#[test]
fn test_sales_closing_spans_two_lines() {
    let replies = generate_replies(&message("Ti informo che l'ordine è partito", ContextType::Sales));
    assert!(replies.formal.starts_with("Gentile Cliente,\n\n"));
    assert!(replies.formal.ends_with(
        "Resto a disposizione per qualsiasi chiarimento.\nCordiali saluti"
    ));
}

#[test]
fn test_no_placeholder_leaks() {
    for context in [
        ContextType::Family,
        ContextType::University,
        ContextType::Work,
        ContextType::Gym,
        ContextType::Sales,
        ContextType::Other,
    ] {
        let replies = generate_replies(&message("Ci vediamo domani?", context));
        for draft in [&replies.formal, &replies.cordial, &replies.terse] {
            assert!(!draft.contains("()"), "{context}: {draft}");
            assert!(!draft.contains("  "), "{context}: {draft}");
            assert_eq!(draft.trim(), draft.as_str());
        }
    }
}

#[test]
fn test_replies_are_deterministic() {
    let msg = message("Puoi mandarmi la fattura?", ContextType::Work);
    assert_eq!(generate_replies(&msg), generate_replies(&msg));
}

#[test]
fn test_email_subjects() {
    assert_eq!(
        generate_email_subject("Puoi mandarmi il file?", ContextType::Work),
        "Re: Risposta alla domanda"
    );
    assert_eq!(
        generate_email_subject("Ti informo che arrivo", ContextType::Family),
        "Ricevuto - Grazie"
    );
    assert_eq!(generate_email_subject("Buonasera", ContextType::Other), "Re: Risposta");
    assert_eq!(
        generate_email_subject(
            "Urgente! Entro oggi, scadenza importante, il prima possibile",
            ContextType::Work
        ),
        "Re: URGENTE - Risposta"
    );
}
