use std::sync::Once;

use console_core::{update, AppState, ContextId, Effect, Msg, Template, TemplateField};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(console_logging::initialize_for_tests);
}

fn template(id: &str, name: &str) -> Template {
    Template {
        id: id.to_string(),
        name: name.to_string(),
        url: format!("https://{name}.example.com"),
        navigation_goal: "find the pricing page".to_string(),
        data_extraction_goal: "list all plans".to_string(),
        ..Template::default()
    }
}

fn loaded(templates: Vec<Template>) -> AppState {
    update(AppState::new(), Msg::TemplatesLoaded(templates)).0
}

#[test]
fn startup_requests_the_template_list() {
    init_logging();
    let (_, effects) = update(AppState::new(), Msg::Started);
    assert_eq!(effects, vec![Effect::LoadTemplates]);
}

#[test]
fn new_template_is_saved_with_an_empty_id() {
    init_logging();
    let state = loaded(Vec::new());

    let (state, _) = update(state, Msg::TemplateNewRequested);
    assert_eq!(state.view().template_form.map(|f| f.title()), Some("New Template"));

    let (state, _) = update(
        state,
        Msg::TemplateFieldChanged {
            field: TemplateField::Name,
            value: "pricing".to_string(),
        },
    );
    let (state, _) = update(
        state,
        Msg::TemplateFieldChanged {
            field: TemplateField::Url,
            value: "https://shop.example.com".to_string(),
        },
    );
    let (_, effects) = update(state, Msg::TemplateSaveRequested);

    assert_eq!(
        effects,
        vec![Effect::SaveTemplate(Template {
            name: "pricing".to_string(),
            url: "https://shop.example.com".to_string(),
            ..Template::default()
        })]
    );
}

#[test]
fn edited_template_keeps_its_id() {
    init_logging();
    let state = loaded(vec![template("t-1", "alpha"), template("t-2", "beta")]);

    let (state, _) = update(state, Msg::TemplateEditRequested("t-2".to_string()));
    let form = state.template_form().cloned().expect("form open");
    assert_eq!(form.title(), "Edit Template");
    assert_eq!(form.draft.name, "beta");

    let (state, _) = update(state, Msg::TemplateFocusNext);
    let focused = state.template_form().map(|f| f.focused);
    assert_eq!(focused, Some(TemplateField::Url));

    let (state, _) = update(
        state,
        Msg::TemplateFieldChanged {
            field: TemplateField::Name,
            value: "beta v2".to_string(),
        },
    );
    let (_, effects) = update(state, Msg::TemplateSaveRequested);

    let mut expected = template("t-2", "beta");
    expected.name = "beta v2".to_string();
    assert_eq!(effects, vec![Effect::SaveTemplate(expected)]);
}

#[test]
fn successful_save_closes_the_form_and_reloads() {
    init_logging();
    let state = loaded(Vec::new());
    let (state, _) = update(state, Msg::TemplateNewRequested);

    let (state, effects) = update(state, Msg::TemplateSaved);

    assert!(state.template_form().is_none());
    assert_eq!(effects, vec![Effect::LoadTemplates]);
}

#[test]
fn failed_save_keeps_the_form_and_raises_an_alert() {
    init_logging();
    let state = loaded(Vec::new());
    let (state, _) = update(state, Msg::TemplateNewRequested);

    let (state, effects) = update(
        state,
        Msg::TemplateSaveFailed(Some("name is required".to_string())),
    );

    assert!(effects.is_empty());
    assert!(state.template_form().is_some());
    assert_eq!(state.alert(), Some("Error saving template: name is required"));

    let (state, _) = update(state, Msg::AlertDismissed);
    assert_eq!(state.alert(), None);
}

#[test]
fn delete_asks_first_and_reload_shrinks_the_list_by_one() {
    init_logging();
    let templates = vec![template("t-1", "alpha"), template("t-2", "beta")];
    let state = loaded(templates.clone());

    let (state, effects) = update(state, Msg::TemplateDeleteRequested("t-1".to_string()));
    assert!(effects.is_empty());
    assert_eq!(
        state.view().confirmation.as_deref(),
        Some("Are you sure you want to delete the template \"alpha\"?")
    );

    let (state, effects) = update(state, Msg::ConfirmAccepted);
    assert_eq!(
        effects,
        vec![Effect::DeleteTemplate {
            id: "t-1".to_string()
        }]
    );
    assert!(state.confirmation().is_none());

    let (state, effects) = update(state, Msg::TemplateDeleted);
    assert_eq!(effects, vec![Effect::LoadTemplates]);

    let remaining: Vec<_> = templates.into_iter().filter(|t| t.id != "t-1").collect();
    let (state, _) = update(state, Msg::TemplatesLoaded(remaining));
    assert_eq!(state.templates().len(), 1);
    assert_eq!(state.templates()[0].id, "t-2");
}

#[test]
fn rejected_delete_issues_nothing() {
    init_logging();
    let state = loaded(vec![template("t-1", "alpha")]);

    let (state, _) = update(state, Msg::TemplateDeleteRequested("t-1".to_string()));
    let (state, effects) = update(state, Msg::ConfirmRejected);

    assert!(effects.is_empty());
    assert!(state.confirmation().is_none());
    assert_eq!(state.templates().len(), 1);
}

#[test]
fn using_a_template_targets_the_active_context() {
    init_logging();
    let state = loaded(vec![template("t-1", "alpha")]);
    let (state, _) = update(state, Msg::SelectChat(ContextId::from("ctx-9")));

    let (state, effects) = update(state, Msg::TemplateUseRequested("t-1".to_string()));
    assert_eq!(
        effects,
        vec![Effect::UseTemplate {
            template_id: "t-1".to_string(),
            context: ContextId::from("ctx-9"),
        }]
    );

    let (state, _) = update(state, Msg::TemplateApplyFailed(None));
    assert_eq!(state.alert(), Some("Error using template: unknown error"));
}

#[test]
fn load_failure_keeps_the_previous_list() {
    init_logging();
    let state = loaded(vec![template("t-1", "alpha")]);

    let (state, effects) = update(state, Msg::TemplatesLoadFailed("http status 500".to_string()));

    assert!(effects.is_empty());
    assert_eq!(state.templates().len(), 1);
    assert!(state.alert().is_none());
    assert_eq!(
        state.status_note(),
        Some("Failed to load templates: http status 500")
    );
}

#[test]
fn editing_an_unknown_template_opens_nothing() {
    init_logging();
    let state = loaded(vec![template("t-1", "alpha")]);

    let (state, _) = update(state, Msg::TemplateEditRequested("nope".to_string()));
    assert!(state.template_form().is_none());
}
