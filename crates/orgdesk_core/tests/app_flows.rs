use orgdesk_core::model::account::Account;
use orgdesk_core::model::audit::{AuditEntry, NewJournalEntry};
use orgdesk_core::model::module::{AppModule, CAPABILITY_NAVIGATION};
use orgdesk_core::model::notification::NotificationLevel;
use orgdesk_core::model::organization::Organization;
use orgdesk_core::model::partner::Partner;
use orgdesk_core::model::project::{NewProject, Project};
use orgdesk_core::model::team::Team;
use orgdesk_core::store::audit::AuditRecord;
use orgdesk_core::store::module_registry::ModuleRegistryError;
use orgdesk_core::{
    AppState, CollectionService, ConfigError, CoreConfig, EventKind, InMemoryCollectionService,
    LoadOutcome, ManualClock, MemoryPreferenceStore, ServiceError, Services, ThemeMode,
    Workspace, WorkspaceScope, WriteOutcome,
};
use std::rc::Rc;

struct Fixture {
    projects: Rc<InMemoryCollectionService<Project>>,
    audit: Rc<InMemoryCollectionService<AuditEntry>>,
}

fn workspaces() -> Vec<Workspace> {
    vec![
        Workspace::new("ws-me", "Me", WorkspaceScope::User("u-1".to_string())),
        Workspace::new(
            "ws-acme",
            "Acme",
            WorkspaceScope::Organization("org-acme".to_string()),
        ),
        Workspace::new("ws-core", "Core", WorkspaceScope::Team("team-core".to_string())),
        Workspace::new(
            "ws-vendor",
            "Vendor",
            WorkspaceScope::Partner("partner-1".to_string()),
        ),
    ]
}

fn app_with(config: &CoreConfig) -> (AppState<'static>, Fixture) {
    let projects = Rc::new(InMemoryCollectionService::new());
    let audit = Rc::new(InMemoryCollectionService::new());
    let mut services = Services::in_memory();
    services.workspaces = Rc::new(InMemoryCollectionService::with_items(workspaces()));
    services.organizations = Rc::new(InMemoryCollectionService::with_items(vec![
        Organization::new("org-acme", "Acme", "acme"),
    ]));
    services.teams = Rc::new(InMemoryCollectionService::with_items(vec![
        Team::new("team-core", "org-acme", "Core"),
        Team::new("team-ops", "org-acme", "Ops"),
    ]));
    services.partners = Rc::new(InMemoryCollectionService::with_items(vec![Partner::new(
        "partner-1",
        "org-acme",
        "Vendor",
    )]));
    services.projects = projects.clone();
    services.audit = audit.clone();

    let app = AppState::new(
        config,
        services,
        Box::new(MemoryPreferenceStore::new()),
        Rc::new(ManualClock::new(10_000, 1)),
    )
    .expect("default config is valid");
    (app, Fixture { projects, audit })
}

fn signed_in_app() -> (AppState<'static>, Fixture) {
    let (mut app, fixture) = app_with(&CoreConfig::default());
    app.sign_in(Account::new("u-1", "Ada", "ada@example.com"));
    assert_eq!(app.load_workspaces(), LoadOutcome::Applied(4));
    assert_eq!(app.load_organizations(), LoadOutcome::Applied(1));
    (app, fixture)
}

fn launch() -> NewProject {
    NewProject {
        name: "Launch".to_string(),
        description: Some("Q3 rollout".to_string()),
    }
}

#[test]
fn blank_preference_key_fails_construction() {
    let config = CoreConfig {
        theme_preference_key: " ".to_string(),
        ..CoreConfig::default()
    };

    let result = AppState::new(
        &config,
        Services::in_memory(),
        Box::new(MemoryPreferenceStore::new()),
        Rc::new(ManualClock::new(0, 1)),
    );

    assert!(matches!(result, Err(ConfigError::EmptyPreferenceKey)));
}

#[test]
fn switching_to_an_organization_workspace_selects_it_and_emits_once() {
    let (mut app, _) = signed_in_app();

    let active = app
        .switch_workspace("ws-acme")
        .expect("known workspace should activate");

    assert_eq!(active.id, "ws-acme");
    assert_eq!(
        app.organizations()
            .selected_organization()
            .map(|org| org.id.as_str()),
        Some("org-acme")
    );
    let switched = app.events().by_kind(EventKind::WorkspaceSwitched);
    assert_eq!(switched.len(), 1);
    assert_eq!(switched[0].payload["workspace_id"], "ws-acme");
    assert_eq!(
        switched[0].scope,
        Some(WorkspaceScope::Organization("org-acme".to_string()))
    );
}

#[test]
fn unknown_or_repeated_switch_changes_nothing() {
    let (mut app, _) = signed_in_app();
    app.switch_workspace("ws-acme").expect("first switch");
    let events_before = app.events().len();
    let version_before = app.workspaces().version();

    assert!(app.switch_workspace("ws-missing").is_none());
    assert!(app.switch_workspace("ws-acme").is_none());

    assert_eq!(app.events().len(), events_before);
    assert_eq!(app.workspaces().version(), version_before);
}

#[test]
fn switching_resets_workspace_scoped_containers() {
    let (mut app, _) = signed_in_app();
    app.switch_workspace("ws-acme").expect("switch");
    app.refresh_active_workspace();
    assert!(app.create_project(launch()).is_saved());
    assert!(app.teams().has_teams());

    app.switch_workspace("ws-me").expect("switch back");

    assert_eq!(app.projects().project_count(), 0);
    assert!(!app.teams().has_teams());
    assert_eq!(app.partners().partner_count(), 0);
    assert_eq!(app.audit().entry_count(), 0);
}

#[test]
fn refresh_loads_collections_of_the_active_organization() {
    let (mut app, fixture) = signed_in_app();
    app.switch_workspace("ws-acme").expect("switch");
    fixture
        .projects
        .create(&Project::create(
            "ws-acme",
            NewProject {
                name: "Existing".to_string(),
                description: None,
            },
        ))
        .expect("seed project");

    let report = app.refresh_active_workspace();

    assert_eq!(report.projects, Some(LoadOutcome::Applied(1)));
    assert_eq!(report.teams, Some(LoadOutcome::Applied(2)));
    assert_eq!(report.partners, Some(LoadOutcome::Applied(1)));
    assert_eq!(report.audit, Some(LoadOutcome::Applied(0)));
    assert_eq!(report.journal, Some(LoadOutcome::Applied(0)));
}

#[test]
fn team_scope_selects_its_team_after_refresh() {
    let (mut app, _) = signed_in_app();
    app.switch_workspace("ws-core").expect("team switch");
    assert!(!app.teams().has_selected_team());

    let report = app.refresh_active_workspace();

    assert_eq!(report.teams, Some(LoadOutcome::Applied(1)));
    assert_eq!(report.partners, None);
    let selected = app
        .teams()
        .state()
        .selected_team
        .as_ref()
        .expect("team scope should select its team");
    assert_eq!(selected.id, "team-core");
}

#[test]
fn partner_scope_selects_its_partner_after_refresh() {
    let (mut app, _) = signed_in_app();
    app.switch_workspace("ws-vendor").expect("partner switch");

    let report = app.refresh_active_workspace();

    assert_eq!(report.partners, Some(LoadOutcome::Applied(1)));
    assert_eq!(report.teams, None);
    assert_eq!(
        app.partners().selected_partner().map(|p| p.id.as_str()),
        Some("partner-1")
    );
}

#[test]
fn leaving_an_organization_workspace_drops_its_selection() {
    let (mut app, _) = signed_in_app();
    app.switch_workspace("ws-acme").expect("organization switch");
    app.switch_workspace("ws-core").expect("team switch");

    assert!(app.organizations().selected_organization().is_none());

    app.refresh_active_workspace();
    assert_eq!(app.teams().team_count(), 1);
    assert_eq!(app.partners().partner_count(), 0);
}

#[test]
fn load_started_before_a_switch_settles_as_stale() {
    let (mut app, _) = signed_in_app();
    app.switch_workspace("ws-acme").expect("organization switch");
    let ticket = app.teams_mut().begin_load();

    app.switch_workspace("ws-me").expect("user switch");
    let outcome = app
        .teams_mut()
        .finish_load(ticket, Ok(vec![Team::new("team-core", "org-acme", "Core")]));

    assert_eq!(outcome, LoadOutcome::Stale);
    assert!(!app.teams().has_teams());
    assert!(!app.teams().state().status.loading);
}

#[test]
fn project_writes_require_an_active_workspace() {
    let (mut app, fixture) = signed_in_app();

    let outcome = app.create_project(launch());

    assert_eq!(outcome, WriteOutcome::Skipped);
    assert!(fixture.projects.items().is_empty());
    assert!(app.events().by_kind(EventKind::ProjectCreated).is_empty());
}

#[test]
fn created_project_keeps_its_description_and_emits_event() {
    let (mut app, fixture) = signed_in_app();
    app.switch_workspace("ws-acme").expect("switch");

    let project = app
        .create_project(launch())
        .saved()
        .expect("project should be saved");

    assert_eq!(project.workspace_id, "ws-acme");
    assert_eq!(project.description.as_deref(), Some("Q3 rollout"));
    assert_eq!(fixture.projects.items(), vec![project.clone()]);
    let created = app.events().by_kind(EventKind::ProjectCreated);
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].payload["id"], project.id);
}

#[test]
fn archive_moves_project_between_views() {
    let (mut app, _) = signed_in_app();
    app.switch_workspace("ws-acme").expect("switch");
    let project = app.create_project(launch()).saved().expect("saved");
    assert_eq!(app.projects().active_projects().len(), 1);

    let archived = app
        .archive_project(&project.id)
        .saved()
        .expect("archive should save");

    assert!(archived.archived);
    assert!(app.projects().active_projects().is_empty());
    assert_eq!(app.projects().archived_projects().len(), 1);
    assert_eq!(app.events().by_kind(EventKind::ProjectArchived).len(), 1);
}

#[test]
fn failed_project_write_stores_the_error() {
    let (mut app, fixture) = signed_in_app();
    app.switch_workspace("ws-acme").expect("switch");
    fixture
        .projects
        .fail_next(ServiceError::Unavailable("offline".to_string()));

    let outcome = app.create_project(launch());

    let WriteOutcome::Failed(message) = outcome else {
        panic!("expected failure, got {outcome:?}");
    };
    assert_eq!(app.projects().state().status.error.as_deref(), Some(message.as_str()));
    assert_eq!(app.projects().project_count(), 0);
    assert!(app.events().by_kind(EventKind::ProjectCreated).is_empty());
}

#[test]
fn audit_record_is_skipped_without_actor_or_workspace() {
    let (mut app, fixture) = app_with(&CoreConfig::default());
    app.load_workspaces();
    app.switch_workspace("ws-acme").expect("switch");

    let outcome = app.record_audit(AuditRecord::new("project.create"));

    assert_eq!(outcome, WriteOutcome::Skipped);
    assert!(fixture.audit.items().is_empty());
    assert_eq!(app.audit().entry_count(), 0);
}

#[test]
fn audit_record_is_attributed_to_actor_and_workspace() {
    let (mut app, fixture) = signed_in_app();
    app.switch_workspace("ws-acme").expect("switch");

    let entry = app
        .record_audit(AuditRecord::new("project.create").target("p-1"))
        .saved()
        .expect("audit entry saved");

    assert_eq!(entry.actor_id, "u-1");
    assert_eq!(entry.workspace_id, "ws-acme");
    assert_eq!(entry.target_id.as_deref(), Some("p-1"));
    assert_eq!(fixture.audit.items().len(), 1);
    assert_eq!(app.audit().entries_by_actor("u-1").len(), 1);
    assert_eq!(app.audit().entries_by_action("project").len(), 1);
    assert_eq!(app.events().by_kind(EventKind::AuditRecorded).len(), 1);
}

#[test]
fn journal_append_normalizes_tags() {
    let (mut app, _) = signed_in_app();
    app.switch_workspace("ws-acme").expect("switch");

    let entry = app
        .append_journal(NewJournalEntry {
            title: "Kickoff".to_string(),
            body: Some("Notes".to_string()),
            tags: vec![" Launch ".to_string(), "launch".to_string(), String::new()],
        })
        .saved()
        .expect("journal entry saved");

    assert_eq!(entry.tags, vec!["launch"]);
    assert_eq!(app.journal().entries_by_tag("LAUNCH").len(), 1);
    assert_eq!(app.events().by_kind(EventKind::JournalAppended).len(), 1);
}

#[test]
fn toggling_a_module_emits_its_new_state() {
    let (mut app, _) = signed_in_app();
    app.modules_mut()
        .register(AppModule::new(
            "billing.invoices",
            "Invoices",
            "1.0.0",
            &[CAPABILITY_NAVIGATION],
        ))
        .expect("valid module");

    let enabled = app.toggle_module("billing.invoices").expect("known module");

    let toggled = app.events().by_kind(EventKind::ModuleToggled);
    assert_eq!(toggled.len(), 1);
    assert_eq!(toggled[0].payload["enabled"], enabled.to_string());
    assert!(matches!(
        app.toggle_module("missing.module"),
        Err(ModuleRegistryError::ModuleNotFound(_))
    ));
}

#[test]
fn sign_out_resets_everything_but_theme() {
    let (mut app, _) = signed_in_app();
    app.set_theme(ThemeMode::Dark).expect("theme persists");
    app.switch_workspace("ws-acme").expect("switch");
    app.refresh_active_workspace();
    app.create_project(launch());
    app.sidebar_mut().pin("projects");
    app.notify(NotificationLevel::Info, "Hello", None);

    let previous = app.sign_out().expect("someone was signed in");

    assert_eq!(previous.id, "u-1");
    assert!(!app.session().is_authenticated());
    assert!(!app.workspaces().has_workspaces());
    assert!(app.workspaces().active_workspace().is_none());
    assert!(!app.organizations().has_organizations());
    assert!(!app.teams().has_teams());
    assert_eq!(app.projects().project_count(), 0);
    assert!(!app.sidebar().is_pinned("projects"));
    assert!(app.notifications().is_empty());
    assert_eq!(app.theme().mode(), ThemeMode::Dark);
    let events = app.events().events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind, EventKind::SessionEnded);
}

#[test]
fn bootstrap_restores_theme_written_by_set_theme() {
    let (mut app, _) = app_with(&CoreConfig::default());
    assert_eq!(app.bootstrap(), ThemeMode::Auto);

    app.set_theme(ThemeMode::Light).expect("persist");
    app.set_theme(ThemeMode::Dark).expect("persist");

    assert_eq!(app.bootstrap(), ThemeMode::Dark);
    assert_eq!(app.events().by_kind(EventKind::ThemeChanged).len(), 2);
}

#[test]
fn configured_event_limit_bounds_the_log() {
    let config = CoreConfig {
        event_log_limit: 2,
        ..CoreConfig::default()
    };
    let (mut app, _) = app_with(&config);

    for mode in [ThemeMode::Light, ThemeMode::Dark, ThemeMode::Auto] {
        app.set_theme(mode).expect("persist");
    }

    let modes: Vec<String> = app
        .events()
        .events()
        .into_iter()
        .map(|event| event.payload["mode"].clone())
        .collect();
    assert_eq!(modes, vec!["dark", "auto"]);
}
