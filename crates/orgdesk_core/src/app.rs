//! Root composition of every state container.
//!
//! # Responsibility
//! - Construct containers, the event log and their collaborators explicitly.
//! - Run flows that span containers (sign-in/out, workspace switch, writes
//!   that need actor context) and fan out domain events.
//!
//! # Invariants
//! - Containers are reachable only through this value; no global lookup.
//! - A workspace switch resets every workspace-scoped container before the
//!   `workspace.switched` event is emitted.
//! - Team and partner scopes are selected once their collections reload.
//! - Sign-out resets every container except the device-local theme.

use crate::clock::Clock;
use crate::config::{ConfigError, CoreConfig};
use crate::model::account::Account;
use crate::model::audit::{AuditEntry, JournalEntry, NewJournalEntry};
use crate::model::event::{DomainEvent, EventKind};
use crate::model::notification::{Notification, NotificationLevel};
use crate::model::organization::Organization;
use crate::model::partner::Partner;
use crate::model::project::{NewProject, Project};
use crate::model::team::Team;
use crate::model::theme::ThemeMode;
use crate::model::workspace::{Workspace, WorkspaceScope};
use crate::model::{Entity, ListScope};
use crate::prefs::{PreferenceResult, PreferenceStore};
use crate::service::memory::InMemoryCollectionService;
use crate::service::CollectionService;
use crate::store::audit::{AuditRecord, AuditStore};
use crate::store::event_log::EventLog;
use crate::store::journal::JournalStore;
use crate::store::loader::LoadOutcome;
use crate::store::module_registry::{ModuleRegistry, ModuleRegistryError};
use crate::store::notification::NotificationStore;
use crate::store::organization::OrganizationStore;
use crate::store::partner::PartnerStore;
use crate::store::project::ProjectStore;
use crate::store::session::SessionStore;
use crate::store::sidebar::SidebarStore;
use crate::store::team::TeamStore;
use crate::store::theme::ThemeStore;
use crate::store::workspace::WorkspaceStore;
use crate::store::{ActorContext, WriteOutcome};
use log::{info, warn};
use std::rc::Rc;

/// Remote collection collaborators, one per persisted collection.
#[derive(Clone)]
pub struct Services {
    pub workspaces: Rc<dyn CollectionService<Workspace>>,
    pub organizations: Rc<dyn CollectionService<Organization>>,
    pub teams: Rc<dyn CollectionService<Team>>,
    pub partners: Rc<dyn CollectionService<Partner>>,
    pub projects: Rc<dyn CollectionService<Project>>,
    pub audit: Rc<dyn CollectionService<AuditEntry>>,
    pub journal: Rc<dyn CollectionService<JournalEntry>>,
}

impl Services {
    /// Empty in-process collections.
    pub fn in_memory() -> Self {
        Self {
            workspaces: Rc::new(InMemoryCollectionService::<Workspace>::new()),
            organizations: Rc::new(InMemoryCollectionService::<Organization>::new()),
            teams: Rc::new(InMemoryCollectionService::<Team>::new()),
            partners: Rc::new(InMemoryCollectionService::<Partner>::new()),
            projects: Rc::new(InMemoryCollectionService::<Project>::new()),
            audit: Rc::new(InMemoryCollectionService::<AuditEntry>::new()),
            journal: Rc::new(InMemoryCollectionService::<JournalEntry>::new()),
        }
    }
}

/// Outcomes of refreshing the active workspace's collections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefreshReport {
    pub teams: Option<LoadOutcome>,
    pub partners: Option<LoadOutcome>,
    pub projects: Option<LoadOutcome>,
    pub audit: Option<LoadOutcome>,
    pub journal: Option<LoadOutcome>,
}

pub struct AppState<'p> {
    clock: Rc<dyn Clock>,
    services: Services,
    prefs: Box<dyn PreferenceStore + 'p>,
    events: EventLog,
    session: SessionStore,
    workspaces: WorkspaceStore,
    organizations: OrganizationStore,
    teams: TeamStore,
    partners: PartnerStore,
    projects: ProjectStore,
    modules: ModuleRegistry,
    sidebar: SidebarStore,
    notifications: NotificationStore,
    theme: ThemeStore,
    audit: AuditStore,
    journal: JournalStore,
}

impl<'p> AppState<'p> {
    pub fn new(
        config: &CoreConfig,
        services: Services,
        prefs: Box<dyn PreferenceStore + 'p>,
        clock: Rc<dyn Clock>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let policy = config.zero_limit_policy;
        Ok(Self {
            events: EventLog::new(config.event_log_limit, policy, Rc::clone(&clock)),
            clock,
            services,
            prefs,
            session: SessionStore::new(),
            workspaces: WorkspaceStore::new(),
            organizations: OrganizationStore::new(),
            teams: TeamStore::new(),
            partners: PartnerStore::new(),
            projects: ProjectStore::new(),
            modules: ModuleRegistry::new(),
            sidebar: SidebarStore::new(),
            notifications: NotificationStore::new(config.notification_limit, policy),
            theme: ThemeStore::new(config.theme_preference_key.clone()),
            audit: AuditStore::new(config.audit_limit, policy),
            journal: JournalStore::new(config.journal_limit, policy),
        })
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut EventLog {
        &mut self.events
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn workspaces(&self) -> &WorkspaceStore {
        &self.workspaces
    }

    pub fn workspaces_mut(&mut self) -> &mut WorkspaceStore {
        &mut self.workspaces
    }

    pub fn organizations(&self) -> &OrganizationStore {
        &self.organizations
    }

    pub fn organizations_mut(&mut self) -> &mut OrganizationStore {
        &mut self.organizations
    }

    pub fn teams(&self) -> &TeamStore {
        &self.teams
    }

    pub fn teams_mut(&mut self) -> &mut TeamStore {
        &mut self.teams
    }

    pub fn partners(&self) -> &PartnerStore {
        &self.partners
    }

    pub fn partners_mut(&mut self) -> &mut PartnerStore {
        &mut self.partners
    }

    pub fn projects(&self) -> &ProjectStore {
        &self.projects
    }

    pub fn modules(&self) -> &ModuleRegistry {
        &self.modules
    }

    pub fn modules_mut(&mut self) -> &mut ModuleRegistry {
        &mut self.modules
    }

    pub fn sidebar(&self) -> &SidebarStore {
        &self.sidebar
    }

    pub fn sidebar_mut(&mut self) -> &mut SidebarStore {
        &mut self.sidebar
    }

    pub fn notifications(&self) -> &NotificationStore {
        &self.notifications
    }

    pub fn notifications_mut(&mut self) -> &mut NotificationStore {
        &mut self.notifications
    }

    pub fn theme(&self) -> &ThemeStore {
        &self.theme
    }

    pub fn audit(&self) -> &AuditStore {
        &self.audit
    }

    pub fn journal(&self) -> &JournalStore {
        &self.journal
    }

    /// Restores persisted preferences. Failures fall back to defaults.
    pub fn bootstrap(&mut self) -> ThemeMode {
        match self.theme.restore(self.prefs.as_ref()) {
            Ok(mode) => mode,
            Err(err) => {
                warn!("event=app_bootstrap module=app status=fallback error={err}");
                ThemeMode::Auto
            }
        }
    }

    pub fn sign_in(&mut self, account: Account) {
        let actor_id = account.id.clone();
        self.session.sign_in(account);
        info!("event=sign_in module=app status=ok");
        self.events
            .emit(DomainEvent::new(EventKind::SessionStarted, "session").with("actor_id", actor_id));
    }

    /// Ends the session and returns every container but the theme to its
    /// initial record.
    pub fn sign_out(&mut self) -> Option<Account> {
        let previous = self.session.sign_out();
        self.workspaces.clear();
        self.organizations.clear();
        self.teams.clear();
        self.partners.clear();
        self.projects.clear();
        self.modules.clear();
        self.sidebar.clear();
        self.notifications.clear();
        self.audit.clear();
        self.journal.clear();
        self.events.clear();
        if let Some(account) = previous.as_ref() {
            self.events.emit(
                DomainEvent::new(EventKind::SessionEnded, "session")
                    .with("actor_id", account.id.clone()),
            );
        }
        info!("event=sign_out module=app status=ok");
        previous
    }

    pub fn load_workspaces(&mut self) -> LoadOutcome {
        self.workspaces.load(self.services.workspaces.as_ref())
    }

    pub fn load_organizations(&mut self) -> LoadOutcome {
        self.organizations.load(self.services.organizations.as_ref())
    }

    /// Activates a known workspace and resets the containers scoped to it.
    ///
    /// Returns `None` (and changes nothing) for unknown or already-active ids.
    pub fn switch_workspace(&mut self, workspace_id: &str) -> Option<Workspace> {
        let workspace = self.workspaces.set_active_workspace(workspace_id)?;

        self.teams.clear();
        self.partners.clear();
        self.projects.clear();
        self.audit.clear();
        self.journal.clear();

        // Team and partner selection follow the next refresh.
        let organization_id = match &workspace.scope {
            WorkspaceScope::Organization(organization_id) => Some(organization_id.as_str()),
            WorkspaceScope::User(_) | WorkspaceScope::Team(_) | WorkspaceScope::Partner(_) => None,
        };
        self.organizations.set_selected_organization(organization_id);

        info!(
            "event=workspace_switch module=app status=ok scope={}",
            workspace.scope.kind().as_str()
        );
        self.events.emit(
            DomainEvent::new(EventKind::WorkspaceSwitched, "workspace")
                .with("workspace_id", workspace.id.clone())
                .scoped(workspace.scope.clone()),
        );
        Some(workspace)
    }

    /// Reloads every collection that depends on the active workspace.
    ///
    /// Organization scopes load the organization's teams and partners; team
    /// and partner scopes load and select that single entity.
    pub fn refresh_active_workspace(&mut self) -> RefreshReport {
        let workspace_id = self.workspaces.state().active_workspace_id.clone();
        let scope = self.workspaces.active_scope().cloned();

        let mut report = RefreshReport {
            projects: self
                .projects
                .load(self.services.projects.as_ref(), workspace_id.as_deref()),
            audit: self
                .audit
                .load(self.services.audit.as_ref(), workspace_id.as_deref()),
            journal: self
                .journal
                .load(self.services.journal.as_ref(), workspace_id.as_deref()),
            ..RefreshReport::default()
        };
        match scope {
            Some(WorkspaceScope::Organization(organization_id)) => {
                report.teams = Some(
                    self.teams
                        .load(self.services.teams.as_ref(), &organization_id),
                );
                report.partners = Some(
                    self.partners
                        .load(self.services.partners.as_ref(), &organization_id),
                );
            }
            Some(WorkspaceScope::Team(team_id)) => {
                report.teams = Some(self.teams.load_scoped(
                    self.services.teams.as_ref(),
                    &ListScope::Team(team_id.clone()),
                ));
                let team = self.teams.find_team(&team_id).cloned();
                self.teams.set_selected_team(team);
            }
            Some(WorkspaceScope::Partner(partner_id)) => {
                report.partners = Some(self.partners.load_scoped(
                    self.services.partners.as_ref(),
                    &ListScope::Partner(partner_id.clone()),
                ));
                self.partners.set_selected_partner(Some(partner_id.as_str()));
            }
            Some(WorkspaceScope::User(_)) | None => {}
        }
        report
    }

    pub fn create_project(&mut self, input: NewProject) -> WriteOutcome<Project> {
        let workspace_id = self.workspaces.state().active_workspace_id.clone();
        let outcome = self.projects.create(
            self.services.projects.as_ref(),
            workspace_id.as_deref(),
            input,
            self.clock.now_ms(),
        );
        self.emit_saved(&outcome, EventKind::ProjectCreated, "projects");
        outcome
    }

    pub fn update_project(&mut self, project: Project) -> WriteOutcome<Project> {
        let workspace_id = self.workspaces.state().active_workspace_id.clone();
        let outcome = self.projects.update(
            self.services.projects.as_ref(),
            workspace_id.as_deref(),
            project,
            self.clock.now_ms(),
        );
        self.emit_saved(&outcome, EventKind::ProjectUpdated, "projects");
        outcome
    }

    pub fn archive_project(&mut self, project_id: &str) -> WriteOutcome<Project> {
        let workspace_id = self.workspaces.state().active_workspace_id.clone();
        let outcome = self.projects.archive(
            self.services.projects.as_ref(),
            workspace_id.as_deref(),
            project_id,
            self.clock.now_ms(),
        );
        self.emit_saved(&outcome, EventKind::ProjectArchived, "projects");
        outcome
    }

    /// Writes an audit entry attributed to the signed-in actor.
    ///
    /// Skipped silently without an actor or an active workspace.
    pub fn record_audit(&mut self, record: AuditRecord) -> WriteOutcome<AuditEntry> {
        let now_ms = self.clock.now_ms();
        let context = actor_context(&self.session, &self.workspaces);
        let outcome = self
            .audit
            .record(self.services.audit.as_ref(), context, record, now_ms);
        self.emit_saved(&outcome, EventKind::AuditRecorded, "audit");
        outcome
    }

    pub fn append_journal(&mut self, input: NewJournalEntry) -> WriteOutcome<JournalEntry> {
        let now_ms = self.clock.now_ms();
        let context = actor_context(&self.session, &self.workspaces);
        let outcome = self
            .journal
            .append(self.services.journal.as_ref(), context, input, now_ms);
        self.emit_saved(&outcome, EventKind::JournalAppended, "journal");
        outcome
    }

    pub fn toggle_module(&mut self, module_id: &str) -> Result<bool, ModuleRegistryError> {
        let enabled = self.modules.toggle(module_id)?;
        self.events.emit(
            DomainEvent::new(EventKind::ModuleToggled, "modules")
                .with("module_id", module_id)
                .with("enabled", enabled.to_string()),
        );
        Ok(enabled)
    }

    /// Applies and persists a theme choice.
    pub fn set_theme(&mut self, mode: ThemeMode) -> PreferenceResult<()> {
        let persisted = self.theme.set_mode(mode, self.prefs.as_ref());
        self.events.emit(
            DomainEvent::new(EventKind::ThemeChanged, "theme").with("mode", mode.as_str()),
        );
        persisted
    }

    pub fn set_system_prefers_dark(&mut self, prefers_dark: bool) {
        self.theme.set_system_prefers_dark(prefers_dark);
    }

    pub fn notify(
        &mut self,
        level: NotificationLevel,
        title: impl Into<String>,
        message: Option<String>,
    ) -> String {
        let mut notification = Notification::new(level, title, self.clock.now_ms());
        notification.message = message;
        self.notifications.push(notification)
    }

    fn emit_saved<T: Entity>(
        &mut self,
        outcome: &WriteOutcome<T>,
        kind: EventKind,
        producer: &str,
    ) {
        let WriteOutcome::Saved(saved) = outcome else {
            return;
        };
        let mut event = DomainEvent::new(kind, producer).with("id", saved.entity_id());
        if let Some(scope) = self.workspaces.active_scope() {
            event = event.scoped(scope.clone());
        }
        self.events.emit(event);
    }
}

fn actor_context<'a>(
    session: &'a SessionStore,
    workspaces: &'a WorkspaceStore,
) -> Option<ActorContext<'a>> {
    let actor = session.actor()?;
    let workspace_id = workspaces.state().active_workspace_id.as_deref()?;
    Some(ActorContext {
        workspace_id,
        actor_id: actor.id.as_str(),
    })
}
