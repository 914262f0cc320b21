//! CLI probe for the state core.
//!
//! # Responsibility
//! - Verify `orgdesk_core` linkage and print its version.
//! - Drive one scripted session through `AppState` and dump the event log.

use log::warn;
use orgdesk_core::model::account::Account;
use orgdesk_core::model::notification::NotificationLevel;
use orgdesk_core::model::organization::Organization;
use orgdesk_core::model::project::NewProject;
use orgdesk_core::model::team::Team;
use orgdesk_core::{
    AppState, CoreConfig, InMemoryCollectionService, MemoryPreferenceStore, Services,
    SystemClock, ThemeMode, Workspace, WorkspaceScope,
};
use std::process::ExitCode;
use std::rc::Rc;

struct Args {
    level: String,
    log_dir: Option<String>,
}

fn parse_args(mut raw: impl Iterator<Item = String>) -> Result<Args, String> {
    let mut args = Args {
        level: orgdesk_core::default_log_level().to_string(),
        log_dir: None,
    };
    while let Some(flag) = raw.next() {
        match flag.as_str() {
            "--level" => args.level = raw.next().ok_or("--level needs a value")?,
            "--log-dir" => args.log_dir = Some(raw.next().ok_or("--log-dir needs a value")?),
            other => return Err(format!("unknown argument `{other}`")),
        }
    }
    Ok(args)
}

fn demo_services() -> Services {
    let mut services = Services::in_memory();
    services.workspaces = Rc::new(InMemoryCollectionService::with_items(vec![
        Workspace::new("ws-personal", "Personal", WorkspaceScope::User("u-1".into())),
        Workspace::new(
            "ws-acme",
            "Acme",
            WorkspaceScope::Organization("org-acme".into()),
        ),
    ]));
    services.organizations = Rc::new(InMemoryCollectionService::with_items(vec![
        Organization::new("org-acme", "Acme", "acme"),
    ]));
    services.teams = Rc::new(InMemoryCollectionService::with_items(vec![
        Team::new("team-core", "org-acme", "Core"),
    ]));
    services
}

fn run_demo() -> Result<String, String> {
    let config = CoreConfig::default();
    let prefs = Box::new(MemoryPreferenceStore::new());
    let mut app = AppState::new(&config, demo_services(), prefs, Rc::new(SystemClock))
        .map_err(|err| err.to_string())?;

    app.bootstrap();
    app.sign_in(Account::new("u-1", "Demo User", "demo@example.com"));
    app.load_workspaces();
    app.load_organizations();
    app.switch_workspace("ws-acme");
    app.refresh_active_workspace();
    app.create_project(NewProject {
        name: "Launch".to_string(),
        description: Some("Q3 launch plan".to_string()),
    });
    if let Err(err) = app.set_theme(ThemeMode::Dark) {
        warn!("event=cli_demo module=cli status=error step=set_theme error={err}");
    }
    app.notify(NotificationLevel::Success, "Workspace ready", None);

    println!(
        "teams={} projects={} unread={}",
        app.teams().team_count(),
        app.projects().project_count(),
        app.notifications().unread_count()
    );
    serde_json::to_string_pretty(&app.events().events()).map_err(|err| err.to_string())
}

fn main() -> ExitCode {
    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{message}");
            eprintln!("usage: orgdesk_cli [--level <level>] [--log-dir <absolute dir>]");
            return ExitCode::from(2);
        }
    };
    if let Some(log_dir) = args.log_dir.as_deref() {
        if let Err(err) = orgdesk_core::init_logging(&args.level, log_dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    println!("orgdesk_core ping={}", orgdesk_core::ping());
    println!("orgdesk_core version={}", orgdesk_core::core_version());

    match run_demo() {
        Ok(events) => {
            println!("{events}");
            ExitCode::SUCCESS
        }
        Err(message) => {
            eprintln!("demo failed: {message}");
            ExitCode::FAILURE
        }
    }
}
