use std::fs::{self, OpenOptions};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tokio::sync::mpsc::UnboundedReceiver;

use uniman::cli::{Cli, Command, EmojiCommand};
use uniman::config::normalize_origin;
use uniman::nav::{BrowserHistory, NavOutcome, SectionSelection};
use uniman::{
    util, AccountService, ApiClient, AuthService, Config, EmojiService, FileSessionStore,
    MemoryHistory, NavigationController, NavigationRequest, Navigator, ReqwestTransport,
    SessionHandle, ToastQueue, UiEvent, UiEventSender, ViewRegistry,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    util::init_data_dir(cli.data_dir.clone());

    // Initialize logging to file (~/.uniman/logs/uniman.log)
    fs::create_dir_all(util::logs_dir())?;

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(util::log_file_path())?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(log_file)
        .with_ansi(false) // Disable ANSI colors in log file
        .init();

    let mut config = Config::load();
    if let Some(origin) = &cli.origin {
        config.origin = normalize_origin(origin)?;
    }

    let store = Arc::new(FileSessionStore::default_location());
    let session = SessionHandle::restore(store).context("failed to read stored session")?;
    let transport = Arc::new(ReqwestTransport::new(config.request_timeout)?);
    let (events, mut rx) = UiEventSender::channel();
    let client = ApiClient::new(&config, transport, session).with_events(events);

    let result = run(cli.command, &config, &client).await;
    report_events(&mut rx, config.toast_capacity);
    result
}

async fn run(command: Command, config: &Config, client: &ApiClient) -> Result<()> {
    match command {
        Command::SignIn { login, password } => {
            let session =
                AuthService::sign_in(client, &config.privileged_role, &login, &password).await?;
            println!("Signed in as {} ({})", session.user_id, session.role);
        }
        Command::SignOut => {
            AuthService::sign_out(client)?;
            println!("Signed out");
        }
        Command::Whoami => {
            let session = require_session(client)?;
            let details = AccountService::short_details(client, &session.user_id).await?;
            println!("{} <{}>", details.full_name, details.role);
            if let Some(username) = &details.username {
                println!("username: {username}");
            }
        }
        Command::Emojis {
            command: EmojiCommand::List,
        } => {
            require_session(client)?;
            let emojis = EmojiService::list(client).await?;
            println!("Available Emojis ({})", emojis.len());
            for emoji in emojis {
                println!("  {}  {}", emoji.uuid, emoji.name);
            }
        }
        Command::Open { url, section, view } => {
            require_session(client)?;
            open_dashboard(config, client, url, section, view).await?;
        }
    }
    Ok(())
}

async fn open_dashboard(
    config: &Config,
    client: &ApiClient,
    url: Option<String>,
    section: Option<String>,
    view: Option<String>,
) -> Result<()> {
    let url = url.map(|u| {
        if u.starts_with('/') {
            u
        } else {
            format!("{}?{}", config.dashboard_path, u.trim_start_matches('?'))
        }
    });
    let history = match &url {
        Some(url) => MemoryHistory::with_url(url.clone()),
        None => MemoryHistory::with_url(config.dashboard_path.clone()),
    };
    let controller = NavigationController::new(
        Arc::new(ViewRegistry::builtin()),
        Box::new(history),
        config.dashboard_path.clone(),
    );
    let navigator = Navigator::new(client.clone(), controller);

    let (user, mut outcome) = navigator.mount(url.as_deref()).await?;
    println!("{} ({})", user.full_name, user.role);

    if section.is_some() || view.is_some() {
        let request = match section.as_deref().map(SectionSelection::parse) {
            Some(SectionSelection::Section(id)) => {
                let request = NavigationRequest::to_section(id);
                match view {
                    Some(view) => request.with_view(view),
                    None => request,
                }
            }
            Some(SectionSelection::Deselected) | None => match view {
                Some(view) => NavigationRequest::deselected(view),
                None => bail!("--h false requires --w"),
            },
        };
        outcome = navigator.navigate(request).await?;
    }

    match outcome {
        NavOutcome::Committed(state) => {
            let section = state
                .selected_section
                .map(|s| s.to_string())
                .unwrap_or_default();
            println!("h={section} w={}", state.active_view.unwrap_or_default());
        }
        NavOutcome::Stale => println!("navigation superseded"),
        NavOutcome::Failed(failure) => bail!(failure),
    }
    navigator.with_controller(|c| {
        if let Some(entry) = c.history().current() {
            println!("url: {}", entry.url);
        }
    });
    Ok(())
}

fn require_session(client: &ApiClient) -> Result<uniman::Session> {
    match client.session().snapshot() {
        Some(session) => Ok(session),
        None => bail!("not signed in; run `uniman-admin sign-in` first"),
    }
}

fn report_events(rx: &mut UnboundedReceiver<UiEvent>, toast_capacity: usize) {
    let mut toasts = ToastQueue::new(toast_capacity);
    while let Ok(event) = rx.try_recv() {
        if toasts.accept(&event) {
            continue;
        }
        match event {
            UiEvent::RenderView { title, .. } => println!("view: {title}"),
            UiEvent::SignOut { .. } => eprintln!("Session expired, please sign in again"),
            _ => {}
        }
    }
    while let Some(toast) = toasts.pop() {
        eprintln!("{}", toast.message);
    }
}
