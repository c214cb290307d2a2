//! Command line surface of the dashboard.
//!
//! Every page and action is a subcommand. Each invocation is a short-lived
//! process: the session is restored before the command runs and saved after.

use anyhow::Result;
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use pingpong_wire::{Event, Id, SignupRequest, Table};
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tracing::info;

use crate::admin::{AdminConsole, EventForm, Feedback, PlayerForm, SeedForm};
use crate::app::components::{
    event_list, event_players, feedback_banner, import_summary, player_list, table_board,
};
use crate::app::pages::{login, Dashboard};
use crate::app::{QueryState, Route};
use crate::bus::HubEvent;
use crate::cache::Poller;
use crate::error::{HubError, Result as HubResult};
use crate::state::AppState;
use crate::workflow::{AssignmentFlow, Gates, MatchClock};

#[derive(Debug, Parser)]
#[command(author, version, about = "Operator dashboard for table-tennis events")]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    pub fn command(self) -> Command {
        self.command.unwrap_or_default()
    }
}

#[derive(Debug, Default, Subcommand)]
pub enum Command {
    /// Sign in with agent credentials
    Login(LoginArgs),
    /// Create a new agent account
    Signup(SignupArgs),
    /// Sign out and forget the saved session
    Logout,
    /// Render the dashboard once
    #[default]
    Dashboard,
    /// Live dashboard: refreshes players and tables, ticks match clocks
    Watch,
    /// Events: list, activate, create, delete
    #[command(subcommand)]
    Event(EventCommand),
    /// Tables of the active event
    #[command(subcommand)]
    Table(TableCommand),
    /// Global player roster
    #[command(subcommand)]
    Player(PlayerCommand),
    /// Registrations of the active event
    #[command(subcommand)]
    Registration(RegistrationCommand),
}

#[derive(Debug, Args)]
pub struct LoginArgs {
    #[arg(long, env = "PPH_EMAIL")]
    pub email: String,
    #[arg(long, env = "PPH_PASSWORD", hide_env_values = true)]
    pub password: String,
}

#[derive(Debug, Args)]
pub struct SignupArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub password: String,
}

#[derive(Debug, Subcommand)]
pub enum EventCommand {
    List,
    /// Make an event the active one
    Use { id: String },
    Create {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "1")]
        tables: String,
        #[arg(long)]
        location: Option<String>,
        /// RFC 3339 or `YYYY-MM-DD HH:MM`
        #[arg(long)]
        starts_at: Option<String>,
        /// Skip generating tables after creation
        #[arg(long)]
        no_seed: bool,
    },
    /// Delete the active event
    Delete {
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum TableCommand {
    List,
    /// Create a table at a position
    Add { position: String },
    Delete { table_id: String },
    /// Generate tables; without --count the event's table count is used
    Seed {
        #[arg(long)]
        count: Option<String>,
        #[arg(long)]
        start: Option<String>,
        /// Remove existing tables first
        #[arg(long)]
        reset: bool,
    },
    /// Seat two players at a free table
    Assign {
        table_id: String,
        #[arg(long, required = true, num_args = 2, value_names = ["PLAYER1", "PLAYER2"])]
        players: Vec<String>,
        /// Do not notify the players
        #[arg(long)]
        no_notify: bool,
    },
    Free { table_id: String },
    Notify { table_id: String },
    StartTimer { table_id: String },
    /// Move the assignment of one table onto a free table
    Move { from: String, to: String },
    /// Swap the assignments of two occupied tables
    Swap { a: String, b: String },
}

#[derive(Debug, Subcommand)]
pub enum PlayerCommand {
    List,
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        phone: String,
    },
    Delete {
        player_id: String,
        #[arg(long)]
        yes: bool,
    },
    /// Bulk import from a CSV or Excel file
    Import { file: Option<PathBuf> },
}

#[derive(Debug, Subcommand)]
pub enum RegistrationCommand {
    List,
    /// Players not yet registered for the active event
    Available,
    Add { player_id: String },
    /// Register several players, in order
    Bulk {
        #[arg(required = true)]
        player_ids: Vec<String>,
    },
    Remove {
        registration_id: String,
        /// Target event instead of the active one
        #[arg(long)]
        event: Option<String>,
    },
}

async fn find_table(state: &AppState, raw: &str) -> HubResult<Table> {
    let id = Id::new(raw.trim());
    state
        .tables()
        .list()
        .await?
        .into_iter()
        .find(|t| t.id == id)
        .ok_or_else(|| {
            HubError::Validation(format!("Table {} not found for the active event.", raw))
        })
}

/// Check a restored active event against the fetched list before acting on it.
async fn reconcile_active_event(state: &AppState) -> HubResult<Option<Event>> {
    let events = state.events().list().await?;
    Ok(state.active_event.ensure_within(&events).await)
}

/// Inline error banner, or the login page when the failure ended the session.
async fn failure_page(state: &AppState, err: &HubError) -> String {
    match Route::current(&state.auth).await {
        Route::Login => login::render(Some("Session expired. Sign in again.")),
        Route::Dashboard => feedback_banner(&Feedback::from_error(err)),
    }
}

/// Run one command and return what it renders. `watch` draws for itself.
pub async fn run(state: &AppState, command: Command) -> Result<String> {
    if !matches!(command, Command::Login(_) | Command::Signup(_) | Command::Logout)
        && Route::current(&state.auth).await == Route::Login
    {
        return Ok(login::render(None));
    }

    let rendered = match command {
        Command::Login(args) => Ok(match login::login(state, &args.email, &args.password).await {
            Ok(agent) => format!("Signed in as {} <{}>", agent.full_name, agent.email),
            Err(message) => login::render(Some(&message)),
        }),
        Command::Signup(args) => {
            let request = SignupRequest {
                full_name: args.name,
                email: args.email,
                password: args.password,
            };
            Ok(feedback_banner(&login::signup(state, &request).await))
        }
        Command::Logout => {
            state.auth.logout("signed out").await;
            state.cache.clear().await;
            Ok("Signed out.".to_string())
        }
        Command::Dashboard => {
            let dashboard = Dashboard::load(state).await;
            Ok(render_page(state, &dashboard).await)
        }
        Command::Watch => {
            watch(state).await?;
            return Ok(String::new());
        }
        Command::Event(cmd) => run_event(state, cmd).await,
        Command::Table(cmd) => run_table(state, cmd).await,
        Command::Player(cmd) => run_player(state, cmd).await,
        Command::Registration(cmd) => run_registration(state, cmd).await,
    };

    Ok(match rendered {
        Ok(output) => output,
        Err(e) => failure_page(state, &e).await,
    })
}

/// Dashboard, or the login page when a 401 ended the session mid-load.
async fn render_page(state: &AppState, dashboard: &Dashboard) -> String {
    match Route::current(&state.auth).await {
        Route::Dashboard => dashboard.render(Utc::now()),
        Route::Login => login::render(Some("Session expired. Sign in again.")),
    }
}

async fn run_event(state: &AppState, cmd: EventCommand) -> HubResult<String> {
    let admin = AdminConsole::new(state);
    let output = match cmd {
        EventCommand::List => {
            let events = QueryState::from_result(state.events().list().await);
            if let Some(list) = events.ready() {
                state.active_event.ensure_within(list).await;
            }
            let active = state.active_event.id().await;
            event_list(&events, active.as_ref())
        }
        EventCommand::Use { id } => {
            let id = Id::new(id.trim());
            let events = state.events().list().await?;
            match events.into_iter().find(|e| e.id == id) {
                Some(event) => {
                    let line = format!("Active event: {} ({})", event.name, event.summary_line());
                    state.active_event.set_active(Some(event)).await;
                    line
                }
                None => feedback_banner(&Feedback::error(format!("Event {} not found.", id))),
            }
        }
        EventCommand::Create {
            name,
            tables,
            location,
            starts_at,
            no_seed,
        } => {
            let form = EventForm {
                name,
                tables_count: tables,
                location,
                starts_at,
                auto_seed: !no_seed,
            };
            feedback_banner(&admin.create_event(&form).await)
        }
        EventCommand::Delete { yes } => {
            reconcile_active_event(state).await?;
            feedback_banner(&admin.delete_event(yes).await)
        }
    };
    Ok(output)
}

async fn run_table(state: &AppState, cmd: TableCommand) -> HubResult<String> {
    reconcile_active_event(state).await?;
    let admin = AdminConsole::new(state);
    let flow = AssignmentFlow::new(state);
    let output = match cmd {
        TableCommand::List => {
            let has_event = state.active_event.id().await.is_some();
            let selected = state.selection.len().await;
            let board: Vec<(Table, Gates)> = state
                .tables()
                .list()
                .await?
                .into_iter()
                .map(|table| {
                    let gates = Gates::evaluate(&table, selected, has_event);
                    (table, gates)
                })
                .collect();
            table_board(&board, Utc::now())
        }
        TableCommand::Add { position } => feedback_banner(&admin.create_table(&position).await),
        TableCommand::Delete { table_id } => feedback_banner(&admin.delete_table(&table_id).await),
        TableCommand::Seed {
            count,
            start,
            reset,
        } => {
            let form = SeedForm {
                count,
                start_at: start,
                reset,
            };
            feedback_banner(&admin.seed_tables(&form).await)
        }
        TableCommand::Assign {
            table_id,
            players,
            no_notify,
        } => {
            let table = find_table(state, &table_id).await?;
            let roster = state.players().list().await?;
            state.selection.clear().await;
            for raw in &players {
                let id = Id::new(raw.trim());
                let player = roster
                    .iter()
                    .find(|p| p.id == id)
                    .ok_or_else(|| HubError::Validation(format!("Player {} not found.", raw)))?;
                state.selection.toggle(player).await;
            }
            flow.assign(&table, !no_notify).await?;
            feedback_banner(&Feedback::success(format!(
                "Players assigned to {}.",
                table.display_name()
            )))
        }
        TableCommand::Free { table_id } => {
            let table = find_table(state, &table_id).await?;
            flow.free(&table).await?;
            feedback_banner(&Feedback::success(format!("{} is free.", table.display_name())))
        }
        TableCommand::Notify { table_id } => {
            let table = find_table(state, &table_id).await?;
            flow.notify(&table).await?;
            feedback_banner(&Feedback::success("Players notified."))
        }
        TableCommand::StartTimer { table_id } => {
            let table = find_table(state, &table_id).await?;
            flow.start_timer(&table).await?;
            feedback_banner(&Feedback::success("Timer started."))
        }
        TableCommand::Move { from, to } => {
            let from = find_table(state, &from).await?;
            let to = find_table(state, &to).await?;
            flow.move_to(&from, &to).await?;
            feedback_banner(&Feedback::success(format!(
                "Assignment moved to {}.",
                to.display_name()
            )))
        }
        TableCommand::Swap { a, b } => {
            let a = find_table(state, &a).await?;
            let b = find_table(state, &b).await?;
            flow.swap(&a, &b).await?;
            feedback_banner(&Feedback::success("Tables swapped."))
        }
    };
    Ok(output)
}

async fn run_player(state: &AppState, cmd: PlayerCommand) -> HubResult<String> {
    let admin = AdminConsole::new(state);
    let output = match cmd {
        PlayerCommand::List => {
            let players = QueryState::from_result(state.players().list().await);
            let selection = state.selection.snapshot().await;
            player_list(&players, &selection)
        }
        PlayerCommand::Add { name, phone } => {
            let form = PlayerForm {
                full_name: name,
                phone_number: phone,
            };
            feedback_banner(&admin.create_player(&form).await)
        }
        PlayerCommand::Delete { player_id, yes } => {
            feedback_banner(&admin.delete_player(&player_id, yes).await)
        }
        PlayerCommand::Import { file } => {
            let outcome = admin.import_players(file.as_deref()).await;
            let mut lines = vec![feedback_banner(&outcome.feedback)];
            if let Some(result) = outcome.result {
                lines.push(import_summary(&result));
            }
            lines.join("\n")
        }
    };
    Ok(output)
}

async fn run_registration(state: &AppState, cmd: RegistrationCommand) -> HubResult<String> {
    let event = reconcile_active_event(state).await?;
    let admin = AdminConsole::new(state);
    let output = match cmd {
        RegistrationCommand::List => {
            let registrations = QueryState::from_result(state.registrations().list().await);
            event_players(event.as_ref(), &registrations)
        }
        RegistrationCommand::Available => {
            let players = QueryState::from_result(admin.unregistered_players().await);
            player_list(&players, &state.selection.snapshot().await)
        }
        RegistrationCommand::Add { player_id } => {
            feedback_banner(&admin.register_player(&player_id).await)
        }
        RegistrationCommand::Bulk { player_ids } => {
            let ids: Vec<Id> = player_ids.iter().map(|raw| Id::new(raw.trim())).collect();
            feedback_banner(&admin.register_bulk(&ids).await)
        }
        RegistrationCommand::Remove {
            registration_id,
            event,
        } => {
            let event = event.map(|raw| Id::new(raw.trim()));
            feedback_banner(&admin.unregister(&registration_id, event.as_ref()).await)
        }
    };
    Ok(output)
}

fn clear_screen() {
    print!("\x1b[2J\x1b[H");
}

/// Live dashboard until Ctrl-C or until the session ends.
async fn watch(state: &AppState) -> Result<()> {
    let mut events = state.bus.subscribe();
    let initial = Dashboard::load(state).await;
    if Route::current(&state.auth).await == Route::Login {
        println!("{}", render_page(state, &initial).await);
        return Ok(());
    }
    clear_screen();
    println!("{}", initial.render(Utc::now()));

    let poller = Poller::new(state.clone());
    let shutdown = poller.shutdown_token();
    let poll_task = poller.spawn();
    let period = Duration::from_millis(state.config.clock_tick_millis);
    let (mut ticks, clock_task) = MatchClock::new(period).spawn(shutdown.clone());
    info!("watching dashboard");

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("interrupted");
                break;
            }
            changed = ticks.changed() => {
                if changed.is_err() {
                    break;
                }
                let now = *ticks.borrow_and_update();
                let dashboard = Dashboard::from_cache(state).await;
                if dashboard.has_running_clock(now) {
                    clear_screen();
                    println!("{}", dashboard.render(now));
                }
            }
            received = events.recv() => match received {
                Ok(HubEvent::LoggedOut { .. }) => {
                    println!("{}", login::render(Some("Session expired. Sign in again.")));
                    break;
                }
                Ok(event) if event.affects_view() => {
                    clear_screen();
                    println!("{}", Dashboard::from_cache(state).await.render(Utc::now()));
                }
                Ok(_) => {}
                Err(RecvError::Lagged(_)) => {}
                Err(RecvError::Closed) => break,
            }
        }
    }

    state.bus.publish(HubEvent::ShuttingDown);
    shutdown.cancel();
    let _ = tokio::join!(poll_task, clock_task);
    Ok(())
}
