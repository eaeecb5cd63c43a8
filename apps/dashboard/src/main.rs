use std::{
    env,
    io::{self, BufRead, Write},
    path::PathBuf,
    sync::Arc,
};

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use client_core::{FileSessionStore, HttpClinicClient, SessionContext};
use crossbeam_channel::Receiver;
use dashboard::{
    config::{load_settings, load_settings_from, Settings},
    controller::{
        form::{AvailabilitySlot, DoctorForm},
        CommandReport, Dashboard, DashboardCommand, DashboardOptions, FixedAnswer, Prompt,
        UiEvent, UiSink,
    },
    ui::{CardAction, Mounted},
};
use shared::domain::{DoctorId, FilterCriteria, ViewerRole};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "clinic-dashboard", about = "Terminal host for the clinic dashboard")]
struct Args {
    /// Config file; defaults to ./dashboard.toml.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    server_url: Option<String>,
    #[arg(long)]
    session_file: Option<PathBuf>,
    /// Alert when the initial doctor load fails.
    #[arg(long)]
    alert_on_load_failure: bool,
    /// Answer yes to every confirmation.
    #[arg(long)]
    yes: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Inspect or change the stored session.
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },
    /// List doctors, optionally filtered.
    Doctors {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        time: Option<String>,
        #[arg(long)]
        specialty: Option<String>,
    },
    Delete {
        #[arg(long)]
        id: i64,
    },
    Book {
        #[arg(long)]
        id: i64,
    },
    AddDoctor {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        specialty: String,
        /// Slot offered on the form; repeatable.
        #[arg(long = "slot")]
        slots: Vec<String>,
        /// Slot to tick; repeatable.
        #[arg(long = "available")]
        available: Vec<String>,
    },
    /// The signed-in doctor's appointments for a day.
    Appointments {
        /// YYYY-MM-DD; defaults to today.
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        patient: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum SessionAction {
    Show,
    Set {
        #[arg(long)]
        token: String,
        /// admin, patient, loggedPatient or doctor.
        #[arg(long)]
        role: String,
    },
    Clear,
}

/// Reads y/n answers from stdin.
struct StdinPrompt;

impl Prompt for StdinPrompt {
    fn confirm(&self, message: &str) -> bool {
        print!("{message} [y/N] ");
        if io::stdout().flush().is_err() {
            return false;
        }
        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(_) => matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
            Err(_) => false,
        }
    }
}

fn resolve_settings(args: &Args) -> Settings {
    let mut settings = match &args.config {
        Some(path) => load_settings_from(path, |key| env::var(key).ok()),
        None => load_settings(),
    };
    if let Some(url) = &args.server_url {
        settings.api_base_url = url.clone();
    }
    if let Some(path) = &args.session_file {
        settings.session_file = Some(path.clone());
    }
    if args.alert_on_load_failure {
        settings.alert_on_load_failure = true;
    }
    settings
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();
    let args = Args::parse();
    let settings = resolve_settings(&args);

    let store = FileSessionStore::new(settings.session_path()?);
    info!(path = %store.path().display(), server = %settings.api_base_url, "starting dashboard");

    if let Command::Session { action } = &args.command {
        return run_session(action, &store);
    }

    let session = SessionContext::load(&store)?;
    let client = HttpClinicClient::with_timeout(&settings.api_base_url, settings.request_timeout())
        .with_context(|| format!("invalid server url '{}'", settings.api_base_url))?;

    let prompt: Arc<dyn Prompt> = if args.yes {
        Arc::new(FixedAnswer(true))
    } else {
        Arc::new(StdinPrompt)
    };
    let (tx, rx) = crossbeam_channel::unbounded();
    let dashboard = Dashboard::new(
        Arc::new(client),
        session,
        UiSink::new(tx, prompt),
        DashboardOptions {
            alert_on_load_failure: settings.alert_on_load_failure,
            appointments_date: Local::now().date_naive(),
        },
    );

    match args.command {
        Command::Session { .. } => {}
        Command::Doctors {
            name,
            time,
            specialty,
        } => {
            let unconstrained =
                FilterCriteria::from_inputs(name.as_deref(), time.as_deref(), specialty.as_deref())
                    .is_unconstrained();
            let cmd = if unconstrained {
                DashboardCommand::LoadDoctors
            } else {
                DashboardCommand::FilterDoctors {
                    name,
                    time,
                    specialty,
                }
            };
            run(&dashboard, cmd, &rx).await;
            print_cards(&dashboard);
        }
        Command::Delete { id } => {
            run(&dashboard, DashboardCommand::LoadDoctors, &rx).await;
            let cmd = DashboardCommand::ActivateCard {
                doctor_id: DoctorId(id),
                action: CardAction::Delete,
            };
            run(&dashboard, cmd, &rx).await;
            print_cards(&dashboard);
        }
        Command::Book { id } => {
            run(&dashboard, DashboardCommand::LoadDoctors, &rx).await;
            let action = booking_action(&dashboard, DoctorId(id));
            let cmd = DashboardCommand::ActivateCard {
                doctor_id: DoctorId(id),
                action,
            };
            run(&dashboard, cmd, &rx).await;
        }
        Command::AddDoctor {
            name,
            email,
            phone,
            password,
            specialty,
            slots,
            available,
        } => {
            let form = DoctorForm {
                name,
                email,
                phone,
                password,
                specialty,
                availability: availability_slots(slots, &available),
            };
            run(&dashboard, DashboardCommand::LoadDoctors, &rx).await;
            run(&dashboard, DashboardCommand::SubmitDoctor(form), &rx).await;
            print_cards(&dashboard);
        }
        Command::Appointments { date, patient } => {
            let cmd = match (date, patient) {
                (None, None) => DashboardCommand::TodayAppointments,
                (date, patient_name) => DashboardCommand::LoadAppointments { date, patient_name },
            };
            run(&dashboard, cmd, &rx).await;
            print_rows(&dashboard);
        }
    }

    Ok(())
}

fn run_session(action: &SessionAction, store: &FileSessionStore) -> Result<()> {
    match action {
        SessionAction::Show => {
            let session = SessionContext::load(store)?;
            let role = session
                .role()
                .map(ViewerRole::to_string)
                .unwrap_or_else(|| "none".to_string());
            let token = if session.token().is_some() { "set" } else { "missing" };
            println!("role: {role}, token: {token}");
        }
        SessionAction::Set { token, role } => {
            SessionContext::new(Some(token.clone()), Some(ViewerRole::from_tag(role)))
                .save(store)?;
            println!("session saved to {}", store.path().display());
        }
        SessionAction::Clear => {
            SessionContext::anonymous().save(store)?;
            println!("session cleared");
        }
    }
    Ok(())
}

/// Patients book through whichever booking action their card offers.
fn booking_action(dashboard: &Dashboard, id: DoctorId) -> CardAction {
    dashboard
        .list()
        .cards()
        .items()
        .into_iter()
        .find(|card| card.doctor_id() == id)
        .and_then(|card| {
            [CardAction::Book, CardAction::LoginRequired]
                .into_iter()
                .find(|action| card.offers(*action))
        })
        .unwrap_or(CardAction::Book)
}

fn availability_slots(offered: Vec<String>, checked: &[String]) -> Vec<AvailabilitySlot> {
    let mut slots: Vec<AvailabilitySlot> = offered
        .into_iter()
        .map(|label| {
            let ticked = checked.contains(&label);
            AvailabilitySlot::new(label, ticked)
        })
        .collect();
    for label in checked {
        if !slots.iter().any(|slot| &slot.label == label) {
            slots.push(AvailabilitySlot::new(label.clone(), true));
        }
    }
    slots
}

async fn run(dashboard: &Dashboard, cmd: DashboardCommand, rx: &Receiver<UiEvent>) {
    let name = cmd.name();
    let report = dashboard.dispatch(cmd).await;
    for event in rx.try_iter() {
        print_event(&event);
    }
    if report.error().is_some_and(|err| err.requires_reauth()) {
        println!("session rejected; sign in again with `clinic-dashboard session set`");
    }
    match report {
        CommandReport::CardNotMounted(id) => println!("doctor {id} is not in the current list"),
        other => info!(command = name, report = ?other, "command finished"),
    }
}

fn print_event(event: &UiEvent) {
    match event {
        UiEvent::Alert(message) => println!("! {message}"),
        UiEvent::CloseModal => println!("(form closed)"),
        UiEvent::Reload => println!("(reload requested)"),
        UiEvent::Navigate(target) => println!("-> {target}"),
        UiEvent::BookingOverlay(request) => println!(
            "booking Dr. {} for {} <{}>",
            request.doctor.name, request.patient.name, request.patient.email
        ),
    }
}

fn print_cards(dashboard: &Dashboard) {
    for mounted in dashboard.list().cards().snapshot() {
        match mounted {
            Mounted::Item(card) => {
                let [name, specialty, email, times] = card.info_lines();
                let actions: Vec<&str> = card.actions().iter().map(|a| a.label()).collect();
                println!("#{} {name}", card.doctor_id());
                println!("    {specialty}");
                println!("    {email}");
                println!("    {times}");
                if !actions.is_empty() {
                    println!("    [{}]", actions.join("] ["));
                }
            }
            Mounted::Placeholder(text) => println!("{text}"),
        }
    }
}

fn print_rows(dashboard: &Dashboard) {
    let appointments = dashboard.appointments();
    println!("appointments for {}", appointments.selected_date());
    for mounted in appointments.rows().snapshot() {
        match mounted {
            Mounted::Item(row) => println!(
                "{}\t{}\t{}\t{}\t{}",
                row.patient_id,
                row.name,
                row.phone,
                row.email,
                row.prescription_link()
            ),
            Mounted::Placeholder(text) => println!("{text}"),
        }
    }
}
