use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use dental_api::{
    config::{config_from_env_value, timeout_from_env_value},
    handle_api_error, ApiClient, ClientResult, FileCredentialStore, Session,
};
use dental_types::{AppointmentStatus, Credentials, NonEmptyText, PasswordChange, RecordId};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod intake;

/// File the session token is kept in when `DENTAL_TOKEN_FILE` is not set.
const DEFAULT_TOKEN_FILE: &str = ".dental/credentials.json";

#[derive(Parser)]
#[command(name = "dental")]
#[command(about = "Dental clinic management client")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and store the session token
    Login {
        /// Account name
        username: String,
        /// Password
        #[arg(long, env = "DENTAL_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the stored session token
    Logout,
    /// Show the user the stored token belongs to
    Whoami,
    /// Change the signed-in user's password
    Password {
        #[arg(long)]
        current: String,
        #[arg(long)]
        new: String,
    },
    /// Staff accounts
    Users {
        #[command(subcommand)]
        command: UserCommands,
    },
    /// Patient records
    Patients {
        #[command(subcommand)]
        command: PatientCommands,
    },
    /// Appointment book
    Appointments {
        #[command(subcommand)]
        command: AppointmentCommands,
    },
    /// Clinical history notes
    History {
        #[command(subcommand)]
        command: HistoryCommands,
    },
    /// Fill in patient identification data and optionally submit it
    Intake(intake::IntakeArgs),
}

#[derive(Subcommand)]
enum UserCommands {
    /// List all accounts
    List,
    /// List doctors
    Doctors,
    /// Reset an account's password
    ResetPassword { id: RecordId, password: String },
    /// Delete an account
    Delete { id: RecordId },
}

#[derive(Subcommand)]
enum PatientCommands {
    /// List all patients
    List,
    /// Show one patient
    Get { id: RecordId },
    /// Free-text search
    Search { query: String },
    /// Delete a patient
    Delete { id: RecordId },
}

#[derive(Subcommand)]
enum AppointmentCommands {
    /// Today's appointments
    Today,
    /// Appointments on a date (YYYY-MM-DD)
    On { date: NaiveDate },
    /// Free hours for a doctor on a date (YYYY-MM-DD)
    Available { doctor_id: RecordId, date: NaiveDate },
    /// Change an appointment's status
    Status {
        id: RecordId,
        /// programada, confirmada, en_curso, completada, cancelada or no_asistio
        status: AppointmentStatus,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Delete an appointment
    Delete { id: RecordId },
}

#[derive(Subcommand)]
enum HistoryCommands {
    /// Notes for one patient
    Patient { patient_id: RecordId },
    /// Show one note
    Get { id: RecordId },
    /// Free-text search
    Search { term: String },
    /// Delete a note
    Delete { id: RecordId },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("dental_api=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("Use 'dental --help' for commands");
        return Ok(());
    };

    let client = build_client()?;

    match command {
        Commands::Login { username, password } => {
            let username = NonEmptyText::new(&username).context("username cannot be empty")?;
            let response = api(client.auth().login(&Credentials::new(username, password)).await)?;
            match response.user {
                Some(user) => println!("Signed in as {} ({})", user.name, user.username),
                None => println!("Signed in"),
            }
        }
        Commands::Logout => {
            api(client.auth().logout())?;
            println!("Signed out");
        }
        Commands::Whoami => print_json(&api(client.auth().verify().await)?)?,
        Commands::Password { current, new } => {
            let change = PasswordChange {
                current_password: current,
                new_password: new,
            };
            print_json(&api(client.auth().change_password(&change).await)?)?;
        }
        Commands::Users { command } => {
            let users = client.users();
            match command {
                UserCommands::List => print_json(&api(users.list().await)?)?,
                UserCommands::Doctors => print_json(&api(users.doctors().await)?)?,
                UserCommands::ResetPassword { id, password } => {
                    print_json(&api(users.reset_password(id, &password).await)?)?
                }
                UserCommands::Delete { id } => print_json(&api(users.delete(id).await)?)?,
            }
        }
        Commands::Patients { command } => {
            let patients = client.patients();
            match command {
                PatientCommands::List => print_json(&api(patients.list().await)?)?,
                PatientCommands::Get { id } => print_json(&api(patients.get(id).await)?)?,
                PatientCommands::Search { query } => {
                    print_json(&api(patients.search(&query).await)?)?
                }
                PatientCommands::Delete { id } => print_json(&api(patients.delete(id).await)?)?,
            }
        }
        Commands::Appointments { command } => {
            let appointments = client.appointments();
            match command {
                AppointmentCommands::Today => print_json(&api(appointments.today().await)?)?,
                AppointmentCommands::On { date } => {
                    print_json(&api(appointments.by_date(date).await)?)?
                }
                AppointmentCommands::Available { doctor_id, date } => {
                    let hours = api(appointments.available(doctor_id, date).await)?;
                    if hours.is_empty() {
                        println!("No free hours.");
                    }
                    for hour in hours.iter() {
                        println!("{hour}");
                    }
                }
                AppointmentCommands::Status { id, status, notes } => print_json(&api(
                    appointments
                        .update_status(id, status, notes.as_deref())
                        .await,
                )?)?,
                AppointmentCommands::Delete { id } => {
                    print_json(&api(appointments.delete(id).await)?)?
                }
            }
        }
        Commands::History { command } => {
            let history = client.history();
            match command {
                HistoryCommands::Patient { patient_id } => {
                    print_json(&api(history.by_patient(patient_id).await)?)?
                }
                HistoryCommands::Get { id } => print_json(&api(history.get(id).await)?)?,
                HistoryCommands::Search { term } => {
                    print_json(&api(history.search(&term).await)?)?
                }
                HistoryCommands::Delete { id } => print_json(&api(history.delete(id).await)?)?,
            }
        }
        Commands::Intake(args) => intake::run(&client, args).await?,
    }

    Ok(())
}

/// Resolve configuration from the environment once and build the client.
fn build_client() -> anyhow::Result<ApiClient> {
    let timeout = timeout_from_env_value(std::env::var("DENTAL_API_TIMEOUT_SECS").ok())?;
    let config = config_from_env_value(std::env::var("DENTAL_API_URL").ok())?.with_timeout(timeout);

    let token_file = std::env::var("DENTAL_TOKEN_FILE")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(default_token_file);
    tracing::debug!("using credential file {}", token_file.display());

    let session = Arc::new(Session::new(FileCredentialStore::new(token_file)));
    let client = ApiClient::new(config, session)?.with_unauthorized_handler(|login_path: &str| {
        eprintln!("Session expired or invalid ({login_path}). Run `dental login` to sign in.");
    });
    Ok(client)
}

fn default_token_file() -> PathBuf {
    match std::env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(DEFAULT_TOKEN_FILE),
        None => PathBuf::from(DEFAULT_TOKEN_FILE),
    }
}

/// Convert a client failure into its normalised message for display.
fn api<T>(result: ClientResult<T>) -> anyhow::Result<T> {
    result.map_err(|err| {
        tracing::debug!("request failed: {err:?}");
        let normalised = handle_api_error(&err);
        tracing::error!("{normalised}");
        anyhow::Error::new(normalised)
    })
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
