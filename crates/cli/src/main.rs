use clap::{Parser, Subcommand};
use ward_core::config::{
    backend_from_env_value, credentials_from_env_values, request_timeout_from_env_value,
};
use ward_core::{CoreConfig, Services};
use ward_types::RecordId;
use ward_wire::{Appointment, Bed, MedicalRecord, Patient};

#[derive(Parser)]
#[command(name = "ward")]
#[command(about = "Ward front office CLI")]
struct Cli {
    /// Print records as JSON instead of one line each
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Patient records
    #[command(subcommand)]
    Patients(PatientCommands),
    /// Bed allocation
    #[command(subcommand)]
    Beds(BedCommands),
    /// Appointment book
    #[command(subcommand)]
    Appointments(AppointmentCommands),
    /// Medical records
    #[command(subcommand)]
    Records(RecordCommands),
}

#[derive(Subcommand)]
enum PatientCommands {
    /// List patients by last name
    List {
        /// Show at most this many patients
        #[arg(long)]
        limit: Option<usize>,
        /// Skip this many patients first (with --limit)
        #[arg(long, default_value_t = 0)]
        offset: usize,
    },
    /// Search by name, phone or email
    Search { term: String },
    /// Show one patient
    Show { id: String },
}

#[derive(Subcommand)]
enum BedCommands {
    /// List all beds
    List,
    /// Put a patient in a bed
    Assign { bed_id: String, patient_id: String },
    /// Empty a bed
    Release { bed_id: String },
}

#[derive(Subcommand)]
enum AppointmentCommands {
    /// Appointments on a date (YYYY-MM-DD)
    On { date: String },
    /// Appointments with a doctor
    ForDoctor { doctor_id: RecordId },
}

#[derive(Subcommand)]
enum RecordCommands {
    /// Medical records for a patient, most recent first
    ForPatient { patient_id: RecordId },
}

fn config_from_env() -> Result<CoreConfig, Box<dyn std::error::Error>> {
    let backend = backend_from_env_value(std::env::var("WARD_DATA_BACKEND").ok())?;
    let credentials = credentials_from_env_values(
        std::env::var("WARD_DATA_URL").ok(),
        std::env::var("WARD_PROJECT_ID").ok(),
        std::env::var("WARD_PUBLIC_KEY").ok(),
    )?;
    let timeout =
        request_timeout_from_env_value(std::env::var("WARD_REQUEST_TIMEOUT_SECS").ok())?;
    Ok(CoreConfig::new(backend, credentials, timeout)?)
}

fn patient_line(p: &Patient) -> String {
    format!(
        "ID: {}, Name: {}, Status: {}",
        p.id,
        p.full_name(),
        p.current_status.as_deref().unwrap_or("-")
    )
}

fn bed_line(b: &Bed) -> String {
    let occupant = b
        .patient_id
        .map(|id| id.to_string())
        .unwrap_or_else(|| "-".into());
    let status = b
        .status
        .as_ref()
        .map(|s| s.to_string())
        .unwrap_or_else(|| "-".into());
    format!(
        "ID: {}, Bed: {}, Status: {}, Patient: {}",
        b.id,
        b.number.as_deref().unwrap_or("-"),
        status,
        occupant
    )
}

fn appointment_line(a: &Appointment) -> String {
    format!(
        "ID: {}, {} {}, Patient: {}, Doctor: {}, Status: {}",
        a.id,
        a.date.as_deref().unwrap_or("-"),
        a.time.as_deref().unwrap_or("-"),
        a.patient_id.map(|id| id.to_string()).unwrap_or_default(),
        a.doctor_id.map(|id| id.to_string()).unwrap_or_default(),
        a.status.as_deref().unwrap_or("-")
    )
}

fn record_line(r: &MedicalRecord) -> String {
    format!(
        "ID: {}, Visit: {}, Diagnosis: {}",
        r.id,
        r.visit_date.as_deref().unwrap_or("-"),
        r.diagnosis.as_deref().unwrap_or("-")
    )
}

fn print_all<T: serde::Serialize>(
    json: bool,
    items: &[T],
    empty: &str,
    line: fn(&T) -> String,
) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(items)?);
    } else if items.is_empty() {
        println!("{}", empty);
    } else {
        for item in items {
            println!("{}", line(item));
        }
    }
    Ok(())
}

fn print_one<T: serde::Serialize>(
    json: bool,
    item: Option<&T>,
    line: fn(&T) -> String,
) -> Result<(), Box<dyn std::error::Error>> {
    match item {
        Some(item) if json => println!("{}", serde_json::to_string_pretty(item)?),
        Some(item) => println!("{}", line(item)),
        None => println!("Saved, but the platform returned no record."),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("Use 'ward --help' for commands");
        return Ok(());
    };

    let services = Services::connect(&config_from_env()?)?;
    let json = cli.json;

    match command {
        Commands::Patients(PatientCommands::List { limit, offset }) => {
            let patients = match limit {
                Some(limit) => services.patients.get_page(limit, offset).await,
                None => services.patients.get_all().await,
            };
            print_all(json, &patients, "No patients found.", patient_line)?;
        }
        Commands::Patients(PatientCommands::Search { term }) => {
            let patients = services.patients.search(&term).await;
            print_all(json, &patients, "No matching patients.", patient_line)?;
        }
        Commands::Patients(PatientCommands::Show { id }) => {
            match services.patients.get_by_id(id.as_str()).await {
                Ok(patient) => print_one(json, Some(&patient), patient_line)?,
                Err(e) => eprintln!("Error: {}", e),
            }
        }
        Commands::Beds(BedCommands::List) => {
            let beds = services.beds.get_all().await;
            print_all(json, &beds, "No beds found.", bed_line)?;
        }
        Commands::Beds(BedCommands::Assign { bed_id, patient_id }) => {
            match services
                .beds
                .assign_patient(bed_id.as_str(), patient_id.as_str())
                .await
            {
                Ok(bed) => print_one(json, bed.as_ref(), bed_line)?,
                Err(e) => eprintln!("Error assigning bed {}: {}", bed_id, e),
            }
        }
        Commands::Beds(BedCommands::Release { bed_id }) => {
            match services.beds.release_patient(bed_id.as_str()).await {
                Ok(bed) => print_one(json, bed.as_ref(), bed_line)?,
                Err(e) => eprintln!("Error releasing bed {}: {}", bed_id, e),
            }
        }
        Commands::Appointments(AppointmentCommands::On { date }) => {
            let appointments = services.appointments.get_by_date(&date).await;
            print_all(json, &appointments, "No appointments.", appointment_line)?;
        }
        Commands::Appointments(AppointmentCommands::ForDoctor { doctor_id }) => {
            let appointments = services.appointments.get_by_doctor(doctor_id).await;
            print_all(json, &appointments, "No appointments.", appointment_line)?;
        }
        Commands::Records(RecordCommands::ForPatient { patient_id }) => {
            let records = services.medical_records.get_by_patient_id(patient_id).await;
            print_all(json, &records, "No medical records.", record_line)?;
        }
    }

    Ok(())
}
