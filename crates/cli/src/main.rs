use anyhow::Context;
use clap::{Parser, Subcommand};
use emis_core::{
    resolve_config, MirrorStatus, MirroredTable, Patient, PatientService, PatientSubmission,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "emis")]
#[command(about = "EMIS patient registration and emergency lookup CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the database tables if they do not exist
    InitDb,
    /// Register a patient, or update the patient with the same NIN or phone
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        age: String,
        /// 11-digit national identification number
        #[arg(long)]
        nin: String,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        emergency_contact: String,
        /// One of AA, AC, AS, CC, SS, SC
        #[arg(long)]
        genotype: String,
        /// One of A+, A-, B+, B-, AB+, AB-, O+, O-
        #[arg(long)]
        blood_type: String,
        /// Comma-separated
        #[arg(long, default_value = "")]
        allergies: String,
        /// Comma-separated
        #[arg(long, default_value = "")]
        medical_history: String,
        /// The patient consents to the record being stored and shown on scan
        #[arg(long)]
        consent: bool,
    },
    /// Look a patient up by public identifier (records a scan)
    Lookup {
        /// Public identifier, e.g. PAT8901295678
        public_id: String,
    },
    /// List all patients
    List {
        /// Print JSON instead of one line per patient
        #[arg(long)]
        json: bool,
    },
    /// Overwrite a sheet of the spreadsheet mirror with the local table
    Resync {
        /// patients, scan_activities (or scans) or logs
        table: MirroredTable,
    },
    /// Write the scannable code for a patient to the QR directory
    Qr {
        /// Public identifier
        public_id: String,
    },
    /// Show the application event log
    Logs,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("emis_core=warn".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("No command given. Run with --help for usage.");
        return Ok(());
    };

    let cfg = Arc::new(
        resolve_config(|key| std::env::var(key).ok()).context("invalid configuration")?,
    );
    let service = PatientService::from_config(cfg).context("failed to set up services")?;
    service.initialise().context("failed to prepare the database")?;

    run(&service, command)
}

fn run(service: &PatientService, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::InitDb => {
            println!(
                "Database ready at {}",
                service.config().database_path().display()
            );
        }
        Commands::Register {
            name,
            age,
            nin,
            phone,
            emergency_contact,
            genotype,
            blood_type,
            allergies,
            medical_history,
            consent,
        } => {
            let submission = PatientSubmission {
                name,
                age,
                nin,
                phone,
                emergency_contact,
                genotype,
                blood_type,
                allergies,
                medical_history,
                consent,
            };
            let valid = submission
                .validate()
                .map_err(|e| anyhow::anyhow!("{}: {}", e.field(), e))?;
            let outcome = service.upsert(&valid)?;
            let code = service.issue_code(&outcome.patient)?;

            println!(
                "{} patient {}",
                if outcome.created { "Registered" } else { "Updated" },
                outcome.patient.public_id
            );
            println!("Link: {}", outcome.link);
            println!("QR code: {}", code.path.display());
            if let Some(warning) = outcome.mirror_warning {
                eprintln!("Warning: {}", warning);
            }
        }
        Commands::Lookup { public_id } => match service.resolve(&public_id)? {
            Some(resolved) => {
                print!("{}", render_summary(&resolved.patient));
                println!("Scan recorded at {}", resolved.scan.timestamp);
                if let Some(warning) = resolved.mirror_warning {
                    eprintln!("Warning: {}", warning);
                }
            }
            None => {
                anyhow::bail!("No patient record found for {}", public_id.trim());
            }
        },
        Commands::List { json } => {
            let patients = service.list_patients()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&patients)?);
            } else if patients.is_empty() {
                println!("No patients found.");
            } else {
                for patient in patients {
                    println!(
                        "ID: {}, Public ID: {}, Name: {}, Age: {}, Phone: {}",
                        patient.id, patient.public_id, patient.name, patient.age, patient.phone
                    );
                }
            }
        }
        Commands::Resync { table } => match service.resync(table)? {
            MirrorStatus::Synced { rows } => {
                println!("Resynced {} ({} rows)", table, rows);
            }
            MirrorStatus::Disabled => {
                println!("Spreadsheet mirror is not configured; nothing to do.");
            }
        },
        Commands::Qr { public_id } => match service.code_for(&public_id)? {
            Some(code) => println!("Wrote {}", code.path.display()),
            None => anyhow::bail!("No patient record found for {}", public_id.trim()),
        },
        Commands::Logs => {
            let events = service.list_events()?;
            if events.is_empty() {
                println!("No events recorded.");
            }
            for event in events {
                println!("{} [{}] {}", event.timestamp, event.level, event.message);
            }
        }
    }
    Ok(())
}

fn render_summary(patient: &Patient) -> String {
    let list = |entries: Vec<&str>| {
        if entries.is_empty() {
            "  - none recorded\n".to_string()
        } else {
            entries.iter().map(|e| format!("  - {}\n", e)).collect()
        }
    };

    format!(
        "Name: {}\nAge: {}\nPhone: {}\nEmergency contact: {}\nGenotype: {}\nBlood type: {}\n\
         Allergies:\n{}Medical history:\n{}",
        patient.name,
        patient.age,
        patient.phone,
        patient.emergency_contact,
        patient.genotype,
        patient.blood_type,
        list(patient.allergies.entries().collect()),
        list(patient.medical_history.entries().collect()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use emis_core::CoreConfig;
    use tempfile::TempDir;

    fn service() -> (TempDir, PatientService) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let cfg = CoreConfig::new(
            temp_dir.path().join("patients.db"),
            "http://localhost:3000".into(),
            temp_dir.path().join("qr_codes"),
        )
        .unwrap();
        let service = PatientService::new(Arc::new(cfg), None);
        service.initialise().unwrap();
        (temp_dir, service)
    }

    fn register_args() -> Vec<&'static str> {
        vec![
            "emis",
            "register",
            "--name",
            "Ada Obi",
            "--age",
            "29",
            "--nin",
            "12345678901",
            "--phone",
            "08012345678",
            "--emergency-contact",
            "08098765432",
            "--genotype",
            "AA",
            "--blood-type",
            "O+",
            "--allergies",
            "Penicillin, penicillin",
            "--consent",
        ]
    }

    #[test]
    fn test_parse_resync_table() {
        let cli = Cli::try_parse_from(["emis", "resync", "scans"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Resync {
                table: MirroredTable::ScanActivities
            })
        ));
        assert!(Cli::try_parse_from(["emis", "resync", "visits"]).is_err());
    }

    #[test]
    fn test_register_lookup_and_qr() {
        let (temp_dir, service) = service();

        let cli = Cli::try_parse_from(register_args()).unwrap();
        run(&service, cli.command.unwrap()).expect("register should succeed");

        let patients = service.list_patients().unwrap();
        assert_eq!(patients.len(), 1);
        assert_eq!(patients[0].public_id.as_str(), "PAT8901295678");
        assert!(temp_dir
            .path()
            .join("qr_codes/Ada_Obi_PAT8901295678.png")
            .exists());

        run(
            &service,
            Commands::Lookup {
                public_id: "PAT8901295678".into(),
            },
        )
        .expect("lookup should succeed");
        assert_eq!(service.list_scans().unwrap().len(), 1);

        let missing = run(
            &service,
            Commands::Qr {
                public_id: "PAT0000000000".into(),
            },
        );
        assert!(missing.is_err());
    }

    #[test]
    fn test_register_without_consent_is_rejected() {
        let (_temp_dir, service) = service();
        let args: Vec<_> = register_args()
            .into_iter()
            .filter(|a| *a != "--consent")
            .collect();
        let cli = Cli::try_parse_from(args).unwrap();

        let err = run(&service, cli.command.unwrap()).unwrap_err();
        assert!(err.to_string().starts_with("consent"));
        assert!(service.list_patients().unwrap().is_empty());
    }

    #[test]
    fn test_render_summary_lists_entries() {
        let (_temp_dir, service) = service();
        let cli = Cli::try_parse_from(register_args()).unwrap();
        run(&service, cli.command.unwrap()).unwrap();

        let patient = &service.list_patients().unwrap()[0];
        let text = render_summary(patient);
        assert!(text.contains("Phone: +2348012345678"));
        assert!(text.contains("Allergies:\n  - Penicillin\n"));
        assert!(text.contains("Medical history:\n  - none recorded\n"));
    }
}
