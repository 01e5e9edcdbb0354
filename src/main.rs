use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use headscan::{config, scan::ScanRecord, store, worker};
use log::info;

#[derive(Parser)]
#[command(name = "headscan")]
#[command(
    version,
    about = "Head-scan measurement pipeline - photos in, head measurements and a 3D model out"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a scan from four photos and run the pipeline for it
    Submit {
        /// Front-facing photo (the one the pipeline measures)
        #[arg(long)]
        front: PathBuf,
        #[arg(long)]
        back: PathBuf,
        #[arg(long)]
        left: PathBuf,
        #[arg(long)]
        right: PathBuf,
        /// Display name for the scan
        #[arg(short, long)]
        name: String,
        /// Free-text notes
        #[arg(long)]
        notes: Option<String>,
        /// Owning user (defaults to $USER)
        #[arg(short, long)]
        user: Option<String>,
    },
    /// Run (or re-attempt) the pipeline for an existing scan
    Process {
        /// Scan ID to process
        id: String,
    },
    /// Print one scan record
    Show {
        /// Scan ID to show
        id: String,
        /// Emit the record as JSON
        #[arg(long)]
        json: bool,
    },
    /// List all scan records
    List,
    /// Remove a scan record
    Purge {
        /// Scan ID to remove
        id: String,
    },
    /// Open config file in editor
    Config,
}

fn main() -> Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .format_target(false)
        .format_timestamp(None)
        .init();

    let cli = Cli::parse();
    let cfg = config::load_config(None)?;

    match cli.command {
        Commands::Submit {
            front,
            back,
            left,
            right,
            name,
            notes,
            user,
        } => {
            let user = user
                .or_else(|| env::var("USER").ok())
                .unwrap_or_else(|| "local".to_string());
            submit(&cfg, user, name, notes, front, back, left, right)
        }
        Commands::Process { id } => {
            worker::process_scan(&cfg, &id)?;
            show(&id, false)
        }
        Commands::Show { id, json } => show(&id, json),
        Commands::List => list(),
        Commands::Purge { id } => purge(&id),
        Commands::Config => open_config(),
    }
}

#[allow(clippy::too_many_arguments)]
fn submit(
    cfg: &config::Config,
    user: String,
    name: String,
    notes: Option<String>,
    front: PathBuf,
    back: PathBuf,
    left: PathBuf,
    right: PathBuf,
) -> Result<()> {
    let record = ScanRecord::new(user, name, notes, None, front, back, left, right);
    let id = record.id.clone();
    store::save_record(&record).context("Failed to save scan record")?;
    info!("Scan registered: {id}");

    // The CLI stands in for the async task dispatcher: one run per scan
    worker::process_scan(cfg, &id)?;
    show(&id, false)
}

fn show(id: &str, json: bool) -> Result<()> {
    let record = store::load_record(id)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&record)?);
        return Ok(());
    }

    println!("Scan '{}' ({}) for {}", record.name, record.id, record.user);
    println!("  status: {}", record.status.as_str());
    if let Some(reason) = &record.failure_reason {
        println!("  failure reason: {reason}");
    }
    if let Some(path) = &record.processed_model_path {
        println!("  3D model: {path}");
    }
    for (label, value) in [
        ("eye_to_eye", record.eye_to_eye),
        ("ear_to_ear", record.ear_to_ear),
        ("head_width", record.head_width),
        ("head_height", record.head_height),
        ("head_length", record.head_length),
        ("head_circumference_A", record.head_circumference_a),
        ("forehead_to_back_B", record.forehead_to_back_b),
        ("cross_measurement_C", record.cross_measurement_c),
        ("under_chin_D", record.under_chin_d),
        ("eyebrow_to_earlobe_E", record.eyebrow_to_earlobe_e),
        ("eye_corner_to_ear_F", record.eye_corner_to_ear_f),
        ("ear_height_G", record.ear_height_g),
        ("ear_width_H", record.ear_width_h),
        ("cheek_guard_clearance_L", record.cheek_guard_clearance_l),
        ("cheek_guard_height_M", record.cheek_guard_height_m),
        ("cheek_guard_width_N", record.cheek_guard_width_n),
    ] {
        if let Some(cm) = value {
            println!("  {label}: {cm:.2} cm");
        }
    }
    Ok(())
}

fn list() -> Result<()> {
    let records = store::list_records()?;
    if records.is_empty() {
        info!("No scans recorded");
        return Ok(());
    }
    for record in records {
        println!(
            "{}  {}  {}  {}",
            record.id,
            record.status.as_str(),
            record.user,
            record.name
        );
    }
    Ok(())
}

fn purge(id: &str) -> Result<()> {
    store::purge_record(id).context("Failed to purge scan record")?;
    info!("Scan {id} removed");
    Ok(())
}

fn open_config() -> Result<()> {
    let config_path = config::CONFIG_PATH.as_os_str();
    let editor = env::var("EDITOR").unwrap_or_else(|_| "vi".to_string());

    info!("Opening config file: {config_path:?}");

    let status = std::process::Command::new(editor)
        .arg(config_path)
        .status()
        .context("Failed to open editor")?;

    if !status.success() {
        anyhow::bail!("Editor exited with non-zero status");
    }

    Ok(())
}
