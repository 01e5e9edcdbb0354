use crate::config::SCAN_STORE_PREFIX;
use crate::scan::ScanRecord;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

fn scan_file(prefix: &Path, scan_id: &str) -> PathBuf {
    prefix.join("scans").join(format!("{scan_id}.bin"))
}

pub fn save_record_at(prefix: &Path, record: &ScanRecord) -> Result<()> {
    let file = scan_file(prefix, &record.id);
    if let Some(parent) = file.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let data = postcard::to_allocvec(record)?;
    std::fs::write(&file, data).with_context(|| format!("writing {}", file.display()))?;
    Ok(())
}

pub fn load_record_at(prefix: &Path, scan_id: &str) -> Result<ScanRecord> {
    let file = scan_file(prefix, scan_id);
    let data =
        std::fs::read(&file).with_context(|| format!("no scan record at {}", file.display()))?;
    Ok(postcard::from_bytes(&data)?)
}

pub fn list_records_at(prefix: &Path) -> Result<Vec<ScanRecord>> {
    let dir = prefix.join("scans");
    if !dir.exists() {
        return Ok(vec![]);
    }
    let mut records = Vec::new();
    for entry in std::fs::read_dir(&dir)? {
        let path = entry?.path();
        if path.extension().is_some_and(|e| e == "bin") {
            let data = std::fs::read(&path)?;
            records.push(postcard::from_bytes(&data)?);
        }
    }
    records.sort_by(|a: &ScanRecord, b: &ScanRecord| b.created_at.cmp(&a.created_at));
    Ok(records)
}

pub fn purge_record_at(prefix: &Path, scan_id: &str) -> Result<()> {
    let file = scan_file(prefix, scan_id);
    if file.exists() {
        std::fs::remove_file(&file).with_context(|| format!("removing {}", file.display()))?;
    }
    Ok(())
}

pub fn save_record(record: &ScanRecord) -> Result<()> {
    save_record_at(&SCAN_STORE_PREFIX, record)
}

pub fn load_record(scan_id: &str) -> Result<ScanRecord> {
    load_record_at(&SCAN_STORE_PREFIX, scan_id)
}

pub fn list_records() -> Result<Vec<ScanRecord>> {
    list_records_at(&SCAN_STORE_PREFIX)
}

pub fn purge_record(scan_id: &str) -> Result<()> {
    purge_record_at(&SCAN_STORE_PREFIX, scan_id)
}
