// src/services/export.rs
// DOCUMENTATION: Flat-file export of ingested records
// PURPOSE: Write one CSV row per transformed record after an ingestion run

use crate::errors::MosqueError;
use crate::models::IngestedMosque;
use std::io::Write;
use std::path::Path;

/// Fixed column order of the export
pub const EXPORT_HEADER: [&str; 6] = ["name", "address", "place_id", "lat", "lng", "reviews"];

/// Write the export to `path`, replacing any existing file
pub fn write_csv(path: impl AsRef<Path>, mosques: &[IngestedMosque]) -> Result<(), MosqueError> {
    let path = path.as_ref();
    let writer = csv::Writer::from_path(path).map_err(|e| {
        log::error!("Cannot open export file {}: {}", path.display(), e);
        MosqueError::ExportError(e.to_string())
    })?;

    write_records(writer, mosques)?;
    log::info!("Exported {} mosques to {}", mosques.len(), path.display());
    Ok(())
}

/// Write the export to any writer
/// DOCUMENTATION: Missing values are empty cells; the reviews column
/// holds the JSON encoding of the review list
pub fn write_csv_to<W: Write>(out: W, mosques: &[IngestedMosque]) -> Result<(), MosqueError> {
    write_records(csv::Writer::from_writer(out), mosques)
}

fn write_records<W: Write>(
    mut writer: csv::Writer<W>,
    mosques: &[IngestedMosque],
) -> Result<(), MosqueError> {
    let export_err = |e: csv::Error| MosqueError::ExportError(e.to_string());

    writer.write_record(EXPORT_HEADER).map_err(export_err)?;

    for mosque in mosques {
        let reviews = serde_json::to_string(&mosque.reviews)
            .map_err(|e| MosqueError::ExportError(e.to_string()))?;

        writer
            .write_record([
                mosque.name.clone().unwrap_or_default(),
                mosque.address.clone().unwrap_or_default(),
                mosque.place_id.clone(),
                mosque.lat.map(|v| v.to_string()).unwrap_or_default(),
                mosque.lng.map(|v| v.to_string()).unwrap_or_default(),
                reviews,
            ])
            .map_err(export_err)?;
    }

    writer
        .flush()
        .map_err(|e| MosqueError::ExportError(e.to_string()))?;
    Ok(())
}
