use crate::{
    error::{CheckError, Result},
    export::record::ExportRecord,
};

/// Serialize one record as CSV: header row plus a single data row
pub fn to_csv_bytes(record: &ExportRecord) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.serialize(record)?;
    writer
        .into_inner()
        .map_err(|e| CheckError::Io(e.into_error()))
}
