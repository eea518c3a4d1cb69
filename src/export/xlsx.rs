use rust_xlsxwriter::{Format, Workbook};

use crate::{
    error::Result,
    export::record::{ExportRecord, HEADERS},
};

/// Serialize one record into an in-memory `.xlsx` workbook with a single sheet
pub fn to_xlsx_bytes(record: &ExportRecord, sheet_name: &str) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name)?;

    for (col, header) in HEADERS.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *header, &header_format)?;
    }
    for (col, value) in record.values().iter().enumerate() {
        worksheet.write_string(1, col as u16, *value)?;
    }
    worksheet.autofit();

    Ok(workbook.save_to_buffer()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{assessment::Verdict, case::CustomerCase};
    use calamine::{Reader, Xlsx};
    use std::io::Cursor;

    fn read_back(bytes: Vec<u8>, sheet: &str) -> Vec<Vec<String>> {
        let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes)).unwrap();
        assert_eq!(workbook.sheet_names(), vec![sheet.to_string()]);

        let range = workbook.worksheet_range(sheet).unwrap();
        range
            .rows()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_single_row_workbook() {
        let customer = CustomerCase::new("Anna", "Muster", "Teststr. 1", "123456");
        let record = ExportRecord::new(&customer, Verdict::FeeRequired);

        let rows = read_back(to_xlsx_bytes(&record, "Ergebnis").unwrap(), "Ergebnis");

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], HEADERS.map(String::from).to_vec());
        assert_eq!(
            rows[1],
            vec!["Anna", "Muster", "Teststr. 1", "123456", "30 EUR Rechnung"]
        );
    }

    #[test]
    fn test_meter_id_stays_text() {
        let customer = CustomerCase::new("Jörg", "Übel", "Weg 2", "007");
        let record = ExportRecord::new(&customer, Verdict::GridOperatorReview);

        let rows = read_back(to_xlsx_bytes(&record, "Ergebnis").unwrap(), "Ergebnis");

        assert_eq!(rows[1][0], "Jörg");
        assert_eq!(rows[1][3], "007");
        assert_eq!(rows[1][4], "Über 30 kW – Netzprüfung erforderlich");
    }

    #[test]
    fn test_invalid_sheet_name_is_an_error() {
        let record = ExportRecord::new(&CustomerCase::default(), Verdict::FeeRequired);
        assert!(to_xlsx_bytes(&record, "bad/name").is_err());
    }
}
