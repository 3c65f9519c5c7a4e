//! Excel export of the purchase book

use chrono::NaiveDate;
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use slipbook_domain::service::{AllocationRow, AllocationView};
use slipbook_types::{round_currency, Error, Result};
use std::path::Path;
use tracing::info;

/// Export a purchase book view to an Excel file
pub fn export_purchase_book(view: &AllocationView, date: NaiveDate, output_path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();

    let sheet = workbook.add_worksheet();
    write_purchase_book_sheet(sheet, view, date)?;

    workbook
        .save(output_path)
        .map_err(|e| Error::Excel(e.to_string()))?;

    info!(path = %output_path.display(), rows = view.rows.len(), "exported purchase book");
    Ok(())
}

/// Column headers: fixed columns around one column per allocation shortcut.
pub fn headers(view: &AllocationView) -> Vec<String> {
    let mut headers = vec![
        "Party".to_string(),
        "Gross Wt".to_string(),
        "Band Wt x Rate".to_string(),
    ];
    headers.extend(view.columns.iter().map(|c| c.label.clone()));
    headers.extend(
        ["Amount", "Tax", "Final", "Allocated Final", "Truck No."]
            .iter()
            .map(|h| h.to_string()),
    );
    headers
}

/// `6200 x 27` style band detail; dust rows show the weight alone.
pub fn band_detail(row: &AllocationRow) -> String {
    match row.rate {
        Some(rate) => format!("{} x {}", row.band_weight, rate),
        None => format!("{} (dust)", row.band_weight),
    }
}

fn write_purchase_book_sheet(sheet: &mut Worksheet, view: &AllocationView, date: NaiveDate) -> Result<()> {
    sheet
        .set_name("Purchase Book")
        .map_err(|e| Error::Excel(e.to_string()))?;

    let header_format = Format::new().set_bold();
    let amount_format = Format::new().set_num_format("#,##0.00");

    sheet
        .write_string_with_format(0, 0, format!("Purchase Book {}", date.format("%d-%m-%Y")), &header_format)
        .map_err(|e| Error::Excel(e.to_string()))?;

    for (col, header) in headers(view).iter().enumerate() {
        sheet
            .write_string_with_format(2, col as u16, header, &header_format)
            .map_err(|e| Error::Excel(e.to_string()))?;
    }

    let share_start = 3u16;
    let totals_start = share_start + view.columns.len() as u16;

    for (row_idx, row) in view.rows.iter().enumerate() {
        let r = (row_idx + 3) as u32;

        if let Some(name) = &row.party_name {
            sheet
                .write_string(r, 0, name)
                .map_err(|e| Error::Excel(e.to_string()))?;
        }
        if let Some(gross) = row.gross_weight {
            sheet
                .write_number(r, 1, gross)
                .map_err(|e| Error::Excel(e.to_string()))?;
        }
        sheet
            .write_string(r, 2, band_detail(row))
            .map_err(|e| Error::Excel(e.to_string()))?;

        let Some(totals) = &row.totals else {
            continue;
        };
        for (i, share) in totals.shares.iter().enumerate() {
            sheet
                .write_number_with_format(r, share_start + i as u16, round_currency(share.amount), &amount_format)
                .map_err(|e| Error::Excel(e.to_string()))?;
        }
        let figures = [
            totals.pre_tax,
            totals.tax,
            totals.final_amount,
            round_currency(totals.allocated_final),
        ];
        for (i, value) in figures.iter().enumerate() {
            sheet
                .write_number_with_format(r, totals_start + i as u16, *value, &amount_format)
                .map_err(|e| Error::Excel(e.to_string()))?;
        }
        sheet
            .write_string(r, totals_start + figures.len() as u16, &totals.truck_id)
            .map_err(|e| Error::Excel(e.to_string()))?;
    }

    sheet
        .set_column_width(0, 24)
        .map_err(|e| Error::Excel(e.to_string()))?;
    sheet
        .set_column_width(2, 18)
        .map_err(|e| Error::Excel(e.to_string()))?;

    Ok(())
}
