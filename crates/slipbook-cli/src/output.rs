//! Output formatting module

use chrono::NaiveDate;
use serde::Serialize;
use slipbook_app::app::ledger_service::LedgerSummaryRow;
use slipbook_app::export::excel::{band_detail, headers};
use slipbook_domain::model::{Adjustment, DeliveryRecord, LedgerRecord, Party, Shortcut};
use slipbook_domain::service::AllocationView;
use slipbook_types::{round_currency, OutputFormat, Result};

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let content = serde_json::to_string_pretty(value)?;
    println!("{}", content);
    Ok(())
}

fn money(symbol: &str, value: f64) -> String {
    format!("{}{:.2}", symbol, round_currency(value))
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() > max_len {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    } else {
        s.to_string()
    }
}

pub fn print_parties(format: OutputFormat, parties: &[Party]) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(parties);
    }
    println!("{:>5}  {}", "ID", "Name");
    println!("{}", "-".repeat(40));
    for party in parties {
        println!("{:>5}  {}", party.id, party.name);
    }
    if parties.is_empty() {
        println!("No parties registered.");
    }
    Ok(())
}

pub fn print_shortcuts(format: OutputFormat, shortcuts: &[Shortcut]) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(shortcuts);
    }
    println!("{:<5} {:<24} {:<5} {}", "Code", "Description", "Sign", "Purchase book");
    println!("{}", "-".repeat(50));
    for s in shortcuts {
        println!(
            "{:<5} {:<24} {:<5} {}",
            s.code,
            truncate(&s.label, 24),
            s.sign,
            if s.include_in_allocation_view { "yes" } else { "no" }
        );
    }
    if shortcuts.is_empty() {
        println!("No shortcuts defined.");
    }
    Ok(())
}

pub fn print_dates(format: OutputFormat, dates: &[NaiveDate]) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(dates);
    }
    if dates.is_empty() {
        println!("No deliveries recorded.");
    }
    for date in dates {
        println!("{}", date.format("%Y-%m-%d"));
    }
    Ok(())
}

pub fn print_deliveries(format: OutputFormat, symbol: &str, deliveries: &[DeliveryRecord]) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(deliveries);
    }
    if deliveries.is_empty() {
        println!("No deliveries found.");
        return Ok(());
    }
    for d in deliveries {
        println!();
        println!("{}  truck {}  gross {} kg", d.party_name, d.truck_id, d.gross_weight);
        println!("{}", "-".repeat(50));
        for (i, (weight, amount)) in d.priced_weights().iter().zip(&d.band_amounts).enumerate() {
            println!(
                "  {:>10} kg x {:>8} = {:>14}",
                weight,
                d.effective_rate(i),
                money(symbol, *amount)
            );
        }
        println!("  {:>10} kg dust", d.dust_weight());
        println!("  Discount:       {}", d.discount);
        println!("  Before tax:     {}", money(symbol, d.pre_tax_amount));
        println!("  Tax:            {}", money(symbol, d.tax));
        println!("  Final:          {}", money(symbol, d.final_amount));
    }
    Ok(())
}

fn print_adjustment(symbol: &str, a: &Adjustment) {
    println!(
        "  {} {:<20} {:>14}",
        a.sign,
        format!("{} ({})", truncate(&a.label, 14), a.shortcut_code),
        money(symbol, a.amount)
    );
}

pub fn print_ledger(format: OutputFormat, symbol: &str, record: &LedgerRecord) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(record);
    }
    println!("\nLedger: {}  {}", record.party_name, record.date.format("%Y-%m-%d"));
    println!("{}", "=".repeat(40));
    println!("  Deliveries total:      {:>14}", money(symbol, record.base_total));
    for a in &record.adjustments {
        print_adjustment(symbol, a);
    }
    println!("{}", "-".repeat(40));
    println!("  Settled total:         {:>14}", money(symbol, record.settled_total));
    Ok(())
}

pub fn print_summary(
    format: OutputFormat,
    symbol: &str,
    date: NaiveDate,
    rows: &[LedgerSummaryRow],
) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(rows);
    }
    println!("\nDay summary {}", date.format("%Y-%m-%d"));
    println!("{}", "=".repeat(40));
    if rows.is_empty() {
        println!("No ledgers saved.");
        return Ok(());
    }
    for row in rows {
        println!("\n{}", row.party_name);
        println!("  Deliveries total:      {:>14}", money(symbol, row.base_total));
        for a in row.minus.iter().chain(&row.plus) {
            print_adjustment(symbol, a);
        }
        println!("  Settled total:         {:>14}", money(symbol, row.settled_total));
    }
    Ok(())
}

pub fn print_book(format: OutputFormat, symbol: &str, view: &AllocationView) -> Result<()> {
    if format == OutputFormat::Json {
        return print_json(view);
    }
    if view.is_empty() {
        println!("No deliveries for this date.");
        return Ok(());
    }
    println!("{}", headers(view).join(" | "));
    println!("{}", "-".repeat(100));
    for row in &view.rows {
        let mut cells = vec![
            row.party_name.clone().unwrap_or_default(),
            row.gross_weight.map(|g| g.to_string()).unwrap_or_default(),
            band_detail(row),
        ];
        match &row.totals {
            Some(t) => {
                cells.extend(t.shares.iter().map(|s| money(symbol, s.amount)));
                cells.push(money(symbol, t.pre_tax));
                cells.push(money(symbol, t.tax));
                cells.push(money(symbol, t.final_amount));
                cells.push(money(symbol, t.allocated_final));
                cells.push(t.truck_id.clone());
            }
            None => cells.extend(std::iter::repeat(String::new()).take(view.columns.len() + 5)),
        }
        println!("{}", cells.join(" | "));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money() {
        assert_eq!(money("₹", 164.889), "₹164.89");
        assert_eq!(money("", 5.0), "5.00");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Hamali", 10), "Hamali");
        assert_eq!(truncate("Transport charges", 10), "Transpo...");
    }
}
