//! Command handlers

use crate::cli::{BookAction, Cli, Commands, LedgerAction, PartyAction, ShortcutAction, SlipAction};
use crate::output;
use chrono::{Local, NaiveDate};
use slipbook_app::app::slip_service::SlipEntry;
use slipbook_app::app::{ledger_service, maintenance_service, purchase_book, slip_service, viewer_service};
use slipbook_app::config::Config;
use slipbook_app::export::export_purchase_book;
use slipbook_app::AppContext;
use slipbook_domain::model::{DiscountSelector, Shortcut};
use slipbook_types::{parse_amount, Error, OutputFormat, Result};
use std::path::PathBuf;

pub fn execute(cli: Cli) -> Result<()> {
    // Config commands work without opening the data directory
    if let Commands::Config {
        show,
        set_output,
        set_data_dir,
        set_discount,
        set_currency,
        reset,
    } = &cli.command
    {
        return cmd_config(
            *show,
            *set_output,
            set_data_dir.clone(),
            set_discount.clone(),
            set_currency.clone(),
            *reset,
        );
    }

    let mut config = Config::load()?;
    if let Some(ref dir) = cli.data_dir {
        config.data_dir = Some(dir.clone());
    }
    let format = cli.format.unwrap_or(config.output_format);
    let mut ctx = AppContext::open(&config)?;

    match cli.command {
        Commands::Party { action } => cmd_party(&mut ctx, action, format),
        Commands::Shortcut { action } => cmd_shortcut(&mut ctx, action, format),
        Commands::Slip { action } => cmd_slip(&ctx, &config, action, format),
        Commands::Dates => {
            output::print_dates(format, &viewer_service::available_dates(&ctx))
        }
        Commands::Ledger { action } => cmd_ledger(&ctx, &config, action, format),
        Commands::Book { action } => cmd_book(&ctx, &config, action, format),
        Commands::ResetData { yes } => cmd_reset_data(&ctx, yes),
        Commands::Config { .. } => Ok(()),
    }
}

/// Parse `--date`, defaulting to today.
fn resolve_date(date: Option<&str>) -> Result<NaiveDate> {
    match date {
        Some(text) => NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
            .map_err(|_| Error::InvalidDate(text.to_string())),
        None => Ok(Local::now().date_naive()),
    }
}

fn cmd_party(ctx: &mut AppContext, action: PartyAction, format: OutputFormat) -> Result<()> {
    match action {
        PartyAction::List => output::print_parties(format, ctx.parties.parties()),
        PartyAction::Add { name } => {
            let party = maintenance_service::add_party(ctx, &name)?;
            println!("Added party {} ({})", party.name, party.id);
            Ok(())
        }
        PartyAction::Rename { id, name } => {
            maintenance_service::rename_party(ctx, id, &name)?;
            println!("Renamed party {} to {}", id, name.trim());
            Ok(())
        }
        PartyAction::Remove { id } => {
            let party = maintenance_service::remove_party(ctx, id)?;
            println!("Removed party {} ({})", party.name, party.id);
            Ok(())
        }
    }
}

fn cmd_shortcut(ctx: &mut AppContext, action: ShortcutAction, format: OutputFormat) -> Result<()> {
    match action {
        ShortcutAction::List => output::print_shortcuts(format, ctx.shortcuts.shortcuts()),
        ShortcutAction::Add {
            code,
            label,
            sign,
            purchase_book,
        } => {
            let shortcut = Shortcut::new(&code, &label, sign).with_allocation_view(purchase_book);
            let shown = shortcut.to_string();
            maintenance_service::add_shortcut(ctx, shortcut)?;
            println!("Added shortcut {}", shown);
            Ok(())
        }
        ShortcutAction::Edit {
            code,
            label,
            sign,
            new_code,
            purchase_book,
        } => {
            let target = new_code.as_deref().unwrap_or(&code);
            let shortcut = Shortcut::new(target, &label, sign).with_allocation_view(purchase_book);
            let shown = shortcut.to_string();
            maintenance_service::edit_shortcut(ctx, &code, shortcut)?;
            println!("Updated shortcut {}", shown);
            Ok(())
        }
        ShortcutAction::Remove { code } => {
            let removed = maintenance_service::remove_shortcut(ctx, &code)?;
            println!("Removed shortcut {}", removed);
            Ok(())
        }
    }
}

fn cmd_slip(ctx: &AppContext, config: &Config, action: SlipAction, format: OutputFormat) -> Result<()> {
    match action {
        SlipAction::Add {
            date,
            party,
            truck,
            gross,
            bands,
            rate1,
            rate2,
            quality,
            discount,
            tax,
        } => {
            let date = resolve_date(date.as_deref())?;
            let entry = SlipEntry {
                party_name: party,
                truck_id: truck,
                gross_weight: parse_amount(&gross),
                bands,
                rate1: parse_amount(&rate1),
                rate2: parse_amount(&rate2),
                quality_adj: quality.iter().map(|q| parse_amount(q)).collect(),
                discount: DiscountSelector::parse(discount.as_deref().unwrap_or(&config.default_discount)),
                tax: parse_amount(&tax),
            };
            let draft = entry.to_draft();
            if draft.breakdown.is_clamped() {
                eprintln!(
                    "Warning: bands exceed the gross weight by {} kg; remainder set to 0",
                    draft.breakdown.clamped_excess
                );
            }
            let record = slip_service::save_delivery(ctx, date, &entry)?;
            output::print_deliveries(format, &config.currency_symbol, std::slice::from_ref(&record))
        }
        SlipAction::List { date, party } => {
            let date = resolve_date(date.as_deref())?;
            let deliveries = match party {
                Some(name) => viewer_service::deliveries_for(ctx, date, &name),
                None => viewer_service::party_keys_for_date(ctx, date)
                    .iter()
                    .flat_map(|key| viewer_service::deliveries_for_key(ctx, date, key))
                    .collect(),
            };
            output::print_deliveries(format, &config.currency_symbol, &deliveries)
        }
        SlipAction::Delete {
            date,
            party,
            truck,
            amount,
        } => {
            let date = resolve_date(date.as_deref())?;
            let key = ctx.parties.resolve_key(&party);
            let amount = parse_amount(&amount);
            let matching: Vec<_> = viewer_service::deliveries_for_key(ctx, date, &key)
                .into_iter()
                .filter(|d| d.truck_id == truck.trim() && (d.final_amount - amount).abs() < 0.01)
                .collect();
            let removed = viewer_service::delete_deliveries(ctx, date, &key, &matching);
            println!("Deleted {} deliveries", removed);
            Ok(())
        }
        SlipAction::Clear { date, party } => {
            let date = resolve_date(date.as_deref())?;
            let key = ctx.parties.resolve_key(&party);
            viewer_service::delete_all_deliveries(ctx, date, &key);
            println!("Deleted all deliveries of {} on {}", party, date);
            Ok(())
        }
    }
}

fn cmd_ledger(ctx: &AppContext, config: &Config, action: LedgerAction, format: OutputFormat) -> Result<()> {
    let symbol = &config.currency_symbol;
    match action {
        LedgerAction::Show { date, party } => {
            let date = resolve_date(date.as_deref())?;
            let session = ledger_service::open_ledger(ctx, date, &party);
            output::print_ledger(format, symbol, &session.to_record())
        }
        LedgerAction::Add {
            date,
            party,
            operations,
        } => {
            let date = resolve_date(date.as_deref())?;
            let mut session = ledger_service::open_ledger(ctx, date, &party);
            for text in &operations {
                if !ledger_service::apply_operation(ctx, &mut session, text)? {
                    break;
                }
            }
            ledger_service::save_ledger(ctx, &mut session);
            output::print_ledger(format, symbol, &session.to_record())
        }
        LedgerAction::Reset { date, party } => {
            let date = resolve_date(date.as_deref())?;
            let mut session = ledger_service::open_ledger(ctx, date, &party);
            session.reset();
            ledger_service::save_ledger(ctx, &mut session);
            output::print_ledger(format, symbol, &session.to_record())
        }
        LedgerAction::Summary { date } => {
            let date = resolve_date(date.as_deref())?;
            output::print_summary(format, symbol, date, &ledger_service::day_summary(ctx, date))
        }
    }
}

fn cmd_book(ctx: &AppContext, config: &Config, action: BookAction, format: OutputFormat) -> Result<()> {
    match action {
        BookAction::Show { date } => {
            let date = resolve_date(date.as_deref())?;
            let view = purchase_book::day_view(ctx, date);
            output::print_book(format, &config.currency_symbol, &view)
        }
        BookAction::Export { date, output } => {
            let date = resolve_date(date.as_deref())?;
            let view = purchase_book::day_view(ctx, date);
            let output_path = output.unwrap_or_else(|| {
                PathBuf::from(format!("purchase_book_{}.xlsx", date.format("%Y-%m-%d")))
            });
            export_purchase_book(&view, date, &output_path)?;
            println!("Exported {} rows to {}", view.rows.len(), output_path.display());
            Ok(())
        }
    }
}

fn cmd_reset_data(ctx: &AppContext, yes: bool) -> Result<()> {
    if !yes {
        println!("This deletes every delivery and ledger. Re-run with --yes to confirm.");
        return Ok(());
    }
    viewer_service::delete_all_data(ctx);
    println!("All deliveries and ledgers deleted (parties and shortcuts kept)");
    Ok(())
}

fn cmd_config(
    show: bool,
    set_output: Option<OutputFormat>,
    set_data_dir: Option<PathBuf>,
    set_discount: Option<String>,
    set_currency: Option<String>,
    reset: bool,
) -> Result<()> {
    if reset {
        let config = Config::default();
        config.save()?;
        println!("Configuration reset to defaults");
        println!("\n{}", config);
        return Ok(());
    }

    let mut config = Config::load()?;
    let mut modified = false;

    if let Some(output_format) = set_output {
        config.output_format = output_format;
        modified = true;
    }

    if let Some(dir) = set_data_dir {
        config.data_dir = Some(dir);
        modified = true;
    }

    if let Some(discount) = set_discount {
        config.default_discount = discount.trim().to_string();
        modified = true;
    }

    if let Some(symbol) = set_currency {
        config.currency_symbol = symbol;
        modified = true;
    }

    if modified {
        config.save()?;
        println!("Configuration updated");
    }

    if show || !modified {
        println!("{}", config);
    }

    Ok(())
}
