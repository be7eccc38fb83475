// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

use chargify_allocations_rs::{AllocationPreview, ComponentId, LineItem, PayloadError};
use clap::{Parser, ValueEnum};
use csv::Writer;
use rust_decimal::Decimal;
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

/// Allocation Preview - Inspect Chargify allocation previews
///
/// Decodes an allocation preview payload (XML or JSON) and writes its line
/// items, or its totals, to stdout as CSV.
#[derive(Parser, Debug)]
#[command(name = "chargify-preview")]
#[command(about = "Decodes Chargify allocation previews into CSV", long_about = None)]
struct Args {
    /// Path to the allocation preview payload
    ///
    /// Example: cargo run -- preview.xml > line_items.csv
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Payload format; `auto` picks XML when the document starts with `<`
    #[arg(long, value_enum, default_value_t = Format::Auto)]
    format: Format,

    /// Write a single row of preview totals instead of the line items
    #[arg(long)]
    totals: bool,

    /// Log decoding details to stderr (overridden by RUST_LOG)
    #[arg(short, long)]
    verbose: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Format {
    Auto,
    Xml,
    Json,
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    let payload = match fs::read_to_string(&args.input) {
        Ok(payload) => payload,
        Err(e) => {
            eprintln!("Error reading file '{}': {}", args.input.display(), e);
            process::exit(1);
        }
    };

    let preview = match decode_preview(&payload, args.format) {
        Ok(preview) => preview,
        Err(e) => {
            eprintln!("Error decoding allocation preview: {}", e);
            process::exit(1);
        }
    };

    let written = if args.totals {
        write_totals(&preview, std::io::stdout())
    } else {
        write_line_items(&preview, std::io::stdout())
    };
    if let Err(e) = written {
        eprintln!("Error writing output: {}", e);
        process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Resolves `Auto` by looking at the first non-whitespace character.
fn detect_format(payload: &str, requested: Format) -> Format {
    match requested {
        Format::Auto if payload.trim_start().starts_with('<') => Format::Xml,
        Format::Auto => Format::Json,
        explicit => explicit,
    }
}

/// Decodes a preview payload in the requested format.
///
/// # Errors
///
/// Returns the decoder's [`PayloadError`] unchanged.
fn decode_preview(payload: &str, format: Format) -> Result<AllocationPreview, PayloadError> {
    let format = detect_format(payload, format);
    tracing::debug!(?format, bytes = payload.len(), "decoding allocation preview");
    match format {
        Format::Xml => AllocationPreview::from_xml(payload),
        _ => AllocationPreview::from_json_str(payload),
    }
}

/// One output row per line item. Absent values are written as empty fields.
#[derive(Debug, Serialize)]
struct LineItemRow<'a> {
    transaction_type: Option<&'a str>,
    kind: Option<&'a str>,
    component_id: Option<ComponentId>,
    amount: Option<Decimal>,
    discount_amount: Option<Decimal>,
    taxable_amount: Option<Decimal>,
    memo: Option<&'a str>,
}

impl<'a> From<&'a LineItem> for LineItemRow<'a> {
    fn from(item: &'a LineItem) -> Self {
        Self {
            transaction_type: item.transaction_type(),
            kind: item.kind(),
            component_id: item.component_id(),
            amount: item.amount(),
            discount_amount: item.discount_amount(),
            taxable_amount: item.taxable_amount(),
            memo: item.memo(),
        }
    }
}

#[derive(Debug, Serialize)]
struct TotalsRow<'a> {
    start_date: Option<String>,
    end_date: Option<String>,
    direction: Option<&'a str>,
    proration_scheme: Option<&'a str>,
    subtotal: Option<Decimal>,
    total_discount: Option<Decimal>,
    total_tax: Option<Decimal>,
    total: Option<Decimal>,
}

/// Write the preview's line items as CSV.
///
/// # CSV Format
///
/// Columns: `transaction_type, kind, component_id, amount, discount_amount, taxable_amount, memo`
///
/// # Example
///
/// ```csv
/// transaction_type,kind,component_id,amount,discount_amount,taxable_amount,memo
/// charge,component,42,12.00,0.00,12.00,Widgets: 10 to 20
/// charge,tax,,0.96,,,Sales tax
/// ```
///
/// # Errors
///
/// Returns a CSV error if writing fails.
fn write_line_items<W: Write>(preview: &AllocationPreview, writer: W) -> Result<(), csv::Error> {
    let mut wtr = Writer::from_writer(writer);

    if preview.line_items().is_empty() {
        wtr.write_record([
            "transaction_type",
            "kind",
            "component_id",
            "amount",
            "discount_amount",
            "taxable_amount",
            "memo",
        ])?;
    }
    for item in preview.line_items() {
        wtr.serialize(LineItemRow::from(item))?;
    }

    wtr.flush()?;
    Ok(())
}

/// Write the preview's period, direction and totals as a single CSV row.
///
/// # Errors
///
/// Returns a CSV error if writing fails.
fn write_totals<W: Write>(preview: &AllocationPreview, writer: W) -> Result<(), csv::Error> {
    let mut wtr = Writer::from_writer(writer);

    wtr.serialize(TotalsRow {
        start_date: preview.start_date().map(|date| date.to_rfc3339()),
        end_date: preview.end_date().map(|date| date.to_rfc3339()),
        direction: preview.direction(),
        proration_scheme: preview.proration_scheme(),
        subtotal: preview.subtotal(),
        total_discount: preview.total_discount(),
        total_tax: preview.total_tax(),
        total: preview.total(),
    })?;

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PREVIEW_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<allocation_preview>
  <start_date type="datetime">2024-03-01T00:00:00Z</start_date>
  <end_date type="datetime">2024-04-01T00:00:00Z</end_date>
  <subtotal_in_cents type="integer">1200</subtotal_in_cents>
  <total_tax_in_cents type="integer">96</total_tax_in_cents>
  <total_discount_in_cents type="integer">0</total_discount_in_cents>
  <total_in_cents type="integer">1296</total_in_cents>
  <direction>upgrade</direction>
  <proration_scheme>prorate-attempt-capture</proration_scheme>
  <line_items type="array">
    <line_item>
      <transaction_type>charge</transaction_type>
      <kind>component</kind>
      <amount_in_cents type="integer">1200</amount_in_cents>
      <memo>Widgets: 10 to 20</memo>
      <discount_amount_in_cents type="integer">0</discount_amount_in_cents>
      <taxable_amount_in_cents type="integer">1200</taxable_amount_in_cents>
      <component_id type="integer">42</component_id>
    </line_item>
    <line_item>
      <transaction_type>charge</transaction_type>
      <kind>tax</kind>
      <amount_in_cents type="integer">96</amount_in_cents>
      <memo>Sales tax</memo>
    </line_item>
  </line_items>
</allocation_preview>"#;

    fn render(preview: &AllocationPreview, totals: bool) -> String {
        let mut output = Vec::new();
        if totals {
            write_totals(preview, &mut output).unwrap();
        } else {
            write_line_items(preview, &mut output).unwrap();
        }
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn auto_detects_xml_and_json() {
        assert_eq!(detect_format("  \n<allocation_preview/>", Format::Auto), Format::Xml);
        assert_eq!(detect_format("{\"total_in_cents\": 1}", Format::Auto), Format::Json);
        assert_eq!(detect_format("<x/>", Format::Json), Format::Json);
    }

    #[test]
    fn decodes_xml_payload() {
        let preview = decode_preview(PREVIEW_XML, Format::Auto).unwrap();
        assert_eq!(preview.line_items().len(), 2);
        assert_eq!(preview.total_in_cents().map(|c| c.0), Some(1296));
    }

    #[test]
    fn decode_errors_are_reported() {
        let err = decode_preview("<allocation/>", Format::Auto).unwrap_err();
        assert!(matches!(err, PayloadError::InvalidArgument { argument: "xml", .. }));

        let err = decode_preview("not json", Format::Json).unwrap_err();
        assert!(matches!(err, PayloadError::InvalidArgument { argument: "json", .. }));
    }

    #[test]
    fn writes_line_items_as_csv() {
        let preview = decode_preview(PREVIEW_XML, Format::Xml).unwrap();
        let output = render(&preview, false);
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(
            lines[0],
            "transaction_type,kind,component_id,amount,discount_amount,taxable_amount,memo"
        );
        assert_eq!(lines[1], "charge,component,42,12.00,0.00,12.00,Widgets: 10 to 20");
        assert_eq!(lines[2], "charge,tax,,0.96,,,Sales tax");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn empty_preview_still_writes_header() {
        let output = render(&AllocationPreview::default(), false);
        assert_eq!(
            output,
            "transaction_type,kind,component_id,amount,discount_amount,taxable_amount,memo\n"
        );
    }

    #[test]
    fn writes_totals_row() {
        let preview = decode_preview(PREVIEW_XML, Format::Xml).unwrap();
        let output = render(&preview, true);
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(
            lines[0],
            "start_date,end_date,direction,proration_scheme,subtotal,total_discount,total_tax,total"
        );
        assert_eq!(
            lines[1],
            "2024-03-01T00:00:00+00:00,2024-04-01T00:00:00+00:00,upgrade,prorate-attempt-capture,12.00,0.00,0.96,12.96"
        );
    }
}
