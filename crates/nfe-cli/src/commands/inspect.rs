//! Inspect command - show what is extracted from a single invoice.

use std::path::PathBuf;

use clap::Args;
use console::style;

use nfe_core::invoice::{InvoiceParser, NfeParser};
use nfe_core::models::table::invoice_rows;
use nfe_core::{Document, Invoice};

/// Arguments for the inspect command.
#[derive(Args)]
pub struct InspectArgs {
    /// Input XML file
    #[arg(required = true)]
    input: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: InspectFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum InspectFormat {
    /// Human readable summary
    Text,
    /// JSON with the invoice and its rows
    Json,
}

pub fn run(args: InspectArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let document = Document::from_path(&args.input)?;
    let root = nfe_core::xml::parse_bytes(&document.content)?;
    let parser = NfeParser::from_config(&config.extraction);

    let Some(invoice) = parser.parse_element(&root)? else {
        println!(
            "{} {} is not an NFe invoice",
            style("ℹ").blue(),
            document.name
        );
        return Ok(());
    };

    match args.format {
        InspectFormat::Json => {
            let value = serde_json::json!({
                "invoice": invoice,
                "rows": invoice_rows(&invoice),
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        InspectFormat::Text => print!("{}", format_text(&invoice)),
    }

    Ok(())
}

fn format_text(invoice: &Invoice) -> String {
    let mut output = String::new();

    output.push_str(&format!("Invoice: {} / series {}\n", invoice.number, invoice.series));
    output.push_str(&format!("Key: {}\n", invoice.key));
    output.push_str(&format!("Issuer: {}\n", invoice.issuer));
    output.push_str(&format!("Operation: {}\n", invoice.operation_nature));

    for (i, item) in invoice.items.iter().enumerate() {
        output.push('\n');
        output.push_str(&format!("{}. {} (qty {})\n", i + 1, item.product, item.quantity));

        let pairs = item.lot_validities();
        if pairs.is_empty() {
            output.push_str("   no lots found\n");
        }
        for pair in pairs {
            let expiry = match (pair.expiry_date(), pair.expiry.as_deref()) {
                (Some(date), _) => date.format("%Y-%m-%d").to_string(),
                (None, Some(raw)) => raw.to_string(),
                (None, None) => "-".to_string(),
            };
            output.push_str(&format!("   lot {} expires {}\n", pair.batch, expiry));
        }
    }

    output.push_str(&format!("\nRows: {}\n", invoice_rows(invoice).len()));
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use nfe_core::LineItem;

    #[test]
    fn test_format_text_lists_lots() {
        let invoice = Invoice {
            number: "10".to_string(),
            series: "1".to_string(),
            operation_nature: "VENDA".to_string(),
            key: "3524".to_string(),
            issuer: "EMITENTE".to_string(),
            items: vec![LineItem {
                product: "SORO".to_string(),
                quantity: 4,
                additional_info: Some("LOTE: A1 VAL: 05/06/2027 LOTE: B2".to_string()),
                traceability: Vec::new(),
            }],
        };

        let text = format_text(&invoice);
        assert!(text.contains("1. SORO (qty 4)"));
        assert!(text.contains("lot A1 expires 2027-06-05"));
        assert!(text.contains("lot B2 expires -"));
        assert!(text.ends_with("Rows: 2\n"));
    }
}
