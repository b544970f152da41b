//! # Folio CLI
//!
//! Usage:
//!   folio report.json -o report.pdf
//!   cat report.json | folio - -o report.pdf --config layout.json
//!   folio --example > report.json

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;

use folio::{FolioError, LayoutConfig};

#[derive(Parser)]
#[command(name = "folio")]
#[command(version)]
#[command(about = "Render a structured report into a paginated PDF", long_about = None)]
struct Cli {
    /// Report JSON file (`-` or omitted reads stdin)
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output PDF path
    #[arg(short, long, value_name = "FILE", default_value = "report.pdf")]
    output: PathBuf,

    /// Layout config JSON (geometry, watermark, locale, status overrides)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print an example report to stdout and exit
    #[arg(long)]
    example: bool,

    /// Log page breaks and layout decisions
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "folio=debug" } else { "folio=info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    if cli.example {
        print!("{}", EXAMPLE_REPORT);
        return ExitCode::SUCCESS;
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("✗ {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), FolioError> {
    let config = match &cli.config {
        Some(path) => LayoutConfig::from_json_file(path)?,
        None => LayoutConfig::default(),
    };
    let input = read_input(cli.input.as_deref())?;

    let doc = folio::render_json_with(&input, &config)?;
    fs::write(&cli.output, &doc.bytes)?;
    eprintln!(
        "✓ Written {} bytes ({} pages) to {}",
        doc.byte_len,
        doc.page_count,
        cli.output.display()
    );
    Ok(())
}

fn read_input(path: Option<&Path>) -> Result<String, FolioError> {
    match path {
        Some(p) if p != Path::new("-") => Ok(fs::read_to_string(p)?),
        _ => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

const EXAMPLE_REPORT: &str = r##"{
  "meta": {
    "id": "RPT-2024-0042",
    "title": "Supplier Account Review",
    "generatedAt": "2024-03-07T15:04:05Z",
    "url": "https://reports.example.com/r/RPT-2024-0042"
  },
  "sections": [
    {
      "number": 1,
      "title": "Account",
      "blocks": [
        { "type": "statusCard", "status": "eligible", "label": "Eligibility", "detail": "All documents verified on 05/03/2024" },
        {
          "type": "dataGrid",
          "columns": 2,
          "items": [
            { "label": "Supplier", "value": "Acme Industrial Ltda." },
            { "label": "Tax ID", "value": "12.345.678/0001-90" },
            { "label": "Region", "value": "South" },
            { "label": "Account manager", "value": null }
          ]
        }
      ]
    },
    {
      "number": 2,
      "title": "Indicators",
      "blocks": [
        {
          "type": "kpiRow",
          "cards": [
            { "label": "Open balance", "value": 48210.5, "format": "currency" },
            { "label": "Invoices", "value": 37 },
            { "label": "On-time rate", "value": 92.4, "format": "percent", "accent": "#2E7D32" }
          ]
        },
        { "type": "progressBar", "label": "Contract utilization", "percent": 68.0 }
      ]
    },
    {
      "number": 3,
      "title": "Events",
      "blocks": [
        {
          "type": "eventList",
          "items": [
            { "text": "Invoice 2291 overdue by 12 days", "urgency": "critical", "date": "2024-03-01" },
            { "text": "Certificate expires next month", "urgency": "warning", "date": "2024-02-20" },
            { "text": "Bank details updated", "date": "2024-02-02" }
          ]
        }
      ]
    },
    {
      "number": 4,
      "title": "Invoices",
      "blocks": [
        {
          "type": "table",
          "columns": [
            { "header": "Invoice", "weight": 1 },
            { "header": "Issued", "weight": 1 },
            { "header": "Status", "weight": 1 },
            { "header": "Amount", "weight": 1.2, "currency": true }
          ],
          "rows": [
            ["2288", "2024-01-15", "Paid", 12500.0],
            ["2289", "2024-01-29", "Paid", 8420.75],
            ["2290", "2024-02-12", "Pending", 15034.1],
            ["2291", "2024-02-18", "Overdue", 12255.65]
          ],
          "total": { "label": "Total", "column": 3 }
        }
      ]
    }
  ]
}
"##;
