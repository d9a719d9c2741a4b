use std::ffi::OsString;
use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use bom_csv::{Grouping, ReportKind, ReportOptions, Separator};
use clap::Args;
use colored::Colorize;

use crate::progress::Progress;

#[derive(Args, Debug, Clone)]
pub struct ConvertArgs {
    /// KiCad XML export file
    #[arg(short, long, value_name = "KICAD_EXPORT.XML", value_hint = clap::ValueHint::FilePath)]
    pub input: PathBuf,

    /// Generated CSV file. Defaults to <KICAD_EXPORT.XML>.csv
    #[arg(short, long, value_name = "BOM.CSV", value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// Group components by this field
    #[arg(short, long, value_name = "FIELD", visible_alias = "group_by")]
    pub group_by: Option<String>,

    /// Field separator character
    #[arg(short, long, value_name = "CHAR", default_value_t = Separator::COMMA)]
    pub separator: Separator,

    /// Write the assembly report (designators and footprint per group)
    #[arg(short, long, requires = "group_by")]
    pub assembly: bool,

    /// Append the member references to each grouped row
    #[arg(long, requires = "group_by", conflicts_with = "assembly")]
    pub show_refs: bool,

    /// Print each group and its references to stdout after writing
    #[arg(long, requires = "group_by")]
    pub summary: bool,
}

impl ConvertArgs {
    pub fn output_path(&self) -> PathBuf {
        self.output.clone().unwrap_or_else(|| {
            let mut path = OsString::from(self.input.as_os_str());
            path.push(".csv");
            PathBuf::from(path)
        })
    }

    pub fn report_options(&self) -> ReportOptions {
        let kind = match &self.group_by {
            None => ReportKind::Flat,
            Some(field) if self.assembly => ReportKind::Assembly {
                field: field.clone(),
            },
            Some(field) => ReportKind::Grouped {
                field: field.clone(),
                show_refs: self.show_refs,
            },
        };
        ReportOptions {
            separator: self.separator,
            kind,
        }
    }
}

pub fn execute(args: ConvertArgs) -> Result<()> {
    let output = args.output_path();
    let options = args.report_options();

    let progress = Progress::start(&format!("Loading {}", args.input.display()));
    let components = kicad_netlist::load_file(&args.input, || progress.tick())
        .with_context(|| format!("Failed to load {}", args.input.display()))?;
    progress.finish();
    eprintln!("{} components found", components.len());

    eprintln!(
        "CSV output file: {}, using '{}' as separator",
        output.display(),
        options.separator
    );
    let progress = Progress::start("Writing CSV file");
    let summary = bom_csv::write_report(&components, &options, &output, || progress.tick())
        .with_context(|| format!("Failed to write {}", output.display()))?;
    progress.finish();
    log::info!("{} rows written to {}", summary.rows, output.display());

    if let Some(field) = options.kind.field() {
        if summary.missing > 0 {
            eprintln!(
                "{} {} component(s) have no '{}' field and were left out",
                "Warning:".yellow(),
                summary.missing,
                field
            );
        }

        if args.summary {
            let grouping = Grouping::new(&components, options.kind.sort_order(), field);
            bom_csv::write_group_summary(&grouping, io::stdout().lock())?;
        }
    }

    eprintln!("{}", "Done.".green());
    Ok(())
}
