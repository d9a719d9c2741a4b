use std::fs::File;
use std::io::Write;
use std::path::Path;

use atomicwrites::{AtomicFile, OverwriteBehavior};
use kicad_netlist::{quote, Component};

use crate::{Grouping, ReportError, ReportKind, ReportOptions, Result, Separator};

/// What a render produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReportSummary {
    /// Data rows written, header excluded
    pub rows: usize,
    /// Components left out because the grouping field was absent or empty
    pub missing: usize,
}

/// Render the report into `path`. A previous file there is replaced only
/// once every row has been written.
pub fn write_report(
    components: &[Component],
    options: &ReportOptions,
    path: &Path,
    tick: impl FnMut(),
) -> Result<ReportSummary> {
    let summary = write_atomically(path, |file| render(components, options, file, tick))?;
    log::debug!("Wrote {} rows to {}", summary.rows, path.display());
    Ok(summary)
}

/// Write into a temporary file next to `path` and rename it into place on success
fn write_atomically<T>(path: &Path, write: impl FnOnce(&mut File) -> Result<T>) -> Result<T> {
    AtomicFile::new(path, OverwriteBehavior::AllowOverwrite)
        .write(write)
        .map_err(|e| match e {
            atomicwrites::Error::Internal(e) => ReportError::Io(e),
            atomicwrites::Error::User(e) => e,
        })
}

/// Render the report selected by `options` into `writer`
pub fn render<W: Write>(
    components: &[Component],
    options: &ReportOptions,
    writer: W,
    tick: impl FnMut(),
) -> Result<ReportSummary> {
    let separator = options.separator;
    match &options.kind {
        ReportKind::Flat => write_flat(components, separator, writer),
        ReportKind::Grouped { field, show_refs } => {
            let grouping = Grouping::new(components, options.kind.sort_order(), field);
            write_grouped(&grouping, separator, *show_refs, writer, tick)
        }
        ReportKind::Assembly { field } => {
            let grouping = Grouping::new(components, options.kind.sort_order(), field);
            write_assembly(&grouping, separator, writer, tick)
        }
    }
}

/// Joins already-quoted fields with the separator and ends each row with `\n`.
///
/// The csv writer only takes a byte delimiter, so a separator outside ASCII
/// is written between the fields directly.
enum RowWriter<W: Write> {
    Csv(csv::Writer<W>),
    Joined { writer: W, separator: char },
}

impl<W: Write> RowWriter<W> {
    fn new(separator: Separator, writer: W) -> Self {
        match separator.as_byte() {
            Some(delimiter) => RowWriter::Csv(
                csv::WriterBuilder::new()
                    .delimiter(delimiter)
                    .quote_style(csv::QuoteStyle::Never)
                    .terminator(csv::Terminator::Any(b'\n'))
                    .from_writer(writer),
            ),
            None => RowWriter::Joined {
                writer,
                separator: separator.as_char(),
            },
        }
    }

    fn write_row<I>(&mut self, fields: I) -> Result<()>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        match self {
            RowWriter::Csv(csv) => {
                for field in fields {
                    csv.write_field(field.as_ref())?;
                }
                csv.write_record(None::<&[u8]>)?;
            }
            RowWriter::Joined { writer, separator } => {
                for (i, field) in fields.into_iter().enumerate() {
                    if i > 0 {
                        write!(writer, "{separator}")?;
                    }
                    writer.write_all(field.as_ref().as_bytes())?;
                }
                writer.write_all(b"\n")?;
            }
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        match self {
            RowWriter::Csv(csv) => csv.flush()?,
            RowWriter::Joined { writer, .. } => writer.flush()?,
        }
        Ok(())
    }
}

/// One row per component: reference, value, footprint, datasheet
pub fn write_flat<W: Write>(
    components: &[Component],
    separator: Separator,
    writer: W,
) -> Result<ReportSummary> {
    let mut rows = RowWriter::new(separator, writer);
    for component in components {
        rows.write_row(component.csv_fields())?;
    }
    rows.flush()?;

    Ok(ReportSummary {
        rows: components.len(),
        missing: 0,
    })
}

/// One row per group: key and member count, optionally followed by the
/// space-separated member references
pub fn write_grouped<W: Write>(
    grouping: &Grouping,
    separator: Separator,
    show_refs: bool,
    writer: W,
    mut tick: impl FnMut(),
) -> Result<ReportSummary> {
    let mut rows = RowWriter::new(separator, writer);
    for group in grouping.iter() {
        let mut record = vec![quote(group.key), group.len().to_string()];
        if show_refs {
            record.push(quote(&group.references().collect::<Vec<_>>().join(" ")));
        }
        rows.write_row(&record)?;
        tick();
    }
    rows.flush()?;

    Ok(ReportSummary {
        rows: grouping.len(),
        missing: grouping.missing,
    })
}

/// Header plus one row per group: value, designators, footprint, key
pub fn write_assembly<W: Write>(
    grouping: &Grouping,
    separator: Separator,
    writer: W,
    mut tick: impl FnMut(),
) -> Result<ReportSummary> {
    let mut rows = RowWriter::new(separator, writer);
    rows.write_row(["Comment", "Designator", "Footprint", grouping.field.as_str()])?;

    let joiner = separator.to_string();
    for group in grouping.iter() {
        let Some(first) = group.first() else {
            continue;
        };
        let designators = group.references().collect::<Vec<_>>().join(joiner.as_str());
        rows.write_row([
            quote(first.value()),
            quote(&designators),
            quote(first.footprint()),
            quote(group.key),
        ])?;
        tick();
    }
    rows.flush()?;

    Ok(ReportSummary {
        rows: grouping.len(),
        missing: grouping.missing,
    })
}

/// Human-readable listing: `N x key` followed by the indented member references
pub fn write_group_summary<W: Write>(grouping: &Grouping, mut writer: W) -> std::io::Result<()> {
    for group in grouping.iter() {
        writeln!(writer, "{} x {}", group.len(), group.key)?;
        for reference in group.references() {
            writeln!(writer, "    {reference}")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SortOrder;

    fn components() -> Vec<Component> {
        vec![
            Component::new("R1", "10k")
                .with_footprint("R_0603")
                .with_field("Supplier", "X"),
            Component::new("R2", "10k")
                .with_footprint("R_0603")
                .with_field("Supplier", "X"),
            Component::new("R3", "1k").with_footprint("R_0402"),
        ]
    }

    fn render_to_string(
        components: &[Component],
        options: &ReportOptions,
    ) -> (String, ReportSummary) {
        let mut out = Vec::new();
        let summary = render(components, options, &mut out, || {}).unwrap();
        (String::from_utf8(out).unwrap(), summary)
    }

    fn grouped(field: &str, show_refs: bool) -> ReportOptions {
        ReportOptions {
            kind: ReportKind::Grouped {
                field: field.to_string(),
                show_refs,
            },
            ..Default::default()
        }
    }

    fn assembly(field: &str) -> ReportOptions {
        ReportOptions {
            kind: ReportKind::Assembly {
                field: field.to_string(),
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_flat() {
        let components = vec![
            Component::new("C1", "100n")
                .with_footprint("C_0402")
                .with_datasheet("~"),
            Component::new("", "1k"),
        ];
        let (csv, summary) = render_to_string(&components, &ReportOptions::default());

        assert_eq!(csv, "\"C1\",\"100n\",\"C_0402\",\"~\"\n\"\",\"1k\",\"\",\"\"\n");
        assert_eq!(summary.rows, 2);
        assert_eq!(summary.missing, 0);
    }

    #[test]
    fn test_flat_empty() {
        let (csv, summary) = render_to_string(&[], &ReportOptions::default());
        assert_eq!(csv, "");
        assert_eq!(summary, ReportSummary::default());
    }

    #[test]
    fn test_grouped() {
        let (csv, summary) = render_to_string(&components(), &grouped("Supplier", false));

        assert_eq!(csv, "\"X\",2\n");
        assert_eq!(summary.rows, 1);
        assert_eq!(summary.missing, 1);
    }

    #[test]
    fn test_grouped_show_refs() {
        let (csv, _) = render_to_string(&components(), &grouped("Supplier", true));
        assert_eq!(csv, "\"X\",2,\"R1 R2\"\n");
    }

    #[test]
    fn test_assembly() {
        let (csv, summary) = render_to_string(&components(), &assembly("Supplier"));

        assert_eq!(
            csv,
            "Comment,Designator,Footprint,Supplier\n\"10k\",\"R1,R2\",\"R_0603\",\"X\"\n"
        );
        assert_eq!(summary.rows, 1);
        assert_eq!(summary.missing, 1);
    }

    #[test]
    fn test_assembly_alphanumeric_designators() {
        let components = vec![
            Component::new("C10", "100n").with_field("Value", "100n"),
            Component::new("C2", "100n").with_field("Value", "100n"),
            Component::new("C1", "100n").with_field("Value", "100n"),
        ];
        let (csv, _) = render_to_string(&components, &assembly("Value"));

        assert_eq!(
            csv,
            "Comment,Designator,Footprint,Value\n\"100n\",\"C1,C2,C10\",\"\",\"100n\"\n"
        );
    }

    #[test]
    fn test_assembly_header_only() {
        let (csv, summary) = render_to_string(&[], &assembly("Supplier"));
        assert_eq!(csv, "Comment,Designator,Footprint,Supplier\n");
        assert_eq!(summary.rows, 0);
    }

    #[test]
    fn test_separator_changes_only_joiner() {
        let options = ReportOptions {
            separator: ";".parse().unwrap(),
            ..assembly("Supplier")
        };
        let (csv, _) = render_to_string(&components(), &options);

        assert_eq!(
            csv,
            "Comment;Designator;Footprint;Supplier\n\"10k\";\"R1;R2\";\"R_0603\";\"X\"\n"
        );

        let options = ReportOptions {
            separator: ";".parse().unwrap(),
            ..Default::default()
        };
        let (csv, _) = render_to_string(&components()[..1], &options);
        assert_eq!(csv, "\"R1\";\"10k\";\"R_0603\";\"\"\n");
    }

    #[test]
    fn test_non_ascii_separator() {
        let options = ReportOptions {
            separator: "§".parse().unwrap(),
            ..assembly("Supplier")
        };
        let (csv, _) = render_to_string(&components(), &options);

        assert_eq!(
            csv,
            "Comment§Designator§Footprint§Supplier\n\"10k\"§\"R1§R2\"§\"R_0603\"§\"X\"\n"
        );

        let options = ReportOptions {
            separator: "§".parse().unwrap(),
            ..grouped("Supplier", true)
        };
        let (csv, _) = render_to_string(&components(), &options);
        assert_eq!(csv, "\"X\"§2§\"R1 R2\"\n");

        let options = ReportOptions {
            separator: "§".parse().unwrap(),
            ..Default::default()
        };
        let (csv, _) = render_to_string(&components()[..1], &options);
        assert_eq!(csv, "\"R1\"§\"10k\"§\"R_0603\"§\"\"\n");
    }

    #[test]
    fn test_embedded_quotes_not_escaped() {
        let components = vec![Component::new("J1", "2\" header")];
        let (csv, _) = render_to_string(&components, &ReportOptions::default());
        assert_eq!(csv, "\"J1\",\"2\" header\",\"\",\"\"\n");
    }

    #[test]
    fn test_tick_per_group() {
        let components = vec![
            Component::new("R1", "1k").with_field("Value", "1k"),
            Component::new("R2", "2k").with_field("Value", "2k"),
            Component::new("R3", "1k").with_field("Value", "1k"),
        ];

        let mut ticks = 0;
        render(&components, &grouped("Value", false), std::io::sink(), || ticks += 1).unwrap();
        assert_eq!(ticks, 2);
    }

    #[test]
    fn test_write_report_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bom.csv");
        std::fs::write(&path, "stale contents\n").unwrap();

        let summary =
            write_report(&components(), &grouped("Supplier", false), &path, || {}).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "\"X\",2\n");
        assert_eq!(summary.missing, 1);
    }

    #[test]
    fn test_write_report_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");

        write_report(&[], &ReportOptions::default(), &path, || {}).unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_write_report_bad_destination() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing-dir").join("bom.csv");

        let result = write_report(&components(), &ReportOptions::default(), &path, || {});
        assert!(matches!(result, Err(crate::ReportError::Io(_))));
    }

    #[test]
    fn test_failed_write_keeps_previous_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bom.csv");
        std::fs::write(&path, "\"X\",2\n").unwrap();

        let result: Result<()> = write_atomically(&path, |file| {
            file.write_all(b"\"Y\",")?;
            Err(ReportError::Io(std::io::Error::other("disk full")))
        });

        assert!(matches!(result, Err(ReportError::Io(_))));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "\"X\",2\n");
    }

    #[test]
    fn test_group_summary() {
        let components = components();
        let grouping = Grouping::new(&components, SortOrder::Reference, "Supplier");

        let mut out = Vec::new();
        write_group_summary(&grouping, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "2 x X\n    R1\n    R2\n");
    }
}
