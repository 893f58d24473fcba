use crate::config::OutputFormat;
use crate::error::AppError;
use nbr_core::GroupCounts;
use serde::Serialize;
use std::io::Write;

/// Result of a single lookup, ready to be written out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    /// Buckets along each axis.
    #[serde(flatten)]
    pub counts: GroupCounts,
    /// Product of the three group counts.
    pub num_groups: u64,
    /// Flat index of the queried offset.
    pub group_index: u64,
    /// Group indices inside the tolerance window, when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compatible_groups: Option<Vec<u64>>,
}

/// Writes lookup reports in one particular format.
pub trait ReportWriter {
    /// Writes `report` in full. Nothing is written if the report cannot be formatted.
    fn write_report(&mut self, report: &Report) -> Result<(), AppError>;
}

/// Line-oriented output: `(x, y, t)`, `NumGroups:  n`, `GroupIndex:  i`.
pub struct TextReportWriter<W: Write> {
    out: W,
}

/// One JSON object per report.
pub struct JsonReportWriter<W: Write> {
    out: W,
}

/// A header row followed by one record per report.
pub struct CsvReportWriter<W: Write> {
    out: W,
}

impl<W: Write> TextReportWriter<W> {
    pub const fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> JsonReportWriter<W> {
    pub const fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> CsvReportWriter<W> {
    pub const fn new(out: W) -> Self {
        Self { out }
    }
}

fn join_indices(indices: &[u64]) -> String {
    indices
        .iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

impl<W: Write> ReportWriter for TextReportWriter<W> {
    fn write_report(&mut self, report: &Report) -> Result<(), AppError> {
        let counts = &report.counts;
        let mut text = format!(
            "({}, {}, {})\nNumGroups:  {}\nGroupIndex:  {}\n",
            counts.x_groups, counts.y_groups, counts.t_groups, report.num_groups, report.group_index
        );
        if let Some(groups) = &report.compatible_groups {
            text.push_str(&format!("CompatibleGroups:  {}\n", join_indices(groups)));
        }
        self.out.write_all(text.as_bytes())?;
        self.out.flush()?;
        Ok(())
    }
}

impl<W: Write> ReportWriter for JsonReportWriter<W> {
    fn write_report(&mut self, report: &Report) -> Result<(), AppError> {
        let json = serde_json::to_string(report)?;
        writeln!(self.out, "{json}")?;
        self.out.flush()?;
        Ok(())
    }
}

impl<W: Write> ReportWriter for CsvReportWriter<W> {
    fn write_report(&mut self, report: &Report) -> Result<(), AppError> {
        let mut writer = csv::Writer::from_writer(&mut self.out);
        let counts = &report.counts;

        let mut header = vec!["x_groups", "y_groups", "t_groups", "num_groups", "group_index"];
        let mut record = vec![
            counts.x_groups.to_string(),
            counts.y_groups.to_string(),
            counts.t_groups.to_string(),
            report.num_groups.to_string(),
            report.group_index.to_string(),
        ];
        if let Some(groups) = &report.compatible_groups {
            header.push("compatible_groups");
            record.push(join_indices(groups));
        }

        writer.write_record(&header)?;
        writer.write_record(&record)?;
        writer.flush()?;
        Ok(())
    }
}

/// Returns the writer for `format`, writing into `out`.
pub fn report_writer<'a, W: Write + 'a>(
    format: OutputFormat,
    out: W,
) -> Box<dyn ReportWriter + 'a> {
    match format {
        OutputFormat::Text => Box::new(TextReportWriter::new(out)),
        OutputFormat::Json => Box::new(JsonReportWriter::new(out)),
        OutputFormat::Csv => Box::new(CsvReportWriter::new(out)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_report(compatible_groups: Option<Vec<u64>>) -> Report {
        Report {
            counts: GroupCounts {
                x_groups: 9,
                y_groups: 9,
                t_groups: 4,
            },
            num_groups: 324,
            group_index: 290,
            compatible_groups,
        }
    }

    fn render(format: OutputFormat, report: &Report) -> String {
        let mut buffer = Vec::new();
        report_writer(format, &mut buffer)
            .write_report(report)
            .unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_text_output() {
        let text = render(OutputFormat::Text, &reference_report(None));
        assert_eq!(text, "(9, 9, 4)\nNumGroups:  324\nGroupIndex:  290\n");
    }

    #[test]
    fn test_text_output_with_window() {
        let text = render(OutputFormat::Text, &reference_report(Some(vec![286, 290])));
        assert!(text.ends_with("GroupIndex:  290\nCompatibleGroups:  286 290\n"));
    }

    #[test]
    fn test_json_output() {
        let json = render(OutputFormat::Json, &reference_report(None));
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["x_groups"], 9);
        assert_eq!(value["t_groups"], 4);
        assert_eq!(value["num_groups"], 324);
        assert_eq!(value["group_index"], 290);
        assert!(value.get("compatible_groups").is_none());
    }

    #[test]
    fn test_csv_output() {
        let csv = render(OutputFormat::Csv, &reference_report(Some(vec![0, 3])));
        assert_eq!(
            csv,
            "x_groups,y_groups,t_groups,num_groups,group_index,compatible_groups\n9,9,4,324,290,0 3\n"
        );
    }
}
