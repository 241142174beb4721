//! Report formatters
//!
//! Console, JSON, and CSV renderings of a ranking report. The formatter is
//! picked from output configuration; all three render the same assembled
//! rows.

use crate::config::{OutputConfig, OutputFormat};
use crate::error::Result;
use crate::output::report::{Bucket, RankingReport};
use colored::{Color, Colorize};

pub trait ReportFormatter {
    fn format(&self, report: &RankingReport) -> Result<String>;
}

/// Formatter matching the configured output format.
pub fn formatter_for(output: &OutputConfig) -> Box<dyn ReportFormatter> {
    match output.format {
        OutputFormat::Console => Box::new(ConsoleFormatter {
            use_colors: output.color_output,
            precision: output.precision,
        }),
        OutputFormat::Json => Box::new(JsonFormatter { pretty: true }),
        OutputFormat::Csv => Box::new(CsvFormatter {
            precision: output.precision,
        }),
    }
}

/// Human-facing table per job, with scores colored by bucket.
pub struct ConsoleFormatter {
    use_colors: bool,
    precision: usize,
}

impl ConsoleFormatter {
    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn bucket_color(bucket: Bucket) -> Color {
        match bucket {
            Bucket::Hired => Color::Green,
            Bucket::Shortlist => Color::Cyan,
            Bucket::Review => Color::Yellow,
            Bucket::Rejected => Color::Red,
        }
    }
}

impl ReportFormatter for ConsoleFormatter {
    fn format(&self, report: &RankingReport) -> Result<String> {
        let mut out = String::new();

        out.push_str(&format!(
            "Candidate ranking: {} jobs, {} rows\n",
            report.jobs.len(),
            report.total_rows()
        ));
        out.push_str(&format!(
            "Generated {} in {}ms\n",
            report.generated_at.to_rfc3339(),
            report.elapsed_ms
        ));

        for job in &report.jobs {
            out.push_str(&format!("\nJob {}\n", job.jd_id));
            if job.rows.is_empty() {
                out.push_str("  (no candidates ranked)\n");
                continue;
            }
            for (position, row) in job.rows.iter().enumerate() {
                let score = format!("{:.p$}", row.match_score, p = self.precision);
                out.push_str(&format!(
                    "  {:>3}. {:<24} {}  {:<9}  {}\n",
                    position + 1,
                    row.candidate_id,
                    self.colorize(&score, Self::bucket_color(row.bucket)),
                    row.bucket.to_string(),
                    row.rationale
                ));
            }
        }

        if !report.skipped.is_empty() {
            out.push_str("\nSkipped records:\n");
            for skipped in &report.skipped {
                out.push_str(&format!("  {}: {}\n", skipped.id, skipped.reason));
            }
        }

        if !report.failures.is_empty() {
            out.push_str("\nFailed jobs:\n");
            for failure in &report.failures {
                out.push_str(&format!("  {}: {}\n", failure.jd_id, failure.reason));
            }
        }

        Ok(out)
    }
}

/// Structured report for downstream tooling.
pub struct JsonFormatter {
    pretty: bool,
}

impl ReportFormatter for JsonFormatter {
    fn format(&self, report: &RankingReport) -> Result<String> {
        let rendered = if self.pretty {
            serde_json::to_string_pretty(report)?
        } else {
            serde_json::to_string(report)?
        };
        Ok(rendered)
    }
}

/// Flat rows, one line per ranked candidate across all jobs.
pub struct CsvFormatter {
    precision: usize,
}

impl CsvFormatter {
    fn field(value: &str) -> String {
        if value.contains([',', '"', '\n']) {
            format!("\"{}\"", value.replace('"', "\"\""))
        } else {
            value.to_string()
        }
    }
}

impl ReportFormatter for CsvFormatter {
    fn format(&self, report: &RankingReport) -> Result<String> {
        let mut out = String::from("candidate_id,jd_id,match_score,bucket\n");
        for job in &report.jobs {
            for row in &job.rows {
                out.push_str(&format!(
                    "{},{},{:.p$},{}\n",
                    Self::field(&row.candidate_id),
                    Self::field(&row.jd_id),
                    row.match_score,
                    row.bucket,
                    p = self.precision
                ));
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::report::{JobFailure, JobRanking, RankedRow, SkippedRecord};
    use chrono::Utc;

    fn report() -> RankingReport {
        RankingReport {
            generated_at: Utc::now(),
            elapsed_ms: 7,
            jobs: vec![
                JobRanking {
                    jd_id: "backend".to_string(),
                    rows: vec![
                        RankedRow {
                            candidate_id: "c1".to_string(),
                            jd_id: "backend".to_string(),
                            match_score: 0.8567,
                            bucket: Bucket::Hired,
                            rationale: "semantic 0.9000, skill overlap 0.6667, experience fit 1.0000"
                                .to_string(),
                        },
                        RankedRow {
                            candidate_id: "c2".to_string(),
                            jd_id: "backend".to_string(),
                            match_score: 0.4012,
                            bucket: Bucket::Review,
                            rationale: "semantic 0.5000, skill overlap 0.0000, experience fit 0.5000"
                                .to_string(),
                        },
                    ],
                },
                JobRanking {
                    jd_id: "data".to_string(),
                    rows: Vec::new(),
                },
            ],
            skipped: vec![SkippedRecord {
                id: "bad.json".to_string(),
                reason: "malformed JSON".to_string(),
            }],
            failures: vec![JobFailure {
                jd_id: "ml".to_string(),
                reason: "similarity index unavailable: timeout".to_string(),
            }],
        }
    }

    #[test]
    fn console_lists_rows_skips_and_failures() {
        let formatter = ConsoleFormatter {
            use_colors: false,
            precision: 4,
        };
        let rendered = formatter.format(&report()).unwrap();

        assert!(rendered.contains("Job backend"));
        assert!(rendered.contains("c1"));
        assert!(rendered.contains("0.8567"));
        assert!(rendered.contains("Hired"));
        assert!(rendered.contains("(no candidates ranked)"));
        assert!(rendered.contains("bad.json: malformed JSON"));
        assert!(rendered.contains("ml: similarity index unavailable"));
    }

    #[test]
    fn console_without_colors_emits_no_escape_codes() {
        let formatter = ConsoleFormatter {
            use_colors: false,
            precision: 4,
        };
        let rendered = formatter.format(&report()).unwrap();
        assert!(!rendered.contains('\u{1b}'));
    }

    #[test]
    fn json_round_trips_as_structured_data() {
        let formatter = JsonFormatter { pretty: true };
        let rendered = formatter.format(&report()).unwrap();

        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(value["jobs"][0]["jd_id"], "backend");
        assert_eq!(value["jobs"][0]["rows"][0]["candidate_id"], "c1");
        assert_eq!(value["failures"][0]["jd_id"], "ml");
    }

    #[test]
    fn csv_emits_header_and_one_line_per_row() {
        let formatter = CsvFormatter { precision: 4 };
        let rendered = formatter.format(&report()).unwrap();

        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "candidate_id,jd_id,match_score,bucket");
        assert_eq!(lines[1], "c1,backend,0.8567,Hired");
        assert_eq!(lines[2], "c2,backend,0.4012,Review");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn csv_quotes_fields_with_commas() {
        assert_eq!(CsvFormatter::field("plain"), "plain");
        assert_eq!(CsvFormatter::field("a,b"), "\"a,b\"");
        assert_eq!(CsvFormatter::field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }
}
