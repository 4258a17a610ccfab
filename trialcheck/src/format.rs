//! Output formatting for the end-of-run summary
//!
//! The table is written through the status log, so it stays plain text.

use tabled::{settings::Style, Table, Tabled};

use crate::checks::CheckRecord;

/// Format the summary of every check that ran
pub fn format_summary(records: &[CheckRecord]) -> String {
    #[derive(Tabled)]
    struct SummaryRow {
        #[tabled(rename = "Check")]
        category: String,
        #[tabled(rename = "Subject")]
        subject: String,
        #[tabled(rename = "Status")]
        status: String,
        #[tabled(rename = "Detail")]
        detail: String,
    }

    let rows: Vec<SummaryRow> = records
        .iter()
        .map(|r| SummaryRow {
            category: r.category.to_string(),
            subject: r.subject.clone(),
            status: if r.healthy { "OK" } else { "ISSUE" }.to_string(),
            detail: r.detail.clone(),
        })
        .collect();

    let table = Table::new(rows).with(Style::rounded()).to_string();
    format!("Summary of checks:\n{}", table)
}

/// Closing line of the run
pub fn format_verdict(records: &[CheckRecord]) -> String {
    let issues = records.iter().filter(|r| !r.healthy).count();
    match issues {
        0 => "All checks passed.".to_string(),
        1 => "1 check reported an issue. Record it and refer to the Trial Instructions.".to_string(),
        n => format!(
            "{} checks reported issues. Record them and refer to the Trial Instructions.",
            n
        ),
    }
}
