use clap::ValueEnum;
use num_format::{Locale, ToFormattedString};
use serde::Serialize;

use crate::{analytics::Summary, worker::IngestReport};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Serialize)]
struct Rendered<'a> {
    report: &'a IngestReport,
    summary: &'a Summary,
}

pub fn render(
    format: OutputFormat,
    report: &IngestReport,
    summary: &Summary,
    limit: usize,
) -> serde_json::Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(report, summary, limit)),
        OutputFormat::Json => serde_json::to_string_pretty(&Rendered { report, summary }),
    }
}

pub fn render_text(report: &IngestReport, summary: &Summary, limit: usize) -> String {
    let count = |n: u64| n.to_formatted_string(&Locale::en);
    format!(
        "Parsed:     {}\n\
         Successful: {}\n\
         Failed:     {}\n\
         \n\
         Stats:\n\
         Unique Visits:   {}\n\
         Top {limit} Visitors:  {}\n\
         Top {limit} Urls:      {}\n",
        count(report.parsed),
        count(report.successful),
        count(report.failed),
        summary.unique_visitors.to_formatted_string(&Locale::en),
        summary.top_active_visitors.join(" | "),
        summary.top_visited_urls.join(" | "),
    )
}
