use std::num::NonZeroU64;

use serde::Serialize;
use tokio::sync::mpsc::Receiver;
use tracing::{info, trace};

use crate::{analytics::Analytics, parser::parse_line};

/// Line tally kept alongside the aggregator.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    pub parsed: u64,
    pub successful: u64,
    pub failed: u64,
}

impl IngestReport {
    fn record(&mut self, ok: bool) {
        self.parsed += 1;
        if ok {
            self.successful += 1;
        } else {
            self.failed += 1;
        }
    }
}

/// Parses one line and feeds it to `analytics`. Returns whether the line
/// was usable.
pub fn process_line(line: &str, analytics: &mut Analytics) -> bool {
    match parse_line(line) {
        Ok(entry) => {
            analytics.add_log(&entry);
            true
        }
        Err(reason) => {
            trace!(%reason, line, "skipping unparseable line");
            false
        }
    }
}

/// Drains `rx` into `analytics`, one line at a time and in arrival order.
/// With a checkpoint interval, an interim summary is logged every that many
/// lines.
pub async fn summarize_lines(
    mut rx: Receiver<Vec<String>>,
    analytics: &mut Analytics,
    checkpoint: Option<NonZeroU64>,
    limit: usize,
) -> IngestReport {
    let mut report = IngestReport::default();
    while let Some(batch) = rx.recv().await {
        for line in batch {
            report.record(process_line(&line, analytics));
            if checkpoint.is_some_and(|every| report.parsed % every.get() == 0) {
                let summary = analytics.summary(limit);
                info!(
                    lines = report.parsed,
                    failed = report.failed,
                    unique_visitors = summary.unique_visitors,
                    top_visitors = ?summary.top_active_visitors,
                    top_urls = ?summary.top_visited_urls,
                    "checkpoint"
                );
            }
        }
    }
    report
}

#[cfg(test)]
mod test {
    use super::*;
    use asserting::prelude::*;
    use tokio::sync::mpsc;

    const GOOD: &str = r#"177.71.128.21 - - [10/Jul/2018:22:21:28 +0200] "GET /intranet-analytics/ HTTP/1.1" 200 3574 "-" "Mozilla/5.0 (X11; U; Linux x86_64; fr-FR) AppleWebKit/534.7 (KHTML, like Gecko) Epiphany/2.30.6 Safari/534.7""#;
    const NO_METHOD: &str = r#"168.41.191.40 - - [09/Jul/2018:10:11:30 +0200] "http://example.net/faq/ HTTP/1.1" 200 3574 "-" "Mozilla/5.0""#;

    #[test]
    fn failed_lines_never_reach_the_aggregator() {
        let mut analytics = Analytics::default();
        assert_that!(process_line(NO_METHOD, &mut analytics)).is_false();
        assert_that!(process_line("", &mut analytics)).is_false();
        assert_that!(analytics.unique_visitors()).is_equal_to(0);
        assert_that!(process_line(GOOD, &mut analytics)).is_true();
        assert_that!(analytics.unique_visitors()).is_equal_to(1);
    }

    #[tokio::test]
    async fn tallies_every_line() {
        let (tx, rx) = mpsc::channel(4);
        tx.send(vec![GOOD.into(), "garbage".into()]).await.unwrap();
        tx.send(vec![NO_METHOD.into(), GOOD.into(), String::new()])
            .await
            .unwrap();
        drop(tx);

        let mut analytics = Analytics::default();
        let report = summarize_lines(rx, &mut analytics, NonZeroU64::new(2), 3).await;
        assert_that!(report).is_equal_to(IngestReport {
            parsed: 5,
            successful: 2,
            failed: 3,
        });
        let summary = analytics.summary(3);
        assert_that!(summary.unique_visitors).is_equal_to(1);
        assert_that!(summary.top_visited_urls).is_equal_to(vec!["/intranet-analytics/".to_string()]);
    }
}
