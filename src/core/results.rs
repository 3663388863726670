use crate::domain::model::{ResultRow, ResultsSummary};
use crate::utils::error::{CheckError, Result};
use csv::{Terminator, WriterBuilder};
use std::collections::VecDeque;
use tokio::sync::RwLock;

pub const CSV_HEADERS: [&str; 4] = ["Prompt", "Brand", "Mentioned", "Position"];
pub const CSV_FILENAME: &str = "brand_mentions.csv";

/// In-memory results for the running session, newest first.
///
/// Bounded: once `capacity` rows are held, the oldest row is dropped.
pub struct ResultsLog {
    rows: RwLock<VecDeque<ResultRow>>,
    capacity: usize,
}

impl ResultsLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            rows: RwLock::new(VecDeque::new()),
            capacity: capacity.max(1),
        }
    }

    pub async fn record(&self, row: ResultRow) {
        let mut rows = self.rows.write().await;
        rows.push_front(row);
        if rows.len() > self.capacity {
            let dropped = rows.len() - self.capacity;
            rows.truncate(self.capacity);
            tracing::debug!("Results log full, dropped {} oldest row(s)", dropped);
        }
    }

    pub async fn snapshot(&self) -> Vec<ResultRow> {
        self.rows.read().await.iter().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }

    pub async fn to_csv(&self) -> Result<String> {
        let rows = self.rows.read().await;
        write_csv(rows.iter())
    }
}

pub fn summarize<'a>(rows: impl Iterator<Item = &'a ResultRow>) -> ResultsSummary {
    let (mut total, mut mentions_found, mut errors) = (0usize, 0usize, 0usize);
    for row in rows {
        total += 1;
        if row.mentioned {
            mentions_found += 1;
        }
        if row.error {
            errors += 1;
        }
    }

    let mention_rate = if total == 0 {
        0
    } else {
        (mentions_found as f64 * 100.0 / total as f64).round() as u32
    };

    ResultsSummary {
        total,
        mentions_found,
        errors,
        mention_rate,
    }
}

/// Renders rows as `Prompt,Brand,Mentioned,Position` CSV with CRLF line ends.
pub fn write_csv<'a>(rows: impl Iterator<Item = &'a ResultRow>) -> Result<String> {
    let mut writer = WriterBuilder::new()
        .has_headers(true)
        .terminator(Terminator::CRLF)
        .from_writer(Vec::new());

    writer.write_record(CSV_HEADERS)?;

    for row in rows {
        let position = row
            .position
            .map(|p| p.to_string())
            .unwrap_or_else(|| "-".to_string());
        writer.write_record([
            row.prompt.as_str(),
            row.brand.as_str(),
            if row.mentioned { "Yes" } else { "No" },
            position.as_str(),
        ])?;
    }

    let bytes = writer.into_inner().map_err(|e| CheckError::InternalError {
        message: format!("failed to flush CSV writer: {}", e),
    })?;
    String::from_utf8(bytes).map_err(|e| CheckError::InternalError {
        message: format!("CSV output is not UTF-8: {}", e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{CheckOutcome, DetectionResult};

    fn row(prompt: &str, brand: &str, outcome: CheckOutcome) -> ResultRow {
        ResultRow::new(prompt.to_string(), brand.to_string(), &outcome)
    }

    fn mentioned_at(position: u32) -> CheckOutcome {
        CheckOutcome::from_detection(DetectionResult::found_at(position), "text".to_string())
    }

    fn not_mentioned() -> CheckOutcome {
        CheckOutcome::from_detection(DetectionResult::not_found(), "text".to_string())
    }

    #[tokio::test]
    async fn test_rows_are_newest_first() {
        let log = ResultsLog::new(10);
        log.record(row("first", "A", not_mentioned())).await;
        log.record(row("second", "B", mentioned_at(1))).await;

        let rows = log.snapshot().await;
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].prompt, "second");
        assert_eq!(rows[1].prompt, "first");
    }

    #[tokio::test]
    async fn test_capacity_drops_oldest_rows() {
        let log = ResultsLog::new(2);
        for prompt in ["one", "two", "three"] {
            log.record(row(prompt, "A", not_mentioned())).await;
        }

        let prompts: Vec<String> = log.snapshot().await.into_iter().map(|r| r.prompt).collect();
        assert_eq!(prompts, vec!["three", "two"]);
        assert_eq!(log.len().await, 2);
    }

    #[tokio::test]
    async fn test_summary_counts_canned_rows() {
        let log = ResultsLog::new(10);
        assert_eq!(summarize(log.snapshot().await.iter()).mention_rate, 0);
        assert!(log.is_empty().await);

        log.record(row("p1", "A", mentioned_at(2))).await;
        log.record(row("p2", "A", not_mentioned())).await;
        log.record(row("p3", "A", CheckOutcome::canned_unavailable())).await;

        let summary = summarize(log.snapshot().await.iter());
        assert_eq!(summary.total, 3);
        assert_eq!(summary.mentions_found, 1);
        assert_eq!(summary.errors, 1);
        assert_eq!(summary.mention_rate, 33);
    }

    #[tokio::test]
    async fn test_csv_export() {
        let log = ResultsLog::new(10);
        log.record(row("best crm", "Salesforce", mentioned_at(2))).await;
        log.record(row("tools, \"ranked\"", "Zoho", not_mentioned())).await;

        let csv = log.to_csv().await.unwrap();

        assert_eq!(
            csv,
            "Prompt,Brand,Mentioned,Position\r\n\
             \"tools, \"\"ranked\"\"\",Zoho,No,-\r\n\
             best crm,Salesforce,Yes,2\r\n"
        );
    }

    #[test]
    fn test_empty_csv_has_only_headers() {
        let csv = write_csv(std::iter::empty()).unwrap();
        assert_eq!(csv, "Prompt,Brand,Mentioned,Position\r\n");
    }
}
