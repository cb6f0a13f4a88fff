//! Deduplication of parsed entries into distinct-message groups

use ngxdigest_core::{ErrorGroup, ParsedEntry, ProjectReport};
use std::collections::HashMap;

/// Folds one project's entries into groups keyed by exact message text.
///
/// Groups keep first-seen order; the index only speeds up lookups.
#[derive(Debug, Default)]
pub struct Aggregator {
    project: String,
    groups: Vec<ErrorGroup>,
    index: HashMap<String, usize>,
    total: u64,
}

impl Aggregator {
    pub fn new(project: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            ..Default::default()
        }
    }

    /// Record one occurrence
    pub fn push(&mut self, entry: ParsedEntry) {
        self.total += 1;

        match self.index.get(&entry.message) {
            Some(&position) => self.groups[position].record(&entry),
            None => {
                self.index.insert(entry.message.clone(), self.groups.len());
                self.groups.push(ErrorGroup::first_seen(entry));
            }
        }
    }

    /// Finish the fold once the input is exhausted
    pub fn finish(self) -> ProjectReport {
        ProjectReport::new(self.project, self.total, self.groups)
    }
}

impl Extend<ParsedEntry> for Aggregator {
    fn extend<I: IntoIterator<Item = ParsedEntry>>(&mut self, entries: I) {
        for entry in entries {
            self.push(entry);
        }
    }
}

/// Aggregate a whole stream of entries for one project
pub fn aggregate<I>(project: &str, entries: I) -> ProjectReport
where
    I: IntoIterator<Item = ParsedEntry>,
{
    let mut aggregator = Aggregator::new(project);
    aggregator.extend(entries);
    aggregator.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(time: &str, message: &str) -> ParsedEntry {
        ParsedEntry::new("2018/03/18", time, message)
    }

    #[test]
    fn test_empty_stream() {
        let report = aggregate("shop", Vec::<ParsedEntry>::new());
        assert_eq!(report.project, "shop");
        assert_eq!(report.total_count, 0);
        assert!(report.groups.is_empty());
    }

    #[test]
    fn test_insertion_order_and_counts() {
        let report = aggregate(
            "shop",
            vec![
                entry("10:00:00", "A"),
                entry("10:00:01", "B"),
                entry("10:00:02", "A"),
                entry("10:00:03", "C"),
                entry("10:00:04", "B"),
            ],
        );

        let messages: Vec<&str> = report.groups.iter().map(|g| g.message.as_str()).collect();
        let counts: Vec<u64> = report.groups.iter().map(|g| g.count).collect();
        assert_eq!(messages, vec!["A", "B", "C"]);
        assert_eq!(counts, vec![2, 2, 1]);
        assert_eq!(report.total_count, 5);

        assert_eq!(report.groups[0].first_time, "10:00:00");
        assert_eq!(report.groups[0].last_time, "10:00:02");
        assert_eq!(report.groups[2].first_time, "10:00:03");
        assert_eq!(report.groups[2].last_time, "10:00:03");
    }

    #[test]
    fn test_exact_message_equality() {
        let report = aggregate(
            "shop",
            vec![
                entry("10:00:00", "Fatal error: x"),
                entry("10:00:01", "fatal error: x"),
                entry("10:00:02", "Fatal error: x "),
                entry("10:00:03", "Fatal error: x"),
            ],
        );

        assert_eq!(report.distinct_count(), 3);
        assert_eq!(report.groups[0].count, 2);
        assert_eq!(report.total_count, 4);
    }

    #[test]
    fn test_total_equals_sum_of_counts() {
        let mut aggregator = Aggregator::new("shop");
        for i in 0..50 {
            aggregator.push(entry("10:00:00", &format!("msg {}", i % 7)));
        }
        let report = aggregator.finish();
        assert_eq!(report.total_count, 50);
        assert_eq!(report.distinct_count(), 7);
        assert_eq!(report.groups.iter().map(|g| g.count).sum::<u64>(), 50);
    }

    #[test]
    fn test_group_keeps_first_date() {
        let report = aggregate(
            "shop",
            vec![
                ParsedEntry::new("2018/03/17", "23:59:59", "A"),
                ParsedEntry::new("2018/03/18", "00:00:01", "A"),
            ],
        );
        assert_eq!(report.groups[0].date, "2018/03/17");
        assert_eq!(report.groups[0].last_time, "00:00:01");
    }
}
