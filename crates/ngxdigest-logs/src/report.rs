//! Plain-text rendering of project reports

use ngxdigest_core::{ErrorGroup, ProjectReport, SEPARATOR_WIDTH};

/// Render one project block, or an empty string when nothing was found
pub fn format_report(report: &ProjectReport) -> String {
    if report.total_count == 0 {
        return String::new();
    }

    let total_label = if report.total_count <= 1 {
        "total error"
    } else {
        "total errors"
    };
    let distinct_label = if report.groups.len() <= 1 {
        "distinct error"
    } else {
        "distinct errors"
    };

    let mut out = format!(
        "\n{} ({} {} / {} {})\n{}\n",
        title_case(&report.project),
        report.total_count,
        total_label,
        report.groups.len(),
        distinct_label,
        "-".repeat(SEPARATOR_WIDTH)
    );

    for group in &report.groups {
        out.push_str(&format_group_line(group));
    }

    out
}

/// `   2 x [10:00:01 - 10:05:30] message`
pub fn format_group_line(group: &ErrorGroup) -> String {
    format!(
        "{:>4} x [{} - {}] {}\n",
        group.count, group.first_time, group.last_time, group.message
    )
}

/// Capitalise the first letter of every word, lowercase the rest.
/// A word starts after any non-alphabetic character.
pub fn title_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_word = false;

    for c in name.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use ngxdigest_core::ParsedEntry;

    fn group(count: u64, first: &str, last: &str, message: &str) -> ErrorGroup {
        let mut group = ErrorGroup::first_seen(ParsedEntry::new("2018/03/18", first, message));
        for _ in 1..count {
            group.record(&ParsedEntry::new("2018/03/18", last, message));
        }
        group
    }

    #[test]
    fn test_empty_report_renders_nothing() {
        assert_eq!(format_report(&ProjectReport::empty("shop")), "");
    }

    #[test]
    fn test_singular_labels() {
        let report = ProjectReport::new("shop", 1, vec![group(1, "10:00:01", "10:00:01", "boom")]);
        let text = format_report(&report);

        assert!(text.starts_with("\nShop (1 total error / 1 distinct error)\n"));
        assert!(text.contains(&format!("\n{}\n", "-".repeat(80))));
        assert!(text.ends_with("   1 x [10:00:01 - 10:00:01] boom\n"));
    }

    #[test]
    fn test_plural_labels() {
        let report = ProjectReport::new(
            "shop",
            3,
            vec![
                group(2, "10:00:01", "10:05:30", "Fatal error: DB down"),
                group(1, "11:00:00", "11:00:00", "timed out"),
            ],
        );
        let text = format_report(&report);

        let expected = format!(
            "\nShop (3 total errors / 2 distinct errors)\n{}\n   2 x [10:00:01 - 10:05:30] Fatal error: DB down\n   1 x [11:00:00 - 11:00:00] timed out\n",
            "-".repeat(80)
        );
        assert_eq!(text, expected);
    }

    #[test]
    fn test_many_occurrences_of_one_error() {
        let report = ProjectReport::new("api", 12, vec![group(12, "01:00:00", "02:00:00", "x")]);
        let text = format_report(&report);
        assert!(text.contains("(12 total errors / 1 distinct error)"));
        assert!(text.contains("  12 x [01:00:00 - 02:00:00] x\n"));
    }

    #[test]
    fn test_count_wider_than_four_digits() {
        let line = format_group_line(&group(12345, "a", "b", "m"));
        assert_eq!(line, "12345 x [a - b] m\n");
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("shop"), "Shop");
        assert_eq!(title_case("SHOP"), "Shop");
        assert_eq!(title_case("my-shop_api"), "My-Shop_Api");
        assert_eq!(title_case("v2api"), "V2Api");
        assert_eq!(title_case(""), "");
    }
}
