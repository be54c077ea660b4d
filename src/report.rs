use crate::checklist::{AUTOMATED_SECTIONS, MANUAL_SECTIONS};
use crate::model::{CheckStatus, ManualVerdict, ReportFilter, ResultsDocument, StatusTotals};

fn status_glyph(status: CheckStatus) -> &'static str {
    match status {
        CheckStatus::Pass => "[PASS]",
        CheckStatus::Fail => "[FAIL]",
        CheckStatus::Warn => "[WARN]",
    }
}

/// Unset and N/A manual items count as pending and only appear in the full
/// report.
fn manual_status(verdict: ManualVerdict) -> Option<CheckStatus> {
    match verdict {
        ManualVerdict::Pass => Some(CheckStatus::Pass),
        ManualVerdict::Fail => Some(CheckStatus::Fail),
        ManualVerdict::Na | ManualVerdict::Unset => None,
    }
}

pub fn generate_report(
    document: &ResultsDocument,
    filter: ReportFilter,
    generated_at: &str,
) -> String {
    let mut lines = vec![
        format!("# Launch Checklist Report — {}", filter.label()),
        format!("Generated: {generated_at}"),
        String::new(),
    ];

    for (section_id, title) in AUTOMATED_SECTIONS {
        let checks = document.section(section_id);
        let matching = checks
            .iter()
            .filter(|check| filter.includes(Some(check.status)))
            .collect::<Vec<_>>();
        if filter != ReportFilter::All && matching.is_empty() {
            continue;
        }

        let totals = StatusTotals::of(checks);
        lines.push(format!("## Section {section_id}: {title}"));
        lines.push(format!("**{}/{} passed**", totals.pass, checks.len()));
        lines.push(String::new());
        for check in matching {
            lines.push(format!("- {} {}", status_glyph(check.status), check.label));
            if check.status != CheckStatus::Pass && !check.detail.is_empty() {
                lines.push(format!("  - {}", check.detail));
            }
        }
        lines.push(String::new());
    }

    for section in MANUAL_SECTIONS {
        let items = section
            .items
            .iter()
            .enumerate()
            .filter_map(|(index, item)| {
                let verdict = document
                    .manual
                    .get(&section.item_key(index))
                    .copied()
                    .unwrap_or_default();
                filter
                    .includes(manual_status(verdict))
                    .then(|| format!("- {} {item}", verdict.report_glyph()))
            })
            .collect::<Vec<String>>();
        if filter != ReportFilter::All && items.is_empty() {
            continue;
        }

        lines.push(format!("## Section {}: {}", section.id, section.title));
        lines.extend(items);
        lines.push(String::new());
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::generate_report;
    use crate::model::{CheckResult, CheckStatus, ManualVerdict, ReportFilter, ResultsDocument};

    fn sample_document() -> ResultsDocument {
        let mut document = ResultsDocument::default();
        document.sections.insert(
            "1".to_string(),
            vec![CheckResult::new(
                "1.1.npm-build",
                "npm run build completes with exit code 0",
                CheckStatus::Pass,
                "Build succeeded",
            )],
        );
        document.sections.insert(
            "2".to_string(),
            vec![
                CheckResult::new(
                    "2.1.has-title",
                    "Every page has a <title> tag",
                    CheckStatus::Pass,
                    "All pages have titles",
                ),
                CheckResult::new(
                    "2.1.unique-titles",
                    "No duplicate titles",
                    CheckStatus::Fail,
                    "1 duplicate titles",
                ),
                CheckResult::new(
                    "2.1.title-length",
                    "All titles under 60 characters",
                    CheckStatus::Warn,
                    "2 titles over 60 chars",
                ),
            ],
        );
        document.manual.insert("6.0".to_string(), ManualVerdict::Pass);
        document.manual.insert("8.1".to_string(), ManualVerdict::Fail);
        document.manual.insert("9.0".to_string(), ManualVerdict::Na);
        document
    }

    #[test]
    fn fail_filter_has_no_passing_lines_and_skips_empty_sections() {
        let report = generate_report(&sample_document(), ReportFilter::Fail, "2026-01-01T00:00:00Z");

        assert!(report.starts_with("# Launch Checklist Report — Failures Only"));
        assert!(!report.contains("[PASS]"));
        assert!(!report.contains("[WARN]"));
        assert!(!report.contains("## Section 1:"));
        assert!(report.contains("## Section 2: On-Page SEO"));
        assert!(report.contains("- [FAIL] No duplicate titles\n  - 1 duplicate titles"));
        assert!(report.contains("## Section 8: Security & Headers"));
        assert!(!report.contains("## Section 6:"));
        assert!(!report.contains("[N/A]"));
    }

    #[test]
    fn full_report_lists_every_section_with_pass_counts() {
        let report = generate_report(&sample_document(), ReportFilter::All, "2026-01-01T00:00:00Z");

        assert!(report.contains("Generated: 2026-01-01T00:00:00Z"));
        assert!(report.contains("## Section 2: On-Page SEO\n**1/3 passed**"));
        assert!(report.contains("## Section 5: Content Quality\n**0/0 passed**"));
        assert!(report.contains("- [PASS] Every page has a <title> tag\n"));
        assert!(!report.contains("All pages have titles"));
        assert!(report.contains("- [N/A] Tab reaches all interactive elements"));
        assert!(report.contains("- [ ] Focus indicators visible"));
        assert!(report.contains("## Section 12: Google Search Console"));
    }

    #[test]
    fn issues_filter_keeps_failures_and_warnings() {
        let report = generate_report(&sample_document(), ReportFilter::Issues, "now");

        assert!(report.contains("- [FAIL] No duplicate titles"));
        assert!(report.contains("- [WARN] All titles under 60 characters"));
        assert!(!report.contains("[PASS]"));
    }
}
