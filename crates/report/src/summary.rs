use extract::{ContactField, HiringStatus, StartupInfo};
use serde::Serialize;

/// How many hiring startups the summary lists before collapsing the rest.
pub const HIRING_DISPLAY_LIMIT: usize = 10;

/// Aggregate statistics over a (possibly partial) result set.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryReport<'a> {
    pub total: usize,
    pub successful: usize,
    pub errors: usize,
    pub hiring_yes: usize,
    pub hiring_no: usize,
    /// Everything that is neither yes nor no, including odd status strings.
    pub hiring_unknown: usize,
    pub with_website: usize,
    pub with_email: usize,
    /// Startups reported as hiring, in input order.
    pub hiring: Vec<&'a StartupInfo>,
}

impl<'a> SummaryReport<'a> {
    /// Returns `None` for an empty result set; there is nothing to analyze.
    pub fn from_results(results: &'a [StartupInfo]) -> Option<Self> {
        if results.is_empty() {
            return None;
        }

        let total = results.len();
        let errors = results.iter().filter(|r| r.is_error()).count();

        let hiring: Vec<&StartupInfo> = results
            .iter()
            .filter(|r| r.hiring() == HiringStatus::Yes)
            .collect();
        let hiring_yes = hiring.len();
        let hiring_no = results
            .iter()
            .filter(|r| r.hiring() == HiringStatus::No)
            .count();

        let with_field = |field: ContactField| {
            results.iter().filter(|r| r.contact_info.has(field)).count()
        };

        Some(Self {
            total,
            successful: total - errors,
            errors,
            hiring_yes,
            hiring_no,
            hiring_unknown: total - hiring_yes - hiring_no,
            with_website: with_field(ContactField::Website),
            with_email: with_field(ContactField::Email),
            hiring,
        })
    }

    /// `count / total`; total is never zero for a built report.
    pub fn ratio(&self, count: usize) -> f64 {
        count as f64 / self.total as f64
    }

    pub fn success_ratio(&self) -> f64 {
        self.ratio(self.successful)
    }

    pub fn error_ratio(&self) -> f64 {
        self.ratio(self.errors)
    }

    pub fn hiring_yes_ratio(&self) -> f64 {
        self.ratio(self.hiring_yes)
    }

    pub fn hiring_no_ratio(&self) -> f64 {
        self.ratio(self.hiring_no)
    }

    pub fn hiring_unknown_ratio(&self) -> f64 {
        self.ratio(self.hiring_unknown)
    }

    pub fn website_ratio(&self) -> f64 {
        self.ratio(self.with_website)
    }

    pub fn email_ratio(&self) -> f64 {
        self.ratio(self.with_email)
    }

    /// The first `limit` hiring startups plus how many were left out.
    pub fn hiring_preview(&self, limit: usize) -> (&[&'a StartupInfo], usize) {
        let shown = self.hiring.len().min(limit);
        (&self.hiring[..shown], self.hiring.len() - shown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn startup(name: &str, status: &str, website: &str) -> StartupInfo {
        let mut info = StartupInfo::unstructured(name, "desc");
        info.hiring_status = status.to_string();
        info.contact_info.website = website.to_string();
        info
    }

    #[test]
    fn test_empty_results_have_nothing_to_analyze() {
        assert!(SummaryReport::from_results(&[]).is_none());
    }

    #[test]
    fn test_counts_and_ratios() {
        let mut with_email = startup("B", "no", "Not found");
        with_email.contact_info.email = "b@b.io".to_string();

        let results = vec![
            startup("A", "YES", "https://a.io"),
            with_email,
            startup("C", "maybe", "https://c.io"),
            StartupInfo::failed("D", "boom"),
        ];

        let report = SummaryReport::from_results(&results).unwrap();

        assert_eq!(report.total, 4);
        assert_eq!(report.successful, 3);
        assert_eq!(report.errors, 1);
        assert_eq!(report.hiring_yes, 1);
        assert_eq!(report.hiring_no, 1);
        assert_eq!(report.hiring_unknown, 2);
        assert_eq!(report.with_website, 2);
        assert_eq!(report.with_email, 1);
        assert_eq!(report.success_ratio(), 0.75);
        assert_eq!(report.error_ratio(), 0.25);
        assert_eq!(report.website_ratio(), 0.5);
        assert_eq!(report.email_ratio(), 0.25);
        assert_eq!(report.hiring_unknown_ratio(), 0.5);
    }

    #[test]
    fn test_unknown_bucket_catches_nonconforming_status() {
        let results = vec![
            startup("A", "", "Not found"),
            startup("B", "Hiring!", "Not found"),
            startup("C", "unknown", "Not found"),
        ];
        let report = SummaryReport::from_results(&results).unwrap();
        assert_eq!(report.hiring_unknown, 3);
        assert_eq!(report.hiring_yes + report.hiring_no, 0);
    }

    #[test]
    fn test_hiring_list_keeps_order_and_caps_preview() {
        let results: Vec<StartupInfo> = (0..13)
            .map(|i| startup(&format!("S{i}"), if i % 2 == 0 { "yes" } else { "Yes" }, "Not found"))
            .chain(std::iter::once(startup("N", "no", "Not found")))
            .collect();

        let report = SummaryReport::from_results(&results).unwrap();
        assert_eq!(report.hiring.len(), 13);
        let names: Vec<&str> = report.hiring.iter().map(|r| r.startup_name.as_str()).collect();
        assert_eq!(names[0], "S0");
        assert_eq!(names[12], "S12");

        let (shown, remaining) = report.hiring_preview(HIRING_DISPLAY_LIMIT);
        assert_eq!(shown.len(), 10);
        assert_eq!(remaining, 3);
        assert_eq!(shown[9].startup_name, "S9");
    }

    #[test]
    fn test_preview_smaller_than_limit() {
        let results = vec![startup("A", "yes", "Not found")];
        let report = SummaryReport::from_results(&results).unwrap();
        let (shown, remaining) = report.hiring_preview(HIRING_DISPLAY_LIMIT);
        assert_eq!(shown.len(), 1);
        assert_eq!(remaining, 0);
    }

    #[test]
    fn test_report_serializes() {
        let results = vec![startup("A", "yes", "https://a.io")];
        let report = SummaryReport::from_results(&results).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["total"], 1);
        assert_eq!(json["hiring"][0]["startup_name"], "A");
    }
}
