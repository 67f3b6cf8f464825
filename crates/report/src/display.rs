use std::fmt::Write;

use extract::{ContactField, HiringStatus, StartupInfo};

use crate::summary::{HIRING_DISPLAY_LIMIT, SummaryReport};

pub const NOTHING_TO_ANALYZE: &str = "No results to analyze.";

fn hiring_emoji(status: HiringStatus) -> &'static str {
    match status {
        HiringStatus::Yes => "✅",
        HiringStatus::No => "❌",
        HiringStatus::Unknown => "❓",
    }
}

fn contact_emoji(field: ContactField) -> &'static str {
    match field {
        ContactField::Website => "🌐",
        ContactField::Email => "📧",
        ContactField::Linkedin => "💼",
        ContactField::Twitter => "🐦",
        ContactField::Other => "📱",
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

fn percent(ratio: f64) -> String {
    format!("{:.1}%", ratio * 100.0)
}

/// Full card for a single startup.
pub fn render_startup(info: &StartupInfo) -> String {
    let rule = "=".repeat(50);
    let mut out = String::new();

    let _ = writeln!(out, "\n{rule}");
    let _ = writeln!(out, "STARTUP: {}", info.startup_name);
    let _ = writeln!(out, "{rule}");

    if let Some(error) = &info.error {
        let _ = writeln!(out, "❌ Error: {error}");
        return out;
    }

    let _ = writeln!(out, "\n📋 DESCRIPTION:");
    let _ = writeln!(out, "   {}", info.description);

    if !info.keywords.is_empty() {
        let _ = writeln!(out, "\n🏷️  KEYWORDS:");
        let _ = writeln!(out, "   {}", info.keywords.join(", "));
    }

    let _ = writeln!(out, "\n💼 HIRING STATUS:");
    let _ = writeln!(
        out,
        "   {} {}",
        hiring_emoji(info.hiring()),
        capitalize(&info.hiring_status)
    );

    let _ = writeln!(out, "\n📞 CONTACT INFORMATION:");
    for field in ContactField::ALL {
        if let Some(value) = info.contact_info.found(field) {
            let _ = writeln!(
                out,
                "   {} {}: {}",
                contact_emoji(field),
                capitalize(field.key()),
                value
            );
        }
    }
    for (key, value) in &info.contact_info.extra {
        let value = value.as_str().map_or_else(|| value.to_string(), str::to_string);
        let _ = writeln!(out, "   📱 {}: {}", capitalize(key), value);
    }

    out
}

/// Short status lines printed after each startup of a batch.
pub fn render_progress(info: &StartupInfo) -> String {
    if let Some(error) = &info.error {
        return format!("   ❌ Error: {error}");
    }

    let mut out = format!(
        "   {} Hiring: {}",
        hiring_emoji(info.hiring()),
        info.hiring_status
    );
    if info.contact_info.has(ContactField::Website) {
        let _ = write!(out, "\n   🌐 Website: {}", info.contact_info.website);
    }
    out
}

pub fn render_summary(report: Option<&SummaryReport<'_>>) -> String {
    let Some(report) = report else {
        return NOTHING_TO_ANALYZE.to_string();
    };

    let mut out = String::new();
    let _ = writeln!(out, "\n📊 SUMMARY REPORT");
    let _ = writeln!(out, "{}", "=".repeat(50));

    let _ = writeln!(out, "📈 Processing Stats:");
    let _ = writeln!(out, "   Total startups: {}", report.total);
    let _ = writeln!(
        out,
        "   Successful: {} ({})",
        report.successful,
        percent(report.success_ratio())
    );
    let _ = writeln!(out, "   Errors: {} ({})", report.errors, percent(report.error_ratio()));

    let _ = writeln!(out, "\n💼 Hiring Status:");
    let _ = writeln!(
        out,
        "   Currently hiring: {} ({})",
        report.hiring_yes,
        percent(report.hiring_yes_ratio())
    );
    let _ = writeln!(
        out,
        "   Not hiring: {} ({})",
        report.hiring_no,
        percent(report.hiring_no_ratio())
    );
    let _ = writeln!(
        out,
        "   Unknown: {} ({})",
        report.hiring_unknown,
        percent(report.hiring_unknown_ratio())
    );

    let _ = writeln!(out, "\n📞 Contact Info Found:");
    let _ = writeln!(
        out,
        "   Websites: {} ({})",
        report.with_website,
        percent(report.website_ratio())
    );
    let _ = writeln!(
        out,
        "   Email addresses: {} ({})",
        report.with_email,
        percent(report.email_ratio())
    );

    let (shown, remaining) = report.hiring_preview(HIRING_DISPLAY_LIMIT);
    if !shown.is_empty() {
        let _ = writeln!(out, "\n✅ Companies Currently Hiring:");
        for company in shown {
            let _ = writeln!(
                out,
                "   • {} - {}",
                company.startup_name,
                company.contact_info.website
            );
        }
        if remaining > 0 {
            let _ = writeln!(out, "   ... and {remaining} more");
        }
    }

    out
}
