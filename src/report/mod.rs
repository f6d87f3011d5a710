//! Plain-text rendering of search results and the run summary.

use crate::core::engine::SearchReport;
use crate::core::summary::Summary;
use crate::domain::model::{Query, Record, StudentInfo};
use crate::utils::error::Result;
use std::io::Write;

/// Banners longer than this are cut.
pub const BANNER_PREVIEW_CHARS: usize = 300;

pub fn write_search_banner<W: Write>(
    out: &mut W,
    query: &Query,
    max_results: Option<usize>,
) -> Result<()> {
    writeln!(out, "Shodan search with filter: {}", query)?;
    if let Some(cap) = max_results {
        writeln!(out, "Requested result limit: {}", cap)?;
    }
    Ok(())
}

/// First characters of the banner with newlines made visible.
pub fn banner_preview(banner: &str) -> String {
    banner
        .chars()
        .take(BANNER_PREVIEW_CHARS)
        .collect::<String>()
        .replace('\n', "\\n")
}

pub fn render_record(record: &Record) -> String {
    let mut lines = vec!["---".to_string()];

    let port = record
        .port
        .map(|p| p.to_string())
        .unwrap_or_else(|| "N/A".to_string());
    lines.push(format!(
        "IP: {}\tPort: {}\tTimestamp: {}",
        record.ip.as_deref().unwrap_or("N/A"),
        port,
        record.timestamp.as_deref().unwrap_or("")
    ));

    if let Some(hostnames) = record.hostnames.as_ref().filter(|h| !h.is_empty()) {
        lines.push(format!("Hostnames: {}", hostnames.join(", ")));
    }
    if let Some(label) = record.label() {
        lines.push(format!("Product: {}", label));
    }
    lines.push(format!(
        "Banner (truncated): {}",
        banner_preview(record.banner.as_deref().unwrap_or(""))
    ));

    if let Some(org) = &record.org {
        lines.push(format!("Org: {}", org));
    }
    if let Some(asn) = &record.asn {
        lines.push(format!("ASN: {}", asn));
    }
    if let Some(location) = &record.location {
        lines.push(format!(
            "Location: {} - {}",
            location.city.as_deref().unwrap_or(""),
            location.country_name.as_deref().unwrap_or("")
        ));
    }

    lines.join("\n")
}

pub fn write_records<W: Write>(out: &mut W, records: &[Record]) -> Result<()> {
    writeln!(out, "\n\n*** RESULTS ***\n")?;
    for record in records {
        writeln!(out, "{}\n", render_record(record))?;
    }
    Ok(())
}

pub fn write_summary<W: Write>(out: &mut W, student: &StudentInfo, summary: &Summary) -> Result<()> {
    writeln!(out, "\n\n*** SUMMARY ***")?;
    writeln!(out, "Student: {}", student.name)?;
    writeln!(out, "Carnet: {}", student.carnet)?;
    writeln!(out, "Course: {}", student.course)?;
    writeln!(out, "Section: {}", student.section)?;
    writeln!(out, "----")?;
    writeln!(
        out,
        "Total unique IP addresses identified: {}",
        summary.unique_address_count()
    )?;
    writeln!(out, "Occurrences per port (sorted):")?;

    let ranked = summary.ranked_ports();
    if ranked.is_empty() {
        writeln!(out, "  No ports counted.")?;
    }
    for entry in ranked {
        writeln!(out, "  Port {}: {} occurrences", entry.port, entry.count)?;
    }
    Ok(())
}

/// Full stdout report after the search banner.
pub fn write_report<W: Write>(out: &mut W, report: &SearchReport, student: &StudentInfo) -> Result<()> {
    writeln!(
        out,
        "Total results (estimated by Shodan): {}",
        report.aggregation.total_estimate
    )?;
    write_records(out, &report.aggregation.records)?;
    write_summary(out, student, &report.summary)?;
    writeln!(out, "\nDone.")?;
    Ok(())
}
