//! Output formatting for the CLI.

use crate::error::Result;
use colored::*;
use dayfile_janitor::{Config, DirectoryListing, LifecycleMetrics, PlacementReport, ReclaimReport};
use serde::Serialize;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text and tables (default)
    Text,
    /// Pretty-printed JSON
    Json,
}

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format the outcome of a placement pass.
    pub fn placement_report(&self, report: &PlacementReport) -> Result<String> {
        if self.format == OutputFormat::Json {
            return to_json(report);
        }

        let mut lines = vec![self.success(&format!(
            "Placement pass: {} moved, {} deleted, {} skipped",
            report.moved, report.deleted, report.skipped
        ))];
        if report.cancelled {
            lines.push(self.warning("Pass cancelled before all files were processed"));
        }
        Ok(lines.join("\n"))
    }

    /// Format the outcome of a reclaim pass.
    pub fn reclaim_report(&self, report: &ReclaimReport) -> Result<String> {
        if self.format == OutputFormat::Json {
            return to_json(report);
        }

        let mut lines = vec![self.success(&format!(
            "Reclaim pass: {} disk(s) checked, {} directories evicted, {} ancestors removed",
            report.disks_checked, report.directories_evicted, report.ancestors_removed
        ))];
        for disk in &report.unreachable {
            lines.push(self.warning(&format!(
                "Free-space target unreachable on {}: no day directories left",
                disk
            )));
        }
        if report.cancelled {
            lines.push(self.warning("Pass cancelled before all disks were processed"));
        }
        Ok(lines.join("\n"))
    }

    /// Format directory listings. Always JSON.
    pub fn listings(&self, listings: &[DirectoryListing]) -> Result<String> {
        to_json(listings)
    }

    /// Format accumulated worker metrics.
    pub fn metrics(&self, metrics: &LifecycleMetrics) -> String {
        metrics.summary()
    }

    /// Format a validated configuration as tables.
    pub fn config_summary(&self, config: &Config) -> String {
        let mut sections = Vec::new();

        let mut builder = Builder::default();
        builder.push_record(["Pattern", "Date offset", "Layout"]);
        for template in config.templates() {
            builder.push_record([
                template.pattern.as_str().to_string(),
                template.date_offset.to_string(),
                template.layout.as_str().to_string(),
            ]);
        }
        sections.push(styled(builder));

        if config.base_paths().is_empty() {
            sections.push(self.warning("No base paths configured"));
        } else {
            let mut builder = Builder::default();
            builder.push_record(["Base path"]);
            for base_path in config.base_paths() {
                builder.push_record([base_path.display().to_string()]);
            }
            sections.push(styled(builder));
        }

        if config.disks().is_empty() {
            sections.push(self.info("No disks configured, reclaim passes do nothing"));
        } else {
            let mut builder = Builder::default();
            builder.push_record(["Disk", "Free space target", "Base paths"]);
            for disk in config.disks() {
                builder.push_record([
                    disk.identifier.clone(),
                    format!("{}%", disk.free_space_target),
                    config.base_paths_on(disk).count().to_string(),
                ]);
            }
            sections.push(styled(builder));
        }

        sections.push(format!(
            "Placement every {:?}, reclaim every {:?}{}",
            config.organize_interval(),
            config.reclaim_interval(),
            if config.dry_run() { " (dry run)" } else { "" }
        ));

        sections.join("\n")
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

fn styled(builder: Builder) -> String {
    let mut table = builder.build();
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));
    table.to_string()
}
