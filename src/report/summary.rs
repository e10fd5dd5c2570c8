//! Build summary report generation

use std::time::Duration;

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;

use crate::pipeline::BuildStats;

/// Summary of a feature build run
#[derive(Debug, Default)]
pub struct BuildSummary {
    pub stats: BuildStats,
    pub output_columns: usize,
    pub load_time: Duration,
    pub build_time: Duration,
    pub save_time: Duration,
}

impl BuildSummary {
    pub fn new(stats: BuildStats, output_columns: usize) -> Self {
        Self {
            stats,
            output_columns,
            ..Default::default()
        }
    }

    pub fn set_load_time(&mut self, elapsed: Duration) {
        self.load_time = elapsed;
    }

    pub fn set_build_time(&mut self, elapsed: Duration) {
        self.build_time = elapsed;
    }

    pub fn set_save_time(&mut self, elapsed: Duration) {
        self.save_time = elapsed;
    }

    pub fn total_time(&self) -> Duration {
        self.load_time + self.build_time + self.save_time
    }

    pub fn rows_dropped(&self) -> usize {
        self.stats.rows_dropped_missing + self.stats.rows_dropped_final
    }

    /// Render the summary as a table
    pub fn to_table(&self) -> Table {
        let stats = &self.stats;

        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            Cell::new("Metric").add_attribute(Attribute::Bold),
            Cell::new("Value").add_attribute(Attribute::Bold),
        ]);

        table.add_row(vec![Cell::new("📁 Rows Loaded"), Cell::new(stats.rows_loaded)]);

        let dropped = self.rows_dropped();
        table.add_row(vec![
            Cell::new("🗑️  Dropped (Missing)"),
            Cell::new(dropped).fg(if dropped == 0 { Color::White } else { Color::Red }),
        ]);

        let range = match (stats.first_date, stats.last_date) {
            (Some(first), Some(last)) => format!("{} → {}", first, last),
            _ => "-".to_string(),
        };
        table.add_row(vec![Cell::new("📅 Date Range"), Cell::new(range)]);

        table.add_row(vec![
            Cell::new("🎉 Holiday Rows"),
            Cell::new(format!(
                "{} ({} holidays in range)",
                stats.holiday_rows,
                stats.holidays_in_range.len()
            )),
        ]);

        table.add_row(vec![
            Cell::new("🗓️  Month / Day Columns"),
            Cell::new(format!(
                "{} / {}",
                stats.month_columns.len(),
                stats.day_columns.len()
            )),
        ]);

        table.add_row(vec![
            Cell::new("✅ Output Rows"),
            Cell::new(stats.rows_output)
                .fg(Color::Green)
                .add_attribute(Attribute::Bold),
        ]);

        table.add_row(vec![
            Cell::new("📐 Output Columns"),
            Cell::new(self.output_columns)
                .fg(Color::Green)
                .add_attribute(Attribute::Bold),
        ]);

        table.add_row(vec![
            Cell::new("⏱️  Total Time"),
            Cell::new(format!("{:.2}s", self.total_time().as_secs_f64())),
        ]);

        table
    }

    pub fn display(&self) {
        println!();
        println!(
            "    {} {}",
            style("📋").cyan(),
            style("BUILD SUMMARY").white().bold()
        );
        println!("    {}", style("─".repeat(50)).dim());
        println!();

        // Indent the table
        for line in self.to_table().to_string().lines() {
            println!("    {}", line);
        }

        let columns_with_nulls: Vec<&(String, usize)> = self
            .stats
            .source_null_counts
            .iter()
            .filter(|(_, nulls)| *nulls > 0)
            .collect();

        if !columns_with_nulls.is_empty() {
            println!();
            println!(
                "    {} {}",
                style("📝").cyan(),
                style("NULLS IN SOURCE").white().bold()
            );
            println!("    {}", style("─".repeat(50)).dim());
            for (column, nulls) in columns_with_nulls {
                println!(
                    "        {} {} {}",
                    style("•").dim(),
                    column,
                    style(format!("({})", nulls)).dim()
                );
            }
        }
    }
}
