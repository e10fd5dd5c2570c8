//! Dayfeat: Calendar Feature CLI Tool
//!
//! Reads a daily count series, derives weekday, month and US federal
//! holiday features, log-transforms the counts and writes the table for
//! downstream modeling.

use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use console::style;

use dayfeat::cli::Cli;
use dayfeat::pipeline::{ensure_parent_dir, estimated_size_mb, save_dataset, FeatureBuilder};
use dayfeat::report::{BuildSummary, RunManifest};
use dayfeat::utils::{
    create_spinner, finish_with_success, finish_with_warning, print_banner, print_completion,
    print_config, print_count, print_info, print_step_header, print_step_time, print_success,
};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let verbose = !cli.quiet;

    if verbose {
        print_banner(env!("CARGO_PKG_VERSION"));
        print_config(&cli.data_path, &cli.output_path, cli.manifest_path.as_deref());
    }

    let builder = FeatureBuilder::new().with_infer_schema_length(cli.infer_schema_length);

    // Step 1: Load dataset
    if verbose {
        print_step_header(1, "Load Dataset");
    }
    let step_start = Instant::now();
    let spinner = create_spinner("Reading input table...", verbose);
    let raw = builder
        .load(&cli.data_path)
        .inspect_err(|_| spinner.finish_and_clear())?;
    finish_with_success(&spinner, "Dataset loaded");
    let load_elapsed = step_start.elapsed();

    if verbose {
        println!("\n    {} Dataset Statistics:", style("✧").cyan());
        println!("      Rows: {}", raw.height());
        println!("      Columns: {}", raw.width());
        println!("      Estimated memory: {:.2} MB", estimated_size_mb(&raw));
        print_step_time(load_elapsed);
    }

    // Step 2: Build features
    if verbose {
        print_step_header(2, "Build Features");
    }
    let step_start = Instant::now();
    let spinner = create_spinner("Deriving calendar features...", verbose);
    let (mut df, stats) = builder
        .build_frame(&raw)
        .inspect_err(|_| spinner.finish_and_clear())?;
    if df.height() == 0 {
        finish_with_warning(&spinner, "No rows left after dropping missing values");
    } else {
        finish_with_success(&spinner, "Features built");
    }
    let build_elapsed = step_start.elapsed();

    if verbose {
        if stats.rows_dropped_missing == 0 {
            print_info("No rows with missing values");
        } else {
            print_count(
                "row(s) with missing values",
                stats.rows_dropped_missing,
                Some("(dropped)"),
            );
        }
        print_count(
            "holiday row(s)",
            stats.holiday_rows,
            Some(&format!(
                "({} federal holidays in range)",
                stats.holidays_in_range.len()
            )),
        );
        print_success(&format!(
            "Encoded {} month and {} weekday indicator column(s)",
            stats.month_columns.len(),
            stats.day_columns.len()
        ));
        print_step_time(build_elapsed);
    }

    // Step 3: Save output, only once the table is complete
    if verbose {
        print_step_header(3, "Save Results");
    }
    let step_start = Instant::now();
    let spinner = create_spinner("Writing output file...", verbose);
    ensure_parent_dir(&cli.output_path)
        .and_then(|_| save_dataset(&mut df, &cli.output_path))
        .inspect_err(|_| spinner.finish_and_clear())?;
    finish_with_success(
        &spinner,
        &format!("Saved to {}", cli.output_path.display()),
    );

    if let Some(manifest_path) = &cli.manifest_path {
        ensure_parent_dir(manifest_path)?;
        RunManifest::new(
            &cli.data_path,
            &cli.output_path,
            &df,
            &stats,
            builder.calendar(),
        )
        .write(manifest_path)?;
        if verbose {
            print_success(&format!("Manifest written to {}", manifest_path.display()));
        }
    }
    let save_elapsed = step_start.elapsed();

    if verbose {
        print_step_time(save_elapsed);

        let mut summary = BuildSummary::new(stats, df.width());
        summary.set_load_time(load_elapsed);
        summary.set_build_time(build_elapsed);
        summary.set_save_time(save_elapsed);
        summary.display();

        print_completion();
    }

    Ok(())
}
