// ============================================================================
// pipeline.rs — SVG → PNG → ICO generation, step by step
// ============================================================================
//
// Steps run strictly in order and the first failing step aborts the rest:
//   [1/4] source check  [2/4] backends  [3/4] SVG → PNG  [4/4] PNG → ICO
// Lower layers log and return errors; this is the only place that decides to
// stop. Nothing is retried and already written files are left in place.
// ============================================================================

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::{normalize_sizes, Config, IconPaths};
use crate::deps::{self, Backend, DependencyStatus, Installer};
use crate::error::{IconError, Result};
use crate::icon::{self, IconEntry};
use crate::render;
use crate::utils;

/// Everything one run needs, resolved from config and command line.
#[derive(Debug, Clone)]
pub struct Job {
    pub paths: IconPaths,
    pub png_size: u32,
    pub ico_sizes: Vec<u32>,
    pub installer: Installer,
    pub verbose: bool,
    pub quiet: bool,
}

impl Job {
    pub fn from_config(config: &Config, dir: &Path) -> Self {
        Self {
            paths: config.resolve_paths(dir),
            png_size: config.render.size,
            ico_sizes: config.icon.sizes.clone(),
            installer: Installer::from_config(&config.install),
            verbose: false,
            quiet: false,
        }
    }

    /// If both verbose and quiet are set, quiet takes precedence
    pub fn show_verbose_output(&self) -> bool {
        self.verbose && !self.quiet
    }
}

#[derive(Debug, Clone)]
pub struct GeneratedFile {
    pub path: PathBuf,
    pub len: u64,
    pub sha256: String,
}

#[derive(Debug, Clone)]
pub struct Report {
    pub files: Vec<GeneratedFile>,
    pub entries: Vec<IconEntry>,
    pub elapsed: Duration,
}

#[derive(Debug)]
pub enum PipelineOutcome {
    Completed(Report),
    /// Backends were installed by the package manager; the caller relaunches.
    Reinstalled,
}

const STEPS: usize = 4;

fn step(job: &Job, n: usize, msg: impl AsRef<str>) {
    if !job.quiet {
        println!("{} {}", format!("[{}/{}]", n, STEPS).cyan().bold(), msg.as_ref());
    }
}

/// Runs the full generation. `confirm` is asked before installing missing
/// backends and never called when they are all present.
pub fn run<F>(job: &Job, confirm: F) -> Result<PipelineOutcome>
where
    F: FnOnce(&[Backend]) -> Result<bool>,
{
    run_with_backends(job, &deps::missing_backends(), confirm)
}

pub fn run_with_backends<F>(job: &Job, missing: &[Backend], confirm: F) -> Result<PipelineOutcome>
where
    F: FnOnce(&[Backend]) -> Result<bool>,
{
    let start = Instant::now();
    let paths = &job.paths;
    let ico_sizes = normalize_sizes(&job.ico_sizes)?;

    // --- Source ---
    step(job, 1, format!("Checking source {}", paths.svg.display()));
    if !paths.svg.is_file() {
        return Err(IconError::SourceMissing(paths.svg.clone()));
    }

    // --- Backends ---
    step(job, 2, "Checking dependencies");
    match deps::ensure_backends(missing, &job.installer, confirm)? {
        DependencyStatus::Ready => {
            if job.show_verbose_output() {
                for b in Backend::ALL {
                    println!("  {} {}", "✓".green(), b);
                }
            }
        }
        DependencyStatus::Installed => return Ok(PipelineOutcome::Reinstalled),
    }

    // --- SVG → PNG ---
    step(
        job,
        3,
        format!("Converting {} to PNG ({}x{})...", paths.svg.display(), job.png_size, job.png_size),
    );
    render::convert_svg_to_png(&paths.svg, &paths.png, job.png_size)?;
    if !job.quiet {
        println!("  Created PNG icon: {}", paths.png.display());
    }

    // --- PNG → ICO ---
    step(job, 4, format!("Converting {} to ICO...", paths.png.display()));
    let progress = if job.quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new(ico_sizes.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("  [{bar:30.cyan/blue}] {pos}/{len} sizes")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        pb
    };
    let result = icon::convert_png_to_ico(&paths.png, &paths.ico, &ico_sizes, Some(&progress));
    progress.finish_and_clear();
    let entries = result?;
    if !job.quiet {
        println!("  Created ICO icon: {}", paths.ico.display());
    }

    let files = [&paths.png, &paths.ico]
        .iter()
        .map(|p| describe_file(p))
        .collect::<Result<Vec<_>>>()?;

    let report = Report {
        files,
        entries,
        elapsed: start.elapsed(),
    };
    print_summary(job, &report);
    Ok(PipelineOutcome::Completed(report))
}

fn describe_file(path: &Path) -> Result<GeneratedFile> {
    let bytes = std::fs::read(path).map_err(|e| IconError::io(path, e))?;
    Ok(GeneratedFile {
        path: path.to_path_buf(),
        len: bytes.len() as u64,
        sha256: utils::sha256_hex(&bytes),
    })
}

fn print_summary(job: &Job, report: &Report) {
    if job.quiet {
        println!(
            "OK {} files, {}",
            report.files.len(),
            utils::format_duration(report.elapsed.as_secs_f64())
        );
        return;
    }

    println!();
    println!("{}", "=".repeat(50));
    println!("{}", "Icon generation completed successfully!".green().bold());
    println!("Generated files:");
    for f in &report.files {
        println!("  - {}", f.path.display());
        if job.show_verbose_output() {
            println!("      {}  sha256 {}", utils::format_bytes(f.len), f.sha256);
        }
    }
    if job.show_verbose_output() {
        let sizes: Vec<String> = report
            .entries
            .iter()
            .map(|e| format!("{}x{}", e.width, e.height))
            .collect();
        println!("  ICO entries: {}", sizes.join(", "));
        println!("  Duration   : {}", utils::format_duration(report.elapsed.as_secs_f64()));
    }
    println!();
    println!("You can now use these icons for your Windows installer.");
}
