// ============================================================================
// main.rs — iconforge CLI entry point
// ============================================================================

mod options;

use std::any::Any;
use std::io::{ErrorKind, IsTerminal};
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::process;

use anyhow::Context;
use clap::Parser;
use colored::*;
use dialoguer::{Confirm, Input};

use iconforge::config::{Config, CONFIG_FILE_NAME};
use iconforge::deps::{self, Backend};
use iconforge::pipeline::{self, Job, PipelineOutcome};
use iconforge::{icon, logging, render, IconError};
use options::{Command, Options, Overrides};

fn main() {
    let options = Options::parse();
    logging::init(options.verbose, options.quiet);

    if let Err(e) = ctrlc::set_handler(|| {
        eprintln!("\n{}", "Operation cancelled by user.".yellow());
        process::exit(1);
    }) {
        tracing::warn!(error = %e, "could not install Ctrl-C handler");
    }

    install_quiet_panic_hook();

    let pause = !options.no_pause && std::io::stdin().is_terminal();

    let code = match panic::catch_unwind(AssertUnwindSafe(|| run(&options))) {
        Ok(Ok(code)) => code,
        Ok(Err(e)) => {
            if e.downcast_ref::<IconError>().is_some_and(IconError::is_cancelled) {
                eprintln!("\n{}", "Operation cancelled by user.".yellow());
            } else {
                eprintln!("{} {:#}", "✗ Error:".red().bold(), e);
                wait_for_enter(pause);
            }
            1
        }
        Err(payload) => {
            eprintln!("{} {}", "Unexpected error:".red().bold(), panic_message(payload.as_ref()));
            wait_for_enter(pause);
            1
        }
    };

    process::exit(code);
}

/// Panics are reported by `main` as "Unexpected error"; the hook only logs them.
fn install_quiet_panic_hook() {
    panic::set_hook(Box::new(|info| {
        tracing::debug!(%info, "panic");
    }));
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}

fn run(options: &Options) -> anyhow::Result<i32> {
    let dir = match &options.dir {
        Some(d) => d.clone(),
        None => std::env::current_dir().context("cannot determine current directory")?,
    };

    if let Some(Command::Init { force }) = &options.command {
        return init_config(&dir, *force);
    }

    let mut config = Config::discover(&dir, options.config.as_deref())?;
    apply_overrides(&mut config, &options.overrides);
    config.validate()?;

    let mut job = Job::from_config(&config, &dir);
    job.verbose = options.verbose;
    job.quiet = options.show_quiet_output();

    match &options.command {
        None | Some(Command::Generate) => run_generate(options, &config, &job),
        Some(Command::Png) => {
            if !job.paths.svg.is_file() {
                return Err(IconError::SourceMissing(job.paths.svg.clone()).into());
            }
            render::convert_svg_to_png(&job.paths.svg, &job.paths.png, job.png_size)?;
            println!("{} Created PNG icon: {}", "✓".green(), job.paths.png.display());
            Ok(0)
        }
        Some(Command::Ico) => {
            let entries = icon::convert_png_to_ico(&job.paths.png, &job.paths.ico, &job.ico_sizes, None)?;
            println!(
                "{} Created ICO icon: {} ({} sizes)",
                "✓".green(),
                job.paths.ico.display(),
                entries.len()
            );
            Ok(0)
        }
        Some(Command::Check) => Ok(run_check()),
        Some(Command::Inspect { file }) => {
            let path = file.clone().unwrap_or_else(|| job.paths.ico.clone());
            let entries = icon::inspect_ico(&path)?;
            println!("{} ({} images)", path.display(), entries.len());
            for e in &entries {
                println!("  {}x{}", e.width, e.height);
            }
            Ok(0)
        }
        Some(Command::Init { .. }) => unreachable!("handled before config is loaded"),
    }
}

fn run_generate(options: &Options, config: &Config, job: &Job) -> anyhow::Result<i32> {
    if !job.quiet {
        let title = match &config.app_name {
            Some(name) => format!("{} - Icon Generator", name),
            None => "Icon Generator".to_string(),
        };
        println!("{}", title.cyan().bold());
        println!("{}", "=".repeat(50).cyan());
    }

    let yes = options.yes;
    match pipeline::run(job, |missing| confirm_install(missing, yes))? {
        PipelineOutcome::Completed(_) => Ok(0),
        PipelineOutcome::Reinstalled => {
            println!("{}", "Restarting with the newly installed build...".cyan());
            let args: Vec<String> = std::env::args().skip(1).collect();
            Ok(deps::relaunch(&args)?)
        }
    }
}

fn confirm_install(missing: &[Backend], yes: bool) -> iconforge::Result<bool> {
    if yes {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        eprintln!(
            "No terminal to confirm installing {} backend(s); re-run with --yes to install.",
            missing.len()
        );
        return Ok(false);
    }
    Confirm::new()
        .with_prompt("Install dependencies?")
        .default(false)
        .interact()
        .map_err(prompt_error)
}

/// Ctrl-C inside a prompt arrives as an interrupted read, not as a signal.
fn prompt_error(err: dialoguer::Error) -> IconError {
    match err {
        dialoguer::Error::IO(e) if e.kind() == ErrorKind::Interrupted => IconError::Cancelled,
        dialoguer::Error::IO(e) => IconError::io("<stdin>", e),
    }
}

fn run_check() -> i32 {
    let missing = deps::missing_backends();
    for b in Backend::ALL {
        if b.is_available() {
            println!("  {} {}", "✓".green(), b);
        } else {
            println!("  {} {} (not built in)", "✗".red(), b);
        }
    }
    if missing.is_empty() {
        println!("{}", "All backends available.".green());
        0
    } else {
        1
    }
}

fn init_config(dir: &Path, force: bool) -> anyhow::Result<i32> {
    let path: PathBuf = dir.join(CONFIG_FILE_NAME);
    if path.exists() && !force {
        anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
    }
    Config::default().save(&path)?;
    println!("{} Created {}", "✓".green(), path.display());
    Ok(0)
}

fn apply_overrides(config: &mut Config, overrides: &Overrides) {
    if let Some(svg) = &overrides.svg {
        config.files.svg = svg.clone();
    }
    if let Some(png) = &overrides.png {
        config.files.png = png.clone();
    }
    if let Some(ico) = &overrides.ico {
        config.files.ico = ico.clone();
    }
    if let Some(size) = overrides.size {
        config.render.size = size;
    }
    if let Some(sizes) = &overrides.sizes {
        config.icon.sizes = sizes.0.clone();
    }
}

fn wait_for_enter(pause: bool) {
    if !pause {
        return;
    }
    let _ = Input::<String>::new()
        .with_prompt("Press Enter to exit...")
        .allow_empty(true)
        .report(false)
        .interact_text();
}
