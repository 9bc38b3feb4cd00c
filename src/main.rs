mod cli;

use webmforge::{
    config,
    encode::{estimate_bitrate, EncodeOutcome, SizeConstraint},
    images::{plan_scale, ScaleRange},
    pipeline::{classify_inputs, ConvertReport, Converter, FfmpegTools},
    probe,
    prompt::{NonInteractiveResolver, Resolver, TerminalResolver},
};

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "webmforge=trace,webmforge_av=debug,webmforge_media=debug".to_string()
        } else {
            "webmforge=info,webmforge_av=info,webmforge_media=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Convert {
            inputs,
            yes,
            non_interactive,
            pause_on_error,
        } => {
            let mut pause = pause_on_error;
            let result =
                config::load_config_or_default(cli.config.as_deref()).and_then(|config| {
                    pause |= config.pause_on_error;
                    convert(&config, &inputs, yes, non_interactive)
                });
            if let Err(ref e) = result {
                if pause {
                    eprintln!("Error: {:#}", e);
                    wait_for_enter();
                    std::process::exit(1);
                }
            }
            result
        }
        Commands::Probe { file, json } => probe_file(&file, cli.config.as_deref(), json),
        Commands::PlanScale { width, height } => {
            plan_cover_scale(width, height, cli.config.as_deref())
        }
        Commands::CheckTools => check_tools(),
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("webmforge {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn convert(
    config: &config::Config,
    inputs: &[PathBuf],
    yes: bool,
    non_interactive: bool,
) -> Result<()> {
    classify_inputs(inputs, config)?;
    for input in inputs {
        if !input.exists() {
            anyhow::bail!("Input file does not exist: {:?}", input);
        }
    }

    let tools = FfmpegTools::from_config(&config.encoder).context("Media tools not available")?;
    let encoder = tools.encoder();
    let converter = Converter::new(config, &tools, &encoder)?;

    let mut resolver: Box<dyn Resolver> = if non_interactive || !std::io::stdin().is_terminal() {
        Box::new(NonInteractiveResolver { assume_yes: yes })
    } else {
        Box::new(TerminalResolver::stdio().assume_yes(yes))
    };

    let report = converter
        .convert(inputs, resolver.as_mut())
        .context("Conversion failed")?;

    print_report(&report);
    Ok(())
}

fn print_report(report: &ConvertReport) {
    println!("Title: {}", report.title);
    println!("Bitrate: {}k", report.encode.result.bitrate);
    if report.encode.attempts.len() > 1 {
        let attempts: Vec<String> = report
            .encode
            .attempts
            .iter()
            .map(|b| format!("{}k", b))
            .collect();
        println!("Attempts: {}", attempts.join(" -> "));
    }
    println!(
        "Output: {} ({} bytes)",
        report.output().display(),
        report.encode.result.size
    );
    if let Some(patch) = &report.duration_patch {
        println!("Duration header capped ({:?})", patch.strategy);
    }

    match report.encode.outcome {
        EncodeOutcome::WithinLimit => println!("Done"),
        EncodeOutcome::Oversized => {
            tracing::warn!("Output is still over the size limit at the minimum bitrate");
            println!("Done (over size limit)");
        }
    }
}

fn wait_for_enter() {
    eprintln!("Press Enter to exit");
    let mut line = String::new();
    let _ = std::io::stdin().read_line(&mut line);
}

fn probe_file(file: &Path, config_path: Option<&Path>, json: bool) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("File does not exist: {:?}", file);
    }

    let config = config::load_config_or_default(config_path)?;
    let constraint = SizeConstraint::try_from(&config.limits)?;
    let info = probe::probe_file(file, &config.encoder)?;
    let estimate = info
        .duration_secs()
        .map(|secs| estimate_bitrate(secs, &constraint));

    if json {
        let value = serde_json::json!({
            "info": &info,
            "title": info.display_title(),
            "bitrate_kbps": estimate.map(|e| e.bitrate),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("File: {}", info.file_path.display());
    println!("Container: {}", info.container);
    println!("Size: {} bytes", info.file_size);
    match info.duration {
        Some(duration) => {
            let secs = duration.as_secs();
            let mins = secs / 60;
            let hours = mins / 60;
            println!("Duration: {:02}:{:02}:{:02}", hours, mins % 60, secs % 60);
        }
        None => println!("Duration: unknown"),
    }
    println!("Title: {}", info.display_title());

    match &info.cover {
        Some(cover) => println!(
            "Cover: {} {}x{} (stream {})",
            cover.codec, cover.width, cover.height, cover.index
        ),
        None => println!("Cover: none"),
    }

    if let Some(estimate) = estimate {
        print!("Estimated bitrate: {}k", estimate.bitrate);
        if estimate.clamped {
            print!(" (minimum, may be too large)");
        }
        println!();
    }

    Ok(())
}

fn plan_cover_scale(width: u32, height: u32, config_path: Option<&Path>) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let range = ScaleRange::new(config.image.min_side, config.image.max_side)?;

    match plan_scale(width, height, &range) {
        Some(plan) => println!("{}x{} {}", width, height, plan),
        None => println!("{}x{}: no resize needed", width, height),
    }

    Ok(())
}

fn check_tools() -> Result<()> {
    println!("Checking external tools...\n");

    let tools = probe::check_tools();
    let mut all_ok = true;

    for tool in &tools {
        let status = if tool.available {
            "✓"
        } else {
            all_ok = false;
            "✗"
        };

        print!("{} {}", status, tool.name);

        if let Some(ref version) = tool.version {
            print!(" ({})", version.lines().next().unwrap_or(""));
        }

        if let Some(ref path) = tool.path {
            print!(" - {}", path.display());
        }

        println!();
    }

    println!();
    if all_ok {
        println!("All required tools are available!");
    } else {
        println!("Some tools are missing. Install ffmpeg to convert files.");
    }

    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    let config = match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            config
        }
        None => {
            println!("No config file specified, using defaults");
            config::Config::default()
        }
    };

    println!("  Max file size: {} bytes", config.limits.max_file_size);
    println!("  Max duration: {}s", config.limits.max_duration_secs);
    println!(
        "  Bitrate: {}k (minimum {}k)",
        config.limits.default_bitrate, config.limits.min_bitrate
    );
    println!(
        "  Cover side: {}-{} (resize: {})",
        config.image.min_side, config.image.max_side, config.image.resize
    );
    println!("  Audio extensions: {}", config.audio_extensions.join(", "));

    Ok(())
}
