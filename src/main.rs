// main.rs - CLI entry point

use std::time::Instant;
use strandshift::cli::Config;
use strandshift::core::ChromosomeOutcome;
use strandshift::output::write_read_stats;
use strandshift::prelude::*;

fn main() {
    if let Err(e) = run_main() {
        eprintln!("❌ ERROR: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn run_main() -> Result<()> {
    let mut args: Args = argh::from_env();
    let command_line = std::env::args().collect::<Vec<String>>().join(" ");

    // Handle generate config first
    if args.generate_config {
        let sample_config = Config::generate_sample();
        println!("{}", sample_config);
        println!("\n💡 Save this content to a .toml file and use --config /path/to/config.toml");
        return Ok(());
    }

    init_logging(args.verbose);

    if args.list_metrics {
        println!("Available metrics:");
        for (name, desc) in MetricRegistry::new().list_metrics() {
            println!("  - {}: {}", name, desc);
        }
        return Ok(());
    }

    // Load configuration file if specified
    if let Some(config_path) = args.config.clone() {
        args = args.with_config_file(&config_path)?;
    }

    let validation = validate_args(&args, &command_line)?;
    let profile_config = &validation.profile;

    println!("🚀 {}", strandshift::get_info());
    println!("🧵 Threads: {}", profile_config.threads);
    if !args.nomodel {
        let regimes = &profile_config.regimes;
        println!("📐 Metric: {}", profile_config.metric);
        println!(
            "📏 Fine regime: [{}, {})  Background: [{}, {}) step {}",
            regimes.mp_from, regimes.mp_to, regimes.ng_from, regimes.ng_to, regimes.ng_step
        );
    }

    let total_start = Instant::now();

    // Chromosome registry
    let registry = load_genome_table(&validation.genome_table)?;
    let registry = registry.filtered(
        validation.chr_include_regex.as_ref(),
        validation.chr_exclude_regex.as_ref(),
    )?;
    if registry.is_empty() {
        return Err(SspError::Configuration(
            "No chromosomes left after --include-chr/--exclude-chr filtering".to_string(),
        ));
    }
    println!("🧬 Chromosomes: {}", registry.len());

    // Reads
    let mut genome = GenomeReads::new(&registry);
    load_reads(&validation.reads, &mut genome)?;
    println!(
        "📊 Reads: {} ({} non-redundant, {} redundant)",
        genome.nread(),
        genome.nread_nonred(),
        genome.nread_red()
    );
    for (chrom, n) in genome.dropped() {
        println!("⚠️  {} reads on {} skipped (not in genome table)", n, chrom);
    }

    if args.dry_run {
        println!("✅ Dry run completed successfully");
        return Ok(());
    }

    let flen = if args.nomodel {
        println!("⏭️  Profiling skipped, fragment length: {}", validation.flen);
        validation.flen
    } else {
        let profile_start = Instant::now();
        let driver = ProfileDriver::new(profile_config.clone())?;
        let report = driver.run(&genome)?;
        print_report(&report);
        println!("⏱️  Profiling time: {:.2?}", profile_start.elapsed());
        u32::try_from(report.estimate.length).map_err(|_| {
            SspError::Configuration(format!(
                "Fragment length {} does not fit the read model",
                report.estimate.length
            ))
        })?
    };

    genome.set_f5(flen);
    genome.calc_depth(flen);
    let w = genome.normalize_to(profile_config.scale_reads);
    println!("📈 Genome depth: {:.4} (normalization weight {:.4})", genome.depth, w);

    if let Some(spec) = &profile_config.output {
        let path = spec.read_stats_path();
        write_read_stats(&path, spec, &genome)?;
        println!("✅ Read statistics written to: {}", path.display());
    }

    println!("⏱️  Total time: {:.2?}", total_start.elapsed());
    Ok(())
}

fn print_report(report: &ProfileReport) {
    for outcome in &report.outcomes {
        match outcome {
            ChromosomeOutcome::NoSignal { name, reason } => {
                println!("⚠️  {} excluded: {}", name, reason);
            }
            ChromosomeOutcome::Profiled {
                profile,
                write_error: Some(e),
                ..
            } => {
                println!("❌ {} profile not written: {}", profile.name, e);
            }
            ChromosomeOutcome::Profiled { .. } => {}
        }
    }

    let estimate = &report.estimate;
    println!(
        "🎯 Fragment length: {} ({} = {:.6})",
        estimate.length, report.metric, estimate.score
    );
    match (estimate.background_mean, estimate.nsc) {
        (Some(bk), Some(nsc)) => println!("📉 Background mean: {:.6}  NSC: {:.4}", bk, nsc),
        _ => println!("📉 Background mean unavailable; NSC not computed"),
    }
    println!(
        "✅ Genome profile from {} chromosomes ({} non-redundant reads)",
        report.folded().count(),
        report.genome.nread
    );
}
