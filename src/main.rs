use clap::Parser;
use payroll_fill::core::confirm::{prompt_for_path, StdinConfirm};
use payroll_fill::utils::{logger, validation::Validate};
use payroll_fill::{CliConfig, EtlEngine, PayrollError, RunOutcome, UploadPipeline};

fn main() {
    let cli = CliConfig::parse();

    logger::init_cli_logger(cli.verbose);

    tracing::info!("Starting payroll-fill");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let raw = match &cli.raw {
        Some(path) => path.clone(),
        None => match prompt_for_path() {
            Ok(path) => path,
            Err(e) => exit_with(e),
        },
    };

    let config = match cli.resolve(raw) {
        Ok(config) => config,
        Err(e) => exit_with(e),
    };

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        exit_with(e);
    }

    let pipeline = UploadPipeline::new(config, StdinConfirm);
    let engine = EtlEngine::new(pipeline);

    match engine.run() {
        Ok(RunOutcome::Completed(summary)) => {
            tracing::info!("Normalization completed");
            println!("✅ Normalized output: {}", summary.output_path.display());
            println!("📁 Raw file archived to: {}", summary.archive_path.display());
            if let Some(report) = &summary.unmatched_report {
                println!(
                    "⚠️  Roster employees without pay rows listed in: {}",
                    report.display()
                );
            }
            if summary.dropped > 0 {
                println!(
                    "⚠️  {} pay rows had no roster match and were dropped",
                    summary.dropped
                );
            }
            if summary.ambiguous > 0 {
                println!(
                    "⚠️  {} pay rows matched more than one roster entry (first won)",
                    summary.ambiguous
                );
            }
        }
        Ok(RunOutcome::Cancelled) => {
            println!("Cancelled; no files were written.");
            std::process::exit(1);
        }
        Err(e) => {
            tracing::error!("Run failed: {}", e);
            exit_with(e);
        }
    }
}

fn exit_with(e: PayrollError) -> ! {
    eprintln!("❌ {}", e);
    std::process::exit(e.exit_code());
}
