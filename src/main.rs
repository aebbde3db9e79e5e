use clap::Parser;
use staff_tag_detect::args::Args;
use staff_tag_detect::run_detection;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = Args::parse();

    let default_filter = if args.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let config = match args.into_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {e}");
            return ExitCode::FAILURE;
        }
    };

    println!(
        "🔍 Scanning {} (threshold {:.2}) -> {}",
        config.video_path.display(),
        config.threshold,
        config.output_path.display()
    );

    match run_detection(&config) {
        Ok(report) => {
            println!(
                "✅ {} of {} frames matched, results saved to {}",
                report.results.len(),
                report.frames_processed,
                config.output_path.display()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("❌ {e}");
            ExitCode::FAILURE
        }
    }
}
