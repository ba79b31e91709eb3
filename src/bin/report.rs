use ai_jobs::{init_logger, Config, Reporter};

fn main() -> ai_jobs::Result<()> {
    init_logger(log::LevelFilter::Info);
    let config = Config::load(Config::FILE_PATH)?;
    let reporter = Reporter::load(config)?;
    let summary = reporter.render()?;
    for error in &summary.failed {
        log::warn!("Skipped: {}", error);
    }
    Ok(())
}
