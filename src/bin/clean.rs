use ai_jobs::{init_logger, Cleaner, Config};

fn main() -> ai_jobs::Result<()> {
    init_logger(log::LevelFilter::Info);
    let config = Config::load(Config::FILE_PATH)?;
    let mut cleaner = Cleaner::load(config)?;
    cleaner.clean();
    cleaner.save()
}
