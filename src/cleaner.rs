use crate::{
    config::Config,
    error::Result,
    posting::{transform, Posting},
    table::{drop_duplicates, drop_untitled, read_raw, write_clean, RawTable},
};

/// Turns the raw export into the clean, feature-enriched table.
pub struct Cleaner {
    config: Config,
    table: RawTable,
    pub postings: Vec<Posting>,
}

impl Cleaner {
    /// Reads the raw export named by `config`.
    pub fn load(config: Config) -> Result<Self> {
        log::info!(
            "Reading {} (exists: {})",
            config.raw_path.display(),
            config.raw_path.exists(),
        );
        let table = read_raw(&config.raw_path)?;
        log::info!("Loaded {} rows", table.rows.len());

        Ok(Self {
            config,
            table,
            postings: Vec::new(),
        })
    }

    /// Drops duplicate rows, derives every field, then drops untitled postings.
    pub fn clean(&mut self) {
        let rows = std::mem::take(&mut self.table.rows);
        let num_rows = rows.len();

        let rows = drop_duplicates(rows);
        log::info!("Dropped {} duplicate rows", num_rows - rows.len());

        let postings = transform(&self.table.schema, rows);
        let num_postings = postings.len();
        self.postings = drop_untitled(postings);
        log::info!(
            "Dropped {} rows without a title",
            num_postings - self.postings.len(),
        );
        log::info!("Rows kept: {}", self.postings.len());
    }

    /// Writes the clean table, replacing any previous one.
    pub fn save(&self) -> Result<()> {
        write_clean(
            &self.config.clean_path,
            &self.table.schema.headers,
            &self.postings,
        )?;
        log::info!("Saved to {}", self.config.clean_path.display());
        Ok(())
    }
}
