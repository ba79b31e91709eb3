use std::{
    collections::{BTreeMap, HashMap},
    panic::{catch_unwind, AssertUnwindSafe},
    path::{Path, PathBuf},
};

use plotters::prelude::*;
use serde::Deserialize;
use tiny_bail::prelude::*;

use crate::{
    config::Config,
    error::{Error, Result},
    parse::parse_skill_list,
};

/// The columns of the clean table that the report reads.
#[derive(Deserialize, Debug)]
struct CleanRecord {
    role_category: String,
    skills_list: String,
    work_mode: String,
    primary_location: String,
    num_skills: usize,
}

/// One clean posting, as far as the report is concerned.
#[derive(Clone, PartialEq, Debug)]
pub struct ReportRow {
    pub role_category: String,
    pub skills: Vec<String>,
    pub work_mode: String,
    pub primary_location: String,
    pub num_skills: usize,
}

impl From<CleanRecord> for ReportRow {
    fn from(record: CleanRecord) -> Self {
        Self {
            role_category: record.role_category,
            skills: parse_skill_list(Some(&record.skills_list)),
            work_mode: record.work_mode,
            primary_location: record.primary_location,
            num_skills: record.num_skills,
        }
    }
}

const REPORT_COLUMNS: [&str; 5] = [
    "role_category",
    "skills_list",
    "work_mode",
    "primary_location",
    "num_skills",
];

/// Reads the clean table. Rows that fail to decode are skipped with a warning.
pub fn read_clean(path: &Path) -> Result<Vec<ReportRow>> {
    let mut reader = csv::Reader::from_path(path).map_err(Error::csv(path))?;
    let headers = reader.headers().map_err(Error::csv(path))?;
    if let Some(column) = REPORT_COLUMNS
        .into_iter()
        .find(|column| !headers.iter().any(|header| header == *column))
    {
        return Err(Error::MissingColumn {
            path: path.to_path_buf(),
            column,
        });
    }

    let mut rows = Vec::new();
    for record in reader.deserialize::<CleanRecord>() {
        let record = c!(record);
        rows.push(record.into());
    }
    Ok(rows)
}

/// Counts each distinct value, most frequent first. Ties keep first-seen order.
pub fn value_counts<S: AsRef<str>>(values: impl IntoIterator<Item = S>) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    let mut index = HashMap::<String, usize>::new();
    for value in values {
        let value = value.as_ref();
        if let Some(&idx) = index.get(value) {
            counts[idx].1 += 1;
        } else {
            index.insert(value.to_string(), counts.len());
            counts.push((value.to_string(), 1));
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

pub fn top_roles(rows: &[ReportRow]) -> Vec<(String, usize)> {
    let mut counts = value_counts(rows.iter().map(|row| &row.role_category));
    counts.truncate(10);
    counts
}

/// Counts over every skill of every posting.
pub fn top_skills(rows: &[ReportRow]) -> Vec<(String, usize)> {
    let mut counts = value_counts(rows.iter().flat_map(|row| &row.skills));
    counts.truncate(15);
    counts
}

pub fn work_mode_distribution(rows: &[ReportRow]) -> Vec<(String, usize)> {
    value_counts(rows.iter().map(|row| &row.work_mode))
}

pub fn top_locations(rows: &[ReportRow]) -> Vec<(String, usize)> {
    let mut counts = value_counts(rows.iter().map(|row| &row.primary_location));
    counts.truncate(10);
    counts
}

/// Mean skill count per role, highest first. Ties are ordered by role name.
pub fn skills_by_role(rows: &[ReportRow]) -> Vec<(String, f64)> {
    let mut totals = BTreeMap::<&str, (usize, usize)>::new();
    for row in rows {
        let (sum, count) = totals.entry(&row.role_category).or_default();
        *sum += row.num_skills;
        *count += 1;
    }

    let mut means = totals
        .into_iter()
        .map(|(role, (sum, count))| (role.to_string(), sum as f64 / count as f64))
        .collect::<Vec<_>>();
    means.sort_by(|a, b| b.1.total_cmp(&a.1));
    means
}

/// A bar chart, ready to render.
#[derive(Clone, PartialEq, Debug)]
pub struct Chart {
    pub file_name: &'static str,
    pub title: &'static str,
    pub x_label: &'static str,
    pub y_label: &'static str,
    /// Turn tick labels sideways, for long category names.
    pub rotate_labels: bool,
    pub bars: Vec<(String, f64)>,
}

fn as_bars(counts: Vec<(String, usize)>) -> Vec<(String, f64)> {
    counts
        .into_iter()
        .map(|(label, count)| (label, count as f64))
        .collect()
}

impl Chart {
    /// Every chart in the report, one per aggregation.
    pub fn all(rows: &[ReportRow]) -> Vec<Self> {
        vec![
            Self {
                file_name: "top_roles.png",
                title: "Top AI & Data Job Roles",
                x_label: "Role",
                y_label: "Number of Postings",
                rotate_labels: true,
                bars: as_bars(top_roles(rows)),
            },
            Self {
                file_name: "top_skills.png",
                title: "Top 15 In-Demand Skills",
                x_label: "Skill",
                y_label: "Frequency",
                rotate_labels: true,
                bars: as_bars(top_skills(rows)),
            },
            Self {
                file_name: "work_mode_distribution.png",
                title: "Work Mode Distribution",
                x_label: "Work Mode",
                y_label: "Number of Postings",
                rotate_labels: false,
                bars: as_bars(work_mode_distribution(rows)),
            },
            Self {
                file_name: "top_locations.png",
                title: "Top Job Locations",
                x_label: "Location",
                y_label: "Number of Postings",
                rotate_labels: true,
                bars: as_bars(top_locations(rows)),
            },
            Self {
                file_name: "skills_by_role.png",
                title: "Average Number of Skills Required by Role",
                x_label: "Role",
                y_label: "Average Skill Count",
                rotate_labels: true,
                bars: skills_by_role(rows),
            },
        ]
    }

    /// Renders the chart to a PNG at `path`.
    pub fn render(
        &self,
        path: &Path,
        size: (u32, u32),
    ) -> std::result::Result<(), Box<dyn std::error::Error>> {
        let root = BitMapBackend::new(path, size).into_drawing_area();
        root.fill(&WHITE)?;

        let num_bars = self.bars.len().max(1);
        let y_max = self.bars.iter().map(|&(_, value)| value).fold(0.0, f64::max);
        let y_max = if y_max > 0.0 { y_max * 1.1 } else { 1.0 };

        let label_font = ("sans-serif", 14).into_font();
        let (label_font, label_area) = if self.rotate_labels {
            (label_font.transform(FontTransform::Rotate90), 160)
        } else {
            (label_font, 50)
        };

        let mut chart = ChartBuilder::on(&root)
            .caption(self.title, ("sans-serif", 28))
            .margin(20)
            .x_label_area_size(label_area)
            .y_label_area_size(70)
            .build_cartesian_2d((0..num_bars).into_segmented(), 0.0..y_max)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(num_bars)
            .x_label_formatter(&|value: &SegmentValue<usize>| match value {
                SegmentValue::CenterOf(idx) => self
                    .bars
                    .get(*idx)
                    .map(|(label, _)| label.clone())
                    .unwrap_or_default(),
                _ => String::new(),
            })
            .x_label_style(label_font)
            .x_desc(self.x_label)
            .y_desc(self.y_label)
            .draw()?;

        chart.draw_series(
            Histogram::vertical(&chart)
                .style(BLUE.mix(0.8).filled())
                .margin(8)
                .data(self.bars.iter().enumerate().map(|(idx, &(_, value))| (idx, value))),
        )?;

        root.present()?;
        Ok(())
    }
}

/// Which charts were written and which failed.
#[derive(Debug, Default)]
pub struct ReportSummary {
    pub written: Vec<PathBuf>,
    pub failed: Vec<Error>,
}

/// Reads the clean table and renders the chart set.
pub struct Reporter {
    config: Config,
    pub rows: Vec<ReportRow>,
}

impl Reporter {
    pub fn load(config: Config) -> Result<Self> {
        log::info!(
            "Reading {} (exists: {})",
            config.clean_path.display(),
            config.clean_path.exists(),
        );
        let rows = read_clean(&config.clean_path)?;
        log::info!("Loaded {} clean rows", rows.len());

        Ok(Self { config, rows })
    }

    /// Renders every chart into the figures directory. A chart that fails is
    /// logged and recorded; the rest still render.
    pub fn render(&self) -> Result<ReportSummary> {
        let dir = &self.config.figures_dir;
        std::fs::create_dir_all(dir).map_err(Error::io(dir))?;

        let size = self.config.chart_size();
        let mut summary = ReportSummary::default();
        for chart in Chart::all(&self.rows) {
            let path = dir.join(chart.file_name);
            let message = match catch_unwind(AssertUnwindSafe(|| chart.render(&path, size))) {
                Ok(Ok(())) => {
                    log::info!("Saved {}", path.display());
                    summary.written.push(path);
                    continue;
                }
                Ok(Err(e)) => e.to_string(),
                Err(_) => "panicked while drawing".to_string(),
            };

            let error = Error::Chart { path, message };
            log::error!("{}", error);
            summary.failed.push(error);
        }

        log::info!(
            "Saved {} charts to {} ({} failed)",
            summary.written.len(),
            dir.display(),
            summary.failed.len(),
        );
        Ok(summary)
    }
}
