mod cleaner;
mod config;
mod error;
mod literal;
mod parse;
mod posting;
mod report;
mod table;

pub use cleaner::Cleaner;
pub use config::Config;
pub use error::{Error, Result};
pub use parse::{
    categorize_role, extract_locations, normalize_seniority, normalize_skills, normalize_title,
    parse_days_ago, parse_salary, parse_skill_list, parse_work_mode,
};
pub use posting::{
    Currency, Posting, RawPosting, RoleCategory, Salary, SalaryRange, Schema, Seniority, WorkMode,
    KEY_SKILLS,
};
pub use report::{Chart, ReportRow, ReportSummary, Reporter};

pub fn init_logger(default_level: log::LevelFilter) {
    pretty_env_logger::formatted_timed_builder()
        .filter_level(default_level)
        .parse_default_env()
        .init();
}
