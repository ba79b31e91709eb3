use std::fmt::Display;

use crate::{
    literal::list_repr,
    parse::{
        categorize_role, extract_locations, normalize_seniority, normalize_title,
        parse_days_ago, parse_salary, parse_skill_list, parse_work_mode,
    },
};

/// Skills that get their own `has_<skill>` column in the clean table.
pub const KEY_SKILLS: [&str; 16] = [
    "python",
    "sql",
    "r",
    "excel",
    "tableau",
    "power bi",
    "aws",
    "azure",
    "gcp",
    "spark",
    "docker",
    "kubernetes",
    "tensorflow",
    "pytorch",
    "scikit-learn",
    "pandas",
];

/// One row of the raw export, one cell per header, each cell trimmed.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct RawPosting {
    pub values: Vec<String>,
}

impl RawPosting {
    pub fn new(values: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// The cell at `idx`, or `None` if it's absent or blank.
    pub fn get(&self, idx: usize) -> Option<&str> {
        self.values
            .get(idx)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
    }
}

/// The header of a raw export, with the position of each column we parse.
#[derive(Clone, Debug)]
pub struct Schema {
    pub headers: Vec<String>,
    job_title: usize,
    location: usize,
    seniority_level: usize,
    post_date: usize,
    salary: usize,
    skills: usize,
}

impl Schema {
    pub const REQUIRED_COLUMNS: [&str; 8] = [
        "job_title",
        "company",
        "location",
        "seniority_level",
        "post_date",
        "salary",
        "skills",
        "status",
    ];

    /// Locates the required columns by name. Returns the first missing column
    /// on failure.
    pub fn new(headers: Vec<String>) -> Result<Self, &'static str> {
        let position = |column: &'static str| {
            headers
                .iter()
                .position(|header| header.trim() == column)
                .ok_or(column)
        };
        for column in Self::REQUIRED_COLUMNS {
            position(column)?;
        }

        Ok(Self {
            job_title: position("job_title")?,
            location: position("location")?,
            seniority_level: position("seniority_level")?,
            post_date: position("post_date")?,
            salary: position("salary")?,
            skills: position("skills")?,
            headers,
        })
    }

    pub fn job_title<'a>(&self, raw: &'a RawPosting) -> Option<&'a str> {
        raw.get(self.job_title)
    }
}

/// A coarse job-function bucket derived from title keywords.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum RoleCategory {
    MachineLearningEngineer,
    DataEngineer,
    DataAnalyst,
    ResearchScientist,
    AiEngineer,
    DeepLearning,
    ComputerVision,
    Nlp,
    DataScientist,
    Statistician,
    Other,
}

impl Display for RoleCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            RoleCategory::MachineLearningEngineer => "Machine Learning Engineer",
            RoleCategory::DataEngineer => "Data Engineer",
            RoleCategory::DataAnalyst => "Data Analyst",
            RoleCategory::ResearchScientist => "Research Scientist",
            RoleCategory::AiEngineer => "AI Engineer",
            RoleCategory::DeepLearning => "Deep Learning",
            RoleCategory::ComputerVision => "Computer Vision",
            RoleCategory::Nlp => "NLP",
            RoleCategory::DataScientist => "Data Scientist",
            RoleCategory::Statistician => "Statistician",
            RoleCategory::Other => "Other",
        })
    }
}

/// A normalized career level.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum Seniority {
    Intern,
    Junior,
    Mid,
    Senior,
    Lead,
    Manager,
    DirectorPlus,
    /// An unrecognized level, title-cased.
    Other(String),
    Unknown,
}

impl Display for Seniority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Seniority::Intern => "Intern",
            Seniority::Junior => "Junior",
            Seniority::Mid => "Mid",
            Seniority::Senior => "Senior",
            Seniority::Lead => "Lead",
            Seniority::Manager => "Manager",
            Seniority::DirectorPlus => "Director+",
            Seniority::Other(level) => level.as_str(),
            Seniority::Unknown => "Unknown",
        })
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum WorkMode {
    Remote,
    Hybrid,
    OnSite,
    Unknown,
}

impl Display for WorkMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            WorkMode::Remote => "Remote",
            WorkMode::Hybrid => "Hybrid",
            WorkMode::OnSite => "On-site",
            WorkMode::Unknown => "Unknown",
        })
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Currency {
    Eur,
    Usd,
    Gbp,
    Cad,
    Unknown,
}

impl Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Currency::Eur => "EUR",
            Currency::Usd => "USD",
            Currency::Gbp => "GBP",
            Currency::Cad => "CAD",
            Currency::Unknown => "Unknown",
        })
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct SalaryRange {
    pub min: u64,
    pub max: u64,
}

/// A parsed salary. `range` is `None` when no number was found.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Salary {
    pub currency: Currency,
    pub range: Option<SalaryRange>,
}

impl Salary {
    pub const UNKNOWN: Self = Self {
        currency: Currency::Unknown,
        range: None,
    };
}

/// A cleaned job posting: the raw row plus every derived field.
#[derive(Clone, PartialEq, Debug)]
pub struct Posting {
    pub raw: RawPosting,
    pub job_title_norm: String,
    pub role_category: RoleCategory,
    pub seniority_clean: Seniority,
    pub work_mode: WorkMode,
    pub location_list: Vec<String>,
    pub days_ago: Option<u32>,
    pub salary: Salary,
    pub skills_list: Vec<String>,
}

impl Posting {
    pub fn new(schema: &Schema, raw: RawPosting) -> Self {
        let job_title_norm = normalize_title(raw.get(schema.job_title));
        let location = raw.get(schema.location);

        Self {
            role_category: categorize_role(&job_title_norm),
            job_title_norm,
            seniority_clean: normalize_seniority(raw.get(schema.seniority_level)),
            work_mode: parse_work_mode(location),
            location_list: extract_locations(location),
            days_ago: parse_days_ago(raw.get(schema.post_date)),
            salary: parse_salary(raw.get(schema.salary)),
            skills_list: parse_skill_list(raw.get(schema.skills)),
            raw,
        }
    }

    pub fn primary_location(&self) -> &str {
        self.location_list
            .first()
            .map(String::as_str)
            .unwrap_or("Unknown")
    }

    pub fn num_skills(&self) -> usize {
        self.skills_list.len()
    }

    pub fn has_skill(&self, skill: &str) -> bool {
        self.skills_list.iter().any(|s| s == skill)
    }

    /// Names of the derived columns, in output order.
    pub fn derived_headers() -> Vec<String> {
        let mut headers = [
            "job_title_norm",
            "role_category",
            "seniority_clean",
            "work_mode",
            "location_list",
            "primary_location",
            "days_ago",
            "salary_currency",
            "salary_min",
            "salary_max",
            "skills_list",
            "num_skills",
        ]
        .map(String::from)
        .to_vec();
        headers.extend(KEY_SKILLS.iter().map(|skill| skill_column(skill)));
        headers
    }

    /// Derived cells, matching `derived_headers`. Undefined numbers are blank.
    pub fn derived_values(&self) -> Vec<String> {
        let blank_or = |n: Option<u64>| n.map(|n| n.to_string()).unwrap_or_default();
        let mut values = vec![
            self.job_title_norm.clone(),
            self.role_category.to_string(),
            self.seniority_clean.to_string(),
            self.work_mode.to_string(),
            list_repr(&self.location_list),
            self.primary_location().to_string(),
            blank_or(self.days_ago.map(u64::from)),
            self.salary.currency.to_string(),
            blank_or(self.salary.range.map(|r| r.min)),
            blank_or(self.salary.range.map(|r| r.max)),
            list_repr(&self.skills_list),
            self.num_skills().to_string(),
        ];
        values.extend(KEY_SKILLS.iter().map(|skill| {
            (if self.has_skill(skill) { "True" } else { "False" }).to_string()
        }));
        values
    }
}

/// `power bi` becomes `has_power_bi`, `scikit-learn` becomes `has_scikit_learn`.
pub fn skill_column(skill: &str) -> String {
    format!("has_{}", skill.replace(['-', ' '], "_"))
}

/// Derives every field for each row, preserving row order.
pub fn transform(schema: &Schema, rows: impl IntoIterator<Item = RawPosting>) -> Vec<Posting> {
    rows.into_iter().map(|raw| Posting::new(schema, raw)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> Schema {
        Schema::new(
            [
                "job_title",
                "company",
                "location",
                "seniority_level",
                "post_date",
                "salary",
                "skills",
                "status",
            ]
            .map(String::from)
            .to_vec(),
        )
        .unwrap()
    }

    #[test]
    fn schema_requires_every_column() {
        let headers = ["job_title", "company", "location", "salary"].map(String::from);
        assert_eq!(
            Schema::new(headers.to_vec()).unwrap_err(),
            "seniority_level",
        );
    }

    #[test]
    fn schema_ignores_column_order() {
        let headers = [
            "status", "skills", "salary", "post_date", "extra", "seniority_level", "location",
            "company", "job_title",
        ]
        .map(String::from)
        .to_vec();
        let schema = Schema::new(headers).unwrap();
        let raw = RawPosting::new(["", "", "", "", "", "", "", "", "Data Engineer"]);
        assert_eq!(schema.job_title(&raw), Some("Data Engineer"));
    }

    #[test]
    fn blank_cells_are_missing() {
        let raw = RawPosting::new(["a", "  ", ""]);
        assert_eq!(raw.get(0), Some("a"));
        assert_eq!(raw.get(1), None);
        assert_eq!(raw.get(2), None);
        assert_eq!(raw.get(3), None);
    }

    #[test]
    fn new_posting() {
        let raw = RawPosting::new([
            "Senior  Machine Learning Engineer",
            "Acme",
            "Remote . Berlin . Germany",
            "sr",
            "2 weeks ago",
            "€60,000 - €80,000",
            "['Python', 'PyTorch', 'R']",
            "Active",
        ]);
        let posting = Posting::new(&schema(), raw.clone());

        assert_eq!(posting.raw, raw);
        assert_eq!(posting.job_title_norm, "senior machine learning engineer");
        assert_eq!(posting.role_category, RoleCategory::MachineLearningEngineer);
        assert_eq!(posting.seniority_clean, Seniority::Senior);
        assert_eq!(posting.work_mode, WorkMode::Remote);
        assert_eq!(posting.location_list, ["Berlin", "Germany"]);
        assert_eq!(posting.primary_location(), "Berlin");
        assert_eq!(posting.days_ago, Some(14));
        assert_eq!(
            posting.salary,
            Salary {
                currency: Currency::Eur,
                range: Some(SalaryRange {
                    min: 60000,
                    max: 80000,
                }),
            },
        );
        assert_eq!(posting.skills_list, ["python", "pytorch", "r"]);
        assert_eq!(posting.num_skills(), 3);
        assert!(posting.has_skill("r"));
        assert!(!posting.has_skill("sql"));
    }

    #[test]
    fn empty_posting() {
        let posting = Posting::new(&schema(), RawPosting::new([""; 8]));

        assert_eq!(posting.job_title_norm, "");
        assert_eq!(posting.role_category, RoleCategory::Other);
        assert_eq!(posting.seniority_clean, Seniority::Unknown);
        assert_eq!(posting.work_mode, WorkMode::Unknown);
        assert!(posting.location_list.is_empty());
        assert_eq!(posting.primary_location(), "Unknown");
        assert_eq!(posting.days_ago, None);
        assert_eq!(posting.salary, Salary::UNKNOWN);
        assert!(posting.skills_list.is_empty());
    }

    #[test]
    fn derived_columns_line_up() {
        let headers = Posting::derived_headers();
        let posting = Posting::new(
            &schema(),
            RawPosting::new([
                "Data Analyst",
                "Acme",
                "Hybrid . Toronto",
                "",
                "yesterday",
                "CAD 70000",
                "SQL, Power BI, scikit-learn",
                "",
            ]),
        );
        let values = posting.derived_values();
        assert_eq!(headers.len(), values.len());
        assert_eq!(headers.len(), 12 + KEY_SKILLS.len());

        let cell = |name: &str| {
            let idx = headers.iter().position(|h| h == name).unwrap();
            values[idx].as_str()
        };
        assert_eq!(cell("role_category"), "Data Analyst");
        assert_eq!(cell("seniority_clean"), "Unknown");
        assert_eq!(cell("work_mode"), "Hybrid");
        assert_eq!(cell("location_list"), "['Toronto']");
        assert_eq!(cell("primary_location"), "Toronto");
        assert_eq!(cell("days_ago"), "");
        assert_eq!(cell("salary_currency"), "CAD");
        assert_eq!(cell("salary_min"), "70000");
        assert_eq!(cell("salary_max"), "70000");
        assert_eq!(cell("skills_list"), "['sql', 'power bi', 'scikit-learn']");
        assert_eq!(cell("num_skills"), "3");
        assert_eq!(cell("has_sql"), "True");
        assert_eq!(cell("has_power_bi"), "True");
        assert_eq!(cell("has_scikit_learn"), "True");
        assert_eq!(cell("has_python"), "False");
    }

    #[test]
    fn transform_keeps_order() {
        let rows = ["Statistician", "NLP Engineer", "Chef"]
            .map(|title| RawPosting::new([title, "", "", "", "", "", "", ""]));
        let roles = transform(&schema(), rows)
            .into_iter()
            .map(|posting| posting.role_category)
            .collect::<Vec<_>>();
        assert_eq!(
            roles,
            [
                RoleCategory::Statistician,
                RoleCategory::Nlp,
                RoleCategory::Other,
            ],
        );
    }
}
