use crate::{
    literal::{self, Literal},
    posting::{Currency, RoleCategory, Salary, SalaryRange, Seniority, WorkMode},
};

macro_rules! re {
    ($name:ident, $($e:expr),* $(,)?) => {
        static $name: std::sync::LazyLock<regex::Regex> = std::sync::LazyLock::new(
            || regex::Regex::new(concat!($($e),*)).unwrap(),
        );
    };
}

// Each table is checked in order and the first match wins.

static ROLE_RULES: [(&[&str], RoleCategory); 10] = [
    (
        &["machine learning engineer", "ml engineer", "mle"],
        RoleCategory::MachineLearningEngineer,
    ),
    (&["data engineer"], RoleCategory::DataEngineer),
    (
        &["data analyst", "analytics analyst", "business analyst"],
        RoleCategory::DataAnalyst,
    ),
    (
        &["research scientist", "applied scientist", "researcher"],
        RoleCategory::ResearchScientist,
    ),
    (
        &["ai engineer", "artificial intelligence", "ai specialist"],
        RoleCategory::AiEngineer,
    ),
    (&["deep learning"], RoleCategory::DeepLearning),
    (&["computer vision"], RoleCategory::ComputerVision),
    (&["nlp", "natural language"], RoleCategory::Nlp),
    (&["data scientist", "datascientist"], RoleCategory::DataScientist),
    (&["statistician"], RoleCategory::Statistician),
];

static SENIORITY_SYNONYMS: [(&[&str], Seniority); 7] = [
    (&["intern", "internship"], Seniority::Intern),
    (&["junior", "entry", "entry level", "associate"], Seniority::Junior),
    (&["mid", "mid level", "intermediate"], Seniority::Mid),
    (&["senior", "sr"], Seniority::Senior),
    (&["lead", "principal", "staff"], Seniority::Lead),
    (&["manager", "head"], Seniority::Manager),
    (&["director", "vp", "vice president"], Seniority::DirectorPlus),
];

static WORK_MODE_KEYWORDS: [(&str, WorkMode); 4] = [
    ("remote", WorkMode::Remote),
    ("hybrid", WorkMode::Hybrid),
    ("on-site", WorkMode::OnSite),
    ("onsite", WorkMode::OnSite),
];

/// Matched against the lowercased salary text.
static CURRENCY_MARKERS: [(&str, Currency); 4] = [
    ("€", Currency::Eur),
    ("$", Currency::Usd),
    ("£", Currency::Gbp),
    ("cad", Currency::Cad),
];

/// Separates the parts of a composite location, e.g. `Remote . Berlin . Germany`.
const LOCATION_DELIMITER: &str = " . ";

/// Lowercases, trims, and collapses whitespace runs.
pub fn normalize_title(title: Option<&str>) -> String {
    re!(WHITESPACE_RE, r"\s+");

    let Some(title) = title else {
        return String::new();
    };
    let title = title.to_lowercase();
    WHITESPACE_RE.replace_all(title.trim(), " ").into_owned()
}

/// Buckets a normalized title by keyword.
pub fn categorize_role(title_norm: &str) -> RoleCategory {
    ROLE_RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| title_norm.contains(k)))
        .map(|&(_, role)| role)
        .unwrap_or(RoleCategory::Other)
}

/// Maps a seniority label onto a known level, keeping unrecognized labels
/// (title-cased) rather than discarding them.
pub fn normalize_seniority(level: Option<&str>) -> Seniority {
    let Some(level) = level else {
        return Seniority::Unknown;
    };
    let level = level.trim().to_lowercase();
    if level.is_empty() {
        return Seniority::Unknown;
    }

    SENIORITY_SYNONYMS
        .iter()
        .find(|(synonyms, _)| synonyms.contains(&level.as_str()))
        .map(|(_, seniority)| seniority.clone())
        .unwrap_or_else(|| Seniority::Other(title_case(&level)))
}

pub fn parse_work_mode(location: Option<&str>) -> WorkMode {
    let Some(location) = location else {
        return WorkMode::Unknown;
    };
    let location = location.to_lowercase();

    WORK_MODE_KEYWORDS
        .iter()
        .find(|(keyword, _)| location.contains(keyword))
        .map(|&(_, mode)| mode)
        .unwrap_or(WorkMode::Unknown)
}

/// Splits a composite location into its places, dropping work-mode keywords
/// wherever they appear.
pub fn extract_locations(location: Option<&str>) -> Vec<String> {
    let Some(location) = location else {
        return Vec::new();
    };

    location
        .trim()
        .split(LOCATION_DELIMITER)
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .filter(|part| {
            let part = part.to_lowercase();
            !WORK_MODE_KEYWORDS
                .iter()
                .any(|(keyword, _)| part == *keyword)
        })
        .map(String::from)
        .collect()
}

/// Converts a relative post date like `3 days ago` into a number of days.
pub fn parse_days_ago(post_date: Option<&str>) -> Option<u32> {
    re!(NUMBER_RE, r"\d+");

    let post_date = post_date?.trim().to_lowercase();
    // Outer `None` when there is no number, inner `None` when it overflows.
    let number = || {
        NUMBER_RE
            .find(&post_date)
            .map(|m| parse_decimal::<u32>(m.as_str()))
    };

    if post_date == "today" {
        Some(0)
    } else if post_date.contains("day") {
        number().flatten()
    } else if post_date.contains("week") {
        number().map_or(Some(7), |n| n?.checked_mul(7))
    } else if post_date.contains("month") {
        number().map_or(Some(30), |n| n?.checked_mul(30))
    } else {
        None
    }
}

/// Extracts a currency and a min/max range from free-form salary text.
///
/// Every number in the text counts toward the range, so `$100k + $20,000
/// bonus` reads as 100 to 20000.
pub fn parse_salary(salary: Option<&str>) -> Salary {
    re!(AMOUNT_RE, r"\d[\d,]*");

    let Some(salary) = salary.map(str::trim).filter(|s| !s.is_empty()) else {
        return Salary::UNKNOWN;
    };

    let lower = salary.to_lowercase();
    let currency = CURRENCY_MARKERS
        .iter()
        .find(|(marker, _)| lower.contains(marker))
        .map(|&(_, currency)| currency)
        .unwrap_or(Currency::Unknown);

    let amounts = AMOUNT_RE
        .find_iter(salary)
        .filter_map(|m| {
            let amount = parse_decimal::<u64>(&m.as_str().replace(',', ""));
            if amount.is_none() {
                log::debug!("Ignoring out-of-range salary figure: {}", m.as_str());
            }
            amount
        })
        .collect::<Vec<_>>();
    let range = amounts
        .iter()
        .min()
        .zip(amounts.iter().max())
        .map(|(&min, &max)| SalaryRange { min, max });

    Salary { currency, range }
}

/// Reads a skills cell, either a list literal (`['Python', 'SQL']`) or plain
/// comma-separated text (`Python, SQL`).
pub fn parse_skill_list(skills: Option<&str>) -> Vec<String> {
    let Some(skills) = skills.map(str::trim) else {
        return Vec::new();
    };
    if skills.is_empty() || skills == "[]" {
        return Vec::new();
    }

    match literal::parse(skills) {
        Some(Literal::List(items)) => normalize_skills(items.iter().map(Literal::to_string)),
        // A literal, but not a list of skills.
        Some(_) => Vec::new(),
        None => {
            let inner = skills.strip_prefix('[').unwrap_or(skills);
            let inner = inner.strip_suffix(']').unwrap_or(inner);
            let is_padding = |c: char| c.is_whitespace() || c == '\'' || c == '"';
            normalize_skills(inner.split(',').map(|part| part.trim_matches(is_padding)))
        }
    }
}

/// Trims and lowercases each skill, dropping empty ones.
pub fn normalize_skills<S: AsRef<str>>(skills: impl IntoIterator<Item = S>) -> Vec<String> {
    skills
        .into_iter()
        .map(|skill| skill.as_ref().trim().to_lowercase())
        .filter(|skill| !skill.is_empty())
        .collect()
}

/// Parses a run of decimal digits from any script, so `٣` reads as 3.
fn parse_decimal<T: std::str::FromStr>(digits: &str) -> Option<T> {
    re!(DIGIT_RE, r"^\d$");

    let is_digit = |c: char| DIGIT_RE.is_match(c.encode_utf8(&mut [0; 4]));
    let ascii = digits
        .chars()
        .map(|c| {
            if c.is_ascii_digit() {
                return Some(c);
            }
            if !is_digit(c) {
                return None;
            }
            // Decimal digits are assigned in runs of ten starting at zero.
            let run = (0..=c as u32)
                .rev()
                .map_while(|code| char::from_u32(code).filter(|&d| is_digit(d)))
                .count();
            char::from_digit((run as u32 - 1) % 10, 10)
        })
        .collect::<Option<String>>()?;
    ascii.parse().ok()
}

/// Uppercases the first letter of every alphabetic run and lowercases the rest.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_word = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title() {
        for (title, norm) in [
            (Some("  Senior   Data\tScientist "), "senior data scientist"),
            (Some("ML Engineer\n(Remote)"), "ml engineer (remote)"),
            (Some(""), ""),
            (Some("   "), ""),
            (None, ""),
        ] {
            assert_eq!(normalize_title(title), norm, "{:?}", title);
        }
    }

    #[test]
    fn title_is_idempotent() {
        for (title, _) in ROLE_TEST_CASES {
            let once = normalize_title(Some(title));
            assert_eq!(normalize_title(Some(&once)), once, "{}", title);
        }
    }

    #[test]
    fn role() {
        for (title, role) in ROLE_TEST_CASES {
            let norm = normalize_title(Some(title));
            assert_eq!(categorize_role(&norm), role, "{}", title);
        }
    }

    #[test]
    fn role_is_total() {
        for title in ["", " ", "???", "ÉTÉ", "🙂 engineer"] {
            assert_eq!(categorize_role(title), RoleCategory::Other, "{}", title);
        }
    }

    #[test]
    fn seniority() {
        for (level, seniority) in [
            (Some("Intern"), Seniority::Intern),
            (Some("internship"), Seniority::Intern),
            (Some("Entry Level"), Seniority::Junior),
            (Some(" associate "), Seniority::Junior),
            (Some("Mid Level"), Seniority::Mid),
            (Some("SR"), Seniority::Senior),
            (Some("Staff"), Seniority::Lead),
            (Some("Head"), Seniority::Manager),
            (Some("Vice President"), Seniority::DirectorPlus),
            (Some("mid-senior level"), Seniority::Other("Mid-Senior Level".into())),
            (Some("2nd LEVEL"), Seniority::Other("2Nd Level".into())),
            (Some("  "), Seniority::Unknown),
            (None, Seniority::Unknown),
        ] {
            assert_eq!(normalize_seniority(level), seniority, "{:?}", level);
        }
    }

    #[test]
    fn work_mode() {
        for (location, mode) in [
            (Some("Remote . New York"), WorkMode::Remote),
            (Some("Hybrid . Remote"), WorkMode::Remote),
            (Some("London . HYBRID"), WorkMode::Hybrid),
            (Some("On-site . Paris"), WorkMode::OnSite),
            (Some("Austin (onsite)"), WorkMode::OnSite),
            (Some("Berlin"), WorkMode::Unknown),
            (None, WorkMode::Unknown),
        ] {
            assert_eq!(parse_work_mode(location), mode, "{:?}", location);
        }
    }

    #[test]
    fn locations() {
        for (location, expected) in [
            (Some("Remote . New York . Hybrid"), &["New York"][..]),
            (Some("Berlin . Germany"), &["Berlin", "Germany"]),
            (Some("ONSITE . Paris .  . France"), &["Paris", "France"]),
            (Some("Remote"), &[]),
            (Some("Toronto, ON"), &["Toronto, ON"]),
            (Some("Remote-first . Lisbon"), &["Remote-first", "Lisbon"]),
            (None, &[]),
        ] {
            assert_eq!(extract_locations(location), expected, "{:?}", location);
        }
    }

    #[test]
    fn days_ago() {
        for (post_date, days) in [
            (Some("today"), Some(0)),
            (Some(" Today "), Some(0)),
            (Some("3 days ago"), Some(3)),
            (Some("30+ days ago"), Some(30)),
            (Some("1 day ago"), Some(1)),
            (Some("yesterday"), None),
            (Some("Posted today"), None),
            (Some("2 weeks ago"), Some(14)),
            (Some("a week ago"), Some(7)),
            (Some("3 months ago"), Some(90)),
            (Some("a month ago"), Some(30)),
            (Some("2024-05-01"), None),
            (Some("99999999999 days ago"), None),
            (Some("99999999999 weeks ago"), None),
            (Some("99999999999 months ago"), None),
            (Some("200000000 months ago"), None),
            (Some("٣ weeks ago"), Some(21)),
            (Some("١٢ days ago"), Some(12)),
            (Some(""), None),
            (None, None),
        ] {
            assert_eq!(parse_days_ago(post_date), days, "{:?}", post_date);
        }
    }

    #[test]
    fn salary() {
        let range = |min, max| Some(SalaryRange { min, max });
        for (salary, currency, expected) in [
            (Some("$80,000 - $120,000"), Currency::Usd, range(80000, 120000)),
            (Some("€50000"), Currency::Eur, range(50000, 50000)),
            (Some("£45,000 per year"), Currency::Gbp, range(45000, 45000)),
            (Some("CAD 90,000-110,000"), Currency::Cad, range(90000, 110000)),
            (Some("90000 cad"), Currency::Cad, range(90000, 90000)),
            (Some("€40k - $50k"), Currency::Eur, range(40, 50)),
            (Some("$100 + $20,000 bonus"), Currency::Usd, range(100, 20000)),
            (Some("120000 - 80000"), Currency::Unknown, range(80000, 120000)),
            (Some("Negotiable"), Currency::Unknown, None),
            (Some("$ competitive"), Currency::Usd, None),
            (Some("   "), Currency::Unknown, None),
            (Some("99999999999999999999999"), Currency::Unknown, None),
            (Some("€٥٠,٠٠٠"), Currency::Eur, range(50000, 50000)),
            (None, Currency::Unknown, None),
        ] {
            assert_eq!(
                parse_salary(salary),
                Salary {
                    currency,
                    range: expected,
                },
                "{:?}",
                salary,
            );
        }
    }

    #[test]
    fn skills() {
        for (skills, expected) in [
            (Some("['Python', 'SQL']"), &["python", "sql"][..]),
            (Some(r#"["Power BI", " AWS ", ""]"#), &["power bi", "aws"]),
            (Some("Python, SQL"), &["python", "sql"]),
            (Some("[Python, 'SQL' , ]"), &["python", "sql"]),
            (Some("['Python', 'SQL'"), &["python", "sql"]),
            (Some("'python'"), &[]),
            (Some("[1, True]"), &["1", "true"]),
            (Some("[1_000, 1e5]"), &["1000", "100000.0"]),
            (Some("{'Python', 'SQL'}"), &[]),
            (Some("{'Python': 1}"), &[]),
            (Some("[]"), &[]),
            (Some(" "), &[]),
            (Some(""), &[]),
            (None, &[]),
        ] {
            assert_eq!(parse_skill_list(skills), expected, "{:?}", skills);
        }

        // Runaway nesting falls back to comma splitting.
        let brackets = "[".repeat(100_000);
        assert_eq!(parse_skill_list(Some(&brackets)), [&brackets[1..]]);
    }

    #[test]
    fn skill_list_from_container() {
        assert_eq!(
            normalize_skills(vec![" Docker ".to_string(), String::new(), "K8S".into()]),
            ["docker", "k8s"],
        );
    }

    const ROLE_TEST_CASES: [(&str, RoleCategory); 22] = [
        (
            "Senior Machine Learning Engineer",
            RoleCategory::MachineLearningEngineer,
        ),
        ("ML Engineer, Ranking", RoleCategory::MachineLearningEngineer),
        ("MLE, Search", RoleCategory::MachineLearningEngineer),
        ("Big Data Engineer", RoleCategory::DataEngineer),
        (
            "Data Engineer / Data Scientist",
            RoleCategory::DataEngineer,
        ),
        ("Business  Analyst", RoleCategory::DataAnalyst),
        ("Analytics Analyst II", RoleCategory::DataAnalyst),
        ("Research Scientist, NLP", RoleCategory::ResearchScientist),
        ("Applied Scientist", RoleCategory::ResearchScientist),
        ("AI Researcher", RoleCategory::ResearchScientist),
        ("Generative AI Engineer", RoleCategory::AiEngineer),
        (
            "Artificial Intelligence Lead",
            RoleCategory::AiEngineer,
        ),
        ("Deep Learning Engineer", RoleCategory::DeepLearning),
        (
            "Computer Vision Developer",
            RoleCategory::ComputerVision,
        ),
        ("NLP Developer", RoleCategory::Nlp),
        (
            "Natural Language Processing Specialist",
            RoleCategory::Nlp,
        ),
        ("Lead Data Scientist", RoleCategory::DataScientist),
        ("DataScientist", RoleCategory::DataScientist),
        ("Statistician", RoleCategory::Statistician),
        ("Biostatistician", RoleCategory::Statistician),
        ("Software Engineer", RoleCategory::Other),
        ("Product Manager", RoleCategory::Other),
    ];
}
