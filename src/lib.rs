use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Data structures
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionType {
    Error,
    Warning,
    Info,
    Success,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionCategory {
    Structure,
    Content,
    Formatting,
    Keywords,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub id: String,
    #[serde(rename = "type")]
    pub suggestion_type: SuggestionType,
    pub category: SuggestionCategory,
    pub title: String,
    pub description: String,
    /// 1-5, 5 = most urgent.
    pub priority: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub has_contact_info: bool,
    pub has_summary: bool,
    pub has_experience: bool,
    pub has_education: bool,
    pub has_skills: bool,
    pub bullet_count: usize,
    pub action_verb_count: usize,
    pub quantified_bullets: usize,
    pub paragraph_count: usize,
    pub long_paragraphs: usize,
    /// Mean character length of bullet lines; 0 when there are no bullets.
    pub average_bullet_length: f64,
    /// Occurrence counts for the fixed keyword vocabulary; zero-count keys
    /// omitted. Ordered so repeated runs serialize byte-identically.
    pub keyword_density: BTreeMap<String, usize>,
    pub date_consistency: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub score: i32,
    pub word_count: usize,
    pub reading_time_minutes: usize,
    pub suggestions: Vec<Suggestion>,
    pub metrics: Metrics,
}

// ---------------------------------------------------------------------------
// Thresholds
// ---------------------------------------------------------------------------

struct Thresholds {
    reading_words_per_minute: usize,
    word_count_low: usize,
    word_count_high: usize,
    min_bullets: usize,
    action_verb_ratio_floor: f64,
    quantified_ratio_floor: f64,
    long_paragraph_lines: usize,
    bullet_length_max: f64,
    word_sweet_spot_min: usize,
    word_sweet_spot_max: usize,
    contact_points: f64,
    summary_points: f64,
    experience_points: f64,
    education_points: f64,
    skills_points: f64,
    action_verb_weight: f64,
    quantified_weight: f64,
    formatting_bonus: f64,
    score_max: f64,
}

static T: Thresholds = Thresholds {
    reading_words_per_minute: 200,
    word_count_low: 200,
    word_count_high: 800,
    min_bullets: 3,
    action_verb_ratio_floor: 0.6,
    quantified_ratio_floor: 0.4,
    long_paragraph_lines: 4,
    bullet_length_max: 150.0,
    word_sweet_spot_min: 300,
    word_sweet_spot_max: 600,
    contact_points: 10.0,
    summary_points: 5.0,
    experience_points: 15.0,
    education_points: 5.0,
    skills_points: 5.0,
    action_verb_weight: 20.0,
    quantified_weight: 20.0,
    formatting_bonus: 5.0,
    score_max: 100.0,
};

// ---------------------------------------------------------------------------
// Vocabularies
// ---------------------------------------------------------------------------

/// Glyphs that mark a line as a bullet item, after leading whitespace.
const BULLET_GLYPHS: &[char] = &['-', '•', '●', '∙', '◦', '▪', '▫'];

static ACTION_VERBS: Lazy<std::collections::HashSet<&'static str>> = Lazy::new(|| {
    [
        "achieved",
        "improved",
        "developed",
        "created",
        "implemented",
        "designed",
        "managed",
        "led",
        "built",
        "launched",
        "increased",
        "reduced",
        "streamlined",
        "optimized",
        "analyzed",
        "coordinated",
        "established",
        "generated",
        "delivered",
        "spearheaded",
        "collaborated",
        "mentored",
        "architected",
        "engineered",
    ]
    .into_iter()
    .collect()
});

static KEYWORDS: &[&str] = &[
    "javascript",
    "typescript",
    "python",
    "java",
    "react",
    "node",
    "sql",
    "aws",
    "docker",
    "kubernetes",
    "git",
    "agile",
    "scrum",
    "leadership",
    "management",
    "team",
    "project",
    "development",
];

// ---------------------------------------------------------------------------
// Compiled patterns
// ---------------------------------------------------------------------------

static SUMMARY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)summary|objective|profile").unwrap());

static EXPERIENCE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)experience|employment|work history").unwrap());

static EDUCATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)education|academic|degree").unwrap());

static SKILLS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)skills|technologies|competencies").unwrap());

// Proxy for a phone number: any run of three consecutive digits.
static DIGIT_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{3}").unwrap());

// Dollar amounts, signed percentages, or bare numbers with an optional
// magnitude suffix all count as quantification.
static QUANTIFIED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\d+|[+-]?\d+(%|[KkMm]|\+)?").unwrap());

static PARAGRAPH_SPLIT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{2,}").unwrap());

// Three mutually exclusive date formats: 01/2020, Jan 2020, 2020-01.
static SLASH_DATE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\d{1,2}/\d{4}\b").unwrap());

// Abbreviated form only; "January 2021" is not the Mon YYYY format.
static MONTH_DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)\s+\d{4}\b").unwrap()
});

static ISO_DATE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\d{4}-\d{2}\b").unwrap());

static KEYWORD_RE: Lazy<Regex> = Lazy::new(|| {
    let alt = KEYWORDS
        .iter()
        .map(|w| regex::escape(w))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!("\\b({alt})\\b")).unwrap()
});

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

fn is_bullet_line(trimmed: &str) -> bool {
    trimmed
        .chars()
        .next()
        .is_some_and(|c| BULLET_GLYPHS.contains(&c))
}

/// First word of a bullet line with the leading glyph(s) stripped.
fn bullet_leading_word(trimmed: &str) -> Option<&str> {
    trimmed
        .trim_start_matches(BULLET_GLYPHS)
        .split_whitespace()
        .next()
}

// ---------------------------------------------------------------------------
// Metric extraction
// ---------------------------------------------------------------------------

pub fn extract_metrics(text: &str) -> Metrics {
    let has_contact_info = text.contains('@') && DIGIT_RUN_RE.is_match(text);
    let has_summary = SUMMARY_RE.is_match(text);
    let has_experience = EXPERIENCE_RE.is_match(text);
    let has_education = EDUCATION_RE.is_match(text);
    let has_skills = SKILLS_RE.is_match(text);

    let bullet_lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| is_bullet_line(line))
        .collect();
    let bullet_count = bullet_lines.len();

    let mut action_verb_count = 0usize;
    let mut quantified_bullets = 0usize;
    let mut bullet_chars = 0usize;
    for line in &bullet_lines {
        bullet_chars += line.chars().count();
        if let Some(word) = bullet_leading_word(line) {
            if ACTION_VERBS.contains(word.to_lowercase().as_str()) {
                action_verb_count += 1;
            }
        }
        if QUANTIFIED_RE.is_match(line) {
            quantified_bullets += 1;
        }
    }
    let average_bullet_length = if bullet_count == 0 {
        0.0
    } else {
        bullet_chars as f64 / bullet_count as f64
    };

    let paragraphs: Vec<&str> = PARAGRAPH_SPLIT_RE
        .split(text)
        .filter(|p| !p.trim().is_empty())
        .collect();
    let paragraph_count = paragraphs.len();
    let long_paragraphs = paragraphs
        .iter()
        .filter(|p| p.trim().split('\n').count() > T.long_paragraph_lines)
        .count();

    // Consistent when at most one of the three date formats appears anywhere.
    let formats_present = [&*SLASH_DATE_RE, &*MONTH_DATE_RE, &*ISO_DATE_RE]
        .iter()
        .filter(|re| re.is_match(text))
        .count();
    let date_consistency = formats_present <= 1;

    let lower = text.to_lowercase();
    let mut keyword_density: BTreeMap<String, usize> = BTreeMap::new();
    for m in KEYWORD_RE.find_iter(&lower) {
        *keyword_density.entry(m.as_str().to_string()).or_insert(0) += 1;
    }

    Metrics {
        has_contact_info,
        has_summary,
        has_experience,
        has_education,
        has_skills,
        bullet_count,
        action_verb_count,
        quantified_bullets,
        paragraph_count,
        long_paragraphs,
        average_bullet_length,
        keyword_density,
        date_consistency,
    }
}

// ---------------------------------------------------------------------------
// Suggestion rules
// ---------------------------------------------------------------------------

struct Rule {
    id: &'static str,
    suggestion_type: SuggestionType,
    category: SuggestionCategory,
    priority: u8,
    title: &'static str,
    triggers: fn(&Metrics, usize) -> bool,
    describe: fn(&Metrics, usize) -> String,
}

// Evaluated in order; equal-priority suggestions keep this relative order.
static RULES: &[Rule] = &[
    Rule {
        id: "word-count-low",
        suggestion_type: SuggestionType::Warning,
        category: SuggestionCategory::Content,
        priority: 4,
        title: "Resume is too short",
        triggers: |_, wc| wc < T.word_count_low,
        describe: |_, wc| {
            format!(
                "At {wc} words the resume reads thin. Aim for 300-600 words of substantive content."
            )
        },
    },
    Rule {
        id: "word-count-high",
        suggestion_type: SuggestionType::Warning,
        category: SuggestionCategory::Content,
        priority: 3,
        title: "Resume is too long",
        triggers: |_, wc| wc > T.word_count_high,
        describe: |_, wc| {
            format!(
                "At {wc} words the resume runs long. Trim to the strongest material; 300-600 words is the sweet spot."
            )
        },
    },
    Rule {
        id: "missing-contact",
        suggestion_type: SuggestionType::Error,
        category: SuggestionCategory::Structure,
        priority: 5,
        title: "Missing contact information",
        triggers: |m, _| !m.has_contact_info,
        describe: |_, _| {
            "No email address and phone number were found. Add them near the top so recruiters can reach you.".to_string()
        },
    },
    Rule {
        id: "missing-summary",
        suggestion_type: SuggestionType::Warning,
        category: SuggestionCategory::Structure,
        priority: 3,
        title: "Add a summary section",
        triggers: |m, _| !m.has_summary,
        describe: |_, _| {
            "A short summary or objective at the top gives readers your pitch in the first few seconds.".to_string()
        },
    },
    Rule {
        id: "missing-skills",
        suggestion_type: SuggestionType::Warning,
        category: SuggestionCategory::Structure,
        priority: 4,
        title: "Add a skills section",
        triggers: |m, _| !m.has_skills,
        describe: |_, _| {
            "A dedicated skills section lists the technologies and competencies you want to be found for.".to_string()
        },
    },
    Rule {
        id: "few-bullets",
        suggestion_type: SuggestionType::Info,
        category: SuggestionCategory::Formatting,
        priority: 3,
        title: "Use more bullet points",
        triggers: |m, _| m.bullet_count < T.min_bullets,
        describe: |m, _| {
            format!(
                "Only {} bullet point(s) were found. Break accomplishments into bullets for scannability.",
                m.bullet_count
            )
        },
    },
    Rule {
        id: "weak-action-verbs",
        suggestion_type: SuggestionType::Warning,
        category: SuggestionCategory::Content,
        priority: 4,
        title: "Start bullets with action verbs",
        triggers: |m, _| {
            (m.action_verb_count as f64) < m.bullet_count as f64 * T.action_verb_ratio_floor
        },
        describe: |m, _| {
            format!(
                "Only {} of {} bullets open with a strong action verb. Lead with words like 'led', 'built', or 'improved'.",
                m.action_verb_count, m.bullet_count
            )
        },
    },
    Rule {
        id: "not-quantified",
        suggestion_type: SuggestionType::Warning,
        category: SuggestionCategory::Content,
        priority: 5,
        title: "Quantify your achievements",
        triggers: |m, _| {
            (m.quantified_bullets as f64) < m.bullet_count as f64 * T.quantified_ratio_floor
        },
        describe: |m, _| {
            format!(
                "Only {} of {} bullets include a number. Back results with percentages, dollar amounts, or counts.",
                m.quantified_bullets, m.bullet_count
            )
        },
    },
    Rule {
        id: "long-paragraphs",
        suggestion_type: SuggestionType::Warning,
        category: SuggestionCategory::Formatting,
        priority: 3,
        title: "Shorten long paragraphs",
        triggers: |m, _| m.long_paragraphs > 0,
        describe: |m, _| {
            format!(
                "{} paragraph(s) run longer than four lines. Split dense blocks into bullets or shorter paragraphs.",
                m.long_paragraphs
            )
        },
    },
    Rule {
        id: "date-inconsistency",
        suggestion_type: SuggestionType::Info,
        category: SuggestionCategory::Formatting,
        priority: 2,
        title: "Inconsistent date formats",
        triggers: |m, _| !m.date_consistency,
        describe: |_, _| {
            "Multiple date formats are mixed in the document. Pick one (e.g. 'Jan 2021') and use it throughout.".to_string()
        },
    },
    Rule {
        id: "bullet-too-long",
        suggestion_type: SuggestionType::Info,
        category: SuggestionCategory::Formatting,
        priority: 2,
        title: "Bullets are too long",
        triggers: |m, _| m.average_bullet_length > T.bullet_length_max,
        describe: |m, _| {
            format!(
                "Bullets average {:.0} characters. Keep each one to a line or two.",
                m.average_bullet_length
            )
        },
    },
];

pub fn generate_suggestions(metrics: &Metrics, word_count: usize) -> Vec<Suggestion> {
    let mut suggestions: Vec<Suggestion> = RULES
        .iter()
        .filter(|rule| (rule.triggers)(metrics, word_count))
        .map(|rule| Suggestion {
            id: rule.id.to_string(),
            suggestion_type: rule.suggestion_type,
            category: rule.category,
            title: rule.title.to_string(),
            description: (rule.describe)(metrics, word_count),
            priority: rule.priority,
        })
        .collect();
    // Stable sort: equal priorities keep rule-table order.
    suggestions.sort_by(|a, b| b.priority.cmp(&a.priority));
    suggestions
}

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

pub fn calculate_score(metrics: &Metrics, word_count: usize) -> i32 {
    let mut total = 0.0f64;

    // Structure: 40 points.
    if metrics.has_contact_info {
        total += T.contact_points;
    }
    if metrics.has_summary {
        total += T.summary_points;
    }
    if metrics.has_experience {
        total += T.experience_points;
    }
    if metrics.has_education {
        total += T.education_points;
    }
    if metrics.has_skills {
        total += T.skills_points;
    }

    // Content quality: 40 points, scaled by bullet ratios.
    let (action_verb_ratio, quantified_ratio) = if metrics.bullet_count == 0 {
        (0.0, 0.0)
    } else {
        (
            metrics.action_verb_count as f64 / metrics.bullet_count as f64,
            metrics.quantified_bullets as f64 / metrics.bullet_count as f64,
        )
    };
    total += action_verb_ratio * T.action_verb_weight;
    total += quantified_ratio * T.quantified_weight;

    // Formatting: 20 points.
    if metrics.bullet_count >= T.min_bullets {
        total += T.formatting_bonus;
    }
    if metrics.long_paragraphs == 0 {
        total += T.formatting_bonus;
    }
    if metrics.date_consistency {
        total += T.formatting_bonus;
    }
    if (T.word_sweet_spot_min..=T.word_sweet_spot_max).contains(&word_count) {
        total += T.formatting_bonus;
    }

    total.min(T.score_max).round() as i32
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

pub fn analyze(text: &str) -> AnalysisResult {
    let wc = word_count(text);
    let metrics = extract_metrics(text);
    let suggestions = generate_suggestions(&metrics, wc);
    let score = calculate_score(&metrics, wc);

    AnalysisResult {
        score,
        word_count: wc,
        reading_time_minutes: wc.div_ceil(T.reading_words_per_minute),
        suggestions,
        metrics,
    }
}
