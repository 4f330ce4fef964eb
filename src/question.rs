//! Question records and the static category table.
//!
//! Records are deserialized once from the question resource and never
//! mutated afterwards. Categories are fixed configuration; their counts are
//! derived from the loaded record set by the engine.

use serde::{Deserialize, Deserializer};

// ============================================================================
// Difficulty
// ============================================================================

/// Difficulty label attached to a question.
///
/// Anything other than `easy`/`medium`/`hard` (including a missing field)
/// maps to `Unspecified`, which displays as "Unknown".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    #[default]
    Unspecified,
}

impl Difficulty {
    /// Parse a difficulty name. Exact lowercase match, like the resource format.
    pub fn from_str_name(s: &str) -> Self {
        match s {
            "easy" => Self::Easy,
            "medium" => Self::Medium,
            "hard" => Self::Hard,
            _ => Self::Unspecified,
        }
    }

    /// Badge text.
    pub fn label(self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
            Self::Unspecified => "Unknown",
        }
    }

    /// Theme role used to color the badge.
    pub fn style_role(self) -> &'static str {
        match self {
            Self::Easy => "difficulty_easy",
            Self::Medium => "difficulty_medium",
            Self::Hard => "difficulty_hard",
            Self::Unspecified => "difficulty_unknown",
        }
    }
}

impl<'de> Deserialize<'de> for Difficulty {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        Ok(raw
            .as_deref()
            .map(Difficulty::from_str_name)
            .unwrap_or_default())
    }
}

// ============================================================================
// Question
// ============================================================================

/// One question/answer record from the question resource.
///
/// Text fields default to empty strings so a record with missing fields
/// degrades to blank UI fragments instead of failing the whole load.
/// `id` is backfilled by the loader when absent.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Question {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub answer: String,
    #[serde(default)]
    pub difficulty: Difficulty,
}

impl Question {
    /// True when any displayed field came through blank.
    pub fn is_degraded(&self) -> bool {
        self.category.is_empty() || self.question.is_empty() || self.answer.is_empty()
    }
}

/// Resources in the wild use both `"id": "12"` and `"id": 12`.
fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => s,
        Some(serde_json::Value::Number(n)) => n.to_string(),
        _ => String::new(),
    })
}

// ============================================================================
// Categories
// ============================================================================

/// Identifier of the synthetic category matching every record.
pub const ALL_CATEGORY: &str = "all";

/// Static category configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    pub id: &'static str,
    pub name: &'static str,
    /// Informational only; never used for filtering.
    pub subcategories: &'static [&'static str],
}

impl Category {
    const fn new(id: &'static str, name: &'static str) -> Self {
        Self {
            id,
            name,
            subcategories: &[],
        }
    }

    const fn with_subs(
        id: &'static str,
        name: &'static str,
        subcategories: &'static [&'static str],
    ) -> Self {
        Self {
            id,
            name,
            subcategories,
        }
    }
}

/// Configured categories in display order. The first entry is always "all".
pub const CATEGORIES: &[Category] = &[
    Category::new(ALL_CATEGORY, "All"),
    Category::with_subs("react", "React.js", &["hooks", "components", "jsx"]),
    Category::new("nextjs", "Next.js"),
    Category::new("tailwind", "TailwindCSS"),
    Category::new("css", "CSS"),
    Category::with_subs("javascript", "JavaScript", &["closures", "prototypes", "es6"]),
    Category::new("html", "HTML"),
    Category::new("typescript", "TypeScript"),
    Category::with_subs("sass", "Sass", &["mixins", "variables"]),
    Category::new("regex", "Regex"),
    Category::new("prisma", "Prisma ORM"),
    Category::new("drizzle", "Drizzle ORM"),
    Category::new("backend", "Backend"),
    Category::new("nodejs", "Node.js"),
    Category::new("express", "Express"),
    Category::new("other", "Other"),
];

/// A category descriptor paired with the number of records it holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryCount {
    pub category: &'static Category,
    pub count: usize,
}

/// Uppercase the first character of every space-separated word.
///
/// Words are split on single spaces, so runs of spaces survive unchanged.
pub fn capitalize_words(s: &str) -> String {
    s.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

// ============================================================================
// Tests
// ============================================================================
