use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Spending category. The set is closed; anything else in the data file is corrupt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Food,
    Transport,
    Shopping,
    Bills,
    Health,
    Entertainment,
    Others,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Food,
        Category::Transport,
        Category::Shopping,
        Category::Bills,
        Category::Health,
        Category::Entertainment,
        Category::Others,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Transport => "Transport",
            Category::Shopping => "Shopping",
            Category::Bills => "Bills",
            Category::Health => "Health",
            Category::Entertainment => "Entertainment",
            Category::Others => "Others",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ParseCategoryError;

    /// Case-insensitive; surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ParseCategoryError(wanted.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseCategoryError(pub String);

impl fmt::Display for ParseCategoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown category '{}'", self.0)
    }
}

impl std::error::Error for ParseCategoryError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_roundtrip() {
        for category in Category::ALL {
            let parsed: Category = category.as_str().parse().unwrap();
            assert_eq!(category, parsed);
        }
    }

    #[test]
    fn test_category_parse_is_case_insensitive() {
        assert_eq!("food".parse::<Category>(), Ok(Category::Food));
        assert_eq!(" BILLS ".parse::<Category>(), Ok(Category::Bills));
    }

    #[test]
    fn test_unknown_category() {
        let err = "Groceries".parse::<Category>().unwrap_err();
        assert_eq!(err.to_string(), "unknown category 'Groceries'");
    }
}
