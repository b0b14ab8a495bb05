//! Function catalog grouped by difficulty tier
//!
//! Expressions use the calculator's LaTeX dialect. Each tier is a fixed,
//! ordered list; games shuffle a copy of it.

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};

/// Difficulty tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    /// Parse a tier name, surfacing unknown names as `InvalidDifficulty`
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(GameError::InvalidDifficulty(s.to_string())),
        }
    }

    /// Catalog entries for this tier, in their fixed order
    pub fn entries(&self) -> &'static [CatalogEntry] {
        match self {
            Difficulty::Easy => EASY,
            Difficulty::Medium => MEDIUM,
            Difficulty::Hard => HARD,
        }
    }

    /// Owned copy of this tier's functions
    pub fn functions(&self) -> Vec<GameFunction> {
        self.entries().iter().map(GameFunction::from).collect()
    }
}

/// Static catalog row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    pub expression: &'static str,
    pub description: &'static str,
    pub readable: Option<&'static str>,
}

const fn entry(expression: &'static str, description: &'static str) -> CatalogEntry {
    CatalogEntry {
        expression,
        description,
        readable: None,
    }
}

/// A function the player has to reproduce
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameFunction {
    /// Calculator-syntax expression
    pub expression: String,
    pub description: String,
    /// Plain-text form for expressions whose LaTeX is hard to read
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub readable_expression: Option<String>,
}

impl GameFunction {
    /// Text to show the player
    pub fn display_expression(&self) -> &str {
        self.readable_expression
            .as_deref()
            .unwrap_or(&self.expression)
    }
}

impl From<&CatalogEntry> for GameFunction {
    fn from(entry: &CatalogEntry) -> Self {
        Self {
            expression: entry.expression.to_string(),
            description: entry.description.to_string(),
            readable_expression: entry.readable.map(str::to_string),
        }
    }
}

static EASY: &[CatalogEntry] = &[
    entry("x^2", "Quadratic Function"),
    entry("2x+3", "Linear Function"),
    entry("\\sin(x)", "Sine Function"),
    entry("\\abs(x)", "Absolute Value Function"),
    entry("3", "Constant Function"),
    entry("x", "Identity Function"),
    entry("x+1", "Simple Linear Function"),
    entry("\\cos(x)", "Cosine Function"),
    entry("\\tan(x)", "Tangent Function (basic)"),
    entry("\\sqrt{x}", "Square Root Function"),
    entry("x^3", "Simple Cubic Function"),
    entry("5", "Constant Function"),
    entry("x-4", "Linear Subtraction"),
    entry("-x", "Negative Identity Function"),
    entry("4x", "Simple Scaling Function"),
    entry("\\frac{x}{2}", "Simple Fractional Function"),
    entry("\\abs{x+2}", "Shifted Absolute Value"),
    entry("\\sin(2x)", "Scaled Sine Function"),
    entry("\\cos(2x)", "Scaled Cosine Function"),
    entry("x^2+1", "Shifted Quadratic"),
    entry("x^2-1", "Quadratic Minus One"),
    entry("2", "Constant Function Two"),
    entry("\\sin(x)+1", "Shifted Sine"),
    entry("\\cos(x)-1", "Shifted Cosine"),
    entry("\\frac{1}{2}x", "Half of x"),
    entry("x^4", "Quartic Function"),
    entry("x^2 + x", "Quadratic plus Linear"),
    entry("3x - 5", "Linear Function with negative shift"),
    entry("\\frac{x}{4}", "Quarter of x"),
    entry("7", "Constant Seven"),
    entry("\\sqrt{x+1}", "Shifted Square Root"),
    entry("\\frac{1}{x}", "Basic Reciprocal Function"),
    entry("\\sin(x)-1", "Sine minus one"),
    entry("\\cos(x)+1", "Cosine plus one"),
    entry("-2x", "Negative scaled Linear"),
    entry("\\abs{x-3}", "Absolute shifted by three"),
    entry("\\sqrt{x}+2", "Square root plus two"),
    entry("\\frac{x}{3}", "Third of x"),
    entry("-x^2", "Negative Quadratic"),
    entry("\\frac{x^2}{2}", "Quadratic divided by two"),
    entry("2x^2", "Squeezed Parabola"),
    entry("x^3+1", "Cubic plus one"),
    entry("x^3-1", "Cubic minus one"),
    entry("x+10", "Linear shifted by ten"),
    entry("\\frac{1}{x+1}", "Shifted Reciprocal"),
    entry("\\abs{x}+1", "Absolute plus one"),
    entry("x^2+x+1", "Quadratic plus linear plus one"),
    entry("-3x", "Negative triple scaling"),
];

static MEDIUM: &[CatalogEntry] = &[
    entry("x^3-2x", "Cubic Function"),
    entry("\\tan(x)", "Tangent Function"),
    entry("x^0.5", "Square Root"),
    entry("1/x", "Reciprocal Function"),
    entry("e^x", "Exponential Function"),
];

static HARD: &[CatalogEntry] = &[
    entry("\\sin(x)/x", "Sinc Function"),
    entry("\\ln(\\abs(x))", "Natural Log"),
    entry("x^2*\\sin(x)", "Product Function"),
    CatalogEntry {
        expression: "\\frac{1}{(1+e^{-x})}",
        description: "Logistic Function",
        readable: Some("1/(1+e^(-x))"),
    },
    entry("\\floor(x)", "Floor Function"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_sizes() {
        assert_eq!(Difficulty::Easy.entries().len(), 48);
        assert_eq!(Difficulty::Medium.entries().len(), 5);
        assert_eq!(Difficulty::Hard.entries().len(), 5);
    }

    #[test]
    fn test_parse_difficulty() {
        assert_eq!(Difficulty::parse("Easy").unwrap(), Difficulty::Easy);
        assert_eq!(Difficulty::parse(" hard ").unwrap(), Difficulty::Hard);
        assert!(Difficulty::parse("med").is_err());
        assert!(matches!(
            Difficulty::parse("nightmare"),
            Err(GameError::InvalidDifficulty(name)) if name == "nightmare"
        ));
    }

    #[test]
    fn test_readable_expression() {
        let logistic = Difficulty::Hard
            .functions()
            .into_iter()
            .find(|f| f.description == "Logistic Function")
            .unwrap();
        assert_eq!(logistic.display_expression(), "1/(1+e^(-x))");

        let first = &Difficulty::Easy.functions()[0];
        assert_eq!(first.display_expression(), "x^2");
    }

    #[test]
    fn test_difficulty_serde_names() {
        let json = serde_json::to_string(&Difficulty::Medium).unwrap();
        assert_eq!(json, "\"medium\"");
    }
}
