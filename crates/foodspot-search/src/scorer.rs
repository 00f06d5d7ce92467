//! Keyword scoring of candidates against the cuisine categories.
//!
//! A candidate's haystack is its lower-cased name, address and cuisine tag.
//! Each primary keyword found as a substring adds [`PRIMARY_WEIGHT`], each
//! secondary keyword adds [`SECONDARY_WEIGHT`]. Keywords are matched
//! independently, so `"pizza"` and `"pizzeria"` both count for a pizzeria.

use foodspot_core::RawCandidate;

pub const PRIMARY_WEIGHT: u32 = 10;
pub const SECONDARY_WEIGHT: u32 = 3;

/// Minimum best score for a candidate to be kept.
pub const MATCH_THRESHOLD: u32 = 3;

/// A cuisine category and its keyword lists.
#[derive(Debug, PartialEq, Eq)]
pub struct FoodCategory {
    pub name: &'static str,
    pub primary: &'static [&'static str],
    pub secondary: &'static [&'static str],
}

impl FoodCategory {
    /// Response map key: the name with spaces replaced by underscores.
    #[must_use]
    pub fn key(&self) -> String {
        self.name.replace(' ', "_")
    }
}

/// Categories in declaration order; ties resolve to the earlier entry.
pub const FOOD_CATEGORIES: [FoodCategory; 10] = [
    FoodCategory {
        name: "ice cream",
        primary: &["ice cream", "gelato", "frozen yogurt", "kulfi", "softy"],
        secondary: &["dessert", "sweet", "dairy", "frozen", "cream"],
    },
    FoodCategory {
        name: "chaat",
        primary: &["chaat", "bhel puri", "pani puri", "golgappa", "papdi chaat"],
        secondary: &["street food", "snack", "indian", "spicy", "tangy"],
    },
    FoodCategory {
        name: "burger",
        primary: &["burger", "hamburger", "cheeseburger"],
        secondary: &["fast food", "american", "sandwich", "grill", "fries"],
    },
    FoodCategory {
        name: "pizza",
        primary: &["pizza", "pizzeria", "margherita"],
        secondary: &["italian", "cheese", "tomato", "dough", "oven"],
    },
    FoodCategory {
        name: "biryani",
        primary: &["biryani", "biriyani", "dum biryani", "pulao"],
        secondary: &["rice", "indian", "spiced", "meat", "basmati"],
    },
    FoodCategory {
        name: "momos",
        primary: &["momos", "dumpling", "steamed dumpling"],
        secondary: &["tibetan", "chinese", "steamed", "nepali"],
    },
    FoodCategory {
        name: "chinese",
        primary: &["chinese", "noodles", "fried rice", "manchurian"],
        secondary: &["asian", "wok", "soy sauce", "stir fry"],
    },
    FoodCategory {
        name: "south indian",
        primary: &["dosa", "idli", "vada", "uttapam", "sambhar"],
        secondary: &["south indian", "coconut", "curry leaves", "fermented"],
    },
    FoodCategory {
        name: "north indian",
        primary: &["roti", "naan", "dal", "curry", "tandoori"],
        secondary: &["north indian", "wheat", "gravy", "spices"],
    },
    FoodCategory {
        name: "desserts",
        primary: &["dessert", "sweet", "mithai", "gulab jamun", "rasgulla"],
        secondary: &["sugar", "milk", "syrup", "traditional"],
    },
];

/// The best category for a candidate and its score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryScore {
    pub category: &'static FoodCategory,
    pub score: u32,
}

impl CategoryScore {
    #[must_use]
    pub fn is_food_match(&self) -> bool {
        self.score >= MATCH_THRESHOLD
    }
}

fn haystack(candidate: &RawCandidate) -> String {
    format!(
        "{} {} {}",
        candidate.name.as_deref().unwrap_or(""),
        candidate.address.as_deref().unwrap_or(""),
        candidate.cuisine.as_deref().unwrap_or(""),
    )
    .to_lowercase()
}

fn score_haystack(text: &str, category: &FoodCategory) -> u32 {
    let hits = |keywords: &[&str]| -> u32 {
        let n = keywords.iter().filter(|k| text.contains(*k)).count();
        u32::try_from(n).unwrap_or(u32::MAX)
    };
    hits(category.primary) * PRIMARY_WEIGHT + hits(category.secondary) * SECONDARY_WEIGHT
}

/// Score of one candidate against one category.
#[must_use]
pub fn score(candidate: &RawCandidate, category: &FoodCategory) -> u32 {
    score_haystack(&haystack(candidate), category)
}

/// Scores a candidate against every category and returns the maximum,
/// preferring the earliest declared category on ties.
#[must_use]
pub fn classify(candidate: &RawCandidate) -> CategoryScore {
    let text = haystack(candidate);
    let mut best = CategoryScore {
        category: &FOOD_CATEGORIES[0],
        score: score_haystack(&text, &FOOD_CATEGORIES[0]),
    };
    for category in &FOOD_CATEGORIES[1..] {
        let s = score_haystack(&text, category);
        if s > best.score {
            best = CategoryScore { category, score: s };
        }
    }
    best
}
