//! Category catalog
//!
//! A fixed list of topic categories. Posts carry a copy of the entry they
//! belong to; the catalog itself is never persisted.

use crate::models::Category;

struct Entry {
    id: &'static str,
    name: &'static str,
    color: &'static str,
    icon: &'static str,
    description: &'static str,
}

const ENTRIES: &[Entry] = &[
    Entry {
        id: "technology",
        name: "Technology",
        color: "#00f5ff",
        icon: "💻",
        description: "Tech news, programming, and digital innovations",
    },
    Entry {
        id: "lifestyle",
        name: "Lifestyle",
        color: "#ff6b9d",
        icon: "🌟",
        description: "Life tips, wellness, and personal development",
    },
    Entry {
        id: "travel",
        name: "Travel",
        color: "#c471f5",
        icon: "✈️",
        description: "Travel guides, destinations, and adventures",
    },
    Entry {
        id: "food",
        name: "Food & Cooking",
        color: "#4ade80",
        icon: "🍳",
        description: "Recipes, cooking tips, and culinary experiences",
    },
    Entry {
        id: "business",
        name: "Business",
        color: "#f59e0b",
        icon: "💼",
        description: "Business insights, entrepreneurship, and finance",
    },
    Entry {
        id: "health",
        name: "Health & Fitness",
        color: "#ef4444",
        icon: "💪",
        description: "Health tips, fitness routines, and wellness advice",
    },
    Entry {
        id: "education",
        name: "Education",
        color: "#8b5cf6",
        icon: "📚",
        description: "Learning resources, tutorials, and educational content",
    },
    Entry {
        id: "entertainment",
        name: "Entertainment",
        color: "#06b6d4",
        icon: "🎬",
        description: "Movies, music, games, and pop culture",
    },
];

impl Entry {
    fn to_category(&self) -> Category {
        Category {
            id: self.id.to_string(),
            name: self.name.to_string(),
            color: self.color.to_string(),
            icon: self.icon.to_string(),
            description: self.description.to_string(),
        }
    }
}

/// All categories, in catalog order
pub fn categories() -> Vec<Category> {
    ENTRIES.iter().map(Entry::to_category).collect()
}

/// Look up a category by id (case-insensitive)
pub fn category(id: &str) -> Option<Category> {
    ENTRIES
        .iter()
        .find(|entry| entry.id.eq_ignore_ascii_case(id))
        .map(Entry::to_category)
}

/// Category ids, in catalog order
pub fn category_ids() -> Vec<&'static str> {
    ENTRIES.iter().map(|entry| entry.id).collect()
}
