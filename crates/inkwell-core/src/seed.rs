//! Built-in seed collection and default image pool
//!
//! The seed collection is what an empty (or unreadable) store starts with.

use chrono::NaiveDate;

use crate::catalog;
use crate::models::{Author, Post};

/// Images assigned to posts created without one
pub const DEFAULT_IMAGES: &[&str] = &[
    "https://images.unsplash.com/photo-1516321318423-f06f85e504b3?w=400&h=250&fit=crop",
    "https://images.unsplash.com/photo-1498050108023-c5249f4df085?w=400&h=250&fit=crop",
    "https://images.unsplash.com/photo-1461749280684-dccba630e2f6?w=400&h=250&fit=crop",
    "https://images.unsplash.com/photo-1504639725590-34d0984388bd?w=400&h=250&fit=crop",
    "https://images.unsplash.com/photo-1517077304055-6e89abbf09b0?w=400&h=250&fit=crop",
];

struct SeedPost {
    id: &'static str,
    title: &'static str,
    content: &'static str,
    author: &'static str,
    date: (i32, u32, u32),
    excerpt: &'static str,
    image: &'static str,
    category: &'static str,
}

const SEED: &[SeedPost] = &[
    SeedPost {
        id: "1",
        title: "Getting Started with React and TypeScript",
        content: "Learn how to set up a React project with TypeScript and best practices for development. React and TypeScript make a powerful combination for building robust web applications.",
        author: "John Doe",
        date: (2024, 1, 15),
        excerpt: "Learn how to set up a React project with TypeScript and best practices for development.",
        image: "https://images.unsplash.com/photo-1633356122544-f134324a6cee?w=400&h=250&fit=crop",
        category: "technology",
    },
    SeedPost {
        id: "2",
        title: "Material UI Design System",
        content: "Explore the comprehensive design system provided by Material UI for React applications. Material UI provides a robust set of components and theming capabilities.",
        author: "Jane Smith",
        date: (2024, 1, 14),
        excerpt: "Explore the comprehensive design system provided by Material UI for React applications.",
        image: "https://images.unsplash.com/photo-1561070791-2526d30994b5?w=400&h=250&fit=crop",
        category: "technology",
    },
    SeedPost {
        id: "3",
        title: "Building Responsive Layouts",
        content: "Master the art of creating responsive layouts that work across all device sizes. Learn about grid systems, breakpoints, and mobile-first design.",
        author: "Mike Johnson",
        date: (2024, 1, 13),
        excerpt: "Master the art of creating responsive layouts that work across all device sizes.",
        image: "https://images.unsplash.com/photo-1507003211169-0a1dd7228f2d?w=400&h=250&fit=crop",
        category: "education",
    },
    SeedPost {
        id: "4",
        title: "Healthy Morning Routines for Productivity",
        content: "Discover effective morning routines that boost your energy and productivity throughout the day. Learn about meditation, exercise, and nutrition tips.",
        author: "Sarah Wilson",
        date: (2024, 1, 12),
        excerpt: "Discover effective morning routines that boost your energy and productivity throughout the day.",
        image: "https://images.unsplash.com/photo-1506905925346-21bda4d32df4?w=400&h=250&fit=crop",
        category: "health",
    },
    SeedPost {
        id: "5",
        title: "Top 10 Travel Destinations for 2024",
        content: "Explore the most amazing travel destinations for 2024. From hidden gems to popular hotspots, discover your next adventure.",
        author: "Alex Chen",
        date: (2024, 1, 11),
        excerpt: "Explore the most amazing travel destinations for 2024. From hidden gems to popular hotspots.",
        image: "https://images.unsplash.com/photo-1488646953014-85cb44e25828?w=400&h=250&fit=crop",
        category: "travel",
    },
    SeedPost {
        id: "6",
        title: "Delicious Pasta Recipes for Beginners",
        content: "Learn to cook amazing pasta dishes with these simple recipes. Perfect for beginners who want to master Italian cuisine.",
        author: "Maria Rodriguez",
        date: (2024, 1, 10),
        excerpt: "Learn to cook amazing pasta dishes with these simple recipes. Perfect for beginners.",
        image: "https://images.unsplash.com/photo-1551183053-bf91a1d81141?w=400&h=250&fit=crop",
        category: "food",
    },
];

/// The seed collection, newest first
pub fn seed_posts() -> Vec<Post> {
    SEED.iter()
        .map(|seed| {
            let (year, month, day) = seed.date;
            Post {
                id: seed.id.to_string(),
                title: seed.title.to_string(),
                content: seed.content.to_string(),
                author: Author::new(seed.author),
                created_at: NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default(),
                excerpt: seed.excerpt.to_string(),
                image: Some(seed.image.to_string()),
                category: catalog::category(seed.category),
            }
        })
        .collect()
}

/// Number of posts in the seed collection
pub fn seed_len() -> usize {
    SEED.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_posts() {
        let posts = seed_posts();
        assert_eq!(posts.len(), seed_len());
        assert_eq!(posts[0].id, "1");
        assert_eq!(posts[0].created_at.to_string(), "2024-01-15");
        assert_eq!(posts[5].category_id(), Some("food"));
    }

    #[test]
    fn test_seed_categories_resolve() {
        assert!(seed_posts().iter().all(|post| post.category.is_some()));
    }

    #[test]
    fn test_seed_ids_are_unique() {
        let posts = seed_posts();
        let mut ids: Vec<_> = posts.iter().map(|p| p.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), posts.len());
    }
}
