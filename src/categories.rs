//! Compiled-in catalog categories.

use crate::types::{Category, DEFAULT_CATEGORY};
use once_cell::sync::Lazy;

/// The fixed category list, in display order
pub static CATEGORIES: Lazy<Vec<Category>> = Lazy::new(|| {
    vec![
        Category {
            id: "dashboard",
            name: "Dashboard",
            icon: "pi-chart-line",
            color: "#3B82F6",
            description: "Data visualisation and dashboard pages",
        },
        Category {
            id: "portfolio",
            name: "Portfolio",
            icon: "pi-briefcase",
            color: "#10B981",
            description: "Personal or company showcase pages",
        },
        Category {
            id: "documentation",
            name: "Documentation",
            icon: "pi-book",
            color: "#F59E0B",
            description: "Documentation and guide pages",
        },
        Category {
            id: "template",
            name: "Template",
            icon: "pi-palette",
            color: "#EF4444",
            description: "Reusable page templates",
        },
        Category {
            id: "landing",
            name: "Landing Page",
            icon: "pi-home",
            color: "#8B5CF6",
            description: "Marketing and promotional landing pages",
        },
        Category {
            id: "admin",
            name: "Admin Panel",
            icon: "pi-cog",
            color: "#6B7280",
            description: "Back-office and control panel pages",
        },
        Category {
            id: "ecommerce",
            name: "E-commerce",
            icon: "pi-shopping-cart",
            color: "#EC4899",
            description: "Online shop and checkout pages",
        },
        Category {
            id: "blog",
            name: "Blog",
            icon: "pi-pencil",
            color: "#06B6D4",
            description: "Blog and article pages",
        },
        Category {
            id: DEFAULT_CATEGORY,
            name: "Other",
            icon: "pi-folder",
            color: "#84CC16",
            description: "Pages of any other kind",
        },
    ]
});
