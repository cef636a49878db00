//! Static keyword tables and category to department metadata
//!
//! Everything here is read-only and compiled into the binary. The classifier
//! walks these tables; the store derives a complaint's department from them.

use crate::models::Category;
use serde::Serialize;

/// Municipal unit responsible for a category
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct Department {
    pub name: &'static str,
    pub color: &'static str,
    pub icon: &'static str,
}

pub const PUBLIC_WORKS: Department = Department {
    name: "Public Works",
    color: "#f59e0b",
    icon: "🏗️",
};

pub const HEALTH_DEPT: Department = Department {
    name: "Health Dept",
    color: "#10b981",
    icon: "🗑️",
};

pub const POLICE_FIRE: Department = Department {
    name: "Police/Fire",
    color: "#ef4444",
    icon: "🛡️",
};

pub const WATER_AUTHORITY: Department = Department {
    name: "Water Authority",
    color: "#3b82f6",
    icon: "💧",
};

pub const POWER_DEPT: Department = Department {
    name: "Power Dept",
    color: "#a855f7",
    icon: "⚡",
};

/// Fallback for department names that are not known
pub const GENERAL: Department = Department {
    name: "General",
    color: "#6b7280",
    icon: "📋",
};

/// Department responsible for a category
pub fn department_for(category: Category) -> &'static Department {
    match category {
        Category::Infrastructure => &PUBLIC_WORKS,
        Category::Sanitation => &HEALTH_DEPT,
        Category::Safety => &POLICE_FIRE,
        Category::Water => &WATER_AUTHORITY,
        Category::Electricity => &POWER_DEPT,
    }
}

/// Department with the given name; unknown names map to `General`
pub fn department_named(name: &str) -> &'static Department {
    departments()
        .map(|(_, d)| d)
        .find(|d| d.name == name)
        .unwrap_or(&GENERAL)
}

/// All departments in category display order
pub fn departments() -> impl Iterator<Item = (Category, &'static Department)> {
    Category::ALL.into_iter().map(|c| (c, department_for(c)))
}

pub fn is_department(name: &str) -> bool {
    departments().any(|(_, d)| d.name == name)
}

// =============================================================================
// Keyword tables
// =============================================================================

pub const HIGH_URGENCY_WORDS: &[&str] = &[
    "fire",
    "electrocution",
    "electric shock",
    "accident",
    "injured",
    "injury",
    "bleeding",
    "emergency",
    "danger",
    "dangerous",
    "flood",
    "leaking",
    "burst",
    "exposed wire",
    "sparks",
    "gas leak",
    "collapse",
    "fallen",
    "blocked road",
];

pub const MEDIUM_URGENCY_WORDS: &[&str] = &[
    "pothole",
    "broken",
    "damaged",
    "overflow",
    "smell",
    "odor",
    "noise",
    "crack",
    "leak",
    "vandalism",
    "graffiti",
];

/// Order in which categories are tried during inference. Some words belong
/// to more than one table, so the first match wins.
pub const DETECTION_ORDER: [Category; 5] = [
    Category::Safety,
    Category::Water,
    Category::Electricity,
    Category::Infrastructure,
    Category::Sanitation,
];

pub fn category_keywords(category: Category) -> &'static [&'static str] {
    match category {
        Category::Safety => &[
            "fire",
            "accident",
            "crime",
            "assault",
            "danger",
            "unsafe",
            "risk",
            "electrocution",
            "explosion",
            "gas",
            "fallen",
            "collapse",
            "sparks",
        ],
        Category::Water => &[
            "water", "flood", "leak", "pipe", "hydrant", "drain", "sewage", "burst", "flooding",
        ],
        Category::Electricity => &[
            "electricity",
            "electric",
            "power",
            "outage",
            "wire",
            "light",
            "streetlight",
            "pole",
            "transformer",
        ],
        Category::Infrastructure => &[
            "road",
            "pothole",
            "bridge",
            "sidewalk",
            "pavement",
            "street",
            "traffic",
            "sign",
            "construction",
            "building",
        ],
        Category::Sanitation => &[
            "garbage",
            "trash",
            "waste",
            "sanitation",
            "smell",
            "odor",
            "rats",
            "pest",
            "dump",
            "sewage",
            "filth",
        ],
    }
}
