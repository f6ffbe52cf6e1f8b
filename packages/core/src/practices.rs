//! Field advice per canonical disease name. Most urgent action first.

use crate::canonical::UNCERTAIN;

pub const RECOMMENDATION_SEPARATOR: &str = " ; ";

pub const GENERIC_PRACTICE: &str =
    "Consult local agricultural extension officer for field-specific recommendations.";

static PRACTICES: &[(&str, &[&str])] = &[
    (
        "Anthracnose",
        &[
            "Prune and destroy infected leaves/twigs to reduce inoculum.",
            "Spray copper oxychloride or carbendazim as per local agricultural guidance.",
            "Avoid overhead irrigation late in the day to reduce leaf wetness.",
        ],
    ),
    (
        "Bacterial Canker",
        &[
            "Remove and burn severely infected branches and sanitize pruning tools.",
            "Apply copper-based bactericide during dry weather as recommended locally.",
            "Maintain balanced nutrition and avoid mechanical injury to stems.",
        ],
    ),
    (
        "Cutting Weevil",
        &[
            "Collect and destroy damaged plant parts and monitor adult weevils.",
            "Use light traps/pheromone traps where available.",
            "Apply approved insecticides only when infestation crosses threshold.",
        ],
    ),
    (
        "Die Back",
        &[
            "Prune affected shoots 10-15 cm below visible symptoms.",
            "Apply protective fungicide paste on cut surfaces.",
            "Improve orchard drainage and airflow to reduce stress.",
        ],
    ),
    (
        "Gall Midge",
        &[
            "Remove and destroy galled tissues and fallen debris.",
            "Encourage field sanitation and synchronized orchard spraying.",
            "Use recommended systemic insecticides based on extension advice.",
        ],
    ),
    (
        "Healthy",
        &[
            "No major disease signs detected; continue regular monitoring.",
            "Maintain balanced irrigation and nutrition schedule.",
            "Scout weekly for early symptoms to act quickly.",
        ],
    ),
    (
        "Powdery Mildew",
        &[
            "Improve canopy aeration by pruning dense branches.",
            "Apply wettable sulfur or recommended fungicide at early stages.",
            "Avoid excess nitrogen fertilization that promotes tender growth.",
        ],
    ),
    (
        "Sooty Mould",
        &[
            "Control sap-sucking insects (aphids/scales/mealybugs) causing honeydew.",
            "Wash leaves with water where feasible to remove superficial mould.",
            "Use integrated pest management and avoid unnecessary sprays.",
        ],
    ),
    (
        UNCERTAIN,
        &[
            "Retake the photo in daylight with a single leaf filling the frame.",
            "Photograph both leaf surfaces if symptoms are unclear.",
            "Consult local agricultural extension officer if symptoms persist or spread.",
        ],
    ),
];

/// Exact lookup; names without an entry get the generic advice. Never empty.
pub fn practices_for(name: &str) -> &'static [&'static str] {
    PRACTICES
        .iter()
        .find(|(disease, _)| *disease == name)
        .map(|(_, practices)| *practices)
        .unwrap_or(&[GENERIC_PRACTICE])
}

pub fn recommended_action(practices: &[&str]) -> String {
    practices.join(RECOMMENDATION_SEPARATOR)
}
