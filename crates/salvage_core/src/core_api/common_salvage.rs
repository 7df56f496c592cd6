//! Salvage names offered as quick-add suggestions. These are the drops most
//! players reprocess; the analysis service is the authority on which names
//! it actually recognises.

pub const COMMON_SALVAGE: &[&str] = &[
    "Tripped Power Circuit",
    "Charred Micro Circuit",
    "Fried Interface Circuit",
    "Contaminated Nanite Compound",
    "Armor Plates",
    "Burned Logic Circuit",
];

/// Case-insensitive exact match against the quick-add list.
pub fn is_common(name: &str) -> bool {
    let name = name.trim();
    COMMON_SALVAGE
        .iter()
        .any(|common| common.eq_ignore_ascii_case(name))
}

/// Quick-add names starting with `prefix`, ignoring case. A blank prefix
/// returns the whole list.
pub fn suggest(prefix: &str) -> Vec<&'static str> {
    let prefix = prefix.trim().to_ascii_lowercase();
    COMMON_SALVAGE
        .iter()
        .copied()
        .filter(|name| name.to_ascii_lowercase().starts_with(&prefix))
        .collect()
}
