// src/model/elements.rs

/// Labels used for intentionally empty sites (empty spheres, vacancies).
///
/// "V" is vanadium and deliberately absent.
pub const PLACEHOLDER_LABELS: [&str; 4] = ["X", "E", "Va", "Vac"];

/// True for labels that mark a non-physical placeholder site.
pub fn is_placeholder(label: &str) -> bool {
    PLACEHOLDER_LABELS.contains(&label)
}
