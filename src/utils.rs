// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Utility functions for the bridge

/// Pluralize a class label for summaries (`"cat"` -> `"cats"`).
#[must_use]
pub fn pluralize(word: &str) -> String {
    match word {
        "person" => "persons".to_string(),
        "bus" => "buses".to_string(),
        "knife" => "knives".to_string(),
        "mouse" => "mice".to_string(),
        "sheep" | "skis" => word.to_string(),
        _ => {
            if word.ends_with('s') || word.ends_with("ch") || word.ends_with("sh") {
                format!("{word}es")
            } else if word.ends_with('y') && !word.ends_with("ey") && !word.ends_with("ay") {
                format!("{}ies", &word[..word.len() - 1])
            } else {
                format!("{word}s")
            }
        }
    }
}

/// Round and clamp a pixel coordinate to `[-1, limit]`.
///
/// Values just outside the canvas keep edges of partially visible boxes off
/// the image instead of pinning them to the border.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
pub fn clamp_coord(value: f64, limit: u32) -> i32 {
    value.round().clamp(-1.0, f64::from(limit)) as i32
}
