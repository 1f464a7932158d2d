//! Attribute naming: the deterministic transform from a field label to the
//! resource key it reads and writes.

use heck::ToSnakeCase;

/// Attribute used when a label contains no word characters at all.
pub const FALLBACK_ATTRIBUTE: &str = "field";

/// Derive the lower-snake-case attribute for a display label.
///
/// `"Theme Song"` becomes `theme_song`, `"User ID"` becomes `user_id`.
/// The result is never empty.
pub fn attribute_for(name: &str) -> String {
    let snake = name.to_snake_case();
    if snake.is_empty() {
        FALLBACK_ATTRIBUTE.to_string()
    } else {
        snake
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spaces_become_underscores() {
        assert_eq!(attribute_for("Theme Song"), "theme_song");
        assert_eq!(attribute_for("Full Info"), "full_info");
    }

    #[test]
    fn acronyms_are_lowered() {
        assert_eq!(attribute_for("User ID"), "user_id");
        assert_eq!(attribute_for("ID"), "id");
    }

    #[test]
    fn already_snake_is_unchanged() {
        assert_eq!(attribute_for("created_at"), "created_at");
    }

    #[test]
    fn camel_case_is_split() {
        assert_eq!(attribute_for("firstName"), "first_name");
    }

    #[test]
    fn empty_label_falls_back() {
        assert_eq!(attribute_for(""), FALLBACK_ATTRIBUTE);
        assert_eq!(attribute_for("  --  "), FALLBACK_ATTRIBUTE);
    }

    #[test]
    fn derivation_is_deterministic() {
        assert_eq!(attribute_for("Theme Song"), attribute_for("Theme Song"));
    }
}
