//! Keyboard shortcut for the primary control

/// Keys that act as the primary control
pub const PRIMARY_KEYS: [&str; 2] = [" ", "Enter"];

/// Element tags that handle Space/Enter themselves
const SELF_ACTIVATING: [&str; 5] = ["BUTTON", "A", "INPUT", "SELECT", "TEXTAREA"];

/// Whether a keydown should trigger the primary control
///
/// `focused_tag` is the tag name of the event target, upper case as the DOM
/// reports it. Focused controls keep their own activation.
pub fn is_primary_shortcut(key: &str, focused_tag: Option<&str>) -> bool {
    if !PRIMARY_KEYS.contains(&key) {
        return false;
    }
    !focused_tag.is_some_and(|tag| SELF_ACTIVATING.contains(&tag))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_space_and_enter_on_page() {
        assert!(is_primary_shortcut(" ", None));
        assert!(is_primary_shortcut("Enter", Some("BODY")));
        assert!(!is_primary_shortcut("a", None));
        assert!(!is_primary_shortcut("Escape", Some("BODY")));
    }

    #[test]
    fn test_focused_button_keeps_its_keys() {
        assert!(!is_primary_shortcut(" ", Some("BUTTON")));
        assert!(!is_primary_shortcut("Enter", Some("BUTTON")));
        assert!(!is_primary_shortcut("Enter", Some("A")));
    }
}
