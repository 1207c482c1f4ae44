//! Human-readable rendering for command output.

use std::fmt::Write;

use trss::SkinInfo;

/// `skin_name` -> `Skin name`.
pub fn title_case(key: &str) -> String {
    let spaced = key.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// One `Field: value` line per record field, then the self-like answer.
pub fn render_stats(skin: &SkinInfo, self_like: bool) -> String {
    let mut out = String::from("Result:\n");
    for (key, value) in skin.fields() {
        // Writing to a String cannot fail.
        let _ = writeln!(out, "{}: {value}", title_case(key));
    }
    let _ = writeln!(out, "Self-like: {}", if self_like { "Yes" } else { "No" });
    out
}

#[cfg(test)]
mod tests {
    use trss::{SkinId, UserId};

    use super::*;

    #[test]
    fn title_case_replaces_underscores() {
        assert_eq!(title_case("skin_name"), "Skin name");
        assert_eq!(title_case("ID"), "Id");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn stats_list_every_field() {
        let skin = SkinInfo {
            id: SkinId::new(12),
            author_id: UserId::new(7),
            skin_name: "red".into(),
            skin: "trSkin1x".into(),
            primary_color: "FF0000".into(),
            secondary_color: "00FF00".into(),
            likes: 3,
            views: 9,
        };
        let text = render_stats(&skin, true);
        assert!(text.starts_with("Result:\n"));
        assert!(text.contains("Author id: 7\n"));
        assert!(text.contains("Skin name: red\n"));
        assert!(text.contains("Views: 9\n"));
        assert!(text.ends_with("Self-like: Yes\n"));
    }
}
