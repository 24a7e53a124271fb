//! File name → language label classification.
//!
//! The label decides whether a file is sent for documentation at all:
//! anything that does not map to a known language gets the `"code"`
//! sentinel and is passed through untouched.

/// Sentinel label for files with no recognized language.
pub const UNCLASSIFIED: &str = "code";

/// Extension → language label. Extend here, not with conditionals.
const LANGUAGE_TABLE: &[(&str, &str)] = &[
    ("js", "JavaScript"),
    ("jsx", "JavaScript"),
    ("mjs", "JavaScript"),
    ("cjs", "JavaScript"),
    ("ts", "TypeScript"),
    ("tsx", "TypeScript"),
    ("py", "Python"),
    ("java", "Java"),
    ("go", "Go"),
    ("gs", "Google Apps Script"),
];

/// Classify a file by the extension of its base name (case-insensitive).
pub fn classify(file_name: &str) -> &'static str {
    extension(file_name)
        .and_then(|ext| {
            LANGUAGE_TABLE
                .iter()
                .find(|(known, _)| known.eq_ignore_ascii_case(ext))
                .map(|(_, label)| *label)
        })
        .unwrap_or(UNCLASSIFIED)
}

pub fn is_unclassified(label: &str) -> bool {
    label == UNCLASSIFIED
}

fn extension(file_name: &str) -> Option<&str> {
    let base = file_name.rsplit(&['/', '\\'][..]).next().unwrap_or(file_name);
    match base.rfind('.') {
        // Leading dot only (".env") is a hidden file, not an extension.
        Some(0) | None => None,
        Some(idx) => {
            let ext = &base[idx + 1..];
            (!ext.is_empty()).then_some(ext)
        }
    }
}
