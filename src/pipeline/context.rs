//! Project-wide context shared by every documentation request of a run.
//!
//! Lists every file name in processing order, then appends the README and
//! CHANGELOG contents when the project has them, so the model can describe
//! modules and entry points in terms of the whole project.

use crate::models::ProjectFile;

fn base_name(name: &str) -> &str {
    name.rsplit(&['/', '\\'][..]).next().unwrap_or(name)
}

fn starts_with_ignore_case(name: &str, prefix: &str) -> bool {
    base_name(name)
        .get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

fn has_segment_ignore_case(name: &str, keyword: &str) -> bool {
    base_name(name)
        .split('.')
        .any(|segment| segment.eq_ignore_ascii_case(keyword))
}

/// First file (in processing order) whose base name starts with `keyword`,
/// case-insensitively. Falls back to a file carrying the keyword as a
/// dot-separated segment (`notes.readme`).
fn find_section_file<'a>(files: &[&'a ProjectFile], keyword: &str) -> Option<&'a ProjectFile> {
    files
        .iter()
        .copied()
        .find(|f| starts_with_ignore_case(&f.name, keyword))
        .or_else(|| {
            files
                .iter()
                .copied()
                .find(|f| has_segment_ignore_case(&f.name, keyword))
        })
}

fn push_section(out: &mut String, label: &str, file: &ProjectFile) {
    out.push_str(&format!("\n--- {label} ({}) ---\n", file.name));
    out.push_str(&file.content);
    out.push_str(&format!("\n--- END {label} ---\n"));
}

/// Build the context block from the combined file list.
pub fn build_project_context(files: &[&ProjectFile]) -> String {
    let mut out = String::from("Project files:\n");
    if files.is_empty() {
        out.push_str("(none)\n");
    }
    for file in files {
        out.push_str(&format!("- {}\n", file.name));
    }

    if let Some(readme) = find_section_file(files, "readme") {
        push_section(&mut out, "README", readme);
    }
    if let Some(changelog) = find_section_file(files, "changelog") {
        push_section(&mut out, "CHANGELOG", changelog);
    }

    out
}
