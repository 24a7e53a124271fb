//! Post-processing of raw model output before it is stored as documented content.

use std::sync::LazyLock;

use regex::Regex;

/// Whole response wrapped in one fenced block, optional language tag on the opening fence.
static FENCED_BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\A```[A-Za-z0-9_+#.\-]*[ \t]*\r?\n(.*?)\r?\n?```\z").expect("valid regex")
});

/// Strip a code fence wrapping the entire response, then trim.
///
/// Responses that are not fully fenced (prose around the block, or several
/// blocks) are only trimmed.
pub fn strip_code_fence(raw: &str) -> String {
    let trimmed = raw.trim();
    match FENCED_BLOCK_RE.captures(trimmed) {
        Some(caps) if !caps[1].contains("\n```") => caps[1].trim().to_string(),
        _ => trimmed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_fence_with_language_tag() {
        assert_eq!(strip_code_fence("```js\nfoo();\n```"), "foo();");
    }

    #[test]
    fn strips_fence_without_language_tag() {
        assert_eq!(strip_code_fence("```\nprint('hi')\n```"), "print('hi')");
    }

    #[test]
    fn strips_surrounding_whitespace() {
        let raw = "\n\n  ```python\n\ndef f():\n    pass\n\n```  \n";
        assert_eq!(strip_code_fence(raw), "def f():\n    pass");
    }

    #[test]
    fn handles_crlf_line_endings() {
        assert_eq!(strip_code_fence("```ts\r\nlet x = 1;\r\n```"), "let x = 1;");
    }

    #[test]
    fn keeps_unfenced_response() {
        assert_eq!(strip_code_fence("  /** doc */\nfoo();  "), "/** doc */\nfoo();");
    }

    #[test]
    fn keeps_partially_fenced_response() {
        let raw = "Here you go:\n```js\nfoo();\n```";
        assert_eq!(strip_code_fence(raw), raw);
    }

    #[test]
    fn keeps_multiple_blocks_intact() {
        let raw = "```js\na();\n```\n\n```js\nb();\n```";
        assert_eq!(strip_code_fence(raw), raw);
    }

    #[test]
    fn empty_input_returns_empty() {
        assert_eq!(strip_code_fence(""), "");
        assert_eq!(strip_code_fence("   \n"), "");
    }
}
