use once_cell::sync::Lazy;
use regex::Regex;

static THINK_TAG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<think>[\s\S]*?</think>|<think\s*/>").unwrap());

static REASONING_TAG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<reasoning>[\s\S]*?</reasoning>").unwrap());

/// Opening fence with an optional language tag, e.g. ```html
static OPEN_FENCE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^```[A-Za-z]*[ \t]*\r?\n?").unwrap());

static CLOSE_FENCE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\r?\n?```\s*$").unwrap());

static MULTIPLE_NEWLINES_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

/// Strip model artifacts from generated text so it can be displayed as-is.
pub fn clean_generated_text(response: &str) -> String {
    let mut cleaned = THINK_TAG_PATTERN.replace_all(response, "").to_string();
    cleaned = REASONING_TAG_PATTERN.replace_all(&cleaned, "").to_string();

    cleaned = cleaned.trim().to_string();

    // Models often wrap HTML answers in a Markdown fence
    if cleaned.starts_with("```") {
        cleaned = OPEN_FENCE_PATTERN.replace(&cleaned, "").to_string();
        cleaned = CLOSE_FENCE_PATTERN.replace(&cleaned, "").to_string();
        cleaned = cleaned.trim().to_string();
    }

    MULTIPLE_NEWLINES_PATTERN
        .replace_all(&cleaned, "\n\n")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_think_tags() {
        let input = "<think>Some reasoning here</think>The actual response";
        assert_eq!(clean_generated_text(input), "The actual response");
    }

    #[test]
    fn test_strip_html_fence() {
        let input = "```html\n<h3>Summary</h3>\n<p>Fine.</p>\n```\n";
        assert_eq!(clean_generated_text(input), "<h3>Summary</h3>\n<p>Fine.</p>");
    }

    #[test]
    fn test_collapse_newlines() {
        let input = "Subject: Review\n\n\n\nHello team";
        assert_eq!(clean_generated_text(input), "Subject: Review\n\nHello team");
    }

    #[test]
    fn test_whitespace_only_becomes_empty() {
        assert_eq!(clean_generated_text("  <think/>  \n"), "");
    }
}
