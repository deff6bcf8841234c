//! Pulls the `<script>`/`<script setup>` block out of a `.vue` single-file
//! component. Deliberately a small regex extraction, not a full SFC parser:
//! anything beyond finding the script body is out of scope here.

use regex::Regex;
use std::sync::LazyLock;

static SCRIPT_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<script(?:\s+setup)?[^>]*>(.*?)</script>").unwrap());

/// Returns the first `<script>` block's text and the 0-based line at which
/// it starts within `source`, so positions reported against the extracted
/// text can be shifted back to the original file.
#[must_use]
pub fn extract_script(source: &str) -> Option<(&str, u32)> {
    let caps = SCRIPT_BLOCK.captures(source)?;
    let body = caps.get(1)?;
    let line_offset = source[..body.start()].matches('\n').count() as u32;
    Some((body.as_str(), line_offset))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_plain_script_block() {
        let source = "<template><div/></template>\n<script>\nexport default {}\n</script>\n";
        let (script, offset) = extract_script(source).unwrap();
        assert_eq!(script.trim(), "export default {}");
        assert_eq!(offset, 2);
    }

    #[test]
    fn extracts_script_setup_block() {
        let source = "<script setup lang=\"js\">\nconst x = 1;\n</script>";
        let (script, offset) = extract_script(source).unwrap();
        assert_eq!(script.trim(), "const x = 1;");
        assert_eq!(offset, 1);
    }

    #[test]
    fn returns_none_without_a_script_block() {
        assert!(extract_script("<template><div/></template>").is_none());
    }
}
