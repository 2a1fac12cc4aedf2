// annotate.rs - banners around include directives

/// Marker recognised as an include directive. Purely textual.
pub const INCLUDE_MARKER: &str = "#include";

/// Extra `*` characters added to the line width for the comment border.
const BORDER_PADDING: usize = 8;

/// Builds the decorated block that replaces a single include line.
///
/// ```text
///
/// /***************************
///  *    #include <common>    *
///  ***************************/
///
/// #include <common>
/// ```
pub fn with_comment(line: &str) -> String {
    let decoration = "*".repeat(line.chars().count() + BORDER_PADDING);
    format!("\n/**{decoration}\n *    {line}    *\n **{decoration}/\n\n{line}\n")
}

/// Annotates every line of `source` that contains `#include`.
///
/// Lines are taken from the input, but each replacement searches the working
/// copy from the start for the first substring occurrence of the line text.
/// The match need not be a whole line: an identical line above, a longer line
/// containing it, or the copy inside an already inserted comment all take
/// precedence. A line whose text is no longer found is skipped.
pub fn annotate_includes(source: &str) -> String {
    let mut annotated = source.to_owned();

    for line in source.split('\n') {
        if !line.contains(INCLUDE_MARKER) {
            continue;
        }

        if let Some(start) = annotated.find(line) {
            let end = start + line.len();
            annotated.replace_range(start..end, &with_comment(line));
        }
    }

    annotated
}

#[cfg(test)]
mod tests {
    use super::*;

    fn border_run(line: &str, prefix: &str) -> usize {
        line.trim_start_matches(prefix)
            .trim_end_matches('/')
            .chars()
            .take_while(|c| *c == '*')
            .count()
    }

    #[test]
    fn test_source_without_includes_is_unchanged() {
        let source = "void main() {\n    gl_FragColor = vec4(1.0);\n}\n";
        assert_eq!(annotate_includes(source), source);
        assert_eq!(annotate_includes(""), "");
    }

    #[test]
    fn test_single_include_is_decorated_and_kept_live() {
        let output = annotate_includes("a\n#include <x>\nb");
        let lines: Vec<&str> = output.split('\n').collect();

        assert_eq!(lines.first(), Some(&"a"));
        assert_eq!(lines.last(), Some(&"b"));
        assert!(lines.contains(&" *    #include <x>    *"));
        assert_eq!(lines.iter().filter(|l| **l == "#include <x>").count(), 1);

        let comment_row = lines.iter().position(|l| l.starts_with(" *    ")).unwrap();
        let live_row = lines.iter().position(|l| *l == "#include <x>").unwrap();
        assert!(comment_row < live_row);
    }

    #[test]
    fn test_exact_block_layout() {
        let expected = "a\n\n/**********************\n *    #include <x>    *\n **********************/\n\n#include <x>\n\nb";
        assert_eq!(annotate_includes("a\n#include <x>\nb"), expected);
    }

    #[test]
    fn test_border_width_follows_line_length() {
        for line in ["#include <common>", "  #include <lights_physical_pars_fragment>"] {
            let block = with_comment(line);
            let rows: Vec<&str> = block.split('\n').collect();
            let top = rows[1];
            let bottom = rows[3];

            assert!(top.starts_with("/**"));
            assert!(bottom.ends_with("/"));
            assert_eq!(border_run(top, "/**"), line.len() + 8);
            assert_eq!(border_run(bottom, " **"), line.len() + 8);
        }
    }

    #[test]
    fn test_first_match_wins_for_duplicate_lines() {
        let source = "#include <x>\nfloat y;\n#include <x>";
        let output = annotate_includes(source);

        // The trailing duplicate stays untouched; the second pass rewrites the
        // copy inside the first comment block instead.
        assert!(output.ends_with("float y;\n#include <x>"));
        assert_eq!(output.matches("/**").count(), 2);
        assert_eq!(output.split('\n').filter(|l| *l == "#include <x>").count(), 3);
    }

    #[test]
    fn test_match_is_by_substring_not_whole_line() {
        let output = annotate_includes("  #include <x>\n#include <x>");

        // The unindented line matches inside the first banner row.
        assert!(output.contains(" *      \n/**"));
        assert!(output.ends_with("  #include <x>\n\n#include <x>"));
        assert_eq!(output.matches("/**").count(), 2);
    }
}
