use egui::text::{LayoutJob, TextFormat};
use egui::{Color32, FontId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Comment,
    Preprocessor,
    Keyword,
    Type,
    Builtin,
    Number,
    Operator,
    Punctuation,
    Identifier,
    Whitespace,
    Plain,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
}

pub type HighlightedLine = Vec<Token>;

const KEYWORDS: &[&str] = &[
    "attribute", "break", "case", "centroid", "const", "continue", "default", "discard", "do",
    "else", "flat", "for", "highp", "if", "in", "inout", "invariant", "layout", "lowp",
    "mediump", "noperspective", "out", "precision", "return", "smooth", "struct", "switch",
    "uniform", "varying", "while",
];

const TYPES: &[&str] = &[
    "bool", "bvec2", "bvec3", "bvec4", "float", "int", "ivec2", "ivec3", "ivec4", "mat2",
    "mat3", "mat4", "sampler2D", "sampler2DArray", "sampler2DShadow", "sampler3D",
    "samplerCube", "uint", "uvec2", "uvec3", "uvec4", "vec2", "vec3", "vec4", "void",
];

const BUILTINS: &[&str] = &[
    "abs", "clamp", "cos", "cross", "dFdx", "dFdy", "distance", "dot", "exp", "exp2",
    "floor", "fract", "inverse", "length", "log", "log2", "max", "min", "mix", "mod",
    "normalize", "pow", "reflect", "refract", "sin", "smoothstep", "sqrt", "step", "tan",
    "texture", "textureSize", "transpose", "true", "false",
];

const OPERATOR_CHARS: &str = "+-*/%=<>!&|^~?:";
const PUNCTUATION_CHARS: &str = "(){}[];,.";

fn is_glsl(language: &str) -> bool {
    matches!(language, "glsl" | "cpp" | "c")
}

/// Byte length of the prefix of `s` whose chars satisfy `pred`.
fn prefix_len(s: &str, pred: impl Fn(char) -> bool) -> usize {
    s.char_indices()
        .find(|(_, c)| !pred(*c))
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

fn number_len(s: &str) -> usize {
    let hex = s.starts_with("0x") || s.starts_with("0X");
    let mut prev = '\0';
    for (i, c) in s.char_indices() {
        let exponent_sign = (c == '+' || c == '-') && matches!(prev, 'e' | 'E') && !hex;
        if !(c.is_ascii_alphanumeric() || c == '.' || exponent_sign) {
            return i;
        }
        prev = c;
    }
    s.len()
}

fn classify_word(word: &str) -> TokenKind {
    if KEYWORDS.contains(&word) {
        TokenKind::Keyword
    } else if TYPES.contains(&word) {
        TokenKind::Type
    } else if word.starts_with("gl_") || BUILTINS.contains(&word) {
        TokenKind::Builtin
    } else {
        TokenKind::Identifier
    }
}

/// Splits `source` into highlighted lines. Unknown languages give one plain
/// token per non-empty line.
pub fn tokenize(source: &str, language: &str) -> Vec<HighlightedLine> {
    if !is_glsl(language) {
        return source
            .split('\n')
            .map(|line| {
                if line.is_empty() {
                    Vec::new()
                } else {
                    vec![Token {
                        kind: TokenKind::Plain,
                        text: line.to_string(),
                    }]
                }
            })
            .collect();
    }

    let mut in_block_comment = false;
    source
        .split('\n')
        .map(|line| tokenize_line(line, &mut in_block_comment))
        .collect()
}

fn push(tokens: &mut HighlightedLine, kind: TokenKind, text: &str) {
    tokens.push(Token {
        kind,
        text: text.to_string(),
    });
}

fn tokenize_line(line: &str, in_block_comment: &mut bool) -> HighlightedLine {
    let mut tokens = Vec::new();
    let mut pos = 0;
    let mut seen_code = false;

    while pos < line.len() {
        let rest = &line[pos..];

        if *in_block_comment {
            let len = match rest.find("*/") {
                Some(end) => {
                    *in_block_comment = false;
                    end + 2
                }
                None => rest.len(),
            };
            push(&mut tokens, TokenKind::Comment, &rest[..len]);
            pos += len;
            continue;
        }

        if rest.starts_with("//") {
            push(&mut tokens, TokenKind::Comment, rest);
            break;
        }

        if rest.starts_with("/*") {
            *in_block_comment = true;
            let len = match rest[2..].find("*/") {
                Some(end) => {
                    *in_block_comment = false;
                    end + 4
                }
                None => rest.len(),
            };
            push(&mut tokens, TokenKind::Comment, &rest[..len]);
            pos += len;
            continue;
        }

        let Some(c) = rest.chars().next() else { break };

        let (kind, len) = if c.is_whitespace() {
            (TokenKind::Whitespace, prefix_len(rest, char::is_whitespace))
        } else if c == '#' && !seen_code {
            let end = [rest.find("//"), rest.find("/*")]
                .into_iter()
                .flatten()
                .min()
                .unwrap_or(rest.len());
            (TokenKind::Preprocessor, end)
        } else if c.is_ascii_digit() || (c == '.' && rest[1..].starts_with(|d: char| d.is_ascii_digit())) {
            (TokenKind::Number, number_len(rest))
        } else if c.is_alphabetic() || c == '_' {
            let len = prefix_len(rest, |ch| ch.is_alphanumeric() || ch == '_');
            (classify_word(&rest[..len]), len)
        } else if OPERATOR_CHARS.contains(c) {
            let mut len = 0;
            for (i, ch) in rest.char_indices() {
                if !OPERATOR_CHARS.contains(ch) {
                    break;
                }
                let tail = &rest[i..];
                if i > 0 && (tail.starts_with("//") || tail.starts_with("/*")) {
                    break;
                }
                len = i + ch.len_utf8();
            }
            (TokenKind::Operator, len)
        } else if PUNCTUATION_CHARS.contains(c) {
            (TokenKind::Punctuation, c.len_utf8())
        } else {
            (TokenKind::Plain, c.len_utf8())
        };

        if kind != TokenKind::Whitespace {
            seen_code = true;
        }
        push(&mut tokens, kind, &rest[..len]);
        pos += len;
    }

    tokens
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HighlightTheme {
    pub background: Color32,
    pub plain: Color32,
    pub comment: Color32,
    pub preprocessor: Color32,
    pub keyword: Color32,
    pub ty: Color32,
    pub builtin: Color32,
    pub number: Color32,
    pub operator: Color32,
    pub punctuation: Color32,
    pub identifier: Color32,
}

impl Default for HighlightTheme {
    fn default() -> Self {
        Self {
            background: Color32::from_rgba_unmultiplied(30, 30, 30, 200),
            plain: Color32::from_rgb(0xD4, 0xD4, 0xD4),
            comment: Color32::from_rgb(0x6A, 0x99, 0x55),
            preprocessor: Color32::from_rgb(0xC5, 0x86, 0xC0),
            keyword: Color32::from_rgb(0x56, 0x9C, 0xD6),
            ty: Color32::from_rgb(0x4E, 0xC9, 0xB0),
            builtin: Color32::from_rgb(0xDC, 0xDC, 0xAA),
            number: Color32::from_rgb(0xB5, 0xCE, 0xA8),
            operator: Color32::from_rgb(0xD4, 0xD4, 0xD4),
            punctuation: Color32::from_rgb(0xD4, 0xD4, 0xD4),
            identifier: Color32::from_rgb(0x9C, 0xDC, 0xFE),
        }
    }
}

impl HighlightTheme {
    pub fn color(&self, kind: TokenKind) -> Color32 {
        match kind {
            TokenKind::Comment => self.comment,
            TokenKind::Preprocessor => self.preprocessor,
            TokenKind::Keyword => self.keyword,
            TokenKind::Type => self.ty,
            TokenKind::Builtin => self.builtin,
            TokenKind::Number => self.number,
            TokenKind::Operator => self.operator,
            TokenKind::Punctuation => self.punctuation,
            TokenKind::Identifier => self.identifier,
            TokenKind::Whitespace | TokenKind::Plain => self.plain,
        }
    }
}

/// One text section per token, a newline between lines.
pub fn layout_job(lines: &[HighlightedLine], theme: &HighlightTheme, font: &FontId) -> LayoutJob {
    let mut job = LayoutJob::default();
    for (index, line) in lines.iter().enumerate() {
        if index > 0 {
            job.append("\n", 0.0, TextFormat::simple(font.clone(), theme.plain));
        }
        for token in line {
            job.append(&token.text, 0.0, TextFormat::simple(font.clone(), theme.color(token.kind)));
        }
    }
    job
}

/// Re-tokenizes only when the source text changes.
#[derive(Debug)]
pub struct Highlighter {
    language: String,
    source: String,
    lines: Vec<HighlightedLine>,
}

impl Highlighter {
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            source: String::new(),
            lines: Vec::new(),
        }
    }

    pub fn highlight(&mut self, source: &str) -> &[HighlightedLine] {
        if source != self.source {
            self.source = source.to_string();
            self.lines = tokenize(source, &self.language);
        }
        &self.lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(line: &HighlightedLine) -> Vec<(TokenKind, &str)> {
        line.iter().map(|t| (t.kind, t.text.as_str())).collect()
    }

    fn joined(line: &HighlightedLine) -> String {
        line.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn test_tokens_rebuild_each_line() {
        let source = "#version 330 core\nuniform vec3 diffuse; // colour\nvoid main() {\n\tfloat x = 1.5e-3 + .5;\n}";
        let lines = tokenize(source, "glsl");
        assert_eq!(lines.len(), 5);
        for (line, original) in lines.iter().zip(source.split('\n')) {
            assert_eq!(joined(line), original);
        }
    }

    #[test]
    fn test_classification() {
        let lines = tokenize("uniform vec3 diffuse; // c", "glsl");
        assert_eq!(
            kinds(&lines[0]),
            vec![
                (TokenKind::Keyword, "uniform"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Type, "vec3"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Identifier, "diffuse"),
                (TokenKind::Punctuation, ";"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Comment, "// c"),
            ]
        );

        let lines = tokenize("gl_Position = normalize(x) * 2.0;", "glsl");
        let line = &lines[0];
        assert_eq!(line[0].kind, TokenKind::Builtin);
        assert!(line.iter().any(|t| t.kind == TokenKind::Number && t.text == "2.0"));
        assert!(line.iter().any(|t| t.kind == TokenKind::Builtin && t.text == "normalize"));
    }

    #[test]
    fn test_preprocessor_and_include() {
        let lines = tokenize("  #include <common>\nx = a # b;", "glsl");
        assert_eq!(kinds(&lines[0])[1], (TokenKind::Preprocessor, "#include <common>"));
        assert!(lines[1].iter().all(|t| t.kind != TokenKind::Preprocessor));
    }

    #[test]
    fn test_block_comment_spans_lines() {
        let source = "/**********\n *    #include <x>    *\n **********/\n#include <x>";
        let lines = tokenize(source, "cpp");

        assert!(lines[..3].iter().flatten().all(|t| t.kind == TokenKind::Comment));
        assert_eq!(lines[3][0].kind, TokenKind::Preprocessor);
    }

    #[test]
    fn test_unknown_language_is_plain() {
        let lines = tokenize("a b\n\nc", "text");
        assert_eq!(lines.len(), 3);
        assert_eq!(kinds(&lines[0]), vec![(TokenKind::Plain, "a b")]);
        assert!(lines[1].is_empty());
    }

    #[test]
    fn test_layout_job_sections() {
        let lines = tokenize("float a;\nint b;", "glsl");
        let job = layout_job(&lines, &HighlightTheme::default(), &FontId::monospace(12.0));
        assert_eq!(job.text, "float a;\nint b;");
        let token_count: usize = lines.iter().map(Vec::len).sum();
        assert_eq!(job.sections.len(), token_count + 1);
    }

    #[test]
    fn test_highlighter_caches_until_source_changes() {
        let mut highlighter = Highlighter::new("glsl");
        assert_eq!(highlighter.highlight("int a;").len(), 1);
        assert_eq!(highlighter.highlight("int a;\nint b;").len(), 2);
        assert_eq!(highlighter.highlight("").len(), 1);
    }

    #[test]
    fn test_highlighter_first_call_tokenizes() {
        let mut highlighter = Highlighter::new("glsl");
        let lines = highlighter.highlight("float a;");
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0][0].kind, TokenKind::Type);
    }
}
