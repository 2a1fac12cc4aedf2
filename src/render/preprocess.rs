use crate::render::shader_lib;
use crate::render::shaders::ShaderError;

const MAX_INCLUDE_DEPTH: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

/// Parses `#include <name>` at the start of a line (spaces and tabs allowed
/// before it). Returns the chunk name and whatever follows the closing `>`.
fn parse_include(line: &str) -> Option<(&str, &str)> {
    let rest = line.trim_start_matches([' ', '\t']).strip_prefix("#include")?;
    let after_spaces = rest.trim_start_matches(' ');
    if after_spaces.len() == rest.len() {
        return None;
    }

    let body = after_spaces.strip_prefix('<')?;
    let end = body.find('>')?;
    let name = &body[..end];
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '/'));

    valid.then(|| (name, &body[end + 1..]))
}

/// Expands every include directive using the built-in chunk table.
pub fn resolve_includes(source: &str) -> Result<String, ShaderError> {
    resolve_with(source, &shader_lib::chunk, 0)
}

/// Expands include directives with a caller supplied chunk lookup.
pub fn resolve_includes_with<'a, F>(source: &str, lookup: &F) -> Result<String, ShaderError>
where
    F: Fn(&str) -> Option<&'a str>,
{
    resolve_with(source, lookup, 0)
}

fn resolve_with<'a, F>(source: &str, lookup: &F, depth: usize) -> Result<String, ShaderError>
where
    F: Fn(&str) -> Option<&'a str>,
{
    let mut out = String::with_capacity(source.len());

    for (index, line) in source.split('\n').enumerate() {
        if index > 0 {
            out.push('\n');
        }

        match parse_include(line) {
            Some((name, trailing)) => {
                if depth >= MAX_INCLUDE_DEPTH {
                    return Err(ShaderError::IncludeDepth(name.to_string()));
                }
                let chunk = lookup(name).ok_or_else(|| ShaderError::UnknownChunk(name.to_string()))?;
                out.push_str(&resolve_with(chunk, lookup, depth + 1)?);
                out.push_str(trailing);
            }
            None => out.push_str(line),
        }
    }

    Ok(out)
}

/// Removes `/* ... */` comments, keeping their line breaks so driver error
/// line numbers still point at the right rows. `//` comments are left alone.
pub fn strip_block_comments(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut chars = source.chars().peekable();
    let mut in_line_comment = false;

    while let Some(c) = chars.next() {
        if in_line_comment {
            if c == '\n' {
                in_line_comment = false;
            }
            out.push(c);
            continue;
        }

        match (c, chars.peek()) {
            ('/', Some('/')) => {
                in_line_comment = true;
                out.push(c);
            }
            ('/', Some('*')) => {
                chars.next();
                let mut prev = '\0';
                for inner in chars.by_ref() {
                    if inner == '\n' {
                        out.push('\n');
                    }
                    if prev == '*' && inner == '/' {
                        break;
                    }
                    prev = inner;
                }
            }
            _ => out.push(c),
        }
    }

    out
}

/// Stage prefix: version, precision, engine-provided attributes and uniforms.
pub fn stage_prefix(stage: ShaderStage, shader_name: &str) -> String {
    let mut prefix = String::from("#version 330 core\n");
    prefix.push_str(&format!("#define SHADER_NAME {shader_name}\n"));
    prefix.push_str("precision highp float;\nprecision highp int;\n");

    match stage {
        ShaderStage::Vertex => prefix.push_str(
            "uniform mat4 modelMatrix;
uniform mat4 modelViewMatrix;
uniform mat4 projectionMatrix;
uniform mat4 viewMatrix;
uniform mat3 normalMatrix;
uniform vec3 cameraPosition;
layout(location = 0) in vec3 position;
layout(location = 1) in vec3 normal;
layout(location = 2) in vec2 uv;
",
        ),
        ShaderStage::Fragment => prefix.push_str(
            "uniform mat4 viewMatrix;
uniform vec3 cameraPosition;
out highp vec4 fragColor;
",
        ),
    }

    prefix
}

/// Builds the final source for one stage from (possibly hook-modified) text.
pub fn build_stage_source(
    stage: ShaderStage,
    shader_name: &str,
    body: &str,
    strip_comments: bool,
) -> Result<String, ShaderError> {
    let resolved = resolve_includes(body)?;
    let full = format!("{}\n{}", stage_prefix(stage, shader_name), resolved);

    Ok(if strip_comments {
        strip_block_comments(&full)
    } else {
        full
    })
}
