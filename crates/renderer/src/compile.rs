use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use wgpu::naga::ShaderStage;

use crate::types::{
    CIRCLE_FRAGMENT_FILE, CIRCLE_VERTEX_FILE, LINE_FRAGMENT_FILE, LINE_VERTEX_FILE,
};

/// One vertex+fragment shader program, together with the embedded sources
/// used when the on-disk files are missing or rejected by the compiler.
pub(crate) struct ProgramSources {
    pub label: &'static str,
    pub vertex_path: PathBuf,
    pub fragment_path: PathBuf,
    pub builtin_vertex: &'static str,
    pub builtin_fragment: &'static str,
}

impl ProgramSources {
    /// Sources for the vertex-colored line strip over the chain.
    pub(crate) fn line(shader_dir: &Path) -> Self {
        Self {
            label: "line",
            vertex_path: shader_dir.join(LINE_VERTEX_FILE),
            fragment_path: shader_dir.join(LINE_FRAGMENT_FILE),
            builtin_vertex: LINE_VERTEX_GLSL,
            builtin_fragment: LINE_FRAGMENT_GLSL,
        }
    }

    /// Sources for the instanced circle pass.
    pub(crate) fn circle(shader_dir: &Path) -> Self {
        Self {
            label: "circle",
            vertex_path: shader_dir.join(CIRCLE_VERTEX_FILE),
            fragment_path: shader_dir.join(CIRCLE_FRAGMENT_FILE),
            builtin_vertex: CIRCLE_VERTEX_GLSL,
            builtin_fragment: CIRCLE_FRAGMENT_GLSL,
        }
    }
}

pub(crate) struct ProgramModules {
    pub vertex: wgpu::ShaderModule,
    pub fragment: wgpu::ShaderModule,
}

/// Reads a shader source file as text.
///
/// A file that cannot be read degrades to empty source: the warning is
/// logged here, and the empty string fails compilation downstream where the
/// caller falls back to the embedded program.
pub(crate) fn load_shader_source(path: &Path) -> String {
    match fs::read_to_string(path) {
        Ok(source) => source,
        Err(err) => {
            tracing::warn!(
                path = %path.display(),
                error = %err,
                "failed to load shader file; treating as empty source"
            );
            String::new()
        }
    }
}

/// Compiles one GLSL stage, surfacing the compiler diagnostic on failure.
///
/// wgpu reports GLSL front-end errors through the device error scope rather
/// than a return value, so a validation scope is pushed around module
/// creation and popped (blocking) before the module is handed back.
pub(crate) fn compile_shader(
    device: &wgpu::Device,
    label: &str,
    stage: ShaderStage,
    source: &str,
) -> Result<wgpu::ShaderModule> {
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Glsl {
            shader: Cow::Owned(source.to_owned()),
            stage,
            defines: &[],
        },
    });
    if let Some(error) = pollster::block_on(device.pop_error_scope()) {
        return Err(anyhow!("{error}"));
    }
    Ok(module)
}

/// Loads and compiles a full program, falling back to the embedded sources
/// stage by stage when a disk source is missing or fails to compile.
pub(crate) fn compile_program(
    device: &wgpu::Device,
    sources: &ProgramSources,
) -> Result<ProgramModules> {
    let vertex = compile_stage_with_fallback(
        device,
        sources.label,
        ShaderStage::Vertex,
        &sources.vertex_path,
        sources.builtin_vertex,
    )?;
    let fragment = compile_stage_with_fallback(
        device,
        sources.label,
        ShaderStage::Fragment,
        &sources.fragment_path,
        sources.builtin_fragment,
    )?;
    Ok(ProgramModules { vertex, fragment })
}

fn compile_stage_with_fallback(
    device: &wgpu::Device,
    label: &str,
    stage: ShaderStage,
    path: &Path,
    builtin: &str,
) -> Result<wgpu::ShaderModule> {
    let source = load_shader_source(path);
    match compile_shader(device, label, stage, &source) {
        Ok(module) => Ok(module),
        Err(err) => {
            tracing::error!(
                program = label,
                ?stage,
                path = %path.display(),
                "shader compilation failed, using built-in source: {err}"
            );
            compile_shader(device, label, stage, builtin)
                .with_context(|| format!("built-in {label} {stage:?} shader failed to compile"))
        }
    }
}

/// Embedded copies of the shipped shader sources. These are the fallback
/// when the files next to the binary are missing or broken, so they must
/// stay in sync with `shaders/`.
const LINE_VERTEX_GLSL: &str = r"#version 450

layout(location = 0) in vec2 position;
layout(location = 1) in vec3 color;

layout(location = 0) out vec3 v_color;

layout(std140, set = 0, binding = 0) uniform SceneParams {
    vec2 resolution;
} scene;

void main() {
    vec2 ndc = vec2(
        position.x / scene.resolution.x * 2.0 - 1.0,
        1.0 - position.y / scene.resolution.y * 2.0
    );
    v_color = color;
    gl_Position = vec4(ndc, 0.0, 1.0);
}
";

const LINE_FRAGMENT_GLSL: &str = r"#version 450

layout(location = 0) in vec3 v_color;

layout(location = 0) out vec4 out_color;

void main() {
    out_color = vec4(v_color, 1.0);
}
";

const CIRCLE_VERTEX_GLSL: &str = r"#version 450

layout(location = 0) in vec2 corner;
layout(location = 1) in vec2 i_center;
layout(location = 2) in vec3 i_color;
layout(location = 3) in float i_radius;

layout(location = 0) out vec3 v_color;

layout(std140, set = 0, binding = 0) uniform SceneParams {
    vec2 resolution;
} scene;

void main() {
    vec2 world = i_center + corner * i_radius;
    vec2 ndc = vec2(
        world.x / scene.resolution.x * 2.0 - 1.0,
        1.0 - world.y / scene.resolution.y * 2.0
    );
    v_color = i_color;
    gl_Position = vec4(ndc, 0.0, 1.0);
}
";

const CIRCLE_FRAGMENT_GLSL: &str = r"#version 450

layout(location = 0) in vec3 v_color;

layout(location = 0) out vec4 out_color;

void main() {
    out_color = vec4(v_color, 1.0);
}
";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_degrades_to_empty_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("does-not-exist.vert");
        assert_eq!(load_shader_source(&path), "");
    }

    #[test]
    fn existing_file_is_read_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("demo.frag");
        fs::write(&path, "void main() {}\n").unwrap();
        assert_eq!(load_shader_source(&path), "void main() {}\n");
    }

    #[test]
    fn program_sources_resolve_inside_shader_dir() {
        let sources = ProgramSources::line(Path::new("shaders"));
        assert_eq!(sources.vertex_path, Path::new("shaders/snake.vert"));
        assert_eq!(sources.fragment_path, Path::new("shaders/snake.frag"));
    }

    #[test]
    fn builtin_sources_declare_the_scene_uniform() {
        for source in [LINE_VERTEX_GLSL, CIRCLE_VERTEX_GLSL] {
            assert!(source.contains("uniform SceneParams"));
            assert!(source.contains("gl_Position"));
        }
        assert!(CIRCLE_VERTEX_GLSL.contains("i_radius"));
    }
}
