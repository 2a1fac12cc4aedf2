// shaders.rs - GL shader programs with source readback

use gl::types::*;
use std::collections::HashMap;
use std::ffi::{CString, NulError};
use std::ptr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("Shader compilation failed: {0}")]
    Compilation(String),
    #[error("Program linking failed: {0}")]
    Linking(String),
    #[error("Null byte error: {0}")]
    Nul(#[from] NulError),
    #[error("Unknown shader chunk: <{0}>")]
    UnknownChunk(String),
    #[error("Include nesting too deep at <{0}>")]
    IncludeDepth(String),
}

/// A linked GL program that keeps its shader objects attached.
///
/// The shader objects live as long as the program so the driver can be asked
/// for their source text at any time (`glGetShaderSource`).
pub struct ShaderProgram {
    id: GLuint,
    vertex_shader: GLuint,
    fragment_shader: GLuint,
    uniforms: HashMap<String, GLint>,
}

impl ShaderProgram {
    pub fn from_sources(vertex_source: &str, fragment_source: &str) -> Result<Self, ShaderError> {
        let vertex_shader = Self::compile_shader(vertex_source, gl::VERTEX_SHADER)?;
        let fragment_shader = match Self::compile_shader(fragment_source, gl::FRAGMENT_SHADER) {
            Ok(shader) => shader,
            Err(e) => {
                unsafe { gl::DeleteShader(vertex_shader) };
                return Err(e);
            }
        };

        let program = unsafe { gl::CreateProgram() };
        unsafe {
            gl::AttachShader(program, vertex_shader);
            gl::AttachShader(program, fragment_shader);
            gl::LinkProgram(program);
        }

        if let Err(e) = Self::check_link_status(program) {
            unsafe {
                gl::DeleteProgram(program);
                gl::DeleteShader(vertex_shader);
                gl::DeleteShader(fragment_shader);
            }
            return Err(e);
        }

        Ok(Self {
            id: program,
            vertex_shader,
            fragment_shader,
            uniforms: HashMap::new(),
        })
    }

    fn compile_shader(source: &str, shader_type: GLenum) -> Result<GLuint, ShaderError> {
        let c_str = CString::new(source.as_bytes())?;
        let shader = unsafe { gl::CreateShader(shader_type) };

        unsafe {
            gl::ShaderSource(shader, 1, &c_str.as_ptr(), ptr::null());
            gl::CompileShader(shader);
        }

        let mut success = 1;
        unsafe {
            gl::GetShaderiv(shader, gl::COMPILE_STATUS, &mut success);
        }

        if success == 0 {
            let mut len = 0;
            unsafe {
                gl::GetShaderiv(shader, gl::INFO_LOG_LENGTH, &mut len);
            }

            let error = Self::create_whitespace_cstring_with_len(len as usize);

            unsafe {
                gl::GetShaderInfoLog(shader, len, ptr::null_mut(), error.as_ptr() as *mut GLchar);
                gl::DeleteShader(shader);
            }

            return Err(ShaderError::Compilation(error.to_string_lossy().into_owned()));
        }

        Ok(shader)
    }

    fn check_link_status(program: GLuint) -> Result<(), ShaderError> {
        let mut success = 1;
        unsafe {
            gl::GetProgramiv(program, gl::LINK_STATUS, &mut success);
        }

        if success == 0 {
            let mut len = 0;
            unsafe {
                gl::GetProgramiv(program, gl::INFO_LOG_LENGTH, &mut len);
            }

            let error = Self::create_whitespace_cstring_with_len(len as usize);

            unsafe {
                gl::GetProgramInfoLog(program, len, ptr::null_mut(), error.as_ptr() as *mut GLchar);
            }

            return Err(ShaderError::Linking(error.to_string_lossy().into_owned()));
        }

        Ok(())
    }

    fn create_whitespace_cstring_with_len(len: usize) -> CString {
        let buffer: Vec<u8> = std::iter::repeat(b' ').take(len).collect();
        // Spaces only, so there is no interior nul.
        unsafe { CString::from_vec_unchecked(buffer) }
    }

    /// Reads back the source the driver holds for a shader object.
    pub fn read_source(shader: GLuint) -> Option<String> {
        let mut len: GLint = 0;
        unsafe {
            gl::GetShaderiv(shader, gl::SHADER_SOURCE_LENGTH, &mut len);
        }
        if len <= 0 {
            return None;
        }

        let mut buffer = vec![0u8; len as usize];
        let mut written: GLsizei = 0;
        unsafe {
            gl::GetShaderSource(shader, len, &mut written, buffer.as_mut_ptr() as *mut GLchar);
        }
        buffer.truncate(written.max(0) as usize);

        Some(String::from_utf8_lossy(&buffer).into_owned())
    }

    pub fn id(&self) -> GLuint {
        self.id
    }

    pub fn vertex_shader(&self) -> GLuint {
        self.vertex_shader
    }

    pub fn fragment_shader(&self) -> GLuint {
        self.fragment_shader
    }

    pub fn set_used(&self) {
        unsafe {
            gl::UseProgram(self.id);
        }
    }

    pub fn get_uniform_location(&mut self, name: &str) -> GLint {
        if let Some(location) = self.uniforms.get(name) {
            return *location;
        }

        let location = match CString::new(name) {
            Ok(cname) => unsafe { gl::GetUniformLocation(self.id, cname.as_ptr()) },
            Err(_) => -1,
        };

        if location == -1 {
            log::debug!("Uniform '{}' not active in program {}", name, self.id);
        }

        self.uniforms.insert(name.to_string(), location);
        location
    }

    // Uniform setters, program must be in use
    pub fn set_uniform_1f(&mut self, name: &str, value: f32) {
        let location = self.get_uniform_location(name);
        unsafe {
            gl::Uniform1f(location, value);
        }
    }

    pub fn set_uniform_vec3(&mut self, name: &str, vec: &[f32; 3]) {
        let location = self.get_uniform_location(name);
        unsafe {
            gl::Uniform3fv(location, 1, vec.as_ptr());
        }
    }

    pub fn set_uniform_mat3(&mut self, name: &str, mat: &[f32; 9]) {
        let location = self.get_uniform_location(name);
        unsafe {
            gl::UniformMatrix3fv(location, 1, gl::FALSE, mat.as_ptr());
        }
    }

    pub fn set_uniform_mat4(&mut self, name: &str, mat: &[f32; 16]) {
        let location = self.get_uniform_location(name);
        unsafe {
            gl::UniformMatrix4fv(location, 1, gl::FALSE, mat.as_ptr());
        }
    }
}

impl Drop for ShaderProgram {
    fn drop(&mut self) {
        unsafe {
            gl::DetachShader(self.id, self.vertex_shader);
            gl::DetachShader(self.id, self.fragment_shader);
            gl::DeleteShader(self.vertex_shader);
            gl::DeleteShader(self.fragment_shader);
            gl::DeleteProgram(self.id);
        }
    }
}
