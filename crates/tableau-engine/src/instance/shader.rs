use std::collections::HashMap;

use crate::paint::Color;

/// Named shader and its parameter bag.
///
/// The engine only stores these; interpreting them is the backend's job.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShaderParameters {
    pub shader: Option<String>,
    values: HashMap<String, f64>,
}

impl ShaderParameters {
    pub fn set(&mut self, name: &str, value: f64) {
        self.values.insert(name.to_owned(), value);
    }

    /// Stores `color` as its packed `0xRRGGBB` value.
    pub fn set_color(&mut self, name: &str, color: Color) {
        self.set(name, color.to_rgb_int() as f64);
    }

    /// Missing parameters read as `0.0`.
    pub fn get(&self, name: &str) -> f64 {
        self.values.get(name).copied().unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
