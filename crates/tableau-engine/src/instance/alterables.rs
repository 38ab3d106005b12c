/// Numeric slots per instance ("Alterable Value A" .. "Z").
pub const VALUE_COUNT: usize = 26;

/// String slots per instance.
pub const STRING_COUNT: usize = 10;

/// Per-instance scratch values available to scene logic.
///
/// Out-of-range indexes are logged; reads return the default and writes are
/// dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Alterables {
    values: [f64; VALUE_COUNT],
    strings: [String; STRING_COUNT],
}

impl Alterables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self, index: usize) -> f64 {
        match self.values.get(index) {
            Some(v) => *v,
            None => {
                log::warn!("alterable value index {} out of range", index);
                0.0
            }
        }
    }

    pub fn set_value(&mut self, index: usize, value: f64) {
        match self.values.get_mut(index) {
            Some(slot) => *slot = value,
            None => log::warn!("alterable value index {} out of range", index),
        }
    }

    pub fn add_value(&mut self, index: usize, delta: f64) {
        let v = self.value(index);
        self.set_value(index, v + delta);
    }

    pub fn string(&self, index: usize) -> &str {
        match self.strings.get(index) {
            Some(s) => s,
            None => {
                log::warn!("alterable string index {} out of range", index);
                ""
            }
        }
    }

    pub fn set_string(&mut self, index: usize, value: impl Into<String>) {
        match self.strings.get_mut(index) {
            Some(slot) => *slot = value.into(),
            None => log::warn!("alterable string index {} out of range", index),
        }
    }
}
