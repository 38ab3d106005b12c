//! Process-wide engine constants.
//!
//! The driver builds one `EngineConfig` at startup and hands a copy to every
//! scene it constructs. Nothing here changes while a scene is running.

/// What a single-instance lookup does when the class has no live instances.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum EmptyLookupPolicy {
    /// Log an error and return `Err`; the caller decides.
    #[default]
    Report,
    /// Additionally raise the scene's quit flag so the driver stops after the
    /// current tick.
    Quit,
}

/// Engine configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Canvas pixel buffer width. Independent of the scene size.
    pub canvas_width: i32,
    /// Canvas pixel buffer height. Independent of the scene size.
    pub canvas_height: i32,
    pub viewport_width: i32,
    pub viewport_height: i32,
    pub empty_lookup: EmptyLookupPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            canvas_width: 1024,
            canvas_height: 1024,
            viewport_width: 640,
            viewport_height: 480,
            empty_lookup: EmptyLookupPolicy::Report,
        }
    }
}

impl EngineConfig {
    pub fn with_viewport(mut self, width: i32, height: i32) -> Self {
        self.viewport_width = width;
        self.viewport_height = height;
        self
    }

    pub fn with_canvas(mut self, width: i32, height: i32) -> Self {
        self.canvas_width = width;
        self.canvas_height = height;
        self
    }

    pub fn with_empty_lookup(mut self, policy: EmptyLookupPolicy) -> Self {
        self.empty_lookup = policy;
        self
    }
}
