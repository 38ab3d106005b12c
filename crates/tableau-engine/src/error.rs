use thiserror::Error;

use crate::animation::AnimationId;
use crate::instance::ClassId;

/// Errors reported by scene construction and strict lookups.
///
/// Gameplay calls that reference missing data log a diagnostic and degrade to
/// a safe default instead of returning these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SceneError {
    #[error("invalid instance count: class {class} has no live instances")]
    EmptyClass { class: ClassId },

    #[error("invalid instance count: no live instances for qualifier")]
    EmptyQualifier,

    #[error("layer {index} out of range ({count} layers)")]
    LayerOutOfRange { index: usize, count: usize },

    #[error("scene has no layers")]
    NoLayers,

    #[error("unknown or released instance handle")]
    UnknownInstance,

    #[error("direction {direction} of animation {animation} is outside 0..32")]
    DirectionOutOfRange { animation: AnimationId, direction: usize },

    #[error("direction {direction} of animation {animation} was never declared")]
    UndeclaredDirection { animation: AnimationId, direction: usize },

    #[error("animation {animation} has no authored directions")]
    NoAuthoredDirections { animation: AnimationId },
}

pub type Result<T> = std::result::Result<T, SceneError>;
