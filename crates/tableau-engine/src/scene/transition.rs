/// Pending scene change, polled by the driver after each tick.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum Transition {
    #[default]
    None,
    /// Tear down and rebuild the current scene.
    Restart,
    /// Switch to the scene at this index.
    Goto(usize),
}

impl Transition {
    pub const NONE_SIGNAL: i32 = -1;
    pub const RESTART_SIGNAL: i32 = -2;

    /// Integer form used by drivers that store the next scene index:
    /// `-1` none, `-2` restart, otherwise the index.
    pub fn to_signal(self) -> i32 {
        match self {
            Transition::None => Self::NONE_SIGNAL,
            Transition::Restart => Self::RESTART_SIGNAL,
            Transition::Goto(index) => i32::try_from(index).unwrap_or(i32::MAX),
        }
    }

    /// Parses the integer form. Unknown negative values read as `None`.
    pub fn from_signal(signal: i32) -> Self {
        match signal {
            Self::NONE_SIGNAL => Transition::None,
            Self::RESTART_SIGNAL => Transition::Restart,
            n if n >= 0 => Transition::Goto(n as usize),
            n => {
                log::warn!("unknown transition signal {}", n);
                Transition::None
            }
        }
    }

    #[inline]
    pub fn is_pending(self) -> bool {
        self != Transition::None
    }
}
