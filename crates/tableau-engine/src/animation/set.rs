use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{Result, SceneError};
use crate::image::Image;

/// Number of discrete facing directions per animation.
pub const DIRECTION_COUNT: usize = 32;

/// Identifier of an animation within a class's animation set.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct AnimationId(pub u32);

impl fmt::Display for AnimationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Playback data for one facing direction of one animation.
#[derive(Debug, Clone, PartialEq)]
pub struct Direction {
    /// Slot this data was authored for. Fallback slots alias another slot's
    /// data, so this can differ from the slot it is looked up through.
    pub index: usize,
    pub min_speed: i32,
    pub max_speed: i32,
    /// `0` loops forever back to `back_to`; any other value holds the last
    /// frame once playback reaches the end.
    pub loop_count: i32,
    pub back_to: usize,
    pub frames: Vec<Arc<Image>>,
}

impl Direction {
    #[inline]
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }
}

/// All 32 direction slots of an animation, fully resolved.
#[derive(Debug, Clone, Default)]
pub struct Animation {
    slots: [Option<Arc<Direction>>; DIRECTION_COUNT],
}

impl Animation {
    #[inline]
    pub fn direction(&self, dir: usize) -> Option<&Direction> {
        self.slots.get(dir).and_then(|d| d.as_deref())
    }

    /// Whether slot `dir` holds its own authored data rather than a fallback.
    #[inline]
    pub fn is_authored(&self, dir: usize) -> bool {
        self.direction(dir).is_some_and(|d| d.index == dir)
    }
}

/// Immutable animation data shared by every instance of a class.
#[derive(Debug, Clone, Default)]
pub struct AnimationSet {
    animations: BTreeMap<AnimationId, Animation>,
}

impl AnimationSet {
    #[inline]
    pub fn get(&self, id: AnimationId) -> Option<&Animation> {
        self.animations.get(&id)
    }

    #[inline]
    pub fn contains(&self, id: AnimationId) -> bool {
        self.animations.contains_key(&id)
    }

    #[inline]
    pub fn direction(&self, id: AnimationId, dir: usize) -> Option<&Direction> {
        self.get(id).and_then(|a| a.direction(dir))
    }

    /// Lowest declared animation id.
    #[inline]
    pub fn first(&self) -> Option<AnimationId> {
        self.animations.keys().next().copied()
    }

    pub fn ids(&self) -> impl Iterator<Item = AnimationId> + '_ {
        self.animations.keys().copied()
    }
}

/// Collects authored directions and frames, then resolves fallbacks.
///
/// ```
/// # use std::sync::Arc;
/// # use tableau_engine::animation::{AnimationId, AnimationSetBuilder};
/// # use tableau_engine::image::Image;
/// # use tableau_engine::paint::Color;
/// let walk = AnimationId(1);
/// let mut builder = AnimationSetBuilder::new();
/// builder
///     .add_direction(walk, 0, 0, 50, 0, 0)?
///     .add_frame(walk, 0, Arc::new(Image::filled(8, 8, Color::WHITE)))?;
/// let set = builder.build()?;
/// assert!(set.get(walk).unwrap().direction(16).is_some());
/// # Ok::<(), tableau_engine::SceneError>(())
/// ```
#[derive(Debug, Default)]
pub struct AnimationSetBuilder {
    animations: BTreeMap<AnimationId, [Option<Direction>; DIRECTION_COUNT]>,
}

impl AnimationSetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares direction `dir` of `animation`. Redeclaring replaces the
    /// previous data, frames included.
    pub fn add_direction(
        &mut self,
        animation: AnimationId,
        dir: usize,
        min_speed: i32,
        max_speed: i32,
        loop_count: i32,
        back_to: usize,
    ) -> Result<&mut Self> {
        if dir >= DIRECTION_COUNT {
            return Err(SceneError::DirectionOutOfRange { animation, direction: dir });
        }

        let slots = self.animations.entry(animation).or_default();
        slots[dir] = Some(Direction {
            index: dir,
            min_speed,
            max_speed,
            loop_count,
            back_to,
            frames: Vec::new(),
        });
        Ok(self)
    }

    /// Appends a frame to a previously declared direction.
    pub fn add_frame(&mut self, animation: AnimationId, dir: usize, image: Arc<Image>) -> Result<&mut Self> {
        let direction = self
            .animations
            .get_mut(&animation)
            .and_then(|slots| slots.get_mut(dir))
            .and_then(Option::as_mut)
            .ok_or(SceneError::UndeclaredDirection { animation, direction: dir })?;

        direction.frames.push(image);
        Ok(self)
    }

    /// Resolves every empty direction slot to its nearest authored neighbour
    /// and freezes the result.
    pub fn build(self) -> Result<Arc<AnimationSet>> {
        let mut animations = BTreeMap::new();

        for (id, authored) in self.animations {
            let authored: [Option<Arc<Direction>>; DIRECTION_COUNT] = authored.map(|d| d.map(Arc::new));

            let mut slots: [Option<Arc<Direction>>; DIRECTION_COUNT] = Default::default();
            for (dir, slot) in slots.iter_mut().enumerate() {
                *slot = match &authored[dir] {
                    Some(direction) => Some(Arc::clone(direction)),
                    None => nearest_authored(dir, &authored),
                };
                if slot.is_none() {
                    return Err(SceneError::NoAuthoredDirections { animation: id });
                }
            }

            animations.insert(id, Animation { slots });
        }

        Ok(Arc::new(AnimationSet { animations }))
    }
}

/// Searches outward from `dir`, trying `+offset` before `-offset` at each
/// step, for the closest authored slot.
fn nearest_authored(
    dir: usize,
    authored: &[Option<Arc<Direction>>; DIRECTION_COUNT],
) -> Option<Arc<Direction>> {
    for offset in 1..=DIRECTION_COUNT / 2 {
        let forward = (dir + offset) % DIRECTION_COUNT;
        if let Some(d) = &authored[forward] {
            return Some(Arc::clone(d));
        }
        let backward = (dir + DIRECTION_COUNT - offset) % DIRECTION_COUNT;
        if let Some(d) = &authored[backward] {
            return Some(Arc::clone(d));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::Color;

    const WALK: AnimationId = AnimationId(1);

    fn frame() -> Arc<Image> {
        Arc::new(Image::filled(2, 2, Color::WHITE))
    }

    fn build_with(dirs: &[usize]) -> Arc<AnimationSet> {
        let mut b = AnimationSetBuilder::new();
        for &d in dirs {
            b.add_direction(WALK, d, 0, 50, 0, 0).unwrap();
            b.add_frame(WALK, d, frame()).unwrap();
        }
        b.build().unwrap()
    }

    // ── fallback resolution ───────────────────────────────────────────────

    #[test]
    fn single_direction_fills_every_slot() {
        let set = build_with(&[0]);
        let anim = set.get(WALK).unwrap();
        for dir in 0..DIRECTION_COUNT {
            let d = anim.direction(dir).unwrap();
            assert_eq!(d.index, 0);
            assert_eq!(d.frame_count(), 1);
        }
        assert!(anim.is_authored(0));
        assert!(!anim.is_authored(5));
    }

    #[test]
    fn nearest_direction_wins() {
        let set = build_with(&[0, 8]);
        let anim = set.get(WALK).unwrap();
        assert_eq!(anim.direction(3).unwrap().index, 0);
        assert_eq!(anim.direction(5).unwrap().index, 8);
        assert_eq!(anim.direction(30).unwrap().index, 0);
    }

    #[test]
    fn ties_prefer_the_forward_search() {
        // Slot 4 is 4 steps from both 0 and 8.
        let set = build_with(&[0, 8]);
        assert_eq!(set.direction(WALK, 4).unwrap().index, 8);
        // Slot 20 is 4 steps from both 16 and 24.
        let set = build_with(&[16, 24]);
        assert_eq!(set.direction(WALK, 20).unwrap().index, 24);
    }

    #[test]
    fn search_wraps_around() {
        let set = build_with(&[31]);
        assert_eq!(set.direction(WALK, 0).unwrap().index, 31);
        let set = build_with(&[1, 30]);
        // 31 -> +1 is 0 (empty), -1 is 30.
        assert_eq!(set.direction(WALK, 31).unwrap().index, 30);
    }

    // ── builder errors ────────────────────────────────────────────────────

    #[test]
    fn direction_out_of_range_is_rejected() {
        let mut b = AnimationSetBuilder::new();
        let err = b.add_direction(WALK, 32, 0, 0, 0, 0).unwrap_err();
        assert_eq!(err, SceneError::DirectionOutOfRange { animation: WALK, direction: 32 });
    }

    #[test]
    fn frame_for_undeclared_direction_is_rejected() {
        let mut b = AnimationSetBuilder::new();
        b.add_direction(WALK, 0, 0, 0, 0, 0).unwrap();
        let err = b.add_frame(WALK, 3, frame()).unwrap_err();
        assert_eq!(err, SceneError::UndeclaredDirection { animation: WALK, direction: 3 });
    }

    #[test]
    fn first_is_lowest_id() {
        let mut b = AnimationSetBuilder::new();
        b.add_direction(AnimationId(7), 0, 0, 0, 0, 0).unwrap();
        b.add_direction(AnimationId(2), 0, 0, 0, 0, 0).unwrap();
        let set = b.build().unwrap();
        assert_eq!(set.first(), Some(AnimationId(2)));
        assert_eq!(set.ids().count(), 2);
    }
}
