use super::Scene;

/// Scene-specific logic, run by `Scene::start` and once per `Scene::tick`
/// between the update pass and the destruction sweep.
pub trait SceneEvents {
    fn on_start(&mut self, _scene: &mut Scene) {}

    fn handle_events(&mut self, scene: &mut Scene);
}

/// No scene logic.
impl SceneEvents for () {
    fn handle_events(&mut self, _scene: &mut Scene) {}
}
