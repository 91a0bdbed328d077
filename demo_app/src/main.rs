//! Visibility demo application
//!
//! Builds a small room scene, toggles the room's visibility every few frames
//! and lets the deferred task queue refresh the scene after each change.
//! Controls on the lamp and the ball log what a renderer or physics space
//! would do when their node becomes hidden or visible.
//!
//! Usage: `visibility_demo [config.toml|config.ron]`

use std::cell::RefCell;
use std::rc::Rc;

use scene_engine::core::config::TaskQueueConfig;
use scene_engine::prelude::*;
use thiserror::Error;

const FRAMES: usize = 6;
const TOGGLE_EVERY: usize = 2;

/// Errors surfaced by the demo
#[derive(Error, Debug)]
enum DemoError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("scene error: {0}")]
    Scene(#[from] SceneError),

    #[error("task queue error: {0}")]
    Queue(#[from] QueueError),
}

/// Stand-in for a physics body that leaves the simulation while hidden
#[derive(Debug)]
struct PhysicsBodyControl {
    body: String,
    state: HideState,
}

impl PhysicsBodyControl {
    fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            state: HideState::new(),
        }
    }
}

impl Hideable for PhysicsBodyControl {
    fn hide_state(&self) -> &HideState {
        &self.state
    }

    fn hide_state_mut(&mut self) -> HideStateMut<'_> {
        HideStateMut::new(&mut self.state)
    }

    fn on_visibility_changed(&mut self, effectively_hidden: bool) {
        if effectively_hidden {
            log::info!("Removing rigid body '{}' from the physics space", self.body);
        } else {
            log::info!("Adding rigid body '{}' back to the physics space", self.body);
        }
    }
}

impl Control for PhysicsBodyControl {
    fn name(&self) -> &str {
        &self.body
    }

    fn as_hideable(&self) -> Option<&dyn Hideable> {
        Some(self)
    }

    fn as_hideable_mut(&mut self) -> Option<&mut dyn Hideable> {
        Some(self)
    }

    fn on_attachment(&mut self, update: AttachmentUpdate) {
        log::debug!("Rigid body '{}' saw {update:?}", self.body);
    }
}

struct VisibilityDemo {
    scene: Rc<RefCell<SceneTree>>,
    tasks: TaskQueue,
    room: NodeId,
}

impl VisibilityDemo {
    fn new(config: &EngineConfig) -> Result<Self, DemoError> {
        let mut tree = SceneTree::with_config(&config.scene);

        let root = tree.create_root("root");
        let room = tree.create_hideable_node("room");
        let lamp = tree.create_node("lamp");
        let bulb = tree.create_hideable_node("bulb");
        let ball = tree.create_node("ball");

        tree.add_control(lamp, Box::new(HideableControl::new("lamp-culling")))?;
        tree.add_control(ball, Box::new(PhysicsBodyControl::new("ball")))?;

        tree.attach_child(root, room)?;
        tree.attach_child(room, lamp)?;
        tree.attach_child(lamp, bulb)?;
        tree.attach_child(room, ball)?;
        refresh_subtree(&mut tree, root)?;

        log::info!("Scene ready with {} nodes", tree.len());
        Ok(Self {
            scene: Rc::new(RefCell::new(tree)),
            tasks: TaskQueue::with_config(&config.tasks),
            room,
        })
    }

    fn run(&mut self) -> Result<(), DemoError> {
        for frame in 0..FRAMES {
            if frame % TOGGLE_EVERY == 0 {
                self.toggle_room()?;
            }
            let ran = self.tasks.run_batch()?;
            log::debug!("Frame {frame}: ran {ran} deferred task(s)");
            self.report(frame);
        }
        Ok(())
    }

    /// Flip the room and defer the refresh of everything below it
    fn toggle_room(&mut self) -> Result<(), DemoError> {
        let room = self.room;
        {
            let mut scene = self.scene.borrow_mut();
            if is_effectively_hidden(&*scene, room)? {
                reveal(&mut *scene, room)?;
            } else {
                hide(&mut *scene, room)?;
            }
        }

        let scene = Rc::clone(&self.scene);
        self.tasks.try_queue(move || {
            let refreshed = refresh_subtree(&mut *scene.borrow_mut(), room)?;
            log::debug!("Refreshed {refreshed} hideable node(s)");
            Ok(())
        });
        Ok(())
    }

    fn report(&self, frame: usize) {
        let scene = self.scene.borrow();
        let mut line = format!("frame {frame}:");
        for name in ["lamp", "bulb", "ball"] {
            let state = scene
                .find_descendant(self.room, name)
                .and_then(|node| is_effectively_hidden(&*scene, node).ok())
                .map_or("?", |hidden| if hidden { "hidden" } else { "visible" });
            line.push_str(&format!(" {name}={state}"));
        }
        println!("{line}");
    }
}

fn load_config() -> Result<EngineConfig, DemoError> {
    let config = match std::env::args().nth(1) {
        Some(path) => EngineConfig::load_from_file(&path)?,
        None => EngineConfig {
            tasks: TaskQueueConfig::new().with_max_per_run(8),
            ..EngineConfig::default()
        },
    };
    config.validate()?;
    Ok(config)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;

    env_logger::Builder::from_default_env()
        .filter_level(config.logging.level_filter())
        .init();

    log::info!("Starting visibility demo");

    let mut demo = VisibilityDemo::new(&config)?;
    if let Err(e) = demo.run() {
        log::error!("Demo failed: {e}");
        return Err(e.into());
    }

    log::info!("Visibility demo finished successfully");
    Ok(())
}
