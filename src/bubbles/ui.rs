//! Bevy host for the bubble scheduler.
//!
//! The scheduler cannot hold `Commands`, so [`UiSurface`] queues what it is
//! asked to do and [`apply_surface_commands`] turns the queue into UI nodes
//! once per frame. Each frame:
//! 1. lifecycle messages and the toggle key start/stop/destroy the scheduler
//! 2. the scheduler clock advances by the frame delta
//! 3. queued surface commands are applied to the world
//! 4. live bubbles float upward and fade

use std::collections::HashMap;

use bevy::prelude::*;
use rand::{SeedableRng, rngs::StdRng};

use super::{
    config::BubbleConfig,
    scheduler::BubbleScheduler,
    surface::{BubbleVisual, RenderSurface},
};
use crate::theme::{BubbleFont, palette};

pub fn plugin(app: &mut App) {
    app.add_message::<BubbleLifecycle>();
    app.init_resource::<SurfaceEntities>();
    app.register_type::<FloatingBubble>();

    if !app.world().contains_resource::<BackgroundBubbles>() {
        app.insert_resource(BackgroundBubbles::new(BubbleConfig::load()));
    }

    app.add_systems(
        Update,
        (
            toggle_on_key,
            handle_lifecycle,
            tick_bubbles,
            apply_surface_commands,
            animate_floating_bubbles,
        )
            .chain(),
    );
}

/// External lifecycle control, e.g. on screen changes or teardown.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BubbleLifecycle {
    Start,
    Stop,
    Destroy,
}

/// The scheduler driving the background bubbles.
#[derive(Resource)]
pub struct BackgroundBubbles(pub BubbleScheduler<UiSurface, StdRng>);

impl BackgroundBubbles {
    /// Mount on the window root.
    pub fn new(config: BubbleConfig) -> Self {
        Self::mounted(None, config)
    }

    /// Mount under `parent`, or the window root for `None`.
    pub fn mounted(parent: Option<Entity>, config: BubbleConfig) -> Self {
        Self(BubbleScheduler::new(
            UiSurface::default(),
            parent,
            config,
            StdRng::from_rng(&mut rand::rng()),
        ))
    }

    /// Deterministic variant for tests and replays.
    pub fn seeded(config: BubbleConfig, seed: u64) -> Self {
        Self(BubbleScheduler::new(
            UiSurface::default(),
            None,
            config,
            StdRng::seed_from_u64(seed),
        ))
    }
}

// =============================================================================
// SURFACE
// =============================================================================

/// Id of a container or element handed out by [`UiSurface`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceId(u64);

#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCommand {
    CreateContainer {
        id: SurfaceId,
        mount: Option<Entity>,
    },
    CreateElement {
        id: SurfaceId,
        container: SurfaceId,
        visual: BubbleVisual,
    },
    RemoveElement(SurfaceId),
    RemoveAllElements(SurfaceId),
    RemoveContainer(SurfaceId),
}

/// Render surface that queues commands for [`apply_surface_commands`].
#[derive(Debug, Default)]
pub struct UiSurface {
    next_id: u64,
    queue: Vec<SurfaceCommand>,
}

impl UiSurface {
    fn allocate(&mut self) -> SurfaceId {
        let id = SurfaceId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn pending(&self) -> &[SurfaceCommand] {
        &self.queue
    }

    pub fn drain(&mut self) -> std::vec::Drain<'_, SurfaceCommand> {
        self.queue.drain(..)
    }
}

impl RenderSurface for UiSurface {
    type Mount = Option<Entity>;
    type Container = SurfaceId;
    type Element = SurfaceId;

    fn create_container(&mut self, mount: &Option<Entity>) -> SurfaceId {
        let id = self.allocate();
        self.queue.push(SurfaceCommand::CreateContainer { id, mount: *mount });
        id
    }

    fn create_element(&mut self, container: SurfaceId, visual: &BubbleVisual) -> SurfaceId {
        let id = self.allocate();
        self.queue.push(SurfaceCommand::CreateElement {
            id,
            container,
            visual: visual.clone(),
        });
        id
    }

    fn remove_element(&mut self, element: SurfaceId) {
        self.queue.push(SurfaceCommand::RemoveElement(element));
    }

    fn remove_all_elements(&mut self, container: SurfaceId) {
        self.queue.push(SurfaceCommand::RemoveAllElements(container));
    }

    fn remove_container(&mut self, container: SurfaceId) {
        self.queue.push(SurfaceCommand::RemoveContainer(container));
    }
}

/// Maps surface ids to the entities that represent them.
#[derive(Resource, Debug, Default)]
pub struct SurfaceEntities {
    /// Container id -> (mount, entity).
    containers: HashMap<SurfaceId, (Option<Entity>, Entity)>,
    /// Element id -> (owning container, entity).
    elements: HashMap<SurfaceId, (SurfaceId, Entity)>,
}

impl SurfaceEntities {
    pub fn container(&self, id: SurfaceId) -> Option<Entity> {
        self.containers.get(&id).map(|(_, entity)| *entity)
    }

    pub fn container_count(&self) -> usize {
        self.containers.len()
    }

    pub fn element(&self, id: SurfaceId) -> Option<Entity> {
        self.elements.get(&id).map(|(_, entity)| *entity)
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Forget every container on `mount` (and any reusing `id`) along with
    /// their elements. Returns the entities to despawn.
    fn prune_for(&mut self, id: SurfaceId, mount: Option<Entity>) -> Vec<Entity> {
        let mut stale = Vec::new();
        let mut dropped = Vec::new();
        self.containers.retain(|container, (container_mount, entity)| {
            if *container == id || *container_mount == mount {
                stale.push(*entity);
                dropped.push(*container);
                false
            } else {
                true
            }
        });
        self.elements.retain(|_, (owner, entity)| {
            if dropped.contains(owner) {
                stale.push(*entity);
                false
            } else {
                true
            }
        });
        stale
    }
}

/// Marker for the full-screen node bubbles live in.
#[derive(Component, Debug, Clone, Copy)]
pub struct BubblesContainer {
    pub mount: Option<Entity>,
}

// =============================================================================
// SYSTEMS
// =============================================================================

fn toggle_on_key(keys: Option<Res<ButtonInput<KeyCode>>>, mut bubbles: ResMut<BackgroundBubbles>) {
    let Some(keys) = keys else {
        return;
    };
    if !bubbles.0.config().toggle_key_enabled || !keys.just_pressed(KeyCode::KeyB) {
        return;
    }

    if bubbles.0.is_running() {
        bubbles.0.stop();
    } else {
        bubbles.0.start();
    }
    info!("Bubbles: {}", if bubbles.0.is_running() { "ON" } else { "OFF" });
}

fn handle_lifecycle(
    mut messages: MessageReader<BubbleLifecycle>,
    mut bubbles: ResMut<BackgroundBubbles>,
) {
    for message in messages.read() {
        match message {
            BubbleLifecycle::Start => bubbles.0.start(),
            BubbleLifecycle::Stop => bubbles.0.stop(),
            BubbleLifecycle::Destroy => bubbles.0.destroy(),
        }
    }
}

fn tick_bubbles(time: Res<Time>, mut bubbles: ResMut<BackgroundBubbles>) {
    bubbles.0.advance(time.delta());
}

/// Starting offset below the container, in percent of its height.
const START_PERCENT: f32 = -10.0;
/// Final offset, far enough up that the bubble has left the screen.
const END_PERCENT: f32 = 110.0;

/// Turn queued surface commands into entity spawns and despawns.
pub fn apply_surface_commands(
    mut commands: Commands,
    mut bubbles: ResMut<BackgroundBubbles>,
    mut entities: ResMut<SurfaceEntities>,
    existing: Query<(Entity, &BubblesContainer)>,
    font: Option<Res<BubbleFont>>,
) {
    let font = font.map(|font| font.0.clone()).unwrap_or_default();

    for command in bubbles.0.surface_mut().drain() {
        match command {
            SurfaceCommand::CreateContainer { id, mount } => {
                for entity in entities.prune_for(id, mount) {
                    commands.entity(entity).try_despawn();
                }
                for (entity, container) in &existing {
                    if container.mount == mount {
                        commands.entity(entity).try_despawn();
                    }
                }

                let mut container = commands.spawn((
                    Name::new("Bubbles Container"),
                    BubblesContainer { mount },
                    Node {
                        position_type: PositionType::Absolute,
                        width: Val::Percent(100.0),
                        height: Val::Percent(100.0),
                        overflow: Overflow::clip(),
                        ..default()
                    },
                    GlobalZIndex(-1),
                ));
                if let Some(parent) = mount {
                    container.insert(ChildOf(parent));
                }
                entities.containers.insert(id, (mount, container.id()));
            }
            SurfaceCommand::CreateElement {
                id,
                container,
                visual,
            } => {
                let Some(parent) = entities.container(container) else {
                    warn!("Bubble {:?} targets unknown container {:?}", id, container);
                    continue;
                };
                let entity = commands
                    .spawn((
                        Name::new(format!("Bubble {}", visual.content)),
                        FloatingBubble::new(visual.lifetime_secs),
                        Node {
                            position_type: PositionType::Absolute,
                            left: Val::Percent(visual.position),
                            bottom: Val::Percent(START_PERCENT),
                            padding: UiRect::axes(Val::Px(14.0), Val::Px(8.0)),
                            ..default()
                        },
                        BackgroundColor(palette::BUBBLE_BACKGROUND.with_alpha(0.0)),
                        Text::new(visual.content),
                        TextFont {
                            font: font.clone(),
                            font_size: 18.0,
                            ..default()
                        },
                        TextColor(palette::BUBBLE_TEXT.with_alpha(0.0)),
                        ChildOf(parent),
                    ))
                    .id();
                entities.elements.insert(id, (container, entity));
            }
            SurfaceCommand::RemoveElement(id) => {
                // The entity may already be gone, e.g. cleared by another system.
                if let Some((_, entity)) = entities.elements.remove(&id) {
                    commands.entity(entity).try_despawn();
                }
            }
            SurfaceCommand::RemoveAllElements(container) => {
                entities.elements.retain(|_, (owner, entity)| {
                    if *owner == container {
                        commands.entity(*entity).try_despawn();
                        false
                    } else {
                        true
                    }
                });
            }
            SurfaceCommand::RemoveContainer(container) => {
                entities.elements.retain(|_, (owner, _)| *owner != container);
                if let Some((_, entity)) = entities.containers.remove(&container) {
                    commands.entity(entity).try_despawn();
                }
            }
        }
    }
}

// =============================================================================
// FLOATING ANIMATION
// =============================================================================

/// A bubble rising through its container.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct FloatingBubble {
    pub elapsed: f32,
    pub lifetime: f32,
}

impl FloatingBubble {
    pub fn new(lifetime: f32) -> Self {
        Self {
            elapsed: 0.0,
            lifetime,
        }
    }

    pub fn progress(&self) -> f32 {
        if self.lifetime <= 0.0 {
            return 1.0;
        }
        (self.elapsed / self.lifetime).clamp(0.0, 1.0)
    }
}

/// Vertical offset (percent of container height) at `progress`. Linear.
pub fn rise_at(progress: f32) -> f32 {
    START_PERCENT + (END_PERCENT - START_PERCENT) * progress.clamp(0.0, 1.0)
}

/// Fade in over the first 10%, hold, fade out over the last 20%.
pub fn opacity_at(progress: f32) -> f32 {
    const FADE_IN_END: f32 = 0.1;
    const FADE_OUT_START: f32 = 0.8;
    const PEAK: f32 = 0.85;

    let progress = progress.clamp(0.0, 1.0);
    if progress < FADE_IN_END {
        PEAK * progress / FADE_IN_END
    } else if progress > FADE_OUT_START {
        PEAK * (1.0 - (progress - FADE_OUT_START) / (1.0 - FADE_OUT_START))
    } else {
        PEAK
    }
}

/// Float bubbles upward and fade them. Removal is up to the scheduler.
fn animate_floating_bubbles(
    time: Res<Time>,
    mut query: Query<(
        &mut FloatingBubble,
        &mut Node,
        &mut TextColor,
        &mut BackgroundColor,
    )>,
) {
    for (mut bubble, mut node, mut text_color, mut background) in &mut query {
        bubble.elapsed += time.delta_secs();
        let progress = bubble.progress();

        node.bottom = Val::Percent(rise_at(progress));
        let alpha = opacity_at(progress);
        text_color.0 = palette::BUBBLE_TEXT.with_alpha(alpha);
        background.0 = palette::BUBBLE_BACKGROUND.with_alpha(alpha * 0.6);
    }
}
