//! The bubble scheduler.
//!
//! Spawns a left/right pair of bubbles every few seconds, keeps live bubbles
//! from sharing content or crowding each other, and removes each bubble when
//! its lifetime ends. All state belongs to one scheduler instance; separate
//! instances never see each other's bubbles or timers.
//!
//! Time only moves through [`BubbleScheduler::advance`], so the same code runs
//! under the frame loop and under tests.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use rand::Rng;
use tracing::{debug, info, warn};

use super::{
    band::{Band, BandHint},
    clock::{Due, TaskClock, TaskId},
    config::BubbleConfig,
    sampling::{sample_separated, sample_unique},
    surface::{BubbleVisual, RenderSurface},
};

/// Identifies a bubble within one scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BubbleId(u64);

/// A bubble that is currently on screen.
#[derive(Debug, Clone)]
pub struct ActiveBubble<E> {
    pub id: BubbleId,
    pub content: String,
    pub position: f32,
    pub band: Band,
    pub lifetime_secs: f32,
    pub spawned_at: Duration,
    pub element: E,
}

/// Bookkeeping that mirrors the live bubbles.
///
/// Both collections are counted: once the retry budget runs out two bubbles
/// may share content or a position, and expiring one must not untrack the other.
#[derive(Debug, Default)]
struct SchedulerState {
    running: bool,
    used_contents: HashMap<String, usize>,
    used_positions: Vec<f32>,
    spawn_task: Option<TaskId>,
}

impl SchedulerState {
    fn track(&mut self, content: &str, position: f32) {
        *self.used_contents.entry(content.to_string()).or_default() += 1;
        self.used_positions.push(position);
    }

    fn release(&mut self, content: &str, position: f32) {
        if let Some(count) = self.used_contents.get_mut(content) {
            *count -= 1;
            if *count == 0 {
                self.used_contents.remove(content);
            }
        }
        if let Some(index) = self.used_positions.iter().position(|p| *p == position) {
            self.used_positions.swap_remove(index);
        }
    }

    fn clear(&mut self) {
        self.used_contents.clear();
        self.used_positions.clear();
    }
}

pub struct BubbleScheduler<S: RenderSurface, R> {
    surface: S,
    /// `None` once destroyed.
    container: Option<S::Container>,
    config: BubbleConfig,
    rng: R,
    clock: TaskClock<BubbleId>,
    state: SchedulerState,
    active: BTreeMap<BubbleId, ActiveBubble<S::Element>>,
    next_bubble: u64,
}

impl<S: RenderSurface, R: Rng> BubbleScheduler<S, R> {
    /// Create the bubble container on `mount` and, unless `config.autostart`
    /// is off, start spawning.
    pub fn new(mut surface: S, mount: S::Mount, config: BubbleConfig, rng: R) -> Self {
        let config = config.sanitized();
        let container = surface.create_container(&mount);
        let autostart = config.autostart;

        let mut scheduler = Self {
            surface,
            container: Some(container),
            config,
            rng,
            clock: TaskClock::new(),
            state: SchedulerState::default(),
            active: BTreeMap::new(),
            next_bubble: 0,
        };
        if autostart {
            scheduler.start();
        }
        scheduler
    }

    /// Mount on the surface root.
    pub fn with_root(surface: S, config: BubbleConfig, rng: R) -> Self {
        Self::new(surface, S::Mount::default(), config, rng)
    }

    /// Begin the spawn loop. Does nothing if already running.
    pub fn start(&mut self) {
        if self.state.running {
            return;
        }
        if self.container.is_none() {
            warn!("Ignoring start on a destroyed bubble scheduler");
            return;
        }

        self.state.running = true;
        let first = self.draw_interval();
        self.state.spawn_task = Some(self.clock.schedule_repeating(first));
        info!("Bubble spawning started, first pair in {:?}", first);
    }

    /// Cancel the spawn loop and every pending cleanup, then clear the screen.
    ///
    /// Nothing scheduled before this call fires afterwards.
    pub fn stop(&mut self) {
        self.state.running = false;
        if self.state.spawn_task.take().is_some() {
            self.clock.cancel_repeating();
        }
        let cancelled = self.clock.cancel_all_once();
        self.active.clear();

        if let Some(container) = self.container {
            self.surface.remove_all_elements(container);
        }
        self.state.clear();
        info!("Bubble spawning stopped ({} pending cleanups cancelled)", cancelled);
    }

    /// Stop and remove the container. The scheduler is inert afterwards.
    pub fn destroy(&mut self) {
        self.stop();
        if let Some(container) = self.container.take() {
            self.surface.remove_container(container);
            info!("Bubble container removed");
        }
    }

    /// Advance the clock by `dt`, firing spawns and cleanups in time order.
    pub fn advance(&mut self, dt: Duration) {
        let until = self.clock.now() + dt;
        while let Some(due) = self.clock.pop_due(until) {
            match due {
                Due::Repeating(task) => {
                    self.spawn_pair();
                    let next = self.draw_interval();
                    self.clock.rearm(task, next);
                }
                Due::Once(_, bubble) => self.expire(bubble),
            }
        }
        self.clock.settle(until);
    }

    /// Spawn one bubble in each band.
    pub fn spawn_pair(&mut self) {
        self.spawn_one(BandHint::Left);
        self.spawn_one(BandHint::Right);
    }

    /// Spawn a single bubble and schedule its cleanup.
    ///
    /// Returns `None` if the scheduler was destroyed.
    pub fn spawn_one(&mut self, hint: BandHint) -> Option<BubbleId> {
        let Some(container) = self.container else {
            warn!("Ignoring spawn on a destroyed bubble scheduler");
            return None;
        };

        let used = &self.state.used_contents;
        let content = sample_unique(
            &mut self.rng,
            &self.config.contents,
            |candidate| used.contains_key(candidate),
            self.config.max_attempts,
        )?
        .clone();

        let band = hint.resolve(&mut self.rng);
        let range = match band {
            Band::Left => self.config.left_band,
            Band::Right => self.config.right_band,
        };
        let position = sample_separated(
            &mut self.rng,
            range.as_range(),
            &self.state.used_positions,
            self.config.min_separation,
            self.config.max_attempts,
        );

        self.state.track(&content, position);

        let visual = BubbleVisual {
            content: content.clone(),
            position,
            lifetime_secs: self.config.lifetime_secs,
        };
        let element = self.surface.create_element(container, &visual);

        let id = BubbleId(self.next_bubble);
        self.next_bubble += 1;
        self.clock.schedule_once(self.config.lifetime(), id);

        debug!("Spawned bubble {:?} '{}' at {:.1}% ({:?})", id, content, position, band);

        self.active.insert(
            id,
            ActiveBubble {
                id,
                content,
                position,
                band,
                lifetime_secs: self.config.lifetime_secs,
                spawned_at: self.clock.now(),
                element,
            },
        );
        Some(id)
    }

    fn expire(&mut self, id: BubbleId) {
        let Some(bubble) = self.active.remove(&id) else {
            return;
        };
        self.surface.remove_element(bubble.element);
        self.state.release(&bubble.content, bubble.position);
        debug!("Bubble {:?} '{}' expired", id, bubble.content);
    }

    fn draw_interval(&mut self) -> Duration {
        let range = self.config.spawn_interval_ms;
        Duration::from_millis(self.rng.random_range(range.min..=range.max))
    }

    pub fn is_running(&self) -> bool {
        self.state.running
    }

    pub fn is_destroyed(&self) -> bool {
        self.container.is_none()
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn active_bubbles(&self) -> impl Iterator<Item = &ActiveBubble<S::Element>> {
        self.active.values()
    }

    pub fn is_content_used(&self, content: &str) -> bool {
        self.state.used_contents.contains_key(content)
    }

    /// How many live bubbles currently show `content`.
    pub fn content_uses(&self, content: &str) -> usize {
        self.state.used_contents.get(content).copied().unwrap_or(0)
    }

    /// Number of distinct contents on screen.
    pub fn used_content_count(&self) -> usize {
        self.state.used_contents.len()
    }

    pub fn used_positions(&self) -> &[f32] {
        &self.state.used_positions
    }

    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    /// Time until the next pair spawns, if the loop is running.
    pub fn next_spawn_in(&self) -> Option<Duration> {
        self.clock.repeating_due_in()
    }

    pub fn config(&self) -> &BubbleConfig {
        &self.config
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }
}
