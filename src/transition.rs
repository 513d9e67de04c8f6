use crate::model::Category;
use log::{debug, info};
use std::time::{Duration, Instant};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(100);
/// Shared by scroll- and wheel-driven switches.
pub const DEFAULT_ANIMATION_WINDOW: Duration = Duration::from_millis(500);
/// Sub-pixel slack when deciding whether a container is scrolled to its end.
const BOTTOM_TOLERANCE: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    Top,
    Bottom,
}

/// Where the incoming category's grid slides in from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    FromTop,
    FromBottom,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollMetrics {
    pub offset: f32,
    pub content_extent: f32,
    pub viewport_extent: f32,
}

impl ScrollMetrics {
    pub fn is_at_top(&self) -> bool {
        self.offset <= 0.0
    }

    /// Content shorter than the viewport counts as scrolled to the bottom.
    pub fn is_at_bottom(&self) -> bool {
        let extent = self.content_extent.max(self.viewport_extent);
        (extent - self.viewport_extent - self.offset).abs() < BOTTOM_TOLERANCE
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WheelDisposition {
    Pass,
    /// The wheel points past a boundary; the host should swallow its native scroll.
    Suppress,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionState {
    Idle,
    PendingDebounce {
        boundary: Boundary,
        deadline: Instant,
    },
    Transitioning {
        direction: Direction,
        started: Instant,
        until: Instant,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub target: String,
    pub direction: Direction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionConfig {
    pub enabled: bool,
    pub debounce: Duration,
    pub animation_window: Duration,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            debounce: DEFAULT_DEBOUNCE,
            animation_window: DEFAULT_ANIMATION_WINDOW,
        }
    }
}

struct CategoryLink {
    categories: Vec<Category>,
    on_change: Box<dyn FnMut(&str)>,
}

/// Turns scroll and wheel intent at the edge of a category's grid into a switch to the
/// neighbouring category.
///
/// Time only moves when the caller passes an `Instant`: qualifying events re-arm a debounce
/// deadline, and [`BoundaryController::poll`] fires it once it has passed untouched. While a
/// switch is animating every new event is ignored.
pub struct BoundaryController {
    config: TransitionConfig,
    state: TransitionState,
    link: Option<CategoryLink>,
}

impl BoundaryController {
    pub fn new(config: TransitionConfig) -> Self {
        Self {
            config,
            state: TransitionState::Idle,
            link: None,
        }
    }

    pub fn config(&self) -> TransitionConfig {
        self.config
    }

    pub fn configure(&mut self, config: TransitionConfig) {
        if self.config != config {
            self.cancel();
            self.config = config;
        }
    }

    /// Supplies the category ordering and the switch callback. Rebinding drops any pending
    /// debounce so it cannot fire against the old ordering.
    pub fn bind(&mut self, categories: Vec<Category>, on_change: impl FnMut(&str) + 'static) {
        self.cancel();
        self.link = Some(CategoryLink {
            categories,
            on_change: Box::new(on_change),
        });
    }

    pub fn unbind(&mut self) {
        self.cancel();
        self.link = None;
    }

    pub fn categories(&self) -> &[Category] {
        self.link
            .as_ref()
            .map(|link| link.categories.as_slice())
            .unwrap_or(&[])
    }

    /// Clears a pending debounce. An animation already running is left to finish.
    pub fn cancel(&mut self) {
        if matches!(self.state, TransitionState::PendingDebounce { .. }) {
            debug!("pending category switch cancelled");
            self.state = TransitionState::Idle;
        }
    }

    pub fn state(&self) -> &TransitionState {
        &self.state
    }

    pub fn is_busy(&self) -> bool {
        self.state != TransitionState::Idle
    }

    fn ready(&self) -> bool {
        self.config.enabled && self.link.is_some()
    }

    /// A scroll landed somewhere; returns true when it armed the debounce.
    pub fn on_scroll(&mut self, now: Instant, metrics: Option<ScrollMetrics>) -> bool {
        let Some(metrics) = metrics else {
            return false;
        };
        if !self.ready() {
            return false;
        }
        let boundary = if metrics.is_at_top() {
            Boundary::Top
        } else if metrics.is_at_bottom() {
            Boundary::Bottom
        } else {
            return false;
        };
        self.arm(now, boundary)
    }

    /// `delta_y` is positive when the wheel scrolls content down (towards the bottom).
    pub fn on_wheel(
        &mut self,
        now: Instant,
        metrics: Option<ScrollMetrics>,
        delta_y: f32,
    ) -> WheelDisposition {
        let Some(metrics) = metrics else {
            return WheelDisposition::Pass;
        };
        if !self.ready() {
            return WheelDisposition::Pass;
        }
        let boundary = if metrics.is_at_top() && delta_y < 0.0 {
            Boundary::Top
        } else if metrics.is_at_bottom() && delta_y > 0.0 {
            Boundary::Bottom
        } else {
            return WheelDisposition::Pass;
        };
        self.arm(now, boundary);
        WheelDisposition::Suppress
    }

    fn arm(&mut self, now: Instant, boundary: Boundary) -> bool {
        if matches!(self.state, TransitionState::Transitioning { .. }) {
            return false;
        }
        self.state = TransitionState::PendingDebounce {
            boundary,
            deadline: now + self.config.debounce,
        };
        true
    }

    /// Advances deadlines. Returns the switch that was requested, if the debounce fired and
    /// a neighbouring category exists.
    pub fn poll(&mut self, now: Instant, active_category: &str) -> Option<Transition> {
        match self.state {
            TransitionState::Idle => None,
            TransitionState::Transitioning { until, .. } => {
                if now >= until {
                    self.state = TransitionState::Idle;
                }
                None
            }
            TransitionState::PendingDebounce { boundary, deadline } => {
                if now < deadline {
                    return None;
                }
                self.state = TransitionState::Idle;
                self.fire(now, boundary, active_category)
            }
        }
    }

    fn fire(&mut self, now: Instant, boundary: Boundary, active: &str) -> Option<Transition> {
        if !self.ready() {
            return None;
        }
        let window = self.config.animation_window;
        let link = self.link.as_mut()?;
        let Some(index) = link.categories.iter().position(|c| c.id == active) else {
            debug!("active category {active} is not in the ordering");
            return None;
        };

        let (target, direction) = match boundary {
            Boundary::Top if index > 0 => (index - 1, Direction::FromTop),
            Boundary::Bottom if index + 1 < link.categories.len() => {
                (index + 1, Direction::FromBottom)
            }
            _ => {
                debug!("{active} is already the {boundary:?} category");
                return None;
            }
        };

        let target = link.categories[target].id.clone();
        self.state = TransitionState::Transitioning {
            direction,
            started: now,
            until: now + window,
        };
        info!("switching category {active} -> {target} ({direction:?})");
        (link.on_change)(&target);
        Some(Transition { target, direction })
    }

    pub fn direction(&self) -> Option<Direction> {
        match self.state {
            TransitionState::Transitioning { direction, .. } => Some(direction),
            _ => None,
        }
    }

    /// Entry animation direction and progress in `0.0..=1.0`.
    pub fn entry_progress(&self, now: Instant) -> Option<(Direction, f32)> {
        let TransitionState::Transitioning {
            direction,
            started,
            until,
        } = self.state
        else {
            return None;
        };
        let total = until.saturating_duration_since(started).as_secs_f32();
        if total <= 0.0 {
            return Some((direction, 1.0));
        }
        let elapsed = now.saturating_duration_since(started).as_secs_f32();
        Some((direction, (elapsed / total).clamp(0.0, 1.0)))
    }
}
