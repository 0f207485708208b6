//! [`GameSession`] – the explicit context of one play session.
//!
//! Owns every piece of mutable game state: the cursor, the grab machine, the
//! collectible registry, the scoreboard and the RNG used for placement.  The
//! frame loop holds one session and drives it through
//! `start → tick* → tick_second* → (end | expiry) → start …`.
//!
//! # Example
//!
//! ```rust
//! use pinchclaw_kernel::session::{GameSession, SessionConfig};
//! use pinchclaw_types::{GameStatus, HandSignal};
//!
//! let mut session = GameSession::new(SessionConfig::default()).unwrap().with_seed(42);
//! session.start("ada");
//! assert_eq!(session.status(), GameStatus::Playing);
//!
//! session.tick(&HandSignal::NEUTRAL);
//! let snap = session.snapshot();
//! assert_eq!(snap.score, 0);
//! assert!(snap.held.is_none());
//! ```

use pinchclaw_hal::cursor::CursorMapper;
use pinchclaw_types::{
    ClawError, ClawTuning, Collectible, DepositTarget, GameStatus, GrabEvent, HandSignal,
    PlayFieldBounds, SessionId, Vec3,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::grab::{GrabConfig, GrabStateMachine};
use crate::registry::{CollectibleRegistry, PopulationPlan};
use crate::score::{Scoreboard, SessionRules};

/// Static parameters of a session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub tuning: ClawTuning,
    pub bounds: PlayFieldBounds,
    pub deposit: DepositTarget,
    pub population: PopulationPlan,
    pub rules: SessionRules,
    pub points_per_deposit: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            tuning: ClawTuning::default(),
            bounds: PlayFieldBounds::default(),
            deposit: DepositTarget::default(),
            population: PopulationPlan::default(),
            rules: SessionRules::default(),
            points_per_deposit: 100,
        }
    }
}

/// Everything a renderer needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub session_id: Option<SessionId>,
    pub player: String,
    pub status: GameStatus,
    pub score: u32,
    pub time_left: u32,
    pub claw: Vec3,
    pub reticle: Vec3,
    pub pinching: bool,
    /// Collectibles resting on the floor (the held one excluded).
    pub floor: Vec<Collectible>,
    /// The held collectible, positioned at the grip point.
    pub held: Option<Collectible>,
}

/// One player's run of the claw machine.
pub struct GameSession {
    id: Option<SessionId>,
    player: String,
    config: SessionConfig,
    cursor: CursorMapper,
    grab: GrabStateMachine,
    registry: CollectibleRegistry,
    scoreboard: Scoreboard,
    rng: StdRng,
    last_signal: HandSignal,
}

impl GameSession {
    /// Build an idle session.
    ///
    /// # Errors
    ///
    /// Returns [`ClawError::InvalidTuning`] when `config.tuning` or
    /// `config.population` fails validation.
    pub fn new(config: SessionConfig) -> Result<Self, ClawError> {
        config.tuning.validate()?;
        config.population.validate()?;
        let mut grab_config = GrabConfig::from_tuning(&config.tuning, config.deposit);
        grab_config.points_per_deposit = config.points_per_deposit;

        Ok(Self {
            id: None,
            player: String::new(),
            cursor: CursorMapper::new(config.bounds, &config.tuning),
            grab: GrabStateMachine::new(grab_config),
            registry: CollectibleRegistry::new(),
            scoreboard: Scoreboard::new(config.rules),
            rng: StdRng::from_entropy(),
            last_signal: HandSignal::NEUTRAL,
            config,
        })
    }

    /// Use a fixed placement seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Begin a session with a freshly sampled layout.
    pub fn start(&mut self, player: &str) -> SessionId {
        self.prepare(player);
        let placed = self
            .registry
            .populate(&mut self.rng, &self.config.population, &self.config.deposit);
        if placed < self.config.population.count {
            debug!(placed, requested = self.config.population.count, "under-populated layout");
        }
        self.begin()
    }

    /// Begin a session with a caller-provided layout.
    ///
    /// # Errors
    ///
    /// Returns [`ClawError::DuplicateCollectible`] when two collectibles share
    /// an id.  The session is left in [`GameStatus::Start`] in that case.
    pub fn start_with_layout(
        &mut self,
        player: &str,
        layout: Vec<Collectible>,
    ) -> Result<SessionId, ClawError> {
        self.prepare(player);
        for c in layout {
            if let Err(e) = self.registry.insert(c) {
                self.registry.clear();
                return Err(e);
            }
        }
        Ok(self.begin())
    }

    fn prepare(&mut self, player: &str) {
        self.player = player.trim().to_string();
        self.registry.clear();
        self.grab.clear();
        self.cursor.reset();
        self.scoreboard.reset();
        self.last_signal = HandSignal::NEUTRAL;
    }

    fn begin(&mut self) -> SessionId {
        let id = Uuid::new_v4();
        self.id = Some(id);
        self.scoreboard.start();
        info!(
            session = %id,
            player = %self.player,
            collectibles = self.registry.len(),
            seconds = self.scoreboard.time_left(),
            "session started"
        );
        id
    }

    /// One frame: move the claw, then evaluate grab/release.
    ///
    /// Ignored unless the session is [`GameStatus::Playing`].
    pub fn tick(&mut self, signal: &HandSignal) -> Option<GrabEvent> {
        if !self.scoreboard.is_playing() {
            return None;
        }
        let signal = signal.gated();
        self.last_signal = signal;
        let claw = self.cursor.update(&signal);
        self.grab
            .step(claw, signal.is_pinching, &mut self.registry, &mut self.scoreboard)
    }

    /// One second of countdown.  Returns the final status when the clock ran
    /// out on this call.
    pub fn tick_second(&mut self) -> Option<GameStatus> {
        let finished = self.scoreboard.tick_second();
        if finished.is_some() {
            self.grab.clear();
        }
        finished
    }

    /// Finish now.  The held collectible (if any) stays where it was last
    /// resting in the registry.
    pub fn end(&mut self) -> GameStatus {
        self.grab.clear();
        self.scoreboard.finish()
    }

    /// Back to the pre-game state with an empty play field.
    pub fn reset(&mut self) {
        self.id = None;
        self.registry.clear();
        self.grab.clear();
        self.cursor.reset();
        self.scoreboard.reset();
        self.last_signal = HandSignal::NEUTRAL;
    }

    /// Flip horizontal inversion.  Returns the new setting.
    pub fn toggle_invert(&mut self) -> bool {
        let invert = !self.cursor.invert_horizontal();
        self.cursor.set_invert_horizontal(invert);
        self.config.tuning.invert_horizontal = invert;
        info!(invert, "horizontal inversion toggled");
        invert
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let held_id = self.grab.held();
        let claw = self.cursor.position();
        let grip = self.grab.grip_point(claw);

        let floor = self
            .registry
            .iter()
            .filter(|c| Some(c.id) != held_id)
            .copied()
            .collect();
        let held = held_id
            .and_then(|id| self.registry.get(id))
            .map(|c| Collectible {
                position: grip,
                ..*c
            });

        SessionSnapshot {
            session_id: self.id,
            player: self.player.clone(),
            status: self.scoreboard.status(),
            score: self.scoreboard.score(),
            time_left: self.scoreboard.time_left(),
            claw,
            reticle: self.cursor.reticle(),
            pinching: self.last_signal.is_pinching,
            floor,
            held,
        }
    }

    pub fn id(&self) -> Option<SessionId> {
        self.id
    }

    pub fn player(&self) -> &str {
        &self.player
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn status(&self) -> GameStatus {
        self.scoreboard.status()
    }

    pub fn score(&self) -> u32 {
        self.scoreboard.score()
    }

    pub fn time_left(&self) -> u32 {
        self.scoreboard.time_left()
    }

    pub fn claw_position(&self) -> Vec3 {
        self.cursor.position()
    }

    pub fn grab(&self) -> &GrabStateMachine {
        &self.grab
    }

    pub fn registry(&self) -> &CollectibleRegistry {
        &self.registry
    }
}
