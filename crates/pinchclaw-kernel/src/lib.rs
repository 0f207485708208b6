//! `pinchclaw-kernel` – grab logic and session state.
//!
//! The only stateful decision point of the game.  It does not look at
//! landmarks or draw anything; it decides, once per frame, what the claw is
//! holding and what that is worth.
//!
//! # Modules
//!
//! - [`registry`] – [`CollectibleRegistry`][registry::CollectibleRegistry]:
//!   the live set of collectibles, populated by bounded rejection sampling.
//! - [`grab`] – [`GrabStateMachine`][grab::GrabStateMachine]: the
//!   `Empty`/`Holding` machine that picks the nearest eligible collectible on
//!   pinch and drops or deposits it on release.
//! - [`score`] – [`ScoreSink`][score::ScoreSink] and
//!   [`Scoreboard`][score::Scoreboard]: point accumulation, countdown and the
//!   win/lose decision.
//! - [`session`] – [`GameSession`][session::GameSession]: the explicit session
//!   context owning the cursor, grab machine, registry and scoreboard, with
//!   the start/tick/end lifecycle.

pub mod grab;
pub mod registry;
pub mod score;
pub mod session;

pub use grab::{GrabConfig, GrabState, GrabStateMachine};
pub use registry::{CollectibleRegistry, PopulationPlan};
pub use score::{ScoreSink, Scoreboard, SessionRules};
pub use session::{GameSession, SessionConfig, SessionSnapshot};
