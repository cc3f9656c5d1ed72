//! PBFT consensus state machine: a static-primary, N=4/f=1 three-phase
//! protocol that agrees on the merkle root of a candidate block, then
//! executes and persists it once COMMIT quorum is reached.

pub mod broadcast;
pub mod error;
pub mod message;
pub mod pbft;
pub mod state;

pub use broadcast::{Broadcaster, NullBroadcaster};
pub use error::{ConsensusError, Result};
pub use message::ConsensusMessage;
pub use pbft::{Pbft, QUORUM};
pub use state::{Action, HeightState, Phase};
