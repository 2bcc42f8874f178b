//! Hide arbitrary bytes in legal chess games.
//!
//! The payload becomes one large integer, read out as a mixed-radix numeral
//! whose radix at each step is the number of candidate moves in the current
//! position. Each digit picks a move from the canonically ordered candidate
//! list, so the resulting game decodes back to the exact payload given the
//! same start position and filter configuration.
//!
//! ```no_run
//! use stegachess::{GameAssembler, StegoConfig};
//!
//! let assembler = GameAssembler::new(StegoConfig::default())?;
//! let game = assembler.encode(b"attack at dawn")?;
//! println!("{}", game.movetext());
//! assert_eq!(assembler.decode(&game)?, b"attack at dawn");
//! # Ok::<(), stegachess::StegoError>(())
//! ```

pub mod codec;
pub mod config;
pub mod error;
pub mod eval;
pub mod filter;
pub mod game;
pub mod moves;
pub mod notation;
pub mod oracle;
pub mod search;
pub mod types;

pub use codec::{Framing, PayloadInteger};
pub use config::{
    BranchingMeasure, EngineSpec, EntropyConfig, EntropyMode, ForcedMovePolicy, QualityConfig,
    StegoConfig,
};
pub use error::{EngineError, NotationError, Result, StegoError};
pub use filter::FilterPipeline;
pub use game::{decode, encode, GameAssembler, MoveSequence};
pub use moves::{Candidate, CandidateList, MoveEnumerator};
pub use types::Position;
