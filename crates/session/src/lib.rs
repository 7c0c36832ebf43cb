//! Edit sessions: the in-memory state between loading a record and writing
//! it back. Each session owns its own flat field set and is discarded on
//! close; nothing is shared between sessions. Saves validate first, then
//! issue a single parameterized statement, so a failed save leaves both the
//! database and the session untouched.

pub mod animal;
pub mod character;
pub mod error;
pub mod product;

pub use animal::AnimalSession;
pub use character::{CharacterSession, SafeCoordMap};
pub use error::SessionError;
pub use product::ProductSession;
