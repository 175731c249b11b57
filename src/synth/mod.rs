// Purpose: monophonic note handling on top of the envelope engine
// The event side talks to a voice through a lock-free queue

#[cfg(feature = "rtrb")]
pub mod handle;
pub mod message;
pub mod voice;

#[cfg(feature = "rtrb")]
pub use handle::{HandleError, VoiceHandle};
pub use message::{MessageReceiver, VoiceMessage};
pub use voice::MonoVoice;
