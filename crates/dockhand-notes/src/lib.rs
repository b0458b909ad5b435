//! Dockhand Notes - voice-prompted contact annotation
//!
//! Walks a contacts export, speaks a short prompt for each person,
//! captures one spoken utterance from the microphone, and stores the
//! transcript as that contact's note file.

pub mod audio;
pub mod contacts;
pub mod error;
pub mod session;
pub mod speech;

// Re-export key types
pub use audio::{AudioConfig, Player, Recorder};
pub use contacts::{display_names, load_contacts, Connection, ContactsFile, UNKNOWN_CONTACT};
pub use error::NotesError;
pub use session::{run_session, SessionSummary};
pub use speech::{
    MicrophoneTranscriber, PromptSpeaker, SpeechConfig, SttClient, Transcriber, TtsClient,
    VoicePrompt,
};
