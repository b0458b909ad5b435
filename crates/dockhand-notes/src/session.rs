//! The annotation session: one prompt, one capture, one note per contact.

use std::path::Path;

use tracing::{info, warn};

use crate::contacts;
use crate::error::{NotesError, Result};
use crate::speech::{PromptSpeaker, Transcriber};

/// Counters for one completed session.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    /// Contacts the session prompted for.
    pub prompted: usize,
    /// Notes written to disk.
    pub written: usize,
    /// Contacts skipped because their capture failed.
    pub skipped: usize,
}

/// File name for a contact's note. Spaces become underscores so the
/// note names stay shell-friendly.
fn note_file_name(display_name: &str) -> String {
    format!("{}.txt", display_name.replace(' ', "_"))
}

fn prompt_for(display_name: &str) -> String {
    format!("Tell me something about {display_name}.")
}

/// Walk every contact in the export: speak the prompt, capture one
/// utterance, write the transcript as that contact's note.
///
/// A contact whose capture comes back unintelligible, or whose speech
/// request fails, is logged and skipped; the session moves on to the next
/// contact. Local tool breakage and IO errors end the session, since they
/// would fail every remaining contact the same way.
pub async fn run_session(
    contacts_path: &Path,
    output_dir: &Path,
    speaker: &dyn PromptSpeaker,
    transcriber: &dyn Transcriber,
) -> Result<SessionSummary> {
    let connections = contacts::load_contacts(contacts_path)?;
    std::fs::create_dir_all(output_dir)?;

    info!(
        contacts = connections.len(),
        output_dir = %output_dir.display(),
        "starting annotation session"
    );

    let mut summary = SessionSummary::default();
    for connection in &connections {
        let name = connection.display_name();
        summary.prompted += 1;

        if let Err(err) = speaker.speak(&prompt_for(name)).await {
            match err {
                NotesError::SpeechRequest(reason) => {
                    warn!(contact = name, reason, "prompt could not be spoken, skipping");
                    summary.skipped += 1;
                    continue;
                }
                other => return Err(other),
            }
        }

        let transcript = match transcriber.next_utterance().await {
            Ok(transcript) => transcript,
            Err(NotesError::Unintelligible) => {
                warn!(contact = name, "could not make out any words, skipping");
                summary.skipped += 1;
                continue;
            }
            Err(NotesError::SpeechRequest(reason)) => {
                warn!(contact = name, reason, "speech service failed, skipping");
                summary.skipped += 1;
                continue;
            }
            Err(other) => return Err(other),
        };

        let note_path = output_dir.join(note_file_name(name));
        std::fs::write(&note_path, &transcript)?;
        info!(contact = name, note = %note_path.display(), "note written");
        summary.written += 1;
    }

    info!(
        prompted = summary.prompted,
        written = summary.written,
        skipped = summary.skipped,
        "session finished"
    );
    Ok(summary)
}
