//! Applies positional audio snapshots from the game to the voice client's 3D mixer.

use tessumod_protocol::{ClientId, PositionalAudioData, Vector3};
use tracing::{debug, info};

use crate::failure::{Failure, FailureCode};

/// The voice client's 3D audio surface.
pub trait AudioBackend {
    /// Whether the voice client currently has a server connection.
    fn is_connected(&self) -> bool;

    fn set_listener(&mut self, position: Vector3, forward: Vector3, up: Vector3) -> Result<(), Failure>;

    fn set_client_position(&mut self, id: ClientId, position: Vector3) -> Result<(), Failure>;

    fn clear_client_position(&mut self, id: ClientId) -> Result<(), Failure>;

    fn play_test_sound(&mut self, position: Vector3) -> Result<(), Failure>;
}

/// What a call to [`PositionalAudio::apply`] pushed to the backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplySummary {
    pub listener_updated: bool,
    pub clients_updated: usize,
    pub clients_cleared: usize,
}

impl ApplySummary {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.listener_updated && self.clients_updated == 0 && self.clients_cleared == 0
    }
}

/// Tracks the last applied snapshot so only changes reach the backend.
pub struct PositionalAudio<B> {
    backend: B,
    current: Option<PositionalAudioData>,
    test_sound_playing: bool,
}

impl<B: AudioBackend> PositionalAudio<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            current: None,
            test_sound_playing: false,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// The last snapshot that was applied successfully.
    pub fn current(&self) -> Option<&PositionalAudioData> {
        self.current.as_ref()
    }

    pub fn is_test_sound_playing(&self) -> bool {
        self.test_sound_playing
    }

    /// Push the differences between `data` and the previous snapshot to the backend.
    ///
    /// # Errors
    /// [`FailureCode::NotConnectedToServer`] when the backend has no connection, or
    /// whatever the backend reports. On error the previous snapshot is kept, so the
    /// next call retries the full difference.
    pub fn apply(&mut self, data: PositionalAudioData) -> Result<ApplySummary, Failure> {
        self.ensure_connected()?;

        let mut summary = ApplySummary::default();
        let previous = self.current.as_ref();

        let camera_moved = previous.map_or(true, |p| {
            p.camera_position != data.camera_position || p.camera_direction != data.camera_direction
        });
        if camera_moved {
            self.backend
                .set_listener(data.camera_position, data.camera_direction, Vector3::UP)?;
            summary.listener_updated = true;
        }

        for (id, position) in &data.client_positions {
            let known = previous.and_then(|p| p.client_positions.get(id));
            if known != Some(position) {
                self.backend.set_client_position(*id, *position)?;
                summary.clients_updated += 1;
            }
        }

        if let Some(previous) = previous {
            for id in previous.client_positions.keys() {
                if !data.client_positions.contains_key(id) {
                    self.backend.clear_client_position(*id)?;
                    summary.clients_cleared += 1;
                }
            }
        }

        if !summary.is_empty() {
            debug!("Applied positional audio: {:?}", summary);
        }
        self.current = Some(data);
        Ok(summary)
    }

    /// Clear every known client position and forget the current snapshot.
    ///
    /// # Errors
    /// Returns the first failure reported by the backend.
    pub fn reset(&mut self) -> Result<(), Failure> {
        if let Some(current) = self.current.take() {
            info!("Resetting {} client positions", current.client_positions.len());
            for id in current.client_positions.keys() {
                self.backend.clear_client_position(*id)?;
            }
        }
        Ok(())
    }

    /// Play the positional test sound at `position`.
    ///
    /// # Errors
    /// [`FailureCode::NotConnectedToServer`] without a connection,
    /// [`FailureCode::TestSoundInProgress`] while another test sound plays.
    pub fn start_test_sound(&mut self, position: Vector3) -> Result<(), Failure> {
        self.ensure_connected()?;
        if self.test_sound_playing {
            return Err(Failure::new(FailureCode::TestSoundInProgress));
        }
        self.backend.play_test_sound(position)?;
        self.test_sound_playing = true;
        info!("Playing test sound at {}", position);
        Ok(())
    }

    /// Mark the running test sound as finished.
    pub fn finish_test_sound(&mut self) {
        self.test_sound_playing = false;
    }

    fn ensure_connected(&self) -> Result<(), Failure> {
        if self.backend.is_connected() {
            Ok(())
        } else {
            Err(Failure::new(FailureCode::NotConnectedToServer))
        }
    }
}
