use tessumod_plugin::{AudioBackend, ClientId, Failure, Vector3};
use tracing::{debug, info};

/// Audio backend that only logs what it would push to the voice client.
pub struct TracingBackend {
    connected: bool,
}

impl TracingBackend {
    #[must_use]
    pub fn new() -> Self {
        Self { connected: true }
    }

    pub fn set_connected(&mut self, connected: bool) {
        self.connected = connected;
    }
}

impl Default for TracingBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioBackend for TracingBackend {
    fn is_connected(&self) -> bool {
        self.connected
    }

    fn set_listener(&mut self, position: Vector3, forward: Vector3, up: Vector3) -> Result<(), Failure> {
        debug!("Listener at {} facing {} (up {})", position, forward, up);
        Ok(())
    }

    fn set_client_position(&mut self, id: ClientId, position: Vector3) -> Result<(), Failure> {
        debug!("Client {} at {}", id, position);
        Ok(())
    }

    fn clear_client_position(&mut self, id: ClientId) -> Result<(), Failure> {
        debug!("Client {} position cleared", id);
        Ok(())
    }

    fn play_test_sound(&mut self, position: Vector3) -> Result<(), Failure> {
        info!("Test sound at {}", position);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessumod_plugin::{FailureCode, PositionalAudio, PositionalAudioData};

    fn snapshot() -> PositionalAudioData {
        PositionalAudioData::new(Vector3::ZERO, Vector3::new(0.0, 0.0, 1.0))
            .with_client(2, Vector3::new(1.0, 0.0, 0.0))
    }

    #[test]
    fn connected_backend_accepts_updates() {
        let mut audio = PositionalAudio::new(TracingBackend::new());

        let summary = audio.apply(snapshot()).unwrap();
        assert!(summary.listener_updated);
        assert_eq!(summary.clients_updated, 1);
        audio.start_test_sound(Vector3::UP).unwrap();
        audio.reset().unwrap();
    }

    #[test]
    fn disconnected_backend_refuses_updates() {
        let mut backend = TracingBackend::default();
        backend.set_connected(false);
        let mut audio = PositionalAudio::new(backend);

        let err = audio.apply(snapshot()).unwrap_err();
        assert_eq!(err.code(), FailureCode::NotConnectedToServer);

        audio.backend_mut().set_connected(true);
        assert!(audio.apply(snapshot()).is_ok());
    }
}
