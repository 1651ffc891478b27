use std::io;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::JoinHandle;
use std::time::Duration;

use super::channel::AudioChannel;
use super::thread::spawn_channel_thread;
use super::types::{ChannelCmd, ChannelError, ChannelEvent, PendingStart};

/// `AudioChannel` backed by a dedicated `rodio` audio thread.
pub struct RodioChannel {
    tx: Sender<ChannelCmd>,
    events: Receiver<ChannelEvent>,
    join: Option<JoinHandle<()>>,
}

impl RodioChannel {
    /// Spawn the audio thread. `name` labels the thread and its log lines.
    pub fn spawn(
        name: &str,
        media_root: Option<PathBuf>,
        telemetry_interval: Duration,
    ) -> io::Result<Self> {
        let (tx, rx) = mpsc::channel::<ChannelCmd>();
        let (events_tx, events) = mpsc::channel::<ChannelEvent>();
        let join = spawn_channel_thread(name, media_root, rx, events_tx, telemetry_interval)?;

        Ok(Self {
            tx,
            events,
            join: Some(join),
        })
    }

    fn send(&self, cmd: ChannelCmd) {
        let _ = self.tx.send(cmd);
    }
}

impl AudioChannel for RodioChannel {
    fn load(&mut self, locator: &str) {
        self.send(ChannelCmd::Load(locator.to_string()));
    }

    fn play(&mut self) -> PendingStart {
        let (resolver, pending) = PendingStart::new();
        if let Err(mpsc::SendError(ChannelCmd::Play(resolver))) =
            self.tx.send(ChannelCmd::Play(resolver))
        {
            resolver.resolve(Err(ChannelError::OutputUnavailable(
                "audio thread is gone".to_string(),
            )));
        }
        pending
    }

    fn pause(&mut self) {
        self.send(ChannelCmd::Pause);
    }

    fn seek(&mut self, position: Duration) {
        self.send(ChannelCmd::Seek(position));
    }

    fn set_volume(&mut self, level: f32) {
        self.send(ChannelCmd::SetVolume(level));
    }

    fn set_looping(&mut self, looping: bool) {
        self.send(ChannelCmd::SetLooping(looping));
    }

    fn next_event(&mut self) -> Option<ChannelEvent> {
        self.events.try_recv().ok()
    }

    fn close(&mut self, fade_out: Duration) {
        self.send(ChannelCmd::Close {
            fade_out_ms: fade_out.as_millis() as u64,
        });

        if let Some(h) = self.join.take() {
            let _ = h.join();
        }
    }
}

impl Drop for RodioChannel {
    fn drop(&mut self) {
        if self.join.is_some() {
            self.close(Duration::ZERO);
        }
    }
}
