use std::io;
use std::path::PathBuf;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::thread::JoinHandle;
use std::time::Duration;

use rodio::{OutputStream, OutputStreamBuilder, Sink};
use tracing::{debug, warn};

use super::sink::{create_sink_at, probe_duration, resolve_locator};
use super::types::{ChannelCmd, ChannelError, ChannelEvent, StartResolver};

/// Spawn the thread that owns one output stream and at most one sink.
pub(super) fn spawn_channel_thread(
    name: &str,
    media_root: Option<PathBuf>,
    rx: Receiver<ChannelCmd>,
    events: Sender<ChannelEvent>,
    telemetry_interval: Duration,
) -> io::Result<JoinHandle<()>> {
    let label = name.to_string();
    thread::Builder::new()
        .name(format!("franco-audio-{name}"))
        .spawn(move || {
            let stream = match OutputStreamBuilder::open_default_stream() {
                Ok(mut stream) => {
                    // rodio logs to stderr when OutputStream is dropped. That's useful in
                    // debugging, but noisy for a TUI app.
                    stream.log_on_drop(false);
                    Ok(stream)
                }
                Err(e) => {
                    warn!(channel = %label, error = %e, "no audio output, every start will be rejected");
                    Err(e.to_string())
                }
            };

            let mut worker = ChannelWorker {
                label,
                stream,
                media_root,
                events,
                path: None,
                sink: None,
                playing: false,
                looping: false,
                volume: 1.0,
                start_at: Duration::ZERO,
                duration: None,
            };
            worker.run(rx, telemetry_interval);
        })
}

struct ChannelWorker {
    label: String,
    stream: Result<OutputStream, String>,
    media_root: Option<PathBuf>,
    events: Sender<ChannelEvent>,

    path: Option<PathBuf>,
    sink: Option<Sink>,
    playing: bool,
    looping: bool,
    volume: f32,
    // Position to start from when the sink is (re)built.
    start_at: Duration,
    duration: Option<Duration>,
}

impl ChannelWorker {
    fn run(&mut self, rx: Receiver<ChannelCmd>, telemetry_interval: Duration) {
        loop {
            match rx.recv_timeout(telemetry_interval) {
                Ok(ChannelCmd::Close { fade_out_ms }) => {
                    self.close(fade_out_ms);
                    break;
                }
                Ok(cmd) => self.handle(cmd),
                Err(RecvTimeoutError::Timeout) => self.tick(),
                Err(RecvTimeoutError::Disconnected) => {
                    self.close(0);
                    break;
                }
            }
        }
    }

    fn emit(&self, event: ChannelEvent) {
        let _ = self.events.send(event);
    }

    fn handle(&mut self, cmd: ChannelCmd) {
        match cmd {
            ChannelCmd::Load(locator) => self.load(&locator),
            ChannelCmd::Play(resolver) => self.play(resolver),
            ChannelCmd::Pause => {
                if let Some(sink) = self.sink.as_ref() {
                    if self.playing {
                        sink.pause();
                        self.playing = false;
                        self.emit(ChannelEvent::Paused);
                    }
                }
            }
            ChannelCmd::Seek(position) => self.seek(position),
            ChannelCmd::SetVolume(level) => {
                self.volume = level.clamp(0.0, 1.0);
                if let Some(sink) = self.sink.as_ref() {
                    sink.set_volume(self.volume);
                }
            }
            ChannelCmd::SetLooping(looping) => {
                // Applies from the next sink build.
                self.looping = looping;
            }
            ChannelCmd::Close { .. } => {}
        }
    }

    fn load(&mut self, locator: &str) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
        if self.playing {
            self.playing = false;
            self.emit(ChannelEvent::Paused);
        }

        let path = resolve_locator(self.media_root.as_deref(), locator);
        debug!(channel = %self.label, path = %path.display(), "source loaded");

        self.start_at = Duration::ZERO;
        self.duration = probe_duration(&path);
        self.path = Some(path);
        self.emit(ChannelEvent::TimeUpdate(Duration::ZERO));
        self.emit(ChannelEvent::DurationChange(self.duration));
    }

    fn play(&mut self, resolver: StartResolver) {
        let stream = match self.stream.as_ref() {
            Ok(stream) => stream,
            Err(reason) => {
                resolver.resolve(Err(ChannelError::OutputUnavailable(reason.clone())));
                return;
            }
        };

        if self.sink.is_none() {
            let Some(path) = self.path.as_ref() else {
                resolver.resolve(Err(ChannelError::StartRejected(
                    "no source loaded".to_string(),
                )));
                return;
            };
            match create_sink_at(stream, path, self.start_at, self.looping) {
                Ok(sink) => {
                    sink.set_volume(self.volume);
                    self.sink = Some(sink);
                }
                Err(e) => {
                    resolver.resolve(Err(e));
                    return;
                }
            }
        }

        if let Some(sink) = self.sink.as_ref() {
            if !self.playing {
                sink.play();
                self.playing = true;
                self.emit(ChannelEvent::Started);
            }
        }
        resolver.resolve(Ok(()));
    }

    fn seek(&mut self, position: Duration) {
        let target = match self.duration {
            Some(total) => position.min(total),
            None => position,
        };

        match self.sink.as_ref() {
            Some(sink) => match sink.try_seek(target) {
                Ok(()) => self.emit(ChannelEvent::TimeUpdate(target)),
                Err(e) => {
                    warn!(channel = %self.label, error = %e, "seek failed");
                    self.emit(ChannelEvent::TimeUpdate(sink.get_pos()));
                }
            },
            None => {
                self.start_at = target;
                self.emit(ChannelEvent::TimeUpdate(target));
            }
        }
    }

    /// Periodic telemetry and end-of-source detection.
    fn tick(&mut self) {
        if !self.playing {
            return;
        }
        let Some(sink) = self.sink.as_ref() else {
            return;
        };

        if sink.empty() {
            // Releasing the sink makes the next play restart from zero.
            self.sink = None;
            self.playing = false;
            self.start_at = Duration::ZERO;
            self.emit(ChannelEvent::Ended);
        } else {
            self.emit(ChannelEvent::TimeUpdate(sink.get_pos()));
        }
    }

    fn close(&mut self, fade_out_ms: u64) {
        if let Some(sink) = self.sink.take() {
            if self.playing {
                fade_out_sink(&sink, self.volume, fade_out_ms);
            }
            sink.stop();
        }
        self.playing = false;
    }
}

fn fade_out_sink(sink: &Sink, from: f32, fade_out_ms: u64) {
    if fade_out_ms == 0 {
        sink.set_volume(0.0);
        return;
    }
    let steps: u64 = 20;
    let step_ms = (fade_out_ms / steps).max(1);
    for step in 1..=steps {
        let t = step as f32 / steps as f32;
        sink.set_volume(from * (1.0 - t));
        thread::sleep(Duration::from_millis(step_ms));
    }
    sink.set_volume(0.0);
}
