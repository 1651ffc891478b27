//! Scriptable in-memory `AudioChannel` for controller tests.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use crate::audio::{AudioChannel, ChannelError, ChannelEvent, PendingStart, StartResolver};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Load(String),
    Play,
    Pause,
    Seek(Duration),
    SetVolume(f32),
    SetLooping(bool),
    Close,
}

/// How `play` settles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartMode {
    /// Settles successfully inside `play`.
    Immediate,
    /// Stays pending until `resolve_next`.
    Manual,
    /// Settles with `StartRejected` inside `play`.
    Reject,
}

#[derive(Debug)]
struct FakeState {
    mode: StartMode,
    calls: Vec<Call>,
    volume: f32,
    playing: bool,
    events: VecDeque<ChannelEvent>,
    resolvers: VecDeque<StartResolver>,
    paused_while_pending: bool,
}

/// Cloning shares the state, so a test keeps one clone as its handle.
#[derive(Debug, Clone)]
pub struct FakeChannel {
    state: Rc<RefCell<FakeState>>,
}

impl FakeChannel {
    pub fn new(mode: StartMode) -> Self {
        Self {
            state: Rc::new(RefCell::new(FakeState {
                mode,
                calls: Vec::new(),
                volume: 1.0,
                playing: false,
                events: VecDeque::new(),
                resolvers: VecDeque::new(),
                paused_while_pending: false,
            })),
        }
    }

    pub fn set_mode(&self, mode: StartMode) {
        self.state.borrow_mut().mode = mode;
    }

    pub fn push_event(&self, event: ChannelEvent) {
        if event == ChannelEvent::Ended {
            self.state.borrow_mut().playing = false;
        }
        self.state.borrow_mut().events.push_back(event);
    }

    /// Settle the oldest pending start.
    pub fn resolve_next(&self, result: Result<(), ChannelError>) {
        let mut s = self.state.borrow_mut();
        let resolver = s.resolvers.pop_front().expect("no pending start");
        if result.is_ok() && !s.playing {
            s.playing = true;
            s.events.push_back(ChannelEvent::Started);
        }
        resolver.resolve(result);
    }

    /// Settle the oldest pending start before any `Started` event is queued.
    pub fn resolve_next_without_event(&self) {
        let mut s = self.state.borrow_mut();
        let resolver = s.resolvers.pop_front().expect("no pending start");
        s.playing = true;
        resolver.resolve(Ok(()));
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.borrow().calls.clone()
    }

    pub fn count(&self, call: &Call) -> usize {
        self.state.borrow().calls.iter().filter(|c| *c == call).count()
    }

    pub fn volume(&self) -> f32 {
        self.state.borrow().volume
    }

    pub fn playing(&self) -> bool {
        self.state.borrow().playing
    }

    pub fn paused_while_pending(&self) -> bool {
        self.state.borrow().paused_while_pending
    }
}

impl AudioChannel for FakeChannel {
    fn load(&mut self, locator: &str) {
        let mut s = self.state.borrow_mut();
        s.calls.push(Call::Load(locator.to_string()));
        if s.playing {
            s.playing = false;
            s.events.push_back(ChannelEvent::Paused);
        }
        s.events.push_back(ChannelEvent::TimeUpdate(Duration::ZERO));
    }

    fn play(&mut self) -> PendingStart {
        let mut s = self.state.borrow_mut();
        s.calls.push(Call::Play);
        match s.mode {
            StartMode::Immediate => {
                if !s.playing {
                    s.playing = true;
                    s.events.push_back(ChannelEvent::Started);
                }
                PendingStart::settled(Ok(()))
            }
            StartMode::Manual => {
                let (resolver, pending) = PendingStart::new();
                s.resolvers.push_back(resolver);
                pending
            }
            StartMode::Reject => {
                PendingStart::settled(Err(ChannelError::StartRejected("autoplay blocked".into())))
            }
        }
    }

    fn pause(&mut self) {
        let mut s = self.state.borrow_mut();
        s.calls.push(Call::Pause);
        if !s.resolvers.is_empty() {
            s.paused_while_pending = true;
        }
        if s.playing {
            s.playing = false;
            s.events.push_back(ChannelEvent::Paused);
        }
    }

    fn seek(&mut self, position: Duration) {
        let mut s = self.state.borrow_mut();
        s.calls.push(Call::Seek(position));
        s.events.push_back(ChannelEvent::TimeUpdate(position));
    }

    fn set_volume(&mut self, level: f32) {
        let mut s = self.state.borrow_mut();
        s.calls.push(Call::SetVolume(level));
        s.volume = level;
    }

    fn set_looping(&mut self, looping: bool) {
        self.state.borrow_mut().calls.push(Call::SetLooping(looping));
    }

    fn next_event(&mut self) -> Option<ChannelEvent> {
        self.state.borrow_mut().events.pop_front()
    }

    fn close(&mut self, _fade_out: Duration) {
        let mut s = self.state.borrow_mut();
        s.calls.push(Call::Close);
        s.playing = false;
    }
}
