use std::collections::HashMap;

use serde::Serialize;

use crate::error::PlaybackError;

/// The two audio streams the user can compare.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stream {
    Input,
    Output,
}

impl Stream {
    pub const ALL: [Stream; 2] = [Stream::Input, Stream::Output];
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackState {
    Playing,
    #[default]
    Paused,
}

impl PlaybackState {
    /// Label for the toggle button: the action it would perform.
    pub fn button_label(self) -> &'static str {
        match self {
            PlaybackState::Playing => "Pause",
            PlaybackState::Paused => "Play",
        }
    }
}

/// A playable media element.
pub trait MediaHandle {
    fn play(&self) -> Result<(), PlaybackError>;
    fn pause(&self) -> Result<(), PlaybackError>;
    /// The element's own view of whether it is paused.
    fn is_paused(&self) -> bool;
}

struct Slot<H> {
    handle: Option<H>,
    state: PlaybackState,
}

impl<H> Default for Slot<H> {
    fn default() -> Self {
        Self { handle: None, state: PlaybackState::Paused }
    }
}

/// Per-stream play/pause state, looked up by [`Stream`] only.
pub struct PlaybackCoordinator<H> {
    slots: HashMap<Stream, Slot<H>>,
}

impl<H> Default for PlaybackCoordinator<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> PlaybackCoordinator<H> {
    pub fn new() -> Self {
        let slots = Stream::ALL.into_iter().map(|s| (s, Slot::default())).collect();
        Self { slots }
    }

    fn slot(&self, stream: Stream) -> &Slot<H> {
        &self.slots[&stream]
    }

    fn slot_mut(&mut self, stream: Stream) -> &mut Slot<H> {
        self.slots.entry(stream).or_default()
    }

    pub fn state(&self, stream: Stream) -> PlaybackState {
        self.slot(stream).state
    }

    /// Bind a fresh media element to `stream`. The stream starts paused.
    pub fn attach(&mut self, stream: Stream, handle: H) {
        let slot = self.slot_mut(stream);
        slot.handle = Some(handle);
        slot.state = PlaybackState::Paused;
    }

    pub fn detach(&mut self, stream: Stream) -> Option<H> {
        let slot = self.slot_mut(stream);
        slot.state = PlaybackState::Paused;
        slot.handle.take()
    }
}

impl<H: MediaHandle> PlaybackCoordinator<H> {
    /// Flip one stream between playing and paused. A stream with no element
    /// attached is left alone.
    pub fn toggle(&mut self, stream: Stream) -> Result<PlaybackState, PlaybackError> {
        let slot = self.slot_mut(stream);
        let Some(handle) = slot.handle.as_ref() else {
            log::debug!("Toggle on {:?} ignored: nothing attached", stream);
            return Ok(slot.state);
        };

        if handle.is_paused() {
            handle.play()?;
            slot.state = PlaybackState::Playing;
        } else {
            handle.pause()?;
            slot.state = PlaybackState::Paused;
        }
        log::debug!("{:?} now {:?}", stream, slot.state);
        Ok(slot.state)
    }

    /// Adopt the element's reported state, e.g. after it ends on its own.
    pub fn sync(&mut self, stream: Stream) -> PlaybackState {
        let slot = self.slot_mut(stream);
        if let Some(handle) = slot.handle.as_ref() {
            slot.state = if handle.is_paused() {
                PlaybackState::Paused
            } else {
                PlaybackState::Playing
            };
        }
        slot.state
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Media element stand-in. Clones share the same underlying flags.
    #[derive(Clone, Default)]
    pub(crate) struct FakeMedia {
        pub paused: Rc<Cell<bool>>,
        pub plays: Rc<Cell<u32>>,
        pub refuse_play: Rc<Cell<bool>>,
    }

    impl FakeMedia {
        pub fn new() -> Self {
            let media = Self::default();
            media.paused.set(true);
            media
        }
    }

    impl MediaHandle for FakeMedia {
        fn play(&self) -> Result<(), PlaybackError> {
            if self.refuse_play.get() {
                return Err(PlaybackError::PlayRejected("NotAllowedError".into()));
            }
            self.plays.set(self.plays.get() + 1);
            self.paused.set(false);
            Ok(())
        }

        fn pause(&self) -> Result<(), PlaybackError> {
            self.paused.set(true);
            Ok(())
        }

        fn is_paused(&self) -> bool {
            self.paused.get()
        }
    }

    fn coordinator() -> (PlaybackCoordinator<FakeMedia>, FakeMedia, FakeMedia) {
        let input = FakeMedia::new();
        let output = FakeMedia::new();
        let mut pc = PlaybackCoordinator::new();
        pc.attach(Stream::Input, input.clone());
        pc.attach(Stream::Output, output.clone());
        (pc, input, output)
    }

    #[test]
    fn test_toggle_round_trip() {
        let (mut pc, input, _) = coordinator();
        assert_eq!(pc.toggle(Stream::Input), Ok(PlaybackState::Playing));
        assert!(!input.is_paused());
        assert_eq!(pc.toggle(Stream::Input), Ok(PlaybackState::Paused));
        assert!(input.is_paused());
    }

    #[test]
    fn test_streams_are_independent() {
        let (mut pc, input, output) = coordinator();
        pc.toggle(Stream::Input).unwrap();
        pc.toggle(Stream::Output).unwrap();
        assert_eq!(pc.state(Stream::Input), PlaybackState::Playing);
        assert_eq!(pc.state(Stream::Output), PlaybackState::Playing);

        pc.toggle(Stream::Input).unwrap();
        assert_eq!(pc.state(Stream::Input), PlaybackState::Paused);
        assert_eq!(pc.state(Stream::Output), PlaybackState::Playing);
        assert!(input.is_paused());
        assert!(!output.is_paused());
    }

    #[test]
    fn test_interleavings_never_cross() {
        // Every sequence of 6 toggles: each stream's state depends only on
        // how many times that stream was toggled.
        for mask in 0u32..64 {
            let (mut pc, _, _) = coordinator();
            let (mut n_in, mut n_out) = (0, 0);
            for bit in 0..6 {
                if mask & (1 << bit) == 0 {
                    pc.toggle(Stream::Input).unwrap();
                    n_in += 1;
                } else {
                    pc.toggle(Stream::Output).unwrap();
                    n_out += 1;
                }
                let expect = |n: i32| if n % 2 == 1 { PlaybackState::Playing } else { PlaybackState::Paused };
                assert_eq!(pc.state(Stream::Input), expect(n_in));
                assert_eq!(pc.state(Stream::Output), expect(n_out));
            }
        }
    }

    #[test]
    fn test_toggle_without_handle_is_noop() {
        let mut pc: PlaybackCoordinator<FakeMedia> = PlaybackCoordinator::new();
        pc.attach(Stream::Input, FakeMedia::new());
        assert_eq!(pc.toggle(Stream::Output), Ok(PlaybackState::Paused));
        assert_eq!(pc.state(Stream::Input), PlaybackState::Paused);
    }

    #[test]
    fn test_rejected_play_stays_paused() {
        let (mut pc, input, _) = coordinator();
        input.refuse_play.set(true);
        assert!(matches!(pc.toggle(Stream::Input), Err(PlaybackError::PlayRejected(_))));
        assert_eq!(pc.state(Stream::Input), PlaybackState::Paused);
    }

    #[test]
    fn test_sync_after_media_ends() {
        let (mut pc, input, _) = coordinator();
        pc.toggle(Stream::Input).unwrap();
        input.paused.set(true); // reached the end
        assert_eq!(pc.sync(Stream::Input), PlaybackState::Paused);
        // Next press plays again rather than issuing a redundant pause
        assert_eq!(pc.toggle(Stream::Input), Ok(PlaybackState::Playing));
        assert_eq!(input.plays.get(), 2);
    }

    #[test]
    fn test_attach_resets_state() {
        let (mut pc, _, _) = coordinator();
        pc.toggle(Stream::Output).unwrap();
        pc.attach(Stream::Output, FakeMedia::new());
        assert_eq!(pc.state(Stream::Output), PlaybackState::Paused);
    }

    #[test]
    fn test_detach_leaves_stream_inert() {
        let (mut pc, _, output) = coordinator();
        pc.toggle(Stream::Output).unwrap();
        assert!(pc.detach(Stream::Output).is_some());
        assert_eq!(pc.state(Stream::Output), PlaybackState::Paused);

        // Nothing bound any more: toggling neither plays nor errors
        assert_eq!(pc.toggle(Stream::Output).unwrap(), PlaybackState::Paused);
        assert_eq!(output.plays.get(), 1);
        assert!(pc.detach(Stream::Output).is_none());
    }
}
