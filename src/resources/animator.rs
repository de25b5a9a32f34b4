//! Animation playback engine.
//!
//! The locomotion core never owns skeletal playback. It talks to an
//! [`AnimationBackend`]: start a frame range with loop/blend flags, ask to be
//! told when it completes, detach that request, stop it. This module defines
//! that boundary and [`Animator`], a frame-driven implementation that advances
//! every playback by the frame delta at a fixed frames-per-second rate.
//!
//! # Playback Flow
//!
//! 1. The state machine calls [`AnimationBackend::play_range`] and keeps the
//!    returned [`PlaybackHandle`].
//! 2. For non-looping ranges it registers a [`CompletionObserver`].
//! 3. Each frame [`Animator::advance`] moves playheads forward. A non-looping
//!    playback that reaches its last frame stays there and, if an observer is
//!    still attached, yields one [`Completion`]. The observer is consumed.
//! 4. Stopping a playback removes it together with its observer, so a
//!    completion can never be reported for it afterwards.

use bevy_ecs::prelude::*;
use log::{debug, warn};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// Identifies one started playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlaybackHandle(pub u32);

/// Identifies a registered completion observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CompletionObserver(pub u32);

/// Parameters of a `play_range` call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayRequest {
    pub from: f32,
    pub to: f32,
    pub looped: bool,
    pub speed_ratio: f32,
    pub blend: bool,
}

/// A non-looping playback reached its last frame with an observer attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completion {
    pub target: Entity,
    pub handle: PlaybackHandle,
}

/// Capability set the locomotion core needs from an animation engine.
pub trait AnimationBackend {
    /// Start playing `request.from..=request.to` on the skeleton of `target`.
    fn play_range(&mut self, target: Entity, request: PlayRequest) -> PlaybackHandle;
    /// Ask to be notified once `handle` completes. `None` if the handle is
    /// unknown or already finished.
    fn observe_completion(&mut self, handle: PlaybackHandle) -> Option<CompletionObserver>;
    /// Detach an observer. Unknown observers are ignored.
    fn remove_completion_observer(&mut self, observer: CompletionObserver);
    /// Stop a playback. Unknown handles are ignored.
    fn stop(&mut self, handle: PlaybackHandle);
}

#[derive(Debug, Clone)]
struct Playback {
    target: Entity,
    request: PlayRequest,
    frame: f32,
    finished: bool,
    observer: Option<CompletionObserver>,
}

/// Frame-driven animation engine resource.
#[derive(Resource, Debug)]
pub struct Animator {
    /// Authoring frame rate of the character's animation.
    pub fps: f32,
    next_id: u32,
    playbacks: FxHashMap<PlaybackHandle, Playback>,
    observers: FxHashMap<CompletionObserver, PlaybackHandle>,
}

/// Frame rate used when none, or a non-positive one, is given.
pub const DEFAULT_FPS: f32 = 60.0;

impl Default for Animator {
    fn default() -> Self {
        Self::new(DEFAULT_FPS)
    }
}

impl Animator {
    /// Non-positive or non-finite rates fall back to [`DEFAULT_FPS`]; playheads
    /// must move forward for non-looping ranges to ever complete.
    pub fn new(fps: f32) -> Self {
        let fps = if fps.is_finite() && fps > 0.0 {
            fps
        } else {
            warn!("animation fps {} is not positive, using {}", fps, DEFAULT_FPS);
            DEFAULT_FPS
        };
        Self {
            fps,
            next_id: 1,
            playbacks: FxHashMap::default(),
            observers: FxHashMap::default(),
        }
    }

    fn allocate_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1).max(1);
        id
    }

    /// Advance every playback by `dt` seconds and collect completions.
    ///
    /// Completions are returned in handle order.
    pub fn advance(&mut self, dt: f32) -> SmallVec<[Completion; 4]> {
        let mut completed: SmallVec<[Completion; 4]> = SmallVec::new();
        let frames = dt.max(0.0) * self.fps;
        for (handle, playback) in self.playbacks.iter_mut() {
            if playback.finished {
                continue;
            }
            let request = playback.request;
            playback.frame += frames * request.speed_ratio;
            if playback.frame < request.to {
                continue;
            }
            let span = request.to - request.from;
            if request.looped && span > 0.0 {
                playback.frame = request.from + (playback.frame - request.from).rem_euclid(span);
            } else {
                playback.frame = request.to; // stay on last frame
                playback.finished = true;
                if let Some(observer) = playback.observer.take() {
                    self.observers.remove(&observer);
                    completed.push(Completion {
                        target: playback.target,
                        handle: *handle,
                    });
                }
            }
        }
        completed.sort_by_key(|c| c.handle);
        completed
    }

    /// Current playhead of `handle`, if it is still known.
    pub fn frame(&self, handle: PlaybackHandle) -> Option<f32> {
        self.playbacks.get(&handle).map(|p| p.frame)
    }

    pub fn request(&self, handle: PlaybackHandle) -> Option<PlayRequest> {
        self.playbacks.get(&handle).map(|p| p.request)
    }

    pub fn is_finished(&self, handle: PlaybackHandle) -> Option<bool> {
        self.playbacks.get(&handle).map(|p| p.finished)
    }

    pub fn has_observer(&self, handle: PlaybackHandle) -> bool {
        self.playbacks
            .get(&handle)
            .is_some_and(|p| p.observer.is_some())
    }

    /// Number of playbacks the engine is tracking.
    pub fn active_count(&self) -> usize {
        self.playbacks.len()
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }
}

impl AnimationBackend for Animator {
    fn play_range(&mut self, target: Entity, request: PlayRequest) -> PlaybackHandle {
        let handle = PlaybackHandle(self.allocate_id());
        debug!(
            "play {:?} on {:?}: {}..{} loop={} blend={}",
            handle, target, request.from, request.to, request.looped, request.blend
        );
        self.playbacks.insert(
            handle,
            Playback {
                target,
                request,
                frame: request.from,
                finished: false,
                observer: None,
            },
        );
        handle
    }

    fn observe_completion(&mut self, handle: PlaybackHandle) -> Option<CompletionObserver> {
        let id = self.allocate_id();
        let playback = self.playbacks.get_mut(&handle)?;
        if playback.finished {
            return None;
        }
        let observer = CompletionObserver(id);
        if let Some(previous) = playback.observer.replace(observer) {
            self.observers.remove(&previous);
        }
        self.observers.insert(observer, handle);
        Some(observer)
    }

    fn remove_completion_observer(&mut self, observer: CompletionObserver) {
        let Some(handle) = self.observers.remove(&observer) else {
            return;
        };
        if let Some(playback) = self.playbacks.get_mut(&handle) {
            if playback.observer == Some(observer) {
                playback.observer = None;
            }
        }
    }

    fn stop(&mut self, handle: PlaybackHandle) {
        if let Some(observer) = self.playbacks.remove(&handle).and_then(|p| p.observer) {
            self.observers.remove(&observer);
        }
    }
}
