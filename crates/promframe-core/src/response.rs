//! Decoded frames of one payload

use promframe_domain::{Frame, Notice};
use serde::Serialize;

/// Ordered frames produced by one decode call
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Response {
    frames: Vec<Frame>,
}

impl Response {
    /// Create an empty response
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap already built frames
    pub fn from_frames(frames: Vec<Frame>) -> Self {
        Self { frames }
    }

    /// Frames in emission order
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Take the frames out
    pub fn into_frames(self) -> Vec<Frame> {
        self.frames
    }

    /// Number of frames
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Check if no frame was produced
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Append a frame
    pub fn push(&mut self, frame: Frame) {
        self.frames.push(frame);
    }

    /// Append frames
    pub fn extend(&mut self, frames: impl IntoIterator<Item = Frame>) {
        self.frames.extend(frames);
    }

    /// Append the same notices to every frame
    pub fn attach_notices(&mut self, notices: &[Notice]) {
        if notices.is_empty() {
            return;
        }
        for frame in &mut self.frames {
            frame.append_notices(notices.iter().cloned());
        }
    }

    /// Set a custom annotation on the first frame, if there is one.
    ///
    /// Returns `false` when the response has no frames.
    pub fn set_first_custom(&mut self, key: &str, value: serde_json::Value) -> bool {
        match self.frames.first_mut() {
            Some(frame) => {
                frame.set_custom(key, value);
                true
            }
            None => false,
        }
    }
}

impl IntoIterator for Response {
    type Item = Frame;
    type IntoIter = std::vec::IntoIter<Frame>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames.into_iter()
    }
}
