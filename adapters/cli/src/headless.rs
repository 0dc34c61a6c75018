//! Frame loop that records draw calls instead of opening a window.

use std::time::Duration;

use anyhow::Result as AnyResult;
use nova_siege_rendering::{
    Canvas, FrameControl, FrameInput, Presentation, RecordingCanvas, RenderingBackend,
};
use tracing::debug;

/// Presents a fixed number of frames of constant length with no human input.
#[derive(Clone, Copy, Debug)]
pub(crate) struct HeadlessBackend {
    frames: u64,
    frame_length: Duration,
}

impl HeadlessBackend {
    pub(crate) const fn new(frames: u64, frame_length: Duration) -> Self {
        Self {
            frames,
            frame_length,
        }
    }
}

impl RenderingBackend for HeadlessBackend {
    fn run<F>(self, presentation: Presentation, mut update_frame: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut dyn Canvas) -> AnyResult<FrameControl>,
    {
        let mut canvas = RecordingCanvas::new();
        let mut presented = 0;
        while presented < self.frames {
            canvas.reset();
            presented += 1;
            if update_frame(self.frame_length, FrameInput::default(), &mut canvas)?
                == FrameControl::Exit
            {
                break;
            }
        }

        let surface = presentation.screen_size();
        debug!(
            frames = presented,
            draw_calls = canvas.calls().len(),
            width = surface.x,
            height = surface.y,
            "headless run finished"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use nova_siege_core::Arena;
    use nova_siege_rendering::{palette, DrawCall};

    fn presentation() -> Presentation {
        Presentation::new(Arena::default(), 1.0, palette::BACKGROUND).expect("valid scale")
    }

    #[test]
    fn runs_until_frame_budget_is_spent() {
        let mut deltas = Vec::new();
        HeadlessBackend::new(5, Duration::from_millis(16))
            .run(presentation(), |delta, input, canvas| {
                assert_eq!(input, FrameInput::default());
                canvas.circle(Vec2::ZERO, 1.0, palette::PLAYER);
                deltas.push(delta);
                Ok(FrameControl::Continue)
            })
            .expect("frames run");
        assert_eq!(deltas, vec![Duration::from_millis(16); 5]);
    }

    #[test]
    fn exit_stops_the_loop_early() {
        let mut frames = 0;
        HeadlessBackend::new(100, Duration::from_millis(16))
            .run(presentation(), |_, _, _| {
                frames += 1;
                Ok(if frames == 3 {
                    FrameControl::Exit
                } else {
                    FrameControl::Continue
                })
            })
            .expect("frames run");
        assert_eq!(frames, 3);
    }

    #[test]
    fn frame_errors_propagate() {
        let result = HeadlessBackend::new(10, Duration::from_millis(16))
            .run(presentation(), |_, _, _| Err(anyhow::anyhow!("boom")));
        assert_eq!(
            result.map_err(|error| error.to_string()),
            Err("boom".to_owned())
        );
    }

    #[test]
    fn recording_canvas_starts_each_frame_empty() {
        let mut canvas = RecordingCanvas::new();
        canvas.clear(palette::BACKGROUND);
        assert_eq!(canvas.calls(), &[DrawCall::Clear(palette::BACKGROUND)]);
        canvas.reset();
        assert!(canvas.calls().is_empty());
    }
}
