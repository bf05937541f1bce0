use image::RgbaImage;

use super::event::EditorEvent;
use super::reducer::reduce;
use super::state::{EditorState, SourceImage};
use crate::render::{encode_png, CompositeOutcome, Compositor, ExportError, RasterCompositor};

/// Result of feeding one event through the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dispatch {
    pub changed: bool,
    /// Present exactly when `changed` is true.
    pub outcome: Option<CompositeOutcome>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditedImage {
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// One editing session: a state value, its reducer, and the compositor
/// that owns the output surface.
#[derive(Debug)]
pub struct EditorSession<C: Compositor = RasterCompositor> {
    state: EditorState,
    compositor: C,
    recomposites: u64,
}

impl EditorSession<RasterCompositor> {
    pub fn open(source: SourceImage) -> Self {
        Self::with_compositor(source, RasterCompositor::new())
    }
}

impl<C: Compositor> EditorSession<C> {
    pub fn with_compositor(source: SourceImage, compositor: C) -> Self {
        let mut session = Self {
            state: EditorState::new(source),
            compositor,
            recomposites: 0,
        };
        tracing::info!(ready = session.state.source.is_ready(), "editor session opened");
        session.recomposite();
        session
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn surface(&self) -> Option<&RgbaImage> {
        self.compositor.surface()
    }

    pub const fn recomposite_count(&self) -> u64 {
        self.recomposites
    }

    /// Reduces `event` into the state; a changed state is followed by
    /// exactly one recomposite before this returns.
    pub fn dispatch(&mut self, event: EditorEvent) -> Dispatch {
        let next = reduce(&self.state, &event);
        if next == self.state {
            if !event.is_pointer() {
                tracing::debug!(?event, "editor event left state unchanged");
            }
            return Dispatch {
                changed: false,
                outcome: None,
            };
        }
        self.state = next;
        let outcome = self.recomposite();
        Dispatch {
            changed: true,
            outcome: Some(outcome),
        }
    }

    fn recomposite(&mut self) -> CompositeOutcome {
        self.recomposites = self.recomposites.saturating_add(1);
        self.compositor.composite(&self.state)
    }

    /// Ends the session, emitting the current composite as PNG.
    pub fn save(self) -> Result<EditedImage, ExportError> {
        let surface = self
            .compositor
            .surface()
            .filter(|_| self.state.source.is_ready())
            .ok_or(ExportError::EmptySurface)?;
        let png = encode_png(surface)?;
        tracing::info!(
            width = surface.width(),
            height = surface.height(),
            bytes = png.len(),
            "editor session saved"
        );
        Ok(EditedImage {
            png,
            width: surface.width(),
            height: surface.height(),
        })
    }

    /// Ends the session and drops all editing state.
    pub fn cancel(self) {
        tracing::info!("editor session cancelled");
    }
}
