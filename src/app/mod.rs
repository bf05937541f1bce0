//! The studio: history, the gallery/editor lifecycle and generation wired
//! together behind one owner.

use std::sync::Arc;

use crate::editor::{EditedImage, EditorSession, SourceImage};
use crate::error::{AppError, AppResult};
use crate::generation::{spawn_job, GenerationBackend, GenerationRequest};
use crate::history::{next_record_id, now_millis, HistoryRecord, HistoryStore};
use crate::media::{self, HttpMediaFetcher, MediaFetcher, MediaLocator, MediaType};
use crate::render::Compositor;
use crate::state::{StateError, StateMachine, StudioEvent, StudioState};

/// A committed edit: the new history record and the PNG behind it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedEdit {
    pub record: HistoryRecord,
    pub image: EditedImage,
}

pub struct Studio<F: MediaFetcher = HttpMediaFetcher> {
    history: HistoryStore,
    machine: StateMachine,
    editing: Option<HistoryRecord>,
    fetcher: F,
}

impl Studio<HttpMediaFetcher> {
    pub fn new(history: HistoryStore) -> Self {
        Self::with_fetcher(history, HttpMediaFetcher)
    }
}

impl<F: MediaFetcher> Studio<F> {
    pub fn with_fetcher(history: HistoryStore, fetcher: F) -> Self {
        Self {
            history,
            machine: StateMachine::new(),
            editing: None,
            fetcher,
        }
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn state(&self) -> StudioState {
        self.machine.state()
    }

    /// Record the open editor session was started from.
    pub fn editing(&self) -> Option<&HistoryRecord> {
        self.editing.as_ref()
    }

    /// Opens an editor on the image record `id`, decoding its bitmap once.
    pub fn begin_edit(&mut self, id: &str) -> AppResult<EditorSession> {
        let record = self
            .history
            .get(id)
            .cloned()
            .ok_or_else(|| AppError::UnknownRecord { id: id.to_string() })?;
        if record.media_type != MediaType::Image {
            return Err(AppError::NotEditable {
                id: record.id,
                media: record.media_type.label(),
            });
        }
        if !self.machine.can_transition(StudioEvent::OpenEditor) {
            return Err(StateError::InvalidStateTransition {
                from: self.machine.state(),
                event: StudioEvent::OpenEditor,
            }
            .into());
        }

        let locator = MediaLocator::parse(&record.url)?;
        let bitmap = media::load_source_image_with(&locator, &self.fetcher)?;
        self.machine.transition(StudioEvent::OpenEditor)?;
        tracing::info!(id = %record.id, "editing history record");
        self.editing = Some(record);
        Ok(EditorSession::open(SourceImage::ready(bitmap)))
    }

    /// Saves `session` as a new image record; the source record is untouched.
    pub fn commit_edit<C: Compositor>(
        &mut self,
        session: EditorSession<C>,
    ) -> AppResult<SavedEdit> {
        let source = self.editing.clone().ok_or(AppError::NoActiveEdit)?;
        let edited = match session.save() {
            Ok(edited) => edited,
            Err(err) => {
                tracing::warn!(?err, id = %source.id, "export failed; closing editor");
                self.close_editor(StudioEvent::CancelEdit)?;
                return Err(err.into());
            }
        };

        let record = HistoryRecord::derived_from_edit(&source, media::png_data_uri(&edited.png));
        if let Err(err) = self.history.push(record.clone()) {
            tracing::warn!(?err, id = %source.id, "edit could not be stored; closing editor");
            self.close_editor(StudioEvent::CancelEdit)?;
            return Err(err.into());
        }
        self.close_editor(StudioEvent::SaveEdit)?;
        tracing::info!(
            source = %source.id,
            id = %record.id,
            width = edited.width,
            height = edited.height,
            "edit saved to history"
        );
        Ok(SavedEdit {
            record,
            image: edited,
        })
    }

    pub fn cancel_edit<C: Compositor>(&mut self, session: EditorSession<C>) -> AppResult<()> {
        if self.editing.is_none() {
            return Err(AppError::NoActiveEdit);
        }
        session.cancel();
        self.close_editor(StudioEvent::CancelEdit)
    }

    fn close_editor(&mut self, event: StudioEvent) -> AppResult<()> {
        self.machine.transition(event)?;
        self.editing = None;
        Ok(())
    }

    pub fn record_generation(
        &mut self,
        request: &GenerationRequest,
        display_prompt: &str,
        url: String,
    ) -> AppResult<HistoryRecord> {
        let record = HistoryRecord {
            id: next_record_id(),
            media_type: request.media_type(),
            url,
            prompt: display_prompt.to_string(),
            timestamp_millis: now_millis(),
            aspect_ratio: request.aspect_ratio_tag().to_string(),
        };
        self.history.push(record.clone())?;
        Ok(record)
    }

    /// Runs `request` on a worker and blocks until it lands in history.
    pub fn generate<B>(
        &mut self,
        backend: Arc<B>,
        request: GenerationRequest,
        display_prompt: &str,
    ) -> AppResult<HistoryRecord>
    where
        B: GenerationBackend + ?Sized + 'static,
    {
        let job = spawn_job(backend, request.clone());
        let url = job.wait()?;
        self.record_generation(&request, display_prompt, url)
    }

    pub fn delete(&mut self, id: &str) -> AppResult<HistoryRecord> {
        self.history
            .remove(id)?
            .ok_or_else(|| AppError::UnknownRecord { id: id.to_string() })
    }

    pub fn clear(&mut self) -> AppResult<()> {
        self.history.clear()?;
        Ok(())
    }
}
