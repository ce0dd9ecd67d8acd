//! Crop/zoom avatar editor.
//!
//! The editor holds at most one [`CropDraft`]. Selecting a file validates and
//! decodes it into a draft; gestures adjust the draft's [`CropTransform`];
//! confirming rasterizes the visible square and hands it to the upload port.
//! The draft owns its preview URL, so every path that discards a draft
//! (cancel, successful upload, a new selection, dropping the editor)
//! releases the preview as well.

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use image::DynamicImage;
use tracing::{debug, info, warn};

use crate::domain::NotificationLevel;
use crate::domain::entities::{
    AvatarFile, CropRect, CropTransform, DragGesture, UpdatedProfile, ViewportTransform,
};
use crate::domain::errors::EditorError;
use crate::domain::ports::{
    AvatarApi, NotificationPort, ObjectUrlRegistry, OwnedObjectUrl, Rasterizer,
};
use crate::infrastructure::config::EditorConfig;

/// Where the editor is in its selection/edit/upload cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorPhase {
    /// No draft.
    Idle,
    /// Checking the picked file's media type.
    Validating,
    /// Decoding the picked file.
    Decoding,
    /// A draft is open for pan/zoom.
    Editing,
    /// Rendering and uploading the draft.
    Rasterizing,
}

impl fmt::Display for EditorPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Validating => "validating",
            Self::Decoding => "decoding",
            Self::Editing => "editing",
            Self::Rasterizing => "rasterizing",
        };
        write!(f, "{name}")
    }
}

/// In-progress editing session for one picked file.
pub struct CropDraft {
    file: AvatarFile,
    image: Arc<DynamicImage>,
    preview: OwnedObjectUrl,
    transform: CropTransform,
    drag: Option<DragGesture>,
}

impl CropDraft {
    /// The picked file.
    #[must_use]
    pub const fn file(&self) -> &AvatarFile {
        &self.file
    }

    /// Preview URL of the raw file.
    #[must_use]
    pub const fn preview(&self) -> &OwnedObjectUrl {
        &self.preview
    }

    /// Decoded `(width, height)`.
    #[must_use]
    pub fn natural_size(&self) -> (u32, u32) {
        (self.image.width(), self.image.height())
    }

    /// Current zoom and offset.
    #[must_use]
    pub const fn transform(&self) -> CropTransform {
        self.transform
    }

    /// Region that would be uploaded now.
    #[must_use]
    pub fn crop_rect(&self) -> CropRect {
        let (w, h) = self.natural_size();
        self.transform.crop_rect(w, h)
    }

    /// Returns true while a drag gesture is active.
    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }
}

impl fmt::Debug for CropDraft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CropDraft")
            .field("file", &self.file)
            .field("size", &self.natural_size())
            .field("transform", &self.transform)
            .field("dragging", &self.is_dragging())
            .finish_non_exhaustive()
    }
}

/// Interactive crop/zoom editor producing square avatar uploads.
pub struct AvatarEditor {
    api: Arc<dyn AvatarApi>,
    registry: Arc<dyn ObjectUrlRegistry>,
    rasterizer: Arc<dyn Rasterizer>,
    notifier: Arc<dyn NotificationPort>,
    config: EditorConfig,
    draft: Option<CropDraft>,
}

impl fmt::Debug for AvatarEditor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AvatarEditor")
            .field("config", &self.config)
            .field("draft", &self.draft)
            .finish_non_exhaustive()
    }
}

impl AvatarEditor {
    /// Creates an idle editor.
    #[must_use]
    pub fn new(
        api: Arc<dyn AvatarApi>,
        registry: Arc<dyn ObjectUrlRegistry>,
        rasterizer: Arc<dyn Rasterizer>,
        notifier: Arc<dyn NotificationPort>,
        config: EditorConfig,
    ) -> Self {
        Self {
            api,
            registry,
            rasterizer,
            notifier,
            config,
            draft: None,
        }
    }

    /// Current phase. Transient phases run inside `&mut self` calls and are
    /// never observed here.
    #[must_use]
    pub const fn phase(&self) -> EditorPhase {
        if self.draft.is_some() {
            EditorPhase::Editing
        } else {
            EditorPhase::Idle
        }
    }

    /// The open draft, if any.
    #[must_use]
    pub const fn draft(&self) -> Option<&CropDraft> {
        self.draft.as_ref()
    }

    /// How the draft image sits in the viewport right now.
    #[must_use]
    pub fn viewport(&self) -> Option<ViewportTransform> {
        self.draft.as_ref().map(|draft| {
            let (w, h) = draft.natural_size();
            draft.transform.viewport(w, h, self.config.viewport_size)
        })
    }

    /// Starts a session for a picked file.
    ///
    /// A non-image file is rejected before any state changes. Otherwise the
    /// current draft is discarded, a preview URL is created, and the file is
    /// decoded off the async workers.
    ///
    /// # Errors
    /// Returns [`EditorError::NotAnImage`] or [`EditorError::Decode`].
    pub async fn select_file(&mut self, file: AvatarFile) -> Result<(), EditorError> {
        debug!(phase = %EditorPhase::Validating, file = ?file, "Avatar file selected");
        if !file.is_image() {
            self.notifier.send(
                NotificationLevel::Warn,
                "Unsupported file",
                "Please choose an image file.",
            );
            return Err(EditorError::NotAnImage {
                media_type: file.media_type,
            });
        }

        self.draft = None;

        debug!(phase = %EditorPhase::Decoding, "Decoding avatar source");
        let preview = OwnedObjectUrl::create(
            self.registry.clone(),
            file.bytes.clone(),
            &file.media_type,
        );

        let bytes = file.bytes.clone();
        let decoded = tokio::task::spawn_blocking(move || image::load_from_memory(&bytes))
            .await
            .map_err(|e| EditorError::decode(format!("decode task panicked: {e}")))
            .and_then(|r| r.map_err(|e| EditorError::decode(e.to_string())));

        let image = match decoded {
            Ok(image) if image.width() > 0 && image.height() > 0 => image,
            Ok(_) => return Err(self.decode_failed(preview, EditorError::decode("image is empty"))),
            Err(e) => return Err(self.decode_failed(preview, e)),
        };

        debug!(
            width = image.width(),
            height = image.height(),
            phase = %EditorPhase::Editing,
            "Avatar draft ready"
        );
        self.draft = Some(CropDraft {
            file,
            image: Arc::new(image),
            preview,
            transform: CropTransform::identity(),
            drag: None,
        });
        Ok(())
    }

    fn decode_failed(&self, preview: OwnedObjectUrl, error: EditorError) -> EditorError {
        drop(preview);
        warn!(error = %error, "Avatar source could not be decoded");
        self.notifier.send(
            NotificationLevel::Error,
            "Could not read image",
            &error.user_message(),
        );
        error
    }

    /// Sets zoom from the slider, clamped.
    pub fn set_zoom(&mut self, zoom: f64) {
        if let Some(draft) = self.draft.as_mut() {
            draft.transform.set_zoom(zoom);
        }
    }

    /// Applies a wheel scroll of `delta_y`.
    pub fn wheel(&mut self, delta_y: f64) {
        if let Some(draft) = self.draft.as_mut() {
            draft.transform.apply_wheel(delta_y);
        }
    }

    /// Sets the pan offset directly, clamped.
    pub fn set_offset(&mut self, offset_x: f64, offset_y: f64) {
        if let Some(draft) = self.draft.as_mut() {
            draft.transform.set_offset(offset_x, offset_y);
        }
    }

    /// Starts a drag at pointer position `(x, y)` in screen pixels.
    pub fn begin_drag(&mut self, x: f64, y: f64) {
        if let Some(draft) = self.draft.as_mut() {
            draft.drag = Some(DragGesture::begin((x, y), &draft.transform));
        }
    }

    /// Moves the active drag to `(x, y)`.
    pub fn drag_to(&mut self, x: f64, y: f64) {
        let viewport = self.config.viewport_size;
        if let Some(draft) = self.draft.as_mut()
            && let Some(drag) = draft.drag
        {
            let (ox, oy) = drag.offset_at((x, y), viewport);
            draft.transform.set_offset(ox, oy);
        }
    }

    /// Ends the drag, keeping the current offset.
    pub fn end_drag(&mut self) {
        if let Some(draft) = self.draft.as_mut() {
            draft.drag = None;
        }
    }

    /// Pointer left or was cancelled; the last applied offset stays.
    pub fn cancel_drag(&mut self) {
        self.end_drag();
    }

    /// Discards the draft and its preview.
    pub fn cancel(&mut self) {
        if self.draft.take().is_some() {
            debug!(phase = %EditorPhase::Idle, "Avatar edit cancelled");
        }
    }

    /// Rasterizes the draft into the output PNG without uploading it.
    ///
    /// # Errors
    /// Returns [`EditorError::NoDraft`] or [`EditorError::Encode`].
    pub async fn render(&self) -> Result<Bytes, EditorError> {
        let Some(draft) = self.draft.as_ref() else {
            return Err(EditorError::NoDraft);
        };

        let rect = draft.crop_rect();
        let output_size = self.config.output_size;
        debug!(
            phase = %EditorPhase::Rasterizing,
            x = rect.x,
            y = rect.y,
            size = rect.size,
            output_size,
            "Rendering avatar"
        );

        let image = draft.image.clone();
        let rasterizer = self.rasterizer.clone();
        tokio::task::spawn_blocking(move || rasterizer.rasterize(&image, rect, output_size))
            .await
            .map_err(|e| EditorError::encode(format!("render task panicked: {e}")))
            .and_then(|r| r.map_err(|e| EditorError::encode(e.to_string())))
    }

    /// Rasterizes the draft and uploads it.
    ///
    /// On success the draft is released. On failure it is kept so the user
    /// can retry or cancel.
    ///
    /// # Errors
    /// Returns [`EditorError::NoDraft`], [`EditorError::Encode`] or
    /// [`EditorError::Upload`].
    pub async fn confirm(&mut self) -> Result<UpdatedProfile, EditorError> {
        let png = match self.render().await {
            Ok(png) => png,
            Err(EditorError::NoDraft) => return Err(EditorError::NoDraft),
            Err(e) => {
                warn!(error = %e, "Avatar rendering failed");
                self.notifier
                    .send(NotificationLevel::Error, "Upload failed", &e.user_message());
                return Err(e);
            }
        };

        match self.api.upload_avatar(AvatarFile::png(png)).await {
            Ok(profile) => {
                self.draft = None;
                info!(user = %profile.id, "Avatar updated");
                self.notifier
                    .send(NotificationLevel::Success, "Avatar updated", "");
                Ok(profile)
            }
            Err(e) => {
                warn!(error = %e, "Avatar upload failed");
                let error = EditorError::Upload(e);
                self.notifier
                    .send(NotificationLevel::Error, "Upload failed", &error.user_message());
                Err(error)
            }
        }
    }

    /// Removes the current avatar.
    ///
    /// With no avatar set this does nothing but still reports success.
    ///
    /// # Errors
    /// Returns [`EditorError::Remove`] if the delete call fails.
    pub async fn remove_avatar(
        &self,
        has_avatar: bool,
    ) -> Result<Option<UpdatedProfile>, EditorError> {
        if !has_avatar {
            debug!("No avatar set, nothing to remove");
            self.notifier
                .send(NotificationLevel::Success, "Avatar removed", "");
            return Ok(None);
        }

        match self.api.remove_avatar().await {
            Ok(profile) => {
                info!(user = %profile.id, "Avatar removed");
                self.notifier
                    .send(NotificationLevel::Success, "Avatar removed", "");
                Ok(Some(profile))
            }
            Err(e) => {
                warn!(error = %e, "Avatar removal failed");
                let error = EditorError::Remove(e);
                self.notifier.send(
                    NotificationLevel::Error,
                    "Could not remove avatar",
                    &error.user_message(),
                );
                Err(error)
            }
        }
    }
}
