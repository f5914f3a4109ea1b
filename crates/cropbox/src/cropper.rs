use cosmic::{
    Element, Task,
    iced::{
        Alignment, ContentFit, Length,
        alignment::{Horizontal, Vertical},
    },
    widget::{self, Space, button, column, container, icon, image::Handle, row, text},
};
use cropbox_image::{CroppedImage, ImageBlob, SourceImage, crop_source, read_source};
use cropbox_types::{CropRegion, CropSelection, DragHandle};
use cropbox_widgets::crop_widget;
use rfd::AsyncFileDialog;
use shared::{ImageFormat, LoadingEvent, LoadingState, SelectedFile, UploadPolicy};
use std::{path::PathBuf, sync::Arc};

use crate::{
    fl,
    notice::Notice,
    options::CropperOptions,
};

const DIALOG_WIDTH: f32 = 700.0;
const CROP_AREA_HEIGHT: f32 = 400.0;

/// Events the cropper reacts to. Produced by its own view and by the
/// tasks returned from [`perform`].
#[derive(Debug, Clone)]
pub enum Message {
    /// Upload area pressed.
    Browse,
    FileSelected(SelectedFile),
    PickCancelled,
    PickFailed(String),
    SourceRead {
        generation: u64,
        result: Result<Arc<SourceImage>, String>,
    },
    CropDragStart {
        x: f32,
        y: f32,
        handle: DragHandle,
    },
    CropDragMove {
        x: f32,
        y: f32,
    },
    CropDragEnd,
    Confirm,
    Cropped {
        generation: u64,
        result: Result<Arc<CroppedImage>, String>,
    },
    Cancel,
    Delete,
    /// Click on the dim area behind the dialog. Does not close it.
    BackdropPressed,
}

/// Side work the host must run for the cropper. Turn it into a task with
/// [`perform`].
#[derive(Debug, Clone)]
pub enum Job {
    PickFile {
        directory: Option<PathBuf>,
    },
    ReadSource {
        generation: u64,
        file: SelectedFile,
        max_bytes: u64,
    },
    Crop {
        generation: u64,
        source: Arc<SourceImage>,
        region: CropRegion,
    },
}

/// What came out of an [`ImageCropper::update`] call.
#[derive(Debug)]
pub enum Output<M> {
    /// A host message produced by one of the option callbacks.
    Emit(M),
    Notify(Notice),
    Job(Job),
}

/// Last confirmed crop, shown inside the upload area.
#[derive(Debug, Clone)]
pub struct CroppedPreview {
    pub data_url: String,
    pub handle: Handle,
    pub width: u32,
    pub height: u32,
}

impl From<&CroppedImage> for CroppedPreview {
    fn from(cropped: &CroppedImage) -> Self {
        Self {
            data_url: cropped.data_url.clone(),
            handle: cropped.handle.clone(),
            width: cropped.width,
            height: cropped.height,
        }
    }
}

/// Upload area plus modal crop dialog.
///
/// The cropper owns its state and never blocks: every file read, crop and
/// picker runs as a [`Job`]. Each time a new image is picked, or the
/// dialog closes, the generation moves on and results carrying an older
/// generation are dropped.
pub struct ImageCropper<M> {
    options: CropperOptions<M>,
    policy: UploadPolicy,
    start_dir: Option<PathBuf>,
    visible: bool,
    confirming: bool,
    source: LoadingState<Arc<SourceImage>>,
    selection: CropSelection,
    preview: Option<CroppedPreview>,
    generation: u64,
}

impl<M> ImageCropper<M> {
    pub fn new(options: CropperOptions<M>) -> Self {
        let selection = CropSelection::with_aspect_ratio(Some(options.effective_ratio()));

        Self {
            options,
            policy: UploadPolicy::default(),
            start_dir: None,
            visible: false,
            confirming: false,
            source: LoadingState::Empty,
            selection,
            preview: None,
            generation: 0,
        }
    }

    pub fn with_policy(mut self, policy: UploadPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> &UploadPolicy {
        &self.policy
    }

    /// Folder the file picker opens in.
    pub fn set_start_dir(&mut self, dir: Option<PathBuf>) {
        self.start_dir = dir;
    }

    /// Change the crop box ratio. A loaded image gets a fresh fitted box.
    pub fn set_aspect_ratio(&mut self, ratio: f32) {
        self.options.aspect_ratio = Some(ratio);
        self.selection
            .set_aspect_ratio(Some(self.options.effective_ratio()));

        if let Some(source) = self.source.ready() {
            self.selection
                .fit_to_image(source.width as f32, source.height as f32);
        }
    }

    pub fn set_show_guides(&mut self, show: bool) {
        self.options.show_guides = show;
    }

    pub fn options(&self) -> &CropperOptions<M> {
        &self.options
    }

    pub fn is_dialog_open(&self) -> bool {
        self.visible
    }

    pub fn is_confirming(&self) -> bool {
        self.confirming
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn source(&self) -> &LoadingState<Arc<SourceImage>> {
        &self.source
    }

    pub fn selection(&self) -> &CropSelection {
        &self.selection
    }

    pub fn preview(&self) -> Option<&CroppedPreview> {
        self.preview.as_ref()
    }

    pub fn update(&mut self, message: Message) -> Vec<Output<M>> {
        match message {
            Message::Browse => {
                if self.visible {
                    return Vec::new();
                }
                vec![Output::Job(Job::PickFile {
                    directory: self.start_dir.clone(),
                })]
            }

            Message::FileSelected(file) => match self.policy.validate(&file) {
                Ok(format) => {
                    tracing::info!("opening {} ({format}, {} bytes)", file.name, file.size);

                    self.generation += 1;
                    self.visible = true;
                    self.confirming = false;
                    self.source = LoadingEvent::StartLoading.apply_to_state(self.source.take());
                    self.selection.reset();

                    vec![Output::Job(Job::ReadSource {
                        generation: self.generation,
                        file,
                        max_bytes: self.policy.max_bytes,
                    })]
                }
                Err(err) => {
                    tracing::warn!("rejected {}: {err}", file.name);
                    vec![Output::Notify(err.into())]
                }
            },

            Message::PickCancelled | Message::BackdropPressed => Vec::new(),

            Message::PickFailed(reason) => {
                tracing::error!("file picker failed: {reason}");
                vec![Output::Notify(Notice::ReadFailed(reason))]
            }

            Message::SourceRead { generation, result } => {
                if generation != self.generation {
                    tracing::debug!("dropping stale read (gen {generation})");
                    return Vec::new();
                }

                match result {
                    Ok(source) => {
                        let (width, height) = source.dimensions();
                        self.source =
                            LoadingEvent::LoadComplete(source).apply_to_state(self.source.take());

                        if self.source.is_ready() {
                            self.selection.fit_to_image(width as f32, height as f32);
                        }
                        Vec::new()
                    }
                    Err(reason) => {
                        tracing::error!("failed to read image: {reason}");
                        self.close_dialog();
                        vec![Output::Notify(Notice::ReadFailed(reason))]
                    }
                }
            }

            Message::CropDragStart { x, y, handle } => {
                if self.can_edit() {
                    if handle == DragHandle::None {
                        self.selection.start_new_selection(x, y);
                    } else {
                        self.selection.start_handle_drag(handle, x, y);
                    }
                }
                Vec::new()
            }

            Message::CropDragMove { x, y } => {
                if self.can_edit()
                    && let Some(source) = self.source.ready()
                {
                    let (width, height) = source.dimensions();
                    self.selection
                        .update_drag(x, y, width as f32, height as f32);
                }
                Vec::new()
            }

            Message::CropDragEnd => {
                self.selection.end_drag();
                Vec::new()
            }

            Message::Confirm => {
                if self.confirming {
                    return Vec::new();
                }

                let Some(source) = self.source.ready().cloned() else {
                    return vec![Output::Notify(Notice::NoImageSelected)];
                };

                let region = self
                    .selection
                    .to_crop_region()
                    .unwrap_or_else(|| self.fitted_region(&source));

                self.confirming = true;

                vec![Output::Job(Job::Crop {
                    generation: self.generation,
                    source,
                    region,
                })]
            }

            Message::Cropped { generation, result } => {
                if generation != self.generation {
                    tracing::debug!("dropping stale crop (gen {generation})");
                    return Vec::new();
                }

                match result {
                    Ok(cropped) => {
                        self.preview = Some(CroppedPreview::from(cropped.as_ref()));
                        let blob: ImageBlob = cropped.blob.clone();
                        self.close_dialog();
                        vec![Output::Emit((self.options.on_cropper_ok)(blob))]
                    }
                    Err(reason) => {
                        tracing::error!("crop failed: {reason}");
                        self.confirming = false;
                        vec![Output::Notify(Notice::CropFailed(reason))]
                    }
                }
            }

            Message::Cancel => {
                self.close_dialog();
                self.options
                    .on_cropper_cancel
                    .as_ref()
                    .map(|f| Output::Emit(f()))
                    .into_iter()
                    .collect()
            }

            Message::Delete => {
                self.preview = None;
                if !self.visible {
                    self.source = LoadingState::Empty;
                }
                self.options
                    .on_image_del
                    .as_ref()
                    .map(|f| Output::Emit(f()))
                    .into_iter()
                    .collect()
            }
        }
    }

    fn can_edit(&self) -> bool {
        self.visible && !self.confirming && self.source.is_ready()
    }

    /// Region used when the box is too small to crop: the centred fit.
    fn fitted_region(&self, source: &SourceImage) -> CropRegion {
        let mut fallback = CropSelection::with_aspect_ratio(self.selection.aspect_ratio);
        fallback.fit_to_image(source.width as f32, source.height as f32);
        fallback
            .to_crop_region()
            .unwrap_or_else(|| CropRegion::new(0, 0, source.width, source.height))
    }

    fn close_dialog(&mut self) {
        self.visible = false;
        self.confirming = false;
        self.source = LoadingEvent::Reset.apply_to_state(self.source.take());
        self.selection.reset();
        self.generation += 1;
    }

    /// The upload area: the placeholder, or the last crop with a delete
    /// button.
    pub fn view(&self) -> Element<'_, Message> {
        let spacing = cosmic::theme::active().cosmic().spacing;
        let style = self.options.style;

        let content: Element<'_, Message> = match &self.preview {
            Some(preview) => {
                let image = widget::image(preview.handle.clone())
                    .content_fit(ContentFit::Contain)
                    .width(Length::Fill)
                    .height(Length::Fill);

                let delete_btn = button::icon(icon::from_name("user-trash-symbolic"))
                    .on_press(Message::Delete)
                    .padding(spacing.space_xxs)
                    .class(cosmic::theme::Button::Destructive);

                let delete_row = row()
                    .push(widget::horizontal_space())
                    .push(delete_btn)
                    .width(Length::Fill);

                cosmic::iced_widget::stack![
                    container(image).center(Length::Fill),
                    container(delete_row)
                        .width(Length::Fill)
                        .align_y(Vertical::Top),
                ]
                .into()
            }
            None => {
                let mut placeholder = column()
                    .spacing(spacing.space_xs)
                    .align_x(Alignment::Center);

                placeholder = placeholder.push(icon::from_name("image-x-generic-symbolic").size(32));

                if let Some(title) = &self.options.empty_title {
                    placeholder = placeholder.push(text::title4(title.clone()));
                }

                let btn_text = self
                    .options
                    .empty_btn_text
                    .clone()
                    .unwrap_or_else(|| fl!("upload-image"));
                placeholder = placeholder.push(text::body(btn_text));

                container(placeholder).center(Length::Fill).into()
            }
        };

        button::custom(content)
            .on_press(Message::Browse)
            .width(Length::Fixed(style.width))
            .height(Length::Fixed(style.height))
            .padding(style.padding)
            .class(cosmic::theme::Button::Image)
            .into()
    }

    /// Modal crop dialog with its click-catching backdrop, or `None` while
    /// closed. Stack it over the host's content.
    pub fn dialog(&self) -> Option<Element<'_, Message>> {
        if !self.visible {
            return None;
        }

        let spacing = cosmic::theme::active().cosmic().spacing;

        let close_btn = button::icon(icon::from_name("window-close-symbolic"))
            .on_press(Message::Cancel)
            .padding(spacing.space_xxs);

        let header = row()
            .push(text::title4(fl!("crop-dialog-title")))
            .push(widget::horizontal_space())
            .push(close_btn)
            .align_y(Alignment::Center)
            .width(Length::Fill);

        let body: Element<'_, Message> = match &self.source {
            LoadingState::Ready(source) => crop_widget(
                source.handle.clone(),
                source.width,
                source.height,
                &self.selection,
            )
            .show_guides(self.options.show_guides)
            .on_drag_start(|x, y, handle| Message::CropDragStart { x, y, handle })
            .on_drag_move(|x, y| Message::CropDragMove { x, y })
            .on_drag_end(Message::CropDragEnd)
            .into(),
            LoadingState::Loading => container(text::body(fl!("crop-loading")))
                .center(Length::Fill)
                .into(),
            LoadingState::Empty => {
                Space::new(Length::Fill, Length::Fill).into()
            }
        };

        let crop_area = container(body)
            .width(Length::Fill)
            .height(Length::Fixed(CROP_AREA_HEIGHT));

        let cancel_btn = button::standard(fl!("crop-cancel")).on_press(Message::Cancel);

        let ok_label = if self.confirming {
            fl!("crop-confirming")
        } else {
            fl!("crop-ok")
        };
        let ok_btn = button::suggested(ok_label).on_press_maybe(
            (!self.confirming && self.source.is_ready()).then_some(Message::Confirm),
        );

        let footer = row()
            .push(widget::horizontal_space())
            .push(cancel_btn)
            .push(ok_btn)
            .spacing(spacing.space_s)
            .width(Length::Fill);

        let content = column()
            .push(header)
            .push(crop_area)
            .push(footer)
            .spacing(spacing.space_s);

        let dialog_container = container(content)
            .width(Length::Fixed(DIALOG_WIDTH))
            .padding(spacing.space_m)
            .class(cosmic::theme::Container::Dialog);

        let dialog = container(dialog_container)
            .width(Length::Fill)
            .height(Length::Fill)
            .align_x(Horizontal::Center)
            .align_y(Vertical::Center);

        let backdrop = widget::mouse_area(
            container(Space::new(Length::Fill, Length::Fill))
                .width(Length::Fill)
                .height(Length::Fill)
                .class(cosmic::theme::Container::Transparent),
        )
        .on_press(Message::BackdropPressed);

        Some(cosmic::iced_widget::stack![backdrop, dialog].into())
    }
}

/// Run a [`Job`] off the UI thread. The resulting message goes back into
/// [`ImageCropper::update`].
pub fn perform(job: Job) -> Task<Message> {
    match job {
        Job::PickFile { directory } => cosmic::task::future(async move {
            let extensions = ImageFormat::all_extensions();
            let mut dialog = AsyncFileDialog::new()
                .set_title(fl!("pick-title"))
                .add_filter(fl!("pick-filter"), &extensions);

            if let Some(dir) = directory {
                dialog = dialog.set_directory(dir);
            }

            match dialog.pick_file().await {
                Some(handle) => match SelectedFile::from_path(handle.path()) {
                    Ok(file) => Message::FileSelected(file),
                    Err(err) => Message::PickFailed(err.to_string()),
                },
                None => Message::PickCancelled,
            }
        }),

        Job::ReadSource {
            generation,
            file,
            max_bytes,
        } => cosmic::task::future(async move {
            let result = read_source(file, max_bytes)
                .await
                .map(Arc::new)
                .map_err(|e| e.to_string());
            Message::SourceRead { generation, result }
        }),

        Job::Crop {
            generation,
            source,
            region,
        } => cosmic::task::future(async move {
            let result = crop_source(source, region)
                .await
                .map(Arc::new)
                .map_err(|e| e.to_string());
            Message::Cropped { generation, result }
        }),
    }
}
