//! Demo host for the crop control

use crate::message::{ContextPage, Message, SettingsMessage};
use cosmic::{
    Action, Application, ApplicationExt, Core, Element, Task,
    app::context_drawer,
    cosmic_config::{Config, CosmicConfigEntry},
    iced::{Alignment, Length},
    iced_widget::toggler,
    widget::{self, Toast, Toasts, button, column, container, dropdown, icon, settings, text},
};
use cropbox::{CropperOptions, ImageBlob, ImageCropper, Job, Notice, NoticeLevel, Output, fl};
use cropbox_config::{AppTheme, AspectPreset, CropboxConfig};
use shared::SelectedFile;
use std::path::PathBuf;

pub struct CropboxDemo {
    core: Core,
    config: CropboxConfig,
    config_handler: Option<Config>,
    cropper: ImageCropper<Message>,
    toasts: Toasts<Message>,
    context_page: Option<ContextPage>,
    last_blob: Option<ImageBlob>,
}

impl CropboxDemo {
    pub const APP_ID: &'static str = "org.codeberg.bhh32.Cropbox";

    fn save_config(&self) {
        if let Some(ref handler) = self.config_handler
            && let Err(err) = self.config.write_entry(handler)
        {
            tracing::warn!("failed to save config: {err}");
        }
    }

    fn start_dir(&self) -> Option<PathBuf> {
        let remembered = if self.config.remember_last_dir {
            self.config.last_dir.as_ref().map(PathBuf::from)
        } else {
            None
        };
        remembered.or_else(dirs::picture_dir)
    }

    /// Feed a message to the cropper and turn its outputs into tasks.
    fn update_cropper(&mut self, message: cropbox::Message) -> Task<Action<Message>> {
        let mut tasks = Vec::new();
        for output in self.cropper.update(message) {
            match output {
                Output::Emit(msg) => tasks.push(self.update(msg)),
                Output::Notify(notice) => tasks.push(self.show_notice(notice)),
                Output::Job(job) => {
                    // Only files the cropper accepted update the start folder
                    if let Job::ReadSource { ref file, .. } = job {
                        self.remember_dir(file);
                    }
                    tasks.push(cropbox::perform(job).map(|msg| Action::App(Message::Cropper(msg))));
                }
            }
        }

        Task::batch(tasks)
    }

    fn remember_dir(&mut self, file: &SelectedFile) {
        if !self.config.remember_last_dir {
            return;
        }

        if let Some(parent) = file.path.parent() {
            self.config.last_dir = Some(parent.to_string_lossy().to_string());
            self.cropper.set_start_dir(Some(parent.to_path_buf()));
            self.save_config();
        }
    }

    fn show_notice(&mut self, notice: Notice) -> Task<Action<Message>> {
        match notice.level() {
            NoticeLevel::Warning => tracing::warn!("{notice:?}"),
            NoticeLevel::Error => tracing::error!("{notice:?}"),
        }

        self.toasts.push(Toast::new(notice.text())).map(Action::App)
    }

    fn about_page(&self) -> Element<'_, Message> {
        column()
            .push(text::title3(fl!("app-title")))
            .push(text::body(fl!("app-description")))
            .push(text::caption(format!("Version {}", env!("CARGO_PKG_VERSION"))))
            .spacing(cosmic::theme::active().cosmic().spacing.space_s)
            .into()
    }

    fn settings_page(&self) -> Element<'_, Message> {
        let sections: Vec<Element<'_, Message>> = vec![
            settings::section()
                .title(fl!("settings-appearance"))
                .add(settings::item(
                    fl!("settings-theme"),
                    dropdown(
                        AppTheme::ALL
                            .iter()
                            .map(|t| t.to_string())
                            .collect::<Vec<_>>(),
                        AppTheme::ALL
                            .iter()
                            .position(|t| *t == self.config.app_theme),
                        |idx| Message::Settings(SettingsMessage::AppTheme(AppTheme::ALL[idx])),
                    ),
                ))
                .into(),
            settings::section()
                .title(fl!("settings-crop"))
                .add(settings::item(
                    fl!("settings-aspect-ratio"),
                    dropdown(
                        AspectPreset::ALL
                            .iter()
                            .map(|p| p.to_string())
                            .collect::<Vec<_>>(),
                        AspectPreset::ALL
                            .iter()
                            .position(|p| *p == self.config.aspect_preset),
                        |idx| {
                            Message::Settings(SettingsMessage::AspectPreset(AspectPreset::ALL[idx]))
                        },
                    ),
                ))
                .add(settings::item(
                    fl!("settings-show-guides"),
                    toggler(self.config.show_guides)
                        .on_toggle(|show| Message::Settings(SettingsMessage::ShowGuides(show))),
                ))
                .into(),
            settings::section()
                .title(fl!("settings-files"))
                .add(settings::item(
                    fl!("settings-remember-dir"),
                    toggler(self.config.remember_last_dir).on_toggle(|remember| {
                        Message::Settings(SettingsMessage::RememberLastDir(remember))
                    }),
                ))
                .add(settings::item(
                    fl!("settings-upload-limit"),
                    text::body(format!("{} MB", self.cropper.policy().max_megabytes())),
                ))
                .into(),
        ];

        settings::view_column(sections).into()
    }

    fn blob_summary(&self) -> Element<'_, Message> {
        let summary = match &self.last_blob {
            Some(blob) => fl!(
                "blob-info",
                mime = blob.mime(),
                size = blob.len().to_string()
            ),
            None => fl!("blob-none"),
        };
        text::caption(summary).into()
    }
}

impl Application for CropboxDemo {
    type Executor = cosmic::executor::Default;
    type Flags = Option<PathBuf>;
    type Message = Message;

    const APP_ID: &'static str = Self::APP_ID;

    fn core(&self) -> &Core {
        &self.core
    }

    fn core_mut(&mut self) -> &mut Core {
        &mut self.core
    }

    fn init(core: Core, flags: Self::Flags) -> (Self, Task<Action<Self::Message>>) {
        let mut tasks = vec![];

        let (config, config_handler) = match cropbox_config::config() {
            Ok(handler) => {
                let config = match CropboxConfig::get_entry(&handler) {
                    Ok(c) => c,
                    Err((errors, c)) => {
                        tracing::debug!("config incomplete, {} keys defaulted", errors.len());
                        c
                    }
                };
                (config, Some(handler))
            }
            Err(err) => {
                tracing::warn!("config unavailable: {err}");
                (CropboxConfig::default(), None)
            }
        };

        let options = CropperOptions::new(Message::Cropped)
            .empty_title(fl!("empty-title"))
            .aspect_ratio(config.aspect_preset.ratio().value())
            .show_guides(config.show_guides)
            .on_cropper_cancel(|| Message::CropCancelled)
            .on_image_del(|| Message::ImageDeleted);

        let cropper = ImageCropper::new(options).with_policy(config.upload_policy());

        let mut app = Self {
            core,
            config,
            config_handler,
            cropper,
            toasts: Toasts::new(Message::CloseToast),
            context_page: None,
            last_blob: None,
        };

        let start_dir = app.start_dir();
        app.cropper.set_start_dir(start_dir);

        tasks.push(cosmic::command::set_theme(
            app.config.app_theme.to_cosmic_theme(),
        ));

        if let Some(id) = app.core.main_window_id() {
            tasks.push(app.set_window_title(fl!("app-title"), id));
        }

        if let Some(path) = flags {
            match SelectedFile::from_path(&path) {
                Ok(file) => tasks.push(app.update_cropper(cropbox::Message::FileSelected(file))),
                Err(err) => {
                    tasks.push(app.show_notice(Notice::ReadFailed(format!(
                        "{}: {err}",
                        path.display()
                    ))));
                }
            }
        }

        (app, Task::batch(tasks))
    }

    fn header_end(&self) -> Vec<Element<'_, Self::Message>> {
        vec![
            button::icon(icon::from_name("help-about-symbolic"))
                .on_press(Message::ToggleContextPage(ContextPage::About))
                .into(),
            button::icon(icon::from_name("preferences-system-symbolic"))
                .on_press(Message::ToggleContextPage(ContextPage::Settings))
                .into(),
        ]
    }

    fn view(&self) -> Element<'_, Self::Message> {
        let spacing = cosmic::theme::active().cosmic().spacing;

        let body = column()
            .push(text::title3(fl!("app-title")))
            .push(text::body(fl!("app-description")))
            .push(self.cropper.view().map(Message::Cropper))
            .push(self.blob_summary())
            .spacing(spacing.space_m)
            .align_x(Alignment::Center);

        let content: Element<'_, Message> = container(body)
            .width(Length::Fill)
            .height(Length::Fill)
            .padding(spacing.space_l)
            .center_x(Length::Fill)
            .into();

        let content = match self.cropper.dialog() {
            Some(dialog) => {
                cosmic::iced_widget::stack![content, dialog.map(Message::Cropper)].into()
            }
            None => content,
        };

        widget::toaster(&self.toasts, content)
    }

    fn update(&mut self, message: Message) -> Task<Action<Self::Message>> {
        match message {
            Message::Cropper(msg) => return self.update_cropper(msg),
            Message::Cropped(blob) => {
                tracing::info!("received cropped image, {} bytes", blob.len());
                self.last_blob = Some(blob);
            }
            Message::CropCancelled => tracing::debug!("crop cancelled"),
            Message::ImageDeleted => {
                tracing::debug!("image removed");
                self.last_blob = None;
            }
            Message::Settings(msg) => {
                match msg {
                    SettingsMessage::AppTheme(theme) => {
                        self.config.app_theme = theme;
                        self.save_config();
                        return cosmic::command::set_theme(theme.to_cosmic_theme());
                    }
                    SettingsMessage::AspectPreset(preset) => {
                        self.config.aspect_preset = preset;
                        self.cropper.set_aspect_ratio(preset.ratio().value());
                    }
                    SettingsMessage::ShowGuides(show) => {
                        self.config.show_guides = show;
                        self.cropper.set_show_guides(show);
                    }
                    SettingsMessage::RememberLastDir(remember) => {
                        self.config.remember_last_dir = remember;
                        if !remember {
                            self.config.last_dir = None;
                        }
                        let start_dir = self.start_dir();
                        self.cropper.set_start_dir(start_dir);
                    }
                }
                self.save_config();
            }
            Message::ToggleContextPage(page) => {
                if self.context_page == Some(page) {
                    self.context_page = None;
                } else {
                    self.context_page = Some(page);
                }
            }
            Message::CloseToast(id) => self.toasts.remove(id),
        }

        Task::none()
    }

    fn context_drawer(&self) -> Option<context_drawer::ContextDrawer<'_, Self::Message>> {
        let page = self.context_page?;
        let content = match page {
            ContextPage::About => self.about_page(),
            ContextPage::Settings => self.settings_page(),
        };

        Some(context_drawer::context_drawer(
            content,
            Message::ToggleContextPage(page),
        ))
    }

    fn on_app_exit(&mut self) -> Option<Self::Message> {
        self.save_config();
        None
    }
}
