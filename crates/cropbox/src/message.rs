use cropbox::ImageBlob;
use cropbox_config::{AppTheme, AspectPreset};
use cosmic::widget::ToastId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextPage {
    About,
    Settings,
}

#[derive(Debug, Clone)]
pub enum Message {
    Cropper(cropbox::Message),
    Cropped(ImageBlob),
    CropCancelled,
    ImageDeleted,
    Settings(SettingsMessage),
    ToggleContextPage(ContextPage),
    CloseToast(ToastId),
}

#[derive(Debug, Clone)]
pub enum SettingsMessage {
    AppTheme(AppTheme),
    AspectPreset(AspectPreset),
    ShowGuides(bool),
    RememberLastDir(bool),
}
