mod app;
mod message;

use app::CropboxDemo;
use std::path::PathBuf;

fn main() -> cosmic::iced::Result {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let settings = cosmic::app::Settings::default().size_limits(
        cosmic::iced::Limits::NONE
            .min_width(760.0)
            .min_height(620.0),
    );

    let preselected = std::env::args().nth(1).map(PathBuf::from);

    cosmic::app::run::<CropboxDemo>(settings, preselected)
}
