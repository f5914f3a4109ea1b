#[cfg(test)]
mod tests {
    use cropbox::{CropperOptions, ImageBlob, ImageCropper, Job, Message, Notice, Output};
    use cropbox_image::{SourceImage, crop_source, decode_source, read_source};
    use cropbox_types::{CropRegion, DragHandle};
    use image::{DynamicImage, GenericImageView, Rgba, RgbaImage};
    use shared::{SelectedFile, UploadPolicy};
    use std::{io::Cursor, sync::Arc};

    #[derive(Debug, Clone)]
    enum Host {
        Cropped(ImageBlob),
        Cancelled,
        Deleted,
    }

    fn cropper() -> ImageCropper<Host> {
        ImageCropper::new(
            CropperOptions::new(Host::Cropped)
                .on_cropper_cancel(|| Host::Cancelled)
                .on_image_del(|| Host::Deleted),
        )
    }

    fn gradient(width: u32, height: u32) -> DynamicImage {
        let img = RgbaImage::from_fn(width, height, |x, y| {
            Rgba([(x % 256) as u8, (y % 256) as u8, 64, 255])
        });
        DynamicImage::ImageRgba8(img)
    }

    fn png_source(width: u32, height: u32) -> Arc<SourceImage> {
        let mut bytes = Vec::new();
        gradient(width, height)
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        Arc::new(decode_source("photo.png".into(), &bytes).unwrap())
    }

    fn small_png() -> SelectedFile {
        SelectedFile::new("photo.png".into(), 1024)
    }

    /// Select a file and return the generation of the read job.
    fn select(cropper: &mut ImageCropper<Host>, file: SelectedFile) -> u64 {
        let outputs = cropper.update(Message::FileSelected(file));
        match outputs.as_slice() {
            [Output::Job(Job::ReadSource { generation, .. })] => *generation,
            other => panic!("expected a read job, got {other:?}"),
        }
    }

    /// Select a file and deliver an in-memory image for it.
    fn open_with(cropper: &mut ImageCropper<Host>, source: Arc<SourceImage>) -> u64 {
        let generation = select(cropper, small_png());
        let outputs = cropper.update(Message::SourceRead {
            generation,
            result: Ok(source),
        });
        assert!(outputs.is_empty());
        generation
    }

    fn confirm(cropper: &mut ImageCropper<Host>) -> (u64, Arc<SourceImage>, CropRegion) {
        let outputs = cropper.update(Message::Confirm);
        match outputs.into_iter().next() {
            Some(Output::Job(Job::Crop {
                generation,
                source,
                region,
            })) => (generation, source, region),
            other => panic!("expected a crop job, got {other:?}"),
        }
    }

    #[test]
    fn test_file_at_limit_is_rejected() {
        let mut cropper = cropper();
        let file = SelectedFile::new("big.png".into(), 2 * 1024 * 1024);

        let outputs = cropper.update(Message::FileSelected(file));

        assert!(matches!(
            outputs.as_slice(),
            [Output::Notify(Notice::FileTooLarge { limit_mb: 2 })]
        ));
        assert!(!cropper.is_dialog_open());
        assert!(cropper.source().is_empty());
        assert_eq!(cropper.generation(), 0);
    }

    #[test]
    fn test_file_just_under_limit_is_accepted() {
        let mut cropper = cropper();
        let file = SelectedFile::new("photo.jpeg".into(), 2 * 1024 * 1024 - 1);

        select(&mut cropper, file);

        assert!(cropper.is_dialog_open());
        assert!(cropper.source().is_loading());
    }

    #[test]
    fn test_unsupported_type_is_rejected() {
        let mut cropper = cropper();
        let file = SelectedFile::new("anim.gif".into(), 100);

        let outputs = cropper.update(Message::FileSelected(file));

        assert!(matches!(
            outputs.as_slice(),
            [Output::Notify(Notice::UnsupportedType(name))] if name == "anim.gif"
        ));
        assert!(!cropper.is_dialog_open());
    }

    #[test]
    fn test_extension_match_ignores_case() {
        let mut cropper = cropper();
        select(&mut cropper, SelectedFile::new("PHOTO.JPG".into(), 10));
        assert!(cropper.is_dialog_open());
    }

    #[test]
    fn test_confirm_without_image_only_notifies() {
        let mut cropper = cropper();

        let outputs = cropper.update(Message::Confirm);

        assert!(matches!(
            outputs.as_slice(),
            [Output::Notify(Notice::NoImageSelected)]
        ));
        assert!(!cropper.is_confirming());
        assert!(cropper.preview().is_none());
    }

    #[test]
    fn test_confirm_while_loading_only_notifies() {
        let mut cropper = cropper();
        select(&mut cropper, small_png());

        let outputs = cropper.update(Message::Confirm);

        assert!(matches!(
            outputs.as_slice(),
            [Output::Notify(Notice::NoImageSelected)]
        ));
        assert!(cropper.is_dialog_open());
    }

    #[test]
    fn test_browse_requests_picker_only_when_closed() {
        let mut cropper = cropper();

        let outputs = cropper.update(Message::Browse);
        assert!(matches!(
            outputs.as_slice(),
            [Output::Job(Job::PickFile { .. })]
        ));

        select(&mut cropper, small_png());
        assert!(cropper.update(Message::Browse).is_empty());
    }

    #[test]
    fn test_pick_cancel_changes_nothing() {
        let mut cropper = cropper();
        assert!(cropper.update(Message::PickCancelled).is_empty());
        assert!(!cropper.is_dialog_open());
        assert_eq!(cropper.generation(), 0);
    }

    #[test]
    fn test_loaded_image_gets_fitted_selection() {
        let mut cropper = cropper();
        open_with(&mut cropper, png_source(400, 305));

        assert!(cropper.source().is_ready());
        let region = cropper.selection().to_crop_region().unwrap();
        assert_eq!((region.width, region.height), (400, 225));
    }

    #[test]
    fn test_invalid_ratio_uses_widescreen() {
        let mut cropper = ImageCropper::new(CropperOptions::new(Host::Cropped).aspect_ratio(-2.0));
        open_with(&mut cropper, png_source(400, 305));

        let region = cropper.selection().to_crop_region().unwrap();
        assert_eq!((region.width, region.height), (400, 225));
    }

    #[test]
    fn test_square_ratio() {
        let mut cropper = ImageCropper::new(CropperOptions::new(Host::Cropped).aspect_ratio(1.0));
        open_with(&mut cropper, png_source(400, 305));

        let region = cropper.selection().to_crop_region().unwrap();
        assert_eq!(region.width, region.height);
        assert_eq!(region.height, 305);
    }

    #[test]
    fn test_stale_read_is_ignored() {
        let mut cropper = cropper();
        let first = select(&mut cropper, small_png());
        let second = select(&mut cropper, SelectedFile::new("other.png".into(), 10));
        assert!(second > first);

        let outputs = cropper.update(Message::SourceRead {
            generation: first,
            result: Ok(png_source(20, 20)),
        });

        assert!(outputs.is_empty());
        assert!(cropper.source().is_loading());
    }

    #[test]
    fn test_read_failure_closes_dialog() {
        let mut cropper = cropper();
        let generation = select(&mut cropper, small_png());

        let outputs = cropper.update(Message::SourceRead {
            generation,
            result: Err("corrupt".into()),
        });

        assert!(matches!(
            outputs.as_slice(),
            [Output::Notify(Notice::ReadFailed(_))]
        ));
        assert!(!cropper.is_dialog_open());
        assert!(cropper.source().is_empty());
    }

    #[test]
    fn test_cancel_emits_and_resets() {
        let mut cropper = cropper();
        let generation = open_with(&mut cropper, png_source(64, 36));

        let outputs = cropper.update(Message::Cancel);

        assert!(matches!(outputs.as_slice(), [Output::Emit(Host::Cancelled)]));
        assert!(!cropper.is_dialog_open());
        assert!(cropper.source().is_empty());
        assert!(!cropper.selection().has_selection());
        assert!(cropper.generation() > generation);
    }

    #[test]
    fn test_cancel_without_callback_is_silent() {
        let mut cropper: ImageCropper<Host> = ImageCropper::new(CropperOptions::new(Host::Cropped));
        open_with(&mut cropper, png_source(64, 36));

        assert!(cropper.update(Message::Cancel).is_empty());
        assert!(!cropper.is_dialog_open());
    }

    #[test]
    fn test_read_after_cancel_is_dropped() {
        let mut cropper = cropper();
        let generation = select(&mut cropper, small_png());
        cropper.update(Message::Cancel);

        let outputs = cropper.update(Message::SourceRead {
            generation,
            result: Ok(png_source(20, 20)),
        });

        assert!(outputs.is_empty());
        assert!(!cropper.is_dialog_open());
        assert!(cropper.source().is_empty());
    }

    #[test]
    fn test_backdrop_does_not_close() {
        let mut cropper = cropper();
        open_with(&mut cropper, png_source(64, 36));

        assert!(cropper.update(Message::BackdropPressed).is_empty());
        assert!(cropper.is_dialog_open());
    }

    #[test]
    fn test_drag_ignored_until_ready() {
        let mut cropper = cropper();
        select(&mut cropper, small_png());

        cropper.update(Message::CropDragStart {
            x: 5.0,
            y: 5.0,
            handle: DragHandle::None,
        });

        assert!(cropper.selection().region.is_none());
        assert!(!cropper.selection().is_dragging);
    }

    #[test]
    fn test_degenerate_selection_falls_back_to_fit() {
        let mut cropper = cropper();
        open_with(&mut cropper, png_source(400, 305));

        cropper.update(Message::CropDragStart {
            x: 10.0,
            y: 10.0,
            handle: DragHandle::None,
        });
        cropper.update(Message::CropDragEnd);
        assert!(!cropper.selection().has_selection());

        let (_, _, region) = confirm(&mut cropper);
        assert_eq!((region.width, region.height), (400, 225));
    }

    #[test]
    fn test_confirm_twice_runs_one_crop() {
        let mut cropper = cropper();
        open_with(&mut cropper, png_source(64, 36));

        confirm(&mut cropper);
        assert!(cropper.is_confirming());
        assert!(cropper.update(Message::Confirm).is_empty());
    }

    #[test]
    fn test_crop_failure_keeps_dialog_open() {
        let mut cropper = cropper();
        open_with(&mut cropper, png_source(64, 36));
        let (generation, _, _) = confirm(&mut cropper);

        let outputs = cropper.update(Message::Cropped {
            generation,
            result: Err("encoder failed".into()),
        });

        assert!(matches!(
            outputs.as_slice(),
            [Output::Notify(Notice::CropFailed(_))]
        ));
        assert!(cropper.is_dialog_open());
        assert!(!cropper.is_confirming());
        assert!(cropper.source().is_ready());
    }

    #[tokio::test]
    async fn test_confirm_emits_cropped_png() {
        let mut cropper = cropper();
        open_with(&mut cropper, png_source(400, 305));

        let (generation, source, region) = confirm(&mut cropper);
        let cropped = crop_source(source, region).await.unwrap();

        let outputs = cropper.update(Message::Cropped {
            generation,
            result: Ok(Arc::new(cropped)),
        });

        let blob = match outputs.as_slice() {
            [Output::Emit(Host::Cropped(blob))] => blob.clone(),
            other => panic!("expected the cropped blob, got {other:?}"),
        };

        assert_eq!(blob.mime(), "image/png");
        let decoded = image::load_from_memory(&blob.data).unwrap();
        assert_eq!(decoded.dimensions(), (400, 225));

        assert!(!cropper.is_dialog_open());
        assert!(!cropper.is_confirming());
        assert!(cropper.source().is_empty());

        let preview = cropper.preview().unwrap();
        assert_eq!((preview.width, preview.height), (400, 225));
        assert!(preview.data_url.starts_with("data:image/png;base64,"));
    }

    #[tokio::test]
    async fn test_crop_result_after_cancel_is_dropped() {
        let mut cropper = cropper();
        open_with(&mut cropper, png_source(64, 36));
        let (generation, source, region) = confirm(&mut cropper);

        cropper.update(Message::Cancel);
        let cropped = crop_source(source, region).await.unwrap();
        let outputs = cropper.update(Message::Cropped {
            generation,
            result: Ok(Arc::new(cropped)),
        });

        assert!(outputs.is_empty());
        assert!(cropper.preview().is_none());
    }

    #[tokio::test]
    async fn test_delete_clears_preview() {
        let mut cropper = cropper();
        open_with(&mut cropper, png_source(64, 36));
        let (generation, source, region) = confirm(&mut cropper);
        let cropped = crop_source(source, region).await.unwrap();
        cropper.update(Message::Cropped {
            generation,
            result: Ok(Arc::new(cropped)),
        });
        assert!(cropper.preview().is_some());

        let outputs = cropper.update(Message::Delete);

        assert!(matches!(outputs.as_slice(), [Output::Emit(Host::Deleted)]));
        assert!(cropper.preview().is_none());
    }

    #[tokio::test]
    async fn test_picked_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Holiday.PNG");
        gradient(160, 90)
            .save_with_format(&path, image::ImageFormat::Png)
            .unwrap();

        let mut cropper = cropper();
        let file = SelectedFile::from_path(&path).unwrap();
        let outputs = cropper.update(Message::FileSelected(file));

        let (generation, file) = match outputs.into_iter().next() {
            Some(Output::Job(Job::ReadSource {
                generation,
                file,
                max_bytes,
            })) => {
                assert_eq!(max_bytes, 2 * 1024 * 1024);
                (generation, file)
            }
            other => panic!("expected a read job, got {other:?}"),
        };

        let source = read_source(file, 2 * 1024 * 1024).await.map(Arc::new).map_err(|e| e.to_string());
        cropper.update(Message::SourceRead {
            generation,
            result: source,
        });

        assert!(cropper.source().is_ready());
        let region = cropper.selection().to_crop_region().unwrap();
        assert_eq!((region.width, region.height), (160, 90));
    }

    #[test]
    fn test_pick_failure_notifies() {
        let mut cropper = cropper();

        let outputs = cropper.update(Message::PickFailed("permission denied".into()));

        assert!(matches!(
            outputs.as_slice(),
            [Output::Notify(Notice::ReadFailed(reason))] if reason == "permission denied"
        ));
        assert!(!cropper.is_dialog_open());
        assert_eq!(cropper.generation(), 0);
    }

    #[test]
    fn test_rejected_files_start_no_jobs() {
        let mut cropper = cropper();

        for file in [
            SelectedFile::new("anim.gif".into(), 10),
            SelectedFile::new("huge.png".into(), 3 * 1024 * 1024),
        ] {
            let outputs = cropper.update(Message::FileSelected(file));
            assert!(!outputs.iter().any(|o| matches!(o, Output::Job(_))));
        }
    }

    #[test]
    fn test_read_job_carries_policy_limit() {
        let mut cropper = ImageCropper::new(CropperOptions::new(Host::Cropped))
            .with_policy(UploadPolicy::default().with_max_bytes(4096));

        let outputs = cropper.update(Message::FileSelected(SelectedFile::new(
            "photo.png".into(),
            100,
        )));

        assert!(matches!(
            outputs.as_slice(),
            [Output::Job(Job::ReadSource { max_bytes: 4096, .. })]
        ));
    }

    #[test]
    fn test_move_drag_keeps_box_inside_image() {
        let mut cropper = cropper();
        open_with(&mut cropper, png_source(400, 305));

        cropper.update(Message::CropDragStart {
            x: 200.0,
            y: 150.0,
            handle: DragHandle::Move,
        });
        cropper.update(Message::CropDragMove { x: 200.0, y: 100.0 });
        cropper.update(Message::CropDragEnd);

        let region = cropper.selection().to_crop_region().unwrap();
        assert_eq!(region.y, 0);
        assert_eq!((region.width, region.height), (400, 225));
        assert!(!cropper.selection().is_dragging);
    }

    #[test]
    fn test_drag_ignored_while_confirming() {
        let mut cropper = cropper();
        open_with(&mut cropper, png_source(400, 305));
        let before = cropper.selection().region;

        confirm(&mut cropper);
        cropper.update(Message::CropDragStart {
            x: 200.0,
            y: 150.0,
            handle: DragHandle::Move,
        });
        cropper.update(Message::CropDragMove { x: 200.0, y: 100.0 });

        assert_eq!(cropper.selection().region, before);
        assert!(!cropper.selection().is_dragging);
    }

    #[test]
    fn test_aspect_change_refits_loaded_image() {
        let mut cropper = cropper();
        open_with(&mut cropper, png_source(400, 305));

        cropper.set_aspect_ratio(1.0);

        let region = cropper.selection().to_crop_region().unwrap();
        assert_eq!((region.width, region.height), (305, 305));
    }

    #[test]
    fn test_delete_without_callback_is_silent() {
        let mut cropper: ImageCropper<Host> = ImageCropper::new(CropperOptions::new(Host::Cropped));

        assert!(cropper.update(Message::Delete).is_empty());
        assert!(cropper.preview().is_none());
    }

    #[test]
    fn test_delete_keeps_open_dialog_image() {
        let mut cropper = cropper();
        open_with(&mut cropper, png_source(64, 36));

        let outputs = cropper.update(Message::Delete);

        assert!(matches!(outputs.as_slice(), [Output::Emit(Host::Deleted)]));
        assert!(cropper.is_dialog_open());
        assert!(cropper.source().is_ready());
    }
}
