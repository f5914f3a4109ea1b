use serde::{Deserialize, Serialize};
use shared::AspectRatio;

/// Smallest side, in image pixels, a resize can shrink the crop box to.
pub const MIN_CROP_SIZE: f32 = 10.0;

/// Region to cut out of the source image, in whole pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRegion {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// Shrink the region so it lies inside an image of the given size.
    /// `None` when nothing of it is left.
    pub fn clamp_to(self, img_width: u32, img_height: u32) -> Option<Self> {
        if self.x >= img_width || self.y >= img_height {
            return None;
        }

        let width = self.width.min(img_width - self.x);
        let height = self.height.min(img_height - self.y);

        let clamped = Self::new(self.x, self.y, width, height);
        clamped.is_valid().then_some(clamped)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragHandle {
    #[default]
    None,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    Top,
    Bottom,
    Left,
    Right,
    Move,
}

impl DragHandle {
    pub fn is_corner(self) -> bool {
        matches!(
            self,
            DragHandle::TopLeft
                | DragHandle::TopRight
                | DragHandle::BottomLeft
                | DragHandle::BottomRight
        )
    }
}

/// Crop box state in image coordinates.
///
/// With an aspect ratio set, every drag keeps `width / height` equal to it
/// and the box never leaves the image.
#[derive(Debug, Clone, Default)]
pub struct CropSelection {
    pub region: Option<(f32, f32, f32, f32)>,
    pub is_dragging: bool,
    pub drag_handle: DragHandle,
    pub drag_start: Option<(f32, f32)>,
    pub drag_start_region: Option<(f32, f32, f32, f32)>,
    pub aspect_ratio: Option<AspectRatio>,
}

impl CropSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_aspect_ratio(aspect_ratio: Option<AspectRatio>) -> Self {
        Self {
            aspect_ratio,
            ..Self::default()
        }
    }

    pub fn set_aspect_ratio(&mut self, aspect_ratio: Option<AspectRatio>) {
        self.aspect_ratio = aspect_ratio;
    }

    /// Largest centred box with the locked ratio, or the whole image when
    /// the ratio is free.
    pub fn fit_to_image(&mut self, img_width: f32, img_height: f32) {
        let (w, h) = match self.aspect_ratio {
            Some(ratio) => ratio.fit_within(img_width, img_height),
            None => (img_width.max(0.0), img_height.max(0.0)),
        };

        let x = (img_width - w) / 2.0;
        let y = (img_height - h) / 2.0;

        self.region = Some((x, y, w, h));
        self.is_dragging = false;
        self.drag_handle = DragHandle::None;
        self.drag_start = None;
        self.drag_start_region = None;
    }

    pub fn start_new_selection(&mut self, x: f32, y: f32) {
        self.region = Some((x, y, 0.0, 0.0));
        self.is_dragging = true;
        self.drag_handle = DragHandle::None;
        self.drag_start = Some((x, y));
        self.drag_start_region = None;
    }

    pub fn start_handle_drag(&mut self, handle: DragHandle, x: f32, y: f32) {
        self.is_dragging = true;
        self.drag_handle = handle;
        self.drag_start = Some((x, y));
        self.drag_start_region = self.region;
    }

    pub fn update_drag(&mut self, x: f32, y: f32, img_width: f32, img_height: f32) {
        if !self.is_dragging {
            return;
        }

        match self.drag_handle {
            DragHandle::None => {
                if let Some((start_x, start_y)) = self.drag_start {
                    self.region = Some(self.draw_region(
                        start_x, start_y, x, y, img_width, img_height,
                    ));
                }
            }
            DragHandle::Move => {
                if let (Some((start_x, start_y)), Some((rx, ry, rw, rh))) =
                    (self.drag_start, self.drag_start_region)
                {
                    let dx = x - start_x;
                    let dy = y - start_y;
                    let new_x = (rx + dx).max(0.0).min((img_width - rw).max(0.0));
                    let new_y = (ry + dy).max(0.0).min((img_height - rh).max(0.0));
                    self.region = Some((new_x, new_y, rw, rh));
                }
            }
            _ => {
                if let Some(start_region) = self.drag_start_region {
                    let free = self.resize_region(start_region, x, y, img_width, img_height);
                    self.region = Some(match self.aspect_ratio {
                        Some(ratio) => self.lock_ratio(
                            ratio,
                            start_region,
                            free,
                            img_width,
                            img_height,
                        ),
                        None => free,
                    });
                }
            }
        }
    }

    /// Box spanned from the press point to the cursor.
    fn draw_region(
        &self,
        start_x: f32,
        start_y: f32,
        x: f32,
        y: f32,
        img_width: f32,
        img_height: f32,
    ) -> (f32, f32, f32, f32) {
        let x = x.max(0.0).min(img_width);
        let y = y.max(0.0).min(img_height);

        let Some(ratio) = self.aspect_ratio else {
            let min_x = start_x.min(x).max(0.0);
            let min_y = start_y.min(y).max(0.0);
            let max_x = start_x.max(x).min(img_width);
            let max_y = start_y.max(y).min(img_height);

            return (min_x, min_y, max_x - min_x, max_y - min_y);
        };

        let grows_right = x >= start_x;
        let grows_down = y >= start_y;

        let avail_w = if grows_right { img_width - start_x } else { start_x };
        let avail_h = if grows_down { img_height - start_y } else { start_y };

        let w = (x - start_x)
            .abs()
            .max(ratio.width_for((y - start_y).abs()))
            .min(avail_w)
            .min(ratio.width_for(avail_h))
            .max(0.0);
        let h = ratio.height_for(w);

        let left = if grows_right { start_x } else { start_x - w };
        let top = if grows_down { start_y } else { start_y - h };

        (left, top, w, h)
    }

    /// Handle drag without a ratio: the handle follows the cursor, the
    /// opposite side stays put.
    fn resize_region(
        &self,
        (rx, ry, rw, rh): (f32, f32, f32, f32),
        x: f32,
        y: f32,
        img_width: f32,
        img_height: f32,
    ) -> (f32, f32, f32, f32) {
        let right = rx + rw;
        let bottom = ry + rh;
        let x = x.max(0.0).min(img_width);
        let y = y.max(0.0).min(img_height);

        match self.drag_handle {
            DragHandle::TopLeft => {
                let new_x = x.min(right - MIN_CROP_SIZE);
                let new_y = y.min(bottom - MIN_CROP_SIZE);

                (new_x, new_y, right - new_x, bottom - new_y)
            }
            DragHandle::TopRight => {
                let new_right = x.max(rx + MIN_CROP_SIZE);
                let new_y = y.min(bottom - MIN_CROP_SIZE);

                (rx, new_y, new_right - rx, bottom - new_y)
            }
            DragHandle::BottomLeft => {
                let new_x = x.min(right - MIN_CROP_SIZE);
                let new_bottom = y.max(ry + MIN_CROP_SIZE);

                (new_x, ry, right - new_x, new_bottom - ry)
            }
            DragHandle::BottomRight => {
                let new_right = x.max(rx + MIN_CROP_SIZE);
                let new_bottom = y.max(ry + MIN_CROP_SIZE);

                (rx, ry, new_right - rx, new_bottom - ry)
            }
            DragHandle::Top => {
                let new_y = y.min(bottom - MIN_CROP_SIZE);

                (rx, new_y, rw, bottom - new_y)
            }
            DragHandle::Bottom => {
                let new_bottom = y.max(ry + MIN_CROP_SIZE);

                (rx, ry, rw, new_bottom - ry)
            }
            DragHandle::Left => {
                let new_x = x.min(right - MIN_CROP_SIZE);

                (new_x, ry, right - new_x, rh)
            }
            DragHandle::Right => {
                let new_right = x.max(rx + MIN_CROP_SIZE);

                (rx, ry, new_right - rx, rh)
            }
            _ => (rx, ry, rw, rh),
        }
    }

    /// Corners keep the opposite corner anchored, edges keep the centre of
    /// the perpendicular axis.
    fn lock_ratio(
        &self,
        ratio: AspectRatio,
        (rx, ry, rw, rh): (f32, f32, f32, f32),
        (_, _, free_w, free_h): (f32, f32, f32, f32),
        img_width: f32,
        img_height: f32,
    ) -> (f32, f32, f32, f32) {
        let right = rx + rw;
        let bottom = ry + rh;
        let min_w = MIN_CROP_SIZE.max(ratio.width_for(MIN_CROP_SIZE));
        let min_h = MIN_CROP_SIZE.max(ratio.height_for(MIN_CROP_SIZE));

        let handle = self.drag_handle;

        if handle.is_corner() {
            let (avail_w, avail_h) = match handle {
                DragHandle::TopLeft => (right, bottom),
                DragHandle::TopRight => (img_width - rx, bottom),
                DragHandle::BottomLeft => (right, img_height - ry),
                _ => (img_width - rx, img_height - ry),
            };

            let w = free_w
                .max(ratio.width_for(free_h))
                .max(min_w)
                .min(avail_w)
                .min(ratio.width_for(avail_h));
            let h = ratio.height_for(w);

            return match handle {
                DragHandle::TopLeft => (right - w, bottom - h, w, h),
                DragHandle::TopRight => (rx, bottom - h, w, h),
                DragHandle::BottomLeft => (right - w, ry, w, h),
                _ => (rx, ry, w, h),
            };
        }

        match handle {
            DragHandle::Top | DragHandle::Bottom => {
                let cx = rx + rw / 2.0;
                let avail_w = 2.0 * cx.min(img_width - cx);
                let avail_h = if handle == DragHandle::Top {
                    bottom
                } else {
                    img_height - ry
                };

                let h = free_h
                    .max(min_h)
                    .min(avail_h)
                    .min(ratio.height_for(avail_w));
                let w = ratio.width_for(h);
                let top = if handle == DragHandle::Top { bottom - h } else { ry };

                (cx - w / 2.0, top, w, h)
            }
            DragHandle::Left | DragHandle::Right => {
                let cy = ry + rh / 2.0;
                let avail_h = 2.0 * cy.min(img_height - cy);
                let avail_w = if handle == DragHandle::Left {
                    right
                } else {
                    img_width - rx
                };

                let w = free_w
                    .max(min_w)
                    .min(avail_w)
                    .min(ratio.width_for(avail_h));
                let h = ratio.height_for(w);
                let left = if handle == DragHandle::Left { right - w } else { rx };

                (left, cy - h / 2.0, w, h)
            }
            _ => (rx, ry, rw, rh),
        }
    }

    pub fn end_drag(&mut self) {
        self.is_dragging = false;
        self.drag_start = None;
        self.drag_start_region = None;
    }

    pub fn to_crop_region(&self) -> Option<CropRegion> {
        self.region.and_then(|(x, y, w, h)| {
            if w > 1.0 && h > 1.0 {
                Some(CropRegion {
                    x: x.round().max(0.0) as u32,
                    y: y.round().max(0.0) as u32,
                    width: w.round() as u32,
                    height: h.round() as u32,
                })
            } else {
                None
            }
        })
    }

    /// Clear the box and drag state. The aspect ratio is kept.
    pub fn reset(&mut self) {
        *self = Self::with_aspect_ratio(self.aspect_ratio);
    }

    pub fn has_selection(&self) -> bool {
        self.region
            .map(|(_, _, w, h)| w > 1.0 && h > 1.0)
            .unwrap_or(false)
    }
}
