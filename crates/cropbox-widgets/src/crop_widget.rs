//! A self-contained crop widget that renders the image and crop UI together.
//! This ensures all coordinates are consistent since everything is handled internally.

use cosmic::{
    Element, Renderer,
    iced::{
        Color, Length, Point, Rectangle, Size,
        advanced::{
            Clipboard, Layout, Shell, Widget,
            image::Renderer as ImageRenderer,
            layout::{Limits, Node},
            renderer::{Quad, Renderer as QuadRenderer},
            widget::Tree,
        },
        event::{Event, Status},
        mouse::{self, Button, Cursor},
    },
    widget::image::Handle,
};
use cropbox_types::{CropSelection, DragHandle};

const HANDLE_SIZE: f32 = 12.0;
const HANDLE_HIT_SIZE: f32 = 24.0;
const OVERLAY_COLOR: Color = Color::from_rgba(0.0, 0.0, 0.0, 0.5);
const HANDLE_COLOR: Color = Color::WHITE;
const BORDER_COLOR: Color = Color::WHITE;
const BORDER_WIDTH: f32 = 2.0;
const GUIDE_COLOR: Color = Color::from_rgba(1.0, 1.0, 1.0, 0.6);
const GUIDE_WIDTH: f32 = 1.0;

/// A self-contained widget that renders an image with crop selection UI.
/// Handles image rendering, overlay, selection border, resize handles, and all mouse events.
pub struct CropWidget<'a, Message> {
    handle: Handle,
    img_width: u32,
    img_height: u32,
    selection: &'a CropSelection,
    show_guides: bool,
    on_drag_start: Option<Box<dyn Fn(f32, f32, DragHandle) -> Message + 'a>>,
    on_drag_move: Option<Box<dyn Fn(f32, f32) -> Message + 'a>>,
    on_drag_end: Option<Message>,
}

impl<'a, Message> CropWidget<'a, Message> {
    pub fn new(
        handle: Handle,
        img_width: u32,
        img_height: u32,
        selection: &'a CropSelection,
    ) -> Self {
        Self {
            handle,
            img_width,
            img_height,
            selection,
            show_guides: false,
            on_drag_start: None,
            on_drag_move: None,
            on_drag_end: None,
        }
    }

    /// Draw rule-of-thirds lines inside the selection.
    pub fn show_guides(mut self, show: bool) -> Self {
        self.show_guides = show;
        self
    }

    pub fn on_drag_start(mut self, f: impl Fn(f32, f32, DragHandle) -> Message + 'a) -> Self {
        self.on_drag_start = Some(Box::new(f));
        self
    }

    pub fn on_drag_move(mut self, f: impl Fn(f32, f32) -> Message + 'a) -> Self {
        self.on_drag_move = Some(Box::new(f));
        self
    }

    pub fn on_drag_end(mut self, message: Message) -> Self {
        self.on_drag_end = Some(message);
        self
    }

    fn calculate_image_rect(&self, bounds: Rectangle) -> (Rectangle, f32) {
        if self.img_width == 0 || self.img_height == 0 {
            return (Rectangle::new(bounds.center(), Size::ZERO), 1.0);
        }

        let scale_x = bounds.width / self.img_width as f32;
        let scale_y = bounds.height / self.img_height as f32;
        let scale = scale_x.min(scale_y).min(1.0); // Don't upscale

        let img_w = self.img_width as f32 * scale;
        let img_h = self.img_height as f32 * scale;

        let img_x = bounds.x + (bounds.width - img_w) / 2.0;
        let img_y = bounds.y + (bounds.height - img_h) / 2.0;

        (Rectangle::new(Point::new(img_x, img_y), Size::new(img_w, img_h)), scale)
    }

    /// Convert screen coordinates to image coordinates
    fn screen_to_image(&self, img_rect: &Rectangle, scale: f32, point: Point) -> (f32, f32) {
        let x = ((point.x - img_rect.x) / scale)
            .max(0.0)
            .min(self.img_width as f32);
        let y = ((point.y - img_rect.y) / scale)
            .max(0.0)
            .min(self.img_height as f32);
        (x, y)
    }

    /// Convert image coordinates to screen coordinates
    fn image_to_screen(&self, img_rect: &Rectangle, scale: f32, img_x: f32, img_y: f32) -> Point {
        Point::new(img_rect.x + img_x * scale, img_rect.y + img_y * scale)
    }

    /// Selection rectangle in screen coordinates, if it has an area.
    fn selection_rect(&self, img_rect: &Rectangle, scale: f32) -> Option<Rectangle> {
        let (rx, ry, rw, rh) = self.selection.region?;

        if rw <= 0.0 || rh <= 0.0 {
            return None;
        }

        Some(Rectangle::new(
            self.image_to_screen(img_rect, scale, rx, ry),
            Size::new(rw * scale, rh * scale),
        ))
    }

    /// Check which handle (if any) is at the given screen position
    fn hit_test_handle(&self, img_rect: &Rectangle, scale: f32, point: Point) -> DragHandle {
        let Some(sel) = self.selection_rect(img_rect, scale) else {
            return DragHandle::None;
        };

        // Corners are checked before edges
        let handles = [
            (Point::new(sel.x, sel.y), DragHandle::TopLeft),
            (Point::new(sel.x + sel.width, sel.y), DragHandle::TopRight),
            (Point::new(sel.x, sel.y + sel.height), DragHandle::BottomLeft),
            (
                Point::new(sel.x + sel.width, sel.y + sel.height),
                DragHandle::BottomRight,
            ),
            (Point::new(sel.x + sel.width / 2.0, sel.y), DragHandle::Top),
            (
                Point::new(sel.x + sel.width / 2.0, sel.y + sel.height),
                DragHandle::Bottom,
            ),
            (Point::new(sel.x, sel.y + sel.height / 2.0), DragHandle::Left),
            (
                Point::new(sel.x + sel.width, sel.y + sel.height / 2.0),
                DragHandle::Right,
            ),
        ];

        for (pos, handle) in handles {
            if point_in_handle(point, pos) {
                return handle;
            }
        }

        if sel.contains(point) {
            return DragHandle::Move;
        }

        DragHandle::None
    }

    fn cursor_for_handle(&self, handle: DragHandle) -> mouse::Interaction {
        match handle {
            DragHandle::None => mouse::Interaction::Crosshair,
            DragHandle::TopLeft | DragHandle::BottomRight => mouse::Interaction::ResizingDiagonallyDown,
            DragHandle::TopRight | DragHandle::BottomLeft => mouse::Interaction::ResizingDiagonallyUp,
            DragHandle::Top | DragHandle::Bottom => mouse::Interaction::ResizingVertically,
            DragHandle::Left | DragHandle::Right => mouse::Interaction::ResizingHorizontally,
            DragHandle::Move => mouse::Interaction::Grabbing,
        }
    }

    /// Draw the dark overlay regions around the selection
    fn draw_overlay(&self, renderer: &mut Renderer, img_rect: Rectangle, scale: f32) {
        let Some(sel) = self.selection_rect(&img_rect, scale) else {
            // No valid selection - draw full overlay
            draw_quad(renderer, img_rect, OVERLAY_COLOR);
            return;
        };

        // Top region (full width, above selection)
        if sel.y > img_rect.y {
            draw_quad(
                renderer,
                Rectangle::new(
                    img_rect.position(),
                    Size::new(img_rect.width, sel.y - img_rect.y),
                ),
                OVERLAY_COLOR,
            );
        }

        // Bottom region (full width, below selection)
        let sel_bottom = sel.y + sel.height;
        let img_bottom = img_rect.y + img_rect.height;
        if sel_bottom < img_bottom {
            draw_quad(
                renderer,
                Rectangle::new(
                    Point::new(img_rect.x, sel_bottom),
                    Size::new(img_rect.width, img_bottom - sel_bottom),
                ),
                OVERLAY_COLOR,
            );
        }

        // Left region (between top and bottom overlays)
        if sel.x > img_rect.x {
            draw_quad(
                renderer,
                Rectangle::new(
                    Point::new(img_rect.x, sel.y),
                    Size::new(sel.x - img_rect.x, sel.height),
                ),
                OVERLAY_COLOR,
            );
        }

        // Right region (between top and bottom overlays)
        let sel_right = sel.x + sel.width;
        let img_right = img_rect.x + img_rect.width;
        if sel_right < img_right {
            draw_quad(
                renderer,
                Rectangle::new(
                    Point::new(sel_right, sel.y),
                    Size::new(img_right - sel_right, sel.height),
                ),
                OVERLAY_COLOR,
            );
        }
    }

    fn draw_border(&self, renderer: &mut Renderer, sel: Rectangle) {
        let edges = [
            Rectangle::new(sel.position(), Size::new(sel.width, BORDER_WIDTH)),
            Rectangle::new(
                Point::new(sel.x, sel.y + sel.height - BORDER_WIDTH),
                Size::new(sel.width, BORDER_WIDTH),
            ),
            Rectangle::new(sel.position(), Size::new(BORDER_WIDTH, sel.height)),
            Rectangle::new(
                Point::new(sel.x + sel.width - BORDER_WIDTH, sel.y),
                Size::new(BORDER_WIDTH, sel.height),
            ),
        ];

        for edge in edges {
            draw_quad(renderer, edge, BORDER_COLOR);
        }
    }

    fn draw_guides(&self, renderer: &mut Renderer, sel: Rectangle) {
        if sel.width <= 10.0 || sel.height <= 10.0 {
            return;
        }

        let step_x = sel.width / 3.0;
        let step_y = sel.height / 3.0;

        for i in 1..3 {
            let offset_x = sel.x + step_x * i as f32;
            let offset_y = sel.y + step_y * i as f32;

            draw_quad(
                renderer,
                Rectangle::new(Point::new(offset_x, sel.y), Size::new(GUIDE_WIDTH, sel.height)),
                GUIDE_COLOR,
            );
            draw_quad(
                renderer,
                Rectangle::new(Point::new(sel.x, offset_y), Size::new(sel.width, GUIDE_WIDTH)),
                GUIDE_COLOR,
            );
        }
    }

    fn draw_handles(&self, renderer: &mut Renderer, sel: Rectangle) {
        let handle_half = HANDLE_SIZE / 2.0;
        let handles = [
            (sel.x, sel.y),
            (sel.x + sel.width, sel.y),
            (sel.x, sel.y + sel.height),
            (sel.x + sel.width, sel.y + sel.height),
            (sel.x + sel.width / 2.0, sel.y),
            (sel.x + sel.width / 2.0, sel.y + sel.height),
            (sel.x, sel.y + sel.height / 2.0),
            (sel.x + sel.width, sel.y + sel.height / 2.0),
        ];

        for (hx, hy) in handles {
            draw_quad(
                renderer,
                Rectangle::new(
                    Point::new(hx - handle_half, hy - handle_half),
                    Size::new(HANDLE_SIZE, HANDLE_SIZE),
                ),
                HANDLE_COLOR,
            );
        }
    }
}

fn point_in_handle(point: Point, handle_center: Point) -> bool {
    let half = HANDLE_HIT_SIZE / 2.0;
    point.x >= handle_center.x - half
        && point.x <= handle_center.x + half
        && point.y >= handle_center.y - half
        && point.y <= handle_center.y + half
}

fn draw_quad(renderer: &mut Renderer, bounds: Rectangle, color: Color) {
    renderer.fill_quad(
        Quad {
            bounds,
            ..Quad::default()
        },
        color,
    );
}

impl<'a, Message: Clone> Widget<Message, cosmic::Theme, Renderer> for CropWidget<'a, Message> {
    fn size(&self) -> Size<Length> {
        Size::new(Length::Fill, Length::Fill)
    }

    fn layout(&self, _tree: &mut Tree, _renderer: &Renderer, limits: &Limits) -> Node {
        Node::new(limits.max())
    }

    fn draw(
        &self,
        _tree: &Tree,
        renderer: &mut Renderer,
        _theme: &cosmic::Theme,
        _style: &cosmic::iced::advanced::renderer::Style,
        layout: Layout<'_>,
        _cursor: Cursor,
        _viewport: &Rectangle,
    ) {
        let bounds = layout.bounds();
        let (img_rect, scale) = self.calculate_image_rect(bounds);

        renderer.draw_image(
            self.handle.clone(),
            cosmic::iced::widget::image::FilterMethod::Linear,
            img_rect,
            cosmic::iced::Radians(0.0),
            1.0,
            [0.0; 4],
        );

        renderer.with_layer(img_rect, |renderer| {
            self.draw_overlay(renderer, img_rect, scale);

            if let Some(sel) = self.selection_rect(&img_rect, scale) {
                if self.show_guides {
                    self.draw_guides(renderer, sel);
                }
                self.draw_border(renderer, sel);
                self.draw_handles(renderer, sel);
            }
        });
    }

    fn on_event(
        &mut self,
        _tree: &mut Tree,
        event: Event,
        layout: Layout<'_>,
        cursor: Cursor,
        _renderer: &Renderer,
        _clipboard: &mut dyn Clipboard,
        shell: &mut Shell<'_, Message>,
        _viewport: &Rectangle,
    ) -> Status {
        let bounds = layout.bounds();
        let (img_rect, scale) = self.calculate_image_rect(bounds);

        match event {
            Event::Mouse(mouse::Event::ButtonPressed(Button::Left)) => {
                if let Some(pos) = cursor.position()
                    && img_rect.contains(pos)
                    && let Some(on_drag_start) = &self.on_drag_start
                {
                    // Handle hit resizes/moves, anything else starts a new box
                    let handle = self.hit_test_handle(&img_rect, scale, pos);
                    let (img_x, img_y) = self.screen_to_image(&img_rect, scale, pos);
                    shell.publish(on_drag_start(img_x, img_y, handle));
                    return Status::Captured;
                }
            }
            Event::Mouse(mouse::Event::CursorMoved { .. }) => {
                if self.selection.is_dragging
                    && let Some(pos) = cursor.position()
                    && let Some(on_drag_move) = &self.on_drag_move
                {
                    let (img_x, img_y) = self.screen_to_image(&img_rect, scale, pos);
                    shell.publish(on_drag_move(img_x, img_y));
                    return Status::Captured;
                }
            }
            Event::Mouse(mouse::Event::ButtonReleased(Button::Left)) => {
                if self.selection.is_dragging
                    && let Some(on_drag_end) = &self.on_drag_end
                {
                    shell.publish(on_drag_end.clone());
                    return Status::Captured;
                }
            }
            _ => {}
        }

        Status::Ignored
    }

    fn mouse_interaction(
        &self,
        _tree: &Tree,
        layout: Layout<'_>,
        cursor: Cursor,
        _viewport: &Rectangle,
        _renderer: &Renderer,
    ) -> mouse::Interaction {
        let bounds = layout.bounds();
        let (img_rect, scale) = self.calculate_image_rect(bounds);

        if self.selection.is_dragging {
            return self.cursor_for_handle(self.selection.drag_handle);
        }

        if let Some(pos) = cursor.position()
            && img_rect.contains(pos)
        {
            let handle = self.hit_test_handle(&img_rect, scale, pos);
            if handle != DragHandle::None {
                return self.cursor_for_handle(handle);
            }
            return mouse::Interaction::Crosshair;
        }

        mouse::Interaction::default()
    }
}

impl<'a, Message: Clone + 'a> From<CropWidget<'a, Message>> for Element<'a, Message> {
    fn from(widget: CropWidget<'a, Message>) -> Self {
        Self::new(widget)
    }
}

/// Helper function to create a CropWidget
pub fn crop_widget<'a, Message>(
    handle: Handle,
    img_width: u32,
    img_height: u32,
    selection: &'a CropSelection,
) -> CropWidget<'a, Message> {
    CropWidget::new(handle, img_width, img_height, selection)
}
