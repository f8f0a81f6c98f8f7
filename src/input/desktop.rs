//! Desktop input through winit
//!
//! Window events are translated into native mouse- and touch-family events.
//! Positions are physical window pixels, so the matching host is a
//! [`HeadlessHost`] whose element spans the window's inner size.

use std::time::Instant;

use winit::dpi::PhysicalSize;
use winit::event::{ElementState, MouseButton, TouchPhase, WindowEvent};

use crate::geometry::{Point, Rect};

use super::host::{ElementId, HeadlessHost, PointerEventsSupport};
use super::native::{NativeEvent, TouchPoint};

/// Two left-button releases closer than this produce a `dblclick`
pub const DOUBLE_CLICK_INTERVAL_MS: f64 = 500.0;

/// A host for a window whose surface fills the inner size
pub fn window_host(element: ElementId, inner_size: PhysicalSize<u32>) -> HeadlessHost {
    let bounds = Rect::new(0.0, 0.0, inner_size.width as f32, inner_size.height as f32);
    HeadlessHost::new(PointerEventsSupport::Unsupported).with_element(element, bounds)
}

/// Converts winit window events into [`NativeEvent`]s
#[derive(Debug)]
pub struct WinitTranslator {
    origin: Instant,
    cursor: Point,
    last_release_at: Option<f64>,
}

impl WinitTranslator {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            cursor: Point::zero(),
            last_release_at: None,
        }
    }

    /// Last known cursor position in physical pixels
    pub fn cursor(&self) -> Point {
        self.cursor
    }

    /// Translate with a timestamp taken from the translator's clock
    pub fn translate(&mut self, event: &WindowEvent) -> Vec<NativeEvent> {
        let time_stamp = self.origin.elapsed().as_secs_f64() * 1000.0;
        self.translate_at(event, time_stamp)
    }

    /// Translate with an explicit timestamp in milliseconds
    pub fn translate_at(&mut self, event: &WindowEvent, time_stamp: f64) -> Vec<NativeEvent> {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = Point::new(position.x as f32, position.y as f32);
                vec![self.mouse("mousemove", time_stamp)]
            }
            WindowEvent::CursorLeft { .. } => vec![self.mouse("mouseout", time_stamp)],
            WindowEvent::MouseInput { state, button, .. } => match state {
                ElementState::Pressed => vec![self.mouse("mousedown", time_stamp)],
                ElementState::Released => {
                    let mut events = vec![self.mouse("mouseup", time_stamp)];
                    if *button == MouseButton::Left && self.is_double_click(time_stamp) {
                        events.push(self.mouse("dblclick", time_stamp));
                    }
                    events
                }
            },
            WindowEvent::Touch(touch) => {
                let kind = match touch.phase {
                    TouchPhase::Started => "touchstart",
                    TouchPhase::Moved => "touchmove",
                    TouchPhase::Ended => "touchend",
                    TouchPhase::Cancelled => "touchcancel",
                };
                let point = TouchPoint::new(touch.id, touch.location.x as f32, touch.location.y as f32);
                vec![NativeEvent::touch(kind, vec![point], time_stamp)]
            }
            _ => Vec::new(),
        }
    }

    fn mouse(&self, kind: &str, time_stamp: f64) -> NativeEvent {
        NativeEvent::mouse(kind, self.cursor.x, self.cursor.y, time_stamp)
    }

    fn is_double_click(&mut self, time_stamp: f64) -> bool {
        match self.last_release_at {
            Some(last) if time_stamp - last <= DOUBLE_CLICK_INTERVAL_MS => {
                self.last_release_at = None;
                true
            }
            _ => {
                self.last_release_at = Some(time_stamp);
                false
            }
        }
    }
}

impl Default for WinitTranslator {
    fn default() -> Self {
        Self::new()
    }
}
