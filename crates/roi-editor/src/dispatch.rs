//! Priority-ordered handler chain.
//!
//! Several input handlers share one pointer stream: the curve editor, the
//! host's chart panning, a context menu. Each handler answers an event with a
//! [`Response`] stating what it wants to claim. [`dispatch`] walks the
//! handlers in priority order and keeps the first claim of each kind:
//!
//! | Claim            | Resolution                                   |
//! |------------------|----------------------------------------------|
//! | cursor           | first handler that proposes one              |
//! | drag             | first handler that handled the drag          |
//! | secondary click  | first handler that reserves it               |
//!
//! Handlers see the claims made before them and are expected to stand down
//! (for example, not pan the chart once a drag has been taken).

use crate::input::InputEvent;

/// Pointer cursor requested from the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cursor {
    Default,
    /// Drawing on empty space.
    Crosshair,
    /// Translating a whole curve.
    Move,
    /// Dragging a free vertex.
    ResizeAll,
    ResizeHorizontal,
    ResizeVertical,
}

/// What one handler wants to claim for one event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Response {
    pub cursor: Option<Cursor>,
    pub drag_handled: bool,
    /// Keep competing consumers (context menus) away from this secondary
    /// click.
    pub reserve_secondary_click: bool,
}

impl Response {
    pub fn cursor(cursor: Cursor) -> Self {
        Self {
            cursor: Some(cursor),
            ..Self::default()
        }
    }
}

/// Claims accepted so far, with the index of the winning handler.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Claims {
    pub cursor: Option<(usize, Cursor)>,
    pub drag: Option<usize>,
    pub secondary_click: Option<usize>,
}

impl Claims {
    pub fn cursor(&self) -> Option<Cursor> {
        self.cursor.map(|(_, c)| c)
    }

    pub fn is_secondary_click_reserved(&self) -> bool {
        self.secondary_click.is_some()
    }

    fn accept(&mut self, index: usize, response: Response) {
        if self.cursor.is_none()
            && let Some(cursor) = response.cursor
        {
            self.cursor = Some((index, cursor));
        }
        if self.drag.is_none() && response.drag_handled {
            self.drag = Some(index);
        }
        if self.secondary_click.is_none() && response.reserve_secondary_click {
            self.secondary_click = Some(index);
        }
    }
}

/// A participant in the handler chain.
pub trait InputHandler {
    /// Handle `event`, given the claims accepted from higher-priority
    /// handlers.
    fn handle(&mut self, event: &InputEvent, claims: &Claims) -> Response;
}

/// Offer `event` to `handlers` in priority order (index 0 first).
pub fn dispatch(event: &InputEvent, handlers: &mut [&mut dyn InputHandler]) -> Claims {
    let mut claims = Claims::default();
    for (index, handler) in handlers.iter_mut().enumerate() {
        let response = handler.handle(event, &claims);
        claims.accept(index, response);
    }
    if let Some((index, cursor)) = claims.cursor {
        log::trace!("cursor {cursor:?} claimed by handler {index}");
    }
    claims
}
