//! Specification fixtures.
//!
//! Modelled on a box that follows a dragging pointer but must stay inside
//! a 20..400 region and keep at least a 200x200 size.
//!
//! # Example
//!
//! ```
//! use cassowary_system_test::fixtures::{drag_box_with, Pointer};
//!
//! let pointer = Pointer::at(100.0, 100.0);
//! let spec = drag_box_with(&pointer);
//! assert_eq!(spec.quantities.len(), 4);
//!
//! pointer.move_to(150.0, 90.0);
//! assert_eq!(pointer.position(), (150.0, 90.0));
//! ```

use std::cell::Cell;
use std::rc::Rc;

use cassowary_system_core::{terms, Specification};

/// Shared pointer position read by producer quantities.
#[derive(Debug, Clone, Default)]
pub struct Pointer {
    x: Rc<Cell<f64>>,
    y: Rc<Cell<f64>>,
}

impl Pointer {
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            x: Rc::new(Cell::new(x)),
            y: Rc::new(Cell::new(y)),
        }
    }

    pub fn move_to(&self, x: f64, y: f64) {
        self.x.set(x);
        self.y.set(y);
    }

    pub fn position(&self) -> (f64, f64) {
        (self.x.get(), self.y.get())
    }
}

/// A draggable box with its pointer at (100, 100).
pub fn drag_box() -> Specification {
    drag_box_with(&Pointer::at(100.0, 100.0))
}

/// A draggable box whose `left`/`top` follow `pointer`.
///
/// `right` is offset by -125 so the box may extend past the region on
/// the right by that much.
pub fn drag_box_with(pointer: &Pointer) -> Specification {
    let x = Rc::clone(&pointer.x);
    let y = Rc::clone(&pointer.y);

    Specification::new()
        .quantity("width", 200.0)
        .quantity("height", 200.0)
        .producer("left", move || x.get())
        .producer("top", move || y.get())
        .formula("right", terms!["left", "+", "width", "-", 125])
        .formula("bottom", terms!["top", "+", "height"])
        .rule(terms!["width", ">=", 200, "required"])
        .rule(terms!["height", ">=", 200, "required"])
        .rule(terms!["left", ">=", 20, "required"])
        .rule(terms!["top", ">=", 20, "required"])
        .rule(terms!["right", "<=", 400, "required"])
        .rule(terms!["bottom", "<=", 400, "required"])
}

/// Two constants and one producer: `a = 1`, `b` produced as 2.
pub fn constant_and_producer() -> Specification {
    Specification::new()
        .quantity("a", 1.0)
        .producer("b", || 2.0)
}
