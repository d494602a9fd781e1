pub mod undo;

use crate::{
    s,
    stroke::{self, Bounds, Drawing, Stroke, StrokeElement, StrokePos},
};
use slotmap::{DefaultKey, SlotMap};
use undo::{Action, UndoStack};

#[derive(Default, PartialEq, Debug, Clone, Copy)]
pub enum Tool {
    #[default]
    Pen,
    Eraser,
}

#[derive(Debug, Clone, Copy)]
pub enum StylusEvent {
    Down(StrokeElement),
    Move(StrokeElement),
    Up,
}

#[derive(Debug, Default)]
pub struct CanvasStroke {
    pub points: Vec<StrokeElement>,
    pub erased: bool,
    pub done: bool,
}

impl CanvasStroke {
    fn finished(stroke: Stroke) -> Self {
        CanvasStroke {
            points: stroke.points().to_vec(),
            erased: false,
            done: true,
        }
    }
}

/// Strokes drawn for the selected label, including the one under the pen.
///
/// Strokes are never removed from the map, only marked erased, so slot order is drawing order.
#[derive(Debug)]
pub struct Canvas {
    strokes: SlotMap<DefaultKey, CanvasStroke>,
    undo_stack: UndoStack,
    current: Option<DefaultKey>,
    pub tool: Tool,
    pub eraser_radius: f32,
}

impl Canvas {
    pub fn new(eraser_radius: f32) -> Self {
        Canvas {
            strokes: SlotMap::new(),
            undo_stack: UndoStack::new(),
            current: None,
            tool: Tool::Pen,
            eraser_radius,
        }
    }

    /// Show `drawing`, forgetting history. The canvas counts as unmodified afterwards.
    pub fn load_drawing(&mut self, drawing: Drawing) {
        tracing::debug!("load {} strokes", drawing.len());
        self.strokes = drawing
            .into_strokes()
            .into_iter()
            .fold(SlotMap::new(), |mut map, stroke| {
                map.insert(CanvasStroke::finished(stroke));
                map
            });
        self.current = None;
        self.undo_stack.clear();
    }

    /// Finished strokes that haven't been erased, in drawing order.
    pub fn to_drawing(&self) -> Drawing {
        self.strokes
            .values()
            .filter(|stroke| stroke.done && !stroke.erased)
            .map(|stroke| Stroke::with_points(stroke.points.clone()))
            .collect()
    }

    pub fn visible_strokes(&self) -> impl Iterator<Item = &[StrokeElement]> {
        self.strokes
            .values()
            .filter(|stroke| !stroke.erased)
            .map(|stroke| stroke.points.as_slice())
    }

    pub fn modified(&self) -> bool {
        !self.undo_stack.at_saved_state()
    }

    pub fn mark_committed(&mut self) {
        self.undo_stack.set_saved_state();
    }

    pub fn drawing_stroke(&self) -> bool {
        self.current.is_some()
    }

    pub fn handle(&mut self, event: StylusEvent) {
        match (self.tool, event) {
            (Tool::Pen, StylusEvent::Down(point)) => self.start_stroke(point),
            (Tool::Pen, StylusEvent::Move(point)) => self.continue_stroke(point),
            (Tool::Pen, StylusEvent::Up) => self.end_stroke(),
            (Tool::Eraser, StylusEvent::Down(point) | StylusEvent::Move(point)) => {
                self.erase_at(point.pos(), self.eraser_radius)
            }
            (Tool::Eraser, StylusEvent::Up) => {}
        }
    }

    pub fn start_stroke(&mut self, point: StrokeElement) {
        self.end_stroke();
        let key = self.strokes.insert(CanvasStroke {
            points: vec![point],
            ..Default::default()
        });
        self.current = Some(key);
        self.undo_stack.push(Action::DrawStroke(key));
    }

    pub fn continue_stroke(&mut self, point: StrokeElement) {
        match self.current.and_then(|key| self.strokes.get_mut(key)) {
            Some(stroke) => stroke.points.push(point),
            None => tracing::warn!("stylus moved without a stroke in progress"),
        }
    }

    pub fn end_stroke(&mut self) {
        if let Some(stroke) = self.current.take().and_then(|key| self.strokes.get_mut(key)) {
            stroke.done = true;
        }
    }

    /// Erase every finished stroke with a sample within `radius` of `pos`.
    pub fn erase_at(&mut self, pos: StrokePos, radius: f32) {
        let cursor = Bounds {
            min: StrokePos {
                x: pos.x - radius,
                y: pos.y - radius,
            },
            max: StrokePos {
                x: pos.x + radius,
                y: pos.y + radius,
            },
        };

        let erased = self
            .strokes
            .iter_mut()
            .filter(|(_, candidate)| {
                candidate.done
                    && !candidate.erased
                    && stroke::bounds_of(&candidate.points)
                        .map_or(false, |bounds| bounds.intersects(&cursor))
                    && stroke::touches(&candidate.points, pos, radius)
            })
            .map(|(key, candidate)| {
                candidate.erased = true;
                key
            })
            .collect::<Vec<_>>();

        for key in erased {
            tracing::debug!("erase {key:?}");
            self.undo_stack.push(Action::EraseStroke(key));
        }
    }

    /// Erase everything at once. Undoes as a single step.
    pub fn clear(&mut self) {
        self.end_stroke();
        let keys = self
            .strokes
            .iter_mut()
            .filter(|(_, stroke)| !stroke.erased)
            .map(|(key, stroke)| {
                stroke.erased = true;
                key
            })
            .collect::<Vec<_>>();

        if !keys.is_empty() {
            tracing::debug!("{}: {} strokes", s!(RemoveAllStrokes), keys.len());
            self.undo_stack.push(Action::Clear(keys));
        }
    }

    fn set_erased(&mut self, keys: &[DefaultKey], erased: bool) {
        for key in keys {
            if let Some(stroke) = self.strokes.get_mut(*key) {
                stroke.erased = erased;
            }
        }
    }

    pub fn undo(&mut self) {
        self.end_stroke();
        match self.undo_stack.undo() {
            Some(Action::DrawStroke(key)) => self.set_erased(&[key], true),
            Some(Action::EraseStroke(key)) => self.set_erased(&[key], false),
            Some(Action::Clear(keys)) => self.set_erased(&keys, false),
            None => {}
        }
    }

    pub fn redo(&mut self) {
        self.end_stroke();
        match self.undo_stack.redo() {
            Some(Action::DrawStroke(key)) => self.set_erased(&[key], false),
            Some(Action::EraseStroke(key)) => self.set_erased(&[key], true),
            Some(Action::Clear(keys)) => self.set_erased(&keys, true),
            None => {}
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn draw(canvas: &mut Canvas, points: &[(f32, f32)]) {
        let mut points = points.iter().map(|&(x, y)| StrokeElement::new(x, y));
        canvas.handle(StylusEvent::Down(points.next().unwrap()));
        points.for_each(|point| canvas.handle(StylusEvent::Move(point)));
        canvas.handle(StylusEvent::Up);
    }

    fn xs(drawing: &Drawing) -> Vec<f32> {
        drawing
            .strokes()
            .iter()
            .map(|stroke| stroke.points()[0].x)
            .collect()
    }

    #[test]
    fn unfinished_stroke_not_in_drawing() {
        let mut canvas = Canvas::new(1.);
        canvas.handle(StylusEvent::Down(StrokeElement::new(0., 0.)));
        canvas.handle(StylusEvent::Move(StrokeElement::new(1., 1.)));
        assert!(canvas.drawing_stroke());
        assert!(canvas.to_drawing().is_empty());
        assert_eq!(canvas.visible_strokes().count(), 1);

        canvas.handle(StylusEvent::Up);
        let drawing = canvas.to_drawing();
        assert_eq!(drawing.len(), 1);
        assert_eq!(drawing.strokes()[0].len(), 2);
    }

    #[test]
    fn undo_redo_draw() {
        let mut canvas = Canvas::new(1.);
        draw(&mut canvas, &[(0., 0.), (1., 0.)]);
        draw(&mut canvas, &[(5., 0.), (6., 0.)]);
        assert_eq!(xs(&canvas.to_drawing()), [0., 5.]);

        canvas.undo();
        assert_eq!(xs(&canvas.to_drawing()), [0.]);
        canvas.redo();
        assert_eq!(xs(&canvas.to_drawing()), [0., 5.]);
    }

    #[test]
    fn eraser_tool() {
        let mut canvas = Canvas::new(1.);
        draw(&mut canvas, &[(0., 0.), (1., 0.)]);
        draw(&mut canvas, &[(10., 10.), (11., 10.)]);

        canvas.tool = Tool::Eraser;
        canvas.handle(StylusEvent::Down(StrokeElement::new(10.5, 10.5)));
        canvas.handle(StylusEvent::Up);
        assert_eq!(xs(&canvas.to_drawing()), [0.]);

        canvas.undo();
        assert_eq!(xs(&canvas.to_drawing()), [0., 10.]);
    }

    #[test]
    fn clear_is_one_step() {
        let mut canvas = Canvas::new(1.);
        draw(&mut canvas, &[(0., 0.)]);
        draw(&mut canvas, &[(3., 0.)]);
        canvas.clear();
        assert!(canvas.to_drawing().is_empty());

        canvas.undo();
        assert_eq!(xs(&canvas.to_drawing()), [0., 3.]);
        canvas.redo();
        assert!(canvas.to_drawing().is_empty());
    }

    #[test]
    fn modified_tracking() {
        let mut canvas = Canvas::new(1.);
        assert!(!canvas.modified());

        draw(&mut canvas, &[(0., 0.)]);
        assert!(canvas.modified());
        canvas.mark_committed();
        assert!(!canvas.modified());

        canvas.undo();
        assert!(canvas.modified());

        canvas.load_drawing(Drawing::empty());
        assert!(!canvas.modified());
        assert!(canvas.to_drawing().is_empty());
    }

    #[test]
    fn load_keeps_order() {
        let drawing: Drawing = (0..5)
            .map(|i| Stroke::with_points(vec![StrokeElement::new(i as f32, 0.)]))
            .collect();

        let mut canvas = Canvas::new(1.);
        draw(&mut canvas, &[(9., 9.)]);
        canvas.load_drawing(drawing.clone());
        assert_eq!(canvas.to_drawing(), drawing);

        draw(&mut canvas, &[(7., 0.)]);
        assert_eq!(xs(&canvas.to_drawing()), [0., 1., 2., 3., 4., 7.]);
    }
}
