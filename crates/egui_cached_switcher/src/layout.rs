use egui::{Rect, Vec2};

use crate::{Representation, ViewCache};

/// Component-wise maximum of `sizes`, or [`Vec2::ZERO`] if there are none.
pub fn max_size(sizes: impl IntoIterator<Item = Vec2>) -> Vec2 {
    sizes.into_iter().fold(Vec2::ZERO, Vec2::max)
}

impl<K, V> ViewCache<K, V> {
    /// Measure every cached view, hidden or not, and return the largest width and height.
    ///
    /// Measuring the hidden views too means the switcher doesn't change size
    /// when switching between views of different sizes.
    pub fn measure(
        &mut self,
        mut measure_view: impl FnMut(&mut Representation<K, V>) -> Vec2,
    ) -> Vec2 {
        for rep in self.queue_mut() {
            rep.desired_size = measure_view(rep);
        }
        self.desired_size()
    }

    /// The largest size any cached view asked for the last time it was measured.
    pub fn desired_size(&self) -> Vec2 {
        max_size(self.iter().map(Representation::desired_size))
    }

    /// Give every cached view, hidden or not, all of `final_rect`.
    pub fn arrange(
        &mut self,
        final_rect: Rect,
        mut arrange_view: impl FnMut(&mut Representation<K, V>),
    ) {
        for rep in self.queue_mut() {
            rep.rect = final_rect;
            arrange_view(rep);
        }
    }

    /// [`Self::arrange`] and [`Self::measure`] in one go, for hosts where a view
    /// only learns its size by being laid out.
    ///
    /// `run_view` lays out the view in [`Representation::rect`] and returns the size it used.
    /// The returned desired size is what the next frame should allocate.
    pub fn arrange_and_measure(
        &mut self,
        final_rect: Rect,
        mut run_view: impl FnMut(&mut Representation<K, V>) -> Vec2,
    ) -> Vec2 {
        for rep in self.queue_mut() {
            rep.rect = final_rect;
            rep.desired_size = run_view(rep);
        }
        self.desired_size()
    }
}
