use egui::Rect;
use log::debug;

use crate::geometry::{element_intersects_rect, query_rect};
use crate::renderer::Renderer;
use crate::scene::SceneStore;
use crate::surface::Surface;

/// Remove every element touching the query rectangle and repaint the survivors.
///
/// The rectangle may have a negative extent. The surface is only redrawn when
/// something was removed. Returns the number of removed elements.
pub fn erase_area<S: Surface>(
    store: &mut SceneStore,
    renderer: &Renderer,
    surface: &mut S,
    x: f32,
    y: f32,
    width: f32,
    height: f32,
) -> usize {
    erase_rect(store, renderer, surface, query_rect(x, y, width, height))
}

/// [`erase_area`] with an already normalized query rectangle
pub fn erase_rect<S: Surface>(
    store: &mut SceneStore,
    renderer: &Renderer,
    surface: &mut S,
    query: Rect,
) -> usize {
    let removed = store.remove_where(|element| element_intersects_rect(element, &query));
    if removed > 0 {
        debug!("Area erase {query:?} removed {removed} elements");
        renderer.redraw_all(surface, store.elements());
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{FillMode, Style, factory};
    use crate::surface::RasterSurface;
    use egui::{Color32, pos2};

    #[test]
    fn test_untouched_surface_when_nothing_matches() {
        let mut store = SceneStore::new();
        store.add_element(factory::create_line(
            Style::default(),
            pos2(0.0, 0.0),
            pos2(10.0, 10.0),
        ));
        let renderer = Renderer::default();
        let mut surface = RasterSurface::new(20, 20);
        renderer.redraw_all(&mut surface, store.elements());

        // Paint something outside the scene; a redraw would wipe it
        surface.set_fill_color(Color32::RED);
        surface.begin_path();
        surface.arc(17.0, 17.0, 2.0, 0.0, std::f32::consts::TAU);
        surface.fill();
        let before = surface.snapshot();

        assert_eq!(erase_area(&mut store, &renderer, &mut surface, 100.0, 100.0, 5.0, 5.0), 0);
        assert_eq!(surface.snapshot(), before);
    }

    #[test]
    fn test_erase_redraws_survivors() {
        let mut store = SceneStore::new();
        let filled = Style::new(Color32::RED, 0.0).with_fill(None, FillMode::Filled);
        store.add_element(factory::create_rectangle(filled, pos2(0.0, 0.0), pos2(5.0, 5.0), 0.0));
        store.add_element(factory::create_rectangle(filled, pos2(10.0, 10.0), pos2(15.0, 15.0), 0.0));
        let renderer = Renderer::default();
        let mut surface = RasterSurface::new(20, 20);
        renderer.redraw_all(&mut surface, store.elements());
        assert_eq!(surface.painted_pixel_count(), 50);

        let removed = erase_area(&mut store, &renderer, &mut surface, 12.0, 12.0, -4.0, -4.0);
        assert_eq!(removed, 1);
        assert_eq!(store.count(), 1);
        assert_eq!(surface.painted_pixel_count(), 25);
    }
}
