// Example: lay out a large photo set and query the visible window.
use photowall::{LayoutEngine, LayoutGeometry, Photo, ScrollWindow};

fn main() {
    let photos: Vec<Photo> = (0..100_000u64)
        .map(|id| {
            let (w, h) = match id % 4 {
                0 => (4000, 6000),
                1 => (6000, 4000),
                2 => (5000, 5000),
                _ => (9000, 3000),
            };
            Photo::new(id, w, h, format!("https://img.example/{id}.jpg"))
        })
        .collect();

    let mut engine = LayoutEngine::default();
    let layout = engine.layout(&photos, LayoutGeometry::new(1280.0, 4, 16.0));
    println!("items={} content_height={:.0}", layout.len(), layout.content_height());

    let window = ScrollWindow::new(250_000.0, 900.0, 12.0);
    let visible = layout.visible_placements(&photos, &window);
    println!("buffer={} visible={}", window.buffer(), visible.len());
    println!("first_visible={:?}", visible.first().map(|p| (p.photo.id, p.top)));

    // Same inputs again: served from the engine's cache.
    engine.layout(&photos, LayoutGeometry::new(1280.0, 4, 16.0));
    println!("placement_runs={}", engine.placement_runs());
}
