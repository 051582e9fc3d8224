// Example: rank a photo list and feed the matches back into layout.
use photowall::{LayoutEngine, LayoutGeometry, Photo, SearchOverlay};

fn main() {
    let photos = vec![
        Photo::new(1, 4000, 3000, "https://img.example/1.jpg").with_alt("Foggy forest road"),
        Photo::new(2, 3000, 4000, "https://img.example/2.jpg").with_alt("City lights at dusk"),
        Photo::new(3, 6000, 2000, "https://img.example/3.jpg")
            .with_alt("Forest panorama")
            .with_photographer("City Parks Dept"),
    ];

    let mut overlay = SearchOverlay::default();
    let ranking = overlay.rank(&photos, "forest", 0);
    let matches = ranking.to_photos(&photos);
    println!("matches={:?}", matches.iter().map(|p| p.id).collect::<Vec<_>>());

    // Cached: no photos are scored the second time.
    overlay.rank(&photos, "  FOREST ", 1_000);
    println!("score_runs={}", overlay.score_runs());

    let mut engine = LayoutEngine::default();
    let layout = engine.layout(&matches, LayoutGeometry::new(960.0, 3, 12.0));
    for it in layout.items() {
        println!(
            "id={} column={} span={} top={:.1} height={:.1}",
            it.photo_id, it.column, it.column_span, it.top, it.height
        );
    }
}
