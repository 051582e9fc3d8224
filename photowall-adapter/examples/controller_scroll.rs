// Example: drive a Controller with synthetic scroll and resize events.
use photowall::Photo;
use photowall_adapter::{Controller, ControllerOptions, SentinelPolicy};

fn main() {
    let photos: Vec<Photo> = (0..5_000u64)
        .map(|id| {
            let (w, h) = if id % 3 == 0 { (6000, 4000) } else { (4000, 6000) };
            Photo::new(id, w, h, format!("https://img.example/{id}.jpg"))
        })
        .collect();

    let mut c = Controller::new(ControllerOptions::default().with_gap(12.0));
    c.measure(1280.0, 800.0);
    c.set_photos(photos, 1);
    println!(
        "columns={} content_height={:.0}",
        c.layout().column_count(),
        c.content_height()
    );

    // A fling: 60 events 8 ms apart, then a frame every 16 ms.
    let mut now_ms = 0u64;
    for i in 0..60u64 {
        c.on_scroll(i as f64 * 90.0, now_ms);
        if i % 2 == 0 {
            if let Some(update) = c.tick(now_ms) {
                let frame = c.frame();
                println!(
                    "t={now_ms} top={:.0} velocity={:.2} placements={}",
                    update.frame.scroll.scroll_top,
                    update.frame.scroll.velocity,
                    frame.placements.len()
                );
            }
        }
        now_ms += 8;
    }

    // Let the velocity settle.
    while c.signals().pending_timers() > 0 {
        now_ms += 16;
        c.tick(now_ms);
    }
    println!(
        "settled velocity={} placements={}",
        c.frame_state().scroll.velocity,
        c.frame().placements.len()
    );

    c.on_resize(900.0, 800.0, now_ms);
    now_ms += 100;
    if c.tick(now_ms).is_some_and(|u| u.resize) {
        println!(
            "resized: columns={} layout_version={}",
            c.layout().column_count(),
            c.layout_version()
        );
    }
    println!(
        "load more? {}",
        c.is_sentinel_visible(&SentinelPolicy::default())
    );
    c.teardown();
}
