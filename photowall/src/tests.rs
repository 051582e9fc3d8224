use crate::*;

use std::sync::Arc;

#[derive(Clone, Copy, Debug)]
struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u64(&mut self) -> u64 {
        // Deterministic, dependency-free PRNG for tests.
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0
    }

    fn gen_range_u64(&mut self, start: u64, end_exclusive: u64) -> u64 {
        debug_assert!(start < end_exclusive);
        let span = end_exclusive - start;
        start + (self.next_u64() % span)
    }

    fn gen_range_u32(&mut self, start: u32, end_exclusive: u32) -> u32 {
        self.gen_range_u64(start as u64, end_exclusive as u64) as u32
    }

    fn gen_range_usize(&mut self, start: usize, end_exclusive: usize) -> usize {
        self.gen_range_u64(start as u64, end_exclusive as u64) as usize
    }
}

fn photo(id: u64, width: u32, height: u32) -> Photo {
    Photo::new(id, width, height, format!("https://img.test/{id}/original.jpg"))
}

fn random_photos(rng: &mut Lcg, n: usize) -> Vec<Photo> {
    (0..n as u64)
        .map(|id| {
            photo(
                id,
                rng.gen_range_u32(200, 4000),
                rng.gen_range_u32(200, 3000),
            )
        })
        .collect()
}

fn brute_force_visible(items: &[GridItem], window: &ScrollWindow) -> Vec<usize> {
    let Some((top, bottom)) = window.bounds() else {
        return Vec::new();
    };
    let mut out: Vec<usize> = items
        .iter()
        .filter(|it| it.bottom() >= top && it.top <= bottom)
        .map(|it| it.index)
        .collect();
    out.sort_unstable();
    out
}

fn sorted_indices(items: &[GridItem]) -> Vec<usize> {
    let mut out: Vec<usize> = items.iter().map(|it| it.index).collect();
    out.sort_unstable();
    out
}

#[test]
fn single_portrait_photo_fills_first_column() {
    let photos = vec![photo(1, 400, 600)];
    let items = calculate_layout(&photos, 800.0, 2, 16.0);
    assert_eq!(items.len(), 1);

    let it = items[0];
    let column_width = (800.0 - 16.0) / 2.0;
    assert_eq!(column_width, 392.0);
    assert_eq!(it.column, 0);
    assert_eq!(it.column_span, 1);
    assert_eq!(it.top, 0.0);
    assert_eq!(it.left, 0.0);
    assert_eq!(it.width, column_width);
    assert_eq!(it.height, column_width / (400.0 / 600.0));
    assert!((it.height - 588.0).abs() < 1e-9);
}

#[test]
fn identical_photos_balance_across_two_columns() {
    let photos: Vec<Photo> = (0..4).map(|id| photo(id, 400, 600)).collect();
    let items = calculate_layout(&photos, 800.0, 2, 16.0);
    assert_eq!(items.len(), 4);

    let in_col0 = items.iter().filter(|it| it.column == 0).count();
    let in_col1 = items.iter().filter(|it| it.column == 1).count();
    assert_eq!(in_col0, 2);
    assert_eq!(in_col1, 2);

    // Ties go to the leftmost column, so placement alternates.
    let columns: Vec<usize> = items.iter().map(|it| it.column).collect();
    assert_eq!(columns, vec![0, 1, 0, 1]);
    assert_eq!(items[2].top, items[0].height + 16.0);
}

#[test]
fn invalid_geometry_or_empty_input_yields_no_items() {
    let photos = vec![photo(1, 400, 600)];
    assert!(calculate_layout(&[], 800.0, 2, 16.0).is_empty());
    assert!(calculate_layout(&photos, 0.0, 2, 16.0).is_empty());
    assert!(calculate_layout(&photos, -10.0, 2, 16.0).is_empty());
    assert!(calculate_layout(&photos, 800.0, 0, 16.0).is_empty());
    assert!(calculate_layout(&photos, 800.0, 2, -1.0).is_empty());
    assert!(calculate_layout(&photos, f64::NAN, 2, 16.0).is_empty());
    // Gaps eat the whole container.
    assert!(calculate_layout(&photos, 30.0, 3, 16.0).is_empty());
}

#[test]
fn photos_with_zero_dimensions_are_skipped() {
    let photos = vec![photo(1, 400, 600), photo(2, 0, 600), photo(3, 600, 0), photo(4, 600, 400)];
    let items = calculate_layout(&photos, 900.0, 3, 8.0);
    let ids: Vec<u64> = items.iter().map(|it| it.photo_id).collect();
    assert_eq!(ids, vec![1, 4]);
    assert_eq!(items[1].index, 3);
}

#[test]
fn column_span_policy() {
    let opts = LayoutOptions::default();
    assert_eq!(column_span(0.5, 4, &opts), 1);
    assert_eq!(column_span(1.0, 4, &opts), 1);
    assert_eq!(column_span(1.2, 4, &opts), 2);
    assert_eq!(column_span(1.5, 4, &opts), 2);
    assert_eq!(column_span(1.6, 4, &opts), 3);
    assert_eq!(column_span(5.0, 4, &opts), 3);
    // Capped by column count.
    assert_eq!(column_span(5.0, 2, &opts), 2);
    assert_eq!(column_span(1.2, 1, &opts), 1);
    assert_eq!(column_span(f64::NAN, 4, &opts), 1);

    let wide = opts.with_max_span(5).with_panorama_threshold(10.0);
    assert_eq!(column_span(3.5, 8, &wide), 4);
}

#[test]
fn panorama_spans_all_columns_and_pushes_others_down() {
    let photos = vec![photo(1, 400, 600), photo(2, 3000, 1000)];
    let items = calculate_layout(&photos, 920.0, 3, 10.0);
    assert_eq!(items.len(), 2);

    // Emitted in input order even though the panorama is placed first.
    assert_eq!(items[0].photo_id, 1);
    assert_eq!(items[1].photo_id, 2);

    let pano = items[1];
    assert_eq!(pano.column, 0);
    assert_eq!(pano.column_span, 3);
    assert_eq!(pano.top, 0.0);
    assert_eq!(pano.width, 920.0);
    assert_eq!(pano.height, 920.0 / 3.0);

    let portrait = items[0];
    assert_eq!(portrait.top, pano.height + 10.0);
    assert_eq!(portrait.column, 0);
}

#[test]
fn batches_bound_the_widest_first_reordering() {
    // With batch size 1 the panorama cannot jump ahead of the portrait.
    let photos = vec![photo(1, 400, 600), photo(2, 3000, 1000)];
    let opts = LayoutOptions::default().with_batch_size(1);
    let items = calculate_layout_with(&photos, LayoutGeometry::new(920.0, 3, 10.0), &opts);
    assert_eq!(items[0].top, 0.0);
    assert_eq!(items[1].top, items[0].height + 10.0);
}

#[test]
fn span_bounds_and_non_negative_placement_hold_for_random_inputs() {
    let mut rng = Lcg::new(7);
    for _ in 0..50 {
        let n = rng.gen_range_usize(1, 300);
        let photos = random_photos(&mut rng, n);
        let columns = rng.gen_range_usize(1, 8);
        let width = rng.gen_range_u32(200, 2400) as f64;
        let gap = rng.gen_range_u32(0, 24) as f64;
        let items = calculate_layout(&photos, width, columns, gap);
        if !LayoutGeometry::new(width, columns, gap).is_valid() {
            assert!(items.is_empty());
            continue;
        }
        assert_eq!(items.len(), n);
        for (i, it) in items.iter().enumerate() {
            assert_eq!(it.index, i);
            assert!(it.column_span >= 1);
            assert!(it.column + it.column_span <= columns);
            assert!(it.top >= 0.0);
            assert!(it.height > 0.0);
            assert!(it.left + it.width <= width + 1e-6);
        }
    }
}

#[test]
fn items_sharing_a_column_never_overlap() {
    let mut rng = Lcg::new(99);
    let photos = random_photos(&mut rng, 200);
    let gap = 12.0;
    let items = calculate_layout(&photos, 1200.0, 4, gap);
    for c in 0..4 {
        let mut in_col: Vec<&GridItem> = items
            .iter()
            .filter(|it| it.column <= c && c < it.column + it.column_span)
            .collect();
        in_col.sort_by(|a, b| a.top.total_cmp(&b.top));
        for w in in_col.windows(2) {
            assert!(w[0].bottom() + gap <= w[1].top + 1e-9);
        }
    }
}

#[test]
fn layout_engine_serves_identical_inputs_from_cache() {
    let mut rng = Lcg::new(3);
    let photos = random_photos(&mut rng, 120);
    let geometry = LayoutGeometry::new(1000.0, 4, 16.0);
    let mut engine = LayoutEngine::default();

    let a = engine.layout(&photos, geometry);
    assert_eq!(engine.placement_runs(), 1);
    let b = engine.layout(&photos, geometry);
    assert_eq!(engine.placement_runs(), 1);
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(a.items(), b.items());
    assert_eq!(a.items(), calculate_layout(&photos, 1000.0, 4, 16.0).as_slice());

    // Different width → new pass.
    engine.layout(&photos, LayoutGeometry::new(1001.0, 4, 16.0));
    assert_eq!(engine.placement_runs(), 2);
}

#[test]
fn layout_cache_key_tracks_photo_identity_not_just_count() {
    let geometry = LayoutGeometry::new(800.0, 2, 16.0);
    let mut engine = LayoutEngine::default();
    let first = vec![photo(1, 400, 600), photo(2, 600, 400)];
    let second = vec![photo(3, 400, 600), photo(4, 600, 400)];

    let a = engine.layout(&first, geometry);
    let b = engine.layout(&second, geometry);
    assert_eq!(engine.placement_runs(), 2);
    assert_eq!(a.items()[0].photo_id, 1);
    assert_eq!(b.items()[0].photo_id, 3);
}

#[test]
fn layout_cache_evicts_oldest_in_batches() {
    let opts = LayoutOptions::default().with_cache_capacity(100, 10);
    let mut engine = LayoutEngine::new(opts);
    let photos = vec![photo(1, 400, 600)];

    for w in 0..100 {
        engine.layout(&photos, LayoutGeometry::new(500.0 + w as f64, 2, 0.0));
    }
    assert_eq!(engine.cache().len(), 100);
    assert_eq!(engine.cache().evicted(), 0);

    engine.layout(&photos, LayoutGeometry::new(1000.0, 2, 0.0));
    assert_eq!(engine.cache().len(), 91);
    assert_eq!(engine.cache().evicted(), 10);

    // The oldest width was evicted and must be recomputed.
    let runs = engine.placement_runs();
    engine.layout(&photos, LayoutGeometry::new(500.0, 2, 0.0));
    assert_eq!(engine.placement_runs(), runs + 1);
    // A recent one is still cached.
    engine.layout(&photos, LayoutGeometry::new(599.0, 2, 0.0));
    assert_eq!(engine.placement_runs(), runs + 1);

    engine.clear_cache();
    assert!(engine.cache().is_empty());
}

#[test]
fn invalid_geometry_is_not_cached_or_counted() {
    let mut engine = LayoutEngine::default();
    let r = engine.layout(&[photo(1, 1, 1)], LayoutGeometry::new(0.0, 3, 0.0));
    assert!(r.is_empty());
    assert_eq!(r.content_height(), 0.0);
    assert_eq!(engine.placement_runs(), 0);
    assert!(engine.cache().is_empty());
}

#[test]
fn content_height_is_tallest_column_without_trailing_gap() {
    let photos: Vec<Photo> = (0..3).map(|id| photo(id, 100, 100)).collect();
    let mut engine = LayoutEngine::default();
    let r = engine.layout(&photos, LayoutGeometry::new(210.0, 2, 10.0));
    // Column width 100: column 0 holds two squares.
    assert_eq!(r.column_width(), 100.0);
    assert_eq!(r.content_height(), 210.0);
}

#[test]
fn column_policy_responsive() {
    let p = ColumnPolicy::Responsive {
        min_column_width: 200.0,
        max_columns: 5,
    };
    assert_eq!(p.columns_for_width(100.0, 16.0), 1);
    assert_eq!(p.columns_for_width(416.0, 16.0), 2);
    assert_eq!(p.columns_for_width(415.0, 16.0), 1);
    assert_eq!(p.columns_for_width(10_000.0, 16.0), 5);
    assert_eq!(p.columns_for_width(0.0, 16.0), 1);
    assert_eq!(ColumnPolicy::Fixed(0).columns_for_width(800.0, 0.0), 1);
    assert_eq!(ColumnPolicy::Fixed(3).columns_for_width(800.0, 0.0), 3);
}

fn stacked_items(heights: &[f64]) -> Vec<GridItem> {
    let mut top = 0.0;
    heights
        .iter()
        .enumerate()
        .map(|(i, &h)| {
            let it = GridItem {
                index: i,
                photo_id: i as u64,
                column: 0,
                column_span: 1,
                top,
                left: 0.0,
                width: 100.0,
                height: h,
            };
            top += h;
            it
        })
        .collect()
}

#[test]
fn buffer_grows_with_velocity_and_is_capped() {
    let w = ScrollWindow::new(0.0, 500.0, 0.0);
    assert_eq!(w.buffer(), 200.0);
    assert_eq!(ScrollWindow::new(0.0, 500.0, 30.0).buffer(), 500.0);
    assert_eq!(ScrollWindow::new(0.0, 500.0, -30.0).buffer(), 500.0);
    assert_eq!(ScrollWindow::new(0.0, 500.0, 1e9).buffer(), 1000.0);
    assert_eq!(w.with_base_buffer(0.0).buffer(), 0.0);
    assert_eq!(w.bounds(), Some((-200.0, 700.0)));
}

#[test]
fn visible_items_on_sorted_list() {
    let items = stacked_items(&[100.0; 50]);
    let window = ScrollWindow::new(1000.0, 300.0, 0.0).with_base_buffer(0.0);
    let got: Vec<usize> = visible_items(&items, &window).iter().map(|it| it.index).collect();
    // Items touching the edges count as visible.
    assert_eq!(got, (9..=13).collect::<Vec<_>>());

    // Fast path: first item already reaches the window top.
    let top = visible_items(&items, &ScrollWindow::new(0.0, 50.0, 0.0));
    assert_eq!(top.first().map(|it| it.index), Some(0));

    // Fast path: everything is above the window.
    assert!(visible_items(&items, &ScrollWindow::new(10_000.0, 300.0, 0.0)).is_empty());
    assert!(visible_items(&[], &ScrollWindow::new(0.0, 300.0, 0.0)).is_empty());
    assert!(visible_items(&items, &ScrollWindow::new(f64::NAN, 300.0, 0.0)).is_empty());
}

#[test]
fn visible_items_grows_monotonically_with_velocity() {
    let mut rng = Lcg::new(11);
    let heights: Vec<f64> = (0..500).map(|_| rng.gen_range_u32(50, 400) as f64).collect();
    let items = stacked_items(&heights);
    for _ in 0..100 {
        let scroll_top = rng.gen_range_u32(0, 60_000) as f64;
        let mut prev = 0usize;
        for v in [0.0, 1.0, 5.0, 20.0, -40.0, 80.0, 1000.0] {
            let n = visible_items(&items, &ScrollWindow::new(scroll_top, 700.0, v)).len();
            if v >= 0.0 {
                assert!(n >= prev);
                prev = n;
            }
        }
    }
}

#[test]
fn masonry_visible_set_never_shrinks_as_velocity_grows() {
    let mut rng = Lcg::new(23);
    for _ in 0..10 {
        let photos = random_photos(&mut rng, 300);
        let columns = rng.gen_range_usize(2, 6);
        let mut engine = LayoutEngine::default();
        let layout = engine.layout(&photos, LayoutGeometry::new(1000.0, columns, 12.0));
        let height = layout.content_height();
        for _ in 0..30 {
            let scroll_top = rng.gen_range_u64(0, height as u64 + 1) as f64;
            let mut prev: Vec<usize> = Vec::new();
            for v in [0.0, 0.5, 2.0, -5.0, 10.0, 40.0, 1000.0] {
                let mut got: Vec<usize> = layout
                    .visible(&ScrollWindow::new(scroll_top, 700.0, v))
                    .iter()
                    .map(|it| it.index)
                    .collect();
                got.sort_unstable();
                assert!(prev.iter().all(|i| got.binary_search(i).is_ok()));
                prev = got;
            }
        }
    }
}

#[test]
fn visibility_index_matches_brute_force_on_masonry_output() {
    let mut rng = Lcg::new(42);
    for _ in 0..20 {
        let photos = random_photos(&mut rng, 400);
        let columns = rng.gen_range_usize(1, 6);
        let mut engine = LayoutEngine::default();
        let layout = engine.layout(&photos, LayoutGeometry::new(1200.0, columns, 8.0));
        let height = layout.content_height();
        for _ in 0..30 {
            let scroll_top = rng.gen_range_u64(0, height as u64 + 1) as f64;
            let velocity = rng.gen_range_u32(0, 50) as f64;
            let window = ScrollWindow::new(scroll_top, 800.0, velocity);
            let got = sorted_indices(&layout.visible(&window));
            assert_eq!(got, brute_force_visible(layout.items(), &window));
        }
    }
}

#[test]
fn visibility_index_handles_unsorted_emission_order() {
    // The panorama is emitted second but sits on top of the portrait.
    let photos = vec![photo(1, 400, 600), photo(2, 3000, 1000)];
    let mut engine = LayoutEngine::default();
    let layout = engine.layout(&photos, LayoutGeometry::new(920.0, 3, 10.0));
    assert!(!layout.index().is_monotonic());
    assert_eq!(layout.index().order(), &[1, 0]);

    let window = ScrollWindow::new(0.0, 100.0, 0.0).with_base_buffer(0.0);
    let got: Vec<u64> = layout.visible(&window).iter().map(|it| it.photo_id).collect();
    assert_eq!(got, vec![2]);

    let all = ScrollWindow::new(0.0, 10_000.0, 0.0);
    let got: Vec<u64> = layout.visible(&all).iter().map(|it| it.photo_id).collect();
    assert_eq!(got, vec![2, 1]);
}

#[test]
fn visibility_index_finds_tall_items_that_start_early() {
    let items = vec![
        GridItem {
            index: 0,
            photo_id: 0,
            column: 0,
            column_span: 1,
            top: 0.0,
            left: 0.0,
            width: 100.0,
            height: 5000.0,
        },
        GridItem {
            index: 1,
            photo_id: 1,
            column: 1,
            column_span: 1,
            top: 10.0,
            left: 110.0,
            width: 100.0,
            height: 10.0,
        },
        GridItem {
            index: 2,
            photo_id: 2,
            column: 1,
            column_span: 1,
            top: 30.0,
            left: 110.0,
            width: 100.0,
            height: 10.0,
        },
    ];
    let index = VisibilityIndex::new(&items);
    assert!(index.is_monotonic());
    let window = ScrollWindow::new(2000.0, 100.0, 0.0).with_base_buffer(0.0);
    let got: Vec<usize> = index.visible(&items, &window).iter().map(|it| it.index).collect();
    assert_eq!(got, vec![0]);
}

#[test]
fn visible_placements_attach_photos() {
    let photos: Vec<Photo> = (0..6).map(|id| photo(id, 300, 300)).collect();
    let mut engine = LayoutEngine::default();
    let layout = engine.layout(&photos, LayoutGeometry::new(600.0, 2, 0.0));
    let window = ScrollWindow::new(0.0, 300.0, 0.0).with_base_buffer(0.0);
    let placements = layout.visible_placements(&photos, &window);
    // Two rows of two 300px squares touch the 300px viewport.
    assert_eq!(placements.len(), 4);
    for p in &placements {
        assert_eq!(p.photo.id, photos[p.index].id);
        assert_eq!(p.image_url(), photos[p.index].src.original);
    }

    // A photo list that no longer matches the layout is skipped, not indexed.
    let shorter = &photos[..1];
    assert_eq!(layout.visible_placements(shorter, &window).len(), 1);
}

fn captioned(id: u64, alt: &str, photographer: &str) -> Photo {
    photo(id, 100, 100)
        .with_alt(alt)
        .with_photographer(photographer)
}

fn gallery() -> Vec<Photo> {
    vec![
        captioned(1, "City skyline at night", "Ana Lopez"),
        captioned(2, "Green nature trail", "Bo Chen"),
        captioned(3, "Nature and city collide", "Cy Diaz"),
        captioned(4, "Mountain lake", "Nature Studio"),
        captioned(5, "Portrait in the city", "Dee Evans"),
    ]
}

#[test]
fn rank_passes_through_blank_queries() {
    let photos = gallery();
    for q in ["", "   ", "\t\n"] {
        let got: Vec<u64> = rank(&photos, q).iter().map(|p| p.id).collect();
        assert_eq!(got, vec![1, 2, 3, 4, 5]);
    }
}

#[test]
fn rank_scores_phrase_and_tokens() {
    let photos = gallery();
    // "nature city": phrase matches nothing; both tokens match #3 (100), one token each for
    // #1, #2, #4, #5 (50, ties keep input order).
    let got: Vec<u64> = rank(&photos, "  Nature CITY ").iter().map(|p| p.id).collect();
    assert_eq!(got, vec![3, 1, 2, 4, 5]);

    assert_eq!(score(&photos[2], "nature and city"), 100 + 50 * 3);
    // Single-character tokens are ignored but still part of the phrase.
    assert_eq!(score(&photos[0], "a"), 100);
    assert_eq!(score(&photos[1], "x"), 0);

    let got: Vec<u64> = rank(&photos, "mountain").iter().map(|p| p.id).collect();
    assert_eq!(got, vec![4]);
    assert!(rank(&photos, "desert").is_empty());
}

#[test]
fn search_overlay_serves_repeated_queries_from_cache() {
    let photos = gallery();
    let mut overlay = SearchOverlay::default();

    let first = overlay.rank(&photos, "city", 0);
    let runs = overlay.score_runs();
    assert_eq!(runs, photos.len() as u64);

    let second = overlay.rank(&photos, "  CITY ", 1_000);
    assert_eq!(overlay.score_runs(), runs);
    assert_eq!(first, second);
    assert_eq!(overlay.cache().len(), 1);

    let ids: Vec<u64> = second.apply(&photos).iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![1, 3, 5]);
    assert_eq!(second.len(photos.len()), 3);

    // Blank queries never touch the cache.
    assert!(overlay.rank(&photos, " ", 0).is_pass_through());
    assert_eq!(overlay.score_runs(), runs);
}

#[test]
fn search_cache_expires_after_ttl() {
    let photos = gallery();
    let mut overlay = SearchOverlay::new(SearchOptions::default().with_ttl_ms(300_000));
    overlay.rank(&photos, "city", 0);
    let runs = overlay.score_runs();

    overlay.rank(&photos, "city", 299_999);
    assert_eq!(overlay.score_runs(), runs);

    overlay.rank(&photos, "city", 300_000);
    assert_eq!(overlay.score_runs(), runs * 2);
}

#[test]
fn search_cache_is_keyed_by_photo_set() {
    let mut photos = gallery();
    let mut overlay = SearchOverlay::default();
    let a = overlay.rank(&photos, "city", 0);
    photos.push(captioned(6, "City park", "Fay Gold"));
    let b = overlay.rank(&photos, "city", 1);
    assert_ne!(a, b);
    assert_eq!(b.len(photos.len()), 4);
    assert_eq!(b.to_photos(&photos).len(), 4);
}

#[test]
fn bounded_cache_is_insertion_ordered() {
    let mut cache = BoundedCache::new(3, 1);
    cache.insert("a", 1);
    cache.insert("b", 2);
    cache.insert("c", 3);
    // Reads do not refresh entries.
    assert_eq!(cache.get(&"a"), Some(&1));
    cache.insert("d", 4);
    assert!(!cache.contains(&"a"));
    assert_eq!(cache.len(), 3);

    // Re-inserting makes an entry the newest (last writer wins).
    cache.insert("b", 20);
    cache.insert("e", 5);
    assert!(!cache.contains(&"c"));
    assert_eq!(cache.get(&"b"), Some(&20));
    assert_eq!(cache.remove(&"b"), Some(20));
    assert_eq!(cache.evicted(), 2);
}

#[test]
fn expiring_cache_drops_stale_entries_on_read() {
    let mut cache = ExpiringCache::new(4, 100);
    cache.insert(1u32, "x", 10);
    assert_eq!(cache.get(&1, 109), Some(&"x"));
    assert_eq!(cache.get(&1, 110), None);
    assert!(cache.is_empty());
}

#[test]
fn photo_validation() {
    assert!(photo(1, 10, 10).is_valid());
    assert_eq!(
        photo(2, 0, 10).validate(),
        Err(PhotoError::InvalidDimensions {
            id: 2,
            width: 0,
            height: 10
        })
    );
    let mut p = photo(3, 10, 10);
    p.src.original.clear();
    assert_eq!(p.validate(), Err(PhotoError::MissingOriginal { id: 3 }));
}

#[test]
fn photo_src_picks_smallest_sufficient_rendition() {
    let mut src = PhotoSrc::original("o");
    src.medium = "m".into();
    src.large2x = "l2".into();
    assert_eq!(src.for_width(200.0), "m");
    // `large` is missing, so the next rendition up is used.
    assert_eq!(src.for_width(600.0), "l2");
    assert_eq!(src.for_width(4000.0), "o");
}

#[test]
fn photo_set_id_distinguishes_lists() {
    let a = vec![photo(1, 10, 10), photo(2, 10, 10)];
    let b = vec![photo(2, 10, 10), photo(1, 10, 10)];
    assert_eq!(PhotoSetId::of(&a), PhotoSetId::of(&a.clone()));
    assert_ne!(PhotoSetId::of(&a), PhotoSetId::of(&b));
    assert_eq!(PhotoSetId::of(&a).len, 2);
}

#[test]
fn frame_state_builds_scroll_window() {
    let frame = FrameState {
        viewport: ViewportState {
            container_width: 800.0,
            container_height: 600.0,
        },
        scroll: ScrollState {
            scroll_top: 1000.0,
            velocity: -2.0,
        },
    };
    assert!(frame.scroll.is_scrolling());
    let w = frame.window(&VisibilityOptions::default());
    assert_eq!(w.buffer(), 220.0);
    assert_eq!(w.bounds(), Some((780.0, 1820.0)));
}
