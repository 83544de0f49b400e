mod common;

use common::{cycles_tour, identity_tour, ring_cities, DrawOp, RecordingCanvas};
use rstest::rstest;
use std::sync::Arc;
use tourforge::cities::City;
use tourforge::error::MalformedTourError;
use tourforge::render::{render_cities, render_tour, AsciiCanvas, Point};
use tourforge::tour::{Link, Tour};
use tourforge::TourEvent;

fn event_for(tour: Tour, cities: Vec<City>) -> TourEvent {
    let cities: Arc<[City]> = cities.into();
    TourEvent::new(tour, 0.0, 1, cities, false)
}

#[rstest]
#[case(2)]
#[case(3)]
#[case(8)]
#[case(50)]
fn test_frame_has_marker_and_edge_per_city(#[case] n: usize) {
    let mut canvas = RecordingCanvas::default();
    render_tour(&event_for(identity_tour(n), ring_cities(n)), &mut canvas).unwrap();

    let frame = canvas.visible().unwrap();
    assert_eq!(frame.first(), Some(&DrawOp::Clear));
    assert_eq!(RecordingCanvas::count_points(frame), n);
    assert_eq!(RecordingCanvas::count_edges(frame), n);
    assert!(canvas.pending.is_empty());
}

#[test]
fn test_edges_close_the_loop_from_city_zero() {
    let cities = ring_cities(5);
    let order = [0, 3, 1, 4, 2];
    let mut canvas = RecordingCanvas::default();
    render_tour(&event_for(Tour::from_order(&order), cities.clone()), &mut canvas).unwrap();

    let edges: Vec<(Point, Point)> = canvas
        .visible()
        .unwrap()
        .iter()
        .filter_map(|op| match op {
            DrawOp::Edge(a, b) => Some((*a, *b)),
            _ => None,
        })
        .collect();
    assert_eq!(edges[0].0, Point::from(&cities[0]));
    assert_eq!(edges[0].1, Point::from(&cities[3]));
    assert_eq!(edges[4].1, Point::from(&cities[0]));
}

#[test]
fn test_single_city_draws_only_a_marker() {
    let mut canvas = RecordingCanvas::default();
    render_tour(&event_for(identity_tour(1), ring_cities(1)), &mut canvas).unwrap();
    let frame = canvas.visible().unwrap();
    assert_eq!(RecordingCanvas::count_points(frame), 1);
    assert_eq!(RecordingCanvas::count_edges(frame), 0);
}

#[rstest]
#[case::sub_cycle(cycles_tour(&[vec![0, 1, 2], vec![3, 4, 5]]), 6)]
#[case::out_of_range(Tour::from_links(vec![Link::new(1, 2), Link::new(9, 0), Link::new(0, 1)]), 3)]
#[case::count_mismatch(identity_tour(4), 6)]
fn test_malformed_tour_keeps_previous_frame(#[case] bad: Tour, #[case] cities: usize) {
    let mut canvas = RecordingCanvas::default();
    render_cities(&ring_cities(cities), &mut canvas);
    let before = canvas.presented.clone();

    let result = render_tour(&event_for(bad, ring_cities(cities)), &mut canvas);
    assert!(result.is_err());
    assert_eq!(canvas.presented, before);
    assert!(canvas.pending.is_empty(), "partial frame reached the canvas");
}

#[test]
fn test_count_mismatch_error_names_both_sizes() {
    let mut canvas = RecordingCanvas::default();
    let err = render_tour(&event_for(identity_tour(4), ring_cities(6)), &mut canvas).unwrap_err();
    assert_eq!(
        err,
        MalformedTourError::CityCountMismatch {
            tour_len: 4,
            city_count: 6
        }
    );
}

#[test]
fn test_ascii_canvas_keeps_last_good_frame() {
    let cities = vec![
        City::new(0.0, 0.0),
        City::new(10.0, 0.0),
        City::new(10.0, 10.0),
        City::new(0.0, 10.0),
        City::new(5.0, 5.0),
        City::new(5.0, 0.0),
    ];
    let mut canvas = AsciiCanvas::fit(21, 11, &cities);
    render_tour(&event_for(identity_tour(6), cities.clone()), &mut canvas).unwrap();
    let good = canvas.to_string();

    let broken = cycles_tour(&[vec![0, 1, 2], vec![3, 4, 5]]);
    assert!(render_tour(&event_for(broken, cities), &mut canvas).is_err());
    assert_eq!(canvas.to_string(), good);
    assert!(good.contains('o'));
    assert!(good.contains('.'));
}
