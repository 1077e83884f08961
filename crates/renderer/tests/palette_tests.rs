//! Tests for palette construction from gradient stops and styles.

use heatmap_common::{Argb, GradientStop, GradientStops, GradientStyle, HeatmapError};
use heatmap_renderer::{HeatMap, Palette, PALETTE_SIZE};
use test_utils::fixtures::{gradients, json};

// ============================================================================
// Palette endpoints
// ============================================================================

#[test]
fn test_endpoints_match_boundary_stops() {
    for stops in [GradientStops::default_heat(), gradients::gray_ramp(), gradients::blue_red()] {
        let palette = Palette::build(&stops);
        let first = stops.stops().first().unwrap().color;
        let last = stops.stops().last().unwrap().color;

        assert_eq!(palette.colors().len(), PALETTE_SIZE);
        assert_eq!(palette[0], first);
        assert_eq!(palette[255], last);
    }
}

#[test]
fn test_default_heat_passes_through_inner_stops() {
    let palette = Palette::build(&GradientStops::default_heat());
    // 0.5 * 255 = 127.5 -> entries 127 and 128 straddle the green stop
    let mid = palette[128];
    assert!(mid.g >= 250, "expected green near the middle, got {:?}", mid);
    assert_eq!(palette.color_for(1.0), Argb::rgb(255, 0, 0));
}

#[test]
fn test_palette_is_monotonic_for_two_stops() {
    let palette = Palette::build(&gradients::blue_red());
    for i in 1..=255u8 {
        assert!(palette[i].r >= palette[i - 1].r);
        assert!(palette[i].b <= palette[i - 1].b);
    }
}

// ============================================================================
// Styles
// ============================================================================

#[test]
fn test_hex_style_palette() {
    let style = GradientStyle::from_json(json::HEX_STYLE).unwrap();
    assert_eq!(style.name.as_deref(), Some("fire"));

    let palette = Palette::build(&style.to_stops().unwrap());
    assert_eq!(palette[0], Argb::rgb(0, 0, 0));
    assert_eq!(palette[255], Argb::rgb(255, 255, 0));
}

#[test]
fn test_mixed_style_palette() {
    let style = GradientStyle::from_json(json::MIXED_STYLE).unwrap();
    let stops = style.to_stops().unwrap();
    assert_eq!(stops.len(), 3);

    let palette = Palette::build(&stops);
    assert_eq!(palette[0], Argb::rgb(0, 0, 255));
    assert_eq!(palette[255], Argb::rgb(255, 0, 0));
}

#[test]
fn test_unknown_color_name() {
    let style = GradientStyle::from_json(
        r#"{"stops": [{"position": 0.0, "color": "chartreuse-ish"}, {"position": 1.0, "color": "red"}]}"#,
    )
    .unwrap();
    assert!(matches!(style.to_stops(), Err(HeatmapError::InvalidColor(_))));
}

// ============================================================================
// Validation through the heat map
// ============================================================================

#[test]
fn test_single_stop_rejected() {
    let map = HeatMap::new();
    let err = map.set_color_stops(gradients::single_stop()).unwrap_err();
    assert!(err.is_invalid_argument());
    assert!(Palette::from_stops(&gradients::single_stop()).is_err());
}

#[test]
fn test_duplicate_positions_are_not_two_stops() {
    let stops = [
        GradientStop::new(0.5, Argb::BLACK),
        GradientStop::new(0.5, Argb::rgb(255, 255, 255)),
    ];
    assert!(GradientStops::new(stops).is_err());
}

#[test]
fn test_set_color_stops_rebuilds_palette() {
    let map = HeatMap::new();
    assert_eq!(map.palette()[255], Argb::rgb(255, 0, 0));

    map.set_color_stops(gradients::blue_red_stops()).unwrap();
    map.set_color_stops([
        GradientStop::new(0.0, Argb::BLACK),
        GradientStop::new(1.0, Argb::rgb(255, 255, 255)),
    ])
    .unwrap();
    assert_eq!(map.palette()[255], Argb::rgb(255, 255, 255));
    assert!(map.needs_refresh());
}
