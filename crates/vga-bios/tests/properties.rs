mod common;

use common::{booted, cell, fill_rows, ModelHw};
use proptest::prelude::*;
use vga_bios::mode::modes;
use vga_bios::{CursorPos, VideoBios, VideoBiosConfig, WriteStringFlags};

fn fast_config() -> VideoBiosConfig {
    VideoBiosConfig {
        clear_planes_on_mode_set: false,
        reload_font_on_text_mode: false,
        ..VideoBiosConfig::default()
    }
}

fn mode_ids() -> impl Strategy<Value = u8> {
    prop::sample::select(modes().iter().map(|d| d.mode).collect::<Vec<_>>())
}

fn planes_01(hw: &ModelHw) -> (Vec<u8>, Vec<u8>) {
    (hw.vga.plane(0).to_vec(), hw.vga.plane(1).to_vec())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        rng_algorithm: proptest::test_runner::RngAlgorithm::ChaCha,
        rng_seed: proptest::test_runner::RngSeed::Fixed(0x10_0B_10),
        .. ProptestConfig::default()
    })]

    #[test]
    fn set_mode_is_idempotent(mode in mode_ids()) {
        let mut bios = VideoBios::new(fast_config());
        let mut hw = ModelHw::new();

        bios.set_mode(&mut hw, mode).unwrap();
        let once = *bios.state();
        bios.set_mode(&mut hw, mode).unwrap();
        let twice = *bios.state();

        prop_assert_eq!(
            (once.columns, once.rows, once.page_size),
            (twice.columns, twice.rows, twice.page_size)
        );
        prop_assert_eq!(twice.mode, mode);
    }

    #[test]
    fn cursor_round_trips_on_every_page(
        mode in mode_ids(),
        page in 0u8..8,
        x in any::<u8>(),
        y in any::<u8>(),
    ) {
        let mut bios = VideoBios::new(fast_config());
        let mut hw = ModelHw::new();
        bios.set_mode(&mut hw, mode).unwrap();
        let (columns, rows) = (bios.state().columns, bios.state().rows);
        let (x, y) = (x % columns, y % rows);

        bios.set_cursor_position(&mut hw, page, x, y).unwrap();
        let (_, pos) = bios.cursor_position(&mut hw, page).unwrap();
        prop_assert_eq!(pos, CursorPos::new(x, y));
    }

    #[test]
    fn out_of_range_pages_change_nothing(page in 8u8..=255, x in any::<u8>(), y in any::<u8>()) {
        let mut bios = VideoBios::new(fast_config());
        let mut hw = ModelHw::new();
        bios.set_mode(&mut hw, 0x03).unwrap();
        bios.set_cursor_position(&mut hw, 0, 7, 7).unwrap();
        let before = *bios.state();
        hw.ports.clear();

        prop_assert!(bios.set_cursor_position(&mut hw, page, x, y).is_err());
        prop_assert!(bios.cursor_position(&mut hw, page).is_err());
        prop_assert!(bios.set_active_page(&mut hw, page).is_err());
        prop_assert!(bios.write_teletype(&mut hw, page, b'!', 0x07).is_err());

        prop_assert_eq!(*bios.state(), before);
        prop_assert!(hw.ports.is_empty());
    }

    #[test]
    fn zero_line_scroll_leaves_memory_untouched(
        seed in proptest::collection::vec(any::<u8>(), 64),
        attr in any::<u8>(),
        cols in any::<u8>(),
        rows in any::<u8>(),
        down in any::<bool>(),
    ) {
        let (mut bios, mut hw) = booted(fast_config());
        for (i, b) in hw.vga.plane_mut(0).iter_mut().enumerate() {
            *b = seed[i % seed.len()];
        }
        for (i, b) in hw.vga.plane_mut(1).iter_mut().enumerate() {
            *b = seed[(i * 7) % seed.len()];
        }
        let before = planes_01(&hw);

        if down {
            bios.scroll_down(&mut hw, 0, attr, cols, rows);
        } else {
            bios.scroll_up(&mut hw, 0, attr, cols, rows);
        }

        prop_assert!(planes_01(&hw) == before);
    }

    #[test]
    fn oversized_scroll_blanks_the_region(
        extra in 0u8..=200,
        attr in any::<u8>(),
        cols in 1u8..=40,
        rows in 1u8..=25,
    ) {
        let (mut bios, mut hw) = booted(fast_config());
        fill_rows(&bios, &mut hw, 0);
        let count = rows.saturating_add(extra);

        bios.scroll_up(&mut hw, count, attr, cols, rows);

        for y in 0..25u8 {
            for x in 0..40u8 {
                let expected = if x < cols && y < rows {
                    (0x00, attr)
                } else {
                    (b'0' + y, 0x10 + y)
                };
                prop_assert_eq!(cell(&bios, &hw, 0, x, y), expected, "cell ({}, {})", x, y);
            }
        }
    }

    #[test]
    fn write_string_advances_cursor_by_its_length(
        text in proptest::collection::vec(1u8..=0xFF, 1..=80),
        x in 0u8..40,
        y in 0u8..25,
    ) {
        let (mut bios, mut hw) = booted(fast_config());
        let mut buf = text.clone();
        buf.push(0);
        hw.load(0x7000, &buf);

        let n = bios
            .write_string(&mut hw, WriteStringFlags::MOVE_CURSOR, 0x7000, 0x07, x, y)
            .unwrap();
        prop_assert_eq!(n as usize, text.len());

        // Past the last row the cursor stays on the bottom line.
        let end = x as usize + text.len();
        let (ex, ey) = (end % 40, (y as usize + end / 40).min(24));
        prop_assert_eq!(bios.state().cursor[0], CursorPos::new(ex as u8, ey as u8));
        prop_assert_eq!(hw.vga.cursor_location() as usize, 40 * ey + ex);

        for (i, &chr) in text.iter().enumerate() {
            let idx = 40 * y as usize + x as usize + i;
            prop_assert_eq!(hw.vga.plane(0)[idx], chr);
        }
    }
}
