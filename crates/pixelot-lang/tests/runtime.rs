//! End-to-end runs through the public API: whole scripts in, pixels out.

use pixelot_lang::{Canvas, Color, Session, run};

fn canvas_after(source: &str, size: usize) -> Canvas {
    let outcome = run(source, size, size);
    assert!(outcome.is_ok(), "unexpected diagnostics: {:?}", outcome.diagnostics);
    outcome.canvas
}

/// Runs a script that blacks out the whole canvas unless `expr` is truthy,
/// then asserts no black pixel exists. A cheap way to assert on expression
/// values through the language itself.
fn assert_script_true(expr: &str) {
    let source =
        format!("Spawn(0, 0)\nGoTo [ok] ({expr})\nColor(\"Black\")\nFill()\nok\n");
    let outcome = run(&source, 8, 8);
    assert!(outcome.is_ok(), "unexpected diagnostics: {:?}", outcome.diagnostics);
    assert_eq!(
        outcome.canvas.count_color(Color::Black, 0, 0, 7, 7),
        0,
        "expression evaluated false: {expr}"
    );
}

// ─── Drawing commands ────────────────────────────────────────────────────────

#[test]
fn horizontal_line_covers_start_through_end() {
    let canvas = canvas_after("Spawn(0, 0)\nColor(\"Black\")\nDrawLine(1, 0, 5)\n", 16);
    for x in 0..=5 {
        assert_eq!(canvas.get(x, 0), Some(Color::Black), "cell ({x}, 0)");
    }
    assert_eq!(canvas.get(6, 0), Some(Color::White));
}

#[test]
fn even_brush_size_rounds_down_to_odd() {
    // Size(4) behaves as 3: the diagonal line carries a 3-wide band.
    let canvas = canvas_after(
        "Spawn(8, 8)\nColor(\"Red\")\nSize(4)\nDrawLine(1, 1, 2)\n",
        16,
    );
    for step in 0..=2 {
        let (cx, cy) = (8 + step, 8 + step);
        for dy in -1..=1 {
            for dx in -1..=1 {
                assert_eq!(canvas.get(cx + dx, cy + dy), Some(Color::Red));
            }
        }
    }
    assert_eq!(canvas.get(6, 8), Some(Color::White));
}

#[test]
fn circle_of_radius_three_draws_sixteen_pixels_and_moves_actor() {
    let source = "Spawn(5, 5)\nColor(\"Black\")\nDrawCircle(0, 1, 3)\n";
    let outcome = run(source, 10, 10);
    assert!(outcome.is_ok(), "{:?}", outcome.diagnostics);
    assert_eq!(outcome.canvas.count_color(Color::Black, 0, 0, 9, 9), 16);
    // Cardinal extremes of the ring.
    for (x, y) in [(5, 2), (5, 8), (2, 5), (8, 5)] {
        assert_eq!(outcome.canvas.get(x, y), Some(Color::Black), "cell ({x}, {y})");
    }
    // Center stays untouched; the actor lands on the ring's bottom.
    assert_eq!(outcome.canvas.get(5, 5), Some(Color::White));
    assert_eq!((outcome.actor.x(), outcome.actor.y()), (5, 8));
}

#[test]
fn rectangle_outline_leaves_interior_and_actor_alone() {
    let source = "Spawn(5, 5)\nColor(\"Blue\")\nDrawRectangle(4, 3)\n";
    let outcome = run(source, 12, 12);
    assert!(outcome.is_ok(), "{:?}", outcome.diagnostics);
    assert_eq!(outcome.canvas.get(3, 4), Some(Color::Blue));
    assert_eq!(outcome.canvas.get(6, 6), Some(Color::Blue));
    assert_eq!(outcome.canvas.get(4, 5), Some(Color::White));
    assert_eq!((outcome.actor.x(), outcome.actor.y()), (5, 5));
}

#[test]
fn fill_respects_region_boundaries() {
    // A black vertical wall splits the canvas; fill only floods the left side.
    let canvas = canvas_after(
        "Spawn(4, 0)\nColor(\"Black\")\nDrawLine(0, 1, 7)\n\
         Spawn(0, 0)\nColor(\"Green\")\nFill()\n",
        8,
    );
    assert_eq!(canvas.get(3, 7), Some(Color::Green));
    assert_eq!(canvas.get(4, 3), Some(Color::Black));
    assert_eq!(canvas.get(5, 3), Some(Color::White));
}

#[test]
fn transparent_brush_moves_without_painting() {
    let source = "Spawn(0, 0)\nDrawLine(1, 1, 5)\nColor(\"Red\")\nDrawLine(1, 0, 2)\n";
    let outcome = run(source, 16, 16);
    assert!(outcome.is_ok(), "{:?}", outcome.diagnostics);
    // The first line painted nothing but moved the actor to (5, 5).
    assert_eq!(outcome.canvas.count_color(Color::Red, 0, 0, 15, 15), 3);
    assert_eq!(outcome.canvas.get(5, 5), Some(Color::Red));
    assert_eq!(outcome.canvas.get(7, 5), Some(Color::Red));
}

#[test]
fn respawn_repositions_without_drawing() {
    let canvas = canvas_after("Spawn(0, 0)\nSpawn(7, 7)\nColor(\"Red\")\nDrawLine(0, -1, 1)\n", 8);
    assert_eq!(canvas.get(7, 7), Some(Color::Red));
    assert_eq!(canvas.get(7, 6), Some(Color::Red));
    assert_eq!(canvas.get(0, 0), Some(Color::White));
}

// ─── Control flow ────────────────────────────────────────────────────────────

#[test]
fn label_loop_runs_until_condition_fails() {
    let source = "Spawn(0, 0)\n\
                  Color(\"Red\")\n\
                  i <- 0\n\
                  again\n\
                  DrawLine(1, 0, 1)\n\
                  i <- i + 1\n\
                  GoTo [again] (i < 5)\n";
    let outcome = run(source, 16, 16);
    assert!(outcome.is_ok(), "{:?}", outcome.diagnostics);
    // Five unit lines starting from x=0 paint x=0..=5 and leave the actor there.
    for x in 0..=5 {
        assert_eq!(outcome.canvas.get(x, 0), Some(Color::Red), "cell ({x}, 0)");
    }
    assert_eq!((outcome.actor.x(), outcome.actor.y()), (5, 0));
}

#[test]
fn step_limit_halts_an_unbounded_loop() {
    let mut session = Session::new(8, 8).unwrap().with_step_limit(1_000);
    let diagnostics = session.run("Spawn(0, 0)\nforever\nGoTo [forever] (1 == 1)\n");
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].category, pixelot_lang::Category::Runtime);
    assert!(diagnostics[0].message.contains("1000 steps"));
}

#[test]
fn backward_jump_condition_accepts_nonzero_integers() {
    // `n` counts down; the bare integer condition is truthy until it hits 0.
    let source = "Spawn(0, 0)\n\
                  Color(\"Blue\")\n\
                  n <- 3\n\
                  top\n\
                  DrawLine(0, 1, 1)\n\
                  n <- n - 1\n\
                  GoTo [top] (n)\n";
    let outcome = run(source, 8, 8);
    assert!(outcome.is_ok(), "{:?}", outcome.diagnostics);
    assert_eq!((outcome.actor.x(), outcome.actor.y()), (0, 3));
}

// ─── Expressions and builtins ────────────────────────────────────────────────

#[test]
fn arithmetic_precedence() {
    assert_script_true("2 + 3 * 4 == 14");
    assert_script_true("2 ** 3 + 4 * 5 == 28");
    assert_script_true("10 - 4 - 3 == 3");
    assert_script_true("7 % 3 == 1");
    assert_script_true("-2 * 3 == 0 - 6");
    assert_script_true("2 ** 3 ** 2 == 512");
}

#[test]
fn comparison_and_logic() {
    assert_script_true("3 > 2 && 2 >= 2");
    assert_script_true("1 < 2 || 5 <= 4");
    assert_script_true("(3 > 2) == 1");
    assert_script_true("\"Red\" == \"Red\"");
}

#[test]
fn position_queries_track_the_actor() {
    assert_script_true("GetActualX() == 0 && GetActualY() == 0");
}

#[test]
fn canvas_size_query() {
    // assert_script_true runs on an 8x8 canvas.
    assert_script_true("GetCanvasSize() == 8");
}

#[test]
fn brush_queries_reflect_state() {
    let source = "Spawn(0, 0)\n\
                  Color(\"Red\")\n\
                  Size(4)\n\
                  ok <- IsBrushColor(\"Red\") && IsBrushSize(3) && GetBrushSize() == 3\n\
                  GoTo [done] (ok)\n\
                  Fill()\n\
                  done\n";
    let outcome = run(source, 8, 8);
    assert!(outcome.is_ok(), "{:?}", outcome.diagnostics);
    assert_eq!(outcome.canvas.count_color(Color::Red, 0, 0, 7, 7), 0);
}

#[test]
fn color_count_over_a_rectangle() {
    let source = "Spawn(0, 0)\n\
                  Color(\"Red\")\n\
                  DrawLine(1, 0, 3)\n\
                  n <- GetColorCount(\"Red\", 0, 0, 7, 7)\n\
                  GoTo [done] (n == 4)\n\
                  Color(\"Black\")\n\
                  Fill()\n\
                  done\n";
    let outcome = run(source, 8, 8);
    assert!(outcome.is_ok(), "{:?}", outcome.diagnostics);
    assert_eq!(outcome.canvas.count_color(Color::Black, 0, 0, 7, 7), 0);
}

#[test]
fn color_count_with_a_corner_off_canvas_is_zero() {
    assert_script_true("GetColorCount(\"White\", 0, 0, 8, 7) == 0");
    assert_script_true("GetColorCount(\"White\", 0, 0, 7, 7) == 64");
}

#[test]
fn canvas_color_probe_relative_to_actor() {
    let source = "Spawn(2, 2)\n\
                  Color(\"Red\")\n\
                  DrawLine(1, 0, 1)\n\
                  Spawn(2, 2)\n\
                  ok <- IsCanvasColor(\"Red\", 1, 0) && IsCanvasColor(\"White\", 0, 1)\n\
                  GoTo [done] (ok)\n\
                  Color(\"Black\")\n\
                  Fill()\n\
                  done\n";
    let outcome = run(source, 8, 8);
    assert!(outcome.is_ok(), "{:?}", outcome.diagnostics);
    assert_eq!(outcome.canvas.count_color(Color::Black, 0, 0, 7, 7), 0);
}

#[test]
fn canvas_color_probe_off_canvas_is_false() {
    assert_script_true("(IsCanvasColor(\"White\", 0 - 1, 0)) == 0");
}

#[test]
fn canvas_color_probe_with_extreme_offsets_is_false() {
    // Offsets at the edges of the integer range leave the canvas, they do
    // not wrap back onto it.
    assert_script_true("(IsCanvasColor(\"Red\", 9223372036854775807, 0)) == 0");
    assert_script_true("(IsCanvasColor(\"Red\", 0 - 9223372036854775807, 0)) == 0");
    assert_script_true("(IsCanvasColor(\"White\", 0, 9223372036854775807)) == 0");
}

#[test]
fn color_names_are_case_insensitive() {
    let canvas = canvas_after("Spawn(0, 0)\nColor(\"dark-blue\")\nDrawLine(1, 0, 1)\n", 8);
    assert_eq!(canvas.get(0, 0), Some(Color::DarkBlue));
}

// ─── Host behaviors ──────────────────────────────────────────────────────────

#[test]
fn reruns_are_deterministic_and_fresh() {
    let source = "Spawn(1, 1)\nColor(\"Purple\")\nDrawCircle(0, 0, 3)\nFill()\n";
    let mut session = Session::new(12, 12).unwrap();
    assert!(session.run(source).is_empty());
    let first = session.canvas().clone();
    assert!(session.run(source).is_empty());
    assert_eq!(session.canvas(), &first);
}

#[test]
fn repaint_hook_fires_once_per_mutating_statement() {
    let mut session = Session::new(8, 8).unwrap();
    let mut repaints = 0usize;
    let diagnostics = session.run_with_hook(
        "Spawn(0, 0)\nColor(\"Red\")\nDrawLine(1, 0, 2)\nSize(3)\nDrawLine(0, 1, 2)\nFill()\n",
        &mut |_canvas| repaints += 1,
    );
    assert!(diagnostics.is_empty(), "{diagnostics:?}");
    // Spawn, Color and Size touch no pixels; the two lines and the fill do.
    assert_eq!(repaints, 3);
}
