use fireworks::firework::CHILD_COUNT;
use fireworks::{Config, Firework, Rgb, Show, TerminalCanvas, Vector2};

#[test]
fn firework_lifecycle_end_to_end() {
    let mut rng = fastrand::Rng::with_seed(2024);
    let mut firework = Firework::new(
        &mut rng,
        Vector2::new(100.0, 100.0),
        Vector2::new(0.0, 0.1),
        Vector2::new(0.0, -5.0),
    );

    let mut ticks = 0;
    while !firework.exploded() {
        assert!(firework.rocket().velocity().y < 0.0);
        firework.update();
        ticks += 1;
        assert!(ticks <= 60, "rocket still climbing after {ticks} ticks");
    }

    assert!(firework.rocket().velocity().y >= 0.0);
    assert_eq!(firework.children().len(), CHILD_COUNT);
    assert!(!firework.valid());

    let mut drained = 0;
    while !firework.valid() {
        firework.update();
        drained += 1;
        assert!(drained <= 200, "children never faded");
    }
    assert!(firework.children().is_empty());
}

#[test]
fn headless_show_runs_without_a_surface() {
    let config = Config::default();
    let mut show = Show::new(Vector2::new(800.0, 600.0), &config, fastrand::Rng::with_seed(1));

    let mut peak = 0;
    for _ in 0..3000 {
        show.tick();
        show.draw::<TerminalCanvas>(None);
        peak = peak.max(show.fireworks().len());
    }

    assert!(peak > 0);
    show.purge(false);
    assert!(show.fireworks().iter().all(|firework| !firework.valid()));
}

#[test]
fn show_paints_onto_a_terminal_canvas() {
    let config = Config::default();
    let mut canvas = TerminalCanvas::new(80, 48, config.scale, Rgb::BLACK);
    let mut show = Show::new(canvas.world_size(), &config, fastrand::Rng::with_seed(8));

    let mut painted = false;
    for _ in 0..600 {
        show.tick();
        canvas.fade(config.trail_fade);
        show.draw(Some(&mut canvas));

        painted |= (0..canvas.height())
            .any(|y| (0..canvas.width()).any(|x| canvas.pixel(x, y) != Rgb::BLACK));
    }
    assert!(painted);

    let mut frame = Vec::new();
    canvas.render(&mut frame).unwrap();
    assert_eq!(String::from_utf8(frame).unwrap().matches('▄').count(), 80 * 24);
}
