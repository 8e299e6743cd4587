use space_war::entities::*;

fn rect(x: f32, y: f32, w: f32, h: f32) -> Rect {
    Rect { x, y, w, h }
}

#[test]
fn overlap_detects_intersection() {
    let a = rect(0.0, 0.0, 10.0, 10.0);
    assert!(a.overlaps(&rect(5.0, 5.0, 10.0, 10.0)));
    assert!(a.overlaps(&rect(-5.0, -5.0, 10.0, 10.0)));
    assert!(a.overlaps(&rect(2.0, 2.0, 2.0, 2.0))); // fully contained
}

#[test]
fn overlap_detects_separation() {
    let a = rect(0.0, 0.0, 10.0, 10.0);
    assert!(!a.overlaps(&rect(10.5, 0.0, 5.0, 5.0)));
    assert!(!a.overlaps(&rect(0.0, 10.5, 5.0, 5.0)));
    assert!(!a.overlaps(&rect(-6.0, 0.0, 5.0, 5.0)));
}

#[test]
fn touching_edges_count_as_overlap() {
    // Separation requires strictly passing the other box
    let a = rect(0.0, 0.0, 10.0, 10.0);
    assert!(a.overlaps(&rect(10.0, 0.0, 5.0, 5.0))); // shared right edge
    assert!(a.overlaps(&rect(0.0, 10.0, 5.0, 5.0))); // shared bottom edge
    assert!(a.overlaps(&rect(10.0, 10.0, 5.0, 5.0))); // shared corner
}

#[test]
fn player_hit_box_is_double_height() {
    let player = Player {
        x: 240.0,
        y: 580.0,
        w: 34.0,
        h: 20.0,
        speed: 6.0,
        bullets: Vec::new(),
    };
    let hb = player.hit_box();
    assert_eq!(hb.x, 223.0); // x - w/2
    assert_eq!(hb.y, 560.0); // top at the apex
    assert_eq!(hb.w, 34.0);
    assert_eq!(hb.h, 40.0); // 2 × ship height
}

#[test]
fn enemy_rect_and_center() {
    let e = Enemy {
        x: 200.0,
        y: 100.0,
        w: 34.0,
        h: 18.0,
        speed: 2.0,
        hp: 1,
        fire_timer: 0.0,
        fire_interval: 1500.0,
    };
    assert_eq!(e.rect(), Rect { x: 200.0, y: 100.0, w: 34.0, h: 18.0 });
    assert_eq!(e.center(), (217.0, 109.0));
}

#[test]
fn phase_running_predicate() {
    assert!(GamePhase::Playing.is_running());
    assert!(!GamePhase::Stopped.is_running());
    assert!(!GamePhase::Paused.is_running());
    assert!(!GamePhase::GameOver.is_running());
}

#[test]
fn game_state_clone_is_independent() {
    let original = space_war::compute::init_state(1.0, 480.0, 640.0);
    let mut cloned = original.clone();

    // Mutating the clone must not affect the original
    cloned.player.x = 99.0;
    cloned.score = 999;
    cloned.enemies.push(Enemy {
        x: 5.0,
        y: 5.0,
        w: 34.0,
        h: 18.0,
        speed: 2.0,
        hp: 1,
        fire_timer: 0.0,
        fire_interval: 1500.0,
    });

    assert_eq!(original.player.x, 240.0);
    assert_eq!(original.score, 0);
    assert!(original.enemies.is_empty());
}
