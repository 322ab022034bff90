use glam::DVec3;

use orrery_engine::core::satellite::{ring_clearance, ParentFrame, SatelliteLayoutEngine};
use orrery_engine::renderer::camera::view_offset;
use orrery_engine::{
    BodyCatalog, EphemerisError, KeplerEphemeris, Orrery, OrreryConfig, OrreryInput,
    StaticEphemeris, TransitionEnd, TransitionState,
};

const FRAME_DT: f64 = 1.0 / 60.0;

const INNER_SYSTEM: &str = r#"{
    "parent": { "name": "Sun", "diameter": 1392700, "rotationPeriod": 25.38 },
    "planets": [
        { "name": "Mercury", "diameter": 4879, "orbitalPeriod": 87.97 },
        { "name": "Venus", "diameter": 12104, "orbitalPeriod": 224.7, "rotationPeriod": -243.0 },
        { "name": "Earth", "diameter": 12742, "orbitalPeriod": 365.256,
          "satellites": [ { "name": "Moon", "diameter": 3474.8, "distanceFromParent": 384400,
                            "orbitalPeriod": 27.32, "orbitalInclination": 5.145 } ] },
        { "name": "Mars", "diameter": 6779, "orbitalPeriod": 686.98 },
        { "name": "Planet9", "diameter": 40000 }
    ]
}"#;

fn inner_ephemeris() -> StaticEphemeris {
    StaticEphemeris::new()
        .with_body("Mercury", DVec3::new(0.39, 0.0, 0.0))
        .with_body("Venus", DVec3::new(0.0, 0.72, 0.0))
        .with_body("Earth", DVec3::new(-1.0, 0.0, 0.0))
        .with_body("Mars", DVec3::new(0.0, -1.52, 0.0))
}

fn inner_system() -> Orrery<StaticEphemeris> {
    let catalog = BodyCatalog::from_json(INNER_SYSTEM).expect("catalog should parse");
    Orrery::build(catalog, OrreryConfig::default(), inner_ephemeris()).expect("scene should build")
}

#[test]
fn inner_planets_get_ordered_non_overlapping_bands() {
    let orrery = inner_system();
    let config = orrery.config().clone();
    let names: Vec<&str> = orrery
        .bands()
        .iter()
        .map(|band| orrery.catalog().get(band.id).unwrap().name.as_str())
        .collect();
    assert_eq!(names, vec!["Mercury", "Venus", "Earth", "Mars"]);

    let bands: Vec<_> = orrery.bands().iter().collect();
    for pair in bands.windows(2) {
        let (inner, outer) = (pair[0], pair[1]);
        assert!(outer.radius > inner.radius);
        assert!(
            outer.inner_edge() - inner.outer_edge() >= config.orbit_safe_gap - 1e-6,
            "bands {:?} and {:?} overlap",
            inner.id,
            outer.id
        );
    }
}

#[test]
fn tiny_moon_orbit_clamps_to_lower_bound() {
    let engine = SatelliteLayoutEngine::new(&OrreryConfig::default());
    let parent = ParentFrame {
        visual_radius: 50.0,
        radius_km: 6378.0,
    };
    let moon_radius = engine.moon_visual_radius(1000.0, parent.visual_radius);
    assert_eq!(moon_radius, 20.0);

    let orbit = engine.moon_orbit_radius(1000.0, moon_radius, parent);
    assert!((orbit - 95.0).abs() < 1e-9);
}

#[test]
fn camera_flies_to_mars_and_settles() {
    let mut orrery = inner_system();
    assert!(orrery.select_by_name("Mars"));
    let mars = orrery.selected().unwrap();

    let mut ticks = 0;
    while orrery.camera().state() != TransitionState::Idle {
        orrery.tick(FRAME_DT);
        ticks += 1;
        assert!(ticks <= orrery.config().transition_max_ticks, "never settled");
    }
    assert_eq!(orrery.last_transition_end(), Some((mars, TransitionEnd::Arrived)));

    let frame = orrery.frame(mars).unwrap();
    let ideal = frame.position + view_offset(frame.visual_radius);
    let rig = orrery.camera().rig();
    assert!(rig.position.distance(ideal) < orrery.config().transition_epsilon);
    assert!(rig.focus.distance(frame.position) < orrery.config().transition_epsilon);
}

#[test]
fn planet_without_ephemeris_is_skipped() {
    let orrery = inner_system();
    assert_eq!(orrery.skipped().len(), 1);
    let skipped = &orrery.skipped()[0];
    assert_eq!(skipped.name, "Planet9");
    assert_eq!(
        skipped.error,
        EphemerisError::UnknownBody {
            name: "Planet9".to_string()
        }
    );
    assert!(orrery.frame(skipped.id).is_none());
}

#[test]
fn embedded_solar_system_places_every_planet() {
    let orrery = solar_system();

    assert!(orrery.skipped().is_empty());
    assert_eq!(orrery.bands().len(), 9);
    assert_eq!(orrery.frames().len(), orrery.catalog().len());
}

fn solar_system() -> Orrery<KeplerEphemeris> {
    let catalog = BodyCatalog::solar_system().expect("embedded catalog should parse");
    Orrery::build(catalog, OrreryConfig::default(), KeplerEphemeris::solar_system())
        .expect("scene should build")
}

#[test]
fn galilean_moons_orbit_on_separate_rings() {
    let mut orrery = solar_system();
    let jupiter = orrery.catalog().find("Jupiter").unwrap().id;
    let bubble = orrery.frame(jupiter).unwrap().visual_radius * orrery.config().moon_max_bubble_multiplier;

    let mut rings: Vec<_> = orrery
        .rings()
        .into_iter()
        .filter(|ring| orrery.catalog().get(ring.body).unwrap().parent == Some(jupiter))
        .collect();
    assert_eq!(rings.len(), 4);
    rings.sort_by(|a, b| a.radius.total_cmp(&b.radius));
    let names: Vec<&str> = rings
        .iter()
        .map(|ring| orrery.catalog().get(ring.body).unwrap().name.as_str())
        .collect();
    assert_eq!(names, vec!["Io", "Europa", "Ganymede", "Callisto"]);

    for pair in rings.windows(2) {
        let inner = orrery.frame(pair[0].body).unwrap().visual_radius;
        let outer = orrery.frame(pair[1].body).unwrap().visual_radius;
        assert!(pair[1].radius - pair[0].radius >= ring_clearance(inner, outer) - 1e-9);
    }
    assert!(rings.iter().all(|ring| ring.radius <= bubble + 1e-9));

    // Inclined rings still keep every pair of moons apart while they move.
    orrery.apply_input(OrreryInput::SetSpeed { multiplier: 86_400.0 * 3.0 });
    for _ in 0..600 {
        orrery.tick(FRAME_DT);
        for pair in rings.windows(2) {
            let a = orrery.frame(pair[0].body).unwrap();
            let b = orrery.frame(pair[1].body).unwrap();
            assert!(a.position.distance(b.position) > a.visual_radius + b.visual_radius);
        }
    }
}

#[test]
fn planets_stay_on_fixed_bands_across_many_days() {
    let mut orrery = solar_system();
    let bands = orrery.bands().clone();
    let start = orrery.clock().simulation_date();
    orrery.apply_input(OrreryInput::SetSpeed { multiplier: 86_400.0 * 30.0 });

    for _ in 0..1200 {
        let report = orrery.tick(FRAME_DT);
        assert!(report.failures.is_empty());
        for band in bands.iter() {
            let position = orrery.frame(band.id).unwrap().position;
            assert!(
                (position.length() - band.radius).abs() < 1e-6,
                "{:?} drifted off its band: {} vs {}",
                band.id,
                position.length(),
                band.radius
            );
        }
    }

    assert_eq!(orrery.bands(), &bands);
    let days = (orrery.clock().simulation_date() - start).num_days();
    assert!(days >= 599, "only {days} days simulated");
}

#[test]
fn identical_runs_are_bit_identical() {
    let run = || {
        let catalog = BodyCatalog::solar_system().unwrap();
        let mut orrery =
            Orrery::build(catalog, OrreryConfig::default(), KeplerEphemeris::solar_system()).unwrap();
        orrery.select_by_name("Saturn");
        for _ in 0..240 {
            orrery.tick(FRAME_DT);
        }
        let positions: Vec<DVec3> = orrery.frames().iter().map(|f| f.position).collect();
        (positions, orrery.camera().rig())
    };

    let (first, first_rig) = run();
    let (second, second_rig) = run();
    assert_eq!(first, second);
    assert_eq!(first_rig, second_rig);
}
