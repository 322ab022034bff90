use std::collections::HashMap;

use chrono::DateTime;
use glam::{DAffine3, DVec3};
use log::{debug, info, warn};
use thiserror::Error;

use crate::api::config::{ConfigError, OrreryConfig};
use crate::api::types::BodyId;
use crate::assets::catalog::{BodyCatalog, CatalogError};
use crate::assets::events::event_by_index;
use crate::components::body::BodyKind;
use crate::core::clock::SimulationClock;
use crate::core::motion::{
    MotionSimulator, PlanetTrack, SatelliteTrack, StarTrack, TickReport,
};
use crate::core::packing::{OrbitBands, OrbitPacker, PackInput};
use crate::core::satellite::{ParentFrame, SatelliteLayoutEngine};
use crate::core::scaling::ScalingEngine;
use crate::core::transform::BodyTransform;
use crate::ephemeris::{EphemerisError, EphemerisProvider, AU_KM};
use crate::input::queue::OrreryInput;
use crate::renderer::camera::{
    CameraRig, CameraTransitionController, TargetSample, TransitionEnd,
};

/// Overview camera distance, in star radii, when no band could be placed.
const EMPTY_SCENE_VIEW_RADII: f64 = 20.0;

#[derive(Debug, Error)]
pub enum SceneError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// A planet left out of the scene because its ephemeris failed at the
/// reference epoch. Its satellites are left out with it.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedBody {
    pub id: BodyId,
    pub name: String,
    pub error: EphemerisError,
}

/// Per-body render output for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyFrame {
    pub id: BodyId,
    pub kind: BodyKind,
    pub position: DVec3,
    pub visual_radius: f64,
    pub spin_angle: f64,
    pub axial_tilt: f64,
    /// Satellites only: inclination of the orbit plane about the parent's X axis.
    pub orbit_plane_tilt: Option<f64>,
    /// `parent_world × orbit × tilt × spin`.
    pub world: DAffine3,
}

/// An orbit ring for renderers: planets circle the origin, moons their parent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitRing {
    pub body: BodyId,
    pub center: DVec3,
    pub radius: f64,
    /// Rotation of the ring plane about X.
    pub tilt: f64,
}

/// Everything derived from (catalog, config, reference epoch).
struct Layout {
    bands: OrbitBands,
    skipped: Vec<SkippedBody>,
    visual_radii: HashMap<BodyId, f64>,
    motion: MotionSimulator,
}

/// A complete, ticking planetary scene.
///
/// Owns the catalog, the immutable configuration, the packed orbit bands,
/// the motion simulator and the camera controller. Bands are computed once
/// at build (and again only on [`Orrery::reconfigure`]); every tick moves
/// bodies along them.
pub struct Orrery<E: EphemerisProvider> {
    config: OrreryConfig,
    catalog: BodyCatalog,
    ephemeris: E,
    packer: OrbitPacker,
    bands: OrbitBands,
    skipped: Vec<SkippedBody>,
    visual_radii: HashMap<BodyId, f64>,
    motion: MotionSimulator,
    camera: CameraTransitionController,
    frames: Vec<BodyFrame>,
    selected: Option<BodyId>,
    last_transition_end: Option<(BodyId, TransitionEnd)>,
}

impl<E: EphemerisProvider> Orrery<E> {
    pub fn build(
        catalog: BodyCatalog,
        config: OrreryConfig,
        ephemeris: E,
    ) -> Result<Self, SceneError> {
        config.validate()?;

        let mut packer = OrbitPacker::new();
        let clock = SimulationClock::from_config(&config);
        let layout = lay_out(&catalog, &config, &ephemeris, &mut packer, clock);

        let rig = CameraRig::overview(overview_radius(&layout, &catalog));
        let camera = CameraTransitionController::new(&config, rig);

        info!(
            "orrery: {} bodies, {} bands, {} skipped",
            layout.visual_radii.len(),
            layout.bands.len(),
            layout.skipped.len()
        );

        let mut orrery = Self {
            config,
            catalog,
            ephemeris,
            packer,
            bands: layout.bands,
            skipped: layout.skipped,
            visual_radii: layout.visual_radii,
            motion: layout.motion,
            camera,
            frames: Vec::new(),
            selected: None,
            last_transition_end: None,
        };
        orrery.tick(0.0);
        Ok(orrery)
    }

    /// Build from a JSON catalog and a JSON configuration.
    pub fn from_json(catalog_json: &str, config_json: &str, ephemeris: E) -> Result<Self, SceneError> {
        let catalog = BodyCatalog::from_json(catalog_json)?;
        let config = OrreryConfig::from_json(config_json)?;
        Self::build(catalog, config, ephemeris)
    }

    /// Advance the simulation by `dt` render seconds and steer the camera.
    pub fn tick(&mut self, dt: f64) -> TickReport {
        let report = self.motion.tick(dt, &self.ephemeris);
        self.rebuild_frames();

        let frames = &self.frames;
        let lookup = |id: BodyId| {
            frames.iter().find(|frame| frame.id == id).map(|frame| TargetSample {
                position: frame.position,
                visual_radius: frame.visual_radius,
            })
        };
        let target = self.camera.followed();
        if let Some(end) = self.camera.tick(dt, lookup) {
            if let Some(target) = target {
                self.last_transition_end = Some((target, end));
            }
            if end == TransitionEnd::TargetLost {
                self.selected = None;
            }
        }

        report
    }

    fn rebuild_frames(&mut self) {
        self.frames.clear();

        for body in self.catalog.iter() {
            let Some(state) = self.motion.state(body.id) else {
                continue;
            };
            let visual_radius = self.visual_radii.get(&body.id).copied().unwrap_or(0.0);

            let (transform, orbit_plane_tilt) = match self.motion.satellite(body.id) {
                Some(moon) => {
                    let parent_position = self.motion.position(moon.parent).unwrap_or(DVec3::ZERO);
                    let phase = state.orbital_phase.unwrap_or(moon.layout.start_phase);
                    (
                        moon.orbit_transform(parent_position, phase),
                        Some(moon.layout.inclination_rad),
                    )
                }
                None => (BodyTransform::new().with_position(state.position), None),
            };
            let world = transform
                .with_axial_tilt(body.axial_tilt_rad())
                .with_spin(state.spin_angle)
                .world();

            self.frames.push(BodyFrame {
                id: body.id,
                kind: body.kind,
                position: state.position,
                visual_radius,
                spin_angle: state.spin_angle,
                axial_tilt: body.axial_tilt_rad(),
                orbit_plane_tilt,
                world,
            });
        }
    }

    pub fn apply_input(&mut self, input: OrreryInput) {
        match input {
            OrreryInput::SelectBody { id } => {
                self.select_body(id);
            }
            OrreryInput::ClearSelection => self.clear_selection(),
            OrreryInput::SetSpeed { multiplier } => {
                if let Err(err) = self.motion.clock_mut().set_speed(multiplier) {
                    warn!("ignoring speed change: {err}");
                }
            }
            OrreryInput::JumpTo { unix_ms } => match DateTime::from_timestamp_millis(unix_ms) {
                Some(date) => self.motion.clock_mut().jump_to(date),
                None => warn!("ignoring jump to out-of-range timestamp {unix_ms}"),
            },
            OrreryInput::JumpToEvent { index } => {
                match event_by_index(index).and_then(|event| event.date().map(|d| (event, d))) {
                    Some((event, date)) => {
                        info!("jumping to {}", event.name);
                        self.motion.clock_mut().jump_to(date);
                    }
                    None => warn!("no astronomical event at index {index}"),
                }
            }
            OrreryInput::TogglePause => self.motion.clock_mut().toggle_pause(),
        }
    }

    /// Select a body and fly the camera to it. Returns false (and changes
    /// nothing) when the body is not in the scene.
    pub fn select_body(&mut self, id: BodyId) -> bool {
        if self.frame(id).is_none() {
            warn!("cannot select {id:?}: not in the scene");
            return false;
        }
        self.selected = Some(id);
        self.camera.select_body(id);
        true
    }

    pub fn select_by_name(&mut self, name: &str) -> bool {
        match self.catalog.find(name) {
            Some(body) => {
                let id = body.id;
                self.select_body(id)
            }
            None => {
                warn!("cannot select `{name}`: unknown body");
                false
            }
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
        self.camera.cancel();
    }

    /// Replace the configuration and re-lay-out the scene. The clock takes
    /// the new speed multiplier; its date and pause state carry over, as
    /// does the selection when the selected body is still placed.
    pub fn reconfigure(&mut self, config: OrreryConfig) -> Result<(), SceneError> {
        config.validate()?;
        let mut clock = self.motion.clock().clone();
        clock.set_speed(config.time_speed_multiplier)?;
        debug!(
            "keeping simulation date {} over configured base {}",
            clock.simulation_date(),
            config.base_simulation_date
        );
        let layout = lay_out(&self.catalog, &config, &self.ephemeris, &mut self.packer, clock);

        self.bands = layout.bands;
        self.skipped = layout.skipped;
        self.visual_radii = layout.visual_radii;
        self.motion = layout.motion;
        let rig = self.camera.rig();
        self.camera = CameraTransitionController::new(&config, rig);
        self.config = config;
        debug!("orrery reconfigured");

        self.tick(0.0);
        if let Some(id) = self.selected {
            if !self.select_body(id) {
                self.selected = None;
            }
        }
        Ok(())
    }

    /// Current heliocentric distance in AU. Satellites report their parent's;
    /// the star reports zero.
    pub fn true_distance_au(&self, id: BodyId) -> Option<f64> {
        let body = self.catalog.get(id)?;
        match body.kind {
            BodyKind::Star => Some(0.0),
            BodyKind::Planet => self
                .ephemeris
                .vector(&body.name, self.motion.clock().simulation_date())
                .ok()
                .map(|v| v.length()),
            BodyKind::Satellite => body.parent.and_then(|parent| self.true_distance_au(parent)),
        }
    }

    /// Orbit rings for every placed planet and satellite.
    pub fn rings(&self) -> Vec<OrbitRing> {
        let planets = self.bands.iter().map(|band| OrbitRing {
            body: band.id,
            center: DVec3::ZERO,
            radius: band.radius,
            tilt: 0.0,
        });
        let moons = self.motion.satellites().iter().map(|moon| OrbitRing {
            body: moon.layout.id,
            center: self.motion.position(moon.parent).unwrap_or(DVec3::ZERO),
            radius: moon.layout.orbit_radius,
            tilt: moon.layout.inclination_rad,
        });
        planets.chain(moons).collect()
    }

    /// Star first, then planets and satellites in catalog order.
    pub fn frames(&self) -> &[BodyFrame] {
        &self.frames
    }

    pub fn frame(&self, id: BodyId) -> Option<&BodyFrame> {
        self.frames.iter().find(|frame| frame.id == id)
    }

    pub fn bands(&self) -> &OrbitBands {
        &self.bands
    }

    pub fn skipped(&self) -> &[SkippedBody] {
        &self.skipped
    }

    pub fn clock(&self) -> &SimulationClock {
        self.motion.clock()
    }

    pub fn camera(&self) -> &CameraTransitionController {
        &self.camera
    }

    pub fn catalog(&self) -> &BodyCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &OrreryConfig {
        &self.config
    }

    pub fn ephemeris(&self) -> &E {
        &self.ephemeris
    }

    pub fn selected(&self) -> Option<BodyId> {
        self.selected
    }

    /// The most recent camera transition to end, and how.
    pub fn last_transition_end(&self) -> Option<(BodyId, TransitionEnd)> {
        self.last_transition_end
    }

    /// Consume the most recent transition end, so it is reported once.
    pub fn take_transition_end(&mut self) -> Option<(BodyId, TransitionEnd)> {
        self.last_transition_end.take()
    }
}

/// Sample the reference epoch, pack bands and lay out satellites.
fn lay_out<E: EphemerisProvider>(
    catalog: &BodyCatalog,
    config: &OrreryConfig,
    ephemeris: &E,
    packer: &mut OrbitPacker,
    clock: SimulationClock,
) -> Layout {
    let scaling = ScalingEngine::new(config);
    let moons = SatelliteLayoutEngine::new(config);
    let mut skipped = Vec::new();
    let mut inputs = Vec::new();
    let mut visual_radii = HashMap::new();

    let root = catalog.root();
    visual_radii.insert(root.id, scaling.visual_radius(root.diameter_km));

    for planet in catalog.planets() {
        match ephemeris.vector(&planet.name, config.reference_epoch) {
            Ok(vector) => {
                let visual_radius = scaling.visual_radius(planet.diameter_km);
                visual_radii.insert(planet.id, visual_radius);
                inputs.push(PackInput {
                    id: planet.id,
                    name: planet.name.clone(),
                    true_distance_km: vector.length() * AU_KM,
                    visual_radius,
                });
            }
            Err(error) => {
                warn!("skipping {}: {error}", planet.name);
                for moon in catalog.children(planet.id) {
                    debug!("skipping {} with its parent {}", moon.name, planet.name);
                }
                skipped.push(SkippedBody {
                    id: planet.id,
                    name: planet.name.clone(),
                    error,
                });
            }
        }
    }

    let bands = packer.pack(&inputs, config).clone();

    let mut motion = MotionSimulator::new(clock);
    motion.track_star(StarTrack {
        id: root.id,
        rotation_period_days: root.rotation_period_days,
    });

    for planet in catalog.planets() {
        let Some(band) = bands.get(planet.id) else {
            continue;
        };
        motion.track_planet(
            PlanetTrack {
                id: planet.id,
                name: planet.name.clone(),
                band_radius: band.radius,
                rotation_period_days: planet.rotation_period_days,
            },
            DVec3::ZERO,
        );

        let parent = ParentFrame {
            visual_radius: band.visual_radius,
            radius_km: planet.radius_km(),
        };
        for layout in moons.layout_siblings(catalog.children(planet.id), parent) {
            visual_radii.insert(layout.id, layout.visual_radius);
            motion.track_satellite(SatelliteTrack {
                parent: planet.id,
                layout,
            });
        }
    }

    Layout {
        bands,
        skipped,
        visual_radii,
        motion,
    }
}

fn overview_radius(layout: &Layout, catalog: &BodyCatalog) -> f64 {
    let extent = layout.bands.outer_extent();
    if extent > 0.0 {
        extent
    } else {
        layout
            .visual_radii
            .get(&catalog.root().id)
            .copied()
            .unwrap_or_default()
            * EMPTY_SCENE_VIEW_RADII
    }
}
