use wasm_bindgen::prelude::*;
use orrery_engine::*;

/// The embedded solar system, positioned by mean Keplerian elements.
fn build(config: OrreryConfig) -> Result<Orrery<KeplerEphemeris>, SceneError> {
    let catalog = BodyCatalog::solar_system()?;
    Orrery::build(catalog, config, KeplerEphemeris::solar_system())
}

orrery_web::export_orrery!(KeplerEphemeris, "solar-system", build);
