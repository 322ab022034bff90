pub mod runner;

pub use runner::{clamp_frame_dt, OrreryRunner, MAX_FRAME_DT};

#[doc(hidden)]
pub use js_sys;

/// Generate all `#[wasm_bindgen]` exports for an orrery app.
///
/// Generates:
/// - `thread_local!` storage for the OrreryRunner
/// - `with_runner()` helper function
/// - All wasm-bindgen exports (init, tick, input handlers, data accessors)
///
/// # Usage
///
/// ```ignore
/// use wasm_bindgen::prelude::*;
/// use orrery_engine::*;
///
/// fn build(config: OrreryConfig) -> Result<Orrery<KeplerEphemeris>, SceneError> {
///     Orrery::build(BodyCatalog::solar_system()?, config, KeplerEphemeris::solar_system())
/// }
///
/// orrery_web::export_orrery!(KeplerEphemeris, "solar-system", build);
/// ```
///
/// # Arguments
///
/// - `$ephemeris`: The `EphemerisProvider` the scene samples
/// - `$app_name`: A string literal used in log messages
/// - `$build`: `fn(OrreryConfig) -> Result<Orrery<$ephemeris>, SceneError>`
#[macro_export]
macro_rules! export_orrery {
    ($ephemeris:ty, $app_name:literal, $build:path) => {
        use std::cell::RefCell;

        thread_local! {
            static RUNNER: RefCell<Option<$crate::OrreryRunner<$ephemeris>>> = RefCell::new(None);
        }

        /// Runs `f` against the runner. `None` until `orrery_init` has succeeded.
        fn with_runner<R>(f: impl FnOnce(&mut $crate::OrreryRunner<$ephemeris>) -> R) -> Option<R> {
            RUNNER.with(|cell| cell.borrow_mut().as_mut().map(f))
        }

        fn start(config: OrreryConfig) -> bool {
            console_error_panic_hook::set_once();
            let _ = console_log::init_with_level(log::Level::Info);

            match $build(config) {
                Ok(orrery) => {
                    let runner = $crate::OrreryRunner::new(orrery);
                    RUNNER.with(|cell| {
                        *cell.borrow_mut() = Some(runner);
                    });
                    log::info!("{}: initialized", $app_name);
                    true
                }
                Err(err) => {
                    log::error!("{}: failed to build scene: {}", $app_name, err);
                    false
                }
            }
        }

        #[wasm_bindgen]
        pub fn orrery_init() -> bool {
            start(OrreryConfig::default())
        }

        #[wasm_bindgen]
        pub fn orrery_init_with_config(json: &str) -> bool {
            match OrreryConfig::from_json(json) {
                Ok(config) => start(config),
                Err(err) => {
                    log::error!("{}: {}", $app_name, err);
                    false
                }
            }
        }

        #[wasm_bindgen]
        pub fn orrery_reconfigure(json: &str) -> bool {
            let result = OrreryConfig::from_json(json)
                .map_err(SceneError::from)
                .and_then(|config| with_runner(|r| r.reconfigure(config)).unwrap_or(Ok(())));
            match result {
                Ok(()) => true,
                Err(err) => {
                    log::warn!("{}: keeping previous configuration: {}", $app_name, err);
                    false
                }
            }
        }

        #[wasm_bindgen]
        pub fn orrery_tick(dt: f32) {
            with_runner(|r| r.tick(dt));
        }

        #[wasm_bindgen]
        pub fn orrery_select_body(id: u32) {
            with_runner(|r| r.push_input(OrreryInput::SelectBody { id: BodyId(id) }));
        }

        #[wasm_bindgen]
        pub fn orrery_clear_selection() {
            with_runner(|r| r.push_input(OrreryInput::ClearSelection));
        }

        #[wasm_bindgen]
        pub fn orrery_set_speed(multiplier: f64) {
            with_runner(|r| r.push_input(OrreryInput::SetSpeed { multiplier }));
        }

        #[wasm_bindgen]
        pub fn orrery_jump_to(unix_ms: f64) {
            with_runner(|r| r.push_input(OrreryInput::JumpTo { unix_ms: unix_ms as i64 }));
        }

        #[wasm_bindgen]
        pub fn orrery_jump_to_now() {
            let now = $crate::js_sys::Date::now();
            with_runner(|r| r.jump_to_now(now));
        }

        #[wasm_bindgen]
        pub fn orrery_jump_to_event(index: u32) {
            with_runner(|r| r.push_input(OrreryInput::JumpToEvent { index: index as usize }));
        }

        #[wasm_bindgen]
        pub fn orrery_toggle_pause() {
            with_runner(|r| r.push_input(OrreryInput::TogglePause));
        }

        #[wasm_bindgen]
        pub fn orrery_custom_event(kind: u32, a: f32, b: f32, c: f32) {
            with_runner(|r| r.push_custom(kind, a, b, c));
        }

        // ---- Data accessors ----

        #[wasm_bindgen]
        pub fn get_shared_ptr() -> *const f32 {
            with_runner(|r| r.shared_ptr()).unwrap_or(std::ptr::null())
        }

        #[wasm_bindgen]
        pub fn get_instances_ptr() -> *const f32 {
            with_runner(|r| r.instances_ptr()).unwrap_or(std::ptr::null())
        }

        #[wasm_bindgen]
        pub fn get_instance_count() -> u32 {
            with_runner(|r| r.instance_count()).unwrap_or_default()
        }

        #[wasm_bindgen]
        pub fn get_rings_ptr() -> *const f32 {
            with_runner(|r| r.rings_ptr()).unwrap_or(std::ptr::null())
        }

        #[wasm_bindgen]
        pub fn get_ring_count() -> u32 {
            with_runner(|r| r.ring_count()).unwrap_or_default()
        }

        #[wasm_bindgen]
        pub fn get_events_ptr() -> *const f32 {
            with_runner(|r| r.events_ptr()).unwrap_or(std::ptr::null())
        }

        #[wasm_bindgen]
        pub fn get_events_len() -> u32 {
            with_runner(|r| r.events_len()).unwrap_or_default()
        }

        // ---- Capacity accessors ----

        #[wasm_bindgen]
        pub fn get_max_instances() -> u32 {
            with_runner(|r| r.max_instances()).unwrap_or_default()
        }

        #[wasm_bindgen]
        pub fn get_max_rings() -> u32 {
            with_runner(|r| r.max_rings()).unwrap_or_default()
        }

        #[wasm_bindgen]
        pub fn get_max_events() -> u32 {
            with_runner(|r| r.max_events()).unwrap_or_default()
        }

        #[wasm_bindgen]
        pub fn get_buffer_total_floats() -> u32 {
            with_runner(|r| r.buffer_total_floats()).unwrap_or_default()
        }

        // ---- Body metadata ----

        #[wasm_bindgen]
        pub fn get_body_name(id: u32) -> String {
            with_runner(|r| {
                r.orrery()
                    .catalog()
                    .get(BodyId(id))
                    .map(|body| body.name.clone())
            })
            .flatten()
            .unwrap_or_default()
        }

        #[wasm_bindgen]
        pub fn get_body_count() -> u32 {
            with_runner(|r| r.orrery().catalog().len() as u32).unwrap_or_default()
        }
    };
}
