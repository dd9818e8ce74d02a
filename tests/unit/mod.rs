mod adapter;
mod usecase;

use storefront_checkout::logging::AppLogContext;
use storefront_checkout::{AppBasepathCfg, AppConfig, AppSharedState};

pub(crate) const EXAMPLE_REL_PATH: &str = "/tests/unit/examples/";

// the durable slot in config_ok.json lives under the manifest dir, remove
// it once per test-process so a previous run's carts never rehydrate here
static SLOT_FILE_RESET: std::sync::Once = std::sync::Once::new();

pub(crate) fn ut_setup_share_state(cfg_fname: &str) -> AppSharedState {
    let service_basepath = env!("CARGO_MANIFEST_DIR").to_string();
    SLOT_FILE_RESET.call_once(|| {
        let slot_path = service_basepath.clone() + "/tmp/cart_slot_unittest.json";
        let _ = std::fs::remove_file(slot_path);
    });
    let fullpath = service_basepath.clone() + EXAMPLE_REL_PATH + cfg_fname;
    let cfg = AppConfig {
        service: AppConfig::parse_from_file(fullpath).unwrap(),
        basepath: AppBasepathCfg {
            system: service_basepath.clone(),
            service: service_basepath,
        },
    };
    let logctx = AppLogContext::new(&cfg.basepath, &cfg.service.logging).unwrap();
    AppSharedState::new(cfg, logctx)
}
