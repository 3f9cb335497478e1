fn main() {
    // Build-time provisioning, read through `option_env!` in config.rs.
    for var in [
        "SMARTTRAP_WIFI_SSID",
        "SMARTTRAP_WIFI_PASSWORD",
        "SMARTTRAP_TICK_PERIOD_MS",
    ] {
        println!("cargo:rerun-if-env-changed={var}");
    }

    // Host builds (tests, simulation) run without the ESP-IDF toolchain.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
