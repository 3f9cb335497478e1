//! Integration tests for the real hardware adapter on the host
//! simulation backend (simulated GPIO bank and LEDC channel).

use smarttrap::adapters::hardware::HardwareAdapter;
use smarttrap::adapters::time::Esp32TimeAdapter;
use smarttrap::app::ports::{ActuatorPort, DistancePort};
use smarttrap::config::SystemConfig;
use smarttrap::drivers::hw_init;

#[test]
fn simulated_board_times_out_to_max_and_drives_outputs() {
    let mut config = SystemConfig::default();
    config.timing.echo_timeout_us = 2_000;
    hw_init::init_peripherals(&config.pins, &config.pwm).unwrap();

    let mut board = HardwareAdapter::from_config(&config, Esp32TimeAdapter::new());

    // Nothing drives ECHO on the host, so every ping times out.
    let sample = board.measure();
    assert!(sample.was_clamped());
    assert!(sample.timed_out());
    assert!((sample.mm() - config.thresholds.max_mm).abs() < f32::EPSILON);
    assert_eq!(board.sensor_timeouts(), 1);

    board.set_fan_duty(config.fan_duty.high);
    board.set_light(true);
    assert_eq!(hw_init::sim_ledc_duty(), 900);
    assert!(hw_init::gpio_read(config.pins.uv_light_gpio));
    assert!(board.is_light_on());

    board.all_off();
    assert_eq!(hw_init::sim_ledc_duty(), 0);
    assert!(!hw_init::gpio_read(config.pins.uv_light_gpio));
    assert_eq!(board.fan_duty(), 0);
}
