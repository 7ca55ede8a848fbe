use std::time::Duration;

use qr_relay::ServerConfig;

#[test]
fn defaults_match_the_protocol() {
    let config = ServerConfig::default();
    assert_eq!(config.host, "127.0.0.1");
    assert_eq!(config.port, 5000);
    assert_eq!(config.buffer_capacity, 5);
    assert_eq!(config.poll_interval, Duration::from_millis(10));
    assert!(config.ready_file.is_none());
    assert_eq!(config.addr(), "127.0.0.1:5000");
}

#[test]
fn builders_override_defaults() {
    let config = ServerConfig::new()
        .with_host("0.0.0.0")
        .with_port(6000)
        .with_ready_file("/tmp/relay_ready")
        .with_buffer_capacity(8)
        .with_poll_interval(Duration::from_millis(2));

    assert_eq!(config.addr(), "0.0.0.0:6000");
    assert_eq!(config.buffer_capacity, 8);
    assert_eq!(config.poll_interval, Duration::from_millis(2));
    assert_eq!(
        config.ready_file.as_deref(),
        Some(std::path::Path::new("/tmp/relay_ready"))
    );
}
