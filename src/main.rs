// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use anyhow::{Context, Result};
use chromobridge::protocol::{MqttSession, parse_int, serial};
use chromobridge::{Bridge, BridgeConfig, DeviceAddress};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "chromobridge", version)]
#[command(about = "Bridge MQTT set topics to Chromoflex controllers on a USP3 serial bus", long_about = None)]
struct Cli {
    /// MQTT broker host
    #[arg(long, default_value = "localhost")]
    mqtt_host: String,

    /// MQTT broker port
    #[arg(long, default_value_t = 1883)]
    mqtt_port: u16,

    /// Topic prefix for subscribing and publishing
    #[arg(long, default_value = "chromo/")]
    mqtt_topic: String,

    /// Serial device the controllers are attached to
    #[arg(long)]
    serial: String,

    /// Address used by topics that don't name one (0 = broadcast, 0x.. accepted)
    #[arg(long, default_value = "0", value_parser = parse_address)]
    defaddr: DeviceAddress,

    /// Log filter, e.g. `info` or `chromobridge=debug`
    #[arg(long, default_value = "warn")]
    log: String,
}

fn parse_address(text: &str) -> Result<DeviceAddress, String> {
    let value = parse_int(text).ok_or_else(|| format!("not an integer: {text}"))?;
    DeviceAddress::try_from(value).map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&cli.log).context("invalid --log filter")?)
        .init();

    let config = BridgeConfig::builder()
        .mqtt_host(cli.mqtt_host)
        .mqtt_port(cli.mqtt_port)
        .topic_prefix(cli.mqtt_topic)
        .serial_device(cli.serial)
        .default_address(cli.defaddr)
        .build()?;

    tracing::info!(
        prefix = %config.topic_prefix(),
        host = %config.mqtt_host(),
        port = config.mqtt_port(),
        "Starting chromobridge {}",
        env!("CARGO_PKG_VERSION")
    );

    let port = serial::open(config.serial_device())
        .with_context(|| format!("failed to open serial port {}", config.serial_device()))?;
    let mut bridge = Bridge::new(port);
    let session = MqttSession::new(&config);

    tokio::select! {
        () = session.run(&mut bridge) => {}
        result = tokio::signal::ctrl_c() => {
            result.context("failed to listen for Ctrl-C")?;
            tracing::info!("Shutting down");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_defaults() {
        let cli = Cli::try_parse_from(["chromobridge", "--serial", "/dev/ttyUSB0"]).unwrap();
        assert_eq!(cli.mqtt_host, "localhost");
        assert_eq!(cli.mqtt_port, 1883);
        assert_eq!(cli.mqtt_topic, "chromo/");
        assert!(cli.defaddr.is_broadcast());
        assert_eq!(cli.log, "warn");
    }

    #[test]
    fn serial_is_required() {
        assert!(Cli::try_parse_from(["chromobridge"]).is_err());
    }

    #[test]
    fn defaddr_accepts_hex() {
        let cli = Cli::try_parse_from(["chromobridge", "--serial", "x", "--defaddr", "0x0A0B0C"])
            .unwrap();
        assert_eq!(cli.defaddr.value(), 0x0A_0B0C);
    }

    #[test]
    fn defaddr_out_of_range_is_rejected() {
        let args = ["chromobridge", "--serial", "x", "--defaddr", "0x1000000"];
        assert!(Cli::try_parse_from(args).is_err());
    }
}
