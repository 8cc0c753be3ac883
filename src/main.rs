use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use postal::{ClientConfig, Device, DeviceType, Notification, Service};

#[derive(Parser)]
#[command(name = "postal")]
#[command(about = "Manage devices registered with a Postal push notification server")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Hostname of the postal server [default: localhost]
    #[arg(short = 'H', long, global = true)]
    host: Option<String>,

    /// Port of the postal server [default: 5300]
    #[arg(short, long, global = true)]
    port: Option<u16>,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a device (or update its type)
    Add {
        /// User identifier owning the device
        #[arg(short, long)]
        user: String,

        /// Device token
        #[arg(short, long)]
        device_token: String,

        /// Device type: aps|c2dm|gcm
        #[arg(short = 't', long)]
        device_type: DeviceType,
    },

    /// Remove a device
    Remove {
        /// User identifier owning the device
        #[arg(short, long)]
        user: String,

        /// Device token
        #[arg(short, long)]
        device_token: String,
    },

    /// Show one device
    Get {
        /// User identifier owning the device
        #[arg(short, long)]
        user: String,

        /// Device token
        #[arg(short, long)]
        device_token: String,
    },

    /// List all devices of a user
    List {
        /// User identifier
        #[arg(short, long)]
        user: String,
    },

    /// Send a notification
    Notify {
        /// Notify every device of this user (repeatable)
        #[arg(short, long = "user")]
        users: Vec<String>,

        /// Notify this device token (repeatable)
        #[arg(short, long = "device")]
        devices: Vec<String>,

        /// Alert text shown on APS devices
        #[arg(short, long)]
        alert: Option<String>,

        /// Badge count for APS devices
        #[arg(short, long)]
        badge: Option<u32>,

        /// Sound for APS devices
        #[arg(short, long)]
        sound: Option<String>,

        /// Collapse key for Android devices
        #[arg(short, long)]
        collapse_key: Option<String>,
    },

    /// Show server counters
    Status,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so command output stays machine readable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "postal=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = ClientConfig::load().context("Failed to load configuration")?;
    if let Some(host) = cli.host {
        config.host = host;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }
    tracing::debug!(host = %config.host, port = config.port, "Configuration loaded");

    let service = Service::from_config(&config)?;

    match cli.command {
        Commands::Add {
            user,
            device_token,
            device_type,
        } => {
            let device = Device::new(user, device_token, device_type);
            let stored = service
                .add_device(&device)
                .await
                .context("Failed to add device")?;
            print_json(&stored)?;
        }

        Commands::Remove { user, device_token } => {
            // Postal only looks at user and token when removing
            let device = Device::new(user, device_token, DeviceType::Ios);
            service
                .remove_device(&device)
                .await
                .context("Failed to remove device")?;
        }

        Commands::Get { user, device_token } => {
            let device = service
                .get_device(&user, &device_token)
                .await
                .context("Failed to fetch device")?;
            print_json(&device)?;
        }

        Commands::List { user } => {
            let devices = service
                .get_devices(&user)
                .await
                .context("Failed to list devices")?;
            print_json(&devices)?;
        }

        Commands::Notify {
            users,
            devices,
            alert,
            badge,
            sound,
            collapse_key,
        } => {
            if users.is_empty() && devices.is_empty() {
                anyhow::bail!("Please provide at least one --user or --device");
            }

            let mut notification = Notification::new().to_users(users).to_devices(devices);
            if let Some(alert) = alert {
                notification = notification.with_alert(alert);
            }
            if let Some(badge) = badge {
                notification = notification.with_badge(badge);
            }
            if let Some(sound) = sound {
                notification = notification.with_sound(sound);
            }
            if let Some(collapse_key) = collapse_key {
                notification = notification.with_collapse_key(collapse_key);
            }

            service
                .notify(&notification)
                .await
                .context("Failed to send notification")?;
        }

        Commands::Status => {
            let status = service.status().await.context("Failed to fetch status")?;
            print_json(&status)?;
        }
    }

    Ok(())
}
