//! indigoctl — query and control Indigo devices, optionally via an LLM
//!
//! Four mutually exclusive modes, evaluated in fixed priority order: list,
//! info, AI query, alter state. With no mode selected a usage hint is printed.

use clap::Parser;
use indigoctl::assist::{self, AssistSettings};
use indigoctl::client::{DesiredState, DeviceDetail, DeviceSummary, IndigoHttpClient};
use indigoctl::config::{Credentials, DeviceApiConfig, LlmConfig};
use indigoctl::error::Result;
use indigoctl::llm::CompletionClient;
use std::path::PathBuf;
use std::time::Duration;
use tracing::error;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "indigoctl")]
#[command(about = "Query and control Indigo home-automation devices")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// IP address of the device API
    #[arg(long, default_value = "10.10.0.140")]
    ip: String,

    /// Port of the device API
    #[arg(long, default_value = "8176")]
    port: String,

    /// List all devices
    #[arg(long)]
    list: bool,

    /// Device path for info or state changes
    #[arg(long, default_value = "")]
    device: String,

    /// Answer a natural-language question about the devices
    #[arg(long)]
    ai: bool,

    /// The question you want to ask the AI
    #[arg(long, default_value = "Are the kitchen lights on?")]
    query_text: String,

    /// Alter device state
    #[arg(long)]
    alter_device_state: bool,

    /// State of the device: on, off, or dim
    #[arg(long, default_value = "")]
    device_state: String,

    /// Parameter for device state: brightness level for 'dim'
    #[arg(long, default_value = "")]
    device_state_param: String,

    /// Template for the device-selection round
    #[arg(long, default_value = "prompt3.txt")]
    selection_template: PathBuf,

    /// Template for the desired-state round
    #[arg(long, default_value = "prompt2.txt")]
    state_template: PathBuf,

    /// Chat-completion endpoint base URL
    #[arg(long, env = "LLM_ENDPOINT", default_value = "http://10.10.0.129:5001")]
    llm_endpoint: String,

    /// Chat-completion model identifier
    #[arg(long, env = "LLM_MODEL", default_value = "gpt-3.5-turbo")]
    llm_model: String,

    /// Bearer token for the completion API
    #[arg(long, env = "LLM_API_KEY")]
    llm_api_key: Option<String>,

    /// HTTP timeout in seconds
    #[arg(long, default_value = "30")]
    timeout_secs: u64,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

impl Cli {
    /// Initialize logging based on the debug flag.
    fn initialize_logging(&self) {
        let filter = if self.debug {
            EnvFilter::new("debug")
        } else {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
        };

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().compact())
            .init();
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    cli.initialize_logging();

    if let Err(e) = run(&cli).await {
        error!("{e}");
        std::process::exit(1);
    }
}

async fn run(cli: &Cli) -> Result<()> {
    // Credentials are required before any network call.
    let credentials = Credentials::from_env()?;
    let api_config = DeviceApiConfig {
        host: cli.ip.clone(),
        port: cli.port.clone(),
        timeout: Duration::from_secs(cli.timeout_secs),
    };
    let client = IndigoHttpClient::new(&api_config, credentials)?;

    if cli.list {
        let devices = client.list_devices().await?;
        print_device_list(&devices);
    } else if !cli.device.is_empty() && !cli.alter_device_state {
        let detail = client.get_device(&cli.device).await?;
        print_device_info(&detail);
    } else if cli.ai {
        let completions = CompletionClient::new(LlmConfig {
            endpoint: cli.llm_endpoint.clone(),
            model: cli.llm_model.clone(),
            api_key: cli.llm_api_key.clone(),
            timeout: Duration::from_secs(cli.timeout_secs),
        })?;
        let settings = AssistSettings {
            query_text: &cli.query_text,
            selection_template: &cli.selection_template,
            state_template: &cli.state_template,
        };
        assist::run(&client, &completions, &settings).await?;
    } else if cli.alter_device_state && !cli.device.is_empty() && !cli.device_state.is_empty() {
        let state: DesiredState = cli.device_state.parse()?;
        let detail = client
            .set_device_state(&cli.device, state, &cli.device_state_param)
            .await?;
        println!("Device state altered successfully. New state:");
        print_device_info(&detail);
    } else {
        println!(
            "No command specified. Use --list to list devices or --device <path> to get device information."
        );
    }
    Ok(())
}

fn print_device_list(devices: &[DeviceSummary]) {
    println!("Devices:");
    for device in devices {
        println!("{}", device.listing_line());
    }
}

fn print_device_info(detail: &DeviceDetail) {
    println!("Device information:");
    for (key, value) in detail {
        match value.as_str() {
            Some(text) => println!("{key}: {text}"),
            None => println!("{key}: {value}"),
        }
    }
}
