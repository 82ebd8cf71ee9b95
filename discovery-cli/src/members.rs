use std::path::PathBuf;

use clap::Parser;
use tracing::debug;

use discovery_core::config::DiscoveryConfig;
use discovery_core::discovery::ServiceDiscovery;
use discovery_core::ext::init_logger_with_filter;
use discovery_core::member::Member;
use discovery_core::membership_cache::ip_addresses_of;

/// Lists the members of a kubernetes service.
#[derive(Parser, Debug)]
struct Args {
    /// Service whose endpoints are listed.
    #[arg(short, long)]
    service: Option<String>,
    /// Namespace of the service, defaults to POD_NAMESPACE.
    #[arg(short, long)]
    namespace: Option<String>,
    /// Pod left out by --other, defaults to POD_NAME.
    #[arg(short, long)]
    pod_name: Option<String>,
    #[arg(short, long)]
    master: Option<String>,
    /// Service account token file.
    #[arg(short, long)]
    token: Option<PathBuf>,
    #[arg(long)]
    ca_cert: Option<PathBuf>,
    /// Skip verification of the api server certificate.
    #[arg(long)]
    insecure: bool,
    /// TOML file layered over the built in defaults.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Leave out the current pod.
    #[arg(long, conflicts_with = "not_ready")]
    other: bool,
    /// List not ready members instead of ready ones.
    #[arg(long)]
    not_ready: bool,
    /// Print ip addresses only.
    #[arg(long)]
    ips: bool,
    #[arg(long)]
    json: bool,
    /// Print the effective configuration and exit.
    #[arg(long)]
    print_config: bool,
    #[arg(long, default_value = "discovery_core=info")]
    log: String,
}

impl Args {
    fn discovery_config(&self) -> anyhow::Result<DiscoveryConfig> {
        let mut builder = DiscoveryConfig::builder();
        if let Some(path) = &self.config {
            builder = builder.add_source(config::File::from(path.as_path()));
        }
        if let Some(service) = &self.service {
            builder = builder.set_override("service_name", service.as_str())?;
        }
        if let Some(namespace) = &self.namespace {
            builder = builder.set_override("namespace", namespace.as_str())?;
        }
        if let Some(pod_name) = &self.pod_name {
            builder = builder.set_override("pod_name", pod_name.as_str())?;
        }
        if let Some(master) = &self.master {
            builder = builder.set_override("master", master.as_str())?;
        }
        if let Some(token) = &self.token {
            builder = builder.set_override("token_path", token.to_string_lossy().into_owned())?;
        }
        if let Some(ca_cert) = &self.ca_cert {
            builder = builder.set_override("ca_cert", ca_cert.to_string_lossy().into_owned())?;
        }
        if self.insecure {
            builder = builder.set_override("accept_invalid_certs", true)?;
        }
        Ok(builder.build()?)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logger_with_filter(args.log.as_str());
    let config = args.discovery_config()?;
    if args.print_config {
        print!("{}", toml::to_string(&config)?);
        return Ok(());
    }
    debug!(?config, "discovery config");
    let discovery = ServiceDiscovery::from_config(&config)?;
    let members = if args.not_ready {
        discovery.find_not_ready_members().await?
    } else if args.other {
        discovery.find_other_members().await?
    } else {
        discovery.find_all_members().await?
    };
    print_members(&members, &args)?;
    Ok(())
}

fn print_members(members: &[Member], args: &Args) -> anyhow::Result<()> {
    if args.ips {
        let ips = ip_addresses_of(members);
        if args.json {
            println!("{}", serde_json::to_string_pretty(&ips)?);
        } else {
            ips.iter().for_each(|ip| println!("{}", ip));
        }
    } else if args.json {
        println!("{}", serde_json::to_string_pretty(members)?);
    } else {
        members.iter().for_each(|member| println!("{}", member));
    }
    Ok(())
}
