use clap::{Parser, Subcommand, ValueEnum};
use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::config::{Appender, Root};
use netcalc::history::HistoryStore;
use netcalc::output::{
    print_allocation_csv, render_allocation, render_descriptor, render_path_analysis,
};
use netcalc::processing::analyze_path_with;
use netcalc::validators::parse_cidr_notation;
use netcalc::{describe, parse_request, validate_and_allocate, Config, Ipv4, SubnetRequest};
use serde_json::json;
use std::error::Error;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "netcalc")]
#[command(about = "IPv4 subnet, VLSM and BGP AS_PATH calculators")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Describe the network containing an address, e.g. 192.168.1.10/24
    Subnet { cidr: String },

    /// Allocate named subnets from a base network
    Vlsm {
        /// Base network, e.g. 10.0.0.0/24
        base: String,

        /// Requests as name:hosts
        #[arg(required = true)]
        requests: Vec<String>,

        /// Print allocations as CSV
        #[arg(long)]
        csv: bool,
    },

    /// Analyze a BGP AS_PATH, e.g. "100 200 {300 400} 500"
    Bgp {
        as_path: String,

        /// The path was learned over IPv6
        #[arg(long)]
        ipv6: bool,
    },

    /// Show or manage the history of a calculator
    History {
        #[arg(value_enum)]
        tool: Tool,

        /// Delete all entries
        #[arg(long)]
        clear: bool,

        /// Print the history as JSON
        #[arg(long)]
        export: bool,

        /// Replace the history with entries from a JSON file
        #[arg(long, value_name = "FILE")]
        import: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Tool {
    Subnet,
    Vlsm,
    Bgp,
}

impl Tool {
    fn history_key(self) -> &'static str {
        match self {
            Tool::Subnet => "subnet-history",
            Tool::Vlsm => "vlsm-history",
            Tool::Bgp => "bgp-history",
        }
    }
}

fn init_logging() -> Result<(), Box<dyn Error>> {
    if log4rs::init_file("log4rs.yml", Default::default()).is_ok() {
        return Ok(());
    }
    let stderr = ConsoleAppender::builder().target(Target::Stderr).build();
    let config = log4rs::config::Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr)))
        .build(Root::builder().appender("stderr").build(LevelFilter::Info))?;
    log4rs::init_config(config)?;
    Ok(())
}

fn record(config: &Config, tool: Tool, input: serde_json::Value, result: serde_json::Value) {
    HistoryStore::record(config, tool.history_key(), input, result);
}

fn main() -> Result<(), Box<dyn Error>> {
    // Keep main.rs thin, the calculators are tested in the library
    dotenv::dotenv().ok();
    init_logging()?;
    log::info!("#Start main()");

    let cli = Cli::parse();
    let config = Config::from_env();

    match cli.command {
        Commands::Subnet { cidr } => {
            let (address, prefix_length) = parse_cidr_notation(&cidr)?;
            let descriptor = describe(&address, prefix_length)?;
            print!("{}", render_descriptor(&descriptor));
            record(
                &config,
                Tool::Subnet,
                json!({ "address": address, "cidr": prefix_length }),
                serde_json::to_value(&descriptor)?,
            );
        }
        Commands::Vlsm {
            base,
            requests,
            csv,
        } => {
            let base = Ipv4::new(&base)?;
            let requests = requests
                .iter()
                .map(|r| parse_request(r))
                .collect::<netcalc::Result<Vec<SubnetRequest>>>()?;
            let result = validate_and_allocate(&base, &requests)?;
            if csv {
                print_allocation_csv(&result);
            } else {
                print!("{}", render_allocation(&result));
            }
            record(
                &config,
                Tool::Vlsm,
                json!({ "base": base, "requests": requests }),
                serde_json::to_value(&result)?,
            );
        }
        Commands::Bgp { as_path, ipv6 } => {
            let analysis = analyze_path_with(&as_path, !ipv6, config.long_path_threshold)?;
            print!("{}", render_path_analysis(&analysis));
            record(
                &config,
                Tool::Bgp,
                json!({ "path": as_path, "is_ipv4": !ipv6 }),
                serde_json::to_value(&analysis)?,
            );
        }
        Commands::History {
            tool,
            clear,
            export,
            import,
        } => {
            let mut store = HistoryStore::open(&config, tool.history_key());
            if clear {
                store.clear()?;
                println!("History cleared");
                return Ok(());
            }
            if let Some(file) = import {
                let json = std::fs::read_to_string(&file)?;
                let count = store.import(&json)?;
                store.save()?;
                println!("Imported {count} entries from {}", file.display());
            }
            if export {
                println!("{}", store.export()?);
            } else {
                for entry in store.entries() {
                    println!(
                        "{}  {}  {}",
                        entry.local_time(config.timezone),
                        entry.id,
                        entry.input
                    );
                }
                println!("{} entries in {}", store.count(), store.path().display());
            }
        }
    }

    log::info!("#End main()");
    Ok(())
}
