use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "menovibe")]
#[command(about = "Menovibe orchestrator tools", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Send one message to a specialist and print its answer
    Invoke {
        /// Specialist base address
        #[arg(short, long)]
        url: String,

        /// Seconds to wait for the whole answer (unbounded if omitted)
        #[arg(long)]
        stream_timeout: Option<u64>,

        /// Message text
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// List the specialists named in REMOTE_AGENT_ADDRESSES
    Agents {
        /// Skip agent-card discovery
        #[arg(long)]
        offline: bool,
    },

    /// Serve a task endpoint that forwards to one specialist
    Relay {
        /// Specialist name as listed by `menovibe agents`
        #[arg(short, long)]
        target: String,

        /// Overrides PORT
        #[arg(short, long)]
        port: Option<u16>,
    },
}
