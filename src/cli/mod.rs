use std::path::PathBuf;

use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP handler (GET /?q=...) until interrupted
    Serve {
        #[arg(short, long, env = "PORT", default_value = "3000")]
        port: u16,

        /// Bind to 0.0.0.0 instead of 127.0.0.1, exposing the server on all network interfaces
        #[arg(long)]
        public: bool,
    },

    /// Handle one API Gateway proxy event and print the proxy response
    Invoke {
        /// Event JSON file; read from stdin when omitted
        #[arg(short, long)]
        event: Option<PathBuf>,
    },

    /// Send a single message and print the JSON response body
    Ask { message: String },

    /// Run the reply normalizer on a piece of text
    Normalize { text: String },

    /// List available model profiles
    Profiles,
}
